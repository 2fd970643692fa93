//! Knowledge base entry types

use crate::candidate::{Lineage, Verdict};
use serde::{Deserialize, Serialize};

/// Names the two persisted collections
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CollectionKind {
    /// Fully verified identities
    Proven,
    /// Unverified but retained conjectures
    Speculative,
}

impl std::fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CollectionKind::Proven => write!(f, "proven"),
            CollectionKind::Speculative => write!(f, "speculative"),
        }
    }
}

impl std::str::FromStr for CollectionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "proven" => Ok(CollectionKind::Proven),
            "speculative" => Ok(CollectionKind::Speculative),
            other => Err(format!("unknown collection: {}", other)),
        }
    }
}

/// An accepted statement, keyed by its canonical form
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct KnowledgeEntry {
    /// Canonical form used for equality and dedup
    pub canonical: String,
    /// The statement as it was generated, for display
    pub statement: String,
    /// The verdict that admitted the entry
    pub verdict: Verdict,
    /// Scheduler tick at acceptance
    pub generation: u64,
    /// Derivation record, when the entry was produced by mutation
    pub lineage: Option<Lineage>,
}

/// A one-shot size threshold event over a collection
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
    /// Human-readable milestone name
    pub name: String,
    /// Collection the threshold applies to
    pub collection: CollectionKind,
    /// Entry count at which the milestone fires
    pub threshold: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_kind_round_trip() {
        let kind: CollectionKind = "proven".parse().unwrap();
        assert_eq!(kind, CollectionKind::Proven);
        assert_eq!(kind.to_string(), "proven");
        assert!("nonsense".parse::<CollectionKind>().is_err());
    }
}
