//! Candidate statements and their pipeline judgements

use serde::{Deserialize, Serialize};

/// A generated statement together with its provenance
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Candidate {
    /// The statement text as generated, e.g. `E = m * c^2`
    pub statement: String,
    /// The template the mutator started from
    pub template: String,
    /// Names of the rewrite rules applied, in order
    pub rules_applied: Vec<String>,
    /// Number of rewrite passes stacked onto the template
    pub stacking_depth: usize,
    /// Scheduler tick on which this candidate was generated
    pub generation: u64,
}

impl Candidate {
    /// A candidate taken verbatim from a template (no rewrites)
    pub fn from_template(template: impl Into<String>, generation: u64) -> Self {
        let template = template.into();
        Self {
            statement: template.clone(),
            template,
            rules_applied: Vec::new(),
            stacking_depth: 0,
            generation,
        }
    }
}

/// The verifier's judgement of a candidate
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    /// The two sides are not algebraically equal (or the statement is
    /// malformed)
    AlgebraicFail,
    /// Algebra holds but the sides are not dimensionally homogeneous
    DimensionalFail,
    /// Algebraic equality and dimensional homogeneity both hold
    Verified,
}

impl Verdict {
    /// True only for fully verified candidates
    pub fn is_verified(&self) -> bool {
        matches!(self, Verdict::Verified)
    }
}

/// The classifier's disposition of a candidate
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// Canonical form already present in a collection; no state change
    Redundant,
    /// Verified and inserted into the knowledge base
    Proven,
    /// Failed verification but accepted into the speculative set
    Speculative,
    /// Examined and discarded
    Scanned,
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Redundant => write!(f, "redundant"),
            Outcome::Proven => write!(f, "proven"),
            Outcome::Speculative => write!(f, "speculative"),
            Outcome::Scanned => write!(f, "scanned"),
        }
    }
}

/// Derivation record linking an accepted entry back to its template
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lineage {
    /// The template statement the entry was derived from
    pub template: String,
    /// Rewrite rules applied between template and entry
    pub rules_applied: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_template() {
        let c = Candidate::from_template("x + 0 = x", 7);
        assert_eq!(c.statement, c.template);
        assert_eq!(c.stacking_depth, 0);
        assert!(c.rules_applied.is_empty());
        assert_eq!(c.generation, 7);
    }

    #[test]
    fn test_verdict() {
        assert!(Verdict::Verified.is_verified());
        assert!(!Verdict::DimensionalFail.is_verified());
    }
}
