//! Candidate classification and milestone tracking
//!
//! The classifier turns a verdict into a disposition: trivial and
//! already-known candidates are redundant, verified candidates enter the
//! knowledge base, and failed candidates are retained as speculative with a
//! configured probability. Milestones fire at most once per threshold.

use crate::error::EngineResult;
use noether_algebra::canonicalize_statement;
use noether_knowledge::{InsertOutcome, KnowledgeStore};
use noether_registry::Registry;
use noether_types::{
    Candidate, CollectionKind, KnowledgeEntry, Lineage, Milestone, Outcome, Verdict,
};
use rand::{Rng, RngCore};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use tracing::trace;

/// Result of classifying one candidate
#[derive(Clone, Debug)]
pub struct Classification {
    pub outcome: Outcome,
    /// Canonical key, when the candidate canonicalized
    pub canonical: Option<String>,
    /// Milestones crossed by this classification, in firing order
    pub milestones: Vec<Milestone>,
}

impl Classification {
    fn scanned() -> Self {
        Self {
            outcome: Outcome::Scanned,
            canonical: None,
            milestones: Vec::new(),
        }
    }

    fn redundant(canonical: String) -> Self {
        Self {
            outcome: Outcome::Redundant,
            canonical: Some(canonical),
            milestones: Vec::new(),
        }
    }
}

struct MilestoneState {
    fired: HashSet<(CollectionKind, usize)>,
    rational_class_seen: bool,
}

/// Classifies candidates and tracks one-shot milestones
pub struct Classifier {
    registry: Arc<Registry>,
    speculative_acceptance: f64,
    structure_boost: f64,
    milestones: Mutex<MilestoneState>,
}

impl Classifier {
    pub fn new(registry: Arc<Registry>, speculative_acceptance: f64, structure_boost: f64) -> Self {
        Self {
            registry,
            speculative_acceptance,
            structure_boost,
            milestones: Mutex::new(MilestoneState {
                fired: HashSet::new(),
                rational_class_seen: false,
            }),
        }
    }

    /// Classify a candidate given its verdict, updating the store on
    /// acceptance
    pub fn classify(
        &self,
        rng: &mut dyn RngCore,
        candidate: &Candidate,
        verdict: Verdict,
        store: &KnowledgeStore,
    ) -> EngineResult<Classification> {
        let form = match canonicalize_statement(&candidate.statement) {
            Ok(form) => form,
            Err(err) => {
                trace!(%err, statement = %candidate.statement, "Candidate has no canonical form");
                return Ok(Classification::scanned());
            }
        };

        // Trivial X = X statements carry no information
        if form.trivial {
            return Ok(Classification::redundant(form.key));
        }

        if self.registry.is_bedrock(&form.key) || store.contains(&form.key)? {
            return Ok(Classification::redundant(form.key));
        }

        if verdict.is_verified() {
            return self.accept(candidate, verdict, form.key, CollectionKind::Proven, store);
        }

        if rng.gen::<f64>() < self.acceptance_probability(&candidate.statement) {
            return self.accept(
                candidate,
                verdict,
                form.key,
                CollectionKind::Speculative,
                store,
            );
        }

        Ok(Classification {
            outcome: Outcome::Scanned,
            canonical: Some(form.key),
            milestones: Vec::new(),
        })
    }

    /// Failed candidates with power or division structure are likelier to
    /// be retained
    fn acceptance_probability(&self, statement: &str) -> f64 {
        let mut p = self.speculative_acceptance;
        if statement.contains('^') || statement.contains('/') {
            p += self.structure_boost;
        }
        p.min(1.0)
    }

    fn accept(
        &self,
        candidate: &Candidate,
        verdict: Verdict,
        canonical: String,
        kind: CollectionKind,
        store: &KnowledgeStore,
    ) -> EngineResult<Classification> {
        let entry = KnowledgeEntry {
            canonical: canonical.clone(),
            statement: candidate.statement.clone(),
            verdict,
            generation: candidate.generation,
            lineage: (!candidate.rules_applied.is_empty()).then(|| Lineage {
                template: candidate.template.clone(),
                rules_applied: candidate.rules_applied.clone(),
            }),
        };

        match store.insert_if_absent(kind, entry)? {
            InsertOutcome::Duplicate => Ok(Classification::redundant(canonical)),
            InsertOutcome::Inserted => {
                let size = store.len(kind)?;
                let milestones = self.check_milestones(kind, size, &candidate.statement);
                Ok(Classification {
                    outcome: match kind {
                        CollectionKind::Proven => Outcome::Proven,
                        CollectionKind::Speculative => Outcome::Speculative,
                    },
                    canonical: Some(canonical),
                    milestones,
                })
            }
        }
    }

    /// Threshold checks after an insertion; each milestone fires once per
    /// process
    fn check_milestones(
        &self,
        kind: CollectionKind,
        size: usize,
        statement: &str,
    ) -> Vec<Milestone> {
        let mut state = match self.milestones.lock() {
            Ok(state) => state,
            Err(_) => return Vec::new(),
        };
        let mut fired = Vec::new();

        if self.registry.milestone_thresholds().contains(&size)
            && state.fired.insert((kind, size))
        {
            fired.push(Milestone {
                name: milestone_name(kind, size),
                collection: kind,
                threshold: size,
            });
        }

        if kind == CollectionKind::Proven
            && !state.rational_class_seen
            && statement.contains('/')
        {
            state.rational_class_seen = true;
            fired.push(Milestone {
                name: "first identity with rational structure".to_string(),
                collection: kind,
                threshold: size,
            });
        }

        fired
    }
}

fn milestone_name(kind: CollectionKind, size: usize) -> String {
    match (kind, size) {
        (CollectionKind::Proven, 1) => "first proven identity".to_string(),
        (CollectionKind::Speculative, 1) => "first speculative conjecture".to_string(),
        (CollectionKind::Proven, n) => format!("knowledge base reached {} entries", n),
        (CollectionKind::Speculative, n) => format!("speculative set reached {} entries", n),
    }
}
