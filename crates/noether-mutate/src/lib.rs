//! Noether Mutate - structural rewrite rules and template selection
//!
//! The mutator draws a template (from prior knowledge or the bedrock seeds,
//! weighted by the registry's escalation table), stacks one to four rewrite
//! rules onto it, and emits a [`Candidate`] with full provenance. Rules
//! operate on parsed expression trees and can never produce a malformed
//! statement.

#![deny(unsafe_code)]

pub mod rules;

pub use rules::{standard_rules, RewriteRule};

use noether_algebra::Parser;
use noether_registry::Registry;
use noether_types::Candidate;
use rand::seq::SliceRandom;
use rand::{Rng, RngCore};
use std::sync::Arc;
use tracing::debug;

/// Mutation limits
#[derive(Clone, Copy, Debug)]
pub struct MutatorConfig {
    /// Maximum rewrite passes stacked per candidate
    pub max_stacking: usize,
    /// Complexity ceiling: rendered statement length
    pub max_statement_len: usize,
    /// Complexity ceiling: AST node count
    pub max_node_count: usize,
}

impl Default for MutatorConfig {
    fn default() -> Self {
        Self {
            max_stacking: 4,
            max_statement_len: 180,
            max_node_count: 64,
        }
    }
}

/// Generates candidates by structural rewriting of templates
pub struct Mutator {
    registry: Arc<Registry>,
    rules: Vec<Box<dyn RewriteRule>>,
    config: MutatorConfig,
}

impl Mutator {
    pub fn new(registry: Arc<Registry>, config: MutatorConfig) -> Self {
        Self {
            registry,
            rules: rules::standard_rules(),
            config,
        }
    }

    /// Pick the next template: prior knowledge with the registry's
    /// escalating bias, bedrock seeds otherwise
    pub fn select_template(
        &self,
        rng: &mut dyn RngCore,
        knowledge: &[String],
        speculative: &[String],
    ) -> String {
        let bias = self.registry.knowledge_bias(knowledge.len());
        let draw_from_knowledge =
            (!knowledge.is_empty() || !speculative.is_empty()) && rng.gen::<f64>() < bias;

        if draw_from_knowledge {
            let pool: Vec<&String> = knowledge.iter().chain(speculative.iter()).collect();
            if let Some(template) = pool.choose(rng) {
                return (*template).to_string();
            }
        }

        self.registry
            .seeds()
            .choose(rng)
            .cloned()
            .unwrap_or_else(|| "x = x".to_string())
    }

    /// Stack 1..=k rewrite passes onto the template
    pub fn mutate(&self, rng: &mut dyn RngCore, template: &str, generation: u64) -> Candidate {
        let mut equation = match Parser::parse_equation(template) {
            Ok(eq) => eq,
            // Pool entries are always well-formed; an unparseable template
            // passes through untouched and fails verification downstream
            Err(_) => return Candidate::from_template(template, generation),
        };

        let passes = rng.gen_range(1..=self.config.max_stacking);
        let mut applied = Vec::new();

        for _ in 0..passes {
            let rule = match self.rules.choose(rng) {
                Some(rule) => rule,
                None => break,
            };
            if let Some(rewritten) = rule.apply(rng, &equation, &self.registry) {
                debug!(rule = rule.name(), "Applied rewrite rule");
                equation = rewritten;
                applied.push(rule.name().to_string());
            }
        }

        Candidate {
            statement: equation.to_string(),
            template: template.to_string(),
            rules_applied: applied,
            stacking_depth: passes,
            generation,
        }
    }

    /// Complexity ceiling applied before verification
    pub fn exceeds_ceiling(&self, candidate: &Candidate) -> bool {
        if candidate.statement.len() > self.config.max_statement_len {
            return true;
        }
        match Parser::parse_equation(&candidate.statement) {
            Ok(eq) => eq.node_count() > self.config.max_node_count,
            Err(_) => false,
        }
    }

    pub fn config(&self) -> &MutatorConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn mutator() -> Mutator {
        Mutator::new(Arc::new(Registry::standard()), MutatorConfig::default())
    }

    #[test]
    fn test_mutate_produces_well_formed_statement() {
        let m = mutator();
        let mut rng = StdRng::seed_from_u64(11);

        for generation in 0..50 {
            let template = m.select_template(&mut rng, &[], &[]);
            let candidate = m.mutate(&mut rng, &template, generation);
            assert!(
                Parser::parse_equation(&candidate.statement).is_ok(),
                "malformed candidate: {}",
                candidate.statement
            );
            assert!(candidate.stacking_depth >= 1);
            assert!(candidate.stacking_depth <= 4);
        }
    }

    #[test]
    fn test_mutation_is_deterministic_given_seed() {
        let m = mutator();

        let mut rng_a = StdRng::seed_from_u64(99);
        let mut rng_b = StdRng::seed_from_u64(99);

        for generation in 0..20 {
            let ta = m.select_template(&mut rng_a, &[], &[]);
            let tb = m.select_template(&mut rng_b, &[], &[]);
            assert_eq!(ta, tb);

            let ca = m.mutate(&mut rng_a, &ta, generation);
            let cb = m.mutate(&mut rng_b, &tb, generation);
            assert_eq!(ca.statement, cb.statement);
            assert_eq!(ca.rules_applied, cb.rules_applied);
        }
    }

    #[test]
    fn test_template_selection_prefers_knowledge_as_it_grows() {
        let m = mutator();
        let mut rng = StdRng::seed_from_u64(7);

        let knowledge: Vec<String> = (0..60).map(|i| format!("k{} = k{}", i, i)).collect();
        let draws = 200;
        let mut from_knowledge = 0;
        for _ in 0..draws {
            let template = m.select_template(&mut rng, &knowledge, &[]);
            if template.starts_with('k') {
                from_knowledge += 1;
            }
        }
        // Bias tier at size >= 50 is 0.75
        assert!(from_knowledge > draws / 2);
    }

    #[test]
    fn test_empty_pool_falls_back_to_seeds() {
        let m = mutator();
        let mut rng = StdRng::seed_from_u64(3);
        let template = m.select_template(&mut rng, &[], &[]);
        assert!(m
            .registry
            .seeds()
            .iter()
            .any(|seed| seed == &template));
    }

    #[test]
    fn test_ceiling_rejects_long_statements() {
        let m = mutator();
        let candidate = Candidate {
            statement: format!("{} = x", "x + ".repeat(100)),
            template: "x = x".to_string(),
            rules_applied: vec![],
            stacking_depth: 1,
            generation: 0,
        };
        assert!(m.exceeds_ceiling(&candidate));
    }

    #[test]
    fn test_ceiling_accepts_seeds() {
        let m = mutator();
        for seed in Registry::standard().seeds() {
            let candidate = Candidate::from_template(seed.clone(), 0);
            assert!(!m.exceeds_ceiling(&candidate));
        }
    }

    #[test]
    fn test_provenance_recorded() {
        let m = mutator();
        let mut rng = StdRng::seed_from_u64(21);
        let candidate = m.mutate(&mut rng, "E = m * c^2", 5);
        assert_eq!(candidate.template, "E = m * c^2");
        assert_eq!(candidate.generation, 5);
    }
}
