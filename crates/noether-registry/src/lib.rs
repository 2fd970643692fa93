//! Noether Registry - bedrock identities, symbol dimensions, threshold tables
//!
//! The registry is the read-only catalog everything else consults: the seed
//! identities used as mutation templates, the symbol-to-dimension table,
//! the closed-form definitions the verifier substitutes, and the declared
//! threshold tables that govern template selection and milestones. Nothing
//! here changes after construction.

#![deny(unsafe_code)]

use noether_algebra::{canonicalize_statement, Expr, Parser};
use noether_types::DimensionVector;
use std::collections::{HashMap, HashSet};

/// A closed-form definition: the symbol rewrites to the expression.
///
/// Definitions must be acyclic; the verifier substitutes them to fixpoint.
#[derive(Clone, Debug)]
pub struct Definition {
    pub symbol: String,
    pub replacement: Expr,
}

/// A substitution available to the mutator. Unlike definitions these may
/// run in both directions (`m` to `E / c^2` and `E` to `m * c^2`).
#[derive(Clone, Debug)]
pub struct Equivalence {
    pub symbol: String,
    pub replacement: Expr,
}

/// One tier of the knowledge-bias escalation table: once the knowledge
/// base holds at least `at_size` entries, templates are drawn from prior
/// knowledge with probability `probability`.
#[derive(Clone, Copy, Debug)]
pub struct BiasTier {
    pub at_size: usize,
    pub probability: f64,
}

/// Read-only catalog of seeds, dimensions, and threshold tables
pub struct Registry {
    seeds: Vec<String>,
    seed_canonicals: HashSet<String>,
    dimensions: HashMap<String, DimensionVector>,
    definitions: Vec<Definition>,
    equivalences: Vec<Equivalence>,
    knowledge_bias: Vec<BiasTier>,
    milestone_thresholds: Vec<usize>,
    pool_symbols: Vec<String>,
}

/// Seed identities: classical algebra plus the physics bedrock.
/// Every entry must verify under the standard definitions.
const SEEDS: &[&str] = &[
    // Algebraic axioms
    "x + 0 = x",
    "x * 1 = x",
    "x * 0 = 0",
    "(x + y) + z = x + (y + z)",
    "x * y = y * x",
    "a + b = b + a",
    // Known identities
    "(a + b)^2 = a^2 + 2*a*b + b^2",
    "x^2 - y^2 = (x - y) * (x + y)",
    "a^3 + b^3 = (a + b) * (a^2 - a*b + b^2)",
    // Physics bedrock
    "E = m * c^2",
    "p = m * v",
    "d = v * t",
    "P = E / t",
];

/// Closed-form definitions, in acyclic order (later entries may reference
/// symbols defined earlier only through the fixpoint pass)
const DEFINITIONS: &[(&str, &str)] = &[
    ("E", "m * c^2"),
    ("p", "m * v"),
    ("d", "v * t"),
    ("P", "E / t"),
];

/// Mutation-facing substitutions, both directions of each definition
const EQUIVALENCES: &[(&str, &str)] = &[
    ("E", "m * c^2"),
    ("m", "E / c^2"),
    ("p", "m * v"),
    ("v", "p / m"),
    ("d", "v * t"),
    ("t", "d / v"),
    ("P", "E / t"),
];

impl Registry {
    /// The standard catalog
    pub fn standard() -> Self {
        let seeds: Vec<String> = SEEDS.iter().map(|s| s.to_string()).collect();
        let seed_canonicals = seeds
            .iter()
            .filter_map(|s| canonicalize_statement(s).ok())
            .map(|form| form.key)
            .collect();

        let mut dimensions = HashMap::new();
        dimensions.insert("E".to_string(), DimensionVector::energy());
        dimensions.insert("m".to_string(), DimensionVector::mass());
        dimensions.insert("c".to_string(), DimensionVector::velocity());
        dimensions.insert("v".to_string(), DimensionVector::velocity());
        dimensions.insert("p".to_string(), DimensionVector::new(1, 1, -1, 0, 0));
        dimensions.insert("d".to_string(), DimensionVector::length());
        dimensions.insert("t".to_string(), DimensionVector::time());
        dimensions.insert("P".to_string(), DimensionVector::new(2, 1, -3, 0, 0));

        let definitions = DEFINITIONS
            .iter()
            .filter_map(|(symbol, replacement)| {
                Parser::parse_expression_str(replacement)
                    .ok()
                    .map(|replacement| Definition {
                        symbol: symbol.to_string(),
                        replacement,
                    })
            })
            .collect();

        let equivalences = EQUIVALENCES
            .iter()
            .filter_map(|(symbol, replacement)| {
                Parser::parse_expression_str(replacement)
                    .ok()
                    .map(|replacement| Equivalence {
                        symbol: symbol.to_string(),
                        replacement,
                    })
            })
            .collect();

        let mut pool_symbols: Vec<String> = seeds
            .iter()
            .filter_map(|s| Parser::parse_equation(s).ok())
            .flat_map(|eq| eq.symbols())
            .collect::<std::collections::BTreeSet<_>>()
            .into_iter()
            .collect();
        pool_symbols.sort();

        Self {
            seeds,
            seed_canonicals,
            dimensions,
            definitions,
            equivalences,
            // Template selection escalates toward accumulated knowledge as
            // the base grows
            knowledge_bias: vec![
                BiasTier {
                    at_size: 0,
                    probability: 0.25,
                },
                BiasTier {
                    at_size: 10,
                    probability: 0.45,
                },
                BiasTier {
                    at_size: 25,
                    probability: 0.6,
                },
                BiasTier {
                    at_size: 50,
                    probability: 0.75,
                },
            ],
            milestone_thresholds: vec![1, 5, 10, 25, 50, 100],
            pool_symbols,
        }
    }

    /// Seed identities usable as mutation templates
    pub fn seeds(&self) -> &[String] {
        &self.seeds
    }

    /// Membership test against the bedrock canonical forms
    pub fn is_bedrock(&self, canonical_key: &str) -> bool {
        self.seed_canonicals.contains(canonical_key)
    }

    /// Declared dimension of a symbol, if any
    pub fn dimension_of(&self, symbol: &str) -> Option<DimensionVector> {
        self.dimensions.get(symbol).copied()
    }

    /// Lookup closure for the dimensional fold; absent symbols are
    /// dimensionless
    pub fn dimension_lookup(&self) -> impl Fn(&str) -> DimensionVector + '_ {
        |name| self.dimensions.get(name).copied().unwrap_or_default()
    }

    /// True when any of the given symbols carries a declared dimension
    pub fn any_dimensioned<'a, I>(&self, symbols: I) -> bool
    where
        I: IntoIterator<Item = &'a String>,
    {
        symbols.into_iter().any(|s| self.dimensions.contains_key(s))
    }

    /// Closed-form definitions for verifier substitution
    pub fn definitions(&self) -> &[Definition] {
        &self.definitions
    }

    /// Substitutions available to the mutator
    pub fn equivalences(&self) -> &[Equivalence] {
        &self.equivalences
    }

    /// Probability of drawing the next template from prior knowledge,
    /// given the current knowledge-base size
    pub fn knowledge_bias(&self, knowledge_size: usize) -> f64 {
        self.knowledge_bias
            .iter()
            .rev()
            .find(|tier| knowledge_size >= tier.at_size)
            .map(|tier| tier.probability)
            .unwrap_or(0.0)
    }

    /// Collection sizes at which milestones fire
    pub fn milestone_thresholds(&self) -> &[usize] {
        &self.milestone_thresholds
    }

    /// Symbols the mutator may draw on
    pub fn pool_symbols(&self) -> &[String] {
        &self.pool_symbols
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::standard()
    }
}
