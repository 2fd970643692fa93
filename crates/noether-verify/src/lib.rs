//! Noether Verify - two-stage algebraic and dimensional verifier
//!
//! Stage one substitutes the registry's closed-form definitions to fixpoint
//! and requires the two sides to be algebraically equal. Stage two, entered
//! only when a dimensioned symbol occurs, requires both sides to fold to
//! the same dimension vector. Every internal algebra error is downgraded to
//! a failing verdict; verification can never abort the pipeline.

#![deny(unsafe_code)]

use noether_algebra::{check_homogeneous, is_identity, Equation, Parser};
use noether_registry::Registry;
use noether_types::Verdict;
use std::sync::Arc;
use tracing::trace;

/// Decides whether a candidate statement is a valid physical identity
pub struct Verifier {
    registry: Arc<Registry>,
}

impl Verifier {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self { registry }
    }

    /// Verify a statement
    pub fn verify(&self, statement: &str) -> Verdict {
        let equation = match Parser::parse_equation(statement) {
            Ok(eq) => eq,
            Err(err) => {
                trace!(%err, statement, "Statement failed to parse");
                return Verdict::AlgebraicFail;
            }
        };
        self.verify_equation(&equation)
    }

    /// Verify an already-parsed equation
    pub fn verify_equation(&self, equation: &Equation) -> Verdict {
        let expanded = self.expand_definitions(equation);
        match is_identity(&expanded) {
            Ok(true) => {}
            Ok(false) => return Verdict::AlgebraicFail,
            Err(err) => {
                trace!(%err, "Normalization failed; downgrading to algebraic failure");
                return Verdict::AlgebraicFail;
            }
        }

        // The dimensional stage runs on the statement as written, not the
        // expanded form, and only when a declared dimension is in play
        let symbols = equation.symbols();
        if self.registry.any_dimensioned(&symbols) {
            if let Err(err) = check_homogeneous(equation, &self.registry.dimension_lookup()) {
                trace!(%err, "Dimensional check failed");
                return Verdict::DimensionalFail;
            }
        }

        Verdict::Verified
    }

    /// Substitute closed-form definitions until none apply. Definitions are
    /// acyclic, so the fixpoint is reached within one pass per definition.
    fn expand_definitions(&self, equation: &Equation) -> Equation {
        let definitions = self.registry.definitions();
        let mut current = equation.clone();
        for _ in 0..=definitions.len() {
            let mut changed = false;
            for definition in definitions {
                if current.contains_symbol(&definition.symbol) {
                    current = current.substitute(&definition.symbol, &definition.replacement);
                    changed = true;
                }
            }
            if !changed {
                break;
            }
        }
        current
    }
}
