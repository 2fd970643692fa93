//! Noether Algebra - expression parsing, normal forms, dimensional analysis
//!
//! The closed-form fragment this crate decides: rational expressions over
//! symbols with integer-literal exponents of bounded magnitude. Two
//! expressions are equal iff their cross-multiplied difference expands to
//! the zero polynomial, so equality never needs a polynomial gcd.
//!
//! ## Key Components
//!
//! - [`Lexer`] / [`Parser`]: text to [`Equation`]
//! - [`RationalFn`]: expanded polynomial numerator/denominator pair
//! - [`canonicalize`]: deterministic dedup key for an equation
//! - [`dimension_of`] / [`check_homogeneous`]: dimensional fold

#![deny(unsafe_code)]

pub mod ast;
pub mod dimension;
pub mod errors;
pub mod lexer;
pub mod parser;
pub mod poly;
pub mod rational;

// Re-exports
pub use ast::{Equation, Expr};
pub use dimension::{check_homogeneous, dimension_of};
pub use errors::{AlgebraError, AlgebraResult};
pub use lexer::{Lexer, Token, TokenKind};
pub use parser::Parser;
pub use poly::{canonical_equation, CanonicalForm, Poly, RationalFn, MAX_EXPONENT, MAX_TERMS};
pub use rational::Rational;

/// Canonicalize a parsed equation into its dedup key
pub fn canonicalize(equation: &Equation) -> AlgebraResult<CanonicalForm> {
    let lhs = RationalFn::from_expr(&equation.lhs)?;
    let rhs = RationalFn::from_expr(&equation.rhs)?;
    canonical_equation(&lhs, &rhs)
}

/// Parse and canonicalize a statement in one step
pub fn canonicalize_statement(statement: &str) -> AlgebraResult<CanonicalForm> {
    let equation = Parser::parse_equation(statement)?;
    canonicalize(&equation)
}

/// True when the two sides of the equation are algebraically equal
pub fn is_identity(equation: &Equation) -> AlgebraResult<bool> {
    Ok(canonicalize(equation)?.trivial)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_canonicalize_statement() {
        let form = canonicalize_statement("x * 1 = x").unwrap();
        assert!(form.trivial);
    }

    #[test]
    fn test_is_identity() {
        let eq = Parser::parse_equation("(x + y) + z = x + (y + z)").unwrap();
        assert!(is_identity(&eq).unwrap());

        let eq = Parser::parse_equation("x * 0 = 1").unwrap();
        assert!(!is_identity(&eq).unwrap());
    }

    #[test]
    fn test_malformed_statement_is_an_error() {
        assert!(canonicalize_statement("x + + y = z").is_err());
        assert!(canonicalize_statement("no equality here").is_err());
    }

    proptest! {
        // Commutativity holds for every rendered pair of small expressions
        #[test]
        fn prop_addition_commutes(a in 0i64..100, b in 0i64..100) {
            let form = canonicalize_statement(&format!("x + {} + {} = {} + {} + x", a, b, b, a))
                .unwrap();
            prop_assert!(form.trivial);
        }

        #[test]
        fn prop_binomial_square(a in 1i64..6, b in 1i64..6) {
            let statement = format!(
                "({}*x + {}*y)^2 = {}*x^2 + {}*x*y + {}*y^2",
                a, b, a * a, 2 * a * b, b * b
            );
            prop_assert!(canonicalize_statement(&statement).unwrap().trivial);
        }

        // The canonical key is stable across whitespace differences
        #[test]
        fn prop_whitespace_insensitive(spaces in 0usize..4) {
            let pad = " ".repeat(spaces);
            let spaced = format!("E{}={}m * c^2", pad, pad);
            let key = canonicalize_statement(&spaced).unwrap().key;
            prop_assert_eq!(key, canonicalize_statement("E = m * c^2").unwrap().key);
        }
    }
}
