//! Structural rewrite rules
//!
//! Each rule declares a precondition and performs one bounded, well-formed
//! transformation of an equation. A rule whose precondition is not met
//! returns `None` instead of erroring; the mutator then leaves the input
//! unchanged. Rules are deterministic given their random draws.

use noether_algebra::{Equation, Expr, Rational, MAX_EXPONENT};
use noether_registry::Registry;
use rand::seq::SliceRandom;
use rand::{Rng, RngCore};

/// A single structural rewrite
pub trait RewriteRule: Send + Sync {
    /// Stable rule name recorded in candidate lineage
    fn name(&self) -> &'static str;

    /// Apply the rule, or return `None` when the precondition fails
    fn apply(&self, rng: &mut dyn RngCore, eq: &Equation, registry: &Registry)
        -> Option<Equation>;
}

/// The standard rule catalog, identity-preserving rules first
pub fn standard_rules() -> Vec<Box<dyn RewriteRule>> {
    vec![
        Box::new(SubstituteEquivalence),
        Box::new(MultiplyBothSides),
        Box::new(AddTermBothSides),
        Box::new(SwapSides),
        Box::new(SymbolSwap),
        Box::new(PerturbCoefficient),
        Box::new(ExponentBump),
    ]
}

/// Replace a symbol with a registered closed-form equivalent,
/// e.g. `m` with `E / c^2`
pub struct SubstituteEquivalence;

impl RewriteRule for SubstituteEquivalence {
    fn name(&self) -> &'static str {
        "substitute-equivalence"
    }

    fn apply(
        &self,
        rng: &mut dyn RngCore,
        eq: &Equation,
        registry: &Registry,
    ) -> Option<Equation> {
        let applicable: Vec<_> = registry
            .equivalences()
            .iter()
            .filter(|e| eq.contains_symbol(&e.symbol))
            .collect();
        let chosen = applicable.choose(rng)?;
        Some(eq.substitute(&chosen.symbol, &chosen.replacement))
    }
}

/// Multiply both sides by the same pool symbol
pub struct MultiplyBothSides;

impl RewriteRule for MultiplyBothSides {
    fn name(&self) -> &'static str {
        "multiply-both-sides"
    }

    fn apply(
        &self,
        rng: &mut dyn RngCore,
        eq: &Equation,
        registry: &Registry,
    ) -> Option<Equation> {
        let symbol = registry.pool_symbols().choose(rng)?;
        Some(Equation::new(
            Expr::mul(eq.lhs.clone(), Expr::sym(symbol.clone())),
            Expr::mul(eq.rhs.clone(), Expr::sym(symbol.clone())),
        ))
    }
}

/// Add the same pool symbol to both sides
pub struct AddTermBothSides;

impl RewriteRule for AddTermBothSides {
    fn name(&self) -> &'static str {
        "add-term-both-sides"
    }

    fn apply(
        &self,
        rng: &mut dyn RngCore,
        eq: &Equation,
        registry: &Registry,
    ) -> Option<Equation> {
        let symbol = registry.pool_symbols().choose(rng)?;
        Some(Equation::new(
            Expr::add(eq.lhs.clone(), Expr::sym(symbol.clone())),
            Expr::add(eq.rhs.clone(), Expr::sym(symbol.clone())),
        ))
    }
}

/// Exchange the two sides
pub struct SwapSides;

impl RewriteRule for SwapSides {
    fn name(&self) -> &'static str {
        "swap-sides"
    }

    fn apply(
        &self,
        _rng: &mut dyn RngCore,
        eq: &Equation,
        _registry: &Registry,
    ) -> Option<Equation> {
        if eq.lhs == eq.rhs {
            return None;
        }
        Some(eq.swapped())
    }
}

/// Replace one symbol with a different pool symbol. Deliberately
/// truth-breaking; this is where speculative candidates come from.
pub struct SymbolSwap;

impl RewriteRule for SymbolSwap {
    fn name(&self) -> &'static str {
        "symbol-swap"
    }

    fn apply(
        &self,
        rng: &mut dyn RngCore,
        eq: &Equation,
        registry: &Registry,
    ) -> Option<Equation> {
        let present: Vec<String> = eq.symbols().into_iter().collect();
        let target = present.choose(rng)?.clone();
        let replacements: Vec<&String> = registry
            .pool_symbols()
            .iter()
            .filter(|s| **s != target)
            .collect();
        let replacement = replacements.choose(rng)?;
        Some(eq.substitute(&target, &Expr::sym((*replacement).clone())))
    }
}

/// Nudge one numeric literal by one. Truth-breaking on purpose.
pub struct PerturbCoefficient;

impl RewriteRule for PerturbCoefficient {
    fn name(&self) -> &'static str {
        "perturb-coefficient"
    }

    fn apply(
        &self,
        rng: &mut dyn RngCore,
        eq: &Equation,
        _registry: &Registry,
    ) -> Option<Equation> {
        let total = count_literals(&eq.lhs) + count_literals(&eq.rhs);
        if total == 0 {
            return None;
        }
        let target = rng.gen_range(0..total);
        let mut seen = 0;
        let lhs = perturb_literal(&eq.lhs, target, &mut seen);
        let rhs = perturb_literal(&eq.rhs, target, &mut seen);
        Some(Equation::new(lhs, rhs))
    }
}

/// Raise one bounded integer exponent by one. Truth-breaking on purpose.
pub struct ExponentBump;

impl RewriteRule for ExponentBump {
    fn name(&self) -> &'static str {
        "exponent-bump"
    }

    fn apply(
        &self,
        _rng: &mut dyn RngCore,
        eq: &Equation,
        _registry: &Registry,
    ) -> Option<Equation> {
        let mut bumped = false;
        let lhs = bump_exponent(&eq.lhs, &mut bumped);
        let rhs = if bumped {
            eq.rhs.clone()
        } else {
            bump_exponent(&eq.rhs, &mut bumped)
        };
        bumped.then(|| Equation::new(lhs, rhs))
    }
}

fn count_literals(expr: &Expr) -> usize {
    match expr {
        Expr::Num(_) => 1,
        Expr::Sym(_) => 0,
        Expr::Neg(inner) => count_literals(inner),
        Expr::Add(a, b) | Expr::Sub(a, b) | Expr::Mul(a, b) | Expr::Div(a, b) => {
            count_literals(a) + count_literals(b)
        }
        // Exponents belong to ExponentBump, not coefficient perturbation
        Expr::Pow(base, _) => count_literals(base),
    }
}

fn perturb_literal(expr: &Expr, target: usize, seen: &mut usize) -> Expr {
    match expr {
        Expr::Num(value) => {
            let index = *seen;
            *seen += 1;
            if index == target {
                match value.checked_add(&Rational::ONE) {
                    Ok(bumped) => Expr::Num(bumped),
                    Err(_) => expr.clone(),
                }
            } else {
                expr.clone()
            }
        }
        Expr::Sym(_) => expr.clone(),
        Expr::Neg(inner) => Expr::Neg(Box::new(perturb_literal(inner, target, seen))),
        Expr::Add(a, b) => Expr::add(
            perturb_literal(a, target, seen),
            perturb_literal(b, target, seen),
        ),
        Expr::Sub(a, b) => Expr::sub(
            perturb_literal(a, target, seen),
            perturb_literal(b, target, seen),
        ),
        Expr::Mul(a, b) => Expr::mul(
            perturb_literal(a, target, seen),
            perturb_literal(b, target, seen),
        ),
        Expr::Div(a, b) => Expr::div(
            perturb_literal(a, target, seen),
            perturb_literal(b, target, seen),
        ),
        Expr::Pow(base, exponent) => Expr::pow(
            perturb_literal(base, target, seen),
            (**exponent).clone(),
        ),
    }
}

fn bump_exponent(expr: &Expr, bumped: &mut bool) -> Expr {
    if *bumped {
        return expr.clone();
    }
    match expr {
        Expr::Pow(base, exponent) => {
            if let Some(value) = exponent.const_integer() {
                if value >= 0 && value < MAX_EXPONENT {
                    *bumped = true;
                    return Expr::pow((**base).clone(), Expr::num(value + 1));
                }
            }
            Expr::pow(bump_exponent(base, bumped), (**exponent).clone())
        }
        Expr::Num(_) | Expr::Sym(_) => expr.clone(),
        Expr::Neg(inner) => Expr::Neg(Box::new(bump_exponent(inner, bumped))),
        Expr::Add(a, b) => Expr::add(bump_exponent(a, bumped), bump_exponent(b, bumped)),
        Expr::Sub(a, b) => Expr::sub(bump_exponent(a, bumped), bump_exponent(b, bumped)),
        Expr::Mul(a, b) => Expr::mul(bump_exponent(a, bumped), bump_exponent(b, bumped)),
        Expr::Div(a, b) => Expr::div(bump_exponent(a, bumped), bump_exponent(b, bumped)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use noether_algebra::Parser;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn parse(input: &str) -> Equation {
        Parser::parse_equation(input).unwrap()
    }

    #[test]
    fn test_substitute_equivalence_hits_known_symbol() {
        let registry = Registry::standard();
        let mut rng = StdRng::seed_from_u64(1);
        let eq = parse("E = m * c^2");

        let rewritten = SubstituteEquivalence
            .apply(&mut rng, &eq, &registry)
            .unwrap();
        // Some equivalence applied; the equation changed shape
        assert_ne!(rewritten, eq);
    }

    #[test]
    fn test_substitute_equivalence_no_precondition() {
        let registry = Registry::standard();
        let mut rng = StdRng::seed_from_u64(1);
        // No symbol here has a registered equivalence
        let eq = parse("x + y = y + x");
        assert!(SubstituteEquivalence
            .apply(&mut rng, &eq, &registry)
            .is_none());
    }

    #[test]
    fn test_multiply_both_sides_preserves_identity() {
        let registry = Registry::standard();
        let mut rng = StdRng::seed_from_u64(2);
        let eq = parse("x * y = y * x");

        let rewritten = MultiplyBothSides.apply(&mut rng, &eq, &registry).unwrap();
        assert!(noether_algebra::is_identity(&rewritten).unwrap());
    }

    #[test]
    fn test_swap_sides() {
        let registry = Registry::standard();
        let mut rng = StdRng::seed_from_u64(3);
        let eq = parse("E = m * c^2");

        let rewritten = SwapSides.apply(&mut rng, &eq, &registry).unwrap();
        assert_eq!(rewritten.to_string(), "m * c^2 = E");

        // X = X has nothing to swap
        let eq = parse("x = x");
        assert!(SwapSides.apply(&mut rng, &eq, &registry).is_none());
    }

    #[test]
    fn test_symbol_swap_changes_a_symbol() {
        let registry = Registry::standard();
        let mut rng = StdRng::seed_from_u64(4);
        let eq = parse("x + 0 = x");

        let rewritten = SymbolSwap.apply(&mut rng, &eq, &registry).unwrap();
        assert_ne!(rewritten, eq);
    }

    #[test]
    fn test_perturb_coefficient_precondition() {
        let registry = Registry::standard();
        let mut rng = StdRng::seed_from_u64(5);

        // No literals to perturb
        let eq = parse("E = m * c");
        assert!(PerturbCoefficient.apply(&mut rng, &eq, &registry).is_none());

        let eq = parse("x + 0 = x");
        let rewritten = PerturbCoefficient
            .apply(&mut rng, &eq, &registry)
            .unwrap();
        assert_eq!(rewritten.to_string(), "x + 1 = x");
    }

    #[test]
    fn test_exponent_bump() {
        let registry = Registry::standard();
        let mut rng = StdRng::seed_from_u64(6);

        let eq = parse("E = m * c^2");
        let rewritten = ExponentBump.apply(&mut rng, &eq, &registry).unwrap();
        assert_eq!(rewritten.to_string(), "E = m * c^3");

        // Nothing to bump
        let eq = parse("p = m * v");
        assert!(ExponentBump.apply(&mut rng, &eq, &registry).is_none());
    }

    #[test]
    fn test_exponent_bump_respects_ceiling() {
        let registry = Registry::standard();
        let mut rng = StdRng::seed_from_u64(7);
        let eq = parse("x^8 = x^8");
        assert!(ExponentBump.apply(&mut rng, &eq, &registry).is_none());
    }

    #[test]
    fn test_rules_are_deterministic_given_seed() {
        let registry = Registry::standard();
        let eq = parse("E = m * c^2");

        let mut rng_a = StdRng::seed_from_u64(42);
        let mut rng_b = StdRng::seed_from_u64(42);
        let a = SymbolSwap.apply(&mut rng_a, &eq, &registry).unwrap();
        let b = SymbolSwap.apply(&mut rng_b, &eq, &registry).unwrap();
        assert_eq!(a, b);
    }
}
