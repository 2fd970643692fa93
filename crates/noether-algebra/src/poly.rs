//! Polynomial normal form
//!
//! Expressions normalize to a rational function: a pair of fully expanded
//! multivariate polynomials over `Rational` coefficients. Equality of two
//! expressions is decided by cross-multiplication, so no polynomial gcd is
//! ever needed. Monomials are `BTreeMap`-ordered, which makes rendering
//! deterministic and canonical.

use crate::ast::Expr;
use crate::errors::{AlgebraError, AlgebraResult};
use crate::rational::Rational;
use std::collections::BTreeMap;

/// Ceiling on the number of terms a polynomial may hold during expansion
pub const MAX_TERMS: usize = 256;

/// Ceiling on the magnitude of integer exponents
pub const MAX_EXPONENT: i128 = 8;

/// A product of symbol powers, e.g. `a^2·b`
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Monomial(BTreeMap<String, u32>);

impl Monomial {
    /// The empty (constant) monomial
    pub fn unit() -> Self {
        Self(BTreeMap::new())
    }

    pub fn symbol(name: impl Into<String>) -> Self {
        let mut powers = BTreeMap::new();
        powers.insert(name.into(), 1);
        Self(powers)
    }

    pub fn is_unit(&self) -> bool {
        self.0.is_empty()
    }

    /// Product of two monomials (exponents add)
    pub fn mul(&self, other: &Monomial) -> Monomial {
        let mut powers = self.0.clone();
        for (name, e) in &other.0 {
            *powers.entry(name.clone()).or_insert(0) += e;
        }
        Self(powers)
    }

    fn render(&self) -> String {
        self.0
            .iter()
            .map(|(name, e)| {
                if *e == 1 {
                    name.clone()
                } else {
                    format!("{}^{}", name, e)
                }
            })
            .collect::<Vec<_>>()
            .join("*")
    }
}

/// An expanded multivariate polynomial; zero coefficients are never stored
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Poly {
    terms: BTreeMap<Monomial, Rational>,
}

impl Poly {
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn constant(value: Rational) -> Self {
        let mut terms = BTreeMap::new();
        if !value.is_zero() {
            terms.insert(Monomial::unit(), value);
        }
        Self { terms }
    }

    pub fn one() -> Self {
        Self::constant(Rational::ONE)
    }

    pub fn symbol(name: impl Into<String>) -> Self {
        let mut terms = BTreeMap::new();
        terms.insert(Monomial::symbol(name), Rational::ONE);
        Self { terms }
    }

    pub fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn term_count(&self) -> usize {
        self.terms.len()
    }

    /// The value when the polynomial is a constant (or zero)
    pub fn as_constant(&self) -> Option<Rational> {
        if self.terms.len() > 1 {
            return None;
        }
        match self.terms.iter().next() {
            None => Some(Rational::ZERO),
            Some((monomial, coeff)) if monomial.is_unit() => Some(*coeff),
            Some(_) => None,
        }
    }

    pub fn checked_add(&self, other: &Poly) -> AlgebraResult<Poly> {
        let mut terms = self.terms.clone();
        for (monomial, coeff) in &other.terms {
            match terms.get(monomial) {
                Some(existing) => {
                    let sum = existing.checked_add(coeff)?;
                    if sum.is_zero() {
                        terms.remove(monomial);
                    } else {
                        terms.insert(monomial.clone(), sum);
                    }
                }
                None => {
                    terms.insert(monomial.clone(), *coeff);
                }
            }
        }
        if terms.len() > MAX_TERMS {
            return Err(AlgebraError::TooComplex);
        }
        Ok(Poly { terms })
    }

    pub fn checked_sub(&self, other: &Poly) -> AlgebraResult<Poly> {
        self.checked_add(&other.negated())
    }

    pub fn checked_mul(&self, other: &Poly) -> AlgebraResult<Poly> {
        let mut terms: BTreeMap<Monomial, Rational> = BTreeMap::new();
        for (m1, c1) in &self.terms {
            for (m2, c2) in &other.terms {
                let monomial = m1.mul(m2);
                let product = c1.checked_mul(c2)?;
                match terms.get(&monomial) {
                    Some(existing) => {
                        let sum = existing.checked_add(&product)?;
                        if sum.is_zero() {
                            terms.remove(&monomial);
                        } else {
                            terms.insert(monomial, sum);
                        }
                    }
                    None => {
                        if !product.is_zero() {
                            terms.insert(monomial, product);
                        }
                    }
                }
                if terms.len() > MAX_TERMS {
                    return Err(AlgebraError::TooComplex);
                }
            }
        }
        Ok(Poly { terms })
    }

    pub fn checked_pow(&self, exponent: u32) -> AlgebraResult<Poly> {
        let mut result = Poly::one();
        for _ in 0..exponent {
            result = result.checked_mul(self)?;
        }
        Ok(result)
    }

    pub fn negated(&self) -> Poly {
        let terms = self
            .terms
            .iter()
            .map(|(m, c)| (m.clone(), c.negated()))
            .collect();
        Poly { terms }
    }

    /// Multiply every coefficient by the rational `factor`
    fn scaled(&self, factor: Rational) -> AlgebraResult<Poly> {
        let mut terms = BTreeMap::new();
        for (monomial, coeff) in &self.terms {
            let scaled = coeff.checked_mul(&factor)?;
            if !scaled.is_zero() {
                terms.insert(monomial.clone(), scaled);
            }
        }
        Ok(Poly { terms })
    }

    /// Sign of the first stored coefficient; zero polynomials report
    /// non-negative
    fn leading_negative(&self) -> bool {
        self.terms
            .values()
            .next()
            .map(|c| c.is_negative())
            .unwrap_or(false)
    }

    fn denominator_lcm(&self) -> AlgebraResult<i128> {
        let mut lcm: i128 = 1;
        for coeff in self.terms.values() {
            let den = coeff.denominator();
            let g = gcd_i128(lcm, den);
            lcm = lcm.checked_mul(den / g).ok_or(AlgebraError::Overflow)?;
        }
        Ok(lcm)
    }

    fn numerator_content(&self, scale: i128) -> AlgebraResult<i128> {
        let mut content: i128 = 0;
        for coeff in self.terms.values() {
            let scaled = coeff
                .numerator()
                .checked_mul(scale / coeff.denominator())
                .ok_or(AlgebraError::Overflow)?;
            content = gcd_i128(content, scaled);
        }
        Ok(content)
    }

    fn render(&self) -> String {
        if self.terms.is_empty() {
            return "0".to_string();
        }
        let mut out = String::new();
        for (i, (monomial, coeff)) in self.terms.iter().enumerate() {
            let magnitude = if coeff.is_negative() {
                coeff.negated()
            } else {
                *coeff
            };
            if i == 0 {
                if coeff.is_negative() {
                    out.push('-');
                }
            } else if coeff.is_negative() {
                out.push_str(" - ");
            } else {
                out.push_str(" + ");
            }
            if monomial.is_unit() {
                out.push_str(&magnitude.to_string());
            } else if magnitude == Rational::ONE {
                out.push_str(&monomial.render());
            } else {
                out.push_str(&format!("{}*{}", magnitude, monomial.render()));
            }
        }
        out
    }
}

fn gcd_i128(a: i128, b: i128) -> i128 {
    let (mut a, mut b) = (a.abs(), b.abs());
    while b != 0 {
        let t = b;
        b = a % b;
        a = t;
    }
    a
}

/// A ratio of two expanded polynomials
#[derive(Clone, Debug)]
pub struct RationalFn {
    pub num: Poly,
    pub den: Poly,
}

impl RationalFn {
    /// Normalize an expression tree into a rational function
    pub fn from_expr(expr: &Expr) -> AlgebraResult<RationalFn> {
        match expr {
            Expr::Num(value) => Ok(RationalFn {
                num: Poly::constant(*value),
                den: Poly::one(),
            }),
            Expr::Sym(name) => Ok(RationalFn {
                num: Poly::symbol(name.clone()),
                den: Poly::one(),
            }),
            Expr::Neg(inner) => {
                let inner = Self::from_expr(inner)?;
                Ok(RationalFn {
                    num: inner.num.negated(),
                    den: inner.den,
                })
            }
            Expr::Add(a, b) => {
                let (a, b) = (Self::from_expr(a)?, Self::from_expr(b)?);
                Ok(RationalFn {
                    num: a
                        .num
                        .checked_mul(&b.den)?
                        .checked_add(&b.num.checked_mul(&a.den)?)?,
                    den: a.den.checked_mul(&b.den)?,
                })
            }
            Expr::Sub(a, b) => {
                let (a, b) = (Self::from_expr(a)?, Self::from_expr(b)?);
                Ok(RationalFn {
                    num: a
                        .num
                        .checked_mul(&b.den)?
                        .checked_sub(&b.num.checked_mul(&a.den)?)?,
                    den: a.den.checked_mul(&b.den)?,
                })
            }
            Expr::Mul(a, b) => {
                let (a, b) = (Self::from_expr(a)?, Self::from_expr(b)?);
                Ok(RationalFn {
                    num: a.num.checked_mul(&b.num)?,
                    den: a.den.checked_mul(&b.den)?,
                })
            }
            Expr::Div(a, b) => {
                let (a, b) = (Self::from_expr(a)?, Self::from_expr(b)?);
                if b.num.is_zero() {
                    return Err(AlgebraError::DivisionByZero);
                }
                Ok(RationalFn {
                    num: a.num.checked_mul(&b.den)?,
                    den: a.den.checked_mul(&b.num)?,
                })
            }
            Expr::Pow(base, exponent) => {
                let exponent = Self::from_expr(exponent)?
                    .as_integer_constant()
                    .ok_or(AlgebraError::UnsupportedExponent)?;
                if exponent.abs() > MAX_EXPONENT {
                    return Err(AlgebraError::UnsupportedExponent);
                }
                let base = Self::from_expr(base)?;
                let magnitude = exponent.unsigned_abs() as u32;
                if exponent >= 0 {
                    Ok(RationalFn {
                        num: base.num.checked_pow(magnitude)?,
                        den: base.den.checked_pow(magnitude)?,
                    })
                } else {
                    if base.num.is_zero() {
                        return Err(AlgebraError::DivisionByZero);
                    }
                    Ok(RationalFn {
                        num: base.den.checked_pow(magnitude)?,
                        den: base.num.checked_pow(magnitude)?,
                    })
                }
            }
        }
    }

    /// The value when the function reduces to a constant rational
    pub fn as_integer_constant(&self) -> Option<i128> {
        let num = self.num.as_constant()?;
        let den = self.den.as_constant()?;
        num.checked_div(&den).ok()?.as_integer()
    }
}

/// Canonical form of an equation
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CanonicalForm {
    /// Deterministic dedup key, e.g. `E = c^2*m`
    pub key: String,
    /// True when the two sides are already algebraically equal
    /// (`X = X` after expansion)
    pub trivial: bool,
}

/// Canonical form of `lhs = rhs`.
///
/// The equation is cross-multiplied into a pair of expanded polynomials,
/// jointly scaled to integer coefficients with unit content, sign-fixed,
/// and rendered with the lexicographically smaller side first. Scaling
/// both sides, swapping them, or moving a factor across the equality all
/// produce the same key; two statements that differ in substance never
/// share one.
pub fn canonical_equation(lhs: &RationalFn, rhs: &RationalFn) -> AlgebraResult<CanonicalForm> {
    let left = lhs.num.checked_mul(&rhs.den)?;
    let right = rhs.num.checked_mul(&lhs.den)?;
    let trivial = left.checked_sub(&right)?.is_zero();

    // Joint scale: one factor applied to both sides so that coefficients
    // are integers with unit content across the pair
    let scale = {
        let l = left.denominator_lcm()?;
        let r = right.denominator_lcm()?;
        let g = gcd_i128(l, r);
        l.checked_mul(r / g).ok_or(AlgebraError::Overflow)?
    };
    let content = gcd_i128(
        left.numerator_content(scale)?,
        right.numerator_content(scale)?,
    )
    .max(1);

    let leading_negative = if left.is_zero() {
        right.leading_negative()
    } else {
        left.leading_negative()
    };
    let sign: i128 = if leading_negative { -1 } else { 1 };
    let factor = Rational::new(sign.checked_mul(scale).ok_or(AlgebraError::Overflow)?, content)?;

    let left = left.scaled(factor)?.render();
    let right = right.scaled(factor)?.render();
    let key = if left <= right {
        format!("{} = {}", left, right)
    } else {
        format!("{} = {}", right, left)
    };
    Ok(CanonicalForm { key, trivial })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;

    fn canonical(input: &str) -> CanonicalForm {
        let eq = Parser::parse_equation(input).unwrap();
        let lhs = RationalFn::from_expr(&eq.lhs).unwrap();
        let rhs = RationalFn::from_expr(&eq.rhs).unwrap();
        canonical_equation(&lhs, &rhs).unwrap()
    }

    #[test]
    fn test_syntactic_identity_is_trivial() {
        assert!(canonical("x = x").trivial);
        assert_eq!(canonical("x = x").key, "x = x");
    }

    #[test]
    fn test_expansion_identity_is_trivial() {
        assert!(canonical("(a + b)^2 = a^2 + 2*a*b + b^2").trivial);
        assert!(canonical("x^2 - y^2 = (x - y) * (x + y)").trivial);
    }

    #[test]
    fn test_division_handled_by_cross_multiplication() {
        assert!(!canonical("m = E / c^2").trivial);
        assert!(canonical("(a^2 - b^2) / (a - b) = a + b").trivial);
    }

    #[test]
    fn test_canonical_key_shape() {
        assert_eq!(canonical("E = m * c^2").key, "E = c^2*m");
    }

    #[test]
    fn test_side_order_does_not_change_key() {
        assert_eq!(canonical("E = m * c^2").key, canonical("m * c^2 = E").key);
    }

    #[test]
    fn test_rearranged_forms_share_a_key() {
        assert_eq!(canonical("E = m * c^2").key, canonical("E / c^2 = m").key);
    }

    #[test]
    fn test_false_statement_is_not_trivial() {
        let form = canonical("x + 1 = x");
        assert!(!form.trivial);
        // Constant terms sort first in a rendered polynomial
        assert_eq!(form.key, "1 + x = x");
    }

    #[test]
    fn test_joint_scaling_shares_a_key() {
        // Doubling both sides is the same statement
        assert_eq!(canonical("2*E = 2*m*c^2").key, canonical("E = m * c^2").key);
        // Doubling one side is a different statement
        assert_ne!(canonical("E = 2*m*c^2").key, canonical("E = m * c^2").key);
    }

    #[test]
    fn test_negative_exponent() {
        assert!(!canonical("E * c^-2 = m").trivial);
        assert_eq!(canonical("E * c^-2 = m").key, canonical("E = m * c^2").key);
    }

    #[test]
    fn test_symbolic_exponent_rejected() {
        let eq = Parser::parse_equation("x^n = x * x^(n - 1)").unwrap();
        assert!(matches!(
            RationalFn::from_expr(&eq.lhs),
            Err(AlgebraError::UnsupportedExponent)
        ));
    }

    #[test]
    fn test_oversized_exponent_rejected() {
        let eq = Parser::parse_equation("x^50 = x^50").unwrap();
        assert!(RationalFn::from_expr(&eq.lhs).is_err());
    }

    #[test]
    fn test_division_by_zero_polynomial() {
        let eq = Parser::parse_equation("x / (a - a) = x").unwrap();
        assert!(matches!(
            RationalFn::from_expr(&eq.lhs),
            Err(AlgebraError::DivisionByZero)
        ));
    }

    #[test]
    fn test_as_integer_constant() {
        let expr = Parser::parse_expression_str("(2 + 4) / 2").unwrap();
        let rf = RationalFn::from_expr(&expr).unwrap();
        assert_eq!(rf.as_integer_constant(), Some(3));
    }
}
