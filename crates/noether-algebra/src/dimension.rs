//! Dimensional analysis
//!
//! Folds an expression tree into a single `DimensionVector`: products add
//! exponents, quotients subtract them, integer powers scale them, and the
//! operands of addition and subtraction must agree. Literals are
//! dimensionless. A fold failure means the expression cannot denote a
//! physical quantity.

use crate::ast::{Equation, Expr};
use crate::errors::{AlgebraError, AlgebraResult};
use noether_types::DimensionVector;

/// Fold an expression into its dimension
pub fn dimension_of<F>(expr: &Expr, lookup: &F) -> AlgebraResult<DimensionVector>
where
    F: Fn(&str) -> DimensionVector,
{
    match expr {
        Expr::Num(_) => Ok(DimensionVector::DIMENSIONLESS),
        Expr::Sym(name) => Ok(lookup(name)),
        Expr::Neg(inner) => dimension_of(inner, lookup),
        Expr::Add(a, b) | Expr::Sub(a, b) => {
            let da = dimension_of(a, lookup)?;
            let db = dimension_of(b, lookup)?;
            if da != db {
                return Err(AlgebraError::Inhomogeneous(format!(
                    "cannot add {} to {}",
                    da, db
                )));
            }
            Ok(da)
        }
        Expr::Mul(a, b) => {
            let da = dimension_of(a, lookup)?;
            let db = dimension_of(b, lookup)?;
            Ok(da.add(&db))
        }
        Expr::Div(a, b) => {
            let da = dimension_of(a, lookup)?;
            let db = dimension_of(b, lookup)?;
            Ok(da.sub(&db))
        }
        Expr::Pow(base, exponent) => {
            let db = dimension_of(base, lookup)?;
            let k = exponent
                .const_integer()
                .or_else(|| {
                    crate::poly::RationalFn::from_expr(exponent)
                        .ok()
                        .and_then(|rf| rf.as_integer_constant())
                })
                .ok_or(AlgebraError::UnsupportedExponent)?;
            let k = i32::try_from(k).map_err(|_| AlgebraError::UnsupportedExponent)?;
            Ok(db.scale(k))
        }
    }
}

/// Check that both sides of an equation fold to the same dimension
pub fn check_homogeneous<F>(equation: &Equation, lookup: &F) -> AlgebraResult<DimensionVector>
where
    F: Fn(&str) -> DimensionVector,
{
    let lhs = dimension_of(&equation.lhs, lookup)?;
    let rhs = dimension_of(&equation.rhs, lookup)?;
    if lhs != rhs {
        return Err(AlgebraError::Inhomogeneous(format!(
            "left side is {}, right side is {}",
            lhs, rhs
        )));
    }
    Ok(lhs)
}
