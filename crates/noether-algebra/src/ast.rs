//! Expression trees
//!
//! The AST is the unit the mutator rewrites and the dimensional fold
//! walks. Normalization into polynomial form lives in `poly`.

use crate::rational::Rational;
use std::collections::BTreeSet;

/// A parsed algebraic expression
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    /// Numeric literal
    Num(Rational),
    /// Symbol reference
    Sym(String),
    Add(Box<Expr>, Box<Expr>),
    Sub(Box<Expr>, Box<Expr>),
    Mul(Box<Expr>, Box<Expr>),
    Div(Box<Expr>, Box<Expr>),
    /// Exponentiation; the exponent must reduce to a bounded integer
    Pow(Box<Expr>, Box<Expr>),
    Neg(Box<Expr>),
}

impl Expr {
    pub fn num(value: i128) -> Expr {
        Expr::Num(Rational::from_integer(value))
    }

    pub fn sym(name: impl Into<String>) -> Expr {
        Expr::Sym(name.into())
    }

    pub fn add(lhs: Expr, rhs: Expr) -> Expr {
        Expr::Add(Box::new(lhs), Box::new(rhs))
    }

    pub fn sub(lhs: Expr, rhs: Expr) -> Expr {
        Expr::Sub(Box::new(lhs), Box::new(rhs))
    }

    pub fn mul(lhs: Expr, rhs: Expr) -> Expr {
        Expr::Mul(Box::new(lhs), Box::new(rhs))
    }

    pub fn div(lhs: Expr, rhs: Expr) -> Expr {
        Expr::Div(Box::new(lhs), Box::new(rhs))
    }

    pub fn pow(base: Expr, exponent: Expr) -> Expr {
        Expr::Pow(Box::new(base), Box::new(exponent))
    }

    /// Total node count, used by the complexity ceiling
    pub fn node_count(&self) -> usize {
        match self {
            Expr::Num(_) | Expr::Sym(_) => 1,
            Expr::Neg(inner) => 1 + inner.node_count(),
            Expr::Add(a, b)
            | Expr::Sub(a, b)
            | Expr::Mul(a, b)
            | Expr::Div(a, b)
            | Expr::Pow(a, b) => 1 + a.node_count() + b.node_count(),
        }
    }

    /// Every symbol referenced, in sorted order
    pub fn symbols(&self) -> BTreeSet<String> {
        let mut out = BTreeSet::new();
        self.collect_symbols(&mut out);
        out
    }

    fn collect_symbols(&self, out: &mut BTreeSet<String>) {
        match self {
            Expr::Num(_) => {}
            Expr::Sym(name) => {
                out.insert(name.clone());
            }
            Expr::Neg(inner) => inner.collect_symbols(out),
            Expr::Add(a, b)
            | Expr::Sub(a, b)
            | Expr::Mul(a, b)
            | Expr::Div(a, b)
            | Expr::Pow(a, b) => {
                a.collect_symbols(out);
                b.collect_symbols(out);
            }
        }
    }

    pub fn contains_symbol(&self, name: &str) -> bool {
        match self {
            Expr::Num(_) => false,
            Expr::Sym(sym) => sym == name,
            Expr::Neg(inner) => inner.contains_symbol(name),
            Expr::Add(a, b)
            | Expr::Sub(a, b)
            | Expr::Mul(a, b)
            | Expr::Div(a, b)
            | Expr::Pow(a, b) => a.contains_symbol(name) || b.contains_symbol(name),
        }
    }

    /// Replace every occurrence of `name` with `replacement`
    pub fn substitute(&self, name: &str, replacement: &Expr) -> Expr {
        match self {
            Expr::Num(_) => self.clone(),
            Expr::Sym(sym) => {
                if sym == name {
                    replacement.clone()
                } else {
                    self.clone()
                }
            }
            Expr::Neg(inner) => Expr::Neg(Box::new(inner.substitute(name, replacement))),
            Expr::Add(a, b) => Expr::add(
                a.substitute(name, replacement),
                b.substitute(name, replacement),
            ),
            Expr::Sub(a, b) => Expr::sub(
                a.substitute(name, replacement),
                b.substitute(name, replacement),
            ),
            Expr::Mul(a, b) => Expr::mul(
                a.substitute(name, replacement),
                b.substitute(name, replacement),
            ),
            Expr::Div(a, b) => Expr::div(
                a.substitute(name, replacement),
                b.substitute(name, replacement),
            ),
            Expr::Pow(a, b) => Expr::pow(
                a.substitute(name, replacement),
                b.substitute(name, replacement),
            ),
        }
    }

    /// The exponent value when this expression is a literal integer
    /// (optionally negated)
    pub fn const_integer(&self) -> Option<i128> {
        match self {
            Expr::Num(r) => r.as_integer(),
            Expr::Neg(inner) => inner.const_integer().map(|v| -v),
            _ => None,
        }
    }

    fn precedence(&self) -> u8 {
        match self {
            Expr::Add(..) | Expr::Sub(..) => 1,
            Expr::Mul(..) | Expr::Div(..) => 2,
            Expr::Neg(..) => 3,
            Expr::Pow(..) => 4,
            Expr::Num(_) | Expr::Sym(_) => 5,
        }
    }

    fn fmt_child(&self, child: &Expr, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if child.precedence() < self.precedence() {
            write!(f, "({})", child)
        } else {
            write!(f, "{}", child)
        }
    }
}

impl std::fmt::Display for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expr::Num(r) => write!(f, "{}", r),
            Expr::Sym(name) => write!(f, "{}", name),
            Expr::Neg(inner) => {
                write!(f, "-")?;
                self.fmt_child(inner, f)
            }
            Expr::Add(a, b) => {
                self.fmt_child(a, f)?;
                write!(f, " + ")?;
                self.fmt_child(b, f)
            }
            Expr::Sub(a, b) => {
                self.fmt_child(a, f)?;
                write!(f, " - ")?;
                // Right operand of a subtraction needs parens at equal
                // precedence: a - (b - c)
                if b.precedence() <= self.precedence() {
                    write!(f, "({})", b)
                } else {
                    write!(f, "{}", b)
                }
            }
            Expr::Mul(a, b) => {
                self.fmt_child(a, f)?;
                write!(f, " * ")?;
                self.fmt_child(b, f)
            }
            Expr::Div(a, b) => {
                self.fmt_child(a, f)?;
                write!(f, " / ")?;
                if b.precedence() <= self.precedence() {
                    write!(f, "({})", b)
                } else {
                    write!(f, "{}", b)
                }
            }
            Expr::Pow(a, b) => {
                if a.precedence() <= self.precedence() {
                    write!(f, "({})", a)?;
                } else {
                    write!(f, "{}", a)?;
                }
                write!(f, "^")?;
                self.fmt_child(b, f)
            }
        }
    }
}

/// An equation: two expressions around a top-level equality
#[derive(Clone, Debug, PartialEq)]
pub struct Equation {
    pub lhs: Expr,
    pub rhs: Expr,
}

impl Equation {
    pub fn new(lhs: Expr, rhs: Expr) -> Self {
        Self { lhs, rhs }
    }

    /// Combined node count of both sides
    pub fn node_count(&self) -> usize {
        self.lhs.node_count() + self.rhs.node_count()
    }

    /// Union of symbols on both sides
    pub fn symbols(&self) -> BTreeSet<String> {
        let mut out = self.lhs.symbols();
        out.extend(self.rhs.symbols());
        out
    }

    pub fn contains_symbol(&self, name: &str) -> bool {
        self.lhs.contains_symbol(name) || self.rhs.contains_symbol(name)
    }

    /// Substitute on both sides
    pub fn substitute(&self, name: &str, replacement: &Expr) -> Equation {
        Equation {
            lhs: self.lhs.substitute(name, replacement),
            rhs: self.rhs.substitute(name, replacement),
        }
    }

    /// Exchange the two sides
    pub fn swapped(&self) -> Equation {
        Equation {
            lhs: self.rhs.clone(),
            rhs: self.lhs.clone(),
        }
    }
}

impl std::fmt::Display for Equation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} = {}", self.lhs, self.rhs)
    }
}
