//! Physical dimension vectors
//!
//! A dimension vector records the exponents of a quantity over the five
//! base dimensions: length, mass, time, charge, temperature. The all-zero
//! vector is dimensionless.

use serde::{Deserialize, Serialize};

/// Number of base dimensions tracked per quantity
pub const BASE_DIMENSIONS: usize = 5;

/// Symbols used when rendering a dimension vector
const BASE_SYMBOLS: [&str; BASE_DIMENSIONS] = ["L", "M", "T", "Q", "Th"];

/// Exponents over the base physical dimensions
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DimensionVector {
    /// Exponents in base order: length, mass, time, charge, temperature
    pub exponents: [i32; BASE_DIMENSIONS],
}

impl DimensionVector {
    /// The dimensionless (all-zero) vector
    pub const DIMENSIONLESS: DimensionVector = DimensionVector {
        exponents: [0; BASE_DIMENSIONS],
    };

    /// Construct from explicit exponents
    pub fn new(length: i32, mass: i32, time: i32, charge: i32, temperature: i32) -> Self {
        Self {
            exponents: [length, mass, time, charge, temperature],
        }
    }

    /// Pure length dimension (L^1)
    pub fn length() -> Self {
        Self::new(1, 0, 0, 0, 0)
    }

    /// Pure mass dimension (M^1)
    pub fn mass() -> Self {
        Self::new(0, 1, 0, 0, 0)
    }

    /// Pure time dimension (T^1)
    pub fn time() -> Self {
        Self::new(0, 0, 1, 0, 0)
    }

    /// Velocity (L^1 T^-1)
    pub fn velocity() -> Self {
        Self::new(1, 0, -1, 0, 0)
    }

    /// Energy (M^1 L^2 T^-2)
    pub fn energy() -> Self {
        Self::new(2, 1, -2, 0, 0)
    }

    /// True when every exponent is zero
    pub fn is_dimensionless(&self) -> bool {
        self.exponents.iter().all(|&e| e == 0)
    }

    /// Component-wise sum (dimension of a product)
    pub fn add(&self, other: &DimensionVector) -> DimensionVector {
        let mut exponents = [0; BASE_DIMENSIONS];
        for (i, e) in exponents.iter_mut().enumerate() {
            *e = self.exponents[i] + other.exponents[i];
        }
        DimensionVector { exponents }
    }

    /// Component-wise difference (dimension of a quotient)
    pub fn sub(&self, other: &DimensionVector) -> DimensionVector {
        let mut exponents = [0; BASE_DIMENSIONS];
        for (i, e) in exponents.iter_mut().enumerate() {
            *e = self.exponents[i] - other.exponents[i];
        }
        DimensionVector { exponents }
    }

    /// Integer scaling (dimension of an integer power)
    pub fn scale(&self, factor: i32) -> DimensionVector {
        let mut exponents = [0; BASE_DIMENSIONS];
        for (i, e) in exponents.iter_mut().enumerate() {
            *e = self.exponents[i] * factor;
        }
        DimensionVector { exponents }
    }
}

impl std::fmt::Display for DimensionVector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_dimensionless() {
            return write!(f, "1");
        }
        let mut first = true;
        for (i, &e) in self.exponents.iter().enumerate() {
            if e == 0 {
                continue;
            }
            if !first {
                write!(f, "·")?;
            }
            if e == 1 {
                write!(f, "{}", BASE_SYMBOLS[i])?;
            } else {
                write!(f, "{}^{}", BASE_SYMBOLS[i], e)?;
            }
            first = false;
        }
        Ok(())
    }
}
