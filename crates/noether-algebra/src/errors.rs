//! Algebra error types

/// Errors that can occur during tokenizing, parsing, or normalization
#[derive(Debug, thiserror::Error)]
pub enum AlgebraError {
    #[error("Parse error at column {col}: {message}")]
    ParseError { col: usize, message: String },

    #[error("Unexpected token: expected {expected}, found '{found}'")]
    UnexpectedToken { expected: String, found: String },

    #[error("Unexpected end of input: expected {0}")]
    UnexpectedEof(String),

    #[error("Statement has no top-level equality")]
    NotAnEquation,

    #[error("Division by zero during normalization")]
    DivisionByZero,

    #[error("Exponent is not a bounded integer constant")]
    UnsupportedExponent,

    #[error("Coefficient arithmetic overflowed")]
    Overflow,

    #[error("Expression exceeded the normalization term ceiling")]
    TooComplex,

    #[error("Dimensionally inhomogeneous: {0}")]
    Inhomogeneous(String),
}

/// Result type alias for algebra operations
pub type AlgebraResult<T> = Result<T, AlgebraError>;
