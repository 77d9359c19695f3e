//! Runtime error types for the Galaxy evaluator.

use galaxy_codec::CodecError;
use galaxy_types::StoreFull;
use thiserror::Error;

use crate::host::TransportError;

/// Evaluation error. Every variant aborts the enclosing evaluation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    /// A reference names nothing in the definition table.
    #[error("unbound name: {0}")]
    UnboundName(String),

    /// A primitive received an operand of the wrong shape.
    #[error("type mismatch: {0}")]
    TypeMismatch(String),

    /// `div` with a zero divisor.
    #[error("division by zero")]
    DivisionByZero,

    /// `pwr2` with a negative exponent.
    #[error("negative exponent: pwr2 {0}")]
    NegativeExponent(i64),

    /// `pwr2` result does not fit in a signed 64-bit integer.
    #[error("integer overflow: {0}")]
    Overflow(String),

    /// Something that cannot be applied sits in function position.
    #[error("stuck application: {0} cannot be applied")]
    StuckApplication(String),

    /// A term outside numbers, nil and pairs was asked for as a value.
    #[error("unsupported term shape: {0}")]
    UnsupportedShape(String),

    /// Forcing nested deeper than the evaluator allows.
    #[error("evaluation nested deeper than {0} levels")]
    DepthExceeded(usize),

    #[error(transparent)]
    StoreFull(#[from] StoreFull),

    /// `send` was evaluated without a transport installed.
    #[error("no transport configured for send")]
    NoTransport,

    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
}

/// Result alias for evaluator operations.
pub type EvalResult<T> = Result<T, EvalError>;
