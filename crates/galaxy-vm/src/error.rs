//! Errors surfaced by the machine and the interaction driver.

use galaxy_codec::CodecError;
use galaxy_eval::{EvalError, TransportError};
use galaxy_types::GalaxyError;
use thiserror::Error;

/// Failure of one load, evaluation, round or snapshot operation.
#[derive(Debug, Error)]
pub enum VmError {
    /// The program text did not parse.
    #[error("{0}")]
    Syntax(#[from] GalaxyError),

    #[error("evaluation failed: {0}")]
    Eval(#[from] EvalError),

    /// A response body was not a valid modulated value.
    #[error("malformed response: {0}")]
    Codec(#[from] CodecError),

    #[error("transport failed: {0}")]
    Transport(#[from] TransportError),

    /// The protocol returned something other than `(flag, state, data)`.
    #[error("protocol result is not (flag, state, data): {0}")]
    MalformedResult(String),

    /// A snapshot was taken against a different program.
    #[error("snapshot belongs to program {found}, but {expected} is loaded")]
    FingerprintMismatch { expected: String, found: String },

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl VmError {
    /// Lift an evaluator error, surfacing transport failures as their own
    /// variant.
    pub(crate) fn from_eval(err: EvalError) -> Self {
        match err {
            EvalError::Transport(err) => VmError::Transport(err),
            EvalError::Codec(err) => VmError::Codec(err),
            other => VmError::Eval(other),
        }
    }
}

/// Result alias for machine operations.
pub type VmResult<T> = Result<T, VmError>;
