//! Codec error types.

use thiserror::Error;

/// Errors raised while demodulating a bit string.
///
/// Positions are 0-based character offsets into the input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// A character other than `0` or `1`.
    #[error("invalid character {found:?} at bit {position}")]
    InvalidCharacter { position: usize, found: char },

    /// The input ended while more bits were required.
    #[error("truncated input at bit {position}: {needed} more bits required")]
    Truncated { position: usize, needed: usize },

    /// The unary length prefix ran to the end of the input.
    #[error("unterminated length prefix starting at bit {position}")]
    UnterminatedLength { position: usize },

    /// The magnitude does not fit in a signed 64-bit integer.
    #[error("integer at bit {position} does not fit in 64 bits")]
    Overflow { position: usize },

    /// Bits remained after a complete value was decoded.
    #[error("{count} trailing bits after the value ending at bit {position}")]
    TrailingBits { position: usize, count: usize },
}

/// Codec result type alias.
pub type CodecResult<T> = Result<T, CodecError>;
