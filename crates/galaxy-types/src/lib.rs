//! Shared types for the Galaxy evaluator.
//!
//! This crate defines the term arena, the primitive registry, the
//! wire-level [`Value`] tree, source spans and syntax errors used by every
//! other stage.

mod error;
mod primitive;
mod span;
pub mod term;
mod value;

pub use error::{ErrorCode, GalaxyError};
pub use primitive::Primitive;
pub use span::{SourceFile, Span};
pub use term::{AllocResult, StoreFull, Term, TermId, TermStore};
pub use value::Value;

/// Result type used by the loading stages (lexer, parser).
pub type Result<T> = std::result::Result<T, GalaxyError>;
