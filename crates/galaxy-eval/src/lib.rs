//! Galaxy evaluator: reduces combinator terms to weak head normal form.
//!
//! Reduction is lazy (primitives receive their operands unevaluated and
//! force only what they need) and memoizing (every node remembers its
//! normal form). Side effects of `draw` and `send` go through the
//! [`Host`] collaborators.

pub mod env;
pub mod error;
pub mod evaluator;
pub mod host;
mod primitives;

pub use env::Definitions;
pub use error::{EvalError, EvalResult};
pub use evaluator::{EvalStats, Evaluator, MAX_DEPTH};
pub use host::{
    Color, Drawing, Host, Point, RecordingRenderer, Renderer, Transport, TransportError,
};
