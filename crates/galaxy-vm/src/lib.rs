//! Galaxy machine: orchestrates the whole pipeline.
//!
//! ```text
//! equations → Lexer → Parser → definition table → Evaluator ⇄ Codec ⇄ Transport
//!                                                     ↓
//!                                                  Renderer
//! ```
//!
//! [`Machine`] loads programs and evaluates named definitions;
//! [`interact`] runs one interaction to completion; [`Session`] threads the
//! protocol state between successive clicks.

pub mod config;
pub mod error;
pub mod interact;
pub mod machine;
pub mod session;

pub use config::SessionConfig;
pub use error::{VmError, VmResult};
pub use interact::{interact, Interaction};
pub use machine::{Evaluation, Machine, PRELUDE};
pub use session::{Session, Snapshot};
