//! Galaxy parser: converts equation tokens into terms in a [`TermStore`].
//!
//! [`TermStore`]: galaxy_types::TermStore

mod parse_equation;
mod parse_term;
mod parser;

pub use parse_equation::{parse_source, Equation, Program};
pub use parser::Parser;
