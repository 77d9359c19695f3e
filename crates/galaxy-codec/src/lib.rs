//! Galaxy wire codec.
//!
//! Serializes [`Value`] trees to strings of `0`/`1` characters and back:
//!
//! ```text
//! nil        00
//! pair       11 <head> <tail>
//! number     01 (>= 0) | 10 (< 0), then 0 for zero, else
//!            <n ones> 0 <magnitude in 4n bits>
//! ```
//!
//! [`Value`]: galaxy_types::Value

mod demodulate;
mod error;
mod modulate;

pub use demodulate::{demodulate, Demodulator};
pub use error::{CodecError, CodecResult};
pub use modulate::{modulate, Modulator};
