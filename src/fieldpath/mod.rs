//! Field path module - Represents and manages field paths in nested structures.
//!
//! Paths identify individual fields; sets of paths record what a manager owns.

mod parse;
mod path;
mod set;

pub use parse::*;
pub use path::*;
pub use set::*;
