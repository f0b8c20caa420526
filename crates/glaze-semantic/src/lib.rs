//! Resolved semantic information layered over a [`glaze_tree`] program.
//!
//! The tree records only what was written; resolution results live here in a
//! side table keyed by node handle. The overlay is read-only for back-ends
//! and rewrite passes, and it never survives a program clone.

pub mod info;
pub mod ty;

pub mod prelude {
    pub use crate::info::{Info, Resolution, Resolved};
    pub use crate::ty::{ScalarType, Type};
}

pub use info::{Info, Resolution, Resolved};
pub use ty::{ScalarType, Type};
