//! Source positions carried by tree nodes.
//!
//! Spans survive every transform pass unchanged so that diagnostics keep
//! pointing at the original source text.

mod span;

pub use span::{Span, Spanned};
