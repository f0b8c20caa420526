//! Target back-ends: walk a program plus its resolved-info overlay and emit
//! target output.
//!
//! Each writer is constructed over `(&Program, &Info)` and consumed by
//! `generate()`, which hands back the whole artifact or an [`error::Error`];
//! a failed run leaves nothing partial behind. The textual writers share the
//! [`text`] line sink and the [`names`] reserved-identifier sanitizer.

pub mod error;
pub mod hlsl;
pub mod names;
pub mod spirv;
pub mod text;
pub mod wgsl;

#[cfg(test)]
mod testing;

pub use error::{Error, Result};
pub use hlsl::HlslWriter;
pub use spirv::{SpirvModule, SpirvWriter};
pub use wgsl::WgslWriter;
