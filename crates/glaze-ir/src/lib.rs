//! Tagged scalar values used once expressions are lowered toward the
//! intermediate form consumed by the per-target emitters.

mod value;

pub use value::Value;

pub mod prelude {
    pub use crate::value::Value;
}
