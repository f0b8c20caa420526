use std::fmt;

use serde::{Deserialize, Serialize};

/// A scalar after resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ScalarType {
    Bool,
    I32,
    U32,
    F32,
    F16,
}

impl ScalarType {
    fn name(&self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::I32 => "i32",
            Self::U32 => "u32",
            Self::F32 => "f32",
            Self::F16 => "f16",
        }
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "__{}", self.name())
    }
}

/// A resolved type, independent of any program's symbol table.
///
/// Struct types carry their name by spelling so an overlay can outlive the
/// builder that interned it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Type {
    Void,
    Scalar(ScalarType),
    Vector(ScalarType, u8),
    Struct(String),
}

impl Type {
    pub fn is_scalar(&self) -> bool {
        matches!(self, Self::Scalar(_))
    }

    pub fn is_numeric(&self) -> bool {
        match self {
            Self::Scalar(s) | Self::Vector(s, _) => !matches!(s, ScalarType::Bool),
            _ => false,
        }
    }

    /// The scalar element of a scalar or vector type.
    pub fn elem(&self) -> Option<ScalarType> {
        match self {
            Self::Scalar(s) | Self::Vector(s, _) => Some(*s),
            _ => None,
        }
    }
}

impl fmt::Display for Type {
    /// Mangled names as embedded in dumps, e.g. `__f32` and `__vec_3__f32`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Void => write!(f, "__void"),
            Self::Scalar(s) => write!(f, "{s}"),
            Self::Vector(s, n) => write!(f, "__vec_{n}{s}"),
            Self::Struct(name) => write!(f, "__struct_{name}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mangled_names() {
        assert_eq!(Type::Scalar(ScalarType::F32).to_string(), "__f32");
        assert_eq!(Type::Vector(ScalarType::F32, 3).to_string(), "__vec_3__f32");
        assert_eq!(Type::Struct("S".into()).to_string(), "__struct_S");
        assert_eq!(Type::Void.to_string(), "__void");
    }

    #[test]
    fn numeric_excludes_bool() {
        assert!(Type::Scalar(ScalarType::I32).is_numeric());
        assert!(Type::Vector(ScalarType::F16, 2).is_numeric());
        assert!(!Type::Scalar(ScalarType::Bool).is_numeric());
        assert!(!Type::Struct("S".into()).is_numeric());
    }
}
