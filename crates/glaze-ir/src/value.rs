use half::f16;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A lowered scalar: exactly one numeric kind, a boolean, or a reference to
/// a not-yet-computed temporary (an SSA-style virtual register).
///
/// The default value is in a distinguished empty state on which every `is_*`
/// query answers false. Accessors are defined only for the matching kind;
/// calling a mismatched accessor is a contract violation and panics instead
/// of reinterpreting bits.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Value {
    #[default]
    None,
    F32(f32),
    F16(f16),
    I32(i32),
    U32(u32),
    Bool(bool),
    Temp(u32),
}

impl Value {
    /// A reference to the virtual register with the given id.
    pub fn temp(id: u32) -> Self {
        Self::Temp(id)
    }

    pub fn is_f32(&self) -> bool {
        matches!(self, Self::F32(_))
    }

    pub fn is_f16(&self) -> bool {
        matches!(self, Self::F16(_))
    }

    pub fn is_i32(&self) -> bool {
        matches!(self, Self::I32(_))
    }

    pub fn is_u32(&self) -> bool {
        matches!(self, Self::U32(_))
    }

    pub fn is_bool(&self) -> bool {
        matches!(self, Self::Bool(_))
    }

    pub fn is_temp(&self) -> bool {
        matches!(self, Self::Temp(_))
    }

    pub fn as_f32(&self) -> f32 {
        match self {
            Self::F32(v) => *v,
            other => panic!("value is {}, not f32", other.kind_str()),
        }
    }

    pub fn as_f16(&self) -> f16 {
        match self {
            Self::F16(v) => *v,
            other => panic!("value is {}, not f16", other.kind_str()),
        }
    }

    pub fn as_i32(&self) -> i32 {
        match self {
            Self::I32(v) => *v,
            other => panic!("value is {}, not i32", other.kind_str()),
        }
    }

    pub fn as_u32(&self) -> u32 {
        match self {
            Self::U32(v) => *v,
            other => panic!("value is {}, not u32", other.kind_str()),
        }
    }

    pub fn as_bool(&self) -> bool {
        match self {
            Self::Bool(v) => *v,
            other => panic!("value is {}, not bool", other.kind_str()),
        }
    }

    pub fn as_temp(&self) -> u32 {
        match self {
            Self::Temp(v) => *v,
            other => panic!("value is {}, not a temporary", other.kind_str()),
        }
    }

    fn kind_str(&self) -> &'static str {
        match self {
            Self::None => "empty",
            Self::F32(_) => "f32",
            Self::F16(_) => "f16",
            Self::I32(_) => "i32",
            Self::U32(_) => "u32",
            Self::Bool(_) => "bool",
            Self::Temp(_) => "a temporary",
        }
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Self::F32(v)
    }
}

impl From<f16> for Value {
    fn from(v: f16) -> Self {
        Self::F16(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::I32(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Self::U32(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Floats keep six fractional digits; an f16 is formatted at its
            // reduced precision, not at the precision of the literal it came
            // from.
            Self::F32(v) => write!(f, "{v:.6}"),
            Self::F16(v) => write!(f, "{:.6}", f32::from(*v)),
            Self::I32(v) => write!(f, "{v}"),
            Self::U32(v) => write!(f, "{v}"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Temp(id) => write!(f, "%{id}"),
            Self::None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn f32() {
        let val = Value::from(1.2_f32);
        assert_eq!(val.as_f32(), 1.2);
        assert_eq!(val.to_string(), "1.200000");

        assert!(val.is_f32());
        assert!(!val.is_f16());
        assert!(!val.is_i32());
        assert!(!val.is_u32());
        assert!(!val.is_temp());
        assert!(!val.is_bool());
    }

    #[test]
    fn f16() {
        let val = Value::from(half::f16::from_f32(1.1));
        assert_eq!(val.as_f16(), half::f16::from_f32(1.1));
        // 1.1 is not representable at half precision.
        assert_eq!(val.to_string(), "1.099609");

        assert!(!val.is_f32());
        assert!(val.is_f16());
        assert!(!val.is_i32());
        assert!(!val.is_u32());
        assert!(!val.is_temp());
        assert!(!val.is_bool());
    }

    #[test]
    fn i32() {
        let val = Value::from(1_i32);
        assert_eq!(val.as_i32(), 1);
        assert_eq!(val.to_string(), "1");

        assert!(!val.is_f32());
        assert!(!val.is_f16());
        assert!(val.is_i32());
        assert!(!val.is_u32());
        assert!(!val.is_temp());
        assert!(!val.is_bool());
    }

    #[test]
    fn u32() {
        let val = Value::from(2_u32);
        assert_eq!(val.as_u32(), 2);
        assert_eq!(val.to_string(), "2");

        assert!(!val.is_f32());
        assert!(!val.is_f16());
        assert!(!val.is_i32());
        assert!(val.is_u32());
        assert!(!val.is_temp());
        assert!(!val.is_bool());
    }

    #[test]
    fn temp() {
        let val = Value::temp(4);
        assert_eq!(val.as_temp(), 4);
        assert_eq!(val.to_string(), "%4");

        assert!(!val.is_f32());
        assert!(!val.is_f16());
        assert!(!val.is_i32());
        assert!(!val.is_u32());
        assert!(val.is_temp());
        assert!(!val.is_bool());
    }

    #[test]
    fn bool() {
        let val = Value::from(false);
        assert!(!val.as_bool());
        assert_eq!(val.to_string(), "false");

        let val = Value::from(true);
        assert!(val.as_bool());
        assert_eq!(val.to_string(), "true");

        assert!(!val.is_f32());
        assert!(!val.is_f16());
        assert!(!val.is_i32());
        assert!(!val.is_u32());
        assert!(!val.is_temp());
        assert!(val.is_bool());
    }

    #[test]
    fn uninitialized() {
        let val = Value::default();

        assert!(!val.is_f32());
        assert!(!val.is_f16());
        assert!(!val.is_i32());
        assert!(!val.is_u32());
        assert!(!val.is_temp());
        assert!(!val.is_bool());
    }

    #[test]
    #[should_panic(expected = "not i32")]
    fn mismatched_accessor_panics() {
        Value::from(1.0_f32).as_i32();
    }
}
