/// Trait for attempting to view an enum as one specific variant's inner type.
pub trait TryAsRef<T> {
    /// Returns `Some` if the enum currently holds the requested variant.
    fn try_as_ref(&self) -> Option<&T>;
}

/// Mutable counterpart of [`TryAsRef`].
pub trait TryAsMut<T> {
    /// Returns `Some` if the enum currently holds the requested variant.
    fn try_as_mut(&mut self) -> Option<&mut T>;
}

/// Implements both [`TryAsRef`] and [`TryAsMut`] for each listed variant of
/// an enum.
#[macro_export]
macro_rules! impl_try_as {
    ($enum_type:ident, $($variant:ident($variant_type:ty)),* $(,)?) => {
        $(
            impl $crate::convert::TryAsRef<$variant_type> for $enum_type {
                fn try_as_ref(&self) -> Option<&$variant_type> {
                    match self {
                        $enum_type::$variant(val) => Some(val),
                        _ => None,
                    }
                }
            }

            impl $crate::convert::TryAsMut<$variant_type> for $enum_type {
                fn try_as_mut(&mut self) -> Option<&mut $variant_type> {
                    match self {
                        $enum_type::$variant(val) => Some(val),
                        _ => None,
                    }
                }
            }
        )*
    };
}
