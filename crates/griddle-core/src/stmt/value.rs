use super::Type;
use crate::{DecodeError, Error, Result};

use chrono::{DateTime, Utc};

/// A typed value flowing between records, expressions, and the driver.
#[derive(Debug, Default, Clone, PartialEq)]
pub enum Value {
    /// Null value
    #[default]
    Null,

    /// Boolean value
    Bool(bool),

    /// Signed 8-bit integer
    I8(i8),

    /// Signed 16-bit integer
    I16(i16),

    /// Signed 32-bit integer
    I32(i32),

    /// Signed 64-bit integer
    I64(i64),

    /// Unsigned 8-bit integer
    U8(u8),

    /// Unsigned 16-bit integer
    U16(u16),

    /// Unsigned 32-bit integer
    U32(u32),

    /// Unsigned 64-bit integer
    U64(u64),

    /// 32-bit floating point
    F32(f32),

    /// 64-bit floating point
    F64(f64),

    /// String value
    Text(String),

    /// An array of bytes
    Bytes(Vec<u8>),

    /// An instant in time, stored as UTC
    Date(DateTime<Utc>),

    /// 128-bit universally unique identifier (UUID)
    Uuid(uuid::Uuid),
}

impl Value {
    pub const fn null() -> Self {
        Self::Null
    }

    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// The [`Type`] of this value, or `None` for `Null`.
    pub fn ty(&self) -> Option<Type> {
        Some(match self {
            Self::Null => return None,
            Self::Bool(_) => Type::Bool,
            Self::I8(_) => Type::I8,
            Self::I16(_) => Type::I16,
            Self::I32(_) => Type::I32,
            Self::I64(_) => Type::I64,
            Self::U8(_) => Type::U8,
            Self::U16(_) => Type::U16,
            Self::U32(_) => Type::U32,
            Self::U64(_) => Type::U64,
            Self::F32(_) => Type::F32,
            Self::F64(_) => Type::F64,
            Self::Text(_) => Type::Text,
            Self::Bytes(_) => Type::Bytes,
            Self::Date(_) => Type::Date,
            Self::Uuid(_) => Type::Uuid,
        })
    }

    /// Short name of the variant, used in decode error messages.
    pub fn variant_name(&self) -> &'static str {
        match self {
            Self::Null => "Null",
            Self::Bool(_) => "Bool",
            Self::I8(_) => "I8",
            Self::I16(_) => "I16",
            Self::I32(_) => "I32",
            Self::I64(_) => "I64",
            Self::U8(_) => "U8",
            Self::U16(_) => "U16",
            Self::U32(_) => "U32",
            Self::U64(_) => "U64",
            Self::F32(_) => "F32",
            Self::F64(_) => "F64",
            Self::Text(_) => "Text",
            Self::Bytes(_) => "Bytes",
            Self::Date(_) => "Date",
            Self::Uuid(_) => "Uuid",
        }
    }
}

fn mismatch<T>(expected: Type, value: &Value) -> Result<T> {
    Err(Error::decode(DecodeError::TypeMismatch {
        expected,
        actual: value.variant_name(),
    }))
}

macro_rules! impl_value_conversions {
    ( $( $variant:ident => $ty:ty ),* $(,)? ) => {
        $(
            impl From<$ty> for Value {
                fn from(src: $ty) -> Self {
                    Self::$variant(src)
                }
            }

            impl TryFrom<Value> for $ty {
                type Error = Error;

                fn try_from(value: Value) -> Result<Self> {
                    match value {
                        Value::$variant(v) => Ok(v),
                        other => mismatch(Type::$variant, &other),
                    }
                }
            }
        )*
    };
}

impl_value_conversions! {
    Bool => bool,
    I8 => i8,
    I16 => i16,
    I32 => i32,
    I64 => i64,
    U8 => u8,
    U16 => u16,
    U32 => u32,
    U64 => u64,
    F32 => f32,
    F64 => f64,
    Text => String,
    Bytes => Vec<u8>,
    Date => DateTime<Utc>,
    Uuid => uuid::Uuid,
}

impl From<&str> for Value {
    fn from(src: &str) -> Self {
        Self::Text(src.to_owned())
    }
}

impl From<&[u8]> for Value {
    fn from(src: &[u8]) -> Self {
        Self::Bytes(src.to_vec())
    }
}

impl<T> From<Option<T>> for Value
where
    T: Into<Value>,
{
    fn from(src: Option<T>) -> Self {
        match src {
            Some(v) => v.into(),
            None => Self::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_is_default() {
        assert!(Value::default().is_null());
        assert_eq!(Value::default().ty(), None);
    }

    #[test]
    fn conversion_round_trip() {
        let v: Value = 42i64.into();
        assert_eq!(v.ty(), Some(Type::I64));
        assert_eq!(i64::try_from(v).unwrap(), 42);
    }

    #[test]
    fn conversion_mismatch() {
        let v: Value = "hello".into();
        let err = i64::try_from(v).unwrap_err();
        assert_eq!(err.to_string(), "cannot decode Text column as I64");
    }

    #[test]
    fn option_lifts_to_null() {
        let v: Value = Option::<i32>::None.into();
        assert!(v.is_null());
    }
}
