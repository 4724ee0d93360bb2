use crate::{DecodeError, Error, Result};

use griddle_core::stmt::{Type, Value};

use chrono::{DateTime, Utc};

/// A Rust type that maps to a single SQL column.
pub trait Primitive: Sized + 'static {
    /// True when the type admits SQL NULL (`Option<T>`).
    const NULLABLE: bool = false;

    fn ty() -> Type;

    /// Decode a driver value into this type.
    fn load(value: Value) -> Result<Self>;

    /// Encode this value for binding.
    fn to_value(&self) -> Value;
}

macro_rules! impl_primitive {
    ( $( $ty:ty => $variant:ident ),* $(,)? ) => {
        $(
            impl Primitive for $ty {
                fn ty() -> Type {
                    Type::$variant
                }

                fn load(value: Value) -> Result<Self> {
                    if value.is_null() {
                        return Err(Error::decode(DecodeError::UnexpectedNull {
                            expected: Self::ty(),
                        }));
                    }
                    value.try_into()
                }

                fn to_value(&self) -> Value {
                    Value::$variant(self.clone())
                }
            }
        )*
    };
}

impl_primitive! {
    bool => Bool,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    f32 => F32,
    f64 => F64,
    String => Text,
    Vec<u8> => Bytes,
    DateTime<Utc> => Date,
    uuid::Uuid => Uuid,
}

impl<T: Primitive> Primitive for Option<T> {
    const NULLABLE: bool = true;

    fn ty() -> Type {
        T::ty()
    }

    fn load(value: Value) -> Result<Self> {
        if value.is_null() {
            Ok(None)
        } else {
            T::load(value).map(Some)
        }
    }

    fn to_value(&self) -> Value {
        match self {
            Some(value) => value.to_value(),
            None => Value::Null,
        }
    }
}
