use griddle_core::stmt::{Type, Value};
use griddle_core::{DecodeError, EncodeError, Error, Result};

use chrono::{DateTime, Utc};
use rusqlite::types::Value as SqlValue;

/// Encode a Griddle value for binding.
///
/// SQLite has no native UUID or datetime storage, so both use the textual
/// fallback: hyphenated UUIDs and RFC 3339 timestamps. `u64` values beyond
/// the signed 64-bit range cannot be represented.
pub(crate) fn to_sql(value: &Value) -> Result<SqlValue> {
    Ok(match value {
        Value::Null => SqlValue::Null,
        Value::Bool(v) => SqlValue::Integer(*v as i64),
        Value::I8(v) => SqlValue::Integer(*v as i64),
        Value::I16(v) => SqlValue::Integer(*v as i64),
        Value::I32(v) => SqlValue::Integer(*v as i64),
        Value::I64(v) => SqlValue::Integer(*v),
        Value::U8(v) => SqlValue::Integer(*v as i64),
        Value::U16(v) => SqlValue::Integer(*v as i64),
        Value::U32(v) => SqlValue::Integer(*v as i64),
        Value::U64(v) => match i64::try_from(*v) {
            Ok(v) => SqlValue::Integer(v),
            Err(_) => {
                return Err(Error::encode(EncodeError::OutOfRange {
                    value: v.to_string(),
                }))
            }
        },
        Value::F32(v) => SqlValue::Real(*v as f64),
        Value::F64(v) => SqlValue::Real(*v),
        Value::Text(v) => SqlValue::Text(v.clone()),
        Value::Bytes(v) => SqlValue::Blob(v.clone()),
        Value::Date(v) => SqlValue::Text(v.to_rfc3339()),
        Value::Uuid(v) => SqlValue::Text(v.hyphenated().to_string()),
    })
}

/// Decode a SQLite value into the expected Griddle type.
pub(crate) fn from_sql(value: &SqlValue, ty: Type) -> Result<Value> {
    if matches!(value, SqlValue::Null) {
        return Ok(Value::Null);
    }

    match ty {
        Type::Bool => match value {
            SqlValue::Integer(v) => Ok(Value::Bool(*v != 0)),
            other => Err(mismatch(ty, other)),
        },
        Type::I8 => integer(value, ty, |v| i8::try_from(v).ok().map(Value::I8)),
        Type::I16 => integer(value, ty, |v| i16::try_from(v).ok().map(Value::I16)),
        Type::I32 => integer(value, ty, |v| i32::try_from(v).ok().map(Value::I32)),
        Type::I64 => integer(value, ty, |v| Some(Value::I64(v))),
        Type::U8 => integer(value, ty, |v| u8::try_from(v).ok().map(Value::U8)),
        Type::U16 => integer(value, ty, |v| u16::try_from(v).ok().map(Value::U16)),
        Type::U32 => integer(value, ty, |v| u32::try_from(v).ok().map(Value::U32)),
        Type::U64 => integer(value, ty, |v| u64::try_from(v).ok().map(Value::U64)),
        Type::F32 => match value {
            SqlValue::Real(v) => Ok(Value::F32(*v as f32)),
            SqlValue::Integer(v) => Ok(Value::F32(*v as f32)),
            other => Err(mismatch(ty, other)),
        },
        Type::F64 => match value {
            SqlValue::Real(v) => Ok(Value::F64(*v)),
            SqlValue::Integer(v) => Ok(Value::F64(*v as f64)),
            other => Err(mismatch(ty, other)),
        },
        Type::Text => match value {
            SqlValue::Text(v) => Ok(Value::Text(v.clone())),
            other => Err(mismatch(ty, other)),
        },
        Type::Bytes => match value {
            SqlValue::Blob(v) => Ok(Value::Bytes(v.clone())),
            other => Err(mismatch(ty, other)),
        },
        Type::Date => match value {
            SqlValue::Text(v) => DateTime::parse_from_rfc3339(v)
                .map(|parsed| Value::Date(parsed.with_timezone(&Utc)))
                .map_err(|_| mismatch(ty, value)),
            other => Err(mismatch(ty, other)),
        },
        Type::Uuid => match value {
            SqlValue::Text(v) => uuid::Uuid::parse_str(v)
                .map(Value::Uuid)
                .map_err(|_| mismatch(ty, value)),
            other => Err(mismatch(ty, other)),
        },
    }
}

fn integer(
    value: &SqlValue,
    ty: Type,
    convert: impl FnOnce(i64) -> Option<Value>,
) -> Result<Value> {
    match value {
        SqlValue::Integer(v) => convert(*v).ok_or_else(|| mismatch(ty, value)),
        other => Err(mismatch(ty, other)),
    }
}

fn mismatch(expected: Type, actual: &SqlValue) -> Error {
    let actual = match actual {
        SqlValue::Null => "Null",
        SqlValue::Integer(_) => "Integer",
        SqlValue::Real(_) => "Real",
        SqlValue::Text(_) => "Text",
        SqlValue::Blob(_) => "Blob",
    };
    Error::decode(DecodeError::TypeMismatch { expected, actual })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn round_trip(value: Value, ty: Type) {
        let encoded = to_sql(&value).unwrap();
        let decoded = from_sql(&encoded, ty).unwrap();
        assert_eq!(decoded, value);
    }

    #[test]
    fn u64_out_of_range_rejected() {
        let err = to_sql(&Value::U64(u64::MAX)).unwrap_err();
        assert!(err.to_string().contains("cannot be represented"));
    }

    #[test]
    fn null_round_trips_for_every_type() {
        for ty in [Type::Bool, Type::I64, Type::Text, Type::Bytes, Type::Date, Type::Uuid] {
            assert_eq!(from_sql(&SqlValue::Null, ty).unwrap(), Value::Null);
        }
    }

    #[test]
    fn storage_class_mismatch() {
        let err = from_sql(&SqlValue::Text("x".into()), Type::I64).unwrap_err();
        assert_eq!(err.to_string(), "cannot decode Text column as I64");
    }

    proptest! {
        #[test]
        fn integers_round_trip(v in any::<i64>()) {
            round_trip(Value::I64(v), Type::I64);
        }

        #[test]
        fn small_integers_round_trip(v in any::<i16>()) {
            round_trip(Value::I16(v), Type::I16);
        }

        #[test]
        fn unsigned_round_trip(v in 0u64..=(i64::MAX as u64)) {
            round_trip(Value::U64(v), Type::U64);
        }

        #[test]
        fn text_round_trips(v in ".*") {
            round_trip(Value::Text(v), Type::Text);
        }

        #[test]
        fn bytes_round_trip(v in proptest::collection::vec(any::<u8>(), 0..256)) {
            round_trip(Value::Bytes(v), Type::Bytes);
        }

        #[test]
        fn bools_round_trip(v in any::<bool>()) {
            round_trip(Value::Bool(v), Type::Bool);
        }

        #[test]
        fn doubles_round_trip(v in any::<f64>().prop_filter("finite", |v| v.is_finite())) {
            round_trip(Value::F64(v), Type::F64);
        }

        #[test]
        fn dates_round_trip(micros in -62_135_596_800_000_000i64..253_402_300_799_000_000i64) {
            let date = DateTime::<Utc>::from_timestamp_micros(micros).unwrap();
            round_trip(Value::Date(date), Type::Date);
        }

        #[test]
        fn uuids_round_trip(bytes in any::<u128>()) {
            round_trip(Value::Uuid(uuid::Uuid::from_u128(bytes)), Type::Uuid);
        }
    }
}
