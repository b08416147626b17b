//! The value encoder: one typed scalar to its wire representation.
use bytes::{BufMut, Bytes, BytesMut};

use crate::{
    error::EncodeError,
    postgres::{PgFormat, SqlType},
    value::Value,
};

/// Encode one value for a column declared as `ty` in `format`.
///
/// Returns [`None`] for [`Value::Null`]; the message builders emit the
/// distinguished -1 length marker with no payload bytes, for either format.
///
/// Varchar columns coerce any non-null value to its canonical text form.
/// Every other declared type requires the matching [`Value`] tag and fails
/// with [`EncodeError::TypeMismatch`] otherwise.
pub fn encode(value: &Value, ty: SqlType, format: PgFormat) -> Result<Option<Bytes>, EncodeError> {
    use {PgFormat::*, SqlType::*};

    let bytes = match (ty, value, format) {
        (_, Value::Null, _) => return Ok(None),

        (Varchar, value, _) => text_form(value),

        (Integer, Value::Int(i), Text) => int_text(*i),
        (Integer, Value::Int(i), Binary) => Bytes::copy_from_slice(&i.to_be_bytes()),

        (Boolean, Value::Bool(b), Text) => bool_text(*b),
        (Boolean, Value::Bool(b), Binary) => Bytes::copy_from_slice(&[*b as u8]),

        (Blob, Value::Bytes(b), Text) => hex_escape(b),
        (Blob, Value::Bytes(b), Binary) => b.clone(),

        // timestamps arrive pre-rendered from the query layer and only have
        // a text rendering on the wire
        (Timestamp, Value::Text(s), Text) => s.clone().into_bytes(),
        (Timestamp, _, Binary) => return Err(EncodeError::UnsupportedType { ty, format }),

        (ty, value, _) => return Err(EncodeError::TypeMismatch { value: value.kind(), ty }),
    };

    Ok(Some(bytes))
}

/// Canonical text form of a non-null value, UTF-8, no terminator or quoting.
fn text_form(value: &Value) -> Bytes {
    match value {
        Value::Null => unreachable!("null is the -1 length marker, not a payload"),
        Value::Text(s) => s.clone().into_bytes(),
        Value::Int(i) => int_text(*i),
        Value::Bool(b) => bool_text(*b),
        Value::Bytes(b) => hex_escape(b),
    }
}

fn int_text(i: i64) -> Bytes {
    Bytes::copy_from_slice(itoa::Buffer::new().format(i).as_bytes())
}

/// Postgres boolean output literal.
fn bool_text(b: bool) -> Bytes {
    match b {
        true => Bytes::from_static(b"t"),
        false => Bytes::from_static(b"f"),
    }
}

/// Postgres `bytea` hex output format.
fn hex_escape(bytes: &[u8]) -> Bytes {
    const HEX: &[u8; 16] = b"0123456789abcdef";

    let mut buf = BytesMut::with_capacity(2 + bytes.len() * 2);
    buf.put_slice(b"\\x");
    for &b in bytes {
        buf.put_u8(HEX[(b >> 4) as usize]);
        buf.put_u8(HEX[(b & 0x0f) as usize]);
    }
    buf.freeze()
}

#[cfg(test)]
mod test {
    use super::*;

    fn ok(value: impl Into<Value>, ty: SqlType, format: PgFormat) -> Bytes {
        encode(&value.into(), ty, format).unwrap().unwrap()
    }

    #[test]
    fn text_format() {
        assert_eq!(ok(42i64, SqlType::Integer, PgFormat::Text), "42");
        assert_eq!(ok(-7i64, SqlType::Integer, PgFormat::Text), "-7");
        assert_eq!(ok(true, SqlType::Boolean, PgFormat::Text), "t");
        assert_eq!(ok(false, SqlType::Boolean, PgFormat::Text), "f");
        assert_eq!(ok("foo", SqlType::Varchar, PgFormat::Text), "foo");
        assert_eq!(ok(vec![0xde, 0xad, 0x01], SqlType::Blob, PgFormat::Text), "\\xdead01");
    }

    #[test]
    fn binary_format() {
        assert_eq!(
            ok(0x0102i64, SqlType::Integer, PgFormat::Binary),
            [0, 0, 0, 0, 0, 0, 1, 2].as_slice(),
        );
        assert_eq!(ok(true, SqlType::Boolean, PgFormat::Binary), [1].as_slice());
        assert_eq!(ok(false, SqlType::Boolean, PgFormat::Binary), [0].as_slice());
        // binary text is its utf8 bytes
        assert_eq!(ok("foo", SqlType::Varchar, PgFormat::Binary), "foo");
        assert_eq!(ok(vec![0xde, 0xad], SqlType::Blob, PgFormat::Binary), [0xde, 0xad].as_slice());
    }

    #[test]
    fn null_has_no_payload() {
        for ty in [SqlType::Varchar, SqlType::Integer, SqlType::Boolean, SqlType::Blob] {
            for format in [PgFormat::Text, PgFormat::Binary] {
                assert!(encode(&Value::Null, ty, format).unwrap().is_none());
            }
        }
    }

    #[test]
    fn varchar_coerces() {
        assert_eq!(ok(42i64, SqlType::Varchar, PgFormat::Text), "42");
        assert_eq!(ok(true, SqlType::Varchar, PgFormat::Text), "t");
        assert_eq!(ok(vec![0x0f], SqlType::Varchar, PgFormat::Text), "\\x0f");
        // binary varchar is still its text form
        assert_eq!(ok(42i64, SqlType::Varchar, PgFormat::Binary), "42");
    }

    #[test]
    fn type_mismatch() {
        let err = encode(&Value::Bool(true), SqlType::Integer, PgFormat::Text).unwrap_err();
        assert!(matches!(err, EncodeError::TypeMismatch { value: "bool", ty: SqlType::Integer }));

        let err = encode(&Value::Int(1), SqlType::Blob, PgFormat::Binary).unwrap_err();
        assert!(matches!(err, EncodeError::TypeMismatch { value: "int", .. }));
    }

    #[test]
    fn timestamp_is_text_only() {
        let rendered = Value::from("2024-05-01 12:30:00");
        assert_eq!(
            encode(&rendered, SqlType::Timestamp, PgFormat::Text).unwrap().unwrap(),
            "2024-05-01 12:30:00",
        );

        let err = encode(&rendered, SqlType::Timestamp, PgFormat::Binary).unwrap_err();
        assert!(matches!(
            err,
            EncodeError::UnsupportedType { ty: SqlType::Timestamp, format: PgFormat::Binary },
        ));
    }
}
