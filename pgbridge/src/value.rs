//! The [`Value`] sum type.
use bytes::Bytes;

use crate::{common::ByteStr, ext::FmtExt};

/// A single typed scalar produced by the query layer.
///
/// A value carries no column identity of its own; it is interpreted relative
/// to the declared type of the column at the same position, see
/// [`encode`][crate::encode::encode].
#[derive(Clone, PartialEq)]
pub enum Value {
    Null,
    Text(ByteStr),
    Int(i64),
    Bool(bool),
    Bytes(Bytes),
}

impl Value {
    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Tag name, for error reporting.
    pub(crate) const fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Text(_) => "text",
            Value::Int(_) => "int",
            Value::Bool(_) => "bool",
            Value::Bytes(_) => "bytes",
        }
    }
}

macro_rules! from {
    (<$ty:ty>$pat:pat => $body:expr) => {
        impl From<$ty> for Value {
            fn from($pat: $ty) -> Self {
                $body
            }
        }
    };
}

from!(<&str>s => Value::Text(ByteStr::copy_from_str(s)));
from!(<String>s => Value::Text(s.into()));
from!(<ByteStr>s => Value::Text(s));
from!(<i64>i => Value::Int(i));
from!(<i32>i => Value::Int(i.into()));
from!(<i16>i => Value::Int(i.into()));
from!(<bool>b => Value::Bool(b));
from!(<Bytes>b => Value::Bytes(b));
from!(<Vec<u8>>b => Value::Bytes(b.into()));

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => value.into(),
            None => Value::Null,
        }
    }
}

impl std::fmt::Debug for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => f.write_str("NULL"),
            Value::Text(s) => std::fmt::Debug::fmt(s, f),
            Value::Int(i) => std::fmt::Debug::fmt(i, f),
            Value::Bool(b) => std::fmt::Debug::fmt(b, f),
            Value::Bytes(b) => std::fmt::Debug::fmt(&b.lossy(), f),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn from_impls() {
        assert_eq!(Value::from("foo"), Value::Text("foo".into()));
        assert_eq!(Value::from(42i64), Value::Int(42));
        assert_eq!(Value::from(42i32), Value::Int(42));
        assert_eq!(Value::from(true), Value::Bool(true));
        assert_eq!(Value::from(vec![0xde, 0xad]), Value::Bytes(Bytes::from_static(&[0xde, 0xad])));
        assert_eq!(Value::from(None::<i64>), Value::Null);
        assert_eq!(Value::from(Some(7i64)), Value::Int(7));
    }

    #[test]
    fn null() {
        assert!(Value::Null.is_null());
        assert!(!Value::Int(0).is_null());
    }
}
