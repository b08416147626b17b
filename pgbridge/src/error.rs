//! `pgbridge` error types.
use std::{fmt, io};

use crate::postgres::{PgFormat, SqlType};

/// A specialized [`Result`] type for `pgbridge` operation.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// All possible error from `pgbridge` library.
pub enum Error {
    /// A message failed to build; nothing was handed to the writer.
    Encode(EncodeError),
    /// The boundary writer failed.
    ///
    /// Propagated unchanged and never retried here; the producer must abort
    /// the remainder of the result-set transmission.
    Io(io::Error),
}

macro_rules! from {
    (<$ty:ty>$pat:pat => $body:expr) => {
        impl From<$ty> for Error {
            fn from($pat: $ty) -> Self {
                $body
            }
        }
    };
}

from!(<EncodeError>e => Error::Encode(e));
from!(<io::Error>e => Error::Io(e));

impl std::error::Error for Error { }

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Encode(e) => e.fmt(f),
            Self::Io(e) => e.fmt(f),
        }
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{self}\"")
    }
}

/// An error when building an outbound message.
///
/// Every variant is detected before any byte is emitted for the offending
/// message.
pub enum EncodeError {
    /// Declared type has no entry in the [`TypeMap`][crate::TypeMap].
    UnknownType(SqlType),
    /// No encoding rule for the declared type in the requested format.
    UnsupportedType {
        ty: SqlType,
        format: PgFormat,
    },
    /// Value tag disagrees with the column's declared type.
    TypeMismatch {
        value: &'static str,
        ty: SqlType,
    },
    /// Row value count disagrees with the column count.
    ArityMismatch {
        values: usize,
        columns: usize,
    },
    /// Message body length out of range for the protocol.
    MessageSize(usize),
}

impl std::error::Error for EncodeError { }

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("failed to encode message, ")?;
        match self {
            Self::UnknownType(ty) => write!(f, "no oid mapping for {}", ty.name()),
            Self::UnsupportedType { ty, format } => {
                write!(f, "{} has no {format:?} format encoding", ty.name())
            },
            Self::TypeMismatch { value, ty } => {
                write!(f, "{value} value for a {} column", ty.name())
            },
            Self::ArityMismatch { values, columns } => {
                write!(f, "row of {values} values for {columns} columns")
            },
            Self::MessageSize(size) => write!(f, "message size out of range: {size}"),
        }
    }
}

impl fmt::Debug for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{self}\"")
    }
}
