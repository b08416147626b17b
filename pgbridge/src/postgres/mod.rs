//! Postgres backend protocol.
//!
//! Message layouts follow the [protocol message formats][1] reference.
//!
//! [1]: https://www.postgresql.org/docs/current/protocol-message-formats.html
pub mod backend;

mod pg_type;

pub use pg_type::{Oid, PgTypeInfo, SqlType, TypeMap};

use bytes::{BufMut, BytesMut};

use crate::error::EncodeError;

/// Per-column wire format.
///
/// The format code being used for a field, zero (text) or one (binary).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PgFormat {
    #[default]
    Text,
    Binary,
}

impl PgFormat {
    pub const fn code(self) -> i16 {
        match self {
            Self::Text => 0,
            Self::Binary => 1,
        }
    }

    /// Effective format for the column at `idx`.
    ///
    /// Defaults to text when `formats` is absent or shorter than the column
    /// list.
    pub fn effective(formats: Option<&[PgFormat]>, idx: usize) -> PgFormat {
        formats
            .and_then(|f| f.get(idx).copied())
            .unwrap_or(PgFormat::Text)
    }
}

/// Buffered protocol encoding.
///
/// The message writes itself into the provided `buf`.
pub trait ProtocolEncode {
    fn encode(&self, buf: &mut BytesMut) -> Result<(), EncodeError>;
}

/// Write the buffer length at the first 4 bytes.
///
/// Note to exclude the message format when writing postgres message length.
pub(crate) fn write_body_len(mut buf: &mut [u8]) -> Result<(), EncodeError> {
    let size = buf.len();
    let Ok(size) = i32::try_from(size) else {
        return Err(EncodeError::MessageSize(buf.len()));
    };

    buf.put_i32(size);

    Ok(())
}
