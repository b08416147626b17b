//! Backend (server to client) messages of the result-set response path.
//!
//! Every message is built atomically: a constructor validates and encodes
//! the whole message body first, so a failed build never leaves partial
//! bytes anywhere.
use bytes::{BufMut, Bytes, BytesMut};

use crate::{
    common::ByteStr,
    encode,
    error::EncodeError,
    ext::{BufMutExt, UsizeExt},
    postgres::{Oid, PgFormat, ProtocolEncode, TypeMap, write_body_len},
    row::{Column, Row},
};

/// One resolved field record of a [`RowDescription`] message.
#[derive(Clone, Debug)]
pub struct FieldDescription {
    /// The field name.
    pub name: ByteStr,
    /// If the field can be identified as a column of a specific table,
    /// the object ID of the table; otherwise zero.
    pub table_oid: i32,
    /// If the field can be identified as a column of a specific table,
    /// the attribute number of the column; otherwise zero.
    pub attribute_num: i16,
    /// The object ID of the field's data type.
    pub type_oid: Oid,
    /// The data type size (see `pg_type.typlen`).
    ///
    /// Note that negative values denote variable-width types.
    pub type_size: i16,
    /// The type modifier (see `pg_attribute.atttypmod`).
    ///
    /// The meaning of the modifier is type-specific.
    pub type_modifier: i32,
    /// The format code being used for the field.
    pub format: PgFormat,
}

/// Identifies the message as a row description.
///
/// Always precedes any [`DataRow`] of the same result set.
#[derive(Clone, Debug)]
pub struct RowDescription {
    fields: Vec<FieldDescription>,
}

impl RowDescription {
    pub const FORMAT: u8 = b'T';

    /// Resolve `columns` against `types` into a row-description message.
    ///
    /// Fails with [`EncodeError::UnknownType`] when a declared type has no
    /// entry in `types`.
    ///
    /// The effective format of a column defaults to text when `formats` is
    /// absent or shorter than `columns`.
    pub fn new(
        columns: &[Column],
        formats: Option<&[PgFormat]>,
        types: &TypeMap,
    ) -> Result<Self, EncodeError> {
        let mut fields = Vec::with_capacity(columns.len());

        for (idx, col) in columns.iter().enumerate() {
            let Some(info) = types.get(col.ty()) else {
                return Err(EncodeError::UnknownType(col.ty()));
            };

            fields.push(FieldDescription {
                name: col.name.clone(),
                table_oid: 0,
                attribute_num: 0,
                type_oid: info.oid,
                type_size: info.size,
                type_modifier: -1,
                format: PgFormat::effective(formats, idx),
            });
        }

        Ok(Self { fields })
    }

    pub fn fields(&self) -> &[FieldDescription] {
        &self.fields
    }
}

impl ProtocolEncode for RowDescription {
    fn encode(&self, buf: &mut BytesMut) -> Result<(), EncodeError> {
        let offset = buf.len();

        // Byte1('T') Identifies the message as a row description.
        buf.put_u8(Self::FORMAT);

        // Int32 Length of message contents in bytes, including self.
        // reserve 4 bytes for length
        buf.put_u32(0);

        // Int16 Specifies the number of fields in a row (can be zero).
        buf.put_u16(self.fields.len().to_u16());

        for field in &self.fields {
            // String The field name.
            buf.put_nul_string(&field.name);

            buf.put_i32(field.table_oid);
            buf.put_i16(field.attribute_num);
            buf.put_u32(field.type_oid);
            buf.put_i16(field.type_size);
            buf.put_i32(field.type_modifier);

            // Int16 The format code being used for the field.
            // Currently will be zero (text) or one (binary).
            buf.put_i16(field.format.code());
        }

        // write the length, excluding msg format
        write_body_len(&mut buf[offset + 1..])
    }
}

/// Identifies the message as a data row.
#[derive(Clone, Debug)]
pub struct DataRow {
    values: Vec<Option<Bytes>>,
}

impl DataRow {
    pub const FORMAT: u8 = b'D';

    /// Encode one `row` against its column list.
    ///
    /// Fails with [`EncodeError::ArityMismatch`] when the value count
    /// disagrees with the column count, before any value is encoded. Values
    /// are encoded with the same effective-format rule as
    /// [`RowDescription::new`].
    pub fn new(
        row: &Row,
        columns: &[Column],
        formats: Option<&[PgFormat]>,
    ) -> Result<Self, EncodeError> {
        if row.len() != columns.len() {
            return Err(EncodeError::ArityMismatch {
                values: row.len(),
                columns: columns.len(),
            });
        }

        let mut values = Vec::with_capacity(columns.len());

        for (idx, (value, col)) in row.values().iter().zip(columns).enumerate() {
            values.push(encode::encode(value, col.ty(), PgFormat::effective(formats, idx))?);
        }

        Ok(Self { values })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl ProtocolEncode for DataRow {
    fn encode(&self, buf: &mut BytesMut) -> Result<(), EncodeError> {
        let offset = buf.len();

        // Byte1('D') Identifies the message as a data row.
        buf.put_u8(Self::FORMAT);

        // Int32 Length of message contents in bytes, including self.
        // reserve 4 bytes for length
        buf.put_u32(0);

        // Int16 The number of column values that follow (possibly zero).
        buf.put_u16(self.values.len().to_u16());

        for value in &self.values {
            match value {
                // Int32 As a special case, -1 indicates a NULL column value.
                // No value bytes follow in the NULL case.
                None => buf.put_i32(-1),
                Some(bytes) => {
                    // Int32 The length of the column value, in bytes
                    // (this count does not include itself).
                    let Ok(len) = i32::try_from(bytes.len()) else {
                        return Err(EncodeError::MessageSize(bytes.len()));
                    };
                    buf.put_i32(len);

                    // Byte(n) The value of the column, in the format
                    // indicated by the associated format code.
                    buf.put_slice(bytes);
                },
            }
        }

        // write the length, excluding msg format
        write_body_len(&mut buf[offset + 1..])
    }
}

/// Identifies the message as a command-completed response.
#[derive(Clone, Debug)]
pub struct CommandComplete {
    /// The command tag. This is usually a single word that identifies which
    /// SQL command was completed.
    pub tag: ByteStr,
}

impl CommandComplete {
    pub const FORMAT: u8 = b'C';

    /// Completion of a result set of `rows` rows.
    pub fn select(rows: u64) -> Self {
        let mut tag = String::from("SELECT ");
        tag.push_str(itoa::Buffer::new().format(rows));
        Self { tag: tag.into() }
    }
}

impl ProtocolEncode for CommandComplete {
    fn encode(&self, buf: &mut BytesMut) -> Result<(), EncodeError> {
        let offset = buf.len();

        // Byte1('C') Identifies the message as a command-completed response.
        buf.put_u8(Self::FORMAT);

        // reserve 4 bytes for length
        buf.put_u32(0);

        // String The command tag.
        buf.put_nul_string(&self.tag);

        write_body_len(&mut buf[offset + 1..])
    }
}

/// Identifies the message as a response to an empty query string.
#[derive(Clone, Debug)]
pub struct EmptyQueryResponse;

impl EmptyQueryResponse {
    pub const FORMAT: u8 = b'I';
}

impl ProtocolEncode for EmptyQueryResponse {
    fn encode(&self, buf: &mut BytesMut) -> Result<(), EncodeError> {
        buf.put_u8(Self::FORMAT);
        buf.put_i32(4);
        Ok(())
    }
}

/// Identifies the message type.
///
/// ReadyForQuery is sent whenever the backend is ready for a new query cycle.
#[derive(Clone, Debug)]
pub struct ReadyForQuery {
    /// Current backend transaction status indicator.
    ///
    /// Possible values are `b'I'` if idle (not in a transaction block),
    /// `b'T'` if in a transaction block, or `b'E'` if in a failed
    /// transaction block.
    pub status: u8,
}

impl ReadyForQuery {
    pub const FORMAT: u8 = b'Z';

    pub const fn idle() -> Self {
        Self { status: b'I' }
    }
}

impl ProtocolEncode for ReadyForQuery {
    fn encode(&self, buf: &mut BytesMut) -> Result<(), EncodeError> {
        buf.put_u8(Self::FORMAT);
        buf.put_i32(5);
        buf.put_u8(self.status);
        Ok(())
    }
}
