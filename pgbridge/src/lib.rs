//! Outbound Postgres Wire-Protocol Encoding
//!
//! Serializes query results into the exact backend message framing the
//! postgres protocol specifies, for servers that emulate the protocol in
//! front of a different database engine. The session layer owns the
//! connection; this crate owns the bytes.
//!
//! # Examples
//!
//! Send a whole result set through a sink:
//!
//! ```
//! use pgbridge::{Column, IoSink, ResultSetWriter, Row, SqlType, Value};
//!
//! # fn app() -> pgbridge::Result<()> {
//! let columns = [Column::new("version", SqlType::Varchar)];
//! let rows = [Row::from(vec![Value::from("pgbridge v1.0")])];
//!
//! let mut out = ResultSetWriter::new(IoSink::new(Vec::new()));
//! out.send(&columns, rows, None)?;
//!
//! let bytes = out.into_inner().into_inner();
//! assert_eq!(bytes[0], b'T'); // RowDescription precedes every DataRow
//! # Ok(())
//! # }
//! # app().unwrap();
//! ```
//!
//! Stream rows one at a time as the query layer yields them:
//!
//! ```no_run
//! use pgbridge::{Column, IoSink, ResultSetWriter, Row, SqlType, Value};
//!
//! # fn app() -> pgbridge::Result<()> {
//! # let io: Vec<u8> = Vec::new();
//! let columns = [Column::new("id", SqlType::Integer)];
//! let mut out = ResultSetWriter::new(IoSink::new(io));
//!
//! out.send_description(&columns, None)?;
//! for id in 0..3 {
//!     out.send_row(&Row::from(vec![Value::Int(id)]), &columns, None)?;
//! }
//! out.finish(3)?;
//! # Ok(())
//! # }
//! ```

pub mod common;
mod ext;

// Protocol
pub mod postgres;

// Encoding
mod value;
pub mod encode;

// Component
pub mod row;

// Operation
pub mod writer;

mod error;

pub use common::ByteStr;
pub use postgres::{Oid, PgFormat, PgTypeInfo, SqlType, TypeMap};
pub use postgres::backend::{
    CommandComplete, DataRow, EmptyQueryResponse, ReadyForQuery, RowDescription,
};
pub use row::{Column, Row};
pub use value::Value;
pub use writer::{IoSink, MessageSink, ResultSetWriter};

pub use error::{EncodeError, Error, Result};
