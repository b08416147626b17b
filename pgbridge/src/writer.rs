//! The [`MessageSink`] boundary and result-set transmission.
use bytes::BytesMut;
use std::io::{self, Write};

use crate::{
    common::{debug, span, verbose},
    error::Result,
    postgres::{
        PgFormat, ProtocolEncode, TypeMap,
        backend::{CommandComplete, DataRow, RowDescription},
    },
    row::{Column, Row},
};

/// A synchronous sink for outbound backend messages.
///
/// The encoding layer treats the sink as an opaque, possibly blocking
/// boundary: an error is propagated unchanged and never retried here. After
/// a failure the producer must stop issuing messages for the result set.
pub trait MessageSink {
    /// Encode and write one message, returning the bytes written.
    fn write_message<M: ProtocolEncode>(&mut self, message: &M) -> Result<usize>;
}

impl<S: MessageSink> MessageSink for &mut S {
    fn write_message<M: ProtocolEncode>(&mut self, message: &M) -> Result<usize> {
        S::write_message(self, message)
    }
}

const DEFAULT_BUF_CAPACITY: usize = 1024;

/// [`MessageSink`] over a blocking [`io::Write`].
///
/// Each message is encoded into a scratch buffer first; a failed build hands
/// zero bytes to the underlying io.
#[derive(Debug)]
pub struct IoSink<W> {
    io: W,
    buf: BytesMut,
}

impl<W: Write> IoSink<W> {
    pub fn new(io: W) -> Self {
        Self {
            io,
            buf: BytesMut::with_capacity(DEFAULT_BUF_CAPACITY),
        }
    }

    pub fn get_ref(&self) -> &W {
        &self.io
    }

    /// Consume self into the underlying io.
    pub fn into_inner(self) -> W {
        self.io
    }

    /// Flush the underlying io.
    pub fn flush(&mut self) -> io::Result<()> {
        self.io.flush()
    }
}

impl<W: Write> MessageSink for IoSink<W> {
    fn write_message<M: ProtocolEncode>(&mut self, message: &M) -> Result<usize> {
        self.buf.clear();
        message.encode(&mut self.buf)?;
        self.io.write_all(&self.buf)?;
        verbose!("sent {} bytes", self.buf.len());
        Ok(self.buf.len())
    }
}

/// Transmits result sets in protocol order.
///
/// One [`RowDescription`], then one [`DataRow`] per row, then
/// [`CommandComplete`]. The first error aborts the remainder of the
/// transmission; it is up to the producer not to issue further rows for
/// that result set.
#[derive(Debug)]
pub struct ResultSetWriter<S> {
    sink: S,
    types: TypeMap,
}

impl<S: MessageSink> ResultSetWriter<S> {
    /// Writer with the [full fixed type table][TypeMap::new].
    pub fn new(sink: S) -> Self {
        Self::with_types(sink, TypeMap::new())
    }

    pub fn with_types(sink: S, types: TypeMap) -> Self {
        Self { sink, types }
    }

    /// Encode and send a whole result set, returning the row count.
    pub fn send<R>(
        &mut self,
        columns: &[Column],
        rows: R,
        formats: Option<&[PgFormat]>,
    ) -> Result<u64>
    where
        R: IntoIterator<Item = Row>,
    {
        span!("result_set");

        self.send_description(columns, formats)?;

        let mut count = 0u64;
        for row in rows {
            self.send_row(&row, columns, formats)?;
            count += 1;
        }

        self.finish(count)?;
        debug!("result set sent, {count} rows");

        Ok(count)
    }

    /// Send the column-description message of a result set.
    pub fn send_description(
        &mut self,
        columns: &[Column],
        formats: Option<&[PgFormat]>,
    ) -> Result<usize> {
        let description = RowDescription::new(columns, formats, &self.types)?;
        self.sink.write_message(&description)
    }

    /// Send one data-row message.
    ///
    /// The caller is trusted to have sent the description first; ordering is
    /// not self-checked here.
    pub fn send_row(
        &mut self,
        row: &Row,
        columns: &[Column],
        formats: Option<&[PgFormat]>,
    ) -> Result<usize> {
        let data = DataRow::new(row, columns, formats)?;
        self.sink.write_message(&data)
    }

    /// Send the completion message of a result set of `rows` rows.
    pub fn finish(&mut self, rows: u64) -> Result<usize> {
        self.sink.write_message(&CommandComplete::select(rows))
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Consume self into the underlying sink.
    pub fn into_inner(self) -> S {
        self.sink
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        error::Error,
        postgres::{SqlType, backend::ReadyForQuery},
        value::Value,
    };

    fn version_result() -> ([Column; 1], Row) {
        (
            [Column::new("version", SqlType::Varchar)],
            Row::from(vec![Value::from("pgbridge v1.0")]),
        )
    }

    #[test]
    fn writes_in_protocol_order() {
        let (columns, row) = version_result();

        let mut out = ResultSetWriter::new(IoSink::new(Vec::new()));
        let count = out.send(&columns, [row], None).unwrap();
        assert_eq!(count, 1);

        let bytes = out.into_inner().into_inner();
        assert_eq!(bytes[0], b'T');
        let desc_len = i32::from_be_bytes(bytes[1..5].try_into().unwrap()) as usize;
        assert_eq!(bytes[1 + desc_len], b'D');
        assert_eq!(&bytes[bytes.len() - 14..], b"C\0\0\0\rSELECT 1\0");
    }

    #[test]
    fn failed_build_writes_nothing() {
        let (columns, row) = version_result();

        let mut out = ResultSetWriter::with_types(IoSink::new(Vec::new()), TypeMap::empty());
        let err = out.send(&columns, [row], None).unwrap_err();
        assert!(matches!(err, Error::Encode(_)));
        assert!(out.into_inner().into_inner().is_empty());
    }

    /// Writer that fails with `BrokenPipe` from the nth write on.
    struct FailAfter {
        writes: usize,
        fail_at: usize,
    }

    impl Write for FailAfter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.writes += 1;
            if self.writes >= self.fail_at {
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "peer gone"));
            }
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn write_failure_aborts_result_set() {
        let columns = [Column::new("id", SqlType::Integer)];
        let rows = (0..4).map(|i| Row::from(vec![Value::Int(i)]));

        // description goes through, the first data row hits the error
        let sink = IoSink::new(FailAfter { writes: 0, fail_at: 2 });
        let mut out = ResultSetWriter::new(sink);

        let err = out.send(&columns, rows, None).unwrap_err();
        let Error::Io(err) = err else {
            panic!("expected the writer error to propagate unchanged")
        };
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);

        // no message was attempted past the failing one
        assert_eq!(out.into_inner().into_inner().writes, 2);
    }

    #[test]
    fn streaming_producer() {
        let columns = [
            Column::new("id", SqlType::Integer),
            Column::new("name", SqlType::Varchar),
        ];

        let mut out = ResultSetWriter::new(IoSink::new(Vec::new()));
        out.send_description(&columns, None).unwrap();
        for i in 0..3 {
            let row = Row::from(vec![Value::Int(i), Value::from("x")]);
            out.send_row(&row, &columns, None).unwrap();
        }
        out.finish(3).unwrap();
        out.sink_mut().write_message(&ReadyForQuery::idle()).unwrap();

        let bytes = out.into_inner().into_inner();
        let tags = message_tags(&bytes);
        assert_eq!(tags, [b'T', b'D', b'D', b'D', b'C', b'Z']);
    }

    /// Walk the frames of a wire buffer, collecting message tags.
    fn message_tags(mut bytes: &[u8]) -> Vec<u8> {
        let mut tags = Vec::new();
        while !bytes.is_empty() {
            tags.push(bytes[0]);
            let len = i32::from_be_bytes(bytes[1..5].try_into().unwrap()) as usize;
            bytes = &bytes[1 + len..];
        }
        tags
    }
}
