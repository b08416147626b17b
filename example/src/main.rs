//! Encode the result sets a pgwire facade sends right after a query, and
//! hex-dump the frames.
use pgbridge::{Column, IoSink, MessageSink, ReadyForQuery, ResultSetWriter, Row, SqlType, Value};

fn main() -> pgbridge::Result<()> {
    // the version probe drivers issue right after startup: one VARCHAR
    // column, one row
    let columns = [Column::new("version", SqlType::Varchar)];
    let rows = [Row::from(vec![Value::from("pgbridge v1.0")])];

    let mut out = ResultSetWriter::new(IoSink::new(Vec::new()));
    out.send(&columns, rows, None)?;
    out.sink_mut().write_message(&ReadyForQuery::idle())?;

    println!("version probe response:");
    hexdump(&out.into_inner().into_inner());

    // a typed result set with a null
    let columns = [
        Column::new("id", SqlType::Integer),
        Column::new("name", SqlType::Varchar),
        Column::new("active", SqlType::Boolean),
    ];
    let rows = [
        Row::from(vec![Value::Int(1), Value::from("foo"), Value::Bool(true)]),
        Row::from(vec![Value::Int(2), Value::Null, Value::Bool(false)]),
    ];

    let mut out = ResultSetWriter::new(IoSink::new(Vec::new()));
    out.send(&columns, rows, None)?;
    out.sink_mut().write_message(&ReadyForQuery::idle())?;

    println!("\ntyped result set:");
    hexdump(&out.into_inner().into_inner());

    Ok(())
}

fn hexdump(bytes: &[u8]) {
    for chunk in bytes.chunks(16) {
        let mut hex = String::with_capacity(48);
        let mut ascii = String::with_capacity(16);
        for &b in chunk {
            hex.push_str(&format!("{b:02x} "));
            ascii.push(if b.is_ascii_graphic() { b as char } else { '.' });
        }
        println!("{hex:<48} {ascii}");
    }
}
