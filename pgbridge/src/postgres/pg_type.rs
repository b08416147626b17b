
/// Postgres object identifier.
///
/// The oid type is implemented as an unsigned four-byte integer.
///
/// <https://www.postgresql.org/docs/current/datatype-oid.html>
pub type Oid = u32;

/// Declared type of a result-set column.
///
/// The set of types the emulated engine declares on its result sets, not the
/// full postgres catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SqlType {
    Varchar,
    Integer,
    Boolean,
    Blob,
    Timestamp,
}

impl SqlType {
    /// Lookup from the textual type name the query layer carries.
    pub fn from_name(name: &str) -> Option<SqlType> {
        Some(match name {
            "VARCHAR" => Self::Varchar,
            "INTEGER" => Self::Integer,
            "BOOLEAN" => Self::Boolean,
            "BLOB" => Self::Blob,
            "TIMESTAMP" => Self::Timestamp,
            _ => return None,
        })
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Varchar => "VARCHAR",
            Self::Integer => "INTEGER",
            Self::Boolean => "BOOLEAN",
            Self::Blob => "BLOB",
            Self::Timestamp => "TIMESTAMP",
        }
    }
}

/// Wire metadata of a declared type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PgTypeInfo {
    /// The object ID of the data type.
    pub oid: Oid,
    /// The data type size (see `pg_type.typlen`).
    ///
    /// Note that negative values denote variable-width types.
    pub size: i16,
}

macro_rules! entry {
    ($ty:ident, $oid:literal, $size:literal) => {
        (SqlType::$ty, PgTypeInfo { oid: $oid, size: $size })
    };
}

/// Immutable declared-type to oid lookup table.
///
/// Owned by the [`RowDescription`][1] builder instead of living as a hidden
/// global; [`TypeMap::new`] is the full fixed table, and a restricted table
/// can be assembled from [`TypeMap::empty`].
///
/// [1]: crate::postgres::backend::RowDescription
#[derive(Clone, Debug)]
pub struct TypeMap {
    entries: Vec<(SqlType, PgTypeInfo)>,
}

impl TypeMap {
    /// The full fixed lookup table.
    pub fn new() -> TypeMap {
        Self {
            entries: vec![
                entry!(Varchar, 25, -1),    // text
                entry!(Integer, 20, 8),     // int8
                entry!(Boolean, 16, 1),     // bool
                entry!(Blob, 17, -1),       // bytea
                entry!(Timestamp, 1114, 8), // timestamp
            ],
        }
    }

    /// A table with no entry.
    pub fn empty() -> TypeMap {
        Self { entries: Vec::new() }
    }

    /// Add or replace an entry.
    pub fn insert(&mut self, ty: SqlType, info: PgTypeInfo) {
        match self.entries.iter_mut().find(|(t, _)| *t == ty) {
            Some((_, i)) => *i = info,
            None => self.entries.push((ty, info)),
        }
    }

    pub fn get(&self, ty: SqlType) -> Option<PgTypeInfo> {
        self.entries.iter().find(|(t, _)| *t == ty).map(|(_, i)| *i)
    }
}

impl Default for TypeMap {
    fn default() -> Self {
        Self::new()
    }
}
