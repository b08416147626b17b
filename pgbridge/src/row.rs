//! Result-set surface handed to the encoding layer.
//!
//! - [`Column`]
//! - [`Row`]
use crate::{common::ByteStr, postgres::SqlType, value::Value};

/// A named, typed result-set column.
///
/// Immutable once produced by the query layer; order within a result set is
/// significant and fixed for the lifetime of that result set.
#[derive(Clone, Debug)]
pub struct Column {
    pub(crate) name: ByteStr,
    pub(crate) ty: SqlType,
}

impl Column {
    pub fn new(name: impl Into<ByteStr>, ty: SqlType) -> Self {
        Self { name: name.into(), ty }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub const fn ty(&self) -> SqlType {
        self.ty
    }
}

/// One row of values, positionally matching a column list.
///
/// `row.len() == columns.len()` for every row of a result set is the
/// producer's invariant; the data-row builder rejects a violation with
/// [`ArityMismatch`][crate::EncodeError::ArityMismatch].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Row {
    values: Vec<Value>,
}

impl Row {
    pub const fn new() -> Self {
        Self { values: Vec::new() }
    }

    pub fn push(&mut self, value: impl Into<Value>) {
        self.values.push(value.into());
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }
}

impl From<Vec<Value>> for Row {
    fn from(values: Vec<Value>) -> Self {
        Self { values }
    }
}

impl<V: Into<Value>> FromIterator<V> for Row {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        Self { values: iter.into_iter().map(Into::into).collect() }
    }
}

impl IntoIterator for Row {
    type Item = Value;

    type IntoIter = std::vec::IntoIter<Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}
