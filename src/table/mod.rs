//! # Record Model
//!
//! The generic, self-describing intermediate representation produced by the sheet
//! extractor: a [`Table`] of [`Record`]s whose values are [`Value`]s.
use indexmap::IndexMap;
use std::fmt::Display;
use thiserror::Error;

pub mod extractor;
pub mod header;

/// Errors raised while turning a sheet into a table.
#[derive(Error, Debug)]
pub enum TableError {
    #[error("Row {row} of sheet '{sheet}' holds a non-cell element '{element}'")]
    MalformedRow { sheet: String, row: u32, element: String },

    #[error("Duplicate header '{label}' in sheet '{sheet}' at columns {first} and {second}")]
    DuplicateHeader { sheet: String, label: String, first: String, second: String },

    #[error("Column {column} appears twice in the header row of sheet '{sheet}'")]
    DuplicateColumn { sheet: String, column: String },

    #[error("Cell {reference} refers to shared string '{index}' but the table holds {size} strings")]
    CorruptSharedStringReference { reference: String, index: String, size: usize },
}

/// An untyped record value.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Scalar(String),
    List(Vec<Value>),
}

impl Value {
    pub fn scalar(text: &str) -> Self {
        Value::Scalar(text.to_owned())
    }

    /// Builds a list of scalars.
    pub fn list<S: AsRef<str>>(items: &[S]) -> Self {
        Value::List(items.iter().map(|item| Value::scalar(item.as_ref())).collect())
    }

    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            Value::Scalar(text) => Some(text),
            Value::List(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::Scalar(_) => None,
            Value::List(items) => Some(items),
        }
    }

    /// Short name of the value's shape, used in error messages.
    pub fn shape(&self) -> &'static str {
        match self {
            Value::Scalar(_) => "scalar",
            Value::List(_) => "list",
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Scalar(text) => write!(f, "{}", text),
            Value::List(items) => {
                write!(f, "[")?;
                for (index, item) in items.iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
        }
    }
}

/// Header label to value, in column order.
pub type Record = IndexMap<String, Value>;

/// Records in sheet row order.
pub type Table = Vec<Record>;

/// Splits a header label at its first `.` into the group key and the remainder.
pub fn split_label(label: &str) -> (&str, Option<&str>) {
    match label.split_once('.') {
        Some((group, suffix)) => (group, Some(suffix)),
        None => (label, None),
    }
}
