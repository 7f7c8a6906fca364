use crate::table::TableError;

/// Declared data types of spreadsheet cells (the `t` attribute in xlsx).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CellType {
    /// Shared string table references
    SharedString,
    /// Boolean values stored as 0/1
    Boolean,
    /// Inline string values
    InlineString,
    /// Numeric values
    Number,
    /// ISO 8601 date/time strings
    IsoDateTime,
    /// Error values
    Error,
    /// Any tag this crate does not interpret
    Unknown,
}

impl CellType {
    /// Parses the declared type tag of a cell.
    pub fn parse(tag: &str) -> Self {
        match tag {
            "s" => Self::SharedString,
            "b" => Self::Boolean,
            "inlineStr" | "str" => Self::InlineString,
            "n" => Self::Number,
            "d" => Self::IsoDateTime,
            "e" => Self::Error,
            _ => Self::Unknown,
        }
    }
}

/// A single cell as delivered by a spreadsheet source.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Cell {
    /// Cell reference such as "B7"
    pub reference: Option<String>,
    /// Declared data type, if any
    pub kind: Option<CellType>,
    /// Raw inner text
    pub value: Option<String>,
}

impl Cell {
    /// Creates an untyped cell.
    pub fn new(reference: &str, value: &str) -> Self {
        Cell {
            reference: Some(reference.to_owned()),
            kind: None,
            value: Some(value.to_owned()),
        }
    }

    /// Creates a cell with a declared data type.
    pub fn typed(reference: &str, kind: CellType, value: &str) -> Self {
        Cell {
            kind: Some(kind),
            ..Cell::new(reference, value)
        }
    }

    /// Decodes the cell's text.
    ///
    /// Shared string cells are dereferenced through `shared_strings`, boolean cells
    /// become the canonical `"True"`/`"False"` and everything else is returned unchanged.
    /// A cell without a value decodes to an empty string.
    pub fn text(&self, shared_strings: &[String]) -> Result<String, TableError> {
        let value = match &self.value {
            Some(value) => value,
            None => return Ok(String::new()),
        };
        match self.kind {
            Some(CellType::SharedString) => value
                .trim()
                .parse::<usize>()
                .ok()
                .and_then(|index| shared_strings.get(index))
                .cloned()
                .ok_or_else(|| TableError::CorruptSharedStringReference {
                    reference: self.reference.clone().unwrap_or_default(),
                    index: value.to_owned(),
                    size: shared_strings.len(),
                }),
            Some(CellType::Boolean) => Ok(if value == "0" { "False" } else { "True" }.to_owned()),
            _ => Ok(value.to_owned()),
        }
    }
}
