use crate::table::TableError;
use indexmap::map::Entry;
use indexmap::IndexMap;

/// The header of one column.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeaderColumn {
    pub label: String,
    /// Position in the label's list: how many earlier columns carry the same dotted
    /// label. Always 0 for plain labels.
    pub slot: usize,
}

/// Column key to header label, built once per sheet from its header row.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HeaderMap {
    columns: IndexMap<String, HeaderColumn>,
}

impl HeaderMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the label of a header cell.
    ///
    /// Empty labels mark spacer columns and are skipped. A plain label may appear once;
    /// dotted (grouped) labels may repeat, each repetition taking the next list slot.
    pub fn register(&mut self, sheet: &str, column: &str, label: &str) -> Result<(), TableError> {
        if label.is_empty() {
            log::trace!("Skip spacer column {} in sheet '{}'", column, sheet);
            return Ok(());
        }
        let mut repeats = self.columns.iter().filter(|(_, existing)| existing.label == label);
        if !label.contains('.') {
            if let Some((first, _)) = repeats.next() {
                return Err(TableError::DuplicateHeader {
                    sheet: sheet.to_owned(),
                    label: label.to_owned(),
                    first: first.to_owned(),
                    second: column.to_owned(),
                });
            }
        }
        let slot = repeats.count();
        match self.columns.entry(column.to_owned()) {
            Entry::Occupied(_) => Err(TableError::DuplicateColumn {
                sheet: sheet.to_owned(),
                column: column.to_owned(),
            }),
            Entry::Vacant(entry) => {
                entry.insert(HeaderColumn {
                    label: label.to_owned(),
                    slot,
                });
                Ok(())
            }
        }
    }

    /// Header of a column key, if that column has one.
    pub fn column(&self, column: &str) -> Option<&HeaderColumn> {
        self.columns.get(column)
    }

    /// Label of a column key, if that column has a header.
    pub fn label(&self, column: &str) -> Option<&str> {
        self.column(column).map(|header| header.label.as_str())
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// (column key, label) pairs in header order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.columns.iter().map(|(column, header)| (column.as_str(), header.label.as_str()))
    }
}
