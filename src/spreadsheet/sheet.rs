use crate::spreadsheet::cell::Cell;

/// Visibility state of a worksheet.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SheetState {
    Visible,
    Hidden,
    VeryHidden,
}

impl SheetState {
    /// Parses the workbook `state` attribute; unrecognized values count as visible.
    pub fn parse(state: &str) -> Self {
        match state {
            "hidden" => Self::Hidden,
            "veryHidden" => Self::VeryHidden,
            _ => Self::Visible,
        }
    }
}

/// A direct child of a row element.
#[derive(Clone, Debug, PartialEq)]
pub enum RowElement {
    Cell(Cell),
    /// Anything that is not a cell, by tag name
    Other(String),
}

/// One sheet row in document order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Row {
    /// 1-based row index; rows without one are skipped during extraction
    pub index: Option<u32>,
    pub elements: Vec<RowElement>,
}

impl Row {
    /// Creates an indexed row made only of cells.
    pub fn new(index: u32, cells: Vec<Cell>) -> Self {
        Row {
            index: Some(index),
            elements: cells.into_iter().map(RowElement::Cell).collect(),
        }
    }
}

/// Represents a worksheet read from a spreadsheet source.
#[derive(Clone, Debug, PartialEq)]
pub struct Sheet {
    /// Sheet name
    pub name: String,
    /// Declared visibility; `None` when the workbook does not say
    pub state: Option<SheetState>,
    /// Rows in document order
    pub rows: Vec<Row>,
}

impl Sheet {
    /// Creates an empty sheet without a declared state.
    pub fn new(name: &str) -> Self {
        Sheet {
            name: name.to_owned(),
            state: None,
            rows: Vec::new(),
        }
    }

    /// Only unmarked or visible sheets are processed.
    pub fn is_available(&self) -> bool {
        matches!(self.state, None | Some(SheetState::Visible))
    }

    /// Appends a row.
    pub fn push(&mut self, row: Row) {
        self.rows.push(row);
    }

    /// Builder-style variant of [`Sheet::push`].
    pub fn with_row(mut self, row: Row) -> Self {
        self.push(row);
        self
    }

    /// Rows that carry an index, ordered by ascending index.
    ///
    /// The sort is stable, so rows sharing an index keep their document order.
    pub fn indexed_rows(&self) -> Vec<(u32, &Row)> {
        let mut rows: Vec<(u32, &Row)> = self.rows
            .iter()
            .filter_map(|row| row.index.map(|index| (index, row)))
            .collect();
        rows.sort_by_key(|(index, _)| *index);
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sheet_availability() {
        let mut sheet = Sheet::new("Data");
        assert!(sheet.is_available());
        sheet.state = Some(SheetState::Visible);
        assert!(sheet.is_available());
        sheet.state = Some(SheetState::Hidden);
        assert!(!sheet.is_available());
        sheet.state = Some(SheetState::VeryHidden);
        assert!(!sheet.is_available());
    }

    #[test]
    fn sheet_state_parse() {
        assert_eq!(SheetState::parse("visible"), SheetState::Visible);
        assert_eq!(SheetState::parse("hidden"), SheetState::Hidden);
        assert_eq!(SheetState::parse("veryHidden"), SheetState::VeryHidden);
    }

    #[test]
    fn indexed_rows_sorted_and_filtered() {
        let sheet = Sheet::new("Data")
            .with_row(Row::new(3, vec![Cell::new("A3", "c")]))
            .with_row(Row { index: None, elements: vec![] })
            .with_row(Row::new(1, vec![Cell::new("A1", "a")]))
            .with_row(Row::new(2, vec![Cell::new("A2", "b")]));

        let indexes: Vec<u32> = sheet.indexed_rows().iter().map(|(index, _)| *index).collect();
        assert_eq!(indexes, vec![1, 2, 3]);
    }
}
