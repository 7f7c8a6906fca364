use crate::error::Error;
use crate::spreadsheet::cell::Cell;
use crate::spreadsheet::criteria::Criteria;
use crate::spreadsheet::reference::column_key;
use crate::spreadsheet::sheet::Row;
use crate::spreadsheet::sheet::RowElement;
use crate::spreadsheet::sheet::Sheet;
use crate::spreadsheet::Spreadsheet;
use crate::table::header::HeaderMap;
use crate::table::Record;
use crate::table::Table;
use crate::table::TableError;
use crate::table::Value;

/// Turns a sheet into a table of records.
///
/// The first indexed row is the header row; every later row becomes one record, in
/// ascending row index order. Cells in columns without a header and cells without a
/// value are ignored. Columns with a dotted label collect their values into a list
/// stored under that label, each at its column's slot; gaps left by blank cells hold
/// empty scalars so sibling lists stay aligned.
pub fn extract(sheet: &Sheet, shared_strings: &[String]) -> Result<Table, TableError> {
    extract_rows(sheet, shared_strings, None)
}

/// Like [`extract`], stopping after `rows_limit` data rows.
pub fn extract_rows(sheet: &Sheet, shared_strings: &[String], rows_limit: Option<usize>) -> Result<Table, TableError> {
    let mut rows = sheet.indexed_rows().into_iter();
    let header = match rows.next() {
        Some((index, row)) => read_header(sheet, index, row, shared_strings)?,
        None => return Ok(Table::new()),
    };
    log::debug!("Sheet '{}' has {} header columns", sheet.name, header.len());

    let mut table = Table::new();
    for (index, row) in rows {
        if rows_limit.map(|limit| table.len() >= limit).unwrap_or(false) {
            break;
        }
        table.push(read_record(sheet, index, row, &header, shared_strings)?);
    }
    Ok(table)
}

/// Loads the shared strings once and extracts every selected sheet, in workbook order.
pub fn extract_all(spreadsheet: &mut dyn Spreadsheet, criteria: &Criteria) -> Result<Vec<(String, Table)>, Error> {
    let shared_strings = spreadsheet.load_shared_strings()?;
    let sheets = spreadsheet.read_sheets(criteria)?;
    let mut tables = Vec::<(String, Table)>::with_capacity(sheets.len());
    for sheet in sheets {
        let table = extract_rows(&sheet, &shared_strings, criteria.rows_limit)?;
        tables.push((sheet.name, table));
    }
    Ok(tables)
}

/// Yields the cells of a row, failing on any element that is not a cell.
fn cells<'a>(sheet: &'a Sheet, index: u32, row: &'a Row) -> impl Iterator<Item = Result<&'a Cell, TableError>> + 'a {
    row.elements.iter().map(move |element| match element {
        RowElement::Cell(cell) => Ok(cell),
        RowElement::Other(name) => Err(TableError::MalformedRow {
            sheet: sheet.name.to_owned(),
            row: index,
            element: name.to_owned(),
        }),
    })
}

/// Resolves the column key of a cell; `None` for cells without a usable reference.
fn cell_column<'a>(sheet: &Sheet, cell: &'a Cell) -> Option<&'a str> {
    let reference = cell.reference.as_deref().unwrap_or_default();
    let column = column_key(reference);
    if column.is_empty() {
        log::trace!("Skip cell with reference '{}' in sheet '{}'", reference, sheet.name);
        None
    } else {
        Some(column)
    }
}

fn read_header(sheet: &Sheet, index: u32, row: &Row, shared_strings: &[String]) -> Result<HeaderMap, TableError> {
    let mut header = HeaderMap::new();
    for cell in cells(sheet, index, row) {
        let cell = cell?;
        if let Some(column) = cell_column(sheet, cell) {
            let label = cell.text(shared_strings)?;
            header.register(&sheet.name, column, &label)?;
        }
    }
    Ok(header)
}

fn read_record(sheet: &Sheet, index: u32, row: &Row, header: &HeaderMap, shared_strings: &[String]) -> Result<Record, TableError> {
    let mut record = Record::new();
    for cell in cells(sheet, index, row) {
        let cell = cell?;
        let column = match cell_column(sheet, cell) {
            Some(column) => column,
            None => continue,
        };
        let heading = match header.column(column) {
            Some(heading) => heading,
            None => {
                log::trace!("Skip cell {} in sheet '{}': column has no header", column, sheet.name);
                continue;
            }
        };
        if cell.value.is_none() {
            log::trace!("Skip blank cell {}{} in sheet '{}'", column, index, sheet.name);
            continue;
        }
        let text = cell.text(shared_strings)?;
        if !heading.label.contains('.') {
            record.insert(heading.label.to_owned(), Value::Scalar(text));
            continue;
        }
        // Dotted labels only ever hold lists
        if let Value::List(items) = record
            .entry(heading.label.to_owned())
            .or_insert_with(|| Value::List(Vec::new()))
        {
            if items.len() <= heading.slot {
                items.resize(heading.slot + 1, Value::Scalar(String::new()));
            }
            items[heading.slot] = Value::Scalar(text);
        }
    }
    Ok(record)
}
