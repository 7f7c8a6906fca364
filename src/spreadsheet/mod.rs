//! # Spreadsheet Source Module
//!
//! Abstract access to a spreadsheet document: ordered sheets made of ordered rows and
//! cells, plus the shared string table cells refer to. The xlsx reader and the
//! in-memory source both implement [`Spreadsheet`].
use crate::error::Error;
use crate::spreadsheet::criteria::Criteria;
use crate::spreadsheet::sheet::Sheet;
use crate::spreadsheet::xlsx::XlsxSpreadsheet;
use std::path::Path;
use thiserror::Error;

pub mod cell;
pub mod criteria;
pub mod memory;
pub mod reference;
pub mod sheet;
pub mod xlsx;

/// Structural problems with a spreadsheet document.
#[derive(Error, Debug)]
pub enum SpreadsheetError {
    #[error("Workbook part is missing from '{0}'")]
    MissingWorkbook(String),

    #[error("Shared string table is missing from '{0}'")]
    MissingSharedStringTable(String),

    #[error("Part '{part}' is missing from '{file}'")]
    MissingPart { file: String, part: String },

    #[error("Worksheet part of sheet '{sheet}' is missing from '{file}'")]
    MissingSheetPart { file: String, sheet: String },

    #[error("Unsupported spreadsheet format: '{0}'")]
    UnsupportedFormat(String),
}

/// A source of sheets and shared strings.
pub trait Spreadsheet {
    /// Returns the name of this spreadsheet (usually its file name)
    fn name(&self) -> String;

    /// Loads the whole shared string table.
    fn load_shared_strings(&mut self) -> Result<Vec<String>, Error>;

    /// Reads the available sheets selected by `criteria`, in workbook order.
    fn read_sheets(&mut self, criteria: &Criteria) -> Result<Vec<Sheet>, Error>;
}

/// Opens a spreadsheet file, choosing the reader by file extension.
pub fn open(file_name: &str) -> Result<XlsxSpreadsheet, Error> {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|extension| extension.to_str())
        .map(|extension| extension.to_ascii_lowercase());
    match extension.as_deref() {
        Some("xlsx") | Some("xlsm") | Some("xlam") => XlsxSpreadsheet::open(file_name),
        _ => Err(SpreadsheetError::UnsupportedFormat(file_name.to_owned()))?,
    }
}

/// Decides whether a sheet is read, logging why it is not.
pub(crate) fn select_sheet(criteria: &Criteria, file_name: &str, sheet_name: &str, available: bool) -> bool {
    if !available {
        log::debug!("Skip hidden sheet '{}' in '{}'", sheet_name, file_name);
        false
    } else if !criteria.accept(sheet_name) {
        log::debug!("Skip sheet '{}' in '{}': name not selected", sheet_name, file_name);
        false
    } else {
        true
    }
}
