//! # Rusty Records
//!
//! Reads tabular spreadsheet sheets as lists of typed records.
//!
//! The first row of every sheet is its header: each label names a field of the target
//! type, and each later row becomes one instance. Labels of the form `group.field`
//! collect into lists of nested records, so a row can carry several line items.
//!
//! ## Pipeline
//!
//! - [`spreadsheet`]: opens a workbook (`.xlsx`, `.xlsm`, `.xlam`) or an in-memory
//!   source and yields its sheets, rows and cells
//! - [`table`]: turns a sheet into an ordered table of untyped records
//! - [`decode`]: converts untyped values into booleans, numbers, text, dates, enums
//!   and registered custom types
//! - [`bind`]: populates typed instances declared with [`bindable!`] and
//!   [`bindable_enum!`]
//!
//! ## Example
//!
//! ```no_run
//! use rusty_records::{bindable, read_records, Criteria};
//!
//! bindable! {
//!     #[derive(Debug, Default)]
//!     pub struct Contact {
//!         pub name: String,
//!         pub age: u32,
//!     }
//! }
//!
//! let criteria = Criteria::with_sheet_names(&["Contacts"])?;
//! for (sheet, contacts) in read_records::<Contact>("contacts.xlsx", &criteria)? {
//!     println!("{}: {} contacts", sheet, contacts.len());
//! }
//! # Ok::<(), rusty_records::Error>(())
//! ```
mod error;
mod helpers;

pub mod bind;
pub mod decode;
pub mod spreadsheet;
pub mod table;

pub use crate::bind::binder::Binder;
pub use crate::bind::BindError;
pub use crate::bind::Bindable;
pub use crate::decode::registry::DecoderRegistry;
pub use crate::decode::registry::ScalarDecoder;
pub use crate::decode::DecodeError;
pub use crate::error::Error;
pub use crate::error::ResultMessage;
pub use crate::helpers::reader::ReaderError;
pub use crate::helpers::xml::XmlError;
pub use crate::spreadsheet::criteria::Criteria;
pub use crate::spreadsheet::Spreadsheet;
pub use crate::spreadsheet::SpreadsheetError;
pub use crate::table::Record;
pub use crate::table::Table;
pub use crate::table::TableError;
pub use crate::table::Value;

use crate::table::extractor::extract_all;

/// Reads every selected sheet of a workbook file as a list of `T`.
///
/// Sheets come back in workbook order, each paired with its name. Failures carry the
/// file name and, once extraction is done, the failing sheet's name.
pub fn read_records<T: Bindable + Default>(file_name: &str, criteria: &Criteria) -> Result<Vec<(String, Vec<T>)>, Error> {
    let mut spreadsheet = spreadsheet::open(file_name).with_prefix(file_name)?;
    read_spreadsheet_records(&mut spreadsheet, criteria)
}

/// Like [`read_records`], for any [`Spreadsheet`] source.
pub fn read_spreadsheet_records<T: Bindable + Default>(
    spreadsheet: &mut dyn Spreadsheet,
    criteria: &Criteria,
) -> Result<Vec<(String, Vec<T>)>, Error> {
    let name = spreadsheet.name();
    let tables = extract_all(spreadsheet, criteria).with_prefix(&name)?;
    log::debug!("Extracted {} sheets from '{}'", tables.len(), name);

    let mut binder = Binder::new();
    let mut records = Vec::<(String, Vec<T>)>::with_capacity(tables.len());
    for (sheet, table) in tables {
        let instances = binder
            .bind_all::<T>(&table)
            .map_err(Error::from)
            .with_prefix(&format!("{}: Sheet '{}'", name, sheet))?;
        records.push((sheet, instances));
    }
    binder.clear();
    Ok(records)
}
