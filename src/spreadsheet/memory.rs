use crate::error::Error;
use crate::spreadsheet::criteria::Criteria;
use crate::spreadsheet::select_sheet;
use crate::spreadsheet::sheet::Sheet;
use crate::spreadsheet::Spreadsheet;
use crate::spreadsheet::SpreadsheetError;

/// A spreadsheet whose rows are already in memory.
#[derive(Clone, Debug, Default)]
pub struct MemorySpreadsheet {
    pub name: String,
    /// `None` models a document without a shared string table
    pub shared_strings: Option<Vec<String>>,
    pub sheets: Vec<Sheet>,
}

impl MemorySpreadsheet {
    pub fn new(name: &str, shared_strings: Vec<String>) -> Self {
        MemorySpreadsheet {
            name: name.to_owned(),
            shared_strings: Some(shared_strings),
            sheets: Vec::new(),
        }
    }

    pub fn with_sheet(mut self, sheet: Sheet) -> Self {
        self.sheets.push(sheet);
        self
    }
}

impl Spreadsheet for MemorySpreadsheet {
    fn name(&self) -> String {
        self.name.to_owned()
    }

    fn load_shared_strings(&mut self) -> Result<Vec<String>, Error> {
        match &self.shared_strings {
            Some(shared_strings) => Ok(shared_strings.clone()),
            None => Err(SpreadsheetError::MissingSharedStringTable(self.name.to_owned()))?,
        }
    }

    fn read_sheets(&mut self, criteria: &Criteria) -> Result<Vec<Sheet>, Error> {
        let mut sheets = Vec::<Sheet>::new();
        for sheet in &self.sheets {
            if criteria.exhausted(sheets.len()) {
                break;
            }
            if select_sheet(criteria, &self.name, &sheet.name, sheet.is_available()) {
                sheets.push(sheet.clone());
            }
        }
        Ok(sheets)
    }
}
