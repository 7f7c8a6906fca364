use crate::error::Error;
use crate::helpers::reader::UnifiedReader;
use crate::helpers::xml::XmlNodeHelper;
use crate::helpers::xml::XmlReader;
use crate::helpers::xml::XmlTextContextHelper;
use crate::helpers::zip::ZipHelper;
use crate::match_xml_events;
use crate::spreadsheet::cell::Cell;
use crate::spreadsheet::cell::CellType;
use crate::spreadsheet::criteria::Criteria;
use crate::spreadsheet::select_sheet;
use crate::spreadsheet::sheet::Row;
use crate::spreadsheet::sheet::RowElement;
use crate::spreadsheet::sheet::Sheet;
use crate::spreadsheet::sheet::SheetState;
use crate::spreadsheet::Spreadsheet;
use crate::spreadsheet::SpreadsheetError;
use quick_xml::events::Event;
use quick_xml::name::QName;
use std::borrow::Cow;
use std::collections::HashMap;
use std::io::BufRead;
use zip::ZipArchive;

// Package part paths
const PART_WORKBOOK: &str = "xl/workbook.xml";
const PART_WORKBOOK_RELATIONSHIPS: &str = "xl/_rels/workbook.xml.rels";
const PART_SHARED_STRINGS: &str = "xl/sharedStrings.xml";

// XML tag names for parsing Excel XLSX format
const TAG_SHARED_STRING_ITEM: QName = QName(b"si");   // Shared string table item
const TAG_PHONETIC_TEXT: QName = QName(b"rPh");       // Phonetic text for Asian languages
const TAG_TEXT: QName = QName(b"t");                  // Text content within strings
const TAG_SHEET: QName = QName(b"sheet");             // Worksheet definition
const TAG_ROW: QName = QName(b"row");                 // Row in worksheet
const TAG_CELL: QName = QName(b"c");                  // Cell in worksheet
const TAG_INLINE_STRING: QName = QName(b"is");        // Inline string value
const TAG_VALUE: QName = QName(b"v");                 // Cell value content
const TAG_RELATIONSHIP: &[u8] = b"Relationship";

/// A worksheet entry of the workbook part.
struct WorkbookSheet {
    name: String,
    state: Option<SheetState>,
    relationship_id: Option<String>,
}

/// Represents an Excel XLSX spreadsheet file
pub struct XlsxSpreadsheet {
    /// File name of the spreadsheet
    name: String,
    /// ZIP archive containing the XLSX file contents
    zip: ZipArchive<UnifiedReader>,
    /// Worksheets in workbook order
    sheets: Vec<WorkbookSheet>,
    /// Relationship id to worksheet part path
    relationships: HashMap<String, String>,
}

impl XlsxSpreadsheet {
    /// Opens an XLSX spreadsheet file and parses its workbook structure
    pub fn open(file_name: &str) -> Result<XlsxSpreadsheet, Error> {
        Self::load(file_name, UnifiedReader::open(file_name)?)
    }

    /// Reads an XLSX package that is already in memory
    pub fn from_bytes(name: &str, bytes: Vec<u8>) -> Result<XlsxSpreadsheet, Error> {
        Self::load(name, UnifiedReader::from_bytes(name, bytes)?)
    }

    fn load(name: &str, reader: UnifiedReader) -> Result<XlsxSpreadsheet, Error> {
        let mut zip = ZipArchive::new(reader)?;
        if !zip.contains(PART_WORKBOOK) {
            Err(SpreadsheetError::MissingWorkbook(name.to_owned()))?;
        }
        let relationships = load_relationships(&mut zip, name)?;
        let sheets = load_workbook(&mut zip, name)?;
        Ok(XlsxSpreadsheet {
            name: name.to_owned(),
            zip,
            sheets,
            relationships,
        })
    }

    /// Names of all worksheets, hidden ones included
    pub fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|sheet| sheet.name.to_owned()).collect()
    }

    fn read_sheet(&mut self, name: &str, state: Option<SheetState>, path: &str) -> Result<Sheet, Error> {
        let mut reader = self.zip.xml_reader(path)?
            .ok_or_else(|| SpreadsheetError::MissingSheetPart {
                file: self.name.to_owned(),
                sheet: name.to_owned(),
            })?;

        let mut sheet = Sheet {
            name: name.to_owned(),
            state,
            rows: Vec::new(),
        };
        let mut row: Option<Row> = None;
        let mut cell: Option<Cell> = None;
        // Element depth below the current row: 1 for the row's direct children
        let mut depth = 0usize;
        match_xml_events!(reader => {
            Event::Start(event) if row.is_none() => {
                if event.name() == TAG_ROW {
                    let index = event.get_attribute_value("r")?.and_then(|index| index.parse::<u32>().ok());
                    row = Some(Row { index, elements: Vec::new() });
                    depth = 0;
                }
            }
            Event::End(event) if depth == 0 && event.name() == TAG_ROW => {
                if let Some(row) = row.take() {
                    sheet.push(row);
                }
            }
            Event::Start(event) if depth == 0 => {
                depth = 1;
                if event.name() == TAG_CELL {
                    let reference = event.get_attribute_value("r")?.map(Cow::into_owned);
                    let kind = event.get_attribute_value("t")?.map(|kind| CellType::parse(&kind));
                    cell = Some(Cell { reference, kind, value: None });
                } else if let Some(row) = row.as_mut() {
                    let name = String::from_utf8_lossy(event.name().as_ref()).into_owned();
                    row.elements.push(RowElement::Other(name));
                }
            }
            Event::Start(event) if depth == 1 && cell.is_some() && event.name() == TAG_VALUE => {
                let value = read_string_value(&mut reader, TAG_VALUE, true)?;
                if let Some(cell) = cell.as_mut() {
                    cell.value = Some(value);
                }
            }
            Event::Start(event) if depth == 1 && cell.is_some() && event.name() == TAG_INLINE_STRING => {
                let value = read_string_value(&mut reader, TAG_INLINE_STRING, false)?;
                if let Some(cell) = cell.as_mut() {
                    cell.value = Some(value);
                }
            }
            Event::Start(_) => depth += 1,
            Event::End(_) if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    if let Some((row, cell)) = row.as_mut().zip(cell.take()) {
                        row.elements.push(RowElement::Cell(cell));
                    }
                }
            }
        });
        Ok(sheet)
    }
}

impl Spreadsheet for XlsxSpreadsheet {
    fn name(&self) -> String {
        self.name.to_owned()
    }

    /// Loads shared strings from the XLSX file
    ///
    /// Shared strings are stored in a separate XML part and referenced by index.
    /// Rich text runs are concatenated and phonetic annotations are dropped.
    fn load_shared_strings(&mut self) -> Result<Vec<String>, Error> {
        let mut reader = self.zip.xml_reader(PART_SHARED_STRINGS)?
            .ok_or_else(|| SpreadsheetError::MissingSharedStringTable(self.name.to_owned()))?;
        let mut shared_strings = Vec::<String>::new();
        match_xml_events!(reader => {
            Event::Start(event) if event.name() == TAG_SHARED_STRING_ITEM => {
                let string = read_string_value(&mut reader, TAG_SHARED_STRING_ITEM, false)?;
                shared_strings.push(string);
            }
        });
        Ok(shared_strings)
    }

    /// Reads the visible worksheets selected by the criteria, in workbook order
    fn read_sheets(&mut self, criteria: &Criteria) -> Result<Vec<Sheet>, Error> {
        let mut selected = Vec::<(String, Option<SheetState>, String)>::new();
        for sheet in &self.sheets {
            if criteria.exhausted(selected.len()) {
                break;
            }
            let available = matches!(sheet.state, None | Some(SheetState::Visible));
            if !select_sheet(criteria, &self.name, &sheet.name, available) {
                continue;
            }
            let relationship_id = match &sheet.relationship_id {
                Some(relationship_id) => relationship_id,
                None => {
                    log::debug!("Skip sheet '{}' in '{}': no relationship id", sheet.name, self.name);
                    continue;
                }
            };
            let path = self.relationships
                .get(relationship_id)
                .ok_or_else(|| SpreadsheetError::MissingSheetPart {
                    file: self.name.to_owned(),
                    sheet: sheet.name.to_owned(),
                })?;
            selected.push((sheet.name.to_owned(), sheet.state, path.to_owned()));
        }

        let mut sheets = Vec::<Sheet>::with_capacity(selected.len());
        for (name, state, path) in selected {
            sheets.push(self.read_sheet(&name, state, &path)?);
        }
        Ok(sheets)
    }
}

/// Loads worksheet relationships (id to part path) of the workbook
fn load_relationships(zip: &mut ZipArchive<UnifiedReader>, file_name: &str) -> Result<HashMap<String, String>, Error> {
    let mut reader = zip.xml_reader(PART_WORKBOOK_RELATIONSHIPS)?
        .ok_or_else(|| SpreadsheetError::MissingPart {
            file: file_name.to_owned(),
            part: PART_WORKBOOK_RELATIONSHIPS.to_owned(),
        })?;
    let mut relationships: HashMap<String, String> = HashMap::new();
    match_xml_events!(reader => {
        Event::Start(event) if event.local_name().as_ref() == TAG_RELATIONSHIP => {
            let id = event.get_attribute_value("Id")?;
            let kind = event.get_attribute_value("Type")?;
            let target = event.get_attribute_value("Target")?;
            // Only worksheet relationships matter
            if kind.map(|it| it.ends_with("/worksheet")).unwrap_or(true) {
                if let Some((id, target)) = id.zip(target) {
                    relationships.insert(id.to_string(), to_zip_path(target));
                }
            }
        }
    });
    Ok(relationships)
}

/// Loads worksheet names, states and relationship ids from the workbook part
fn load_workbook(zip: &mut ZipArchive<UnifiedReader>, file_name: &str) -> Result<Vec<WorkbookSheet>, Error> {
    let mut reader = zip.xml_reader(PART_WORKBOOK)?
        .ok_or_else(|| SpreadsheetError::MissingWorkbook(file_name.to_owned()))?;
    let mut sheets = Vec::<WorkbookSheet>::new();
    match_xml_events!(reader => {
        Event::Start(event) if event.name() == TAG_SHEET => {
            let name = event.get_attribute_value("name")?.map(Cow::into_owned);
            let state = event.get_attribute_value("state")?.map(|state| SheetState::parse(&state));
            let relationship_id = event.get_local_attribute_value("id")?.map(Cow::into_owned);
            if let Some(name) = name {
                sheets.push(WorkbookSheet { name, state, relationship_id });
            }
        }
    });
    Ok(sheets)
}

/// Normalizes a relationship target to a path inside the package
fn to_zip_path(path: Cow<'_, str>) -> String {
    if let Some(path) = path.strip_prefix('/') {
        path.to_string()
    } else if path.starts_with("xl/") {
        path.to_string()
    } else {
        format!("xl/{path}")
    }
}

/// Reads string value from XML content, handling text and CDATA sections
///
/// Skips phonetic text annotations. With `is_text_content` set, text directly inside
/// the element counts; otherwise only text inside `<t>` elements does.
fn read_string_value<R: BufRead>(
    reader: &mut XmlReader<R>,
    end_tag: QName,
    is_text_content: bool,
) -> Result<String, Error> {
    let mut is_phonetic_text = false;
    let mut is_text = is_text_content;
    let mut text = String::new();
    match_xml_events!(reader => {
        Event::End(event) if event.name() == end_tag => break,
        Event::Start(event) if event.name() == TAG_PHONETIC_TEXT => is_phonetic_text = true,
        Event::End(event) if event.name() == TAG_PHONETIC_TEXT => is_phonetic_text = false,
        Event::Start(event) if !is_phonetic_text && event.name() == TAG_TEXT => is_text = true,
        Event::End(event) if is_text && event.name() == TAG_TEXT => is_text = false,
        Event::Text(event) if is_text => text.push_str(&event.xml_content()?),
        Event::CData(event) if is_text => text.push_str(&event.xml_content()?),
        Event::GeneralRef(event) if is_text => text.push_bytes_ref(&event)?,
    });
    Ok(text)
}
