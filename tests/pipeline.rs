use pretty_assertions::assert_eq;
use rusty_records::spreadsheet::xlsx::XlsxSpreadsheet;
use rusty_records::spreadsheet::Spreadsheet;
use rusty_records::table::extractor::extract_all;
use rusty_records::{bindable, bindable_enum, read_records, read_spreadsheet_records, Criteria, Error, TableError};
use std::io::Cursor;
use std::io::Write;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

bindable_enum! {
    #[derive(Debug, Default, PartialEq)]
    pub enum Status {
        #[default]
        Open,
        Shipped,
    }
}

bindable! {
    #[derive(Debug, Default, PartialEq)]
    pub struct Line {
        pub sku: String,
        pub qty: u32,
    }
}

bindable! {
    #[derive(Debug, Default, PartialEq)]
    pub struct Order {
        pub id: i64,
        pub customer: Option<String>,
        pub placed: Option<chrono::NaiveDate>,
        pub status: Status,
    }
    groups {
        pub lines: Vec<Line>,
    }
}

const WORKBOOK: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
  <sheets>
    <sheet name="Orders" sheetId="1" r:id="rId1"/>
    <sheet name="Archive" sheetId="2" state="hidden" r:id="rId2"/>
    <sheet name="Backorders" sheetId="3" r:id="rId3"/>
  </sheets>
</workbook>"#;

const RELATIONSHIPS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/>
  <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet2.xml"/>
  <Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="/xl/worksheets/sheet3.xml"/>
  <Relationship Id="rId4" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/sharedStrings" Target="sharedStrings.xml"/>
</Relationships>"#;

const SHARED_STRINGS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" count="9" uniqueCount="9">
  <si><t>id</t></si>
  <si><t>customer</t></si>
  <si><t>placed</t></si>
  <si><t>status</t></si>
  <si><t>lines.sku</t></si>
  <si><t>lines.qty</t></si>
  <si><r><t>Ada </t></r><r><t>Lovelace</t></r></si>
  <si><t>Shipped</t><rPh sb="0" eb="1"><t>x</t></rPh></si>
  <si><t>Tom &amp; Jerry</t></si>
</sst>"#;

const ORDERS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
  <sheetData>
    <row r="1">
      <c r="A1" t="s"><v>0</v></c>
      <c r="B1" t="s"><v>1</v></c>
      <c r="C1" t="s"><v>2</v></c>
      <c r="D1" t="s"><v>3</v></c>
      <c r="E1" t="s"><v>4</v></c>
      <c r="F1" t="s"><v>5</v></c>
      <c r="G1" t="s"><v>4</v></c>
      <c r="H1" t="s"><v>5</v></c>
    </row>
    <row r="3">
      <c r="A3"><v>2</v></c>
      <c r="B3" t="inlineStr"><is><t>null</t></is></c>
      <c r="D3" t="str"><v>Open</v></c>
    </row>
    <row r="2">
      <c r="A2"><v>1</v></c>
      <c r="B2" t="s"><v>6</v></c>
      <c r="C2"><v>45292</v></c>
      <c r="D2" t="s"><v>7</v></c>
      <c r="E2" t="inlineStr"><is><t>BOLT-1</t></is></c>
      <c r="F2"><v>10</v></c>
      <c r="G2" t="inlineStr"><is><t>NUT-2</t></is></c>
      <c r="H2"><v>20</v></c>
    </row>
  </sheetData>
</worksheet>"#;

const ARCHIVE: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
  <sheetData>
    <row r="1"><c r="A1" t="s"><v>0</v></c></row>
    <row r="2"><c r="A2"><v>not a number</v></c></row>
  </sheetData>
</worksheet>"#;

const BACKORDERS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
  <sheetData>
    <row r="1">
      <c r="A1" t="s"><v>0</v></c>
      <c r="B1" t="s"><v>1</v></c>
    </row>
    <row r="2">
      <c r="A2"><v>3.0</v></c>
      <c r="B2" t="s"><v>8</v></c>
    </row>
  </sheetData>
</worksheet>"#;

const SPARSE_WORKBOOK: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
  <sheets>
    <sheet name="Blanks" sheetId="1" r:id="rId1"/>
    <sheet name="Extended" sheetId="2" r:id="rId2"/>
  </sheets>
</workbook>"#;

const SPARSE_RELATIONSHIPS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/>
  <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet2.xml"/>
</Relationships>"#;

// Styled cells without a value, as Excel writes for formatted blanks
const BLANKS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
  <sheetData>
    <row r="1">
      <c r="A1" t="s"><v>0</v></c>
      <c r="B1" t="s"><v>3</v></c>
      <c r="C1" t="s"><v>4</v></c>
      <c r="D1" t="s"><v>5</v></c>
      <c r="E1" t="s"><v>4</v></c>
      <c r="F1" t="s"><v>5</v></c>
    </row>
    <row r="2">
      <c r="A2"><v>5</v></c>
      <c r="B2" s="1"/>
      <c r="C2" s="1"/>
      <c r="D2"><v>10</v></c>
      <c r="E2" t="inlineStr"><is><t>NUT-2</t></is></c>
      <c r="F2"><v>20</v></c>
    </row>
  </sheetData>
</worksheet>"#;

const EXTENDED: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
  <sheetData>
    <row r="1"><c r="A1" t="s"><v>0</v></c></row>
    <row r="2"><c r="A2"><v>1</v></c><extLst><ext uri="x"/></extLst></row>
  </sheetData>
</worksheet>"#;

fn sparse_workbook() -> Vec<u8> {
    package(&[
        ("xl/workbook.xml", SPARSE_WORKBOOK),
        ("xl/_rels/workbook.xml.rels", SPARSE_RELATIONSHIPS),
        ("xl/sharedStrings.xml", SHARED_STRINGS),
        ("xl/worksheets/sheet1.xml", BLANKS),
        ("xl/worksheets/sheet2.xml", EXTENDED),
    ])
}

fn package(parts: &[(&str, &str)]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    for (name, content) in parts {
        writer.start_file(*name, options).unwrap();
        writer.write_all(content.as_bytes()).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

fn workbook() -> Vec<u8> {
    package(&[
        ("xl/workbook.xml", WORKBOOK),
        ("xl/_rels/workbook.xml.rels", RELATIONSHIPS),
        ("xl/sharedStrings.xml", SHARED_STRINGS),
        ("xl/worksheets/sheet1.xml", ORDERS),
        ("xl/worksheets/sheet2.xml", ARCHIVE),
        ("xl/worksheets/sheet3.xml", BACKORDERS),
    ])
}

#[test]
fn reads_typed_records_from_a_workbook_file() {
    let mut file = tempfile::Builder::new().suffix(".xlsx").tempfile().unwrap();
    file.write_all(&workbook()).unwrap();
    file.flush().unwrap();
    let path = file.path().to_str().unwrap().to_owned();

    let sheets = read_records::<Order>(&path, &Criteria::default()).unwrap();
    let names: Vec<&str> = sheets.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(names, vec!["Orders", "Backorders"]);

    assert_eq!(sheets[0].1, vec![
        Order {
            id: 1,
            customer: Some("Ada Lovelace".to_owned()),
            placed: chrono::NaiveDate::from_ymd_opt(2024, 1, 1),
            status: Status::Shipped,
            lines: vec![
                Line { sku: "BOLT-1".to_owned(), qty: 10 },
                Line { sku: "NUT-2".to_owned(), qty: 20 },
            ],
        },
        Order {
            id: 2,
            customer: None,
            placed: None,
            status: Status::Open,
            lines: vec![],
        },
    ]);
    assert_eq!(sheets[1].1, vec![Order {
        id: 3,
        customer: Some("Tom & Jerry".to_owned()),
        ..Order::default()
    }]);
}

#[test]
fn criteria_select_sheets_and_rows() {
    let mut spreadsheet = XlsxSpreadsheet::from_bytes("book.xlsx", workbook()).unwrap();
    assert_eq!(spreadsheet.sheet_names(), vec!["Orders", "Archive", "Backorders"]);

    let criteria = Criteria::with_sheet_names(&["Back*"]).unwrap();
    let sheets = read_spreadsheet_records::<Order>(&mut spreadsheet, &criteria).unwrap();
    assert_eq!(sheets.len(), 1);
    assert_eq!(sheets[0].0, "Backorders");

    let criteria = Criteria::default().sheet_limit(1).rows_limit(1);
    let sheets = read_spreadsheet_records::<Order>(&mut spreadsheet, &criteria).unwrap();
    assert_eq!(sheets.len(), 1);
    assert_eq!(sheets[0].1.len(), 1);
    assert_eq!(sheets[0].1[0].id, 1);
}

#[test]
fn bind_failures_name_the_sheet() {
    bindable! {
        #[derive(Debug, Default)]
        struct Narrow {
            id: i64,
        }
    }

    let mut spreadsheet = XlsxSpreadsheet::from_bytes("book.xlsx", workbook()).unwrap();
    let error = read_spreadsheet_records::<Narrow>(&mut spreadsheet, &Criteria::default()).unwrap_err();
    assert_eq!(error.to_string(), "book.xlsx: Sheet 'Orders': Record 0: Narrow has no field for key 'customer'");
}

#[test]
fn styled_blank_cells_are_left_unset() {
    let mut spreadsheet = XlsxSpreadsheet::from_bytes("sparse.xlsx", sparse_workbook()).unwrap();
    let criteria = Criteria::with_sheet_names(&["Blanks"]).unwrap();
    let sheets = read_spreadsheet_records::<Order>(&mut spreadsheet, &criteria).unwrap();

    assert_eq!(sheets[0].1, vec![Order {
        id: 5,
        status: Status::Open,
        lines: vec![
            Line { sku: String::new(), qty: 10 },
            Line { sku: "NUT-2".to_owned(), qty: 20 },
        ],
        ..Order::default()
    }]);
}

#[test]
fn non_cell_row_children_are_malformed() {
    let mut spreadsheet = XlsxSpreadsheet::from_bytes("sparse.xlsx", sparse_workbook()).unwrap();
    let criteria = Criteria::with_sheet_names(&["Extended"]).unwrap();
    let result = extract_all(&mut spreadsheet, &criteria);
    assert!(matches!(
        result,
        Err(Error::TableError(TableError::MalformedRow { row: 2, ref element, .. })) if element == "extLst"
    ));
}

#[test]
fn missing_parts_are_reported() {
    let result = XlsxSpreadsheet::from_bytes("empty.xlsx", package(&[("xl/styles.xml", "<styleSheet/>")]));
    assert!(matches!(result, Err(Error::SpreadsheetError(_))));
    assert_eq!(
        result.err().map(|error| error.to_string()),
        Some("Workbook part is missing from 'empty.xlsx'".to_owned())
    );

    let bytes = package(&[
        ("xl/workbook.xml", WORKBOOK),
        ("xl/_rels/workbook.xml.rels", RELATIONSHIPS),
        ("xl/worksheets/sheet1.xml", ORDERS),
    ]);
    let mut spreadsheet = XlsxSpreadsheet::from_bytes("plain.xlsx", bytes).unwrap();
    let error = spreadsheet.load_shared_strings().unwrap_err();
    assert_eq!(error.to_string(), "Shared string table is missing from 'plain.xlsx'");
}

#[test]
fn unknown_extensions_are_rejected() {
    let result = read_records::<Order>("orders.csv", &Criteria::default());
    assert!(result.is_err());
}
