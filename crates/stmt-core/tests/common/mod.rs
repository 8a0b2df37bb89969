//! Minimal xlsx builder for integration tests.

#![allow(dead_code)]

use std::io::{Cursor, Write};

use zip::write::FileOptions;

/// A test cell value.
#[derive(Clone, Copy)]
pub enum V<'a> {
    S(&'a str),
    N(f64),
    /// Serial number styled with a built-in date format.
    D(f64),
    Blank,
}

/// Sheet name plus rows, with the first row at `first_row` (1-based).
pub struct TestSheet<'a> {
    pub name: &'a str,
    pub first_row: usize,
    pub rows: Vec<Vec<V<'a>>>,
}

impl<'a> TestSheet<'a> {
    pub fn new(name: &'a str, rows: Vec<Vec<V<'a>>>) -> Self {
        Self {
            name,
            first_row: 1,
            rows,
        }
    }
}

fn column_letter(mut index: usize) -> String {
    let mut letters = String::new();
    index += 1;
    while index > 0 {
        index -= 1;
        letters.insert(0, (b'A' + (index % 26) as u8) as char);
        index /= 26;
    }
    letters
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

fn worksheet_xml(sheet: &TestSheet) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>"#,
    );
    for (i, row) in sheet.rows.iter().enumerate() {
        let r = sheet.first_row + i;
        xml.push_str(&format!(r#"<row r="{}">"#, r));
        for (c, value) in row.iter().enumerate() {
            let reference = format!("{}{}", column_letter(c), r);
            match value {
                V::S(s) => xml.push_str(&format!(
                    r#"<c r="{}" t="inlineStr"><is><t>{}</t></is></c>"#,
                    reference,
                    escape(s)
                )),
                V::N(n) => xml.push_str(&format!(r#"<c r="{}"><v>{}</v></c>"#, reference, n)),
                V::D(n) => xml.push_str(&format!(r#"<c r="{}" s="1"><v>{}</v></c>"#, reference, n)),
                V::Blank => {}
            }
        }
        xml.push_str("</row>");
    }
    xml.push_str("</sheetData></worksheet>");
    xml
}

// style 1 is the built-in short date format
const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><cellXfs count="2"><xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/><xf numFmtId="14" fontId="0" fillId="0" borderId="0" xfId="0" applyNumberFormat="1"/></cellXfs></styleSheet>"#;

/// Build an xlsx document holding `sheets` in order.
pub fn xlsx(sheets: &[TestSheet]) -> Vec<u8> {
    build(sheets, false)
}

/// Same as [`xlsx`], with the 1904 date system.
pub fn xlsx_1904(sheets: &[TestSheet]) -> Vec<u8> {
    build(sheets, true)
}

fn build(sheets: &[TestSheet], date1904: bool) -> Vec<u8> {
    let mut content_types = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
<Default Extension="xml" ContentType="application/xml"/>
<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
<Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/>"#,
    );
    let mut workbook = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#,
    );
    if date1904 {
        workbook.push_str(r#"<workbookPr date1904="1"/>"#);
    }
    workbook.push_str("<sheets>");
    let mut workbook_rels = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    );

    for (i, sheet) in sheets.iter().enumerate() {
        let n = i + 1;
        content_types.push_str(&format!(
            r#"<Override PartName="/xl/worksheets/sheet{}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#,
            n
        ));
        workbook.push_str(&format!(
            r#"<sheet name="{}" sheetId="{}" r:id="rId{}"/>"#,
            escape(sheet.name),
            n,
            n
        ));
        workbook_rels.push_str(&format!(
            r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{}.xml"/>"#,
            n, n
        ));
    }
    content_types.push_str("</Types>");
    workbook.push_str("</sheets></workbook>");
    workbook_rels.push_str(
        r#"<Relationship Id="rIdStyles" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>"#,
    );
    workbook_rels.push_str("</Relationships>");

    let rels = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
</Relationships>"#;

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut zip = zip::ZipWriter::new(&mut cursor);
        let options =
            FileOptions::<()>::default().compression_method(zip::CompressionMethod::Stored);

        zip.start_file("[Content_Types].xml", options).unwrap();
        zip.write_all(content_types.as_bytes()).unwrap();
        zip.start_file("_rels/.rels", options).unwrap();
        zip.write_all(rels.as_bytes()).unwrap();
        zip.start_file("xl/workbook.xml", options).unwrap();
        zip.write_all(workbook.as_bytes()).unwrap();
        zip.start_file("xl/_rels/workbook.xml.rels", options).unwrap();
        zip.write_all(workbook_rels.as_bytes()).unwrap();
        zip.start_file("xl/styles.xml", options).unwrap();
        zip.write_all(STYLES.as_bytes()).unwrap();

        for (i, sheet) in sheets.iter().enumerate() {
            zip.start_file(format!("xl/worksheets/sheet{}.xml", i + 1), options)
                .unwrap();
            zip.write_all(worksheet_xml(sheet).as_bytes()).unwrap();
        }

        zip.finish().unwrap();
    }
    cursor.into_inner()
}

/// The two-block statement used across tests.
pub fn two_block_rows() -> Vec<Vec<V<'static>>> {
    use V::*;
    vec![
        vec![S("Date"), S("Amount"), S("Description")],
        vec![S("01/01/2024"), S("R$ 1.234,56"), S("Test 1")],
        vec![S("02/01/2024"), S("R$ 2.345,67"), S("Test 2")],
        vec![Blank, Blank, Blank],
        vec![S("Date"), S("Amount"), S("Description")],
        vec![S("03/01/2024"), S("R$ 3.456,78"), S("Test 3")],
    ]
}
