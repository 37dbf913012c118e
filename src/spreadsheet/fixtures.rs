//! In-memory `.xlsx` builders for tests.
use crate::spreadsheet::Cell;
use std::io::Cursor;
use std::io::Write;
use zip::write::FileOptions;
use zip::CompressionMethod;
use zip::ZipWriter;

const WORKBOOK_NS: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
const RELATIONSHIP_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

pub(crate) fn text(value: &str) -> Cell {
    Cell::Text(value.to_owned())
}

pub(crate) fn escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Zips raw parts into workbook bytes.
pub(crate) fn package(parts: &[(String, String)]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::<()>::default().compression_method(CompressionMethod::Stored);
    for (name, content) in parts {
        writer.start_file(name.as_str(), options).unwrap();
        writer.write_all(content.as_bytes()).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

/// Workbook/relationship parts naming each sheet `worksheets/sheetN.xml`.
pub(crate) fn workbook_parts(sheet_names: &[&str]) -> Vec<(String, String)> {
    let mut sheets = String::new();
    let mut relationships = String::new();
    for (index, name) in sheet_names.iter().enumerate() {
        let number = index + 1;
        sheets.push_str(&format!(
            r#"<sheet name="{}" sheetId="{number}" r:id="rId{number}"/>"#,
            escape(name)
        ));
        relationships.push_str(&format!(
            r#"<Relationship Id="rId{number}" Type="{RELATIONSHIP_NS}/worksheet" Target="worksheets/sheet{number}.xml"/>"#
        ));
    }
    relationships.push_str(&format!(
        r#"<Relationship Id="rIdStyles" Type="{RELATIONSHIP_NS}/styles" Target="styles.xml"/>"#
    ));
    vec![
        (
            "xl/workbook.xml".to_owned(),
            format!(r#"<workbook xmlns="{WORKBOOK_NS}" xmlns:r="{RELATIONSHIP_NS}"><sheets>{sheets}</sheets></workbook>"#),
        ),
        (
            "xl/_rels/workbook.xml.rels".to_owned(),
            format!(r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">{relationships}</Relationships>"#),
        ),
    ]
}

/// Builds a workbook whose text cells go through the shared string table.
pub(crate) fn workbook(sheets: &[(&str, Vec<Vec<Cell>>)]) -> Vec<u8> {
    let names: Vec<&str> = sheets.iter().map(|(name, _)| *name).collect();
    let mut parts = workbook_parts(&names);
    let mut shared_strings = Vec::<String>::new();
    for (index, (_, rows)) in sheets.iter().enumerate() {
        let mut data = String::new();
        for (row, cells) in rows.iter().enumerate() {
            data.push_str(&format!(r#"<row r="{}">"#, row + 1));
            for (col, cell) in cells.iter().enumerate() {
                let reference = crate::spreadsheet::reference::index_to_reference(row, col);
                match cell {
                    Cell::Text(value) => {
                        data.push_str(&format!(r#"<c r="{reference}" t="s"><v>{}</v></c>"#, shared_strings.len()));
                        shared_strings.push(value.to_owned());
                    }
                    Cell::Number(value) => {
                        data.push_str(&format!(r#"<c r="{reference}"><v>{value}</v></c>"#));
                    }
                    Cell::Missing => (),
                }
            }
            data.push_str("</row>");
        }
        parts.push((
            format!("xl/worksheets/sheet{}.xml", index + 1),
            format!(r#"<worksheet xmlns="{WORKBOOK_NS}"><sheetData>{data}</sheetData></worksheet>"#),
        ));
    }
    let items: String = shared_strings
        .iter()
        .map(|value| format!(r#"<si><t xml:space="preserve">{}</t></si>"#, escape(value)))
        .collect();
    parts.push((
        "xl/sharedStrings.xml".to_owned(),
        format!(r#"<sst xmlns="{WORKBOOK_NS}" count="{0}" uniqueCount="{0}">{items}</sst>"#, shared_strings.len()),
    ));
    package(&parts)
}

/// The inventory layout: a title row, a blank row, the header row, then data
/// rows interleaved with `CAJA` marker rows in column B.
pub(crate) fn inventory_rows() -> Vec<Vec<Cell>> {
    vec![
        vec![text("PRO HATS")],
        vec![],
        vec![text("Cliente "), text("Detalle"), text(" ID"), text("TX")],
        vec![Cell::Missing, text("CAJA")],
        vec![Cell::Missing, text("box a")],
        vec![text("John Smith"), text("Fedora"), text("x1"), text("IN")],
        vec![text("john smith "), text("Fedora"), text("X1"), text("OUT")],
        vec![text("Ana Ruiz"), text("Panama"), Cell::Number(1042.0), text("IN")],
        vec![Cell::Missing, text(" caja ")],
        vec![Cell::Missing, text("Box\nB")],
        vec![text("Ana Ruiz"), text("Bowler"), Cell::Number(1042.0), text("IN")],
        vec![text("Luis Smithers"), Cell::Missing, text("Z9")],
    ]
}
