use crate::error::LookupError;
use crate::helpers::xml::XmlNodeHelper;
use crate::helpers::xml::XmlReader;
use crate::helpers::xml::XmlTextContextHelper;
use crate::helpers::zip::ZipHelper;
use crate::match_xml_events;
use crate::spreadsheet::cell::Cell;
use crate::spreadsheet::reference::reference_to_index;
use crate::spreadsheet::reference::MAX_COLUMNS;
use crate::spreadsheet::reference::MAX_ROWS;
use crate::spreadsheet::reference::row_to_index;
use crate::spreadsheet::sheet::RawSheet;
use crate::spreadsheet::FormatError;
use quick_xml::events::Event;
use std::borrow::Cow;
use std::collections::HashMap;
use std::fs::File;
use std::io::BufRead;
use std::io::BufReader;
use std::io::Read;
use std::io::Seek;
use std::path::Path;
use tracing::debug;
use tracing::warn;
use zip::ZipArchive;

// Local names of the SpreadsheetML elements we read
const TAG_RELATIONSHIP: &[u8] = b"Relationship";
const TAG_SHEET: &[u8] = b"sheet";
const TAG_SHARED_STRING_ITEM: &[u8] = b"si";
const TAG_PHONETIC_TEXT: &[u8] = b"rPh"; // Phonetic guide runs, not part of the value
const TAG_TEXT: &[u8] = b"t";
const TAG_ROW: &[u8] = b"row";
const TAG_CELL: &[u8] = b"c";
const TAG_INLINE_STRING: &[u8] = b"is";
const TAG_VALUE: &[u8] = b"v";

const PART_WORKBOOK: &str = "xl/workbook.xml";
const PART_WORKBOOK_RELATIONSHIPS: &str = "xl/_rels/workbook.xml.rels";
const PART_SHARED_STRINGS: &str = "xl/sharedStrings.xml";

/// How the `<v>` content of a cell is to be read, from its `t` attribute.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
enum ValueKind {
    #[default]
    Number,
    SharedString,
    InlineString,
    Boolean,
    Error,
}

impl ValueKind {
    fn parse(kind: Option<&str>) -> Self {
        match kind {
            Some("s") => Self::SharedString,
            Some("inlineStr") | Some("str") | Some("d") => Self::InlineString,
            Some("b") => Self::Boolean,
            Some("e") => Self::Error,
            _ => Self::Number,
        }
    }
}

/// An opened `.xlsx` workbook.
pub struct XlsxWorkbook<RS: Read + Seek> {
    zip: ZipArchive<RS>,
    /// Worksheets in workbook order as (name, zip path) pairs
    sheets: Vec<(String, String)>,
    shared_strings: Vec<String>,
}

impl XlsxWorkbook<BufReader<File>> {
    /// Opens a workbook stored on disk.
    pub fn open_path<P: AsRef<Path>>(path: P) -> Result<Self, LookupError> {
        let file = File::open(path.as_ref())?;
        Self::open(BufReader::new(file))
    }
}

impl<RS: Read + Seek> XlsxWorkbook<RS> {
    /// Opens a workbook and loads its sheet list and shared string table.
    pub fn open(reader: RS) -> Result<Self, LookupError> {
        let mut zip = ZipArchive::new(reader)
            .map_err(|error| FormatError::InvalidWorkbook(error.to_string()))?;
        let sheets = load_workbook(&mut zip)?;
        let shared_strings = load_shared_strings(&mut zip)?;
        debug!(sheets = sheets.len(), shared_strings = shared_strings.len(), "Opened workbook");
        Ok(Self {
            zip,
            sheets,
            shared_strings,
        })
    }

    /// Sheet names in workbook order.
    pub fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|(name, _)| name.to_owned()).collect()
    }

    /// Reads the worksheet named exactly `name`.
    pub fn read_sheet(&mut self, name: &str) -> Result<RawSheet, LookupError> {
        let path = self
            .sheets
            .iter()
            .find(|(sheet_name, _)| sheet_name == name)
            .map(|(_, path)| path.to_owned())
            .ok_or_else(|| FormatError::SheetNotFound(name.to_owned()))?;

        let shared_strings = &self.shared_strings;
        let mut reader = self
            .zip
            .xml_reader(&path)?
            .ok_or_else(|| FormatError::InvalidWorkbook(format!("missing part '{path}'")))?;

        let mut sheet = RawSheet::new(name);
        let mut row_count = 0usize;
        let mut col_count = 0usize;
        let mut row = 0usize;
        let mut col = 0usize;
        let mut kind = ValueKind::default();
        let mut value = String::new();
        match_xml_events!(reader => {
            Event::Start(event) if event.local_name().as_ref() == TAG_ROW => {
                if let Some(label) = event.get_attribute_value("r")? {
                    row_count = row_to_index(&label)
                        .ok_or_else(|| FormatError::InvalidWorkbook(format!("invalid row number '{label}'")))?;
                }
                col_count = 0;
            }
            Event::End(event) if event.local_name().as_ref() == TAG_ROW => {
                row_count += 1;
                col_count = 0;
            }
            Event::Start(event) if event.local_name().as_ref() == TAG_CELL => {
                (row, col) = match event.get_attribute_value("r")? {
                    Some(reference) => reference_to_index(&reference)
                        .ok_or_else(|| FormatError::InvalidWorkbook(format!("invalid cell reference '{reference}'")))?,
                    None => (row_count, col_count),
                };
                if row >= MAX_ROWS || col >= MAX_COLUMNS {
                    let message = format!("cell past the sheet limits at row {}", row + 1);
                    return Err(FormatError::InvalidWorkbook(message).into());
                }
                col_count = col + 1;
                kind = ValueKind::parse(event.get_attribute_value("t")?.as_deref());
                value.clear();
            }
            Event::Start(event) if event.local_name().as_ref() == TAG_INLINE_STRING => {
                value = read_string_value(&mut reader, TAG_INLINE_STRING, false)?;
            }
            Event::Start(event) if event.local_name().as_ref() == TAG_VALUE => {
                value = read_string_value(&mut reader, TAG_VALUE, true)?;
            }
            Event::End(event) if event.local_name().as_ref() == TAG_CELL => {
                sheet.push(row, col, to_cell(kind, &value, shared_strings));
                value.clear();
            }
        });
        debug!(sheet = name, rows = sheet.len(), "Read worksheet");
        Ok(sheet)
    }
}

/// Converts the collected content of one `<c>` element.
fn to_cell(kind: ValueKind, value: &str, shared_strings: &[String]) -> Cell {
    if value.is_empty() {
        return Cell::Missing;
    }
    match kind {
        ValueKind::Number => Cell::from_number_literal(value),
        ValueKind::InlineString => Cell::Text(value.to_owned()),
        ValueKind::Boolean => Cell::Text(if value.trim() == "1" { "TRUE" } else { "FALSE" }.to_owned()),
        ValueKind::Error => Cell::Missing,
        ValueKind::SharedString => {
            match value.trim().parse::<usize>().ok().and_then(|index| shared_strings.get(index)) {
                Some(text) if text.is_empty() => Cell::Missing,
                Some(text) => Cell::Text(text.to_owned()),
                None => {
                    warn!(value, "Shared string reference out of range");
                    Cell::Missing
                }
            }
        }
    }
}

/// Loads the worksheet list, resolving each sheet's relationship id to its part path.
fn load_workbook<RS: Read + Seek>(zip: &mut ZipArchive<RS>) -> Result<Vec<(String, String)>, LookupError> {
    let relationships = load_relationships(zip, PART_WORKBOOK_RELATIONSHIPS)?;
    let mut reader = zip
        .xml_reader(PART_WORKBOOK)?
        .ok_or_else(|| FormatError::InvalidWorkbook(format!("missing part '{PART_WORKBOOK}'")))?;
    let mut sheets: Vec<(String, String)> = Vec::new();
    match_xml_events!(reader => {
        Event::Start(event) if event.local_name().as_ref() == TAG_SHEET => {
            let mut name = None::<String>;
            let mut id = None::<String>;
            for result in event.attributes() {
                let attribute = result?;
                match attribute.key.local_name().as_ref() {
                    b"name" => name = Some(attribute.unescape_value()?.into_owned()),
                    b"id" => id = Some(attribute.unescape_value()?.into_owned()),
                    _ => (),
                }
            }
            if let Some((name, id)) = name.zip(id) {
                match relationships.get(&id) {
                    Some(path) => sheets.push((name, path.to_owned())),
                    None => warn!(sheet = %name, id = %id, "Sheet has no worksheet relationship"),
                }
            }
        }
    });
    Ok(sheets)
}

/// Maps relationship ids to worksheet part paths.
fn load_relationships<RS: Read + Seek>(
    zip: &mut ZipArchive<RS>,
    path: &str,
) -> Result<HashMap<String, String>, LookupError> {
    let mut reader = zip
        .xml_reader(path)?
        .ok_or_else(|| FormatError::InvalidWorkbook(format!("missing part '{path}'")))?;
    let mut relationships: HashMap<String, String> = HashMap::new();
    match_xml_events!(reader => {
        Event::Start(event) if event.local_name().as_ref() == TAG_RELATIONSHIP => {
            let id = event.get_attribute_value("Id")?;
            let kind = event.get_attribute_value("Type")?;
            let target = event.get_attribute_value("Target")?;
            // Styles, themes and shared strings share this part
            if kind.map(|it| it.ends_with("/worksheet")).unwrap_or(true) {
                if let Some((id, target)) = id.zip(target) {
                    relationships.insert(id.into_owned(), to_zip_path(target));
                }
            }
        }
    });
    Ok(relationships)
}

/// Loads the whole shared string table; workbooks without one have no text cells by index.
fn load_shared_strings<RS: Read + Seek>(zip: &mut ZipArchive<RS>) -> Result<Vec<String>, LookupError> {
    let mut shared_strings = Vec::<String>::new();
    let mut reader = match zip.xml_reader(PART_SHARED_STRINGS)? {
        Some(reader) => reader,
        None => return Ok(shared_strings),
    };
    match_xml_events!(reader => {
        Event::Start(event) if event.local_name().as_ref() == TAG_SHARED_STRING_ITEM => {
            shared_strings.push(read_string_value(&mut reader, TAG_SHARED_STRING_ITEM, false)?);
        }
    });
    Ok(shared_strings)
}

/// Normalizes a relationship target to a path inside the archive.
fn to_zip_path(path: Cow<'_, str>) -> String {
    if let Some(stripped) = path.strip_prefix('/') {
        stripped.to_owned()
    } else if path.starts_with("xl/") {
        path.into_owned()
    } else {
        format!("xl/{path}")
    }
}

/// Collects text up to `end_tag`, skipping phonetic runs.
///
/// `is_text_content` is set for `<v>`, whose text is the value itself; rich
/// and inline strings only count text inside `<t>` runs.
fn read_string_value<R: BufRead>(
    reader: &mut XmlReader<R>,
    end_tag: &[u8],
    is_text_content: bool,
) -> Result<String, LookupError> {
    let mut is_phonetic_text = false;
    let mut is_text = is_text_content;
    let mut text = String::new();
    match_xml_events!(reader => {
        Event::End(event) if event.local_name().as_ref() == end_tag => break,
        Event::Start(event) if event.local_name().as_ref() == TAG_PHONETIC_TEXT => is_phonetic_text = true,
        Event::End(event) if event.local_name().as_ref() == TAG_PHONETIC_TEXT => is_phonetic_text = false,
        Event::Start(event) if !is_phonetic_text && event.local_name().as_ref() == TAG_TEXT => is_text = true,
        Event::End(event) if is_text && event.local_name().as_ref() == TAG_TEXT => is_text = false,
        Event::Text(event) if is_text => text.push_str(&event.xml_content()?),
        Event::CData(event) if is_text => text.push_str(&event.xml_content()?),
        Event::GeneralRef(event) if is_text => text.push_bytes_ref(&event)?,
    });
    Ok(text)
}
