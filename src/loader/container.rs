//! Forward fill of container labels from sparse marker rows.
use crate::spreadsheet::Cell;
use crate::spreadsheet::RawSheet;
use tracing::debug;

/// Container label of every raw row, `None` for rows before the first marker.
///
/// A row whose marker column reads the marker text (`CAJA`) names the next
/// container in the same column of the following row. The label then sticks
/// to every row, the marker row included, until another marker replaces it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ContainerMap {
    labels: Vec<Option<String>>,
}

impl ContainerMap {
    /// Builds the map in a single forward pass over `sheet`.
    pub fn build(sheet: &RawSheet, marker_column: usize, marker_text: &str) -> Self {
        let marker = marker_text.trim().to_uppercase();
        let mut labels = Vec::with_capacity(sheet.len());
        let mut current: Option<String> = None;
        for row in 0..sheet.len() {
            let is_marker = sheet.get(row, marker_column).normalized().as_deref() == Some(marker.as_str());
            // Bounds-checked lookahead: a marker on the last row changes nothing
            if is_marker && row + 1 < sheet.len() {
                match container_label(sheet.get(row + 1, marker_column)) {
                    Some(label) => {
                        debug!(row, container = %label, "Container marker");
                        current = Some(label);
                    }
                    None => debug!(row, "Container marker without a name"),
                }
            }
            labels.push(current.clone());
        }
        Self { labels }
    }

    /// Number of rows covered, always the row count of the scanned sheet.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Label for `row`; `None` before the first marker or past the sheet.
    pub fn get(&self, row: usize) -> Option<&str> {
        self.labels.get(row).and_then(|label| label.as_deref())
    }

    /// Distinct labels in order of first appearance.
    pub fn containers(&self) -> Vec<&str> {
        let mut containers: Vec<&str> = Vec::new();
        for label in self.labels.iter().flatten() {
            if !containers.contains(&label.as_str()) {
                containers.push(label);
            }
        }
        containers
    }
}

/// Trimmed, uppercased label with line breaks collapsed to spaces; `None` when blank.
fn container_label(cell: &Cell) -> Option<String> {
    let text = cell.to_text()?;
    let label = text
        .trim()
        .replace("\r\n", " ")
        .replace(['\n', '\r'], " ")
        .to_uppercase();
    (!label.is_empty()).then_some(label)
}
