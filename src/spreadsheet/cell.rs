use std::fmt::Display;

/// Value of a single worksheet cell.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Cell {
    /// Shared, inline, formula-string, boolean and ISO date cells
    Text(String),
    /// Numeric cells, including serial dates
    Number(f64),
    /// Absent, empty or error cells
    #[default]
    Missing,
}

impl Cell {
    /// Builds a cell from the raw `<v>`/`<is>` content of an untyped (numeric) cell.
    pub(crate) fn from_number_literal(value: &str) -> Cell {
        match value.trim().parse::<f64>() {
            Ok(number) => Cell::Number(number),
            Err(_) => Cell::Text(value.to_owned()),
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }

    /// Returns the text form of the cell, `None` when missing.
    ///
    /// Integral numbers render without a fractional part so that an identifier
    /// typed as `1042` reads back as `"1042"` rather than `"1042.0"`.
    pub fn to_text(&self) -> Option<String> {
        match self {
            Cell::Text(value) => Some(value.to_owned()),
            Cell::Number(value) if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 => {
                Some(format!("{}", *value as i64))
            }
            Cell::Number(value) => Some(value.to_string()),
            Cell::Missing => None,
        }
    }

    /// Trimmed, uppercased text form of the cell, `None` when missing.
    pub fn normalized(&self) -> Option<String> {
        self.to_text().map(|text| text.trim().to_uppercase())
    }
}

impl Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_text().unwrap_or_default())
    }
}
