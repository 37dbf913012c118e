//! Conversions between A1-style cell references and 0-based indexes.

/// Number of columns in a worksheet (`A` to `XFD`)
pub(crate) const MAX_COLUMNS: usize = 16_384;
/// Number of rows in a worksheet
pub(crate) const MAX_ROWS: usize = 1_048_576;

/// Converts a column label (`A`, `Z`, `AA`) to a 0-based index, `None` past `XFD`.
pub(crate) fn col_to_index(label: &str) -> Option<usize> {
    if label.is_empty() {
        return None;
    }
    label
        .chars()
        .try_fold(0usize, |index, letter| {
            if !letter.is_ascii_alphabetic() {
                return None;
            }
            let digit = letter.to_ascii_uppercase() as usize - 'A' as usize + 1;
            index
                .checked_mul(26)
                .and_then(|index| index.checked_add(digit))
                .filter(|index| *index <= MAX_COLUMNS)
        })
        .map(|index| index - 1)
}

/// Converts a 1-based row label (`1`, `12`) to a 0-based index, `None` past the last row.
pub(crate) fn row_to_index(label: &str) -> Option<usize> {
    label
        .parse::<usize>()
        .ok()
        .filter(|row| (1..=MAX_ROWS).contains(row))
        .map(|row| row - 1)
}

/// Converts a reference such as `B12` to `(row, col)` indexes.
pub(crate) fn reference_to_index(reference: &str) -> Option<(usize, usize)> {
    let split = reference.find(|c: char| c.is_ascii_digit())?;
    let (col, row) = reference.split_at(split);
    let col = col.trim_matches('$');
    Some((row_to_index(row)?, col_to_index(col)?))
}

/// Converts `(row, col)` indexes to a reference such as `B12`.
#[cfg(test)]
pub(crate) fn index_to_reference(row: usize, col: usize) -> String {
    let mut label = String::new();
    let mut col = col + 1;
    while col > 0 {
        col -= 1;
        label.insert(0, (b'A' + (col % 26) as u8) as char);
        col /= 26;
    }
    format!("{label}{}", row + 1)
}
