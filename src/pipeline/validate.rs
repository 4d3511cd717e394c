//! Warn-only validation of the returned compliance table.
//!
//! The pipeline trusts the completion service to honour the requested
//! table shape; the result is always passed through verbatim. This check
//! only detects drift — a model that renamed or dropped a column — and
//! reports it via a warning and `AuditStats::columns_verified`, giving
//! callers a deterministic signal without ever rejecting the result.

/// True when the first markdown table header in `markdown` carries exactly
/// the expected columns, in order. Comparison is case-insensitive and
/// whitespace-tolerant.
pub fn table_header_matches(markdown: &str, columns: &[&str]) -> bool {
    let Some(header) = first_table_row(markdown) else {
        return false;
    };
    let cells: Vec<String> = header
        .trim()
        .trim_matches('|')
        .split('|')
        .map(|c| c.trim().to_ascii_lowercase())
        .collect();

    cells.len() == columns.len()
        && cells
            .iter()
            .zip(columns)
            .all(|(cell, col)| cell == &col.to_ascii_lowercase())
}

/// The first line that looks like a table row (contains a pipe and is not
/// a separator row of dashes/colons).
fn first_table_row(markdown: &str) -> Option<&str> {
    markdown.lines().find(|line| {
        let t = line.trim();
        t.contains('|')
            && !t
                .chars()
                .all(|c| matches!(c, '|' | '-' | ':' | ' '))
    })
}
