//! Flat-text rendering of query results.
//!
//! The wire encoding is deliberately simple: a comma-joined header line, then
//! one comma-joined line per row, in exactly the order the database returned
//! them. No client-side sorting and no escaping of embedded separators.

/// Render a tabular result: header line plus one line per row.
pub fn format_rows(columns: &[String], rows: &[Vec<String>]) -> String {
    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(columns.join(","));
    for row in rows {
        lines.push(row.join(","));
    }
    lines.join("\n")
}

/// Render a header followed by a comma-joined item list on the same line.
/// With no items the header stands alone.
pub fn format_inline_list(header: &str, items: &[String]) -> String {
    if items.is_empty() {
        header.to_string()
    } else {
        format!("{} {}", header, items.join(", "))
    }
}

/// Render a header followed by one item per line.
pub fn format_line_list(header: &str, items: &[String]) -> String {
    let mut lines = Vec::with_capacity(items.len() + 1);
    lines.push(header.to_string());
    lines.extend(items.iter().cloned());
    lines.join("\n")
}
