//! Pipe-delimited fixed-width tables in the GitHub markdown layout.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Align {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Column {
    pub header: &'static str,
    pub align: Align,
}

// Every column is at least two wider than its header.
const HEADER_PADDING: usize = 2;

pub(crate) fn render(columns: &[Column], rows: &[Vec<String>]) -> Vec<String> {
    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(index, column)| {
            rows.iter()
                .filter_map(|row| row.get(index))
                .map(|cell| cell.chars().count())
                .fold(column.header.chars().count() + HEADER_PADDING, usize::max)
        })
        .collect();

    let mut lines = Vec::with_capacity(rows.len() + 2);
    let headers: Vec<&str> = columns.iter().map(|column| column.header).collect();
    lines.push(render_line(columns, &widths, &headers));
    let rule: Vec<String> = widths.iter().map(|width| "-".repeat(width + 2)).collect();
    lines.push(format!("|{}|", rule.join("|")));
    for row in rows {
        let cells: Vec<&str> = row.iter().map(String::as_str).collect();
        lines.push(render_line(columns, &widths, &cells));
    }
    lines
}

fn render_line(columns: &[Column], widths: &[usize], cells: &[&str]) -> String {
    let padded: Vec<String> = columns
        .iter()
        .zip(widths)
        .enumerate()
        .map(|(index, (column, width))| {
            let cell = cells.get(index).copied().unwrap_or("");
            match column.align {
                Align::Left => format!("{cell:<width$}"),
                Align::Right => format!("{cell:>width$}"),
            }
        })
        .collect();
    format!("| {} |", padded.join(" | "))
}

/// Cells of one table line, trimmed. `None` if the line is not wrapped in pipes.
pub(crate) fn split_row(line: &str) -> Option<Vec<&str>> {
    let inner = line.trim().strip_prefix('|')?.strip_suffix('|')?;
    Some(inner.split('|').map(str::trim).collect())
}

pub(crate) fn is_rule(line: &str) -> bool {
    split_row(line).is_some_and(|cells| {
        cells
            .iter()
            .all(|cell| !cell.is_empty() && cell.chars().all(|ch| ch == '-' || ch == ':'))
    })
}
