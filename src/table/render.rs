//! Text table renderer
//!
//! Draws a projection as a fixed-width text table. Placeholders become
//! shimmer bars in their own row slot; a projection that has not started
//! draws a generic skeleton instead.

use super::columns::Column;
use crate::loader::{Projection, Row, Slot};
use std::fmt::Write;

/// Character used for shimmer bars
pub const SHIMMER: char = '░';

const SEPARATOR: &str = " | ";

/// What the table widget receives
pub struct TableView<'a, R> {
    pub rows: &'a Projection<R>,
    pub columns: &'a [Column],
    pub shimmer_enabled: bool,
}

impl<'a, R> TableView<'a, R> {
    pub fn new(rows: &'a Projection<R>, columns: &'a [Column]) -> Self {
        Self {
            rows,
            columns,
            shimmer_enabled: rows.shimmer_enabled(),
        }
    }
}

/// Renderer settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Lines drawn for the generic skeleton
    pub skeleton_rows: usize,
    /// Cap on drawn slots; the rest are summarized in one line
    pub max_rows: Option<usize>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            skeleton_rows: 10,
            max_rows: None,
        }
    }
}

/// Render a table view to text
pub fn render_text<R: Row>(view: &TableView<'_, R>, options: &RenderOptions) -> String {
    let widths: Vec<usize> = view.columns.iter().map(Column::render_width).collect();
    let mut out = String::new();

    let header: Vec<String> = view
        .columns
        .iter()
        .zip(&widths)
        .map(|(column, width)| fit(&column.label, *width))
        .collect();
    push_line(&mut out, &header);

    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let _ = writeln!(out, "{}", rule.join("-+-"));

    if view.shimmer_enabled {
        for _ in 0..options.skeleton_rows {
            push_line(&mut out, &shimmer_cells(&widths));
        }
        let _ = writeln!(out, "Content is being fetched");
        return out;
    }

    let limit = options.max_rows.unwrap_or(usize::MAX);
    for slot in view.rows.slots().take(limit) {
        let cells = match slot {
            Slot::Row(row) => view
                .columns
                .iter()
                .zip(&widths)
                .map(|(column, width)| fit(&row.field(&column.key).unwrap_or_default(), *width))
                .collect(),
            Slot::Placeholder => shimmer_cells(&widths),
        };
        push_line(&mut out, &cells);
    }

    let total = view.rows.len();
    if total > limit {
        let _ = writeln!(out, "... {} more rows", total - limit);
    }
    let _ = writeln!(out, "{}/{} rows loaded", view.rows.visible(), total);

    out
}

fn push_line(out: &mut String, cells: &[String]) {
    let _ = writeln!(out, "{}", cells.join(SEPARATOR).trim_end());
}

fn shimmer_cells(widths: &[usize]) -> Vec<String> {
    widths
        .iter()
        .map(|w| std::iter::repeat(SHIMMER).take(*w).collect())
        .collect()
}

/// Pad or truncate to exactly `width` characters
fn fit(value: &str, width: usize) -> String {
    let count = value.chars().count();
    if count <= width {
        return format!("{value:<width$}");
    }
    if width == 0 {
        return String::new();
    }
    let mut cut: String = value.chars().take(width - 1).collect();
    cut.push('…');
    cut
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::{project, SourceList};
    use crate::table::build_columns;

    struct Expense {
        id: u32,
        name: &'static str,
    }

    impl Row for Expense {
        fn key(&self) -> String {
            self.id.to_string()
        }

        fn fields(&self) -> Vec<(&'static str, String)> {
            vec![("id", self.id.to_string()), ("name", self.name.to_string())]
        }
    }

    fn source() -> SourceList<Expense> {
        SourceList::new(vec![
            Expense { id: 1, name: "Shopping" },
            Expense { id: 2, name: "Holiday" },
            Expense { id: 3, name: "Fuel" },
        ])
        .unwrap()
    }

    #[test]
    fn test_not_started_draws_skeleton() {
        let list = source();
        let columns = build_columns(&list[0]);
        let projection = project(&list, 0, false);
        let view = TableView::new(&projection, &columns);
        assert!(view.shimmer_enabled);

        let options = RenderOptions {
            skeleton_rows: 4,
            max_rows: None,
        };
        let text = render_text(&view, &options);
        let lines: Vec<&str> = text.lines().collect();

        // header, rule, 4 skeleton lines, footer
        assert_eq!(lines.len(), 7);
        assert!(lines[2..6].iter().all(|l| l.starts_with(SHIMMER)));
        assert_eq!(lines[6], "Content is being fetched");
        assert!(!text.contains("Shopping"));
    }

    #[test]
    fn test_placeholders_keep_row_slots() {
        let list = source();
        let columns = build_columns(&list[0]);
        let projection = project(&list, 1, true);
        let text = render_text(&TableView::new(&projection, &columns), &RenderOptions::default());
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 2 + 3 + 1);
        assert!(lines[2].contains("Shopping"));
        assert!(lines[3].starts_with(SHIMMER));
        assert!(lines[4].starts_with(SHIMMER));
        assert_eq!(lines[5], "1/3 rows loaded");
    }

    #[test]
    fn test_max_rows_summarizes_rest() {
        let list = source();
        let columns = build_columns(&list[0]);
        let projection = project(&list, 3, true);
        let options = RenderOptions {
            skeleton_rows: 10,
            max_rows: Some(1),
        };
        let text = render_text(&TableView::new(&projection, &columns), &options);

        assert!(text.contains("... 2 more rows"));
        assert!(text.contains("3/3 rows loaded"));
    }

    #[test]
    fn test_fit_pads_and_truncates() {
        assert_eq!(fit("ab", 4), "ab  ");
        assert_eq!(fit("abcdef", 4), "abc…");
        assert_eq!(fit("abc", 0), "");
    }
}
