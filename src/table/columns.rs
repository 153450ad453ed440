//! Column schema
//!
//! Columns are derived once from a sample row when a screen is set up,
//! never per tick.

use crate::loader::Row;
use serde::{Deserialize, Serialize};

/// Narrowest column a derived schema will produce
pub const MIN_COLUMN_WIDTH: usize = 4;
/// Widest column a derived schema will produce
pub const MAX_COLUMN_WIDTH: usize = 32;
/// Width of icon-only columns
pub const ICON_COLUMN_WIDTH: usize = 6;

/// One table column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Field key looked up on each row
    pub key: String,
    /// Header text
    pub label: String,
    pub min_width: usize,
    pub max_width: usize,
    /// Drawn as a compact type marker rather than full text
    pub icon_only: bool,
}

impl Column {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            min_width: MIN_COLUMN_WIDTH,
            max_width: MAX_COLUMN_WIDTH,
            icon_only: false,
        }
    }

    pub fn width(mut self, min_width: usize, max_width: usize) -> Self {
        self.min_width = min_width;
        self.max_width = max_width.max(min_width);
        self
    }

    /// Turn into a narrow icon column with a new header
    pub fn icon(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self.min_width = ICON_COLUMN_WIDTH;
        self.max_width = ICON_COLUMN_WIDTH;
        self.icon_only = true;
        self
    }

    /// Cell width used when drawing
    pub fn render_width(&self) -> usize {
        self.min_width.max(self.label.chars().count().min(self.max_width))
    }
}

/// Build a column per display field of `sample`, sized from its values
pub fn build_columns<R: Row>(sample: &R) -> Vec<Column> {
    sample
        .fields()
        .into_iter()
        .map(|(key, value)| {
            let natural = value.chars().count().max(key.chars().count());
            let width = natural.clamp(MIN_COLUMN_WIDTH, MAX_COLUMN_WIDTH);
            Column::new(key, key).width(width, MAX_COLUMN_WIDTH)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Sample;

    impl Row for Sample {
        fn key(&self) -> String {
            "s".into()
        }

        fn fields(&self) -> Vec<(&'static str, String)> {
            vec![
                ("id", "1".into()),
                ("description", "a very long description that keeps on going for a while".into()),
                ("cost", "300".into()),
            ]
        }
    }

    #[test]
    fn test_columns_follow_field_order() {
        let columns = build_columns(&Sample);
        let keys: Vec<&str> = columns.iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, vec!["id", "description", "cost"]);
        assert_eq!(columns[0].label, "id");
    }

    #[test]
    fn test_widths_are_clamped() {
        let columns = build_columns(&Sample);
        assert_eq!(columns[0].min_width, MIN_COLUMN_WIDTH);
        assert_eq!(columns[1].min_width, MAX_COLUMN_WIDTH);
        assert_eq!(columns[2].min_width, MIN_COLUMN_WIDTH);
    }

    #[test]
    fn test_icon_column() {
        let column = Column::new("thumbnail", "thumbnail").icon("FileType");
        assert!(column.icon_only);
        assert_eq!(column.label, "FileType");
        assert_eq!(column.render_width(), ICON_COLUMN_WIDTH);
    }
}
