//! Sample Data
//!
//! Deterministic generators for the demo screens: a long list of file-like
//! items for the shimmered table, and the expense tracker's entries.

use crate::budget::Expense;
use crate::loader::Row;
use crate::table::{build_columns, Column};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Items generated for the table screen
pub const ITEMS_COUNT: usize = 200;

const FILE_ICON_BASE_URL: &str =
    "https://res-1.cdn.office.net/files/fabric-cdn-prod_20230815.002/assets/item-types/16";

const FILE_ICONS: &[&str] = &[
    "accdb", "audio", "code", "csv", "docx", "dotx", "mpt", "model", "one", "onetoc", "pdf",
    "photo", "pptx", "presentation", "potx", "pub", "rtf", "spreadsheet", "txt", "vector", "vsdx",
    "xlsx", "xltx", "xsn",
];

const LOREM_IPSUM: &[&str] = &[
    "lorem", "ipsum", "dolor", "sit", "amet", "consectetur", "adipiscing", "elit", "sed", "do",
    "eiusmod", "tempor", "incididunt", "ut", "labore", "et", "dolore", "magna", "aliqua", "enim",
    "ad", "minim", "veniam", "quis", "nostrud", "exercitation", "ullamco", "laboris", "nisi",
    "aliquip", "ex", "ea", "commodo", "consequat",
];

const COLORS: &[&str] = &["red", "blue", "green", "yellow"];
const SHAPES: &[&str] = &["circle", "square", "triangle"];
const LOCATIONS: &[&str] = &["Seattle", "New York", "Chicago", "Los Angeles", "Portland"];

/// A file-like row for the table screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExampleItem {
    pub key: String,
    pub name: String,
    pub description: String,
    pub color: String,
    pub shape: String,
    pub location: String,
    pub width: u32,
    pub height: u32,
    pub doc_type: String,
    pub thumbnail: String,
}

impl Row for ExampleItem {
    fn key(&self) -> String {
        self.key.clone()
    }

    fn fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("thumbnail", self.doc_type.clone()),
            ("key", self.key.clone()),
            ("name", self.name.clone()),
            ("description", self.description.clone()),
            ("color", self.color.clone()),
            ("shape", self.shape.clone()),
            ("location", self.location.clone()),
            ("width", self.width.to_string()),
            ("height", self.height.to_string()),
        ]
    }
}

fn pick<'a, G: Rng>(rng: &mut G, values: &[&'a str]) -> &'a str {
    values.choose(rng).copied().unwrap_or_default()
}

fn lorem<G: Rng>(rng: &mut G, words: usize) -> String {
    (0..words)
        .map(|_| pick(rng, LOREM_IPSUM))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Generate `count` items; the same seed yields the same list
pub fn create_list_items(count: usize, seed: Option<u64>) -> Vec<ExampleItem> {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    (0..count)
        .map(|i| {
            let doc_type = pick(&mut rng, FILE_ICONS).to_string();
            let description_words = 10 + rng.gen_range(0..50);
            ExampleItem {
                key: format!("item-{} {}", i, lorem(&mut rng, 4)),
                name: lorem(&mut rng, 5),
                description: lorem(&mut rng, description_words),
                color: pick(&mut rng, COLORS).to_string(),
                shape: pick(&mut rng, SHAPES).to_string(),
                location: pick(&mut rng, LOCATIONS).to_string(),
                width: rng.gen_range(100..300),
                height: rng.gen_range(100..300),
                thumbnail: format!("{}/{}.svg", FILE_ICON_BASE_URL, doc_type),
                doc_type,
            }
        })
        .collect()
}

/// Columns for the table screen: one per field, with the thumbnail shown
/// as a narrow file-type icon
pub fn item_columns() -> Vec<Column> {
    let sample = create_list_items(1, Some(0));
    let mut columns = sample.first().map(build_columns).unwrap_or_default();
    if let Some(column) = columns.iter_mut().find(|c| c.key == "thumbnail") {
        *column = column.clone().icon("FileType");
    }
    columns
}

/// Entries shown by the expense list screen
pub fn expense_list() -> Vec<Expense> {
    vec![
        Expense::new(1, "Shopping", 50),
        Expense::new(2, "Holiday", 300),
        Expense::new(3, "Transportation", 70),
        Expense::new(4, "Fuel", 50),
        Expense::new(5, "Child Care", 50),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::SourceList;

    #[test]
    fn test_items_are_deterministic_per_seed() {
        let a = create_list_items(20, Some(11));
        let b = create_list_items(20, Some(11));
        assert_eq!(a, b);
        assert_ne!(a, create_list_items(20, Some(12)));
    }

    #[test]
    fn test_item_keys_are_unique() {
        let items = create_list_items(ITEMS_COUNT, Some(5));
        assert_eq!(items.len(), ITEMS_COUNT);
        assert!(SourceList::new(items).is_ok());
    }

    #[test]
    fn test_item_values_in_range() {
        for item in create_list_items(50, Some(3)) {
            assert!((100..300).contains(&item.width));
            assert!((100..300).contains(&item.height));
            assert!(FILE_ICONS.contains(&item.doc_type.as_str()));
            assert!(item.thumbnail.ends_with(&format!("{}.svg", item.doc_type)));
        }
    }

    #[test]
    fn test_thumbnail_column_is_icon() {
        let columns = item_columns();
        assert_eq!(columns.len(), 9);
        assert_eq!(columns[0].label, "FileType");
        assert!(columns[0].icon_only);
        assert!(columns[1..].iter().all(|c| !c.icon_only));
    }

    #[test]
    fn test_expense_list_has_unique_ids() {
        assert!(SourceList::new(expense_list()).is_ok());
    }
}
