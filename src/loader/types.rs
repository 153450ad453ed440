//! Core loader data types
//!
//! Defines the row abstraction, the immutable source list and the
//! options a loader is built from.

use super::error::{LoaderError, LoaderResult};
use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashSet;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

/// A record that can be revealed by a loader and drawn by a table
pub trait Row {
    /// Stable identity, unique within a source list
    fn key(&self) -> String;

    /// Display fields in column order as `(column key, value)`
    fn fields(&self) -> Vec<(&'static str, String)>;

    /// Look up a single display field by column key
    fn field(&self, name: &str) -> Option<String> {
        self.fields()
            .into_iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value)
    }
}

/// Immutable, ordered rows fully known before loading starts.
///
/// Cloning is cheap: clones share the same allocation, so a single list can
/// back several independent loaders.
pub struct SourceList<R> {
    rows: Arc<[R]>,
}

impl<R: Row> SourceList<R> {
    /// Build a source list, rejecting duplicate row keys
    pub fn new(rows: Vec<R>) -> LoaderResult<Self> {
        let mut seen = HashSet::with_capacity(rows.len());
        for row in &rows {
            let key = row.key();
            if !seen.insert(key.clone()) {
                return Err(LoaderError::DuplicateKey(key));
            }
        }

        Ok(Self { rows: rows.into() })
    }
}

impl<R> SourceList<R> {
    /// Number of rows (N)
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&R> {
        self.rows.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, R> {
        self.rows.iter()
    }

    /// True when both lists share the same allocation
    pub fn same_source(&self, other: &SourceList<R>) -> bool {
        Arc::ptr_eq(&self.rows, &other.rows)
    }
}

impl<R> Clone for SourceList<R> {
    fn clone(&self) -> Self {
        Self {
            rows: Arc::clone(&self.rows),
        }
    }
}

impl<R> Deref for SourceList<R> {
    type Target = [R];

    fn deref(&self) -> &[R] {
        &self.rows
    }
}

impl<R: fmt::Debug> fmt::Debug for SourceList<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.rows.iter()).finish()
    }
}

/// One position in a projected table: an arrived row or a shimmer placeholder
#[derive(Debug, PartialEq, Eq)]
pub enum Slot<'a, R> {
    Row(&'a R),
    Placeholder,
}

impl<R> Clone for Slot<'_, R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R> Copy for Slot<'_, R> {}

impl<'a, R> Slot<'a, R> {
    pub fn is_placeholder(&self) -> bool {
        matches!(self, Slot::Placeholder)
    }

    pub fn row(&self) -> Option<&'a R> {
        match self {
            Slot::Row(row) => Some(row),
            Slot::Placeholder => None,
        }
    }
}

/// Arrived rows serialize as themselves, placeholders as `null`
impl<R: Serialize> Serialize for Slot<'_, R> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Slot::Row(row) => row.serialize(serializer),
            Slot::Placeholder => serializer.serialize_none(),
        }
    }
}

/// Lifecycle state of a loader
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoaderState {
    Idle,
    Running,
}

impl fmt::Display for LoaderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoaderState::Idle => write!(f, "idle"),
            LoaderState::Running => write!(f, "running"),
        }
    }
}

/// Options a loader is built from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoaderOptions {
    /// Lower bound of the random tick delay (inclusive)
    pub min_delay_ms: u64,
    /// Upper bound of the random tick delay (inclusive)
    pub max_delay_ms: u64,
    /// Rows revealed per tick
    pub step: usize,
    /// Begin running on creation instead of waiting for `start`
    pub auto_start: bool,
    /// Cursor value a (re)start resets to, clamped to the list length
    pub start_at: usize,
    /// Seed for the delay generator; entropy when absent
    pub seed: Option<u64>,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            min_delay_ms: 200,
            max_delay_ms: 1500,
            step: 2,
            auto_start: false,
            start_at: 0,
            seed: None,
        }
    }
}

impl LoaderOptions {
    pub fn delays(mut self, min_delay_ms: u64, max_delay_ms: u64) -> Self {
        self.min_delay_ms = min_delay_ms;
        self.max_delay_ms = max_delay_ms;
        self
    }

    pub fn step(mut self, step: usize) -> Self {
        self.step = step;
        self
    }

    pub fn auto_start(mut self, auto_start: bool) -> Self {
        self.auto_start = auto_start;
        self
    }

    pub fn start_at(mut self, start_at: usize) -> Self {
        self.start_at = start_at;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Reject options that cannot drive a loader
    pub fn validate(&self) -> LoaderResult<()> {
        if self.min_delay_ms > self.max_delay_ms {
            return Err(LoaderError::InvalidDelayRange {
                min: self.min_delay_ms,
                max: self.max_delay_ms,
            });
        }
        if self.step == 0 {
            return Err(LoaderError::InvalidStep);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Item(u32);

    impl Row for Item {
        fn key(&self) -> String {
            self.0.to_string()
        }

        fn fields(&self) -> Vec<(&'static str, String)> {
            vec![("id", self.0.to_string())]
        }
    }

    #[test]
    fn test_source_list_rejects_duplicate_keys() {
        let result = SourceList::new(vec![Item(1), Item(2), Item(1)]);
        assert_eq!(result.unwrap_err(), LoaderError::DuplicateKey("1".into()));
    }

    #[test]
    fn test_source_list_clones_share_rows() {
        let list = SourceList::new(vec![Item(1), Item(2)]).unwrap();
        let other = list.clone();
        assert!(list.same_source(&other));
        assert_eq!(other.len(), 2);

        let rebuilt = SourceList::new(vec![Item(1), Item(2)]).unwrap();
        assert!(!list.same_source(&rebuilt));
    }

    #[test]
    fn test_row_field_lookup() {
        assert_eq!(Item(7).field("id").as_deref(), Some("7"));
        assert_eq!(Item(7).field("name"), None);
    }

    #[test]
    fn test_default_options_are_valid() {
        let options = LoaderOptions::default();
        assert_eq!(options.step, 2);
        assert_eq!((options.min_delay_ms, options.max_delay_ms), (200, 1500));
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_options_validation() {
        let err = LoaderOptions::default().delays(1500, 200).validate();
        assert_eq!(
            err.unwrap_err(),
            LoaderError::InvalidDelayRange { min: 1500, max: 200 }
        );

        let err = LoaderOptions::default().step(0).validate();
        assert_eq!(err.unwrap_err(), LoaderError::InvalidStep);

        // Equal bounds are a fixed delay, not an error
        assert!(LoaderOptions::default().delays(300, 300).validate().is_ok());
    }
}
