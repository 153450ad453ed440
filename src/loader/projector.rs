//! Render Projector
//!
//! Turns a source list and a reveal cursor into what a table draws: real
//! rows before the cursor and placeholders after it. Once loading has
//! begun the projection always spans the whole list so the table keeps
//! stable row slots while placeholders shimmer in place.

use super::types::{SourceList, Slot};
use std::fmt;
use std::iter::FusedIterator;

/// Snapshot published to the hosting view
pub enum Projection<R> {
    /// No load has started; the table shows a generic skeleton
    NotStarted,
    /// Loading began; `visible` rows have arrived
    Loading { source: SourceList<R>, visible: usize },
}

/// Project a source list at a given cursor
pub fn project<R>(source: &SourceList<R>, cursor: usize, started: bool) -> Projection<R> {
    if !started {
        return Projection::NotStarted;
    }
    Projection::Loading {
        source: source.clone(),
        visible: cursor.min(source.len()),
    }
}

impl<R> Projection<R> {
    pub fn is_started(&self) -> bool {
        matches!(self, Projection::Loading { .. })
    }

    /// The table should draw its generic skeleton
    pub fn shimmer_enabled(&self) -> bool {
        !self.is_started()
    }

    /// Number of slots (N once started, 0 before)
    pub fn len(&self) -> usize {
        match self {
            Projection::NotStarted => 0,
            Projection::Loading { source, .. } => source.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of real rows
    pub fn visible(&self) -> usize {
        match self {
            Projection::NotStarted => 0,
            Projection::Loading { visible, .. } => *visible,
        }
    }

    pub fn placeholders(&self) -> usize {
        self.len() - self.visible()
    }

    /// Every row has arrived
    pub fn is_complete(&self) -> bool {
        self.is_started() && self.visible() == self.len()
    }

    pub fn slots(&self) -> Slots<'_, R> {
        match self {
            Projection::NotStarted => Slots {
                rows: &[],
                visible: 0,
                index: 0,
            },
            Projection::Loading { source, visible } => Slots {
                rows: &source[..],
                visible: *visible,
                index: 0,
            },
        }
    }

    /// Only the rows that have arrived
    pub fn revealed(&self) -> &[R] {
        match self {
            Projection::NotStarted => &[],
            Projection::Loading { source, visible } => &source[..*visible],
        }
    }

    pub fn to_vec(&self) -> Vec<Slot<'_, R>> {
        self.slots().collect()
    }
}

impl<R> Clone for Projection<R> {
    fn clone(&self) -> Self {
        match self {
            Projection::NotStarted => Projection::NotStarted,
            Projection::Loading { source, visible } => Projection::Loading {
                source: source.clone(),
                visible: *visible,
            },
        }
    }
}

impl<R> PartialEq for Projection<R> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Projection::NotStarted, Projection::NotStarted) => true,
            (
                Projection::Loading { source, visible },
                Projection::Loading {
                    source: other_source,
                    visible: other_visible,
                },
            ) => source.same_source(other_source) && visible == other_visible,
            _ => false,
        }
    }
}

impl<R> fmt::Debug for Projection<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Projection::NotStarted => write!(f, "NotStarted"),
            Projection::Loading { source, visible } => f
                .debug_struct("Loading")
                .field("visible", visible)
                .field("len", &source.len())
                .finish(),
        }
    }
}

/// Iterator over the slots of a projection
pub struct Slots<'a, R> {
    rows: &'a [R],
    visible: usize,
    index: usize,
}

impl<'a, R> Iterator for Slots<'a, R> {
    type Item = Slot<'a, R>;

    fn next(&mut self) -> Option<Self::Item> {
        let row = self.rows.get(self.index)?;
        let slot = if self.index < self.visible {
            Slot::Row(row)
        } else {
            Slot::Placeholder
        };
        self.index += 1;
        Some(slot)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.rows.len() - self.index;
        (remaining, Some(remaining))
    }
}

impl<R> ExactSizeIterator for Slots<'_, R> {}

impl<R> FusedIterator for Slots<'_, R> {}
