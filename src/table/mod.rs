//! Table widget collaborators
//!
//! - **columns**: Column schema derived from a sample row
//! - **render**: Text renderer drawing rows, placeholders and skeletons

pub mod columns;
pub mod render;

pub use columns::{build_columns, Column, ICON_COLUMN_WIDTH, MAX_COLUMN_WIDTH, MIN_COLUMN_WIDTH};
pub use render::{render_text, RenderOptions, TableView, SHIMMER};
