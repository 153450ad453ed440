//! Progressive Incremental Loader
//!
//! Simulates rows arriving over time into a table:
//!
//! - **types**: Row trait, immutable source list, slots and options
//! - **scheduler**: One-shot timers with a fresh random delay per tick
//! - **projector**: Real rows before the cursor, placeholders after it
//! - **controller**: The Idle/Running state machine publishing snapshots
//! - **error**: Error types
//!
//! # Example
//!
//! ```rust,no_run
//! use shimmer::loader::{Loader, LoaderOptions, Row, SourceList};
//!
//! struct Line(u32);
//!
//! impl Row for Line {
//!     fn key(&self) -> String {
//!         self.0.to_string()
//!     }
//!
//!     fn fields(&self) -> Vec<(&'static str, String)> {
//!         vec![("line", self.0.to_string())]
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let source = SourceList::new((0..10).map(Line).collect())?;
//!     let loader = Loader::new(source, LoaderOptions::default())?;
//!     let mut rx = loader.subscribe();
//!
//!     loader.start();
//!     while !rx.borrow_and_update().is_complete() {
//!         rx.changed().await?;
//!     }
//!
//!     loader.dispose();
//!     Ok(())
//! }
//! ```

pub mod controller;
pub mod error;
pub mod projector;
pub mod scheduler;
pub mod types;

pub use controller::Loader;
pub use error::{LoaderError, LoaderResult};
pub use projector::{project, Projection, Slots};
pub use scheduler::{DelayRange, Scheduler, TimerHandle};
pub use types::{LoaderOptions, LoaderState, Row, SourceList, Slot};
