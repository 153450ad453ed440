//! # Shimmer
//!
//! Progressive incremental list loader: reveals a fixed list of rows a few
//! at a time on a jittered timer, while a table keeps a slot for every row
//! and shimmers the ones that have not arrived yet.
//!
//! ## Modules
//!
//! - [`loader`]: Source list, tick scheduler, projector and state machine
//! - [`table`]: Column schema and text table renderer
//! - [`budget`]: Reducer-driven expense store
//! - [`sample`]: Sample rows for the demo screens
//! - [`config`]: TOML + environment configuration
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use shimmer::loader::{Loader, LoaderOptions, SourceList};
//! use shimmer::sample::{create_list_items, item_columns};
//! use shimmer::table::{render_text, RenderOptions, TableView};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let source = SourceList::new(create_list_items(20, Some(1)))?;
//!     let columns = item_columns();
//!
//!     let loader = Loader::new(source, LoaderOptions::default())?;
//!     let mut rx = loader.subscribe();
//!     loader.start();
//!
//!     loop {
//!         let projection = rx.borrow_and_update().clone();
//!         println!("{}", render_text(&TableView::new(&projection, &columns), &RenderOptions::default()));
//!         if projection.is_complete() {
//!             break;
//!         }
//!         rx.changed().await?;
//!     }
//!
//!     loader.stop();
//!     Ok(())
//! }
//! ```

pub mod budget;
pub mod config;
pub mod loader;
pub mod sample;
pub mod table;

// Re-export top-level types for convenience
pub use loader::{
    DelayRange, Loader, LoaderError, LoaderOptions, LoaderResult, LoaderState, Projection, Row,
    Scheduler, Slot, SourceList, TimerHandle,
};

pub use table::{build_columns, render_text, Column, RenderOptions, TableView};

pub use budget::{reduce, Action, BudgetState, BudgetStore, Expense};

pub use sample::{create_list_items, expense_list, item_columns, ExampleItem};

pub use config::{
    generate_default_config, BudgetConfig, Config, ConfigError, LoaderConfig, LoggingConfig,
    TableConfig,
};
