//! Shimmer CLI
//!
//! Runs the demo screens in a terminal:
//! - `table`: toggle-driven loader over generated file items
//! - `expenses`: auto-started loader over the expense tracker's list
//! - `config`: print a default config file

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use shimmer::budget::{Action, BudgetState, BudgetStore, Expense};
use shimmer::config::{generate_default_config, Config, LoggingConfig};
use shimmer::loader::{Loader, Projection, Row, Slot, SourceList};
use shimmer::sample;
use shimmer::table::{build_columns, render_text, Column, RenderOptions, TableView};
use std::path::PathBuf;
use std::time::Duration;
use tokio::time::Instant;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "shimmer")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Progressive list loading with shimmering placeholders")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: search standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load generated items into a shimmered table
    Table {
        /// Number of items (default: from config)
        #[arg(short = 'n', long)]
        count: Option<usize>,
        /// Rows revealed per tick
        #[arg(long)]
        step: Option<usize>,
        /// Minimum delay between ticks (ms)
        #[arg(long)]
        min_delay: Option<u64>,
        /// Maximum delay between ticks (ms)
        #[arg(long)]
        max_delay: Option<u64>,
        /// Seed for sample data and tick delays
        #[arg(long)]
        seed: Option<u64>,
        /// Toggle loading off after this many milliseconds
        #[arg(long)]
        stop_after_ms: Option<u64>,
        /// Draw every frame instead of only progress lines
        #[arg(short, long)]
        watch: bool,
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Load the expense list and show the budget summary
    Expenses {
        /// Add an expense as name=cost
        #[arg(short, long)]
        add: Vec<String>,
        /// Delete an expense by id
        #[arg(short, long)]
        delete: Vec<u64>,
        /// Set the budget
        #[arg(short, long)]
        budget: Option<u64>,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// One published projection, as written in JSON mode
#[derive(Serialize)]
struct Frame<'a, R> {
    at: DateTime<Utc>,
    started: bool,
    visible: usize,
    len: usize,
    rows: Vec<Slot<'a, R>>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Config decides the log format, so loading runs under a bootstrap
    // subscriber until the real one is installed
    let (config, origin) = tracing::subscriber::with_default(bootstrap_subscriber(), || {
        match &cli.config {
            Some(path) => Config::load_with_env(path).map(|config| (config, Some(path.clone()))),
            None => Config::load_default(),
        }
    })?;
    init_logging(&config.logging);

    match &origin {
        Some(path) => tracing::info!("Loaded config from {:?}", path),
        None => tracing::debug!("Using default config with environment overrides"),
    }

    match cli.command {
        Commands::Table {
            count,
            step,
            min_delay,
            max_delay,
            seed,
            stop_after_ms,
            watch,
            format,
        } => {
            let mut config = config;
            if let Some(count) = count {
                config.table.item_count = count;
            }
            if let Some(step) = step {
                config.loader.step = step;
            }
            if let Some(ms) = min_delay {
                config.loader.min_delay_ms = ms;
            }
            if let Some(ms) = max_delay {
                config.loader.max_delay_ms = ms;
            }
            if seed.is_some() {
                config.loader.seed = seed;
            }
            run_table(&config, stop_after_ms.map(Duration::from_millis), watch, format).await?;
        }

        Commands::Expenses { add, delete, budget } => {
            run_expenses(&config, add, delete, budget).await?;
        }

        Commands::Config { output } => {
            let content = generate_default_config();
            match output {
                Some(path) => {
                    std::fs::write(&path, content)?;
                    println!("Config written to {:?}", path);
                }
                None => print!("{}", content),
            }
        }
    }

    Ok(())
}

fn bootstrap_subscriber() -> impl tracing::Subscriber + Send + Sync {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("shimmer=info")),
        )
        .with_writer(std::io::stderr)
        .finish()
}

fn init_logging(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("shimmer={}", config.level).into());
    let registry = tracing_subscriber::registry().with(filter);

    if config.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

async fn run_table(
    config: &Config,
    stop_after: Option<Duration>,
    watch: bool,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let items = sample::create_list_items(config.table.item_count, config.loader.seed);
    let source = SourceList::new(items)?;
    let columns = sample::item_columns();
    let render = config.render_options();

    let loader = Loader::new(source, config.loader_options()?)?;
    let mut rx = loader.subscribe();
    tracing::info!(loader_id = %loader.id(), len = loader.len(), "Table screen ready");

    let initial = rx.borrow_and_update().clone();
    emit(&initial, &columns, &render, true, format)?;

    loader.start();
    let deadline = stop_after.map(|d| Instant::now() + d);

    loop {
        tokio::select! {
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let projection = rx.borrow_and_update().clone();
                let complete = projection.is_complete();
                emit(&projection, &columns, &render, watch || complete, format)?;
                if complete {
                    break;
                }
            }
            _ = sleep_until(deadline) => {
                tracing::info!("Toggling loading off");
                loader.stop();
                emit(&loader.snapshot(), &columns, &render, true, format)?;
                break;
            }
        }
    }

    loader.stop();
    Ok(())
}

async fn run_expenses(
    config: &Config,
    add: Vec<String>,
    delete: Vec<u64>,
    budget: Option<u64>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = BudgetStore::new(BudgetState {
        budget: config.budget.initial_budget,
        expenses: sample::expense_list(),
    });

    for entry in add {
        let (name, cost) = parse_expense(&entry)?;
        let id = store.state().next_id();
        store.dispatch(Action::AddExpense(Expense::new(id, name, cost)));
    }
    for id in delete {
        store.dispatch(Action::DeleteExpense(id));
    }
    if let Some(budget) = budget {
        store.dispatch(Action::SetBudget(budget));
    }

    let state = store.into_state();
    let columns = state
        .expenses
        .first()
        .map(build_columns)
        .unwrap_or_else(|| vec![Column::new("name", "name"), Column::new("cost", "cost")]);
    let render = config.render_options();

    let options = config.loader_options()?.auto_start(true);
    let loader = Loader::new(SourceList::new(state.expenses.clone())?, options)?;
    let mut rx = loader.subscribe();

    while !rx.borrow_and_update().is_complete() {
        if rx.changed().await.is_err() {
            break;
        }
    }
    emit(&loader.snapshot(), &columns, &render, true, OutputFormat::Text)?;
    loader.dispose();

    println!("Budget:    {}", state.budget);
    println!("Spent:     {}", state.spent());
    println!("Remaining: {}", state.remaining());
    if state.is_over_budget() {
        println!("Over budget by {}", state.overspend());
    }

    Ok(())
}

fn parse_expense(entry: &str) -> Result<(String, u64), Box<dyn std::error::Error>> {
    let (name, cost) = entry
        .split_once('=')
        .ok_or_else(|| format!("Expected name=cost, got {:?}", entry))?;
    Ok((name.trim().to_string(), cost.trim().parse()?))
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

fn emit<R: Row + Serialize>(
    projection: &Projection<R>,
    columns: &[Column],
    render: &RenderOptions,
    full: bool,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Json => {
            let frame = Frame {
                at: Utc::now(),
                started: projection.is_started(),
                visible: projection.visible(),
                len: projection.len(),
                rows: projection.to_vec(),
            };
            println!("{}", serde_json::to_string(&frame)?);
        }
        OutputFormat::Text if full => {
            println!("{}", render_text(&TableView::new(projection, columns), render));
        }
        OutputFormat::Text => {
            println!(
                "[{}] {}/{} rows loaded",
                Utc::now().format("%H:%M:%S%.3f"),
                projection.visible(),
                projection.len()
            );
        }
    }
    Ok(())
}
