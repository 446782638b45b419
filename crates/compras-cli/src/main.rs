//! CLI application for grocery receipt tracking.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{category, compare, config, history, import, list, summary, Context};

/// Grocery receipts - Turn NFC-e receipts into shopping lists and spending reports
#[derive(Parser)]
#[command(name = "compras")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Path to the store snapshot (overrides store.path)
    #[arg(short, long, global = true)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import a receipt into a shopping list
    Import(import::ImportArgs),

    /// Manage shopping lists
    List(list::ListArgs),

    /// Manage categories
    Category(category::CategoryArgs),

    /// Show imported purchases
    History(history::HistoryArgs),

    /// Show monthly spending
    Summary(summary::SummaryArgs),

    /// Compare prices of a product across purchases
    Compare(compare::CompareArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let ctx = Context::new(cli.config.as_deref(), cli.store);

    // Execute command
    match cli.command {
        Commands::Import(args) => import::run(args, &ctx),
        Commands::List(args) => list::run(args, &ctx),
        Commands::Category(args) => category::run(args, &ctx),
        Commands::History(args) => history::run(args, &ctx),
        Commands::Summary(args) => summary::run(args, &ctx),
        Commands::Compare(args) => compare::run(args, &ctx),
        Commands::Config(args) => config::run(args, &ctx),
    }
}
