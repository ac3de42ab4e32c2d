//! castbase CLI
//!
//! Offline tools for the backing CSV file: inspect it, or clean it before
//! the server picks it up.

use std::path::PathBuf;
use std::process::ExitCode;

use castbase::storage;
use castbase::table::Table;
use castbase::{logging, Result};
use clap::{Parser, Subcommand};

/// castbase CLI
#[derive(Parser, Debug)]
#[command(name = "castbase-cli")]
#[command(about = "Inspect and clean the castbase CSV file")]
#[command(version)]
struct Args {
    /// Append-only log file
    #[arg(long, default_value = "friends_analysis.log")]
    log_file: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print shape, missing values and sample rows
    Inspect {
        /// CSV file to read
        #[arg(short, long, default_value = "friends_data.csv")]
        file: PathBuf,

        /// Number of sample rows to print
        #[arg(short, long, default_value = "5")]
        sample: usize,
    },

    /// Drop duplicate rows and fill missing cells
    Clean {
        /// CSV file to read
        #[arg(short, long, default_value = "friends_data.csv")]
        file: PathBuf,

        /// Where to write the cleaned file (defaults to overwriting the input)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(e) = logging::init(&args.log_file, false) {
        eprintln!("Failed to initialize logging: {}", e);
        return ExitCode::FAILURE;
    }

    let result = match args.command {
        Commands::Inspect { file, sample } => inspect(&file, sample),
        Commands::Clean { file, output } => clean(&file, output.as_deref()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn inspect(file: &std::path::Path, sample: usize) -> Result<()> {
    let table = storage::load_table(file)?;
    tracing::info!(path = %file.display(), rows = table.len(), "Loaded CSV for inspection");

    let summary = table.summary();

    println!("\n--- Basic Info ---");
    println!("rows: {}", summary.rows);
    println!("columns ({}): {}", summary.columns.len(), summary.columns.join(", "));

    println!("\n--- Missing Values ---");
    for (column, missing) in &summary.missing {
        println!("{:<20} {}", column, missing);
    }

    println!("\n--- Sample Rows ---");
    print_rows(&table, sample)?;

    Ok(())
}

fn clean(file: &std::path::Path, output: Option<&std::path::Path>) -> Result<()> {
    let target = output.unwrap_or(file);
    storage::ensure_file_target(target)?;

    let mut table = storage::load_table(file)?;

    let dropped = table.drop_duplicates();
    let filled = table.fill_missing();
    tracing::info!(dropped, filled, "Cleaned data (duplicates removed, missing filled)");

    storage::persist_table(target, &table)?;

    println!("Removed {} duplicate rows, filled {} missing cells", dropped, filled);
    println!(
        "Final dataset shape: ({}, {}) -> {}",
        table.len(),
        table.columns().len(),
        target.display()
    );

    Ok(())
}

fn print_rows(table: &Table, n: usize) -> Result<()> {
    for record in table.head(n) {
        println!("{}", serde_json::to_string(&table.render(record))?);
    }
    Ok(())
}
