//! boltnut CLI
//!
//! Command-line tools for boltnut database files.
//!
//! # Commands
//!
//! - `inspect` - Display file size and per-bucket key counts
//! - `buckets` - List bucket names
//! - `create-bucket` - Create a new bucket
//! - `dump` - Print the keys and values of one bucket

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// boltnut command-line database tools.
#[derive(Parser)]
#[command(name = "boltnut")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the database file
    #[arg(global = true, short, long)]
    path: Option<PathBuf>,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display file size and bucket statistics
    Inspect {
        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// List bucket names
    Buckets,

    /// Create a new bucket
    CreateBucket {
        /// Name of the bucket
        name: String,
    },

    /// Print the keys and values stored in a bucket
    Dump {
        /// Name of the bucket
        bucket: String,

        /// Maximum number of pairs to print
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Show version information
    Version,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Inspect { format } => {
            let path = cli.path.ok_or("Database path required for inspect")?;
            commands::inspect::run(&path, &format)?;
        }
        Commands::Buckets => {
            let path = cli.path.ok_or("Database path required for buckets")?;
            commands::buckets::list(&path)?;
        }
        Commands::CreateBucket { name } => {
            let path = cli.path.ok_or("Database path required for create-bucket")?;
            commands::buckets::create(&path, &name)?;
        }
        Commands::Dump { bucket, limit } => {
            let path = cli.path.ok_or("Database path required for dump")?;
            commands::dump::run(&path, &bucket, limit)?;
        }
        Commands::Version => {
            println!("boltnut CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("boltnut Core v{}", boltnut_core::VERSION);
        }
    }

    Ok(())
}
