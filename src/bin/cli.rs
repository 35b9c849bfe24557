//! segwal CLI
//!
//! Offline command-line interface for inspecting and exercising a log
//! directory. Every invocation opens the log, performs one operation, and
//! closes it; there is no daemon.

use clap::{Parser, Subcommand};
use segwal::{Config, Log, WalError};
use tracing_subscriber::{fmt, EnvFilter};

/// segwal CLI
#[derive(Parser, Debug)]
#[command(name = "segwal")]
#[command(about = "Segmented write-ahead log inspection tool")]
#[command(version)]
struct Args {
    /// Log directory
    #[arg(short, long, default_value = "./segwal_data")]
    dir: String,

    /// Store file cap in bytes (0 = default)
    #[arg(long, default_value = "0")]
    max_store_bytes: u64,

    /// Index file cap in bytes (0 = default, must be a multiple of 16)
    #[arg(long, default_value = "0")]
    max_index_bytes: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Append a record and print its id
    Append {
        /// The payload to append
        payload: String,
    },

    /// Read a record by id
    Read {
        /// The record id to read
        id: u64,
    },

    /// Drop whole segments at or below the watermark id
    Trim {
        /// The watermark id
        watermark: u64,
    },

    /// Show segment layout
    Stat,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,segwal=debug"));

    fmt().with_env_filter(filter).with_target(true).init();

    let args = Args::parse();

    let config = Config::builder()
        .max_store_size_bytes(args.max_store_bytes)
        .max_index_size_bytes(args.max_index_bytes)
        .build();

    let log = match Log::open(&args.dir, config) {
        Ok(log) => log,
        Err(e) => {
            eprintln!("Failed to open log at {}: {}", args.dir, e);
            std::process::exit(1);
        }
    };

    let result = run(&log, &args.command);

    if let Err(e) = log.close() {
        eprintln!("Failed to close log: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = result {
        eprintln!("ERROR: {}", e);
        std::process::exit(1);
    }
}

fn run(log: &Log, command: &Commands) -> segwal::Result<()> {
    match command {
        Commands::Append { payload } => {
            let id = log.append(payload.as_bytes())?;
            println!("{}", id);
        }
        Commands::Read { id } => match log.read(*id) {
            Ok(payload) => {
                // Try to print as UTF-8, fall back to hex
                match String::from_utf8(payload.clone()) {
                    Ok(s) => println!("{}", s),
                    Err(_) => println!("{:?}", payload),
                }
            }
            Err(WalError::RecordNotFound) => {
                println!("(nil)");
            }
            Err(e) => return Err(e),
        },
        Commands::Trim { watermark } => {
            log.trim(*watermark)?;
            println!("OK");
        }
        Commands::Stat => {
            println!("segments: {}", log.segment_count());
            println!("active:   {}", log.active_segment_id());
        }
    }

    Ok(())
}
