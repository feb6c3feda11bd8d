//! TallyKV Binary
//!
//! Reads `SET` / `GET` / `EXIT` commands from stdin and answers on stdout.
//! Logs go to stderr (and optionally a file) so stdout carries only responses.

use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use clap::Parser;
use tallykv::log::LogRecovery;
use tallykv::shell::Session;
use tallykv::{Config, CorruptionPolicy, Engine};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// TallyKV
#[derive(Parser, Debug)]
#[command(name = "tallykv")]
#[command(about = "Minimal durable key-value store over an append-only log")]
#[command(version)]
struct Args {
    /// Append-only log file
    #[arg(short, long, default_value = "data.db")]
    data_file: PathBuf,

    /// Initial index capacity (rounded up to a power of two)
    #[arg(short = 'c', long, default_value = "16")]
    initial_capacity: usize,

    /// Load factor above which the index grows
    #[arg(short = 'l', long, default_value = "0.7")]
    max_load_factor: f64,

    /// Refuse to start if a malformed record is found before the end of the log
    #[arg(long)]
    strict: bool,

    /// Check the log, report what recovery would do, and exit
    #[arg(long)]
    verify: bool,

    /// Also append log output to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() {
    let args = Args::parse();

    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = match &args.log_file {
        Some(path) => match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => Some(
                fmt::layer()
                    .with_target(true)
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            ),
            Err(e) => {
                eprintln!("Failed to open log file {}: {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true).with_writer(io::stderr))
        .with(file_layer)
        .init();

    let policy = if args.strict {
        CorruptionPolicy::Fail
    } else {
        CorruptionPolicy::Skip
    };

    if args.verify {
        match LogRecovery::verify(&args.data_file, policy) {
            Ok(result) => {
                tracing::info!(
                    records = result.records_recovered,
                    skipped = result.records_skipped,
                    keys = result.keys,
                    torn_bytes = result.torn_bytes,
                    "log verified"
                );
                return;
            }
            Err(e) => {
                tracing::error!("Verification failed: {}", e);
                std::process::exit(1);
            }
        }
    }

    tracing::info!("TallyKV v{}", tallykv::VERSION);
    tracing::info!("Data file: {}", args.data_file.display());

    // Build config from args
    let config = Config::builder()
        .data_file(&args.data_file)
        .initial_capacity(args.initial_capacity)
        .max_load_factor(args.max_load_factor)
        .corruption_policy(policy)
        .build();

    // Open engine and replay the log
    let mut engine = match Engine::start(config) {
        Ok(e) => e,
        Err(e) => {
            tracing::error!("Failed to start engine: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("Key-value store ready, awaiting commands");

    let stdin = io::stdin();
    let stdout = io::stdout();
    let summary = {
        let mut session = Session::new(&mut engine, stdin.lock(), stdout.lock());
        match session.run() {
            Ok(summary) => summary,
            Err(e) => {
                tracing::error!("Session error: {}", e);
                std::process::exit(1);
            }
        }
    };

    tracing::debug!(
        commands = summary.commands,
        errors = summary.errors,
        "session finished"
    );

    if let Err(e) = engine.close() {
        tracing::error!("Failed to close engine: {}", e);
        std::process::exit(1);
    }
}
