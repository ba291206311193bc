// Meter Synth CLI - Synthetic meter reading generator
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! # Meter Synth CLI
//!
//! Generates synthetic interval readings and writes them in the flat or
//! nested wire format.
//!
//! ## Usage
//!
//! ```bash
//! # One day of half-hourly office readings, reproducible
//! meter-synth --start 2024-06-15 --seed 42
//!
//! # A year of 15-minute data for 50 retail sites, streamed to a file
//! meter-synth --start 2024-01-01 --end 2024-12-31 -g 15 -p Retail -n 50 -o retail.csv
//!
//! # Nested JSON from a configuration file, with a manifest
//! meter-synth --config run.json --format nested -o run.json.out -m run.manifest.json
//! ```
//!
//! Ctrl-C stops a flat export after the current reading; rows already
//! written are kept.

mod cli;
mod run;

use anyhow::Context;
use clap::Parser;
use cli::Args;
use meter_synth::{CancellationToken, Orchestrator};
use run::Job;
use std::process::ExitCode;
use tracing::{info, warn, Level};
use tracing_subscriber::EnvFilter;

/// Exit code after an interrupt.
const EXIT_INTERRUPTED: u8 = 130;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();
    init_tracing(&args.log_level);

    info!("meter-synth v{}", env!("CARGO_PKG_VERSION"));

    let orchestrator = Orchestrator::with_default_profiles();

    if args.list_profiles {
        for name in orchestrator.registry().names() {
            println!("{}", name);
        }
        return Ok(ExitCode::SUCCESS);
    }

    let config = args.to_config()?;

    if args.estimate {
        config.validate()?;
        println!("{}", config.expected_reading_count());
        return Ok(ExitCode::SUCCESS);
    }

    let token = CancellationToken::new();
    let signal_token = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupt received, stopping");
            signal_token.cancel();
        }
    });

    let job = Job {
        config,
        format: args.format,
        output: args.output.clone(),
        manifest: args.manifest.clone(),
    };
    let report = tokio::task::spawn_blocking(move || job.run(&orchestrator, &token))
        .await
        .context("generation task failed")??;

    if report.outcome.is_cancelled() {
        warn!("cancelled after {} readings", report.outcome.rows());
        return Ok(ExitCode::from(EXIT_INTERRUPTED));
    }

    info!(
        readings = report.outcome.rows(),
        expected = report.manifest.expected_readings,
        "done"
    );
    Ok(ExitCode::SUCCESS)
}

/// Install the subscriber. `RUST_LOG` wins over `--log-level`. Output goes
/// to stderr so stdout stays clean for readings.
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = match log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        };
        EnvFilter::from_default_env().add_directive(level.into())
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
