// Meter Synth CLI - Command-line arguments
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Command-line arguments and their mapping onto a [`GenerationConfig`].

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, ValueEnum};
use meter_synth::{GenerationConfig, Granularity, MeasurementClass};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Synthetic smart-meter reading generator
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// JSON configuration file; flags override its fields
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// First day (YYYY-MM-DD)
    #[arg(long)]
    pub start: Option<NaiveDate>,

    /// Last day, inclusive (YYYY-MM-DD)
    #[arg(long)]
    pub end: Option<NaiveDate>,

    /// Period length in minutes (5, 15 or 30)
    #[arg(short, long, value_parser = parse_granularity)]
    pub granularity: Option<Granularity>,

    /// Consumption profile name
    #[arg(short, long)]
    pub profile: Option<String>,

    /// Measurement class (AI, AE, RI, RE)
    #[arg(long)]
    pub class: Option<MeasurementClass>,

    /// Number of entities (1-1000)
    #[arg(short = 'n', long)]
    pub entities: Option<usize>,

    /// Seed for reproducible output (implies --deterministic)
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Reproducible output without an explicit seed
    #[arg(short, long)]
    pub deterministic: bool,

    /// Explicit internal entity id (repeatable)
    #[arg(long = "entity-id")]
    pub entity_ids: Vec<Uuid>,

    /// Site label for the flat format
    #[arg(long)]
    pub site: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Flat)]
    pub format: OutputFormat,

    /// Output file (stdout when omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Write a run manifest to this file
    #[arg(short, long)]
    pub manifest: Option<PathBuf>,

    /// List available profiles and exit
    #[arg(long)]
    pub list_profiles: bool,

    /// Print the expected reading count and exit
    #[arg(long)]
    pub estimate: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

/// Wire format written by the CLI.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// One CSV row per reading, streamed
    Flat,
    /// Nested JSON document, generated eagerly
    Nested,
}

impl Args {
    /// Configuration file (if any) with flags applied on top.
    pub fn to_config(&self) -> anyhow::Result<GenerationConfig> {
        let base = match &self.config {
            Some(path) => load_config(path)?,
            None => GenerationConfig::default(),
        };
        Ok(self.apply(base))
    }

    /// Apply flags to `config`.
    pub fn apply(&self, mut config: GenerationConfig) -> GenerationConfig {
        if let Some(start) = self.start {
            config.start_date = start;
            // A lone --start means a single day
            if self.end.is_none() && self.config.is_none() {
                config.end_date = start;
            }
        }
        if let Some(end) = self.end {
            config.end_date = end;
        }
        if let Some(granularity) = self.granularity {
            config.granularity = granularity;
        }
        if let Some(ref profile) = self.profile {
            config.profile = profile.clone();
        }
        if let Some(class) = self.class {
            config.class = class;
        }
        if !self.entity_ids.is_empty() {
            config.entity_ids = self.entity_ids.clone();
            config.entity_count = self.entity_ids.len();
        }
        if let Some(n) = self.entities {
            config.entity_count = n;
        }
        if self.deterministic {
            config.deterministic = true;
        }
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        if let Some(ref site) = self.site {
            config.site = Some(site.clone());
        }
        config
    }
}

fn load_config(path: &Path) -> anyhow::Result<GenerationConfig> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("parsing config {}", path.display()))
}

fn parse_granularity(s: &str) -> Result<Granularity, String> {
    let minutes: u32 = s
        .trim()
        .trim_end_matches("min")
        .parse()
        .map_err(|_| format!("'{}' is not a number of minutes", s))?;
    Granularity::try_from(minutes).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn parse(args: &[&str]) -> Args {
        let mut argv = vec!["meter-synth"];
        argv.extend_from_slice(args);
        Args::try_parse_from(argv).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_defaults() {
        let args = parse(&[]);
        assert_eq!(args.format, OutputFormat::Flat);
        assert_eq!(args.to_config().unwrap(), GenerationConfig::default());
    }

    #[test]
    fn test_flags_applied() {
        let args = parse(&[
            "--start",
            "2024-02-01",
            "--end",
            "2024-02-29",
            "-g",
            "15",
            "--profile",
            "retail",
            "--class",
            "re",
            "-n",
            "4",
            "--seed",
            "9",
            "--site",
            "Depot",
            "--format",
            "nested",
        ]);
        let config = args.to_config().unwrap();
        assert_eq!(config.start_date, date(2024, 2, 1));
        assert_eq!(config.end_date, date(2024, 2, 29));
        assert_eq!(config.granularity, Granularity::FifteenMinutes);
        assert_eq!(config.profile, "retail");
        assert_eq!(config.class, MeasurementClass::RE);
        assert_eq!(config.entity_count, 4);
        assert!(config.deterministic);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.site.as_deref(), Some("Depot"));
        assert_eq!(args.format, OutputFormat::Nested);
    }

    #[test]
    fn test_lone_start_is_single_day() {
        let config = parse(&["--start", "2024-06-15"]).to_config().unwrap();
        assert_eq!(config.days(), 1);
    }

    #[test]
    fn test_granularity_rejected() {
        let argv = ["meter-synth", "-g", "10"];
        assert!(Args::try_parse_from(argv).is_err());
        assert_eq!(parse_granularity("30min"), Ok(Granularity::ThirtyMinutes));
    }

    #[test]
    fn test_entity_ids_set_count() {
        let config = parse(&[
            "--entity-id",
            "00000000-0000-0000-0000-000000000001",
            "--entity-id",
            "00000000-0000-0000-0000-000000000002",
        ])
        .to_config()
        .unwrap();
        assert_eq!(config.entity_count, 2);
        assert_eq!(config.entity_ids[1], Uuid::from_u128(2));
    }

    #[test]
    fn test_config_file_with_override() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"{{"start_date":"2024-03-01","end_date":"2024-03-31","profile":"DataCenter","entity_count":3}}"#
        )
        .unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let config = parse(&["--config", path.as_str(), "-n", "5"]).to_config().unwrap();
        assert_eq!(config.profile, "DataCenter");
        assert_eq!(config.entity_count, 5);
        assert_eq!(config.days(), 31);
    }

    #[test]
    fn test_config_file_missing() {
        let args = parse(&["--config", "/nonexistent/meter-synth.json"]);
        assert!(args.to_config().is_err());
    }
}
