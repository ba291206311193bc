// Meter Synth CLI - Generation job
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! One generation job: plan, generate, write, and optionally record a
//! manifest.

use crate::cli::OutputFormat;
use anyhow::Context;
use meter_synth::manifest::EntityManifest;
use meter_synth::{
    export_flat, CancellationToken, ExportOutcome, GenerationConfig, GenerationManifest,
    NestedEncoder, Orchestrator,
};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use tracing::info;

/// Everything a job needs.
#[derive(Debug, Clone)]
pub struct Job {
    pub config: GenerationConfig,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
    pub manifest: Option<PathBuf>,
}

/// What a job produced.
#[derive(Debug)]
pub struct Report {
    pub outcome: ExportOutcome,
    pub manifest: GenerationManifest,
}

impl Job {
    /// Run against the configured output and manifest paths.
    pub fn run(&self, orchestrator: &Orchestrator, token: &CancellationToken) -> anyhow::Result<Report> {
        let mut writer: Box<dyn Write> = match &self.output {
            Some(path) => Box::new(BufWriter::new(
                File::create(path).with_context(|| format!("creating {}", path.display()))?,
            )),
            None => Box::new(BufWriter::new(std::io::stdout())),
        };
        let report = self.write(orchestrator, token, &mut writer)?;

        if let Some(ref path) = self.manifest {
            report
                .manifest
                .to_json_file(path)
                .with_context(|| format!("writing manifest {}", path.display()))?;
            info!("manifest written to {}", path.display());
        }
        Ok(report)
    }

    /// Generate into `writer`.
    pub fn write<W: Write>(
        &self,
        orchestrator: &Orchestrator,
        token: &CancellationToken,
        mut writer: W,
    ) -> anyhow::Result<Report> {
        let plan = orchestrator.plan(&self.config)?;
        info!(
            entities = plan.entities().len(),
            expected = plan.expected_reading_count(),
            profile = plan.profile().name(),
            "generating {:?} output",
            self.format
        );

        let report = match self.format {
            OutputFormat::Flat => {
                let entities = plan
                    .entities()
                    .iter()
                    .map(|e| EntityManifest {
                        internal_id: e.internal_id,
                        external_id: e.external_id.clone(),
                    })
                    .collect();
                let site = self.config.site.clone().unwrap_or_default();
                let outcome = export_flat(plan.into_stream(), &site, &mut writer, token)?;
                Report {
                    manifest: GenerationManifest::new(&self.config)
                        .with_entities(entities)
                        .with_actual_readings(outcome.rows()),
                    outcome,
                }
            }
            OutputFormat::Nested => {
                let result = plan.generate();
                let manifest = GenerationManifest::from_result(&result);
                if token.is_cancelled() {
                    Report {
                        outcome: ExportOutcome::Cancelled { rows: 0 },
                        manifest: manifest.with_actual_readings(0),
                    }
                } else {
                    NestedEncoder::new(self.config.granularity)
                        .to_writer(result.readings(), &mut writer)?;
                    writeln!(writer)?;
                    Report {
                        outcome: ExportOutcome::Completed {
                            rows: result.len() as u64,
                        },
                        manifest,
                    }
                }
            }
        };

        writer.flush()?;
        Ok(report)
    }
}
