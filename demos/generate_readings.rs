//! Generate a week of readings for a few entities and print both wire
//! formats.
//!
//! Run with: cargo run --example generate_readings

use chrono::NaiveDate;
use meter_synth::wire::{encode_flat_string, NestedEncoder};
use meter_synth::{GenerationConfig, GenerationManifest, Granularity, Orchestrator};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = GenerationConfig::new(
        NaiveDate::from_ymd_opt(2024, 6, 10).ok_or("bad date")?,
        NaiveDate::from_ymd_opt(2024, 6, 16).ok_or("bad date")?,
    )
    .with_granularity(Granularity::ThirtyMinutes)
    .with_profile("Retail")
    .with_entity_count(3)
    .with_seed(42)
    .with_site("High Street");

    let orchestrator = Orchestrator::with_default_profiles();
    println!("Profiles: {}", orchestrator.registry().names().join(", "));

    let result = orchestrator.generate(&config)?;
    if let Some(stats) = result.stats() {
        println!(
            "{} readings for {} entities: min {} max {} mean {} total {}",
            stats.reading_count, stats.entity_count, stats.min, stats.max, stats.mean, stats.total
        );
    }

    for (internal, external) in result.entities() {
        println!("  {} -> {}", internal, external);
    }

    let csv = encode_flat_string(result.readings(), config.site.as_deref().unwrap_or(""))?;
    println!("\nFlat (first rows):");
    for line in csv.lines().take(5) {
        println!("  {}", line);
    }

    let first_day: Vec<_> = result
        .readings()
        .iter()
        .filter(|r| r.date() == config.start_date)
        .take(48)
        .cloned()
        .collect();
    let json = NestedEncoder::new(config.granularity).to_string(&first_day)?;
    println!("\nNested (first entity, first day): {} bytes", json.len());

    let manifest = GenerationManifest::from_result(&result);
    println!("\nManifest:\n{}", manifest.to_json()?);
    Ok(())
}
