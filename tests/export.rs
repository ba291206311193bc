//! Streaming export and cooperative cancellation

use chrono::NaiveDate;
use meter_synth::*;
use std::fs;

fn config() -> GenerationConfig {
    GenerationConfig::new(
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
    )
    .with_entity_count(5)
    .with_seed(77)
    .with_site("Plant")
}

#[test]
fn test_streamed_file_matches_eager_encoding() {
    let orchestrator = Orchestrator::with_default_profiles();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("readings.csv");

    let stream = orchestrator.generate_streaming(&config()).unwrap();
    let file = fs::File::create(&path).unwrap();
    let outcome = export_flat(stream, "Plant", file, &CancellationToken::new()).unwrap();
    assert_eq!(outcome.rows(), expected_reading_count(&config()));

    let eager = orchestrator.generate(&config()).unwrap();
    let expected = wire::encode_flat_string(eager.readings(), "Plant").unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), expected);
}

#[test]
fn test_cancel_from_another_thread_keeps_partial_output() {
    let token = CancellationToken::new();
    let remote = token.clone();
    let (tx, rx) = std::sync::mpsc::sync_channel::<()>(0);

    let stream = Orchestrator::with_default_profiles()
        .generate_streaming(&config())
        .unwrap()
        .enumerate()
        .map(move |(i, r)| {
            if i == 1000 {
                // Hand control to the canceller and wait for it
                tx.send(()).unwrap();
                tx.send(()).unwrap();
            }
            r
        });

    let canceller = std::thread::spawn(move || {
        rx.recv().unwrap();
        remote.cancel();
        rx.recv().unwrap();
    });

    let mut out = Vec::new();
    let outcome = export_flat(stream, "Plant", &mut out, &token).unwrap();
    canceller.join().unwrap();

    assert_eq!(outcome, ExportOutcome::Cancelled { rows: 1000 });
    let text = String::from_utf8(out).unwrap();
    assert_eq!(text.lines().count(), 1001);
    // Last row is complete
    assert_eq!(text.lines().last().unwrap().split(',').count(), 8);
}

#[test]
fn test_manifest_for_streamed_export() {
    let orchestrator = Orchestrator::with_default_profiles();
    let plan = orchestrator.plan(&config()).unwrap();
    let entities = plan
        .entities()
        .iter()
        .map(|e| manifest::EntityManifest {
            internal_id: e.internal_id,
            external_id: e.external_id.clone(),
        })
        .collect();

    let mut out = Vec::new();
    let outcome = export_flat(plan.into_stream(), "Plant", &mut out, &CancellationToken::new()).unwrap();
    let manifest = GenerationManifest::new(&config())
        .with_entities(entities)
        .with_actual_readings(outcome.rows());

    assert!(manifest.is_complete());
    assert_eq!(manifest.entities.len(), 5);
    assert_eq!(manifest.effective_seed, Some(77));
}
