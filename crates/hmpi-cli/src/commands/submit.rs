use hmpi_core::error::HmpiError;
use hmpi_core::import::read_samples_file;
use hmpi_core::store::JsonFileStore;
use std::path::Path;

use crate::commands::{load_source, session_for};
use crate::StandardsSource;

pub fn run(
    input_file: &Path,
    source: &StandardsSource,
    store_path: &Path,
    user: Option<String>,
) -> Result<(), HmpiError> {
    let registry = load_source(source)?;
    let session = session_for(user);
    let imported = read_samples_file(input_file)?;
    let mut store = JsonFileStore::open(store_path)?;

    let mut stored = 0;
    let mut rejected = 0;
    for sample in imported.samples {
        let name = sample.test_name.clone();
        match hmpi_core::submit_sample(
            &mut store,
            session.as_ref(),
            &registry,
            source.standard,
            sample,
        ) {
            Ok(record) => {
                stored += 1;
                let score = match record.hmpi_score {
                    Some(index) => format!("{index:.2} ({})", record.status),
                    None => record.status.to_string(),
                };
                println!("  {}  {:<24} {}", record.id, record.test_name, score);
            }
            // Without a user nothing else can succeed either.
            Err(e @ HmpiError::Unauthenticated) => return Err(e),
            Err(e) => {
                rejected += 1;
                eprintln!("  rejected '{}': {}", name, e);
            }
        }
    }

    eprintln!(
        "Stored {} sample(s) in {}{}",
        stored,
        store.path().display(),
        if rejected > 0 {
            format!(", {rejected} rejected")
        } else {
            String::new()
        }
    );
    if !imported.skipped_cells.is_empty() {
        eprintln!(
            "  {} cell(s) skipped during import",
            imported.skipped_cells.len()
        );
    }

    Ok(())
}

pub fn rescore(source: &StandardsSource, store_path: &Path) -> Result<(), HmpiError> {
    let registry = load_source(source)?;
    let mut store = JsonFileStore::open(store_path)?;
    let report = hmpi_core::rescore_all(&mut store, &registry, source.standard)?;

    println!(
        "Rescored against {} limits: {} complete, {} pending, {} invalid",
        source.standard, report.complete, report.pending, report.invalid
    );
    Ok(())
}
