use hmpi_core::import::read_samples_file;
use std::path::Path;

use crate::commands::load_source;
use crate::output;
use crate::StandardsSource;

pub fn run(
    input_file: &Path,
    source: &StandardsSource,
    output_format: &str,
    verbose: bool,
) -> Result<(), hmpi_core::error::HmpiError> {
    let registry = load_source(source)?;
    let imported = read_samples_file(input_file)?;

    for cell in &imported.skipped_cells {
        eprintln!(
            "  skipped row {} column '{}' ({}): {}",
            cell.row, cell.column, cell.text, cell.reason
        );
    }

    let results = hmpi_core::score_samples(&imported.samples, &registry, source.standard);

    match output_format {
        "json" => output::json::print(&results)?,
        _ => output::table::print_scores(&results, verbose),
    }

    Ok(())
}
