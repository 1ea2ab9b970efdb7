use hmpi_core::store::JsonFileStore;
use std::path::Path;

use crate::commands::session_for;
use crate::output;

pub fn run(
    store_path: &Path,
    user: Option<String>,
    output_format: &str,
) -> Result<(), hmpi_core::error::HmpiError> {
    let session = session_for(user);
    let store = JsonFileStore::open(store_path)?;
    let dashboard = hmpi_core::build_dashboard(&store, session.as_ref())?;

    match output_format {
        "json" => output::json::print(&dashboard)?,
        _ => output::table::print_dashboard(&dashboard),
    }

    Ok(())
}
