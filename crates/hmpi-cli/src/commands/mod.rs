pub mod dashboard;
pub mod score;
pub mod standards;
pub mod submit;

use hmpi_core::error::HmpiError;
use hmpi_core::session::{EnvSession, SessionProvider, StaticSession};
use hmpi_core::standards::{builtin, load_registry, StandardsRegistry};

use crate::StandardsSource;

/// Load the registry named by `--standards`, or the preset otherwise.
pub fn load_source(source: &StandardsSource) -> Result<StandardsRegistry, HmpiError> {
    let registry = match &source.standards {
        Some(path) => load_registry(path)?,
        None => builtin::preset_registry(&source.preset)?,
    };
    log::info!(
        "using '{}' (v{}) with {} limits for {} metal(s)",
        registry.name(),
        registry.version(),
        source.standard,
        registry.len()
    );
    Ok(registry)
}

/// `--user` wins over the environment.
pub fn session_for(user: Option<String>) -> Box<dyn SessionProvider> {
    match user {
        Some(user) => Box::new(StaticSession::new(user)),
        None => Box::new(EnvSession::new()),
    }
}
