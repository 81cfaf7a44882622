//! Engine configuration loading.
//!
//! - If the file does not exist, returns [`EngineConfig::default()`].
//! - If the file exists but fails to read or parse, logs a warning and
//!   returns the default.
//! - If the file exists and parses successfully, returns the parsed config.

use std::path::Path;

use reverie_types::config::EngineConfig;

/// Load `reverie.toml` from the given data directory.
pub async fn load_engine_config(data_dir: &Path) -> EngineConfig {
    let config_path = data_dir.join("reverie.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(
                "No reverie.toml found at {}, using defaults",
                config_path.display()
            );
            return EngineConfig::default();
        }
        Err(err) => {
            tracing::warn!(
                "Failed to read {}: {err}, using defaults",
                config_path.display()
            );
            return EngineConfig::default();
        }
    };

    match toml::from_str::<EngineConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            EngineConfig::default()
        }
    }
}
