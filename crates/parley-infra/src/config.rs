//! Client configuration loader for Parley.
//!
//! Reads `parley.toml` from the config directory (`~/.config/parley/` on
//! Linux) and deserializes it into [`ClientConfig`]. Falls back to defaults
//! when the file is missing or malformed, then applies environment overrides.

use std::path::{Path, PathBuf};

use anyhow::Context;

use parley_types::config::ClientConfig;

/// Name of the config file inside the config directory.
pub const CONFIG_FILE_NAME: &str = "parley.toml";

/// Overrides `api_base_url`.
pub const ENV_API_BASE_URL: &str = "PARLEY_API_BASE_URL";

/// Overrides `candidate_link_base`.
pub const ENV_CANDIDATE_LINK_BASE: &str = "PARLEY_CANDIDATE_LINK_BASE";

/// Platform config directory for Parley, if the platform has one.
pub fn default_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("parley"))
}

/// Load client configuration from `{config_dir}/parley.toml`.
///
/// - If the file does not exist, starts from [`ClientConfig::default()`].
/// - If the file exists but fails to read or parse, logs a warning and
///   starts from the default.
/// - `PARLEY_API_BASE_URL` and `PARLEY_CANDIDATE_LINK_BASE` override the
///   corresponding fields when set and non-empty.
pub async fn load_client_config(config_dir: &Path) -> ClientConfig {
    let config_path = config_dir.join(CONFIG_FILE_NAME);

    let mut config = match read_config_file(&config_path).await {
        Ok(Some(config)) => config,
        Ok(None) => {
            tracing::debug!(
                "No {CONFIG_FILE_NAME} found at {}, using defaults",
                config_path.display()
            );
            ClientConfig::default()
        }
        Err(err) => {
            tracing::warn!("{err:#}, using defaults");
            ClientConfig::default()
        }
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    config
}

async fn read_config_file(path: &Path) -> anyhow::Result<Option<ClientConfig>> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(err) => {
            return Err(err).with_context(|| format!("Failed to read {}", path.display()));
        }
    };
    let config = toml::from_str::<ClientConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(Some(config))
}

/// Apply environment overrides using `lookup` to read variables.
fn apply_env_overrides(config: &mut ClientConfig, lookup: impl Fn(&str) -> Option<String>) {
    let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

    if let Some(url) = non_empty(ENV_API_BASE_URL) {
        tracing::debug!("{ENV_API_BASE_URL} overrides api_base_url");
        config.api_base_url = url;
    }
    if let Some(base) = non_empty(ENV_CANDIDATE_LINK_BASE) {
        tracing::debug!("{ENV_CANDIDATE_LINK_BASE} overrides candidate_link_base");
        config.candidate_link_base = base;
    }
}
