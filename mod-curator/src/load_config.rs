/// `load_config` module: loads a static YAML config (no secrets) and injects the
/// catalog API key from the environment.
///
/// # Responsibilities
/// - Parse the user-supplied YAML into the core [`SyncConfig`] plus catalog settings
/// - Inject `NEXUS_API_KEY`; its absence is a configuration error raised before any work
/// - Surface clear diagnostics for CLI and tests
///
/// # Errors
/// All errors use `anyhow::Error` and surface at the CLI boundary.
use anyhow::Result;
use mod_curator_core::config::{FetchConfig, SyncConfig};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};

pub const API_KEY_VAR: &str = "NEXUS_API_KEY";

/// Where and how to reach the catalog.
#[derive(Debug, Clone)]
pub struct CatalogSettings {
    pub base_url: String,
    pub api_key: String,
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CliConfig {
    pub sync: SyncConfig,
    pub catalog: CatalogSettings,
}

#[derive(Debug, Deserialize)]
struct CatalogSection {
    base_url: String,
    #[serde(default)]
    user_agent: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    input: PathBuf,
    output: PathBuf,
    catalog: CatalogSection,
    #[serde(default)]
    fetch: FetchConfig,
}

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<CliConfig> {
    let path_ref = path.as_ref();
    info!(config_path = ?path_ref, "Loading configuration from file");

    let config_content = match fs::read_to_string(path_ref) {
        Ok(content) => {
            info!(config_path = ?path_ref, "Config file read successfully");
            content
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to read config file");
            return Err(anyhow::anyhow!(
                "Failed to read config file {:?}: {}",
                path_ref,
                e
            ));
        }
    };

    let raw: RawConfig = match serde_yaml::from_str(&config_content) {
        Ok(conf) => {
            info!(config_path = ?path_ref, "Parsed config YAML successfully");
            conf
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to parse config YAML");
            return Err(anyhow::anyhow!("Failed to parse config YAML: {e}"));
        }
    };

    let api_key = match std::env::var(API_KEY_VAR) {
        Ok(key) if !key.trim().is_empty() => {
            info!("{API_KEY_VAR} found in env");
            key
        }
        Ok(_) => {
            error!("{API_KEY_VAR} is set but empty");
            anyhow::bail!("{API_KEY_VAR} environment variable is empty");
        }
        Err(e) => {
            error!(error = ?e, "{API_KEY_VAR} environment variable not set");
            anyhow::bail!("{API_KEY_VAR} environment variable not set: {e}");
        }
    };

    if raw.fetch.batch_size == 0 {
        anyhow::bail!("fetch.batch_size must be at least 1");
    }

    let sync = SyncConfig {
        input: raw.input,
        output: raw.output,
        fetch: raw.fetch,
        dry_run: false,
    };
    sync.trace_loaded();

    Ok(CliConfig {
        sync,
        catalog: CatalogSettings {
            base_url: raw.catalog.base_url,
            api_key,
            user_agent: raw.catalog.user_agent,
        },
    })
}
