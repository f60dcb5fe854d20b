/// `load_config` module: reads the optional YAML publish defaults and injects the token from the environment.
///
/// The YAML file never holds secrets. The access token is only ever taken from
/// `GITHUB_TOKEN` (a `.env` file is honoured by `main`).
///
/// Accepted schema, every key optional:
///
/// ```yaml
/// publish:
///   repo: owner/name
///   path: Folder/prices.json
///   api_base: https://api.github.com
///   commit_message: Upload JSON file
///   timeout_secs: 30
/// ```
use anyhow::Result;
use metal_json_core::contract::SecretToken;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::{error, info, warn};

pub const TOKEN_ENV: &str = "GITHUB_TOKEN";

#[derive(Debug, Default, Deserialize)]
pub struct CliConfig {
    #[serde(default)]
    pub publish: PublishSection,
    #[serde(skip)]
    pub token: Option<SecretToken>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PublishSection {
    pub repo: Option<String>,
    pub path: Option<String>,
    pub api_base: Option<String>,
    pub commit_message: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// Loads the YAML config file and injects the token from the environment.
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

    let mut config: CliConfig = if config_content.trim().is_empty() {
        warn!(config_path = ?path_ref, "Config file is empty, using defaults");
        CliConfig::default()
    } else {
        match serde_yaml::from_str(&config_content) {
            Ok(conf) => {
                info!(config_path = ?path_ref, "Parsed config YAML successfully");
                conf
            }
            Err(e) => {
                error!(error = ?e, config_path = ?path_ref, "Failed to parse config YAML");
                return Err(anyhow::anyhow!("Failed to parse config YAML: {e}"));
            }
        }
    };

    config.token = token_from_env();
    Ok(config)
}

/// Config without a file: defaults plus the environment token.
pub fn env_only() -> CliConfig {
    CliConfig {
        token: token_from_env(),
        ..CliConfig::default()
    }
}

fn token_from_env() -> Option<SecretToken> {
    match std::env::var(TOKEN_ENV) {
        Ok(raw) if !raw.trim().is_empty() => {
            info!(token_set = true, "{TOKEN_ENV} found in env");
            Some(SecretToken::new(raw.trim()))
        }
        _ => {
            warn!("{TOKEN_ENV} environment variable not set");
            None
        }
    }
}
