use serde::{Deserialize, Serialize};

use std::{env, fs, path::Path};

const DEFAULT_HTTP_PORT: u16 = 8000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_http_port")]
    pub http_port: u16,
    pub storage: Storage,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum Storage {
    Postgres { dsn: String },
    Memory,
}

const fn default_http_port() -> u16 {
    DEFAULT_HTTP_PORT
}

fn parse_yaml(contents: &str) -> Result<Config, Box<dyn std::error::Error>> {
    serde_yaml::from_str(contents).map_err(Into::into)
}

fn load_from_env(
    var: impl Fn(&str) -> Option<String>,
) -> Result<Config, Box<dyn std::error::Error>> {
    let storage = match var("STORAGE_BACKEND").as_deref() {
        None | Some("postgres") => Storage::Postgres {
            dsn: var("PG_DSN").ok_or("PG_DSN environment variable is required")?,
        },
        Some("memory") => Storage::Memory,
        Some(other) => return Err(format!("Unknown STORAGE_BACKEND '{other}'").into()),
    };

    let http_port = match var("HTTP_PORT") {
        Some(port) => port
            .parse::<u16>()
            .map_err(|e| format!("Failed to parse HTTP_PORT: {e}"))?,
        None => DEFAULT_HTTP_PORT,
    };

    Ok(Config { http_port, storage })
}

/// Candidate config files in lookup order: the explicit path first, then the
/// local and example files.
fn candidate_paths(config_path: &str) -> Vec<String> {
    let mut paths = vec![config_path.to_string()];
    for fallback in ["config.yaml", "config.example.yaml"] {
        if !paths.iter().any(|p| p == fallback) {
            paths.push(fallback.to_string());
        }
    }
    paths
}

pub fn load_config() -> Result<Config, Box<dyn std::error::Error>> {
    let config_path =
        env::var("NOTE_STORE_CONFIG").unwrap_or_else(|_| "config.yaml".to_string());
    let candidates = candidate_paths(&config_path);

    if let Some(found) = candidates.iter().find(|p| Path::new(p).exists()) {
        if *found != config_path {
            tracing::warn!("Config file '{config_path}' not found, using '{found}' instead");
        }
        if found == "config.example.yaml" {
            tracing::warn!("'config.example.yaml' holds placeholder values, provide a real config");
        }
        return parse_yaml(&fs::read_to_string(found)?);
    }

    tracing::info!("No config file found, reading settings from the environment");
    load_from_env(|key| env::var(key).ok()).map_err(|e| {
        format!(
            "No config file among {candidates:?} and the environment is incomplete: {e}"
        )
        .into()
    })
}
