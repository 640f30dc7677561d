use serde::Deserialize;
use std::fs;
use std::path::Path;

const ENV_CONFIG_PATH: &str = "MATURITY_INTEL_CONFIG_PATH";
const DEFAULT_CONFIG_PATH: &str = "config.yaml";

fn default_max_context_chunks() -> usize {
    25
}

fn default_per_query_limit() -> usize {
    10
}

fn default_similarity_threshold() -> f64 {
    0.72
}

fn default_query_timeout_ms() -> u64 {
    5_000
}

fn default_insight_window_days() -> i64 {
    30
}

/// Context retrieval tuning
#[derive(Debug, Clone, Deserialize)]
pub struct RetrievalConfig {
    /// Cap on merged, deduplicated chunks per request
    #[serde(default = "default_max_context_chunks")]
    pub max_context_chunks: usize,
    /// Desired result count per semantic sub-query
    #[serde(default = "default_per_query_limit")]
    pub per_query_limit: usize,
    /// Minimum cosine similarity for a chunk to qualify
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f64,
    /// Deadline per retrieval sub-query
    #[serde(default = "default_query_timeout_ms")]
    pub query_timeout_ms: u64,
    /// External insights older than this are ignored
    #[serde(default = "default_insight_window_days")]
    pub insight_window_days: i64,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            max_context_chunks: default_max_context_chunks(),
            per_query_limit: default_per_query_limit(),
            similarity_threshold: default_similarity_threshold(),
            query_timeout_ms: default_query_timeout_ms(),
            insight_window_days: default_insight_window_days(),
        }
    }
}

/// YAML configuration file structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub retrieval: RetrievalConfig,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub retrieval: RetrievalConfig,
    pub port: u16,
    pub host: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            retrieval: RetrievalConfig::default(),
            port: 8080,
            host: "127.0.0.1".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment and config file
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);

        let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let config_path =
            std::env::var(ENV_CONFIG_PATH).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

        let retrieval = Self::load_config_file(&config_path)
            .map(|cf| cf.retrieval)
            .unwrap_or_default();

        Self {
            retrieval,
            port,
            host,
        }
    }

    /// Load configuration from YAML file
    fn load_config_file(path: &str) -> Option<ConfigFile> {
        let path = Path::new(path);

        if !path.exists() {
            tracing::debug!(path = %path.display(), "Config file not found, using defaults");
            return None;
        }

        match fs::read_to_string(path) {
            Ok(contents) => {
                let contents = contents.trim();
                if contents.is_empty() {
                    tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
                    return Some(ConfigFile::default());
                }

                match serde_yaml::from_str(contents) {
                    Ok(config) => {
                        tracing::info!(path = %path.display(), "Loaded configuration from file");
                        Some(config)
                    }
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "Failed to parse config file, using defaults");
                        None
                    }
                }
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read config file, using defaults");
                None
            }
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
