//! Server configuration

use crate::cli::Cli;
use sentiserve_classifiers::{load_layered, ModelSettings};
use serde::{Deserialize, Serialize};

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address
    pub listen: String,

    /// Listen port
    pub port: u16,

    /// Largest accepted request body, JSON or multipart
    pub max_body_bytes: usize,

    /// The model to serve
    pub model: ModelSettings,
}

impl ServerConfig {
    /// Load configuration from file, `SENTISERVE__*` environment, then CLI overrides
    pub fn load(cli: &Cli) -> anyhow::Result<Self> {
        let mut config: Self = load_layered(Some(cli.config.as_path()), false)?;

        if let Some(listen) = &cli.listen {
            config.listen = listen.clone();
        }

        if let Some(port) = cli.port {
            config.port = port;
        }

        if let Some(backend) = cli.backend {
            config.model.backend = backend;
        }

        if let Some(cache_dir) = &cli.cache_dir {
            config.model.cache_dir = Some(cache_dir.clone());
        }

        config.model.validate()?;
        Ok(config)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: "0.0.0.0".to_string(),
            port: 8080,
            max_body_bytes: default_max_body_bytes(),
            model: ModelSettings::default(),
        }
    }
}

fn default_max_body_bytes() -> usize {
    10 * 1024 * 1024
}
