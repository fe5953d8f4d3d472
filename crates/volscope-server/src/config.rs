//! Server configuration.

use std::net::{IpAddr, SocketAddr};
use std::path::Path;

use serde::{Deserialize, Serialize};

use volscope_analytics::AnalysisConfig;

use crate::error::{ServerError, ServerResult};

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Analyzer parameters
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5002
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            analysis: AnalysisConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> ServerResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ServerError::ReadConfig {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text and check the analysis parameters.
    pub fn from_toml(content: &str) -> ServerResult<Self> {
        let config: Self = toml::from_str(content)?;
        config.bind_addr()?;
        config.analysis.validate()?;
        Ok(config)
    }

    /// Socket address to listen on. `host` must be an IP address.
    pub fn bind_addr(&self) -> ServerResult<SocketAddr> {
        let ip: IpAddr = self.host.parse().map_err(|source| ServerError::InvalidHost {
            host: self.host.clone(),
            source,
        })?;
        Ok(SocketAddr::new(ip, self.port))
    }
}
