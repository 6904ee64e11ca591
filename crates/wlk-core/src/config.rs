//! Configuration for the wallet-link client.
//!
//! Configuration is stored in TOML format.
//!
//! # Example TOML
//!
//! ```toml
//! [wallet]
//! base_url = "https://backpack.app/ul/v1/"
//! cluster = "mainnet-beta"
//!
//! [app]
//! url = "exp://localhost:8081"
//! redirect_url = "exp://localhost:8081/--/onConnect"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse config file
    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkConfig {
    /// Wallet endpoint configuration
    #[serde(default)]
    pub wallet: WalletConfig,

    /// Dapp-side URL configuration
    #[serde(default)]
    pub app: AppConfig,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            wallet: WalletConfig::default(),
            app: AppConfig::default(),
        }
    }
}

/// Wallet endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletConfig {
    /// Base URL of the wallet's universal-link surface. Must end with '/'
    /// so entry-point paths join underneath it.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Target network identifier passed on every request.
    #[serde(default = "default_cluster")]
    pub cluster: String,
}

fn default_base_url() -> String {
    "https://backpack.app/ul/v1/".to_string()
}

fn default_cluster() -> String {
    "mainnet-beta".to_string()
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            cluster: default_cluster(),
        }
    }
}

/// Dapp-side URL configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application-identifying URL shown by the wallet during consent.
    #[serde(default = "default_app_url")]
    pub url: String,

    /// Deep link the wallet invokes to hand control back to the dapp.
    #[serde(default = "default_redirect_url")]
    pub redirect_url: String,
}

fn default_app_url() -> String {
    "exp://localhost:8081".to_string()
}

fn default_redirect_url() -> String {
    "exp://localhost:8081/--/onConnect".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            url: default_app_url(),
            redirect_url: default_redirect_url(),
        }
    }
}

impl LinkConfig {
    /// Load configuration from file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: LinkConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from custom path, or defaults when none is given
    pub fn load_from(custom_path: Option<&Path>) -> Result<Self, ConfigError> {
        match custom_path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.wallet.base_url.starts_with("http://")
            && !self.wallet.base_url.starts_with("https://")
        {
            return Err(ConfigError::ValidationError(format!(
                "Invalid wallet base_url '{}': must start with http:// or https://",
                self.wallet.base_url
            )));
        }
        if !self.wallet.base_url.ends_with('/') {
            return Err(ConfigError::ValidationError(format!(
                "Invalid wallet base_url '{}': must end with '/'",
                self.wallet.base_url
            )));
        }

        let valid_clusters = ["mainnet-beta", "testnet", "devnet", "localnet"];
        if !valid_clusters.contains(&self.wallet.cluster.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "Invalid cluster '{}'. Valid values: {:?}",
                self.wallet.cluster, valid_clusters
            )));
        }

        for (name, value) in [
            ("app url", &self.app.url),
            ("redirect_url", &self.app.redirect_url),
        ] {
            if !value.contains("://") {
                return Err(ConfigError::ValidationError(format!(
                    "Invalid {name} '{value}': must be an absolute URL"
                )));
            }
        }

        Ok(())
    }

    /// Generate a sample configuration file content
    pub fn sample_toml() -> &'static str {
        r#"# wallet-link client configuration

[wallet]
# Base URL of the wallet's universal-link surface (must end with '/')
base_url = "https://backpack.app/ul/v1/"
# Target network: "mainnet-beta", "testnet", "devnet", "localnet"
cluster = "mainnet-beta"

[app]
# Application-identifying URL shown by the wallet during consent
url = "exp://localhost:8081"
# Deep link the wallet invokes to hand control back to the dapp
redirect_url = "exp://localhost:8081/--/onConnect"
"#
    }
}
