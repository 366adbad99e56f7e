//! Configuration loading from TOML.
//!
//! Reads `config.toml` and deserializes into strongly-typed structs.
//! Every field has a default, so a partial (or empty) file works.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;

use crate::types::DEFAULT_STARTING_BALANCE;

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub ledger: LedgerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LedgerConfig {
    /// Balance granted to auto-provisioned users.
    #[serde(default = "default_starting_balance")]
    pub starting_balance: f64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_starting_balance() -> f64 {
    DEFAULT_STARTING_BALANCE
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: default_host(), port: default_port() }
    }
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self { starting_balance: default_starting_balance() }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file. A missing file yields the
    /// defaults; a present-but-invalid file is an error.
    pub fn load(path: &str) -> Result<Self> {
        if !std::path::Path::new(path).exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        let config: AppConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {path}"))?;
        Ok(config)
    }
}
