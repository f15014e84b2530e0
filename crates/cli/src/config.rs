//! Process configuration read from the environment.

use anyhow::{Context, Result};
use dexflow_domain::prelude::Percentage;
use dexflow_execution::prelude::PlannerConfig;
use rust_decimal::Decimal;
use std::env;
use std::path::PathBuf;

/// Settings shared by every subcommand.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// PostgreSQL store when set; in-memory otherwise.
    pub database_url: Option<String>,
    /// Directory of compiled contract artifacts.
    pub artifacts_dir: Option<PathBuf>,
    pub api_host: String,
    pub api_port: u16,
    pub planner: PlannerConfig,
}

impl AppConfig {
    /// Reads `DATABASE_URL`, `SIGNING_BASE_URL`, `DEFAULT_SLIPPAGE_PCT`,
    /// `ARTIFACTS_DIR`, `API_HOST` and `API_PORT`.
    ///
    /// # Errors
    /// Returns an error when a variable is set but malformed.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mut planner = PlannerConfig::default();
        if let Some(url) = var("SIGNING_BASE_URL") {
            planner = planner.with_signing_base_url(url);
        }
        if let Some(raw) = var("DEFAULT_SLIPPAGE_PCT") {
            let value: Decimal = raw
                .trim()
                .parse()
                .with_context(|| format!("DEFAULT_SLIPPAGE_PCT '{raw}' is not a number"))?;
            planner = planner
                .with_default_slippage(Percentage::new(value))
                .context("DEFAULT_SLIPPAGE_PCT is out of range")?;
        }

        let api_port = match var("API_PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("API_PORT '{raw}' is not a port number"))?,
            None => 8080,
        };

        Ok(Self {
            database_url: var("DATABASE_URL"),
            artifacts_dir: var("ARTIFACTS_DIR").map(PathBuf::from),
            api_host: var("API_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            api_port,
            planner,
        })
    }
}
