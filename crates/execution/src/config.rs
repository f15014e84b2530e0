//! Planner configuration.

use dexflow_domain::math::DEFAULT_FEE_BPS;
use dexflow_domain::prelude::*;
use rust_decimal::Decimal;

/// Seconds a router call stays valid after the plan is built.
pub const DEFAULT_DEADLINE_SECS: u64 = 600;

/// Configuration shared by every command.
#[derive(Debug, Clone)]
pub struct PlannerConfig {
    /// Slippage tolerance used when the caller supplies none.
    pub default_slippage: Percentage,
    /// Router call validity window in seconds.
    pub deadline_secs: u64,
    /// Pool fee in basis points used for quotes.
    pub fee_bps: u32,
    /// Base URL of the signing front end, without trailing slash.
    pub signing_base_url: String,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            default_slippage: Percentage::new(Decimal::ONE), // 1%
            deadline_secs: DEFAULT_DEADLINE_SECS,
            fee_bps: DEFAULT_FEE_BPS,
            signing_base_url: "http://localhost:3000".to_string(),
        }
    }
}

impl PlannerConfig {
    /// Sets the signing base URL, dropping any trailing slash.
    #[must_use]
    pub fn with_signing_base_url(mut self, url: impl Into<String>) -> Self {
        self.signing_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Sets the default slippage tolerance.
    pub fn with_default_slippage(mut self, slippage: Percentage) -> Result<Self, DexError> {
        slippage.ensure_slippage()?;
        self.default_slippage = slippage;
        Ok(self)
    }

    /// Tolerance for a request: the caller's if given, the default otherwise.
    pub fn slippage_or_default(&self, requested: Option<Percentage>) -> Result<Percentage, DexError> {
        let slippage = requested.unwrap_or(self.default_slippage);
        slippage.ensure_slippage()?;
        Ok(slippage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_defaults() {
        let config = PlannerConfig::default();
        assert_eq!(config.default_slippage.value(), dec!(1));
        assert_eq!(config.deadline_secs, 600);
        assert_eq!(config.fee_bps, 30);
    }

    #[test]
    fn test_slippage_override() {
        let config = PlannerConfig::default();
        let pct = config
            .slippage_or_default(Some(Percentage::new(dec!(2.5))))
            .unwrap();
        assert_eq!(pct.value(), dec!(2.5));
        assert!(
            config
                .slippage_or_default(Some(Percentage::new(dec!(100))))
                .is_err()
        );
        assert!(config.clone().with_default_slippage(Percentage::new(dec!(-1))).is_err());
    }

    #[test]
    fn test_signing_url_trailing_slash() {
        let config = PlannerConfig::default().with_signing_base_url("https://sign.example/");
        assert_eq!(config.signing_base_url, "https://sign.example");
    }
}
