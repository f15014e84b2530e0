//! Offline quote calculations.

use anyhow::{Context, Result};
use clap::Subcommand;
use dexflow_domain::math::{
    calculate_k, initial_price, minimum_amount, price_impact_percent, swap_output,
};
use dexflow_domain::prelude::*;
use rust_decimal::Decimal;

#[derive(Debug, Subcommand)]
pub enum QuoteCommand {
    /// Output of an exact-input swap against one pool
    Swap {
        #[arg(long)]
        reserve_in: String,
        #[arg(long)]
        reserve_out: String,
        #[arg(long)]
        amount_in: String,
        /// Pool fee in basis points
        #[arg(long, default_value_t = dexflow_domain::math::DEFAULT_FEE_BPS)]
        fee_bps: u32,
    },
    /// Minimum amount accepted under a slippage tolerance
    Min {
        #[arg(long)]
        amount: String,
        /// Tolerance in percent
        #[arg(long, default_value = "1")]
        slippage: Decimal,
    },
    /// Initial price of a new pool
    Price {
        /// Amount of the priced token
        #[arg(long)]
        amount_token: String,
        /// Amount of the paired asset
        #[arg(long)]
        amount_paired: String,
    },
    /// Price impact of a trade, in percent of the input reserve
    Impact {
        #[arg(long)]
        amount_in: String,
        #[arg(long)]
        reserve_in: String,
    },
}

/// Decimal places of the amounts given on the command line.
///
/// `None` means amounts are raw base units.
#[derive(Debug, Clone, Copy)]
pub struct Units(pub Option<u8>);

impl Units {
    fn parse(&self, label: &str, raw: &str) -> Result<TokenAmount> {
        let amount = match self.0 {
            Some(decimals) => TokenAmount::parse_units(raw, decimals),
            None => raw.parse(),
        };
        amount.with_context(|| format!("invalid {label} '{raw}'"))
    }

    fn show(&self, amount: TokenAmount) -> String {
        match self.0 {
            Some(decimals) => amount.format_units(decimals),
            None => amount.to_string(),
        }
    }

    fn decimals(&self) -> u8 {
        self.0.unwrap_or(NATIVE_DECIMALS)
    }
}

/// Runs a quote and returns its result as labelled rows.
///
/// # Errors
/// Returns an error when an amount is malformed or the math rejects the inputs.
pub fn run(command: &QuoteCommand, units: Units) -> Result<Vec<(String, String)>> {
    let rows = match command {
        QuoteCommand::Swap {
            reserve_in,
            reserve_out,
            amount_in,
            fee_bps,
        } => {
            let reserve_in = units.parse("reserve_in", reserve_in)?;
            let reserve_out = units.parse("reserve_out", reserve_out)?;
            let amount_in = units.parse("amount_in", amount_in)?;
            let amount_out = swap_output(reserve_in, reserve_out, amount_in, *fee_bps)?;
            let impact = price_impact_percent(amount_in, reserve_in)?;
            let k_before = calculate_k(reserve_in, reserve_out);
            let k_after = calculate_k(
                TokenAmount(reserve_in.0.saturating_add(amount_in.0)),
                TokenAmount(reserve_out.0 - amount_out.0),
            );
            vec![
                row("amount_out", units.show(amount_out)),
                row("price_impact_pct", impact),
                row("fee_bps", fee_bps),
                row("k_before", k_before),
                row("k_after", k_after),
            ]
        }
        QuoteCommand::Min { amount, slippage } => {
            let amount = units.parse("amount", amount)?;
            let minimum = minimum_amount(amount, Percentage::new(*slippage))?;
            vec![
                row("desired", units.show(amount)),
                row("slippage_pct", slippage.normalize()),
                row("minimum", units.show(minimum)),
            ]
        }
        QuoteCommand::Price {
            amount_token,
            amount_paired,
        } => {
            let token = units.parse("amount_token", amount_token)?;
            let paired = units.parse("amount_paired", amount_paired)?;
            let price = initial_price(token, paired, units.decimals())?;
            vec![
                row("price", price.display),
                row("price_scaled", price.scaled),
            ]
        }
        QuoteCommand::Impact {
            amount_in,
            reserve_in,
        } => {
            let amount_in = units.parse("amount_in", amount_in)?;
            let reserve_in = units.parse("reserve_in", reserve_in)?;
            let impact = price_impact_percent(amount_in, reserve_in)?;
            vec![row("price_impact_pct", impact)]
        }
    };
    Ok(rows)
}

fn row(label: &str, value: impl ToString) -> (String, String) {
    (label.to_string(), value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn value(rows: &[(String, String)], label: &str) -> String {
        rows.iter()
            .find(|(l, _)| l == label)
            .map(|(_, v)| v.clone())
            .unwrap()
    }

    #[test]
    fn test_swap_in_whole_units() {
        let rows = run(
            &QuoteCommand::Swap {
                reserve_in: "100".into(),
                reserve_out: "100000".into(),
                amount_in: "1".into(),
                fee_bps: 30,
            },
            Units(Some(18)),
        )
        .unwrap();
        assert!(value(&rows, "amount_out").starts_with("987.158"));
        assert_eq!(value(&rows, "price_impact_pct"), "1");
    }

    #[test]
    fn test_min_in_base_units() {
        let rows = run(
            &QuoteCommand::Min {
                amount: "1000".into(),
                slippage: dec!(1),
            },
            Units(None),
        )
        .unwrap();
        assert_eq!(value(&rows, "minimum"), "990");
    }

    #[test]
    fn test_price_and_impact() {
        let rows = run(
            &QuoteCommand::Price {
                amount_token: "1000".into(),
                amount_paired: "1".into(),
            },
            Units(Some(18)),
        )
        .unwrap();
        assert_eq!(value(&rows, "price"), "0.00100000");

        let rows = run(
            &QuoteCommand::Impact {
                amount_in: "5".into(),
                reserve_in: "100".into(),
            },
            Units(None),
        )
        .unwrap();
        assert_eq!(value(&rows, "price_impact_pct"), "5");
    }

    #[test]
    fn test_malformed_amount() {
        let err = run(
            &QuoteCommand::Impact {
                amount_in: "-5".into(),
                reserve_in: "100".into(),
            },
            Units(None),
        )
        .unwrap_err();
        assert!(err.to_string().contains("amount_in"));
    }
}
