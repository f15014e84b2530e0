use crate::error::{DexError, Result};
use crate::token::TokenAmount;
use crate::value_objects::{HopReserves, InitialPrice, Percentage, PriceImpact};
use primitive_types::U256;
use rust_decimal::Decimal;

/// Default pool fee in basis points (0.3%).
pub const DEFAULT_FEE_BPS: u32 = 30;
/// Basis-point denominator.
pub const BPS_DENOMINATOR: u32 = 10_000;
/// Fractional places of the display price.
pub const PRICE_DISPLAY_PLACES: u32 = 8;

fn overflow() -> DexError {
    DexError::arithmetic("intermediate value overflowed 256 bits")
}

/// Calculates the output amount for a given input amount in a constant product pool (x * y = k).
///
/// formula: dy = y * dx / (x + dx)
/// taking fee into account: dy = y * (dx * (1 - fee)) / (x + (dx * (1 - fee)))
///
/// Both sides are scaled by 10000 so the fee never floors an intermediate value.
/// Any `Ok` result satisfies `0 < output < reserve_out`.
pub fn swap_output(
    reserve_in: TokenAmount,
    reserve_out: TokenAmount,
    amount_in: TokenAmount,
    fee_bps: u32,
) -> Result<TokenAmount> {
    if reserve_in.is_zero() || reserve_out.is_zero() {
        return Err(DexError::arithmetic("reserves must be positive"));
    }
    if amount_in.is_zero() {
        return Err(DexError::arithmetic("swap amount must be positive"));
    }
    if fee_bps >= BPS_DENOMINATOR {
        return Err(DexError::arithmetic(format!(
            "fee of {fee_bps} bps leaves nothing to swap"
        )));
    }

    let amount_in_with_fee = amount_in
        .0
        .checked_mul(U256::from(BPS_DENOMINATOR - fee_bps))
        .ok_or_else(overflow)?;
    let numerator = amount_in_with_fee
        .checked_mul(reserve_out.0)
        .ok_or_else(overflow)?;
    let denominator = reserve_in
        .0
        .checked_mul(U256::from(BPS_DENOMINATOR))
        .and_then(|scaled| scaled.checked_add(amount_in_with_fee))
        .ok_or_else(overflow)?;

    let amount_out = numerator / denominator;
    if amount_out.is_zero() {
        return Err(DexError::arithmetic(
            "swap amount is too small to produce any output",
        ));
    }

    Ok(TokenAmount(amount_out))
}

/// Output of a multi-hop swap, feeding each hop's output into the next.
pub fn routed_swap_output(
    hops: &[HopReserves],
    amount_in: TokenAmount,
    fee_bps: u32,
) -> Result<TokenAmount> {
    if hops.is_empty() {
        return Err(DexError::validation("a swap route needs at least one hop"));
    }
    hops.iter().try_fold(amount_in, |amount, hop| {
        swap_output(hop.reserve_in, hop.reserve_out, amount, fee_bps)
    })
}

/// Minimum acceptable amount after applying a slippage tolerance.
///
/// `floor(desired * (100 - slippage) / 100)`; never negative.
pub fn minimum_amount(desired: TokenAmount, slippage: Percentage) -> Result<TokenAmount> {
    slippage.ensure_slippage()?;

    // retained = mantissa / 10^scale, strictly positive after the range check
    let retained = Decimal::ONE_HUNDRED - slippage.value();
    let mantissa = u128::try_from(retained.mantissa())
        .map_err(|_| DexError::arithmetic("retained share must be positive"))?;
    let numerator = desired
        .0
        .checked_mul(U256::from(mantissa))
        .ok_or_else(overflow)?;
    let denominator = U256::from(100u64)
        .checked_mul(U256::exp10(retained.scale() as usize))
        .ok_or_else(overflow)?;

    Ok(TokenAmount(numerator / denominator))
}

/// Initial price of `token_amount` in terms of `paired_amount`.
///
/// Returns `paired * 10^decimals / token` together with the plain ratio rounded
/// half-up to [`PRICE_DISPLAY_PLACES`].
pub fn initial_price(
    token_amount: TokenAmount,
    paired_amount: TokenAmount,
    decimals: u8,
) -> Result<InitialPrice> {
    if token_amount.is_zero() {
        return Err(DexError::arithmetic("token amount must be positive"));
    }
    let scaled = paired_amount
        .0
        .checked_mul(U256::exp10(usize::from(decimals)))
        .ok_or_else(overflow)?
        / token_amount.0;
    let display = ratio_display(paired_amount.0, token_amount.0, PRICE_DISPLAY_PLACES)?;
    Ok(InitialPrice::new(TokenAmount(scaled), display))
}

/// Price impact of trading `amount_in` against `reserve_in`, in percent.
///
/// The result is an exact ratio, so it is strictly increasing in `amount_in` down to a single wei.
pub fn price_impact_percent(amount_in: TokenAmount, reserve_in: TokenAmount) -> Result<PriceImpact> {
    PriceImpact::new(amount_in, reserve_in)
}

/// Amount of token B matching `amount_a` at the pool's current ratio.
pub fn quote(
    amount_a: TokenAmount,
    reserve_a: TokenAmount,
    reserve_b: TokenAmount,
) -> Result<TokenAmount> {
    if amount_a.is_zero() {
        return Err(DexError::arithmetic("amount must be positive"));
    }
    if reserve_a.is_zero() || reserve_b.is_zero() {
        return Err(DexError::arithmetic("reserves must be positive"));
    }
    let numerator = amount_a.0.checked_mul(reserve_b.0).ok_or_else(overflow)?;
    Ok(TokenAmount(numerator / reserve_a.0))
}

/// Constant-product invariant `k = reserve0 * reserve1`, saturating at `U256::MAX`.
pub fn calculate_k(reserve0: TokenAmount, reserve1: TokenAmount) -> U256 {
    reserve0.0.saturating_mul(reserve1.0)
}

/// Formats `numerator / denominator` with `places` fractional digits, rounding half up.
fn ratio_display(numerator: U256, denominator: U256, places: u32) -> Result<String> {
    let scaled = numerator
        .checked_mul(U256::exp10(places as usize))
        .and_then(|v| v.checked_mul(U256::from(2u64)))
        .and_then(|v| v.checked_add(denominator))
        .ok_or_else(overflow)?;
    let rounded = scaled / (denominator * U256::from(2u64));

    let places = places as usize;
    let digits = format!("{:0>width$}", rounded.to_string(), width = places + 1);
    let (int_part, frac_part) = digits.split_at(digits.len() - places);
    if frac_part.is_empty() {
        Ok(int_part.to_string())
    } else {
        Ok(format!("{int_part}.{frac_part}"))
    }
}
