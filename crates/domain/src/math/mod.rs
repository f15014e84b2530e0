//! AMM math on exact base-unit quantities.

pub mod constant_product;

pub use constant_product::{
    BPS_DENOMINATOR, DEFAULT_FEE_BPS, PRICE_DISPLAY_PLACES, calculate_k, initial_price,
    minimum_amount, price_impact_percent, quote, routed_swap_output, swap_output,
};
