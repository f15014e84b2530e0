pub mod address;
pub mod percentage;
pub mod price;

pub use address::Address;
pub use percentage::Percentage;
pub use price::{InitialPrice, PriceImpact};

use crate::token::TokenAmount;
use serde::{Deserialize, Serialize};

/// Reserves of one pool hop, oriented in the direction of the trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HopReserves {
    pub reserve_in: TokenAmount,
    pub reserve_out: TokenAmount,
}

impl HopReserves {
    pub fn new(reserve_in: TokenAmount, reserve_out: TokenAmount) -> Self {
        Self {
            reserve_in,
            reserve_out,
        }
    }
}
