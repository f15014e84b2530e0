use crate::enums::{ConfirmationStatus, LiquidityAction};
use crate::token::TokenAmount;
use crate::value_objects::Address;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::SessionId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PositionId(pub Uuid);

/// A requested liquidity change against a pool.
///
/// Created by the planner; only the external confirmation step mutates it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiquidityPosition {
    pub id: PositionId,
    pub pool_id: Uuid,
    /// Session whose steps realize this change.
    pub session_id: Option<SessionId>,
    /// Empty until a wallet connects.
    pub holder: Option<Address>,
    pub amount0: TokenAmount,
    pub amount1: TokenAmount,
    /// LP tokens burned; zero for adds.
    pub liquidity: TokenAmount,
    pub action: LiquidityAction,
    pub status: ConfirmationStatus,
    pub created_at: DateTime<Utc>,
}

impl LiquidityPosition {
    /// Creates a pending position record.
    #[allow(clippy::too_many_arguments)]
    pub fn pending(
        pool_id: Uuid,
        holder: Option<Address>,
        amount0: TokenAmount,
        amount1: TokenAmount,
        liquidity: TokenAmount,
        action: LiquidityAction,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: PositionId(Uuid::new_v4()),
            pool_id,
            session_id: None,
            holder,
            amount0,
            amount1,
            liquidity,
            action,
            status: ConfirmationStatus::Pending,
            created_at,
        }
    }

    /// Links the position to the session that carries its transactions.
    #[must_use]
    pub fn for_session(mut self, session_id: SessionId) -> Self {
        self.session_id = Some(session_id);
        self
    }
}
