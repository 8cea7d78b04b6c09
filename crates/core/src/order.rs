use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cart::{items_total, CartItem};
use crate::error::CoreError;
use crate::ids::OrderId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Completed,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
        }
    }

    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            _ => Err(CoreError::InvalidData(format!("unknown order status: {s}"))),
        }
    }
}

/// A placed order. The item snapshot and total are fixed at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub user_id: String,
    pub items: Vec<CartItem>,
    pub total: u64,
    pub created_at: DateTime<Utc>,
    pub status: OrderStatus,
}

impl Order {
    /// Mint a completed order from a cart snapshot.
    pub fn checkout(user_id: impl Into<String>, items: &[CartItem]) -> Self {
        Self {
            id: OrderId::new(),
            user_id: user_id.into(),
            items: items.to_vec(),
            total: items_total(items),
            created_at: Utc::now(),
            status: OrderStatus::Completed,
        }
    }
}

/// Newest first, ties broken by id so the ordering is stable.
pub fn sort_newest_first(orders: &mut [Order]) {
    orders.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));
}
