use pocketshop_core::cart::{items_count, items_total};
use pocketshop_core::{user, CartItem, Order, Product, User};

use crate::sync::{initial_steps, SyncStep};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Uninitialized,
    Initializing,
    Ready,
    /// Initialization failed; the shop runs with empty data.
    Degraded,
}

/// Everything the presentation layer renders from. Published as a whole on
/// every change.
#[derive(Debug, Clone)]
pub struct ShopView {
    pub phase: Phase,
    pub sync_steps: Vec<SyncStep>,
    pub is_synced: bool,
    pub current_user: User,
    pub products: Vec<Product>,
    pub cart: Vec<CartItem>,
    /// Newest first.
    pub orders: Vec<Order>,
}

impl ShopView {
    pub fn new(current_user: User) -> Self {
        Self {
            phase: Phase::Uninitialized,
            sync_steps: initial_steps(),
            is_synced: false,
            current_user,
            products: Vec::new(),
            cart: Vec::new(),
            orders: Vec::new(),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.phase, Phase::Uninitialized | Phase::Initializing)
    }

    pub fn cart_total(&self) -> u64 {
        items_total(&self.cart)
    }

    pub fn cart_item_count(&self) -> u64 {
        items_count(&self.cart)
    }

    /// Distinct categories in catalog order.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for product in &self.products {
            if !seen.contains(&product.category.as_str()) {
                seen.push(&product.category);
            }
        }
        seen
    }

    /// Filter by a search term (name or id, case-insensitive) and an
    /// optional category.
    pub fn search_products(&self, term: &str, category: Option<&str>) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|p| category.is_none_or(|c| p.category == c))
            .filter(|p| term.is_empty() || p.matches_term(term))
            .collect()
    }

    pub fn users(&self) -> &'static [User] {
        user::users()
    }
}
