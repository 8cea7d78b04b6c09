use pocketshop_core::{Cart, Order, Product};

use crate::error::StorageError;

/// Durable records for the storefront: the catalog, one cart per user and
/// the order history.
pub trait Storage {
    fn product_count(&self) -> Result<u64, StorageError>;

    /// Seed `catalog` if no products are stored yet. Returns whether
    /// anything was written.
    fn initialize_catalog(&mut self, catalog: &[Product]) -> Result<bool, StorageError>;

    fn list_products(&self) -> Result<Vec<Product>, StorageError>;

    fn list_products_by_category(&self, category: &str) -> Result<Vec<Product>, StorageError>;

    fn get_product(&self, id: &str) -> Result<Option<Product>, StorageError>;

    /// The stored cart, or an empty one if the user has none yet.
    fn get_cart(&self, user_id: &str) -> Result<Cart, StorageError>;

    /// Replace the whole stored cart for `cart.user_id`.
    fn put_cart(&mut self, cart: &Cart) -> Result<(), StorageError>;

    /// Orders in unspecified order.
    fn list_orders_for_user(&self, user_id: &str) -> Result<Vec<Order>, StorageError>;

    /// Insert a new order. Orders are never overwritten.
    fn put_order(&mut self, order: &Order) -> Result<(), StorageError>;
}
