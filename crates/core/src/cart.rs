use serde::{Deserialize, Serialize};

use crate::product::Product;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub product: Product,
    pub quantity: u32,
}

impl CartItem {
    pub fn line_total(&self) -> u64 {
        self.product.price * u64::from(self.quantity)
    }
}

/// One user's cart. Product ids are unique across `items` and every
/// quantity is at least 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    pub user_id: String,
    pub items: Vec<CartItem>,
}

impl Cart {
    pub fn empty(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            items: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn total(&self) -> u64 {
        items_total(&self.items)
    }

    pub fn item_count(&self) -> u64 {
        items_count(&self.items)
    }

    pub fn items_to_msgpack(&self) -> Result<Vec<u8>, rmp_serde::encode::Error> {
        rmp_serde::to_vec(&self.items)
    }

    pub fn items_from_msgpack(bytes: &[u8]) -> Result<Vec<CartItem>, rmp_serde::decode::Error> {
        rmp_serde::from_slice(bytes)
    }
}

pub fn items_total(items: &[CartItem]) -> u64 {
    items.iter().map(CartItem::line_total).sum()
}

pub fn items_count(items: &[CartItem]) -> u64 {
    items.iter().map(|item| u64::from(item.quantity)).sum()
}

/// Add `quantity` of `product`, merging into an existing line.
pub fn add_item(items: &mut Vec<CartItem>, product: Product, quantity: u32) {
    if quantity == 0 {
        return;
    }
    match items.iter_mut().find(|item| item.product.id == product.id) {
        Some(item) => item.quantity = item.quantity.saturating_add(quantity),
        None => items.push(CartItem { product, quantity }),
    }
}

pub fn remove_item(items: &mut Vec<CartItem>, product_id: &str) {
    items.retain(|item| item.product.id != product_id);
}

/// Replace a line's quantity in place. Zero or less removes the line.
pub fn set_quantity(items: &mut Vec<CartItem>, product_id: &str, quantity: i64) {
    if quantity <= 0 {
        remove_item(items, product_id);
        return;
    }
    let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
    if let Some(item) = items.iter_mut().find(|item| item.product.id == product_id) {
        item.quantity = quantity;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: &str, price: u64) -> Product {
        Product {
            id: id.into(),
            name: format!("Item {id}"),
            price,
            image: String::new(),
            description: String::new(),
            category: "Books".into(),
        }
    }

    #[test]
    fn add_merges_existing_line() {
        let mut items = Vec::new();
        add_item(&mut items, product("product-1", 10), 1);
        add_item(&mut items, product("product-2", 20), 1);
        add_item(&mut items, product("product-1", 10), 2);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].product.id, "product-1");
        assert_eq!(items[0].quantity, 3);
        assert_eq!(items_count(&items), 4);
        assert_eq!(items_total(&items), 50);
    }

    #[test]
    fn set_quantity_keeps_position() {
        let mut items = Vec::new();
        add_item(&mut items, product("product-1", 10), 1);
        add_item(&mut items, product("product-2", 20), 1);
        add_item(&mut items, product("product-3", 30), 1);
        set_quantity(&mut items, "product-2", 7);
        let ids: Vec<_> = items.iter().map(|i| i.product.id.as_str()).collect();
        assert_eq!(ids, ["product-1", "product-2", "product-3"]);
        assert_eq!(items[1].quantity, 7);
    }

    #[test]
    fn zero_quantity_equals_remove() {
        let mut a = Vec::new();
        add_item(&mut a, product("product-1", 10), 2);
        add_item(&mut a, product("product-2", 20), 1);
        let mut b = a.clone();
        set_quantity(&mut a, "product-1", 0);
        remove_item(&mut b, "product-1");
        assert_eq!(a, b);

        set_quantity(&mut a, "product-2", -3);
        assert!(a.is_empty());
    }

    #[test]
    fn set_quantity_on_missing_line_is_noop() {
        let mut items = Vec::new();
        add_item(&mut items, product("product-1", 10), 1);
        set_quantity(&mut items, "product-9", 4);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity, 1);
    }

    #[test]
    fn items_msgpack_roundtrip() {
        let mut cart = Cart::empty("user-1");
        add_item(&mut cart.items, product("product-4", 99), 2);
        let bytes = cart.items_to_msgpack().unwrap();
        let items = Cart::items_from_msgpack(&bytes).unwrap();
        assert_eq!(items, cart.items);
    }
}
