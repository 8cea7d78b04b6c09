//! Cart invariants over arbitrary sequences of add/remove/update.

use std::collections::HashSet;

use pocketshop_harness::TestShop;
use pocketshop_storage::Storage;
use proptest::prelude::*;
use proptest::test_runner::Config;

#[derive(Debug, Clone)]
enum CartOp {
    Add(u32, u32),
    Remove(u32),
    Update(u32, i64),
}

fn product_id(n: u32) -> String {
    format!("product-{n}")
}

/// Ids 1..=12 keep collisions frequent; 0 is never in the catalog.
fn cart_op() -> impl Strategy<Value = CartOp> {
    prop_oneof![
        (0u32..=12, 1u32..4).prop_map(|(p, q)| CartOp::Add(p, q)),
        (0u32..=12).prop_map(CartOp::Remove),
        (0u32..=12, -2i64..6).prop_map(|(p, q)| CartOp::Update(p, q)),
    ]
}

fn apply(t: &mut TestShop, op: &CartOp) -> Result<(), TestCaseError> {
    match *op {
        CartOp::Add(p, q) => t.shop.add_to_cart(&product_id(p), q)?,
        CartOp::Remove(p) => t.shop.remove_from_cart(&product_id(p))?,
        CartOp::Update(p, q) => t.shop.update_quantity(&product_id(p), q)?,
    }
    Ok(())
}

proptest! {
    #![proptest_config(Config::with_cases(64))]

    #[test]
    fn cart_stays_well_formed(ops in prop::collection::vec(cart_op(), 0..40)) {
        let mut t = TestShop::new()?;
        for op in &ops {
            apply(&mut t, op)?;

            let cart = t.shop.cart();
            let summed: u64 = cart.iter().map(|i| u64::from(i.quantity)).sum();
            prop_assert_eq!(t.shop.cart_item_count(), summed);
            prop_assert!(cart.iter().all(|i| i.quantity >= 1));
            let unique: HashSet<_> = cart.iter().map(|i| i.product.id.as_str()).collect();
            prop_assert_eq!(unique.len(), cart.len());
        }

        let user = t.shop.current_user();
        let stored = t.shop.storage().ok_or_else(|| TestCaseError::fail("store not open"))?.get_cart(user.id)?;
        prop_assert_eq!(stored.items, t.shop.cart());
    }

    #[test]
    fn nonpositive_update_equals_remove(
        ops in prop::collection::vec(cart_op(), 0..20),
        target in 1u32..=12,
        quantity in -3i64..=0,
    ) {
        let mut a = TestShop::new()?;
        let mut b = TestShop::new()?;
        for op in &ops {
            apply(&mut a, op)?;
            apply(&mut b, op)?;
        }

        a.shop.update_quantity(&product_id(target), quantity)?;
        b.shop.remove_from_cart(&product_id(target))?;
        prop_assert_eq!(a.shop.cart(), b.shop.cart());
    }
}
