use std::collections::HashSet;

use pocketshop_engine::{Phase, Shop, ShopConfig, SyncStatus};
use pocketshop_harness::{fixed_catalog, TestShop};
use pocketshop_storage::{FileUserContext, Storage, UserContext};

// ============================================================================
// Initialization
// ============================================================================

#[test]
fn initialize_loads_catalog_and_user() -> Result<(), Box<dyn std::error::Error>> {
    let t = TestShop::new()?;
    let view = t.shop.view();
    assert_eq!(view.phase, Phase::Ready);
    assert!(view.is_synced);
    assert_eq!(view.products, fixed_catalog());
    assert_eq!(view.current_user.id, "user-1");
    assert!(view.cart.is_empty());
    assert!(view.orders.is_empty());
    assert_eq!(view.categories(), ["Electronics", "Fashion", "Home", "Food", "Books"]);
    Ok(())
}

#[test]
fn observers_see_steps_then_ready() -> Result<(), Box<dyn std::error::Error>> {
    let mut t = TestShop::on_disk()?;
    let rx = t.shop.subscribe();
    assert_eq!(rx.borrow().phase, Phase::Uninitialized);
    assert!(rx.borrow().sync_steps.iter().all(|s| s.status == SyncStatus::Pending));

    t.shop.initialize()?;
    let view = rx.borrow();
    assert_eq!(view.phase, Phase::Ready);
    assert!(view.sync_steps.iter().all(|s| s.status == SyncStatus::Done));
    assert_eq!(view.products.len(), 100);
    Ok(())
}

#[test]
fn catalog_initialization_is_idempotent() -> Result<(), Box<dyn std::error::Error>> {
    let mut first = TestShop::on_disk()?;
    first.shop.initialize()?;
    let mut t = first.restart();
    t.shop.initialize()?;

    let storage = t.shop.storage().ok_or("store not open")?;
    assert_eq!(storage.product_count()?, 100);
    let products = storage.list_products()?;
    let ids: HashSet<_> = products.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids.len(), 100);
    // Restarted shop generated a different random catalog; the stored one wins.
    assert_eq!(products, fixed_catalog());
    Ok(())
}

#[test]
fn unopenable_store_degrades_to_empty() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let blocker = dir.path().join("not-a-dir");
    std::fs::write(&blocker, b"occupied")?;

    let mut shop = Shop::open(ShopConfig {
        data_dir: blocker,
        ..ShopConfig::default()
    });
    assert!(shop.initialize().is_err());

    let view = shop.view();
    assert_eq!(view.phase, Phase::Degraded);
    assert!(!view.is_synced);
    assert!(!view.is_loading());
    assert!(view.products.is_empty());
    assert!(view.cart.is_empty());
    assert!(view.orders.is_empty());
    Ok(())
}

// ============================================================================
// Restart
// ============================================================================

#[test]
fn cart_orders_and_user_survive_restart() -> Result<(), Box<dyn std::error::Error>> {
    let mut t = TestShop::on_disk()?;
    t.shop.initialize()?;
    t.shop.switch_user("user-2")?;
    t.shop.add_to_cart("product-3", 1)?;
    let order = t.shop.checkout()?.ok_or("expected an order")?;
    t.shop.add_to_cart("product-4", 2)?;

    let mut t = t.restart();
    t.shop.initialize()?;
    assert_eq!(t.shop.current_user().id, "user-2");
    let cart = t.shop.cart();
    assert_eq!(cart.len(), 1);
    assert_eq!(cart[0].product.id, "product-4");
    assert_eq!(cart[0].quantity, 2);
    assert_eq!(t.shop.orders(), vec![order]);
    Ok(())
}

// ============================================================================
// User switching
// ============================================================================

#[test]
fn switch_round_trip_restores_cart() -> Result<(), Box<dyn std::error::Error>> {
    let mut t = TestShop::new()?;
    t.shop.add_to_cart("product-1", 2)?;
    t.shop.add_to_cart("product-2", 1)?;
    let before = t.shop.cart();

    t.shop.switch_user("user-3")?;
    assert_eq!(t.shop.current_user().id, "user-3");
    assert!(t.shop.cart().is_empty());
    t.shop.add_to_cart("product-9", 1)?;

    t.shop.switch_user("user-1")?;
    assert_eq!(t.shop.cart(), before);

    t.shop.switch_user("user-3")?;
    let ids: Vec<_> = t.shop.cart().into_iter().map(|i| i.product.id).collect();
    assert_eq!(ids, ["product-9"]);
    Ok(())
}

#[test]
fn switch_scopes_orders() -> Result<(), Box<dyn std::error::Error>> {
    let mut t = TestShop::new()?;
    t.shop.add_to_cart("product-1", 1)?;
    t.shop.checkout()?;

    t.shop.switch_user("user-2")?;
    assert!(t.shop.orders().is_empty());
    t.shop.switch_user("user-1")?;
    assert_eq!(t.shop.orders().len(), 1);
    Ok(())
}

#[test]
fn unknown_user_falls_back_to_default() -> Result<(), Box<dyn std::error::Error>> {
    let mut t = TestShop::new()?;
    t.shop.switch_user("user-2")?;
    t.shop.switch_user("mallory")?;
    assert_eq!(t.shop.current_user().id, "user-1");
    Ok(())
}

#[test]
fn switch_persists_current_user_id() -> Result<(), Box<dyn std::error::Error>> {
    let mut t = TestShop::on_disk()?;
    t.shop.initialize()?;
    t.shop.switch_user("user-3")?;

    let dir = t.data_dir().ok_or("no data dir")?;
    assert_eq!(FileUserContext::new(dir).current_user_id(), "user-3");
    Ok(())
}

#[test]
fn switch_failure_keeps_current_user() -> Result<(), Box<dyn std::error::Error>> {
    let mut t = TestShop::new()?;
    t.shop.add_to_cart("product-1", 1)?;
    t.shop
        .storage()
        .ok_or("store not open")?
        .conn()
        .execute_batch("DROP TABLE carts")?;

    assert!(t.shop.switch_user("user-2").is_err());
    assert_eq!(t.shop.current_user().id, "user-1");
    assert_eq!(t.shop.cart().len(), 1);
    Ok(())
}
