pub mod config;
pub mod error;
pub mod notify;
pub mod scan;
pub mod sync;
pub mod view;

pub use config::{ConfigError, ShopConfig};
pub use error::EngineError;
pub use notify::{Notification, NotificationKind, Notifier};
pub use scan::match_scanned_product;
pub use sync::{SyncStatus, SyncStep, SyncStepId};
pub use view::{Phase, ShopView};

use std::path::PathBuf;

use pocketshop_core::{
    cart,
    catalog,
    order::sort_newest_first,
    user::{self, find_user, resolve_user},
    Cart, CartItem, Order, Product, User,
};
use pocketshop_storage::{FileUserContext, SqliteStorage, Storage, UserContext};
use tokio::sync::watch;
use tracing::{debug, error, info, instrument, warn};

enum StorageSource {
    File(PathBuf),
    /// Caller-supplied store; reopening falls back to a fresh in-memory one.
    InMemory,
}

/// Data gathered by `initialize` before it is published in one update.
struct Loaded {
    products: Vec<Product>,
    user: User,
    cart: Vec<CartItem>,
    orders: Vec<Order>,
}

/// The application state controller: the only writer to the store and the
/// owner of the published [`ShopView`].
///
/// Every mutation persists first and publishes second. If the write fails
/// the view is left untouched and the error is returned.
pub struct Shop {
    config: ShopConfig,
    source: StorageSource,
    storage: Option<SqliteStorage>,
    user_context: Box<dyn UserContext + Send>,
    catalog: Option<Vec<Product>>,
    view: watch::Sender<ShopView>,
}

impl Shop {
    /// File-backed shop under `config.data_dir`. Nothing is opened until
    /// [`Shop::initialize`].
    pub fn open(config: ShopConfig) -> Self {
        let user_context = FileUserContext::new(&config.data_dir);
        let source = StorageSource::File(config.database_path());
        Self::build(config, source, None, Box::new(user_context))
    }

    /// File-backed shop configured from `POCKETSHOP_*` environment variables.
    pub fn from_env() -> Result<Self, EngineError> {
        Ok(Self::open(ShopConfig::from_env()?))
    }

    /// Shop over an already opened store.
    pub fn with_storage(
        config: ShopConfig,
        storage: SqliteStorage,
        user_context: impl UserContext + Send + 'static,
    ) -> Self {
        Self::build(config, StorageSource::InMemory, Some(storage), Box::new(user_context))
    }

    fn build(
        config: ShopConfig,
        source: StorageSource,
        storage: Option<SqliteStorage>,
        user_context: Box<dyn UserContext + Send>,
    ) -> Self {
        let current_user = *resolve_user(&user_context.current_user_id());
        let (view, _) = watch::channel(ShopView::new(current_user));
        Self {
            config,
            source,
            storage,
            user_context,
            catalog: None,
            view,
        }
    }

    /// Seed this catalog instead of a freshly generated one.
    pub fn with_catalog(mut self, catalog: Vec<Product>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    pub fn config(&self) -> &ShopConfig {
        &self.config
    }

    pub fn subscribe(&self) -> watch::Receiver<ShopView> {
        self.view.subscribe()
    }

    pub fn view(&self) -> watch::Ref<'_, ShopView> {
        self.view.borrow()
    }

    pub fn phase(&self) -> Phase {
        self.view.borrow().phase
    }

    pub fn current_user(&self) -> User {
        self.view.borrow().current_user
    }

    pub fn users(&self) -> &'static [User] {
        user::users()
    }

    pub fn products(&self) -> Vec<Product> {
        self.view.borrow().products.clone()
    }

    pub fn cart(&self) -> Vec<CartItem> {
        self.view.borrow().cart.clone()
    }

    pub fn orders(&self) -> Vec<Order> {
        self.view.borrow().orders.clone()
    }

    pub fn cart_total(&self) -> u64 {
        self.view.borrow().cart_total()
    }

    pub fn cart_item_count(&self) -> u64 {
        self.view.borrow().cart_item_count()
    }

    pub fn storage(&self) -> Option<&SqliteStorage> {
        self.storage.as_ref()
    }

    /// The store, opened on first use.
    fn store(&mut self) -> Result<&mut SqliteStorage, EngineError> {
        let storage = match self.storage.take() {
            Some(storage) => storage,
            None => match &self.source {
                StorageSource::File(path) => {
                    if let Some(dir) = path.parent() {
                        std::fs::create_dir_all(dir).map_err(pocketshop_storage::StorageError::from)?;
                    }
                    SqliteStorage::open(path)?
                }
                StorageSource::InMemory => SqliteStorage::open_in_memory()?,
            },
        };
        Ok(self.storage.insert(storage))
    }

    fn step(&self, id: SyncStepId, status: SyncStatus) {
        self.view.send_modify(|view| sync::set_status(&mut view.sync_steps, id, status));
        if status == SyncStatus::Loading && !self.config.sync_step_delay.is_zero() {
            std::thread::sleep(self.config.sync_step_delay);
        }
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Seed the catalog if needed, load products, resolve the current user
    /// and load their cart and orders, then publish everything at once.
    ///
    /// On failure the shop moves to [`Phase::Degraded`] with empty data and
    /// the error is returned for reporting.
    #[instrument(skip(self))]
    pub fn initialize(&mut self) -> Result<(), EngineError> {
        self.view.send_modify(|view| view.phase = Phase::Initializing);

        match self.load_initial() {
            Ok(loaded) => {
                let is_synced = sync::all_done(&self.view.borrow().sync_steps);
                info!(
                    user_id = loaded.user.id,
                    products = loaded.products.len(),
                    lines = loaded.cart.len(),
                    orders = loaded.orders.len(),
                    "shop ready"
                );
                self.view.send_modify(|view| {
                    view.phase = Phase::Ready;
                    view.is_synced = is_synced;
                    view.current_user = loaded.user;
                    view.products = loaded.products;
                    view.cart = loaded.cart;
                    view.orders = loaded.orders;
                });
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "initialization failed, continuing with empty data");
                self.view.send_modify(|view| {
                    view.phase = Phase::Degraded;
                    view.is_synced = false;
                    view.products.clear();
                    view.cart.clear();
                    view.orders.clear();
                });
                Err(e)
            }
        }
    }

    fn load_initial(&mut self) -> Result<Loaded, EngineError> {
        self.step(SyncStepId::Database, SyncStatus::Loading);
        let catalog = self.catalog.take().unwrap_or_else(catalog::generate_default);
        self.store()?.initialize_catalog(&catalog)?;
        self.step(SyncStepId::Database, SyncStatus::Done);

        self.step(SyncStepId::Products, SyncStatus::Loading);
        let products = self.store()?.list_products()?;
        self.step(SyncStepId::Products, SyncStatus::Done);

        self.step(SyncStepId::Users, SyncStatus::Loading);
        let stored_id = self.user_context.current_user_id();
        let user = *resolve_user(&stored_id);
        if user.id != stored_id {
            warn!(stored_id = %stored_id, fallback = user.id, "stored user unknown, using default");
        }
        self.step(SyncStepId::Users, SyncStatus::Done);

        self.step(SyncStepId::Cart, SyncStatus::Loading);
        let cart = self.store()?.get_cart(user.id)?;
        self.step(SyncStepId::Cart, SyncStatus::Done);

        self.step(SyncStepId::Orders, SyncStatus::Loading);
        let orders = self.fetch_orders(user.id)?;
        self.step(SyncStepId::Orders, SyncStatus::Done);

        // Everything already lives in the local store.
        self.step(SyncStepId::Cache, SyncStatus::Loading);
        self.step(SyncStepId::Cache, SyncStatus::Done);

        Ok(Loaded {
            products,
            user,
            cart: cart.items,
            orders,
        })
    }

    fn fetch_orders(&mut self, user_id: &str) -> Result<Vec<Order>, EngineError> {
        let mut orders = self.store()?.list_orders_for_user(user_id)?;
        sort_newest_first(&mut orders);
        Ok(orders)
    }

    // ========================================================================
    // User switching
    // ========================================================================

    /// Save the outgoing user's cart, then load the incoming user's cart and
    /// orders. Unknown ids fall back to the default user.
    #[instrument(skip(self))]
    pub fn switch_user(&mut self, user_id: &str) -> Result<(), EngineError> {
        let (outgoing, items) = {
            let view = self.view.borrow();
            (view.current_user, view.cart.clone())
        };
        self.store()?.put_cart(&Cart {
            user_id: outgoing.id.to_string(),
            items,
        })?;

        let user = match find_user(user_id) {
            Some(user) => *user,
            None => {
                warn!(user_id, "unknown user, falling back to default");
                *resolve_user(user_id)
            }
        };

        let cart = self.store()?.get_cart(user.id)?;
        let orders = self.fetch_orders(user.id)?;
        self.user_context.set_current_user_id(user.id)?;

        info!(from = outgoing.id, to = user.id, "switched user");
        self.view.send_modify(|view| {
            view.current_user = user;
            view.cart = cart.items;
            view.orders = orders;
        });
        Ok(())
    }

    // ========================================================================
    // Cart (all write-through)
    // ========================================================================

    /// Apply `transform` to a copy of the cart, persist it, then publish it.
    fn mutate_cart<F>(&mut self, transform: F) -> Result<(), EngineError>
    where
        F: FnOnce(&mut Vec<CartItem>),
    {
        let (user, mut items) = {
            let view = self.view.borrow();
            (view.current_user, view.cart.clone())
        };
        transform(&mut items);

        let cart = Cart {
            user_id: user.id.to_string(),
            items,
        };
        self.store()?.put_cart(&cart)?;
        self.view.send_modify(|view| view.cart = cart.items);
        Ok(())
    }

    /// Add `quantity` of a product. Unknown product ids are ignored.
    #[instrument(skip(self))]
    pub fn add_to_cart(&mut self, product_id: &str, quantity: u32) -> Result<(), EngineError> {
        let Some(product) = self.store()?.get_product(product_id)? else {
            debug!(product_id, "ignoring unknown product");
            return Ok(());
        };
        self.mutate_cart(|items| cart::add_item(items, product, quantity))
    }

    #[instrument(skip(self))]
    pub fn remove_from_cart(&mut self, product_id: &str) -> Result<(), EngineError> {
        self.mutate_cart(|items| cart::remove_item(items, product_id))
    }

    /// Set a line's quantity in place; zero or less removes the line.
    #[instrument(skip(self))]
    pub fn update_quantity(&mut self, product_id: &str, quantity: i64) -> Result<(), EngineError> {
        if quantity <= 0 {
            return self.remove_from_cart(product_id);
        }
        self.mutate_cart(|items| cart::set_quantity(items, product_id, quantity))
    }

    #[instrument(skip(self))]
    pub fn clear_cart(&mut self) -> Result<(), EngineError> {
        self.mutate_cart(Vec::clear)
    }

    // ========================================================================
    // Orders
    // ========================================================================

    /// Turn the cart into a completed order. Returns `None` for an empty
    /// cart.
    ///
    /// If the order is stored but the emptied cart is not, the order is
    /// still published and the error returned with the cart left as it
    /// was. Retrying `checkout` then places a second order for the same
    /// lines; callers should check [`Shop::orders`] before retrying.
    #[instrument(skip(self))]
    pub fn checkout(&mut self) -> Result<Option<Order>, EngineError> {
        let (user, items) = {
            let view = self.view.borrow();
            (view.current_user, view.cart.clone())
        };
        if items.is_empty() {
            debug!("checkout with empty cart");
            return Ok(None);
        }

        let order = Order::checkout(user.id, &items);
        self.store()?.put_order(&order)?;

        if let Err(e) = self.store()?.put_cart(&Cart::empty(user.id)) {
            // The order is durable; the cart was not cleared.
            let placed = order.clone();
            self.view.send_modify(|view| view.orders.insert(0, placed));
            return Err(e.into());
        }

        info!(order_id = %order.id, total = order.total, "order placed");
        let placed = order.clone();
        self.view.send_modify(|view| {
            view.cart.clear();
            view.orders.insert(0, placed);
        });
        Ok(Some(order))
    }

    /// Re-read the current user's orders from the store.
    #[instrument(skip(self))]
    pub fn load_orders(&mut self) -> Result<(), EngineError> {
        let user = self.current_user();
        let orders = self.fetch_orders(user.id)?;
        self.view.send_modify(|view| view.orders = orders);
        Ok(())
    }

    // ========================================================================
    // QR scanning
    // ========================================================================

    /// Add the product named by decoded QR text and report the outcome.
    #[instrument(skip(self, notifier))]
    pub fn handle_scan(&mut self, text: &str, notifier: &Notifier) -> Result<Option<Product>, EngineError> {
        let product = {
            let view = self.view.borrow();
            match_scanned_product(&view.products, text).cloned()
        };
        let Some(product) = product else {
            notifier.error(format!("Product not found: {text}"));
            return Ok(None);
        };

        match self.add_to_cart(&product.id, 1) {
            Ok(()) => {
                notifier.success(format!("Added \"{}\" to cart", product.name));
                Ok(Some(product))
            }
            Err(e) => {
                notifier.error(format!("Could not add \"{}\" to cart", product.name));
                Err(e)
            }
        }
    }
}
