use std::path::PathBuf;

use pocketshop_core::{catalog, Product};
use pocketshop_engine::{EngineError, Shop, ShopConfig};
use pocketshop_storage::{MemoryUserContext, SqliteStorage, StorageError};
use rand::{rngs::StdRng, SeedableRng};
use tempfile::TempDir;

const CATALOG_SEED: u64 = 0x5eed;

/// Install a test subscriber once; honours `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// The generated catalog with a fixed seed, so prices are stable per run.
pub fn fixed_catalog() -> Vec<Product> {
    catalog::generate(&mut StdRng::seed_from_u64(CATALOG_SEED))
}

pub struct TestShop {
    pub shop: Shop,
    dir: Option<TempDir>,
}

impl TestShop {
    /// Initialized shop over an in-memory store.
    pub fn new() -> Result<Self, EngineError> {
        init_tracing();
        let storage = SqliteStorage::open_in_memory()?;
        let mut shop = Shop::with_storage(ShopConfig::default(), storage, MemoryUserContext::new())
            .with_catalog(fixed_catalog());
        shop.initialize()?;
        Ok(Self { shop, dir: None })
    }

    /// Uninitialized shop backed by files in a fresh temporary directory.
    pub fn on_disk() -> Result<Self, EngineError> {
        init_tracing();
        let dir = tempfile::tempdir().map_err(StorageError::from)?;
        let shop = Shop::open(Self::config_for(dir.path().to_path_buf()))
            .with_catalog(fixed_catalog());
        Ok(Self {
            shop,
            dir: Some(dir),
        })
    }

    /// Drop the current shop and open a new, uninitialized one over the same
    /// files, as a process restart would.
    pub fn restart(self) -> Self {
        let Self { shop, dir } = self;
        let config = shop.config().clone();
        drop(shop);
        Self {
            shop: Shop::open(config),
            dir,
        }
    }

    pub fn data_dir(&self) -> Option<PathBuf> {
        self.dir.as_ref().map(|d| d.path().to_path_buf())
    }

    fn config_for(data_dir: PathBuf) -> ShopConfig {
        ShopConfig {
            data_dir,
            ..ShopConfig::default()
        }
    }

    pub fn product(&self, id: &str) -> Product {
        self.shop
            .products()
            .into_iter()
            .find(|p| p.id == id)
            .unwrap_or_else(|| panic!("no product {id} in catalog"))
    }
}
