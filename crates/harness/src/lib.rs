mod shop;

pub use shop::{fixed_catalog, init_tracing, TestShop};
