pub mod cart;
pub mod catalog;
pub mod error;
pub mod ids;
pub mod money;
pub mod order;
pub mod product;
pub mod user;

pub use cart::{Cart, CartItem};
pub use error::CoreError;
pub use ids::*;
pub use money::format_price;
pub use order::{Order, OrderStatus};
pub use product::Product;
pub use user::User;
