pub mod error;
pub mod schema;
pub mod sqlite;
pub mod traits;
pub mod user_context;

pub use error::StorageError;
pub use sqlite::SqliteStorage;
pub use traits::*;
pub use user_context::{FileUserContext, MemoryUserContext, UserContext, CURRENT_USER_KEY};
