use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension};
use tracing::{debug, info};

use pocketshop_core::{Cart, Order, OrderId, OrderStatus, Product};

use crate::error::StorageError;
use crate::traits::Storage;

const PRODUCT_COLUMNS: &str = "id, name, price, image, description, category";
const ORDER_COLUMNS: &str = "id, user_id, items, total, created_at, status";

pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref();
        let conn = Connection::open(path)?;
        crate::schema::init_schema(&conn)?;
        debug!(path = %path.display(), "opened store");
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        crate::schema::init_schema(&conn)?;
        Ok(Self { conn })
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }
}

fn read_product(row: &rusqlite::Row) -> rusqlite::Result<Product> {
    let price: i64 = row.get(2)?;
    Ok(Product {
        id: row.get(0)?,
        name: row.get(1)?,
        price: u64::try_from(price).map_err(|_| {
            rusqlite::Error::IntegralValueOutOfRange(2, price)
        })?,
        image: row.get(3)?,
        description: row.get(4)?,
        category: row.get(5)?,
    })
}

/// Raw order columns, decoded outside the row closure so decode failures
/// surface as `StorageError` rather than being squeezed into `rusqlite::Error`.
struct OrderRow {
    id: String,
    user_id: String,
    items: Vec<u8>,
    total: i64,
    created_at: String,
    status: String,
}

fn read_order_row(row: &rusqlite::Row) -> rusqlite::Result<OrderRow> {
    Ok(OrderRow {
        id: row.get(0)?,
        user_id: row.get(1)?,
        items: row.get(2)?,
        total: row.get(3)?,
        created_at: row.get(4)?,
        status: row.get(5)?,
    })
}

fn decode_order(row: OrderRow) -> Result<Order, StorageError> {
    let id: OrderId = row.id.parse()?;
    let items = Cart::items_from_msgpack(&row.items)
        .map_err(|e| StorageError::Serialization(e.to_string()))?;
    let total = u64::try_from(row.total)
        .map_err(|_| StorageError::Serialization(format!("negative total on {id}")))?;
    let created_at = DateTime::parse_from_rfc3339(&row.created_at)
        .map_err(|e| StorageError::Serialization(format!("created_at on {id}: {e}")))?
        .with_timezone(&Utc);
    let status = OrderStatus::parse(&row.status)?;
    Ok(Order {
        id,
        user_id: row.user_id,
        items,
        total,
        created_at,
        status,
    })
}

fn to_sql_amount(amount: u64, label: &str) -> Result<i64, StorageError> {
    i64::try_from(amount)
        .map_err(|_| StorageError::ConstraintViolation(format!("{label} out of range: {amount}")))
}

impl Storage for SqliteStorage {
    fn product_count(&self) -> Result<u64, StorageError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM products", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn initialize_catalog(&mut self, catalog: &[Product]) -> Result<bool, StorageError> {
        let existing = self.product_count()?;
        if existing > 0 {
            debug!(existing, "catalog already present");
            return Ok(false);
        }

        let tx = self.conn.transaction()?;

        {
            let mut stmt = tx.prepare(
                "INSERT INTO products (id, name, price, image, description, category) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;
            for product in catalog {
                stmt.execute(rusqlite::params![
                    product.id,
                    product.name,
                    to_sql_amount(product.price, "price")?,
                    product.image,
                    product.description,
                    product.category,
                ])?;
            }
        }

        tx.commit()?;
        info!(count = catalog.len(), "seeded catalog");
        Ok(true)
    }

    fn list_products(&self) -> Result<Vec<Product>, StorageError> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {PRODUCT_COLUMNS} FROM products ORDER BY rowid"))?;
        let products = stmt
            .query_map([], read_product)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(products)
    }

    fn list_products_by_category(&self, category: &str) -> Result<Vec<Product>, StorageError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE category = ?1 ORDER BY rowid"
        ))?;
        let products = stmt
            .query_map(rusqlite::params![category], read_product)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(products)
    }

    fn get_product(&self, id: &str) -> Result<Option<Product>, StorageError> {
        let product = self
            .conn
            .query_row(
                &format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1"),
                rusqlite::params![id],
                read_product,
            )
            .optional()?;
        Ok(product)
    }

    fn get_cart(&self, user_id: &str) -> Result<Cart, StorageError> {
        let blob: Option<Vec<u8>> = self
            .conn
            .query_row(
                "SELECT items FROM carts WHERE user_id = ?1",
                rusqlite::params![user_id],
                |row| row.get(0),
            )
            .optional()?;

        match blob {
            Some(bytes) => {
                let items = Cart::items_from_msgpack(&bytes)
                    .map_err(|e| StorageError::Serialization(e.to_string()))?;
                Ok(Cart {
                    user_id: user_id.to_string(),
                    items,
                })
            }
            None => Ok(Cart::empty(user_id)),
        }
    }

    fn put_cart(&mut self, cart: &Cart) -> Result<(), StorageError> {
        let items = cart
            .items_to_msgpack()
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        self.conn.execute(
            "INSERT INTO carts (user_id, items) VALUES (?1, ?2)
             ON CONFLICT(user_id) DO UPDATE SET items = excluded.items, updated_at = excluded.updated_at",
            rusqlite::params![cart.user_id, items],
        )?;
        debug!(user_id = %cart.user_id, lines = cart.items.len(), "saved cart");
        Ok(())
    }

    fn list_orders_for_user(&self, user_id: &str) -> Result<Vec<Order>, StorageError> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {ORDER_COLUMNS} FROM orders WHERE user_id = ?1"))?;
        let rows = stmt.query_map(rusqlite::params![user_id], read_order_row)?;

        let mut result = Vec::new();
        for row in rows {
            result.push(decode_order(row?)?);
        }
        Ok(result)
    }

    fn put_order(&mut self, order: &Order) -> Result<(), StorageError> {
        let items = rmp_serde::to_vec(&order.items)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        let result = self.conn.execute(
            "INSERT INTO orders (id, user_id, items, total, created_at, status) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            rusqlite::params![
                order.id.to_string(),
                order.user_id,
                items,
                to_sql_amount(order.total, "total")?,
                order.created_at.to_rfc3339(),
                order.status.as_str(),
            ],
        );
        match result {
            Ok(_) => {}
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                return Err(StorageError::ConstraintViolation(format!(
                    "order already exists: {}",
                    order.id
                )));
            }
            Err(e) => return Err(StorageError::Sqlite(e)),
        }
        info!(order_id = %order.id, user_id = %order.user_id, total = order.total, "stored order");
        Ok(())
    }
}
