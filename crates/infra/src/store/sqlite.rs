//! SQLite-backed product store.
//!
//! One table, `products`, ordered by an autoincrement `seq` column so that
//! `fetch_all` returns rows in insertion order. Each `ChangeSet` runs in a
//! single transaction.
//!
//! ## Error Mapping
//!
//! | SQLx Error | StoreError |
//! |------------|------------|
//! | PoolClosed / PoolTimedOut / Io / Configuration | `Unavailable` |
//! | Database and everything else | `Query` |

use std::path::PathBuf;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use tracing::instrument;

use empower_core::ProductKey;
use empower_products::{Product, ProductRecord};

use super::r#trait::{ChangeSet, ProductStore, StoreError};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS products (
    seq              INTEGER PRIMARY KEY AUTOINCREMENT,
    product_key      TEXT NOT NULL UNIQUE,
    product_id       TEXT NOT NULL,
    title            TEXT NOT NULL,
    description      TEXT NOT NULL,
    description_full TEXT NOT NULL,
    image            TEXT NOT NULL,
    image_cropped    TEXT NOT NULL,
    price            TEXT NOT NULL,
    created_at       TEXT NOT NULL
)
"#;

/// SQLite-backed product store.
///
/// `SqlitePool` is `Send + Sync` and cheap to clone, so the store can be
/// shared behind an `Arc` across tasks.
#[derive(Debug, Clone)]
pub struct SqliteProductStore {
    pool: SqlitePool,
}

impl SqliteProductStore {
    /// Open (creating if needed) the database at `url`, e.g.
    /// `sqlite:///home/me/.local/share/empower-plants/catalog.db`.
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(|e| StoreError::Unavailable(format!("invalid database url {url}: {e}")))?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;

        Self::with_pool(pool).await
    }

    /// Private in-memory database.
    ///
    /// Every SQLite connection to `:memory:` is its own database, so the pool
    /// is pinned to one connection that never expires.
    pub async fn in_memory() -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;

        Self::with_pool(pool).await
    }

    /// Wrap an existing pool and make sure the schema exists.
    pub async fn with_pool(pool: SqlitePool) -> Result<Self, StoreError> {
        sqlx::query(SCHEMA)
            .execute(&pool)
            .await
            .map_err(|e| map_sqlx_error("create_schema", e))?;

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl ProductStore for SqliteProductStore {
    #[instrument(skip(self), err)]
    async fn fetch_all(&self) -> Result<Vec<Product>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT
                product_key,
                product_id,
                title,
                description,
                description_full,
                image,
                image_cropped,
                price
            FROM products
            ORDER BY seq ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("fetch_all", e))?;

        rows.iter().map(product_from_row).collect()
    }

    async fn count(&self) -> Result<usize, StoreError> {
        let row = sqlx::query("SELECT COUNT(*) AS total FROM products")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("count", e))?;

        let total: i64 = row
            .try_get("total")
            .map_err(|e| StoreError::Query(format!("failed to read count: {e}")))?;
        Ok(total as usize)
    }

    #[instrument(
        skip(self, changes),
        fields(
            inserts = changes.inserts().len(),
            updates = changes.updates().len(),
            deletes = changes.deletes().len()
        ),
        err
    )]
    async fn save(&self, changes: ChangeSet) -> Result<(), StoreError> {
        if changes.is_empty() {
            return Ok(());
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin_transaction", e))?;

        let now = Utc::now().to_rfc3339();

        for product in changes.inserts() {
            sqlx::query(
                r#"
                INSERT INTO products (
                    product_key,
                    product_id,
                    title,
                    description,
                    description_full,
                    image,
                    image_cropped,
                    price,
                    created_at
                )
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                "#,
            )
            .bind(product.key().to_string())
            .bind(product.product_id())
            .bind(product.title())
            .bind(product.description())
            .bind(product.description_full())
            .bind(product.image())
            .bind(product.image_cropped())
            .bind(product.price())
            .bind(&now)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("insert_product", e))?;
        }

        for product in changes.updates() {
            let result = sqlx::query(
                r#"
                UPDATE products SET
                    product_id = ?2,
                    title = ?3,
                    description = ?4,
                    description_full = ?5,
                    image = ?6,
                    image_cropped = ?7,
                    price = ?8
                WHERE product_key = ?1
                "#,
            )
            .bind(product.key().to_string())
            .bind(product.product_id())
            .bind(product.title())
            .bind(product.description())
            .bind(product.description_full())
            .bind(product.image())
            .bind(product.image_cropped())
            .bind(product.price())
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("update_product", e))?;

            if result.rows_affected() == 0 {
                tx.rollback()
                    .await
                    .map_err(|e| map_sqlx_error("rollback", e))?;
                return Err(StoreError::Missing(product.key()));
            }
        }

        for key in changes.deletes() {
            sqlx::query("DELETE FROM products WHERE product_key = ?1")
                .bind(key.to_string())
                .execute(&mut *tx)
                .await
                .map_err(|e| map_sqlx_error("delete_product", e))?;
        }

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("commit", e))
    }

    async fn clear(&self) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM products")
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("clear", e))?;

        Ok(result.rows_affected())
    }
}

fn product_from_row(row: &SqliteRow) -> Result<Product, StoreError> {
    let get = |column: &str| -> Result<String, StoreError> {
        row.try_get::<String, _>(column)
            .map_err(|e| StoreError::Corrupt(format!("column {column}: {e}")))
    };

    let key: ProductKey = get("product_key")?
        .parse()
        .map_err(|e| StoreError::Corrupt(format!("product_key: {e}")))?;

    Ok(Product::from_record(
        key,
        ProductRecord {
            product_id: get("product_id")?,
            title: get("title")?,
            description: get("description")?,
            description_full: get("description_full")?,
            image: get("image")?,
            image_cropped: get("image_cropped")?,
            price: get("price")?,
        },
    ))
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::PoolClosed | sqlx::Error::PoolTimedOut => {
            StoreError::Unavailable(format!("connection pool unavailable in {operation}"))
        }
        sqlx::Error::Io(e) => StoreError::Unavailable(format!("io error in {operation}: {e}")),
        sqlx::Error::Configuration(e) => {
            StoreError::Unavailable(format!("bad configuration in {operation}: {e}"))
        }
        sqlx::Error::Database(db_err) => {
            StoreError::Query(format!("database error in {operation}: {}", db_err.message()))
        }
        other => StoreError::Query(format!("sqlx error in {operation}: {other}")),
    }
}

/// Resolve the default on-disk location of the catalog database:
/// `{app_data_dir}/empower-plants/catalog.db`.
///
/// The directory is created if it does not exist.
pub fn default_database_path() -> Result<PathBuf, StoreError> {
    let base = dirs::data_dir()
        .or_else(|| {
            dirs::home_dir().map(|mut h| {
                h.push(".local");
                h.push("share");
                h
            })
        })
        .ok_or_else(|| {
            StoreError::Unavailable(
                "failed to resolve OS app data directory - tried data_dir() and home_dir()/.local/share"
                    .to_string(),
            )
        })?;

    let mut dir = base;
    dir.push("empower-plants");

    std::fs::create_dir_all(&dir).map_err(|e| {
        StoreError::Unavailable(format!("failed to create data directory at {dir:?}: {e}"))
    })?;

    dir.push("catalog.db");
    Ok(dir)
}

/// `sqlite://` URL for [`default_database_path`].
pub fn default_database_url() -> Result<String, StoreError> {
    let path = default_database_path()?;
    Ok(format!("sqlite://{}", path.to_string_lossy()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(title: &str, price: &str) -> ProductRecord {
        ProductRecord {
            product_id: "7".to_string(),
            title: title.to_string(),
            description: "short".to_string(),
            description_full: "long".to_string(),
            image: "img".to_string(),
            image_cropped: "img.cropped".to_string(),
            price: price.to_string(),
        }
    }

    #[tokio::test]
    async fn round_trips_products_in_insertion_order() {
        let store = SqliteProductStore::in_memory().await.unwrap();
        let products: Vec<Product> = (0..5)
            .map(|i| Product::create(record(&format!("P{i}"), &i.to_string())))
            .collect();

        store.save(products.iter().cloned().collect()).await.unwrap();

        assert_eq!(store.fetch_all().await.unwrap(), products);
        assert_eq!(store.count().await.unwrap(), 5);
    }

    #[tokio::test]
    async fn duplicate_product_ids_are_allowed() {
        let store = SqliteProductStore::in_memory().await.unwrap();
        let changes: ChangeSet = vec![
            Product::create(record("same id", "1")),
            Product::create(record("same id", "1")),
        ]
        .into_iter()
        .collect();

        store.save(changes).await.unwrap();

        assert_eq!(store.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn update_rewrites_row_in_place() {
        let store = SqliteProductStore::in_memory().await.unwrap();
        let first = Product::create(record("first", "1"));
        let mut second = Product::create(record("second", "2"));
        store
            .save(vec![first.clone(), second.clone()].into_iter().collect())
            .await
            .unwrap();

        second.set_title("second, renamed");
        let mut changes = ChangeSet::new();
        changes.update(second.clone());
        store.save(changes).await.unwrap();

        assert_eq!(store.fetch_all().await.unwrap(), vec![first, second]);
    }

    #[tokio::test]
    async fn missing_update_rolls_back_whole_set() {
        let store = SqliteProductStore::in_memory().await.unwrap();

        let mut changes = ChangeSet::new();
        changes
            .insert(Product::create(record("would be inserted", "1")))
            .update(Product::create(record("ghost", "1")));

        match store.save(changes).await {
            Err(StoreError::Missing(_)) => {}
            other => panic!("expected Missing, got {other:?}"),
        }
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn delete_and_clear() {
        let store = SqliteProductStore::in_memory().await.unwrap();
        let a = Product::create(record("a", "1"));
        let b = Product::create(record("b", "2"));
        let c = Product::create(record("c", "3"));
        store
            .save(vec![a.clone(), b.clone(), c.clone()].into_iter().collect())
            .await
            .unwrap();

        let mut changes = ChangeSet::new();
        changes.delete(b.key()).delete(ProductKey::new());
        store.save(changes).await.unwrap();
        assert_eq!(store.fetch_all().await.unwrap(), vec![a, c]);

        assert_eq!(store.clear().await.unwrap(), 2);
        assert!(store.fetch_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn rows_survive_reopening_a_file_database() {
        let path = std::env::temp_dir().join(format!("empower-catalog-{}.db", ProductKey::new()));
        let url = format!("sqlite://{}", path.to_string_lossy());
        let product = Product::create(record("durable", "9"));

        {
            let store = SqliteProductStore::connect(&url).await.unwrap();
            store
                .save(std::iter::once(product.clone()).collect())
                .await
                .unwrap();
            store.pool().close().await;
        }

        let reopened = SqliteProductStore::connect(&url).await.unwrap();
        assert_eq!(reopened.fetch_all().await.unwrap(), vec![product]);
        reopened.pool().close().await;

        let _ = std::fs::remove_file(&path);
    }
}
