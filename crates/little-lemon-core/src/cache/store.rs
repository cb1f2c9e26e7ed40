use std::path::Path;
use std::sync::Arc;

use rusqlite::{params, params_from_iter, Connection, Row};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::models::MenuItem;
use crate::query::MenuQuery;

use super::StoreError;

/// Version marker value once the menu has been fully populated.
/// Bump when the table layout or dataset needs a reload.
pub const TARGET_VERSION: i64 = 1;

const MENU_SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS menu (
        name TEXT NOT NULL,
        category TEXT NOT NULL,
        description TEXT NOT NULL,
        price REAL NOT NULL,
        image TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_menu_category ON menu(category);
"#;

const SELECT_COLUMNS: &str = "SELECT name, category, description, price, image FROM menu";

/// Process-wide handle to the local menu store.
///
/// Open once at startup and clone where needed; clones share the same
/// connection. Every access goes through one mutex, so the bulk load and
/// queries never interleave. The mutex hands out access in request order:
/// a query issued while the bulk load waits or runs is answered after it.
#[derive(Clone)]
pub struct MenuStore {
    conn: Arc<Mutex<Connection>>,
}

impl MenuStore {
    /// Open (creating if absent) the store at `path`.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let conn = tokio::task::spawn_blocking(move || -> Result<Connection, StoreError> {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            let conn = Connection::open(&path)?;
            conn.execute_batch("PRAGMA journal_mode=WAL;")?;
            conn.execute_batch(MENU_SCHEMA)?;
            debug!(?path, "Menu store opened");
            Ok(conn)
        })
        .await??;

        Ok(Self::from_connection(conn))
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(MENU_SCHEMA)?;
        Ok(Self::from_connection(conn))
    }

    fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Run `f` against the connection on the blocking pool.
    async fn with_conn<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut Connection) -> Result<T, StoreError> + Send + 'static,
        T: Send + 'static,
    {
        let mut guard = Arc::clone(&self.conn).lock_owned().await;
        tokio::task::spawn_blocking(move || f(&mut *guard)).await?
    }

    /// Current version marker. Zero for a fresh store.
    pub async fn version(&self) -> Result<i64, StoreError> {
        self.with_conn(|conn| read_version(conn)).await
    }

    /// Every row, in storage order.
    pub async fn all_items(&self) -> Result<Vec<MenuItem>, StoreError> {
        self.filter(MenuQuery::all()).await
    }

    pub async fn item_count(&self) -> Result<usize, StoreError> {
        self.with_conn(|conn| {
            let count: i64 = conn.query_row("SELECT COUNT(*) FROM menu", [], |row| row.get(0))?;
            Ok(count as usize)
        })
        .await
    }

    /// Replace the table contents with `items` and advance the version
    /// marker, all in one transaction. Returns the number of rows written.
    ///
    /// Running it again is harmless: existing rows are cleared first. A store
    /// whose marker is already beyond `TARGET_VERSION` is left untouched, and
    /// an empty menu is never stamped as ready.
    pub async fn replace_all(&self, items: Vec<MenuItem>) -> Result<usize, StoreError> {
        if items.is_empty() {
            warn!("Refusing to mark an empty menu as loaded");
            return Ok(0);
        }

        self.with_conn(move |conn| {
            let tx = conn.transaction()?;

            let current = read_version(&tx)?;
            if current > TARGET_VERSION {
                warn!(
                    current,
                    target = TARGET_VERSION,
                    "Store marker is newer than this build, not overwriting"
                );
                return Ok(0);
            }

            tx.execute_batch(MENU_SCHEMA)?;
            tx.execute("DELETE FROM menu", [])?;
            {
                let mut stmt = tx.prepare(
                    "INSERT INTO menu (name, category, description, price, image) VALUES (?1, ?2, ?3, ?4, ?5)",
                )?;
                for item in &items {
                    stmt.execute(params![
                        item.name,
                        item.category,
                        item.description,
                        item.price,
                        item.image,
                    ])?;
                }
            }
            tx.pragma_update(None, "user_version", TARGET_VERSION)?;
            tx.commit()?;

            debug!(rows = items.len(), "Menu rows written");
            Ok(items.len())
        })
        .await
    }

    /// Rows matching `query`, in storage order.
    pub async fn filter(&self, query: MenuQuery) -> Result<Vec<MenuItem>, StoreError> {
        self.with_conn(move |conn| {
            let (predicate, args) = query.to_sql();
            let sql = format!("{} {} ORDER BY rowid", SELECT_COLUMNS, predicate);

            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(params_from_iter(args.iter()), item_from_row)?;
            let items = rows.collect::<Result<Vec<_>, _>>()?;
            Ok(items)
        })
        .await
    }
}

fn read_version(conn: &Connection) -> Result<i64, StoreError> {
    let version = conn.pragma_query_value(None, "user_version", |row| row.get::<_, i64>(0))?;
    Ok(version)
}

fn item_from_row(row: &Row<'_>) -> rusqlite::Result<MenuItem> {
    Ok(MenuItem {
        name: row.get(0)?,
        category: row.get(1)?,
        description: row.get(2)?,
        price: row.get(3)?,
        image: row.get(4)?,
    })
}
