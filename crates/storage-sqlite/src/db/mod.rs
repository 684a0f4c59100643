//! Storage engine: one SQLite file, pooled readers, one writer.

use log::{error, info};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use diesel::connection::{Connection, SimpleConnection};
use diesel::r2d2::{self, ConnectionManager, Pool, PooledConnection};
use diesel::sqlite::SqliteConnection;

use goalpost_core::errors::{Error, Result};

use crate::errors::{IntoCore, StorageError};

pub mod schema_manager;
pub mod write_actor;

pub use schema_manager::{ensure_schema, seed_if_empty, SeedOptions, SeedReport};
pub use write_actor::{spawn_writer, WriteHandle};

pub type DbPool = r2d2::Pool<ConnectionManager<SqliteConnection>>;
pub type DbConnection = PooledConnection<ConnectionManager<SqliteConnection>>;

const POOL_MAX_SIZE: u32 = 8;
const CONNECTION_TIMEOUT: Duration = Duration::from_secs(30);

/// Resolves the database file, letting `DATABASE_URL` override the configured path.
pub fn get_db_path(configured_path: &str) -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| configured_path.to_string())
}

/// Creates the database file (and its directory) if needed and switches it to WAL.
pub fn init(db_path: &str) -> Result<String> {
    if let Some(db_dir) = Path::new(db_path).parent() {
        if !db_dir.as_os_str().is_empty() && !db_dir.exists() {
            fs::create_dir_all(db_dir)?;
        }
    }

    let mut conn = SqliteConnection::establish(db_path).map_err(StorageError::from)?;
    conn.batch_execute(
        "
            PRAGMA journal_mode = WAL;
            PRAGMA foreign_keys = ON;
            PRAGMA busy_timeout = 30000;
            PRAGMA synchronous  = NORMAL;
        ",
    )
    .into_core()?;

    Ok(db_path.to_string())
}

pub fn create_pool(db_path: &str) -> Result<Arc<DbPool>> {
    let manager = ConnectionManager::<SqliteConnection>::new(db_path);
    let pool = r2d2::Pool::builder()
        .max_size(POOL_MAX_SIZE)
        .min_idle(Some(1))
        .connection_timeout(CONNECTION_TIMEOUT)
        .connection_customizer(Box::new(ConnectionCustomizer {}))
        .build(manager)
        .into_core()?;
    Ok(Arc::new(pool))
}

/// Gets a connection from the pool
pub fn get_connection(pool: &Pool<ConnectionManager<SqliteConnection>>) -> Result<DbConnection> {
    pool.get().into_core()
}

/// Runs `f` on a pooled connection inside a deferred transaction, so every
/// statement in `f` sees the same snapshot. Nothing is written.
pub fn read_snapshot<F, T>(pool: &DbPool, f: F) -> Result<T>
where
    F: FnOnce(&mut SqliteConnection) -> Result<T>,
{
    let mut pooled = get_connection(pool)?;
    let conn: &mut SqliteConnection = &mut pooled;
    conn.transaction::<_, StorageError, _>(|c| f(c).map_err(StorageError::from))
        .map_err(Error::from)
}

#[derive(Debug)]
struct ConnectionCustomizer;

impl r2d2::CustomizeConnection<SqliteConnection, r2d2::Error> for ConnectionCustomizer {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> std::result::Result<(), r2d2::Error> {
        conn.batch_execute(
            "
            PRAGMA foreign_keys = ON;
            PRAGMA busy_timeout = 30000;
            PRAGMA synchronous = NORMAL;
        ",
        )
        .map_err(r2d2::Error::QueryError)
    }
}

/// Long-lived handle on the store, created once at startup and shared by
/// every repository.
pub struct Storage {
    db_path: String,
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl Storage {
    /// Opens (or creates) the database, ensures the schema, seeds reference
    /// data and starts the writer. Must be called from within a Tokio runtime.
    ///
    /// An error here means the application has no store and cannot continue.
    /// Seeding problems are logged and do not fail the open.
    pub fn open(db_path: &str, seed_options: &SeedOptions) -> Result<Self> {
        let db_path = init(db_path)?;
        let pool = create_pool(&db_path)?;

        {
            let mut conn = get_connection(&pool)?;
            ensure_schema(&mut conn)?;
            match seed_if_empty(&mut conn, seed_options) {
                Ok(report) if !report.is_empty() => info!("Seeded database: {}", report),
                Ok(_) => {}
                Err(e) => error!("Seeding failed, continuing without seed data: {}", e),
            }
        }

        let writer = spawn_writer((*pool).clone())?;
        info!("Storage ready at {}", db_path);

        Ok(Storage {
            db_path,
            pool,
            writer,
        })
    }

    pub fn db_path(&self) -> &str {
        &self.db_path
    }

    pub fn pool(&self) -> Arc<DbPool> {
        Arc::clone(&self.pool)
    }

    pub fn writer(&self) -> WriteHandle {
        self.writer.clone()
    }

    /// Read-only snapshot access; see [`read_snapshot`].
    pub fn read<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut SqliteConnection) -> Result<T>,
    {
        read_snapshot(&self.pool, f)
    }

    /// Exclusive, atomic write through the single writer.
    pub async fn write<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        self.writer.exec(f).await
    }
}
