//! Sestra Storage Layer
//!
//! Implements the repository traits of `sestra-domain` on top of SQLite.
//!
//! # Architecture
//!
//! - One row per project, layer, role, attribute, enum constant, document,
//!   annotation, annotation role and annotation attribute value
//! - Union variants are stored as string type tags; a tag the code does not
//!   know is reported as [`StoreError::Corrupted`], never silently skipped
//! - `UNIQUE` constraints back the uniqueness checks so a lost race surfaces
//!   as a conflict
//!
//! # Examples
//!
//! ```no_run
//! use sestra_store::SqliteStore;
//!
//! let store = SqliteStore::new(":memory:").unwrap();
//! // Store is now ready for project, document and annotation operations
//! ```

#![warn(missing_docs)]

mod annotations;
mod config;
mod documents;
mod projects;

pub use config::StoreConfig;

use rusqlite::Connection;
use sestra_domain::traits::{PersistenceError, Repository, Transactional};
use sestra_domain::AnnotationId;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Uniqueness constraint violated
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Stored data no longer matches the value model
    #[error("Corrupted data: {0}")]
    Corrupted(String),

    /// A relation role names a layer the project does not declare
    #[error("Unknown layer '{0}'")]
    UnknownLayer(String),

    /// Invalid store configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl PersistenceError for StoreError {
    fn is_conflict(&self) -> bool {
        match self {
            StoreError::Conflict(_) => true,
            StoreError::Database(rusqlite::Error::SqliteFailure(err, _)) => {
                err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                    || err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
            }
            _ => false,
        }
    }
}

/// SQLite-based implementation of the Sestra repositories
///
/// # Thread Safety
///
/// SQLite connections are not thread-safe. Each thread should have its own
/// SqliteStore instance.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Create a new SqliteStore with the given database path
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use sestra_store::SqliteStore;
    ///
    /// let store = SqliteStore::new("sestra.db").unwrap();
    /// ```
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        Self::open(&StoreConfig::with_path(path.as_ref()))
    }

    /// Open an in-memory store
    pub fn in_memory() -> Result<Self, StoreError> {
        Self::open(&StoreConfig::in_memory())
    }

    /// Open a store as described by `config`
    pub fn open(config: &StoreConfig) -> Result<Self, StoreError> {
        config.validate().map_err(StoreError::Config)?;

        let conn = Connection::open(&config.path)?;
        conn.busy_timeout(config.busy_timeout())?;
        if config.foreign_keys {
            conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        }

        let mut store = Self { conn };
        store.initialize_schema()?;

        tracing::debug!(path = %config.path.display(), "Opened SQLite store");
        Ok(store)
    }

    /// Initialize the database schema
    fn initialize_schema(&mut self) -> Result<(), StoreError> {
        let schema = include_str!("schema.sql");
        self.conn.execute_batch(schema)?;
        Ok(())
    }

    /// Run `op` inside a savepoint so a failed multi-row save leaves nothing
    /// behind, whether or not an outer transaction is open
    fn with_savepoint<T>(
        &self,
        name: &str,
        op: impl FnOnce(&Self) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        self.conn.execute_batch(&format!("SAVEPOINT {}", name))?;
        match op(self) {
            Ok(value) => {
                self.conn.execute_batch(&format!("RELEASE {}", name))?;
                Ok(value)
            }
            Err(e) => {
                self.conn
                    .execute_batch(&format!("ROLLBACK TO {0}; RELEASE {0}", name))?;
                Err(e)
            }
        }
    }

    /// Convert an AnnotationId to bytes for storage
    fn annotation_id_to_bytes(id: AnnotationId) -> Vec<u8> {
        id.as_bytes().to_vec()
    }

    /// Convert stored bytes to an AnnotationId
    fn bytes_to_annotation_id(bytes: &[u8]) -> Result<AnnotationId, StoreError> {
        let arr: [u8; 16] = bytes.try_into().map_err(|_| {
            StoreError::Corrupted(format!(
                "Expected 16 bytes for annotation id, got {}",
                bytes.len()
            ))
        })?;
        Ok(AnnotationId::from_bytes(arr))
    }
}

impl Repository for SqliteStore {
    type Error = StoreError;
}

impl Transactional for SqliteStore {
    fn begin(&mut self) -> Result<(), Self::Error> {
        self.conn.execute_batch("BEGIN IMMEDIATE")?;
        Ok(())
    }

    fn commit(&mut self) -> Result<(), Self::Error> {
        self.conn.execute_batch("COMMIT")?;
        Ok(())
    }

    fn rollback(&mut self) -> Result<(), Self::Error> {
        self.conn.execute_batch("ROLLBACK")?;
        Ok(())
    }
}
