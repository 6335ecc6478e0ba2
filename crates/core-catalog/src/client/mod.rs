//! The metastore seam.
//!
//! [`MetastoreClient`] is the only way the catalog talks to the backend. Each
//! call is a single round trip; listing calls return one page and an opaque
//! continuation token.

use async_trait::async_trait;
use snafu::prelude::*;

use crate::models::{NamespaceEntity, TableEntity};

pub mod memory;

#[cfg(feature = "glue")]
pub mod glue;

pub use memory::InMemoryMetastoreClient;

#[cfg(feature = "glue")]
pub use glue::GlueMetastoreClient;

/// Backend-native failure signals.
#[derive(Snafu, Debug, Clone, PartialEq, Eq)]
#[snafu(visibility(pub))]
pub enum MetastoreClientError {
    #[snafu(display("Entity not found: {message}"))]
    EntityNotFound { message: String },

    #[snafu(display("Entity already exists: {message}"))]
    AlreadyExists { message: String },

    #[snafu(display("Invalid input: {message}"))]
    InvalidInput { message: String },

    #[snafu(display("Metastore service error: {message}"))]
    Service { message: String },
}

pub type ClientResult<T> = std::result::Result<T, MetastoreClientError>;

/// One page of a listing call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next_token: Option<String>,
}

impl<T> Page<T> {
    #[must_use]
    pub fn new(items: Vec<T>, next_token: Option<String>) -> Self {
        Self { items, next_token }
    }

    #[must_use]
    pub fn last(items: Vec<T>) -> Self {
        Self {
            items,
            next_token: None,
        }
    }
}

#[async_trait]
pub trait MetastoreClient: std::fmt::Debug + Send + Sync {
    async fn get_table(&self, database: &str, name: &str) -> ClientResult<TableEntity>;
    async fn create_table(&self, database: &str, table: TableEntity) -> ClientResult<()>;
    async fn delete_table(&self, database: &str, name: &str) -> ClientResult<()>;
    async fn get_tables(
        &self,
        database: &str,
        next_token: Option<String>,
    ) -> ClientResult<Page<TableEntity>>;

    async fn create_database(&self, database: NamespaceEntity) -> ClientResult<()>;
    async fn get_database(&self, name: &str) -> ClientResult<NamespaceEntity>;
    async fn update_database(&self, name: &str, database: NamespaceEntity) -> ClientResult<()>;
    async fn delete_database(&self, name: &str) -> ClientResult<()>;
    async fn get_databases(&self, next_token: Option<String>)
    -> ClientResult<Page<NamespaceEntity>>;
}
