use async_trait::async_trait;
use indexmap::IndexMap;
use snafu::prelude::*;
use tokio::sync::RwLock;

use super::{
    AlreadyExistsSnafu, ClientResult, EntityNotFoundSnafu, InvalidInputSnafu, MetastoreClient,
    Page,
};
use crate::models::{NamespaceEntity, TableEntity};

const DEFAULT_PAGE_SIZE: usize = 100;
const MAX_NAME_LENGTH: usize = 255;

#[derive(Debug)]
struct DatabaseState {
    entity: NamespaceEntity,
    tables: IndexMap<String, TableEntity>,
}

/// Process-local metastore with Glue-like semantics.
///
/// Databases and tables keep insertion order, which is also the listing
/// order. Listings are split into pages of `page_size` entries with the
/// offset of the next page as continuation token.
#[derive(Debug)]
pub struct InMemoryMetastoreClient {
    databases: RwLock<IndexMap<String, DatabaseState>>,
    page_size: usize,
}

impl Default for InMemoryMetastoreClient {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryMetastoreClient {
    #[must_use]
    pub fn new() -> Self {
        Self {
            databases: RwLock::new(IndexMap::new()),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    #[must_use]
    pub fn with_page_size(self, page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            ..self
        }
    }
}

fn validate_name(kind: &str, name: &str) -> ClientResult<()> {
    ensure!(
        !name.is_empty() && name.len() <= MAX_NAME_LENGTH,
        InvalidInputSnafu {
            message: format!("{kind} name '{name}' must be 1 to {MAX_NAME_LENGTH} characters long"),
        }
    );
    Ok(())
}

fn database_not_found(database: &str) -> super::MetastoreClientError {
    EntityNotFoundSnafu {
        message: format!("Database {database} not found"),
    }
    .build()
}

fn paged<T: Clone>(
    values: &[T],
    next_token: Option<String>,
    page_size: usize,
) -> ClientResult<Page<T>> {
    let start = match next_token {
        None => 0,
        Some(token) => token.parse::<usize>().ok().with_context(|| InvalidInputSnafu {
            message: format!("Invalid continuation token '{token}'"),
        })?,
    };
    let end = start.saturating_add(page_size).min(values.len());
    let items = values.get(start..end).map(<[T]>::to_vec).unwrap_or_default();
    let next_token = (end < values.len()).then(|| end.to_string());
    Ok(Page::new(items, next_token))
}

#[async_trait]
impl MetastoreClient for InMemoryMetastoreClient {
    async fn get_table(&self, database: &str, name: &str) -> ClientResult<TableEntity> {
        validate_name("Table", name)?;
        let databases = self.databases.read().await;
        let state = databases
            .get(database)
            .ok_or_else(|| database_not_found(database))?;
        state.tables.get(name).cloned().context(EntityNotFoundSnafu {
            message: format!("Table {name} not found in database {database}"),
        })
    }

    async fn create_table(&self, database: &str, mut table: TableEntity) -> ClientResult<()> {
        validate_name("Table", &table.name)?;
        let mut databases = self.databases.write().await;
        let state = databases
            .get_mut(database)
            .ok_or_else(|| database_not_found(database))?;
        ensure!(
            !state.tables.contains_key(&table.name),
            AlreadyExistsSnafu {
                message: format!("Table {} already exists in database {database}", table.name),
            }
        );
        table.database_name = Some(database.to_string());
        tracing::debug!(database, table = %table.name, "in-memory metastore: create table");
        state.tables.insert(table.name.clone(), table);
        Ok(())
    }

    async fn delete_table(&self, database: &str, name: &str) -> ClientResult<()> {
        let mut databases = self.databases.write().await;
        let state = databases
            .get_mut(database)
            .ok_or_else(|| database_not_found(database))?;
        state
            .tables
            .shift_remove(name)
            .map(|_| ())
            .context(EntityNotFoundSnafu {
                message: format!("Table {name} not found in database {database}"),
            })
    }

    async fn get_tables(
        &self,
        database: &str,
        next_token: Option<String>,
    ) -> ClientResult<Page<TableEntity>> {
        let databases = self.databases.read().await;
        let state = databases
            .get(database)
            .ok_or_else(|| database_not_found(database))?;
        let tables = state.tables.values().cloned().collect::<Vec<_>>();
        paged(&tables, next_token, self.page_size)
    }

    async fn create_database(&self, database: NamespaceEntity) -> ClientResult<()> {
        validate_name("Database", &database.name)?;
        let mut databases = self.databases.write().await;
        ensure!(
            !databases.contains_key(&database.name),
            AlreadyExistsSnafu {
                message: format!("Database {} already exists", database.name),
            }
        );
        tracing::debug!(database = %database.name, "in-memory metastore: create database");
        databases.insert(
            database.name.clone(),
            DatabaseState {
                entity: database,
                tables: IndexMap::new(),
            },
        );
        Ok(())
    }

    async fn get_database(&self, name: &str) -> ClientResult<NamespaceEntity> {
        validate_name("Database", name)?;
        let databases = self.databases.read().await;
        databases
            .get(name)
            .map(|state| state.entity.clone())
            .ok_or_else(|| database_not_found(name))
    }

    async fn update_database(&self, name: &str, database: NamespaceEntity) -> ClientResult<()> {
        validate_name("Database", name)?;
        let mut databases = self.databases.write().await;
        let state = databases
            .get_mut(name)
            .ok_or_else(|| database_not_found(name))?;
        state.entity = database;
        Ok(())
    }

    async fn delete_database(&self, name: &str) -> ClientResult<()> {
        let mut databases = self.databases.write().await;
        databases
            .shift_remove(name)
            .map(|_| ())
            .ok_or_else(|| database_not_found(name))
    }

    async fn get_databases(
        &self,
        next_token: Option<String>,
    ) -> ClientResult<Page<NamespaceEntity>> {
        let databases = self.databases.read().await;
        let entities = databases
            .values()
            .map(|state| state.entity.clone())
            .collect::<Vec<_>>();
        paged(&entities, next_token, self.page_size)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::client::MetastoreClientError;

    #[tokio::test]
    async fn test_table_crud_signals() {
        let client = InMemoryMetastoreClient::new();
        let err = client
            .create_table("db", TableEntity::new("t1"))
            .await
            .unwrap_err();
        assert!(matches!(err, MetastoreClientError::EntityNotFound { .. }));

        client
            .create_database(NamespaceEntity::new("db"))
            .await
            .unwrap();
        client
            .create_table("db", TableEntity::new("t1"))
            .await
            .unwrap();
        let err = client
            .create_table("db", TableEntity::new("t1"))
            .await
            .unwrap_err();
        assert!(matches!(err, MetastoreClientError::AlreadyExists { .. }));

        let table = client.get_table("db", "t1").await.unwrap();
        assert_eq!(table.database_name.as_deref(), Some("db"));

        client.delete_table("db", "t1").await.unwrap();
        let err = client.delete_table("db", "t1").await.unwrap_err();
        assert!(matches!(err, MetastoreClientError::EntityNotFound { .. }));
    }

    #[tokio::test]
    async fn test_invalid_database_name() {
        let client = InMemoryMetastoreClient::new();
        let err = client.get_database("").await.unwrap_err();
        assert!(matches!(err, MetastoreClientError::InvalidInput { .. }));
        let err = client.get_database(&"x".repeat(300)).await.unwrap_err();
        assert!(matches!(err, MetastoreClientError::InvalidInput { .. }));
    }

    #[tokio::test]
    async fn test_pages_follow_insertion_order() {
        let client = InMemoryMetastoreClient::new().with_page_size(2);
        for name in ["c", "a", "b"] {
            client
                .create_database(NamespaceEntity::new(name))
                .await
                .unwrap();
        }

        let first = client.get_databases(None).await.unwrap();
        assert_eq!(first.items.len(), 2);
        assert_eq!(first.next_token.as_deref(), Some("2"));
        let second = client.get_databases(first.next_token).await.unwrap();
        assert_eq!(second.items.len(), 1);
        assert_eq!(second.items[0].name, "b");
        assert_eq!(second.next_token, None);

        let err = client
            .get_databases(Some("not-a-number".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, MetastoreClientError::InvalidInput { .. }));
    }
}
