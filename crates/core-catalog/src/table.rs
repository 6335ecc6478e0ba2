use std::sync::Arc;

use iceberg_rust_spec::{
    partition::PartitionSpec, schema::Schema, sort::SortOrder, table_metadata::TableMetadata,
};

use crate::catalog::Catalog;
use crate::error::Result;
use crate::identifier::TableIdent;
use crate::io::FileIo;
use crate::models::Properties;

/// An Iceberg table as seen through a catalog.
///
/// Holds the metadata read at load time. Nothing is cached beyond that:
/// [`Table::refresh`] goes back to the catalog for the current pointer.
#[derive(Clone)]
pub struct Table {
    ident: TableIdent,
    metadata: TableMetadata,
    metadata_location: String,
    io: FileIo,
    catalog: Arc<dyn Catalog>,
}

impl std::fmt::Debug for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Table")
            .field("ident", &self.ident)
            .field("metadata_location", &self.metadata_location)
            .field("catalog", &self.catalog.name())
            .finish_non_exhaustive()
    }
}

impl Table {
    #[must_use]
    pub fn new(
        ident: TableIdent,
        metadata: TableMetadata,
        metadata_location: String,
        io: FileIo,
        catalog: Arc<dyn Catalog>,
    ) -> Self {
        Self {
            ident,
            metadata,
            metadata_location,
            io,
            catalog,
        }
    }

    #[must_use]
    pub const fn ident(&self) -> &TableIdent {
        &self.ident
    }

    #[must_use]
    pub const fn metadata(&self) -> &TableMetadata {
        &self.metadata
    }

    #[must_use]
    pub fn metadata_location(&self) -> &str {
        &self.metadata_location
    }

    #[must_use]
    pub const fn io(&self) -> &FileIo {
        &self.io
    }

    #[must_use]
    pub fn catalog(&self) -> &Arc<dyn Catalog> {
        &self.catalog
    }

    /// Reloads metadata from the table's current pointer.
    pub async fn refresh(&mut self) -> Result<()> {
        let fresh = self.catalog.load_table(&self.ident).await?;
        self.metadata = fresh.metadata;
        self.metadata_location = fresh.metadata_location;
        self.io = fresh.io;
        Ok(())
    }

    /// Proposes `metadata` as the table's next state, based on the metadata
    /// this handle was loaded with.
    pub async fn commit(&self, metadata: TableMetadata) -> Result<CommitTableResponse> {
        self.catalog
            .commit_table(CommitTableRequest {
                identifier: self.ident.clone(),
                base_metadata_location: self.metadata_location.clone(),
                metadata,
            })
            .await
    }
}

/// Arguments of [`Catalog::create_table`].
#[derive(Debug, Clone)]
pub struct TableCreation {
    pub schema: Schema,
    /// Table root. Derived from the namespace or warehouse when absent.
    pub location: Option<String>,
    pub partition_spec: Option<PartitionSpec>,
    pub sort_order: Option<SortOrder>,
    pub properties: Properties,
}

impl TableCreation {
    #[must_use]
    pub fn new(schema: Schema) -> Self {
        Self {
            schema,
            location: None,
            partition_spec: None,
            sort_order: None,
            properties: Properties::new(),
        }
    }

    #[must_use]
    pub fn with_location(self, location: impl Into<String>) -> Self {
        Self {
            location: Some(location.into()),
            ..self
        }
    }

    #[must_use]
    pub fn with_partition_spec(self, partition_spec: PartitionSpec) -> Self {
        Self {
            partition_spec: Some(partition_spec),
            ..self
        }
    }

    #[must_use]
    pub fn with_sort_order(self, sort_order: SortOrder) -> Self {
        Self {
            sort_order: Some(sort_order),
            ..self
        }
    }

    #[must_use]
    pub fn with_properties(self, properties: Properties) -> Self {
        Self { properties, ..self }
    }
}

/// Request to make `metadata` the current state of a table.
///
/// A committing catalog must compare the table's current metadata location
/// with `base_metadata_location` before writing anything, and fail with a
/// conflict when they differ.
#[derive(Debug, Clone)]
pub struct CommitTableRequest {
    pub identifier: TableIdent,
    pub base_metadata_location: String,
    pub metadata: TableMetadata,
}

#[derive(Debug, Clone)]
pub struct CommitTableResponse {
    pub metadata: TableMetadata,
    pub metadata_location: String,
}
