//! Table operations of [`GlueCatalog`].
//!
//! Table pointers live in metastore table entities, metadata files in the
//! object store behind [`crate::io::FileIo`]. The metastore has no rename,
//! so renaming is create-new then delete-old, undone on failure.

use futures::future;
use futures::stream::{BoxStream, StreamExt, TryStreamExt};
use snafu::IntoError;

use crate::catalog::GlueCatalog;
use crate::client::MetastoreClientError;
use crate::error::{
    Error, ManualInterventionRequiredSnafu, NoDefaultLocationSnafu, NoSuchNamespaceSnafu,
    NoSuchTableSnafu, RenameFailedSnafu, Result, TableAlreadyExistsSnafu, UnsupportedSnafu,
};
use crate::identifier::{NamespaceIdent, TableIdent};
use crate::metadata;
use crate::models::{LOCATION, TableEntity};
use crate::namespace::namespace_error;
use crate::pagination;
use crate::table::{CommitTableRequest, CommitTableResponse, Table, TableCreation};
use crate::translate;

impl GlueCatalog {
    /// Writes the initial metadata file and registers the table.
    ///
    /// Without an explicit location the table goes under the namespace
    /// `location` property, or under `{warehouse}/{namespace}.db/` when the
    /// namespace has none.
    #[tracing::instrument(
        name = "GlueCatalog::create_table",
        level = "debug",
        skip(self, creation),
        err
    )]
    pub async fn create_table(&self, ident: &TableIdent, creation: TableCreation) -> Result<Table> {
        let TableCreation {
            schema,
            location,
            partition_spec,
            sort_order,
            properties,
        } = creation;
        let location = location
            .as_deref()
            .map(|location| location.trim_end_matches('/'))
            .filter(|location| !location.is_empty())
            .map(ToString::to_string);
        let location = match location {
            Some(location) => location,
            None => self.default_location(ident).await?,
        };
        let metadata_location = metadata::metadata_location(&location);
        let table_metadata = metadata::new_table_metadata(
            &location,
            schema,
            partition_spec,
            sort_order,
            properties.clone(),
        )?;
        metadata::write_metadata(&self.io, &table_metadata, &metadata_location).await?;

        let entity = translate::to_table_entity(ident.name(), &metadata_location, &properties);
        self.create_table_entity(ident, entity).await?;
        tracing::debug!(%ident, %metadata_location, "registered table");
        self.load_table(ident).await
    }

    #[tracing::instrument(name = "GlueCatalog::register_table", level = "debug", skip(self), err)]
    pub async fn register_table(&self, ident: &TableIdent, metadata_location: &str) -> Result<Table> {
        UnsupportedSnafu {
            operation: "register_table",
        }
        .fail()
    }

    #[tracing::instrument(name = "GlueCatalog::load_table", level = "debug", skip(self), err)]
    pub async fn load_table(&self, ident: &TableIdent) -> Result<Table> {
        let entity = self.table_entity(ident).await?;
        let metadata_location = translate::from_table_entity(ident, &entity)?;
        let table_metadata = metadata::read_metadata(&self.io, &metadata_location).await?;
        Ok(Table::new(
            ident.clone(),
            table_metadata,
            metadata_location,
            self.io.clone(),
            self.shared(),
        ))
    }

    /// Removes the table registration. Metadata and data files stay in place.
    #[tracing::instrument(name = "GlueCatalog::drop_table", level = "debug", skip(self), err)]
    pub async fn drop_table(&self, ident: &TableIdent) -> Result<()> {
        self.client
            .delete_table(ident.namespace().name(), ident.name())
            .await
            .map_err(|err| table_error(ident, "delete_table", err))
    }

    /// Moves an Iceberg table registration to `to`.
    ///
    /// The new entity is a copy of the old one under the new name. If the old
    /// entity cannot be deleted afterwards the new one is deleted again; if
    /// that fails too, both registrations may exist.
    #[tracing::instrument(name = "GlueCatalog::rename_table", level = "debug", skip(self), err)]
    pub async fn rename_table(&self, from: &TableIdent, to: &TableIdent) -> Result<Table> {
        let source = self.table_entity(from).await?;
        translate::from_table_entity(from, &source)?;

        let entity = translate::to_rename_entity(to.name(), &source);
        self.create_table_entity(to, entity).await?;

        if let Err(err) = self.drop_table(from).await {
            return Err(self.rollback_rename(from, to, err).await);
        }
        self.load_table(to).await
    }

    async fn rollback_rename(&self, from: &TableIdent, to: &TableIdent, cause: Error) -> Error {
        tracing::warn!(%from, %to, error = %cause, "failed to drop renamed table, rolling back");
        match self.drop_table(to).await {
            Ok(()) => RenameFailedSnafu {
                from: from.to_string(),
                to: to.to_string(),
            }
            .into_error(cause),
            Err(rollback) => {
                tracing::error!(%from, %to, error = %rollback, "rename rollback failed");
                ManualInterventionRequiredSnafu {
                    from: from.to_string(),
                    to: to.to_string(),
                    rollback: Box::new(rollback),
                }
                .into_error(cause)
            }
        }
    }

    /// Atomic metadata swaps are not available on this catalog.
    #[tracing::instrument(
        name = "GlueCatalog::commit_table",
        level = "debug",
        skip(self, request),
        fields(table = %request.identifier),
        err
    )]
    pub async fn commit_table(&self, request: CommitTableRequest) -> Result<CommitTableResponse> {
        UnsupportedSnafu {
            operation: "commit_table",
        }
        .fail()
    }

    /// Lists all tables of the namespace, Iceberg or not, in metastore order.
    #[tracing::instrument(name = "GlueCatalog::list_tables", level = "debug", skip(self), err)]
    pub async fn list_tables(&self, namespace: &NamespaceIdent) -> Result<Vec<TableIdent>> {
        self.stream_tables(namespace).try_collect().await
    }

    /// Lazily lists the tables of the namespace, fetching pages on demand.
    pub fn stream_tables(&self, namespace: &NamespaceIdent) -> BoxStream<'static, Result<TableIdent>> {
        let client = self.client.clone();
        let database = namespace.name().to_string();
        let lookup = namespace.clone();
        let owner = namespace.clone();
        pagination::paginate(move |token| {
            let client = client.clone();
            let database = database.clone();
            async move { client.get_tables(&database, token).await }
        })
        .map_err(move |err| namespace_error(&lookup, "get_tables", err))
        .and_then(move |entity| future::ready(TableIdent::new(owner.name(), entity.name)))
        .boxed()
    }

    pub async fn table_exists(&self, ident: &TableIdent) -> Result<bool> {
        match self.table_entity(ident).await {
            Ok(_) => Ok(true),
            Err(Error::NoSuchTable { .. }) => Ok(false),
            Err(err) => Err(err),
        }
    }

    async fn table_entity(&self, ident: &TableIdent) -> Result<TableEntity> {
        self.client
            .get_table(ident.namespace().name(), ident.name())
            .await
            .map_err(|err| table_error(ident, "get_table", err))
    }

    async fn create_table_entity(&self, ident: &TableIdent, entity: TableEntity) -> Result<()> {
        self.client
            .create_table(ident.namespace().name(), entity)
            .await
            .map_err(|err| match err {
                MetastoreClientError::AlreadyExists { .. } => TableAlreadyExistsSnafu {
                    namespace: ident.namespace().name(),
                    table: ident.name(),
                }
                .build(),
                MetastoreClientError::EntityNotFound { .. } => NoSuchNamespaceSnafu {
                    namespace: ident.namespace().name(),
                }
                .build(),
                err => Error::from_client("create_table", err),
            })
    }

    async fn default_location(&self, ident: &TableIdent) -> Result<String> {
        let properties = self.load_namespace_properties(ident.namespace()).await?;
        if let Some(location) = properties.get(LOCATION).filter(|location| !location.is_empty()) {
            return Ok(format!("{}/{}", location.trim_end_matches('/'), ident.name()));
        }
        match &self.warehouse {
            Some(warehouse) => Ok(format!(
                "{}/{}.db/{}",
                warehouse.trim_end_matches('/'),
                ident.namespace(),
                ident.name()
            )),
            None => NoDefaultLocationSnafu {
                namespace: ident.namespace().name(),
                table: ident.name(),
            }
            .fail(),
        }
    }
}

fn table_error(ident: &TableIdent, operation: &str, err: MetastoreClientError) -> Error {
    match err {
        MetastoreClientError::EntityNotFound { .. } => NoSuchTableSnafu {
            namespace: ident.namespace().name(),
            table: ident.name(),
        }
        .build(),
        err => Error::from_client(operation, err),
    }
}
