//! Namespace operations of [`GlueCatalog`].
//!
//! A namespace is one metastore database. Properties `Description` and
//! `location` live in dedicated database fields, everything else in the
//! database parameters.

use std::collections::HashSet;

use futures::stream::{BoxStream, StreamExt, TryStreamExt};
use snafu::prelude::*;

use crate::catalog::GlueCatalog;
use crate::client::MetastoreClientError;
use crate::error::{
    AmbiguousUpdateSnafu, Error, NamespaceAlreadyExistsSnafu,
    NamespaceNotEmptySnafu, NoSuchNamespaceSnafu, Result,
};
use crate::identifier::{self, NamespaceIdent};
use crate::models::{Properties, PropertiesUpdateSummary};
use crate::pagination;
use crate::translate;

impl GlueCatalog {
    #[tracing::instrument(
        name = "GlueCatalog::create_namespace",
        level = "debug",
        skip(self, properties),
        err
    )]
    pub async fn create_namespace(
        &self,
        namespace: &NamespaceIdent,
        properties: Properties,
    ) -> Result<()> {
        let entity = translate::to_namespace_entity(namespace.name(), &properties);
        self.client
            .create_database(entity)
            .await
            .map_err(|err| match err {
                MetastoreClientError::AlreadyExists { .. } => NamespaceAlreadyExistsSnafu {
                    namespace: namespace.name(),
                }
                .build(),
                err => Error::from_client("create_database", err),
            })
    }

    /// Drops an empty namespace.
    #[tracing::instrument(name = "GlueCatalog::drop_namespace", level = "debug", skip(self), err)]
    pub async fn drop_namespace(&self, namespace: &NamespaceIdent) -> Result<()> {
        let mut tables = self.stream_tables(namespace);
        ensure!(
            tables.try_next().await?.is_none(),
            NamespaceNotEmptySnafu {
                namespace: namespace.name(),
            }
        );
        self.client
            .delete_database(namespace.name())
            .await
            .map_err(|err| namespace_error(namespace, "delete_database", err))
    }

    /// Lists every namespace, in metastore order.
    #[tracing::instrument(name = "GlueCatalog::list_namespaces", level = "debug", skip(self), err)]
    pub async fn list_namespaces(
        &self,
        parent: Option<&NamespaceIdent>,
    ) -> Result<Vec<NamespaceIdent>> {
        if parent.is_some() {
            return Ok(Vec::new());
        }
        self.stream_namespaces().try_collect().await
    }

    /// Lazily lists every namespace, fetching pages on demand.
    ///
    /// Databases whose names are not valid flat namespaces are skipped.
    pub fn stream_namespaces(&self) -> BoxStream<'static, Result<NamespaceIdent>> {
        let client = self.client.clone();
        pagination::paginate(move |token| {
            let client = client.clone();
            async move { client.get_databases(token).await }
        })
        .map_err(|err| Error::from_client("get_databases", err))
        .try_filter_map(|entity| async move {
            match identifier::resolve_namespace(&entity.name) {
                Ok(namespace) => Ok(Some(namespace)),
                Err(err) => {
                    tracing::warn!(database = %entity.name, error = %err, "skipping database");
                    Ok(None)
                }
            }
        })
        .boxed()
    }

    #[tracing::instrument(
        name = "GlueCatalog::load_namespace_properties",
        level = "debug",
        skip(self),
        err
    )]
    pub async fn load_namespace_properties(&self, namespace: &NamespaceIdent) -> Result<Properties> {
        let entity = self
            .client
            .get_database(namespace.name())
            .await
            .map_err(|err| namespace_error(namespace, "get_database", err))?;
        Ok(translate::from_namespace_entity(&entity))
    }

    pub async fn namespace_exists(&self, namespace: &NamespaceIdent) -> Result<bool> {
        match self.load_namespace_properties(namespace).await {
            Ok(_) => Ok(true),
            Err(Error::NoSuchNamespace { .. }) => Ok(false),
            Err(err) => Err(err),
        }
    }

    /// Removes `removals`, then applies `updates`, and writes the merged
    /// property set back as a whole.
    #[tracing::instrument(
        name = "GlueCatalog::update_namespace_properties",
        level = "debug",
        skip(self, updates),
        err
    )]
    pub async fn update_namespace_properties(
        &self,
        namespace: &NamespaceIdent,
        removals: HashSet<String>,
        updates: Properties,
    ) -> Result<PropertiesUpdateSummary> {
        let mut overlap = removals
            .iter()
            .filter(|key| updates.contains_key(*key))
            .cloned()
            .collect::<Vec<_>>();
        overlap.sort();
        ensure!(
            overlap.is_empty(),
            AmbiguousUpdateSnafu {
                namespace: namespace.name(),
                keys: overlap.join(", "),
            }
        );

        let mut properties = self.load_namespace_properties(namespace).await?;
        let mut summary = PropertiesUpdateSummary::default();
        for key in removals {
            if properties.remove(&key).is_some() {
                summary.removed.push(key);
            } else {
                summary.missing.push(key);
            }
        }
        for (key, value) in updates {
            summary.updated.push(key.clone());
            properties.insert(key, value);
        }
        summary.removed.sort();
        summary.updated.sort();
        summary.missing.sort();

        let entity = translate::to_namespace_entity(namespace.name(), &properties);
        self.client
            .update_database(namespace.name(), entity)
            .await
            .map_err(|err| namespace_error(namespace, "update_database", err))?;
        Ok(summary)
    }
}

/// Maps metastore signals about a database lookup to catalog errors.
pub(crate) fn namespace_error(
    namespace: &NamespaceIdent,
    operation: &str,
    err: MetastoreClientError,
) -> Error {
    match err {
        MetastoreClientError::EntityNotFound { .. } | MetastoreClientError::InvalidInput { .. } => {
            NoSuchNamespaceSnafu {
                namespace: namespace.name(),
            }
            .build()
        }
        err => Error::from_client(operation, err),
    }
}
