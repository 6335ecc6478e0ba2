use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;

use crate::client::MetastoreClient;
use crate::error::Result;
use crate::identifier::{self, NamespaceIdent, SEPARATOR, TableIdent};
use crate::io::FileIo;
use crate::models::{Properties, PropertiesUpdateSummary};
use crate::table::{CommitTableRequest, CommitTableResponse, Table, TableCreation};

#[async_trait]
pub trait Catalog: std::fmt::Debug + Send + Sync {
    fn name(&self) -> &str;

    async fn create_table(&self, ident: &TableIdent, creation: TableCreation) -> Result<Table>;
    async fn register_table(&self, ident: &TableIdent, metadata_location: &str) -> Result<Table>;
    async fn load_table(&self, ident: &TableIdent) -> Result<Table>;
    async fn drop_table(&self, ident: &TableIdent) -> Result<()>;
    async fn rename_table(&self, from: &TableIdent, to: &TableIdent) -> Result<Table>;
    async fn commit_table(&self, request: CommitTableRequest) -> Result<CommitTableResponse>;
    async fn list_tables(&self, namespace: &NamespaceIdent) -> Result<Vec<TableIdent>>;

    async fn create_namespace(&self, namespace: &NamespaceIdent, properties: Properties)
    -> Result<()>;
    async fn drop_namespace(&self, namespace: &NamespaceIdent) -> Result<()>;
    /// Namespaces are flat, so any parent yields an empty list.
    async fn list_namespaces(&self, parent: Option<&NamespaceIdent>) -> Result<Vec<NamespaceIdent>>;
    async fn load_namespace_properties(&self, namespace: &NamespaceIdent) -> Result<Properties>;
    async fn update_namespace_properties(
        &self,
        namespace: &NamespaceIdent,
        removals: HashSet<String>,
        updates: Properties,
    ) -> Result<PropertiesUpdateSummary>;
}

/// Catalog keeping table pointers in a Glue-shaped metastore.
///
/// Cloning is cheap; clones share the metastore client and file io.
#[derive(Debug, Clone)]
pub struct GlueCatalog {
    pub(crate) name: String,
    pub(crate) client: Arc<dyn MetastoreClient>,
    pub(crate) io: FileIo,
    pub(crate) warehouse: Option<String>,
}

impl GlueCatalog {
    #[must_use]
    pub fn new(name: impl Into<String>, client: Arc<dyn MetastoreClient>, io: FileIo) -> Self {
        Self {
            name: name.into(),
            client,
            io,
            warehouse: None,
        }
    }

    #[must_use]
    pub fn with_warehouse(self, warehouse: impl Into<String>) -> Self {
        Self {
            warehouse: Some(warehouse.into()),
            ..self
        }
    }

    #[must_use]
    pub fn client(&self) -> &Arc<dyn MetastoreClient> {
        &self.client
    }

    #[must_use]
    pub const fn io(&self) -> &FileIo {
        &self.io
    }

    /// Builds the catalog, its Glue client and its file io from configuration.
    #[cfg(feature = "glue")]
    pub async fn from_config(config: &crate::config::CatalogConfig) -> Result<Self> {
        use crate::client::GlueMetastoreClient;

        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
        if let Some(region) = &config.glue.region {
            loader = loader.region(aws_config::Region::new(region.clone()));
        }
        if let Some(endpoint) = &config.glue.endpoint {
            loader = loader.endpoint_url(endpoint);
        }
        let sdk_config = loader.load().await;
        let client = GlueMetastoreClient::new(aws_sdk_glue::Client::new(&sdk_config))
            .with_catalog_id(config.glue.catalog_id.clone())
            .with_page_size(config.glue.page_size);

        let io = FileIo::from_config(&config.file_io)?;
        let catalog = Self::new(&config.name, Arc::new(client), io);
        Ok(match &config.warehouse {
            Some(warehouse) => catalog.with_warehouse(warehouse),
            None => catalog,
        })
    }

    /// Resolves `<namespace>.<table>`, also accepting a leading segment equal
    /// to this catalog's name.
    pub fn table_ident(&self, identifier: &str) -> Result<TableIdent> {
        let segments = identifier.split(SEPARATOR).collect::<Vec<_>>();
        identifier::resolve_segments(self.strip_catalog_name(&segments, 3))
    }

    /// Resolves a namespace name, also accepting a leading segment equal to
    /// this catalog's name.
    pub fn namespace_ident(&self, identifier: &str) -> Result<NamespaceIdent> {
        let segments = identifier.split(SEPARATOR).collect::<Vec<_>>();
        identifier::resolve_namespace_segments(self.strip_catalog_name(&segments, 2))
    }

    fn strip_catalog_name<'a, 's>(&self, segments: &'a [&'s str], min_len: usize) -> &'a [&'s str] {
        match segments.split_first() {
            Some((first, rest)) if segments.len() >= min_len && *first == self.name => rest,
            _ => segments,
        }
    }

    pub(crate) fn shared(&self) -> Arc<dyn Catalog> {
        Arc::new(self.clone())
    }
}

#[async_trait]
impl Catalog for GlueCatalog {
    fn name(&self) -> &str {
        &self.name
    }

    async fn create_table(&self, ident: &TableIdent, creation: TableCreation) -> Result<Table> {
        Self::create_table(self, ident, creation).await
    }

    async fn register_table(&self, ident: &TableIdent, metadata_location: &str) -> Result<Table> {
        Self::register_table(self, ident, metadata_location).await
    }

    async fn load_table(&self, ident: &TableIdent) -> Result<Table> {
        Self::load_table(self, ident).await
    }

    async fn drop_table(&self, ident: &TableIdent) -> Result<()> {
        Self::drop_table(self, ident).await
    }

    async fn rename_table(&self, from: &TableIdent, to: &TableIdent) -> Result<Table> {
        Self::rename_table(self, from, to).await
    }

    async fn commit_table(&self, request: CommitTableRequest) -> Result<CommitTableResponse> {
        Self::commit_table(self, request).await
    }

    async fn list_tables(&self, namespace: &NamespaceIdent) -> Result<Vec<TableIdent>> {
        Self::list_tables(self, namespace).await
    }

    async fn create_namespace(
        &self,
        namespace: &NamespaceIdent,
        properties: Properties,
    ) -> Result<()> {
        Self::create_namespace(self, namespace, properties).await
    }

    async fn drop_namespace(&self, namespace: &NamespaceIdent) -> Result<()> {
        Self::drop_namespace(self, namespace).await
    }

    async fn list_namespaces(&self, parent: Option<&NamespaceIdent>) -> Result<Vec<NamespaceIdent>> {
        Self::list_namespaces(self, parent).await
    }

    async fn load_namespace_properties(&self, namespace: &NamespaceIdent) -> Result<Properties> {
        Self::load_namespace_properties(self, namespace).await
    }

    async fn update_namespace_properties(
        &self,
        namespace: &NamespaceIdent,
        removals: HashSet<String>,
        updates: Properties,
    ) -> Result<PropertiesUpdateSummary> {
        Self::update_namespace_properties(self, namespace, removals, updates).await
    }
}
