pub mod catalog;
pub mod client;
pub mod config;
pub mod error;
pub mod identifier;
pub mod io;
mod lifecycle;
pub mod metadata;
pub mod models;
mod namespace;
pub mod pagination;
pub mod table;
pub mod translate;


pub use catalog::{Catalog, GlueCatalog};
pub use client::{InMemoryMetastoreClient, MetastoreClient, MetastoreClientError, Page};
pub use config::CatalogConfig;
pub use error::{Error, Result};
pub use identifier::{NamespaceIdent, TableIdent};
pub use io::FileIo;
pub use models::{Properties, PropertiesUpdateSummary};
pub use table::{CommitTableRequest, CommitTableResponse, Table, TableCreation};

#[cfg(feature = "glue")]
pub use client::GlueMetastoreClient;
