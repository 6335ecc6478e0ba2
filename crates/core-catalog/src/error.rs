use std::path::PathBuf;

use iceberg_rust_spec::table_metadata::TableMetadataBuilderError;
use snafu::{IntoError, Location};
use snafu::prelude::*;

use crate::client::MetastoreClientError;

#[derive(Snafu, Debug)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    #[snafu(display("Invalid identifier '{identifier}': {reason}"))]
    InvalidIdentifier {
        identifier: String,
        reason: String,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("Namespace does not exist: {namespace}"))]
    NoSuchNamespace {
        namespace: String,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("Table does not exist: {namespace}.{table}"))]
    NoSuchTable {
        namespace: String,
        table: String,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display(
        "Property table_type is {}, expected ICEBERG: {namespace}.{table}",
        found.as_deref().unwrap_or("missing")
    ))]
    NotThisFormat {
        namespace: String,
        table: String,
        found: Option<String>,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display(
        "Table property {property} is missing, cannot find metadata for: {namespace}.{table}"
    ))]
    MissingProperty {
        namespace: String,
        table: String,
        property: String,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("Table {namespace}.{table} already exists"))]
    TableAlreadyExists {
        namespace: String,
        table: String,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("Namespace {namespace} already exists"))]
    NamespaceAlreadyExists {
        namespace: String,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("Namespace {namespace} is not empty"))]
    NamespaceNotEmpty {
        namespace: String,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("Updates and removals for namespace {namespace} overlap on keys: {keys}"))]
    AmbiguousUpdate {
        namespace: String,
        keys: String,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display(
        "No default location for table {namespace}.{table}: the namespace has no location and no warehouse is configured"
    ))]
    NoDefaultLocation {
        namespace: String,
        table: String,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display(
        "Failed to drop old table {from} while renaming it to {to}. Rolled back table creation for {to}: {source}"
    ))]
    RenameFailed {
        from: String,
        to: String,
        #[snafu(source(from(Error, Box::new)))]
        source: Box<Error>,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display(
        "Failed to drop old table {from} and failed to roll back table creation for {to}. \
         Both tables may now exist, please clean up manually. Drop error: {source}; rollback error: {rollback}"
    ))]
    ManualInterventionRequired {
        from: String,
        to: String,
        #[snafu(source(from(Error, Box::new)))]
        source: Box<Error>,
        rollback: Box<Error>,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("Operation not supported by this catalog: {operation}"))]
    Unsupported {
        operation: String,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("Metastore {operation} failed: {source}"))]
    Metastore {
        operation: String,
        source: MetastoreClientError,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("Object store error at '{path}': {source}"))]
    ObjectStore {
        path: String,
        source: object_store::Error,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("Unable to build object store: {source}"))]
    ObjectStoreBuild {
        source: object_store::Error,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("Invalid table metadata at '{metadata_location}': {source}"))]
    Serde {
        metadata_location: String,
        source: serde_json::Error,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("Invalid location URL '{url}': {source}"))]
    UrlParse {
        url: String,
        source: url::ParseError,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("Invalid location '{url}': {reason}"))]
    InvalidLocation {
        url: String,
        reason: String,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("Unable to build table metadata: {source}"))]
    TableMetadataBuilder {
        source: TableMetadataBuilderError,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("Failed to read catalog config {path:?}: {source}"))]
    ReadConfig {
        path: PathBuf,
        source: std::io::Error,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("Failed to parse catalog config: {source}"))]
    ParseConfig {
        source: serde_yaml::Error,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("Invalid catalog config: {source}"))]
    InvalidConfig {
        source: validator::ValidationErrors,
        #[snafu(implicit)]
        location: Location,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Wraps a metastore signal that has no catalog-level meaning.
    pub(crate) fn from_client(operation: &str, source: MetastoreClientError) -> Self {
        MetastoreSnafu { operation }.into_error(source)
    }
}
