use std::collections::HashMap;

pub mod namespace;
pub mod table;

pub use namespace::*;
pub use table::*;

/// Generic string properties shared by tables and namespaces.
pub type Properties = HashMap<String, String>;

/// Table parameter holding the table format marker.
pub const TABLE_TYPE: &str = "table_type";
/// Table parameter holding the URI of the current metadata file.
pub const METADATA_LOCATION: &str = "metadata_location";
/// Value of [`TABLE_TYPE`] for Iceberg tables, compared case-insensitively.
pub const ICEBERG: &str = "ICEBERG";

/// Namespace property stored in the database description field.
pub const DESCRIPTION: &str = "Description";
/// Namespace property stored in the database location URI field.
pub const LOCATION: &str = "location";

/// Outcome of a namespace property update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertiesUpdateSummary {
    pub removed: Vec<String>,
    pub updated: Vec<String>,
    /// Keys requested for removal that were not set.
    pub missing: Vec<String>,
}
