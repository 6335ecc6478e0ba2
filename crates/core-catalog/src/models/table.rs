use std::collections::HashMap;

/// Metastore-side kind of a table record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityType {
    ExternalTable,
    ManagedTable,
    VirtualView,
}

/// Metastore table record.
///
/// Only `name`, `database_name` and the [`crate::models::TABLE_TYPE`] /
/// [`crate::models::METADATA_LOCATION`] parameters carry meaning for the
/// catalog. Everything else is bookkeeping owned by the metastore and is
/// carried over untouched when a table is renamed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableEntity {
    pub name: String,
    pub database_name: Option<String>,
    pub table_type: Option<String>,
    pub owner: Option<String>,
    pub description: Option<String>,
    pub parameters: HashMap<String, String>,
    pub storage_descriptor: Option<StorageDescriptor>,
}

impl TableEntity {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_database_name(self, database_name: impl Into<String>) -> Self {
        Self {
            database_name: Some(database_name.into()),
            ..self
        }
    }

    #[must_use]
    pub fn with_owner(self, owner: impl Into<String>) -> Self {
        Self {
            owner: Some(owner.into()),
            ..self
        }
    }

    #[must_use]
    pub fn with_table_type(self, table_type: EntityType) -> Self {
        Self {
            table_type: Some(table_type.to_string()),
            ..self
        }
    }

    #[must_use]
    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_storage_descriptor(self, storage_descriptor: StorageDescriptor) -> Self {
        Self {
            storage_descriptor: Some(storage_descriptor),
            ..self
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StorageDescriptor {
    pub location: Option<String>,
    pub input_format: Option<String>,
    pub output_format: Option<String>,
    pub compressed: bool,
    pub number_of_buckets: i32,
    pub columns: Vec<Column>,
    pub bucket_columns: Vec<String>,
    pub serde_info: Option<SerDeInfo>,
    pub parameters: HashMap<String, String>,
    pub stored_as_sub_directories: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub column_type: Option<String>,
    pub comment: Option<String>,
    pub parameters: HashMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SerDeInfo {
    pub name: Option<String>,
    pub serialization_library: Option<String>,
    pub parameters: HashMap<String, String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_entity_type_names() {
        assert_eq!(EntityType::ExternalTable.to_string(), "EXTERNAL_TABLE");
        assert_eq!(
            EntityType::from_str("VIRTUAL_VIEW").unwrap(),
            EntityType::VirtualView
        );
        let entity = TableEntity::new("t1").with_table_type(EntityType::ManagedTable);
        assert_eq!(entity.table_type.as_deref(), Some("MANAGED_TABLE"));
    }
}
