//! Conversions between catalog properties and metastore entities.

use snafu::prelude::*;

use crate::error::{MissingPropertySnafu, NotThisFormatSnafu, Result};
use crate::identifier::TableIdent;
use crate::models::{
    DESCRIPTION, EntityType, ICEBERG, LOCATION, METADATA_LOCATION, NamespaceEntity, Properties,
    TABLE_TYPE, TableEntity,
};

/// Entity registering a new Iceberg table whose current metadata lives at
/// `metadata_location`.
#[must_use]
pub fn to_table_entity(name: &str, metadata_location: &str, properties: &Properties) -> TableEntity {
    let mut entity = TableEntity::new(name)
        .with_table_type(EntityType::ExternalTable)
        .with_parameter(TABLE_TYPE, ICEBERG)
        .with_parameter(METADATA_LOCATION, metadata_location);
    entity.description = properties.get(DESCRIPTION).cloned();
    entity
}

/// Copy of `source` registered under `new_name`.
///
/// Every field the metastore keeps, including owner and storage descriptor,
/// is carried over. The owning database is decided by the create call.
#[must_use]
pub fn to_rename_entity(new_name: &str, source: &TableEntity) -> TableEntity {
    TableEntity {
        name: new_name.to_string(),
        database_name: None,
        ..source.clone()
    }
}

/// Validates that `entity` is an Iceberg table and returns its metadata location.
pub fn from_table_entity(ident: &TableIdent, entity: &TableEntity) -> Result<String> {
    let namespace = entity
        .database_name
        .as_deref()
        .unwrap_or_else(|| ident.namespace().name());
    let table_type = entity.parameters.get(TABLE_TYPE);
    ensure!(
        table_type.is_some_and(|value| value.eq_ignore_ascii_case(ICEBERG)),
        NotThisFormatSnafu {
            namespace,
            table: &entity.name,
            found: table_type.cloned(),
        }
    );
    entity
        .parameters
        .get(METADATA_LOCATION)
        .cloned()
        .context(MissingPropertySnafu {
            namespace,
            table: &entity.name,
            property: METADATA_LOCATION,
        })
}

#[must_use]
pub fn to_namespace_entity(name: &str, properties: &Properties) -> NamespaceEntity {
    let mut entity = NamespaceEntity::new(name);
    for (key, value) in properties {
        match key.as_str() {
            DESCRIPTION => entity.description = Some(value.clone()),
            LOCATION => entity.location_uri = Some(value.clone()),
            _ => {
                entity.parameters.insert(key.clone(), value.clone());
            }
        }
    }
    entity
}

#[must_use]
pub fn from_namespace_entity(entity: &NamespaceEntity) -> Properties {
    let mut properties = entity.parameters.clone();
    if let Some(location) = &entity.location_uri {
        properties.insert(LOCATION.to_string(), location.clone());
    }
    if let Some(description) = &entity.description {
        properties.insert(DESCRIPTION.to_string(), description.clone());
    }
    properties
}
