use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_glue::Client;
use aws_sdk_glue::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_glue::types;

use super::{ClientResult, MetastoreClient, MetastoreClientError, Page};
use crate::models::{Column, NamespaceEntity, SerDeInfo, StorageDescriptor, TableEntity};

/// [`MetastoreClient`] backed by the AWS Glue Data Catalog.
#[derive(Debug, Clone)]
pub struct GlueMetastoreClient {
    client: Client,
    catalog_id: Option<String>,
    page_size: Option<i32>,
}

impl GlueMetastoreClient {
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self {
            client,
            catalog_id: None,
            page_size: None,
        }
    }

    #[must_use]
    pub fn with_catalog_id(self, catalog_id: Option<String>) -> Self {
        Self { catalog_id, ..self }
    }

    #[must_use]
    pub fn with_page_size(self, page_size: Option<i32>) -> Self {
        Self { page_size, ..self }
    }
}

fn classify<E, R>(err: &SdkError<E, R>) -> MetastoreClientError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    let message = DisplayErrorContext(err).to_string();
    match err.as_service_error().and_then(|service| service.code()) {
        Some("EntityNotFoundException") => MetastoreClientError::EntityNotFound { message },
        Some("AlreadyExistsException") => MetastoreClientError::AlreadyExists { message },
        Some("InvalidInputException") => MetastoreClientError::InvalidInput { message },
        _ => MetastoreClientError::Service { message },
    }
}

fn invalid_input(err: &aws_sdk_glue::error::BuildError) -> MetastoreClientError {
    MetastoreClientError::InvalidInput {
        message: err.to_string(),
    }
}

fn missing(entity: &str) -> MetastoreClientError {
    MetastoreClientError::Service {
        message: format!("Glue response has no {entity}"),
    }
}

fn params(parameters: Option<&HashMap<String, String>>) -> HashMap<String, String> {
    parameters.cloned().unwrap_or_default()
}

fn non_empty(parameters: &HashMap<String, String>) -> Option<HashMap<String, String>> {
    (!parameters.is_empty()).then(|| parameters.clone())
}

fn table_entity(table: &types::Table) -> TableEntity {
    TableEntity {
        name: table.name().to_string(),
        database_name: table.database_name().map(ToString::to_string),
        table_type: table.table_type().map(ToString::to_string),
        owner: table.owner().map(ToString::to_string),
        description: table.description().map(ToString::to_string),
        parameters: params(table.parameters()),
        storage_descriptor: table.storage_descriptor().map(storage_descriptor),
    }
}

fn storage_descriptor(sd: &types::StorageDescriptor) -> StorageDescriptor {
    StorageDescriptor {
        location: sd.location().map(ToString::to_string),
        input_format: sd.input_format().map(ToString::to_string),
        output_format: sd.output_format().map(ToString::to_string),
        compressed: sd.compressed(),
        number_of_buckets: sd.number_of_buckets(),
        columns: sd
            .columns()
            .iter()
            .map(|column| Column {
                name: column.name().to_string(),
                column_type: column.r#type().map(ToString::to_string),
                comment: column.comment().map(ToString::to_string),
                parameters: params(column.parameters()),
            })
            .collect(),
        bucket_columns: sd.bucket_columns().to_vec(),
        serde_info: sd.serde_info().map(|info| SerDeInfo {
            name: info.name().map(ToString::to_string),
            serialization_library: info.serialization_library().map(ToString::to_string),
            parameters: params(info.parameters()),
        }),
        parameters: params(sd.parameters()),
        stored_as_sub_directories: sd.stored_as_sub_directories(),
    }
}

fn table_input(table: &TableEntity) -> ClientResult<types::TableInput> {
    let storage_descriptor = table
        .storage_descriptor
        .as_ref()
        .map(storage_descriptor_input)
        .transpose()?;
    types::TableInput::builder()
        .name(&table.name)
        .set_table_type(table.table_type.clone())
        .set_owner(table.owner.clone())
        .set_description(table.description.clone())
        .set_parameters(non_empty(&table.parameters))
        .set_storage_descriptor(storage_descriptor)
        .build()
        .map_err(|err| invalid_input(&err))
}

fn storage_descriptor_input(sd: &StorageDescriptor) -> ClientResult<types::StorageDescriptor> {
    let columns = sd
        .columns
        .iter()
        .map(|column| {
            types::Column::builder()
                .name(&column.name)
                .set_type(column.column_type.clone())
                .set_comment(column.comment.clone())
                .set_parameters(non_empty(&column.parameters))
                .build()
                .map_err(|err| invalid_input(&err))
        })
        .collect::<ClientResult<Vec<_>>>()?;
    let serde_info = sd.serde_info.as_ref().map(|info| {
        types::SerDeInfo::builder()
            .set_name(info.name.clone())
            .set_serialization_library(info.serialization_library.clone())
            .set_parameters(non_empty(&info.parameters))
            .build()
    });
    Ok(types::StorageDescriptor::builder()
        .set_location(sd.location.clone())
        .set_input_format(sd.input_format.clone())
        .set_output_format(sd.output_format.clone())
        .compressed(sd.compressed)
        .number_of_buckets(sd.number_of_buckets)
        .set_columns(Some(columns))
        .set_bucket_columns(Some(sd.bucket_columns.clone()))
        .set_serde_info(serde_info)
        .set_parameters(non_empty(&sd.parameters))
        .stored_as_sub_directories(sd.stored_as_sub_directories)
        .build())
}

fn namespace_entity(database: &types::Database) -> NamespaceEntity {
    NamespaceEntity {
        name: database.name().to_string(),
        description: database.description().map(ToString::to_string),
        location_uri: database.location_uri().map(ToString::to_string),
        parameters: params(database.parameters()),
    }
}

fn database_input(database: &NamespaceEntity) -> ClientResult<types::DatabaseInput> {
    types::DatabaseInput::builder()
        .name(&database.name)
        .set_description(database.description.clone())
        .set_location_uri(database.location_uri.clone())
        .set_parameters(Some(database.parameters.clone()))
        .build()
        .map_err(|err| invalid_input(&err))
}

#[async_trait]
impl MetastoreClient for GlueMetastoreClient {
    async fn get_table(&self, database: &str, name: &str) -> ClientResult<TableEntity> {
        let output = self
            .client
            .get_table()
            .set_catalog_id(self.catalog_id.clone())
            .database_name(database)
            .name(name)
            .send()
            .await
            .map_err(|err| classify(&err))?;
        output.table().map(table_entity).ok_or_else(|| missing("table"))
    }

    async fn create_table(&self, database: &str, table: TableEntity) -> ClientResult<()> {
        self.client
            .create_table()
            .set_catalog_id(self.catalog_id.clone())
            .database_name(database)
            .table_input(table_input(&table)?)
            .send()
            .await
            .map_err(|err| classify(&err))?;
        Ok(())
    }

    async fn delete_table(&self, database: &str, name: &str) -> ClientResult<()> {
        self.client
            .delete_table()
            .set_catalog_id(self.catalog_id.clone())
            .database_name(database)
            .name(name)
            .send()
            .await
            .map_err(|err| classify(&err))?;
        Ok(())
    }

    async fn get_tables(
        &self,
        database: &str,
        next_token: Option<String>,
    ) -> ClientResult<Page<TableEntity>> {
        let output = self
            .client
            .get_tables()
            .set_catalog_id(self.catalog_id.clone())
            .database_name(database)
            .set_next_token(next_token)
            .set_max_results(self.page_size)
            .send()
            .await
            .map_err(|err| classify(&err))?;
        Ok(Page::new(
            output.table_list().iter().map(table_entity).collect(),
            output.next_token().map(ToString::to_string),
        ))
    }

    async fn create_database(&self, database: NamespaceEntity) -> ClientResult<()> {
        self.client
            .create_database()
            .set_catalog_id(self.catalog_id.clone())
            .database_input(database_input(&database)?)
            .send()
            .await
            .map_err(|err| classify(&err))?;
        Ok(())
    }

    async fn get_database(&self, name: &str) -> ClientResult<NamespaceEntity> {
        let output = self
            .client
            .get_database()
            .set_catalog_id(self.catalog_id.clone())
            .name(name)
            .send()
            .await
            .map_err(|err| classify(&err))?;
        output
            .database()
            .map(namespace_entity)
            .ok_or_else(|| missing("database"))
    }

    async fn update_database(&self, name: &str, database: NamespaceEntity) -> ClientResult<()> {
        self.client
            .update_database()
            .set_catalog_id(self.catalog_id.clone())
            .name(name)
            .database_input(database_input(&database)?)
            .send()
            .await
            .map_err(|err| classify(&err))?;
        Ok(())
    }

    async fn delete_database(&self, name: &str) -> ClientResult<()> {
        self.client
            .delete_database()
            .set_catalog_id(self.catalog_id.clone())
            .name(name)
            .send()
            .await
            .map_err(|err| classify(&err))?;
        Ok(())
    }

    async fn get_databases(
        &self,
        next_token: Option<String>,
    ) -> ClientResult<Page<NamespaceEntity>> {
        let output = self
            .client
            .get_databases()
            .set_catalog_id(self.catalog_id.clone())
            .set_next_token(next_token)
            .set_max_results(self.page_size)
            .send()
            .await
            .map_err(|err| classify(&err))?;
        Ok(Page::new(
            output.database_list().iter().map(namespace_entity).collect(),
            output.next_token().map(ToString::to_string),
        ))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::models::{EntityType, METADATA_LOCATION, TABLE_TYPE};

    #[test]
    fn test_table_input_carries_bookkeeping() {
        let entity = TableEntity::new("t1")
            .with_owner("analyst")
            .with_table_type(EntityType::ExternalTable)
            .with_parameter(TABLE_TYPE, "ICEBERG")
            .with_parameter(METADATA_LOCATION, "s3://b/t1/metadata/1.json")
            .with_storage_descriptor(StorageDescriptor {
                location: Some("s3://b/t1".to_string()),
                columns: vec![Column {
                    name: "id".to_string(),
                    column_type: Some("int".to_string()),
                    ..Column::default()
                }],
                ..StorageDescriptor::default()
            });
        let input = table_input(&entity).unwrap();
        assert_eq!(input.name(), "t1");
        assert_eq!(input.owner(), Some("analyst"));
        assert_eq!(input.table_type(), Some("EXTERNAL_TABLE"));
        let sd = input.storage_descriptor().unwrap();
        assert_eq!(sd.location(), Some("s3://b/t1"));
        assert_eq!(sd.columns()[0].r#type(), Some("int"));
    }

    #[test]
    fn test_database_fields_map_to_entity() {
        let database = types::Database::builder()
            .name("sales")
            .description("sales data")
            .location_uri("s3://b/sales")
            .parameters("owner", "team")
            .build()
            .unwrap();
        let entity = namespace_entity(&database);
        assert_eq!(entity.name, "sales");
        assert_eq!(entity.description.as_deref(), Some("sales data"));
        assert_eq!(entity.location_uri.as_deref(), Some("s3://b/sales"));
        assert_eq!(entity.parameters.get("owner").map(String::as_str), Some("team"));

        let input = database_input(&entity).unwrap();
        assert_eq!(input.name(), "sales");
        assert_eq!(input.location_uri(), Some("s3://b/sales"));
    }
}
