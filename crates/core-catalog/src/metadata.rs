use bytes::Bytes;
use iceberg_rust_spec::{
    partition::PartitionSpec,
    schema::Schema,
    sort::SortOrder,
    table_metadata::{FormatVersion, TableMetadata, TableMetadataBuilder},
};
use snafu::ResultExt;
use uuid::Uuid;

use crate::error::{Result, SerdeSnafu, TableMetadataBuilderSnafu};
use crate::io::FileIo;
use crate::models::Properties;

/// Location of a fresh metadata file under `table_location`.
#[must_use]
pub fn metadata_location(table_location: &str) -> String {
    format!(
        "{}/metadata/00000-{}.metadata.json",
        table_location.trim_end_matches('/'),
        Uuid::new_v4()
    )
}

/// Builds format v2 metadata for a table that has no snapshots yet.
pub fn new_table_metadata(
    location: &str,
    schema: Schema,
    partition_spec: Option<PartitionSpec>,
    sort_order: Option<SortOrder>,
    properties: Properties,
) -> Result<TableMetadata> {
    let schema_id = *schema.schema_id();
    let mut builder = TableMetadataBuilder::default();
    builder
        .current_schema_id(schema_id)
        .with_schema((schema_id, schema))
        .format_version(FormatVersion::V2)
        .location(location.to_string())
        .properties(properties);
    if let Some(spec) = partition_spec {
        builder.with_partition_spec((0, spec));
    }
    if let Some(order) = sort_order {
        builder.with_sort_order((0, order));
    }
    builder.build().context(TableMetadataBuilderSnafu)
}

pub async fn write_metadata(io: &FileIo, metadata: &TableMetadata, location: &str) -> Result<()> {
    let data = serde_json::to_vec(metadata).context(SerdeSnafu {
        metadata_location: location,
    })?;
    io.write(location, Bytes::from(data)).await
}

pub async fn read_metadata(io: &FileIo, location: &str) -> Result<TableMetadata> {
    let data = io.read(location).await?;
    serde_json::from_slice(&data).context(SerdeSnafu {
        metadata_location: location,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
pub(crate) mod tests {
    use super::*;
    use crate::error::Error;
    use iceberg_rust_spec::types::{PrimitiveType, StructField, Type};

    pub(crate) fn test_schema() -> Schema {
        Schema::builder()
            .with_schema_id(0)
            .with_struct_field(StructField::new(
                0,
                "id",
                true,
                Type::Primitive(PrimitiveType::Int),
                None,
            ))
            .build()
            .expect("valid schema")
    }

    #[test]
    fn test_metadata_location_layout() {
        let location = metadata_location("s3://bucket/db.db/t1/");
        assert!(location.starts_with("s3://bucket/db.db/t1/metadata/00000-"));
        assert!(location.ends_with(".metadata.json"));
        assert_ne!(location, metadata_location("s3://bucket/db.db/t1"));
    }

    #[tokio::test]
    async fn test_written_metadata_reads_back() {
        let io = FileIo::memory();
        let metadata = new_table_metadata(
            "s3://bucket/db.db/t1",
            test_schema(),
            None,
            None,
            Properties::from([("owner".to_string(), "me".to_string())]),
        )
        .unwrap();
        let location = metadata_location(&metadata.location);
        write_metadata(&io, &metadata, &location).await.unwrap();

        let loaded = read_metadata(&io, &location).await.unwrap();
        assert_eq!(loaded.location, "s3://bucket/db.db/t1");
        assert_eq!(loaded.format_version, FormatVersion::V2);
        assert_eq!(loaded.properties.get("owner").map(String::as_str), Some("me"));
    }

    #[tokio::test]
    async fn test_garbage_metadata() {
        let io = FileIo::memory();
        io.write("s3://bucket/bad.json", Bytes::from_static(b"not json"))
            .await
            .unwrap();
        let err = read_metadata(&io, "s3://bucket/bad.json").await.unwrap_err();
        assert!(matches!(err, Error::Serde { .. }));
    }
}
