use std::sync::Arc;

use bytes::Bytes;
use object_store::aws::AmazonS3Builder;
use object_store::local::LocalFileSystem;
use object_store::memory::InMemory;
use object_store::{ObjectStore, PutPayload, path::Path};
use snafu::prelude::*;

use crate::config::{AwsCredentials, FileIoConfig, S3Config};
use crate::error::{
    InvalidLocationSnafu, ObjectStoreBuildSnafu, ObjectStoreSnafu, Result, UrlParseSnafu,
};

/// Handle to the content store holding table metadata files.
///
/// Locations are URLs. Only the URL path addresses the object; scheme and
/// host are expected to match the store the handle was built for.
#[derive(Debug, Clone)]
pub struct FileIo {
    store: Arc<dyn ObjectStore>,
}

impl FileIo {
    #[must_use]
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    #[must_use]
    pub fn memory() -> Self {
        Self::new(Arc::new(InMemory::new()))
    }

    pub fn from_config(config: &FileIoConfig) -> Result<Self> {
        let store: Arc<dyn ObjectStore> = match config {
            FileIoConfig::Memory => Arc::new(InMemory::new()),
            FileIoConfig::File(file) => Arc::new(
                LocalFileSystem::new_with_prefix(&file.path)
                    .context(ObjectStoreBuildSnafu)?
                    .with_automatic_cleanup(true),
            ),
            FileIoConfig::S3(s3) => Arc::new(s3_builder(s3).build().context(ObjectStoreBuildSnafu)?),
        };
        Ok(Self::new(store))
    }

    #[must_use]
    pub fn store(&self) -> &Arc<dyn ObjectStore> {
        &self.store
    }

    pub async fn read(&self, location: &str) -> Result<Bytes> {
        let path = path_for(location)?;
        let result = self
            .store
            .get(&path)
            .await
            .context(ObjectStoreSnafu { path: location })?;
        result
            .bytes()
            .await
            .context(ObjectStoreSnafu { path: location })
    }

    pub async fn write(&self, location: &str, data: Bytes) -> Result<()> {
        let path = path_for(location)?;
        self.store
            .put(&path, PutPayload::from(data))
            .await
            .context(ObjectStoreSnafu { path: location })?;
        tracing::debug!(location, "wrote object");
        Ok(())
    }
}

fn path_for(location: &str) -> Result<Path> {
    let url = url::Url::parse(location).context(UrlParseSnafu { url: location })?;
    let path = Path::from(url.path());
    ensure!(
        !path.as_ref().is_empty(),
        InvalidLocationSnafu {
            url: location,
            reason: "location has no object path",
        }
    );
    Ok(path)
}

fn s3_builder(config: &S3Config) -> AmazonS3Builder {
    let mut builder = AmazonS3Builder::new();
    if let Some(region) = &config.region {
        builder = builder.with_region(region);
    }
    if let Some(bucket) = &config.bucket {
        builder = builder.with_bucket_name(bucket);
    }
    if let Some(endpoint) = &config.endpoint {
        builder = builder
            .with_endpoint(endpoint)
            .with_allow_http(endpoint.starts_with("http:"));
    }
    match &config.credentials {
        Some(AwsCredentials::AccessKey(creds)) => {
            builder = builder
                .with_access_key_id(&creds.aws_access_key_id)
                .with_secret_access_key(&creds.aws_secret_access_key);
        }
        Some(AwsCredentials::Token { token }) => {
            builder = builder.with_token(token);
        }
        None => {}
    }
    builder
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[tokio::test]
    async fn test_write_then_read() {
        let io = FileIo::memory();
        io.write("s3://bucket/db/t1/metadata/a.json", Bytes::from_static(b"{}"))
            .await
            .unwrap();
        let data = io.read("s3://bucket/db/t1/metadata/a.json").await.unwrap();
        assert_eq!(data.as_ref(), b"{}");
    }

    #[tokio::test]
    async fn test_invalid_locations() {
        let io = FileIo::memory();
        let err = io.read("not a url").await.unwrap_err();
        assert!(matches!(err, Error::UrlParse { .. }));

        let err = io.read("s3://bucket").await.unwrap_err();
        assert!(matches!(err, Error::InvalidLocation { .. }));

        let err = io.read("s3://bucket/missing.json").await.unwrap_err();
        assert!(matches!(err, Error::ObjectStore { .. }));
    }

    #[test]
    fn test_s3_from_config() {
        let config = FileIoConfig::S3(S3Config {
            region: Some("us-east-1".to_string()),
            bucket: Some("warehouse".to_string()),
            endpoint: Some("http://localhost:9000".to_string()),
            credentials: Some(AwsCredentials::AccessKey(
                crate::config::AwsAccessKeyCredentials {
                    aws_access_key_id: "key".to_string(),
                    aws_secret_access_key: "secret".to_string(),
                },
            )),
        });
        assert!(FileIo::from_config(&config).is_ok());
    }
}
