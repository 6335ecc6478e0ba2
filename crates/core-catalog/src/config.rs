use std::path::Path;

use serde::{Deserialize, Serialize};
use snafu::ResultExt;
use validator::Validate;

use crate::error::{InvalidConfigSnafu, ParseConfigSnafu, ReadConfigSnafu, Result};

/// Catalog configuration loaded from YAML.
#[derive(Validate, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct CatalogConfig {
    #[validate(length(min = 1))]
    pub name: String,
    /// Root for default table locations when a namespace has no location.
    #[validate(url)]
    pub warehouse: Option<String>,
    #[serde(default)]
    #[validate(nested)]
    pub file_io: FileIoConfig,
    #[serde(default)]
    #[validate(nested)]
    pub glue: GlueConfig,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum FileIoConfig {
    #[default]
    Memory,
    File(FileConfig),
    S3(S3Config),
}

impl Validate for FileIoConfig {
    fn validate(&self) -> std::result::Result<(), validator::ValidationErrors> {
        match self {
            Self::Memory => Ok(()),
            Self::File(file) => file.validate(),
            Self::S3(s3) => s3.validate(),
        }
    }
}

#[derive(Validate, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct FileConfig {
    #[validate(length(min = 1))]
    pub path: String,
}

#[derive(Validate, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct S3Config {
    #[validate(length(min = 1))]
    pub region: Option<String>,
    #[validate(length(min = 1))]
    pub bucket: Option<String>,
    #[validate(url)]
    pub endpoint: Option<String>,
    #[validate(nested)]
    pub credentials: Option<AwsCredentials>,
}

#[derive(Validate, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct AwsAccessKeyCredentials {
    #[validate(length(min = 1))]
    pub aws_access_key_id: String,
    #[validate(length(min = 1))]
    pub aws_secret_access_key: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "credential_type", rename_all = "kebab-case")]
pub enum AwsCredentials {
    #[serde(rename = "access_key")]
    AccessKey(AwsAccessKeyCredentials),
    #[serde(rename = "token")]
    Token { token: String },
}

impl Validate for AwsCredentials {
    fn validate(&self) -> std::result::Result<(), validator::ValidationErrors> {
        match self {
            Self::AccessKey(creds) => creds.validate(),
            Self::Token { token } => {
                if token.is_empty() {
                    let mut errors = validator::ValidationErrors::new();
                    errors.add(
                        "token",
                        validator::ValidationError::new("Token must not be empty"),
                    );
                    return Err(errors);
                }
                Ok(())
            }
        }
    }
}

/// Settings for the AWS Glue metastore client.
#[derive(Validate, Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub struct GlueConfig {
    #[validate(length(min = 1))]
    pub region: Option<String>,
    #[validate(url)]
    pub endpoint: Option<String>,
    /// Account id of the Glue catalog, defaults to the caller's account.
    #[validate(length(min = 1))]
    pub catalog_id: Option<String>,
    #[validate(range(min = 1, max = 100))]
    pub page_size: Option<i32>,
}

impl CatalogConfig {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            warehouse: None,
            file_io: FileIoConfig::default(),
            glue: GlueConfig::default(),
        }
    }

    /// Parses and validates a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml).context(ParseConfigSnafu)?;
        config.validate().context(InvalidConfigSnafu)?;
        Ok(config)
    }

    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path)
            .await
            .context(ReadConfigSnafu { path })?;
        Self::from_yaml_str(&content)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_parse_s3_config() {
        let yaml = r"
name: glue
warehouse: s3://warehouse/root
file-io:
  type: s3
  region: us-east-1
  bucket: warehouse
  endpoint: http://localhost:9000
  credentials:
    credential_type: access_key
    aws_access_key_id: key
    aws_secret_access_key: secret
glue:
  region: us-east-1
  catalog-id: '123456789012'
  page-size: 50
";
        let config = CatalogConfig::from_yaml_str(yaml).expect("valid config");
        assert_eq!(config.name, "glue");
        assert_eq!(config.warehouse.as_deref(), Some("s3://warehouse/root"));
        assert_eq!(config.glue.page_size, Some(50));
        let FileIoConfig::S3(s3) = config.file_io else {
            panic!("expected s3 file io");
        };
        assert_eq!(s3.bucket.as_deref(), Some("warehouse"));
        assert!(matches!(
            s3.credentials,
            Some(AwsCredentials::AccessKey(_))
        ));
    }

    #[test]
    fn test_defaults_to_memory() {
        let config = CatalogConfig::from_yaml_str("name: local").expect("valid config");
        assert_eq!(config, CatalogConfig::new("local"));
    }

    #[test]
    fn test_invalid_config() {
        let err = CatalogConfig::from_yaml_str("name: ''").unwrap_err();
        assert!(matches!(err, Error::InvalidConfig { .. }));

        let err = CatalogConfig::from_yaml_str("name: x\nglue:\n  page-size: 0").unwrap_err();
        assert!(matches!(err, Error::InvalidConfig { .. }));

        let err = CatalogConfig::from_yaml_str("name: [").unwrap_err();
        assert!(matches!(err, Error::ParseConfig { .. }));
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let err = CatalogConfig::load("/nonexistent/catalog.yaml")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ReadConfig { .. }));
    }
}
