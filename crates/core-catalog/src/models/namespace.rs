use std::collections::HashMap;

/// Metastore database record backing one flat namespace.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamespaceEntity {
    pub name: String,
    pub description: Option<String>,
    pub location_uri: Option<String>,
    pub parameters: HashMap<String, String>,
}

impl NamespaceEntity {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_description(self, description: impl Into<String>) -> Self {
        Self {
            description: Some(description.into()),
            ..self
        }
    }

    #[must_use]
    pub fn with_location_uri(self, location_uri: impl Into<String>) -> Self {
        Self {
            location_uri: Some(location_uri.into()),
            ..self
        }
    }

    #[must_use]
    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }
}
