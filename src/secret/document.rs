use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Secret values keyed by name. Values are base64 encoded, as in a `v1/Secret` manifest.
pub type SecretData = BTreeMap<String, String>;

const API_VERSION: &str = "v1";
const KIND: &str = "Secret";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    pub name: String,
}

/// The manifest written to `<name>.yaml` and handed to sops.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretDocument {
    pub api_version: String,
    pub kind: String,
    pub metadata: Metadata,
    pub data: SecretData,
}

impl SecretDocument {
    pub fn new(name: impl Into<String>, data: SecretData) -> Self {
        Self {
            api_version: API_VERSION.to_string(),
            kind: KIND.to_string(),
            metadata: Metadata { name: name.into() },
            data,
        }
    }

    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }
}

/// A secret as listed from the cluster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretSummary {
    pub name: String,
    pub data: SecretData,
}
