use std::collections::BTreeMap;
use std::io::{Cursor, Read};

use serde::{Deserialize, Serialize};
use zip::result::ZipError;
use zip::ZipArchive;

use crate::error::ReleaseError;

/// Flat CloudFormation stack outputs exported by the deploy stage.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct StackOutputs(BTreeMap<String, String>);

impl StackOutputs {
    pub fn new(outputs: BTreeMap<String, String>) -> Self {
        Self(outputs)
    }

    pub fn from_json(bytes: &[u8]) -> Result<Self, ReleaseError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Reads `file_name` out of a zipped pipeline artifact.
    pub fn from_archive(archive_bytes: &[u8], file_name: &str) -> Result<Self, ReleaseError> {
        let mut archive = ZipArchive::new(Cursor::new(archive_bytes))
            .map_err(|error| ReleaseError::MalformedArtifact(error.to_string()))?;
        let mut entry = archive.by_name(file_name).map_err(|error| match error {
            ZipError::FileNotFound => ReleaseError::MissingProperty(format!(
                "{file_name} is not in the artifact"
            )),
            other => ReleaseError::MalformedArtifact(other.to_string()),
        })?;

        let mut contents = Vec::new();
        entry
            .read_to_end(&mut contents)
            .map_err(|error| ReleaseError::MalformedArtifact(error.to_string()))?;
        Self::from_json(&contents)
    }

    pub fn get(&self, key: &str) -> Result<&str, ReleaseError> {
        self.0
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| ReleaseError::MissingProperty(key.to_string()))
    }

    pub fn api_id(&self, api_logical_id: &str) -> Result<&str, ReleaseError> {
        self.get(&format!("{api_logical_id}Id"))
    }

    pub fn function_name(&self, function_logical_id: &str) -> Result<&str, ReleaseError> {
        self.get(&format!("{function_logical_id}Name"))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
