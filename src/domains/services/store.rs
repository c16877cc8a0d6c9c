//! Config store - durable list of service definitions.
//!
//! The store is a YAML file with a single `api_services` list. There is no
//! in-memory cache: every caller reloads from disk, so the file stays the
//! single source of truth and external edits are picked up on next read.

use std::path::{Path, PathBuf};

use tracing::{debug, instrument};

use super::error::{ServiceError, ServiceResult};
use super::model::{ServiceDefinition, ServicesDocument};

/// File-backed store of service definitions.
#[derive(Debug, Clone)]
pub struct ServiceStore {
    path: PathBuf,
}

impl ServiceStore {
    /// Create a store backed by the given YAML file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every definition, in file order.
    ///
    /// Fails with [`ServiceError::ConfigRead`] if the file is missing or
    /// is not a valid services document.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub async fn load(&self) -> ServiceResult<Vec<ServiceDefinition>> {
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| ServiceError::read(&self.path, e.to_string()))?;

        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        let document: ServicesDocument = serde_yaml::from_str(&content)
            .map_err(|e| ServiceError::read(&self.path, e.to_string()))?;

        debug!("Loaded {} service definitions", document.services.len());
        Ok(document.services)
    }

    /// Overwrite the file with the given definitions.
    ///
    /// Content is written to a sibling temp file first and renamed into
    /// place, so readers never observe a half-written store.
    #[instrument(skip(self, services), fields(path = %self.path.display(), count = services.len()))]
    pub async fn save(&self, services: &[ServiceDefinition]) -> ServiceResult<()> {
        let document = ServicesDocument {
            services: services.to_vec(),
        };
        let content = serde_yaml::to_string(&document)
            .map_err(|e| ServiceError::write(&self.path, e.to_string()))?;

        let temp_path = self.temp_path();
        tokio::fs::write(&temp_path, content)
            .await
            .map_err(|e| ServiceError::write(&self.path, e.to_string()))?;
        tokio::fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| ServiceError::write(&self.path, e.to_string()))?;

        debug!("Saved {} service definitions", services.len());
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "services.yaml".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}
