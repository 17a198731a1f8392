use std::path::{Path, PathBuf};

use crate::error::{Result, StorageError};
use crate::keys::validate_domain;
use crate::models::BugDescription;

/// Read-only access to `<domains>/<domain>/bugs.json`
pub struct BugRepository<'a> {
    domains_dir: &'a Path,
}

impl<'a> BugRepository<'a> {
    pub fn new(domains_dir: &'a Path) -> Self {
        Self { domains_dir }
    }

    fn catalog_path(&self, domain: &str) -> Result<PathBuf> {
        validate_domain(domain)?;
        Ok(self.domains_dir.join(domain).join("bugs.json"))
    }

    /// Find a bug by id in a domain's catalog
    pub async fn find(&self, domain: &str, bug_id: u32) -> Result<BugDescription> {
        let path = self.catalog_path(domain)?;

        let content = tokio::fs::read_to_string(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StorageError::NotFound
            } else {
                StorageError::Io(e)
            }
        })?;

        let bugs: Vec<BugDescription> = serde_json::from_str(&content)?;

        bugs.into_iter()
            .find(|bug| bug.id == bug_id)
            .ok_or(StorageError::NotFound)
    }
}
