use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context};
use async_trait::async_trait;
use slog::{debug, Logger};

use crate::entities::{ArtifactData, ArtifactLocation};
use crate::StdResult;

use super::ArtifactStore;

/// LocalArtifactStore is an artifact store working using local files.
pub struct LocalArtifactStore {
    /// Base URL under which stored artifacts are reachable.
    server_url: String,

    /// Target folder where the artifact files are written.
    target_location: PathBuf,

    logger: Logger,
}

impl LocalArtifactStore {
    /// LocalArtifactStore factory
    pub fn new(server_url: String, target_location: &Path, logger: Logger) -> Self {
        debug!(logger, "New LocalArtifactStore created"; "server_url" => &server_url);
        Self {
            server_url,
            target_location: target_location.to_path_buf(),
            logger,
        }
    }

    /// The file name is the trailing segment of the location.
    fn file_name_from_location(location: &str) -> StdResult<&str> {
        location
            .rsplit('/')
            .next()
            .filter(|name| !name.is_empty())
            .ok_or_else(|| anyhow!("no file name in artifact location '{location}'"))
    }
}

#[async_trait]
impl ArtifactStore for LocalArtifactStore {
    async fn store(&self, artifact: &ArtifactData, key: &str) -> StdResult<ArtifactLocation> {
        let target_path = self.target_location.join(key);
        tokio::fs::write(&target_path, &artifact.bytes)
            .await
            .with_context(|| format!("artifact write failure: '{}'", target_path.display()))?;
        let location = format!("{}artifact/{}", self.server_url, key);
        debug!(self.logger, "artifact stored"; "location" => &location);

        Ok(location)
    }

    async fn delete(&self, location: &ArtifactLocation) -> StdResult<()> {
        let file_name = Self::file_name_from_location(location)?;
        let target_path = self.target_location.join(file_name);
        tokio::fs::remove_file(&target_path)
            .await
            .with_context(|| format!("artifact delete failure: '{}'", target_path.display()))?;
        debug!(self.logger, "artifact deleted"; "location" => location);

        Ok(())
    }
}
