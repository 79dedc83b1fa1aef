use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::entities::{ArtifactData, ArtifactLocation};
use crate::StdResult;

use super::ArtifactStore;

/// A [ArtifactStore] that keeps everything in memory.
///
/// Meant for tests: it records what was stored and deleted so assertions can
/// be made on the artifact traffic.
pub struct DumbArtifactStore {
    artifacts: RwLock<HashMap<ArtifactLocation, Vec<u8>>>,
    deleted: RwLock<Vec<ArtifactLocation>>,
}

impl DumbArtifactStore {
    /// DumbArtifactStore factory
    pub fn new() -> Self {
        Self {
            artifacts: RwLock::new(HashMap::new()),
            deleted: RwLock::new(Vec::new()),
        }
    }

    /// Return the bytes stored at the given location if any.
    pub async fn get(&self, location: &str) -> Option<Vec<u8>> {
        self.artifacts.read().await.get(location).cloned()
    }

    /// Return the locations of the artifacts currently stored.
    pub async fn stored_locations(&self) -> Vec<ArtifactLocation> {
        self.artifacts.read().await.keys().cloned().collect()
    }

    /// Return the locations that were deleted.
    pub async fn deleted_locations(&self) -> Vec<ArtifactLocation> {
        self.deleted.read().await.clone()
    }
}

impl Default for DumbArtifactStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ArtifactStore for DumbArtifactStore {
    async fn store(&self, artifact: &ArtifactData, key: &str) -> StdResult<ArtifactLocation> {
        let location = format!("dumb://artifact/{key}");
        self.artifacts
            .write()
            .await
            .insert(location.clone(), artifact.bytes.clone());

        Ok(location)
    }

    async fn delete(&self, location: &ArtifactLocation) -> StdResult<()> {
        self.artifacts.write().await.remove(location);
        self.deleted.write().await.push(location.clone());

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn store_then_get_then_delete() {
        let store = DumbArtifactStore::new();
        let artifact = ArtifactData::new(b"bytes".to_vec(), "image/png");

        let location = store.store(&artifact, "key.png").await.unwrap();
        assert_eq!(Some(b"bytes".to_vec()), store.get(&location).await);

        store.delete(&location).await.unwrap();
        assert_eq!(None, store.get(&location).await);
        assert_eq!(vec![location], store.deleted_locations().await);
    }
}
