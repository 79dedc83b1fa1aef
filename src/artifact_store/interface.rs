use async_trait::async_trait;

use crate::entities::{ArtifactData, ArtifactLocation};
use crate::StdResult;

/// ArtifactStore represents the binary storage backend keeping the
/// certificate images.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ArtifactStore: Sync + Send {
    /// Store the given artifact under the given key and return its durable
    /// location.
    async fn store(&self, artifact: &ArtifactData, key: &str) -> StdResult<ArtifactLocation>;

    /// Delete the artifact at the given location.
    async fn delete(&self, location: &ArtifactLocation) -> StdResult<()>;
}
