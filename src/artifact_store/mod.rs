//! Storage of the rendered certificate images.
//!
//! The workflow engine treats images as opaque artifacts: it stores bytes,
//! keeps the returned location in the certificate record, and deletes
//! artifacts when the records referencing them go away.

mod dumb_artifact_store;
mod interface;
mod local_artifact_store;

pub use dumb_artifact_store::DumbArtifactStore;
pub use interface::ArtifactStore;
pub use local_artifact_store::LocalArtifactStore;

#[cfg(test)]
pub use interface::MockArtifactStore;
