//! Dependency injection: building and sharing the services of the server.
//!
//! Dependencies are built once at startup by the [DependenciesBuilder] and
//! handed to the HTTP layer through the [DependencyContainer]; there is no
//! process-wide mutable state.

mod builder;
mod containers;

pub use builder::DependenciesBuilder;
pub use containers::DependencyContainer;

use thiserror::Error;

use crate::StdError;

/// Error type of the dependency injection module.
#[derive(Debug, Error)]
pub enum DependenciesBuilderError {
    /// A dependency could not be initialized.
    #[error("dependency initialization error: '{0}'")]
    Initialization(String),

    /// An error raised while building a dependency.
    #[error(transparent)]
    Generic(#[from] StdError),
}

/// Result type of the dependency injection module.
pub type Result<T> = std::result::Result<T, DependenciesBuilderError>;
