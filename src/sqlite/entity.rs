use thiserror::Error;

use super::Projection;

/// Error raised when a row cannot be turned into an entity.
#[derive(Debug, Error)]
pub enum HydrationError {
    /// The row contains data that cannot be parsed into the target field.
    #[error("invalid data in row: {0}")]
    InvalidData(String),

    /// The row shape does not match the projection.
    #[error("inconsistent row type: {0}")]
    InconsistentType(String),
}

/// A type that can be read from a SQLite row.
pub trait SqLiteEntity {
    /// Build an instance from a result row.
    ///
    /// The field order must match the order of [Self::get_projection].
    fn hydrate(row: sqlite::Row) -> Result<Self, HydrationError>
    where
        Self: Sized;

    /// Return the projection of the fields this entity is read from.
    fn get_projection() -> Projection;
}
