//! SQLite plumbing shared by the repositories.
//!
//! The database layer is built from small composable pieces: a
//! [Projection] describes the fields a query returns, a [WhereCondition]
//! carries the filters and their parameters, a [Query] assembles both into
//! SQL, and [ConnectionExtensions] executes queries and hydrates the
//! resulting rows into [SqLiteEntity] implementations through an
//! [EntityCursor].

mod condition;
mod connection_builder;
mod connection_extensions;
mod cursor;
mod entity;
mod migration;
mod projection;
mod query;
mod transaction;

pub use condition::WhereCondition;
pub use connection_builder::ConnectionBuilder;
pub use connection_extensions::ConnectionExtensions;
pub use cursor::EntityCursor;
pub use entity::{HydrationError, SqLiteEntity};
pub use migration::{DatabaseVersionChecker, DbVersion, SqlMigration};
pub use projection::{Projection, ProjectionField, SourceAlias};
pub use query::Query;
pub use transaction::Transaction;

/// Database connection type used everywhere in this crate.
pub type SqliteConnection = sqlite::ConnectionThreadSafe;
