use std::cmp::Ordering;
use std::collections::BTreeSet;

use anyhow::Context;
use chrono::Utc;
use slog::{debug, info, Logger};
use sqlite::Value;

use crate::StdResult;

use super::{ConnectionExtensions, SqliteConnection};

/// Database version number.
pub type DbVersion = i64;

/// A migration to be applied to the database, one per database version.
///
/// There can be several SQL statements per migration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlMigration {
    /// Version this migration brings the database to.
    pub version: DbVersion,

    /// SQL statements of the migration.
    pub alterations: String,
}

impl SqlMigration {
    /// SqlMigration factory
    pub fn new(version: DbVersion, alterations: &str) -> Self {
        Self {
            version,
            alterations: alterations.to_string(),
        }
    }
}

impl PartialOrd for SqlMigration {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SqlMigration {
    fn cmp(&self, other: &Self) -> Ordering {
        self.version.cmp(&other.version)
    }
}

/// Perform the database structure version check and apply the missing
/// migrations at application startup.
pub struct DatabaseVersionChecker<'conn> {
    connection: &'conn SqliteConnection,
    logger: Logger,
    migrations: BTreeSet<SqlMigration>,
}

impl<'conn> DatabaseVersionChecker<'conn> {
    /// DatabaseVersionChecker factory
    pub fn new(logger: Logger, connection: &'conn SqliteConnection) -> Self {
        Self {
            connection,
            logger,
            migrations: BTreeSet::new(),
        }
    }

    /// Register a migration.
    pub fn add_migration(&mut self, migration: SqlMigration) -> &mut Self {
        let _ = self.migrations.insert(migration);

        self
    }

    /// Check the database version and apply the registered migrations newer
    /// than it.
    pub fn apply(&self) -> StdResult<()> {
        debug!(self.logger, "check database version");
        self.connection
            .execute(
                "create table if not exists db_version \
                 (version integer not null, updated_at text not null)",
            )
            .with_context(|| "Can not create table 'db_version' while applying migrations")?;
        let db_version: DbVersion = self
            .connection
            .query_single_cell("select coalesce(max(version), 0) from db_version", &[])
            .with_context(|| "Can not get database version while applying migrations")?;

        // The expected version is the maximum registered migration version,
        // 0 when no migration is registered.
        let migration_version = self.migrations.iter().map(|m| m.version).max().unwrap_or(0);

        match migration_version.cmp(&db_version) {
            Ordering::Greater => {
                debug!(
                    self.logger,
                    "database upgrade from version '{db_version}' to version \
                     '{migration_version}', applying new migrations…"
                );
                for migration in self.migrations.iter().filter(|m| m.version > db_version) {
                    self.connection.execute(&migration.alterations)?;
                    self.save_version(migration.version)?;
                }
                info!(
                    self.logger,
                    "database upgraded to version '{migration_version}'"
                );
            }
            Ordering::Less => {
                anyhow::bail!(
                    "This software version is older than the database structure. \
                     Aborting launch to prevent possible data corruption."
                );
            }
            Ordering::Equal => {
                debug!(self.logger, "database up to date");
            }
        }

        Ok(())
    }

    fn save_version(&self, version: DbVersion) -> StdResult<()> {
        let mut statement = self
            .connection
            .prepare("insert into db_version (version, updated_at) values (?, ?)")?;
        statement.bind(
            &[
                Value::Integer(version),
                Value::String(Utc::now().to_rfc3339()),
            ][..],
        )?;
        statement.next()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use sqlite::Connection;

    use crate::test_tools::discard_logger;

    use super::*;

    #[test]
    fn apply_migrations_in_order_and_record_version() {
        let connection = Connection::open_thread_safe(":memory:").unwrap();
        let mut checker = DatabaseVersionChecker::new(discard_logger(), &connection);
        checker
            .add_migration(SqlMigration::new(
                2,
                "alter table migration_test add column extra text;",
            ))
            .add_migration(SqlMigration::new(
                1,
                "create table migration_test (migration_test_id integer primary key);",
            ));

        checker.apply().unwrap();

        let version: DbVersion = connection
            .query_single_cell("select max(version) from db_version", &[])
            .unwrap();
        assert_eq!(2, version);
        connection
            .execute("insert into migration_test (migration_test_id, extra) values (1, 'val')")
            .unwrap();
    }

    #[test]
    fn apply_twice_is_a_no_op() {
        let connection = Connection::open_thread_safe(":memory:").unwrap();
        let mut checker = DatabaseVersionChecker::new(discard_logger(), &connection);
        checker.add_migration(SqlMigration::new(
            1,
            "create table migration_test (migration_test_id integer primary key);",
        ));

        checker.apply().unwrap();
        checker.apply().unwrap();

        let rows: i64 = connection
            .query_single_cell("select count(*) from db_version", &[])
            .unwrap();
        assert_eq!(1, rows);
    }

    #[test]
    fn database_newer_than_software_is_an_error() {
        let connection = Connection::open_thread_safe(":memory:").unwrap();
        connection
            .execute(
                "create table db_version (version integer not null, updated_at text not null); \
                 insert into db_version (version, updated_at) values (42, 'whatever');",
            )
            .unwrap();
        let checker = DatabaseVersionChecker::new(discard_logger(), &connection);

        assert!(checker.apply().is_err());
    }
}
