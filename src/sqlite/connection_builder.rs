use std::path::{Path, PathBuf};

use anyhow::Context;
use slog::Logger;
use sqlite::Connection;

use crate::StdResult;

use super::{DatabaseVersionChecker, SqlMigration, SqliteConnection};

/// Builder of a [SqliteConnection] with its startup pragmas and migrations.
pub struct ConnectionBuilder {
    connection_path: Option<PathBuf>,
    sql_migrations: Vec<SqlMigration>,
    logger: Logger,
}

impl ConnectionBuilder {
    /// Build a connection to a database file, created if missing.
    pub fn open_file(path: &Path) -> Self {
        Self {
            connection_path: Some(path.to_path_buf()),
            sql_migrations: Vec::new(),
            logger: Logger::root(slog::Discard, slog::o!()),
        }
    }

    /// Build a connection to an in-memory database.
    pub fn open_memory() -> Self {
        Self {
            connection_path: None,
            sql_migrations: Vec::new(),
            logger: Logger::root(slog::Discard, slog::o!()),
        }
    }

    /// Set the migrations to apply when building the connection.
    pub fn with_migrations(mut self, migrations: Vec<SqlMigration>) -> Self {
        self.sql_migrations = migrations;
        self
    }

    /// Set the logger.
    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = logger;
        self
    }

    /// Open the connection, apply the pragmas and the migrations.
    pub fn build(self) -> StdResult<SqliteConnection> {
        let connection = match &self.connection_path {
            Some(path) => Connection::open_thread_safe(path)
                .with_context(|| format!("opening database file '{}'", path.display()))?,
            None => Connection::open_thread_safe(":memory:")
                .with_context(|| "opening in-memory database")?,
        };

        connection.execute("pragma foreign_keys = true")?;
        if self.connection_path.is_some() {
            // Not supported for in-memory databases.
            connection.execute("pragma journal_mode = wal; pragma synchronous = normal;")?;
        }

        let mut version_checker = DatabaseVersionChecker::new(self.logger.clone(), &connection);
        for migration in self.sql_migrations {
            version_checker.add_migration(migration);
        }
        version_checker
            .apply()
            .with_context(|| "database migration error")?;

        Ok(connection)
    }
}

#[cfg(test)]
mod tests {
    use crate::test_tools::discard_logger;

    use super::*;

    #[test]
    fn build_in_memory_connection_with_migration() {
        let connection = ConnectionBuilder::open_memory()
            .with_logger(discard_logger())
            .with_migrations(vec![SqlMigration::new(
                1,
                "create table builder_test (builder_test_id integer primary key);",
            )])
            .build()
            .unwrap();

        connection
            .execute("insert into builder_test (builder_test_id) values (1)")
            .unwrap();
    }

    #[test]
    fn build_file_connection_applies_wal_journal_mode() {
        use crate::sqlite::ConnectionExtensions;

        let dir = tempfile::tempdir().unwrap();
        let connection = ConnectionBuilder::open_file(&dir.path().join("test.sqlite3"))
            .with_logger(discard_logger())
            .build()
            .unwrap();

        let journal_mode: String = connection
            .query_single_cell("pragma journal_mode", &[])
            .unwrap();
        assert_eq!("wal", journal_mode);
    }
}
