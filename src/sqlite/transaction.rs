use super::SqliteConnection;

/// Sqlite transaction wrapper.
///
/// A transaction that is neither committed nor rolled back when this object
/// is dropped is rolled back automatically.
pub struct Transaction<'a> {
    connection: &'a SqliteConnection,
    // An active transaction is one that has yet to be committed or rolled back.
    is_active: bool,
}

impl<'a> Transaction<'a> {
    /// Begin a new transaction.
    pub fn begin(connection: &'a SqliteConnection) -> Result<Self, sqlite::Error> {
        connection.execute("BEGIN TRANSACTION")?;
        Ok(Self {
            connection,
            is_active: true,
        })
    }

    /// Commit the transaction.
    pub fn commit(mut self) -> Result<(), sqlite::Error> {
        self.is_active = false;
        self.connection.execute("COMMIT TRANSACTION")?;
        Ok(())
    }

    /// Rollback the transaction.
    pub fn rollback(mut self) -> Result<(), sqlite::Error> {
        self.is_active = false;
        self.connection.execute("ROLLBACK TRANSACTION")?;
        Ok(())
    }
}

impl Drop for Transaction<'_> {
    fn drop(&mut self) {
        if self.is_active {
            // Unwrap should not happen here, otherwise it would mean that we
            // have not handled correctly the transaction "active" state or
            // that the connection was closed.
            self.connection.execute("ROLLBACK TRANSACTION").unwrap();
        }
    }
}
