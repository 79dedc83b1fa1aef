//! Test helpers of the database layer.

use crate::sqlite::{ConnectionBuilder, ConnectionExtensions, SqliteConnection};
use crate::test_tools::discard_logger;
use crate::StdResult;

use super::migration::get_migrations;
use super::query::{InsertApprovedCertificateRecordQuery, InsertPendingCertificateRecordQuery};
use super::record::{ApprovedCertificateRecord, PendingCertificateRecord};

/// In-memory connection with all migrations applied.
pub fn main_db_connection() -> StdResult<SqliteConnection> {
    ConnectionBuilder::open_memory()
        .with_logger(discard_logger())
        .with_migrations(get_migrations())
        .build()
}

/// Insert the given records in the pending collection.
pub fn insert_pending_certificates(
    connection: &SqliteConnection,
    records: Vec<PendingCertificateRecord>,
) -> StdResult<()> {
    for record in records {
        connection.apply(InsertPendingCertificateRecordQuery::one(record))?;
    }

    Ok(())
}

/// Insert the given records in the approved collection.
pub fn insert_approved_certificates(
    connection: &SqliteConnection,
    records: Vec<ApprovedCertificateRecord>,
) -> StdResult<()> {
    for record in records {
        connection.apply(InsertApprovedCertificateRecordQuery::one(record))?;
    }

    Ok(())
}
