use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::database::query::{
    DeleteApprovedCertificateRecordQuery, DeletePendingCertificateRecordQuery,
    GetApprovedCertificateRecordQuery, InsertApprovedCertificateRecordQuery,
};
use crate::database::record::{ApprovedCertificateRecord, PendingCertificateRecord};
use crate::sqlite::{ConnectionExtensions, SqliteConnection, Transaction};
use crate::StdResult;

/// Database frontend API for the approved certificate collection.
///
/// It also owns the transition that moves a record from the pending
/// collection into this one, since that move must span both tables
/// atomically.
pub struct ApprovedCertificateRepository {
    connection: Arc<SqliteConnection>,
}

impl ApprovedCertificateRepository {
    /// Instantiate a new repository.
    pub fn new(connection: Arc<SqliteConnection>) -> Self {
        Self { connection }
    }

    /// Return all the approved certificates, latest first.
    pub async fn list_all<T>(&self) -> StdResult<Vec<T>>
    where
        T: From<ApprovedCertificateRecord>,
    {
        let records: Vec<ApprovedCertificateRecord> = self
            .connection
            .fetch_collect(GetApprovedCertificateRecordQuery::all())?;

        Ok(records.into_iter().map(Into::into).collect())
    }

    /// Return the approved certificate with the given identifier if any.
    pub async fn get_by_certificate_id<T>(&self, certificate_id: &str) -> StdResult<Option<T>>
    where
        T: From<ApprovedCertificateRecord>,
    {
        Ok(self
            .connection
            .fetch_first(GetApprovedCertificateRecordQuery::by_certificate_id(
                certificate_id,
            ))?
            .map(Into::into))
    }

    /// Move a pending record into the approved collection.
    ///
    /// In a single transaction: delete the pending row if it is still in the
    /// pending status, derive the approved record from the deleted row with
    /// the signed artifact location, insert it. Returns `None` without
    /// writing anything when no pending row matched, which covers both an
    /// unknown identifier and a concurrent decision that got there first.
    /// On success both the deleted pending record and the new approved record
    /// are returned, so the caller can clean up the original artifact.
    pub async fn transfer_from_pending(
        &self,
        pending_certificate_id: &str,
        approved_certificate_id: &str,
        signed_artifact_location: &str,
        approved_at: DateTime<Utc>,
    ) -> StdResult<Option<(PendingCertificateRecord, ApprovedCertificateRecord)>> {
        let transaction = Transaction::begin(&self.connection)?;
        let pending_record = match self.connection.fetch_first(
            DeletePendingCertificateRecordQuery::by_certificate_id_if_pending(
                pending_certificate_id,
            ),
        )? {
            Some(record) => record,
            None => {
                transaction.rollback()?;
                return Ok(None);
            }
        };

        let approved_record = self
            .connection
            .fetch_first(InsertApprovedCertificateRecordQuery::one(
                ApprovedCertificateRecord::from_pending(
                    pending_record.clone(),
                    approved_certificate_id.to_string(),
                    signed_artifact_location.to_string(),
                    approved_at,
                ),
            ))?
            .ok_or_else(|| anyhow::anyhow!("insert returned no approved certificate row"))?;
        transaction.commit()?;

        Ok(Some((pending_record, approved_record)))
    }

    /// Delete the approved certificate with the given identifier, returning
    /// the deleted record if any.
    pub async fn delete(
        &self,
        certificate_id: &str,
    ) -> StdResult<Option<ApprovedCertificateRecord>> {
        self.connection
            .fetch_first(DeleteApprovedCertificateRecordQuery::by_certificate_id(
                certificate_id,
            ))
    }
}
