use std::sync::Arc;

use crate::database::query::{
    GetPendingCertificateRecordQuery, InsertPendingCertificateRecordQuery,
    RejectPendingCertificateRecordQuery,
};
use crate::database::record::PendingCertificateRecord;
use crate::sqlite::{ConnectionExtensions, SqliteConnection};
use crate::StdResult;

/// Database frontend API for the pending certificate collection.
pub struct PendingCertificateRepository {
    connection: Arc<SqliteConnection>,
}

impl PendingCertificateRepository {
    /// Instantiate a new repository.
    pub fn new(connection: Arc<SqliteConnection>) -> Self {
        Self { connection }
    }

    /// Insert a new pending record.
    pub async fn create<T>(&self, record: PendingCertificateRecord) -> StdResult<T>
    where
        T: From<PendingCertificateRecord>,
    {
        let record = self
            .connection
            .fetch_first(InsertPendingCertificateRecordQuery::one(record))?
            .ok_or_else(|| anyhow::anyhow!("insert returned no pending certificate row"))?;

        Ok(record.into())
    }

    /// Return the record with the given identifier, whatever its status.
    pub async fn get_by_certificate_id<T>(&self, certificate_id: &str) -> StdResult<Option<T>>
    where
        T: From<PendingCertificateRecord>,
    {
        Ok(self
            .connection
            .fetch_first(GetPendingCertificateRecordQuery::by_certificate_id(
                certificate_id,
            ))?
            .map(Into::into))
    }

    /// Return the pending records visible to the given approver email.
    pub async fn list_for_approver<T>(&self, approver_email: &str) -> StdResult<Vec<T>>
    where
        T: From<PendingCertificateRecord>,
    {
        let records: Vec<PendingCertificateRecord> = self.connection.fetch_collect(
            GetPendingCertificateRecordQuery::by_approver_email(approver_email),
        )?;

        Ok(records.into_iter().map(Into::into).collect())
    }

    /// Flip a still-pending record to the rejected status.
    ///
    /// Returns `None` when no pending record matches the identifier: unknown
    /// id, already rejected, or already approved and moved away.
    pub async fn mark_rejected(
        &self,
        certificate_id: &str,
    ) -> StdResult<Option<PendingCertificateRecord>> {
        self.connection
            .fetch_first(RejectPendingCertificateRecordQuery::by_certificate_id(
                certificate_id,
            ))
    }
}

#[cfg(test)]
mod tests {
    use crate::database::test_helper::{insert_pending_certificates, main_db_connection};
    use crate::entities::{CertificateRequest, CertificateStatus};

    use super::*;

    #[tokio::test]
    async fn create_then_get_back_the_record() {
        let connection = Arc::new(main_db_connection().unwrap());
        let repository = PendingCertificateRepository::new(connection);
        let record = PendingCertificateRecord::dummy("cert-1", &["bob@x.com"]);

        let created: PendingCertificateRecord = repository.create(record.clone()).await.unwrap();
        assert_eq!(record, created);

        let request = repository
            .get_by_certificate_id::<CertificateRequest>("cert-1")
            .await
            .unwrap()
            .expect("the created record should be fetchable");
        assert_eq!("Jane Doe", request.recipient_name);
        assert!(request.has_approver("BOB@X.COM"));
    }

    #[tokio::test]
    async fn list_for_approver_excludes_other_approvers_and_non_pending() {
        let connection = Arc::new(main_db_connection().unwrap());
        let mut rejected = PendingCertificateRecord::dummy("cert-2", &["bob@x.com"]);
        rejected.status = CertificateStatus::Rejected;
        insert_pending_certificates(
            &connection,
            vec![
                PendingCertificateRecord::dummy("cert-1", &["bob@x.com"]),
                rejected,
                PendingCertificateRecord::dummy("cert-3", &["alice@x.com"]),
            ],
        )
        .unwrap();
        let repository = PendingCertificateRepository::new(connection);

        let records = repository
            .list_for_approver::<PendingCertificateRecord>("bob@x.com")
            .await
            .unwrap();

        assert_eq!(1, records.len());
        assert_eq!("cert-1", records[0].certificate_id);
    }

    #[tokio::test]
    async fn mark_rejected_succeeds_only_once() {
        let connection = Arc::new(main_db_connection().unwrap());
        insert_pending_certificates(
            &connection,
            vec![PendingCertificateRecord::dummy("cert-1", &["bob@x.com"])],
        )
        .unwrap();
        let repository = PendingCertificateRepository::new(connection);

        let rejected = repository.mark_rejected("cert-1").await.unwrap();
        assert_eq!(
            CertificateStatus::Rejected,
            rejected.expect("first rejection should match the row").status
        );

        assert_eq!(None, repository.mark_rejected("cert-1").await.unwrap());
        assert_eq!(None, repository.mark_rejected("unknown").await.unwrap());
    }
}
