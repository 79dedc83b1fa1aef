use sqlite::Value;

use crate::database::record::PendingCertificateRecord;
use crate::sqlite::{Query, SourceAlias, SqLiteEntity, WhereCondition};

/// Query to flip a still-pending [PendingCertificateRecord] to the rejected
/// status.
///
/// The condition matches the pending status, so a record that was already
/// rejected, or approved and removed, yields no row: under concurrent
/// decisions the second actor loses and observes a not-found.
pub struct RejectPendingCertificateRecordQuery {
    condition: WhereCondition,
}

impl RejectPendingCertificateRecordQuery {
    /// Reject the record with the given identifier if it is still pending.
    pub fn by_certificate_id(certificate_id: &str) -> Self {
        Self {
            condition: WhereCondition::new(
                "certificate_id = ?* and status = 'pending'",
                vec![Value::String(certificate_id.to_owned())],
            ),
        }
    }
}

impl Query for RejectPendingCertificateRecordQuery {
    type Entity = PendingCertificateRecord;

    fn filters(&self) -> WhereCondition {
        self.condition.clone()
    }

    fn get_definition(&self, condition: &str) -> String {
        // it is important to alias the fields with the same name as the table
        // since the table cannot be aliased in a RETURNING statement in SQLite.
        let projection = Self::Entity::get_projection().expand(SourceAlias::new(&[(
            "{:pending_certificate:}",
            "pending_certificate",
        )]));

        format!(
            "update pending_certificate set status = 'rejected' \
             where {condition} returning {projection}"
        )
    }
}

#[cfg(test)]
mod tests {
    use crate::database::query::GetPendingCertificateRecordQuery;
    use crate::database::test_helper::{insert_pending_certificates, main_db_connection};
    use crate::entities::CertificateStatus;
    use crate::sqlite::ConnectionExtensions;

    use super::*;

    #[test]
    fn reject_flips_status_and_returns_the_record_once() {
        let connection = main_db_connection().unwrap();
        insert_pending_certificates(
            &connection,
            vec![PendingCertificateRecord::dummy("cert-1", &["bob@x.com"])],
        )
        .unwrap();

        let rejected = connection
            .fetch_first(RejectPendingCertificateRecordQuery::by_certificate_id(
                "cert-1",
            ))
            .unwrap()
            .expect("the pending record should have been rejected");
        assert_eq!(CertificateStatus::Rejected, rejected.status);

        // Second rejection matches no row.
        let rejected = connection
            .fetch_first(RejectPendingCertificateRecordQuery::by_certificate_id(
                "cert-1",
            ))
            .unwrap();
        assert_eq!(None, rejected);

        let stored = connection
            .fetch_first(GetPendingCertificateRecordQuery::by_certificate_id("cert-1"))
            .unwrap()
            .unwrap();
        assert_eq!(CertificateStatus::Rejected, stored.status);
    }

    #[test]
    fn reject_unknown_certificate_returns_no_row() {
        let connection = main_db_connection().unwrap();

        let rejected = connection
            .fetch_first(RejectPendingCertificateRecordQuery::by_certificate_id(
                "unknown",
            ))
            .unwrap();

        assert_eq!(None, rejected);
    }
}
