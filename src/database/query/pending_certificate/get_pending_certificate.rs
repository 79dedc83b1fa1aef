use sqlite::Value;

use crate::database::record::PendingCertificateRecord;
use crate::sqlite::{Query, SourceAlias, SqLiteEntity, WhereCondition};

/// Queries to retrieve [PendingCertificateRecord] from the sqlite database.
pub struct GetPendingCertificateRecordQuery {
    condition: WhereCondition,
}

impl GetPendingCertificateRecordQuery {
    /// Query every record, whatever its status.
    pub fn all() -> Self {
        Self {
            condition: WhereCondition::default(),
        }
    }

    /// Query a record by its identifier, whatever its status.
    pub fn by_certificate_id(certificate_id: &str) -> Self {
        Self {
            condition: WhereCondition::new(
                "pc.certificate_id = ?*",
                vec![Value::String(certificate_id.to_owned())],
            ),
        }
    }

    /// Query the records visible to an approver: still pending, with the
    /// given email among the approvers, compared case-insensitively.
    pub fn by_approver_email(approver_email: &str) -> Self {
        Self {
            condition: WhereCondition::new("pc.status = 'pending'", Vec::new()).and_where(
                WhereCondition::new(
                    "exists (select 1 from json_each(pc.approvers) \
                     where lower(json_extract(json_each.value, '$.email')) = lower(?*))",
                    vec![Value::String(approver_email.to_owned())],
                ),
            ),
        }
    }
}

impl Query for GetPendingCertificateRecordQuery {
    type Entity = PendingCertificateRecord;

    fn filters(&self) -> WhereCondition {
        self.condition.clone()
    }

    fn get_definition(&self, condition: &str) -> String {
        let aliases = SourceAlias::new(&[("{:pending_certificate:}", "pc")]);
        let projection = Self::Entity::get_projection().expand(aliases);

        format!(
            "select {projection} from pending_certificate as pc \
             where {condition} order by pc.rowid desc"
        )
    }
}

#[cfg(test)]
mod tests {
    use crate::database::test_helper::{insert_pending_certificates, main_db_connection};
    use crate::sqlite::ConnectionExtensions;

    use super::*;

    #[test]
    fn by_approver_email_only_returns_pending_records_of_that_approver() {
        let connection = main_db_connection().unwrap();
        insert_pending_certificates(
            &connection,
            vec![
                PendingCertificateRecord::dummy("cert-1", &["bob@x.com"]),
                PendingCertificateRecord::dummy("cert-2", &["alice@x.com", "bob@x.com"]),
                PendingCertificateRecord::dummy("cert-3", &["carol@x.com"]),
            ],
        )
        .unwrap();

        let records: Vec<PendingCertificateRecord> = connection
            .fetch_collect(GetPendingCertificateRecordQuery::by_approver_email(
                "bob@x.com",
            ))
            .unwrap();

        let mut certificate_ids: Vec<&str> =
            records.iter().map(|r| r.certificate_id.as_str()).collect();
        certificate_ids.sort();
        assert_eq!(vec!["cert-1", "cert-2"], certificate_ids);
    }

    #[test]
    fn by_approver_email_matches_case_insensitively() {
        let connection = main_db_connection().unwrap();
        insert_pending_certificates(
            &connection,
            vec![PendingCertificateRecord::dummy("cert-1", &["Bob@X.com"])],
        )
        .unwrap();

        let records: Vec<PendingCertificateRecord> = connection
            .fetch_collect(GetPendingCertificateRecordQuery::by_approver_email(
                "bob@x.COM",
            ))
            .unwrap();

        assert_eq!(1, records.len());
    }

    #[test]
    fn by_certificate_id_returns_the_record_whatever_its_status() {
        let connection = main_db_connection().unwrap();
        let mut rejected = PendingCertificateRecord::dummy("cert-1", &["bob@x.com"]);
        rejected.status = crate::entities::CertificateStatus::Rejected;
        insert_pending_certificates(&connection, vec![rejected.clone()]).unwrap();

        let record = connection
            .fetch_first(GetPendingCertificateRecordQuery::by_certificate_id("cert-1"))
            .unwrap();

        assert_eq!(Some(rejected), record);

        let record = connection
            .fetch_first(GetPendingCertificateRecordQuery::by_certificate_id(
                "unknown",
            ))
            .unwrap();

        assert_eq!(None, record);
    }
}
