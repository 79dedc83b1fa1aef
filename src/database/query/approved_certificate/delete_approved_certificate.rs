use sqlite::Value;

use crate::database::record::ApprovedCertificateRecord;
use crate::sqlite::{Query, SourceAlias, SqLiteEntity, WhereCondition};

/// Query to delete an [ApprovedCertificateRecord] from the sqlite database.
pub struct DeleteApprovedCertificateRecordQuery {
    condition: WhereCondition,
}

impl DeleteApprovedCertificateRecordQuery {
    /// Delete the record with the given identifier.
    pub fn by_certificate_id(certificate_id: &str) -> Self {
        Self {
            condition: WhereCondition::new(
                "certificate_id = ?*",
                vec![Value::String(certificate_id.to_owned())],
            ),
        }
    }
}

impl Query for DeleteApprovedCertificateRecordQuery {
    type Entity = ApprovedCertificateRecord;

    fn filters(&self) -> WhereCondition {
        self.condition.clone()
    }

    fn get_definition(&self, condition: &str) -> String {
        // it is important to alias the fields with the same name as the table
        // since the table cannot be aliased in a RETURNING statement in SQLite.
        let projection = Self::Entity::get_projection().expand(SourceAlias::new(&[(
            "{:approved_certificate:}",
            "approved_certificate",
        )]));

        format!("delete from approved_certificate where {condition} returning {projection}")
    }
}

#[cfg(test)]
mod tests {
    use crate::database::test_helper::{insert_approved_certificates, main_db_connection};
    use crate::sqlite::ConnectionExtensions;

    use super::*;

    #[test]
    fn delete_returns_the_deleted_record_once() {
        let connection = main_db_connection().unwrap();
        let record = ApprovedCertificateRecord::dummy("approved-1", "cert-1");
        insert_approved_certificates(&connection, vec![record.clone()]).unwrap();

        let deleted = connection
            .fetch_first(DeleteApprovedCertificateRecordQuery::by_certificate_id(
                "approved-1",
            ))
            .unwrap();
        assert_eq!(Some(record), deleted);

        let deleted = connection
            .fetch_first(DeleteApprovedCertificateRecordQuery::by_certificate_id(
                "approved-1",
            ))
            .unwrap();
        assert_eq!(None, deleted);
    }
}
