use sqlite::Value;

use crate::database::record::ApprovedCertificateRecord;
use crate::sqlite::{Query, SourceAlias, SqLiteEntity, WhereCondition};

/// Query to insert an [ApprovedCertificateRecord] in the sqlite database.
pub struct InsertApprovedCertificateRecordQuery {
    condition: WhereCondition,
}

impl InsertApprovedCertificateRecordQuery {
    /// Insert one record.
    pub fn one(record: ApprovedCertificateRecord) -> Self {
        Self {
            condition: WhereCondition::new(
                "(certificate_id, source_certificate_id, certificate_type, recipient_name, \
                 creator_name, issue_date, signatories, approvers, extra_fields, \
                 artifact_location, approved_at) \
                 values (?*, ?*, ?*, ?*, ?*, ?*, ?*, ?*, ?*, ?*, ?*)",
                vec![
                    Value::String(record.certificate_id),
                    Value::String(record.source_certificate_id),
                    Value::String(record.certificate_type),
                    Value::String(record.recipient_name),
                    Value::String(record.creator_name),
                    Value::String(record.issue_date.to_string()),
                    Value::String(serde_json::to_string(&record.signatories).unwrap()),
                    Value::String(serde_json::to_string(&record.approvers).unwrap()),
                    Value::String(
                        serde_json::to_string(&serde_json::Value::Object(record.extra_fields))
                            .unwrap(),
                    ),
                    Value::String(record.artifact_location),
                    Value::String(record.approved_at.to_rfc3339()),
                ],
            ),
        }
    }
}

impl Query for InsertApprovedCertificateRecordQuery {
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

        format!("insert into approved_certificate {condition} returning {projection}")
    }
}

#[cfg(test)]
mod tests {
    use crate::database::test_helper::main_db_connection;
    use crate::sqlite::ConnectionExtensions;

    use super::*;

    #[test]
    fn insert_returns_the_inserted_record() {
        let connection = main_db_connection().unwrap();
        let record = ApprovedCertificateRecord::dummy("approved-1", "cert-1");

        let inserted = connection
            .fetch_first(InsertApprovedCertificateRecordQuery::one(record.clone()))
            .unwrap();

        assert_eq!(Some(record), inserted);
    }
}
