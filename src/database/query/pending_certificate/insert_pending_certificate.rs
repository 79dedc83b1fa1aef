use sqlite::Value;

use crate::database::record::PendingCertificateRecord;
use crate::sqlite::{Query, SourceAlias, SqLiteEntity, WhereCondition};

/// Query to insert a [PendingCertificateRecord] in the sqlite database.
pub struct InsertPendingCertificateRecordQuery {
    condition: WhereCondition,
}

impl InsertPendingCertificateRecordQuery {
    /// Insert one record.
    pub fn one(record: PendingCertificateRecord) -> Self {
        Self {
            condition: WhereCondition::new(
                "(certificate_id, certificate_type, recipient_name, creator_name, issue_date, \
                 signatories, approvers, extra_fields, artifact_location, status, created_at) \
                 values (?*, ?*, ?*, ?*, ?*, ?*, ?*, ?*, ?*, ?*, ?*)",
                vec![
                    Value::String(record.certificate_id),
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
                    Value::String(record.status.to_string()),
                    Value::String(record.created_at.to_rfc3339()),
                ],
            ),
        }
    }
}

impl Query for InsertPendingCertificateRecordQuery {
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

        format!("insert into pending_certificate {condition} returning {projection}")
    }
}
