use sqlite::Value;

use crate::database::record::PendingCertificateRecord;
use crate::sqlite::{Query, SourceAlias, SqLiteEntity, WhereCondition};

/// Query to delete a still-pending [PendingCertificateRecord] from the sqlite
/// database.
///
/// Used by the approval transition: the `status = 'pending'` guard makes the
/// delete conditional, so two concurrent approvals cannot both claim the
/// record.
pub struct DeletePendingCertificateRecordQuery {
    condition: WhereCondition,
}

impl DeletePendingCertificateRecordQuery {
    /// Delete the record with the given identifier if it is still pending.
    pub fn by_certificate_id_if_pending(certificate_id: &str) -> Self {
        Self {
            condition: WhereCondition::new(
                "certificate_id = ?* and status = 'pending'",
                vec![Value::String(certificate_id.to_owned())],
            ),
        }
    }
}

impl Query for DeletePendingCertificateRecordQuery {
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

        format!("delete from pending_certificate where {condition} returning {projection}")
    }
}
