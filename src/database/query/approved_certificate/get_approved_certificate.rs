use sqlite::Value;

use crate::database::record::ApprovedCertificateRecord;
use crate::sqlite::{Query, SourceAlias, SqLiteEntity, WhereCondition};

/// Queries to retrieve [ApprovedCertificateRecord] from the sqlite database.
pub struct GetApprovedCertificateRecordQuery {
    condition: WhereCondition,
}

impl GetApprovedCertificateRecordQuery {
    /// Query every approved certificate.
    pub fn all() -> Self {
        Self {
            condition: WhereCondition::default(),
        }
    }

    /// Query an approved certificate by its identifier.
    pub fn by_certificate_id(certificate_id: &str) -> Self {
        Self {
            condition: WhereCondition::new(
                "ac.certificate_id = ?*",
                vec![Value::String(certificate_id.to_owned())],
            ),
        }
    }
}

impl Query for GetApprovedCertificateRecordQuery {
    type Entity = ApprovedCertificateRecord;

    fn filters(&self) -> WhereCondition {
        self.condition.clone()
    }

    fn get_definition(&self, condition: &str) -> String {
        let aliases = SourceAlias::new(&[("{:approved_certificate:}", "ac")]);
        let projection = Self::Entity::get_projection().expand(aliases);

        format!(
            "select {projection} from approved_certificate as ac \
             where {condition} order by ac.rowid desc"
        )
    }
}
