use chrono::{DateTime, NaiveDate, Utc};
use sqlite::Row;

use crate::entities::{
    Approver, CertificateRequest, CertificateStatus, Signatory,
};
use crate::sqlite::{HydrationError, Projection, SqLiteEntity};

use super::{hydrate_issue_date, hydrate_json, hydrate_timestamp};

/// PendingCertificateRecord is the database representation of a
/// [CertificateRequest] living in the pending collection.
#[derive(Debug, PartialEq, Clone)]
pub struct PendingCertificateRecord {
    /// Unique identifier of the request.
    pub certificate_id: String,

    /// Template or category tag.
    pub certificate_type: String,

    /// Person the certificate is issued to.
    pub recipient_name: String,

    /// Person who initiated the request.
    pub creator_name: String,

    /// Date printed on the certificate.
    pub issue_date: NaiveDate,

    /// Display signatories, stored as a JSON list.
    pub signatories: Vec<Signatory>,

    /// Approvers gating the request, stored as a JSON list.
    pub approvers: Vec<Approver>,

    /// Opaque extra attributes, stored as a JSON object.
    pub extra_fields: serde_json::Map<String, serde_json::Value>,

    /// Location of the rendered certificate image.
    pub artifact_location: String,

    /// Lifecycle state of the request.
    pub status: CertificateStatus,

    /// Creation time of the request.
    pub created_at: DateTime<Utc>,
}

impl From<CertificateRequest> for PendingCertificateRecord {
    fn from(request: CertificateRequest) -> Self {
        Self {
            certificate_id: request.certificate_id,
            certificate_type: request.certificate_type,
            recipient_name: request.recipient_name,
            creator_name: request.creator_name,
            issue_date: request.issue_date,
            signatories: request.signatories,
            approvers: request.approvers,
            extra_fields: request.extra_fields,
            artifact_location: request.artifact_location,
            status: request.status,
            created_at: request.created_at,
        }
    }
}

impl From<PendingCertificateRecord> for CertificateRequest {
    fn from(record: PendingCertificateRecord) -> Self {
        Self {
            certificate_id: record.certificate_id,
            certificate_type: record.certificate_type,
            recipient_name: record.recipient_name,
            creator_name: record.creator_name,
            issue_date: record.issue_date,
            signatories: record.signatories,
            approvers: record.approvers,
            extra_fields: record.extra_fields,
            artifact_location: record.artifact_location,
            status: record.status,
            created_at: record.created_at,
        }
    }
}

impl SqLiteEntity for PendingCertificateRecord {
    fn hydrate(row: Row) -> Result<Self, HydrationError>
    where
        Self: Sized,
    {
        let status = row.read::<&str, _>(9);

        Ok(Self {
            certificate_id: row.read::<&str, _>(0).to_string(),
            certificate_type: row.read::<&str, _>(1).to_string(),
            recipient_name: row.read::<&str, _>(2).to_string(),
            creator_name: row.read::<&str, _>(3).to_string(),
            issue_date: hydrate_issue_date(
                "pending_certificate.issue_date",
                row.read::<&str, _>(4),
            )?,
            signatories: hydrate_json("pending_certificate.signatories", row.read::<&str, _>(5))?,
            approvers: hydrate_json("pending_certificate.approvers", row.read::<&str, _>(6))?,
            extra_fields: hydrate_json(
                "pending_certificate.extra_fields",
                row.read::<&str, _>(7),
            )?,
            artifact_location: row.read::<&str, _>(8).to_string(),
            status: CertificateStatus::try_from(status).map_err(HydrationError::InvalidData)?,
            created_at: hydrate_timestamp(
                "pending_certificate.created_at",
                row.read::<&str, _>(10),
            )?,
        })
    }

    fn get_projection() -> Projection {
        Projection::from(&[
            (
                "certificate_id",
                "{:pending_certificate:}.certificate_id",
                "text",
            ),
            (
                "certificate_type",
                "{:pending_certificate:}.certificate_type",
                "text",
            ),
            (
                "recipient_name",
                "{:pending_certificate:}.recipient_name",
                "text",
            ),
            (
                "creator_name",
                "{:pending_certificate:}.creator_name",
                "text",
            ),
            ("issue_date", "{:pending_certificate:}.issue_date", "text"),
            ("signatories", "{:pending_certificate:}.signatories", "text"),
            ("approvers", "{:pending_certificate:}.approvers", "text"),
            (
                "extra_fields",
                "{:pending_certificate:}.extra_fields",
                "text",
            ),
            (
                "artifact_location",
                "{:pending_certificate:}.artifact_location",
                "text",
            ),
            ("status", "{:pending_certificate:}.status", "text"),
            ("created_at", "{:pending_certificate:}.created_at", "text"),
        ])
    }
}

#[cfg(test)]
impl PendingCertificateRecord {
    /// Fake record factory for tests.
    pub(crate) fn dummy(certificate_id: &str, approver_emails: &[&str]) -> Self {
        Self {
            certificate_id: certificate_id.to_string(),
            certificate_type: "Certificate of Completion".to_string(),
            recipient_name: "Jane Doe".to_string(),
            creator_name: "Alice".to_string(),
            issue_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            signatories: vec![crate::entities::Signatory::new("Boss", "Manager")],
            approvers: approver_emails
                .iter()
                .map(|email| Approver::new("Approver", *email))
                .collect(),
            extra_fields: serde_json::Map::new(),
            artifact_location: format!("http://0.0.0.0:8080/artifact/{certificate_id}.png"),
            status: CertificateStatus::Pending,
            created_at: DateTime::parse_from_rfc3339("2024-01-01T08:00:00Z")
                .unwrap()
                .with_timezone(&Utc),
        }
    }
}
