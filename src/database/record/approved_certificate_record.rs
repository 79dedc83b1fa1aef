use chrono::{DateTime, NaiveDate, Utc};
use sqlite::Row;

use crate::entities::{ApprovedCertificate, Approver, Signatory};
use crate::sqlite::{HydrationError, Projection, SqLiteEntity};

use super::{hydrate_issue_date, hydrate_json, hydrate_timestamp, PendingCertificateRecord};

/// ApprovedCertificateRecord is the database representation of an
/// [ApprovedCertificate], the product of the approval transition.
#[derive(Debug, PartialEq, Clone)]
pub struct ApprovedCertificateRecord {
    /// Unique identifier in the approved space.
    pub certificate_id: String,

    /// Identifier the source request had in the pending space.
    pub source_certificate_id: String,

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

    /// Approvers that gated the source request, stored as a JSON list.
    pub approvers: Vec<Approver>,

    /// Opaque extra attributes, stored as a JSON object.
    pub extra_fields: serde_json::Map<String, serde_json::Value>,

    /// Location of the signed certificate image.
    pub artifact_location: String,

    /// Approval time.
    pub approved_at: DateTime<Utc>,
}

impl ApprovedCertificateRecord {
    /// Derive an approved record from the pending record it originates from,
    /// replacing the artifact with the signed one.
    pub fn from_pending(
        pending: PendingCertificateRecord,
        certificate_id: String,
        signed_artifact_location: String,
        approved_at: DateTime<Utc>,
    ) -> Self {
        Self {
            certificate_id,
            source_certificate_id: pending.certificate_id,
            certificate_type: pending.certificate_type,
            recipient_name: pending.recipient_name,
            creator_name: pending.creator_name,
            issue_date: pending.issue_date,
            signatories: pending.signatories,
            approvers: pending.approvers,
            extra_fields: pending.extra_fields,
            artifact_location: signed_artifact_location,
            approved_at,
        }
    }
}

#[cfg(test)]
impl ApprovedCertificateRecord {
    /// Fake record factory for tests.
    pub(crate) fn dummy(certificate_id: &str, source_certificate_id: &str) -> Self {
        Self::from_pending(
            PendingCertificateRecord::dummy(source_certificate_id, &["bob@x.com"]),
            certificate_id.to_string(),
            format!("http://0.0.0.0:8080/artifact/{certificate_id}-signed.png"),
            DateTime::parse_from_rfc3339("2024-01-02T09:00:00Z")
                .unwrap()
                .with_timezone(&Utc),
        )
    }
}

impl From<ApprovedCertificateRecord> for ApprovedCertificate {
    fn from(record: ApprovedCertificateRecord) -> Self {
        Self {
            certificate_id: record.certificate_id,
            source_certificate_id: record.source_certificate_id,
            certificate_type: record.certificate_type,
            recipient_name: record.recipient_name,
            creator_name: record.creator_name,
            issue_date: record.issue_date,
            signatories: record.signatories,
            approvers: record.approvers,
            extra_fields: record.extra_fields,
            artifact_location: record.artifact_location,
            approved_at: record.approved_at,
        }
    }
}

impl From<ApprovedCertificate> for ApprovedCertificateRecord {
    fn from(certificate: ApprovedCertificate) -> Self {
        Self {
            certificate_id: certificate.certificate_id,
            source_certificate_id: certificate.source_certificate_id,
            certificate_type: certificate.certificate_type,
            recipient_name: certificate.recipient_name,
            creator_name: certificate.creator_name,
            issue_date: certificate.issue_date,
            signatories: certificate.signatories,
            approvers: certificate.approvers,
            extra_fields: certificate.extra_fields,
            artifact_location: certificate.artifact_location,
            approved_at: certificate.approved_at,
        }
    }
}

impl SqLiteEntity for ApprovedCertificateRecord {
    fn hydrate(row: Row) -> Result<Self, HydrationError>
    where
        Self: Sized,
    {
        Ok(Self {
            certificate_id: row.read::<&str, _>(0).to_string(),
            source_certificate_id: row.read::<&str, _>(1).to_string(),
            certificate_type: row.read::<&str, _>(2).to_string(),
            recipient_name: row.read::<&str, _>(3).to_string(),
            creator_name: row.read::<&str, _>(4).to_string(),
            issue_date: hydrate_issue_date(
                "approved_certificate.issue_date",
                row.read::<&str, _>(5),
            )?,
            signatories: hydrate_json("approved_certificate.signatories", row.read::<&str, _>(6))?,
            approvers: hydrate_json("approved_certificate.approvers", row.read::<&str, _>(7))?,
            extra_fields: hydrate_json(
                "approved_certificate.extra_fields",
                row.read::<&str, _>(8),
            )?,
            artifact_location: row.read::<&str, _>(9).to_string(),
            approved_at: hydrate_timestamp(
                "approved_certificate.approved_at",
                row.read::<&str, _>(10),
            )?,
        })
    }

    fn get_projection() -> Projection {
        Projection::from(&[
            (
                "certificate_id",
                "{:approved_certificate:}.certificate_id",
                "text",
            ),
            (
                "source_certificate_id",
                "{:approved_certificate:}.source_certificate_id",
                "text",
            ),
            (
                "certificate_type",
                "{:approved_certificate:}.certificate_type",
                "text",
            ),
            (
                "recipient_name",
                "{:approved_certificate:}.recipient_name",
                "text",
            ),
            (
                "creator_name",
                "{:approved_certificate:}.creator_name",
                "text",
            ),
            ("issue_date", "{:approved_certificate:}.issue_date", "text"),
            (
                "signatories",
                "{:approved_certificate:}.signatories",
                "text",
            ),
            ("approvers", "{:approved_certificate:}.approvers", "text"),
            (
                "extra_fields",
                "{:approved_certificate:}.extra_fields",
                "text",
            ),
            (
                "artifact_location",
                "{:approved_certificate:}.artifact_location",
                "text",
            ),
            (
                "approved_at",
                "{:approved_certificate:}.approved_at",
                "text",
            ),
        ])
    }
}
