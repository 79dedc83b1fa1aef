use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::{ApprovedCertificate, Approver, Signatory};

/// Approved Certificate Message, the representation of an
/// [ApprovedCertificate] returned by the approved listing route.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ApprovedCertificateMessage {
    /// Identifier in the approved space.
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

    /// Display signatories.
    pub signatories: Vec<Signatory>,

    /// Approvers that gated the source request.
    pub approvers: Vec<Approver>,

    /// Opaque extra attributes.
    pub extra_fields: serde_json::Map<String, serde_json::Value>,

    /// Location of the signed certificate image.
    pub artifact_location: String,

    /// Approval time.
    pub approved_at: DateTime<Utc>,

    /// Lifecycle state, always `approved`.
    pub status: String,
}

impl From<ApprovedCertificate> for ApprovedCertificateMessage {
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
            status: "approved".to_string(),
        }
    }
}
