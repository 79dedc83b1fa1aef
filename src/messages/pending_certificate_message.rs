use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::{Approver, CertificateRequest, CertificateStatus, Signatory};

/// Pending Certificate Message, the representation of a [CertificateRequest]
/// returned by the listing and detail routes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PendingCertificateMessage {
    /// Identifier of the request.
    pub certificate_id: String,

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

    /// Approvers gating the request.
    pub approvers: Vec<Approver>,

    /// Opaque extra attributes.
    pub extra_fields: serde_json::Map<String, serde_json::Value>,

    /// Location of the rendered certificate image.
    pub artifact_location: String,

    /// Lifecycle state of the request.
    pub status: CertificateStatus,

    /// Creation time of the request.
    pub created_at: DateTime<Utc>,
}

impl From<CertificateRequest> for PendingCertificateMessage {
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
