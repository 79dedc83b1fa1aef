use chrono::NaiveDate;
use serde::Serialize;

use crate::entities::{Approver, CertificateRequest};

/// Notification payload telling an approver that a certificate request waits
/// for their decision.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApprovalRequestMessage {
    /// Name of the notified approver.
    pub approver_name: String,

    /// Email the notification is addressed to.
    pub approver_email: String,

    /// Identifier of the pending certificate request.
    pub certificate_id: String,

    /// Template or category tag of the certificate.
    pub certificate_type: String,

    /// Person the certificate is issued to.
    pub recipient_name: String,

    /// Person who initiated the request.
    pub creator_name: String,

    /// Date printed on the certificate.
    pub issue_date: NaiveDate,
}

impl ApprovalRequestMessage {
    /// Build the message notifying the given approver of the given request.
    pub fn for_approver(request: &CertificateRequest, approver: &Approver) -> Self {
        Self {
            approver_name: approver.name.clone(),
            approver_email: approver.email.clone(),
            certificate_id: request.certificate_id.clone(),
            certificate_type: request.certificate_type.clone(),
            recipient_name: request.recipient_name.clone(),
            creator_name: request.creator_name.clone(),
            issue_date: request.issue_date,
        }
    }
}
