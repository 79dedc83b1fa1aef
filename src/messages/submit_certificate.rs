use serde::{Deserialize, Serialize};

use crate::entities::{Approver, CertificateSubmission, Signatory};

use super::decode_image_field;

/// An approver as carried in a submission message.
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ApproverMessagePart {
    /// Display name of the approver.
    #[serde(default)]
    pub name: String,

    /// Email the approver is matched by.
    #[serde(default)]
    pub email: String,
}

/// A display signatory as carried in a submission message.
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SignatoryMessagePart {
    /// Name printed on the certificate.
    #[serde(default)]
    pub name: String,

    /// Role printed under the name.
    #[serde(default)]
    pub role: String,
}

/// Submit Certificate Message, the body of `POST /certificates`.
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct SubmitCertificateMessage {
    /// Template or category tag, the configured default applies when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificate_type: Option<String>,

    /// Person the certificate is issued to.
    #[serde(default)]
    pub recipient_name: String,

    /// Person who initiated the request.
    #[serde(default)]
    pub creator_name: String,

    /// Date printed on the certificate, ISO 8601.
    #[serde(default)]
    pub issue_date: String,

    /// Display signatories (one or two).
    #[serde(default)]
    pub signatories: Vec<SignatoryMessagePart>,

    /// Approvers gating the request.
    #[serde(default)]
    pub approvers: Vec<ApproverMessagePart>,

    /// Opaque extra attributes of the certificate type.
    #[serde(default)]
    pub extra_fields: serde_json::Map<String, serde_json::Value>,

    /// Hex encoded bytes of the rendered certificate image.
    #[serde(default)]
    pub certificate_image: String,

    /// Content type of the image, defaults to `image/png`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
}

impl TryFrom<SubmitCertificateMessage> for CertificateSubmission {
    type Error = String;

    fn try_from(message: SubmitCertificateMessage) -> Result<Self, Self::Error> {
        let image = decode_image_field(&message.certificate_image, message.content_type.as_deref())?;

        Ok(Self {
            certificate_type: message.certificate_type,
            recipient_name: message.recipient_name,
            creator_name: message.creator_name,
            issue_date: message.issue_date,
            signatories: message
                .signatories
                .into_iter()
                .map(|s| Signatory::new(s.name, s.role))
                .collect(),
            approvers: message
                .approvers
                .into_iter()
                .map(|a| Approver::new(a.name, a.email))
                .collect(),
            extra_fields: message.extra_fields,
            image,
        })
    }
}

/// Certificate Submitted Message, the body of a `201` response to
/// `POST /certificates`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateSubmittedMessage {
    /// Identifier assigned to the new pending request.
    pub certificate_id: String,

    /// Location of the stored certificate image.
    pub artifact_location: String,
}
