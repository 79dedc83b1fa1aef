//! Domain entities of the certificate approval workflow.

use std::fmt::{Display, Formatter};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a [CertificateRequest].
///
/// A request is created `Pending`, then transitions exactly once, either to
/// `Approved` (the record migrates to the approved collection) or to
/// `Rejected` (the record stays in the pending collection as a terminal,
/// queryable dead state).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CertificateStatus {
    /// Awaiting a decision from at least one approver.
    Pending,

    /// Approved and migrated to the approved collection.
    Approved,

    /// Rejected by an approver, terminal.
    Rejected,
}

impl CertificateStatus {
    /// Canonical database representation of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl Display for CertificateStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<&str> for CertificateStatus {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            _ => Err(format!("unknown certificate status '{value}'")),
        }
    }
}

/// An approver is the gating entity of the workflow: a named email address
/// whose decision moves a pending request to a terminal state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Approver {
    /// Display name of the approver.
    pub name: String,

    /// Email the approver is matched by, case-insensitively.
    pub email: String,
}

impl Approver {
    /// Approver factory
    pub fn new<T: Into<String>, U: Into<String>>(name: T, email: U) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }

    /// Tell whether this approver matches the given email, ignoring case.
    pub fn matches_email(&self, email: &str) -> bool {
        self.email.eq_ignore_ascii_case(email)
    }
}

/// A signatory is a name and role printed on the certificate face.
///
/// Signatories are display only, they are not approval gates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signatory {
    /// Name printed on the certificate.
    pub name: String,

    /// Role printed under the name.
    pub role: String,
}

impl Signatory {
    /// Signatory factory
    pub fn new<T: Into<String>, U: Into<String>>(name: T, role: U) -> Self {
        Self {
            name: name.into(),
            role: role.into(),
        }
    }
}

/// Opaque reference to an artifact held by the
/// [ArtifactStore][crate::artifact_store::ArtifactStore].
pub type ArtifactLocation = String;

/// The raw bytes of a rendered certificate image, with their content type.
///
/// The workflow never inspects the bytes, it only moves them to the artifact
/// store and keeps the resulting location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactData {
    /// Image bytes.
    pub bytes: Vec<u8>,

    /// MIME content type of the bytes.
    pub content_type: String,
}

impl ArtifactData {
    /// ArtifactData factory
    pub fn new(bytes: Vec<u8>, content_type: &str) -> Self {
        Self {
            bytes,
            content_type: content_type.to_string(),
        }
    }

    /// File extension matching the content type, used to build artifact keys.
    pub fn extension(&self) -> &str {
        match self.content_type.as_str() {
            "image/jpeg" => "jpg",
            "image/webp" => "webp",
            _ => "png",
        }
    }
}

/// The input of a certificate submission, before the workflow engine
/// validated it.
///
/// Fields arrive as the client sent them: the engine is responsible for
/// every validation, including the date parsing, so that a malformed
/// submission consistently raises its validation error taxonomy.
#[derive(Debug, Clone, PartialEq)]
pub struct CertificateSubmission {
    /// Template or category tag, the configured default applies when absent.
    pub certificate_type: Option<String>,

    /// Person the certificate is issued to.
    pub recipient_name: String,

    /// Person who initiated the request.
    pub creator_name: String,

    /// Date printed on the certificate, ISO 8601, unparsed.
    pub issue_date: String,

    /// Display signatories (one or two).
    pub signatories: Vec<Signatory>,

    /// Approvers gating the request.
    pub approvers: Vec<Approver>,

    /// Opaque extra attributes of the certificate type.
    pub extra_fields: serde_json::Map<String, serde_json::Value>,

    /// Rendered certificate image, if the client supplied one.
    pub image: Option<ArtifactData>,
}

/// A certificate request is the central entity of the workflow: the fields of
/// a certificate to be issued, the rendered image and the approvers gating
/// its issuance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CertificateRequest {
    /// Unique identifier, assigned at creation, immutable.
    pub certificate_id: String,

    /// Template or category tag ("Employee of the Year", …), free form.
    pub certificate_type: String,

    /// Person the certificate is issued to.
    pub recipient_name: String,

    /// Person who initiated the request.
    pub creator_name: String,

    /// Date printed on the certificate.
    pub issue_date: NaiveDate,

    /// Display signatories baked into the certificate face (one or two).
    pub signatories: Vec<Signatory>,

    /// Approvers gating the request, matched by email.
    pub approvers: Vec<Approver>,

    /// Extra type-specific attributes (hours, department, …), passed through
    /// untouched.
    pub extra_fields: serde_json::Map<String, serde_json::Value>,

    /// Location of the rendered certificate image.
    pub artifact_location: ArtifactLocation,

    /// Lifecycle state.
    pub status: CertificateStatus,

    /// Creation time of the request.
    pub created_at: DateTime<Utc>,
}

impl CertificateRequest {
    /// Tell whether the given email belongs to one of the approvers of this
    /// request.
    pub fn has_approver(&self, email: &str) -> bool {
        self.approvers.iter().any(|a| a.matches_email(email))
    }
}

/// An approved certificate, produced only by the approval transition of a
/// [CertificateRequest].
///
/// It carries the descriptive fields of its source request and the signed
/// image stored at approval time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApprovedCertificate {
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

    /// Display signatories baked into the certificate face.
    pub signatories: Vec<Signatory>,

    /// Approvers that gated the source request.
    pub approvers: Vec<Approver>,

    /// Extra type-specific attributes, passed through untouched.
    pub extra_fields: serde_json::Map<String, serde_json::Value>,

    /// Location of the signed certificate image.
    pub artifact_location: ArtifactLocation,

    /// Approval time.
    pub approved_at: DateTime<Utc>,
}

/// Representation of a client error raised by an HTTP route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientError {
    /// Label of the error.
    pub label: String,

    /// Message of the error.
    pub message: String,
}

impl ClientError {
    /// ClientError factory
    pub fn new<T: Into<String>, U: Into<String>>(label: T, message: U) -> Self {
        Self {
            label: label.into(),
            message: message.into(),
        }
    }
}

/// Representation of an internal server error raised by an HTTP route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InternalServerError {
    /// Message of the error.
    pub message: String,
}

impl InternalServerError {
    /// InternalServerError factory
    pub fn new<T: Into<String>>(message: T) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<String> for InternalServerError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn certificate_status_roundtrip() {
        for status in [
            CertificateStatus::Pending,
            CertificateStatus::Approved,
            CertificateStatus::Rejected,
        ] {
            assert_eq!(status, CertificateStatus::try_from(status.as_str()).unwrap());
        }
        assert!(CertificateStatus::try_from("unknown").is_err());
    }

    #[test]
    fn approver_email_matching_is_case_insensitive() {
        let approver = Approver::new("Bob", "Bob@Example.COM");

        assert!(approver.matches_email("bob@example.com"));
        assert!(approver.matches_email("BOB@EXAMPLE.COM"));
        assert!(!approver.matches_email("alice@example.com"));
    }

    #[test]
    fn artifact_data_extension_follows_content_type() {
        assert_eq!("png", ArtifactData::new(vec![1], "image/png").extension());
        assert_eq!("jpg", ArtifactData::new(vec![1], "image/jpeg").extension());
        assert_eq!("png", ArtifactData::new(vec![1], "application/pdf").extension());
    }
}
