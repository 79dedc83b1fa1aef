use serde::{Deserialize, Serialize};

/// Approve Certificate Message, the body of
/// `POST /certificates/{id}/approve`.
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ApproveCertificateMessage {
    /// Hex encoded bytes of the signed certificate image.
    #[serde(default)]
    pub signed_image: String,

    /// Content type of the image, defaults to `image/png`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
}

/// Certificate Approved Message, the body of a `200` response to
/// `POST /certificates/{id}/approve`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateApprovedMessage {
    /// Identifier of the certificate in the approved space.
    pub certificate_id: String,

    /// Location of the stored signed image.
    pub artifact_location: String,
}
