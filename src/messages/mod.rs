//! Messages exchanged over the HTTP surface.
//!
//! Image bytes cross the boundary hex-encoded inside JSON bodies; the
//! adapters here decode them into [ArtifactData][crate::entities::ArtifactData]
//! before the workflow engine is involved.

mod approve_certificate;
mod approved_certificate_message;
mod pending_certificate_message;
mod submit_certificate;

pub use approve_certificate::{ApproveCertificateMessage, CertificateApprovedMessage};
pub use approved_certificate_message::ApprovedCertificateMessage;
pub use pending_certificate_message::PendingCertificateMessage;
pub use submit_certificate::{
    ApproverMessagePart, CertificateSubmittedMessage, SignatoryMessagePart,
    SubmitCertificateMessage,
};

use crate::entities::ArtifactData;

/// Default content type assumed for uploaded images.
const DEFAULT_IMAGE_CONTENT_TYPE: &str = "image/png";

/// Decode a hex-encoded image field into artifact data.
///
/// An empty field decodes to `None`, letting the engine raise its own
/// "image required" validation error.
pub(crate) fn decode_image_field(
    hex_encoded: &str,
    content_type: Option<&str>,
) -> Result<Option<ArtifactData>, String> {
    if hex_encoded.is_empty() {
        return Ok(None);
    }
    let bytes = hex::decode(hex_encoded)
        .map_err(|e| format!("could not decode hex encoded image: {e}"))?;

    Ok(Some(ArtifactData::new(
        bytes,
        content_type.unwrap_or(DEFAULT_IMAGE_CONTENT_TYPE),
    )))
}
