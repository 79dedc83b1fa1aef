//! ## CertificateWorkflowService
//!
//! This service drives the lifecycle of a certificate request: validation
//! and creation of pending requests, per-approver visibility, and the
//! terminal approve/reject transitions.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use slog::{info, warn, Logger};
use thiserror::Error;
use uuid::Uuid;

use crate::artifact_store::ArtifactStore;
use crate::database::repository::{ApprovedCertificateRepository, PendingCertificateRepository};
use crate::entities::{
    ApprovedCertificate, ArtifactData, CertificateRequest, CertificateStatus,
    CertificateSubmission,
};
use crate::notification::{ApprovalRequestMessage, TransmitterService};
use crate::StdError;

#[cfg(test)]
use mockall::automock;

/// Errors dedicated to the CertificateWorkflowService.
#[derive(Debug, Error)]
pub enum CertificateWorkflowError {
    /// The submitted input is malformed or incomplete, the caller must fix
    /// it before retrying.
    #[error("{0}")]
    Validation(String),

    /// The referenced certificate does not exist: deleted, already
    /// transitioned, or never created.
    #[error("certificate '{0}' not found")]
    NotFound(String),

    /// Repository or artifact store failure.
    #[error(transparent)]
    Internal(#[from] StdError),
}

/// ## CertificateWorkflowService
///
/// All the business rules around constructing, validating and transitioning
/// certificate requests.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait CertificateWorkflowService: Sync + Send {
    /// Validate a submission, persist its image and create the pending
    /// request. On success one approval-request notification is emitted per
    /// approver; notification failures never fail the submission.
    async fn submit(
        &self,
        submission: CertificateSubmission,
    ) -> Result<CertificateRequest, CertificateWorkflowError>;

    /// Return the pending requests visible to the given approver email.
    async fn list_pending_for_approver(
        &self,
        approver_email: &str,
    ) -> Result<Vec<CertificateRequest>, CertificateWorkflowError>;

    /// Return the request with the given identifier from the pending
    /// collection, whatever its status.
    async fn get_request(
        &self,
        certificate_id: &str,
    ) -> Result<CertificateRequest, CertificateWorkflowError>;

    /// Approve the pending request: store the signed image and move the
    /// record to the approved collection. At most one decision wins: a
    /// request already decided yields a not-found.
    async fn approve(
        &self,
        certificate_id: &str,
        signed_image: ArtifactData,
    ) -> Result<ApprovedCertificate, CertificateWorkflowError>;

    /// Reject the pending request. Terminal: the record stays in the pending
    /// collection with the rejected status but leaves every approver queue.
    async fn reject(
        &self,
        certificate_id: &str,
    ) -> Result<CertificateRequest, CertificateWorkflowError>;

    /// Return all the approved certificates, latest first.
    async fn list_approved(&self)
        -> Result<Vec<ApprovedCertificate>, CertificateWorkflowError>;

    /// Delete an approved certificate and, best effort, its artifact.
    async fn delete_approved(
        &self,
        certificate_id: &str,
    ) -> Result<(), CertificateWorkflowError>;
}

/// Certiflow implementation of the [CertificateWorkflowService].
pub struct CertiflowWorkflowService {
    pending_certificate_repository: Arc<PendingCertificateRepository>,
    approved_certificate_repository: Arc<ApprovedCertificateRepository>,
    artifact_store: Arc<dyn ArtifactStore>,
    notification_transmitter: Arc<TransmitterService<ApprovalRequestMessage>>,
    default_certificate_type: String,
    retain_unsigned_artifact_on_approval: bool,
    logger: Logger,
}

impl CertiflowWorkflowService {
    /// Instantiate the service.
    pub fn new(
        pending_certificate_repository: Arc<PendingCertificateRepository>,
        approved_certificate_repository: Arc<ApprovedCertificateRepository>,
        artifact_store: Arc<dyn ArtifactStore>,
        notification_transmitter: Arc<TransmitterService<ApprovalRequestMessage>>,
        default_certificate_type: String,
        retain_unsigned_artifact_on_approval: bool,
        logger: Logger,
    ) -> Self {
        Self {
            pending_certificate_repository,
            approved_certificate_repository,
            artifact_store,
            notification_transmitter,
            default_certificate_type,
            retain_unsigned_artifact_on_approval,
            logger,
        }
    }

    /// Check the submission and turn it into a validated request, without
    /// side effects.
    fn validate_submission(
        &self,
        submission: &CertificateSubmission,
    ) -> Result<NaiveDate, CertificateWorkflowError> {
        let required_fields = [
            ("recipient_name", &submission.recipient_name),
            ("issue_date", &submission.issue_date),
            ("creator_name", &submission.creator_name),
        ];
        for (field, value) in required_fields {
            if value.trim().is_empty() {
                return Err(CertificateWorkflowError::Validation(format!(
                    "missing required field '{field}'"
                )));
            }
        }
        let first_signatory = submission.signatories.first().ok_or_else(|| {
            CertificateWorkflowError::Validation(
                "missing required field 'signatories'".to_string(),
            )
        })?;
        if first_signatory.name.trim().is_empty() || first_signatory.role.trim().is_empty() {
            return Err(CertificateWorkflowError::Validation(
                "missing required field 'signatories[0]'".to_string(),
            ));
        }

        match &submission.image {
            Some(image) if !image.bytes.is_empty() => (),
            _ => {
                return Err(CertificateWorkflowError::Validation(
                    "certificate image required".to_string(),
                ))
            }
        }

        if let Some(second_signatory) = submission.signatories.get(1) {
            if second_signatory.name.trim().is_empty() || second_signatory.role.trim().is_empty() {
                return Err(CertificateWorkflowError::Validation(
                    "missing required field 'signatories[1]'".to_string(),
                ));
            }
        }
        if submission.signatories.len() > 2 {
            return Err(CertificateWorkflowError::Validation(
                "at most two signatories supported".to_string(),
            ));
        }

        if submission.approvers.is_empty() {
            return Err(CertificateWorkflowError::Validation(
                "at least one approver required".to_string(),
            ));
        }
        if submission.approvers.iter().any(|a| a.email.trim().is_empty()) {
            return Err(CertificateWorkflowError::Validation(
                "approver email required".to_string(),
            ));
        }

        submission.issue_date.parse::<NaiveDate>().map_err(|_| {
            CertificateWorkflowError::Validation(format!(
                "invalid issue date '{}'",
                submission.issue_date
            ))
        })
    }

    /// Artifact keys mix a timestamp and a random part so concurrent
    /// submissions cannot collide, independently of record identifiers.
    fn new_artifact_key(image: &ArtifactData) -> String {
        format!(
            "{}-{}.{}",
            Utc::now().format("%Y%m%d%H%M%S"),
            Uuid::new_v4(),
            image.extension()
        )
    }

    /// Delete an artifact without letting a failure escape.
    async fn delete_artifact_best_effort(&self, location: &str) {
        if let Err(error) = self.artifact_store.delete(&location.to_string()).await {
            warn!(
                self.logger, "artifact delete failure";
                "location" => location, "error" => ?error,
            );
        }
    }
}

#[async_trait]
impl CertificateWorkflowService for CertiflowWorkflowService {
    async fn submit(
        &self,
        submission: CertificateSubmission,
    ) -> Result<CertificateRequest, CertificateWorkflowError> {
        let issue_date = self.validate_submission(&submission)?;
        // Validation guarantees the image presence.
        let image = submission.image.as_ref().unwrap();

        let artifact_location = self
            .artifact_store
            .store(image, &Self::new_artifact_key(image))
            .await?;
        let certificate_type = submission
            .certificate_type
            .filter(|certificate_type| !certificate_type.trim().is_empty())
            .unwrap_or_else(|| self.default_certificate_type.clone());
        let request = CertificateRequest {
            certificate_id: Uuid::new_v4().to_string(),
            certificate_type,
            recipient_name: submission.recipient_name,
            creator_name: submission.creator_name,
            issue_date,
            signatories: submission.signatories,
            approvers: submission.approvers,
            extra_fields: submission.extra_fields,
            artifact_location: artifact_location.clone(),
            status: CertificateStatus::Pending,
            created_at: Utc::now(),
        };

        let request: CertificateRequest = self
            .pending_certificate_repository
            .create(request.into())
            .await
            .map_err(|error| {
                // The record write failed after the artifact write succeeded:
                // the artifact is orphaned, which is accepted and logged.
                warn!(
                    self.logger, "submission failed after artifact storage, artifact orphaned";
                    "artifact_location" => &artifact_location,
                );
                CertificateWorkflowError::Internal(error)
            })?;

        for approver in &request.approvers {
            let _ = self
                .notification_transmitter
                .send_message(ApprovalRequestMessage::for_approver(&request, approver));
        }
        info!(
            self.logger, "certificate request submitted";
            "certificate_id" => &request.certificate_id,
            "certificate_type" => &request.certificate_type,
            "approvers" => request.approvers.len(),
        );

        Ok(request)
    }

    async fn list_pending_for_approver(
        &self,
        approver_email: &str,
    ) -> Result<Vec<CertificateRequest>, CertificateWorkflowError> {
        if approver_email.trim().is_empty() {
            return Err(CertificateWorkflowError::Validation(
                "approver email required".to_string(),
            ));
        }

        Ok(self
            .pending_certificate_repository
            .list_for_approver(approver_email)
            .await?)
    }

    async fn get_request(
        &self,
        certificate_id: &str,
    ) -> Result<CertificateRequest, CertificateWorkflowError> {
        self.pending_certificate_repository
            .get_by_certificate_id(certificate_id)
            .await?
            .ok_or_else(|| CertificateWorkflowError::NotFound(certificate_id.to_string()))
    }

    async fn approve(
        &self,
        certificate_id: &str,
        signed_image: ArtifactData,
    ) -> Result<ApprovedCertificate, CertificateWorkflowError> {
        if certificate_id.trim().is_empty() {
            return Err(CertificateWorkflowError::Validation(
                "certificate id required".to_string(),
            ));
        }
        if signed_image.bytes.is_empty() {
            return Err(CertificateWorkflowError::Validation(
                "signed certificate image required".to_string(),
            ));
        }

        let signed_artifact_location = self
            .artifact_store
            .store(&signed_image, &Self::new_artifact_key(&signed_image))
            .await?;
        let transfer = self
            .approved_certificate_repository
            .transfer_from_pending(
                certificate_id,
                &Uuid::new_v4().to_string(),
                &signed_artifact_location,
                Utc::now(),
            )
            .await?;

        let (pending_record, approved_record) = match transfer {
            Some(records) => records,
            None => {
                // The request was decided by someone else in the meantime (or
                // never existed): drop the signed artifact we just stored.
                self.delete_artifact_best_effort(&signed_artifact_location).await;
                return Err(CertificateWorkflowError::NotFound(
                    certificate_id.to_string(),
                ));
            }
        };

        if !self.retain_unsigned_artifact_on_approval {
            self.delete_artifact_best_effort(&pending_record.artifact_location).await;
        }
        info!(
            self.logger, "certificate request approved";
            "certificate_id" => certificate_id,
            "approved_certificate_id" => &approved_record.certificate_id,
        );

        Ok(approved_record.into())
    }

    async fn reject(
        &self,
        certificate_id: &str,
    ) -> Result<CertificateRequest, CertificateWorkflowError> {
        let rejected_record = self
            .pending_certificate_repository
            .mark_rejected(certificate_id)
            .await?
            .ok_or_else(|| CertificateWorkflowError::NotFound(certificate_id.to_string()))?;
        info!(
            self.logger, "certificate request rejected";
            "certificate_id" => certificate_id,
        );

        Ok(rejected_record.into())
    }

    async fn list_approved(
        &self,
    ) -> Result<Vec<ApprovedCertificate>, CertificateWorkflowError> {
        Ok(self.approved_certificate_repository.list_all().await?)
    }

    async fn delete_approved(
        &self,
        certificate_id: &str,
    ) -> Result<(), CertificateWorkflowError> {
        let deleted_record = self
            .approved_certificate_repository
            .delete(certificate_id)
            .await?
            .ok_or_else(|| CertificateWorkflowError::NotFound(certificate_id.to_string()))?;
        self.delete_artifact_best_effort(&deleted_record.artifact_location).await;
        info!(
            self.logger, "approved certificate deleted";
            "certificate_id" => certificate_id,
        );

        Ok(())
    }
}
