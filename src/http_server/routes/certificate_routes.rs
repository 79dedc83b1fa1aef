use std::sync::Arc;

use serde::Deserialize;
use warp::Filter;

use crate::dependency_injection::DependencyContainer;

use super::middlewares;

/// Query parameters of `GET /certificates/pending`.
#[derive(Deserialize)]
pub struct PendingCertificatesQueryParams {
    /// Email of the approver whose queue is requested.
    approver_email: Option<String>,
}

pub fn routes(
    dependency_manager: &Arc<DependencyContainer>,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    list_pending_certificates(dependency_manager)
        .or(submit_certificate(dependency_manager))
        .or(approve_certificate(dependency_manager))
        .or(reject_certificate(dependency_manager))
        .or(certificate_detail(dependency_manager))
}

/// POST /certificates
fn submit_certificate(
    dependency_manager: &Arc<DependencyContainer>,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    warp::path!("certificates")
        .and(warp::post())
        .and(warp::body::json())
        .and(middlewares::with_logger(dependency_manager))
        .and(middlewares::with_workflow_service(dependency_manager))
        .and_then(handlers::submit_certificate)
}

/// GET /certificates/pending?approver_email=…
fn list_pending_certificates(
    dependency_manager: &Arc<DependencyContainer>,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    warp::path!("certificates" / "pending")
        .and(warp::get())
        .and(warp::query::<PendingCertificatesQueryParams>())
        .and(middlewares::with_logger(dependency_manager))
        .and(middlewares::with_workflow_service(dependency_manager))
        .and_then(handlers::list_pending_certificates)
}

/// GET /certificates/{certificate_id}
fn certificate_detail(
    dependency_manager: &Arc<DependencyContainer>,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    warp::path!("certificates" / String)
        .and(warp::get())
        .and(middlewares::with_logger(dependency_manager))
        .and(middlewares::with_workflow_service(dependency_manager))
        .and_then(handlers::certificate_detail)
}

/// POST /certificates/{certificate_id}/approve
fn approve_certificate(
    dependency_manager: &Arc<DependencyContainer>,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    warp::path!("certificates" / String / "approve")
        .and(warp::post())
        .and(warp::body::json())
        .and(middlewares::with_logger(dependency_manager))
        .and(middlewares::with_workflow_service(dependency_manager))
        .and_then(handlers::approve_certificate)
}

/// POST /certificates/{certificate_id}/reject
fn reject_certificate(
    dependency_manager: &Arc<DependencyContainer>,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    warp::path!("certificates" / String / "reject")
        .and(warp::post())
        .and(middlewares::with_logger(dependency_manager))
        .and(middlewares::with_workflow_service(dependency_manager))
        .and_then(handlers::reject_certificate)
}

mod handlers {
    use std::convert::Infallible;
    use std::sync::Arc;

    use slog::{warn, Logger};
    use warp::http::StatusCode;

    use crate::entities::{ArtifactData, CertificateSubmission};
    use crate::http_server::routes::reply;
    use crate::messages::{
        ApproveCertificateMessage, CertificateApprovedMessage, CertificateSubmittedMessage,
        PendingCertificateMessage, SubmitCertificateMessage,
    };
    use crate::services::{CertificateWorkflowError, CertificateWorkflowService};

    use super::PendingCertificatesQueryParams;

    /// Submit a new certificate request
    pub async fn submit_certificate(
        message: SubmitCertificateMessage,
        logger: Logger,
        workflow_service: Arc<dyn CertificateWorkflowService>,
    ) -> Result<impl warp::Reply, Infallible> {
        let submission = match CertificateSubmission::try_from(message) {
            Ok(submission) => submission,
            Err(err) => {
                warn!(logger, "submit_certificate::invalid_image"; "error" => &err);
                return Ok(reply::bad_request(
                    "invalid_certificate_image".to_string(),
                    err,
                ));
            }
        };

        match workflow_service.submit(submission).await {
            Ok(request) => Ok(reply::json(
                &CertificateSubmittedMessage {
                    certificate_id: request.certificate_id,
                    artifact_location: request.artifact_location,
                },
                StatusCode::CREATED,
            )),
            Err(CertificateWorkflowError::Validation(message)) => {
                warn!(logger, "submit_certificate::invalid_submission"; "error" => &message);
                Ok(reply::bad_request(
                    "invalid_certificate_submission".to_string(),
                    message,
                ))
            }
            Err(err) => {
                warn!(logger, "submit_certificate::error"; "error" => ?err);
                Ok(reply::server_error(err))
            }
        }
    }

    /// List the pending certificate requests of an approver
    pub async fn list_pending_certificates(
        params: PendingCertificatesQueryParams,
        logger: Logger,
        workflow_service: Arc<dyn CertificateWorkflowService>,
    ) -> Result<impl warp::Reply, Infallible> {
        let approver_email = params.approver_email.unwrap_or_default();

        match workflow_service
            .list_pending_for_approver(&approver_email)
            .await
        {
            Ok(requests) => {
                let messages: Vec<PendingCertificateMessage> =
                    requests.into_iter().map(Into::into).collect();
                Ok(reply::json(&messages, StatusCode::OK))
            }
            Err(CertificateWorkflowError::Validation(message)) => {
                warn!(logger, "list_pending_certificates::missing_email"; "error" => &message);
                Ok(reply::bad_request(
                    "missing_approver_email".to_string(),
                    message,
                ))
            }
            Err(err) => {
                warn!(logger, "list_pending_certificates::error"; "error" => ?err);
                Ok(reply::server_error(err))
            }
        }
    }

    /// Certificate request by identifier
    pub async fn certificate_detail(
        certificate_id: String,
        logger: Logger,
        workflow_service: Arc<dyn CertificateWorkflowService>,
    ) -> Result<impl warp::Reply, Infallible> {
        match workflow_service.get_request(&certificate_id).await {
            Ok(request) => Ok(reply::json(
                &PendingCertificateMessage::from(request),
                StatusCode::OK,
            )),
            Err(CertificateWorkflowError::NotFound(_)) => {
                Ok(reply::empty(StatusCode::NOT_FOUND))
            }
            Err(err) => {
                warn!(logger, "certificate_detail::error"; "error" => ?err);
                Ok(reply::server_error(err))
            }
        }
    }

    /// Approve a pending certificate request
    pub async fn approve_certificate(
        certificate_id: String,
        message: ApproveCertificateMessage,
        logger: Logger,
        workflow_service: Arc<dyn CertificateWorkflowService>,
    ) -> Result<impl warp::Reply, Infallible> {
        let signed_image = match crate::messages::decode_image_field(
            &message.signed_image,
            message.content_type.as_deref(),
        ) {
            // An absent image becomes empty artifact data so the engine
            // raises its own validation error.
            Ok(image) => image.unwrap_or_else(|| ArtifactData::new(Vec::new(), "image/png")),
            Err(err) => {
                warn!(logger, "approve_certificate::invalid_image"; "error" => &err);
                return Ok(reply::bad_request(
                    "invalid_certificate_image".to_string(),
                    err,
                ));
            }
        };

        match workflow_service.approve(&certificate_id, signed_image).await {
            Ok(approved) => Ok(reply::json(
                &CertificateApprovedMessage {
                    certificate_id: approved.certificate_id,
                    artifact_location: approved.artifact_location,
                },
                StatusCode::OK,
            )),
            Err(CertificateWorkflowError::NotFound(_)) => {
                Ok(reply::empty(StatusCode::NOT_FOUND))
            }
            Err(CertificateWorkflowError::Validation(message)) => {
                warn!(logger, "approve_certificate::invalid_submission"; "error" => &message);
                Ok(reply::bad_request(
                    "invalid_approval".to_string(),
                    message,
                ))
            }
            Err(err) => {
                warn!(logger, "approve_certificate::error"; "error" => ?err);
                Ok(reply::server_error(err))
            }
        }
    }

    /// Reject a pending certificate request
    pub async fn reject_certificate(
        certificate_id: String,
        logger: Logger,
        workflow_service: Arc<dyn CertificateWorkflowService>,
    ) -> Result<impl warp::Reply, Infallible> {
        match workflow_service.reject(&certificate_id).await {
            Ok(_) => Ok(reply::empty(StatusCode::OK)),
            Err(CertificateWorkflowError::NotFound(_)) => {
                Ok(reply::empty(StatusCode::NOT_FOUND))
            }
            Err(err) => {
                warn!(logger, "reject_certificate::error"; "error" => ?err);
                Ok(reply::server_error(err))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use warp::http::{Method, StatusCode};
    use warp::test::request;

    use crate::dependency_injection::DependenciesBuilder;
    use crate::services::{CertificateWorkflowError, MockCertificateWorkflowService};
    use crate::messages::{
        ApproveCertificateMessage, ApproverMessagePart, CertificateApprovedMessage,
        CertificateSubmittedMessage, PendingCertificateMessage, SignatoryMessagePart,
        SubmitCertificateMessage,
    };
    use crate::test_tools::discard_logger;
    use crate::Configuration;

    use super::*;

    fn setup_router(
        dependency_manager: Arc<DependencyContainer>,
    ) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
        let cors = warp::cors()
            .allow_any_origin()
            .allow_headers(vec!["content-type"])
            .allow_methods(vec![Method::GET, Method::POST, Method::OPTIONS]);

        warp::any().and(routes(&dependency_manager).with(cors))
    }

    async fn initialize_dependencies() -> Arc<DependencyContainer> {
        Arc::new(
            DependenciesBuilder::new(Configuration::new_sample(), discard_logger())
                .build_dependency_container()
                .await
                .unwrap(),
        )
    }

    fn valid_submit_message() -> SubmitCertificateMessage {
        SubmitCertificateMessage {
            certificate_type: Some("Employee of the Year".to_string()),
            recipient_name: "Jane Doe".to_string(),
            creator_name: "Alice".to_string(),
            issue_date: "2024-01-01".to_string(),
            signatories: vec![SignatoryMessagePart {
                name: "Boss".to_string(),
                role: "Manager".to_string(),
            }],
            approvers: vec![ApproverMessagePart {
                name: "Bob".to_string(),
                email: "bob@x.com".to_string(),
            }],
            extra_fields: serde_json::Map::new(),
            certificate_image: hex::encode(b"fake png"),
            content_type: None,
        }
    }

    async fn submit_valid_certificate(
        dependency_manager: &Arc<DependencyContainer>,
    ) -> CertificateSubmittedMessage {
        let response = request()
            .method("POST")
            .path("/certificates")
            .json(&valid_submit_message())
            .reply(&setup_router(dependency_manager.clone()))
            .await;
        assert_eq!(StatusCode::CREATED, response.status());

        serde_json::from_slice(response.body()).unwrap()
    }

    #[tokio::test]
    async fn submit_certificate_returns_created_with_the_new_id() {
        let dependency_manager = initialize_dependencies().await;

        let submitted = submit_valid_certificate(&dependency_manager).await;

        assert!(!submitted.certificate_id.is_empty());
        assert!(!submitted.artifact_location.is_empty());
    }

    #[tokio::test]
    async fn submit_certificate_without_approver_email_returns_bad_request() {
        let dependency_manager = initialize_dependencies().await;
        let message = SubmitCertificateMessage {
            approvers: vec![ApproverMessagePart {
                name: "Bob".to_string(),
                email: "".to_string(),
            }],
            ..valid_submit_message()
        };

        let response = request()
            .method("POST")
            .path("/certificates")
            .json(&message)
            .reply(&setup_router(dependency_manager))
            .await;

        assert_eq!(StatusCode::BAD_REQUEST, response.status());
    }

    #[tokio::test]
    async fn submit_certificate_with_invalid_image_hex_returns_bad_request() {
        let dependency_manager = initialize_dependencies().await;
        let message = SubmitCertificateMessage {
            certificate_image: "not hex at all".to_string(),
            ..valid_submit_message()
        };

        let response = request()
            .method("POST")
            .path("/certificates")
            .json(&message)
            .reply(&setup_router(dependency_manager))
            .await;

        assert_eq!(StatusCode::BAD_REQUEST, response.status());
    }

    #[tokio::test]
    async fn list_pending_certificates_requires_the_approver_email() {
        let dependency_manager = initialize_dependencies().await;

        let response = request()
            .method("GET")
            .path("/certificates/pending")
            .reply(&setup_router(dependency_manager))
            .await;

        assert_eq!(StatusCode::BAD_REQUEST, response.status());
    }

    #[tokio::test]
    async fn list_pending_certificates_filters_by_approver_email() {
        let dependency_manager = initialize_dependencies().await;
        let submitted = submit_valid_certificate(&dependency_manager).await;

        let response = request()
            .method("GET")
            .path("/certificates/pending?approver_email=bob@x.com")
            .reply(&setup_router(dependency_manager.clone()))
            .await;
        assert_eq!(StatusCode::OK, response.status());
        let messages: Vec<PendingCertificateMessage> =
            serde_json::from_slice(response.body()).unwrap();
        assert_eq!(1, messages.len());
        assert_eq!(submitted.certificate_id, messages[0].certificate_id);
        assert_eq!("Jane Doe", messages[0].recipient_name);

        let response = request()
            .method("GET")
            .path("/certificates/pending?approver_email=nobody@x.com")
            .reply(&setup_router(dependency_manager))
            .await;
        assert_eq!(StatusCode::OK, response.status());
        let messages: Vec<PendingCertificateMessage> =
            serde_json::from_slice(response.body()).unwrap();
        assert!(messages.is_empty());
    }

    #[tokio::test]
    async fn list_pending_certificates_returns_500_when_the_service_fails() {
        let mut workflow_service = MockCertificateWorkflowService::new();
        workflow_service
            .expect_list_pending_for_approver()
            .returning(|_| {
                Err(CertificateWorkflowError::Internal(anyhow::anyhow!(
                    "an error"
                )))
            });
        let mut dependency_manager =
            DependenciesBuilder::new(Configuration::new_sample(), discard_logger())
                .build_dependency_container()
                .await
                .unwrap();
        dependency_manager.workflow_service = Arc::new(workflow_service);

        let response = request()
            .method("GET")
            .path("/certificates/pending?approver_email=bob@x.com")
            .reply(&setup_router(Arc::new(dependency_manager)))
            .await;

        assert_eq!(StatusCode::INTERNAL_SERVER_ERROR, response.status());
    }

    #[tokio::test]
    async fn certificate_detail_returns_the_request_or_not_found() {
        let dependency_manager = initialize_dependencies().await;
        let submitted = submit_valid_certificate(&dependency_manager).await;

        let response = request()
            .method("GET")
            .path(&format!("/certificates/{}", submitted.certificate_id))
            .reply(&setup_router(dependency_manager.clone()))
            .await;
        assert_eq!(StatusCode::OK, response.status());

        let response = request()
            .method("GET")
            .path("/certificates/unknown-id")
            .reply(&setup_router(dependency_manager))
            .await;
        assert_eq!(StatusCode::NOT_FOUND, response.status());
    }

    #[tokio::test]
    async fn approve_certificate_moves_the_request_out_of_the_pending_queue() {
        let dependency_manager = initialize_dependencies().await;
        let submitted = submit_valid_certificate(&dependency_manager).await;
        let approval = ApproveCertificateMessage {
            signed_image: hex::encode(b"signed png"),
            content_type: None,
        };

        let response = request()
            .method("POST")
            .path(&format!(
                "/certificates/{}/approve",
                submitted.certificate_id
            ))
            .json(&approval)
            .reply(&setup_router(dependency_manager.clone()))
            .await;
        assert_eq!(StatusCode::OK, response.status());
        let approved: CertificateApprovedMessage =
            serde_json::from_slice(response.body()).unwrap();
        assert_ne!(submitted.certificate_id, approved.certificate_id);

        let response = request()
            .method("GET")
            .path("/certificates/pending?approver_email=bob@x.com")
            .reply(&setup_router(dependency_manager.clone()))
            .await;
        let messages: Vec<PendingCertificateMessage> =
            serde_json::from_slice(response.body()).unwrap();
        assert!(messages.is_empty());

        // A second approval of the same request is a not found.
        let response = request()
            .method("POST")
            .path(&format!(
                "/certificates/{}/approve",
                submitted.certificate_id
            ))
            .json(&approval)
            .reply(&setup_router(dependency_manager))
            .await;
        assert_eq!(StatusCode::NOT_FOUND, response.status());
    }

    #[tokio::test]
    async fn approve_certificate_without_image_returns_bad_request() {
        let dependency_manager = initialize_dependencies().await;
        let submitted = submit_valid_certificate(&dependency_manager).await;

        let response = request()
            .method("POST")
            .path(&format!(
                "/certificates/{}/approve",
                submitted.certificate_id
            ))
            .json(&ApproveCertificateMessage::default())
            .reply(&setup_router(dependency_manager))
            .await;

        assert_eq!(StatusCode::BAD_REQUEST, response.status());
    }

    #[tokio::test]
    async fn reject_certificate_is_terminal() {
        let dependency_manager = initialize_dependencies().await;
        let submitted = submit_valid_certificate(&dependency_manager).await;

        let response = request()
            .method("POST")
            .path(&format!("/certificates/{}/reject", submitted.certificate_id))
            .reply(&setup_router(dependency_manager.clone()))
            .await;
        assert_eq!(StatusCode::OK, response.status());

        let response = request()
            .method("POST")
            .path(&format!("/certificates/{}/reject", submitted.certificate_id))
            .reply(&setup_router(dependency_manager.clone()))
            .await;
        assert_eq!(StatusCode::NOT_FOUND, response.status());

        // The rejected request is still queryable directly.
        let response = request()
            .method("GET")
            .path(&format!("/certificates/{}", submitted.certificate_id))
            .reply(&setup_router(dependency_manager))
            .await;
        assert_eq!(StatusCode::OK, response.status());
        let message: PendingCertificateMessage =
            serde_json::from_slice(response.body()).unwrap();
        assert_eq!(
            crate::entities::CertificateStatus::Rejected,
            message.status
        );
    }

    #[tokio::test]
    async fn reject_unknown_certificate_returns_not_found() {
        let dependency_manager = initialize_dependencies().await;

        let response = request()
            .method("POST")
            .path("/certificates/unknown-id/reject")
            .reply(&setup_router(dependency_manager))
            .await;

        assert_eq!(StatusCode::NOT_FOUND, response.status());
    }
}
