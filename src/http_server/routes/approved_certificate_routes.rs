use std::sync::Arc;

use warp::Filter;

use crate::dependency_injection::DependencyContainer;

use super::middlewares;

pub fn routes(
    dependency_manager: &Arc<DependencyContainer>,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    list_approved_certificates(dependency_manager).or(delete_approved_certificate(
        dependency_manager,
    ))
}

/// GET /certificates/approved
fn list_approved_certificates(
    dependency_manager: &Arc<DependencyContainer>,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    warp::path!("certificates" / "approved")
        .and(warp::get())
        .and(middlewares::with_logger(dependency_manager))
        .and(middlewares::with_workflow_service(dependency_manager))
        .and_then(handlers::list_approved_certificates)
}

/// DELETE /certificates/approved/{certificate_id}
fn delete_approved_certificate(
    dependency_manager: &Arc<DependencyContainer>,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    warp::path!("certificates" / "approved" / String)
        .and(warp::delete())
        .and(middlewares::with_logger(dependency_manager))
        .and(middlewares::with_workflow_service(dependency_manager))
        .and_then(handlers::delete_approved_certificate)
}

mod handlers {
    use std::convert::Infallible;
    use std::sync::Arc;

    use slog::{warn, Logger};
    use warp::http::StatusCode;

    use crate::http_server::routes::reply;
    use crate::messages::ApprovedCertificateMessage;
    use crate::services::{CertificateWorkflowError, CertificateWorkflowService};

    /// List all approved certificates
    pub async fn list_approved_certificates(
        logger: Logger,
        workflow_service: Arc<dyn CertificateWorkflowService>,
    ) -> Result<impl warp::Reply, Infallible> {
        match workflow_service.list_approved().await {
            Ok(certificates) => {
                let messages: Vec<ApprovedCertificateMessage> =
                    certificates.into_iter().map(Into::into).collect();
                Ok(reply::json(&messages, StatusCode::OK))
            }
            Err(err) => {
                warn!(logger, "list_approved_certificates::error"; "error" => ?err);
                Ok(reply::server_error(err))
            }
        }
    }

    /// Delete an approved certificate
    pub async fn delete_approved_certificate(
        certificate_id: String,
        logger: Logger,
        workflow_service: Arc<dyn CertificateWorkflowService>,
    ) -> Result<impl warp::Reply, Infallible> {
        match workflow_service.delete_approved(&certificate_id).await {
            Ok(()) => Ok(reply::empty(StatusCode::OK)),
            Err(CertificateWorkflowError::NotFound(_)) => {
                Ok(reply::empty(StatusCode::NOT_FOUND))
            }
            Err(err) => {
                warn!(logger, "delete_approved_certificate::error"; "error" => ?err);
                Ok(reply::server_error(err))
            }
        }
    }
}
