use std::convert::Infallible;
use std::sync::Arc;

use slog::{debug, Logger};
use warp::Filter;

use crate::dependency_injection::DependencyContainer;
use crate::services::CertificateWorkflowService;

use super::http_server_child_logger;

/// With logger middleware
pub(crate) fn with_logger(
    dependency_manager: &Arc<DependencyContainer>,
) -> impl Filter<Extract = (Logger,), Error = Infallible> + Clone {
    let logger = http_server_child_logger(&dependency_manager.root_logger);
    warp::any().map(move || logger.clone())
}

/// Log to apply each time a route is called
///
/// Example of log produced: `POST /certificates 201 Created`
pub(crate) fn log_route_call(
    dependency_manager: &Arc<DependencyContainer>,
) -> warp::log::Log<impl Fn(warp::log::Info<'_>) + Clone> {
    let logger = http_server_child_logger(&dependency_manager.root_logger);
    warp::log::custom(move |info| {
        debug!(
            logger,
            "{} {} {}",
            info.method(),
            info.path(),
            info.status()
        )
    })
}

/// With certificate workflow service middleware
pub(crate) fn with_workflow_service(
    dependency_manager: &Arc<DependencyContainer>,
) -> impl Filter<Extract = (Arc<dyn CertificateWorkflowService>,), Error = Infallible> + Clone {
    let workflow_service = dependency_manager.workflow_service.clone();
    warp::any().map(move || workflow_service.clone())
}
