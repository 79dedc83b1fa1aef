use std::sync::Arc;

use warp::http::Method;
use warp::Filter;

use crate::dependency_injection::DependencyContainer;

use super::{approved_certificate_routes, certificate_routes, middlewares};

/// Routes
pub fn routes(
    dependency_manager: Arc<DependencyContainer>,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    let cors = warp::cors()
        .allow_any_origin()
        .allow_headers(vec!["content-type"])
        .allow_methods(vec![
            Method::GET,
            Method::POST,
            Method::DELETE,
            Method::OPTIONS,
        ]);

    // The approved routes come first: `certificates/approved` would otherwise
    // be captured by the `certificates/{id}` detail route.
    warp::any()
        .and(
            approved_certificate_routes::routes(&dependency_manager)
                .or(certificate_routes::routes(&dependency_manager))
                .with(cors),
        )
        .with(middlewares::log_route_call(&dependency_manager))
}
