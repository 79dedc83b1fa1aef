use std::net::IpAddr;
use std::sync::Arc;

use anyhow::Context;
use slog::{info, Logger};
use warp::Future;

use crate::dependency_injection::DependencyContainer;
use crate::StdResult;

use super::routes::router;

/// Certiflow HTTP server
pub struct Server {
    ip: IpAddr,
    port: u16,
    dependency_manager: Arc<DependencyContainer>,
    logger: Logger,
}

impl Server {
    /// Server factory
    pub fn new(
        ip: &str,
        port: u16,
        dependency_manager: Arc<DependencyContainer>,
        logger: Logger,
    ) -> StdResult<Self> {
        Ok(Self {
            ip: ip
                .parse::<IpAddr>()
                .with_context(|| format!("invalid server IP '{ip}'"))?,
            port,
            dependency_manager,
            logger,
        })
    }

    /// Start the server, running until the shutdown signal resolves.
    pub async fn start(&self, shutdown_signal: impl Future<Output = ()> + Send + 'static) {
        info!(self.logger, "Start Certiflow HTTP server"; "port" => self.port);
        let routes = router::routes(self.dependency_manager.clone());
        let (_, server) =
            warp::serve(routes).bind_with_graceful_shutdown((self.ip, self.port), shutdown_signal);
        server.await;
    }
}
