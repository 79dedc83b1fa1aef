mod approved_certificate_routes;
mod certificate_routes;
pub(crate) mod middlewares;
pub(crate) mod reply;
pub(crate) mod router;

use slog::Logger;

/// Logger of the HTTP layer, child of the root logger.
pub(crate) fn http_server_child_logger(logger: &Logger) -> Logger {
    logger.new(slog::o!("src" => "http_server"))
}
