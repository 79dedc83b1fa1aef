use std::sync::Arc;

use clap::Parser;
use slog::{Drain, Logger};

use certiflow::{MainOpts, StdResult};

/// Build a logger from args.
fn build_logger(args: &MainOpts) -> Logger {
    let drain = slog_bunyan::new(std::io::stdout())
        .set_pretty(false)
        .build()
        .fuse();
    let drain = slog::LevelFilter::new(drain, args.log_level()).fuse();
    let drain = slog_async::Async::new(drain).build().fuse();

    Logger::root(Arc::new(drain), slog::o!())
}

#[tokio::main]
async fn main() -> StdResult<()> {
    let args = MainOpts::parse();
    let logger = build_logger(&args);

    args.execute(logger).await
}
