//! HTTP surface of the server, built on warp.

mod routes;
mod server;

pub use server::Server;
