#![warn(missing_docs)]
//! Certiflow is a certificate issuance and approval workflow server.
//!
//! Clients submit certificate requests with a rendered certificate image and
//! a list of approvers. Each approver sees the requests pending their
//! decision and either approves them (attaching a signed image, which moves
//! the record to the approved collection) or rejects them (a terminal state).
//!
//! The crate is split between:
//! - the [workflow service][services::CertificateWorkflowService] holding the
//!   business rules,
//! - the [repositories][database::repository] persisting records in SQLite,
//! - the [artifact store][artifact_store::ArtifactStore] keeping the
//!   certificate images,
//! - the [HTTP server][http_server::Server] exposing the whole thing.

pub mod artifact_store;
mod command_args;
mod configuration;
pub mod database;
pub mod dependency_injection;
pub mod entities;
pub mod http_server;
pub mod messages;
pub mod notification;
pub mod services;
pub mod sqlite;

pub use command_args::{MainCommand, MainOpts, ServeCommand};
pub use configuration::{Configuration, DefaultConfiguration, ExecutionEnvironment};

/// Generic error type used by the infrastructure layers.
pub type StdError = anyhow::Error;

/// Generic result type used by the infrastructure layers.
pub type StdResult<T> = anyhow::Result<T, StdError>;
