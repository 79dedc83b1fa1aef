//! Emission of "approval requested" notifications.
//!
//! After a submission is persisted, one message per approver is pushed on an
//! in-process channel. The [NotificationDispatcher] drains the channel and
//! hands the messages over to the delivery side, which is an external
//! collaborator: here the hand-over boundary is a structured log record.
//! Emission never affects the outcome of the submission.

mod dispatcher;
mod message;
mod transmitter_service;

pub use dispatcher::NotificationDispatcher;
pub use message::ApprovalRequestMessage;
pub use transmitter_service::TransmitterService;
