use slog::{debug, info, Logger};
use tokio::sync::mpsc::UnboundedReceiver;

use super::ApprovalRequestMessage;

/// [ApprovalRequestMessage] receiving loop.
///
/// Delivery itself (email dispatch) is outside this server: the dispatcher is
/// the emission boundary and materializes each message as a structured log
/// record the delivery pipeline consumes.
#[derive(Debug)]
pub struct NotificationDispatcher {
    receiver: UnboundedReceiver<ApprovalRequestMessage>,
    logger: Logger,
}

impl NotificationDispatcher {
    /// Instantiate the dispatcher.
    pub fn new(receiver: UnboundedReceiver<ApprovalRequestMessage>, logger: Logger) -> Self {
        Self { receiver, logger }
    }

    /// Launch the dispatching loop. It runs until all the transmitters are
    /// gone and all messages have been processed.
    pub async fn run(&mut self) {
        info!(self.logger, "notification dispatcher: starting");
        loop {
            if let Some(message) = self.receiver.recv().await {
                info!(
                    self.logger, "approval requested";
                    "approver_email" => &message.approver_email,
                    "approver_name" => &message.approver_name,
                    "certificate_id" => &message.certificate_id,
                    "certificate_type" => &message.certificate_type,
                    "recipient_name" => &message.recipient_name,
                    "creator_name" => &message.creator_name,
                    "issue_date" => message.issue_date.to_string(),
                );
            } else {
                debug!(self.logger, "no more notifications to dispatch, quitting…");
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use tokio::sync::mpsc::unbounded_channel;

    use crate::database::record::PendingCertificateRecord;
    use crate::entities::CertificateRequest;
    use crate::test_tools::discard_logger;

    use super::*;

    #[tokio::test]
    async fn run_terminates_once_all_transmitters_are_dropped() {
        let (tx, rx) = unbounded_channel();
        let mut dispatcher = NotificationDispatcher::new(rx, discard_logger());
        let request: CertificateRequest =
            PendingCertificateRecord::dummy("cert-1", &["bob@x.com"]).into();
        tx.send(ApprovalRequestMessage::for_approver(
            &request,
            &request.approvers[0],
        ))
        .unwrap();
        drop(tx);

        // Must not hang: the channel closes when the last sender is dropped.
        dispatcher.run().await;
    }
}
