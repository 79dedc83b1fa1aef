use std::fmt::Debug;

use slog::{warn, Logger};
use tokio::sync::mpsc::UnboundedSender;

/// The transmitter service is the sending half of the notification channel,
/// cloned into every component that emits messages.
pub struct TransmitterService<MSG>
where
    MSG: Debug + Sync + Send,
{
    transmitter: UnboundedSender<MSG>,
    logger: Logger,
}

impl<MSG> TransmitterService<MSG>
where
    MSG: Debug + Sync + Send,
{
    /// Instantiate a new service by passing a MPSC transmitter.
    pub fn new(transmitter: UnboundedSender<MSG>, logger: Logger) -> Self {
        Self {
            transmitter,
            logger,
        }
    }

    /// Clone the internal transmitter and return it.
    pub fn get_transmitter(&self) -> UnboundedSender<MSG> {
        self.transmitter.clone()
    }

    /// Send a message, fire and forget: a failure is logged and reported but
    /// must never bubble into the caller's outcome.
    pub fn send_message(&self, message: MSG) -> Result<(), String> {
        self.transmitter.send(message).map_err(|e| {
            let error_msg = format!("notification message could not be sent: {e}");
            warn!(self.logger, "{error_msg}");

            error_msg
        })
    }
}

#[cfg(test)]
mod tests {
    use tokio::sync::mpsc::unbounded_channel;

    use crate::test_tools::discard_logger;

    use super::*;

    #[tokio::test]
    async fn sent_messages_reach_the_receiver() {
        let (tx, mut rx) = unbounded_channel();
        let service = TransmitterService::new(tx, discard_logger());

        service.send_message("hello".to_string()).unwrap();

        assert_eq!(Some("hello".to_string()), rx.recv().await);
    }

    #[tokio::test]
    async fn sending_on_a_closed_channel_reports_the_failure() {
        let (tx, rx) = unbounded_channel();
        drop(rx);
        let service = TransmitterService::new(tx, discard_logger());

        service
            .send_message("hello".to_string())
            .expect_err("sending on a closed channel should report an error");
    }
}
