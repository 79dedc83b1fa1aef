use std::sync::Arc;

use slog::Logger;

use crate::artifact_store::ArtifactStore;
use crate::database::repository::{ApprovedCertificateRepository, PendingCertificateRepository};
use crate::notification::{ApprovalRequestMessage, TransmitterService};
use crate::services::CertificateWorkflowService;
use crate::sqlite::SqliteConnection;
use crate::Configuration;

/// DependencyContainer gathers the dependencies the HTTP layer needs.
pub struct DependencyContainer {
    /// Configuration structure.
    pub config: Configuration,

    /// Root logger of the application.
    pub root_logger: Logger,

    /// SQLite database connection.
    ///
    /// This is not a real service, but it is needed to instantiate the
    /// repositories. Should be a private dependency.
    pub sqlite_connection: Arc<SqliteConnection>,

    /// Pending certificate repository.
    pub pending_certificate_repository: Arc<PendingCertificateRepository>,

    /// Approved certificate repository.
    pub approved_certificate_repository: Arc<ApprovedCertificateRepository>,

    /// Artifact store keeping the certificate images.
    pub artifact_store: Arc<dyn ArtifactStore>,

    /// Notification transmitter service.
    pub notification_transmitter: Arc<TransmitterService<ApprovalRequestMessage>>,

    /// Certificate workflow service, the engine of the server.
    pub workflow_service: Arc<dyn CertificateWorkflowService>,
}
