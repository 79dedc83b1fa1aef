use std::sync::Arc;

use slog::Logger;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};

use crate::artifact_store::{ArtifactStore, DumbArtifactStore, LocalArtifactStore};
use crate::database::migration::get_migrations;
use crate::database::repository::{ApprovedCertificateRepository, PendingCertificateRepository};
use crate::notification::{ApprovalRequestMessage, NotificationDispatcher, TransmitterService};
use crate::services::{CertificateWorkflowService, CertiflowWorkflowService};
use crate::sqlite::{ConnectionBuilder, SqliteConnection};
use crate::{Configuration, ExecutionEnvironment};

use super::{DependenciesBuilderError, DependencyContainer, Result};

const SQLITE_FILE: &str = "certiflow.sqlite3";

/// ## Dependencies container builder
///
/// This is meant to create SHARED DEPENDENCIES, ie. dependencies instances
/// that must be shared amongst several Tokio tasks. Each dependency is built
/// on first use and memoized.
pub struct DependenciesBuilder {
    /// Configuration parameters
    pub configuration: Configuration,

    root_logger: Logger,
    sqlite_connection: Option<Arc<SqliteConnection>>,
    pending_certificate_repository: Option<Arc<PendingCertificateRepository>>,
    approved_certificate_repository: Option<Arc<ApprovedCertificateRepository>>,
    artifact_store: Option<Arc<dyn ArtifactStore>>,
    notification_transmitter: Option<Arc<TransmitterService<ApprovalRequestMessage>>>,
    notification_receiver: Option<UnboundedReceiver<ApprovalRequestMessage>>,
    workflow_service: Option<Arc<dyn CertificateWorkflowService>>,
}

impl DependenciesBuilder {
    /// DependenciesBuilder factory
    pub fn new(configuration: Configuration, root_logger: Logger) -> Self {
        Self {
            configuration,
            root_logger,
            sqlite_connection: None,
            pending_certificate_repository: None,
            approved_certificate_repository: None,
            artifact_store: None,
            notification_transmitter: None,
            notification_receiver: None,
            workflow_service: None,
        }
    }

    /// Return a copy of the root logger.
    pub fn root_logger(&self) -> Logger {
        self.root_logger.clone()
    }

    async fn build_sqlite_connection(&self) -> Result<SqliteConnection> {
        let builder = match self.configuration.environment {
            ExecutionEnvironment::Test => ConnectionBuilder::open_memory(),
            ExecutionEnvironment::Production => {
                let sqlite_dir = self.configuration.get_sqlite_dir().map_err(|e| {
                    DependenciesBuilderError::Initialization(format!(
                        "cannot create stores directory: {e}"
                    ))
                })?;
                ConnectionBuilder::open_file(&sqlite_dir.join(SQLITE_FILE))
            }
        };
        let connection = builder
            .with_logger(self.root_logger.clone())
            .with_migrations(get_migrations())
            .build()?;

        Ok(connection)
    }

    /// Get the shared SQLite connection.
    pub async fn get_sqlite_connection(&mut self) -> Result<Arc<SqliteConnection>> {
        if self.sqlite_connection.is_none() {
            self.sqlite_connection = Some(Arc::new(self.build_sqlite_connection().await?));
        }

        Ok(self.sqlite_connection.as_ref().cloned().unwrap())
    }

    /// Get the pending certificate repository.
    pub async fn get_pending_certificate_repository(
        &mut self,
    ) -> Result<Arc<PendingCertificateRepository>> {
        if self.pending_certificate_repository.is_none() {
            self.pending_certificate_repository = Some(Arc::new(
                PendingCertificateRepository::new(self.get_sqlite_connection().await?),
            ));
        }

        Ok(self.pending_certificate_repository.as_ref().cloned().unwrap())
    }

    /// Get the approved certificate repository.
    pub async fn get_approved_certificate_repository(
        &mut self,
    ) -> Result<Arc<ApprovedCertificateRepository>> {
        if self.approved_certificate_repository.is_none() {
            self.approved_certificate_repository = Some(Arc::new(
                ApprovedCertificateRepository::new(self.get_sqlite_connection().await?),
            ));
        }

        Ok(self.approved_certificate_repository.as_ref().cloned().unwrap())
    }

    async fn build_artifact_store(&self) -> Result<Arc<dyn ArtifactStore>> {
        match self.configuration.environment {
            ExecutionEnvironment::Test => Ok(Arc::new(DumbArtifactStore::new())),
            ExecutionEnvironment::Production => {
                let artifact_dir = self.configuration.get_artifact_store_dir().map_err(|e| {
                    DependenciesBuilderError::Initialization(format!(
                        "cannot create artifacts directory: {e}"
                    ))
                })?;

                Ok(Arc::new(LocalArtifactStore::new(
                    self.configuration.get_server_url(),
                    &artifact_dir,
                    self.root_logger.clone(),
                )))
            }
        }
    }

    /// Get the artifact store.
    pub async fn get_artifact_store(&mut self) -> Result<Arc<dyn ArtifactStore>> {
        if self.artifact_store.is_none() {
            self.artifact_store = Some(self.build_artifact_store().await?);
        }

        Ok(self.artifact_store.as_ref().cloned().unwrap())
    }

    /// Get the notification transmitter service.
    pub async fn get_notification_transmitter(
        &mut self,
    ) -> Result<Arc<TransmitterService<ApprovalRequestMessage>>> {
        if self.notification_transmitter.is_none() {
            let (transmitter, receiver) = unbounded_channel();
            self.notification_transmitter = Some(Arc::new(TransmitterService::new(
                transmitter,
                self.root_logger.clone(),
            )));
            self.notification_receiver = Some(receiver);
        }

        Ok(self.notification_transmitter.as_ref().cloned().unwrap())
    }

    /// Create the notification dispatcher, the receiving end of the channel
    /// behind [get_notification_transmitter][Self::get_notification_transmitter].
    ///
    /// Can only be called once since the receiver is moved into it.
    pub async fn create_notification_dispatcher(&mut self) -> Result<NotificationDispatcher> {
        let _ = self.get_notification_transmitter().await?;
        let receiver = self.notification_receiver.take().ok_or_else(|| {
            DependenciesBuilderError::Initialization(
                "notification dispatcher was already created".to_string(),
            )
        })?;

        Ok(NotificationDispatcher::new(
            receiver,
            self.root_logger.clone(),
        ))
    }

    /// Get the certificate workflow service.
    pub async fn get_workflow_service(&mut self) -> Result<Arc<dyn CertificateWorkflowService>> {
        if self.workflow_service.is_none() {
            let service = CertiflowWorkflowService::new(
                self.get_pending_certificate_repository().await?,
                self.get_approved_certificate_repository().await?,
                self.get_artifact_store().await?,
                self.get_notification_transmitter().await?,
                self.configuration.default_certificate_type.clone(),
                self.configuration.retain_unsigned_artifact_on_approval,
                self.root_logger.clone(),
            );
            self.workflow_service = Some(Arc::new(service));
        }

        Ok(self.workflow_service.as_ref().cloned().unwrap())
    }

    /// Build the complete container of the dependencies the HTTP layer needs.
    pub async fn build_dependency_container(&mut self) -> Result<DependencyContainer> {
        Ok(DependencyContainer {
            config: self.configuration.clone(),
            root_logger: self.root_logger.clone(),
            sqlite_connection: self.get_sqlite_connection().await?,
            pending_certificate_repository: self.get_pending_certificate_repository().await?,
            approved_certificate_repository: self.get_approved_certificate_repository().await?,
            artifact_store: self.get_artifact_store().await?,
            notification_transmitter: self.get_notification_transmitter().await?,
            workflow_service: self.get_workflow_service().await?,
        })
    }
}
