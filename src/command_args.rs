use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use config::builder::DefaultState;
use config::{ConfigBuilder, Map, Source, Value, ValueKind};
use slog::{debug, info, Level, Logger};

use crate::dependency_injection::DependenciesBuilder;
use crate::http_server::Server;
use crate::{Configuration, DefaultConfiguration, StdResult};

/// Main application command line parameters
#[derive(Parser, Debug, Clone)]
#[clap(name = "certiflow", about = "A certificate issuance and approval workflow server")]
pub struct MainOpts {
    /// Available commands
    #[clap(subcommand)]
    pub command: MainCommand,

    /// Run Mode, the name of the configuration file to load
    #[clap(short, long, default_value = "dev")]
    pub run_mode: String,

    /// Verbosity level
    #[clap(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Directory where the configuration files are located
    #[clap(long, default_value = "./config")]
    pub config_directory: PathBuf,
}

impl MainOpts {
    /// Execute the selected command.
    pub async fn execute(&self, root_logger: Logger) -> StdResult<()> {
        let config_file_path = self.config_directory.join(&self.run_mode);
        let config_builder = config::Config::builder()
            .add_source(DefaultConfiguration::default())
            .add_source(
                config::File::with_name(&config_file_path.to_string_lossy()).required(false),
            )
            .add_source(config::Environment::default());
        debug!(root_logger, "Started"; "run_mode" => &self.run_mode);

        match &self.command {
            MainCommand::Serve(cmd) => cmd.execute(root_logger, config_builder).await,
        }
    }

    /// Map the verbosity level to a slog level.
    pub fn log_level(&self) -> Level {
        match self.verbose {
            0 => Level::Warning,
            1 => Level::Info,
            2 => Level::Debug,
            _ => Level::Trace,
        }
    }
}

/// Main command selector
#[derive(Debug, Clone, Subcommand)]
pub enum MainCommand {
    /// Run the HTTP server
    Serve(ServeCommand),
}

/// Server runtime mode
#[derive(Parser, Debug, Clone)]
pub struct ServeCommand {
    /// Server listening IP
    #[clap(long)]
    pub server_ip: Option<String>,

    /// Server TCP port
    #[clap(long)]
    pub server_port: Option<u16>,

    /// Directory to store server data (SQLite database)
    #[clap(long)]
    pub data_stores_directory: Option<PathBuf>,

    /// Directory where the artifact files are written
    #[clap(long)]
    pub artifact_store_directory: Option<PathBuf>,
}

impl Source for ServeCommand {
    fn clone_into_box(&self) -> Box<dyn Source + Send + Sync> {
        Box::new(self.clone())
    }

    fn collect(&self) -> Result<Map<String, Value>, config::ConfigError> {
        let mut result = Map::new();
        let namespace = "clap arguments".to_string();

        if let Some(server_ip) = self.server_ip.clone() {
            result.insert(
                "server_ip".to_string(),
                Value::new(Some(&namespace), ValueKind::from(server_ip)),
            );
        }
        if let Some(server_port) = self.server_port {
            result.insert(
                "server_port".to_string(),
                Value::new(Some(&namespace), ValueKind::from(server_port)),
            );
        }
        if let Some(data_stores_directory) = self.data_stores_directory.clone() {
            result.insert(
                "data_stores_directory".to_string(),
                Value::new(
                    Some(&namespace),
                    ValueKind::from(format!("{}", data_stores_directory.to_string_lossy())),
                ),
            );
        }
        if let Some(artifact_store_directory) = self.artifact_store_directory.clone() {
            result.insert(
                "artifact_store_directory".to_string(),
                Value::new(
                    Some(&namespace),
                    ValueKind::from(format!("{}", artifact_store_directory.to_string_lossy())),
                ),
            );
        }

        Ok(result)
    }
}

impl ServeCommand {
    /// Build the dependencies and run the notification dispatcher and the
    /// HTTP server until a shutdown signal arrives.
    pub async fn execute(
        &self,
        root_logger: Logger,
        mut config_builder: ConfigBuilder<DefaultState>,
    ) -> StdResult<()> {
        config_builder = config_builder.add_source(self.clone());
        let config: Configuration = config_builder
            .build()
            .with_context(|| "configuration build error")?
            .try_deserialize()
            .with_context(|| "configuration deserialize error")?;
        debug!(root_logger, "SERVE command"; "config" => format!("{config:?}"));
        let mut dependencies_builder =
            DependenciesBuilder::new(config.clone(), root_logger.clone());

        // The notification dispatcher drains the approval-request messages
        // in its own task for as long as a transmitter is alive.
        let mut notification_dispatcher = dependencies_builder
            .create_notification_dispatcher()
            .await
            .with_context(|| "Dependencies Builder can not create notification dispatcher")?;
        let notification_thread =
            tokio::spawn(async move { notification_dispatcher.run().await });

        let dependency_container = Arc::new(
            dependencies_builder
                .build_dependency_container()
                .await
                .with_context(|| "Dependencies Builder can not create dependency container")?,
        );
        let server = Server::new(
            &config.server_ip,
            config.server_port,
            dependency_container,
            root_logger.clone(),
        )?;
        server
            .start(async {
                let _ = tokio::signal::ctrl_c().await;
            })
            .await;

        // Release the remaining transmitters so the dispatcher terminates.
        drop(server);
        drop(dependencies_builder);
        notification_thread
            .await
            .with_context(|| "notification dispatcher crashed")?;
        info!(root_logger, "server stopped");

        Ok(())
    }
}
