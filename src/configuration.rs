use std::path::PathBuf;
use std::str::FromStr;

use config::{ConfigError, Map, Source, Value, ValueKind};
use serde::{Deserialize, Serialize};

/// Different kinds of execution environments
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub enum ExecutionEnvironment {
    /// Test environment, in-memory stores, maximum logging.
    Test,

    /// Production environment, persistent stores.
    Production,
}

impl FromStr for ExecutionEnvironment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "production" => Ok(Self::Production),
            "test" => Ok(Self::Test),
            _ => Err(ConfigError::Message(format!(
                "Unknown execution environment {s}"
            ))),
        }
    }
}

/// Certiflow server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Configuration {
    /// What kind of runtime environment the configuration is meant to.
    pub environment: ExecutionEnvironment,

    /// Server listening IP
    pub server_ip: String,

    /// Server listening port
    pub server_port: u16,

    /// Public URL under which the server (and the artifact locations it
    /// hands out) is reachable. Derived from the IP and port when not set.
    pub server_url: Option<String>,

    /// Directory to store server data (SQLite database)
    pub data_stores_directory: PathBuf,

    /// Directory where the artifact files are written
    pub artifact_store_directory: PathBuf,

    /// Certificate type applied to submissions that do not declare one
    pub default_certificate_type: String,

    /// Keep the original, unsigned certificate image when a request is
    /// approved. When false the image is purged once the signed artifact is
    /// stored.
    pub retain_unsigned_artifact_on_approval: bool,
}

impl Configuration {
    /// Create a sample configuration mainly for tests
    pub fn new_sample() -> Self {
        Self {
            environment: ExecutionEnvironment::Test,
            server_ip: "0.0.0.0".to_string(),
            server_port: 8080,
            server_url: None,
            data_stores_directory: PathBuf::from(":memory:"),
            artifact_store_directory: PathBuf::new(),
            default_certificate_type: "Certificate of Appreciation".to_string(),
            retain_unsigned_artifact_on_approval: true,
        }
    }

    /// Build the server URL from configuration, with a trailing slash.
    pub fn get_server_url(&self) -> String {
        match &self.server_url {
            Some(url) if url.ends_with('/') => url.clone(),
            Some(url) => format!("{url}/"),
            None => format!("http://{}:{}/", self.server_ip, self.server_port),
        }
    }

    /// Return the directory of the SQLite stores. If it does not exist, it
    /// is created.
    pub fn get_sqlite_dir(&self) -> std::io::Result<PathBuf> {
        let store_dir = &self.data_stores_directory;
        if !store_dir.exists() {
            std::fs::create_dir_all(store_dir)?;
        }

        Ok(self.data_stores_directory.clone())
    }

    /// Return the directory of the artifact files. If it does not exist, it
    /// is created.
    pub fn get_artifact_store_dir(&self) -> std::io::Result<PathBuf> {
        let artifact_dir = &self.artifact_store_directory;
        if !artifact_dir.exists() {
            std::fs::create_dir_all(artifact_dir)?;
        }

        Ok(self.artifact_store_directory.clone())
    }
}

/// Default configuration with all the default values for configurations.
#[derive(Debug, Clone)]
pub struct DefaultConfiguration {
    /// Execution environment
    pub environment: String,

    /// Server listening IP
    pub server_ip: String,

    /// Server listening port
    pub server_port: String,

    /// Directory to store server data
    pub data_stores_directory: String,

    /// Directory where the artifact files are written
    pub artifact_store_directory: String,

    /// Certificate type applied to submissions that do not declare one
    pub default_certificate_type: String,

    /// Keep the original certificate image on approval
    pub retain_unsigned_artifact_on_approval: String,
}

impl Default for DefaultConfiguration {
    fn default() -> Self {
        Self {
            environment: "Production".to_string(),
            server_ip: "0.0.0.0".to_string(),
            server_port: "8080".to_string(),
            data_stores_directory: "./certiflow-data/stores".to_string(),
            artifact_store_directory: "./certiflow-data/artifacts".to_string(),
            default_certificate_type: "Certificate of Appreciation".to_string(),
            retain_unsigned_artifact_on_approval: "true".to_string(),
        }
    }
}

impl Source for DefaultConfiguration {
    fn clone_into_box(&self) -> Box<dyn Source + Send + Sync> {
        Box::new(self.clone())
    }

    fn collect(&self) -> Result<Map<String, Value>, ConfigError> {
        let namespace = "default configuration".to_string();
        let entries = [
            ("environment", &self.environment),
            ("server_ip", &self.server_ip),
            ("server_port", &self.server_port),
            ("data_stores_directory", &self.data_stores_directory),
            ("artifact_store_directory", &self.artifact_store_directory),
            ("default_certificate_type", &self.default_certificate_type),
            (
                "retain_unsigned_artifact_on_approval",
                &self.retain_unsigned_artifact_on_approval,
            ),
        ];

        let mut result = Map::new();
        for (key, value) in entries {
            result.insert(
                key.to_string(),
                Value::new(Some(&namespace), ValueKind::from(value.clone())),
            );
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_url_is_derived_from_ip_and_port_when_not_set() {
        let config = Configuration::new_sample();

        assert_eq!("http://0.0.0.0:8080/", config.get_server_url());
    }

    #[test]
    fn server_url_override_always_ends_with_a_slash() {
        let config = Configuration {
            server_url: Some("https://certificates.example.com".to_string()),
            ..Configuration::new_sample()
        };

        assert_eq!(
            "https://certificates.example.com/",
            config.get_server_url()
        );
    }

    #[test]
    fn default_configuration_deserializes_into_a_configuration() {
        let config: Configuration = config::Config::builder()
            .add_source(DefaultConfiguration::default())
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(ExecutionEnvironment::Production, config.environment);
        assert_eq!(8080, config.server_port);
        assert!(config.retain_unsigned_artifact_on_approval);
    }
}
