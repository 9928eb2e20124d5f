//! Server configuration read from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::error::AppError;

/// Runtime configuration for the API server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory holding `index.json` and the scenario documents.
    pub content_dir: PathBuf,
    /// JSON file the progress store is kept in.
    pub progress_file: PathBuf,
    pub host: String,
    pub port: u16,
}

impl Config {
    /// Reads configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable is set but invalid.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads configuration through `lookup`, applying defaults for unset
    /// variables.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `PORT` is not a valid `u16`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let content_dir = lookup("CONTENT_DIR").unwrap_or_else(|| "content".to_string());
        let progress_file =
            lookup("PROGRESS_FILE").unwrap_or_else(|| "progress.json".to_string());
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port: u16 = lookup("PORT")
            .unwrap_or_else(|| "3000".to_string())
            .parse()
            .map_err(|e| AppError::Config(format!("PORT must be a valid u16: {e}")))?;

        Ok(Self {
            content_dir: PathBuf::from(content_dir),
            progress_file: PathBuf::from(progress_file),
            host,
            port,
        })
    }

    /// The address to listen on.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `HOST:PORT` is not a socket address.
    pub fn socket_addr(&self) -> Result<SocketAddr, AppError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults_apply_when_unset() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();

        assert_eq!(config.content_dir, PathBuf::from("content"));
        assert_eq!(config.progress_file, PathBuf::from("progress.json"));
        assert_eq!(config.socket_addr().unwrap().to_string(), "0.0.0.0:3000");
    }

    #[test]
    fn test_values_are_read_from_lookup() {
        let config = Config::from_lookup(lookup_from(&[
            ("CONTENT_DIR", "/srv/scenarios"),
            ("PROGRESS_FILE", "/var/lib/branchwise/progress.json"),
            ("HOST", "127.0.0.1"),
            ("PORT", "8080"),
        ]))
        .unwrap();

        assert_eq!(config.content_dir, PathBuf::from("/srv/scenarios"));
        assert_eq!(
            config.progress_file,
            PathBuf::from("/var/lib/branchwise/progress.json")
        );
        assert_eq!(config.socket_addr().unwrap().to_string(), "127.0.0.1:8080");
    }

    #[test]
    fn test_invalid_port_is_a_config_error() {
        let result = Config::from_lookup(lookup_from(&[("PORT", "eighty")]));

        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_invalid_host_is_a_config_error() {
        let config = Config::from_lookup(lookup_from(&[("HOST", "not a host")])).unwrap();

        assert!(matches!(config.socket_addr(), Err(AppError::Config(_))));
    }
}
