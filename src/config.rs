//! Configuration loading and constants.
//!
//! `ServerConfig` is the single input to server assembly: the listen
//! address, the content root, and the feature toggles. Values come from an
//! optional TOML file, with command-line flags taking precedence; the merge
//! itself happens in `main`.

use clap::ValueEnum;
use const_format::formatcp;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Application name, used for the `Server` header and the Basic Auth realm.
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");

/// Value of the `Server` response header (compile-time string concatenation).
pub const SERVER_HEADER: &str = formatcp!("{}/{}", APP_NAME, env!("CARGO_PKG_VERSION"));

/// Realm label sent with Basic Auth challenges.
pub const AUTH_REALM: &str = APP_NAME;

/// URL prefix the embedded assets are served under. The leading dot keeps
/// the prefix out of dotfile-filtered listings of a root that happens to
/// contain a directory of the same name.
pub const ASSETS_PREFIX: &str = "/.staticd-assets";

/// Index file served for a directory instead of a generated listing.
pub const INDEX_FILE: &str = "index.html";

/// Extensions tried, in order, by suffix-less lookup.
pub const LOOKUP_SUFFIXES: &[&str] = &["html", "htm"];

/// Default listen address (all interfaces).
pub const DEFAULT_ADDRESS: &str = ":8080";

/// Default log filter when request logging is enabled.
pub const LOG_FILTER_VERBOSE: &str = "staticd=info,tower_http=info";

/// Default log filter when request logging is disabled.
pub const LOG_FILTER_QUIET: &str = "staticd=warn";

/// Log output format: human-readable text or structured JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Server configuration, immutable once assembly starts.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address as `host:port`; an empty host binds all interfaces.
    pub address: String,
    /// Content root directory.
    pub directory: PathBuf,
    /// Suppress the HTTP/2 offering on the TLS listener.
    pub disable_h2: bool,
    /// Suppress resolution of extension-less URLs against `.html`/`.htm` files.
    pub disable_lookup_with_suffix: bool,
    /// Serve and list files and directories whose names start with a dot.
    pub show_dotfiles: bool,
    /// Enable the request log and the startup banner.
    pub log: bool,
    /// Log output format.
    pub log_format: LogFormat,
    /// Basic Auth credentials file; authentication is enabled when set.
    pub password_file: Option<PathBuf>,
    /// TLS certificate file; TLS is enabled when both cert and key are set.
    pub tls_cert: Option<PathBuf>,
    /// TLS key file.
    pub tls_key: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDRESS.to_string(),
            directory: PathBuf::from("."),
            disable_h2: false,
            disable_lookup_with_suffix: false,
            show_dotfiles: false,
            log: false,
            log_format: LogFormat::default(),
            password_file: None,
            tls_cert: None,
            tls_key: None,
        }
    }
}

impl ServerConfig {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Whether HTTPS is enabled: both certificate and key must be set.
    pub fn is_https(&self) -> bool {
        self.tls_paths().is_some()
    }

    /// Certificate and key paths when TLS is fully configured.
    ///
    /// A partially specified pair, or empty path strings, means TLS stays
    /// disabled; file existence is checked by the TLS listener, not here.
    pub fn tls_paths(&self) -> Option<(&Path, &Path)> {
        match (
            non_empty(self.tls_cert.as_deref()),
            non_empty(self.tls_key.as_deref()),
        ) {
            (Some(cert), Some(key)) => Some((cert, key)),
            _ => None,
        }
    }

    /// Credentials file path when Basic Auth is enabled.
    pub fn password_file(&self) -> Option<&Path> {
        non_empty(self.password_file.as_deref())
    }

    /// Default tracing filter for the configured log toggle.
    pub fn default_log_filter(&self) -> &'static str {
        if self.log {
            LOG_FILTER_VERBOSE
        } else {
            LOG_FILTER_QUIET
        }
    }
}

fn non_empty(path: Option<&Path>) -> Option<&Path> {
    path.filter(|p| !p.as_os_str().is_empty())
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn config_with_tls(cert: Option<&str>, key: Option<&str>) -> ServerConfig {
        ServerConfig {
            tls_cert: cert.map(PathBuf::from),
            tls_key: key.map(PathBuf::from),
            ..ServerConfig::default()
        }
    }

    #[test]
    fn test_is_https_requires_both_paths() {
        assert!(config_with_tls(Some("cert.pem"), Some("key.pem")).is_https());
        assert!(!config_with_tls(Some("cert.pem"), None).is_https());
        assert!(!config_with_tls(None, Some("key.pem")).is_https());
        assert!(!config_with_tls(None, None).is_https());
    }

    #[test]
    fn test_is_https_treats_empty_paths_as_unset() {
        assert!(!config_with_tls(Some(""), Some("key.pem")).is_https());
        assert!(!config_with_tls(Some("cert.pem"), Some("")).is_https());
        assert!(!config_with_tls(Some(""), Some("")).is_https());
    }

    #[test]
    fn test_password_file_empty_means_disabled() {
        let config = ServerConfig {
            password_file: Some(PathBuf::from("")),
            ..ServerConfig::default()
        };
        assert!(config.password_file().is_none());

        let config = ServerConfig {
            password_file: Some(PathBuf::from("users.txt")),
            ..ServerConfig::default()
        };
        assert_eq!(config.password_file(), Some(Path::new("users.txt")));
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.address, ":8080");
        assert_eq!(config.directory, PathBuf::from("."));
        assert!(!config.disable_h2);
        assert!(!config.log);
        assert!(!config.is_https());
        assert!(config.password_file().is_none());
    }

    #[test]
    fn test_default_log_filter_follows_toggle() {
        let mut config = ServerConfig::default();
        assert_eq!(config.default_log_filter(), LOG_FILTER_QUIET);
        config.log = true;
        assert_eq!(config.default_log_filter(), LOG_FILTER_VERBOSE);
    }

    #[test]
    fn test_load_from_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
address = "127.0.0.1:9000"
directory = "/srv/www"
log = true
log_format = "json"
show_dotfiles = true
"#
        )
        .unwrap();

        let config = ServerConfig::load(file.path()).unwrap();
        assert_eq!(config.address, "127.0.0.1:9000");
        assert_eq!(config.directory, PathBuf::from("/srv/www"));
        assert!(config.log);
        assert_eq!(config.log_format, LogFormat::Json);
        assert!(config.show_dotfiles);
        // Unspecified fields keep their defaults.
        assert!(!config.disable_h2);
        assert!(!config.is_https());
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = ServerConfig::load("/nonexistent/staticd.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_load_invalid_toml_is_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "address = [not toml").unwrap();
        let err = ServerConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_server_header_carries_app_name() {
        assert!(SERVER_HEADER.starts_with("staticd/"));
    }
}
