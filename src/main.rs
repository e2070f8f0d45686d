//! staticd: a static-content HTTP/HTTPS server.
//!
//! This is the application entry point. It parses command-line flags,
//! optionally merges them over a TOML config file, initializes tracing,
//! assembles the request pipeline, and runs the listener until it
//! terminates. Any fatal startup or serve error exits non-zero before or
//! without accepting further connections.

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use staticd::config::{LogFormat, ServerConfig};
use staticd::http::start_server;
use staticd::routes::create_router;

/// staticd: a configurable static-content HTTP/HTTPS server
#[derive(Parser, Debug)]
#[command(name = "staticd", version, about)]
struct Args {
    /// Path to a TOML configuration file; flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen address as host:port (an empty host binds all interfaces)
    #[arg(short, long)]
    address: Option<String>,

    /// Directory to serve
    #[arg(short, long)]
    directory: Option<PathBuf>,

    /// Don't offer HTTP/2 on the TLS listener
    #[arg(long)]
    disable_h2: bool,

    /// Don't resolve extension-less URLs against .html/.htm files
    #[arg(long)]
    disable_lookup_with_suffix: bool,

    /// Serve and list dotfiles
    #[arg(long)]
    show_dotfiles: bool,

    /// Log requests and print the startup banner
    #[arg(long)]
    log: bool,

    /// Log output format
    #[arg(long, value_enum)]
    log_format: Option<LogFormat>,

    /// Basic Auth credentials file (user:sha512-hash per line)
    #[arg(long)]
    password_file: Option<PathBuf>,

    /// TLS certificate file (with --tls-key, enables HTTPS)
    #[arg(long)]
    tls_cert: Option<PathBuf>,

    /// TLS key file (with --tls-cert, enables HTTPS)
    #[arg(long)]
    tls_key: Option<PathBuf>,

    /// Log level filter (e.g. "staticd=debug,tower_http=debug")
    #[arg(short, long)]
    log_level: Option<String>,
}

impl Args {
    /// Overlay command-line values onto the base configuration.
    fn apply(self, config: &mut ServerConfig) {
        if let Some(address) = self.address {
            config.address = address;
        }
        if let Some(directory) = self.directory {
            config.directory = directory;
        }
        if self.disable_h2 {
            config.disable_h2 = true;
        }
        if self.disable_lookup_with_suffix {
            config.disable_lookup_with_suffix = true;
        }
        if self.show_dotfiles {
            config.show_dotfiles = true;
        }
        if self.log {
            config.log = true;
        }
        if let Some(format) = self.log_format {
            config.log_format = format;
        }
        if let Some(path) = self.password_file {
            config.password_file = Some(path);
        }
        if let Some(path) = self.tls_cert {
            config.tls_cert = Some(path);
        }
        if let Some(path) = self.tls_key {
            config.tls_key = Some(path);
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match args.config.as_deref() {
        Some(path) => ServerConfig::load(path)?,
        None => ServerConfig::default(),
    };
    let log_level = args.log_level.clone();
    args.apply(&mut config);

    // Filter priority: CLI > env > default derived from the log toggle.
    let log_filter = log_level
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| config.default_log_filter().to_string());

    let registry =
        tracing_subscriber::registry().with(tracing_subscriber::EnvFilter::new(&log_filter));
    match config.log_format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
    }

    let app = create_router(&config)?;
    start_server(app, &config).await?;

    Ok(())
}
