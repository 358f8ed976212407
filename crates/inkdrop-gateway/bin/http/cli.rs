use clap::builder::FalseyValueParser;
use clap::{Args, Parser, Subcommand, ValueEnum};
use inkdrop_service::service::DEFAULT_MAX_CONTENT_BYTES;
use inkdrop_telemetry::{LogFormat, TelemetryConfig};
use std::fmt::{Display, Formatter};
use std::net::SocketAddr;

pub const LISTEN_ADDR_ENV: &str = "INKDROP_LISTEN_ADDR";
pub const PUBLIC_BASE_URL_ENV: &str = "INKDROP_PUBLIC_BASE_URL";
pub const STORAGE_BACKEND_ENV: &str = "INKDROP_STORAGE_BACKEND";
pub const REDIS_URL_ENV: &str = "INKDROP_REDIS_URL";
pub const KEY_PREFIX_ENV: &str = "INKDROP_KEY_PREFIX";
pub const MAX_CONTENT_BYTES_ENV: &str = "INKDROP_MAX_CONTENT_BYTES";
pub const TEST_MODE_ENV: &str = "TEST_MODE";
pub const LOG_FORMAT_ENV: &str = "INKDROP_LOG_FORMAT";
pub const OTLP_ENDPOINT_ENV: &str = "INKDROP_OTLP_ENDPOINT";

pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:3000";
pub const SERVICE_NAME: &str = "inkdrop";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageBackendArg {
    #[value(name = "in-memory")]
    InMemory,
    #[value(name = "redis")]
    Redis,
}

impl Display for StorageBackendArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackendArg::InMemory => write!(f, "in-memory"),
            StorageBackendArg::Redis => write!(f, "redis"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(arg: LogFormatArg) -> Self {
        match arg {
            LogFormatArg::Pretty => LogFormat::Pretty,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "inkdrop", version, about = "A pastebin with expiring, view-limited pastes")]
pub struct CLI {
    #[command(flatten)]
    pub telemetry: TelemetryArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP server.
    Serve(ServeArgs),
    /// Delete every expired paste from the configured store, then exit.
    PurgeExpired(PurgeArgs),
}

#[derive(Debug, Args)]
pub struct TelemetryArgs {
    #[arg(
        long,
        env = LOG_FORMAT_ENV,
        value_enum,
        default_value_t = LogFormatArg::Pretty,
        global = true
    )]
    pub log_format: LogFormatArg,

    #[arg(long, env = OTLP_ENDPOINT_ENV, global = true)]
    pub otlp_endpoint: Option<String>,
}

impl TelemetryArgs {
    pub fn config(&self) -> TelemetryConfig {
        TelemetryConfig::builder()
            .service_name(SERVICE_NAME)
            .format(self.log_format.into())
            .otlp_endpoint(self.otlp_endpoint.clone())
            .build()
    }
}

#[derive(Debug, Args)]
pub struct StoreArgs {
    #[arg(
        long,
        env = STORAGE_BACKEND_ENV,
        value_enum,
        default_value_t = StorageBackendArg::InMemory
    )]
    pub storage: StorageBackendArg,

    #[arg(long, env = REDIS_URL_ENV, required_if_eq("storage", "redis"))]
    pub redis_url: Option<String>,

    /// Namespace prepended to every Redis key.
    #[arg(long, env = KEY_PREFIX_ENV, default_value = "")]
    pub key_prefix: String,
}

#[derive(Debug, Args)]
pub struct ServeArgs {
    #[arg(long, env = LISTEN_ADDR_ENV, default_value = DEFAULT_LISTEN_ADDR)]
    pub listen_addr: SocketAddr,

    /// Base of returned paste URLs. Derived from the request's `Host` and
    /// `X-Forwarded-Proto` headers when unset.
    #[arg(long, env = PUBLIC_BASE_URL_ENV)]
    pub public_base_url: Option<String>,

    #[arg(long, env = MAX_CONTENT_BYTES_ENV, default_value_t = DEFAULT_MAX_CONTENT_BYTES)]
    pub max_content_bytes: usize,

    /// Honor the `x-test-now-ms` request header. `TEST_MODE=1` enables it.
    #[arg(long, env = TEST_MODE_ENV, value_parser = FalseyValueParser::new())]
    pub test_mode: bool,

    #[command(flatten)]
    pub store: StoreArgs,
}

#[derive(Debug, Args)]
pub struct PurgeArgs {
    #[command(flatten)]
    pub store: StoreArgs,
}
