//! Configuration types and CLI options.
//!
//! This module defines the command-line surface (`Opt`), the library-facing
//! `Config` it is validated into, and the upstream `Credentials`.

use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::config::constants::{
    DEFAULT_CACHE_TTL_SECS, DEFAULT_LISTEN_ADDRESS, DEFAULT_UPSTREAM_TIMEOUT_SECS, ENV_API_KEY,
    ENV_RESELLER_ID,
};
use crate::error_handling::ConfigError;

/// Logging level for the application.
#[derive(Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: One JSON object per line for log shippers
#[derive(Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Reseller account credentials, fixed for the lifetime of the process.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Reseller identifier
    pub reseller_id: String,
    /// API key
    pub api_key: String,
}

impl Credentials {
    /// Creates a credential pair.
    pub fn new(reseller_id: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            reseller_id: reseller_id.into(),
            api_key: api_key.into(),
        }
    }
}

// The API key never reaches log output.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("reseller_id", &self.reseller_id)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// Command-line options.
///
/// Credentials fall back to environment variables (a `.env` file is loaded
/// by the binary before parsing).
///
/// # Examples
///
/// ```bash
/// synergy_wholesale_exporter --reseller-id 1234 --apikey secret
///
/// SYNERGY_WHOLESALE_RESELLER_ID=1234 SYNERGY_WHOLESALE_API_KEY=secret \
///     synergy_wholesale_exporter --address 127.0.0.1:9100 --ttl 600 --json
/// ```
#[derive(Debug, Parser)]
#[command(
    name = "synergy_wholesale_exporter",
    version,
    about = "Exports Synergy Wholesale domain inventory as Prometheus metrics."
)]
pub struct Opt {
    /// Synergy Wholesale Reseller ID
    #[arg(long, env = ENV_RESELLER_ID)]
    pub reseller_id: Option<String>,

    /// Synergy Wholesale API Key
    #[arg(long = "apikey", env = ENV_API_KEY, hide_env_values = true)]
    pub api_key: Option<String>,

    /// Listening address for the metrics server (":8080" binds all interfaces)
    #[arg(long, default_value = DEFAULT_LISTEN_ADDRESS)]
    pub address: String,

    /// Cache TTL value in seconds
    #[arg(long, default_value_t = DEFAULT_CACHE_TTL_SECS)]
    pub ttl: u64,

    /// Deadline for one upstream API request, in seconds (at least 1)
    #[arg(long, default_value_t = DEFAULT_UPSTREAM_TIMEOUT_SECS)]
    pub upstream_timeout: u64,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Output logging in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Library configuration (no CLI dependencies).
///
/// # Examples
///
/// ```no_run
/// use synergy_wholesale_exporter::{Config, Credentials};
/// use std::time::Duration;
///
/// let config = Config {
///     cache_ttl: Duration::from_secs(600),
///     ..Config::new(Credentials::new("1234", "secret"))
/// };
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Upstream account credentials
    pub credentials: Credentials,

    /// Address the metrics server binds to
    pub listen_address: SocketAddr,

    /// How long a successful upstream response is served from cache
    pub cache_ttl: Duration,

    /// Deadline for one upstream exchange
    pub upstream_timeout: Duration,
}

impl Config {
    /// Creates a configuration with default settings for the given account.
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            listen_address: SocketAddr::from(([0, 0, 0, 0], 8080)),
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
            upstream_timeout: Duration::from_secs(DEFAULT_UPSTREAM_TIMEOUT_SECS),
        }
    }
}

impl Opt {
    /// Log level selected by `--debug`.
    pub fn log_level(&self) -> LogLevel {
        if self.debug {
            LogLevel::Debug
        } else {
            LogLevel::Info
        }
    }

    /// Log format selected by `--json`.
    pub fn log_format(&self) -> LogFormat {
        if self.json {
            LogFormat::Json
        } else {
            LogFormat::Plain
        }
    }
}

impl TryFrom<Opt> for Config {
    type Error = ConfigError;

    fn try_from(opt: Opt) -> Result<Self, Self::Error> {
        let reseller_id =
            non_empty(opt.reseller_id.as_deref()).ok_or(ConfigError::MissingResellerId)?;
        let api_key = non_empty(opt.api_key.as_deref()).ok_or(ConfigError::MissingApiKey)?;
        let listen_address = parse_listen_address(&opt.address)?;
        if opt.upstream_timeout == 0 {
            return Err(ConfigError::ZeroUpstreamTimeout);
        }

        Ok(Config {
            credentials: Credentials::new(reseller_id, api_key),
            listen_address,
            cache_ttl: Duration::from_secs(opt.ttl),
            upstream_timeout: Duration::from_secs(opt.upstream_timeout),
        })
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Parses a listen address, accepting the `:port` shorthand for all interfaces.
pub fn parse_listen_address(address: &str) -> Result<SocketAddr, ConfigError> {
    let trimmed = address.trim();
    let candidate = if trimmed.starts_with(':') {
        format!("0.0.0.0{}", trimmed)
    } else {
        trimmed.to_string()
    };
    candidate
        .parse()
        .map_err(|_| ConfigError::InvalidListenAddress(address.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opt_from(args: &[&str]) -> Opt {
        let mut argv = vec!["synergy_wholesale_exporter"];
        argv.extend_from_slice(args);
        Opt::try_parse_from(argv).expect("arguments should parse")
    }

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(
            log::LevelFilter::from(LogLevel::Error),
            log::LevelFilter::Error
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Warn),
            log::LevelFilter::Warn
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Info),
            log::LevelFilter::Info
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Debug),
            log::LevelFilter::Debug
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Trace),
            log::LevelFilter::Trace
        );
    }

    #[test]
    fn test_config_from_flags() {
        let opt = opt_from(&[
            "--reseller-id",
            "123",
            "--apikey",
            "abc",
            "--address",
            "127.0.0.1:9100",
            "--ttl",
            "60",
            "--debug",
            "--json",
        ]);
        assert_eq!(opt.log_level(), LogLevel::Debug);
        assert_eq!(opt.log_format(), LogFormat::Json);

        let config = Config::try_from(opt).unwrap();

        assert_eq!(config.credentials, Credentials::new("123", "abc"));
        assert_eq!(config.listen_address, "127.0.0.1:9100".parse().unwrap());
        assert_eq!(config.cache_ttl, Duration::from_secs(60));
        assert_eq!(
            config.upstream_timeout,
            Duration::from_secs(DEFAULT_UPSTREAM_TIMEOUT_SECS)
        );
    }

    #[test]
    fn test_defaults() {
        let opt = opt_from(&["--reseller-id", "123", "--apikey", "abc"]);
        assert_eq!(opt.ttl, 3600);
        assert_eq!(opt.address, ":8080");

        let config = Config::try_from(opt).unwrap();
        assert_eq!(config.listen_address, "0.0.0.0:8080".parse().unwrap());
    }

    #[test]
    fn test_missing_credentials_rejected() {
        let opt = Opt {
            reseller_id: None,
            api_key: Some("abc".into()),
            address: ":8080".into(),
            ttl: 3600,
            upstream_timeout: 30,
            debug: false,
            json: false,
        };
        assert!(matches!(
            Config::try_from(opt),
            Err(ConfigError::MissingResellerId)
        ));

        let opt = Opt {
            reseller_id: Some("123".into()),
            api_key: Some("   ".into()),
            address: ":8080".into(),
            ttl: 3600,
            upstream_timeout: 30,
            debug: false,
            json: false,
        };
        assert!(matches!(
            Config::try_from(opt),
            Err(ConfigError::MissingApiKey)
        ));
    }

    #[test]
    fn test_zero_upstream_timeout_rejected() {
        let opt = opt_from(&[
            "--reseller-id",
            "123",
            "--apikey",
            "abc",
            "--upstream-timeout",
            "0",
        ]);
        assert!(matches!(
            Config::try_from(opt),
            Err(ConfigError::ZeroUpstreamTimeout)
        ));

        let opt = opt_from(&[
            "--reseller-id",
            "123",
            "--apikey",
            "abc",
            "--upstream-timeout",
            "1",
        ]);
        let config = Config::try_from(opt).unwrap();
        assert_eq!(config.upstream_timeout, Duration::from_secs(1));
    }

    #[test]
    fn test_parse_listen_address() {
        assert_eq!(
            parse_listen_address(":9100").unwrap(),
            "0.0.0.0:9100".parse().unwrap()
        );
        assert_eq!(
            parse_listen_address("[::1]:8080").unwrap(),
            "[::1]:8080".parse().unwrap()
        );
        assert!(matches!(
            parse_listen_address("not-an-address"),
            Err(ConfigError::InvalidListenAddress(_))
        ));
    }

    #[test]
    fn test_credentials_debug_redacts_api_key() {
        let creds = Credentials::new("123", "super-secret");
        let rendered = format!("{:?}", creds);
        assert!(rendered.contains("123"));
        assert!(!rendered.contains("super-secret"));
    }
}
