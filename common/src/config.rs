//! Configuration loading.
//!
//! All settings come from the environment, optionally seeded from a `.env`
//! file in the working directory.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::errors::AppError;

/// Default listening port of the proxy service.
pub const DEFAULT_SERVICE_PORT: u16 = 3001;

/// Default base URL the browser uses to reach the proxy service.
pub const DEFAULT_API_URL: &str = "http://localhost:3001";

/// Load `.env` from the working directory (best-effort, no error if missing).
///
/// Variables already present in the environment are not overridden.
pub fn load_dotenv() {
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!(path = %path.display(), "loaded .env"),
        Err(e) if e.not_found() => {}
        Err(e) => eprintln!("warning: failed to read .env: {}", e),
    }
}

/// How TLS is negotiated with target databases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TlsMode {
    /// Never use TLS.
    Disable,
    /// Try TLS without validating the certificate, fall back to plaintext.
    Prefer,
    /// TLS on every connection, certificate not validated.
    #[default]
    Insecure,
    /// TLS with certificate chain and host name validation.
    VerifyFull,
}

impl TlsMode {
    /// Mode used for one request.
    ///
    /// A request that explicitly asked for TLS never falls back to
    /// plaintext: `Prefer` is upgraded to `Insecure`.
    pub fn for_request(self, ssl_requested: bool) -> TlsMode {
        match (self, ssl_requested) {
            (TlsMode::Prefer, true) => TlsMode::Insecure,
            (mode, _) => mode,
        }
    }
}

impl FromStr for TlsMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "disable" | "off" => Ok(TlsMode::Disable),
            "prefer" => Ok(TlsMode::Prefer),
            "insecure" | "require" => Ok(TlsMode::Insecure),
            "verify-full" | "verify_full" => Ok(TlsMode::VerifyFull),
            other => Err(AppError::Validation(format!(
                "unknown DB_TLS_MODE '{}' (expected disable, prefer, insecure, verify-full)",
                other
            ))),
        }
    }
}

impl fmt::Display for TlsMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TlsMode::Disable => "disable",
            TlsMode::Prefer => "prefer",
            TlsMode::Insecure => "insecure",
            TlsMode::VerifyFull => "verify-full",
        };
        f.write_str(s)
    }
}

/// Service configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Service name used in logs and health output.
    pub service_name: String,
    /// Bind address.
    pub host: String,
    /// Listening port.
    pub port: u16,
    /// Upper bound on connection establishment; `None` waits indefinitely.
    pub connect_timeout_secs: Option<u64>,
    /// TLS negotiation with target databases.
    pub tls_mode: TlsMode,
    /// Emit JSON logs instead of text.
    pub json_logs: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            service_name: "proxy-service".to_string(),
            host: "0.0.0.0".to_string(),
            port: DEFAULT_SERVICE_PORT,
            connect_timeout_secs: None,
            tls_mode: TlsMode::default(),
            json_logs: false,
        }
    }
}

impl AppConfig {
    /// Loads the configuration for `service_name` from the environment.
    ///
    /// Unparsable values fall back to their defaults with a warning.
    pub fn load_with_service(service_name: &str) -> Self {
        Self::from_lookup(service_name, |key| std::env::var(key).ok())
    }

    /// Loads the configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(service_name: &str, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let port = lookup("PORT")
            .or_else(|| lookup("SERVER_PORT"))
            .and_then(|v| parse_or_warn::<u16>("PORT", &v))
            .unwrap_or(defaults.port);

        let connect_timeout_secs = lookup("DB_CONNECT_TIMEOUT_SECS")
            .and_then(|v| parse_or_warn::<u64>("DB_CONNECT_TIMEOUT_SECS", &v))
            .filter(|secs| *secs > 0);

        let tls_mode = match lookup("DB_TLS_MODE") {
            Some(v) => v.parse().unwrap_or_else(|e: AppError| {
                tracing::warn!(error = %e, "falling back to the default TLS mode");
                TlsMode::default()
            }),
            None => TlsMode::default(),
        };

        Self {
            service_name: service_name.to_string(),
            host: lookup("HOST").unwrap_or(defaults.host),
            port,
            connect_timeout_secs,
            tls_mode,
            json_logs: lookup("LOG_FORMAT")
                .map(|v| v.eq_ignore_ascii_case("json"))
                .unwrap_or(false),
        }
    }

    /// Connect timeout as a duration.
    pub fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout_secs.map(Duration::from_secs)
    }

    /// `host:port` to bind.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Browser client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the proxy service, without trailing slash.
    pub api_url: String,
}

impl ClientConfig {
    /// Resolves the API URL: explicit override, then the value baked in at
    /// build time through `DB_BROWSER_API_URL`, then the default.
    pub fn resolve(override_url: Option<String>) -> Self {
        let api_url = override_url
            .filter(|u| !u.trim().is_empty())
            .or_else(|| option_env!("DB_BROWSER_API_URL").map(String::from))
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        Self {
            api_url: api_url.trim_end_matches('/').to_string(),
        }
    }

    /// Full URL of an endpoint path such as `/api/query`.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }
}

fn parse_or_warn<T: FromStr>(key: &str, value: &str) -> Option<T> {
    match value.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            tracing::warn!(key, value, "ignoring unparsable setting");
            None
        }
    }
}
