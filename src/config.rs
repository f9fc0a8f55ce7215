/*
 * Responsibility
 * - load settings from the environment (session store, authentication service URL, CORS, ...)
 * - validate them (missing or invalid values fail startup)
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(raw: Option<String>) -> Self {
        match raw
            .unwrap_or_else(|| "development".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

/// What the security filter does with an `Authorization` header it cannot parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MalformedHeaderPolicy {
    /// Fail the request with 401.
    #[default]
    Reject,
    /// Treat the request like one without credentials.
    Anonymous,
}

impl FromStr for MalformedHeaderPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reject" => Ok(Self::Reject),
            "anonymous" => Ok(Self::Anonymous),
            _ => Err(ConfigError::Invalid("MALFORMED_AUTH_HEADER_POLICY")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionStoreBackend {
    Postgres { url: String, max_connections: u32 },
    Valkey { url: String, key_prefix: String },
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,
    pub cors_allowed_origins: Vec<String>,
    pub request_timeout: Duration,

    // Where unauthenticated clients are sent to log in
    pub authentication_service_url: String,
    pub malformed_header_policy: MalformedHeaderPolicy,

    pub session_store: SessionStoreBackend,
    pub session_idle_timeout: Option<Duration>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port: u16 = parse_or(&lookup, "PORT", 3000)?;

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::parse(lookup("APP_ENV"));

        let cors_allowed_origins = lookup("CORS_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();

        let request_timeout =
            Duration::from_secs(parse_or(&lookup, "REQUEST_TIMEOUT_SECONDS", 30)?);

        let authentication_service_url = lookup("AUTHENTICATION_SERVICE_URL")
            .ok_or(ConfigError::Missing("AUTHENTICATION_SERVICE_URL"))?;
        // Only checked for being a URL at all; the filter passes it through untouched.
        Url::parse(&authentication_service_url)
            .map_err(|_| ConfigError::Invalid("AUTHENTICATION_SERVICE_URL"))?;

        let malformed_header_policy = match lookup("MALFORMED_AUTH_HEADER_POLICY") {
            Some(raw) => raw.parse()?,
            None => MalformedHeaderPolicy::default(),
        };

        let store_url =
            lookup("SESSION_STORE_URL").ok_or(ConfigError::Missing("SESSION_STORE_URL"))?;
        let scheme = Url::parse(&store_url)
            .map_err(|_| ConfigError::Invalid("SESSION_STORE_URL"))?
            .scheme()
            .to_string();

        let session_store = match scheme.as_str() {
            "postgres" | "postgresql" => SessionStoreBackend::Postgres {
                url: store_url,
                max_connections: parse_or(&lookup, "SESSION_STORE_MAX_CONNECTIONS", 10)?,
            },
            "redis" | "rediss" => SessionStoreBackend::Valkey {
                url: store_url,
                key_prefix: lookup("SESSION_KEY_PREFIX").unwrap_or_else(|| "session".to_string()),
            },
            _ => return Err(ConfigError::Invalid("SESSION_STORE_URL")),
        };

        let idle_secs: u64 = parse_or(&lookup, "SESSION_IDLE_TIMEOUT_SECONDS", 0)?;
        let session_idle_timeout = (idle_secs > 0).then(|| Duration::from_secs(idle_secs));

        Ok(Self {
            addr,
            app_env,
            cors_allowed_origins,
            request_timeout,
            authentication_service_url,
            malformed_header_policy,
            session_store,
            session_idle_timeout,
        })
    }
}

// Unset → `default`; set but unparsable → startup error.
fn parse_or<T, F>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid(key)),
        None => Ok(default),
    }
}
