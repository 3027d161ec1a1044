use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

use crate::domain::errors::REDACTED;

/// Typed configuration handed to the service bootstrap
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct AppConfig {
    pub app_options: AppOptions,
    pub delete_short_urls: DeleteShortUrlsConfig,
    pub database: DatabaseConfig,
    pub url_shortener: UrlShortenerConfig,
    pub not_found_redirects: NotFoundRedirectsConfig,
    pub logging: LoggingSection,
    /// Service aliases registered with the dependency container
    pub aliases: BTreeMap<String, String>,
    /// Redis cache backend, only present when servers are configured
    pub cache: Option<RedisConfig>,
    pub router: RouterConfig,
    pub http: HttpServerConfig,
    pub ip_address_resolution: IpAddressResolutionConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppOptions {
    pub disable_track_param: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeleteShortUrlsConfig {
    pub check_visits_threshold: bool,
    pub visits_threshold: u64,
}

/// Database driver, serialized as the identifier the connection factory expects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DatabaseDriver {
    #[serde(rename = "pdo_sqlite")]
    Sqlite,
    #[serde(rename = "pdo_mysql")]
    Mysql,
    #[serde(rename = "pdo_pgsql")]
    Postgres,
}

impl DatabaseDriver {
    /// Parse a driver identifier
    pub fn from_identifier(identifier: &str) -> Option<Self> {
        match identifier {
            "pdo_sqlite" => Some(Self::Sqlite),
            "pdo_mysql" => Some(Self::Mysql),
            "pdo_pgsql" => Some(Self::Postgres),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sqlite => "pdo_sqlite",
            Self::Mysql => "pdo_mysql",
            Self::Postgres => "pdo_pgsql",
        }
    }
}

impl fmt::Display for DatabaseDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatabaseConfig {
    pub driver: DatabaseDriver,
    pub connection: DatabaseConnection,
}

/// Connection parameters, shaped by the driver
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DatabaseConnection {
    /// Embedded database file
    Sqlite { path: String },
    /// Networked database server
    Server {
        dbname: String,
        user: Option<String>,
        password: Option<Secret>,
        host: Option<String>,
        port: u16,
        driver_options: DriverOptions,
    },
}

/// Driver specific connection options
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DriverOptions {
    pub init_command: Option<String>,
    pub use_buffered_query: bool,
}

/// String that never shows up in `Debug` or serialized output
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl Serialize for Secret {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(REDACTED)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UrlShortenerConfig {
    pub domain: DomainConfig,
    pub validate_url: bool,
    pub visits_webhooks: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DomainConfig {
    pub schema: String,
    pub hostname: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NotFoundRedirectsConfig {
    pub invalid_short_url: Option<String>,
    pub regular_404: Option<String>,
    pub base_url: Option<String>,
}

/// Logging section; values are validated members of their enum fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoggingSection {
    pub level: String,
    pub stream: String,
    pub format: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RedisConfig {
    pub servers: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouterConfig {
    pub base_path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HttpServerConfig {
    pub worker_num: u32,
    pub task_worker_num: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IpAddressResolutionConfig {
    /// Checked in order, first header present wins
    pub headers_to_inspect: Vec<String>,
}
