use std::collections::BTreeMap;

use crate::domain::errors::ConfigError;
use crate::domain::models::{
    AppConfig, AppOptions, DatabaseConfig, DatabaseConnection, DatabaseDriver,
    DeleteShortUrlsConfig, DomainConfig, DriverOptions, HttpServerConfig,
    IpAddressResolutionConfig, LoggingSection, NotFoundRedirectsConfig, RedisConfig,
    ResolvedConfig, RouterConfig, Secret, UrlShortenerConfig,
};
use crate::infrastructure::env::EnvironmentSource;
use crate::services::config_resolver;
use crate::services::schema_registry::Schema;
use crate::services::shortener_schema::{self as keys, build_schema};

/// Loads the service configuration from environment variables
pub struct ConfigLoader;

impl ConfigLoader {
    /// Resolve the current process environment
    pub fn load() -> Result<AppConfig, ConfigError> {
        Self::load_from(&EnvironmentSource::from_process())
    }

    /// Resolve an explicit environment snapshot
    pub fn load_from(env: &EnvironmentSource) -> Result<AppConfig, ConfigError> {
        let schema = build_schema()?;
        let resolved = Self::resolve(&schema, env)?;
        Self::project(&resolved)
    }

    /// Run one resolution pass without projecting
    pub fn resolve(schema: &Schema, env: &EnvironmentSource) -> Result<ResolvedConfig, ConfigError> {
        Ok(config_resolver::resolve(schema, env)?)
    }

    /// Project a resolved snapshot into the typed application config
    pub fn project(resolved: &ResolvedConfig) -> Result<AppConfig, ConfigError> {
        let reader = Reader(resolved);

        let aliases: BTreeMap<String, String> = reader
            .opt_str(keys::ALIAS_LOCK_STORE)?
            .map(|alias| ("lock_store".to_string(), alias))
            .into_iter()
            .collect();

        let cache = reader
            .opt_list(keys::CACHE_REDIS_SERVERS)?
            .map(|servers| RedisConfig { servers });

        Ok(AppConfig {
            app_options: AppOptions {
                disable_track_param: reader.opt_str(keys::DISABLE_TRACK_PARAM)?,
            },
            delete_short_urls: DeleteShortUrlsConfig {
                check_visits_threshold: true,
                visits_threshold: reader.unsigned(keys::DELETE_SHORT_URL_THRESHOLD)?,
            },
            database: Self::database(&reader)?,
            url_shortener: UrlShortenerConfig {
                domain: DomainConfig {
                    schema: reader.str(keys::SHORT_DOMAIN_SCHEMA)?,
                    hostname: reader.str(keys::SHORT_DOMAIN_HOST)?,
                },
                validate_url: reader.bool(keys::VALIDATE_URLS)?,
                visits_webhooks: reader.list(keys::VISITS_WEBHOOKS)?,
            },
            not_found_redirects: NotFoundRedirectsConfig {
                invalid_short_url: reader.opt_str(keys::INVALID_SHORT_URL_REDIRECT_TO)?,
                regular_404: reader.opt_str(keys::REGULAR_404_REDIRECT_TO)?,
                base_url: reader.opt_str(keys::BASE_URL_REDIRECT_TO)?,
            },
            logging: LoggingSection {
                level: reader.str(keys::LOG_LEVEL)?,
                stream: reader.str(keys::LOG_STREAM)?,
                format: reader.str(keys::LOG_FORMAT)?,
            },
            aliases,
            cache,
            router: RouterConfig {
                base_path: reader.str(keys::BASE_PATH)?,
            },
            http: HttpServerConfig {
                worker_num: reader.u32(keys::WEB_WORKER_NUM)?,
                task_worker_num: reader.u32(keys::TASK_WORKER_NUM)?,
            },
            ip_address_resolution: IpAddressResolutionConfig {
                headers_to_inspect: reader.list(keys::TRUSTED_PROXY_HEADERS)?,
            },
        })
    }

    fn database(reader: &Reader<'_>) -> Result<DatabaseConfig, ConfigError> {
        let identifier = reader.str(keys::DATABASE_DRIVER)?;
        let driver =
            DatabaseDriver::from_identifier(&identifier).ok_or_else(|| ConfigError::FieldType {
                field: keys::DATABASE_DRIVER.to_string(),
                expected: "database driver identifier".to_string(),
            })?;

        let connection = match driver {
            DatabaseDriver::Sqlite => DatabaseConnection::Sqlite {
                path: reader.str(keys::DATABASE_PATH)?,
            },
            DatabaseDriver::Mysql | DatabaseDriver::Postgres => DatabaseConnection::Server {
                dbname: reader.str(keys::DB_NAME)?,
                user: reader.opt_str(keys::DB_USER)?,
                password: reader.opt_str(keys::DB_PASSWORD)?.map(Secret::new),
                host: reader.opt_str(keys::DB_HOST)?,
                port: reader.port(keys::DATABASE_PORT)?,
                driver_options: DriverOptions {
                    init_command: reader.opt_str(keys::DATABASE_INIT_COMMAND)?,
                    use_buffered_query: reader
                        .opt_bool(keys::DATABASE_USE_BUFFERED_QUERY)?
                        .unwrap_or(false),
                },
            },
        };

        Ok(DatabaseConfig { driver, connection })
    }
}

/// Typed lookups that turn absence or a wrong variant into `ConfigError`
struct Reader<'a>(&'a ResolvedConfig);

impl Reader<'_> {
    fn mismatch(field: &str, expected: &str) -> ConfigError {
        ConfigError::FieldType {
            field: field.to_string(),
            expected: expected.to_string(),
        }
    }

    fn missing(field: &str) -> ConfigError {
        ConfigError::MissingField {
            field: field.to_string(),
        }
    }

    fn opt_str(&self, field: &str) -> Result<Option<String>, ConfigError> {
        self.0
            .get(field)
            .map(|value| {
                value
                    .as_str()
                    .map(str::to_string)
                    .ok_or_else(|| Self::mismatch(field, "string"))
            })
            .transpose()
    }

    fn str(&self, field: &str) -> Result<String, ConfigError> {
        self.opt_str(field)?.ok_or_else(|| Self::missing(field))
    }

    fn opt_bool(&self, field: &str) -> Result<Option<bool>, ConfigError> {
        self.0
            .get(field)
            .map(|value| value.as_bool().ok_or_else(|| Self::mismatch(field, "bool")))
            .transpose()
    }

    fn bool(&self, field: &str) -> Result<bool, ConfigError> {
        self.opt_bool(field)?.ok_or_else(|| Self::missing(field))
    }

    fn int(&self, field: &str) -> Result<i64, ConfigError> {
        let value = self.0.get(field).ok_or_else(|| Self::missing(field))?;
        value.as_int().ok_or_else(|| Self::mismatch(field, "int"))
    }

    fn unsigned(&self, field: &str) -> Result<u64, ConfigError> {
        u64::try_from(self.int(field)?).map_err(|_| Self::mismatch(field, "non-negative int"))
    }

    fn u32(&self, field: &str) -> Result<u32, ConfigError> {
        u32::try_from(self.int(field)?).map_err(|_| Self::mismatch(field, "32-bit unsigned int"))
    }

    fn port(&self, field: &str) -> Result<u16, ConfigError> {
        u16::try_from(self.int(field)?).map_err(|_| Self::mismatch(field, "port number"))
    }

    fn opt_list(&self, field: &str) -> Result<Option<Vec<String>>, ConfigError> {
        self.0
            .get(field)
            .map(|value| {
                value
                    .as_list()
                    .map(<[String]>::to_vec)
                    .ok_or_else(|| Self::mismatch(field, "string list"))
            })
            .transpose()
    }

    fn list(&self, field: &str) -> Result<Vec<String>, ConfigError> {
        self.opt_list(field)?.ok_or_else(|| Self::missing(field))
    }
}
