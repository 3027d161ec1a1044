//! Configuration schema of the URL shortener service
//!
//! Environment-backed fields mirror the variables accepted by the service
//! container. Derived fields (lower-case dotted names) group them into the
//! sections consumed at bootstrap: database connection, cache backend and
//! its dependency alias.

use crate::domain::errors::SchemaError;
use crate::domain::models::{ConfigValue, DerivationRule, FieldSpec};
use crate::services::schema_registry::{Schema, SchemaRegistry};

pub const DB_DRIVER: &str = "DB_DRIVER";
pub const DB_NAME: &str = "DB_NAME";
pub const DB_USER: &str = "DB_USER";
pub const DB_PASSWORD: &str = "DB_PASSWORD";
pub const DB_HOST: &str = "DB_HOST";
pub const DB_PORT: &str = "DB_PORT";
pub const DISABLE_TRACK_PARAM: &str = "DISABLE_TRACK_PARAM";
pub const DELETE_SHORT_URL_THRESHOLD: &str = "DELETE_SHORT_URL_THRESHOLD";
pub const SHORT_DOMAIN_SCHEMA: &str = "SHORT_DOMAIN_SCHEMA";
pub const SHORT_DOMAIN_HOST: &str = "SHORT_DOMAIN_HOST";
pub const VALIDATE_URLS: &str = "VALIDATE_URLS";
pub const VISITS_WEBHOOKS: &str = "VISITS_WEBHOOKS";
pub const INVALID_SHORT_URL_REDIRECT_TO: &str = "INVALID_SHORT_URL_REDIRECT_TO";
pub const REGULAR_404_REDIRECT_TO: &str = "REGULAR_404_REDIRECT_TO";
pub const BASE_URL_REDIRECT_TO: &str = "BASE_URL_REDIRECT_TO";
pub const REDIS_SERVERS: &str = "REDIS_SERVERS";
pub const BASE_PATH: &str = "BASE_PATH";
pub const WEB_WORKER_NUM: &str = "WEB_WORKER_NUM";
pub const TASK_WORKER_NUM: &str = "TASK_WORKER_NUM";
pub const LOG_LEVEL: &str = "LOG_LEVEL";
pub const LOG_STREAM: &str = "LOG_STREAM";
pub const LOG_FORMAT: &str = "LOG_FORMAT";
pub const TRUSTED_PROXY_HEADERS: &str = "TRUSTED_PROXY_HEADERS";

pub const DATABASE_DRIVER: &str = "database.driver";
pub const DATABASE_PORT: &str = "database.port";
pub const DATABASE_PATH: &str = "database.path";
pub const DATABASE_INIT_COMMAND: &str = "database.init_command";
pub const DATABASE_USE_BUFFERED_QUERY: &str = "database.use_buffered_query";
pub const CACHE_REDIS_SERVERS: &str = "cache.redis.servers";
pub const ALIAS_LOCK_STORE: &str = "dependencies.aliases.lock_store";

/// Accepted `DB_DRIVER` values
pub const DB_DRIVER_NAMES: &[&str] = &["sqlite", "mysql", "maria", "postgres"];

/// `DB_DRIVER` value to driver identifier
pub const DB_DRIVERS_MAP: &[(&str, &str)] = &[
    ("sqlite", "pdo_sqlite"),
    ("mysql", "pdo_mysql"),
    ("maria", "pdo_mysql"),
    ("postgres", "pdo_pgsql"),
];

/// `DB_DRIVER` value to the port used when `DB_PORT` is unset
pub const DB_PORTS_MAP: &[(&str, i64)] = &[("mysql", 3306), ("maria", 3306), ("postgres", 5432)];

pub const SQLITE_PATH: &str = "data/database.sqlite";
pub const MYSQL_INIT_COMMAND: &str = "SET NAMES utf8";
pub const REDIS_LOCK_STORE: &str = "redis_lock_store";

/// Proxy headers inspected for the client address, first match wins
pub const DEFAULT_TRUSTED_PROXY_HEADERS: &[&str] = &[
    "Forwarded",
    "X-Forwarded-For",
    "X-Forwarded",
    "X-Cluster-Client-Ip",
    "Client-Ip",
];

pub fn driver_identifier(driver: &str) -> Option<&'static str> {
    DB_DRIVERS_MAP
        .iter()
        .find(|(name, _)| *name == driver)
        .map(|(_, id)| *id)
}

pub fn default_port(driver: &str) -> Option<i64> {
    DB_PORTS_MAP
        .iter()
        .find(|(name, _)| *name == driver)
        .map(|(_, port)| *port)
}

fn is_mysql_family(driver: &str) -> bool {
    driver_identifier(driver) == Some("pdo_mysql")
}

/// Build the service schema
pub fn build_schema() -> Result<Schema, SchemaError> {
    let mut registry = SchemaRegistry::new();
    register_database(&mut registry);
    register_url_shortener(&mut registry);
    register_cache(&mut registry);
    register_runtime(&mut registry);
    registry.build()
}

fn register_database(registry: &mut SchemaRegistry) {
    registry
        .field(
            FieldSpec::one_of(DB_DRIVER, DB_DRIVER_NAMES)
                .with_default("sqlite")
                .describe("Database engine"),
        )
        .field(FieldSpec::string(DB_NAME).with_default("shlink").describe("Database name"))
        .field(FieldSpec::string(DB_USER).describe("Database user"))
        .field(FieldSpec::string(DB_PASSWORD).secret().describe("Database password"))
        .field(FieldSpec::string(DB_HOST).describe("Database host"))
        .field(
            FieldSpec::int(DB_PORT)
                .with_range(1..=65535)
                .describe("Database port, defaults per driver"),
        )
        .derived(
            FieldSpec::string(DATABASE_DRIVER).describe("Resolved driver identifier"),
            DerivationRule::new(DATABASE_DRIVER, &[DB_DRIVER], |inputs| {
                inputs
                    .str(DB_DRIVER)
                    .and_then(driver_identifier)
                    .map(ConfigValue::from)
            }),
        )
        .derived(
            FieldSpec::int(DATABASE_PORT).describe("Resolved database port"),
            DerivationRule::new(DATABASE_PORT, &[DB_DRIVER, DB_PORT], |inputs| {
                // sqlite has no port, even when DB_PORT is set
                let fallback = inputs.str(DB_DRIVER).and_then(default_port)?;
                Some(ConfigValue::Int(inputs.int(DB_PORT).unwrap_or(fallback)))
            }),
        )
        .derived(
            FieldSpec::string(DATABASE_PATH).describe("SQLite database file"),
            DerivationRule::new(DATABASE_PATH, &[DB_DRIVER], |inputs| {
                (inputs.str(DB_DRIVER) == Some("sqlite")).then(|| ConfigValue::from(SQLITE_PATH))
            }),
        )
        .derived(
            FieldSpec::string(DATABASE_INIT_COMMAND).describe("Statement run on connect"),
            DerivationRule::new(DATABASE_INIT_COMMAND, &[DB_DRIVER], |inputs| {
                inputs
                    .str(DB_DRIVER)
                    .filter(|driver| is_mysql_family(driver))
                    .map(|_| ConfigValue::from(MYSQL_INIT_COMMAND))
            }),
        )
        .derived(
            FieldSpec::bool(DATABASE_USE_BUFFERED_QUERY).describe("Buffer query results"),
            DerivationRule::new(DATABASE_USE_BUFFERED_QUERY, &[DB_DRIVER], |inputs| {
                inputs
                    .str(DB_DRIVER)
                    .filter(|driver| is_mysql_family(driver))
                    .map(|_| ConfigValue::Bool(true))
            }),
        );
}

fn register_url_shortener(registry: &mut SchemaRegistry) {
    registry
        .field(FieldSpec::string(DISABLE_TRACK_PARAM).describe("Query param that disables tracking"))
        .field(
            FieldSpec::int(DELETE_SHORT_URL_THRESHOLD)
                .with_default(15_i64)
                .with_range(0..=i64::MAX)
                .describe("Visits after which a short URL can no longer be deleted"),
        )
        .field(
            FieldSpec::one_of(SHORT_DOMAIN_SCHEMA, &["http", "https"])
                .with_default("http")
                .describe("Scheme of generated short URLs"),
        )
        .field(
            FieldSpec::string(SHORT_DOMAIN_HOST)
                .with_default("")
                .describe("Host of generated short URLs"),
        )
        .field(
            FieldSpec::bool(VALIDATE_URLS)
                .with_default(false)
                .describe("Check that long URLs resolve"),
        )
        .field(FieldSpec::string_list(VISITS_WEBHOOKS).describe("Webhooks notified on visits"))
        .field(FieldSpec::string(INVALID_SHORT_URL_REDIRECT_TO))
        .field(FieldSpec::string(REGULAR_404_REDIRECT_TO))
        .field(FieldSpec::string(BASE_URL_REDIRECT_TO));
}

fn register_cache(registry: &mut SchemaRegistry) {
    registry
        .field(FieldSpec::string_list(REDIS_SERVERS).describe("Redis servers, enables the cache"))
        .derived(
            FieldSpec::string_list(CACHE_REDIS_SERVERS).describe("Redis cache backend"),
            DerivationRule::new(CACHE_REDIS_SERVERS, &[REDIS_SERVERS], |inputs| {
                inputs
                    .list(REDIS_SERVERS)
                    .filter(|servers| !servers.is_empty())
                    .map(|servers| ConfigValue::StringList(servers.to_vec()))
            }),
        )
        .derived(
            FieldSpec::string(ALIAS_LOCK_STORE).describe("Lock store service alias"),
            DerivationRule::new(ALIAS_LOCK_STORE, &[CACHE_REDIS_SERVERS], |inputs| {
                inputs
                    .get(CACHE_REDIS_SERVERS)
                    .map(|_| ConfigValue::from(REDIS_LOCK_STORE))
            }),
        );
}

fn register_runtime(registry: &mut SchemaRegistry) {
    let trusted_headers: Vec<String> = DEFAULT_TRUSTED_PROXY_HEADERS
        .iter()
        .map(|h| (*h).to_string())
        .collect();

    registry
        .field(FieldSpec::string(BASE_PATH).with_default("").describe("Router base path"))
        .field(
            FieldSpec::int(WEB_WORKER_NUM)
                .with_default(16_i64)
                .with_range(1..=1024)
                .describe("HTTP worker processes"),
        )
        .field(
            FieldSpec::int(TASK_WORKER_NUM)
                .with_default(16_i64)
                .with_range(1..=1024)
                .describe("Background task workers"),
        )
        .field(
            FieldSpec::one_of(LOG_LEVEL, &["trace", "debug", "info", "warn", "error"])
                .with_default("info")
                .describe("Minimum log level"),
        )
        .field(
            FieldSpec::one_of(LOG_STREAM, &["stdout", "stderr"])
                .with_default("stdout")
                .describe("Log output stream"),
        )
        .field(
            FieldSpec::one_of(LOG_FORMAT, &["pretty", "json"])
                .with_default("pretty")
                .describe("Log line format"),
        )
        .field(
            FieldSpec::string_list(TRUSTED_PROXY_HEADERS)
                .with_default(trusted_headers)
                .describe("Headers inspected for the client IP, in priority order"),
        );
}
