pub mod app_config;
pub mod field;
pub mod rule;
pub mod snapshot;
pub mod value;

pub use app_config::{
    AppConfig, AppOptions, DatabaseConfig, DatabaseConnection, DatabaseDriver, DeleteShortUrlsConfig,
    DomainConfig, DriverOptions, HttpServerConfig, IpAddressResolutionConfig, LoggingSection,
    NotFoundRedirectsConfig, RedisConfig, RouterConfig, Secret, UrlShortenerConfig,
};
pub use field::FieldSpec;
pub use rule::{DerivationInputs, DerivationRule};
pub use snapshot::{ResolvedConfig, ResolvedEntry, ValueSource};
pub use value::{ConfigValue, FieldKind};
