//! End-to-end resolution of the shortener schema against explicit environments

use shortener_config::domain::models::{DatabaseConnection, DatabaseDriver};
use shortener_config::services::shortener_schema::{self as keys, build_schema};
use shortener_config::{
    ConfigError, ConfigLoader, ConfigResolver, ConfigValue, EnvironmentSource, FieldError,
    ResolutionState, ResolveError, ValueSource,
};

fn aggregate(err: ConfigError) -> Vec<FieldError> {
    match err {
        ConfigError::Resolve(ResolveError::Fields(aggregate)) => aggregate.errors,
        other => panic!("expected field errors, got {other:?}"),
    }
}

#[test]
fn test_empty_environment_uses_defaults() {
    let config = ConfigLoader::load_from(&EnvironmentSource::new()).unwrap();

    assert_eq!(config.database.driver, DatabaseDriver::Sqlite);
    assert_eq!(
        config.database.connection,
        DatabaseConnection::Sqlite {
            path: keys::SQLITE_PATH.to_string()
        }
    );
    assert!(config.cache.is_none());
    assert!(config.aliases.is_empty());
    assert_eq!(config.delete_short_urls.visits_threshold, 15);
    assert!(config.delete_short_urls.check_visits_threshold);
    assert_eq!(config.url_shortener.domain.schema, "http");
    assert_eq!(config.url_shortener.domain.hostname, "");
    assert!(!config.url_shortener.validate_url);
    assert!(config.url_shortener.visits_webhooks.is_empty());
    assert_eq!(config.router.base_path, "");
    assert_eq!(config.http.worker_num, 16);
    assert_eq!(config.http.task_worker_num, 16);
    assert_eq!(
        config.ip_address_resolution.headers_to_inspect,
        keys::DEFAULT_TRUSTED_PROXY_HEADERS
    );
}

#[test]
fn test_postgres_without_port_gets_driver_default() {
    let env = EnvironmentSource::from_pairs([
        ("DB_DRIVER", "postgres"),
        ("DB_HOST", "db.internal"),
        ("DB_USER", "shlink"),
        ("DB_PASSWORD", "s3cret"),
    ]);
    let config = ConfigLoader::load_from(&env).unwrap();

    assert_eq!(config.database.driver, DatabaseDriver::Postgres);
    assert_eq!(config.database.driver.as_str(), "pdo_pgsql");
    let DatabaseConnection::Server {
        dbname,
        host,
        port,
        password,
        driver_options,
        ..
    } = &config.database.connection
    else {
        panic!("postgres must use a server connection");
    };
    assert_eq!(dbname, "shlink");
    assert_eq!(host.as_deref(), Some("db.internal"));
    assert_eq!(*port, 5432);
    assert_eq!(password.as_ref().map(|p| p.expose()), Some("s3cret"));
    assert_eq!(driver_options.init_command, None);
    assert!(!driver_options.use_buffered_query);
}

#[test]
fn test_driver_field_carries_connection_identifier() {
    let schema = build_schema().unwrap();
    for (name, identifier) in [
        ("sqlite", "pdo_sqlite"),
        ("mysql", "pdo_mysql"),
        ("maria", "pdo_mysql"),
        ("postgres", "pdo_pgsql"),
    ] {
        let env = EnvironmentSource::new().with_var("DB_DRIVER", name);
        let resolved = ConfigLoader::resolve(&schema, &env).unwrap();
        assert_eq!(resolved.get_str(keys::DATABASE_DRIVER), Some(identifier), "{name}");
    }
}

#[test]
fn test_explicit_port_wins_over_driver_default() {
    let env = EnvironmentSource::from_pairs([("DB_DRIVER", "mysql"), ("DB_PORT", " 3310 ")]);
    let config = ConfigLoader::load_from(&env).unwrap();

    let DatabaseConnection::Server { port, .. } = config.database.connection else {
        panic!("mysql must use a server connection");
    };
    assert_eq!(port, 3310);
}

#[test]
fn test_unknown_driver_lists_every_allowed_value() {
    let env = EnvironmentSource::new().with_var("DB_DRIVER", "oracle");
    let errors = aggregate(ConfigLoader::load_from(&env).unwrap_err());

    assert_eq!(
        errors,
        vec![FieldError::InvalidEnumValue {
            name: "DB_DRIVER".to_string(),
            raw: "oracle".to_string(),
            allowed: vec![
                "sqlite".to_string(),
                "mysql".to_string(),
                "maria".to_string(),
                "postgres".to_string(),
            ],
        }]
    );
}

#[test]
fn test_every_invalid_field_is_reported_at_once() {
    let env = EnvironmentSource::from_pairs([
        ("DELETE_SHORT_URL_THRESHOLD", "abc"),
        ("WEB_WORKER_NUM", "many"),
        ("VALIDATE_URLS", "maybe"),
    ]);
    let err = ConfigLoader::load_from(&env).unwrap_err();
    let report = err.to_string();
    let errors = aggregate(err);

    assert_eq!(errors.len(), 3);
    let fields: Vec<_> = errors.iter().map(FieldError::field).collect();
    assert!(fields.contains(&"DELETE_SHORT_URL_THRESHOLD"));
    assert!(fields.contains(&"WEB_WORKER_NUM"));
    assert!(fields.contains(&"VALIDATE_URLS"));
    assert!(report.starts_with("3 invalid configuration field(s):"));
}

#[test]
fn test_out_of_range_port() {
    let env = EnvironmentSource::from_pairs([("DB_DRIVER", "postgres"), ("DB_PORT", "70000")]);
    let errors = aggregate(ConfigLoader::load_from(&env).unwrap_err());

    assert_eq!(
        errors,
        vec![FieldError::IntOutOfRange {
            name: "DB_PORT".to_string(),
            value: "70000".to_string(),
            min: 1,
            max: 65535,
        }]
    );
}

#[test]
fn test_redis_group_is_all_or_nothing() {
    let schema = build_schema().unwrap();

    let without = ConfigLoader::resolve(&schema, &EnvironmentSource::new()).unwrap();
    assert!(!without.contains(keys::CACHE_REDIS_SERVERS));
    assert!(!without.contains(keys::ALIAS_LOCK_STORE));

    let blank = EnvironmentSource::new().with_var("REDIS_SERVERS", " , ");
    let blank = ConfigLoader::resolve(&schema, &blank).unwrap();
    assert!(!blank.contains(keys::CACHE_REDIS_SERVERS));
    assert!(!blank.contains(keys::ALIAS_LOCK_STORE));

    let with = EnvironmentSource::new().with_var("REDIS_SERVERS", "tcp://r1:6379, tcp://r2:6379");
    let with = ConfigLoader::resolve(&schema, &with).unwrap();
    assert_eq!(
        with.get_list(keys::CACHE_REDIS_SERVERS),
        Some(&["tcp://r1:6379".to_string(), "tcp://r2:6379".to_string()][..])
    );
    assert_eq!(
        with.get_str(keys::ALIAS_LOCK_STORE),
        Some(keys::REDIS_LOCK_STORE)
    );
}

#[test]
fn test_value_sources() {
    let schema = build_schema().unwrap();
    let env = EnvironmentSource::new().with_var("BASE_PATH", "/s");
    let resolved = ConfigLoader::resolve(&schema, &env).unwrap();

    let source = |name: &str| resolved.entry(name).map(|entry| entry.source);
    assert_eq!(source(keys::BASE_PATH), Some(ValueSource::Environment));
    assert_eq!(source(keys::DB_DRIVER), Some(ValueSource::Default));
    assert_eq!(source(keys::DATABASE_DRIVER), Some(ValueSource::Derived));
    assert_eq!(source(keys::DB_HOST), None);
    assert_eq!(
        resolved.get(keys::DATABASE_DRIVER),
        Some(&ConfigValue::from("pdo_sqlite"))
    );
}

#[test]
fn test_resolver_runs_once() {
    let schema = build_schema().unwrap();
    let mut resolver = ConfigResolver::new(&schema);
    assert_eq!(resolver.state(), ResolutionState::Uninitialized);

    resolver.resolve(&EnvironmentSource::new()).unwrap();
    assert_eq!(resolver.state(), ResolutionState::Resolved);

    assert_eq!(
        resolver.resolve(&EnvironmentSource::new()),
        Err(ResolveError::AlreadyResolved)
    );
    assert_eq!(resolver.state(), ResolutionState::Resolved);
}

#[test]
fn test_failed_resolution_state() {
    let schema = build_schema().unwrap();
    let mut resolver = ConfigResolver::new(&schema);

    let env = EnvironmentSource::new().with_var("SHORT_DOMAIN_SCHEMA", "ftp");
    assert!(matches!(
        resolver.resolve(&env),
        Err(ResolveError::Fields(_))
    ));
    assert_eq!(resolver.state(), ResolutionState::Failed);
}

#[test]
fn test_secret_never_serialized() {
    let env = EnvironmentSource::from_pairs([("DB_DRIVER", "maria"), ("DB_PASSWORD", "hunter2")]);
    let config = ConfigLoader::load_from(&env).unwrap();

    let json = serde_json::to_string(&config).unwrap();
    assert!(!json.contains("hunter2"));
    assert!(!format!("{config:?}").contains("hunter2"));
}

#[test]
fn test_load_reads_process_environment() {
    temp_env::with_vars(
        [
            ("DB_DRIVER", Some("maria")),
            ("REDIS_SERVERS", Some("tcp://cache:6379")),
            ("DB_PORT", None),
        ],
        || {
            let config = ConfigLoader::load().unwrap();
            assert_eq!(config.database.driver, DatabaseDriver::Mysql);
            assert!(config.cache.is_some());
            assert_eq!(
                config.aliases.get("lock_store").map(String::as_str),
                Some(keys::REDIS_LOCK_STORE)
            );
        },
    );
}
