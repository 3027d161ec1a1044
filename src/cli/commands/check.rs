//! Implementation of the `shortener-config check` command.

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use crate::cli::output::{output, CommandOutput};
use crate::infrastructure::config::ConfigLoader;
use crate::infrastructure::env::EnvironmentSource;
use crate::infrastructure::logging::{LogConfig, LoggerImpl};
use crate::services::shortener_schema::build_schema;

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Install the logger described by the resolved configuration, as the service would
    #[arg(long)]
    pub init_logging: bool,
}

#[derive(Debug, Serialize)]
pub struct CheckOutput {
    pub success: bool,
    pub message: String,
    pub fields_resolved: usize,
    pub database_driver: String,
    pub cache_enabled: bool,
    pub worker_num: u32,
    pub task_worker_num: u32,
}

impl CommandOutput for CheckOutput {
    fn to_human(&self) -> String {
        let cache = if self.cache_enabled { "redis" } else { "disabled" };
        [
            self.message.clone(),
            format!("  fields resolved: {}", self.fields_resolved),
            format!("  database driver: {}", self.database_driver),
            format!("  cache:           {cache}"),
            format!(
                "  workers:         {} web / {} task",
                self.worker_num, self.task_worker_num
            ),
        ]
        .join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub fn execute(args: &CheckArgs, json_mode: bool) -> Result<()> {
    let env = EnvironmentSource::from_process();
    let schema = build_schema().context("Configuration schema is invalid")?;

    // installed before resolution so per-field events and rejections are logged
    if args.init_logging {
        LoggerImpl::init(&LogConfig::bootstrap(&schema, &env))?;
    }

    let resolved = ConfigLoader::resolve(&schema, &env).context("Configuration rejected")?;
    let config = ConfigLoader::project(&resolved).context("Configuration rejected")?;

    if args.init_logging {
        tracing::info!(
            driver = %config.database.driver,
            cache = config.cache.is_some(),
            workers = config.http.worker_num,
            "configuration loaded"
        );
    }

    let output_data = CheckOutput {
        success: true,
        message: "Configuration is valid.".to_string(),
        fields_resolved: resolved.len(),
        database_driver: config.database.driver.to_string(),
        cache_enabled: config.cache.is_some(),
        worker_num: config.http.worker_num,
        task_worker_num: config.http.task_worker_num,
    };
    output(&output_data, json_mode);
    Ok(())
}
