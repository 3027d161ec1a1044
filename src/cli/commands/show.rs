//! Implementation of the `shortener-config show` command.

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use crate::cli::display::{list_table, render_list};
use crate::cli::output::{output, CommandOutput};
use crate::domain::errors::REDACTED;
use crate::domain::models::ResolvedConfig;
use crate::infrastructure::config::ConfigLoader;
use crate::infrastructure::env::EnvironmentSource;
use crate::services::schema_registry::Schema;
use crate::services::shortener_schema::build_schema;

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Only show fields whose name contains this text (case-insensitive)
    #[arg(short, long)]
    pub filter: Option<String>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct FieldRow {
    pub name: String,
    pub value: Option<String>,
    pub source: String,
    pub description: String,
}

#[derive(Debug, Serialize)]
pub struct ShowOutput {
    pub fields: Vec<FieldRow>,
}

impl CommandOutput for ShowOutput {
    fn to_human(&self) -> String {
        let mut table = list_table(&["field", "value", "source", "description"]);
        for row in &self.fields {
            table.add_row(vec![
                row.name.clone(),
                row.value.clone().unwrap_or_else(|| "-".to_string()),
                row.source.clone(),
                row.description.clone(),
            ]);
        }
        render_list("field", &table, self.fields.len())
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

/// One row per declared field, in schema order, secrets redacted
pub fn field_rows(schema: &Schema, resolved: &ResolvedConfig, filter: Option<&str>) -> Vec<FieldRow> {
    let filter = filter.map(str::to_lowercase);
    schema
        .fields()
        .iter()
        .filter(|spec| {
            filter
                .as_deref()
                .is_none_or(|needle| spec.name.to_lowercase().contains(needle))
        })
        .map(|spec| {
            let entry = resolved.entry(&spec.name);
            let value = entry.map(|entry| {
                if spec.secret {
                    REDACTED.to_string()
                } else {
                    entry.value.to_string()
                }
            });
            let source = entry.map_or_else(|| "unset".to_string(), |entry| entry.source.to_string());
            FieldRow {
                name: spec.name.clone(),
                value,
                source,
                description: spec.description.clone(),
            }
        })
        .collect()
}

pub fn execute(args: &ShowArgs, json_mode: bool) -> Result<()> {
    let env = EnvironmentSource::from_process();
    let schema = build_schema().context("Configuration schema is invalid")?;
    let resolved = ConfigLoader::resolve(&schema, &env).context("Configuration rejected")?;

    let output_data = ShowOutput {
        fields: field_rows(&schema, &resolved, args.filter.as_deref()),
    };
    output(&output_data, json_mode);
    Ok(())
}
