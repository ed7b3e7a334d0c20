use anyhow::Result;
use clap::ValueEnum;
use daogen_schema::{Introspector, MySqlSchemaSource};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

pub async fn run(
    config_path: &Path,
    table: &str,
    dsn: Option<String>,
    format: OutputFormat,
) -> Result<()> {
    let config = super::load_config(config_path, true)?.with_overrides(dsn, None);
    if config.dsn.trim().is_empty() {
        anyhow::bail!("No connection string; pass --dsn or set DAOGEN_DSN");
    }

    let source = MySqlSchemaSource::connect_lazy(&config.dsn)?;
    let schema = Introspector::new(&source).introspect(table).await?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&schema)?),
        OutputFormat::Table => {
            println!("📊 Table: {}\n", schema.table);
            println!(
                "{:<24} {:<20} {:<30} {:<9} {:<5} {}",
                "Column", "Catalog type", "Rust type", "Nullable", "Key", "Default"
            );
            println!("{:-<100}", "");
            for field in &schema.fields {
                println!(
                    "{:<24} {:<20} {:<30} {:<9} {:<5} {}",
                    field.column_name,
                    field.column_type,
                    field.base_type(),
                    if field.nullable { "yes" } else { "no" },
                    if field.primary_key { "PRI" } else { "" },
                    field.default.as_deref().unwrap_or("-"),
                );
            }
        }
    }
    Ok(())
}
