use anyhow::Result;
use daogen_schema::{Generator, MySqlSchemaSource, TableOutcome};
use std::path::Path;

pub async fn run(
    config_path: &Path,
    dsn: Option<String>,
    project: Option<String>,
    tables: Vec<String>,
) -> Result<()> {
    let mut config = super::load_config(config_path, false)?.with_overrides(dsn, project);
    config.retain_tables(&tables)?;
    config.validate()?;

    println!("🔌 Connecting to: {}", super::mask_dsn(&config.dsn));
    let source = MySqlSchemaSource::connect_lazy(&config.dsn)?;
    let report = Generator::new(config)?.generate(&source).await?;

    for table in &report.tables {
        match &table.outcome {
            TableOutcome::Failed(e) => println!("❌ {}: {}", table.table, e),
            TableOutcome::Generated(layers) => {
                let marker = if table.is_failure() { "⚠️" } else { "✅" };
                println!("{} {}", marker, table.table);
                for layer in layers {
                    println!(
                        "   {:<12} {:<36} {}",
                        layer.layer.as_str(),
                        layer.outcome,
                        layer.path.display()
                    );
                    for missing in &layer.unresolved {
                        println!("   {:<12} refers to failed layer {}", "", missing);
                    }
                }
            }
        }
    }

    let failed = report.tables.iter().filter(|t| t.is_failure()).count();
    if failed > 0 {
        anyhow::bail!("{} of {} tables failed", failed, report.tables.len());
    }
    Ok(())
}
