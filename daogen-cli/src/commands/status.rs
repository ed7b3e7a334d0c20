use anyhow::Result;
use daogen_schema::{FileState, Generator};
use std::path::Path;

pub async fn run(config_path: &Path) -> Result<()> {
    let config = super::load_config(config_path, false)?;
    let entries = Generator::new(config)?.status().await?;

    for entry in &entries {
        let state = match entry.state {
            FileState::Missing => "missing",
            FileState::Pristine => "pristine",
            FileState::Diverged => "diverged",
        };
        println!(
            "{:<24} {:<12} {:<9} {}",
            entry.table,
            entry.layer.as_str(),
            state,
            entry.path.display()
        );
    }

    let diverged = entries
        .iter()
        .filter(|e| e.state == FileState::Diverged)
        .count();
    if diverged > 0 {
        log::info!("{} generated files carry hand edits", diverged);
    }
    Ok(())
}
