//! Checksum stamping and the per-layer write policy

use crate::descriptor::LayerTarget;
use crate::generator::LayerOutcome;
use crate::{Result, SchemaError};
use sha2::{Digest, Sha256};
use std::io::ErrorKind;
use std::path::Path;
use tokio::fs;

pub const CHECKSUM_MARKER: &str = "// daogen checksum: ";

/// State of a generated file on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileState {
    Missing,
    /// Body still matches the recorded checksum
    Pristine,
    /// Edited by hand, or never stamped
    Diverged,
}

/// Hex SHA-256 of a file body
pub fn checksum(body: &str) -> String {
    format!("{:x}", Sha256::digest(body.as_bytes()))
}

/// Header comments, then the checksum line, then `body`
pub fn stamp(header: &[String], body: &str) -> String {
    let mut out = String::with_capacity(body.len() + 256);
    for line in header {
        out.push_str(line);
        out.push('\n');
    }
    out.push_str(CHECKSUM_MARKER);
    out.push_str(&checksum(body));
    out.push('\n');
    out.push_str(body);
    out
}

/// Compare the recorded checksum against the body that follows it
pub fn inspect(content: &str) -> FileState {
    let mut offset = 0;
    for line in content.split_inclusive('\n') {
        offset += line.len();
        if let Some(recorded) = line.strip_prefix(CHECKSUM_MARKER) {
            return if recorded.trim_end() == checksum(&content[offset..]) {
                FileState::Pristine
            } else {
                FileState::Diverged
            };
        }
        if !line.starts_with("//") {
            break;
        }
    }
    FileState::Diverged
}

pub async fn file_state(path: &Path) -> Result<FileState> {
    match fs::read_to_string(path).await {
        Ok(content) => Ok(inspect(&content)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(FileState::Missing),
        Err(e) => Err(SchemaError::write(path, e)),
    }
}

/// Write one layer file according to its layer's policy and register it
pub async fn write_layer(target: &LayerTarget, content: &str) -> Result<LayerOutcome> {
    let path = target.file_path();
    fs::create_dir_all(&target.output_dir)
        .await
        .map_err(|e| SchemaError::write(&target.output_dir, e))?;

    let state = file_state(&path).await?;
    let outcome = match (target.layer.is_regenerated(), state) {
        (_, FileState::Missing) => {
            write(&path, content).await?;
            LayerOutcome::Written
        }
        (true, state) => {
            write(&path, content).await?;
            LayerOutcome::Overwritten {
                discarded_edits: state == FileState::Diverged,
            }
        }
        (false, state) => LayerOutcome::Preserved {
            diverged: state == FileState::Diverged,
        },
    };

    register_module(&target.output_dir, &target.stem).await?;
    Ok(outcome)
}

async fn write(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content)
        .await
        .map_err(|e| SchemaError::write(path, e))
}

/// Declare `stem` in the directory's `mod.rs`, once
pub async fn register_module(dir: &Path, stem: &str) -> Result<()> {
    let path = dir.join("mod.rs");
    let declaration = format!("pub mod {};", stem);

    let mut content = match fs::read_to_string(&path).await {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => String::new(),
        Err(e) => return Err(SchemaError::write(&path, e)),
    };
    if content.lines().any(|line| line.trim() == declaration) {
        return Ok(());
    }

    if !content.is_empty() && !content.ends_with('\n') {
        content.push('\n');
    }
    content.push_str(&declaration);
    content.push('\n');
    log::debug!("Registering {} in {}", stem, path.display());
    write(&path, &content).await
}
