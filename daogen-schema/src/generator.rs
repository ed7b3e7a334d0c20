//! Batch generation over the configured module requests

use crate::codegen::{self, FileState, Templates};
use crate::codegen::writer;
use crate::config::GeneratorConfig;
use crate::descriptor::{Layer, ModuleDescriptor, ModuleRequest, PackageLayout};
use crate::introspect::{Introspector, SchemaSource};
use crate::{Result, SchemaError};
use std::fmt;
use std::path::PathBuf;

/// What happened to one layer file
#[derive(Debug)]
pub enum LayerOutcome {
    Written,
    Overwritten { discarded_edits: bool },
    Preserved { diverged: bool },
    Failed(SchemaError),
}

impl LayerOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, LayerOutcome::Failed(_))
    }
}

impl fmt::Display for LayerOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayerOutcome::Written => write!(f, "written"),
            LayerOutcome::Overwritten { discarded_edits: false } => write!(f, "regenerated"),
            LayerOutcome::Overwritten { discarded_edits: true } => {
                write!(f, "regenerated, hand edits discarded")
            }
            LayerOutcome::Preserved { diverged: false } => write!(f, "preserved"),
            LayerOutcome::Preserved { diverged: true } => write!(f, "preserved, diverged"),
            LayerOutcome::Failed(e) => write!(f, "failed: {}", e),
        }
    }
}

#[derive(Debug)]
pub struct LayerReport {
    pub layer: Layer,
    pub path: PathBuf,
    pub outcome: LayerOutcome,
    /// Referenced layers that failed in the same run
    pub unresolved: Vec<Layer>,
}

#[derive(Debug)]
pub enum TableOutcome {
    Generated(Vec<LayerReport>),
    /// The table was skipped before any layer was rendered
    Failed(SchemaError),
}

#[derive(Debug)]
pub struct TableReport {
    pub table: String,
    pub outcome: TableOutcome,
}

impl TableReport {
    pub fn is_failure(&self) -> bool {
        match &self.outcome {
            TableOutcome::Failed(_) => true,
            TableOutcome::Generated(layers) => layers.iter().any(|l| l.outcome.is_failure()),
        }
    }
}

/// One report per module request, in configured order
#[derive(Debug, Default)]
pub struct GenerationReport {
    pub tables: Vec<TableReport>,
}

impl GenerationReport {
    pub fn has_failures(&self) -> bool {
        self.tables.iter().any(TableReport::is_failure)
    }
}

/// On-disk state of one configured layer file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusEntry {
    pub table: String,
    pub layer: Layer,
    pub path: PathBuf,
    pub state: FileState,
}

pub struct Generator {
    config: GeneratorConfig,
    templates: Templates,
}

impl Generator {
    pub fn new(config: GeneratorConfig) -> Result<Self> {
        Ok(Self {
            config,
            templates: Templates::new()?,
        })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generate every configured table in order
    ///
    /// A table that cannot be introspected or described is reported and
    /// skipped; a layer that fails is reported while its sibling layers are
    /// still attempted. Only configuration errors abort the run.
    pub async fn generate(&self, source: &dyn SchemaSource) -> Result<GenerationReport> {
        self.config.validate()?;
        let introspector = Introspector::new(source);
        let mut report = GenerationReport::default();

        for request in &self.config.modules {
            log::info!("Generating table {}", request.table);
            let outcome = match self.describe(&introspector, request).await {
                Ok(descriptor) => TableOutcome::Generated(self.generate_layers(&descriptor).await),
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    log::error!("Skipping table {}: {}", request.table, e);
                    TableOutcome::Failed(e)
                }
            };
            report.tables.push(TableReport {
                table: request.table.clone(),
                outcome,
            });
        }
        Ok(report)
    }

    async fn describe(
        &self,
        introspector: &Introspector<'_>,
        request: &ModuleRequest,
    ) -> Result<ModuleDescriptor> {
        let layout = PackageLayout::resolve(request, &self.config.project)?;
        let schema = introspector.introspect(&request.table).await?;
        ModuleDescriptor::from_layout(request, layout, schema)
    }

    async fn generate_layers(&self, descriptor: &ModuleDescriptor) -> Vec<LayerReport> {
        let mut reports: Vec<LayerReport> = Vec::with_capacity(descriptor.layers.len());
        for layer in Layer::ALL.into_iter().filter(|l| descriptor.emits(*l)) {
            let target = descriptor.target(layer);
            let path = target.file_path();
            let unresolved: Vec<Layer> = reports
                .iter()
                .filter(|r| r.outcome.is_failure() && layer.references().contains(&r.layer))
                .map(|r| r.layer)
                .collect();

            let outcome = match codegen::render_layer(&self.templates, descriptor, layer) {
                Ok(content) => match writer::write_layer(target, &content).await {
                    Ok(outcome) => outcome,
                    Err(e) => LayerOutcome::Failed(e),
                },
                Err(e) => LayerOutcome::Failed(e),
            };

            match &outcome {
                LayerOutcome::Failed(e) => {
                    log::error!("{} {} failed: {}", descriptor.table_name, layer, e)
                }
                LayerOutcome::Overwritten {
                    discarded_edits: true,
                } => log::warn!("Discarded hand edits in {}", path.display()),
                LayerOutcome::Preserved { diverged: true } => {
                    log::warn!("Kept {}, which differs from its generated form", path.display())
                }
                other => log::info!("{} {}: {}", descriptor.table_name, layer, other),
            }
            for missing in &unresolved {
                log::warn!(
                    "{} refers to the {} {} layer, which failed",
                    path.display(),
                    descriptor.table_name,
                    missing
                );
            }

            reports.push(LayerReport {
                layer,
                path,
                outcome,
                unresolved,
            });
        }
        reports
    }

    /// File state of every configured layer, without touching the database
    pub async fn status(&self) -> Result<Vec<StatusEntry>> {
        if self.config.project.trim().is_empty() {
            return Err(SchemaError::configuration("Project root is required"));
        }

        let mut entries = Vec::new();
        for request in &self.config.modules {
            let layout = PackageLayout::resolve(request, &self.config.project)?;
            for target in layout.targets().iter().filter(|t| request.layers.contains(&t.layer)) {
                let path = target.file_path();
                entries.push(StatusEntry {
                    table: request.table.clone(),
                    layer: target.layer,
                    state: writer::file_state(&path).await?,
                    path,
                });
            }
        }
        Ok(entries)
    }
}
