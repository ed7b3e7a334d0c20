//! Module descriptors: per-table naming, packages and output paths

use crate::caser;
use crate::field::Field;
use crate::introspect::TableSchema;
use crate::{Result, SchemaError};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// One generated artifact kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Layer {
    Model,
    Extend,
    View,
    Param,
    Dao,
    Service,
    Controller,
}

impl Layer {
    pub const ALL: [Layer; 7] = [
        Layer::Model,
        Layer::Extend,
        Layer::View,
        Layer::Param,
        Layer::Dao,
        Layer::Service,
        Layer::Controller,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Layer::Model => "model",
            Layer::Extend => "extend",
            Layer::View => "view",
            Layer::Param => "param",
            Layer::Dao => "dao",
            Layer::Service => "service",
            Layer::Controller => "controller",
        }
    }

    /// Regenerated layers are rewritten on every run; the rest are written once
    pub fn is_regenerated(&self) -> bool {
        matches!(self, Layer::Model)
    }

    /// Layers whose types this layer's generated code names
    pub fn references(&self) -> &'static [Layer] {
        match self {
            Layer::Model | Layer::Param | Layer::Controller => &[],
            Layer::Extend => &[Layer::Model],
            Layer::View | Layer::Dao => &[Layer::Model, Layer::Extend],
            Layer::Service => &[Layer::Model, Layer::Param, Layer::Dao],
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Layer {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self> {
        Layer::ALL
            .into_iter()
            .find(|layer| layer.as_str() == s)
            .ok_or_else(|| SchemaError::configuration(format!("Unknown layer '{}'", s)))
    }
}

impl TryFrom<String> for Layer {
    type Error = SchemaError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

fn default_layers() -> BTreeSet<Layer> {
    Layer::ALL.into_iter().collect()
}

/// One table to generate, as configured
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleRequest {
    pub table: String,

    /// Directory the layer packages are created under
    pub module_path: String,

    #[serde(default = "default_layers")]
    pub layers: BTreeSet<Layer>,

    /// Package name overrides per layer
    #[serde(default)]
    pub packages: BTreeMap<Layer, String>,
}

impl ModuleRequest {
    pub fn new(table: impl Into<String>, module_path: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            module_path: module_path.into(),
            layers: default_layers(),
            packages: BTreeMap::new(),
        }
    }

    pub fn with_layers(mut self, layers: impl IntoIterator<Item = Layer>) -> Self {
        self.layers = layers.into_iter().collect();
        self
    }

    pub fn with_package(mut self, layer: Layer, package: impl Into<String>) -> Self {
        self.packages.insert(layer, package.into());
        self
    }

    fn package_name(&self, layer: Layer) -> &str {
        self.packages
            .get(&layer)
            .map(String::as_str)
            .unwrap_or(layer.as_str())
    }
}

/// Where one layer of a table is written and how it is addressed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayerTarget {
    pub layer: Layer,
    pub package_name: String,
    /// `crate::...::<package>`
    pub package_path: String,
    pub output_dir: PathBuf,
    pub file_name: String,
    /// Module name of the file
    pub stem: String,
    /// `<package_path>::<stem>`
    pub module_path: String,
}

impl LayerTarget {
    pub fn file_path(&self) -> PathBuf {
        self.output_dir.join(&self.file_name)
    }
}

/// Targets of every layer of one table, derived from names alone
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageLayout {
    targets: Vec<LayerTarget>,
}

impl PackageLayout {
    pub fn resolve(request: &ModuleRequest, project_root: &str) -> Result<Self> {
        if project_root.trim().is_empty() {
            return Err(SchemaError::configuration("Project root is required"));
        }
        let base = crate_path(&request.module_path, project_root)?;
        let table_stem = caser::sanitize(&request.table);
        let module_dir = Path::new(&request.module_path);

        let mut targets = Vec::with_capacity(Layer::ALL.len());
        for layer in Layer::ALL {
            let own_package = request.package_name(layer);
            if !caser::is_valid_ident(own_package) {
                return Err(SchemaError::InvalidIdentifier(format!(
                    "package name '{}' for layer {}",
                    own_package, layer
                )));
            }
            // Extend shares the model package
            let package_name = match layer {
                Layer::Extend => request.package_name(Layer::Model),
                _ => own_package,
            };

            let stem = format!("{}_{}", table_stem, own_package);
            if !caser::is_valid_ident(&stem) {
                return Err(SchemaError::InvalidIdentifier(format!(
                    "module name '{}' derived from table '{}'",
                    stem, request.table
                )));
            }

            let package_path = format!("{}::{}", base, package_name);
            targets.push(LayerTarget {
                layer,
                package_name: package_name.to_string(),
                module_path: format!("{}::{}", package_path, stem),
                package_path,
                output_dir: module_dir.join(package_name),
                file_name: format!("{}.rs", stem),
                stem,
            });
        }
        Ok(Self { targets })
    }

    pub fn target(&self, layer: Layer) -> &LayerTarget {
        &self.targets[layer.index()]
    }

    pub fn targets(&self) -> &[LayerTarget] {
        &self.targets
    }
}

/// `crate::a::b` from the part of `module_path` after the project root
fn crate_path(module_path: &str, project_root: &str) -> Result<String> {
    let start = module_path.find(project_root).ok_or_else(|| {
        SchemaError::InvalidModulePath(format!(
            "'{}' does not contain project root '{}'",
            module_path, project_root
        ))
    })?;
    let remainder = &module_path[start + project_root.len()..];

    let mut segments: Vec<&str> = remainder
        .split(|c: char| c == '/' || c == '\\')
        .filter(|s| !s.is_empty())
        .collect();
    if segments.first() == Some(&"src") {
        segments.remove(0);
    }

    let mut path = String::from("crate");
    for segment in segments {
        if !caser::is_valid_ident(segment) {
            return Err(SchemaError::InvalidModulePath(format!(
                "segment '{}' of '{}' is not a module name",
                segment, module_path
            )));
        }
        path.push_str("::");
        path.push_str(segment);
    }
    Ok(path)
}

/// Fully resolved generation input for one table
#[derive(Debug, Clone)]
pub struct ModuleDescriptor {
    pub table_name: String,
    pub upper_camel: String,
    pub lower_camel: String,
    pub fields: Vec<Field>,
    pub primary_key_fields: Vec<Field>,
    pub layers: BTreeSet<Layer>,
    pub layout: PackageLayout,
}

impl ModuleDescriptor {
    pub fn build(request: &ModuleRequest, project_root: &str, schema: TableSchema) -> Result<Self> {
        let layout = PackageLayout::resolve(request, project_root)?;
        Self::from_layout(request, layout, schema)
    }

    pub fn from_layout(
        request: &ModuleRequest,
        layout: PackageLayout,
        schema: TableSchema,
    ) -> Result<Self> {
        if schema.primary_key_fields.is_empty() {
            return Err(SchemaError::NoPrimaryKey(request.table.clone()));
        }

        let upper_camel = caser::to_upper_camel(&request.table)?;
        if !caser::is_valid_ident(&upper_camel) {
            return Err(SchemaError::InvalidIdentifier(format!(
                "type name '{}' derived from table '{}'",
                upper_camel, request.table
            )));
        }

        let mut idents = BTreeSet::new();
        let mut constants = BTreeSet::from(["TABLE_NAME"]);
        for field in &schema.fields {
            if !idents.insert(field.ident.as_str()) || !constants.insert(field.constant_name.as_str()) {
                return Err(SchemaError::InvalidIdentifier(format!(
                    "column '{}' of '{}' maps to a name already in use",
                    field.column_name, request.table
                )));
            }
        }

        Ok(Self {
            table_name: request.table.clone(),
            lower_camel: caser::to_lower_camel(&request.table)?,
            upper_camel,
            fields: schema.fields,
            primary_key_fields: schema.primary_key_fields,
            layers: request.layers.clone(),
            layout,
        })
    }

    pub fn emits(&self, layer: Layer) -> bool {
        self.layers.contains(&layer)
    }

    pub fn target(&self, layer: Layer) -> &LayerTarget {
        self.layout.target(layer)
    }

    /// Generated type name of a struct-carrying layer, e.g. `UserModel`
    pub fn type_name(&self, layer: Layer) -> String {
        let suffix = match layer {
            Layer::Model => "Model",
            Layer::Extend => "Extend",
            Layer::View => "View",
            Layer::Param => "Param",
            Layer::Dao => "Dao",
            Layer::Service => "Service",
            Layer::Controller => "Controller",
        };
        format!("{}{}", self.upper_camel, suffix)
    }

    pub fn single_key(&self) -> Option<&Field> {
        match self.primary_key_fields.as_slice() {
            [only] => Some(only),
            _ => None,
        }
    }
}
