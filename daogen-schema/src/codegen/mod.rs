//! Layer code generation
//!
//! Each layer is described as a [`SourceFile`], printed, checked to parse as
//! Rust, and stamped with a checksum of its body so later runs can tell
//! whether the file was edited by hand.

use crate::descriptor::{Layer, ModuleDescriptor};
use crate::Result;

pub mod ir;
pub mod layers;
pub mod printer;
pub mod templates;
pub mod writer;

pub use ir::SourceFile;
pub use printer::Printer;
pub use templates::Templates;
pub use writer::FileState;

/// Final file content of one layer
pub fn render_layer(
    templates: &Templates,
    descriptor: &ModuleDescriptor,
    layer: Layer,
) -> Result<String> {
    let file = layers::build(templates, descriptor, layer)?;
    let body = Printer::new().body(&file);
    printer::validate(&body)?;
    Ok(writer::stamp(&Printer::header(&file), &body))
}
