//! Renders a [`SourceFile`] to Rust source text

use super::ir::{ConstItem, Function, ImplBlock, Item, SourceFile, StructItem};
use crate::{Result, SchemaError};
use std::fmt::Write;

const INDENT: &str = "    ";

#[derive(Debug, Default)]
pub struct Printer {
    out: String,
}

impl Printer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Header comment lines
    pub fn header(file: &SourceFile) -> Vec<String> {
        file.header.iter().map(|line| comment("//", line)).collect()
    }

    /// Everything below the header: `use` items and items
    pub fn body(mut self, file: &SourceFile) -> String {
        if !file.uses.is_empty() {
            for path in &file.uses {
                self.line(0, &format!("use {};", path));
            }
            self.blank();
        }

        for (i, item) in file.items.iter().enumerate() {
            if i > 0 {
                self.blank();
            }
            match item {
                Item::Const(c) => self.constant(c),
                Item::Struct(s) => self.structure(s),
                Item::Impl(i) => self.implementation(i),
                Item::Function(f) => self.function(0, f),
            }
        }
        self.out
    }

    fn line(&mut self, depth: usize, text: &str) {
        for _ in 0..depth {
            self.out.push_str(INDENT);
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn blank(&mut self) {
        self.out.push('\n');
    }

    fn doc(&mut self, depth: usize, doc: &Option<String>) {
        if let Some(doc) = doc {
            for line in doc.lines() {
                self.line(depth, &comment("///", line));
            }
        }
    }

    fn constant(&mut self, c: &ConstItem) {
        self.doc(0, &c.doc);
        self.line(0, &format!("pub const {}: {} = {};", c.name, c.ty, c.value));
    }

    fn structure(&mut self, s: &StructItem) {
        self.doc(0, &s.doc);
        if !s.derives.is_empty() {
            self.line(0, &format!("#[derive({})]", s.derives.join(", ")));
        }
        for attr in &s.attrs {
            self.line(0, &format!("#[{}]", attr));
        }
        self.line(0, &format!("pub struct {} {{", s.name));
        for field in &s.fields {
            self.doc(1, &field.doc);
            for attr in &field.attrs {
                self.line(1, &format!("#[{}]", attr));
            }
            self.line(1, &format!("pub {}: {},", field.name, field.ty));
        }
        self.line(0, "}");
    }

    fn implementation(&mut self, block: &ImplBlock) {
        self.line(0, &format!("impl {} {{", block.target));
        for (i, function) in block.functions.iter().enumerate() {
            if i > 0 {
                self.blank();
            }
            self.function(1, function);
        }
        self.line(0, "}");
    }

    fn function(&mut self, depth: usize, f: &Function) {
        self.doc(depth, &f.doc);

        let mut signature = String::new();
        if f.public {
            signature.push_str("pub ");
        }
        if f.is_async {
            signature.push_str("async ");
        }
        let _ = write!(signature, "fn {}({})", f.name, f.params.join(", "));
        if let Some(ret) = &f.ret {
            let _ = write!(signature, " -> {}", ret);
        }
        signature.push_str(" {");
        self.line(depth, &signature);

        let base = min_indent(&f.body);
        for line in f.body.lines().filter(|l| !l.trim().is_empty()) {
            let relative = &line[base.min(leading_spaces(line))..];
            self.line(depth + 1, relative.trim_end());
        }
        self.line(depth, "}");
    }
}

fn comment(prefix: &str, text: &str) -> String {
    if text.is_empty() {
        prefix.to_string()
    } else {
        format!("{} {}", prefix, text)
    }
}

fn leading_spaces(line: &str) -> usize {
    line.len() - line.trim_start_matches(' ').len()
}

fn min_indent(body: &str) -> usize {
    body.lines()
        .filter(|l| !l.trim().is_empty())
        .map(leading_spaces)
        .min()
        .unwrap_or(0)
}

/// Reject printed text that is not a well-formed Rust file
pub fn validate(source: &str) -> Result<()> {
    syn::parse_file(source)
        .map(drop)
        .map_err(|e| SchemaError::InvalidOutput(e.to_string()))
}
