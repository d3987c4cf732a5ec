//! Django source emitter
//!
//! Routes every class in the database to a `(application, kind)` destination and
//! writes one file per destination below the target root.

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Serialize;
use tracing::{debug, info, span, warn, Level};

use super::database::{ClassKind, DjangoClass, DjangoDatabase};
use crate::core::{Emitter, GeneratorConfig, Result};

/// Header of every generated models file
pub const MODEL_HEADER: &str = "# Auto generated file
from django.db import models
from django.contrib import admin

";

/// Header of every generated views file
pub const VIEW_HEADER: &str = "# Auto generated file
from django.http import HttpResponseRedirect
from django.shortcuts import render_to_response

";

/// Contents of a package marker
const PACKAGE_MARKER_CONTENTS: &str = "\n";

/// A class that produced no output
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedClass {
    pub name: String,
    pub reason: String,
}

/// What one emit call produced
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GenerationReport {
    /// Generated source files, in first-use order
    pub files: Vec<PathBuf>,
    /// Application directories created by this run
    pub packages: Vec<PathBuf>,
    pub skipped: Vec<SkippedClass>,
}

impl GenerationReport {
    fn skip(&mut self, class: &DjangoClass, reason: &str) {
        self.skipped.push(SkippedClass {
            name: class.full_name(),
            reason: reason.to_string(),
        });
    }
}

pub fn header(kind: ClassKind) -> &'static str {
    match kind {
        ClassKind::Model => MODEL_HEADER,
        ClassKind::View => VIEW_HEADER,
    }
}

/// Render the source text of one class
pub fn render_class(class: &DjangoClass, kind: ClassKind) -> String {
    let indent = kind.indent();
    let mut out = String::new();

    if let Some(application) = &class.application {
        out.push_str(&format!("# Application: {}\n", application));
    }

    if kind == ClassKind::Model {
        out.push_str(&format!("class {}(models.Model):\n", class.name));
        for field in &class.fields {
            out.push_str(&format!("{}{}\n", indent, field.render()));
        }
        for relationship in &class.relationships {
            out.push_str(&format!("{}{}\n", indent, relationship.render()));
        }
    }

    if !class.operations.is_empty() {
        out.push('\n');
    }
    for operation in &class.operations {
        for line in operation.render_lines() {
            out.push_str(&format!("{}{}\n", indent, line));
        }
    }

    if class.is_empty() {
        out.push_str(&format!("{}pass\n", indent));
    }

    out.push('\n');
    out
}

/// Writes `models.py_gen` / `views.py_gen` files
#[derive(Debug, Clone, Default)]
pub struct DjangoEmitter {
    config: GeneratorConfig,
}

impl DjangoEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: GeneratorConfig) -> Self {
        Self { config }
    }

    fn file_name(&self, kind: ClassKind) -> &str {
        match kind {
            ClassKind::Model => &self.config.model_file_name,
            ClassKind::View => &self.config.view_file_name,
        }
    }

    /// Make sure `<root>/<application>` exists, marking it as a package when new
    fn ensure_package(&self, dir: &Path, report: &mut GenerationReport) -> Result<()> {
        if dir.exists() {
            return Ok(());
        }
        fs::create_dir_all(dir)?;
        fs::write(dir.join(&self.config.package_marker), PACKAGE_MARKER_CONTENTS)?;
        info!(path = %dir.display(), "Created application package");
        report.packages.push(dir.to_path_buf());
        Ok(())
    }
}

impl Emitter<DjangoDatabase> for DjangoEmitter {
    type Output = GenerationReport;

    fn emit(&self, database: &DjangoDatabase, target_root: &Path) -> Result<GenerationReport> {
        let emit_span = span!(
            Level::INFO,
            "emit_django",
            root = %target_root.display(),
            classes = database.class_count()
        );
        let _enter = emit_span.enter();

        fs::create_dir_all(target_root)?;

        let mut report = GenerationReport::default();
        let mut destinations: IndexMap<PathBuf, String> = IndexMap::new();

        for class in database.classes() {
            if class.is_abstract {
                warn!(class = %class.full_name(), "Skipping abstract class");
                report.skip(class, "abstract");
                continue;
            }

            let Some(kind) = class.kind() else {
                warn!(class = %class.full_name(), stereotype = ?class.stereotype, "Cannot generate file for class");
                report.skip(class, "unknown kind");
                continue;
            };

            let dir = match &class.application {
                Some(application) => {
                    let dir = target_root.join(application);
                    self.ensure_package(&dir, &mut report)?;
                    dir
                }
                None => target_root.to_path_buf(),
            };

            let buffer = destinations
                .entry(dir.join(self.file_name(kind)))
                .or_insert_with(|| header(kind).to_string());
            buffer.push_str(&render_class(class, kind));
            debug!(class = %class.full_name(), kind = kind.stereotype(), "Rendered class");
        }

        for (path, contents) in destinations {
            fs::write(&path, contents)?;
            info!(path = %path.display(), "Generated file");
            report.files.push(path);
        }

        info!(
            files = report.files.len(),
            packages = report.packages.len(),
            skipped = report.skipped.len(),
            "Generation completed"
        );
        Ok(report)
    }

    fn name(&self) -> &'static str {
        "django"
    }

    fn format(&self) -> &'static str {
        "python"
    }
}
