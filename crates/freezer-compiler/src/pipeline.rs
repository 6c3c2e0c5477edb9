//! A whole freeze run: source files in, generated artifacts out.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use freezer_bytecode::Serializer;
use freezer_core::utils::module_ident;
use tracing::info;

use crate::codegen::generate;
use crate::collect::{Collector, ModuleRecord};
use crate::frontend::Frontend;
use crate::writer::{WriteOutcome, write_if_changed};
use crate::{Error, Result};

/// Format marker of the serialized code the runtime loads (marshal format
/// 3413, little-endian).
pub const EXPECTED_FORMAT_MARKER: [u8; 2] = [0x55, 0x0d];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Directory receiving the generated artifacts. Created if missing.
    pub out_dir: PathBuf,
    /// Source files, processed in this order.
    pub files: Vec<PathBuf>,
}

impl PipelineConfig {
    pub fn new(out_dir: impl Into<PathBuf>, files: Vec<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
            files,
        }
    }
}

/// What a run produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FreezeReport {
    pub modules: usize,
    pub builtins: usize,
    pub intrinsics: usize,
    pub written: Vec<PathBuf>,
    pub unchanged: Vec<PathBuf>,
}

/// Fail unless `serializer` produces the format the runtime expects.
pub fn check_format(serializer: &dyn Serializer) -> Result<()> {
    let found = serializer.format_marker();
    if found != EXPECTED_FORMAT_MARKER {
        return Err(Error::FormatMismatch {
            expected: EXPECTED_FORMAT_MARKER,
            found,
        });
    }
    Ok(())
}

/// Freeze every file of `config` and write the artifacts.
///
/// Nothing is written unless every module was collected and every artifact
/// rendered.
pub fn freeze(
    config: &PipelineConfig,
    frontend: &dyn Frontend,
    serializer: &dyn Serializer,
) -> Result<FreezeReport> {
    check_format(serializer)?;

    let mut collector = Collector::new(frontend, serializer);
    let mut modules = Vec::with_capacity(config.files.len());
    for file in &config.files {
        modules.push(collector.collect(file)?);
    }
    let tables = collector.into_tables();

    modules.sort_by(|a, b| a.name.cmp(&b.name));
    check_collisions(&modules)?;

    let artifacts = generate(&modules, &tables);

    fs::create_dir_all(&config.out_dir).map_err(|source| Error::Io {
        path: config.out_dir.clone(),
        source,
    })?;

    let mut report = FreezeReport {
        modules: modules.len(),
        builtins: tables.builtin_count(),
        intrinsics: tables.intrinsic_count(),
        ..Default::default()
    };
    for artifact in &artifacts {
        let path = config.out_dir.join(artifact.file_name);
        match write_if_changed(&path, artifact.content.as_bytes())? {
            WriteOutcome::Written => {
                info!(path = %path.display(), "written");
                report.written.push(path);
            }
            WriteOutcome::Unchanged => {
                info!(path = %path.display(), "unchanged");
                report.unchanged.push(path);
            }
        }
    }

    info!(
        modules = report.modules,
        builtins = report.builtins,
        intrinsics = report.intrinsics,
        "frozen"
    );
    Ok(report)
}

/// Two modules must not share a `kData_` symbol.
fn check_collisions(modules: &[ModuleRecord]) -> Result<()> {
    let mut seen: HashMap<String, &str> = HashMap::with_capacity(modules.len());
    for module in modules {
        if let Some(first) = seen.insert(module_ident(&module.name), &module.name) {
            return Err(Error::ModuleCollision {
                first: first.to_string(),
                second: module.name.clone(),
            });
        }
    }
    Ok(())
}
