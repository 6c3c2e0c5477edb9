//! Module collection: one record per source file.

use std::ffi::OsStr;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use freezer_bytecode::Serializer;
use freezer_core::{CodeFlags, CodeObject, INIT_HOOK_MARKER};
use tracing::debug;

use crate::frontend::Frontend;
use crate::rewrite::{DispatchTables, Rewriter};
use crate::{Error, Result};

const PACKAGE_INIT: &str = "__init__";
const PACKAGE_INIT_FILE: &str = "__init__.py";
const SOURCE_EXTENSION: &str = "py";

/// Dotted module name derived from a source path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleName {
    pub name: String,
    pub is_package: bool,
}

/// Everything the code generator needs about one frozen module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleRecord {
    pub name: String,
    /// Serialized code, opaque past this point.
    pub blob: Vec<u8>,
    pub is_package: bool,
    pub has_init_hook: bool,
}

/// A rewritten module before serialization.
#[derive(Debug, Clone)]
pub struct LoadedModule {
    pub name: ModuleName,
    pub code: Arc<CodeObject>,
    pub has_init_hook: bool,
}

/// Derive the dotted module name of `path`.
///
/// The file stem is prefixed with each enclosing directory name for as long
/// as that directory holds an `__init__.py`. A trailing `__init__` is dropped
/// and marks the module as a package.
pub fn module_name(path: &Path) -> Result<ModuleName> {
    let invalid = || Error::InvalidModulePath(path.to_path_buf());

    if path.extension().and_then(OsStr::to_str) != Some(SOURCE_EXTENSION) {
        return Err(invalid());
    }
    let stem = path.file_stem().and_then(OsStr::to_str).ok_or_else(invalid)?;

    let mut parts = vec![stem];
    let mut dir = path.parent();
    while let Some(parent) = dir {
        if !parent.join(PACKAGE_INIT_FILE).is_file() {
            break;
        }
        let Some(name) = parent.file_name().and_then(OsStr::to_str) else {
            break;
        };
        parts.push(name);
        dir = parent.parent();
    }
    parts.reverse();

    let is_package = parts.last() == Some(&PACKAGE_INIT);
    if is_package {
        parts.pop();
    }
    if parts.is_empty() {
        return Err(invalid());
    }

    Ok(ModuleName {
        name: parts.join("."),
        is_package,
    })
}

/// Whether the source asks for a native module initializer.
///
/// A plain substring test. The rewriter refuses a stub named
/// `__init_module__`, so the native initializer this announces can never be
/// shadowed by a generated builtin of the same name.
pub fn has_init_hook(source: &str) -> bool {
    source.contains(INIT_HOOK_MARKER)
}

/// Turns source files into module records, filling one set of dispatch
/// tables across all of them.
pub struct Collector<'a> {
    frontend: &'a dyn Frontend,
    serializer: &'a dyn Serializer,
    rewriter: Rewriter,
}

impl<'a> Collector<'a> {
    pub fn new(frontend: &'a dyn Frontend, serializer: &'a dyn Serializer) -> Self {
        Self {
            frontend,
            serializer,
            rewriter: Rewriter::new(),
        }
    }

    /// Compile and rewrite `path` without serializing it.
    pub fn load(&mut self, path: &Path) -> Result<LoadedModule> {
        let name = module_name(path)?;
        let source = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let has_init_hook = has_init_hook(&source);

        let code = self
            .frontend
            .compile(&source, path, CodeFlags::FUTURE_ANNOTATIONS)
            .map_err(|source| Error::Frontend {
                path: path.to_path_buf(),
                source,
            })?;
        let code = self.rewriter.process(&Arc::new(code), &name.name)?;

        debug!(
            module = %name.name,
            package = name.is_package,
            init_hook = has_init_hook,
            "loaded"
        );
        Ok(LoadedModule {
            name,
            code,
            has_init_hook,
        })
    }

    /// Compile, rewrite and serialize `path`.
    pub fn collect(&mut self, path: &Path) -> Result<ModuleRecord> {
        let loaded = self.load(path)?;
        let blob = self.serializer.serialize(&loaded.code);
        debug!(module = %loaded.name.name, bytes = blob.len(), "serialized");

        Ok(ModuleRecord {
            name: loaded.name.name,
            blob,
            is_package: loaded.name.is_package,
            has_init_hook: loaded.has_init_hook,
        })
    }

    pub fn tables(&self) -> &DispatchTables {
        self.rewriter.tables()
    }

    pub fn into_tables(self) -> DispatchTables {
        self.rewriter.into_tables()
    }
}
