//! Freezer compiler: native stub rewriting and frozen module generation.
//!
//! This crate provides the build-time pipeline that embeds modules into the
//! runtime binary:
//! - `frontend` - seam to the external compiler (source text to code objects)
//! - `rewrite` - native stub detection and the dispatch tables it fills
//! - `naming` - dispatch table identifiers
//! - `collect` - per-file module records
//! - `codegen` - generated declarations, dispatch tables and module table
//! - `writer` - atomic, idempotent artifact writes
//! - `pipeline` - the whole run, from file list to written artifacts

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod codegen;
pub mod collect;
pub mod frontend;
pub mod naming;
pub mod pipeline;
pub mod rewrite;
pub mod writer;

#[cfg(test)]
pub mod test_utils;


use std::path::PathBuf;

pub use codegen::{Artifact, generate};
pub use collect::{Collector, LoadedModule, ModuleName, ModuleRecord, has_init_hook, module_name};
pub use frontend::{CommandFrontend, Frontend, FrontendError};
pub use pipeline::{EXPECTED_FORMAT_MARKER, FreezeReport, PipelineConfig, check_format, freeze};
pub use rewrite::{DispatchTables, Rewriter, StubDefect, TableKind};
pub use writer::{WriteOutcome, write_if_changed};

/// Errors that abort a freeze run. None of them are recoverable.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The serializer produces a format the runtime cannot load.
    #[error("unexpected marshalling format: expected {expected:02x?}, found {found:02x?}")]
    FormatMismatch { expected: [u8; 2], found: [u8; 2] },

    /// A function shaped like a native stub violates a stub invariant.
    #[error("malformed native stub `{path}` in module `{module}`: {defect}")]
    MalformedStub {
        module: String,
        path: String,
        defect: StubDefect,
    },

    #[error("malformed code tree in module `{module}`: {reason}")]
    MalformedTree { module: String, reason: String },

    /// Dispatch identifiers exist only for module-level functions and methods.
    #[error("cannot name `{path}` in module `{module}`: unsupported nesting depth")]
    UnsupportedNesting { module: String, path: String },

    #[error("duplicate {table} identifier `{identifier}`")]
    DuplicateIdentifier { table: TableKind, identifier: String },

    #[error("modules `{first}` and `{second}` map to the same frozen module symbol")]
    ModuleCollision { first: String, second: String },

    #[error("not a module source file: {}", .0.display())]
    InvalidModulePath(PathBuf),

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}: {source}", path.display())]
    Frontend {
        path: PathBuf,
        #[source]
        source: FrontendError,
    },

    #[error("undecodable instructions in `{path}` of module `{module}`: {source}")]
    Decode {
        module: String,
        path: String,
        #[source]
        source: freezer_bytecode::DecodeError,
    },
}

/// Result type for freezer operations.
pub type Result<T> = std::result::Result<T, Error>;
