//! Seam to the external compiler.
//!
//! The freezer never compiles source text itself. A [`Frontend`] turns one
//! module's source into a code tree; [`CommandFrontend`] does so by running
//! an external program that prints a JSON code record.

mod command;


use std::path::Path;

use freezer_core::{CodeFlags, CodeObject, RawError};

pub use command::CommandFrontend;

/// Compiles module source text into a code tree.
pub trait Frontend {
    fn compile(
        &self,
        source: &str,
        filename: &Path,
        flags: CodeFlags,
    ) -> Result<CodeObject, FrontendError>;
}

#[derive(Debug, thiserror::Error)]
pub enum FrontendError {
    #[error("failed to run compiler `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("compiler exited with {}: {}", status_text(.code), .stderr.trim_end())]
    Failed { code: Option<i32>, stderr: String },

    #[error("compiler output is not UTF-8")]
    NonUtf8Output,

    #[error(transparent)]
    Record(#[from] RawError),
}

fn status_text(code: &Option<i32>) -> String {
    match *code {
        Some(code) => format!("status {code}"),
        None => "no status".to_string(),
    }
}
