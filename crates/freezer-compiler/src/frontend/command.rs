use std::ffi::OsString;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

use freezer_core::{CodeFlags, CodeObject, parse_code};
use tracing::debug;

use super::{Frontend, FrontendError};

/// Runs an external compiler once per module.
///
/// Invoked as `<program> [args..] --flags <bits> <filename>` with the source
/// on stdin; a JSON code record is expected on stdout.
#[derive(Debug, Clone)]
pub struct CommandFrontend {
    program: OsString,
    args: Vec<OsString>,
}

impl CommandFrontend {
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn args<I, A>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    fn program_name(&self) -> String {
        self.program.to_string_lossy().into_owned()
    }
}

impl Frontend for CommandFrontend {
    fn compile(
        &self,
        source: &str,
        filename: &Path,
        flags: CodeFlags,
    ) -> Result<CodeObject, FrontendError> {
        debug!(program = %self.program_name(), file = %filename.display(), "compile");

        let spawn_error = |source| FrontendError::Spawn {
            program: self.program_name(),
            source,
        };

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .arg("--flags")
            .arg(flags.bits().to_string())
            .arg(filename)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(spawn_error)?;

        // Feed stdin from another thread so a compiler that writes before it
        // finishes reading cannot deadlock on a full pipe.
        let stdin = child.stdin.take();
        let output = std::thread::scope(|scope| {
            if let Some(mut stdin) = stdin {
                scope.spawn(move || {
                    // A compiler that exits early closes the pipe; its exit
                    // status reports the failure.
                    let _ = stdin.write_all(source.as_bytes());
                });
            }
            child.wait_with_output()
        })
        .map_err(spawn_error)?;

        if !output.status.success() {
            return Err(FrontendError::Failed {
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        let json = String::from_utf8(output.stdout).map_err(|_| FrontendError::NonUtf8Output)?;
        Ok(parse_code(&json)?)
    }
}
