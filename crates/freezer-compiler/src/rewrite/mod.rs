//! Native stub rewriting.
//!
//! Walks a module's code tree depth-first over constants in positional
//! order. Stubs become [`CodeBody::NativeStub`] leaves; functions tagged with
//! the intrinsic marker get an intrinsic slot and the [`CodeBody::Intrinsic`]
//! wrapper. Subtrees without either are returned as the same `Arc`.

mod detect;
mod tables;

#[cfg(test)]
mod rewrite_tests;
#[cfg(test)]
mod tables_tests;

use std::sync::Arc;

use freezer_core::{CodeBody, CodeObject, Constant, INTRINSIC_MARKER, MODULE_CODE_NAME};
use tracing::debug;

use crate::naming::{builtin_id, display_path, intrinsic_id};
use crate::{Error, Result};

use detect::Classification;
pub use detect::StubDefect;
pub use tables::{DispatchTables, TableKind};

/// Rewrites code trees and owns the dispatch tables they fill.
///
/// One rewriter must see every module of a run, in order: table indices are
/// assigned on first append and are never reused.
#[derive(Debug, Default)]
pub struct Rewriter {
    tables: DispatchTables,
}

impl Rewriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rewrite the module code `code` of `module`.
    ///
    /// Returns `code` itself when nothing in the tree changed.
    pub fn process(&mut self, code: &Arc<CodeObject>, module: &str) -> Result<Arc<CodeObject>> {
        let mut path = Vec::new();
        self.visit(code, module, &mut path)
    }

    pub fn tables(&self) -> &DispatchTables {
        &self.tables
    }

    pub fn into_tables(self) -> DispatchTables {
        self.tables
    }

    fn visit(
        &mut self,
        code: &Arc<CodeObject>,
        module: &str,
        path: &mut Vec<String>,
    ) -> Result<Arc<CodeObject>> {
        // Already rewritten trees pass through.
        let CodeBody::Interpreted(body) = &code.body else {
            return Ok(Arc::clone(code));
        };

        let intrinsic = if is_tagged_intrinsic(&body.constants) {
            let index = self.tables.push_intrinsic(intrinsic_id(module, path.as_slice())?)?;
            debug!(module, path = %display_path(path.as_slice()), index, "intrinsic");
            Some(index)
        } else {
            None
        };

        if let Classification::Stub = detect::classify(code, body, module, path)? {
            let index = self.tables.push_builtin(builtin_id(module, path.as_slice())?)?;
            debug!(module, path = %display_path(path.as_slice()), index, "native stub");
            let stub = CodeBody::NativeStub { index };
            return Ok(Arc::new(with_body(code, wrap(stub, intrinsic))));
        }

        let mut changed = false;
        let mut constants = Vec::with_capacity(body.constants.len());
        for constant in &body.constants {
            let Constant::Code(child) = constant else {
                constants.push(constant.clone());
                continue;
            };
            if child.name == MODULE_CODE_NAME {
                return Err(Error::MalformedTree {
                    module: module.to_string(),
                    reason: format!(
                        "nested `{MODULE_CODE_NAME}` code object in `{}`",
                        display_path(path.as_slice())
                    ),
                });
            }

            path.push(child.name.clone());
            let rewritten = self.visit(child, module, path);
            path.pop();
            let rewritten = rewritten?;

            changed |= !Arc::ptr_eq(child, &rewritten);
            constants.push(Constant::Code(rewritten));
        }

        if !changed && intrinsic.is_none() {
            return Ok(Arc::clone(code));
        }

        let mut rebuilt = body.clone();
        rebuilt.constants = constants;
        let body = wrap(CodeBody::Interpreted(rebuilt), intrinsic);
        Ok(Arc::new(with_body(code, body)))
    }
}

fn is_tagged_intrinsic(constants: &[Constant]) -> bool {
    constants
        .first()
        .and_then(Constant::as_str)
        .is_some_and(|s| s.starts_with(INTRINSIC_MARKER))
}

fn wrap(body: CodeBody, intrinsic: Option<usize>) -> CodeBody {
    match intrinsic {
        Some(index) => CodeBody::Intrinsic {
            index,
            inner: Box::new(body),
        },
        None => body,
    }
}

fn with_body(code: &CodeObject, body: CodeBody) -> CodeObject {
    CodeObject {
        name: code.name.clone(),
        argcount: code.argcount,
        posonlyargcount: code.posonlyargcount,
        kwonlyargcount: code.kwonlyargcount,
        nlocals: code.nlocals,
        varnames: code.varnames.clone(),
        flags: code.flags,
        body,
    }
}
