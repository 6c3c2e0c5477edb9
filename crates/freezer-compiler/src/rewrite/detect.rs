//! Native stub detection.
//!
//! A stub is a function whose whole body is a zero-argument call of the
//! placeholder global. The compiler lowers both `_builtin()` and a docstring
//! followed by `_builtin()` to the same instructions (the docstring lives in
//! the constants), so one structural shape covers both:
//!
//! ```text
//! LOAD_GLOBAL   _builtin
//! CALL_FUNCTION 0
//! POP_TOP
//! LOAD_CONST    None
//! RETURN_VALUE
//! ```
//!
//! Anything with that shape that still fails a stub invariant is an error;
//! it means the compiler's output no longer matches what the detector
//! assumes.

use freezer_bytecode::{Instruction, Opcode, decode};
use freezer_core::{CodeObject, Constant, INIT_MODULE_NAME, Interpreted, PLACEHOLDER_CALL};

use crate::naming::display_path;
use crate::{Error, Result};

/// Why a stub-shaped function cannot become a native stub.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StubDefect {
    #[error("stack size is {0}, expected 1")]
    StackDepth(u32),

    #[error("has free variables ({})", .0.join(", "))]
    FreeVars(Vec<String>),

    #[error("has cell variables ({})", .0.join(", "))]
    CellVars(Vec<String>),

    /// The name is reserved for the native module initializer, whose
    /// declaration is generated from the source marker instead.
    #[error("`{INIT_MODULE_NAME}` is reserved for native module initializers")]
    ReservedName,
}

#[derive(Debug)]
pub(crate) enum Classification {
    Stub,
    NotStub,
}

/// Classify an interpreted body found at `path` in `module`.
pub(crate) fn classify(
    code: &CodeObject,
    body: &Interpreted,
    module: &str,
    path: &[String],
) -> Result<Classification> {
    let shaped = has_stub_shape(body).map_err(|source| Error::Decode {
        module: module.to_string(),
        path: display_path(path),
        source,
    })?;
    if !shaped {
        return Ok(Classification::NotStub);
    }

    let defect = if body.stack_depth != 1 {
        Some(StubDefect::StackDepth(body.stack_depth))
    } else if !body.free_vars.is_empty() {
        Some(StubDefect::FreeVars(body.free_vars.clone()))
    } else if !body.cell_vars.is_empty() {
        Some(StubDefect::CellVars(body.cell_vars.clone()))
    } else if code.name == INIT_MODULE_NAME {
        Some(StubDefect::ReservedName)
    } else {
        None
    };

    match defect {
        Some(defect) => Err(Error::MalformedStub {
            module: module.to_string(),
            path: display_path(path),
            defect,
        }),
        None => Ok(Classification::Stub),
    }
}

/// Whether the body consists of nothing but the placeholder call.
pub(crate) fn has_stub_shape(
    body: &Interpreted,
) -> std::result::Result<bool, freezer_bytecode::DecodeError> {
    if !matches!(body.names.as_slice(), [name] if name == PLACEHOLDER_CALL) {
        return Ok(false);
    }

    let instructions = decode(&body.instructions)?;
    let ops: Vec<&Instruction> = instructions
        .iter()
        .filter(|ins| ins.opcode != Opcode::NOP)
        .collect();

    Ok(matches!(
        ops.as_slice(),
        [
            Instruction { opcode: Opcode::LOAD_GLOBAL, arg: 0, .. },
            Instruction { opcode: Opcode::CALL_FUNCTION, arg: 0, .. },
            Instruction { opcode: Opcode::POP_TOP, .. },
            Instruction { opcode: Opcode::LOAD_CONST, arg: none, .. },
            Instruction { opcode: Opcode::RETURN_VALUE, .. },
        ] if body.constants.get(*none as usize).is_some_and(Constant::is_none)
    ))
}
