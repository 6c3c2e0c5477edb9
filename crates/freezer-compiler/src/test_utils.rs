//! Code tree builders and a canned frontend.
//!
//! The builders produce what the external compiler emits for the matching
//! source, down to the instruction bytes the stub detector inspects.

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use freezer_bytecode::Opcode;
use freezer_core::{
    CodeBody, CodeFlags, CodeObject, Constant, INTRINSIC_MARKER, Interpreted, MODULE_CODE_NAME,
    PLACEHOLDER_CALL, SourceLocation,
};

use crate::frontend::{Frontend, FrontendError};

const FUNCTION_FLAGS: CodeFlags = CodeFlags::OPTIMIZED
    .union(CodeFlags::NEWLOCALS)
    .union(CodeFlags::NOFREE);

fn stub_instructions(none_index: u8) -> Vec<u8> {
    vec![
        Opcode::LOAD_GLOBAL.0,
        0,
        Opcode::CALL_FUNCTION.0,
        0,
        Opcode::POP_TOP.0,
        0,
        Opcode::LOAD_CONST.0,
        none_index,
        Opcode::RETURN_VALUE.0,
        0,
    ]
}

fn function(name: &str, body: Interpreted) -> CodeObject {
    CodeObject {
        name: name.to_string(),
        argcount: 0,
        posonlyargcount: 0,
        kwonlyargcount: 0,
        nlocals: 0,
        varnames: Vec::new(),
        flags: FUNCTION_FLAGS,
        body: CodeBody::Interpreted(body),
    }
}

fn location() -> SourceLocation {
    SourceLocation {
        filename: "m.py".to_string(),
        first_line: 1,
        line_table: vec![0, 1],
    }
}

/// `def name(): _builtin()`
pub fn stub_fn(name: &str) -> CodeObject {
    function(
        name,
        Interpreted {
            instructions: stub_instructions(0),
            constants: vec![Constant::None],
            names: vec![PLACEHOLDER_CALL.to_string()],
            stack_depth: 1,
            location: location(),
            ..Default::default()
        },
    )
}

/// `def name(): "doc"; _builtin()`
pub fn doc_stub_fn(name: &str, doc: &str) -> CodeObject {
    function(
        name,
        Interpreted {
            instructions: stub_instructions(1),
            constants: vec![Constant::Str(doc.to_string()), Constant::None],
            names: vec![PLACEHOLDER_CALL.to_string()],
            stack_depth: 1,
            location: location(),
            ..Default::default()
        },
    )
}

/// `def name(): pass`
pub fn plain_fn(name: &str) -> CodeObject {
    function(
        name,
        Interpreted {
            instructions: vec![Opcode::LOAD_CONST.0, 0, Opcode::RETURN_VALUE.0, 0],
            constants: vec![Constant::None],
            stack_depth: 1,
            location: location(),
            ..Default::default()
        },
    )
}

/// `def name(): "$intrinsic$..."; pass`
pub fn intrinsic_fn(name: &str) -> CodeObject {
    let mut code = plain_fn(name);
    interpreted_mut(&mut code)
        .constants
        .insert(0, Constant::Str(format!("{INTRINSIC_MARKER}{name}")));
    code
}

/// `def name(): "$intrinsic$..."; _builtin()`
pub fn intrinsic_stub_fn(name: &str) -> CodeObject {
    doc_stub_fn(name, &format!("{INTRINSIC_MARKER}{name}"))
}

/// A class body holding `members`.
pub fn class(name: &str, members: Vec<CodeObject>) -> CodeObject {
    CodeObject {
        flags: CodeFlags::NOFREE,
        ..function(name, container_body(members))
    }
}

/// A module body holding `members`.
pub fn module(members: Vec<CodeObject>) -> Arc<CodeObject> {
    Arc::new(CodeObject {
        flags: CodeFlags::NOFREE,
        ..function(MODULE_CODE_NAME, container_body(members))
    })
}

fn container_body(members: Vec<CodeObject>) -> Interpreted {
    let mut constants: Vec<Constant> = members
        .into_iter()
        .map(|member| Constant::Code(Arc::new(member)))
        .collect();
    constants.push(Constant::None);
    let none = (constants.len() - 1) as u8;
    Interpreted {
        instructions: vec![Opcode::LOAD_CONST.0, none, Opcode::RETURN_VALUE.0, 0],
        constants,
        stack_depth: 2,
        location: location(),
        ..Default::default()
    }
}

pub fn interpreted_mut(code: &mut CodeObject) -> &mut Interpreted {
    match &mut code.body {
        CodeBody::Interpreted(body) => body,
        other => panic!("not an interpreted body: {other:?}"),
    }
}

/// Nested code object at `path` below `code`.
pub fn child<'a>(code: &'a CodeObject, path: &[&str]) -> &'a CodeObject {
    path.iter().fold(code, |code, name| {
        code.children()
            .find(|child| child.name == *name)
            .map(Arc::as_ref)
            .unwrap_or_else(|| panic!("no child `{name}` in `{}`", code.name))
    })
}

/// Frontend returning prebuilt trees keyed by trailing path components.
#[derive(Default)]
pub struct StaticFrontend {
    modules: Vec<(PathBuf, CodeObject)>,
    calls: RefCell<Vec<(PathBuf, CodeFlags)>>,
}

impl StaticFrontend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `code` for any file whose path ends with `suffix`.
    pub fn with(mut self, suffix: &str, code: Arc<CodeObject>) -> Self {
        let code = Arc::try_unwrap(code).unwrap_or_else(|shared| (*shared).clone());
        self.modules.push((PathBuf::from(suffix), code));
        self
    }

    /// Paths and flags of every compile call, in order.
    pub fn calls(&self) -> Vec<(PathBuf, CodeFlags)> {
        self.calls.borrow().clone()
    }
}

impl Frontend for StaticFrontend {
    fn compile(
        &self,
        _source: &str,
        filename: &Path,
        flags: CodeFlags,
    ) -> Result<CodeObject, FrontendError> {
        self.calls.borrow_mut().push((filename.to_path_buf(), flags));

        self.modules
            .iter()
            .find(|(suffix, _)| filename.ends_with(suffix))
            .map(|(_, code)| code.clone())
            .ok_or_else(|| FrontendError::Failed {
                code: Some(1),
                stderr: format!("no module for `{}`", filename.display()),
            })
    }
}
