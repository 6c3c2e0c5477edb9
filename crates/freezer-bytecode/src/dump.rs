//! Human-readable dump of code object trees for debugging.
//!
//! Each code object becomes one `[code path]` section; nested code objects
//! follow their parent depth-first in constant order. [`dump_blob`] shows a
//! serialized blob instead, one line per code object as embedded.

use std::fmt::Write as _;

use freezer_core::{CodeBody, CodeObject, Constant, Interpreted};

use crate::marshal::{ReadError, WireCode, read_code};
use crate::opcode::{Opcode, decode};

/// Generate a human-readable dump of a code object tree.
pub fn dump(code: &CodeObject) -> String {
    let mut out = String::new();
    dump_code(&mut out, code, &code.name);
    out
}

/// Read back a serialized blob and list its code objects with the stack,
/// flags and constants they carry on the wire.
pub fn dump_blob(blob: &[u8]) -> Result<String, ReadError> {
    let code = read_code(blob)?;
    let mut out = String::new();
    writeln!(out, "[blob]").unwrap();
    writeln!(out, "size = {}", blob.len()).unwrap();
    dump_wire(&mut out, &code, &code.name);
    Ok(out)
}

fn dump_wire(out: &mut String, code: &WireCode, path: &str) {
    writeln!(
        out,
        "{path}: stack = {}, flags = {:#010x}, consts = {}, code = {} bytes",
        code.stacksize,
        code.flags,
        code.consts.len(),
        code.code.len()
    )
    .unwrap();
    for child in code.children() {
        dump_wire(out, child, &format!("{path}.{}", child.name));
    }
}

fn dump_code(out: &mut String, code: &CodeObject, path: &str) {
    if !out.is_empty() {
        out.push('\n');
    }
    writeln!(out, "[code {path}]").unwrap();
    writeln!(out, "flags = {}", format_flags(code)).unwrap();
    if code.argcount + code.kwonlyargcount > 0 || !code.varnames.is_empty() {
        writeln!(out, "varnames = {}", code.varnames.join(", ")).unwrap();
    }
    dump_body(out, &code.body);

    for child in code.children() {
        dump_code(out, child, &format!("{path}.{}", child.name));
    }
}

fn dump_body(out: &mut String, body: &CodeBody) {
    match body {
        CodeBody::NativeStub { index } => writeln!(out, "native = {index}").unwrap(),
        CodeBody::Intrinsic { index, inner } => {
            writeln!(out, "intrinsic = {index}").unwrap();
            dump_body(out, inner);
        }
        CodeBody::Interpreted(body) => dump_interpreted(out, body),
    }
}

fn dump_interpreted(out: &mut String, body: &Interpreted) {
    writeln!(out, "stack = {}", body.stack_depth).unwrap();
    if !body.names.is_empty() {
        writeln!(out, "names = {}", body.names.join(", ")).unwrap();
    }
    if !body.free_vars.is_empty() {
        writeln!(out, "freevars = {}", body.free_vars.join(", ")).unwrap();
    }
    if !body.cell_vars.is_empty() {
        writeln!(out, "cellvars = {}", body.cell_vars.join(", ")).unwrap();
    }

    if !body.constants.is_empty() {
        writeln!(out, "consts:").unwrap();
        let w = width_for_count(body.constants.len());
        for (i, c) in body.constants.iter().enumerate() {
            writeln!(out, "  #{i:<w$} {}", format_constant(c)).unwrap();
        }
    }

    let instructions = match decode(&body.instructions) {
        Ok(instructions) => instructions,
        Err(e) => {
            writeln!(out, "instructions: <{e}>").unwrap();
            return;
        }
    };
    if instructions.is_empty() {
        return;
    }

    writeln!(out, "instructions:").unwrap();
    let w = width_for_count(body.instructions.len());
    for ins in instructions {
        write!(out, "  {:>w$} {}", ins.offset, ins.opcode).unwrap();
        if ins.opcode.has_arg() {
            write!(out, " {}", ins.arg).unwrap();
            if let Some(note) = operand_note(body, ins.opcode, ins.arg as usize) {
                write!(out, " ({note})").unwrap();
            }
        }
        out.push('\n');
    }
}

fn operand_note(body: &Interpreted, opcode: Opcode, arg: usize) -> Option<String> {
    match opcode {
        Opcode::LOAD_CONST => body.constants.get(arg).map(format_constant),
        Opcode::LOAD_GLOBAL | Opcode::LOAD_NAME | Opcode::STORE_NAME => {
            body.names.get(arg).cloned()
        }
        _ => None,
    }
}

fn format_flags(code: &CodeObject) -> String {
    let flags = code.wire_flags();
    let named = flags.iter_names().fold(0, |acc, (_, f)| acc | f.bits());
    let unnamed = flags.bits() & !named;
    let extra = (unnamed != 0).then(|| format!("{unnamed:#x}"));

    let mut names: Vec<&str> = flags.names();
    if let Some(extra) = &extra {
        names.push(extra);
    }
    if names.is_empty() {
        return "0".to_string();
    }
    names.join(" | ")
}

fn format_constant(c: &Constant) -> String {
    match c {
        Constant::None => "None".to_string(),
        Constant::Ellipsis => "...".to_string(),
        Constant::Bool(true) => "True".to_string(),
        Constant::Bool(false) => "False".to_string(),
        Constant::Int(i) => i.to_string(),
        Constant::BigInt(text) => text.clone(),
        Constant::Float(f) => format!("{f:?}"),
        Constant::Complex { re, im } => format!("({re:?}{im:+?}j)"),
        Constant::Str(s) => format!("{s:?}"),
        Constant::Bytes(b) => format!("<{} bytes>", b.len()),
        Constant::Tuple(items) if items.len() == 1 => {
            format!("({},)", format_constant(&items[0]))
        }
        Constant::Tuple(items) => format!("({})", join_constants(items)),
        Constant::FrozenSet(items) => format!("frozenset({{{}}})", join_constants(items)),
        Constant::Code(code) => format!("<code {}>", code.name),
    }
}

fn join_constants(items: &[Constant]) -> String {
    items
        .iter()
        .map(format_constant)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Width needed to print the largest index below `count`.
fn width_for_count(count: usize) -> usize {
    count.saturating_sub(1).max(1).ilog10() as usize + 1
}
