//! Generated C++ glue.
//!
//! Every artifact is a pure function of the sorted module records and the
//! dispatch tables, so identical inputs render identical bytes.

use freezer_core::utils::{c_string_escape, module_ident};

use crate::collect::ModuleRecord;
use crate::naming::init_hook_id;
use crate::rewrite::DispatchTables;

pub const BUILTINS_H: &str = "builtins.h";
pub const BUILTINS_CPP: &str = "builtins.cpp";
pub const INTRINSICS_H: &str = "intrinsics.h";
pub const INTRINSICS_CPP: &str = "intrinsics.cpp";
pub const FROZEN_MODULES_CPP: &str = "frozen-modules.cpp";
pub const FROZEN_MODULES_H: &str = "frozen-modules.h";

const BYTES_PER_LINE: usize = 16;
const INDENT: &str = "    ";
const NAMESPACE_OPEN: &str = "namespace py {\n";
const NAMESPACE_CLOSE: &str = "}  // namespace py\n";

/// One generated file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub file_name: &'static str,
    pub content: String,
}

impl Artifact {
    fn new(file_name: &'static str, content: String) -> Self {
        Self { file_name, content }
    }
}

/// Render all artifacts. Modules are ordered by name; table entries keep
/// their append order.
pub fn generate(modules: &[ModuleRecord], tables: &DispatchTables) -> Vec<Artifact> {
    let mut sorted: Vec<&ModuleRecord> = modules.iter().collect();
    sorted.sort_by(|a, b| a.name.cmp(&b.name));

    vec![
        Artifact::new(BUILTINS_H, render_builtins_h(&sorted, tables)),
        Artifact::new(BUILTINS_CPP, render_builtins_cpp(tables)),
        Artifact::new(INTRINSICS_H, render_intrinsics_h(tables)),
        Artifact::new(INTRINSICS_CPP, render_intrinsics_cpp(tables)),
        Artifact::new(FROZEN_MODULES_CPP, render_frozen_modules_cpp(&sorted)),
        Artifact::new(FROZEN_MODULES_H, render_frozen_modules_h()),
    ]
}

fn includes(headers: &[&str]) -> String {
    let mut out = String::new();
    for header in headers {
        out.push_str(&format!("#include \"{header}\"\n"));
    }
    out.push('\n');
    out
}

fn render_builtins_h(modules: &[&ModuleRecord], tables: &DispatchTables) -> String {
    let mut out = includes(&["globals.h", "handles-decl.h", "modules.h", "view.h"]);
    out.push_str(NAMESPACE_OPEN);
    out.push_str("\nclass Thread;\n\n");
    out.push_str("extern const BuiltinFunction kBuiltinFunctions[];\n");
    out.push_str("extern const word kNumBuiltinFunctions;\n\n");

    for id in tables.builtins() {
        out.push_str(&format!(
            "RawObject {id}(Thread* thread, Arguments args) ALIGN_16;\n"
        ));
    }
    out.push('\n');

    for module in modules.iter().filter(|m| m.has_init_hook) {
        out.push_str(&format!(
            "void {}(Thread*, const Module&, View<byte>);\n",
            init_hook_id(&module.name)
        ));
    }

    out.push('\n');
    out.push_str(NAMESPACE_CLOSE);
    out
}

fn render_builtins_cpp(tables: &DispatchTables) -> String {
    let mut out = includes(&[BUILTINS_H]);
    out.push_str(NAMESPACE_OPEN);
    out.push_str("\nconst BuiltinFunction kBuiltinFunctions[] = {\n");
    for id in tables.builtins() {
        out.push_str(&format!("{INDENT}{id},\n"));
    }
    out.push_str("};\n");
    out.push_str("const word kNumBuiltinFunctions = ARRAYSIZE(kBuiltinFunctions);\n\n");
    out.push_str(NAMESPACE_CLOSE);
    out
}

fn render_intrinsics_h(tables: &DispatchTables) -> String {
    let mut out = includes(&["globals.h", "modules.h"]);
    out.push_str(NAMESPACE_OPEN);
    out.push_str("\nclass Thread;\n\n");
    out.push_str("extern const IntrinsicFunction kIntrinsicFunctions[];\n");
    out.push_str("extern const word kNumIntrinsicFunctions;\n\n");

    for id in tables.intrinsics() {
        out.push_str(&format!("bool {id}(Thread* thread) ALIGN_16;\n"));
    }

    out.push('\n');
    out.push_str(NAMESPACE_CLOSE);
    out
}

fn render_intrinsics_cpp(tables: &DispatchTables) -> String {
    let mut out = includes(&[INTRINSICS_H]);
    out.push_str(NAMESPACE_OPEN);
    out.push_str("\nconst IntrinsicFunction kIntrinsicFunctions[] = {\n");
    for id in tables.intrinsics() {
        out.push_str(&format!("{INDENT}{id},\n"));
    }
    out.push_str("};\n");
    out.push_str("const word kNumIntrinsicFunctions = ARRAYSIZE(kIntrinsicFunctions);\n\n");
    out.push_str(NAMESPACE_CLOSE);
    out
}

fn render_frozen_modules_cpp(modules: &[&ModuleRecord]) -> String {
    let mut out = includes(&[FROZEN_MODULES_H]);
    out.push_str(&includes(&[BUILTINS_H, "globals.h", "modules.h"]));
    out.push_str(NAMESPACE_OPEN);

    for module in modules {
        out.push_str(&format!(
            "\nstatic const byte kData_{}[] = {{\n",
            module_ident(&module.name)
        ));
        out.push_str(&byte_rows(&module.blob));
        out.push_str("};\n");
    }

    out.push_str("\nconst FrozenModule kFrozenModules[] = {\n");
    for module in modules {
        let data = format!("kData_{}", module_ident(&module.name));
        let init = if module.has_init_hook {
            init_hook_id(&module.name)
        } else {
            "nullptr".to_string()
        };
        out.push_str(&format!(
            "{INDENT}{{\"{}\", ARRAYSIZE({data}), {data}, {init}, {}}},\n",
            c_string_escape(&module.name),
            module.is_package
        ));
    }
    out.push_str("};\n");
    out.push_str("const word kNumFrozenModules = ARRAYSIZE(kFrozenModules);\n\n");
    out.push_str(NAMESPACE_CLOSE);
    out
}

fn render_frozen_modules_h() -> String {
    let mut out = includes(&["modules.h"]);
    out.push_str(NAMESPACE_OPEN);
    out.push_str("\nextern const FrozenModule kFrozenModules[];\n");
    out.push_str("extern const word kNumFrozenModules;\n\n");
    out.push_str(NAMESPACE_CLOSE);
    out
}

/// Array initializer rows, `0x%02x` entries with a trailing comma each.
fn byte_rows(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 6 + 8);
    for row in bytes.chunks(BYTES_PER_LINE) {
        let cells: Vec<String> = row.iter().map(|b| format!("0x{b:02x},")).collect();
        out.push_str(INDENT);
        out.push_str(&cells.join(" "));
        out.push('\n');
    }
    out
}
