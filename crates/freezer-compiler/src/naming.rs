//! Dispatch table identifiers.
//!
//! Identifiers are macro invocations the native side defines:
//! - `FUNC(module, name)` for a function at module scope
//! - `METH(class, name)` for a method one level inside a class body; the
//!   module is not part of a method identifier
//!
//! Intrinsic identifiers use the same forms with an `_intrinsic` suffix on
//! the function name, so they never collide with builtin identifiers.

use freezer_core::INIT_MODULE_NAME;
use freezer_core::utils::module_ident;

use crate::{Error, Result};

const INTRINSIC_SUFFIX: &str = "_intrinsic";

/// Identifier of the builtin function for a stub at `path` in `module`.
pub fn builtin_id<S: AsRef<str>>(module: &str, path: &[S]) -> Result<String> {
    native_id(module, path, "")
}

/// Identifier of the intrinsic for a tagged function at `path` in `module`.
pub fn intrinsic_id<S: AsRef<str>>(module: &str, path: &[S]) -> Result<String> {
    native_id(module, path, INTRINSIC_SUFFIX)
}

/// Identifier of the native initializer of `module`.
pub fn init_hook_id(module: &str) -> String {
    format!("FUNC({}, {INIT_MODULE_NAME})", module_ident(module))
}

fn native_id<S: AsRef<str>>(module: &str, path: &[S], suffix: &str) -> Result<String> {
    match path {
        [function] => Ok(format!(
            "FUNC({}, {}{suffix})",
            module_ident(module),
            function.as_ref()
        )),
        [class, method] => Ok(format!("METH({}, {}{suffix})", class.as_ref(), method.as_ref())),
        _ => Err(Error::UnsupportedNesting {
            module: module.to_string(),
            path: display_path(path),
        }),
    }
}

/// Dotted form of a qualified path, `<module>` for the module body itself.
pub fn display_path<S: AsRef<str>>(path: &[S]) -> String {
    if path.is_empty() {
        return freezer_core::MODULE_CODE_NAME.to_string();
    }
    path.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(".")
}
