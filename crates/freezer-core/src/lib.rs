#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core data structures for frozen module generation.
//!
//! Two layers:
//! - **Deserialization layer** (`raw`): 1:1 mapping to the JSON code records
//!   produced by an external compiler
//! - **Model layer** (`code`): typed code objects whose body is a tagged
//!   variant (interpreted, native stub, intrinsic)

mod code;
mod flags;
pub mod raw;
pub mod utils;

#[cfg(test)]
mod raw_tests;
#[cfg(test)]
mod utils_tests;

pub use code::{CodeBody, CodeObject, Constant, Interpreted, SourceLocation};
pub use flags::CodeFlags;
pub use raw::{RawCode, RawConstant, RawError, RawInt, parse_code};

/// Name of the module-level code object produced by the compiler.
pub const MODULE_CODE_NAME: &str = "<module>";

/// Global a native-delegate function calls and nothing else.
pub const PLACEHOLDER_CALL: &str = "_builtin";

/// Function name reserved for the native module initializer.
pub const INIT_MODULE_NAME: &str = "__init_module__";

/// Prefix of the leading string constant that tags a function as intrinsic.
pub const INTRINSIC_MARKER: &str = "$intrinsic$";

/// Source marker announcing a native module initializer.
pub const INIT_HOOK_MARKER: &str = "$builtin-init-module$";
