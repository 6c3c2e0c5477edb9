//! Deserialization layer: JSON code records from an external compiler.
//!
//! Field names follow the compiler's code attributes with the `co_` prefix
//! dropped. Constants are adjacently tagged:
//!
//! ```json
//! {"type": "int", "value": 1}
//! {"type": "int", "value": 18446744073709551616}
//! {"type": "none"}
//! {"type": "code", "value": {"name": "f", "code": [116, 0, 131, 0]}}
//! ```

use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::code::{CodeBody, CodeObject, Constant, Interpreted, SourceLocation};
use crate::flags::CodeFlags;

/// Raw code record, exactly as emitted by the compiler.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawCode {
    pub name: String,
    #[serde(default)]
    pub argcount: u32,
    #[serde(default)]
    pub posonlyargcount: u32,
    #[serde(default)]
    pub kwonlyargcount: u32,
    #[serde(default)]
    pub nlocals: u32,
    #[serde(default)]
    pub stacksize: u32,
    #[serde(default)]
    pub flags: u32,
    #[serde(default)]
    pub code: Vec<u8>,
    #[serde(default)]
    pub consts: Vec<RawConstant>,
    #[serde(default)]
    pub names: Vec<String>,
    #[serde(default)]
    pub varnames: Vec<String>,
    #[serde(default)]
    pub freevars: Vec<String>,
    #[serde(default)]
    pub cellvars: Vec<String>,
    #[serde(default)]
    pub filename: String,
    #[serde(default)]
    pub firstlineno: u32,
    #[serde(default)]
    pub lnotab: Vec<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum RawConstant {
    None,
    Ellipsis,
    Bool(bool),
    Int(RawInt),
    Float(f64),
    Complex([f64; 2]),
    Str(String),
    Bytes(Vec<u8>),
    Tuple(Vec<RawConstant>),
    Frozenset(Vec<RawConstant>),
    Code(Box<RawCode>),
}

/// Integer constant of any size.
///
/// Folded constants can exceed 64 bits. They are read exactly, either as a
/// bare JSON number or as a decimal string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawInt {
    Small(i64),
    Big(String),
}

impl RawInt {
    /// Parse decimal text, normalizing values outside `i64` to no leading
    /// zeros.
    pub fn parse(text: &str) -> Option<Self> {
        if let Ok(i) = text.parse::<i64>() {
            return Some(Self::Small(i));
        }
        let (sign, digits) = match text.strip_prefix('-') {
            Some(rest) => ("-", rest),
            None => ("", text),
        };
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        Some(Self::Big(format!("{sign}{}", digits.trim_start_matches('0'))))
    }
}

impl<'de> Deserialize<'de> for RawInt {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        use serde::de::Error;

        let text = match serde_json::Value::deserialize(deserializer)? {
            serde_json::Value::Number(n) => n.to_string(),
            serde_json::Value::String(s) => s,
            other => {
                return Err(D::Error::custom(format!(
                    "expected an integer, found {other}"
                )));
            }
        };
        Self::parse(&text).ok_or_else(|| D::Error::custom(format!("invalid integer `{text}`")))
    }
}

impl Serialize for RawInt {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Small(i) => serializer.serialize_i64(*i),
            Self::Big(text) => serializer.serialize_str(text),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RawError {
    #[error("malformed code record: {0}")]
    Json(#[from] serde_json::Error),
}

/// Parse a JSON code record into a code object.
pub fn parse_code(json: &str) -> Result<CodeObject, RawError> {
    let raw: RawCode = serde_json::from_str(json)?;
    Ok(raw.into())
}

impl From<RawCode> for CodeObject {
    fn from(raw: RawCode) -> Self {
        let body = Interpreted {
            instructions: raw.code,
            constants: raw.consts.into_iter().map(Constant::from).collect(),
            names: raw.names,
            free_vars: raw.freevars,
            cell_vars: raw.cellvars,
            stack_depth: raw.stacksize,
            location: SourceLocation {
                filename: raw.filename,
                first_line: raw.firstlineno,
                line_table: raw.lnotab,
            },
        };
        CodeObject {
            name: raw.name,
            argcount: raw.argcount,
            posonlyargcount: raw.posonlyargcount,
            kwonlyargcount: raw.kwonlyargcount,
            nlocals: raw.nlocals,
            varnames: raw.varnames,
            flags: CodeFlags::from_bits_retain(raw.flags),
            body: CodeBody::Interpreted(body),
        }
    }
}

impl From<RawConstant> for Constant {
    fn from(raw: RawConstant) -> Self {
        match raw {
            RawConstant::None => Constant::None,
            RawConstant::Ellipsis => Constant::Ellipsis,
            RawConstant::Bool(b) => Constant::Bool(b),
            RawConstant::Int(RawInt::Small(i)) => Constant::Int(i),
            RawConstant::Int(RawInt::Big(text)) => Constant::BigInt(text),
            RawConstant::Float(f) => Constant::Float(f),
            RawConstant::Complex([re, im]) => Constant::Complex { re, im },
            RawConstant::Str(s) => Constant::Str(s),
            RawConstant::Bytes(b) => Constant::Bytes(b),
            RawConstant::Tuple(items) => {
                Constant::Tuple(items.into_iter().map(Constant::from).collect())
            }
            RawConstant::Frozenset(items) => {
                Constant::FrozenSet(items.into_iter().map(Constant::from).collect())
            }
            RawConstant::Code(code) => Constant::Code(Arc::new(CodeObject::from(*code))),
        }
    }
}
