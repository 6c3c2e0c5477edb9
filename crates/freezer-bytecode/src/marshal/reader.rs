//! Marshal reader.

use super::long;
use crate::format::{FLAG_REF, TypeCode};

/// A decoded marshal value.
#[derive(Debug, Clone, PartialEq)]
pub enum WireValue {
    None,
    Ellipsis,
    Bool(bool),
    Int(i64),
    /// Integer outside the `i64` range, in decimal.
    BigInt(String),
    Float(f64),
    Complex(f64, f64),
    Str(String),
    Bytes(Vec<u8>),
    Tuple(Vec<WireValue>),
    FrozenSet(Vec<WireValue>),
    Code(Box<WireCode>),
}

/// A code object exactly as laid out in the serialized form.
#[derive(Debug, Clone, PartialEq)]
pub struct WireCode {
    pub argcount: i32,
    pub posonlyargcount: i32,
    pub kwonlyargcount: i32,
    pub nlocals: i32,
    pub stacksize: i32,
    pub flags: u32,
    pub code: Vec<u8>,
    pub consts: Vec<WireValue>,
    pub names: Vec<String>,
    pub varnames: Vec<String>,
    pub freevars: Vec<String>,
    pub cellvars: Vec<String>,
    pub filename: String,
    pub name: String,
    pub firstlineno: i32,
    pub lnotab: Vec<u8>,
}

impl WireCode {
    /// Code objects nested directly in the constants.
    pub fn children(&self) -> impl Iterator<Item = &WireCode> {
        self.consts.iter().filter_map(|c| match c {
            WireValue::Code(code) => Some(code.as_ref()),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReadError {
    #[error("unexpected end of data at offset {0}")]
    UnexpectedEof(usize),

    #[error("unknown type code {code:#04x} at offset {offset}")]
    UnknownType { code: u8, offset: usize },

    #[error("expected {expected} at offset {offset}")]
    UnexpectedType {
        expected: &'static str,
        offset: usize,
    },

    #[error("invalid UTF-8 string at offset {0}")]
    InvalidUtf8(usize),

    #[error("negative length at offset {0}")]
    NegativeLength(usize),

    #[error("reference {index} at offset {offset} is undefined")]
    BadRef { index: usize, offset: usize },

    #[error("{0} trailing bytes after code object")]
    TrailingBytes(usize),
}

/// Decode a blob holding exactly one code object.
pub fn read_code(data: &[u8]) -> Result<WireCode, ReadError> {
    let mut r = Reader {
        data,
        pos: 0,
        refs: Vec::new(),
    };
    let offset = r.pos;
    let code = match r.value()? {
        WireValue::Code(code) => *code,
        _ => {
            return Err(ReadError::UnexpectedType {
                expected: "code object",
                offset,
            });
        }
    };
    let rest = data.len() - r.pos;
    if rest != 0 {
        return Err(ReadError::TrailingBytes(rest));
    }
    Ok(code)
}

struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
    refs: Vec<WireValue>,
}

impl<'a> Reader<'a> {
    fn take(&mut self, n: usize) -> Result<&'a [u8], ReadError> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|&end| end <= self.data.len())
            .ok_or(ReadError::UnexpectedEof(self.pos))?;
        let slice = &self.data[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn u8(&mut self) -> Result<u8, ReadError> {
        Ok(self.take(1)?[0])
    }

    fn i32(&mut self) -> Result<i32, ReadError> {
        let b = self.take(4)?;
        Ok(i32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn f64(&mut self) -> Result<f64, ReadError> {
        let b = self.take(8)?;
        let mut buf = [0u8; 8];
        buf.copy_from_slice(b);
        Ok(f64::from_le_bytes(buf))
    }

    fn len(&mut self) -> Result<usize, ReadError> {
        let offset = self.pos;
        let n = self.i32()?;
        usize::try_from(n).map_err(|_| ReadError::NegativeLength(offset))
    }

    fn utf8(&mut self, n: usize) -> Result<String, ReadError> {
        let offset = self.pos;
        let bytes = self.take(n)?;
        String::from_utf8(bytes.to_vec()).map_err(|_| ReadError::InvalidUtf8(offset))
    }

    fn value(&mut self) -> Result<WireValue, ReadError> {
        let offset = self.pos;
        let raw = self.u8()?;
        let flagged = raw & FLAG_REF != 0;
        let code = TypeCode::from_byte(raw & !FLAG_REF).ok_or(ReadError::UnknownType {
            code: raw,
            offset,
        })?;

        if code == TypeCode::Ref {
            let index = self.len()?;
            return self
                .refs
                .get(index)
                .cloned()
                .ok_or(ReadError::BadRef { index, offset });
        }

        // Reserve the slot before reading children so indices match the
        // writer's numbering.
        let slot = flagged.then(|| {
            self.refs.push(WireValue::None);
            self.refs.len() - 1
        });

        let value = match code {
            TypeCode::None => WireValue::None,
            TypeCode::Ellipsis => WireValue::Ellipsis,
            TypeCode::True => WireValue::Bool(true),
            TypeCode::False => WireValue::Bool(false),
            TypeCode::Int => WireValue::Int(self.i32()? as i64),
            TypeCode::Long => self.long()?,
            TypeCode::BinaryFloat => WireValue::Float(self.f64()?),
            TypeCode::BinaryComplex => {
                let re = self.f64()?;
                WireValue::Complex(re, self.f64()?)
            }
            TypeCode::String => {
                let n = self.len()?;
                WireValue::Bytes(self.take(n)?.to_vec())
            }
            TypeCode::Unicode | TypeCode::Interned | TypeCode::Ascii | TypeCode::AsciiInterned => {
                let n = self.len()?;
                WireValue::Str(self.utf8(n)?)
            }
            TypeCode::ShortAscii | TypeCode::ShortAsciiInterned => {
                let n = self.u8()? as usize;
                WireValue::Str(self.utf8(n)?)
            }
            TypeCode::SmallTuple => {
                let n = self.u8()? as usize;
                WireValue::Tuple(self.values(n)?)
            }
            TypeCode::Tuple => {
                let n = self.len()?;
                WireValue::Tuple(self.values(n)?)
            }
            TypeCode::FrozenSet => {
                let n = self.len()?;
                WireValue::FrozenSet(self.values(n)?)
            }
            TypeCode::Code => WireValue::Code(Box::new(self.code()?)),
            TypeCode::Ref => unreachable!("handled above"),
        };

        if let Some(slot) = slot {
            self.refs[slot] = value.clone();
        }
        Ok(value)
    }

    fn values(&mut self, n: usize) -> Result<Vec<WireValue>, ReadError> {
        (0..n).map(|_| self.value()).collect()
    }

    fn long(&mut self) -> Result<WireValue, ReadError> {
        let count = self.i32()?;
        let mut digits = Vec::new();
        for _ in 0..count.unsigned_abs() {
            let b = self.take(2)?;
            digits.push(u16::from_le_bytes([b[0], b[1]]));
        }
        let negative = count < 0;
        Ok(match long::to_i64(&digits, negative) {
            Some(i) => WireValue::Int(i),
            None => {
                let sign = if negative { "-" } else { "" };
                WireValue::BigInt(format!("{sign}{}", long::to_decimal(&digits)))
            }
        })
    }

    fn bytes_field(&mut self) -> Result<Vec<u8>, ReadError> {
        let offset = self.pos;
        match self.value()? {
            WireValue::Bytes(b) => Ok(b),
            _ => Err(ReadError::UnexpectedType {
                expected: "bytes",
                offset,
            }),
        }
    }

    fn str_field(&mut self) -> Result<String, ReadError> {
        let offset = self.pos;
        match self.value()? {
            WireValue::Str(s) => Ok(s),
            _ => Err(ReadError::UnexpectedType {
                expected: "string",
                offset,
            }),
        }
    }

    fn tuple_field(&mut self) -> Result<Vec<WireValue>, ReadError> {
        let offset = self.pos;
        match self.value()? {
            WireValue::Tuple(items) => Ok(items),
            _ => Err(ReadError::UnexpectedType {
                expected: "tuple",
                offset,
            }),
        }
    }

    fn str_tuple_field(&mut self) -> Result<Vec<String>, ReadError> {
        let offset = self.pos;
        self.tuple_field()?
            .into_iter()
            .map(|item| match item {
                WireValue::Str(s) => Ok(s),
                _ => Err(ReadError::UnexpectedType {
                    expected: "tuple of strings",
                    offset,
                }),
            })
            .collect()
    }

    fn code(&mut self) -> Result<WireCode, ReadError> {
        Ok(WireCode {
            argcount: self.i32()?,
            posonlyargcount: self.i32()?,
            kwonlyargcount: self.i32()?,
            nlocals: self.i32()?,
            stacksize: self.i32()?,
            flags: self.i32()? as u32,
            code: self.bytes_field()?,
            consts: self.tuple_field()?,
            names: self.str_tuple_field()?,
            varnames: self.str_tuple_field()?,
            freevars: self.str_tuple_field()?,
            cellvars: self.str_tuple_field()?,
            filename: self.str_field()?,
            name: self.str_field()?,
            firstlineno: self.i32()?,
            lnotab: self.bytes_field()?,
        })
    }
}
