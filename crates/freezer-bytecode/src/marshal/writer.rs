//! Marshal writer.

use freezer_core::{CodeObject, Constant};

use super::{Serializer, long};
use crate::format::{FORMAT_MARKER, TypeCode};

/// Marshal writer for [`FORMAT_MARKER`].
///
/// Values are written without reference flags, so equal constants are
/// written out in full each time they occur.
#[derive(Clone, Copy, Debug, Default)]
pub struct Marshal;

impl Serializer for Marshal {
    fn format_marker(&self) -> [u8; 2] {
        FORMAT_MARKER
    }

    fn serialize(&self, code: &CodeObject) -> Vec<u8> {
        let mut w = Writer::default();
        w.code(code);
        w.out
    }
}

#[derive(Default)]
struct Writer {
    out: Vec<u8>,
}

impl Writer {
    fn type_code(&mut self, code: TypeCode) {
        self.out.push(code as u8);
    }

    fn u8(&mut self, b: u8) {
        self.out.push(b);
    }

    fn i32(&mut self, v: i32) {
        self.out.extend_from_slice(&v.to_le_bytes());
    }

    fn len(&mut self, n: usize) {
        // Marshal lengths are signed 32-bit; code objects never get near.
        self.i32(n as i32);
    }

    fn f64(&mut self, v: f64) {
        self.out.extend_from_slice(&v.to_le_bytes());
    }

    fn constant(&mut self, c: &Constant) {
        match c {
            Constant::None => self.type_code(TypeCode::None),
            Constant::Ellipsis => self.type_code(TypeCode::Ellipsis),
            Constant::Bool(true) => self.type_code(TypeCode::True),
            Constant::Bool(false) => self.type_code(TypeCode::False),
            Constant::Int(i) => self.int(*i),
            Constant::BigInt(text) => {
                let (negative, decimal) = match text.strip_prefix('-') {
                    Some(rest) => (true, rest),
                    None => (false, text.as_str()),
                };
                self.long(negative, &long::from_decimal(decimal));
            }
            Constant::Float(f) => {
                self.type_code(TypeCode::BinaryFloat);
                self.f64(*f);
            }
            Constant::Complex { re, im } => {
                self.type_code(TypeCode::BinaryComplex);
                self.f64(*re);
                self.f64(*im);
            }
            Constant::Str(s) => self.str(s),
            Constant::Bytes(b) => self.bytes(b),
            Constant::Tuple(items) => self.tuple(items.len(), items.iter(), Self::constant),
            Constant::FrozenSet(items) => {
                self.type_code(TypeCode::FrozenSet);
                self.len(items.len());
                for item in items {
                    self.constant(item);
                }
            }
            Constant::Code(code) => self.code(code),
        }
    }

    fn int(&mut self, i: i64) {
        if let Ok(small) = i32::try_from(i) {
            self.type_code(TypeCode::Int);
            self.i32(small);
            return;
        }

        self.long(i < 0, &long::from_u64(i.unsigned_abs()));
    }

    fn long(&mut self, negative: bool, digits: &[u16]) {
        self.type_code(TypeCode::Long);
        let count = digits.len() as i32;
        self.i32(if negative { -count } else { count });
        for digit in digits {
            self.out.extend_from_slice(&digit.to_le_bytes());
        }
    }

    fn str(&mut self, s: &str) {
        if s.is_ascii() {
            if s.len() < 256 {
                self.type_code(TypeCode::ShortAscii);
                self.u8(s.len() as u8);
            } else {
                self.type_code(TypeCode::Ascii);
                self.len(s.len());
            }
        } else {
            self.type_code(TypeCode::Unicode);
            self.len(s.len());
        }
        self.out.extend_from_slice(s.as_bytes());
    }

    fn bytes(&mut self, b: &[u8]) {
        self.type_code(TypeCode::String);
        self.len(b.len());
        self.out.extend_from_slice(b);
    }

    fn tuple<'a, T: 'a>(
        &mut self,
        len: usize,
        items: impl Iterator<Item = &'a T>,
        mut write: impl FnMut(&mut Self, &T),
    ) {
        if len < 256 {
            self.type_code(TypeCode::SmallTuple);
            self.u8(len as u8);
        } else {
            self.type_code(TypeCode::Tuple);
            self.len(len);
        }
        for item in items {
            write(self, item);
        }
    }

    fn str_tuple(&mut self, items: &[String]) {
        self.tuple(items.len(), items.iter(), |w, s| w.str(s));
    }

    fn code(&mut self, code: &CodeObject) {
        self.type_code(TypeCode::Code);
        self.i32(code.argcount as i32);
        self.i32(code.posonlyargcount as i32);
        self.i32(code.kwonlyargcount as i32);
        self.i32(code.nlocals as i32);
        self.i32(code.wire_stack_size() as i32);
        self.i32(code.wire_flags().bits() as i32);

        let consts = code.wire_constants();
        match code.interpreted() {
            Some(body) => {
                self.bytes(&body.instructions);
                self.tuple(consts.len(), consts.iter(), Self::constant);
                self.str_tuple(&body.names);
                self.str_tuple(&code.varnames);
                self.str_tuple(&body.free_vars);
                self.str_tuple(&body.cell_vars);
                self.str(&body.location.filename);
                self.str(&code.name);
                self.i32(body.location.first_line as i32);
                self.bytes(&body.location.line_table);
            }
            None => {
                self.bytes(&[]);
                self.tuple(consts.len(), consts.iter(), Self::constant);
                self.str_tuple(&[]);
                self.str_tuple(&code.varnames);
                self.str_tuple(&[]);
                self.str_tuple(&[]);
                self.str("");
                self.str(&code.name);
                self.i32(0);
                self.bytes(&[]);
            }
        }
    }
}
