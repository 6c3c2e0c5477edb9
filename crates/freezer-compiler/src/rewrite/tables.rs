//! Builtin and intrinsic dispatch tables.

use std::fmt;

use indexmap::IndexSet;

use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    Builtin,
    Intrinsic,
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableKind::Builtin => f.write_str("builtin"),
            TableKind::Intrinsic => f.write_str("intrinsic"),
        }
    }
}

/// Append-only identifier tables filled while rewriting.
///
/// An identifier's index is its position at first append. Indices become
/// fixed offsets the native side agrees with, so entries are never reordered
/// or removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchTables {
    builtins: IndexSet<String>,
    intrinsics: IndexSet<String>,
}

impl DispatchTables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a builtin identifier and return its index.
    pub fn push_builtin(&mut self, identifier: String) -> Result<usize> {
        push(&mut self.builtins, TableKind::Builtin, identifier)
    }

    /// Append an intrinsic identifier and return its (unbiased) index.
    pub fn push_intrinsic(&mut self, identifier: String) -> Result<usize> {
        push(&mut self.intrinsics, TableKind::Intrinsic, identifier)
    }

    pub fn builtins(&self) -> impl ExactSizeIterator<Item = &str> {
        self.builtins.iter().map(String::as_str)
    }

    pub fn intrinsics(&self) -> impl ExactSizeIterator<Item = &str> {
        self.intrinsics.iter().map(String::as_str)
    }

    pub fn builtin_count(&self) -> usize {
        self.builtins.len()
    }

    pub fn intrinsic_count(&self) -> usize {
        self.intrinsics.len()
    }
}

fn push(table: &mut IndexSet<String>, kind: TableKind, identifier: String) -> Result<usize> {
    if table.contains(&identifier) {
        return Err(Error::DuplicateIdentifier {
            table: kind,
            identifier,
        });
    }
    let (index, _) = table.insert_full(identifier);
    Ok(index)
}
