use crate::utils::{c_string_escape, module_ident};

#[test]
fn module_ident_replaces_dots() {
    assert_eq!(module_ident("builtins"), "builtins");
    assert_eq!(module_ident("a.b.c"), "a_b_c");
}

#[test]
fn c_string_escape_plain() {
    assert_eq!(c_string_escape("importlib._bootstrap"), "importlib._bootstrap");
}

#[test]
fn c_string_escape_specials() {
    assert_eq!(c_string_escape("a\nb"), "a\\nb");
    assert_eq!(c_string_escape("\t"), "\\x09");
}
