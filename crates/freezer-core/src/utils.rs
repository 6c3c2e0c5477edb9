/// Convert a dotted module name into a C identifier fragment.
///
/// # Examples
/// ```
/// use freezer_core::utils::module_ident;
/// assert_eq!(module_ident("_io"), "_io");
/// assert_eq!(module_ident("importlib._bootstrap"), "importlib__bootstrap");
/// ```
pub fn module_ident(name: &str) -> String {
    name.replace('.', "_")
}

/// Escape a string for use inside a C string literal.
///
/// # Examples
/// ```
/// use freezer_core::utils::c_string_escape;
/// assert_eq!(c_string_escape(r#"a"b\c"#), r#"a\"b\\c"#);
/// ```
pub fn c_string_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            c if c.is_ascii_control() => out.push_str(&format!("\\x{:02x}", c as u32)),
            c => out.push(c),
        }
    }
    out
}
