//! Identifier helpers.

/// Converts a field name to `snake_case`.
///
/// The first character is lowercased. Every later uppercase letter becomes
/// `_` plus its lowercase form, and any character that is neither a letter
/// nor a digit becomes `_`.
pub fn field_name_to_snake(name: &str) -> String {
    let mut rv = String::with_capacity(name.len() + 4);
    for (idx, c) in name.chars().enumerate() {
        if idx == 0 {
            rv.extend(c.to_lowercase());
        } else if c.is_uppercase() {
            rv.push('_');
            rv.extend(c.to_lowercase());
        } else if c.is_lowercase() || c.is_numeric() {
            rv.push(c);
        } else {
            rv.push('_');
        }
    }
    rv
}
