//! Shared string helpers for naming generated artifacts.

/// Adjust the case of the first character of `name`.
///
/// With `pascal_case` the first character is upper-cased ("userName" -> "UserName"),
/// otherwise it is lower-cased ("UserName" -> "userName"). The rest of the name is
/// kept as-is.
pub fn to_identifier(name: &str, pascal_case: bool) -> String {
    let mut chars = name.chars();
    match chars.next() {
        None => String::new(),
        Some(c) if pascal_case => c.to_uppercase().chain(chars).collect(),
        Some(c) => c.to_lowercase().chain(chars).collect(),
    }
}

/// Remove a generic arity suffix such as the "`2" in "Dictionary`2".
pub fn strip_generic_arity(name: &str) -> &str {
    match name.find('`') {
        Some(idx) => &name[..idx],
        None => name,
    }
}

/// Turn a display type name into something usable as a file stem.
///
/// Angle brackets are not portable in file names: "Result<User>" becomes "Result{User}".
pub fn safe_file_stem(type_name: &str) -> String {
    type_name
        .chars()
        .map(|c| match c {
            '<' => '{',
            '>' => '}',
            c => c,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_identifier() {
        assert_eq!(to_identifier("UserName", false), "userName");
        assert_eq!(to_identifier("userName", true), "UserName");
        assert_eq!(to_identifier("x", true), "X");
        assert_eq!(to_identifier("", true), "");
    }

    #[test]
    fn test_strip_generic_arity() {
        assert_eq!(strip_generic_arity("Dictionary`2"), "Dictionary");
        assert_eq!(strip_generic_arity("User"), "User");
    }

    #[test]
    fn test_safe_file_stem() {
        assert_eq!(safe_file_stem("Result<User>"), "Result{User}");
        assert_eq!(safe_file_stem("Map<A,B<C>>"), "Map{A,B{C}}");
        assert_eq!(safe_file_stem("Plain"), "Plain");
    }
}
