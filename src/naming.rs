//! Naming-convention fallbacks for relation resolution.
//!
//! When a relation hop carries no declared alias, the engine assumes the hop
//! name equals the entity name with its first letter capitalized, and relation
//! keys default to the entity name with its first letter lowered. Both
//! conventions live here rather than inline at each call site.

/// Returns the string with its first letter upper-cased.
pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Returns the string with its first letter lower-cased.
pub fn lower_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capitalize_first() {
        assert_eq!(capitalize_first("author"), "Author");
        assert_eq!(capitalize_first("Author"), "Author");
        assert_eq!(capitalize_first(""), "");
    }

    #[test]
    fn test_lower_first() {
        assert_eq!(lower_first("Author"), "author");
        assert_eq!(lower_first("author"), "author");
        assert_eq!(lower_first(""), "");
    }
}
