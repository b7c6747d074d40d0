//! Small text helpers shared by the CLI and services.

/// Index-page bucket for a display name: the first letter (upper-cased),
/// or `#` when the name has no letters.
pub fn sort_dir(name: &str) -> char {
    name.chars()
        .find(|c| c.is_ascii_alphabetic())
        .map(|c| c.to_ascii_uppercase())
        .unwrap_or('#')
}

/// Reduce a display name to a record-key-safe slug: alphanumerics kept,
/// everything else collapsed into single underscores. Case is preserved.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_sep = false;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_sep && !slug.is_empty() {
                slug.push('_');
            }
            pending_sep = false;
            slug.push(c);
        } else {
            pending_sep = true;
        }
    }
    slug
}

/// Upper-case the first character, leaving the rest untouched.
pub fn capfirst(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn sort_dir_buckets() {
        assert_eq!(sort_dir("batman"), 'B');
        assert_eq!(sort_dir("  zatanna"), 'Z');
        assert_eq!(sort_dir("4-D Man"), 'D');
        assert_eq!(sort_dir("52"), '#');
        assert_eq!(sort_dir(""), '#');
    }

    #[test]
    fn slugify_collapses_separators() {
        assert_eq!(slugify("The Long Halloween"), "The_Long_Halloween");
        assert_eq!(slugify("  a -- b  "), "a_b");
        assert_eq!(slugify("Vol. 2"), "Vol_2");
        assert_eq!(slugify(""), "");
    }

    #[test]
    fn capfirst_basic() {
        assert_eq!(capfirst("penciller"), "Penciller");
        assert_eq!(capfirst(""), "");
    }
}
