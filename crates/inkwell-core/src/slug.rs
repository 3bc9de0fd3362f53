//! URL slug generation.
//!
//! Generated slugs are lowercase ASCII tokens of `[a-z0-9-]`. Slugs given
//! explicitly may also use uppercase letters and underscores. Collisions are
//! never resolved here; uniqueness is a storage constraint.

/// Map free text to a URL-safe slug. Non-ASCII letters are transliterated.
pub fn slugify(text: &str) -> String {
    ::slug::slugify(text)
}

/// Check that `slug` is non-empty and only uses `[-a-zA-Z0-9_]`.
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("  Rust & Web  "), "rust-web");
    }

    #[test]
    fn test_slugify_transliterates() {
        assert_eq!(slugify("Tiếng Việt"), "tieng-viet");
        assert_eq!(slugify("Crème Brûlée"), "creme-brulee");
    }

    #[test]
    fn test_slugify_is_deterministic() {
        assert_eq!(slugify("Same Input"), slugify("Same Input"));
    }

    #[test]
    fn test_slugify_output_is_valid() {
        for text in ["Hello, World!", "a  b", "Data Science 101", "__init__"] {
            let slug = slugify(text);
            assert!(is_valid_slug(&slug), "{slug:?} from {text:?}");
        }
    }

    #[test]
    fn test_is_valid_slug_accepts_hand_written() {
        assert!(is_valid_slug("My_Post"));
        assert!(is_valid_slug("release-2-0"));
        assert!(is_valid_slug("-draft-"));
    }

    #[test]
    fn test_is_valid_slug_rejects() {
        assert!(!is_valid_slug(""));
        assert!(!is_valid_slug("with space"));
        assert!(!is_valid_slug("a/b"));
        assert!(!is_valid_slug("café"));
    }
}
