/// Canonicalize a class label into a comparable key
///
/// Normalization rules:
/// - Convert to lowercase
/// - Remove all whitespace (including whitespace inside the label)
///
/// Absent or empty labels normalize to the empty string. The function is
/// idempotent, so already-normalized keys can be passed through again.
pub fn normalize_class_key(label: Option<&str>) -> String {
    match label {
        Some(label) => label
            .chars()
            .filter(|c| !c.is_whitespace())
            .flat_map(char::to_lowercase)
            .collect(),
        None => String::new(),
    }
}

/// Whether a printed class label matches an already-normalized key.
pub fn class_matches(label: &str, normalized_key: &str) -> bool {
    normalize_class_key(Some(label)) == normalized_key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_and_whitespace_insensitive() {
        assert_eq!(
            normalize_class_key(Some("6ABC ")),
            normalize_class_key(Some("6abc"))
        );
        assert_eq!(normalize_class_key(Some(" J 12\t")), "j12");
    }

    #[test]
    fn test_idempotent() {
        for label in ["6abcd", " 7 B ", "J12", "", "Kl. 10A"] {
            let once = normalize_class_key(Some(label));
            assert_eq!(normalize_class_key(Some(&once)), once);
        }
    }

    #[test]
    fn test_absent_label_is_empty() {
        assert_eq!(normalize_class_key(None), "");
        assert_eq!(normalize_class_key(Some("   ")), "");
    }

    #[test]
    fn test_class_matches() {
        assert!(class_matches("6abcd", "6abcd"));
        assert!(class_matches("6 ABCD", "6abcd"));
        assert!(!class_matches("6abc", "6abcd"));
    }
}
