//! Tool-name slugs and the checks on names that end up in paths

use crate::StoreError;

/// Normalize a tool name into a filesystem slug
///
/// Lowercases, then replaces spaces and hyphens with underscores. Nothing
/// else is touched, so "Lang Chain" and "lang-chain" share a slug but
/// "LangChain" does not.
pub fn slugify(tool_name: &str) -> String {
    tool_name.to_lowercase().replace([' ', '-'], "_")
}

/// Slug of `tool_name`, rejected if it would not stay a single path component
pub fn safe_slug(tool_name: &str) -> Result<String, StoreError> {
    let slug = slugify(tool_name);
    validate_component(&slug)?;
    Ok(slug)
}

/// Reject names that are empty, contain a path separator, or are `.`/`..`
///
/// Applied to filenames, tool slugs and user ids before they are joined
/// onto a store directory.
pub fn validate_component(name: &str) -> Result<(), StoreError> {
    let reason = if name.trim().is_empty() {
        Some("name is empty")
    } else if name.contains(['/', '\\']) {
        Some("name must not contain path separators")
    } else if name == "." || name == ".." {
        Some("name must not be a relative directory")
    } else if name.contains('\0') {
        Some("name must not contain NUL")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(StoreError::InvalidFilename {
            name: name.to_string(),
            reason,
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_slugify_examples() {
        assert_eq!(slugify("FastAPI"), "fastapi");
        assert_eq!(slugify("Lang Chain"), "lang_chain");
        assert_eq!(slugify("lang-chain"), "lang_chain");
        assert_eq!(slugify("LangChain"), "langchain");
    }

    #[test]
    fn test_slugify_keeps_other_characters() {
        assert_eq!(slugify("Node.js"), "node.js");
        assert_eq!(slugify("C++ basics"), "c++_basics");
    }

    #[test]
    fn test_safe_slug_rejects_path_like_names() {
        for name in ["../../x", "a/b", "..\\evil", "..", ".", "", "   "] {
            assert!(
                matches!(safe_slug(name), Err(StoreError::InvalidFilename { .. })),
                "expected rejection for {:?}",
                name
            );
        }
        assert_eq!(safe_slug("Node.js").unwrap(), "node.js");
        assert_eq!(safe_slug("..hidden").unwrap(), "..hidden");
    }

    #[test]
    fn test_validate_component_reason() {
        let err = validate_component("../u").unwrap_err();
        assert!(err.to_string().contains("path separators"));
        assert!(err.is_caller_error());
    }

    proptest! {
        #[test]
        fn prop_slug_has_no_spaces_hyphens_or_uppercase(name in "[A-Za-z0-9 _-]{0,32}") {
            let slug = slugify(&name);
            prop_assert!(!slug.contains(' '));
            prop_assert!(!slug.contains('-'));
            prop_assert!(!slug.chars().any(|c| c.is_ascii_uppercase()));
            prop_assert_eq!(slug.len(), name.len());
        }

        #[test]
        fn prop_slug_is_idempotent(name in "[A-Za-z0-9 ._+-]{0,32}") {
            let once = slugify(&name);
            prop_assert_eq!(slugify(&once), once);
        }

        #[test]
        fn prop_space_and_hyphen_spellings_agree(words in prop::collection::vec("[a-zA-Z]{1,8}", 1..4)) {
            let spaced = words.join(" ");
            let hyphenated = words.join("-");
            prop_assert_eq!(slugify(&spaced), slugify(&hyphenated));
        }
    }
}
