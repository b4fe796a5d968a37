//! Storage key namespaces.
//!
//! Keys are split into auto-invalidated and manual entries, each with an
//! optional tag sub-namespace:
//!
//! | auto | tag | storage key                              |
//! |------|-----|------------------------------------------|
//! | yes  | no  | `__qcache__:auto:<key>`                  |
//! | yes  | yes | `__qcache__:auto:__qcache__:tag:<key>`   |
//! | no   | no  | `__qcache__:manual:<key>`                |
//! | no   | yes | `__qcache__:manual:__qcache__:tag:<key>` |
//!
//! Logical keys are not validated. A logical key that itself starts with
//! [`NAMESPACE_ROOT`] can collide with another namespace.

/// Common root of every reserved prefix.
pub const NAMESPACE_ROOT: &str = "__qcache__:";

/// Prefix for entries removed by bulk invalidation.
pub const AUTO_PREFIX: &str = "__qcache__:auto:";

/// Prefix for entries only removed by expiry or explicit delete.
pub const MANUAL_PREFIX: &str = "__qcache__:manual:";

/// Prefix for tag-index entries, nested under the auto/manual prefix.
pub const TAG_PREFIX: &str = "__qcache__:tag:";

/// Build the storage key for a logical key.
pub fn build_key(key: &str, is_tag: bool, auto_invalidate: bool) -> String {
    let auto_prefix = if auto_invalidate { AUTO_PREFIX } else { MANUAL_PREFIX };
    let tag_prefix = if is_tag { TAG_PREFIX } else { "" };
    format!("{auto_prefix}{tag_prefix}{key}")
}

/// Whether a key lives inside one of the reserved namespaces.
pub fn is_reserved(key: &str) -> bool {
    key.starts_with(NAMESPACE_ROOT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    #[test]
    fn test_build_key_layout() {
        assert_eq!(build_key("users", false, true), "__qcache__:auto:users");
        assert_eq!(build_key("users", true, true), "__qcache__:auto:__qcache__:tag:users");
        assert_eq!(build_key("users", false, false), "__qcache__:manual:users");
        assert_eq!(build_key("users", true, false), "__qcache__:manual:__qcache__:tag:users");
    }

    #[test]
    fn test_build_key_deterministic() {
        assert_eq!(build_key("q", true, false), build_key("q", true, false));
    }

    #[test]
    fn test_auto_keys_share_auto_prefix() {
        assert!(build_key("x", false, true).starts_with(AUTO_PREFIX));
        assert!(build_key("x", true, true).starts_with(AUTO_PREFIX));
        assert!(!build_key("x", false, false).starts_with(AUTO_PREFIX));
        assert!(!build_key("x", true, false).starts_with(AUTO_PREFIX));
    }

    #[test]
    fn test_is_reserved() {
        assert!(is_reserved(&build_key("x", false, false)));
        assert!(!is_reserved("bookmarks:page:1"));
    }

    proptest! {
        #[test]
        fn prop_namespaces_disjoint(key in ".*") {
            prop_assume!(!is_reserved(&key));
            let keys: HashSet<String> = [(false, false), (false, true), (true, false), (true, true)]
                .into_iter()
                .map(|(is_tag, auto)| build_key(&key, is_tag, auto))
                .collect();
            prop_assert_eq!(keys.len(), 4);
        }
    }
}
