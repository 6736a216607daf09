//! Column sensitivity classification.

use shroud_core::Tag;

/// Tag names that mark a column as privacy-sensitive. Matched exactly.
pub const SENSITIVE_TAGS: [&str; 2] = ["PII", "Sensitive"];

/// True iff at least one tag is exactly `PII` or `Sensitive`.
pub fn is_sensitive(tags: &[Tag]) -> bool {
    tags.iter()
        .filter_map(|t| t.tag_fqn.as_deref())
        .any(|fqn| SENSITIVE_TAGS.contains(&fqn))
}
