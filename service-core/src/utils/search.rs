//! Substring search helpers for the small in-memory directories.

pub const DEFAULT_LIMIT: usize = 20;
pub const MAX_LIMIT: usize = 100;

/// Normalize a caller-supplied page limit.
pub fn clamp_limit(limit: Option<usize>) -> usize {
    limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
}

/// Case-insensitive substring match of `query` against any of `fields`.
///
/// A missing or blank query matches everything.
pub fn matches_query(query: Option<&str>, fields: &[&str]) -> bool {
    let needle = match query.map(str::trim) {
        Some(q) if !q.is_empty() => q.to_lowercase(),
        _ => return true,
    };

    fields
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_query_matches_everything() {
        assert!(matches_query(None, &["Ravi Kumar"]));
        assert!(matches_query(Some("   "), &["Ravi Kumar"]));
    }

    #[test]
    fn match_is_case_insensitive_substring() {
        assert!(matches_query(Some("kum"), &["Ravi Kumar"]));
        assert!(matches_query(Some("UHID-0002"), &["x", "uhid-00021"]));
        assert!(!matches_query(Some("sharma"), &["Ravi Kumar", "9876543210"]));
    }

    #[test]
    fn limit_is_clamped() {
        assert_eq!(clamp_limit(None), DEFAULT_LIMIT);
        assert_eq!(clamp_limit(Some(0)), 1);
        assert_eq!(clamp_limit(Some(5000)), MAX_LIMIT);
    }
}
