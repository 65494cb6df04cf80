//! Path hygiene for configured directory values

/// Strip surrounding whitespace and trailing separators from a configured
/// path.
///
/// Configured roots arrive from hand-edited files; a trailing slash or a
/// stray space would otherwise leak into every joined path and into group
/// fingerprints.
pub fn sanitize_path(path: &str) -> String {
    path.trim().trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_whitespace() {
        assert_eq!(sanitize_path(" /extra/whitespace "), "/extra/whitespace");
    }

    #[test]
    fn test_strips_trailing_slash() {
        assert_eq!(sanitize_path("/dir/with/trailing/slash/"), "/dir/with/trailing/slash");
    }

    #[test]
    fn test_strips_both() {
        assert_eq!(
            sanitize_path("  /dir/with/trailing/slash/and/whitespace/   "),
            "/dir/with/trailing/slash/and/whitespace"
        );
    }

    #[test]
    fn test_strips_repeated_trailing_slashes() {
        assert_eq!(
            sanitize_path("  /dir/with/many/trailing/slashes////   "),
            "/dir/with/many/trailing/slashes"
        );
    }

    #[test]
    fn test_clean_path_unchanged() {
        assert_eq!(sanitize_path("/already/clean"), "/already/clean");
    }
}
