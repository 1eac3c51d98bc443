use once_cell::sync::Lazy;
use regex::Regex;

static YEAR_SUFFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\((\d{4})\)$").unwrap());
static YEAR_SUFFIX_WITH_SPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*\(\d{4}\)$").unwrap());

/// Extract the release year from a title of the form "Movie Name (YYYY)".
/// Absence of a match is not an error.
pub fn extract_year(title: &str) -> Option<i32> {
    YEAR_SUFFIX
        .captures(title)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Remove a trailing "(YYYY)" suffix, with any preceding whitespace, from a
/// title. Titles without the suffix come back unchanged.
pub fn clean_title(title: &str) -> String {
    YEAR_SUFFIX_WITH_SPACE.replace(title, "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_year() {
        assert_eq!(extract_year("Toy Story (1995)"), Some(1995));
        assert_eq!(extract_year("Heat"), None);
        assert_eq!(extract_year("Blade Runner 2049 (2017)"), Some(2017));
    }

    #[test]
    fn test_extract_year_requires_trailing_parens() {
        // Year must be the suffix, not embedded mid-title
        assert_eq!(extract_year("(1995) Toy Story"), None);
        assert_eq!(extract_year("Movie (199)"), None);
    }

    #[test]
    fn test_clean_title() {
        assert_eq!(clean_title("Toy Story (1995)"), "Toy Story");
        assert_eq!(clean_title("Heat"), "Heat");
    }

    #[test]
    fn test_clean_title_is_idempotent() {
        let once = clean_title("Toy Story (1995)");
        assert_eq!(clean_title(&once), once);
    }
}
