//! Query-string values used by the recipe list filters.

/// Parse a boolean filter flag. Accepts `1`/`0` and `true`/`false`;
/// anything else means "no filter".
pub fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" => Some(true),
        "0" | "false" => Some(false),
        _ => None,
    }
}

/// Sort order for recipe listings.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum RecipeOrdering {
    /// Newest first
    #[default]
    PubDateDesc,
    PubDateAsc,
    NameAsc,
    NameDesc,
}

impl RecipeOrdering {
    /// Parse an `ordering` parameter (`name`, `-name`, `pub_date`, `-pub_date`).
    /// Unknown values fall back to the default order.
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("pub_date") => Self::PubDateAsc,
            Some("-pub_date") => Self::PubDateDesc,
            Some("name") => Self::NameAsc,
            Some("-name") => Self::NameDesc,
            _ => Self::default(),
        }
    }
}

/// Escape `%`, `_` and `\` so user input matches literally inside LIKE patterns.
pub fn escape_like(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Case-insensitive "contains" pattern for a search term, to be matched
/// against `LOWER(column)`. Blank terms mean no filter.
pub fn contains_pattern(term: &str) -> Option<String> {
    let term = term.trim();
    if term.is_empty() {
        return None;
    }
    Some(format!("%{}%", escape_like(&term.to_lowercase())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("1"), Some(true));
        assert_eq!(parse_flag("true"), Some(true));
        assert_eq!(parse_flag("0"), Some(false));
        assert_eq!(parse_flag("False"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
        assert_eq!(parse_flag(""), None);
    }

    #[test]
    fn test_ordering_parse() {
        assert_eq!(RecipeOrdering::parse(None), RecipeOrdering::PubDateDesc);
        assert_eq!(RecipeOrdering::parse(Some("name")), RecipeOrdering::NameAsc);
        assert_eq!(RecipeOrdering::parse(Some("-name")), RecipeOrdering::NameDesc);
        assert_eq!(
            RecipeOrdering::parse(Some("pub_date")),
            RecipeOrdering::PubDateAsc
        );
        assert_eq!(
            RecipeOrdering::parse(Some("cooking_time")),
            RecipeOrdering::PubDateDesc
        );
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("100%_done"), "100\\%\\_done");
        assert_eq!(escape_like("plain"), "plain");
    }

    #[test]
    fn test_contains_pattern() {
        assert_eq!(contains_pattern(" Sugar "), Some("%sugar%".to_string()));
        assert_eq!(contains_pattern("50%"), Some("%50\\%%".to_string()));
        assert_eq!(contains_pattern("   "), None);
    }
}
