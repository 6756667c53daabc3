/// Known spellings of the same country, mapped to one canonical name.
const COUNTRY_ALIASES: &[(&str, &str)] = &[
    ("USA", "United States"),
    ("US", "United States"),
    ("United States of America", "United States"),
    ("U.S.A.", "United States"),
    ("U.S.", "United States"),
    ("UK", "United Kingdom"),
    ("U.K.", "United Kingdom"),
    ("Britain", "United Kingdom"),
    ("Great Britain", "United Kingdom"),
    ("Russian Federation", "Russia"),
    ("Russia Federation", "Russia"),
    ("RUS", "Russia"),
    ("China, People's Republic of", "China"),
];

/// Header cell value that leaks into header-less yearly revenue parses.
pub const COUNTRY_HEADER: &str = "Country";

/// Trims and canonicalizes a raw country cell.
///
/// Returns `None` for empty cells and the literal header value.
#[must_use]
pub fn canonical_country(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == COUNTRY_HEADER {
        return None;
    }
    let canonical = COUNTRY_ALIASES
        .iter()
        .find(|(alias, _)| *alias == trimmed)
        .map_or(trimmed, |(_, canonical)| *canonical);
    Some(canonical.to_owned())
}

#[cfg(test)]
mod tests {
    use super::canonical_country;

    #[test]
    fn aliases_map_to_canonical_names() {
        assert_eq!(canonical_country("USA").as_deref(), Some("United States"));
        assert_eq!(canonical_country(" U.S.A. ").as_deref(), Some("United States"));
        assert_eq!(canonical_country("Britain").as_deref(), Some("United Kingdom"));
        assert_eq!(canonical_country("RUS").as_deref(), Some("Russia"));
        assert_eq!(canonical_country("France").as_deref(), Some("France"));
    }

    #[test]
    fn empty_and_header_cells_are_rejected() {
        assert_eq!(canonical_country(""), None);
        assert_eq!(canonical_country("   "), None);
        assert_eq!(canonical_country("Country"), None);
    }
}
