//! Text normalization for free-text keys

/// Trimmed, lower-cased text; empty for missing input
pub fn normalize(text: Option<&str>) -> String {
    text.map(|t| t.trim().to_lowercase()).unwrap_or_default()
}

/// Looser key: normalized text without the words "zone" and "billing", so
/// `"South Zone"` and `"south"` land on the same key
pub fn canonical_key(text: &str) -> String {
    let normalized = normalize(Some(text));
    let stripped: Vec<&str> = normalized
        .split_whitespace()
        .filter(|word| *word != "zone" && *word != "billing")
        .collect();
    if stripped.is_empty() {
        // "Zone" on its own is a name, not a suffix
        return normalized.split_whitespace().collect::<Vec<_>>().join(" ");
    }
    stripped.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_case_and_whitespace() {
        assert_eq!(normalize(Some("  South Zone ")), "south zone");
        assert_eq!(normalize(Some("SOUTH ZONE")), "south zone");
        assert_eq!(normalize(Some("  South Zone ")), normalize(Some("SOUTH ZONE")));
    }

    #[test]
    fn test_normalize_missing() {
        assert_eq!(normalize(None), "");
        assert_eq!(normalize(Some("   ")), "");
    }

    #[test]
    fn test_normalize_idempotent() {
        for raw in ["  Whitefield ", "HSR Layout", "", "\tKoramangala 5th Block\n"] {
            let once = normalize(Some(raw));
            assert_eq!(normalize(Some(&once)), once);
        }
    }

    #[test]
    fn test_canonical_key() {
        assert_eq!(canonical_key("South Zone"), "south");
        assert_eq!(canonical_key(" south "), "south");
        assert_eq!(canonical_key("North Billing Zone"), "north");
        assert_eq!(canonical_key("East  Zone 2"), "east 2");
        assert_eq!(canonical_key("Zone"), "zone");
    }
}
