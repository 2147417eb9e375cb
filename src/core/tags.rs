//! Tag normalization for property listings.
//!
//! Listing tags arrive as one undifferentiated free-form list mixing
//! geographic zone tokens with amenity/layout tags. These helpers split that
//! list into a canonical location token and a canonical feature set.

/// Recognized geographic zone tokens.
pub const LOCATION_TOKENS: [&str; 9] = [
    "norte",
    "noreste",
    "noroeste",
    "oeste",
    "este",
    "centronorte",
    "centrosur",
    "sureste",
    "suroeste",
];

/// Recognized feature tags, lowercase canonical form.
pub const FEATURE_TAGS: [&str; 8] = [
    "fracc. privado",
    "frente a parque",
    "una planta",
    "recamara en p.b.",
    "patio amplio",
    "lista para habitarse",
    "nueva",
    "alberca",
];

/// Extract the listing's zone from its raw tag list.
///
/// Tags are lowercased and trimmed; the first one (in input order) that
/// exactly matches a recognized zone token wins, even if more location tags
/// follow. Returns `None` when no tag is a zone token; callers must treat
/// that as "no location filter applies", never as a failed match.
pub fn classify_location(tags: &[String]) -> Option<&'static str> {
    for tag in tags {
        let zone = tag.to_lowercase();
        let zone = zone.trim();
        if let Some(token) = LOCATION_TOKENS.iter().copied().find(|t| *t == zone) {
            return Some(token);
        }
    }
    None
}

/// Extract the listing's recognized feature tags from its raw tag list.
///
/// Non-empty tags are lowercased, trimmed and kept when they match a
/// recognized feature (case-insensitively); the result is deduplicated and in
/// canonical lowercase form. Returns an empty vec (never `None`) when nothing
/// matches: downstream the feature filter gates on `!is_empty()` while the
/// location filter gates on `Some`, and the two must stay distinguishable.
pub fn classify_features(tags: &[String]) -> Vec<String> {
    let mut features: Vec<String> = Vec::new();
    for tag in tags {
        let value = tag.to_lowercase();
        let value = value.trim();
        if value.is_empty() {
            continue;
        }
        if let Some(canonical) = FEATURE_TAGS.iter().copied().find(|t| *t == value) {
            if !features.iter().any(|f| f == canonical) {
                features.push(canonical.to_string());
            }
        }
    }
    features
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_location_first_match_wins() {
        let t = tags(&["Alberca", "Norte", "sureste"]);
        assert_eq!(classify_location(&t), Some("norte"));
    }

    #[test]
    fn test_location_case_and_whitespace() {
        let t = tags(&["  CentroSur  "]);
        assert_eq!(classify_location(&t), Some("centrosur"));
    }

    #[test]
    fn test_location_none_when_unrecognized() {
        let t = tags(&["Alberca", "Una Planta"]);
        assert_eq!(classify_location(&t), None);
        assert_eq!(classify_location(&[]), None);
    }

    #[test]
    fn test_features_case_insensitive_canonical() {
        let t = tags(&["ALBERCA", "Una Planta", "Norte"]);
        assert_eq!(classify_features(&t), vec!["alberca", "una planta"]);
    }

    #[test]
    fn test_features_deduplicated() {
        let t = tags(&["Alberca", "alberca ", " ALBERCA"]);
        assert_eq!(classify_features(&t), vec!["alberca"]);
    }

    #[test]
    fn test_features_empty_when_none_match() {
        let t = tags(&["Norte", "", "  ", "Jardín Zen"]);
        assert!(classify_features(&t).is_empty());
    }
}
