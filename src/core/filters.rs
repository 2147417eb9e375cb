//! Per-stage filter predicates for the matching pipeline.
//!
//! Every preference stage is a soft filter: an absent preference skips the
//! stage instead of failing it. Each predicate here is written to pass on
//! absence, so a contact card with blank fields never silently loses leads.

use crate::core::range::classify_price_range;
use crate::core::tags::{classify_features, classify_location};
use crate::models::{Contact, Property};

/// Budget tolerance band, inclusive on both ends.
pub const BUDGET_LOWER_FACTOR: f64 = 0.7;
pub const BUDGET_UPPER_FACTOR: f64 = 1.1;

/// Property-type equality, case-insensitive. A listing without a type never
/// satisfies an explicit type preference.
#[inline]
pub fn type_matches(property: &Property, wanted: &str) -> bool {
    property
        .property_type
        .as_deref()
        .map_or(false, |t| t.trim().eq_ignore_ascii_case(wanted))
}

/// Operation-type equality ("sale" / "rental"), case-insensitive.
#[inline]
pub fn operation_matches(property: &Property, wanted: &str) -> bool {
    property
        .operation_type
        .as_deref()
        .map_or(false, |o| o.trim().eq_ignore_ascii_case(wanted))
}

/// Price stage, shared by both matching directions.
///
/// A numeric budget takes precedence over a bracket label: the listing must
/// fall within `[0.7×budget, 1.1×budget]`. Without a budget, the listing's
/// classified bracket must equal the contact's stored bracket (compared in
/// canonical lowercase). A contact with neither passes unconditionally.
#[inline]
pub fn price_satisfies_contact(price: f64, contact: &Contact) -> bool {
    if let Some(budget) = contact.effective_budget() {
        let low = budget * BUDGET_LOWER_FACTOR;
        let high = budget * BUDGET_UPPER_FACTOR;
        price >= low && price <= high
    } else if let Some(range) = contact.normalized_range() {
        classify_price_range(price) == range
    } else {
        true
    }
}

/// Location stage from the contact's side: a listing whose tags carry no
/// recognized zone token is included permissively; otherwise its zone must be
/// one of the contact's wanted zones (already lowercased).
#[inline]
pub fn location_satisfies_contact(property: &Property, wanted_zones: &[String]) -> bool {
    match classify_location(&property.tags) {
        None => true,
        Some(zone) => wanted_zones.iter().any(|w| w == zone),
    }
}

/// Feature stage from the contact's side: the listing must have recognized
/// features, and they must cover every wanted tag (superset check).
#[inline]
pub fn features_satisfy_contact(property: &Property, wanted_features: &[String]) -> bool {
    let features = classify_features(&property.tags);
    !features.is_empty() && wanted_features.iter().all(|w| features.iter().any(|f| f == w))
}

/// Activity prefilter for the property→contact direction: only leads created
/// within the trailing window are considered, except leads that reached the
/// terminal stage, which stay matchable regardless of age.
#[inline]
pub fn is_active_lead(
    contact: &Contact,
    cutoff_millis: i64,
    now_millis: i64,
    terminal_stage: &str,
) -> bool {
    (contact.created_at >= cutoff_millis && contact.created_at <= now_millis)
        || contact.stage() == terminal_stage
}

/// Lead type a listing's operation calls for.
#[inline]
pub fn target_lead_type(operation: &str) -> Option<&'static str> {
    match operation.trim().to_lowercase().as_str() {
        "sale" => Some("comprador"),
        "rental" => Some("arrendador"),
        _ => None,
    }
}

/// Lead-type stage: a contact without a recorded type passes.
#[inline]
pub fn lead_type_matches(contact: &Contact, target: &str) -> bool {
    contact
        .lead_type()
        .map_or(true, |t| t.eq_ignore_ascii_case(target))
}

/// Property-type stage mirrored onto a contact: no stated type passes.
#[inline]
pub fn wants_property_type(contact: &Contact, property: &Property) -> bool {
    match contact.wanted_property_type() {
        None => true,
        Some(wanted) => type_matches(property, wanted),
    }
}

/// Space stage mirrored onto a contact: for each dimension the listing
/// actually reports (> 0), the contact's stated minimum must not exceed it.
/// Unstated minimums pass; unreported listing dimensions skip the check.
#[inline]
pub fn meets_space_minimums(contact: &Contact, property: &Property) -> bool {
    space_ok(contact.min_bedrooms, property.bedrooms)
        && space_ok(contact.min_bathrooms, property.bathrooms)
        && space_ok(contact.min_parking, property.parking_spaces)
}

#[inline]
fn space_ok(wanted: Option<u32>, available: u32) -> bool {
    if available == 0 {
        return true;
    }
    match wanted {
        None | Some(0) => true,
        Some(n) => n <= available,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact(json: serde_json::Value) -> Contact {
        serde_json::from_value(json).unwrap()
    }

    fn property(json: serde_json::Value) -> Property {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_budget_band_inclusive_bounds() {
        let c = contact(serde_json::json!({ "id": "c", "budget": 2_000_000 }));

        assert!(price_satisfies_contact(2_000_000.0, &c));
        assert!(price_satisfies_contact(2_000_000.0 * 0.7, &c));
        assert!(price_satisfies_contact(2_000_000.0 * 1.1, &c));
        assert!(!price_satisfies_contact(1_380_000.0, &c)); // 0.69×
        assert!(!price_satisfies_contact(2_220_000.0, &c)); // 1.11×
    }

    #[test]
    fn test_budget_takes_precedence_over_range() {
        let c = contact(serde_json::json!({
            "id": "c",
            "budget": 2_000_000,
            "rangeProp": "7,000,000 - 10,000,000",
        }));
        assert!(price_satisfies_contact(2_100_000.0, &c));
        assert!(!price_satisfies_contact(8_000_000.0, &c));
    }

    #[test]
    fn test_range_label_compared_lowercase() {
        let c = contact(serde_json::json!({ "id": "c", "rangeProp": "2,000,000 - 3,000,000" }));
        assert!(price_satisfies_contact(2_500_000.0, &c));
        assert!(!price_satisfies_contact(3_500_000.0, &c));
    }

    #[test]
    fn test_no_budget_no_range_passes() {
        let c = contact(serde_json::json!({ "id": "c" }));
        assert!(price_satisfies_contact(123.0, &c));
    }

    #[test]
    fn test_location_unknown_zone_is_permissive() {
        let p = property(serde_json::json!({ "public_id": "p", "tags": ["Alberca"] }));
        let wanted = vec!["norte".to_string()];
        assert!(location_satisfies_contact(&p, &wanted));

        let tagged = property(serde_json::json!({ "public_id": "p", "tags": ["Sureste"] }));
        assert!(!location_satisfies_contact(&tagged, &wanted));
    }

    #[test]
    fn test_features_superset_required() {
        let p = property(serde_json::json!({
            "public_id": "p",
            "tags": ["Alberca", "Una Planta", "Patio Amplio"],
        }));
        assert!(features_satisfy_contact(
            &p,
            &["alberca".to_string(), "una planta".to_string()]
        ));
        assert!(!features_satisfy_contact(
            &p,
            &["alberca".to_string(), "nueva".to_string()]
        ));

        let bare = property(serde_json::json!({ "public_id": "p", "tags": ["Norte"] }));
        assert!(!features_satisfy_contact(&bare, &["alberca".to_string()]));
    }

    #[test]
    fn test_active_lead_window_and_terminal_stage() {
        let now = 1_700_000_000_000i64;
        let cutoff = now - 1_000_000;

        let fresh = contact(serde_json::json!({ "id": "c", "createdAt": now - 500_000 }));
        assert!(is_active_lead(&fresh, cutoff, now, "Etapa4"));

        let stale = contact(serde_json::json!({ "id": "c", "createdAt": cutoff - 1 }));
        assert!(!is_active_lead(&stale, cutoff, now, "Etapa4"));

        let closed = contact(serde_json::json!({
            "id": "c",
            "createdAt": 0,
            "contactStage": "Etapa4",
        }));
        assert!(is_active_lead(&closed, cutoff, now, "Etapa4"));
    }

    #[test]
    fn test_target_lead_type_mapping() {
        assert_eq!(target_lead_type("sale"), Some("comprador"));
        assert_eq!(target_lead_type("Rental"), Some("arrendador"));
        assert_eq!(target_lead_type("permuta"), None);
    }

    #[test]
    fn test_lead_type_absent_passes() {
        let untyped = contact(serde_json::json!({ "id": "c" }));
        assert!(lead_type_matches(&untyped, "comprador"));

        let buyer = contact(serde_json::json!({ "id": "c", "typeContact": "Comprador" }));
        assert!(lead_type_matches(&buyer, "comprador"));
        assert!(!lead_type_matches(&buyer, "arrendador"));
    }

    #[test]
    fn test_space_minimums() {
        let p = property(serde_json::json!({ "public_id": "p", "bedrooms": 3, "bathrooms": 2 }));

        let fits = contact(serde_json::json!({ "id": "c", "numBeds": 2, "numBaths": 2 }));
        assert!(meets_space_minimums(&fits, &p));

        let wants_more = contact(serde_json::json!({ "id": "c", "numBeds": 4 }));
        assert!(!meets_space_minimums(&wants_more, &p));

        // Listing that doesn't report parking skips the parking check.
        let wants_parking = contact(serde_json::json!({ "id": "c", "numParks": 2 }));
        assert!(meets_space_minimums(&wants_parking, &p));
    }
}
