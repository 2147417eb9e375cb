// Integration tests for ATAIR Match

use atair_match::core::{MatchConfig, Matcher};
use atair_match::models::{Contact, Property};
use chrono::Utc;

fn contact(json: serde_json::Value) -> Contact {
    serde_json::from_value(json).unwrap()
}

fn property(json: serde_json::Value) -> Property {
    serde_json::from_value(json).unwrap()
}

fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

fn sale_listing() -> Property {
    property(serde_json::json!({
        "public_id": "EB-100",
        "property_type": "Casa",
        "selecTO": "sale",
        "bedrooms": 3,
        "bathrooms": 2,
        "parking_spaces": 2,
        "price": 2_800_000,
        "tags": ["Norte", "Alberca", "Una Planta"],
    }))
}

#[test]
fn test_blank_contact_matches_any_listing() {
    // A contact with no stated preference must survive every stage.
    let matcher = Matcher::with_defaults();
    let blank = contact(serde_json::json!({ "id": "blank", "createdAt": now_millis() }));

    let matches = matcher.find_contacts_for_property(&sale_listing(), vec![blank]);
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].id, "blank");
}

#[test]
fn test_end_to_end_contact_search() {
    let matcher = Matcher::with_defaults();
    let listing = sale_listing();

    let contacts = vec![
        // Buyer wanting a northern casa with a pool, within budget.
        contact(serde_json::json!({
            "id": "good",
            "createdAt": now_millis(),
            "typeContact": "Comprador",
            "selecTP": "casa",
            "numBeds": 2,
            "budget": 2_900_000,
            "locaProperty": ["norte", "noreste"],
            "tagsProperty": ["Alberca"],
        })),
        // Renter: wrong lead type for a sale listing.
        contact(serde_json::json!({
            "id": "renter",
            "createdAt": now_millis(),
            "typeContact": "Arrendador",
        })),
        // Budget far below the listing.
        contact(serde_json::json!({
            "id": "poor-fit",
            "createdAt": now_millis(),
            "budget": 1_000_000,
        })),
        // Wants a zone the listing is not in.
        contact(serde_json::json!({
            "id": "wrong-zone",
            "createdAt": now_millis(),
            "locaProperty": ["sureste"],
        })),
        // Wants a feature the listing lacks.
        contact(serde_json::json!({
            "id": "wants-new",
            "createdAt": now_millis(),
            "tagsProperty": ["Nueva"],
        })),
    ];

    let matches = matcher.find_contacts_for_property(&listing, contacts);
    let ids: Vec<&str> = matches.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["good"]);
}

#[test]
fn test_end_to_end_property_search() {
    let matcher = Matcher::with_defaults();
    let seeker = contact(serde_json::json!({
        "id": "c1",
        "selecTP": "casa",
        "numBeds": 2,
        "budget": 2_000_000,
        "locaProperty": ["norte"],
    }));

    let listings = vec![
        property(serde_json::json!({
            "public_id": "match",
            "property_type": "Casa",
            "bedrooms": 3,
            "price": 2_100_000,
            "tags": ["Norte"],
        })),
        property(serde_json::json!({
            "public_id": "too-small",
            "property_type": "Casa",
            "bedrooms": 1,
            "price": 2_000_000,
        })),
        property(serde_json::json!({
            "public_id": "wrong-type",
            "property_type": "Terreno",
            "bedrooms": 3,
            "price": 2_000_000,
        })),
        property(serde_json::json!({
            "public_id": "over-budget",
            "property_type": "Casa",
            "bedrooms": 3,
            "price": 2_300_000,
        })),
        property(serde_json::json!({
            "public_id": "wrong-zone",
            "property_type": "Casa",
            "bedrooms": 3,
            "price": 2_000_000,
            "tags": ["Suroeste"],
        })),
        // No zone tag at all: permissively included.
        property(serde_json::json!({
            "public_id": "unlocated",
            "property_type": "Casa",
            "bedrooms": 3,
            "price": 2_000_000,
            "tags": ["Alberca"],
        })),
    ];

    let matches = matcher.find_properties_for_contact(&seeker, listings);
    let ids: Vec<&str> = matches.iter().map(|p| p.public_id.as_str()).collect();
    assert_eq!(ids, vec!["match", "unlocated"]);
}

#[test]
fn test_price_read_from_operations_when_flat_price_missing() {
    let matcher = Matcher::with_defaults();
    let seeker = contact(serde_json::json!({ "id": "c1", "budget": 2_000_000 }));

    let listings = vec![property(serde_json::json!({
        "public_id": "imported",
        "operations": [{ "type": "sale", "amount": 2_100_000 }],
    }))];

    let matches = matcher.find_properties_for_contact(&seeker, listings);
    assert_eq!(matches.len(), 1);
}

#[test]
fn test_configurable_recency_window() {
    let eighteen_months_ago = now_millis() - 540 * 24 * 3600 * 1000;
    let lead = contact(serde_json::json!({ "id": "old", "createdAt": eighteen_months_ago }));
    let listing = property(serde_json::json!({ "public_id": "P" }));

    // Outside a one-year window.
    let one_year = Matcher::new(MatchConfig {
        recency_window_days: 365,
        terminal_stage: "Etapa4".to_string(),
    });
    assert!(one_year
        .find_contacts_for_property(&listing, vec![lead.clone()])
        .is_empty());

    // Inside a three-year window.
    let three_years = Matcher::new(MatchConfig {
        recency_window_days: 3 * 365,
        terminal_stage: "Etapa4".to_string(),
    });
    assert_eq!(
        three_years
            .find_contacts_for_property(&listing, vec![lead])
            .len(),
        1
    );
}

#[test]
fn test_terminal_stage_bypasses_window_in_both_configs() {
    let listing = property(serde_json::json!({ "public_id": "P" }));
    let closed = contact(serde_json::json!({
        "id": "closed",
        "createdAt": 0,
        "contactStage": "Etapa4",
    }));

    let matcher = Matcher::with_defaults();
    assert_eq!(
        matcher.find_contacts_for_property(&listing, vec![closed]).len(),
        1
    );
}

#[test]
fn test_rental_listing_targets_renters() {
    let matcher = Matcher::with_defaults();
    let listing = property(serde_json::json!({ "public_id": "P", "selecTO": "rental" }));

    let contacts = vec![
        contact(serde_json::json!({
            "id": "renter",
            "createdAt": now_millis(),
            "contactType": "arrendador",
        })),
        contact(serde_json::json!({
            "id": "buyer",
            "createdAt": now_millis(),
            "typeContact": "Comprador",
        })),
    ];

    let matches = matcher.find_contacts_for_property(&listing, contacts);
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].id, "renter");
}

#[test]
fn test_both_directions_agree_on_shared_stages() {
    // The same contact/listing pair should agree on price, location and
    // features whichever side initiates the match.
    let matcher = Matcher::with_defaults();
    let listing = sale_listing();
    let seeker = contact(serde_json::json!({
        "id": "c1",
        "createdAt": now_millis(),
        "selecTP": "casa",
        "budget": 2_800_000,
        "locaProperty": ["norte"],
        "tagsProperty": ["alberca"],
    }));

    let from_property = matcher.find_contacts_for_property(&listing, vec![seeker.clone()]);
    let from_contact = matcher.find_properties_for_contact(&seeker, vec![listing.clone()]);

    assert_eq!(from_property.len(), 1);
    assert_eq!(from_contact.len(), 1);
}

#[test]
fn test_repeat_invocations_are_stable() {
    let matcher = Matcher::with_defaults();
    let listing = sale_listing();

    let contacts: Vec<Contact> = (0..25)
        .map(|i| {
            contact(serde_json::json!({
                "id": format!("c{}", i),
                "createdAt": now_millis(),
                "budget": 2_500_000 + i * 10_000,
            }))
        })
        .collect();

    let first = matcher.find_contacts_for_property(&listing, contacts.clone());
    let second = matcher.find_contacts_for_property(&listing, contacts);

    let first_ids: Vec<&str> = first.iter().map(|c| c.id.as_str()).collect();
    let second_ids: Vec<&str> = second.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(first_ids, second_ids);
    assert!(!first_ids.is_empty());
}
