use std::panic::{catch_unwind, AssertUnwindSafe};

use chrono::{Duration, Utc};

use crate::core::filters::{
    features_satisfy_contact, is_active_lead, lead_type_matches, location_satisfies_contact,
    meets_space_minimums, operation_matches, price_satisfies_contact, target_lead_type,
    type_matches, wants_property_type,
};
use crate::core::tags::{classify_features, classify_location};
use crate::models::{Contact, Property};

/// Tunable matching parameters.
#[derive(Debug, Clone)]
pub struct MatchConfig {
    /// Trailing activity window for the contact-side prefilter, in days.
    pub recency_window_days: i64,
    /// Lifecycle stage that bypasses the activity window.
    pub terminal_stage: String,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            recency_window_days: 365,
            terminal_stage: "Etapa4".to_string(),
        }
    }
}

/// Bidirectional matching engine between contacts and listed properties.
///
/// Both directions run the same progressive filter pipeline over an in-memory
/// snapshot of the counterpart collection: each stage narrows the survivors,
/// and a stage whose driving preference is absent is not applied at all.
/// The engine is synchronous, stateless and side-effect free; callers own the
/// snapshot contract (collections must not be mutated during a call).
#[derive(Debug, Clone)]
pub struct Matcher {
    config: MatchConfig,
}

impl Matcher {
    pub fn new(config: MatchConfig) -> Self {
        Self { config }
    }

    pub fn with_defaults() -> Self {
        Self::new(MatchConfig::default())
    }

    /// Filter the property collection down to the listings matching one
    /// contact's stated preferences, preserving input order.
    ///
    /// A panic anywhere in the pipeline (malformed data that slipped past
    /// boundary coercion) degrades to an empty result instead of reaching the
    /// caller: a blank candidate list keeps the UI alive, and the error is
    /// logged for follow-up.
    pub fn find_properties_for_contact(
        &self,
        contact: &Contact,
        properties: Vec<Property>,
    ) -> Vec<Property> {
        catch_unwind(AssertUnwindSafe(|| self.filter_properties(contact, properties)))
            .unwrap_or_else(|_| {
                tracing::error!(
                    "property matching failed for contact {}, returning no matches",
                    contact.id
                );
                Vec::new()
            })
    }

    /// Filter the contact collection down to the leads whose preferences are
    /// satisfied by one listing, preserving input order. Same failure
    /// semantics as [`Self::find_properties_for_contact`].
    pub fn find_contacts_for_property(
        &self,
        property: &Property,
        contacts: Vec<Contact>,
    ) -> Vec<Contact> {
        catch_unwind(AssertUnwindSafe(|| self.filter_contacts(property, contacts)))
            .unwrap_or_else(|_| {
                tracing::error!(
                    "contact matching failed for property {}, returning no matches",
                    property.public_id
                );
                Vec::new()
            })
    }

    fn filter_properties(&self, contact: &Contact, mut candidates: Vec<Property>) -> Vec<Property> {
        if let Some(wanted) = contact.wanted_property_type() {
            candidates.retain(|p| type_matches(p, wanted));
            tracing::trace!("after type filter: {} properties", candidates.len());
        }

        if let Some(operation) = contact.wanted_operation() {
            candidates.retain(|p| operation_matches(p, operation));
            tracing::trace!("after operation filter: {} properties", candidates.len());
        }

        if let Some(beds) = contact.min_bedrooms.filter(|n| *n > 0) {
            candidates.retain(|p| p.bedrooms >= beds);
        }
        if let Some(baths) = contact.min_bathrooms.filter(|n| *n > 0) {
            candidates.retain(|p| p.bathrooms >= baths);
        }
        if let Some(parks) = contact.min_parking.filter(|n| *n > 0) {
            candidates.retain(|p| p.parking_spaces >= parks);
        }

        if contact.effective_budget().is_some() || contact.normalized_range().is_some() {
            candidates.retain(|p| price_satisfies_contact(p.list_price(), contact));
            tracing::trace!("after price filter: {} properties", candidates.len());
        }

        let wanted_zones = contact.wanted_locations();
        if !wanted_zones.is_empty() {
            candidates.retain(|p| location_satisfies_contact(p, &wanted_zones));
        }

        let wanted_features = contact.wanted_features();
        if !wanted_features.is_empty() {
            candidates.retain(|p| features_satisfy_contact(p, &wanted_features));
        }

        candidates
    }

    fn filter_contacts(&self, property: &Property, mut candidates: Vec<Contact>) -> Vec<Contact> {
        let now = Utc::now().timestamp_millis();
        let cutoff = now - Duration::days(self.config.recency_window_days).num_milliseconds();
        candidates.retain(|c| is_active_lead(c, cutoff, now, &self.config.terminal_stage));
        tracing::trace!("after activity prefilter: {} contacts", candidates.len());

        if let Some(target) = property
            .operation_type
            .as_deref()
            .and_then(target_lead_type)
        {
            candidates.retain(|c| lead_type_matches(c, target));
            tracing::trace!("after lead-type filter ({}): {} contacts", target, candidates.len());
        }

        candidates.retain(|c| wants_property_type(c, property));
        candidates.retain(|c| meets_space_minimums(c, property));

        let price = property.list_price();
        if price > 0.0 {
            candidates.retain(|c| price_satisfies_contact(price, c));
            tracing::trace!("after price filter: {} contacts", candidates.len());
        }

        if let Some(zone) = classify_location(&property.tags) {
            candidates.retain(|c| {
                let wanted = c.wanted_locations();
                wanted.is_empty() || wanted.iter().any(|w| w == zone)
            });
            tracing::trace!("after location filter ({}): {} contacts", zone, candidates.len());
        }

        let features = classify_features(&property.tags);
        if !features.is_empty() {
            candidates.retain(|c| {
                c.wanted_features()
                    .iter()
                    .all(|w| features.iter().any(|f| f == w))
            });
        }

        candidates
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::with_defaults()
    }
}
