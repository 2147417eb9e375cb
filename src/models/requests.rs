use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to find the contacts interested in one listing.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MatchContactsRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "property_id", rename = "propertyId")]
    pub property_id: String,
}

/// Request to find the listings matching one contact's preferences.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MatchPropertiesRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "contact_id", rename = "contactId")]
    pub contact_id: String,
}
