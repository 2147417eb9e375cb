use serde::{Deserialize, Serialize};

use crate::models::domain::{Contact, Property};

/// Response for the property→contacts matching endpoint. Surviving elements
/// keep the exact shape of the stored contacts; nothing is added or removed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchContactsResponse {
    pub matches: Vec<Contact>,
    pub total_candidates: usize,
}

/// Response for the contact→properties matching endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchPropertiesResponse {
    pub matches: Vec<Property>,
    pub total_candidates: usize,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
