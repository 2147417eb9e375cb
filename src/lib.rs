//! ATAIR Match - contact/property matching service for the ATAIR real-estate CRM
//!
//! This library provides the bidirectional matching engine between CRM leads
//! and property listings: a multi-stage filter pipeline where every stated
//! preference narrows the candidates and every absent preference is skipped.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{
    classify_features, classify_location, classify_price_range, MatchConfig, Matcher,
};
pub use crate::models::{Contact, MatchContactsResponse, MatchPropertiesResponse, Property};
