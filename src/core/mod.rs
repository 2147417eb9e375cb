// Core algorithm exports
pub mod filters;
pub mod matcher;
pub mod range;
pub mod tags;

pub use filters::{price_satisfies_contact, BUDGET_LOWER_FACTOR, BUDGET_UPPER_FACTOR};
pub use matcher::{MatchConfig, Matcher};
pub use range::{classify_price_range, PRICE_RANGE_LABELS};
pub use tags::{classify_features, classify_location, FEATURE_TAGS, LOCATION_TOKENS};
