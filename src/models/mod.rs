// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{Contact, Operation, Property};
pub use requests::{MatchContactsRequest, MatchPropertiesRequest};
pub use responses::{ErrorResponse, HealthResponse, MatchContactsResponse, MatchPropertiesResponse};
