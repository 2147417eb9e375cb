use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;
use validator::Validate;

use crate::core::Matcher;
use crate::models::{
    Contact, ErrorResponse, HealthResponse, MatchContactsRequest, MatchContactsResponse,
    MatchPropertiesRequest, MatchPropertiesResponse, Property,
};
use crate::services::{CacheKey, FirestoreClient, FirestoreError, SnapshotCache};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub firestore: Arc<FirestoreClient>,
    pub cache: Arc<SnapshotCache>,
    pub matcher: Matcher,
}

/// Configure all match-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/matches/contacts", web::post().to(find_interested_contacts))
        .route("/matches/properties", web::post().to(find_matching_properties))
        .route("/cache/flush", web::post().to(flush_snapshots));
}

/// Health check endpoint
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Find the contacts interested in one listing
///
/// POST /api/v1/matches/contacts
///
/// Request body:
/// ```json
/// { "propertyId": "EB-XXXX" }
/// ```
async fn find_interested_contacts(
    state: web::Data<AppState>,
    req: web::Json<MatchContactsRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let property = match state.firestore.get_property(&req.property_id).await {
        Ok(property) => property,
        Err(e) => return fetch_error("property", &req.property_id, e),
    };

    let contacts = match load_contacts(&state).await {
        Ok(contacts) => contacts,
        Err(e) => return collection_error("contacts", e),
    };

    let total_candidates = contacts.len();
    let matches = state.matcher.find_contacts_for_property(&property, contacts);

    tracing::info!(
        "Matched {} of {} contacts for property {}",
        matches.len(),
        total_candidates,
        req.property_id
    );

    HttpResponse::Ok().json(MatchContactsResponse {
        matches,
        total_candidates,
    })
}

/// Find the listings matching one contact's preferences
///
/// POST /api/v1/matches/properties
///
/// Request body:
/// ```json
/// { "contactId": "abc123" }
/// ```
async fn find_matching_properties(
    state: web::Data<AppState>,
    req: web::Json<MatchPropertiesRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let contact = match state.firestore.get_contact(&req.contact_id).await {
        Ok(contact) => contact,
        Err(e) => return fetch_error("contact", &req.contact_id, e),
    };

    let properties = match load_properties(&state).await {
        Ok(properties) => properties,
        Err(e) => return collection_error("properties", e),
    };

    let total_candidates = properties.len();
    let matches = state.matcher.find_properties_for_contact(&contact, properties);

    tracing::info!(
        "Matched {} of {} properties for contact {}",
        matches.len(),
        total_candidates,
        req.contact_id
    );

    HttpResponse::Ok().json(MatchPropertiesResponse {
        matches,
        total_candidates,
    })
}

/// Drop both collection snapshots so the next match reloads from Firestore
///
/// POST /api/v1/cache/flush
async fn flush_snapshots(state: web::Data<AppState>) -> impl Responder {
    state.cache.flush();
    tracing::info!("Snapshot cache flushed");
    HttpResponse::Ok().json(serde_json::json!({ "flushed": true }))
}

/// Load the contact collection, preferring the cached snapshot.
async fn load_contacts(state: &AppState) -> Result<Vec<Contact>, FirestoreError> {
    let key = CacheKey::contacts();
    if let Ok(contacts) = state.cache.get::<Vec<Contact>>(&key).await {
        return Ok(contacts);
    }

    let contacts = state.firestore.list_contacts().await?;
    if let Err(e) = state.cache.set(&key, &contacts).await {
        tracing::warn!("Failed to cache contact snapshot: {}", e);
    }
    Ok(contacts)
}

/// Load the property collection, preferring the cached snapshot.
async fn load_properties(state: &AppState) -> Result<Vec<Property>, FirestoreError> {
    let key = CacheKey::properties();
    if let Ok(properties) = state.cache.get::<Vec<Property>>(&key).await {
        return Ok(properties);
    }

    let properties = state.firestore.list_properties().await?;
    if let Err(e) = state.cache.set(&key, &properties).await {
        tracing::warn!("Failed to cache property snapshot: {}", e);
    }
    Ok(properties)
}

fn fetch_error(kind: &str, id: &str, e: FirestoreError) -> HttpResponse {
    match e {
        FirestoreError::NotFound(_) => HttpResponse::NotFound().json(ErrorResponse {
            error: format!("{} not found", kind),
            message: format!("No {} with id {}", kind, id),
            status_code: 404,
        }),
        other => {
            tracing::error!("Failed to fetch {} {}: {}", kind, id, other);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: format!("Failed to fetch {}", kind),
                message: other.to_string(),
                status_code: 500,
            })
        }
    }
}

fn collection_error(kind: &str, e: FirestoreError) -> HttpResponse {
    tracing::error!("Failed to load {} collection: {}", kind, e);
    HttpResponse::InternalServerError().json(ErrorResponse {
        error: format!("Failed to load {}", kind),
        message: e.to_string(),
        status_code: 500,
    })
}
