use reqwest::{Client, StatusCode};
use serde_json::{json, Map, Value};
use std::time::Duration;
use thiserror::Error;

use crate::models::{Contact, Property};

/// Errors that can occur when interacting with Firestore
#[derive(Debug, Error)]
pub enum FirestoreError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: invalid API key")]
    Unauthorized,

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Collection names in Firestore
#[derive(Debug, Clone)]
pub struct FirestoreCollections {
    pub contacts: String,
    pub properties: String,
}

/// Firestore REST client
///
/// Supplies the matching engine's two input collections as plain data
/// snapshots: the full contact list, the full property list, and single
/// documents by id. Firestore's typed value encoding is flattened to plain
/// JSON here so the domain models only ever see ordinary fields.
pub struct FirestoreClient {
    base_url: String,
    api_key: String,
    project_id: String,
    client: Client,
    collections: FirestoreCollections,
}

impl FirestoreClient {
    pub fn new(
        base_url: String,
        api_key: String,
        project_id: String,
        collections: FirestoreCollections,
    ) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url,
            api_key,
            project_id,
            client,
            collections,
        }
    }

    pub async fn get_contact(&self, id: &str) -> Result<Contact, FirestoreError> {
        let collection = self.collections.contacts.clone();
        let doc = self.get_document(&collection, id).await?;
        serde_json::from_value(doc)
            .map_err(|e| FirestoreError::InvalidResponse(format!("Failed to parse contact: {}", e)))
    }

    pub async fn get_property(&self, id: &str) -> Result<Property, FirestoreError> {
        let collection = self.collections.properties.clone();
        let doc = self.get_document(&collection, id).await?;
        serde_json::from_value(doc)
            .map_err(|e| FirestoreError::InvalidResponse(format!("Failed to parse property: {}", e)))
    }

    /// Fetch the full contact collection as one snapshot.
    pub async fn list_contacts(&self) -> Result<Vec<Contact>, FirestoreError> {
        let collection = self.collections.contacts.clone();
        let docs = self.list_documents(&collection).await?;
        Ok(decode_all(docs))
    }

    /// Fetch the full property collection as one snapshot.
    pub async fn list_properties(&self) -> Result<Vec<Property>, FirestoreError> {
        let collection = self.collections.properties.clone();
        let docs = self.list_documents(&collection).await?;
        Ok(decode_all(docs))
    }

    fn collection_url(&self, collection: &str) -> String {
        format!(
            "{}/projects/{}/databases/(default)/documents/{}",
            self.base_url.trim_end_matches('/'),
            self.project_id,
            collection
        )
    }

    async fn get_document(&self, collection: &str, id: &str) -> Result<Value, FirestoreError> {
        let url = format!(
            "{}/{}?key={}",
            self.collection_url(collection),
            urlencoding::encode(id),
            self.api_key
        );

        tracing::debug!("Fetching {}/{}", collection, id);

        let response = self.client.get(&url).send().await?;

        match response.status() {
            StatusCode::NOT_FOUND => {
                return Err(FirestoreError::NotFound(format!("{}/{}", collection, id)))
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(FirestoreError::Unauthorized)
            }
            status if !status.is_success() => {
                return Err(FirestoreError::ApiError(format!(
                    "Failed to fetch document: {}",
                    status
                )))
            }
            _ => {}
        }

        let doc: Value = response.json().await?;
        decode_document(&doc)
            .ok_or_else(|| FirestoreError::InvalidResponse("Document has no fields".into()))
    }

    /// List every document in a collection, following page tokens.
    async fn list_documents(&self, collection: &str) -> Result<Vec<Value>, FirestoreError> {
        let base = self.collection_url(collection);
        let mut documents = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut url = format!("{}?pageSize=300&key={}", base, self.api_key);
            if let Some(token) = &page_token {
                url.push_str(&format!("&pageToken={}", urlencoding::encode(token)));
            }

            let response = self.client.get(&url).send().await?;

            match response.status() {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    return Err(FirestoreError::Unauthorized)
                }
                status if !status.is_success() => {
                    return Err(FirestoreError::ApiError(format!(
                        "Failed to list {}: {}",
                        collection, status
                    )))
                }
                _ => {}
            }

            let json: Value = response.json().await?;

            if let Some(docs) = json.get("documents").and_then(|d| d.as_array()) {
                documents.extend(docs.iter().filter_map(decode_document));
            }

            match json.get("nextPageToken").and_then(|t| t.as_str()) {
                Some(token) => page_token = Some(token.to_string()),
                None => break,
            }
        }

        tracing::debug!("Listed {} documents from {}", documents.len(), collection);

        Ok(documents)
    }
}

fn decode_all<T: serde::de::DeserializeOwned>(docs: Vec<Value>) -> Vec<T> {
    docs.into_iter()
        .filter_map(|doc| match serde_json::from_value(doc) {
            Ok(entity) => Some(entity),
            Err(e) => {
                tracing::warn!("Skipping undecodable document: {}", e);
                None
            }
        })
        .collect()
}

/// Flatten one Firestore document (`name` + typed `fields`) to a plain JSON
/// object, injecting the document id for documents that don't repeat it as a
/// field.
fn decode_document(doc: &Value) -> Option<Value> {
    let fields = doc.get("fields")?.as_object()?;

    let mut object = Map::new();
    for (key, value) in fields {
        object.insert(key.clone(), decode_value(value));
    }

    if let Some(id) = doc
        .get("name")
        .and_then(|n| n.as_str())
        .and_then(|n| n.rsplit('/').next())
    {
        object.entry("id").or_insert_with(|| json!(id));
        object.entry("public_id").or_insert_with(|| json!(id));
    }

    Some(Value::Object(object))
}

/// Unwrap one Firestore typed value into plain JSON.
fn decode_value(value: &Value) -> Value {
    if let Some(s) = value.get("stringValue").and_then(|v| v.as_str()) {
        return json!(s);
    }
    if let Some(s) = value.get("integerValue").and_then(|v| v.as_str()) {
        // Firestore serializes integers as strings.
        return s.parse::<i64>().map(|n| json!(n)).unwrap_or(Value::Null);
    }
    if let Some(n) = value.get("doubleValue").and_then(|v| v.as_f64()) {
        return json!(n);
    }
    if let Some(b) = value.get("booleanValue").and_then(|v| v.as_bool()) {
        return json!(b);
    }
    if let Some(ts) = value.get("timestampValue").and_then(|v| v.as_str()) {
        return chrono::DateTime::parse_from_rfc3339(ts)
            .map(|dt| json!(dt.timestamp_millis()))
            .unwrap_or(Value::Null);
    }
    if let Some(array) = value.get("arrayValue") {
        let values = array
            .get("values")
            .and_then(|v| v.as_array())
            .map(|items| items.iter().map(decode_value).collect::<Vec<_>>())
            .unwrap_or_default();
        return Value::Array(values);
    }
    if let Some(map) = value.get("mapValue") {
        let mut object = Map::new();
        if let Some(fields) = map.get("fields").and_then(|f| f.as_object()) {
            for (key, inner) in fields {
                object.insert(key.clone(), decode_value(inner));
            }
        }
        return Value::Object(object);
    }
    Value::Null
}
