// Service exports
pub mod cache;
pub mod firestore;

pub use cache::{CacheError, CacheKey, SnapshotCache};
pub use firestore::{FirestoreClient, FirestoreCollections, FirestoreError};
