use super::value::{fields_to_json, Fields};
use super::SeedError;

/// A document database that can create-or-merge a document.
pub trait DocumentStore {
    /// Create `collection/id` if absent, otherwise merge `fields` into it.
    /// Fields already on the document but absent from `fields` survive.
    fn upsert(&self, collection: &str, id: &str, fields: &Fields) -> Result<(), SeedError>;
}

/// Logs what would be written instead of writing it.
#[derive(Debug, Default)]
pub struct DryRunStore;

impl DocumentStore for DryRunStore {
    fn upsert(&self, collection: &str, id: &str, fields: &Fields) -> Result<(), SeedError> {
        tracing::info!(
            "[dry run] would upsert {}/{}: {}",
            collection,
            id,
            fields_to_json(fields)
        );
        Ok(())
    }
}
