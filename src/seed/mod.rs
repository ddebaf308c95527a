//! Load group definitions from JSON and upsert them into the `groups`
//! collection of a document store.

pub mod firestore;
pub mod store;
pub mod value;

use std::fmt;
use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;

pub use firestore::FirestoreStore;
pub use store::{DocumentStore, DryRunStore};
pub use value::{FieldValue, Fields};

pub const GROUPS_COLLECTION: &str = "groups";

/// Record fields copied onto the document when present and non-null.
pub const COPIED_FIELDS: [&str; 7] = [
    "name",
    "language",
    "groupPhotoUrl",
    "description",
    "tutorId",
    "maxLearners",
    "category",
];

/// Array fields written as `[]` when the record has none.
pub const ARRAY_FIELDS: [&str; 2] = ["tags", "communityTags"];

const UNNAMED_GROUP: &str = "Unnamed Group";

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("group definitions not found at {0}")]
    InputMissing(PathBuf),
    #[error("failed to read {path}: {source}")]
    ReadInput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not decode JSON from {path}: {source}")]
    ParseInput {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("{0} does not contain a JSON array of groups")]
    NotAnArray(PathBuf),
    #[error("service account key not found at {0}")]
    CredentialsMissing(PathBuf),
    #[error("failed to read service account key {path}: {source}")]
    Credentials {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid service account key {path}: {source}")]
    CredentialsFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("no project id configured and none found in the service account key")]
    NoProject,
    #[error("signing token request failed: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("token exchange failed: {0}")]
    Token(String),
    #[error("request rejected with status {status}: {body}")]
    Api { status: u16, body: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    NotAnObject,
    MissingId,
    /// Ids may not contain `/`, which would address a nested path.
    InvalidId(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NotAnObject => write!(f, "entry is not a JSON object"),
            SkipReason::MissingId => write!(f, "missing 'id'"),
            SkipReason::InvalidId(id) => write!(f, "invalid id '{}'", id),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupDocument {
    pub id: String,
    pub fields: Fields,
}

/// Read the definitions file. Anything other than a top-level JSON array
/// is an error.
pub fn load_group_definitions(path: &Path) -> Result<Vec<Value>, SeedError> {
    if !path.exists() {
        return Err(SeedError::InputMissing(path.to_path_buf()));
    }
    let text = std::fs::read_to_string(path).map_err(|source| SeedError::ReadInput {
        path: path.to_path_buf(),
        source,
    })?;
    let value: Value = serde_json::from_str(&text).map_err(|source| SeedError::ParseInput {
        path: path.to_path_buf(),
        source,
    })?;
    match value {
        Value::Array(records) => Ok(records),
        _ => Err(SeedError::NotAnArray(path.to_path_buf())),
    }
}

fn placeholder_last_message() -> FieldValue {
    let mut msg = Fields::new();
    msg.insert("text".into(), FieldValue::string("Group created."));
    msg.insert("senderId".into(), FieldValue::string("system"));
    msg.insert("senderName".into(), FieldValue::string("System"));
    msg.insert("timestamp".into(), FieldValue::ServerTimestamp);
    msg.insert("type".into(), FieldValue::string("system_event"));
    FieldValue::Map(msg)
}

/// Map one raw record onto the document written for it.
pub fn build_group_document(record: &Value) -> Result<GroupDocument, SkipReason> {
    let obj = record.as_object().ok_or(SkipReason::NotAnObject)?;
    let id = match obj.get("id") {
        Some(Value::String(s)) if !s.trim().is_empty() => s.clone(),
        _ => return Err(SkipReason::MissingId),
    };
    if id.contains('/') {
        return Err(SkipReason::InvalidId(id));
    }

    let mut fields = Fields::new();
    for key in COPIED_FIELDS {
        match obj.get(key) {
            None | Some(Value::Null) => {}
            Some(v) => {
                fields.insert(key.to_string(), FieldValue::from(v));
            }
        }
    }
    for key in ARRAY_FIELDS {
        let v = match obj.get(key) {
            None | Some(Value::Null) => FieldValue::Array(Vec::new()),
            Some(v) => FieldValue::from(v),
        };
        fields.insert(key.to_string(), v);
    }
    fields.insert("lastActivity".into(), FieldValue::ServerTimestamp);
    fields.insert("updatedAt".into(), FieldValue::ServerTimestamp);
    fields.insert("lastMessage".into(), placeholder_last_message());

    Ok(GroupDocument { id, fields })
}

fn record_label(record: &Value) -> String {
    record
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or(UNNAMED_GROUP)
        .to_string()
}

#[derive(Debug, Clone, PartialEq)]
pub struct Skipped {
    pub index: usize,
    pub label: String,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WriteFailure {
    pub id: String,
    pub error: String,
    /// The payload that was attempted, as plain JSON.
    pub payload: Value,
}

#[derive(Debug, Default)]
pub struct SeedReport {
    pub written: Vec<String>,
    pub skipped: Vec<Skipped>,
    pub failed: Vec<WriteFailure>,
}

impl SeedReport {
    pub fn total(&self) -> usize {
        self.written.len() + self.skipped.len() + self.failed.len()
    }
}

/// Upsert every valid record into `groups`. Invalid records are skipped and
/// failed writes recorded; neither stops the run.
pub fn seed_groups(store: &dyn DocumentStore, records: &[Value]) -> SeedReport {
    let mut report = SeedReport::default();
    tracing::info!("found {} group definitions, starting upload", records.len());

    for (index, record) in records.iter().enumerate() {
        let doc = match build_group_document(record) {
            Ok(doc) => doc,
            Err(reason) => {
                let label = record_label(record);
                tracing::warn!("skipping group '{}': {}", label, reason);
                report.skipped.push(Skipped {
                    index,
                    label,
                    reason,
                });
                continue;
            }
        };

        tracing::info!("processing group: {} ({})", doc.id, record_label(record));
        match store.upsert(GROUPS_COLLECTION, &doc.id, &doc.fields) {
            Ok(()) => {
                tracing::info!("wrote {}/{}", GROUPS_COLLECTION, doc.id);
                report.written.push(doc.id);
            }
            Err(e) => {
                let payload = value::fields_to_json(&doc.fields);
                tracing::error!("failed to write group {}: {}", doc.id, e);
                tracing::debug!("attempted payload: {}", payload);
                report.failed.push(WriteFailure {
                    id: doc.id,
                    error: e.to_string(),
                    payload,
                });
            }
        }
    }

    tracing::info!(
        "seeding finished: {} written, {} skipped, {} failed",
        report.written.len(),
        report.skipped.len(),
        report.failed.len()
    );
    report
}
