//! Firestore over its REST API.
//!
//! Each upsert is a single `documents:commit` write whose update mask lists
//! every leaf field being set, which gives merge semantics: fields the
//! payload doesn't mention are left alone. Server timestamps travel as
//! `REQUEST_TIME` field transforms.

use std::path::Path;

use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::blocking::{Client, Response};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use super::store::DocumentStore;
use super::value::{FieldValue, Fields};
use super::SeedError;
use crate::settings::SeedSettings;

pub const FIRESTORE_BASE_URL: &str = "https://firestore.googleapis.com/v1";
pub const DATASTORE_SCOPE: &str = "https://www.googleapis.com/auth/datastore";
pub const EMULATOR_HOST_ENV: &str = "FIRESTORE_EMULATOR_HOST";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const DEFAULT_EMULATOR_PROJECT: &str = "demo-polyglot-connect";
const TOKEN_LIFETIME_SECS: i64 = 3600;

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

/// The fields of a service-account key file that matter here.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub project_id: Option<String>,
    pub client_email: String,
    pub private_key: String,
    pub private_key_id: Option<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

impl ServiceAccountKey {
    pub fn load(path: &Path) -> Result<Self, SeedError> {
        if !path.exists() {
            return Err(SeedError::CredentialsMissing(path.to_path_buf()));
        }
        let text = std::fs::read_to_string(path).map_err(|source| SeedError::Credentials {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| SeedError::CredentialsFormat {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[derive(Serialize)]
struct Claims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Sign an assertion with the key and trade it for an access token.
pub fn fetch_access_token(client: &Client, key: &ServiceAccountKey) -> Result<String, SeedError> {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        iss: &key.client_email,
        scope: DATASTORE_SCOPE,
        aud: &key.token_uri,
        iat: now,
        exp: now + TOKEN_LIFETIME_SECS,
    };
    let mut header = Header::new(Algorithm::RS256);
    header.kid = key.private_key_id.clone();
    let signing_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())?;
    let assertion = jsonwebtoken::encode(&header, &claims, &signing_key)?;

    let response = client
        .post(&key.token_uri)
        .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
        .send()?;
    let body = checked_body(response)?;
    let token: TokenResponse =
        serde_json::from_str(&body).map_err(|e| SeedError::Token(e.to_string()))?;
    Ok(token.access_token)
}

fn checked_body(response: Response) -> Result<String, SeedError> {
    let status = response.status();
    let body = response.text()?;
    if !status.is_success() {
        return Err(SeedError::Api {
            status: status.as_u16(),
            body,
        });
    }
    Ok(body)
}

#[derive(Debug, Clone)]
enum Auth {
    Bearer(String),
    /// The emulator accepts the fixed `owner` token and skips security rules.
    Emulator,
}

impl Auth {
    fn header_value(&self) -> String {
        match self {
            Auth::Bearer(token) => format!("Bearer {}", token),
            Auth::Emulator => "Bearer owner".to_string(),
        }
    }
}

pub struct FirestoreStore {
    client: Client,
    base_url: String,
    project_id: String,
    auth: Auth,
}

impl FirestoreStore {
    /// Build a client from settings. Against the emulator no key is read;
    /// otherwise the key is loaded and exchanged for a token up front so a
    /// bad key fails before any write.
    pub fn connect(settings: &SeedSettings) -> Result<Self, SeedError> {
        let client = Client::new();
        let emulator = settings.emulator_host.clone().or_else(|| {
            std::env::var(EMULATOR_HOST_ENV)
                .ok()
                .filter(|h| !h.trim().is_empty())
        });

        if let Some(host) = emulator {
            let project_id = settings
                .project_id
                .clone()
                .unwrap_or_else(|| DEFAULT_EMULATOR_PROJECT.to_string());
            tracing::info!("using Firestore emulator at {} (project {})", host, project_id);
            return Ok(Self {
                client,
                base_url: format!("http://{}/v1", host.trim_end_matches('/')),
                project_id,
                auth: Auth::Emulator,
            });
        }

        let key = ServiceAccountKey::load(&settings.credentials)?;
        let project_id = settings
            .project_id
            .clone()
            .or_else(|| key.project_id.clone())
            .ok_or(SeedError::NoProject)?;
        let token = fetch_access_token(&client, &key)?;
        tracing::info!("authenticated as {} for project {}", key.client_email, project_id);
        Ok(Self {
            client,
            base_url: FIRESTORE_BASE_URL.to_string(),
            project_id,
            auth: Auth::Bearer(token),
        })
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    fn database_path(&self) -> String {
        database_path(&self.project_id)
    }

    fn commit_url(&self) -> String {
        format!("{}/{}/documents:commit", self.base_url, self.database_path())
    }
}

impl DocumentStore for FirestoreStore {
    fn upsert(&self, collection: &str, id: &str, fields: &Fields) -> Result<(), SeedError> {
        let body = commit_body(&self.database_path(), collection, id, fields);
        let response = self
            .client
            .post(self.commit_url())
            .header(reqwest::header::AUTHORIZATION, self.auth.header_value())
            .json(&body)
            .send()?;
        checked_body(response)?;
        Ok(())
    }
}

pub fn database_path(project_id: &str) -> String {
    format!("projects/{}/databases/(default)", project_id)
}

fn is_simple_segment(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
}

/// Quote a field name for use in a field path when it isn't a plain
/// identifier.
pub fn quote_segment(name: &str) -> String {
    if is_simple_segment(name) {
        name.to_string()
    } else {
        format!("`{}`", name.replace('\\', "\\\\").replace('`', "\\`"))
    }
}

/// Encode a value in Firestore's typed JSON form. Server timestamps are not
/// values and are dropped here; see [`field_paths`].
pub fn encode_value(value: &FieldValue) -> Value {
    match value {
        FieldValue::Null | FieldValue::ServerTimestamp => json!({ "nullValue": null }),
        FieldValue::Bool(b) => json!({ "booleanValue": b }),
        FieldValue::Integer(i) => json!({ "integerValue": i.to_string() }),
        FieldValue::Double(d) => json!({ "doubleValue": d }),
        FieldValue::String(s) => json!({ "stringValue": s }),
        FieldValue::Array(items) => {
            let values: Vec<Value> = items.iter().map(encode_value).collect();
            json!({ "arrayValue": { "values": values } })
        }
        FieldValue::Map(fields) => json!({ "mapValue": { "fields": encode_fields(fields) } }),
    }
}

pub fn encode_fields(fields: &Fields) -> Map<String, Value> {
    fields
        .iter()
        .filter(|(_, v)| !matches!(v, FieldValue::ServerTimestamp))
        .map(|(k, v)| (k.clone(), encode_value(v)))
        .collect()
}

/// Split `fields` into update-mask paths (every leaf being set) and
/// server-timestamp transform paths.
pub fn field_paths(fields: &Fields) -> (Vec<String>, Vec<String>) {
    let mut mask = Vec::new();
    let mut transforms = Vec::new();
    collect_paths("", fields, &mut mask, &mut transforms);
    (mask, transforms)
}

fn collect_paths(prefix: &str, fields: &Fields, mask: &mut Vec<String>, transforms: &mut Vec<String>) {
    for (name, value) in fields {
        let path = if prefix.is_empty() {
            quote_segment(name)
        } else {
            format!("{}.{}", prefix, quote_segment(name))
        };
        match value {
            FieldValue::ServerTimestamp => transforms.push(path),
            FieldValue::Map(inner) if !inner.is_empty() => {
                collect_paths(&path, inner, mask, transforms)
            }
            _ => mask.push(path),
        }
    }
}

/// Request body for a merge write of `collection/id`.
pub fn commit_body(database: &str, collection: &str, id: &str, fields: &Fields) -> Value {
    let (mask, transforms) = field_paths(fields);
    let transforms: Vec<Value> = transforms
        .into_iter()
        .map(|path| json!({ "fieldPath": path, "setToServerValue": "REQUEST_TIME" }))
        .collect();
    json!({
        "writes": [{
            "update": {
                "name": format!("{}/documents/{}/{}", database, collection, id),
                "fields": encode_fields(fields),
            },
            "updateMask": { "fieldPaths": mask },
            "updateTransforms": transforms,
        }]
    })
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::seed::build_group_document;

    #[test]
    fn scalar_encoding() {
        assert_eq!(
            encode_value(&FieldValue::Integer(8)),
            json!({"integerValue": "8"})
        );
        assert_eq!(
            encode_value(&FieldValue::string("Spanish")),
            json!({"stringValue": "Spanish"})
        );
        assert_eq!(
            encode_value(&FieldValue::Bool(false)),
            json!({"booleanValue": false})
        );
        assert_eq!(
            encode_value(&FieldValue::Array(vec![])),
            json!({"arrayValue": {"values": []}})
        );
    }

    #[test]
    fn odd_field_names_are_quoted() {
        assert_eq!(quote_segment("groupPhotoUrl"), "groupPhotoUrl");
        assert_eq!(quote_segment("_x1"), "_x1");
        assert_eq!(quote_segment("1st"), "`1st`");
        assert_eq!(quote_segment("a.b"), "`a.b`");
        assert_eq!(quote_segment("a`b"), "`a\\`b`");
    }

    #[test]
    fn group_commit_body() {
        let doc = build_group_document(&json!({"id": "g1", "name": "Test"})).unwrap();
        let body = commit_body(&database_path("demo"), "groups", &doc.id, &doc.fields);
        let write = &body["writes"][0];

        assert_eq!(
            write["update"]["name"],
            json!("projects/demo/databases/(default)/documents/groups/g1")
        );
        let fields = &write["update"]["fields"];
        assert_eq!(fields["name"], json!({"stringValue": "Test"}));
        assert_eq!(fields["tags"], json!({"arrayValue": {"values": []}}));
        assert!(fields.get("lastActivity").is_none());
        assert_eq!(
            fields["lastMessage"]["mapValue"]["fields"]["type"],
            json!({"stringValue": "system_event"})
        );

        let mask = write["updateMask"]["fieldPaths"].as_array().unwrap();
        assert!(mask.contains(&json!("lastMessage.text")));
        assert!(mask.contains(&json!("communityTags")));
        assert!(!mask.contains(&json!("lastMessage")));
        assert!(!mask.contains(&json!("updatedAt")));

        let transforms: Vec<&str> = write["updateTransforms"]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["fieldPath"].as_str().unwrap())
            .collect();
        assert_eq!(
            transforms,
            vec!["lastActivity", "lastMessage.timestamp", "updatedAt"]
        );
    }

    #[test]
    fn missing_key_fails_before_any_request() {
        let td = tempfile::tempdir().unwrap();
        let settings = SeedSettings {
            credentials: td.path().join("nope.json"),
            ..Default::default()
        };
        assert!(matches!(
            FirestoreStore::connect(&settings),
            Err(SeedError::CredentialsMissing(_))
        ));
    }

    #[test]
    fn key_without_project_needs_one_configured() {
        let td = tempfile::tempdir().unwrap();
        let key = td.path().join("key.json");
        std::fs::write(
            &key,
            r#"{"client_email": "seeder@example.iam", "private_key": "not a pem"}"#,
        )
        .unwrap();
        let settings = SeedSettings {
            credentials: key,
            ..Default::default()
        };
        assert!(matches!(
            FirestoreStore::connect(&settings),
            Err(SeedError::NoProject)
        ));
    }

    #[test]
    fn emulator_skips_credentials() {
        let settings = SeedSettings {
            credentials: PathBuf::from("/does/not/exist.json"),
            emulator_host: Some("localhost:8080".into()),
            project_id: Some("local".into()),
            ..Default::default()
        };
        let store = FirestoreStore::connect(&settings).unwrap();
        assert_eq!(store.project_id(), "local");
        assert_eq!(
            store.commit_url(),
            "http://localhost:8080/v1/projects/local/databases/(default)/documents:commit"
        );
    }
}
