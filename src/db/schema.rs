use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::Bookmark;

/// Current shape of the persisted document. Bump on any incompatible change.
pub const STORE_VERSION: u64 = 1;

/// The whole persisted collection: `{"version": 1, "bookmarks": [...]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreDocument {
    pub version: u64,
    pub bookmarks: Vec<Bookmark>,
}

impl Default for StoreDocument {
    fn default() -> Self {
        Self {
            version: STORE_VERSION,
            bookmarks: Vec::new(),
        }
    }
}

/// Why a persisted payload was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Corruption {
    Syntax(String),
    NotAnObject,
    UnsupportedVersion(Option<Value>),
    MissingBookmarks,
    MalformedBookmarks(String),
}

impl std::fmt::Display for Corruption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Corruption::Syntax(e) => write!(f, "not valid JSON: {}", e),
            Corruption::NotAnObject => write!(f, "top-level value is not an object"),
            Corruption::UnsupportedVersion(Some(v)) => write!(f, "unsupported version {}", v),
            Corruption::UnsupportedVersion(None) => write!(f, "missing version"),
            Corruption::MissingBookmarks => write!(f, "bookmarks is missing or not an array"),
            Corruption::MalformedBookmarks(e) => write!(f, "malformed bookmark entry: {}", e),
        }
    }
}

/// Result of validating a persisted payload.
#[derive(Debug)]
pub enum Validated {
    Valid(StoreDocument),
    Fallback(Corruption),
}

pub fn validate(raw: &str) -> Validated {
    let value: Value = match serde_json::from_str(raw) {
        Ok(v) => v,
        Err(e) => return Validated::Fallback(Corruption::Syntax(e.to_string())),
    };

    let Value::Object(mut map) = value else {
        return Validated::Fallback(Corruption::NotAnObject);
    };

    match map.get("version") {
        Some(v) if v.as_u64() == Some(STORE_VERSION) => {}
        other => return Validated::Fallback(Corruption::UnsupportedVersion(other.cloned())),
    }

    let bookmarks = match map.remove("bookmarks") {
        Some(list @ Value::Array(_)) => list,
        _ => return Validated::Fallback(Corruption::MissingBookmarks),
    };

    match serde_json::from_value::<Vec<Bookmark>>(bookmarks) {
        Ok(bookmarks) => Validated::Valid(StoreDocument {
            version: STORE_VERSION,
            bookmarks,
        }),
        Err(e) => Validated::Fallback(Corruption::MalformedBookmarks(e.to_string())),
    }
}
