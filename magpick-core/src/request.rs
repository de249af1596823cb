//! Batch request files.
//!
//! A request file is a JSON object mapping a category to the terms to look
//! up, in the order they should be processed:
//! ```json
//! {
//!     "fanhao": ["jufd 948", "mvbd-078 102 116"],
//!     "series": ["mvsd"],
//!     "actress": ["Some Name"]
//! }
//! ```

use std::path::Path;

use serde_json::Value;
use thiserror::Error;

use crate::types::Category;

#[derive(Debug, Error)]
pub enum RequestError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("JSON parse error in {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
    #[error("Request must be a JSON object of category -> term list")]
    NotAnObject,
    #[error("Terms for '{0}' must be a list of strings")]
    BadTerms(String),
}

/// The terms listed under one request key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestGroup {
    /// The key as written in the file.
    pub key: String,
    /// `None` when the key names no known category.
    pub category: Option<Category>,
    pub terms: Vec<String>,
}

/// A parsed request file, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchRequest {
    pub groups: Vec<RequestGroup>,
}

impl BatchRequest {
    /// Parse request JSON text.
    pub fn from_json_str(text: &str) -> Result<Self, RequestError> {
        let value: Value = serde_json::from_str(text).map_err(|e| RequestError::Parse {
            path: "<input>".to_string(),
            source: e,
        })?;
        Self::from_value(value)
    }

    /// Build a request from an already-parsed JSON value.
    pub fn from_value(value: Value) -> Result<Self, RequestError> {
        let Value::Object(map) = value else {
            return Err(RequestError::NotAnObject);
        };

        let mut groups = Vec::with_capacity(map.len());
        for (key, terms) in map {
            let terms = match terms {
                Value::Array(items) => items
                    .into_iter()
                    .map(|item| match item {
                        Value::String(s) => Ok(s),
                        _ => Err(RequestError::BadTerms(key.clone())),
                    })
                    .collect::<Result<Vec<_>, _>>()?,
                _ => return Err(RequestError::BadTerms(key)),
            };
            groups.push(RequestGroup {
                category: key.parse().ok(),
                key,
                terms,
            });
        }

        Ok(Self { groups })
    }

    /// Total number of terms across all groups.
    pub fn term_count(&self) -> usize {
        self.groups.iter().map(|g| g.terms.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.term_count() == 0
    }
}

/// Load a request file from disk.
pub fn load_request(path: &Path) -> Result<BatchRequest, RequestError> {
    let contents = std::fs::read_to_string(path).map_err(|e| RequestError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    BatchRequest::from_json_str(&contents).map_err(|e| match e {
        RequestError::Parse { source, .. } => RequestError::Parse {
            path: path.display().to_string(),
            source,
        },
        other => other,
    })
}
