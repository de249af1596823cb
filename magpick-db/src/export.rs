//! Loading crawler export files.
//!
//! Exports are either a JSON array of record objects or JSON lines (one
//! object per line). Field names follow the crawler's output:
//! ```json
//! {"fanhao": "mism-091", "title": "...", "actress": ["A", "B"], "magnets": ["magnet:?..."]}
//! ```
//! `code` is accepted in place of `fanhao`, `actress` may be a single
//! string, and a lone `magnet` string stands in for a one-element `magnets`
//! list. `magnets` is kept as-is even when it is not a list.

use std::path::Path;

use magpick_core::LinkField;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("JSON parse error in {path} (line {line}): {source}")]
    Parse {
        path: String,
        line: usize,
        source: serde_json::Error,
    },
}

/// One record ready to be written to the store.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportRecord {
    /// Upper-cased code.
    pub code: String,
    pub title: String,
    pub actresses: Vec<String>,
    pub links: LinkField,
}

impl ImportRecord {
    pub fn new(code: &str) -> Self {
        Self {
            code: code.trim().to_uppercase(),
            title: String::new(),
            actresses: Vec::new(),
            links: LinkField::Missing,
        }
    }

    /// Actress names as stored in the display column.
    pub fn actress_display(&self) -> String {
        self.actresses.join(", ")
    }
}

#[derive(Debug, Deserialize)]
struct RawRecord {
    #[serde(alias = "code")]
    fanhao: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    actress: Option<Actresses>,
    #[serde(default)]
    magnets: Option<Value>,
    #[serde(default)]
    magnet: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Actresses {
    One(String),
    Many(Vec<String>),
}

impl RawRecord {
    fn into_import(self) -> Option<ImportRecord> {
        let code = self.fanhao.filter(|c| !c.trim().is_empty())?;
        let mut record = ImportRecord::new(&code);
        record.title = self.title.unwrap_or_default();
        record.actresses = match self.actress {
            None => Vec::new(),
            Some(Actresses::One(name)) => vec![name],
            Some(Actresses::Many(names)) => names,
        }
        .into_iter()
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .collect();
        record.links = match (self.magnets, self.magnet) {
            (Some(value), _) => LinkField::from_json(Some(value)),
            (None, Some(magnet)) => LinkField::List(vec![magnet]),
            (None, None) => LinkField::Missing,
        };
        Some(record)
    }
}

/// Parse export text. Entries without a code are dropped with a warning.
///
/// `source` names the input in error messages.
pub fn parse_export(text: &str, source: &str) -> Result<Vec<ImportRecord>, ExportError> {
    let trimmed = text.trim_start();
    let raws: Vec<RawRecord> = if trimmed.starts_with('[') {
        serde_json::from_str(trimmed).map_err(|e| ExportError::Parse {
            path: source.to_string(),
            line: e.line(),
            source: e,
        })?
    } else {
        let mut raws = Vec::new();
        for (idx, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let raw = serde_json::from_str(line).map_err(|e| ExportError::Parse {
                path: source.to_string(),
                line: idx + 1,
                source: e,
            })?;
            raws.push(raw);
        }
        raws
    };

    let total = raws.len();
    let records: Vec<ImportRecord> = raws.into_iter().filter_map(RawRecord::into_import).collect();
    if records.len() < total {
        log::warn!(
            "{}: skipped {} entries without a code",
            source,
            total - records.len(),
        );
    }
    Ok(records)
}

/// Read and parse an export file.
pub fn load_export(path: &Path) -> Result<Vec<ImportRecord>, ExportError> {
    let text = std::fs::read_to_string(path).map_err(|e| ExportError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_export(&text, &path.display().to_string())
}
