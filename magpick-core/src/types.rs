//! Data model types shared by the store, the selector and the dispatcher.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ── Record ──────────────────────────────────────────────────────────────────

/// A catalog record as returned by a [`RecordStore`](crate::RecordStore).
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Canonical code, e.g. `"MISM-091"`.
    pub code: String,
    pub title: String,
    pub actress: String,
    /// Candidate download links, as stored.
    pub links: LinkField,
}

impl Record {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            title: String::new(),
            actress: String::new(),
            links: LinkField::Missing,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_actress(mut self, actress: impl Into<String>) -> Self {
        self.actress = actress.into();
        self
    }

    pub fn with_links<I, S>(mut self, links: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.links = LinkField::List(links.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_link_field(mut self, links: LinkField) -> Self {
        self.links = links;
        self
    }
}

/// The candidate-link attribute of a record.
///
/// Stores hold links as loosely typed data, so a record can lack the
/// attribute entirely or carry something that is not a list of strings.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LinkField {
    /// No link attribute (or an explicit null).
    #[default]
    Missing,
    /// A proper list of link strings. May be empty.
    List(Vec<String>),
    /// A list holding at least one element that is not a string.
    Mixed(Vec<Value>),
    /// Present, but not a list.
    Malformed(Value),
}

impl LinkField {
    /// Classify a raw stored value.
    pub fn from_json(value: Option<Value>) -> Self {
        match value {
            None | Some(Value::Null) => LinkField::Missing,
            Some(Value::Array(items)) if items.iter().all(Value::is_string) => LinkField::List(
                items
                    .into_iter()
                    .filter_map(|v| match v {
                        Value::String(s) => Some(s),
                        _ => None,
                    })
                    .collect(),
            ),
            Some(Value::Array(items)) => LinkField::Mixed(items),
            Some(other) => LinkField::Malformed(other),
        }
    }

    /// Serialize back to the JSON text a store keeps, or `None` when missing.
    pub fn to_json(&self) -> Option<String> {
        match self {
            LinkField::Missing => None,
            LinkField::List(links) => Some(Value::from(links.clone()).to_string()),
            LinkField::Mixed(items) => Some(Value::Array(items.clone()).to_string()),
            LinkField::Malformed(value) => Some(value.to_string()),
        }
    }

    /// Best-effort access to the first raw element of the field.
    ///
    /// Used when the field is not a usable list but something link-like
    /// may still be recovered from it.
    pub fn first_raw(&self) -> Option<String> {
        match self {
            LinkField::Missing => None,
            LinkField::List(links) => links.first().cloned(),
            LinkField::Mixed(items) => items.first().and_then(render_raw),
            LinkField::Malformed(value) => match value {
                Value::Array(items) => items.first().and_then(render_raw),
                Value::Object(map) => map.values().next().and_then(render_raw),
                other => render_raw(other),
            },
        }
    }
}

fn render_raw(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

// ── Category ────────────────────────────────────────────────────────────────

/// A request-file category: which record attribute a term is matched on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Exact catalog codes, possibly loosely formatted.
    Fanhao,
    /// Keywords matched anywhere in the title.
    Title,
    /// Exact actress names.
    Actress,
    /// Code prefixes, e.g. `"MVSD"`.
    Series,
}

impl Category {
    pub fn all() -> &'static [Category] {
        &[
            Category::Fanhao,
            Category::Title,
            Category::Actress,
            Category::Series,
        ]
    }

    /// The key used for this category in request files.
    pub fn key(&self) -> &'static str {
        match self {
            Category::Fanhao => "fanhao",
            Category::Title => "title",
            Category::Actress => "actress",
            Category::Series => "series",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Error returned when a request key names no known category.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown category: {0}")]
pub struct CategoryParseError(pub String);

impl FromStr for Category {
    type Err = CategoryParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        Category::all()
            .iter()
            .copied()
            .find(|c| c.key() == lower)
            .ok_or_else(|| CategoryParseError(s.to_string()))
    }
}

// ── Query ───────────────────────────────────────────────────────────────────

/// One store lookup, built per request term and dropped after use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    /// Exact code match. The code is already upper-cased.
    ExactCode(String),
    /// Case-insensitive code prefix.
    SeriesPrefix(String),
    /// Case-insensitive title substring.
    TitleKeyword(String),
    /// Exact actress name.
    ActorExact(String),
}

/// The kind of a [`Query`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKind {
    ExactCode,
    SeriesPrefix,
    TitleKeyword,
    ActorExact,
}

impl Query {
    pub fn kind(&self) -> QueryKind {
        match self {
            Query::ExactCode(_) => QueryKind::ExactCode,
            Query::SeriesPrefix(_) => QueryKind::SeriesPrefix,
            Query::TitleKeyword(_) => QueryKind::TitleKeyword,
            Query::ActorExact(_) => QueryKind::ActorExact,
        }
    }

    /// The string matched against the store.
    pub fn value(&self) -> &str {
        match self {
            Query::ExactCode(s)
            | Query::SeriesPrefix(s)
            | Query::TitleKeyword(s)
            | Query::ActorExact(s) => s,
        }
    }
}

impl fmt::Display for QueryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            QueryKind::ExactCode => "exact_code",
            QueryKind::SeriesPrefix => "series_prefix",
            QueryKind::TitleKeyword => "title_keyword",
            QueryKind::ActorExact => "actor_exact",
        })
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.kind(), self.value())
    }
}
