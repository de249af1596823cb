//! The record store seam.

use crate::types::{Query, Record};

/// A source of catalog records.
///
/// Implementations return records in a stable order. An empty result is
/// not an error.
pub trait RecordStore {
    type Error: std::error::Error;

    /// Exact match on the code. Callers pass upper-cased codes.
    fn find_by_code(&self, code: &str) -> Result<Vec<Record>, Self::Error>;

    /// Case-insensitive code prefix match.
    fn find_by_series(&self, prefix: &str) -> Result<Vec<Record>, Self::Error>;

    /// Case-insensitive substring match on the title.
    fn find_by_title(&self, keyword: &str) -> Result<Vec<Record>, Self::Error>;

    /// Exact match on the actress name.
    fn find_by_actress(&self, name: &str) -> Result<Vec<Record>, Self::Error>;

    /// Run a query against the lookup its kind calls for.
    fn lookup(&self, query: &Query) -> Result<Vec<Record>, Self::Error> {
        match query {
            Query::ExactCode(code) => self.find_by_code(code),
            Query::SeriesPrefix(prefix) => self.find_by_series(prefix),
            Query::TitleKeyword(keyword) => self.find_by_title(keyword),
            Query::ActorExact(name) => self.find_by_actress(name),
        }
    }
}

/// A store held entirely in memory, matching the same way the SQLite store does.
///
/// `actress` is the comma-joined display list; an actress lookup matches any
/// one credited name exactly.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: Vec<Record>,
}

impl MemoryStore {
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    fn filter(&self, pred: impl Fn(&Record) -> bool) -> Vec<Record> {
        self.records.iter().filter(|r| pred(r)).cloned().collect()
    }
}

impl RecordStore for MemoryStore {
    type Error = std::convert::Infallible;

    fn find_by_code(&self, code: &str) -> Result<Vec<Record>, Self::Error> {
        Ok(self.filter(|r| r.code == code))
    }

    fn find_by_series(&self, prefix: &str) -> Result<Vec<Record>, Self::Error> {
        let prefix = prefix.to_ascii_lowercase();
        Ok(self.filter(|r| r.code.to_ascii_lowercase().starts_with(&prefix)))
    }

    fn find_by_title(&self, keyword: &str) -> Result<Vec<Record>, Self::Error> {
        let keyword = keyword.to_ascii_lowercase();
        Ok(self.filter(|r| r.title.to_ascii_lowercase().contains(&keyword)))
    }

    fn find_by_actress(&self, name: &str) -> Result<Vec<Record>, Self::Error> {
        Ok(self.filter(|r| r.actress.split(',').any(|credited| credited.trim() == name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> MemoryStore {
        MemoryStore::new(vec![
            Record::new("MVSD-164").with_title("First Title").with_actress("A"),
            Record::new("MVSD-208").with_title("Second title").with_actress("B"),
            Record::new("JUFD-948").with_title("Other").with_actress("A"),
        ])
    }

    #[test]
    fn lookup_dispatches_by_kind() {
        let s = store();
        let codes = |q: Query| -> Vec<String> {
            s.lookup(&q).unwrap().into_iter().map(|r| r.code).collect()
        };
        assert_eq!(codes(Query::ExactCode("JUFD-948".into())), ["JUFD-948"]);
        assert_eq!(
            codes(Query::SeriesPrefix("mvsd".into())),
            ["MVSD-164", "MVSD-208"]
        );
        assert_eq!(
            codes(Query::TitleKeyword("TITLE".into())),
            ["MVSD-164", "MVSD-208"]
        );
        assert_eq!(
            codes(Query::ActorExact("A".into())),
            ["MVSD-164", "JUFD-948"]
        );
        assert!(codes(Query::ActorExact("a".into())).is_empty());
        assert!(codes(Query::ExactCode("jufd-948".into())).is_empty());
    }

    #[test]
    fn actress_lookup_matches_any_credited_name() {
        let s = MemoryStore::new(vec![
            Record::new("ABC-001").with_actress("Name One, Name Two"),
            Record::new("ABC-002").with_actress("Name Two"),
            Record::new("ABC-003").with_actress("Name Twelve"),
        ]);
        let codes: Vec<String> = s
            .find_by_actress("Name Two")
            .unwrap()
            .into_iter()
            .map(|r| r.code)
            .collect();
        assert_eq!(codes, ["ABC-001", "ABC-002"]);
        assert!(s.find_by_actress("Name").unwrap().is_empty());
    }
}
