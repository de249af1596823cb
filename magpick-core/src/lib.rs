//! Core logic for picking download links out of catalog records.
//!
//! Request terms are normalized into store queries, each matched record's
//! candidate links are run through a fixed rule cascade, and the chosen
//! links are written to a batched text report. Storage is behind the
//! [`RecordStore`] trait; `magpick-db` provides the SQLite implementation.

pub mod dispatch;
pub mod normalize;
pub mod report;
pub mod request;
pub mod select;
pub mod store;
pub mod types;

pub use dispatch::{
    BatchSummary, DispatchError, DispatchOptions, RecordOutcome, SkipReason, resolve_record,
    run_batch,
};
pub use normalize::{normalize, queries_for};
pub use report::{BATCH_SIZE, ReportWriter, SEPARATOR_LINES};
pub use request::{BatchRequest, RequestError, RequestGroup, load_request};
pub use select::{
    Reason, SelectMode, Selection, select, select_best, select_subtitle, select_with_reason,
};
pub use store::{MemoryStore, RecordStore};
pub use types::{Category, CategoryParseError, LinkField, Query, QueryKind, Record};
