//! Kueue queue status aggregation
//!
//! Turns the JSON returned by `kubectl kueue list clusterqueue|localqueue -o json`
//! into flat `(queue, flavor, resource, total)` records.

pub mod aggregate;
pub mod error;
pub mod extract;
pub mod model;

pub use aggregate::{AggregateOptions, QueueReport, aggregate};
pub use error::QueueError;
pub use extract::{MissingStatusPolicy, QueueRecords, extract, parse_list};
pub use model::{FlatRecord, FlavorStatus, QueueKind, QueueObject, ResourceEntry, StatusFields};
