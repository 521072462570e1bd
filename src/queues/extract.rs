//! Flattening of queue status flavor lists into records

use serde::{Deserialize, Serialize};

use super::error::QueueError;
use super::model::{FlatRecord, FlavorStatus, QueueObject, StatusFields};

/// What to do when a queue has no `status` or no flavor field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingStatusPolicy {
    /// Abort the whole parse
    #[default]
    Fail,
    /// Treat the queue as having no reservation/usage
    Empty,
}

/// Reservation and usage records gathered from a list of queues
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QueueRecords {
    pub reservation: Vec<FlatRecord>,
    pub usage: Vec<FlatRecord>,
}

impl QueueRecords {
    pub fn len(&self) -> usize {
        self.reservation.len() + self.usage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reservation.is_empty() && self.usage.is_empty()
    }
}

/// Flatten `queue.status[status_field]` into one record per flavor resource.
///
/// Output follows input order: flavors first, then resources within a flavor.
pub fn extract(queue: &QueueObject, status_field: &str) -> Result<Vec<FlatRecord>, QueueError> {
    let queue_name = queue
        .name()
        .ok_or_else(|| QueueError::missing("<unnamed>", "metadata.name"))?;

    let status = queue
        .status
        .as_ref()
        .ok_or_else(|| QueueError::missing(queue_name, "status"))?;

    let field = status
        .get(status_field)
        .ok_or_else(|| QueueError::missing(queue_name, format!("status.{}", status_field)))?;

    let flavors =
        Vec::<FlavorStatus>::deserialize(field).map_err(|source| QueueError::InvalidField {
            queue: queue_name.to_string(),
            field: format!("status.{}", status_field),
            source,
        })?;

    let records = flavors
        .into_iter()
        .flat_map(|flavor| {
            let flavor_name = flavor.name;
            flavor
                .resources
                .into_iter()
                .map(move |resource| FlatRecord {
                    queue_name: queue_name.to_string(),
                    flavor_name: flavor_name.clone(),
                    resource: resource.name,
                    total: resource.total,
                })
        })
        .collect();

    Ok(records)
}

/// Extract reservation and usage records from every queue, appending across queues
pub fn parse_list(
    queues: &[QueueObject],
    fields: &StatusFields,
    policy: MissingStatusPolicy,
) -> Result<QueueRecords, QueueError> {
    let mut records = QueueRecords::default();

    for queue in queues {
        records
            .reservation
            .extend(extract_with_policy(queue, &fields.reservation, policy)?);
        records
            .usage
            .extend(extract_with_policy(queue, &fields.usage, policy)?);
    }

    Ok(records)
}

fn extract_with_policy(
    queue: &QueueObject,
    status_field: &str,
    policy: MissingStatusPolicy,
) -> Result<Vec<FlatRecord>, QueueError> {
    match extract(queue, status_field) {
        Err(err) if err.is_missing_field() && policy == MissingStatusPolicy::Empty => {
            crate::log_debug!("{}; treating as no usage", err);
            Ok(Vec::new())
        }
        result => result,
    }
}
