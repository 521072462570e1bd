//! Aggregation of ClusterQueue and LocalQueue list responses into a report

use serde::Serialize;

use super::error::QueueError;
use super::extract::{MissingStatusPolicy, QueueRecords, parse_list};
use super::model::{FlatRecord, QueueKind, QueueList, QueueObject, StatusFields};

/// Field names and missing-status handling used while aggregating
#[derive(Debug, Clone)]
pub struct AggregateOptions {
    pub cluster_fields: StatusFields,
    pub local_fields: StatusFields,
    pub missing_status: MissingStatusPolicy,
}

impl Default for AggregateOptions {
    fn default() -> Self {
        Self {
            cluster_fields: StatusFields::for_kind(QueueKind::Cluster),
            local_fields: StatusFields::for_kind(QueueKind::Local),
            missing_status: MissingStatusPolicy::default(),
        }
    }
}

/// The four reservation/usage views over cluster and local queues
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueueReport {
    pub cluster: QueueRecords,
    pub local: QueueRecords,
}

/// A titled table of the report
#[derive(Debug, Clone, Copy)]
pub struct ReportView<'a> {
    pub key: &'static str,
    pub kind: QueueKind,
    pub measure: &'static str,
    pub records: &'a [FlatRecord],
}

impl ReportView<'_> {
    /// e.g. `Cluster Queue Flavors reservations`
    pub fn title(&self) -> String {
        format!("{} Flavors {}", self.kind.label(), self.measure)
    }
}

impl QueueReport {
    /// Views in print order: cluster reservation, cluster usage, local reservation, local usage
    pub fn views(&self) -> [ReportView<'_>; 4] {
        [
            ReportView {
                key: "clusterReservation",
                kind: QueueKind::Cluster,
                measure: "reservations",
                records: &self.cluster.reservation,
            },
            ReportView {
                key: "clusterUsage",
                kind: QueueKind::Cluster,
                measure: "usage",
                records: &self.cluster.usage,
            },
            ReportView {
                key: "localReservation",
                kind: QueueKind::Local,
                measure: "reservations",
                records: &self.local.reservation,
            },
            ReportView {
                key: "localUsage",
                kind: QueueKind::Local,
                measure: "usage",
                records: &self.local.usage,
            },
        ]
    }
}

impl Serialize for QueueReport {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;

        let views = self.views();
        let mut map = serializer.serialize_map(Some(views.len()))?;
        for view in views {
            map.serialize_entry(view.key, view.records)?;
        }
        map.end()
    }
}

/// Decode both list responses and build the report.
///
/// Nothing is returned unless both responses are fully parsed.
pub fn aggregate(
    cluster_json: &str,
    local_json: &str,
    options: &AggregateOptions,
) -> Result<QueueReport, QueueError> {
    let cluster_queues = decode_items(QueueKind::Cluster, cluster_json)?;
    let local_queues = decode_items(QueueKind::Local, local_json)?;

    crate::log_debug!(
        "Aggregating {} cluster queue(s) and {} local queue(s)",
        cluster_queues.len(),
        local_queues.len()
    );

    let cluster = parse_list(
        &cluster_queues,
        &options.cluster_fields,
        options.missing_status,
    )?;
    let local = parse_list(&local_queues, &options.local_fields, options.missing_status)?;

    Ok(QueueReport { cluster, local })
}

fn decode_items(kind: QueueKind, raw: &str) -> Result<Vec<QueueObject>, QueueError> {
    let list: QueueList =
        serde_json::from_str(raw).map_err(|e| QueueError::malformed(kind, e.to_string()))?;

    list.items
        .ok_or_else(|| QueueError::malformed(kind, "response has no `items` field"))
}
