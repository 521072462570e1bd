//! Typed view of Kueue queue list responses

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use tabled::Tabled;

/// Kind of Kueue queue being listed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueueKind {
    Cluster,
    Local,
}

impl QueueKind {
    /// Resource name understood by `kubectl kueue list`
    pub fn resource(&self) -> &'static str {
        match self {
            QueueKind::Cluster => "clusterqueue",
            QueueKind::Local => "localqueue",
        }
    }

    /// Human readable label used in report titles
    pub fn label(&self) -> &'static str {
        match self {
            QueueKind::Cluster => "Cluster Queue",
            QueueKind::Local => "Local Queue",
        }
    }
}

impl std::fmt::Display for QueueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.resource())
    }
}

/// Names of the reservation and usage fields under a queue's `status`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusFields {
    pub reservation: String,
    pub usage: String,
}

impl StatusFields {
    pub fn new(reservation: impl Into<String>, usage: impl Into<String>) -> Self {
        Self {
            reservation: reservation.into(),
            usage: usage.into(),
        }
    }

    /// Field names served by the Kueue v1beta1 API for the given kind.
    /// LocalQueue serializes its usage list as `flavorUsage` (singular).
    pub fn for_kind(kind: QueueKind) -> Self {
        match kind {
            QueueKind::Cluster => Self::new("flavorsReservation", "flavorsUsage"),
            QueueKind::Local => Self::new("flavorsReservation", "flavorUsage"),
        }
    }
}

/// `{"items": [...]}` envelope; `items` stays optional so its absence can be reported
#[derive(Debug, Deserialize)]
pub struct QueueList {
    #[serde(default)]
    pub items: Option<Vec<QueueObject>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ObjectMeta {
    #[serde(default)]
    pub name: Option<String>,
}

/// A ClusterQueue or LocalQueue item.
///
/// `status` is kept as a map because the flavor field names are configurable.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueueObject {
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub status: Option<Map<String, Value>>,
}

impl QueueObject {
    pub fn name(&self) -> Option<&str> {
        self.metadata.name.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FlavorStatus {
    pub name: String,
    pub resources: Vec<ResourceEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ResourceEntry {
    pub name: String,
    #[serde(deserialize_with = "quantity_text")]
    pub total: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Quantity {
    Text(String),
    Number(serde_json::Number),
}

// Quantities are strings on the wire; a bare number is kept as its textual form.
fn quantity_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Quantity::deserialize(deserializer)? {
        Quantity::Text(text) => text,
        Quantity::Number(number) => number.to_string(),
    })
}

/// One row of a report: queue x flavor x resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Tabled)]
#[serde(rename_all = "camelCase")]
pub struct FlatRecord {
    #[tabled(rename = "queueName")]
    pub queue_name: String,
    #[tabled(rename = "flavorName")]
    pub flavor_name: String,
    pub resource: String,
    pub total: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_kind_names() {
        assert_eq!(QueueKind::Cluster.resource(), "clusterqueue");
        assert_eq!(QueueKind::Local.resource(), "localqueue");
        assert_eq!(format!("{}", QueueKind::Local), "localqueue");
        assert_eq!(QueueKind::Cluster.label(), "Cluster Queue");
    }

    #[test]
    fn test_default_status_fields() {
        let cluster = StatusFields::for_kind(QueueKind::Cluster);
        assert_eq!(cluster.usage, "flavorsUsage");
        assert_eq!(cluster.reservation, "flavorsReservation");

        let local = StatusFields::for_kind(QueueKind::Local);
        assert_eq!(local.usage, "flavorUsage");
        assert_eq!(local.reservation, "flavorsReservation");
    }

    #[test]
    fn test_decode_queue_object() {
        let queue: QueueObject = serde_json::from_value(json!({
            "metadata": {"name": "lq1", "namespace": "team-a"},
            "status": {"flavorUsage": [], "pendingWorkloads": 3}
        }))
        .unwrap();

        assert_eq!(queue.name(), Some("lq1"));
        assert!(queue.status.unwrap().contains_key("flavorUsage"));
    }

    #[test]
    fn test_total_kept_verbatim() {
        let entry: ResourceEntry =
            serde_json::from_value(json!({"name": "memory", "total": "16Gi"})).unwrap();
        assert_eq!(entry.total, "16Gi");

        let numeric: ResourceEntry =
            serde_json::from_value(json!({"name": "cpu", "total": 4})).unwrap();
        assert_eq!(numeric.total, "4");
    }

    #[test]
    fn test_list_without_items() {
        let list: QueueList = serde_json::from_str("{}").unwrap();
        assert!(list.items.is_none());
    }
}
