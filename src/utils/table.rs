//! Report output: GitHub-flavored tables, JSON or YAML

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::io::Write;
use tabled::Table;
use tabled::settings::Style;

use crate::queues::{FlatRecord, QueueReport};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Yaml,
}

/// Render records as a markdown table with `queueName | flavorName | resource | total` headers
pub fn render_table(records: &[FlatRecord]) -> String {
    Table::new(records.iter()).with(Style::markdown()).to_string()
}

/// Write the whole report to `out` in the requested format
pub fn write_report<W: Write>(out: &mut W, report: &QueueReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => {
            for view in report.views() {
                writeln!(out, "{}:", view.title())?;
                writeln!(out, "{}", render_table(view.records))?;
                writeln!(out)?;
            }
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(report).context("Failed to serialize report")?;
            writeln!(out, "{}", json)?;
        }
        OutputFormat::Yaml => {
            let yaml = serde_yaml::to_string(report).context("Failed to serialize report")?;
            write!(out, "{}", yaml)?;
        }
    }

    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queues::QueueRecords;

    fn record(queue: &str, total: &str) -> FlatRecord {
        FlatRecord {
            queue_name: queue.to_string(),
            flavor_name: "default".to_string(),
            resource: "cpu".to_string(),
            total: total.to_string(),
        }
    }

    fn report() -> QueueReport {
        QueueReport {
            cluster: QueueRecords {
                reservation: vec![record("cq1", "4")],
                usage: vec![record("cq1", "2")],
            },
            local: QueueRecords::default(),
        }
    }

    #[test]
    fn test_render_table_headers() {
        let table = render_table(&[record("cq1", "16Gi")]);
        let header = table.lines().next().unwrap();

        assert!(header.starts_with('|'));
        for column in ["queueName", "flavorName", "resource", "total"] {
            assert!(header.contains(column), "missing column {column}");
        }
        assert!(table.contains("16Gi"));
    }

    #[test]
    fn test_render_empty_table_keeps_headers() {
        let table = render_table(&[]);
        assert!(table.contains("queueName"));
        assert!(!table.contains("cq1"));
    }

    #[test]
    fn test_write_report_tables_in_order() {
        let mut out = Vec::new();
        write_report(&mut out, &report(), OutputFormat::Table).unwrap();
        let text = String::from_utf8(out).unwrap();

        let positions: Vec<usize> = [
            "Cluster Queue Flavors reservations:",
            "Cluster Queue Flavors usage:",
            "Local Queue Flavors reservations:",
            "Local Queue Flavors usage:",
        ]
        .iter()
        .map(|title| text.find(title).unwrap())
        .collect();

        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(text.matches("queueName").count(), 4);
    }

    #[test]
    fn test_write_report_json() {
        let mut out = Vec::new();
        write_report(&mut out, &report(), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["clusterReservation"][0]["total"], "4");
        assert_eq!(value["localUsage"], serde_json::json!([]));
    }

    #[test]
    fn test_write_report_yaml() {
        let mut out = Vec::new();
        write_report(&mut out, &report(), OutputFormat::Yaml).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("clusterUsage:"));
        assert!(text.contains("queueName: cq1"));
    }
}
