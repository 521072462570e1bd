//! gcloud wrapper utilities: project/zone context and cluster credentials

use anyhow::{Context, Result, anyhow};
use std::path::Path;
use std::process::Command;

use crate::utils::XpkError;
use crate::utils::dryrun::describe_command;

/// Run a gcloud command, failing on non-zero exit
pub fn run_gcloud(args: &[&str], kubeconfig: Option<&Path>) -> Result<()> {
    let mut cmd = Command::new("gcloud");

    if let Some(kc) = kubeconfig {
        cmd.env("KUBECONFIG", kc);
    }

    cmd.args(args);
    crate::log_debug!("Running: {}", describe_command("gcloud", args));

    let status = cmd.status().context("Failed to run gcloud command")?;

    if !status.success() {
        return Err(anyhow!(
            "gcloud command failed with {}: {}",
            status.code().unwrap_or(-1),
            args.join(" ")
        ));
    }

    Ok(())
}

pub fn set_project_args(project: &str) -> Vec<&str> {
    vec!["config", "set", "project", project]
}

pub fn set_zone_args(zone: &str) -> Vec<&str> {
    vec!["config", "set", "compute/zone", zone]
}

/// Set the active gcloud project
pub fn set_project(project: &str) -> Result<()> {
    crate::log_info!("Setting gcloud project: {}", project);
    run_gcloud(&set_project_args(project), None).context("Set gcp project")
}

/// Set the default compute zone
pub fn set_zone(zone: &str) -> Result<()> {
    crate::log_info!("Setting gcloud zone: {}", zone);
    run_gcloud(&set_zone_args(zone), None).context("Set gcloud zone")
}

/// Region of a zone: its first two `-` separated terms (`us-central2-b` -> `us-central2`)
pub fn zone_to_region(zone: &str) -> String {
    zone.split('-').take(2).collect::<Vec<_>>().join("-")
}

/// Arguments for `gcloud container clusters get-credentials`
pub fn credentials_args(cluster: &str, zone: Option<&str>, project: Option<&str>) -> Vec<String> {
    let mut args = vec![
        "container".to_string(),
        "clusters".to_string(),
        "get-credentials".to_string(),
        cluster.to_string(),
    ];

    if let Some(zone) = zone {
        args.push(format!("--region={}", zone_to_region(zone)));
    }

    if let Some(project) = project {
        args.push(format!("--project={}", project));
    }

    args
}

/// Fetch kubeconfig credentials for a GKE cluster
pub fn get_credentials(
    cluster: &str,
    zone: Option<&str>,
    project: Option<&str>,
    kubeconfig: Option<&Path>,
) -> Result<()> {
    crate::log_info!("Getting credentials for cluster: {}", cluster);

    let args = credentials_args(cluster, zone, project);
    let args: Vec<&str> = args.iter().map(String::as_str).collect();

    run_gcloud(&args, kubeconfig).map_err(|e| {
        crate::log_debug!("{:#}", e);
        anyhow::Error::new(XpkError::cluster_credentials_failed(cluster))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zone_to_region() {
        assert_eq!(zone_to_region("us-central2-b"), "us-central2");
        assert_eq!(zone_to_region("europe-west4-a"), "europe-west4");
        assert_eq!(zone_to_region("us-east5"), "us-east5");
    }

    #[test]
    fn test_context_args() {
        assert_eq!(
            set_project_args("my-proj"),
            vec!["config", "set", "project", "my-proj"]
        );
        assert_eq!(
            set_zone_args("us-east5-a"),
            vec!["config", "set", "compute/zone", "us-east5-a"]
        );
    }

    #[test]
    fn test_credentials_args() {
        let args = credentials_args("tpu-cluster", Some("us-central2-b"), Some("my-proj"));
        assert_eq!(
            args,
            vec![
                "container",
                "clusters",
                "get-credentials",
                "tpu-cluster",
                "--region=us-central2",
                "--project=my-proj",
            ]
        );
    }

    #[test]
    fn test_credentials_args_without_location() {
        let args = credentials_args("c1", None, None);
        assert_eq!(args.len(), 4);
        assert_eq!(args[3], "c1");
    }
}
