//! `xpk info`: Kueue queue reservation and usage tables

use anyhow::{Context, Result};
use std::io;
use std::path::PathBuf;

use crate::cloud::gcloud;
use crate::config::Settings;
use crate::install;
use crate::k8s::kubectl;
use crate::k8s::kueuectl::{Kueuectl, QueueLister};
use crate::queues::{AggregateOptions, QueueKind, QueueReport, aggregate};
use crate::utils::dryrun::{describe_command, exec_unless_dry_run, log_action};
use crate::utils::{OutputFormat, XpkError, progress, prompt, write_report};

/// Options for the info command; unset values fall back to the config file
#[derive(Debug, Clone, Default)]
pub struct InfoOptions {
    pub project: Option<String>,
    pub zone: Option<String>,
    pub cluster: Option<String>,
    pub kubeconfig: Option<PathBuf>,
    pub output: Option<OutputFormat>,
    pub install_kueuectl: bool,
    pub dry_run: bool,
}

impl InfoOptions {
    /// Fill unset values from `[defaults]`
    pub fn with_defaults(mut self, settings: &Settings) -> Self {
        let defaults = &settings.defaults;
        self.project = self.project.or_else(|| defaults.project.clone());
        self.zone = self.zone.or_else(|| defaults.zone.clone());
        self.cluster = self.cluster.or_else(|| defaults.cluster.clone());
        self.output = self.output.or(Some(defaults.output));
        self
    }
}

/// Handle info command
pub fn run(options: InfoOptions, settings: &Settings) -> Result<()> {
    let options = options.with_defaults(settings);

    apply_shared_flags(&options)?;
    set_cluster(&options)?;

    let kueuectl = Kueuectl::new(options.kubeconfig.as_deref());
    prepare_kueuectl(&kueuectl, &options, settings)?;

    let report = collect_report(
        &kueuectl,
        &settings.aggregate_options(),
        settings.behavior.show_progress,
    )?;

    let mut stdout = io::stdout().lock();
    write_report(&mut stdout, &report, options.output.unwrap_or_default())
}

/// Point gcloud at the requested project and zone
fn apply_shared_flags(options: &InfoOptions) -> Result<()> {
    if let Some(project) = &options.project {
        let action = describe_command("gcloud", &gcloud::set_project_args(project));
        exec_unless_dry_run(options.dry_run, &action, || gcloud::set_project(project))?;
    }

    if let Some(zone) = &options.zone {
        let action = describe_command("gcloud", &gcloud::set_zone_args(zone));
        exec_unless_dry_run(options.dry_run, &action, || gcloud::set_zone(zone))?;
    }

    Ok(())
}

/// Fetch credentials for the target cluster and make it the current context
fn set_cluster(options: &InfoOptions) -> Result<()> {
    let Some(cluster) = &options.cluster else {
        crate::log_info!("No cluster given; using the current kubectl context");
        return Ok(());
    };

    let args = gcloud::credentials_args(cluster, options.zone.as_deref(), options.project.as_deref());
    let args: Vec<&str> = args.iter().map(String::as_str).collect();

    exec_unless_dry_run(options.dry_run, &describe_command("gcloud", &args), || {
        gcloud::get_credentials(
            cluster,
            options.zone.as_deref(),
            options.project.as_deref(),
            options.kubeconfig.as_deref(),
        )
    })?;

    exec_unless_dry_run(
        options.dry_run,
        "kubectl config set-context --current --namespace=default",
        || kubectl::set_context_namespace("default", options.kubeconfig.as_deref()),
    )
}

/// Make sure the kubectl-kueue plugin answers, installing it when allowed
fn prepare_kueuectl(kueuectl: &Kueuectl<'_>, options: &InfoOptions, settings: &Settings) -> Result<()> {
    crate::log_info!("Verifying kueuectl installation");

    if kueuectl.is_installed() {
        crate::log_info!("kueuectl installed");
        return Ok(());
    }

    crate::log_warn!("kueuectl not installed");

    let version = &settings.kueuectl.version;
    let install_dir = settings.kueuectl.install_dir()?;

    let allowed = options.install_kueuectl
        || settings.kueuectl.auto_install
        || (prompt::is_interactive()
            && prompt::confirm(&format!(
                "kueuectl not found. Install {} into {}?",
                version,
                install_dir.display()
            ))?);

    if !allowed {
        return Err(XpkError::kueuectl_not_installed().into());
    }

    if options.dry_run {
        log_action(&format!(
            "Install kueuectl {} into {}",
            version,
            install_dir.display()
        ));
        return Err(XpkError::kueuectl_not_installed().into());
    }

    install::kueuectl::install(version, &install_dir, settings.behavior.show_progress)?;

    if !kueuectl.is_installed() {
        return Err(XpkError::new("kueuectl was installed but 'kubectl kueue' still fails")
            .suggest(format!("Add {} to your PATH", install_dir.display()))
            .into());
    }

    Ok(())
}

/// List local then cluster queues and aggregate them.
///
/// No report is produced unless both listings and the aggregation succeed.
pub fn collect_report(
    lister: &dyn QueueLister,
    options: &AggregateOptions,
    show_progress: bool,
) -> Result<QueueReport> {
    let local = progress::with_spinner_result(
        "Listing local queues",
        "Local queues listed",
        show_progress,
        || lister.list(QueueKind::Local),
    )?;

    let cluster = progress::with_spinner_result(
        "Listing cluster queues",
        "Cluster queues listed",
        show_progress,
        || lister.list(QueueKind::Cluster),
    )?;

    aggregate(&cluster, &local, options).context("Failed to aggregate queue lists")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queues::QueueError;
    use anyhow::anyhow;
    use std::cell::RefCell;

    struct FakeLister {
        cluster: Result<String, String>,
        local: Result<String, String>,
        calls: RefCell<Vec<QueueKind>>,
    }

    impl FakeLister {
        fn new(cluster: Result<&str, &str>, local: Result<&str, &str>) -> Self {
            Self {
                cluster: cluster.map(str::to_string).map_err(str::to_string),
                local: local.map(str::to_string).map_err(str::to_string),
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl QueueLister for FakeLister {
        fn list(&self, kind: QueueKind) -> Result<String> {
            self.calls.borrow_mut().push(kind);
            let response = match kind {
                QueueKind::Cluster => &self.cluster,
                QueueKind::Local => &self.local,
            };
            response.clone().map_err(|e| anyhow!(e))
        }
    }

    const CLUSTER: &str = r#"{"items": [
        {"metadata": {"name": "cq1"}, "status": {
            "flavorsReservation": [{"name": "default", "resources": [{"name": "cpu", "total": "4"}]}],
            "flavorsUsage": [{"name": "default", "resources": [{"name": "cpu", "total": "2"}]}]
        }},
        {"metadata": {"name": "cq2"}, "status": {
            "flavorsReservation": [{"name": "spot", "resources": [{"name": "memory", "total": "32Gi"}]}],
            "flavorsUsage": [{"name": "spot", "resources": [{"name": "memory", "total": "0"}]}]
        }}
    ]}"#;

    const LOCAL: &str = r#"{"items": [
        {"metadata": {"name": "lq1", "namespace": "default"}, "status": {
            "flavorsReservation": [{"name": "default", "resources": [{"name": "cpu", "total": "4"}]}],
            "flavorUsage": [{"name": "default", "resources": [{"name": "cpu", "total": "2"}]}]
        }}
    ]}"#;

    #[test]
    fn test_collect_report() {
        let lister = FakeLister::new(Ok(CLUSTER), Ok(LOCAL));
        let report = collect_report(&lister, &AggregateOptions::default(), false).unwrap();

        assert_eq!(report.cluster.reservation.len(), 2);
        assert_eq!(report.cluster.reservation[1].queue_name, "cq2");
        assert_eq!(report.cluster.usage[1].total, "0");
        assert_eq!(report.local.usage[0].queue_name, "lq1");
        assert_eq!(
            *lister.calls.borrow(),
            vec![QueueKind::Local, QueueKind::Cluster]
        );
    }

    #[test]
    fn test_failed_listing_stops_before_cluster_queues() {
        let lister = FakeLister::new(
            Ok(CLUSTER),
            Err("Cluster info request returned ERROR 1 (list localqueue)"),
        );
        let err = collect_report(&lister, &AggregateOptions::default(), false).unwrap_err();

        assert!(err.to_string().contains("ERROR 1"));
        assert_eq!(*lister.calls.borrow(), vec![QueueKind::Local]);
    }

    #[test]
    fn test_malformed_listing_is_queue_error() {
        let lister = FakeLister::new(Ok("{}"), Ok(LOCAL));
        let err = collect_report(&lister, &AggregateOptions::default(), false).unwrap_err();

        match err.downcast_ref::<QueueError>() {
            Some(QueueError::MalformedResponse { kind, .. }) => {
                assert_eq!(*kind, QueueKind::Cluster)
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_options_fall_back_to_settings() {
        let mut settings = Settings::default();
        settings.defaults.project = Some("cfg-project".to_string());
        settings.defaults.zone = Some("us-east5-a".to_string());
        settings.defaults.output = OutputFormat::Yaml;

        let options = InfoOptions {
            zone: Some("us-central2-b".to_string()),
            ..InfoOptions::default()
        }
        .with_defaults(&settings);

        assert_eq!(options.project.as_deref(), Some("cfg-project"));
        assert_eq!(options.zone.as_deref(), Some("us-central2-b"));
        assert!(options.cluster.is_none());
        assert_eq!(options.output, Some(OutputFormat::Yaml));
    }

    #[test]
    fn test_cli_output_wins_over_settings() {
        let mut settings = Settings::default();
        settings.defaults.output = OutputFormat::Yaml;

        let options = InfoOptions {
            output: Some(OutputFormat::Json),
            ..InfoOptions::default()
        }
        .with_defaults(&settings);

        assert_eq!(options.output, Some(OutputFormat::Json));
    }

    #[test]
    fn test_dry_run_skips_context_changes() {
        let options = InfoOptions {
            project: Some("p".to_string()),
            zone: Some("us-central2-b".to_string()),
            cluster: Some("c".to_string()),
            dry_run: true,
            ..InfoOptions::default()
        };

        assert!(apply_shared_flags(&options).is_ok());
        assert!(set_cluster(&options).is_ok());
    }
}
