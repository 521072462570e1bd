//! kubectl-kueue plugin calls

use anyhow::{Context, Result, anyhow};
use std::path::Path;

use crate::k8s::kubectl;
use crate::queues::QueueKind;

/// Source of raw `list <kind> -o json` responses
pub trait QueueLister {
    fn list(&self, kind: QueueKind) -> Result<String>;
}

/// Lists queues through `kubectl kueue`.
///
/// Local queues come from the current context namespace only, so queue names
/// within one report are unique.
#[derive(Debug, Clone, Copy)]
pub struct Kueuectl<'a> {
    kubeconfig: Option<&'a Path>,
}

impl<'a> Kueuectl<'a> {
    pub fn new(kubeconfig: Option<&'a Path>) -> Self {
        Self { kubeconfig }
    }

    /// Arguments passed to kubectl for listing the given kind
    pub fn list_args(&self, kind: QueueKind) -> Vec<&'static str> {
        vec!["kueue", "list", kind.resource(), "-o", "json"]
    }

    /// Whether `kubectl kueue version` succeeds
    pub fn is_installed(&self) -> bool {
        plugin_answered(kubectl::run_kubectl_for_value(
            &["kueue", "version"],
            self.kubeconfig,
        ))
    }
}

// kubectl itself failing to start counts as the plugin being unavailable
fn plugin_answered(result: Result<(i32, String)>) -> bool {
    match result {
        Ok((code, _)) => code == 0,
        Err(e) => {
            crate::log_warn!("{:#}; run 'xpk check' to verify kubectl is installed", e);
            false
        }
    }
}

impl QueueLister for Kueuectl<'_> {
    fn list(&self, kind: QueueKind) -> Result<String> {
        let args = self.list_args(kind);
        let (code, output) = kubectl::run_kubectl_for_value(&args, self.kubeconfig)
            .with_context(|| format!("Failed to list {}", kind))?;

        if code != 0 {
            crate::log_error!("Cluster info request returned ERROR {}", code);
            return Err(anyhow!(
                "Cluster info request returned ERROR {} (list {})",
                code,
                kind
            ));
        }

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_args() {
        let kueuectl = Kueuectl::new(None);
        assert_eq!(
            kueuectl.list_args(QueueKind::Cluster),
            vec!["kueue", "list", "clusterqueue", "-o", "json"]
        );
        assert_eq!(
            kueuectl.list_args(QueueKind::Local),
            vec!["kueue", "list", "localqueue", "-o", "json"]
        );
    }

    #[test]
    fn test_local_queues_stay_in_current_namespace() {
        let args = Kueuectl::new(None).list_args(QueueKind::Local);
        assert!(!args.contains(&"--all-namespaces"));
        assert!(!args.contains(&"-A"));
    }

    #[test]
    fn test_plugin_answered() {
        assert!(plugin_answered(Ok((0, "v0.9.1".to_string()))));
        assert!(!plugin_answered(Ok((1, String::new()))));
    }

    #[test]
    fn test_kubectl_spawn_failure_is_not_installed() {
        let spawn_err = Err(anyhow!("Failed to run kubectl command"));
        assert!(!plugin_answered(spawn_err));
    }
}
