//! Enhanced error types with actionable suggestions

use colored::Colorize;
use thiserror::Error;

use crate::queues::QueueError;
use crate::utils::prereqs::KUEUECTL_DOCS;

/// Enhanced error with suggestions and documentation links
#[derive(Error, Debug, Clone)]
#[error("{message}")]
pub struct XpkError {
    pub message: String,
    pub suggestions: Vec<String>,
    pub docs_link: Option<String>,
}

impl XpkError {
    /// Create a new error with suggestions
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            suggestions: Vec::new(),
            docs_link: None,
        }
    }

    /// Add a suggestion to the error
    pub fn suggest(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    /// Add a documentation link
    pub fn with_docs(mut self, link: impl Into<String>) -> Self {
        self.docs_link = Some(link.into());
        self
    }

    /// Display the error with suggestions
    pub fn display(&self) {
        eprintln!("{} {}", "Error:".red().bold(), self.message);

        if !self.suggestions.is_empty() {
            eprintln!();
            eprintln!("{}", "Suggestions:".yellow().bold());
            for suggestion in &self.suggestions {
                eprintln!("  {} {}", "→".blue(), suggestion);
            }
        }

        if let Some(docs) = &self.docs_link {
            eprintln!();
            eprintln!("{} {}", "Documentation:".cyan(), docs);
        }
    }

    // Common error patterns

    /// kubectl-kueue plugin missing
    pub fn kueuectl_not_installed() -> Self {
        Self::new("kueuectl (kubectl-kueue plugin) is not installed")
            .suggest("Install it automatically with: xpk info --install-kueuectl")
            .suggest("Or set auto_install = true under [kueuectl] in your config")
            .with_docs(KUEUECTL_DOCS)
    }

    /// Tool not found error
    pub fn tool_not_found(tool: &str, install_hint: &str) -> Self {
        Self::new(format!("Required tool '{}' not found", tool))
            .suggest(install_hint.to_string())
            .suggest("Ensure the tool is in your PATH")
    }

    /// A `kubectl kueue list` call failed
    pub fn queue_list_failed(detail: &str) -> Self {
        Self::new(format!("Cluster info request failed: {}", detail))
            .suggest("Verify the Kueue CRDs are installed: kubectl get crd clusterqueues.kueue.x-k8s.io")
            .suggest("Check your current context: kubectl config current-context")
    }

    /// Queue list response could not be aggregated
    pub fn queue_data_invalid(err: &QueueError) -> Self {
        let base = Self::new(format!("Failed to aggregate queue data: {}", err));
        match err {
            QueueError::MissingField { .. } => base
                .suggest("Queues without admitted workloads may omit their status fields")
                .suggest("Set missing_status_as_empty = true under [behavior] to report them as empty")
                .suggest("Override field names under [queues.cluster] / [queues.local] if your Kueue version differs"),
            QueueError::InvalidField { .. } => base
                .suggest("Check that the configured field names point at flavor usage lists"),
            QueueError::MalformedResponse { .. } => base
                .suggest("Run 'kubectl kueue list clusterqueue -o json' manually to inspect the output")
                .suggest("Make sure the kueuectl version matches the Kueue version on the cluster"),
        }
    }

    /// gcloud failed to fetch credentials
    pub fn cluster_credentials_failed(cluster: &str) -> Self {
        Self::new(format!("Failed to get credentials for cluster '{}'", cluster))
            .suggest("Verify the cluster name, --zone and --project")
            .suggest("List clusters with: gcloud container clusters list")
    }

    /// Permission denied error
    pub fn permission_denied(operation: &str) -> Self {
        Self::new(format!("Permission denied: {}", operation))
            .suggest("Verify you have sufficient cluster permissions")
            .suggest("Re-authenticate with: gcloud auth login")
    }

    /// Connection timeout error
    pub fn connection_timeout(resource: &str) -> Self {
        Self::new(format!("Timeout waiting for {}", resource))
            .suggest("Check if the cluster is healthy")
            .suggest("Verify network connectivity")
    }
}

/// Helper to display error and exit
pub fn display_error_and_exit(error: XpkError) -> ! {
    error.display();
    std::process::exit(1);
}

/// Convert anyhow error to XpkError when possible
pub fn enhance_error(err: anyhow::Error) -> XpkError {
    if let Some(xpk) = err.downcast_ref::<XpkError>() {
        return xpk.clone();
    }

    if let Some(queue_err) = err.downcast_ref::<QueueError>() {
        return XpkError::queue_data_invalid(queue_err);
    }

    let err_str = format!("{:#}", err);

    if err_str.contains("connection refused") || err_str.contains("timeout") {
        return XpkError::connection_timeout("cluster");
    }

    if err_str.contains("Unauthorized") || err_str.contains("forbidden") {
        return XpkError::permission_denied("cluster operation");
    }

    if err_str.contains("Cluster info request returned ERROR") {
        return XpkError::queue_list_failed(&err_str);
    }

    // Default error with generic suggestion
    XpkError::new(err_str).suggest("Run with --verbose for more details")
}
