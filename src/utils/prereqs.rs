//! Prerequisite checking system for required tools

use thiserror::Error;

pub const KUEUECTL_DOCS: &str =
    "https://kueue.sigs.k8s.io/docs/reference/kubectl-kueue/installation/";

#[derive(Error, Debug)]
pub enum PrereqError {
    #[error("Tool '{name}' not found")]
    NotFound { name: String, hint: String },
}

/// Trait for checking prerequisites
pub trait Prerequisite {
    /// Name of the prerequisite tool
    fn name(&self) -> &str;

    /// Check if the tool is available
    fn check(&self) -> Result<(), PrereqError>;

    /// Installation hint for the user
    fn install_hint(&self) -> &str;
}

/// Basic prerequisite that checks if a command exists
pub struct CommandPrereq {
    pub name: String,
    pub hint: String,
}

impl CommandPrereq {
    pub fn new(name: impl Into<String>, hint: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            hint: hint.into(),
        }
    }
}

impl Prerequisite for CommandPrereq {
    fn name(&self) -> &str {
        &self.name
    }

    fn check(&self) -> Result<(), PrereqError> {
        which::which(&self.name).map_err(|_| PrereqError::NotFound {
            name: self.name.clone(),
            hint: self.hint.clone(),
        })?;
        Ok(())
    }

    fn install_hint(&self) -> &str {
        &self.hint
    }
}

/// Common prerequisites for xpk
pub struct CommonPrereqs;

impl CommonPrereqs {
    /// Get kubectl prerequisite
    pub fn kubectl() -> CommandPrereq {
        CommandPrereq::new(
            "kubectl",
            "Install from: https://kubernetes.io/docs/tasks/tools/",
        )
    }

    /// Get gcloud prerequisite
    pub fn gcloud() -> CommandPrereq {
        CommandPrereq::new(
            "gcloud",
            "Install from: https://cloud.google.com/sdk/docs/install",
        )
    }

    /// Get the kueue kubectl plugin prerequisite
    pub fn kubectl_kueue() -> CommandPrereq {
        CommandPrereq::new(
            "kubectl-kueue",
            format!(
                "Install from: {} (or run 'xpk info --install-kueuectl')",
                KUEUECTL_DOCS
            ),
        )
    }

    /// Check all prerequisites.
    /// Returns (found_tools, missing_tools with hints)
    pub fn check_all(prereqs: &[&dyn Prerequisite]) -> (Vec<String>, Vec<(String, String)>) {
        let mut found = Vec::new();
        let mut missing = Vec::new();

        for prereq in prereqs {
            match prereq.check() {
                Ok(_) => found.push(prereq.name().to_string()),
                Err(PrereqError::NotFound { name, hint }) => missing.push((name, hint)),
            }
        }

        (found, missing)
    }
}
