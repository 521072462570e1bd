//! Kubectl wrapper utilities

use anyhow::{Context, Result, anyhow};
use std::path::Path;
use std::process::Command;

use crate::utils::dryrun::describe_command;

fn kubectl_command(args: &[&str], kubeconfig: Option<&Path>) -> Command {
    let mut cmd = Command::new("kubectl");

    if let Some(kc) = kubeconfig {
        cmd.env("KUBECONFIG", kc);
    }

    cmd.args(args);
    crate::log_debug!("Running: {}", describe_command("kubectl", args));
    cmd
}

/// Run a kubectl command with optional kubeconfig
pub fn run_kubectl(args: &[&str], kubeconfig: Option<&Path>) -> Result<()> {
    let status = kubectl_command(args, kubeconfig)
        .status()
        .context("Failed to run kubectl command")?;

    if !status.success() {
        return Err(anyhow!("kubectl command failed: {}", args.join(" ")));
    }

    Ok(())
}

/// Run kubectl and return its exit code with captured stdout, without failing on non-zero exit
pub fn run_kubectl_for_value(args: &[&str], kubeconfig: Option<&Path>) -> Result<(i32, String)> {
    let output = kubectl_command(args, kubeconfig)
        .output()
        .context("Failed to run kubectl command")?;

    let code = output.status.code().unwrap_or(-1);
    if code != 0 {
        crate::log_debug!(
            "kubectl {} exited with {}: {}",
            args.join(" "),
            code,
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }

    Ok((code, String::from_utf8(output.stdout)?))
}

/// Point the current context at a namespace
pub fn set_context_namespace(namespace: &str, kubeconfig: Option<&Path>) -> Result<()> {
    let namespace_arg = format!("--namespace={}", namespace);
    run_kubectl(
        &["config", "set-context", "--current", &namespace_arg],
        kubeconfig,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsStr;

    #[test]
    fn test_kubeconfig_is_exported() {
        let cmd = kubectl_command(&["get", "pods"], Some(Path::new("/tmp/kc")));

        let kubeconfig = cmd
            .get_envs()
            .find(|(key, _)| *key == OsStr::new("KUBECONFIG"))
            .and_then(|(_, value)| value);
        assert_eq!(kubeconfig, Some(OsStr::new("/tmp/kc")));

        let args: Vec<&OsStr> = cmd.get_args().collect();
        assert_eq!(args, vec![OsStr::new("get"), OsStr::new("pods")]);
    }
}
