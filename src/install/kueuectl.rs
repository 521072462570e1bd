//! kubectl-kueue plugin installation

use anyhow::{Context, Result, anyhow};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::utils::progress;

pub const PLUGIN_BINARY: &str = "kubectl-kueue";

/// Map the host OS/architecture to Kueue release asset names
pub fn platform_for(os: &str, arch: &str) -> Result<(&'static str, &'static str)> {
    let os = match os {
        "linux" => "linux",
        "macos" => "darwin",
        other => return Err(anyhow!("kueuectl is not published for OS '{}'", other)),
    };

    let arch = match arch {
        "x86_64" => "amd64",
        "aarch64" => "arm64",
        other => return Err(anyhow!("kueuectl is not published for architecture '{}'", other)),
    };

    Ok((os, arch))
}

/// Download URL of the plugin binary for a Kueue release
pub fn release_url(version: &str, os: &str, arch: &str) -> String {
    format!(
        "https://github.com/kubernetes-sigs/kueue/releases/download/{}/kubectl-kueue-{}-{}",
        version, os, arch
    )
}

/// Download kubectl-kueue into `install_dir` and return the installed path
pub fn install(version: &str, install_dir: &Path, show_progress: bool) -> Result<PathBuf> {
    crate::log_info!("Installing kueuectl {}...", version);

    let (os, arch) = platform_for(std::env::consts::OS, std::env::consts::ARCH)?;
    let url = release_url(version, os, arch);

    let binary = progress::with_spinner_result(
        &format!("Downloading kueuectl {}", version),
        "kueuectl downloaded",
        show_progress,
        || download(&url),
    )?;

    let target = write_executable(install_dir, &binary)?;

    if !dir_on_path(install_dir) {
        crate::log_warn!(
            "{} is not on PATH; add it so kubectl can find the kueue plugin",
            install_dir.display()
        );
    }

    crate::log_info!("kueuectl installed to {}", target.display());
    Ok(target)
}

fn download(url: &str) -> Result<Vec<u8>> {
    crate::log_debug!("Downloading {}", url);

    let bytes = reqwest::blocking::get(url)
        .context("Failed to download kueuectl")?
        .error_for_status()
        .with_context(|| format!("kueuectl download failed: {}", url))?
        .bytes()
        .context("Failed to read kueuectl binary")?;

    Ok(bytes.to_vec())
}

/// Write the binary next to its final location, mark it executable, then move it into place
fn write_executable(install_dir: &Path, binary: &[u8]) -> Result<PathBuf> {
    fs::create_dir_all(install_dir)
        .with_context(|| format!("Failed to create {}", install_dir.display()))?;

    let mut temp = tempfile::NamedTempFile::new_in(install_dir)
        .context("Failed to create temporary file for kueuectl")?;
    temp.write_all(binary)
        .context("Failed to write kueuectl binary")?;
    temp.flush()?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(temp.path(), fs::Permissions::from_mode(0o755))
            .context("Failed to make kueuectl executable")?;
    }

    let target = install_dir.join(PLUGIN_BINARY);
    temp.persist(&target)
        .with_context(|| format!("Failed to install kueuectl to {}", target.display()))?;

    Ok(target)
}

fn dir_on_path(dir: &Path) -> bool {
    std::env::var_os("PATH")
        .map(|paths| std::env::split_paths(&paths).any(|p| p == dir))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_mapping() {
        assert_eq!(platform_for("linux", "x86_64").unwrap(), ("linux", "amd64"));
        assert_eq!(platform_for("macos", "aarch64").unwrap(), ("darwin", "arm64"));
        assert!(platform_for("windows", "x86_64").is_err());
        assert!(platform_for("linux", "riscv64").is_err());
    }

    #[test]
    fn test_release_url() {
        assert_eq!(
            release_url("v0.9.1", "linux", "amd64"),
            "https://github.com/kubernetes-sigs/kueue/releases/download/v0.9.1/kubectl-kueue-linux-amd64"
        );
    }

    #[test]
    fn test_write_executable() {
        let dir = tempfile::tempdir().unwrap();
        let install_dir = dir.path().join("bin");

        let target = write_executable(&install_dir, b"#!/bin/sh\necho kueue\n").unwrap();

        assert_eq!(target, install_dir.join(PLUGIN_BINARY));
        assert_eq!(fs::read(&target).unwrap(), b"#!/bin/sh\necho kueue\n");

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = fs::metadata(&target).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o755);
        }
    }
}
