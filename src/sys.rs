//! External command execution, downloads, and platform helpers
//!
//! Every external command is logged before it runs. Commands prefixed
//! with `sudo` go through the [`SudoPolicy`] confirmation gate.

use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use indicatif::{ProgressBar, ProgressStyle};

use crate::error::{InstallerError, Result};

/// How to handle commands that require sudo
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SudoPolicy {
    /// Prompt once; a confirmation is remembered for the rest of the run
    Ask,
    /// Run sudo commands without asking
    Ok,
    /// Fail fatally on any sudo command
    Error,
}

impl SudoPolicy {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "ask" => Some(SudoPolicy::Ask),
            "ok" => Some(SudoPolicy::Ok),
            "error" => Some(SudoPolicy::Error),
            _ => None,
        }
    }
}

/// Target operating system, as far as the installers care
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OsType {
    Linux,
    Macos,
    Other(String),
}

pub fn os_type() -> OsType {
    match std::env::consts::OS {
        "linux" => OsType::Linux,
        "macos" => OsType::Macos,
        other => OsType::Other(other.to_string()),
    }
}

/// Render an argv for logging, quoting words that need it
pub fn quote_argv(argv: &[String]) -> String {
    argv.iter()
        .map(|a| shlex::try_quote(a).map_or_else(|_| a.clone(), |q| q.into_owned()))
        .collect::<Vec<_>>()
        .join(" ")
}

fn confirm_sudo(argv: &[String], sudo: &mut SudoPolicy) -> Result<()> {
    if argv.first().map(String::as_str) != Some("sudo") {
        return Ok(());
    }
    match *sudo {
        SudoPolicy::Ok => Ok(()),
        SudoPolicy::Error => Err(InstallerError::SudoRefused {
            command: quote_argv(argv),
        }),
        SudoPolicy::Ask => {
            let confirmed = inquire::Confirm::new(&format!("Run `{}`?", quote_argv(argv)))
                .with_default(true)
                .prompt()?;
            if confirmed {
                // Remember the answer for the rest of the run
                *sudo = SudoPolicy::Ok;
                Ok(())
            } else {
                Err(InstallerError::SudoRefused {
                    command: quote_argv(argv),
                })
            }
        }
    }
}

#[allow(clippy::indexing_slicing)]
fn command(argv: &[String], env: &[(&str, &str)]) -> Command {
    let mut cmd = Command::new(&argv[0]);
    cmd.args(&argv[1..]);
    for (key, value) in env {
        cmd.env(key, value);
    }
    cmd
}

/// Run an external command, failing on a nonzero exit status
pub fn runcmd(argv: &[String], env: &[(&str, &str)], sudo: &mut SudoPolicy) -> Result<()> {
    confirm_sudo(argv, sudo)?;
    let rendered = quote_argv(argv);
    tracing::info!("Running: {rendered}");
    let status = command(argv, env)
        .status()
        .map_err(|e| InstallerError::CommandSpawnFailed {
            command: rendered.clone(),
            reason: e.to_string(),
        })?;
    if status.success() {
        Ok(())
    } else {
        Err(InstallerError::CommandFailed {
            command: rendered,
            status: status.to_string(),
        })
    }
}

/// Run an external command and capture its standard output
pub fn readcmd(argv: &[String], sudo: &mut SudoPolicy) -> Result<String> {
    confirm_sudo(argv, sudo)?;
    let rendered = quote_argv(argv);
    tracing::info!("Running: {rendered}");
    let output = command(argv, &[])
        .stdout(Stdio::piped())
        .output()
        .map_err(|e| InstallerError::CommandSpawnFailed {
            command: rendered.clone(),
            reason: e.to_string(),
        })?;
    if output.status.success() {
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    } else {
        Err(InstallerError::CommandFailed {
            command: rendered,
            status: output.status.to_string(),
        })
    }
}

/// Capture a command's output for a capability probe; any failure is
/// reported as None rather than an error
pub fn probe_output(argv: &[&str]) -> Option<String> {
    let output = Command::new(argv.first()?)
        .args(&argv[1..])
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .output()
        .ok()?;
    if output.status.success() {
        Some(String::from_utf8_lossy(&output.stdout).into_owned())
    } else {
        None
    }
}

/// Look up an executable on PATH
pub fn find_executable(name: &str) -> Option<PathBuf> {
    which::which(name).ok()
}

/// Create a temporary directory that outlives the run
pub fn mktempdir(prefix: &str) -> Result<PathBuf> {
    let dir = tempfile::Builder::new().prefix(prefix).tempdir()?;
    Ok(dir.keep())
}

/// Download a URL to a file, showing a progress bar when the size is known
pub fn download_file(url: &str, dest: &Path, headers: &[(&str, &str)]) -> Result<()> {
    tracing::info!("Downloading {url}");
    let mut request = ureq::get(url);
    for (name, value) in headers {
        request = request.set(name, value);
    }
    let response = request.call().map_err(|e| InstallerError::DownloadFailed {
        url: url.to_string(),
        reason: e.to_string(),
    })?;
    let total: Option<u64> = response
        .header("Content-Length")
        .and_then(|v| v.parse().ok());
    let bar = match total {
        Some(len) => {
            let style = ProgressStyle::default_bar()
                .template("[{bar:40.cyan/blue}] {bytes}/{total_bytes} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-");
            let bar = ProgressBar::new(len);
            bar.set_style(style);
            bar
        }
        None => ProgressBar::new_spinner(),
    };
    let mut reader = response.into_reader();
    let mut file = File::create(dest).map_err(|e| InstallerError::WriteFailed {
        path: dest.display().to_string(),
        reason: e.to_string(),
    })?;
    let mut buf = [0u8; 65536];
    loop {
        let n = reader.read(&mut buf).map_err(|e| InstallerError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        if n == 0 {
            break;
        }
        file.write_all(buf.get(..n).unwrap_or_default())
            .map_err(|e| InstallerError::WriteFailed {
                path: dest.display().to_string(),
                reason: e.to_string(),
            })?;
        bar.inc(n as u64);
    }
    bar.finish_and_clear();
    Ok(())
}

/// Extract a zip archive into a directory
pub fn extract_zip(archive: &Path, dest: &Path) -> Result<()> {
    let file = File::open(archive)?;
    let mut zip = zip::ZipArchive::new(file).map_err(|e| InstallerError::ExtractFailed {
        path: archive.display().to_string(),
        reason: e.to_string(),
    })?;
    zip.extract(dest).map_err(|e| InstallerError::ExtractFailed {
        path: archive.display().to_string(),
        reason: e.to_string(),
    })?;
    Ok(())
}

/// Mark a file as executable (no-op outside unix)
pub fn make_executable(path: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = std::fs::metadata(path)?.permissions();
        perms.set_mode(perms.mode() | 0o755);
        std::fs::set_permissions(path, perms)?;
    }
    #[cfg(not(unix))]
    let _ = path;
    Ok(())
}
