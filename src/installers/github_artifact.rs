//! git-annex builds from the datalad/git-annex GitHub Actions workflows
//!
//! Locates the artifact of the latest successful build for the current
//! OS, downloads it with an OAuth token, and installs the contained
//! `*.deb` (Linux) or `*.dmg` (macOS).

use std::path::{Path, PathBuf};
use std::rc::Rc;

use serde::Deserialize;

use crate::error::{InstallerError, Result};
use crate::manager::Manager;
use crate::sys::{self, OsType};

use super::dmg::install_git_annex_dmg;
use super::{
    Attempt, InstallRequest, InstalledCommand, Installer, InstallerSpec, Support, no_options,
    unknown_component,
};

const REPO: &str = "datalad/git-annex";
const BRANCH: &str = "master";

pub struct GithubArtifactInstaller;

pub const NAME: &str = "datalad/git-annex";

pub fn spec() -> InstallerSpec {
    InstallerSpec {
        name: NAME,
        factory: || Rc::new(GithubArtifactInstaller),
        options: no_options,
    }
}

#[derive(Debug, Deserialize)]
struct WorkflowRuns {
    workflow_runs: Vec<WorkflowRun>,
}

#[derive(Debug, Deserialize)]
struct WorkflowRun {
    artifacts_url: String,
}

#[derive(Debug, Deserialize)]
struct ArtifactList {
    total_count: u64,
    artifacts: Vec<Artifact>,
}

#[derive(Debug, Deserialize)]
struct Artifact {
    archive_download_url: String,
}

fn github_token() -> Result<String> {
    if let Ok(token) = std::env::var("GITHUB_TOKEN") {
        if !token.is_empty() {
            return Ok(token);
        }
    }
    sys::probe_output(&["git", "config", "hub.oauthtoken"])
        .map(|out| out.trim().to_string())
        .filter(|token| !token.is_empty())
        .ok_or(InstallerError::GithubTokenMissing)
}

fn api_call<T: serde::de::DeserializeOwned>(url: &str, token: &str) -> Result<T> {
    ureq::get(url)
        .set("Authorization", &format!("Bearer {token}"))
        .call()
        .map_err(|e| InstallerError::ArtifactLookup {
            reason: format!("{url}: {e}"),
        })?
        .into_json()
        .map_err(|e| InstallerError::ArtifactLookup {
            reason: format!("{url}: {e}"),
        })
}

/// Download and unpack the latest successful build artifact for the
/// given workflow OS name ("ubuntu" or "macos")
fn download_latest_artifact(os_name: &str, target: &Path) -> Result<()> {
    let token = github_token()?;
    let workflow = format!("build-{os_name}.yaml");
    let runs_url = format!(
        "https://api.github.com/repos/{REPO}/actions/workflows/{workflow}/runs?status=success&branch={BRANCH}"
    );
    tracing::info!("Getting artifacts_url from {runs_url}");
    let runs: WorkflowRuns = api_call(&runs_url, &token)?;
    let artifacts_url = runs
        .workflow_runs
        .first()
        .map(|run| run.artifacts_url.clone())
        .ok_or_else(|| InstallerError::ArtifactLookup {
            reason: "no successful workflow runs found".to_string(),
        })?;
    tracing::info!("Getting archive download URL from {artifacts_url}");
    let artifacts: ArtifactList = api_call(&artifacts_url, &token)?;
    let download_url = match artifacts.total_count {
        0 => {
            return Err(InstallerError::ArtifactLookup {
                reason: "no artifacts found".to_string(),
            });
        }
        1 => artifacts
            .artifacts
            .first()
            .map(|a| a.archive_download_url.clone())
            .ok_or_else(|| InstallerError::ArtifactLookup {
                reason: "artifact list empty despite total_count".to_string(),
            })?,
        n => {
            return Err(InstallerError::ArtifactLookup {
                reason: format!("too many artifacts found ({n})"),
            });
        }
    };
    tracing::info!("Downloading artifact package from {download_url}");
    std::fs::create_dir_all(target)?;
    let archive = target.join(".artifact.zip");
    let auth = format!("Bearer {token}");
    sys::download_file(&download_url, &archive, &[("Authorization", auth.as_str())])?;
    sys::extract_zip(&archive, target)?;
    std::fs::remove_file(&archive)?;
    Ok(())
}

fn find_with_extension(dir: &Path, extension: &str) -> Result<PathBuf> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) == Some(extension) {
            return Ok(path);
        }
    }
    Err(InstallerError::ArtifactLookup {
        reason: format!("no *.{extension} file in downloaded artifact"),
    })
}

impl Installer for GithubArtifactInstaller {
    fn name(&self) -> &'static str {
        NAME
    }

    fn check_support(&self, _manager: &Manager) -> Support {
        match sys::os_type() {
            OsType::Linux | OsType::Macos => Support::Supported,
            OsType::Other(os) => {
                Support::NotSupported(format!("no datalad/git-annex builds for {os}"))
            }
        }
    }

    fn install(
        &self,
        manager: &mut Manager,
        component: &str,
        _request: &InstallRequest,
    ) -> Result<Attempt> {
        if component != "git-annex" {
            return Ok(unknown_component("Datalad/git-annex", component));
        }
        let workdir = tempfile::tempdir()?;
        let commands = match sys::os_type() {
            OsType::Linux => {
                download_latest_artifact("ubuntu", workdir.path())?;
                let deb = find_with_extension(workdir.path(), "deb")?;
                manager.run(&[
                    "sudo".to_string(),
                    "dpkg".to_string(),
                    "-i".to_string(),
                    deb.display().to_string(),
                ])?;
                vec![InstalledCommand::new(
                    "git-annex",
                    PathBuf::from("/usr/bin/git-annex"),
                )]
            }
            OsType::Macos => {
                download_latest_artifact("macos", workdir.path())?;
                let dmg = find_with_extension(workdir.path(), "dmg")?;
                install_git_annex_dmg(manager, &dmg)?
            }
            OsType::Other(os) => {
                return Ok(Attempt::Unsupported(format!(
                    "Datalad/git-annex does not support {os}"
                )));
            }
        };
        Ok(Attempt::Installed(commands))
    }
}
