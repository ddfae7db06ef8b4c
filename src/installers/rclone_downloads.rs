//! rclone from the official downloads.rclone.org zip archives

use std::path::PathBuf;
use std::rc::Rc;

use crate::error::{InstallerError, Result};
use crate::manager::Manager;
use crate::sys::{self, OsType};

use super::{
    Attempt, InstallRequest, InstalledCommand, Installer, InstallerSpec, Support, no_options,
    unknown_component,
};

pub struct RcloneDownloadsInstaller;

pub const NAME: &str = "downloads.rclone.org";

pub fn spec() -> InstallerSpec {
    InstallerSpec {
        name: NAME,
        factory: || Rc::new(RcloneDownloadsInstaller),
        options: no_options,
    }
}

fn download_url(os_name: &str, version: Option<&str>) -> String {
    match version {
        Some(v) => format!(
            "https://downloads.rclone.org/v{v}/rclone-v{v}-{os_name}-amd64.zip"
        ),
        None => format!("https://downloads.rclone.org/rclone-current-{os_name}-amd64.zip"),
    }
}

/// The archive unpacks to a single `rclone-*/` directory holding the binary
fn find_binary(dir: &std::path::Path) -> Result<PathBuf> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir()
            && path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with("rclone-"))
        {
            let binary = path.join("rclone");
            if binary.exists() {
                return Ok(binary);
            }
        }
    }
    Err(InstallerError::ExtractFailed {
        path: dir.display().to_string(),
        reason: "no rclone-*/rclone in downloaded archive".to_string(),
    })
}

impl Installer for RcloneDownloadsInstaller {
    fn name(&self) -> &'static str {
        NAME
    }

    fn check_support(&self, _manager: &Manager) -> Support {
        match sys::os_type() {
            OsType::Linux | OsType::Macos => Support::Supported,
            OsType::Other(os) => Support::NotSupported(format!("no rclone zips for {os}")),
        }
    }

    fn install(
        &self,
        manager: &mut Manager,
        component: &str,
        request: &InstallRequest,
    ) -> Result<Attempt> {
        if component != "rclone" {
            return Ok(unknown_component(NAME, component));
        }
        let os_name = match sys::os_type() {
            OsType::Linux => "linux",
            OsType::Macos => "osx",
            OsType::Other(os) => {
                return Ok(Attempt::Unsupported(format!(
                    "{NAME} does not support {os}"
                )));
            }
        };
        let url = download_url(os_name, request.version.as_deref());
        let workdir = sys::mktempdir("dl-rclone-")?;
        let archive = workdir.join("rclone.zip");
        sys::download_file(&url, &archive, &[])?;
        sys::extract_zip(&archive, &workdir)?;
        let binary = find_binary(&workdir)?;
        sys::make_executable(&binary)?;
        let bindir = binary
            .parent()
            .map(PathBuf::from)
            .unwrap_or_else(|| workdir.clone());
        manager.add_path(&bindir, false);
        Ok(Attempt::Installed(vec![InstalledCommand::new(
            "rclone", binary,
        )]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_url_when_no_version_requested() {
        assert_eq!(
            download_url("linux", None),
            "https://downloads.rclone.org/rclone-current-linux-amd64.zip"
        );
    }

    #[test]
    fn test_pinned_url_embeds_the_version_twice() {
        assert_eq!(
            download_url("osx", Some("1.57.0")),
            "https://downloads.rclone.org/v1.57.0/rclone-v1.57.0-osx-amd64.zip"
        );
    }

    #[test]
    fn test_only_rclone_is_handled() {
        let mut manager = Manager::new();
        let attempt = RcloneDownloadsInstaller
            .install(&mut manager, "datalad", &InstallRequest::default())
            .unwrap();
        assert_eq!(
            attempt,
            Attempt::Unsupported(
                "downloads.rclone.org does not know how to install datalad".to_string()
            )
        );
    }
}
