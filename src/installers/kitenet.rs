//! git-annex builds from downloads.kitenet.net
//!
//! Two flavors of the same mechanism: `autobuild` fetches the latest
//! autobuilt binaries, `snapshot` the latest released snapshot.

use std::rc::Rc;

use crate::error::Result;
use crate::manager::Manager;
use crate::sys::{self, OsType};

use super::dmg::install_git_annex_dmg;
use super::{
    Attempt, InstallRequest, InstalledCommand, Installer, InstallerSpec, Support, no_options,
    unknown_component,
};

const DOWNLOAD_BASE: &str = "https://downloads.kitenet.net/git-annex";

#[derive(Clone, Copy)]
enum Flavor {
    Autobuild,
    Snapshot,
}

pub struct KitenetInstaller {
    flavor: Flavor,
}

pub fn autobuild_spec() -> InstallerSpec {
    InstallerSpec {
        name: "autobuild",
        factory: || {
            Rc::new(KitenetInstaller {
                flavor: Flavor::Autobuild,
            })
        },
        options: no_options,
    }
}

pub fn snapshot_spec() -> InstallerSpec {
    InstallerSpec {
        name: "snapshot",
        factory: || {
            Rc::new(KitenetInstaller {
                flavor: Flavor::Snapshot,
            })
        },
        options: no_options,
    }
}

impl KitenetInstaller {
    fn linux_path(&self) -> &'static str {
        match self.flavor {
            Flavor::Autobuild => "autobuild/amd64",
            Flavor::Snapshot => "linux/current",
        }
    }

    fn macos_path(&self) -> &'static str {
        match self.flavor {
            Flavor::Autobuild => "autobuild/x86_64-apple-yosemite",
            Flavor::Snapshot => "OSX/current/10.15_Catalina",
        }
    }

    fn install_linux(&self, manager: &mut Manager) -> Result<Vec<InstalledCommand>> {
        let workdir = sys::mktempdir("dl-build-")?;
        let annex_bin = workdir.join("git-annex.linux");
        tracing::info!("Downloading and extracting under {}", annex_bin.display());
        let tarball = workdir.join("git-annex-standalone-amd64.tar.gz");
        sys::download_file(
            &format!(
                "{DOWNLOAD_BASE}/{}/git-annex-standalone-amd64.tar.gz",
                self.linux_path()
            ),
            &tarball,
            &[],
        )?;
        manager.run(&[
            "tar".to_string(),
            "-C".to_string(),
            workdir.display().to_string(),
            "-xzf".to_string(),
            tarball.display().to_string(),
        ])?;
        manager.add_path(&annex_bin, false);
        Ok(vec![InstalledCommand::new(
            "git-annex",
            annex_bin.join("git-annex"),
        )])
    }

    fn install_macos(&self, manager: &mut Manager) -> Result<Vec<InstalledCommand>> {
        let workdir = tempfile::tempdir()?;
        let dmg_path = workdir.path().join("git-annex.dmg");
        sys::download_file(
            &format!("{DOWNLOAD_BASE}/{}/git-annex.dmg", self.macos_path()),
            &dmg_path,
            &[],
        )?;
        install_git_annex_dmg(manager, &dmg_path)
    }
}

impl Installer for KitenetInstaller {
    fn name(&self) -> &'static str {
        match self.flavor {
            Flavor::Autobuild => "autobuild",
            Flavor::Snapshot => "snapshot",
        }
    }

    fn check_support(&self, _manager: &Manager) -> Support {
        match sys::os_type() {
            OsType::Linux | OsType::Macos => Support::Supported,
            OsType::Other(os) => Support::NotSupported(format!("{os} builds not published")),
        }
    }

    fn install(
        &self,
        manager: &mut Manager,
        component: &str,
        _request: &InstallRequest,
    ) -> Result<Attempt> {
        if component != "git-annex" {
            return Ok(unknown_component(self.name(), component));
        }
        let commands = match sys::os_type() {
            OsType::Linux => self.install_linux(manager)?,
            OsType::Macos => self.install_macos(manager)?,
            OsType::Other(os) => {
                return Ok(Attempt::Unsupported(format!(
                    "{} does not support {os}",
                    self.name()
                )));
            }
        };
        Ok(Attempt::Installed(commands))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_git_annex_is_handled() {
        let mut manager = Manager::new();
        let installer = KitenetInstaller {
            flavor: Flavor::Snapshot,
        };
        let attempt = installer
            .install(&mut manager, "datalad", &InstallRequest::default())
            .unwrap();
        assert_eq!(
            attempt,
            Attempt::Unsupported("snapshot does not know how to install datalad".to_string())
        );
    }

    #[test]
    fn test_download_paths_differ_per_flavor() {
        let autobuild = KitenetInstaller {
            flavor: Flavor::Autobuild,
        };
        let snapshot = KitenetInstaller {
            flavor: Flavor::Snapshot,
        };
        assert_ne!(autobuild.linux_path(), snapshot.linux_path());
        assert_ne!(autobuild.macos_path(), snapshot.macos_path());
    }
}
