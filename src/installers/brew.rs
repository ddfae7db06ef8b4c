//! Installation via Homebrew

use std::path::PathBuf;
use std::rc::Rc;

use crate::error::Result;
use crate::manager::Manager;
use crate::options::Opt;

use super::{
    Attempt, InstallRequest, InstalledCommand, Installer, InstallerSpec, Support, no_options,
    unknown_component,
};

pub struct BrewInstaller;

pub const NAME: &str = "brew";

pub fn spec() -> InstallerSpec {
    InstallerSpec {
        name: NAME,
        factory: || Rc::new(BrewInstaller),
        options: no_options,
    }
}

fn package_for(component: &str) -> Option<&'static str> {
    match component {
        "git-annex" => Some("git-annex"),
        "rclone" => Some("rclone"),
        "git-annex-remote-rclone" => Some("git-annex-remote-rclone"),
        _ => None,
    }
}

impl Installer for BrewInstaller {
    fn name(&self) -> &'static str {
        NAME
    }

    fn check_support(&self, _manager: &Manager) -> Support {
        if crate::sys::find_executable("brew").is_some() {
            Support::Supported
        } else {
            Support::NotSupported("brew not found".to_string())
        }
    }

    fn install(
        &self,
        manager: &mut Manager,
        component: &str,
        request: &InstallRequest,
    ) -> Result<Attempt> {
        let Some(package) = package_for(component) else {
            return Ok(unknown_component("Brew", component));
        };
        if request.version.is_some() {
            // brew installs the current formula only
            tracing::warn!("brew cannot install pinned versions; ignoring --version");
        }
        let mut argv = vec!["brew".to_string(), "install".to_string()];
        if let Some(extra) = &request.extra_args {
            argv.extend(extra.iter().cloned());
        }
        argv.push(package.to_string());
        manager.run(&argv)?;
        Ok(Attempt::Installed(vec![InstalledCommand::new(
            component,
            PathBuf::from("/usr/local/bin").join(component),
        )]))
    }
}
