//! Installation via the APT package manager

use std::path::PathBuf;
use std::rc::Rc;

use crate::error::Result;
use crate::manager::Manager;
use crate::options::Opt;

use super::{
    Attempt, InstallRequest, InstalledCommand, Installer, InstallerSpec, Support,
    unknown_component,
};

pub struct AptInstaller;

pub const NAME: &str = "apt";

pub fn spec() -> InstallerSpec {
    InstallerSpec {
        name: NAME,
        factory: || Rc::new(AptInstaller),
        options: extra_options,
    }
}

fn extra_options() -> Vec<Opt> {
    vec![Opt::flag(&["--build-dep"]).help("Install build-dep instead of the package")]
}

fn package_for(component: &str) -> Option<&'static str> {
    match component {
        "datalad" => Some("datalad"),
        "git-annex" => Some("git-annex"),
        "rclone" => Some("rclone"),
        _ => None,
    }
}

/// Run `sudo apt-get install` (or `build-dep`) for one package.
/// Shared with the neurodebian installer, which differs only in its
/// package mapping and capability check.
pub(crate) fn apt_install(
    manager: &mut Manager,
    package: &str,
    request: &InstallRequest,
) -> Result<()> {
    let mut argv = vec!["sudo".to_string(), "apt-get".to_string()];
    if request.build_dep {
        argv.push("build-dep".to_string());
    } else {
        argv.push("install".to_string());
    }
    if let Some(extra) = &request.extra_args {
        argv.extend(extra.iter().cloned());
    }
    match &request.version {
        Some(version) => argv.push(format!("{package}={version}")),
        None => argv.push(package.to_string()),
    }
    manager.run(&argv)
}

pub(crate) fn apt_available() -> Support {
    if crate::sys::find_executable("apt-get").is_some() {
        Support::Supported
    } else {
        Support::NotSupported("apt-get not found".to_string())
    }
}

impl Installer for AptInstaller {
    fn name(&self) -> &'static str {
        NAME
    }

    fn check_support(&self, _manager: &Manager) -> Support {
        apt_available()
    }

    fn install(
        &self,
        manager: &mut Manager,
        component: &str,
        request: &InstallRequest,
    ) -> Result<Attempt> {
        let Some(package) = package_for(component) else {
            return Ok(unknown_component("Apt", component));
        };
        apt_install(manager, package, request)?;
        Ok(Attempt::Installed(vec![InstalledCommand::new(
            component,
            PathBuf::from("/usr/bin").join(component),
        )]))
    }
}
