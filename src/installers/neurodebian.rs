//! Installation via the NeuroDebian APT repository
//!
//! Same mechanics as the apt installer but with NeuroDebian's package
//! names, gated on the repository actually being configured.

use std::path::PathBuf;
use std::rc::Rc;

use crate::error::Result;
use crate::manager::Manager;

use super::apt::{apt_available, apt_install};
use super::{
    Attempt, InstallRequest, InstalledCommand, Installer, InstallerSpec, Support, no_options,
    unknown_component,
};

pub struct NeurodebianInstaller;

pub const NAME: &str = "neurodebian";

pub fn spec() -> InstallerSpec {
    InstallerSpec {
        name: NAME,
        factory: || Rc::new(NeurodebianInstaller),
        options: no_options,
    }
}

fn package_for(component: &str) -> Option<&'static str> {
    match component {
        "git-annex" => Some("git-annex-standalone"),
        _ => None,
    }
}

impl Installer for NeurodebianInstaller {
    fn name(&self) -> &'static str {
        NAME
    }

    fn check_support(&self, _manager: &Manager) -> Support {
        if let Support::NotSupported(reason) = apt_available() {
            return Support::NotSupported(reason);
        }
        let configured = crate::sys::probe_output(&["apt-cache", "policy"])
            .is_some_and(|policy| policy.contains("l=NeuroDebian"));
        if configured {
            Support::Supported
        } else {
            Support::NotSupported("NeuroDebian repository not configured".to_string())
        }
    }

    fn install(
        &self,
        manager: &mut Manager,
        component: &str,
        request: &InstallRequest,
    ) -> Result<Attempt> {
        let Some(package) = package_for(component) else {
            return Ok(unknown_component("NeuroDebian", component));
        };
        apt_install(manager, package, request)?;
        Ok(Attempt::Installed(vec![InstalledCommand::new(
            component,
            PathBuf::from("/usr/bin").join(component),
        )]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_git_annex_is_mapped() {
        assert_eq!(package_for("git-annex"), Some("git-annex-standalone"));
        assert_eq!(package_for("datalad"), None);
    }

    #[test]
    fn test_unknown_component_is_unsupported() {
        let mut manager = Manager::new();
        let attempt = NeurodebianInstaller
            .install(&mut manager, "datalad", &InstallRequest::default())
            .unwrap();
        assert!(matches!(attempt, Attempt::Unsupported(_)));
    }
}
