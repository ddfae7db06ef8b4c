//! Installation via Conda (conda-forge channel)

use std::rc::Rc;

use crate::error::Result;
use crate::manager::Manager;

use super::{
    Attempt, InstallRequest, InstalledCommand, Installer, InstallerSpec, Support, no_options,
    unknown_component,
};

pub struct CondaInstaller;

pub const NAME: &str = "conda";

pub fn spec() -> InstallerSpec {
    InstallerSpec {
        name: NAME,
        factory: || Rc::new(CondaInstaller),
        options: no_options,
    }
}

fn package_for(component: &str) -> Option<&'static str> {
    match component {
        "datalad" => Some("datalad"),
        "git-annex" => Some("git-annex"),
        "rclone" => Some("rclone"),
        _ => None,
    }
}

impl Installer for CondaInstaller {
    fn name(&self) -> &'static str {
        NAME
    }

    /// Conda is usable if an instance from this run is active or a
    /// system conda is on PATH
    fn check_support(&self, manager: &Manager) -> Support {
        if manager.has_conda() || crate::sys::find_executable("conda").is_some() {
            Support::Supported
        } else {
            Support::NotSupported("no usable conda installation".to_string())
        }
    }

    fn install(
        &self,
        manager: &mut Manager,
        component: &str,
        request: &InstallRequest,
    ) -> Result<Attempt> {
        let Some(package) = package_for(component) else {
            return Ok(unknown_component("Conda", component));
        };
        let conda = manager.get_conda()?;
        let mut argv = vec![
            conda.conda_executable().display().to_string(),
            "install".to_string(),
        ];
        if let Some(name) = &conda.name {
            argv.push("--name".to_string());
            argv.push(name.clone());
        }
        argv.extend(
            ["-q", "-c", "conda-forge", "-y"]
                .iter()
                .map(|s| (*s).to_string()),
        );
        if let Some(extra) = &request.extra_args {
            argv.extend(extra.iter().cloned());
        }
        match &request.version {
            Some(version) => argv.push(format!("{package}={version}")),
            None => argv.push(package.to_string()),
        }
        manager.run(&argv)?;
        Ok(Attempt::Installed(vec![InstalledCommand::new(
            component,
            conda.bin_dir().join(component),
        )]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manager::CondaInstance;
    use std::path::PathBuf;

    #[test]
    fn test_supported_when_conda_stack_has_an_entry() {
        let mut manager = Manager::new();
        manager.push_conda(CondaInstance {
            basepath: PathBuf::from("/opt/miniconda"),
            name: None,
        });
        assert_eq!(
            CondaInstaller.check_support(&manager),
            Support::Supported
        );
    }

    #[test]
    fn test_package_map() {
        assert_eq!(package_for("datalad"), Some("datalad"));
        assert_eq!(package_for("venv"), None);
    }
}
