//! Installation via pip, optionally inside a virtual environment
//!
//! The venv component pushes a venv-bound PipInstaller onto the
//! fallback stack so later components install into that environment.

use std::path::PathBuf;
use std::rc::Rc;

use crate::error::Result;
use crate::manager::Manager;
use crate::options::Opt;

use super::{
    Attempt, InstallRequest, InstalledCommand, Installer, InstallerSpec, Support,
    unknown_component,
};

pub struct PipInstaller {
    venv_path: Option<PathBuf>,
}

pub const NAME: &str = "pip";

pub fn spec() -> InstallerSpec {
    InstallerSpec {
        name: NAME,
        factory: || Rc::new(PipInstaller::system()),
        options: extra_options,
    }
}

fn extra_options() -> Vec<Opt> {
    vec![
        Opt::flag(&["--devel"]).help("Install the development version from the source repository"),
        Opt::value(&["-E", "--extras"])
            .metavar("EXTRAS")
            .help("Comma-separated list of package extras to install"),
    ]
}

fn package_for(component: &str) -> Option<&'static str> {
    match component {
        "datalad" => Some("datalad"),
        _ => None,
    }
}

fn devel_urlspec_for(component: &str) -> Option<&'static str> {
    match component {
        "datalad" => Some("git+https://github.com/datalad/datalad.git"),
        _ => None,
    }
}

impl PipInstaller {
    /// pip of the interpreter found on PATH
    pub fn system() -> Self {
        PipInstaller { venv_path: None }
    }

    /// pip bound to a virtual environment
    pub fn in_venv(venv_path: PathBuf) -> Self {
        PipInstaller {
            venv_path: Some(venv_path),
        }
    }

    fn python(&self) -> String {
        match &self.venv_path {
            Some(path) => path.join("bin").join("python").display().to_string(),
            None => "python3".to_string(),
        }
    }

    fn bin_path(&self, component: &str) -> PathBuf {
        match &self.venv_path {
            Some(venv) => venv.join("bin").join(component),
            None => PathBuf::from("/usr/local/bin").join(component),
        }
    }
}

/// Compose a pip requirement specifier from its parts
pub(crate) fn compose_requirement(
    package: &str,
    version: Option<&str>,
    urlspec: Option<&str>,
    extras: Option<&str>,
) -> String {
    let mut requirement = package.to_string();
    if let Some(extras) = extras {
        requirement.push_str(&format!("[{extras}]"));
    }
    match urlspec {
        None => {
            if let Some(version) = version {
                requirement.push_str(&format!("=={version}"));
            }
        }
        Some(urlspec) => {
            requirement.push_str(&format!(" @ {urlspec}"));
            if let Some(version) = version {
                requirement.push_str(&format!("@{version}"));
            }
        }
    }
    requirement
}

impl Installer for PipInstaller {
    fn name(&self) -> &'static str {
        NAME
    }

    fn check_support(&self, _manager: &Manager) -> Support {
        Support::Supported
    }

    fn install(
        &self,
        manager: &mut Manager,
        component: &str,
        request: &InstallRequest,
    ) -> Result<Attempt> {
        let Some(package) = package_for(component) else {
            return Ok(unknown_component("Pip", component));
        };
        let urlspec = if request.devel {
            match devel_urlspec_for(component) {
                Some(url) => Some(url),
                None => {
                    return Ok(Attempt::Unsupported(format!(
                        "No source repository known for {component}"
                    )));
                }
            }
        } else {
            None
        };
        let mut argv = vec![
            self.python(),
            "-m".to_string(),
            "pip".to_string(),
            "install".to_string(),
        ];
        if let Some(extra) = &request.extra_args {
            argv.extend(extra.iter().cloned());
        }
        argv.push(compose_requirement(
            package,
            request.version.as_deref(),
            urlspec,
            request.extras.as_deref(),
        ));
        manager.run(&argv)?;
        let user_install = request
            .extra_args
            .as_ref()
            .is_some_and(|args| args.iter().any(|a| a == "--user"));
        let bin_path = if user_install {
            let user_base = manager.read(&[
                self.python(),
                "-m".to_string(),
                "site".to_string(),
                "--user-base".to_string(),
            ])?;
            PathBuf::from(user_base.trim()).join("bin").join(component)
        } else {
            self.bin_path(component)
        };
        Ok(Attempt::Installed(vec![InstalledCommand::new(
            component, bin_path,
        )]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_plain() {
        assert_eq!(compose_requirement("datalad", None, None, None), "datalad");
    }

    #[test]
    fn test_compose_versioned() {
        assert_eq!(
            compose_requirement("datalad", Some("0.13.0"), None, None),
            "datalad==0.13.0"
        );
    }

    #[test]
    fn test_compose_extras() {
        assert_eq!(
            compose_requirement("datalad", Some("0.13.0"), None, Some("all")),
            "datalad[all]==0.13.0"
        );
    }

    #[test]
    fn test_compose_urlspec() {
        assert_eq!(
            compose_requirement(
                "datalad",
                None,
                Some("git+https://github.com/datalad/datalad.git"),
                None
            ),
            "datalad @ git+https://github.com/datalad/datalad.git"
        );
    }

    #[test]
    fn test_compose_urlspec_with_version() {
        assert_eq!(
            compose_requirement(
                "datalad",
                Some("0.13.0"),
                Some("git+https://github.com/datalad/datalad.git"),
                Some("all")
            ),
            "datalad[all] @ git+https://github.com/datalad/datalad.git@0.13.0"
        );
    }

    #[test]
    fn test_python_selection() {
        assert_eq!(PipInstaller::system().python(), "python3");
        let venv = PipInstaller::in_venv(PathBuf::from("/tmp/venv"));
        assert_eq!(venv.python(), "/tmp/venv/bin/python");
    }

    #[test]
    fn test_always_supported() {
        let manager = Manager::new();
        assert_eq!(
            PipInstaller::system().check_support(&manager),
            Support::Supported
        );
    }
}
