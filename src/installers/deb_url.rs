//! Installation from a user-supplied `*.deb` URL

use std::path::PathBuf;
use std::rc::Rc;

use crate::error::{InstallerError, Result};
use crate::manager::Manager;
use crate::options::Opt;
use crate::sys;

use super::{Attempt, InstallRequest, InstalledCommand, Installer, InstallerSpec, Support};

pub struct DebUrlInstaller;

pub const NAME: &str = "deb-url";

pub fn spec() -> InstallerSpec {
    InstallerSpec {
        name: NAME,
        factory: || Rc::new(DebUrlInstaller),
        options: extra_options,
    }
}

fn extra_options() -> Vec<Opt> {
    vec![
        Opt::value(&["--url"])
            .metavar("URL")
            .help("URL from which to download the `*.deb` file"),
    ]
}

impl Installer for DebUrlInstaller {
    fn name(&self) -> &'static str {
        NAME
    }

    fn check_support(&self, _manager: &Manager) -> Support {
        if sys::find_executable("dpkg").is_some() {
            Support::Supported
        } else {
            Support::NotSupported("dpkg not found".to_string())
        }
    }

    fn install(
        &self,
        manager: &mut Manager,
        component: &str,
        request: &InstallRequest,
    ) -> Result<Attempt> {
        let Some(url) = &request.url else {
            return Err(InstallerError::UrlRequired);
        };
        let workdir = tempfile::tempdir()?;
        let deb_path = workdir.path().join(format!("{component}.deb"));
        sys::download_file(url, &deb_path, &[])?;
        let mut argv = vec!["sudo".to_string(), "dpkg".to_string(), "-i".to_string()];
        if let Some(extra) = &request.extra_args {
            argv.extend(extra.iter().cloned());
        }
        argv.push(deb_path.display().to_string());
        manager.run(&argv)?;
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
    fn test_missing_url_is_fatal_not_unsupported() {
        let mut manager = Manager::new();
        let err = DebUrlInstaller
            .install(&mut manager, "git-annex", &InstallRequest::default())
            .unwrap_err();
        assert!(matches!(err, InstallerError::UrlRequired));
    }
}
