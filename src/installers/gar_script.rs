//! git-annex-remote-rclone installed as a single script from GitHub

use std::rc::Rc;

use crate::error::Result;
use crate::manager::Manager;
use crate::sys::{self, OsType};

use super::{
    Attempt, InstallRequest, InstalledCommand, Installer, InstallerSpec, Support, no_options,
    unknown_component,
};

pub struct GarScriptInstaller;

pub const NAME: &str = "DanielDent/git-annex-remote-rclone";

pub fn spec() -> InstallerSpec {
    InstallerSpec {
        name: NAME,
        factory: || Rc::new(GarScriptInstaller),
        options: no_options,
    }
}

fn script_url(version: Option<&str>) -> String {
    let git_ref = version.unwrap_or("master");
    format!(
        "https://raw.githubusercontent.com/DanielDent/git-annex-remote-rclone/{git_ref}/git-annex-remote-rclone"
    )
}

impl Installer for GarScriptInstaller {
    fn name(&self) -> &'static str {
        NAME
    }

    fn check_support(&self, _manager: &Manager) -> Support {
        match sys::os_type() {
            OsType::Linux | OsType::Macos => Support::Supported,
            OsType::Other(os) => {
                Support::NotSupported(format!("shell script not runnable on {os}"))
            }
        }
    }

    fn install(
        &self,
        manager: &mut Manager,
        component: &str,
        request: &InstallRequest,
    ) -> Result<Attempt> {
        if component != "git-annex-remote-rclone" {
            return Ok(unknown_component(NAME, component));
        }
        let bindir = sys::mktempdir("dl-gar-")?;
        let script = bindir.join("git-annex-remote-rclone");
        sys::download_file(&script_url(request.version.as_deref()), &script, &[])?;
        sys::make_executable(&script)?;
        manager.add_path(&bindir, false);
        // The script only runs under git-annex; it has no --version
        Ok(Attempt::Installed(vec![
            InstalledCommand::without_smoke_test("git-annex-remote-rclone", script),
        ]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ref_defaults_to_master() {
        assert_eq!(
            script_url(None),
            "https://raw.githubusercontent.com/DanielDent/git-annex-remote-rclone/master/git-annex-remote-rclone"
        );
    }

    #[test]
    fn test_version_selects_a_tag() {
        assert_eq!(
            script_url(Some("v0.6")),
            "https://raw.githubusercontent.com/DanielDent/git-annex-remote-rclone/v0.6/git-annex-remote-rclone"
        );
    }

    #[test]
    fn test_only_the_remote_helper_is_handled() {
        let mut manager = Manager::new();
        let attempt = GarScriptInstaller
            .install(&mut manager, "rclone", &InstallRequest::default())
            .unwrap();
        assert!(matches!(attempt, Attempt::Unsupported(_)));
    }
}
