//! git-annex DMG installation on macOS
//!
//! Shared by the kitenet and GitHub-artifact installers.

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::manager::Manager;

use super::InstalledCommand;

/// Attach the DMG, copy git-annex.app into /Applications, and put its
/// binaries on PATH
pub(crate) fn install_git_annex_dmg(
    manager: &mut Manager,
    dmg_path: &Path,
) -> Result<Vec<InstalledCommand>> {
    manager.run(&[
        "hdiutil".to_string(),
        "attach".to_string(),
        dmg_path.display().to_string(),
    ])?;
    manager.run(&[
        "rsync".to_string(),
        "-a".to_string(),
        "/Volumes/git-annex/git-annex.app".to_string(),
        "/Applications/".to_string(),
    ])?;
    manager.run(&[
        "hdiutil".to_string(),
        "detach".to_string(),
        "/Volumes/git-annex/".to_string(),
    ])?;
    let annex_bin = PathBuf::from("/Applications/git-annex.app/Contents/MacOS");
    manager.add_path(&annex_bin, false);
    Ok(vec![InstalledCommand::new(
        "git-annex",
        annex_bin.join("git-annex"),
    )])
}
