//! Run state: the installer fallback stack, the Conda instance stack,
//! provisioned commands, and PATH bookkeeping
//!
//! Provisioning is strictly sequential; components mutate the manager
//! (pushing installers or Conda instances) and later components see
//! those mutations.

use std::path::{Path, PathBuf};
use std::rc::Rc;

use console::style;

use crate::error::{InstallerError, Result};
use crate::installers::{self, InstalledCommand, Installer};
use crate::registry::{ComponentRequest, Registry};
use crate::sys::{self, SudoPolicy};

/// One usable Conda installation: a base path plus an optional
/// environment name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CondaInstance {
    pub basepath: PathBuf,
    pub name: Option<String>,
}

impl CondaInstance {
    pub fn conda_executable(&self) -> PathBuf {
        self.basepath.join("bin").join("conda")
    }

    /// Directory where this instance's commands are installed
    pub fn bin_dir(&self) -> PathBuf {
        match &self.name {
            Some(name) => self.basepath.join("envs").join(name).join("bin"),
            None => self.basepath.join("bin"),
        }
    }
}

pub struct Manager {
    /// Fallback installers, lowest priority first
    pub installer_stack: Vec<Rc<dyn Installer>>,
    conda_stack: Vec<CondaInstance>,
    /// Commands provisioned so far, in installation order
    pub new_commands: Vec<InstalledCommand>,
    new_path: Option<Vec<String>>,
    env_write_files: Vec<PathBuf>,
    sudo: SudoPolicy,
}

impl Default for Manager {
    fn default() -> Self {
        Self::new()
    }
}

impl Manager {
    pub fn new() -> Self {
        Manager {
            installer_stack: vec![
                Rc::new(installers::brew::BrewInstaller),
                Rc::new(installers::neurodebian::NeurodebianInstaller),
                Rc::new(installers::apt::AptInstaller),
                Rc::new(installers::conda::CondaInstaller),
            ],
            conda_stack: Vec::new(),
            new_commands: Vec::new(),
            new_path: None,
            env_write_files: Vec::new(),
            sudo: SudoPolicy::Ask,
        }
    }

    pub fn set_sudo(&mut self, sudo: SudoPolicy) {
        self.sudo = sudo;
    }

    pub fn add_env_write_file(&mut self, path: PathBuf) {
        self.env_write_files.push(path);
    }

    /// Run an external command through the sudo confirmation gate
    pub fn run(&mut self, argv: &[String]) -> Result<()> {
        sys::runcmd(argv, &[], &mut self.sudo)
    }

    pub fn run_with_env(&mut self, argv: &[String], env: &[(&str, &str)]) -> Result<()> {
        sys::runcmd(argv, env, &mut self.sudo)
    }

    /// Run an external command and capture its standard output
    pub fn read(&mut self, argv: &[String]) -> Result<String> {
        sys::readcmd(argv, &mut self.sudo)
    }

    pub fn has_conda(&self) -> bool {
        !self.conda_stack.is_empty()
    }

    pub fn push_conda(&mut self, instance: CondaInstance) {
        self.conda_stack.push(instance);
    }

    /// The active Conda instance: the top of the stack, or a system
    /// conda found on PATH
    pub fn get_conda(&mut self) -> Result<CondaInstance> {
        if let Some(instance) = self.conda_stack.last() {
            return Ok(instance.clone());
        }
        if let Some(conda_path) = sys::find_executable("conda") {
            let base = self.read(&[
                conda_path.display().to_string(),
                "info".to_string(),
                "--base".to_string(),
            ])?;
            return Ok(CondaInstance {
                basepath: PathBuf::from(base.trim()),
                name: None,
            });
        }
        Err(InstallerError::CondaNotFound)
    }

    /// Prepend (or append, with `last`) a directory to the PATH line
    /// written to the env write files
    pub fn add_path(&mut self, dir: &Path, last: bool) {
        let quoted = {
            let rendered = dir.display().to_string();
            shlex::try_quote(&rendered)
                .map_or_else(|_| rendered.clone(), |q| q.into_owned())
        };
        let path = self
            .new_path
            .get_or_insert_with(|| vec!["\"$PATH\"".to_string()]);
        if last {
            path.push(quoted);
        } else {
            path.insert(0, quoted);
        }
    }

    /// Provision every requested component in order
    pub fn dispatch(&mut self, registry: &Registry, requests: Vec<ComponentRequest>) -> Result<()> {
        for request in requests {
            let def = registry
                .get(&request.name)
                .ok_or_else(|| InstallerError::usage(format!(
                    "Unknown component: '{}'",
                    request.name
                )))?;
            def.provide(self, request.kwargs)?;
        }
        Ok(())
    }

    /// Check every provisioned command: it must exist, be executable,
    /// and pass its smoke test. Checks are exhaustive; every failure is
    /// reported before the verdict.
    pub fn post_check(&self) -> bool {
        let mut ok = true;
        for command in &self.new_commands {
            tracing::info!("{} is now installed at {}", command.name, command.path.display());
            if !command.path.exists() {
                eprintln!(
                    "{} {} does not exist",
                    style("error:").red().bold(),
                    command.path.display()
                );
                ok = false;
                continue;
            }
            if command.path.file_name().and_then(|n| n.to_str()) != Some(command.name.as_str()) {
                eprintln!(
                    "{} {} does not have the expected name",
                    style("error:").red().bold(),
                    command.path.display()
                );
                ok = false;
            }
            if !is_executable(&command.path) {
                eprintln!(
                    "{} {} is not executable",
                    style("error:").red().bold(),
                    command.path.display()
                );
                ok = false;
                continue;
            }
            if let Some(smoke_args) = &command.smoke_args {
                let passed = std::process::Command::new(&command.path)
                    .args(smoke_args)
                    .status()
                    .map(|status| status.success())
                    .unwrap_or(false);
                if !passed {
                    eprintln!(
                        "{} {} command failed",
                        style("error:").red().bold(),
                        command.name
                    );
                    ok = false;
                }
            }
        }
        ok
    }

    /// Write the accumulated PATH line to every env write file; files
    /// are created even when no paths were added
    pub fn finish(&self) -> Result<()> {
        match &self.new_path {
            Some(path) => {
                let pathline = format!("PATH={}\n", path.join(":"));
                tracing::info!("Adding {pathline:?} to env write files");
                for file in &self.env_write_files {
                    let mut text = std::fs::read_to_string(file).unwrap_or_default();
                    if !text.is_empty() && !text.ends_with('\n') {
                        text.push('\n');
                    }
                    text.push_str(&pathline);
                    std::fs::write(file, text).map_err(|e| InstallerError::WriteFailed {
                        path: file.display().to_string(),
                        reason: e.to_string(),
                    })?;
                }
            }
            None => {
                for file in &self.env_write_files {
                    if !file.exists() {
                        std::fs::File::create(file).map_err(|e| InstallerError::WriteFailed {
                            path: file.display().to_string(),
                            reason: e.to_string(),
                        })?;
                    }
                }
            }
        }
        Ok(())
    }
}

fn is_executable(path: &Path) -> bool {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::metadata(path)
            .map(|m| m.permissions().mode() & 0o111 != 0)
            .unwrap_or(false)
    }
    #[cfg(not(unix))]
    {
        path.exists()
    }
}
