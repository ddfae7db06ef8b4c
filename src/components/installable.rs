//! Method dispatch for installable components
//!
//! An installable component (datalad, git-annex, rclone, ...) carries a
//! registry of named installation methods. With `--method auto` (or no
//! method at all) the manager's fallback stack is walked from highest
//! priority down, skipping unsupported strategies and stopping at the
//! first success. An explicitly selected method never falls back: any
//! refusal is fatal.

use std::rc::Rc;

use crate::error::{InstallerError, Result};
use crate::installers::{
    Attempt, InstallRequest, InstalledCommand, Installer, InstallerSpec, Support,
};
use crate::manager::Manager;
use crate::options::{Namespace, Opt, OptionParser, shell_words_value};

use super::ComponentDef;

/// The installable half of a [`ComponentDef`]: the program to provision
/// and its registered installation methods
pub struct InstallableSpec {
    command: &'static str,
    methods: Vec<(&'static str, fn() -> Rc<dyn Installer>)>,
}

/// Build an installable component definition. Each registered installer
/// contributes its name to the --method choices and its extra options
/// to the component's parser; two installers contributing the same
/// option share a single entry.
pub fn def(
    name: &'static str,
    summary: &'static str,
    installers: Vec<InstallerSpec>,
) -> ComponentDef {
    let mut parser = OptionParser::new(Some(name), true);
    parser.add(
        Opt::value(&["-e", "--extra-args"])
            .converter(shell_words_value)
            .metavar("ARGS")
            .help("Extra arguments to pass to the install command"),
    );
    parser.add(
        Opt::value(&["-m", "--method"])
            .choices(&["auto"])
            .help("Select the installation method to use"),
    );
    let mut methods = Vec::new();
    for spec in installers {
        parser.push_method_choice(spec.name);
        for opt in (spec.options)() {
            parser.merge(opt);
        }
        methods.push((spec.name, spec.factory));
    }
    ComponentDef::installable(
        name,
        summary,
        parser,
        InstallableSpec {
            command: name,
            methods,
        },
    )
}

pub(crate) fn provide(
    spec: &InstallableSpec,
    manager: &mut Manager,
    mut kwargs: Namespace,
) -> Result<()> {
    let method = kwargs.take_str("method");
    let request = InstallRequest::from_namespace(kwargs, spec.command);
    let commands = match method.as_deref() {
        None | Some("auto") => auto_install(manager, spec.command, &request)?,
        Some(method) => explicit_install(spec, manager, method, &request)?,
    };
    manager.new_commands.extend(commands);
    Ok(())
}

fn explicit_install(
    spec: &InstallableSpec,
    manager: &mut Manager,
    method: &str,
    request: &InstallRequest,
) -> Result<Vec<InstalledCommand>> {
    let factory = spec
        .methods
        .iter()
        .find(|(name, _)| *name == method)
        .map(|(_, factory)| *factory)
        .ok_or_else(|| InstallerError::UnknownMethod {
            method: method.to_string(),
        })?;
    let installer = factory();
    if let Support::NotSupported(reason) = installer.check_support(manager) {
        return Err(InstallerError::MethodUnsupported {
            method: method.to_string(),
            component: spec.command.to_string(),
            reason,
        });
    }
    match installer.install(manager, spec.command, request)? {
        Attempt::Installed(commands) => Ok(commands),
        Attempt::Unsupported(reason) => Err(InstallerError::MethodUnsupported {
            method: method.to_string(),
            component: spec.command.to_string(),
            reason,
        }),
    }
}

fn auto_install(
    manager: &mut Manager,
    component: &str,
    request: &InstallRequest,
) -> Result<Vec<InstalledCommand>> {
    // Highest priority last in the stack; clone the entries out so the
    // installers can borrow the manager mutably
    let stack = manager.installer_stack.clone();
    for installer in stack.iter().rev() {
        if let Support::NotSupported(reason) = installer.check_support(manager) {
            tracing::debug!("Skipping {}: {reason}", installer.name());
            continue;
        }
        tracing::debug!("Attempting to install via {}", installer.name());
        match installer.install(manager, component, request)? {
            Attempt::Installed(commands) => return Ok(commands),
            Attempt::Unsupported(reason) => {
                tracing::debug!("Installation method not supported: {reason}");
            }
        }
    }
    Err(InstallerError::NoViableMethod {
        component: component.to_string(),
    })
}
