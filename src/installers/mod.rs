//! Installation strategies and their shared contract
//!
//! Each installer implements [`Installer`]: a capability check returning
//! [`Support`], and an [`Installer::install`] that either produces
//! [`InstalledCommand`] records, reports itself [`Attempt::Unsupported`]
//! for the requested component (a routine value that drives fallback,
//! not an error), or fails fatally.

pub mod apt;
pub mod brew;
pub mod conda;
pub mod deb_url;
pub mod dmg;
pub mod gar_script;
pub mod github_artifact;
pub mod kitenet;
pub mod neurodebian;
pub mod pip;
pub mod rclone_downloads;

use std::path::PathBuf;
use std::rc::Rc;

use crate::error::Result;
use crate::manager::Manager;
use crate::options::{Namespace, Opt};

/// A record of one provisioned executable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledCommand {
    /// Logical command name
    pub name: String,
    /// Absolute installed path
    pub path: PathBuf,
    /// Smoke-test argument list; None skips the invocation check
    pub smoke_args: Option<Vec<String>>,
}

impl InstalledCommand {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        InstalledCommand {
            name: name.into(),
            path: path.into(),
            smoke_args: Some(vec!["--version".to_string()]),
        }
    }

    /// A command with no meaningful smoke-test invocation; only
    /// existence and executability are checked
    pub fn without_smoke_test(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        InstalledCommand {
            name: name.into(),
            path: path.into(),
            smoke_args: None,
        }
    }
}

/// Outcome of an installer capability check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Support {
    Supported,
    NotSupported(String),
}

/// Outcome of one installation attempt. `Unsupported` means "this
/// strategy cannot handle this component/OS/arguments" and drives
/// fallback; genuine failures are reported through `Err` instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attempt {
    Installed(Vec<InstalledCommand>),
    Unsupported(String),
}

/// Keyword arguments of an installable component, decoded from the
/// parsed namespace. Fields map one-to-one to option destinations:
/// `version`, `extra_args`, `build_dep`, `devel`, `extras`, `url`.
/// Leftover namespace keys are logged and ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallRequest {
    pub version: Option<String>,
    pub extra_args: Option<Vec<String>>,
    pub build_dep: bool,
    pub devel: bool,
    pub extras: Option<String>,
    pub url: Option<String>,
}

impl InstallRequest {
    pub fn from_namespace(mut namespace: Namespace, component: &str) -> Self {
        let request = InstallRequest {
            version: namespace.take_str("version"),
            extra_args: namespace.take_words("extra_args"),
            build_dep: namespace.take_flag("build_dep"),
            devel: namespace.take_flag("devel"),
            extras: namespace.take_str("extras"),
            url: namespace.take_str("url"),
        };
        namespace.warn_leftovers(component);
        request
    }
}

/// An installation strategy
pub trait Installer {
    /// Method name as selected by --method
    fn name(&self) -> &'static str;

    /// Whether this strategy is applicable on the current OS/toolchain
    fn check_support(&self, manager: &Manager) -> Support;

    /// Install the given component, returning the provisioned commands
    fn install(
        &self,
        manager: &mut Manager,
        component: &str,
        request: &InstallRequest,
    ) -> Result<Attempt>;
}

/// Registration descriptor: how a component wires one installer into
/// its method registry, --method choices, and option set
pub struct InstallerSpec {
    pub name: &'static str,
    pub factory: fn() -> Rc<dyn Installer>,
    /// Installer-specific options merged into the registering
    /// component's parser
    pub options: fn() -> Vec<Opt>,
}

pub(crate) fn no_options() -> Vec<Opt> {
    Vec::new()
}

/// Standard "this installer has no package mapping for X" reason
pub(crate) fn unknown_component(method: &str, component: &str) -> Attempt {
    Attempt::Unsupported(format!("{method} does not know how to install {component}"))
}
