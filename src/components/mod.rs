//! Provisionable components and their command-line definitions
//!
//! A component is either a direct action (venv, miniconda, conda-env,
//! neurodebian) or an installable program routed through the method
//! dispatch in [`installable`].

pub mod conda_env;
pub mod installable;
pub mod miniconda;
pub mod neurodebian;
pub mod venv;

use crate::error::Result;
use crate::manager::Manager;
use crate::options::{Namespace, OptionParser};

use installable::InstallableSpec;

enum ComponentKind {
    Action(fn(&mut Manager, Namespace) -> Result<()>),
    Installable(InstallableSpec),
}

/// One named component: its option parser and provisioning behavior
pub struct ComponentDef {
    name: &'static str,
    summary: &'static str,
    parser: OptionParser,
    kind: ComponentKind,
}

impl ComponentDef {
    pub(crate) fn action(
        name: &'static str,
        summary: &'static str,
        parser: OptionParser,
        run: fn(&mut Manager, Namespace) -> Result<()>,
    ) -> Self {
        ComponentDef {
            name,
            summary,
            parser,
            kind: ComponentKind::Action(run),
        }
    }

    pub(crate) fn installable(
        name: &'static str,
        summary: &'static str,
        parser: OptionParser,
        spec: InstallableSpec,
    ) -> Self {
        ComponentDef {
            name,
            summary,
            parser,
            kind: ComponentKind::Installable(spec),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn summary(&self) -> &'static str {
        self.summary
    }

    pub fn parser(&self) -> &OptionParser {
        &self.parser
    }

    /// Provision this component with the parsed keyword arguments
    pub fn provide(&self, manager: &mut Manager, kwargs: Namespace) -> Result<()> {
        match &self.kind {
            ComponentKind::Action(run) => run(manager, kwargs),
            ComponentKind::Installable(spec) => installable::provide(spec, manager, kwargs),
        }
    }
}
