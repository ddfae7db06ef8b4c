//! Component registry and full command-line parsing
//!
//! The command line is a sequence of option groups: global options
//! first, then any number of `COMPONENT[=VERSION] [options...]` groups,
//! each parsed by the named component's own parser. An immediate option
//! (--help, --version) anywhere short-circuits the whole parse.

use std::collections::BTreeMap;

use crate::components::{self, ComponentDef};
use crate::error::{InstallerError, Result};
use crate::installers;
use crate::options::{
    Immediate, Namespace, Opt, OptValue, OptionParser, ParseOutcome, log_level_value, path_value,
};

/// One component named on the command line together with its parsed
/// keyword arguments
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentRequest {
    pub name: String,
    pub kwargs: Namespace,
}

impl ComponentRequest {
    pub fn new(name: impl Into<String>) -> Self {
        ComponentRequest {
            name: name.into(),
            kwargs: Namespace::new(),
        }
    }
}

/// Outcome of parsing a full command line
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedCommandLine {
    /// --help or --version was seen; nothing should be provisioned
    Immediate(Immediate),
    Run {
        global: Namespace,
        components: Vec<ComponentRequest>,
    },
}

/// All known components, keyed by name
pub struct Registry {
    components: BTreeMap<&'static str, ComponentDef>,
    global_parser: OptionParser,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    pub fn new() -> Self {
        let mut components = BTreeMap::new();
        for def in [
            components::venv::def(),
            components::miniconda::def(),
            components::conda_env::def(),
            components::neurodebian::def(),
            components::installable::def(
                "datalad",
                "Install Datalad",
                vec![
                    installers::apt::spec(),
                    installers::conda::spec(),
                    installers::deb_url::spec(),
                    installers::pip::spec(),
                ],
            ),
            components::installable::def(
                "git-annex",
                "Install git-annex",
                vec![
                    installers::apt::spec(),
                    installers::kitenet::autobuild_spec(),
                    installers::brew::spec(),
                    installers::conda::spec(),
                    installers::github_artifact::spec(),
                    installers::deb_url::spec(),
                    installers::neurodebian::spec(),
                    installers::kitenet::snapshot_spec(),
                ],
            ),
            components::installable::def(
                "rclone",
                "Install rclone",
                vec![
                    installers::brew::spec(),
                    installers::conda::spec(),
                    installers::rclone_downloads::spec(),
                ],
            ),
            components::installable::def(
                "git-annex-remote-rclone",
                "Install git-annex-remote-rclone",
                vec![installers::brew::spec(), installers::gar_script::spec()],
            ),
        ] {
            components.insert(def.name(), def);
        }
        Registry {
            components,
            global_parser: global_parser(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&ComponentDef> {
        self.components.get(name)
    }

    /// All components in name order
    pub fn all(&self) -> impl Iterator<Item = &ComponentDef> {
        self.components.values()
    }

    pub fn global_parser(&self) -> &OptionParser {
        &self.global_parser
    }

    /// Parse a full command line: global options, then repeated
    /// component groups
    pub fn parse_args(&self, args: &[String]) -> Result<ParsedCommandLine> {
        let (global, mut leftovers) = match self.global_parser.parse_args(args)? {
            ParseOutcome::Immediate(immediate) => {
                return Ok(ParsedCommandLine::Immediate(immediate));
            }
            ParseOutcome::Matched {
                namespace,
                leftovers,
            } => (namespace, leftovers),
        };
        let mut requests = Vec::new();
        while !leftovers.is_empty() {
            let token = leftovers.remove(0);
            let (name, version) = match token.split_once('=') {
                Some((name, version)) => (name.to_string(), Some(version.to_string())),
                None => (token, None),
            };
            if name.is_empty() {
                return Err(InstallerError::usage("Component name must be nonempty"));
            }
            let def = self
                .get(&name)
                .ok_or_else(|| InstallerError::usage(format!("Unknown component: '{name}'")))?;
            match &version {
                Some(v) if v.is_empty() => {
                    return Err(InstallerError::usage_for(
                        name.clone(),
                        "Version must be nonempty",
                    ));
                }
                Some(_) if !def.parser().versioned() => {
                    return Err(InstallerError::usage_for(
                        name.clone(),
                        format!("{name} component does not take a version"),
                    ));
                }
                _ => {}
            }
            match def.parser().parse_args(&leftovers)? {
                ParseOutcome::Immediate(immediate) => {
                    return Ok(ParsedCommandLine::Immediate(immediate));
                }
                ParseOutcome::Matched {
                    mut namespace,
                    leftovers: rest,
                } => {
                    if let Some(version) = version {
                        namespace.insert("version", OptValue::Str(version));
                    }
                    leftovers = rest;
                    requests.push(ComponentRequest {
                        name,
                        kwargs: namespace,
                    });
                }
            }
        }
        Ok(ParsedCommandLine::Run {
            global,
            components: requests,
        })
    }
}

fn global_parser() -> OptionParser {
    let mut parser = OptionParser::new(None, false);
    parser.add(
        Opt::flag(&["-V", "--version"])
            .immediate(Immediate::Version)
            .help("Show program version and exit"),
    );
    parser.add(
        Opt::value(&["-l", "--log-level"])
            .converter(log_level_value)
            .metavar("LEVEL")
            .help("Set the logging threshold by name or number"),
    );
    parser.add(
        Opt::value(&["-E", "--env-write-file"])
            .converter(path_value)
            .multiple()
            .metavar("FILE")
            .help("Append PATH modifications and other shell commands to the given file"),
    );
    parser.add(
        Opt::value(&["--sudo"])
            .choices(&["ask", "error", "ok"])
            .help("How to handle sudo commands"),
    );
    parser
}
