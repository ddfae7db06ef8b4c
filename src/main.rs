//! datalad-installer: install Datalad, git-annex, and related
//! components in a single invocation

mod components;
mod error;
mod help;
mod installers;
mod manager;
mod options;
mod registry;
mod sys;

use tracing::level_filters::LevelFilter;

use crate::manager::Manager;
use crate::options::{Immediate, Namespace};
use crate::registry::{ComponentRequest, ParsedCommandLine, Registry};
use crate::sys::SudoPolicy;

const PROG: &str = "datalad-installer";

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    std::process::exit(run(&args));
}

fn run(args: &[String]) -> i32 {
    let registry = Registry::new();
    let parsed = match registry.parse_args(args) {
        Ok(parsed) => parsed,
        Err(e) => {
            eprintln!("{}", help::short_help(PROG, &registry, e.usage_component()));
            eprintln!("{PROG}: error: {e}");
            return 2;
        }
    };
    match parsed {
        ParsedCommandLine::Immediate(Immediate::Version) => {
            println!("{PROG} {}", env!("CARGO_PKG_VERSION"));
            0
        }
        ParsedCommandLine::Immediate(Immediate::Help { component, topic }) => {
            println!(
                "{}",
                help::long_help(PROG, &registry, component.as_deref(), topic.as_deref())
            );
            0
        }
        ParsedCommandLine::Run { global, components } => {
            provision(&registry, global, components)
        }
    }
}

fn provision(
    registry: &Registry,
    mut global: Namespace,
    components: Vec<ComponentRequest>,
) -> i32 {
    let log_level = global.take_level("log_level").unwrap_or(LevelFilter::INFO);
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .init();
    let mut manager = Manager::new();
    if let Some(files) = global.take_paths("env_write_file") {
        for file in files {
            manager.add_env_write_file(file);
        }
    }
    if let Some(policy) = global.take_str("sudo").as_deref().and_then(SudoPolicy::from_name) {
        manager.set_sudo(policy);
    }
    global.warn_leftovers("global options");
    let components = if components.is_empty() {
        vec![ComponentRequest::new("datalad")]
    } else {
        components
    };
    if let Err(e) = manager.dispatch(registry, components) {
        eprintln!("{:?}", miette::Report::new(e));
        return 1;
    }
    let ok = manager.post_check();
    if let Err(e) = manager.finish() {
        eprintln!("{:?}", miette::Report::new(e));
        return 1;
    }
    if ok { 0 } else { 1 }
}
