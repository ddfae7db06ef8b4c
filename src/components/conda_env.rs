//! The conda-env component: create a new environment in the active
//! Conda instance and push it onto the Conda stack

use crate::error::Result;
use crate::manager::{CondaInstance, Manager};
use crate::options::{Namespace, Opt, OptionParser, shell_words_value, whitespace_words_value};

use super::ComponentDef;

pub fn def() -> ComponentDef {
    let mut parser = OptionParser::new(Some("conda-env"), false);
    parser.add(
        Opt::value(&["envname", "-n", "--name"])
            .metavar("NAME")
            .help("Name of the environment to create"),
    );
    parser.add(
        Opt::value(&["--spec"])
            .converter(whitespace_words_value)
            .metavar("SPEC")
            .help("Space-separated specifiers for Conda packages to install in the environment"),
    );
    parser.add(
        Opt::value(&["-e", "--extra-args"])
            .converter(shell_words_value)
            .metavar("ARGS")
            .help("Extra arguments to pass to the conda create command"),
    );
    ComponentDef::action("conda-env", "Create a Conda environment", parser, provide)
}

/// Environment name used when --name is omitted
fn random_env_name() -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.subsec_nanos())
        .unwrap_or(0);
    format!("datalad-installer-{:03}", nanos % 1000)
}

fn provide(manager: &mut Manager, mut kwargs: Namespace) -> Result<()> {
    let envname = kwargs.take_str("envname");
    let spec_packages = kwargs.take_words("spec");
    let extra_args = kwargs.take_words("extra_args");
    kwargs.warn_leftovers("conda-env");
    let conda = manager.get_conda()?;
    let name = match envname {
        Some(name) => name,
        None => {
            let name = random_env_name();
            tracing::info!("Using {name} as the name of the conda environment");
            name
        }
    };
    let mut argv = vec![
        conda.conda_executable().display().to_string(),
        "create".to_string(),
        "--name".to_string(),
        name.clone(),
    ];
    if let Some(extra) = extra_args {
        argv.extend(extra);
    }
    if let Some(packages) = spec_packages {
        argv.extend(packages);
    }
    manager.run(&argv)?;
    manager.push_conda(CondaInstance {
        basepath: conda.basepath,
        name: Some(name),
    });
    Ok(())
}
