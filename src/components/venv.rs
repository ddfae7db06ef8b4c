//! The venv component: create a Python virtual environment and route
//! later pip installations into it

use std::rc::Rc;

use crate::error::Result;
use crate::installers::pip::PipInstaller;
use crate::manager::Manager;
use crate::options::{Namespace, Opt, OptionParser, path_value, shell_words_value};
use crate::sys;

use super::ComponentDef;

pub fn def() -> ComponentDef {
    let mut parser = OptionParser::new(Some("venv"), false);
    parser.add(
        Opt::value(&["--path"])
            .converter(path_value)
            .metavar("PATH")
            .help("Create the venv at the given path"),
    );
    parser.add(
        Opt::value(&["-e", "--extra-args"])
            .converter(shell_words_value)
            .metavar("ARGS")
            .help("Extra arguments to pass to the venv command"),
    );
    ComponentDef::action(
        "venv",
        "Create a Python virtual environment",
        parser,
        provide,
    )
}

fn provide(manager: &mut Manager, mut kwargs: Namespace) -> Result<()> {
    let path = kwargs.take_path("path");
    let extra_args = kwargs.take_words("extra_args");
    kwargs.warn_leftovers("venv");
    let path = match path {
        Some(path) => path,
        None => sys::mktempdir("dl-venv-")?,
    };
    tracing::info!("Creating a virtual environment at {}", path.display());
    let mut argv = vec![
        "python3".to_string(),
        "-m".to_string(),
        "venv".to_string(),
    ];
    if let Some(extra) = extra_args {
        argv.extend(extra);
    }
    argv.push(path.display().to_string());
    manager.run(&argv)?;
    // Subsequent pip-based installs land in this environment
    manager
        .installer_stack
        .push(Rc::new(PipInstaller::in_venv(path)));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::ParseOutcome;
    use std::path::PathBuf;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_parser_is_unversioned() {
        assert!(!def().parser().versioned());
    }

    #[test]
    fn test_parser_accepts_path_and_extra_args() {
        let component = def();
        let outcome = component
            .parser()
            .parse_args(&argv(&["--path", "/tmp/venv", "-e", "--system-site-packages"]))
            .unwrap();
        let ParseOutcome::Matched { mut namespace, .. } = outcome else {
            panic!("expected Matched");
        };
        assert_eq!(namespace.take_path("path"), Some(PathBuf::from("/tmp/venv")));
        assert_eq!(
            namespace.take_words("extra_args"),
            Some(vec!["--system-site-packages".to_string()])
        );
    }
}
