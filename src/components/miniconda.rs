//! The miniconda component: download and run the Miniconda installer
//! script, then push the new instance onto the Conda stack

use crate::error::{InstallerError, Result};
use crate::manager::{CondaInstance, Manager};
use crate::options::{
    Immediate, Namespace, Opt, OptionParser, path_value, shell_words_value,
    whitespace_words_value,
};
use crate::sys::{self, OsType};

use super::ComponentDef;

const DEFAULT_URL_BASE: &str = "https://repo.anaconda.com/miniconda/";

pub fn def() -> ComponentDef {
    let mut parser = OptionParser::new(Some("miniconda"), true);
    parser.add(
        Opt::value(&["--path"])
            .converter(path_value)
            .metavar("PATH")
            .help("Install Miniconda at the given path"),
    );
    parser.add(Opt::flag(&["--batch"]).help("Run the Miniconda installer in batch mode"));
    parser.add(
        Opt::value(&["--spec"])
            .converter(whitespace_words_value)
            .metavar("SPEC")
            .help("Space-separated specifiers for Conda packages to install in the base environment"),
    );
    parser.add(
        Opt::value(&["-e", "--extra-args"])
            .converter(shell_words_value)
            .metavar("ARGS")
            .help("Extra arguments to pass to the install command"),
    );
    parser.add(
        Opt::flag(&["--help-versions"])
            .immediate(Immediate::Help {
                component: Some("miniconda".to_string()),
                topic: Some("versions".to_string()),
            })
            .help("Show the format of Miniconda release versions and exit"),
    );
    ComponentDef::action("miniconda", "Install Miniconda", parser, provide)
}

/// Installer script name for the requested release on the current OS
fn script_name(version: &str) -> Result<String> {
    let os = match sys::os_type() {
        OsType::Linux => "Linux",
        OsType::Macos => "MacOSX",
        OsType::Other(os) => return Err(InstallerError::UnsupportedOs { os }),
    };
    Ok(format!("Miniconda3-{version}-{os}-x86_64.sh"))
}

fn provide(manager: &mut Manager, mut kwargs: Namespace) -> Result<()> {
    let path = kwargs.take_path("path");
    let batch = kwargs.take_flag("batch");
    let spec_packages = kwargs.take_words("spec");
    let extra_args = kwargs.take_words("extra_args");
    let version = kwargs
        .take_str("version")
        .unwrap_or_else(|| "latest".to_string());
    kwargs.warn_leftovers("miniconda");
    let path = match path {
        Some(path) => path,
        None => sys::mktempdir("dl-miniconda-")?,
    };
    let script = script_name(&version)?;
    let url_base =
        std::env::var("ANACONDA_URL").unwrap_or_else(|_| DEFAULT_URL_BASE.to_string());
    tracing::info!("Downloading and running miniconda installer");
    let tmpdir = tempfile::tempdir()?;
    let script_path = tmpdir.path().join(&script);
    sys::download_file(&format!("{url_base}{script}"), &script_path, &[])?;
    tracing::info!("Installing miniconda in {}", path.display());
    let mut argv = vec![
        "bash".to_string(),
        script_path.display().to_string(),
        "-p".to_string(),
        path.display().to_string(),
        "-s".to_string(),
    ];
    if batch {
        argv.push("-b".to_string());
    }
    if let Some(extra) = extra_args {
        argv.extend(extra);
    }
    manager.run(&argv)?;
    manager.push_conda(CondaInstance {
        basepath: path.clone(),
        name: None,
    });
    if let Some(packages) = spec_packages {
        let mut argv = vec![
            path.join("bin").join("conda").display().to_string(),
            "install".to_string(),
        ];
        argv.extend(packages);
        manager.run(&argv)?;
    }
    Ok(())
}
