//! The neurodebian component: install the neurodebian package and
//! configure the repository with nd-configurerepo

use crate::error::Result;
use crate::manager::Manager;
use crate::options::{Namespace, Opt, OptionParser, shell_words_value};

use super::ComponentDef;

pub fn def() -> ComponentDef {
    let mut parser = OptionParser::new(Some("neurodebian"), false);
    parser.add(
        Opt::value(&["-e", "--extra-args"])
            .converter(shell_words_value)
            .metavar("ARGS")
            .help("Extra arguments to pass to nd-configurerepo"),
    );
    ComponentDef::action(
        "neurodebian",
        "Install & configure NeuroDebian",
        parser,
        provide,
    )
}

fn provide(manager: &mut Manager, mut kwargs: Namespace) -> Result<()> {
    let extra_args = kwargs.take_words("extra_args");
    kwargs.warn_leftovers("neurodebian");
    let install: Vec<String> = ["apt-get", "install", "-qy", "neurodebian"]
        .iter()
        .map(|s| (*s).to_string())
        .collect();
    manager.run_with_env(&install, &[("DEBIAN_FRONTEND", "noninteractive")])?;
    let mut argv = vec!["nd-configurerepo".to_string()];
    if let Some(extra) = extra_args {
        argv.extend(extra);
    }
    manager.run(&argv)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::ParseOutcome;

    #[test]
    fn test_parser_takes_no_version() {
        assert!(!def().parser().versioned());
    }

    #[test]
    fn test_extra_args_split_with_shell_rules() {
        let component = def();
        let outcome = component
            .parser()
            .parse_args(&["-e".to_string(), "--overwrite 'two words'".to_string()])
            .unwrap();
        let ParseOutcome::Matched { mut namespace, .. } = outcome else {
            panic!("expected Matched");
        };
        assert_eq!(
            namespace.take_words("extra_args"),
            Some(vec!["--overwrite".to_string(), "two words".to_string()])
        );
    }
}
