//! Usage and help text rendering
//!
//! Option help is laid out in two columns: the invocation starts at
//! column 2, the description at column 34, wrapped to 40 characters per
//! line. Components and options are listed alphabetically with
//! `-h, --help` always last.

use crate::options::Opt;
use crate::registry::Registry;

const OPTION_COLUMN: usize = 34;
const HELP_WIDTH: usize = 40;

const GLOBAL_DESCRIPTION: &str = "\
  Installation script for Datalad and related components

  `datalad-installer` installs Datalad, git-annex, and related components
  all in a single invocation.  It requires no third-party package
  indexes of its own, though it makes heavy use of external packaging
  commands.

  See the README at <https://github.com/datalad/datalad-installer> for a
  complete description of all options.";

/// One-line usage summary for the global invocation or one component
pub fn short_help(prog: &str, registry: &Registry, component: Option<&str>) -> String {
    match component.and_then(|name| registry.get(name)) {
        None => format!("Usage: {prog} [<options>] [COMPONENT[=VERSION] [<options>]] ..."),
        Some(def) => {
            let version = if def.parser().versioned() {
                "[=VERSION]"
            } else {
                ""
            };
            format!(
                "Usage: {prog} [<options>] {}{version} [<options>]",
                def.name()
            )
        }
    }
}

/// Full help text for the global invocation, one component, or a
/// component sub-topic
pub fn long_help(
    prog: &str,
    registry: &Registry,
    component: Option<&str>,
    topic: Option<&str>,
) -> String {
    if let (Some(name), Some(topic)) = (component, topic) {
        if let Some(text) = topic_help(name, topic) {
            return text;
        }
    }
    let mut out = short_help(prog, registry, component);
    out.push_str("\n\n");
    match component.and_then(|name| registry.get(name)) {
        None => {
            out.push_str(GLOBAL_DESCRIPTION);
            out.push_str("\n\nOptions:\n");
            out.push_str(&options_block(registry.global_parser().opts()));
            out.push_str("\n\nComponents:\n");
            out.push_str(&components_block(registry));
        }
        Some(def) => {
            out.push_str(&format!("  {}", def.summary()));
            out.push_str("\n\nOptions:\n");
            out.push_str(&options_block(def.parser().opts()));
        }
    }
    out
}

/// Help for a component sub-topic (e.g. `miniconda --help-versions`)
fn topic_help(component: &str, topic: &str) -> Option<String> {
    match (component, topic) {
        ("miniconda", "versions") => Some(
            "Miniconda installer scripts are named\n\
             Miniconda3-<VERSION>-<OS>-<ARCH>.sh, where <VERSION> is either\n\
             `latest` or a dated release such as `py311_23.5.2-0`.\n\
             The full listing of available scripts is published at\n\
             <https://repo.anaconda.com/miniconda/>; pass a release via\n\
             `miniconda=<VERSION>` or point ANACONDA_URL at a mirror."
                .to_string(),
        ),
        _ => None,
    }
}

fn components_block(registry: &Registry) -> String {
    let width = registry
        .all()
        .map(|def| def.name().len())
        .max()
        .unwrap_or(0)
        + 2;
    registry
        .all()
        .map(|def| format!("  {:<width$}{}", def.name(), def.summary()))
        .collect::<Vec<_>>()
        .join("\n")
}

fn options_block(opts: &[Opt]) -> String {
    let mut sorted: Vec<&Opt> = opts.iter().filter(|o| o.dest() != "help").collect();
    sorted.sort_by_key(|o| sort_key(o));
    let mut lines: Vec<String> = sorted.iter().map(|o| option_help(o)).collect();
    if let Some(help_opt) = opts.iter().find(|o| o.dest() == "help") {
        lines.push(option_help(help_opt));
    }
    lines.join("\n")
}

fn sort_key(opt: &Opt) -> String {
    opt.longs()
        .first()
        .cloned()
        .unwrap_or_else(|| opt.shorts().first().map(char::to_string).unwrap_or_default())
}

/// Two-column help line(s) for one option
pub fn option_help(opt: &Opt) -> String {
    let mut invocation = String::from("  ");
    let mut spellings: Vec<String> = opt.shorts().iter().map(|c| format!("-{c}")).collect();
    spellings.extend(opt.longs().iter().map(|l| format!("--{l}")));
    invocation.push_str(&spellings.join(", "));
    if opt.takes_value() {
        invocation.push(' ');
        if let Some(choices) = opt.choice_list() {
            invocation.push('[');
            invocation.push_str(&choices.join("|"));
            invocation.push(']');
        } else if let Some(metavar) = opt.metavar_text() {
            invocation.push_str(metavar);
        } else {
            invocation.push_str(&opt.dest().to_uppercase());
        }
    }
    let Some(help) = opt.help_text() else {
        return invocation;
    };
    let wrapped = wrap(help, HELP_WIDTH);
    let indent = " ".repeat(OPTION_COLUMN);
    let mut lines = Vec::new();
    let mut rest = wrapped.as_slice();
    let column = OPTION_COLUMN;
    if invocation.len() < OPTION_COLUMN {
        let mut first = format!("{invocation:<column$}");
        if let Some(text) = wrapped.first() {
            first.push_str(text);
            rest = &wrapped[1..];
        }
        lines.push(first.trim_end().to_string());
    } else {
        lines.push(invocation);
    }
    for text in rest {
        lines.push(format!("{indent}{text}"));
    }
    lines.join("\n")
}

/// Greedy word wrap
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
        } else if current.len() + 1 + word.len() <= width {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::Opt;

    #[test]
    fn test_option_help_value_no_text() {
        let opt = Opt::value(&["-f", "--foo"]);
        assert_eq!(option_help(&opt), "  -f, --foo FOO");
    }

    #[test]
    fn test_option_help_flag_no_text() {
        let opt = Opt::flag(&["-f", "--foo"]);
        assert_eq!(option_help(&opt), "  -f, --foo");
    }

    #[test]
    fn test_option_help_with_text() {
        let opt = Opt::value(&["-f", "--foo"]).help("Foo all the things");
        assert_eq!(
            option_help(&opt),
            "  -f, --foo FOO                   Foo all the things"
        );
    }

    #[test]
    fn test_option_help_flag_with_text() {
        let opt = Opt::flag(&["-f", "--foo"]).help("Foo all the things");
        assert_eq!(
            option_help(&opt),
            "  -f, --foo                       Foo all the things"
        );
    }

    #[test]
    fn test_option_help_metavar() {
        let opt = Opt::value(&["-f", "--foo"])
            .metavar("PARAM")
            .help("Foo all the things");
        assert_eq!(
            option_help(&opt),
            "  -f, --foo PARAM                 Foo all the things"
        );
    }

    #[test]
    fn test_option_help_choices_overflow_column() {
        let opt = Opt::value(&["-f", "--foo"])
            .choices(&["apple", "banana", "coconut"])
            .help("Foo all the things");
        let indent = " ".repeat(34);
        assert_eq!(
            option_help(&opt),
            format!("  -f, --foo [apple|banana|coconut]\n{indent}Foo all the things")
        );
    }

    #[test]
    fn test_option_help_wrapping() {
        let opt = Opt::value(&["-f", "--foo"]).help(
            "Lorem ipsum dolor sit amet, consectetur adipisicing elit, \
             sed do eiusmod tempor incididunt ut labore et dolore magna \
             aliqua.",
        );
        let indent = " ".repeat(34);
        assert_eq!(
            option_help(&opt),
            format!(
                "  -f, --foo FOO                   Lorem ipsum dolor sit amet, consectetur\n\
                 {indent}adipisicing elit, sed do eiusmod tempor\n\
                 {indent}incididunt ut labore et dolore magna\n\
                 {indent}aliqua."
            )
        );
    }

    #[test]
    fn test_wrap_keeps_short_text_on_one_line() {
        assert_eq!(wrap("Set logging level", 40), vec!["Set logging level"]);
    }

    #[test]
    fn test_global_short_help() {
        let registry = Registry::new();
        assert_eq!(
            short_help("datalad-installer", &registry, None),
            "Usage: datalad-installer [<options>] [COMPONENT[=VERSION] [<options>]] ..."
        );
    }

    #[test]
    fn test_component_short_help() {
        let registry = Registry::new();
        assert_eq!(
            short_help("datalad-installer", &registry, Some("venv")),
            "Usage: datalad-installer [<options>] venv [<options>]"
        );
    }

    #[test]
    fn test_versioned_component_short_help() {
        let registry = Registry::new();
        assert_eq!(
            short_help("datalad-installer", &registry, Some("git-annex")),
            "Usage: datalad-installer [<options>] git-annex[=VERSION] [<options>]"
        );
    }

    #[test]
    fn test_global_long_help_sections() {
        let registry = Registry::new();
        let text = long_help("datalad-installer", &registry, None, None);
        assert!(text.starts_with("Usage: datalad-installer [<options>]"));
        assert!(text.contains("\nOptions:\n"));
        assert!(text.contains("\nComponents:\n"));
        assert!(text.contains("  -V, --version"));
        assert!(text.contains("  -h, --help"));
        assert!(text.contains("venv"));
        assert!(text.contains("miniconda"));
        // -h/--help is rendered after every other option
        let help_at = text.find("  -h, --help").unwrap();
        let version_at = text.find("  -V, --version").unwrap();
        assert!(version_at < help_at);
    }

    #[test]
    fn test_component_long_help_lists_merged_options() {
        let registry = Registry::new();
        let text = long_help("datalad-installer", &registry, Some("git-annex"), None);
        assert!(text.starts_with(
            "Usage: datalad-installer [<options>] git-annex[=VERSION] [<options>]"
        ));
        // --build-dep comes from the apt installer, --url from deb-url
        assert!(text.contains("--build-dep"));
        assert!(text.contains("--url"));
        assert!(text.contains("-m, --method"));
    }

    #[test]
    fn test_topic_help_versions() {
        let registry = Registry::new();
        let text = long_help("datalad-installer", &registry, Some("miniconda"), Some("versions"));
        assert!(text.contains("repo.anaconda.com/miniconda"));
    }
}
