//! Declarative option definitions over a POSIX getopt-style scanner
//!
//! Each [`Opt`] describes one flag: its short/long spellings, destination
//! key, whether it takes a value, an optional converter and choice list,
//! whether repeated occurrences accumulate, and an optional "immediate"
//! payload that short-circuits parsing (--help, --version).
//!
//! [`OptionParser`] owns an ordered set of options scoped either to the
//! global invocation or to one named component. Parsing has exactly two
//! outcomes: an [`Immediate`], or a namespace of parsed values plus the
//! unconsumed trailing tokens.

use std::collections::HashMap;
use std::path::PathBuf;

use tracing::level_filters::LevelFilter;

use crate::error::{InstallerError, Result};

/// A parse outcome that halts normal argument processing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Immediate {
    /// Show program version and exit
    Version,
    /// Show help for the given component (None = global), optionally for
    /// a sub-topic such as `versions`
    Help {
        component: Option<String>,
        topic: Option<String>,
    },
}

/// A typed value produced by option conversion
#[derive(Debug, Clone, PartialEq)]
pub enum OptValue {
    Flag(bool),
    Str(String),
    Path(PathBuf),
    Level(LevelFilter),
    /// Word lists from shell-style or whitespace splitting
    Words(Vec<String>),
    /// Accumulated values of a repeatable path option
    Paths(Vec<PathBuf>),
}

impl OptValue {
    /// Render the value the way choice-validation errors quote it
    fn describe(&self) -> String {
        match self {
            OptValue::Str(s) => s.clone(),
            OptValue::Path(p) => p.display().to_string(),
            OptValue::Flag(b) => b.to_string(),
            OptValue::Level(l) => l.to_string(),
            OptValue::Words(w) => w.join(" "),
            OptValue::Paths(p) => p
                .iter()
                .map(|x| x.display().to_string())
                .collect::<Vec<_>>()
                .join(" "),
        }
    }
}

/// The key/value mapping produced by parsing one option set
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Namespace(HashMap<String, OptValue>);

impl Namespace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: OptValue) {
        self.0.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&OptValue> {
        self.0.get(key)
    }

    /// Append a value under a repeatable option's destination key
    fn push(&mut self, key: &str, value: OptValue) {
        match (self.0.get_mut(key), value) {
            (Some(OptValue::Paths(list)), OptValue::Path(p)) => list.push(p),
            (Some(OptValue::Words(list)), OptValue::Str(s)) => list.push(s),
            (_, OptValue::Path(p)) => {
                self.0.insert(key.to_string(), OptValue::Paths(vec![p]));
            }
            (_, OptValue::Str(s)) => {
                self.0.insert(key.to_string(), OptValue::Words(vec![s]));
            }
            (_, other) => {
                self.0.insert(key.to_string(), other);
            }
        }
    }

    pub fn take_str(&mut self, key: &str) -> Option<String> {
        match self.0.remove(key) {
            Some(OptValue::Str(s)) => Some(s),
            Some(other) => Some(other.describe()),
            None => None,
        }
    }

    pub fn take_path(&mut self, key: &str) -> Option<PathBuf> {
        match self.0.remove(key) {
            Some(OptValue::Path(p)) => Some(p),
            Some(OptValue::Str(s)) => Some(PathBuf::from(s)),
            Some(other) => Some(PathBuf::from(other.describe())),
            None => None,
        }
    }

    pub fn take_flag(&mut self, key: &str) -> bool {
        matches!(self.0.remove(key), Some(OptValue::Flag(true)))
    }

    pub fn take_words(&mut self, key: &str) -> Option<Vec<String>> {
        match self.0.remove(key) {
            Some(OptValue::Words(w)) => Some(w),
            Some(OptValue::Str(s)) => Some(vec![s]),
            Some(_) | None => None,
        }
    }

    pub fn take_paths(&mut self, key: &str) -> Option<Vec<PathBuf>> {
        match self.0.remove(key) {
            Some(OptValue::Paths(p)) => Some(p),
            Some(OptValue::Path(p)) => Some(vec![p]),
            Some(_) | None => None,
        }
    }

    pub fn take_level(&mut self, key: &str) -> Option<LevelFilter> {
        match self.0.remove(key) {
            Some(OptValue::Level(l)) => Some(l),
            Some(_) | None => None,
        }
    }

    /// Log any keys left after config decoding; leftover keys are ignored,
    /// never silently dropped
    pub fn warn_leftovers(&self, context: &str) {
        for key in self.0.keys() {
            tracing::warn!("{context}: ignoring unused option value '{key}'");
        }
    }
}

/// String-to-value conversion applied to an option's raw argument.
/// An Err carries the complete usage-error message.
pub type Converter = fn(&str) -> std::result::Result<OptValue, String>;

/// Converter producing a path value; never fails
pub fn path_value(raw: &str) -> std::result::Result<OptValue, String> {
    Ok(OptValue::Path(PathBuf::from(raw)))
}

/// Converter for -l/--log-level: a numeric threshold or a
/// case-insensitive level name
pub fn log_level_value(raw: &str) -> std::result::Result<OptValue, String> {
    if let Ok(n) = raw.parse::<u32>() {
        let level = match n {
            40.. => LevelFilter::ERROR,
            30.. => LevelFilter::WARN,
            20.. => LevelFilter::INFO,
            10.. => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        };
        return Ok(OptValue::Level(level));
    }
    let level = match raw.to_ascii_uppercase().as_str() {
        "CRITICAL" | "ERROR" => LevelFilter::ERROR,
        "WARNING" | "WARN" => LevelFilter::WARN,
        "INFO" => LevelFilter::INFO,
        "DEBUG" => LevelFilter::DEBUG,
        "TRACE" => LevelFilter::TRACE,
        _ => return Err(format!("Invalid log level: '{raw}'")),
    };
    Ok(OptValue::Level(level))
}

/// Converter splitting the argument with shell quoting rules
pub fn shell_words_value(raw: &str) -> std::result::Result<OptValue, String> {
    match shlex::split(raw) {
        Some(words) => Ok(OptValue::Words(words)),
        None => Err(format!("\"{raw}\": No closing quotation")),
    }
}

/// Converter splitting the argument on whitespace
pub fn whitespace_words_value(raw: &str) -> std::result::Result<OptValue, String> {
    Ok(OptValue::Words(
        raw.split_whitespace().map(String::from).collect(),
    ))
}

/// Description of one command-line flag
#[derive(Debug, Clone)]
pub struct Opt {
    shorts: Vec<char>,
    longs: Vec<String>,
    dest: String,
    takes_value: bool,
    converter: Option<Converter>,
    multiple: bool,
    immediate: Option<Immediate>,
    metavar: Option<String>,
    choices: Option<Vec<String>>,
    help: Option<String>,
}

impl Opt {
    /// Define a boolean flag option
    pub fn flag(names: &[&str]) -> Self {
        Self::build(names, false)
    }

    /// Define an option that takes a value
    pub fn value(names: &[&str]) -> Self {
        Self::build(names, true)
    }

    #[allow(clippy::panic)]
    fn build(names: &[&str], takes_value: bool) -> Self {
        let mut shorts = Vec::new();
        let mut longs = Vec::new();
        let mut dest: Option<String> = None;
        for name in names {
            if let Some(rest) = name.strip_prefix("--") {
                if rest.is_empty() || rest.starts_with('-') {
                    panic!("invalid option name: '{name}'");
                }
                longs.push(rest.to_string());
            } else if let Some(rest) = name.strip_prefix('-') {
                let mut chars = rest.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) if c != '-' => shorts.push(c),
                    _ => panic!("invalid option name: '{name}'"),
                }
            } else if dest.is_some() {
                panic!("more than one option destination specified");
            } else {
                dest = Some((*name).to_string());
            }
        }
        if shorts.is_empty() && longs.is_empty() {
            panic!("no option names supplied");
        }
        let dest = dest.unwrap_or_else(|| {
            longs
                .first()
                .cloned()
                .unwrap_or_else(|| shorts[0].to_string())
                .replace('-', "_")
        });
        Opt {
            shorts,
            longs,
            dest,
            takes_value,
            converter: None,
            multiple: false,
            immediate: None,
            metavar: None,
            choices: None,
            help: None,
        }
    }

    pub fn converter(mut self, f: Converter) -> Self {
        self.converter = Some(f);
        self
    }

    pub fn multiple(mut self) -> Self {
        self.multiple = true;
        self
    }

    pub fn immediate(mut self, immediate: Immediate) -> Self {
        self.immediate = Some(immediate);
        self
    }

    pub fn metavar(mut self, metavar: &str) -> Self {
        self.metavar = Some(metavar.to_string());
        self
    }

    pub fn choices(mut self, choices: &[&str]) -> Self {
        self.choices = Some(choices.iter().map(|c| (*c).to_string()).collect());
        self
    }

    pub fn help(mut self, text: &str) -> Self {
        self.help = Some(text.to_string());
        self
    }

    pub fn dest(&self) -> &str {
        &self.dest
    }

    pub fn shorts(&self) -> &[char] {
        &self.shorts
    }

    pub fn longs(&self) -> &[String] {
        &self.longs
    }

    pub fn takes_value(&self) -> bool {
        self.takes_value
    }

    pub fn metavar_text(&self) -> Option<&str> {
        self.metavar.as_deref()
    }

    pub fn choice_list(&self) -> Option<&[String]> {
        self.choices.as_deref()
    }

    pub fn help_text(&self) -> Option<&str> {
        self.help.as_deref()
    }

    /// Append a choice to this option's allow-list
    fn push_choice(&mut self, choice: &str) {
        self.choices
            .get_or_insert_with(Vec::new)
            .push(choice.to_string());
    }

    /// The canonical spelling used in error and help messages
    pub fn option_name(&self) -> String {
        if let Some(long) = self.longs.first() {
            format!("--{long}")
        } else {
            format!("-{}", self.shorts[0])
        }
    }

    /// Process one occurrence of this option. Returns the immediate
    /// payload if there is one; otherwise converts, validates, and
    /// stores the value into the namespace.
    fn process(&self, namespace: &mut Namespace, raw: &str) -> Result<Option<Immediate>> {
        if let Some(immediate) = &self.immediate {
            return Ok(Some(immediate.clone()));
        }
        if !self.takes_value {
            namespace.insert(self.dest.clone(), OptValue::Flag(true));
            return Ok(None);
        }
        let value = match self.converter {
            Some(convert) => convert(raw).map_err(InstallerError::usage)?,
            None => OptValue::Str(raw.to_string()),
        };
        if let Some(choices) = &self.choices {
            let accepted = matches!(&value, OptValue::Str(s) if choices.contains(s));
            if !accepted {
                return Err(InstallerError::usage(format!(
                    "Invalid choice for {} option: '{}'",
                    self.option_name(),
                    value.describe()
                )));
            }
        }
        if self.multiple {
            namespace.push(&self.dest, value);
        } else {
            namespace.insert(self.dest.clone(), value);
        }
        Ok(None)
    }
}

/// Result of parsing one option set
#[derive(Debug, Clone, PartialEq)]
pub enum ParseOutcome {
    /// Parsing was short-circuited; remaining tokens were discarded
    Immediate(Immediate),
    /// Parsing completed; leftovers are the unconsumed trailing tokens
    Matched {
        namespace: Namespace,
        leftovers: Vec<String>,
    },
}

/// An ordered set of options scoped to the global invocation or to one
/// named component
#[derive(Debug, Clone)]
pub struct OptionParser {
    component: Option<String>,
    versioned: bool,
    opts: Vec<Opt>,
    by_spelling: HashMap<String, usize>,
}

impl OptionParser {
    /// Create a parser; every parser implicitly carries -h/--help whose
    /// immediate payload identifies the owning component
    pub fn new(component: Option<&str>, versioned: bool) -> Self {
        let mut parser = OptionParser {
            component: component.map(String::from),
            versioned,
            opts: Vec::new(),
            by_spelling: HashMap::new(),
        };
        parser.add(
            Opt::flag(&["-h", "--help"])
                .immediate(Immediate::Help {
                    component: component.map(String::from),
                    topic: None,
                })
                .help("Show this help information and exit"),
        );
        parser
    }

    pub fn component(&self) -> Option<&str> {
        self.component.as_deref()
    }

    pub fn versioned(&self) -> bool {
        self.versioned
    }

    pub fn opts(&self) -> &[Opt] {
        &self.opts
    }

    /// Register an option; registering the same spelling twice is a
    /// programming error
    #[allow(clippy::panic)]
    pub fn add(&mut self, opt: Opt) {
        let index = self.opts.len();
        for c in opt.shorts() {
            let spelling = format!("-{c}");
            if self.by_spelling.insert(spelling.clone(), index).is_some() {
                panic!("option {spelling} registered more than once");
            }
        }
        for long in opt.longs() {
            let spelling = format!("--{long}");
            if self.by_spelling.insert(spelling.clone(), index).is_some() {
                panic!("option {spelling} registered more than once");
            }
        }
        self.opts.push(opt);
    }

    /// Merge an installer-contributed option, skipping it if an option
    /// with the same destination is already registered (two installers
    /// may contribute the same flag)
    pub fn merge(&mut self, opt: Opt) {
        if self.opts.iter().any(|o| o.dest() == opt.dest()) {
            return;
        }
        self.add(opt);
    }

    /// Append a method name to the --method option's choice list
    #[allow(clippy::panic)]
    pub fn push_method_choice(&mut self, name: &str) {
        let opt = self
            .opts
            .iter_mut()
            .find(|o| o.dest() == "method")
            .unwrap_or_else(|| panic!("no --method option registered"));
        opt.push_choice(name);
    }

    fn usage(&self, message: String) -> InstallerError {
        InstallerError::Usage {
            message,
            component: self.component.clone(),
        }
    }

    /// Parse an argument list in POSIX getopt style: combined short
    /// flags, `--long=value`, stop at `--` or the first non-option
    /// token. Any immediate option halts parsing and discards the rest.
    pub fn parse_args(&self, args: &[String]) -> Result<ParseOutcome> {
        let mut namespace = Namespace::new();
        let mut i = 0;
        while i < args.len() {
            let token = &args[i];
            if token == "--" {
                i += 1;
                break;
            }
            if let Some(body) = token.strip_prefix("--") {
                let (name, attached) = match body.split_once('=') {
                    Some((n, v)) => (n, Some(v)),
                    None => (body, None),
                };
                let opt = self
                    .lookup(&format!("--{name}"))
                    .ok_or_else(|| self.usage(format!("option --{name} not recognized")))?;
                let raw = if opt.takes_value() {
                    match attached {
                        Some(v) => v.to_string(),
                        None => {
                            i += 1;
                            args.get(i)
                                .cloned()
                                .ok_or_else(|| {
                                    self.usage(format!("option --{name} requires argument"))
                                })?
                        }
                    }
                } else {
                    if attached.is_some() {
                        return Err(
                            self.usage(format!("option --{name} must not have an argument"))
                        );
                    }
                    String::new()
                };
                if let Some(immediate) = self.process(opt, &mut namespace, &raw)? {
                    return Ok(ParseOutcome::Immediate(immediate));
                }
                i += 1;
            } else if token.len() > 1 && token.starts_with('-') {
                let body = &token[1..];
                let chars: Vec<char> = body.chars().collect();
                let mut j = 0;
                let mut halted = None;
                while j < chars.len() {
                    let c = chars[j];
                    let opt = self
                        .lookup(&format!("-{c}"))
                        .ok_or_else(|| self.usage(format!("option -{c} not recognized")))?;
                    let raw = if opt.takes_value() {
                        let rest: String = chars[j + 1..].iter().collect();
                        j = chars.len();
                        if rest.is_empty() {
                            i += 1;
                            args.get(i).cloned().ok_or_else(|| {
                                self.usage(format!("option -{c} requires argument"))
                            })?
                        } else {
                            rest
                        }
                    } else {
                        j += 1;
                        String::new()
                    };
                    if let Some(immediate) = self.process(opt, &mut namespace, &raw)? {
                        halted = Some(immediate);
                        break;
                    }
                }
                if let Some(immediate) = halted {
                    return Ok(ParseOutcome::Immediate(immediate));
                }
                i += 1;
            } else {
                break;
            }
        }
        Ok(ParseOutcome::Matched {
            namespace,
            leftovers: args[i..].to_vec(),
        })
    }

    fn lookup(&self, spelling: &str) -> Option<&Opt> {
        self.by_spelling
            .get(spelling)
            .map(|&index| &self.opts[index])
    }

    fn process(&self, opt: &Opt, namespace: &mut Namespace, raw: &str) -> Result<Option<Immediate>> {
        opt.process(namespace, raw)
            .map_err(|e| e.scoped_to(self.component.as_deref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| (*s).to_string()).collect()
    }

    fn sample_parser() -> OptionParser {
        let mut parser = OptionParser::new(None, false);
        parser.add(Opt::flag(&["-V", "--version"]).immediate(Immediate::Version));
        parser.add(Opt::value(&["-l", "--log-level"]).converter(log_level_value));
        parser.add(
            Opt::value(&["-E", "--env-write-file"])
                .converter(path_value)
                .multiple(),
        );
        parser.add(Opt::flag(&["-b", "--batch"]));
        parser
    }

    #[test]
    fn test_dest_derived_from_first_long_name() {
        let opt = Opt::value(&["-E", "--env-write-file"]);
        assert_eq!(opt.dest(), "env_write_file");
    }

    #[test]
    fn test_dest_derived_from_short_name() {
        let opt = Opt::flag(&["-x"]);
        assert_eq!(opt.dest(), "x");
    }

    #[test]
    fn test_explicit_dest() {
        let opt = Opt::value(&["envname", "-n", "--name"]);
        assert_eq!(opt.dest(), "envname");
    }

    #[test]
    #[should_panic(expected = "invalid option name")]
    fn test_invalid_option_name() {
        let _ = Opt::flag(&["---bad"]);
    }

    #[test]
    #[should_panic(expected = "no option names supplied")]
    fn test_no_names() {
        let _ = Opt::flag(&["dest_only"]);
    }

    #[test]
    #[should_panic(expected = "registered more than once")]
    fn test_duplicate_registration() {
        let mut parser = OptionParser::new(None, false);
        parser.add(Opt::flag(&["-b", "--batch"]));
        parser.add(Opt::flag(&["-b", "--brief"]));
    }

    #[test]
    fn test_parse_empty() {
        let outcome = sample_parser().parse_args(&[]).unwrap();
        assert_eq!(
            outcome,
            ParseOutcome::Matched {
                namespace: Namespace::new(),
                leftovers: vec![],
            }
        );
    }

    #[test]
    fn test_parse_stops_at_first_positional() {
        let outcome = sample_parser()
            .parse_args(&argv(&["-b", "datalad", "--batch"]))
            .unwrap();
        let ParseOutcome::Matched {
            mut namespace,
            leftovers,
        } = outcome
        else {
            panic!("expected Matched");
        };
        assert!(namespace.take_flag("batch"));
        assert_eq!(leftovers, argv(&["datalad", "--batch"]));
    }

    #[test]
    fn test_parse_double_dash_terminator() {
        let outcome = sample_parser()
            .parse_args(&argv(&["-b", "--", "--version"]))
            .unwrap();
        let ParseOutcome::Matched { leftovers, .. } = outcome else {
            panic!("expected Matched");
        };
        assert_eq!(leftovers, argv(&["--version"]));
    }

    #[test]
    fn test_long_option_with_attached_value() {
        let outcome = sample_parser()
            .parse_args(&argv(&["--log-level=debug"]))
            .unwrap();
        let ParseOutcome::Matched { mut namespace, .. } = outcome else {
            panic!("expected Matched");
        };
        assert_eq!(namespace.take_level("log_level"), Some(LevelFilter::DEBUG));
    }

    #[test]
    fn test_short_option_with_attached_value() {
        let outcome = sample_parser().parse_args(&argv(&["-linfo"])).unwrap();
        let ParseOutcome::Matched { mut namespace, .. } = outcome else {
            panic!("expected Matched");
        };
        assert_eq!(namespace.take_level("log_level"), Some(LevelFilter::INFO));
    }

    #[test]
    fn test_combined_short_flags() {
        let mut parser = OptionParser::new(None, false);
        parser.add(Opt::flag(&["-a", "--apple"]));
        parser.add(Opt::flag(&["-b", "--banana"]));
        let outcome = parser.parse_args(&argv(&["-ab"])).unwrap();
        let ParseOutcome::Matched { mut namespace, .. } = outcome else {
            panic!("expected Matched");
        };
        assert!(namespace.take_flag("apple"));
        assert!(namespace.take_flag("banana"));
    }

    #[test]
    fn test_combined_short_flag_then_valued() {
        let outcome = sample_parser().parse_args(&argv(&["-bl", "15"])).unwrap();
        let ParseOutcome::Matched { mut namespace, .. } = outcome else {
            panic!("expected Matched");
        };
        assert!(namespace.take_flag("batch"));
        assert_eq!(namespace.take_level("log_level"), Some(LevelFilter::DEBUG));
    }

    #[test]
    fn test_multiple_option_accumulates() {
        let outcome = sample_parser()
            .parse_args(&argv(&["-E", "/path/to/file", "--env-write-file=writefile"]))
            .unwrap();
        let ParseOutcome::Matched { mut namespace, .. } = outcome else {
            panic!("expected Matched");
        };
        assert_eq!(
            namespace.take_paths("env_write_file"),
            Some(vec![
                PathBuf::from("/path/to/file"),
                PathBuf::from("writefile")
            ])
        );
    }

    #[test]
    fn test_immediate_discards_remaining_tokens() {
        let outcome = sample_parser()
            .parse_args(&argv(&["--version", "X", "--invalid"]))
            .unwrap();
        assert_eq!(outcome, ParseOutcome::Immediate(Immediate::Version));
    }

    #[test]
    fn test_implicit_help_carries_component() {
        let parser = OptionParser::new(Some("venv"), false);
        let outcome = parser.parse_args(&argv(&["--help", "ignored"])).unwrap();
        assert_eq!(
            outcome,
            ParseOutcome::Immediate(Immediate::Help {
                component: Some("venv".to_string()),
                topic: None,
            })
        );
    }

    #[test]
    fn test_unrecognized_long_option() {
        let err = sample_parser()
            .parse_args(&argv(&["--invalid"]))
            .unwrap_err();
        assert_eq!(err.to_string(), "option --invalid not recognized");
        assert_eq!(err.usage_component(), None);
    }

    #[test]
    fn test_unrecognized_short_option() {
        let err = sample_parser().parse_args(&argv(&["-Z"])).unwrap_err();
        assert_eq!(err.to_string(), "option -Z not recognized");
    }

    #[test]
    fn test_missing_argument() {
        let err = sample_parser()
            .parse_args(&argv(&["--log-level"]))
            .unwrap_err();
        assert_eq!(err.to_string(), "option --log-level requires argument");
    }

    #[test]
    fn test_flag_with_attached_value_rejected() {
        let err = sample_parser()
            .parse_args(&argv(&["--batch=yes"]))
            .unwrap_err();
        assert_eq!(err.to_string(), "option --batch must not have an argument");
    }

    #[test]
    fn test_component_parser_tags_errors() {
        let mut parser = OptionParser::new(Some("venv"), false);
        parser.add(Opt::value(&["-e", "--extra-args"]).converter(shell_words_value));
        let err = parser
            .parse_args(&argv(&["--extra-args", "--foo 'bar"]))
            .unwrap_err();
        assert_eq!(err.to_string(), "\"--foo 'bar\": No closing quotation");
        assert_eq!(err.usage_component(), Some("venv"));
    }

    #[test]
    fn test_choice_validation() {
        let mut parser = OptionParser::new(Some("git-annex"), true);
        parser.add(Opt::value(&["-m", "--method"]).choices(&["auto", "apt"]));
        let err = parser
            .parse_args(&argv(&["--method", "pip"]))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid choice for --method option: 'pip'"
        );
        assert_eq!(err.usage_component(), Some("git-annex"));
    }

    #[test]
    fn test_shell_words_splitting() {
        let mut parser = OptionParser::new(Some("venv"), false);
        parser.add(Opt::value(&["-e", "--extra-args"]).converter(shell_words_value));
        let outcome = parser
            .parse_args(&argv(&["-e", "--extra --opt"]))
            .unwrap();
        let ParseOutcome::Matched { mut namespace, .. } = outcome else {
            panic!("expected Matched");
        };
        assert_eq!(
            namespace.take_words("extra_args"),
            Some(vec!["--extra".to_string(), "--opt".to_string()])
        );
    }

    #[test]
    fn test_log_level_names() {
        for (name, expected) in [
            ("CRITICAL", LevelFilter::ERROR),
            ("error", LevelFilter::ERROR),
            ("Warning", LevelFilter::WARN),
            ("warn", LevelFilter::WARN),
            ("info", LevelFilter::INFO),
            ("INFO", LevelFilter::INFO),
            ("debug", LevelFilter::DEBUG),
            ("trace", LevelFilter::TRACE),
        ] {
            assert_eq!(
                log_level_value(name).unwrap(),
                OptValue::Level(expected),
                "level name {name}"
            );
        }
    }

    #[test]
    fn test_log_level_numeric_thresholds() {
        for (number, expected) in [
            ("50", LevelFilter::ERROR),
            ("40", LevelFilter::ERROR),
            ("30", LevelFilter::WARN),
            ("20", LevelFilter::INFO),
            ("15", LevelFilter::DEBUG),
            ("10", LevelFilter::DEBUG),
            ("5", LevelFilter::TRACE),
        ] {
            assert_eq!(
                log_level_value(number).unwrap(),
                OptValue::Level(expected),
                "level number {number}"
            );
        }
    }

    #[test]
    fn test_log_level_round_trip_through_name() {
        // A stored level formatted back to its name must parse to the
        // same stored value
        for level in [
            LevelFilter::ERROR,
            LevelFilter::WARN,
            LevelFilter::INFO,
            LevelFilter::DEBUG,
            LevelFilter::TRACE,
        ] {
            let formatted = level.to_string();
            assert_eq!(
                log_level_value(&formatted).unwrap(),
                OptValue::Level(level),
                "round-trip of {formatted}"
            );
        }
    }

    #[test]
    fn test_invalid_log_level_message() {
        assert_eq!(
            log_level_value("invalid").unwrap_err(),
            "Invalid log level: 'invalid'"
        );
    }

    #[test]
    fn test_lone_dash_is_positional() {
        let outcome = sample_parser().parse_args(&argv(&["-", "-b"])).unwrap();
        let ParseOutcome::Matched { leftovers, .. } = outcome else {
            panic!("expected Matched");
        };
        assert_eq!(leftovers, argv(&["-", "-b"]));
    }
}
