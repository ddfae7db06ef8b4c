//! Error types and handling for datalad-installer
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for installer operations
#[derive(Error, Diagnostic, Debug)]
pub enum InstallerError {
    // Command-line usage errors; always exit with code 2
    #[error("{message}")]
    #[diagnostic(
        code(datalad_installer::usage),
        help("Run with --help for usage information")
    )]
    Usage {
        message: String,
        /// Component whose option set was being parsed, None for global options
        component: Option<String>,
    },

    // External command errors
    #[error("Command `{command}` failed: {status}")]
    #[diagnostic(code(datalad_installer::command::failed))]
    CommandFailed { command: String, status: String },

    #[error("Failed to run `{command}`: {reason}")]
    #[diagnostic(
        code(datalad_installer::command::spawn_failed),
        help("Check that the program is installed and on PATH")
    )]
    CommandSpawnFailed { command: String, reason: String },

    #[error("Refusing to run `{command}`")]
    #[diagnostic(
        code(datalad_installer::command::sudo_refused),
        help("Pass --sudo ok to run sudo commands without confirmation")
    )]
    SudoRefused { command: String },

    // Download errors
    #[error("Failed to download {url}: {reason}")]
    #[diagnostic(code(datalad_installer::download_failed))]
    DownloadFailed { url: String, reason: String },

    // Installation dispatch errors
    #[error("No viable installation method for {component}")]
    #[diagnostic(
        code(datalad_installer::install::no_viable_method),
        help("Select a method explicitly with --method or install a supported package manager")
    )]
    NoViableMethod { component: String },

    #[error("Installation method '{method}' cannot install {component}: {reason}")]
    #[diagnostic(code(datalad_installer::install::method_unsupported))]
    MethodUnsupported {
        method: String,
        component: String,
        reason: String,
    },

    #[error("Unknown installation method: {method}")]
    #[diagnostic(code(datalad_installer::install::unknown_method))]
    UnknownMethod { method: String },

    #[error("The deb-url method requires --url")]
    #[diagnostic(code(datalad_installer::install::url_required))]
    UrlRequired,

    // Conda errors
    #[error("conda not installed")]
    #[diagnostic(
        code(datalad_installer::conda::not_found),
        help("Run the miniconda component first or install Conda manually")
    )]
    CondaNotFound,

    // GitHub API errors
    #[error("GitHub OAuth token not set")]
    #[diagnostic(
        code(datalad_installer::github::token_missing),
        help("Set the GITHUB_TOKEN environment variable or the hub.oauthtoken Git config option")
    )]
    GithubTokenMissing,

    #[error("GitHub artifact lookup failed: {reason}")]
    #[diagnostic(code(datalad_installer::github::artifact_lookup))]
    ArtifactLookup { reason: String },

    // Platform errors
    #[error("Unsupported operating system: {os}")]
    #[diagnostic(code(datalad_installer::unsupported_os))]
    UnsupportedOs { os: String },

    // Archive errors
    #[error("Failed to extract {path}: {reason}")]
    #[diagnostic(code(datalad_installer::extract_failed))]
    ExtractFailed { path: String, reason: String },

    // File system errors
    #[error("Failed to write {path}: {reason}")]
    #[diagnostic(code(datalad_installer::fs::write_failed))]
    WriteFailed { path: String, reason: String },

    #[error("I/O error: {0}")]
    #[diagnostic(code(datalad_installer::fs::io))]
    Io(#[from] std::io::Error),
}

impl InstallerError {
    /// Create a usage error scoped to the global option set
    pub fn usage(message: impl Into<String>) -> Self {
        InstallerError::Usage {
            message: message.into(),
            component: None,
        }
    }

    /// Create a usage error scoped to a component's option set
    pub fn usage_for(component: impl Into<String>, message: impl Into<String>) -> Self {
        InstallerError::Usage {
            message: message.into(),
            component: Some(component.into()),
        }
    }

    /// Component name carried by a usage error, if any
    pub fn usage_component(&self) -> Option<&str> {
        match self {
            InstallerError::Usage { component, .. } => component.as_deref(),
            _ => None,
        }
    }

    /// Retag a usage error with the given component scope
    pub fn scoped_to(self, component: Option<&str>) -> Self {
        match self {
            InstallerError::Usage { message, .. } => InstallerError::Usage {
                message,
                component: component.map(String::from),
            },
            other => other,
        }
    }
}

impl From<inquire::InquireError> for InstallerError {
    fn from(err: inquire::InquireError) -> Self {
        InstallerError::CommandSpawnFailed {
            command: "sudo".to_string(),
            reason: format!("confirmation prompt failed: {err}"),
        }
    }
}

/// Result type alias using InstallerError
pub type Result<T> = std::result::Result<T, InstallerError>;
