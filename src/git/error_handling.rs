use std::fmt;
use thiserror::Error;
use tracing::{debug, error, warn};

/// Error types raised while reading history from a backend
#[derive(Error, Debug)]
pub enum GitError {
    #[error("No repository attached")]
    RepositoryUnavailable,

    #[error("Branch cannot be resolved: {branch}")]
    BranchUnresolvable { branch: String },

    #[error("Lookup failed: {target} - {reason}")]
    LookupFailure { target: String, reason: String },

    #[error("Configuration error: {setting} - {reason}")]
    Configuration { setting: String, reason: String },

    #[error("Git internal error: {0}")]
    Git2(#[from] git2::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl GitError {
    pub fn branch_unresolvable(branch: impl Into<String>) -> Self {
        let branch = branch.into();
        warn!("Branch '{}' cannot be resolved", branch);
        GitError::BranchUnresolvable { branch }
    }

    pub fn lookup_failure(target: impl Into<String>, reason: impl ToString) -> Self {
        let target = target.into();
        let reason = reason.to_string();
        warn!("Lookup of '{}' failed: {}", target, reason);
        GitError::LookupFailure { target, reason }
    }

    pub fn configuration(setting: impl Into<String>, reason: impl Into<String>) -> Self {
        GitError::Configuration {
            setting: setting.into(),
            reason: reason.into(),
        }
    }

    /// Whether the layout can continue with a partial or empty result.
    pub fn is_recoverable(&self) -> bool {
        match self {
            GitError::RepositoryUnavailable => true,
            GitError::BranchUnresolvable { .. } => true,
            GitError::LookupFailure { .. } => true,
            GitError::Configuration { .. } => false,
            GitError::Git2(_) => true,
            GitError::Io(_) => true,
            GitError::Serialization(_) => false,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            GitError::RepositoryUnavailable => ErrorSeverity::Low,
            GitError::BranchUnresolvable { .. } => ErrorSeverity::Low,
            GitError::LookupFailure { .. } => ErrorSeverity::Medium,
            GitError::Configuration { .. } => ErrorSeverity::Medium,
            GitError::Git2(_) => ErrorSeverity::Medium,
            GitError::Io(_) => ErrorSeverity::High,
            GitError::Serialization(_) => ErrorSeverity::Low,
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorSeverity::Low => write!(f, "LOW"),
            ErrorSeverity::Medium => write!(f, "MEDIUM"),
            ErrorSeverity::High => write!(f, "HIGH"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// Error reporting and logging utilities
pub struct ErrorReporter;

impl ErrorReporter {
    /// Log error with appropriate level based on severity
    pub fn log_error(error: &GitError, context: &str) {
        match error.severity() {
            ErrorSeverity::Critical | ErrorSeverity::High => {
                error!("[{}] {}: {}", error.severity(), context, error);
            }
            ErrorSeverity::Medium => {
                warn!("[MEDIUM] {}: {}", context, error);
            }
            ErrorSeverity::Low => {
                debug!("[LOW] {}: {}", context, error);
            }
        }
    }
}
