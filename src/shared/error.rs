use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the CLI application.
///
/// CI pipelines use these to tell a partially failed reconciliation apart
/// from a run that never got going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Every component was resolved, linked, created or soft-warned
    Success = 0,
    /// At least one component hit a hard failure (transport error, unresolvable conflict)
    ReconciliationFailures = 1,
    /// Invalid command-line arguments (clap parsing errors)
    InvalidArguments = 2,
    /// Application error (unreadable input, invalid config, file I/O error, etc.)
    ApplicationError = 3,
}

impl ExitCode {
    /// Convert to i32 for use with std::process::exit
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitCode::Success => write!(f, "Success (0)"),
            ExitCode::ReconciliationFailures => write!(f, "Reconciliation Failures (1)"),
            ExitCode::InvalidArguments => write!(f, "Invalid Arguments (2)"),
            ExitCode::ApplicationError => write!(f, "Application Error (3)"),
        }
    }
}

/// Application-level errors surfaced to the user.
#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("Component list not found: {path}\n\n💡 Hint: {suggestion}")]
    InputNotFound { path: PathBuf, suggestion: String },

    #[error("Failed to parse component list: {path}\nDetails: {details}\n\n💡 Hint: The file must be a JSON object with a \"components\" array")]
    InputParseError { path: PathBuf, details: String },

    #[error("Failed to write to file: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the directory exists and you have write permissions")]
    FileWriteError { path: PathBuf, details: String },

    #[error("Invalid configuration: {details}\n\n💡 Hint: {hint}")]
    InvalidConfig { details: String, hint: String },

    /// Validation error for builder patterns and domain value objects
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Security violation: {path}\nReason: {reason}\n\n💡 Hint: {hint}")]
    SecurityError {
        path: PathBuf,
        reason: String,
        hint: String,
    },
}

/// Per-component failure taxonomy of the reconciliation engine.
///
/// None of these escape the engine: they are recorded on the component's
/// report and only `Transport` (and unresolvable identities) flip the batch
/// exit code. A missing match is not an error and has no variant here.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("transport failure during {operation}: {details}")]
    Transport { operation: String, details: String },

    #[error("{candidates} registry candidates share the name '{name}', selected by purl cardinality")]
    AmbiguousIdentity { name: String, candidates: usize },

    #[error("registry entity '{name}' is recorded as '{recorded_type}' but component purl type is '{purl_type}'")]
    ConflictingIdentity {
        name: String,
        purl_type: String,
        recorded_type: String,
    },

    #[error("registry {entity} matched '{name}' but records another package ({recorded})")]
    ForeignIdentity {
        entity: String,
        name: String,
        recorded: String,
    },

    #[error("update of {entity} accepted as a moderation request, pending approval")]
    ModerationPending { entity: String },

    #[error("registry rejected {operation} with status {status}")]
    UnexpectedStatus { operation: String, status: u16 },

    #[error("release '{name}' '{version}' already exists but could not be located")]
    UnresolvedConflict { name: String, version: String },
}

impl EngineError {
    /// Whether this error marks the component, and therefore the batch, as failed.
    pub fn is_hard_failure(&self) -> bool {
        matches!(
            self,
            EngineError::Transport { .. }
                | EngineError::UnexpectedStatus { .. }
                | EngineError::UnresolvedConflict { .. }
        )
    }

    pub fn transport(operation: impl Into<String>, err: impl fmt::Display) -> Self {
        EngineError::Transport {
            operation: operation.into(),
            details: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_exit_code_values() {
        assert_eq!(ExitCode::Success.as_i32(), 0);
        assert_eq!(ExitCode::ReconciliationFailures.as_i32(), 1);
        assert_eq!(ExitCode::InvalidArguments.as_i32(), 2);
        assert_eq!(ExitCode::ApplicationError.as_i32(), 3);
    }

    #[test]
    fn test_exit_code_display() {
        assert_eq!(format!("{}", ExitCode::Success), "Success (0)");
        assert_eq!(
            format!("{}", ExitCode::ReconciliationFailures),
            "Reconciliation Failures (1)"
        );
        assert_eq!(
            format!("{}", ExitCode::ApplicationError),
            "Application Error (3)"
        );
    }

    #[test]
    fn test_input_not_found_display() {
        let error = ReconcileError::InputNotFound {
            path: PathBuf::from("/test/components.json"),
            suggestion: "Run the manifest parser first".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("Component list not found"));
        assert!(display.contains("/test/components.json"));
        assert!(display.contains("💡 Hint:"));
        assert!(display.contains("Run the manifest parser first"));
    }

    #[test]
    fn test_invalid_config_display() {
        let error = ReconcileError::InvalidConfig {
            details: "registry.url must not be empty".to_string(),
            hint: "Set registry.url".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("Invalid configuration"));
        assert!(display.contains("registry.url must not be empty"));
    }

    #[test]
    fn test_hard_failure_classification() {
        assert!(EngineError::transport("create release", "connection reset").is_hard_failure());
        assert!(EngineError::UnexpectedStatus {
            operation: "create component".to_string(),
            status: 500,
        }
        .is_hard_failure());
        assert!(EngineError::UnresolvedConflict {
            name: "zlib".to_string(),
            version: "1.3".to_string(),
        }
        .is_hard_failure());

        assert!(!EngineError::ModerationPending {
            entity: "release R1".to_string(),
        }
        .is_hard_failure());
        assert!(!EngineError::AmbiguousIdentity {
            name: "json".to_string(),
            candidates: 2,
        }
        .is_hard_failure());
        assert!(!EngineError::ConflictingIdentity {
            name: "json".to_string(),
            purl_type: "npm".to_string(),
            recorded_type: "pypi".to_string(),
        }
        .is_hard_failure());
        assert!(!EngineError::ForeignIdentity {
            entity: "release R1".to_string(),
            name: "animations".to_string(),
            recorded: "pkg:npm/%40angular/animations@15.2.1".to_string(),
        }
        .is_hard_failure());
    }

    #[test]
    fn test_conflicting_identity_display() {
        let error = EngineError::ConflictingIdentity {
            name: "json".to_string(),
            purl_type: "npm".to_string(),
            recorded_type: "pypi".to_string(),
        };
        let display = error.to_string();
        assert!(display.contains("'json'"));
        assert!(display.contains("'pypi'"));
        assert!(display.contains("'npm'"));
    }
}
