//! Unified error types for step-tools.
//!
//! Tree construction fails only on malformed input (a relation pointing at a
//! part that does not exist, duplicated step ids, or an assembly that contains
//! itself). A diff that cannot reconcile every node is *not* an error: the
//! unresolved rows stay in the merged forest, see [`crate::diff::PartOf`].

use crate::hlr::RowId;
use crate::model::StepId;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for step-tools operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum StepToolsError {
    /// Lookups over the part/relation records failed
    #[error("Lookup failed: {context}")]
    Lookup {
        context: String,
        #[source]
        source: LookupErrorKind,
    },

    /// Errors while merging two forests
    #[error("Diff computation failed: {context}")]
    Diff {
        context: String,
        #[source]
        source: DiffErrorKind,
    },

    /// Errors while reading serialized part/relation records
    #[error("Failed to load STEP records: {context}")]
    Load {
        context: String,
        #[source]
        source: LoadErrorKind,
    },

    /// IO errors with context
    #[error("IO error at {path:?}: {message}")]
    Io {
        path: Option<PathBuf>,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration errors
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Validation errors
    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Specific lookup error kinds
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LookupErrorKind {
    #[error("no part with step id #{0}")]
    PartNotFound(StepId),

    #[error("part step id #{0} is declared more than once")]
    DuplicatePart(StepId),

    #[error("relation step id #{0} is declared more than once")]
    DuplicateRelation(StepId),

    #[error("part #{step_id} is its own ancestor ({path})")]
    CyclicAssembly { step_id: StepId, path: String },
}

/// Specific diff error kinds
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DiffErrorKind {
    #[error("row id {0} is used by more than one merged row")]
    DuplicateRowId(RowId),

    #[error("row id {0} cannot be shifted past the other forest's ids")]
    IdOverflow(u32),
}

/// Specific load error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum LoadErrorKind {
    #[error("Invalid JSON structure: {0}")]
    InvalidJson(String),

    #[error("Invalid YAML structure: {0}")]
    InvalidYaml(String),

    #[error("Unsupported file extension '{0}' (expected .json, .yaml or .yml)")]
    UnsupportedExtension(String),
}

// ============================================================================
// Result type alias
// ============================================================================

/// Convenient Result type for step-tools operations
pub type Result<T> = std::result::Result<T, StepToolsError>;

// ============================================================================
// Error construction helpers
// ============================================================================

impl StepToolsError {
    /// Create a lookup error with context
    pub fn lookup(context: impl Into<String>, source: LookupErrorKind) -> Self {
        Self::Lookup {
            context: context.into(),
            source,
        }
    }

    /// Create the error raised for a reference to an unknown part
    pub fn part_not_found(step_id: StepId) -> Self {
        Self::lookup("resolving part", LookupErrorKind::PartNotFound(step_id))
    }

    /// Create a diff error with context
    pub fn diff(context: impl Into<String>, source: DiffErrorKind) -> Self {
        Self::Diff {
            context: context.into(),
            source,
        }
    }

    /// Create a load error with context
    pub fn load(context: impl Into<String>, source: LoadErrorKind) -> Self {
        Self::Load {
            context: context.into(),
            source,
        }
    }

    /// Create an IO error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        let message = format!("{source}");
        Self::Io {
            path: Some(path),
            message,
            source,
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// The lookup kind, if this is a lookup failure.
    #[must_use]
    pub const fn lookup_kind(&self) -> Option<&LookupErrorKind> {
        match self {
            Self::Lookup { source, .. } => Some(source),
            _ => None,
        }
    }
}

// ============================================================================
// Conversions from existing error types
// ============================================================================

impl From<std::io::Error> for StepToolsError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            path: None,
            message: format!("{err}"),
            source: err,
        }
    }
}

impl From<serde_json::Error> for StepToolsError {
    fn from(err: serde_json::Error) -> Self {
        Self::load("JSON deserialization", LoadErrorKind::InvalidJson(err.to_string()))
    }
}

impl From<serde_yaml::Error> for StepToolsError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::load("YAML deserialization", LoadErrorKind::InvalidYaml(err.to_string()))
    }
}

// ============================================================================
// Error context extension trait
// ============================================================================

/// Extension trait for adding context to errors.
///
/// Context strings are chained outermost first, so a failure deep inside the
/// tree builder reads `"building forest for a.json: expanding #12: resolving part"`.
pub trait ErrorContext<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context from a closure, evaluated only on error.
    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T, E: Into<StepToolsError>> ErrorContext<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        let ctx: String = context.into();
        self.map_err(|e| add_context_to_error(e.into(), &ctx))
    }

    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.map_err(|e| {
            let ctx: String = f().into();
            add_context_to_error(e.into(), &ctx)
        })
    }
}

/// Add context to an error, chaining with any existing context.
fn add_context_to_error(err: StepToolsError, new_ctx: &str) -> StepToolsError {
    match err {
        StepToolsError::Lookup {
            context: existing,
            source,
        } => StepToolsError::Lookup {
            context: chain_context(new_ctx, &existing),
            source,
        },
        StepToolsError::Diff {
            context: existing,
            source,
        } => StepToolsError::Diff {
            context: chain_context(new_ctx, &existing),
            source,
        },
        StepToolsError::Load {
            context: existing,
            source,
        } => StepToolsError::Load {
            context: chain_context(new_ctx, &existing),
            source,
        },
        StepToolsError::Io {
            path,
            message,
            source,
        } => StepToolsError::Io {
            path,
            message: chain_context(new_ctx, &message),
            source,
        },
        StepToolsError::Config(msg) => StepToolsError::Config(chain_context(new_ctx, &msg)),
        StepToolsError::Validation(msg) => {
            StepToolsError::Validation(chain_context(new_ctx, &msg))
        }
    }
}

/// Chain two context strings together.
///
/// If the existing context is empty, returns just the new context.
/// Otherwise, returns "`new_context`: `existing_context`".
fn chain_context(new: &str, existing: &str) -> String {
    if existing.is_empty() {
        new.to_string()
    } else {
        format!("{new}: {existing}")
    }
}

/// Extension trait for Option types to convert to errors with context.
pub trait OptionContext<T> {
    /// Convert None to an error with the given context.
    fn context_none(self, context: impl Into<String>) -> Result<T>;

    /// Convert None to an error with context from a closure.
    fn with_context_none<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T> OptionContext<T> for Option<T> {
    fn context_none(self, context: impl Into<String>) -> Result<T> {
        self.ok_or_else(|| StepToolsError::Validation(context.into()))
    }

    fn with_context_none<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.ok_or_else(|| StepToolsError::Validation(f().into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StepToolsError::part_not_found(42);
        let display = err.to_string();
        assert!(display.contains("Lookup"), "{display}");
        assert!(display.contains("resolving part"), "{display}");

        let source = std::error::Error::source(&err).map(ToString::to_string);
        assert_eq!(source.as_deref(), Some("no part with step id #42"));
    }

    #[test]
    fn test_lookup_kind_accessor() {
        let err = StepToolsError::part_not_found(7);
        assert_eq!(err.lookup_kind(), Some(&LookupErrorKind::PartNotFound(7)));
        assert!(StepToolsError::validation("x").lookup_kind().is_none());
    }

    #[test]
    fn test_error_chain() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = StepToolsError::io("/path/to/assembly.json", io_err);

        assert!(err.to_string().contains("/path/to/assembly.json"));
    }

    #[test]
    fn test_context_chaining_multiple_levels() {
        fn inner() -> Result<()> {
            Err(StepToolsError::part_not_found(3))
        }

        fn middle() -> Result<()> {
            inner().context("expanding #1")
        }

        fn outer() -> Result<()> {
            middle().context("building forest")
        }

        match outer() {
            Err(StepToolsError::Lookup { context, source }) => {
                assert_eq!(context, "building forest: expanding #1: resolving part");
                assert_eq!(source, LookupErrorKind::PartNotFound(3));
            }
            other => panic!("Expected Lookup error, got {other:?}"),
        }
    }

    #[test]
    fn test_with_context_lazy_evaluation() {
        let mut called = false;

        let ok_result: Result<i32> = Ok(42);
        let _ = ok_result.with_context(|| {
            called = true;
            "should not be called"
        });
        assert!(!called, "Closure should not be called for Ok result");

        let err_result: Result<i32> = Err(StepToolsError::validation("error"));
        let _ = err_result.with_context(|| {
            called = true;
            "should be called"
        });
        assert!(called, "Closure should be called for Err result");
    }

    #[test]
    fn test_json_error_conversion() {
        let err: StepToolsError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(
            err,
            StepToolsError::Load {
                source: LoadErrorKind::InvalidJson(_),
                ..
            }
        ));
    }

    #[test]
    fn test_option_context() {
        let none_value: Option<i32> = None;
        match none_value.context_none("missing value") {
            Err(StepToolsError::Validation(msg)) => assert_eq!(msg, "missing value"),
            other => panic!("Expected Validation error, got {other:?}"),
        }
        assert_eq!(Some(1).context_none("unused").ok(), Some(1));
    }

    #[test]
    fn test_chain_context_helper() {
        assert_eq!(chain_context("new", ""), "new");
        assert_eq!(chain_context("new", "existing"), "new: existing");
    }
}
