//! Error types for the blogmatter library
//!
//! Every public operation returns [`Result`]. Variants carry the offending path
//! and the underlying cause so the CLI can render a message without guessing.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for all library operations
#[derive(Error, Debug)]
pub enum BlogMatterError {
    /// I/O related errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing or serialization errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A required field (title, tag path) was empty
    #[error("{field} must not be empty")]
    EmptyInput { field: String },

    /// A tag segment cannot be used as a directory name
    #[error("Invalid tag segment {segment:?}: {reason}")]
    InvalidTagSegment { segment: String, reason: String },

    /// The destination is already occupied
    #[error("Already exists: {path}")]
    AlreadyExists { path: PathBuf },

    /// The referenced document does not exist
    #[error("Not found: {path}")]
    NotFound { path: PathBuf },

    /// The path escapes the area it must live in
    #[error("{path} is outside the {area} area")]
    OutsideArea { path: PathBuf, area: String },

    /// The file does not carry the document extension
    #[error("Not a markdown document: {path}")]
    InvalidKind { path: PathBuf },

    /// The front matter block is missing or unterminated
    #[error("Malformed header{}: {reason}", display_path(.path))]
    MalformedHeader {
        path: Option<PathBuf>,
        reason: String,
    },

    /// A multi-step move stopped halfway
    #[error("Partial failure on {path}: {cause}{}", display_rollback(.rollback))]
    PartialFailure {
        path: PathBuf,
        #[source]
        cause: std::io::Error,
        rollback: Option<String>,
    },

    /// Configuration could not be loaded
    #[error("Configuration error in {path}: {reason}")]
    Config { path: PathBuf, reason: String },

    /// The prompt provider failed or was aborted
    #[error("Prompt error: {reason}")]
    Prompt { reason: String },
}

fn display_path(path: &Option<PathBuf>) -> String {
    match path {
        Some(p) => format!(" in {}", p.display()),
        None => String::new(),
    }
}

fn display_rollback(rollback: &Option<String>) -> String {
    match rollback {
        Some(r) => format!(" (rollback failed: {})", r),
        None => " (rolled back)".to_string(),
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, BlogMatterError>;

impl BlogMatterError {
    pub fn empty_input(field: impl Into<String>) -> Self {
        Self::EmptyInput {
            field: field.into(),
        }
    }

    pub fn invalid_tag_segment(segment: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidTagSegment {
            segment: segment.into(),
            reason: reason.into(),
        }
    }

    pub fn already_exists(path: impl Into<PathBuf>) -> Self {
        Self::AlreadyExists { path: path.into() }
    }

    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::NotFound { path: path.into() }
    }

    pub fn outside_area(path: impl Into<PathBuf>, area: impl Into<String>) -> Self {
        Self::OutsideArea {
            path: path.into(),
            area: area.into(),
        }
    }

    pub fn invalid_kind(path: impl Into<PathBuf>) -> Self {
        Self::InvalidKind { path: path.into() }
    }

    /// Create a malformed header error not yet tied to a file
    pub fn malformed_header(reason: impl Into<String>) -> Self {
        Self::MalformedHeader {
            path: None,
            reason: reason.into(),
        }
    }

    pub fn partial_failure(
        path: impl Into<PathBuf>,
        cause: std::io::Error,
        rollback: Option<String>,
    ) -> Self {
        Self::PartialFailure {
            path: path.into(),
            cause,
            rollback,
        }
    }

    pub fn config(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Config {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn prompt(reason: impl Into<String>) -> Self {
        Self::Prompt {
            reason: reason.into(),
        }
    }

    /// Attach a file path to a header error produced by the pure codec
    pub fn with_path(self, path: impl Into<PathBuf>) -> Self {
        match self {
            Self::MalformedHeader { path: None, reason } => Self::MalformedHeader {
                path: Some(path.into()),
                reason,
            },
            other => other,
        }
    }

    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Io(_) => ErrorKind::Io,
            Self::Yaml(_) | Self::Json(_) => ErrorKind::Serialization,
            Self::EmptyInput { .. } => ErrorKind::EmptyInput,
            Self::InvalidTagSegment { .. } => ErrorKind::InvalidTagSegment,
            Self::AlreadyExists { .. } => ErrorKind::AlreadyExists,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::OutsideArea { .. } => ErrorKind::OutsideArea,
            Self::InvalidKind { .. } => ErrorKind::InvalidKind,
            Self::MalformedHeader { .. } => ErrorKind::MalformedHeader,
            Self::PartialFailure { .. } => ErrorKind::PartialFailure,
            Self::Config { .. } => ErrorKind::Config,
            Self::Prompt { .. } => ErrorKind::Prompt,
        }
    }
}

/// Coarse error classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Io,
    Serialization,
    EmptyInput,
    InvalidTagSegment,
    AlreadyExists,
    NotFound,
    OutsideArea,
    InvalidKind,
    MalformedHeader,
    PartialFailure,
    Config,
    Prompt,
}

impl ErrorKind {
    /// Process exit code the CLI reports for this kind of failure
    pub fn exit_code(self) -> i32 {
        match self {
            Self::EmptyInput | Self::InvalidTagSegment => 2,
            Self::AlreadyExists => 3,
            Self::NotFound | Self::InvalidKind | Self::OutsideArea => 4,
            Self::PartialFailure => 5,
            _ => 1,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Io => "IO",
            Self::Serialization => "SERIALIZATION",
            Self::EmptyInput => "EMPTY_INPUT",
            Self::InvalidTagSegment => "INVALID_TAG_SEGMENT",
            Self::AlreadyExists => "ALREADY_EXISTS",
            Self::NotFound => "NOT_FOUND",
            Self::OutsideArea => "OUTSIDE_AREA",
            Self::InvalidKind => "INVALID_KIND",
            Self::MalformedHeader => "MALFORMED_HEADER",
            Self::PartialFailure => "PARTIAL_FAILURE",
            Self::Config => "CONFIG",
            Self::Prompt => "PROMPT",
        };
        write!(f, "{}", name)
    }
}
