use thiserror::Error;

use crate::platform::Permission;

/// Why a single resource could not be resolved. These never abort an export.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("not implemented")]
    NotImplemented,

    #[error("I/O error: {0}")]
    Io(String),

    #[error("permission not granted: {0}")]
    PermissionDenied(Permission),

    #[error("not found")]
    NotFound,

    #[error("malformed data: {0}")]
    Deserialization(String),

    #[error("subprocess failed: {0}")]
    Subprocess(String),
}

impl ResolveError {
    /// Stable code reported in the export error log.
    pub fn code(&self) -> &'static str {
        match self {
            ResolveError::NotImplemented => "NOT_IMPLEMENTED",
            ResolveError::Io(_) => "IO",
            ResolveError::PermissionDenied(_) => "PERMISSION_DENIED",
            ResolveError::NotFound => "NOT_FOUND",
            ResolveError::Deserialization(_) => "DESERIALIZATION",
            ResolveError::Subprocess(_) => "SUBPROCESS",
        }
    }
}

impl From<std::io::Error> for ResolveError {
    fn from(e: std::io::Error) -> Self {
        match e.kind() {
            std::io::ErrorKind::NotFound => ResolveError::NotFound,
            _ => ResolveError::Io(e.to_string()),
        }
    }
}

pub type ResolveResult<T> = std::result::Result<T, ResolveError>;
