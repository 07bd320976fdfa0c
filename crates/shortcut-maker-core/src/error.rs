//! Error types for the shortcut maker.
//!
//! Every failure is surfaced to the user as text, so each variant carries a
//! message that reads well inside a dialog.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for install and shortcut operations.
#[derive(Debug, Error)]
pub enum ShortcutError {
    /// A required special folder could not be located.
    #[error("{message}")]
    Config { message: String },

    /// A supplied target path does not exist.
    #[error("Target file or directory not found: {}", .0.display())]
    NotFound(PathBuf),

    /// An input was rejected before touching the filesystem.
    #[error("{message}")]
    InvalidInput { message: String },

    // File system errors
    #[error("{message}{}", path_suffix(.path))]
    Io {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },

    /// The platform shortcut API rejected an operation.
    #[error("{message}: {}", .path.display())]
    Link { message: String, path: PathBuf },
}

/// Result type alias for shortcut maker operations.
pub type Result<T> = std::result::Result<T, ShortcutError>;

fn path_suffix(path: &Option<PathBuf>) -> String {
    match path {
        Some(path) => format!(" ({})", path.display()),
        None => String::new(),
    }
}

impl From<std::io::Error> for ShortcutError {
    fn from(err: std::io::Error) -> Self {
        ShortcutError::Io {
            message: err.to_string(),
            path: None,
            source: Some(err),
        }
    }
}

impl ShortcutError {
    /// Create an IO error with path context.
    pub fn io_with_path(err: std::io::Error, path: impl Into<PathBuf>) -> Self {
        ShortcutError::Io {
            message: err.to_string(),
            path: Some(path.into()),
            source: Some(err),
        }
    }

    /// Create a configuration error for a folder the OS could not resolve.
    pub fn missing_folder(name: &str) -> Self {
        ShortcutError::Config {
            message: format!("Could not locate the {} folder.", name),
        }
    }

    /// Whether this error only concerns a single batch input.
    ///
    /// Configuration errors affect every input alike; everything else is
    /// scoped to the path that produced it.
    pub fn is_item_scoped(&self) -> bool {
        !matches!(self, ShortcutError::Config { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ShortcutError::missing_folder("'SendTo'");
        assert_eq!(err.to_string(), "Could not locate the 'SendTo' folder.");

        let err = ShortcutError::NotFound(PathBuf::from("missing.txt"));
        assert_eq!(
            err.to_string(),
            "Target file or directory not found: missing.txt"
        );
    }

    #[test]
    fn test_io_error_includes_path() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = ShortcutError::io_with_path(io, "locked.exe");
        assert_eq!(err.to_string(), "denied (locked.exe)");

        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
        let err: ShortcutError = io.into();
        assert_eq!(err.to_string(), "disk full");
    }

    #[test]
    fn test_item_scope() {
        assert!(!ShortcutError::missing_folder("LocalAppData").is_item_scoped());
        assert!(ShortcutError::NotFound(PathBuf::from("x")).is_item_scoped());
        assert!(ShortcutError::InvalidInput {
            message: "Target path is empty.".into()
        }
        .is_item_scoped());
    }
}
