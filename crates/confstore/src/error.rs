//! Error types for confstore
//!
//! Errors are structured: a kind, the backing file involved, an optional
//! underlying cause, and an actionable help message.

use std::fmt;
use std::path::Path;

/// Result type alias for confstore operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for confstore operations
#[derive(Debug, Clone)]
pub struct Error {
    /// The kind of error that occurred
    pub kind: ErrorKind,
    /// Backing file the operation was working against, if known
    pub file: Option<String>,
    /// Actionable help message
    pub help: Option<String>,
    /// Underlying cause (as string for Clone compatibility)
    pub cause: Option<String>,
}

/// Categories of errors that can occur
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// No backing file path was configured when one was required
    PathNotSet,
    /// Backing file exists but cannot be read
    NotReadable,
    /// Backing file exists but cannot be written
    NotWritable,
    /// File contents are not a usable YAML mapping
    InvalidFormat,
    /// Save was invoked before anything was loaded or set
    EmptyConfig,
    /// Any other operating-system failure
    Io,
}

impl Error {
    /// Create a path-not-set error
    pub fn path_not_set() -> Self {
        Self {
            kind: ErrorKind::PathNotSet,
            file: None,
            help: Some("Open the store with an explicit path, or set a home directory so the default location can be resolved".into()),
            cause: None,
        }
    }

    /// Create a not-readable error for the given file
    pub fn not_readable(file: impl AsRef<Path>) -> Self {
        Self {
            kind: ErrorKind::NotReadable,
            file: Some(display_path(file)),
            help: Some("Check the file's permissions".into()),
            cause: None,
        }
    }

    /// Create a not-writable error for the given file
    pub fn not_writable(file: impl AsRef<Path>) -> Self {
        Self {
            kind: ErrorKind::NotWritable,
            file: Some(display_path(file)),
            help: Some("Check the file's permissions".into()),
            cause: None,
        }
    }

    /// Create an invalid-format error carrying the parser's message
    pub fn invalid_format(file: impl AsRef<Path>, message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::InvalidFormat,
            file: Some(display_path(file)),
            help: Some("Fix the file so its document root is a YAML mapping".into()),
            cause: Some(message.into()),
        }
    }

    /// Create an empty-config error
    pub fn empty_config(file: impl AsRef<Path>) -> Self {
        Self {
            kind: ErrorKind::EmptyConfig,
            file: Some(display_path(file)),
            help: Some("Call get or set at least once before saving".into()),
            cause: None,
        }
    }

    /// Create an I/O error from an operating-system failure
    pub fn io(file: impl AsRef<Path>, err: &std::io::Error) -> Self {
        Self {
            kind: ErrorKind::Io,
            file: Some(display_path(file)),
            help: None,
            cause: Some(err.to_string()),
        }
    }

    /// Replace the help message
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }
}

fn display_path(file: impl AsRef<Path>) -> String {
    file.as_ref().display().to_string()
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ErrorKind::PathNotSet => write!(f, "Config file path is not set")?,
            ErrorKind::NotReadable => write!(f, "Config file is not readable")?,
            ErrorKind::NotWritable => write!(f, "Config file is not writable")?,
            ErrorKind::InvalidFormat => write!(f, "Not a valid YAML config file")?,
            ErrorKind::EmptyConfig => {
                write!(f, "Nothing to save: no configuration was loaded or set")?
            }
            ErrorKind::Io => write!(f, "I/O error")?,
        }

        if let Some(file) = &self.file {
            write!(f, "\n  File: {}", file)?;
        }

        if let Some(cause) = &self.cause {
            write!(f, "\n  {}", cause)?;
        }

        if let Some(help) = &self.help {
            write!(f, "\n  Help: {}", help)?;
        }

        Ok(())
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_not_set_display() {
        let err = Error::path_not_set();
        let display = format!("{}", err);

        assert_eq!(err.kind, ErrorKind::PathNotSet);
        assert!(display.contains("Config file path is not set"));
        assert!(display.contains("Help:"));
    }

    #[test]
    fn test_not_readable_display() {
        let err = Error::not_readable("/etc/app/settings.yml");
        let display = format!("{}", err);

        assert!(display.contains("Config file is not readable"));
        assert!(display.contains("File: /etc/app/settings.yml"));
        assert!(display.contains("Help:"));
    }

    #[test]
    fn test_not_writable_display() {
        let err = Error::not_writable("/etc/app/settings.yml");
        let display = format!("{}", err);

        assert!(display.contains("Config file is not writable"));
        assert!(display.contains("File: /etc/app/settings.yml"));
    }

    #[test]
    fn test_invalid_format_carries_parser_message() {
        let err = Error::invalid_format("settings.yml", "found unexpected end of stream");
        let display = format!("{}", err);

        assert_eq!(err.kind, ErrorKind::InvalidFormat);
        assert!(display.contains("Not a valid YAML config file"));
        assert!(display.contains("found unexpected end of stream"));
    }

    #[test]
    fn test_empty_config_display() {
        let err = Error::empty_config("settings.yml");
        let display = format!("{}", err);

        assert!(display.contains("Nothing to save"));
        assert!(display.contains("Help: Call get or set at least once before saving"));
    }

    #[test]
    fn test_io_error_carries_os_message() {
        let os_err = std::io::Error::new(std::io::ErrorKind::Other, "disk fell over");
        let err = Error::io("settings.yml", &os_err);
        let display = format!("{}", err);

        assert_eq!(err.kind, ErrorKind::Io);
        assert!(display.contains("I/O error"));
        assert!(display.contains("disk fell over"));
    }

    #[test]
    fn test_with_help_overrides() {
        let err = Error::invalid_format("settings.yml", "bad").with_help("Add a top-level mapping");
        let display = format!("{}", err);

        assert!(display.contains("Help: Add a top-level mapping"));
    }
}
