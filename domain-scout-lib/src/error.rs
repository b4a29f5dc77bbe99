//! Error handling for pattern processing, cache persistence and probing.
//!
//! Validation errors are ordinary values the caller can match on to decide
//! whether to skip a pattern or abort; nothing in the grammar engine panics
//! on bad input.

use std::fmt;

/// Main error type for domain-scout operations.
#[derive(Debug, Clone, PartialEq)]
pub enum DomainScoutError {
    /// Pattern is the empty string
    EmptyPattern,

    /// Pattern contains a space character
    ContainsSpace,

    /// Pattern starts with `-`
    LeadingHyphen,

    /// Pattern ends with `-`
    TrailingHyphen,

    /// Pattern contains `--`
    ConsecutiveHyphens,

    /// Pattern contains a character the grammar does not accept
    InvalidCharacter(char),

    /// Extension list is empty
    NoExtensions,

    /// Extension does not start with `.`
    MissingDot(String),

    /// Extension is shorter than two characters
    TooShort(String),

    /// Extension does not match `^\.[a-z0-9]+$`
    InvalidExtensionFormat(String),

    /// Persisted cache bytes could not be decoded
    CorruptState {
        reason: String,
    },

    /// Combination count saturated, so the index space cannot be traversed
    PatternTooLarge {
        pattern: String,
    },

    /// Configuration errors (invalid settings, unparsable files)
    ConfigError {
        message: String,
    },

    /// Malformed line in a pattern file (1-based line number)
    PatternFileError {
        line: usize,
        message: String,
    },

    /// File I/O errors when reading pattern files or cache files
    FileError {
        path: String,
        message: String,
    },

    /// Network-related errors (connection, DNS, TLS)
    NetworkError {
        message: String,
        source: Option<String>,
    },

    /// RDAP protocol errors carrying the HTTP status when one was received
    RdapError {
        domain: String,
        message: String,
        status_code: Option<u16>,
    },

    /// Operation exceeded its time budget
    Timeout {
        operation: String,
        duration: std::time::Duration,
    },

    /// Server rejected the request for rate limiting
    RateLimited {
        service: String,
        message: String,
    },

    /// Generic internal errors that don't fit other categories
    Internal {
        message: String,
    },
}

impl DomainScoutError {
    /// Create a new corrupt cache state error.
    pub fn corrupt_state<R: Into<String>>(reason: R) -> Self {
        Self::CorruptState {
            reason: reason.into(),
        }
    }

    /// Create a new pattern-too-large error.
    pub fn pattern_too_large<P: Into<String>>(pattern: P) -> Self {
        Self::PatternTooLarge {
            pattern: pattern.into(),
        }
    }

    /// Create a new configuration error.
    pub fn config<M: Into<String>>(message: M) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create a new pattern-file error for a 1-based line number.
    pub fn pattern_file<M: Into<String>>(line: usize, message: M) -> Self {
        Self::PatternFileError {
            line,
            message: message.into(),
        }
    }

    /// Create a new file error.
    pub fn file_error<P: Into<String>, M: Into<String>>(path: P, message: M) -> Self {
        Self::FileError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a new network error with source information.
    pub fn network_with_source<M: Into<String>, S: Into<String>>(message: M, source: S) -> Self {
        Self::NetworkError {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Create a new RDAP error with HTTP status code.
    pub fn rdap_with_status<D: Into<String>, M: Into<String>>(
        domain: D,
        message: M,
        status_code: u16,
    ) -> Self {
        Self::RdapError {
            domain: domain.into(),
            message: message.into(),
            status_code: Some(status_code),
        }
    }

    /// Create a new timeout error.
    pub fn timeout<O: Into<String>>(operation: O, duration: std::time::Duration) -> Self {
        Self::Timeout {
            operation: operation.into(),
            duration,
        }
    }

    /// Create a new internal error.
    pub fn internal<M: Into<String>>(message: M) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Whether this error came from pattern or extension validation.
    ///
    /// Validation errors are local to one pattern entry; the driver skips
    /// the entry and carries on.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::EmptyPattern
                | Self::ContainsSpace
                | Self::LeadingHyphen
                | Self::TrailingHyphen
                | Self::ConsecutiveHyphens
                | Self::InvalidCharacter(_)
                | Self::NoExtensions
                | Self::MissingDot(_)
                | Self::TooShort(_)
                | Self::InvalidExtensionFormat(_)
        )
    }

    /// Check if this error suggests the probe should be retried.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::NetworkError { .. }
                | Self::Timeout { .. }
                | Self::RateLimited { .. }
                | Self::RdapError {
                    status_code: Some(500..=599),
                    ..
                }
        )
    }
}

impl fmt::Display for DomainScoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPattern => write!(f, "Pattern cannot be empty"),
            Self::ContainsSpace => write!(f, "Pattern cannot contain spaces"),
            Self::LeadingHyphen => write!(f, "Pattern cannot start with a hyphen"),
            Self::TrailingHyphen => write!(f, "Pattern cannot end with a hyphen"),
            Self::ConsecutiveHyphens => {
                write!(f, "Pattern cannot contain consecutive hyphens")
            }
            Self::InvalidCharacter(ch) => {
                write!(f, "Pattern contains invalid character '{}'", ch)
            }
            Self::NoExtensions => write!(f, "At least one extension is required"),
            Self::MissingDot(ext) => {
                write!(f, "Extension '{}' must start with '.'", ext)
            }
            Self::TooShort(ext) => write!(f, "Extension '{}' is too short", ext),
            Self::InvalidExtensionFormat(ext) => write!(
                f,
                "Extension '{}' must be a dot followed by lowercase letters or digits",
                ext
            ),
            Self::CorruptState { reason } => {
                write!(f, "Corrupt cache state: {}", reason)
            }
            Self::PatternTooLarge { pattern } => write!(
                f,
                "Pattern '{}' has too many combinations to enumerate",
                pattern
            ),
            Self::ConfigError { message } => {
                write!(f, "Configuration error: {}", message)
            }
            Self::PatternFileError { line, message } => {
                write!(f, "Pattern file line {}: {}", line, message)
            }
            Self::FileError { path, message } => {
                write!(f, "File error at '{}': {}", path, message)
            }
            Self::NetworkError { message, source } => {
                if let Some(source) = source {
                    write!(f, "Network error: {} (source: {})", message, source)
                } else {
                    write!(f, "Network error: {}", message)
                }
            }
            Self::RdapError {
                domain,
                message,
                status_code,
            } => {
                if let Some(code) = status_code {
                    write!(f, "RDAP error for '{}' (HTTP {}): {}", domain, code, message)
                } else {
                    write!(f, "RDAP error for '{}': {}", domain, message)
                }
            }
            Self::Timeout {
                operation,
                duration,
            } => {
                write!(f, "Timeout after {:?} during: {}", duration, operation)
            }
            Self::RateLimited { service, message } => {
                write!(f, "Rate limited by {}: {}", service, message)
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {}", message)
            }
        }
    }
}

impl std::error::Error for DomainScoutError {}

impl From<reqwest::Error> for DomainScoutError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::timeout("HTTP request", std::time::Duration::from_secs(5))
        } else if err.is_connect() {
            Self::network_with_source("Connection failed", err.to_string())
        } else {
            Self::network_with_source("HTTP request failed", err.to_string())
        }
    }
}

impl From<serde_json::Error> for DomainScoutError {
    fn from(err: serde_json::Error) -> Self {
        Self::internal(format!("JSON encoding failed: {}", err))
    }
}

impl From<toml::de::Error> for DomainScoutError {
    fn from(err: toml::de::Error) -> Self {
        Self::config(format!("Failed to parse TOML configuration: {}", err))
    }
}

impl From<std::io::Error> for DomainScoutError {
    fn from(err: std::io::Error) -> Self {
        Self::internal(format!("I/O error: {}", err))
    }
}

impl From<regex::Error> for DomainScoutError {
    fn from(err: regex::Error) -> Self {
        Self::internal(format!("Regex error: {}", err))
    }
}
