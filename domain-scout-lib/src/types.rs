//! Core data types for pattern hunting.
//!
//! This module defines the pattern entries fed into the engine, the sizing
//! report it produces, probe results and the runtime configuration.

use crate::pattern::{CombinationCount, ParsedPattern};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Highest accepted launch rate, in probes per second.
pub const MAX_RATE_LIMIT: u32 = 10_000;

/// A pattern with its extensions, as read from the command line or a
/// pattern file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternEntry {
    pub pattern: String,

    /// Extensions including the leading dot, e.g. `".com"`
    pub extensions: Vec<String>,

    /// Trailing `# comment` from the pattern file, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl PatternEntry {
    pub fn new<P: Into<String>>(pattern: P, extensions: Vec<String>) -> Self {
        Self {
            pattern: pattern.into(),
            extensions,
            comment: None,
        }
    }

    pub fn with_comment<C: Into<String>>(mut self, comment: C) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

/// Sizing report for a validated pattern entry.
///
/// Both counts are pure functions of `parts` and `extensions`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternAnalysis {
    pub pattern: String,
    pub extensions: Vec<String>,
    pub parts: ParsedPattern,
    /// Product of all segment alphabet sizes
    pub combination_count: CombinationCount,
    /// `combination_count * extensions.len()`
    pub total_domain_count: CombinationCount,
}

/// Result of probing one fully qualified domain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeOutcome {
    /// The domain that was probed (e.g. "brava.com")
    pub domain: String,

    /// Whether the domain looked unregistered. Only meaningful when
    /// `success` is true.
    pub available: bool,

    /// Whether the probe produced a definitive answer
    pub success: bool,

    /// How long the probe took, retries included
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<Duration>,

    /// Why the probe failed, when it did
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ProbeOutcome {
    pub fn answered(domain: &str, available: bool, duration: Duration) -> Self {
        Self {
            domain: domain.to_string(),
            available,
            success: true,
            duration: Some(duration),
            error: None,
        }
    }

    pub fn failed<E: ToString>(domain: &str, error: E, duration: Duration) -> Self {
        Self {
            domain: domain.to_string(),
            available: false,
            success: false,
            duration: Some(duration),
            error: Some(error.to_string()),
        }
    }
}

/// Runtime configuration for a hunt.
///
/// Built from defaults, then config files, then `DS_*` environment
/// variables, then CLI flags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoutConfig {
    /// Maximum number of probes in flight
    /// Default: 10, Range: 1-100
    pub concurrency: usize,

    /// Maximum probes started per second; `None` means unthrottled
    /// Range: 1-10,000
    pub rate_limit: Option<u32>,

    /// Time budget for one probe, retries included
    /// Default: 5 seconds
    #[serde(skip)]
    pub timeout: Duration,

    /// Extra attempts after a retryable probe failure
    /// Default: 1
    pub retries: u32,

    /// Number of bits in a freshly created membership cache
    /// Default: 10,000,000
    pub cache_capacity: u64,

    /// Persist the cache after this many recorded probes
    /// Default: 1000
    pub checkpoint_every: usize,

    /// Where the membership cache is persisted
    pub cache_path: PathBuf,

    /// Extensions used when a pattern does not name any
    /// Default: [".com"]
    pub default_extensions: Vec<String>,
}

impl Default for ScoutConfig {
    fn default() -> Self {
        Self {
            concurrency: 10,
            rate_limit: None,
            timeout: Duration::from_secs(5),
            retries: 1,
            cache_capacity: 10_000_000,
            checkpoint_every: 1000,
            cache_path: PathBuf::from("domain-scout.cache"),
            default_extensions: vec![".com".to_string()],
        }
    }
}

impl ScoutConfig {
    /// Set concurrency, capped to 1..=100.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.clamp(1, 100);
        self
    }

    /// Set the launch rate, capped at [`MAX_RATE_LIMIT`]; zero disables
    /// throttling.
    pub fn with_rate_limit(mut self, per_second: u32) -> Self {
        self.rate_limit = match per_second {
            0 => None,
            n => Some(n.min(MAX_RATE_LIMIT)),
        };
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set retries, capped at 10.
    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries.min(10);
        self
    }

    /// Set the capacity of fresh caches; zero is bumped to one bit.
    pub fn with_cache_capacity(mut self, capacity: u64) -> Self {
        self.cache_capacity = capacity.max(1);
        self
    }

    pub fn with_checkpoint_every(mut self, every: usize) -> Self {
        self.checkpoint_every = every.max(1);
        self
    }

    pub fn with_cache_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.cache_path = path.into();
        self
    }

    pub fn with_default_extensions(mut self, extensions: Vec<String>) -> Self {
        self.default_extensions = extensions;
        self
    }
}
