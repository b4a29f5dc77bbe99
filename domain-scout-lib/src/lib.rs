//! # Domain Scout Library
//!
//! Generates candidate domain names from a compact pattern grammar, skips
//! the ones already checked using a persisted membership cache, and probes
//! the rest for availability with bounded concurrency.
//!
//! ## Quick Start
//!
//! ```rust
//! use domain_scout_lib::{analyze_pattern, domain_candidates, PatternEntry};
//!
//! let entry = PatternEntry::new("getcv", vec![".io".to_string()]);
//! let analysis = analyze_pattern(&entry).unwrap();
//! assert_eq!(analysis.total_domain_count.value(), 105);
//!
//! let first = domain_candidates(&analysis).unwrap().next().unwrap();
//! assert!(first.starts_with("get") && first.ends_with(".io"));
//! ```
//!
//! Hunting against the network:
//!
//! ```rust,no_run
//! use domain_scout_lib::{
//!     CacheStore, CancelFlag, Hunter, PatternEntry, RdapProbe, ScoutConfig,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ScoutConfig::default();
//!     let store = CacheStore::new(&config.cache_path);
//!     let mut cache = store.load_or_fresh(config.cache_capacity)?;
//!
//!     let hunter = Hunter::new(RdapProbe::new(&config)?, config);
//!     let entries = [PatternEntry::new("cvcv", vec![".com".to_string()])];
//!     let summary = hunter
//!         .hunt(&entries, &mut cache, Some(&store), &CancelFlag::new(), |_| {})
//!         .await?;
//!
//!     store.save(&cache)?;
//!     println!("{} available", summary.available);
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`pattern`]: grammar parsing, validation, sizing and generation
//! - [`probe`]: the availability probe trait and its RDAP implementation
//! - membership cache, cache store, pattern-file reader and hunter are
//!   re-exported at the crate root

pub use bitmap::{string_hash, CacheStats, MembershipCache};
pub use config::{
    env_config_from, load_env_config, parse_timeout_string, split_list, CacheConfig,
    ConfigManager, DefaultsConfig, EnvConfig, FileConfig,
};
pub use error::DomainScoutError;
pub use hunter::{domain_candidates, CancelFlag, HuntEvent, HuntSummary, Hunter};
pub use pattern::{
    analyze_pattern, combination_count, is_probe_candidate, parse_pattern, validate_extensions,
    validate_pattern, CombinationCount, CombinationGenerator, ParsedPattern, PatternSegment,
    SegmentKind,
};
pub use pattern_file::{load_pattern_file, parse_pattern_line, parse_pattern_source};
#[cfg(feature = "rdap")]
pub use probe::RdapProbe;
pub use probe::Probe;
pub use store::CacheStore;
pub use types::{PatternAnalysis, PatternEntry, ProbeOutcome, ScoutConfig, MAX_RATE_LIMIT};

// Public modules
pub mod pattern;
pub mod probe;

// Internal modules, reachable through the re-exports above
mod bitmap;
mod config;
mod error;
mod hunter;
mod pattern_file;
mod store;
mod types;

pub type Result<T> = std::result::Result<T, DomainScoutError>;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
