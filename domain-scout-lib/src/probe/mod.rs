//! Availability probes.
//!
//! The hunter only needs the [`ProbeOutcome`] shape; how a probe decides is
//! up to the implementation. [`RdapProbe`] is the network-backed one.

use crate::types::ProbeOutcome;
use std::future::Future;

#[cfg(feature = "rdap")]
pub mod rdap;
pub mod registry;

#[cfg(feature = "rdap")]
pub use rdap::RdapProbe;
pub use registry::{extract_tld, rdap_endpoint, RDAP_FALLBACK_ENDPOINT};

/// Checks whether a fully qualified domain is registered.
///
/// Implementations never fail outright: problems are reported through
/// `ProbeOutcome::success == false` so the caller can leave the domain
/// unrecorded and try it again on a later run.
pub trait Probe: Send + Sync {
    fn probe(&self, domain: &str) -> impl Future<Output = ProbeOutcome> + Send;
}
