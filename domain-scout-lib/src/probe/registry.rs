//! RDAP endpoint table.
//!
//! Maps TLDs to their registry's RDAP base URL. TLDs not listed go through
//! the public rdap.org redirector.

use crate::error::DomainScoutError;
use std::collections::HashMap;

/// Redirector used for TLDs without a direct entry.
pub const RDAP_FALLBACK_ENDPOINT: &str = "https://rdap.org/domain/";

lazy_static::lazy_static! {
    static ref RDAP_ENDPOINTS: HashMap<&'static str, &'static str> = HashMap::from([
        ("com", "https://rdap.verisign.com/com/v1/domain/"),
        ("net", "https://rdap.verisign.com/net/v1/domain/"),
        ("org", "https://rdap.publicinterestregistry.org/rdap/domain/"),
        ("info", "https://rdap.identitydigital.services/rdap/domain/"),
        ("biz", "https://rdap.nic.biz/domain/"),
        ("app", "https://pubapi.registry.google/rdap/domain/"),
        ("dev", "https://pubapi.registry.google/rdap/domain/"),
        ("page", "https://pubapi.registry.google/rdap/domain/"),
        ("xyz", "https://rdap.centralnic.com/xyz/domain/"),
        ("tech", "https://rdap.centralnic.com/tech/domain/"),
        ("online", "https://rdap.centralnic.com/online/domain/"),
        ("site", "https://rdap.centralnic.com/site/domain/"),
        ("shop", "https://rdap.gmoregistry.net/rdap/domain/"),
        ("ai", "https://rdap.identitydigital.services/rdap/domain/"),
        ("io", "https://rdap.identitydigital.services/rdap/domain/"),
        ("me", "https://rdap.identitydigital.services/rdap/domain/"),
        ("us", "https://rdap.nic.us/domain/"),
        ("uk", "https://rdap.nominet.uk/domain/"),
        ("de", "https://rdap.denic.de/domain/"),
        ("fr", "https://rdap.nic.fr/domain/"),
        ("nl", "https://rdap.sidn.nl/domain/"),
        ("tv", "https://rdap.nic.tv/domain/"),
        ("cc", "https://tld-rdap.verisign.com/cc/v1/domain/"),
    ]);
}

/// RDAP base URL for `tld`, falling back to the redirector.
pub fn rdap_endpoint(tld: &str) -> &'static str {
    RDAP_ENDPOINTS
        .get(tld.to_ascii_lowercase().as_str())
        .copied()
        .unwrap_or(RDAP_FALLBACK_ENDPOINT)
}

/// Last dot-separated label of `domain`, lower-cased.
pub fn extract_tld(domain: &str) -> Result<String, DomainScoutError> {
    match domain.rsplit_once('.') {
        Some((base, tld)) if !base.is_empty() && !tld.is_empty() => Ok(tld.to_lowercase()),
        _ => Err(DomainScoutError::internal(format!(
            "'{}' is not a fully qualified domain",
            domain
        ))),
    }
}
