//! RDAP-backed availability probe.
//!
//! A `404` from the registry means the domain is unregistered, a `200`
//! means it is taken. Rate limiting, server errors and transport failures
//! are retried with a short linear backoff; anything still unresolved is
//! reported as an unsuccessful probe.

use crate::error::DomainScoutError;
use crate::probe::registry::{extract_tld, rdap_endpoint};
use crate::probe::Probe;
use crate::types::{ProbeOutcome, ScoutConfig};
use reqwest::StatusCode;
use std::future::Future;
use std::time::{Duration, Instant};

const RETRY_BACKOFF: Duration = Duration::from_millis(500);

#[derive(Clone)]
pub struct RdapProbe {
    http_client: reqwest::Client,
    /// Budget for the whole probe, retries included
    timeout: Duration,
    retries: u32,
}

impl RdapProbe {
    /// Create a probe using the timeout and retry settings of `config`.
    pub fn new(config: &ScoutConfig) -> Result<Self, DomainScoutError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("domain-scout/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                DomainScoutError::network_with_source(
                    "Failed to create RDAP HTTP client",
                    e.to_string(),
                )
            })?;

        Ok(Self {
            http_client,
            timeout: config.timeout,
            retries: config.retries,
        })
    }

    /// RDAP lookup URL for `domain`.
    pub fn lookup_url(domain: &str) -> Result<String, DomainScoutError> {
        let tld = extract_tld(domain)?;
        Ok(format!("{}{}", rdap_endpoint(&tld), domain))
    }

    async fn check_with_retries(&self, domain: &str) -> Result<bool, DomainScoutError> {
        let url = Self::lookup_url(domain)?;
        let mut attempt = 0;
        loop {
            match self.request(&url, domain).await {
                Err(e) if e.is_retryable() && attempt < self.retries => {
                    attempt += 1;
                    tracing::debug!(domain, attempt, error = %e, "retrying RDAP lookup");
                    tokio::time::sleep(RETRY_BACKOFF * attempt).await;
                }
                result => return result,
            }
        }
    }

    /// One RDAP request. `Ok(true)` means available.
    async fn request(&self, url: &str, domain: &str) -> Result<bool, DomainScoutError> {
        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| self.request_error(e))?;
        classify_status(domain, response.status())
    }

    /// Report client-side timeouts with the configured budget.
    fn request_error(&self, err: reqwest::Error) -> DomainScoutError {
        if err.is_timeout() {
            DomainScoutError::timeout("RDAP request", self.timeout)
        } else {
            err.into()
        }
    }
}

/// Map an RDAP HTTP status to availability.
fn classify_status(domain: &str, status: StatusCode) -> Result<bool, DomainScoutError> {
    match status {
        StatusCode::OK => Ok(false),
        StatusCode::NOT_FOUND => Ok(true),
        StatusCode::TOO_MANY_REQUESTS => Err(DomainScoutError::RateLimited {
            service: "RDAP".to_string(),
            message: format!("lookup of {} was throttled", domain),
        }),
        code => Err(DomainScoutError::rdap_with_status(
            domain,
            format!("RDAP server returned {}", code),
            code.as_u16(),
        )),
    }
}

impl Probe for RdapProbe {
    fn probe(&self, domain: &str) -> impl Future<Output = ProbeOutcome> + Send {
        let domain = domain.to_string();
        async move {
            let start = Instant::now();
            let result = tokio::time::timeout(self.timeout, self.check_with_retries(&domain)).await;
            let elapsed = start.elapsed();

            match result {
                Ok(Ok(available)) => ProbeOutcome::answered(&domain, available, elapsed),
                Ok(Err(e)) => {
                    tracing::warn!(domain = %domain, error = %e, "probe failed");
                    ProbeOutcome::failed(&domain, e, elapsed)
                }
                Err(_) => {
                    let e = DomainScoutError::timeout("RDAP lookup", self.timeout);
                    tracing::warn!(domain = %domain, error = %e, "probe timed out");
                    ProbeOutcome::failed(&domain, e, elapsed)
                }
            }
        }
    }
}
