//! The hunt loop: generate, filter through the cache, probe, record.
//!
//! The hunter is the only writer of the membership cache while a hunt runs.
//! Probes execute concurrently, but their outcomes are folded back into the
//! cache from the driving task, so no locking is needed.

use crate::bitmap::MembershipCache;
use crate::error::DomainScoutError;
use crate::pattern::{analyze_pattern, is_probe_candidate, CombinationGenerator};
use crate::probe::Probe;
use crate::store::CacheStore;
use crate::types::{PatternAnalysis, PatternEntry, ProbeOutcome, ScoutConfig};
use futures::stream::{FuturesUnordered, StreamExt};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{Interval, MissedTickBehavior};

/// Shared stop signal. Setting it makes the hunter stop launching probes,
/// drain the ones in flight and return.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Progress notifications emitted during a hunt.
#[derive(Debug, Clone)]
pub enum HuntEvent {
    PatternStarted(PatternAnalysis),
    PatternRejected {
        pattern: String,
        error: DomainScoutError,
    },
    /// Domain was skipped because the cache says it was already checked
    Skipped(String),
    Checked(ProbeOutcome),
    Checkpoint {
        bits_set: u64,
    },
    PatternFinished {
        pattern: String,
    },
}

/// Totals for one hunt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HuntSummary {
    /// Entries that passed validation and were enumerated
    pub patterns: usize,
    pub rejected: usize,
    /// Probes that produced a definitive answer
    pub checked: usize,
    pub available: usize,
    pub failed: usize,
    pub skipped_cached: usize,
    pub cancelled: bool,
}

/// Every fully qualified domain a pattern analysis can produce, in
/// generator order, with each base expanded across all extensions.
///
/// Bases that fail [`is_probe_candidate`] are dropped.
pub fn domain_candidates(
    analysis: &PatternAnalysis,
) -> Result<impl Iterator<Item = String>, DomainScoutError> {
    let generator = CombinationGenerator::new(&analysis.parts)?;
    let extensions = analysis.extensions.clone();
    Ok(generator
        .filter(|base| {
            let keep = is_probe_candidate(base);
            if !keep {
                tracing::debug!(base = %base, "dropping non-candidate base");
            }
            keep
        })
        .flat_map(move |base| {
            extensions
                .clone()
                .into_iter()
                .map(move |ext| format!("{}{}", base, ext))
        }))
}

/// Drives probes for a list of pattern entries.
pub struct Hunter<P: Probe> {
    probe: P,
    config: ScoutConfig,
}

impl<P: Probe> Hunter<P> {
    pub fn new(probe: P, config: ScoutConfig) -> Self {
        Self { probe, config }
    }

    pub fn config(&self) -> &ScoutConfig {
        &self.config
    }

    /// Hunt every entry in order.
    ///
    /// Validation failures reject only their own entry. Successful probes
    /// are inserted into `cache`; failed ones are left out so they are tried
    /// again next run. When `store` is given the cache is saved every
    /// `checkpoint_every` recorded probes. The caller saves the final state.
    pub async fn hunt<F>(
        &self,
        entries: &[PatternEntry],
        cache: &mut MembershipCache,
        store: Option<&CacheStore>,
        cancel: &CancelFlag,
        mut on_event: F,
    ) -> Result<HuntSummary, DomainScoutError>
    where
        F: FnMut(HuntEvent),
    {
        let mut summary = HuntSummary::default();
        let mut ticker = self.rate_ticker();
        let mut since_checkpoint = 0usize;

        for entry in entries {
            if cancel.is_cancelled() {
                break;
            }

            let analysis = match analyze_pattern(entry) {
                Ok(analysis) => analysis,
                Err(error) => {
                    tracing::warn!(pattern = %entry.pattern, error = %error, "rejecting pattern");
                    summary.rejected += 1;
                    on_event(HuntEvent::PatternRejected {
                        pattern: entry.pattern.clone(),
                        error,
                    });
                    continue;
                }
            };

            let mut domains = match domain_candidates(&analysis) {
                Ok(domains) => domains,
                Err(error) => {
                    tracing::warn!(pattern = %entry.pattern, error = %error, "rejecting pattern");
                    summary.rejected += 1;
                    on_event(HuntEvent::PatternRejected {
                        pattern: entry.pattern.clone(),
                        error,
                    });
                    continue;
                }
            };

            tracing::info!(
                pattern = %analysis.pattern,
                combinations = %analysis.combination_count,
                domains = %analysis.total_domain_count,
                "starting pattern"
            );
            summary.patterns += 1;
            on_event(HuntEvent::PatternStarted(analysis));

            let mut in_flight = FuturesUnordered::new();
            let mut pending: Option<String> = None;
            let mut exhausted = false;

            loop {
                let can_launch = !exhausted
                    && !cancel.is_cancelled()
                    && in_flight.len() < self.config.concurrency;

                if !can_launch && in_flight.is_empty() {
                    break;
                }

                if can_launch && pending.is_none() {
                    match domains.next() {
                        None => exhausted = true,
                        Some(domain) if cache.test(&domain) => {
                            tracing::debug!(domain = %domain, "already checked");
                            summary.skipped_cached += 1;
                            on_event(HuntEvent::Skipped(domain));
                        }
                        Some(domain) => pending = Some(domain),
                    }
                    continue;
                }

                tokio::select! {
                    _ = next_tick(&mut ticker), if can_launch && pending.is_some() => {
                        if let Some(domain) = pending.take() {
                            let probe = &self.probe;
                            in_flight.push(async move { probe.probe(&domain).await });
                        }
                    }
                    Some(outcome) = in_flight.next(), if !in_flight.is_empty() => {
                        if outcome.success {
                            cache.insert(&outcome.domain);
                            summary.checked += 1;
                            since_checkpoint += 1;
                            if outcome.available {
                                summary.available += 1;
                            }
                        } else {
                            summary.failed += 1;
                        }
                        on_event(HuntEvent::Checked(outcome));

                        if let Some(store) = store {
                            if since_checkpoint >= self.config.checkpoint_every {
                                since_checkpoint = 0;
                                checkpoint(store, cache, &mut on_event);
                            }
                        }
                    }
                    else => break,
                }
            }

            tracing::info!(pattern = %entry.pattern, "finished pattern");
            on_event(HuntEvent::PatternFinished {
                pattern: entry.pattern.clone(),
            });
        }

        summary.cancelled = cancel.is_cancelled();
        if summary.cancelled {
            tracing::info!("hunt cancelled, in-flight probes drained");
        }
        Ok(summary)
    }

    fn rate_ticker(&self) -> Option<Interval> {
        self.config.rate_limit.map(|per_second| {
            // Very high rates round to zero, which `interval` rejects.
            let period = Duration::from_secs_f64(1.0 / f64::from(per_second.max(1)))
                .max(Duration::from_nanos(1));
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            ticker
        })
    }
}

async fn next_tick(ticker: &mut Option<Interval>) {
    if let Some(ticker) = ticker {
        ticker.tick().await;
    }
}

fn checkpoint<F: FnMut(HuntEvent)>(store: &CacheStore, cache: &MembershipCache, on_event: &mut F) {
    match store.save(cache) {
        Ok(()) => {
            let bits_set = cache.stats().bits_set;
            tracing::info!(bits_set, "cache checkpoint saved");
            on_event(HuntEvent::Checkpoint { bits_set });
        }
        Err(e) => tracing::warn!(error = %e, "cache checkpoint failed, continuing"),
    }
}
