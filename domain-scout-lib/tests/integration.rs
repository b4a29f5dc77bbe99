// domain-scout-lib/tests/integration.rs

//! Integration tests for domain-scout-lib exports and end-to-end hunting

use domain_scout_lib::{
    analyze_pattern, domain_candidates, parse_pattern_source, validate_pattern, CacheStore,
    CancelFlag, DomainScoutError, HuntEvent, Hunter, MembershipCache, PatternEntry, Probe,
    ProbeOutcome, ScoutConfig,
};
use std::collections::HashSet;
use std::future::Future;
use std::time::Duration;
use tempfile::TempDir;

/// Answers from a fixed set of registered names.
struct RegisteredNames(HashSet<String>);

impl RegisteredNames {
    fn new(names: &[&str]) -> Self {
        Self(names.iter().map(|n| n.to_string()).collect())
    }
}

impl Probe for RegisteredNames {
    fn probe(&self, domain: &str) -> impl Future<Output = ProbeOutcome> + Send {
        let available = !self.0.contains(domain);
        let domain = domain.to_string();
        async move { ProbeOutcome::answered(&domain, available, Duration::ZERO) }
    }
}

fn entry(pattern: &str, exts: &[&str]) -> PatternEntry {
    PatternEntry::new(pattern, exts.iter().map(|e| e.to_string()).collect())
}

#[test]
fn test_analysis_examples() {
    let analysis = analyze_pattern(&entry("ll", &[".com", ".net", ".org"])).unwrap();
    assert_eq!(analysis.combination_count.value(), 676);
    assert_eq!(analysis.total_domain_count.value(), 2028);

    let analysis = analyze_pattern(&entry("getcv", &[".io"])).unwrap();
    assert_eq!(analysis.combination_count.value(), 105);

    let analysis = analyze_pattern(&entry("shop", &[".com"])).unwrap();
    assert_eq!(analysis.combination_count.value(), 1);
}

#[test]
fn test_validation_errors_are_returned_verbatim() {
    assert!(matches!(
        validate_pattern("-test"),
        Err(DomainScoutError::LeadingHyphen)
    ));
    let err = analyze_pattern(&entry("ll", &["com"])).unwrap_err();
    assert!(err.is_validation());
    assert!(err.to_string().contains("must start with '.'"));
}

#[test]
fn test_candidates_cover_the_whole_space_once() {
    let analysis = analyze_pattern(&entry("cv", &[".com", ".io"])).unwrap();
    let domains: Vec<String> = domain_candidates(&analysis).unwrap().collect();
    let unique: HashSet<&String> = domains.iter().collect();

    assert_eq!(domains.len(), 21 * 5 * 2);
    assert_eq!(unique.len(), domains.len());
    assert!(domains.contains(&"ba.com".to_string()));
    assert!(domains.contains(&"zu.io".to_string()));
}

#[test]
fn test_wildcard_pruning_end_to_end() {
    let analysis = analyze_pattern(&entry("l_l", &[".com"])).unwrap();
    let domains: Vec<String> = domain_candidates(&analysis).unwrap().collect();

    // Hyphen in the middle is allowed; nothing else is pruned here.
    assert_eq!(domains.len(), 26 * 37 * 26);
    assert!(domains.contains(&"a-b.com".to_string()));
    assert!(domains.iter().all(|d| !d.starts_with('-')));
}

#[test]
fn test_pattern_source_feeds_analysis() {
    let defaults = vec![".com".to_string()];
    let text = "# wishlist\ncvcv ; ext=.io,.ai\nshop-nn\n";
    let entries: Vec<PatternEntry> = parse_pattern_source(text, &defaults)
        .into_iter()
        .collect::<Result<_, _>>()
        .unwrap();

    assert_eq!(entries.len(), 2);
    let first = analyze_pattern(&entries[0]).unwrap();
    assert_eq!(first.total_domain_count.value(), 21 * 5 * 21 * 5 * 2);
    let second = analyze_pattern(&entries[1]).unwrap();
    assert_eq!(second.extensions, defaults);
    assert_eq!(second.total_domain_count.value(), 100);
}

#[test]
fn test_cache_survives_store_round_trip() {
    let dir = TempDir::new().unwrap();
    let store = CacheStore::new(dir.path().join("nested").join("scout.cache"));

    let mut cache = MembershipCache::new(4096).unwrap();
    cache.insert("example.com");
    cache.insert("brava.io");
    store.save(&cache).unwrap();

    let restored = store.load().unwrap().unwrap();
    assert_eq!(restored, cache);
    assert!(restored.test("example.com"));
    assert!(restored.test("brava.io"));
}

#[test]
fn test_hunt_reports_available_and_resumes_from_cache() {
    let dir = TempDir::new().unwrap();
    let config = ScoutConfig::default()
        .with_cache_path(dir.path().join("scout.cache"))
        .with_cache_capacity(1_000_000)
        .with_concurrency(8);
    let store = CacheStore::new(&config.cache_path);
    let entries = [entry("lv", &[".com"])];

    let hunter = Hunter::new(RegisteredNames::new(&["ba.com", "zu.com"]), config.clone());
    let mut cache = store.load_or_fresh(config.cache_capacity).unwrap();
    let mut available = Vec::new();

    let first = tokio_test::block_on(hunter.hunt(
        &entries,
        &mut cache,
        Some(&store),
        &CancelFlag::new(),
        |event| {
            if let HuntEvent::Checked(outcome) = event {
                if outcome.available {
                    available.push(outcome.domain);
                }
            }
        },
    ))
    .unwrap();
    store.save(&cache).unwrap();

    assert_eq!(first.patterns, 1);
    assert_eq!(first.checked + first.skipped_cached, 26 * 5);
    assert_eq!(first.available, available.len());
    assert!(!available.contains(&"ba.com".to_string()));
    assert!(!available.contains(&"zu.com".to_string()));

    // A second run over the same pattern has nothing left to probe.
    let mut cache = store.load_or_fresh(config.cache_capacity).unwrap();
    let second = tokio_test::block_on(hunter.hunt(
        &entries,
        &mut cache,
        Some(&store),
        &CancelFlag::new(),
        |_| {},
    ))
    .unwrap();

    assert_eq!(second.checked, 0);
    assert_eq!(second.skipped_cached, 26 * 5);
}

#[test]
fn test_hunt_rejects_only_invalid_entries() {
    let config = ScoutConfig::default().with_cache_capacity(10_000);
    let hunter = Hunter::new(RegisteredNames::new(&[]), config);
    let mut cache = MembershipCache::new(10_000).unwrap();
    let entries = [entry("te--st", &[".com"]), entry("nn", &[".io"])];

    let summary = tokio_test::block_on(hunter.hunt(
        &entries,
        &mut cache,
        None,
        &CancelFlag::new(),
        |_| {},
    ))
    .unwrap();

    assert_eq!(summary.rejected, 1);
    assert_eq!(summary.patterns, 1);
    // Every `nn` base starts with a digit, so nothing is probed.
    assert_eq!(summary.checked, 0);
}
