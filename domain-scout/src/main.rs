//! Domain Scout CLI Application
//!
//! Reads domain patterns, sizes them, and probes every candidate the
//! membership cache has not seen before.

mod ui;

use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::Parser;
use domain_scout_lib::{
    analyze_pattern, domain_candidates, load_env_config, load_pattern_file, parse_pattern_source,
    parse_timeout_string, CacheStore, CancelFlag, ConfigManager, DomainScoutError, HuntEvent,
    Hunter, MembershipCache, PatternEntry, RdapProbe, ScoutConfig, MAX_RATE_LIMIT,
};
use std::io::Read;
use std::path::PathBuf;
use std::process;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

/// CLI arguments for domain-scout
#[derive(Parser, Debug, Default)]
#[command(name = "domain-scout")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Hunt for available domain names described by compact patterns")]
#[command(
    long_about = "Hunt for available domain names described by compact patterns.\n\nPattern tokens: c=consonant, v=vowel, n=digit, l=letter, _=letter/digit/hyphen, -=hyphen.\nAny other characters are kept as literal text. Domains already checked are remembered\nin a cache file and skipped on later runs."
)]
#[command(styles = STYLES)]
pub struct Args {
    /// Patterns to hunt (e.g. cvcv, getll, shop-nn)
    #[arg(value_name = "PATTERNS", help_heading = "Pattern Selection")]
    pub patterns: Vec<String>,

    /// Pattern file, one `PATTERN [; ext=.a,.b] [# comment]` per line ("-" for stdin)
    #[arg(
        short = 'f',
        long = "file",
        value_name = "FILE",
        help_heading = "Pattern Selection"
    )]
    pub file: Option<String>,

    /// Extensions for positional patterns (comma-separated, e.g. .com,.io)
    #[arg(short = 'e', long = "ext", value_name = "EXT", value_delimiter = ',', help_heading = "Pattern Selection")]
    pub extensions: Option<Vec<String>>,

    /// Print segment breakdown and counts without probing
    #[arg(long = "analyze", help_heading = "Mode")]
    pub analyze: bool,

    /// Print the domains that would be probed without probing
    #[arg(long = "dry-run", help_heading = "Mode")]
    pub dry_run: bool,

    /// Stop a dry run after this many domains
    #[arg(long = "limit", value_name = "N", help_heading = "Mode")]
    pub limit: Option<usize>,

    /// Max probes in flight (default: 10, max: 100)
    #[arg(short = 'c', long = "concurrency", value_name = "N", help_heading = "Performance")]
    pub concurrency: Option<usize>,

    /// Max probes started per second (0 = unlimited, max: 10000)
    #[arg(long = "rate", value_name = "PER_SEC", help_heading = "Performance")]
    pub rate: Option<u32>,

    /// Per-probe timeout, e.g. 5s or 1m
    #[arg(long = "timeout", value_name = "DURATION", help_heading = "Performance")]
    pub timeout: Option<String>,

    /// Retries after a transient probe failure
    #[arg(long = "retries", value_name = "N", help_heading = "Performance")]
    pub retries: Option<u32>,

    /// Cache file location
    #[arg(long = "cache", value_name = "PATH", help_heading = "Cache")]
    pub cache: Option<PathBuf>,

    /// Bits in a newly created cache
    #[arg(long = "capacity", value_name = "BITS", help_heading = "Cache")]
    pub capacity: Option<u64>,

    /// Ignore the cache file entirely (nothing is loaded or saved)
    #[arg(long = "no-cache", help_heading = "Cache")]
    pub no_cache: bool,

    /// Print cache statistics at the end
    #[arg(long = "stats", help_heading = "Cache")]
    pub stats: bool,

    /// Emit one JSON object per line
    #[arg(short = 'j', long = "json", help_heading = "Output Format")]
    pub json: bool,

    /// Use specific config file instead of automatic discovery
    #[arg(long = "config", value_name = "FILE", help_heading = "Configuration")]
    pub config: Option<String>,

    /// Verbose logging (overridden by RUST_LOG)
    #[arg(short = 'v', long = "verbose", help_heading = "Configuration")]
    pub verbose: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Err(e) = validate_args(&args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }

    init_logging(args.verbose);

    if let Err(e) = run(args).await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Validate command line arguments
fn validate_args(args: &Args) -> Result<(), String> {
    if args.patterns.is_empty() && args.file.is_none() {
        return Err("You must specify patterns or a pattern file with --file".to_string());
    }

    if args.analyze && args.dry_run {
        return Err("Cannot specify both --analyze and --dry-run".to_string());
    }

    if args.limit.is_some() && !args.dry_run {
        return Err("--limit only applies to --dry-run".to_string());
    }

    if let Some(concurrency) = args.concurrency {
        if concurrency == 0 || concurrency > 100 {
            return Err("Concurrency must be between 1 and 100".to_string());
        }
    }

    if let Some(rate) = args.rate {
        if rate > MAX_RATE_LIMIT {
            return Err(format!(
                "Rate must be between 0 and {} probes per second",
                MAX_RATE_LIMIT
            ));
        }
    }

    if let Some(timeout) = &args.timeout {
        if parse_timeout_string(timeout).is_none() {
            return Err(format!(
                "Invalid timeout '{}'. Use a non-zero value like '5s', '30s', '2m'",
                timeout
            ));
        }
    }

    if args.capacity == Some(0) {
        return Err("Cache capacity must be greater than zero".to_string());
    }

    Ok(())
}

/// Logs go to stderr. `RUST_LOG` wins, then `--verbose`, then warnings only.
fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = build_config(&args)?;
    let entries = collect_entries(&args, &config)?;

    if args.analyze {
        return run_analyze(&entries, &args);
    }

    let store = if args.no_cache {
        None
    } else {
        Some(CacheStore::new(&config.cache_path))
    };
    let mut cache = match &store {
        Some(store) => store.load_or_fresh(config.cache_capacity)?,
        None => MembershipCache::new(config.cache_capacity)?,
    };

    if args.dry_run {
        run_dry_run(&entries, &cache, &args)?;
    } else {
        run_hunt(&entries, &mut cache, store.as_ref(), config, &args).await?;
    }

    if args.stats {
        ui::print_cache_stats(&cache.stats(), store.as_ref().map(CacheStore::path));
    }
    Ok(())
}

/// Build configuration: defaults, then config file, then `DS_*`, then CLI.
fn build_config(args: &Args) -> Result<ScoutConfig, Box<dyn std::error::Error>> {
    let mut config = ScoutConfig::default();
    let config_manager = ConfigManager::new(args.verbose);
    let env_config = load_env_config();

    if let Some(path) = args.config.as_ref().or(env_config.config.as_ref()) {
        tracing::debug!(path = %path, "using explicit config file");
        let file_config = config_manager
            .load_file(path)
            .map_err(|e| format!("Failed to load config file '{}': {}", path, e))?;
        config = file_config.apply(config);
    } else {
        config = config_manager.discover_and_load()?.apply(config);
    }

    config = env_config.apply(config);
    Ok(apply_cli_args_to_config(config, args))
}

/// Apply CLI arguments to config (highest precedence).
fn apply_cli_args_to_config(mut config: ScoutConfig, args: &Args) -> ScoutConfig {
    if let Some(concurrency) = args.concurrency {
        config = config.with_concurrency(concurrency);
    }
    if let Some(rate) = args.rate {
        config = config.with_rate_limit(rate);
    }
    if let Some(secs) = args.timeout.as_deref().and_then(parse_timeout_string) {
        config = config.with_timeout(Duration::from_secs(secs));
    }
    if let Some(retries) = args.retries {
        config = config.with_retries(retries);
    }
    if let Some(path) = &args.cache {
        config = config.with_cache_path(path.clone());
    }
    if let Some(capacity) = args.capacity {
        config = config.with_cache_capacity(capacity);
    }
    config
}

/// Gather entries from positional patterns and the pattern file.
///
/// Malformed file lines are reported and skipped.
fn collect_entries(
    args: &Args,
    config: &ScoutConfig,
) -> Result<Vec<PatternEntry>, Box<dyn std::error::Error>> {
    let extensions = args
        .extensions
        .clone()
        .unwrap_or_else(|| config.default_extensions.clone());

    let mut entries: Vec<PatternEntry> = args
        .patterns
        .iter()
        .map(|p| PatternEntry::new(p.as_str(), extensions.clone()))
        .collect();

    if let Some(file) = &args.file {
        let parsed = if file == "-" {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            parse_pattern_source(&text, &config.default_extensions)
        } else {
            load_pattern_file(file, &config.default_extensions)?
        };

        for line in parsed {
            match line {
                Ok(entry) => entries.push(entry),
                Err(e) => ui::print_warning(&e.to_string()),
            }
        }
    }

    if entries.is_empty() {
        return Err("No patterns to process".into());
    }
    Ok(entries)
}

fn run_analyze(entries: &[PatternEntry], args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let mut valid = 0;
    for entry in entries {
        match analyze_pattern(entry) {
            Ok(analysis) => {
                valid += 1;
                if args.json {
                    println!("{}", serde_json::to_string(&ui::AnalysisReport::from(&analysis))?);
                } else {
                    ui::print_analysis(&analysis);
                }
            }
            Err(e) => ui::print_rejected(&entry.pattern, &e),
        }
    }
    require_some_valid(valid, entries.len())
}

fn run_dry_run(
    entries: &[PatternEntry],
    cache: &MembershipCache,
    args: &Args,
) -> Result<(), Box<dyn std::error::Error>> {
    let limit = args.limit.unwrap_or(usize::MAX);
    let mut valid = 0;
    let mut printed = 0usize;
    let mut skipped = 0usize;

    for entry in entries {
        if printed >= limit {
            break;
        }
        let analysis = match analyze_pattern(entry) {
            Ok(analysis) => analysis,
            Err(e) => {
                ui::print_rejected(&entry.pattern, &e);
                continue;
            }
        };
        let domains = match domain_candidates(&analysis) {
            Ok(domains) => domains,
            Err(e) => {
                ui::print_rejected(&entry.pattern, &e);
                continue;
            }
        };
        valid += 1;

        for domain in domains {
            if printed >= limit {
                break;
            }
            if cache.test(&domain) {
                skipped += 1;
                continue;
            }
            if args.json {
                println!("{}", serde_json::to_string(&domain)?);
            } else {
                println!("{}", domain);
            }
            printed += 1;
        }
    }

    require_some_valid(valid, entries.len())?;
    eprintln!(
        "{} domains would be checked ({} already in cache)",
        printed, skipped
    );
    Ok(())
}

async fn run_hunt(
    entries: &[PatternEntry],
    cache: &mut MembershipCache,
    store: Option<&CacheStore>,
    config: ScoutConfig,
    args: &Args,
) -> Result<(), Box<dyn std::error::Error>> {
    let probe = RdapProbe::new(&config)?;
    let hunter = Hunter::new(probe, config);

    let cancel = CancelFlag::new();
    let signal_flag = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ui::print_warning("Interrupted, waiting for in-flight probes...");
            signal_flag.cancel();
        }
    });

    let json = args.json;
    let start = Instant::now();
    let result = hunter
        .hunt(entries, cache, store, &cancel, |event| {
            if let Err(e) = ui::print_event(&event, json) {
                tracing::warn!(error = %e, "failed to write event");
            }
        })
        .await;

    // Persist whatever was recorded, even if the hunt stopped early.
    if let Some(store) = store {
        store.save(cache)?;
    }

    let summary = result?;
    ui::print_summary(&summary, start.elapsed());

    if summary.patterns == 0 && summary.rejected > 0 {
        return Err(no_valid_patterns(summary.rejected).into());
    }
    Ok(())
}

fn require_some_valid(valid: usize, total: usize) -> Result<(), Box<dyn std::error::Error>> {
    if valid == 0 {
        Err(no_valid_patterns(total).into())
    } else {
        Ok(())
    }
}

fn no_valid_patterns(rejected: usize) -> DomainScoutError {
    DomainScoutError::config(format!(
        "No valid patterns ({} rejected)",
        rejected
    ))
}
