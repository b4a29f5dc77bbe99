//! Combination generator.
//!
//! Enumerates the Cartesian product of a parsed pattern's alphabets in a
//! random, non-repeating order. Each combination is addressed by an integer
//! index decoded as a mixed-radix number (first segment least significant).
//! Indices whose decoded string breaks domain syntax are skipped, so the
//! generator can yield fewer strings than the combination count.
//!
//! Two traversal orders cover the same contract:
//!
//! - up to [`SHUFFLE_LIMIT`] indices: the full index list is materialised
//!   and Fisher-Yates shuffled
//! - above that: a keyed [`FeistelPermutation`] walks the index space in
//!   O(1) memory
//!
//! # Examples
//!
//! ```
//! use domain_scout_lib::pattern::{parse_pattern, CombinationGenerator};
//!
//! let parsed = parse_pattern("lv");
//! let names: Vec<String> = CombinationGenerator::new(&parsed).unwrap().collect();
//! assert_eq!(names.len(), 26 * 5);
//! ```

use crate::error::DomainScoutError;
use crate::pattern::analyze::combination_count;
use crate::pattern::parser::{ParsedPattern, PatternSegment, SegmentKind};
use crate::pattern::permutation::FeistelPermutation;
use rand::seq::SliceRandom;
use rand::Rng;

/// Largest index space that is materialised and shuffled in memory.
pub const SHUFFLE_LIMIT: u128 = 1 << 20;

/// How the generator orders the index space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraversalStrategy {
    /// Shuffle up to [`SHUFFLE_LIMIT`], permute above it
    Auto,
    /// Always materialise and shuffle the full index list
    Shuffle,
    /// Always use the Feistel permutation
    Permute,
}

enum Traversal {
    Shuffled(std::vec::IntoIter<u32>),
    Permuted {
        permutation: FeistelPermutation,
        next: u128,
    },
}

impl Traversal {
    fn next_index(&mut self) -> Option<u128> {
        match self {
            Self::Shuffled(indices) => indices.next().map(u128::from),
            Self::Permuted { permutation, next } => {
                if *next >= permutation.len() {
                    return None;
                }
                let index = permutation.permute(*next);
                *next += 1;
                Some(index)
            }
        }
    }
}

/// Lazy, finite, non-restartable stream of candidate base names.
pub struct CombinationGenerator {
    segments: Vec<PatternSegment>,
    traversal: Traversal,
    total: u128,
    visited: u128,
}

impl CombinationGenerator {
    /// Create a generator with a thread-local random order.
    pub fn new(parsed: &ParsedPattern) -> Result<Self, DomainScoutError> {
        Self::with_rng(parsed, &mut rand::thread_rng())
    }

    /// Create a generator whose order is drawn from `rng`.
    pub fn with_rng<R: Rng + ?Sized>(
        parsed: &ParsedPattern,
        rng: &mut R,
    ) -> Result<Self, DomainScoutError> {
        Self::with_strategy(parsed, TraversalStrategy::Auto, rng)
    }

    /// Create a generator with an explicit traversal strategy.
    ///
    /// Fails with [`DomainScoutError::PatternTooLarge`] when the combination
    /// count saturated, or when a shuffle is forced on a space too large to
    /// index with `u32`.
    pub fn with_strategy<R: Rng + ?Sized>(
        parsed: &ParsedPattern,
        strategy: TraversalStrategy,
        rng: &mut R,
    ) -> Result<Self, DomainScoutError> {
        let pattern_text = describe(parsed);
        let count = combination_count(parsed)
            .exact_value()
            .ok_or_else(|| DomainScoutError::pattern_too_large(&pattern_text))?;

        // No segments means nothing to emit, not one empty string.
        let total = if parsed.is_empty() { 0 } else { count };

        let shuffle = match strategy {
            TraversalStrategy::Auto => total <= SHUFFLE_LIMIT,
            TraversalStrategy::Shuffle => true,
            TraversalStrategy::Permute => false,
        };

        let traversal = if shuffle {
            let len = u32::try_from(total)
                .map_err(|_| DomainScoutError::pattern_too_large(&pattern_text))?;
            let mut indices: Vec<u32> = (0..len).collect();
            indices.shuffle(rng);
            Traversal::Shuffled(indices.into_iter())
        } else {
            Traversal::Permuted {
                permutation: FeistelPermutation::new(total, rng),
                next: 0,
            }
        };

        tracing::debug!(
            pattern = %pattern_text,
            combinations = %total,
            shuffled = shuffle,
            "combination generator ready"
        );

        Ok(Self {
            segments: parsed.segments().to_vec(),
            traversal,
            total,
            visited: 0,
        })
    }

    /// Size of the index space being traversed.
    pub fn total_indices(&self) -> u128 {
        self.total
    }

    /// Indices not yet visited (emitted or pruned).
    pub fn remaining_indices(&self) -> u128 {
        self.total - self.visited
    }

    /// Decode one index into a candidate, or `None` if it is pruned.
    fn decode(&self, index: u128) -> Option<String> {
        let mut rest = index;
        let mut out = String::new();

        for segment in &self.segments {
            let radix = segment.radix() as u128;
            let digit = (rest % radix) as usize;
            rest /= radix;
            let piece = &segment.alphabet[digit];

            // Literals are emitted as one unit and bypass per-character pruning.
            if segment.kind != SegmentKind::Literal {
                let ch = piece.chars().next()?;
                if out.is_empty() && (ch == '-' || ch.is_ascii_digit()) {
                    return None;
                }
                if ch == '-' && out.ends_with('-') {
                    return None;
                }
            }
            out.push_str(piece);
        }

        if out.ends_with('-') {
            return None;
        }
        Some(out)
    }
}

impl Iterator for CombinationGenerator {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        loop {
            let index = self.traversal.next_index()?;
            self.visited += 1;
            if let Some(candidate) = self.decode(index) {
                return Some(candidate);
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, usize::try_from(self.remaining_indices()).ok())
    }
}

/// Final gate applied by callers before a generated base is used.
///
/// Rejects empty names, names starting with a digit or hyphen, and names
/// ending with a hyphen. The generator prunes most of these already, but
/// literal segments are not pruned per character.
pub fn is_probe_candidate(base: &str) -> bool {
    match base.chars().next() {
        None => false,
        Some(first) => first != '-' && !first.is_ascii_digit() && !base.ends_with('-'),
    }
}

/// Rebuild a readable pattern-like label for log and error messages.
fn describe(parsed: &ParsedPattern) -> String {
    parsed
        .segments()
        .iter()
        .map(|s| match s.kind {
            SegmentKind::Literal => s.alphabet[0].clone(),
            SegmentKind::Consonant => "c".to_string(),
            SegmentKind::Vowel => "v".to_string(),
            SegmentKind::Digit => "n".to_string(),
            SegmentKind::Letter => "l".to_string(),
            SegmentKind::Wildcard => "_".to_string(),
            SegmentKind::Hyphen => "-".to_string(),
        })
        .collect()
}
