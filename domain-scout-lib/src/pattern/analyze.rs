//! Pattern sizing.
//!
//! Reports how large a pattern's combinatorial space is without generating
//! anything. Counts are carried as `u128` with explicit saturation, so a
//! pattern like `________________________________` yields a flagged ceiling
//! instead of a silently wrapped number.

use crate::error::DomainScoutError;
use crate::pattern::parser::{parse_pattern, ParsedPattern};
use crate::pattern::validate::{validate_extensions, validate_pattern};
use crate::types::{PatternAnalysis, PatternEntry};
use serde::{Serialize, Serializer};
use std::fmt;

/// A combination count that saturates at `u128::MAX` and remembers it did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CombinationCount {
    value: u128,
    saturated: bool,
}

impl CombinationCount {
    pub const ONE: Self = Self {
        value: 1,
        saturated: false,
    };

    /// An exact count.
    pub fn exact(value: u128) -> Self {
        Self {
            value,
            saturated: false,
        }
    }

    /// Multiply, saturating (and flagging) on overflow.
    pub fn times(self, factor: u128) -> Self {
        match self.value.checked_mul(factor) {
            Some(value) => Self {
                value,
                saturated: self.saturated,
            },
            None => Self {
                value: u128::MAX,
                saturated: true,
            },
        }
    }

    /// The count, or `u128::MAX` when saturated.
    pub fn value(&self) -> u128 {
        self.value
    }

    /// Whether the true count exceeded `u128::MAX`.
    pub fn is_saturated(&self) -> bool {
        self.saturated
    }

    /// The exact count if it was not saturated.
    pub fn exact_value(&self) -> Option<u128> {
        if self.saturated {
            None
        } else {
            Some(self.value)
        }
    }
}

impl fmt::Display for CombinationCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.saturated {
            write!(f, ">{}", self.value)
        } else {
            write!(f, "{}", self.value)
        }
    }
}

/// Counts that fit in a `u64` serialize as JSON numbers, larger ones as
/// their decimal string so no consumer silently loses precision.
impl Serialize for CombinationCount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match u64::try_from(self.value) {
            Ok(small) if !self.saturated => serializer.serialize_u64(small),
            _ => serializer.collect_str(self),
        }
    }
}

/// Product of every segment's alphabet size.
///
/// Literal segments have a single-element alphabet and so contribute a
/// factor of one.
pub fn combination_count(parsed: &ParsedPattern) -> CombinationCount {
    parsed
        .segments()
        .iter()
        .fold(CombinationCount::ONE, |acc, seg| acc.times(seg.radix() as u128))
}

/// Validate, parse and size a pattern entry.
///
/// Validation errors are returned as-is, pattern checks first, then
/// extension checks.
///
/// # Examples
///
/// ```
/// use domain_scout_lib::{analyze_pattern, PatternEntry};
///
/// let entry = PatternEntry::new("ll", vec![".com".into(), ".net".into(), ".org".into()]);
/// let analysis = analyze_pattern(&entry).unwrap();
/// assert_eq!(analysis.combination_count.value(), 676);
/// assert_eq!(analysis.total_domain_count.value(), 2028);
/// ```
pub fn analyze_pattern(entry: &PatternEntry) -> Result<PatternAnalysis, DomainScoutError> {
    validate_pattern(&entry.pattern)?;
    validate_extensions(&entry.extensions)?;

    let parts = parse_pattern(&entry.pattern);
    let combinations = combination_count(&parts);
    let total = combinations.times(entry.extensions.len() as u128);

    Ok(PatternAnalysis {
        pattern: entry.pattern.clone(),
        extensions: entry.extensions.clone(),
        parts,
        combination_count: combinations,
        total_domain_count: total,
    })
}
