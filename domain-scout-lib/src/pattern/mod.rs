//! Pattern grammar engine.
//!
//! A pattern is a compact description of a family of base names:
//!
//! | Token        | Meaning                                   | Choices |
//! |--------------|-------------------------------------------|---------|
//! | `c` / `C`    | consonant                                 | 21      |
//! | `v` / `V`    | vowel                                     | 5       |
//! | `n` / `N`    | digit                                     | 10      |
//! | `l` / `L`    | letter                                    | 26      |
//! | `_`          | letter, digit or hyphen                   | 37      |
//! | `-`          | hyphen                                    | 1       |
//! | anything else| literal text (lower-cased, kept together) | 1       |
//!
//! The pipeline is parse → validate → analyze (sizing) → generate.

pub mod analyze;
pub mod generate;
pub mod parser;
pub mod permutation;
pub mod validate;

pub use analyze::{analyze_pattern, combination_count, CombinationCount};
pub use generate::{is_probe_candidate, CombinationGenerator, TraversalStrategy, SHUFFLE_LIMIT};
pub use parser::{parse_pattern, ParsedPattern, PatternSegment, SegmentKind};
pub use permutation::FeistelPermutation;
pub use validate::{validate_extensions, validate_pattern};
