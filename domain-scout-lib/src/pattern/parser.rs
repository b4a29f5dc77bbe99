//! Pattern grammar parser.
//!
//! Turns a pattern string into an ordered list of typed segments, each with
//! its own finite alphabet. Parsing never fails: anything that is not one of
//! the special tokens is accumulated into a literal segment, and the
//! validator decides separately whether the pattern is acceptable.

use serde::Serialize;
use std::fmt;

/// The 21 lowercase consonants, in alphabetical order.
const CONSONANTS: &str = "bcdfghjklmnpqrstvwxyz";
const VOWELS: &str = "aeiou";
const DIGITS: &str = "0123456789";
const LETTERS: &str = "abcdefghijklmnopqrstuvwxyz";

/// What a segment stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentKind {
    /// Fixed text, emitted as one indivisible unit
    Literal,
    /// `c`: any consonant
    Consonant,
    /// `v`: any vowel
    Vowel,
    /// `n`: any digit
    Digit,
    /// `l`: any letter
    Letter,
    /// `_`: any letter, digit or hyphen
    Wildcard,
    /// `-`: a hyphen
    Hyphen,
}

impl SegmentKind {
    /// Map a special token character to its segment kind.
    ///
    /// The four letter tokens are case-insensitive.
    fn from_token(ch: char) -> Option<Self> {
        match ch {
            'c' | 'C' => Some(Self::Consonant),
            'v' | 'V' => Some(Self::Vowel),
            'n' | 'N' => Some(Self::Digit),
            'l' | 'L' => Some(Self::Letter),
            '_' => Some(Self::Wildcard),
            '-' => Some(Self::Hyphen),
            _ => None,
        }
    }

    /// The alphabet for a non-literal kind.
    fn alphabet(self) -> Vec<String> {
        let chars: Vec<char> = match self {
            Self::Literal => Vec::new(),
            Self::Consonant => CONSONANTS.chars().collect(),
            Self::Vowel => VOWELS.chars().collect(),
            Self::Digit => DIGITS.chars().collect(),
            Self::Letter => LETTERS.chars().collect(),
            Self::Wildcard => LETTERS.chars().chain(DIGITS.chars()).chain(['-']).collect(),
            Self::Hyphen => vec!['-'],
        };
        chars.into_iter().map(String::from).collect()
    }
}

impl fmt::Display for SegmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Literal => "literal",
            Self::Consonant => "consonant",
            Self::Vowel => "vowel",
            Self::Digit => "digit",
            Self::Letter => "letter",
            Self::Wildcard => "wildcard",
            Self::Hyphen => "hyphen",
        };
        f.write_str(name)
    }
}

/// One parsed unit of a pattern with a fixed candidate alphabet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatternSegment {
    pub kind: SegmentKind,
    /// Values this segment may take. A literal has exactly one entry.
    pub alphabet: Vec<String>,
}

impl PatternSegment {
    fn literal(text: &str) -> Self {
        Self {
            kind: SegmentKind::Literal,
            alphabet: vec![text.to_lowercase()],
        }
    }

    fn special(kind: SegmentKind) -> Self {
        Self {
            kind,
            alphabet: kind.alphabet(),
        }
    }

    /// Number of values this segment contributes to the combinatorial space.
    pub fn radix(&self) -> usize {
        self.alphabet.len()
    }
}

/// Ordered sequence of segments produced by [`parse_pattern`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ParsedPattern {
    segments: Vec<PatternSegment>,
}

impl ParsedPattern {
    pub fn segments(&self) -> &[PatternSegment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn kinds(&self) -> Vec<SegmentKind> {
        self.segments.iter().map(|s| s.kind).collect()
    }
}

impl<'a> IntoIterator for &'a ParsedPattern {
    type Item = &'a PatternSegment;
    type IntoIter = std::slice::Iter<'a, PatternSegment>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.iter()
    }
}

/// Parse a pattern string into segments.
///
/// Token rules (left to right, one character at a time):
///
/// - `c`/`C` consonant, `v`/`V` vowel, `n`/`N` digit, `l`/`L` letter
/// - `_` wildcard (letters, digits, hyphen)
/// - `-` hyphen
/// - anything else accumulates into a literal, lower-cased when flushed
///
/// # Examples
///
/// ```
/// use domain_scout_lib::pattern::{parse_pattern, SegmentKind};
///
/// let parsed = parse_pattern("test_");
/// assert_eq!(parsed.len(), 2);
/// assert_eq!(parsed.segments()[0].kind, SegmentKind::Literal);
/// assert_eq!(parsed.segments()[0].alphabet, vec!["test".to_string()]);
/// assert_eq!(parsed.segments()[1].alphabet.len(), 37);
/// ```
pub fn parse_pattern(pattern: &str) -> ParsedPattern {
    let mut segments = Vec::new();
    let mut literal = String::new();

    for ch in pattern.chars() {
        match SegmentKind::from_token(ch) {
            Some(kind) => {
                flush_literal(&mut literal, &mut segments);
                segments.push(PatternSegment::special(kind));
            }
            None => literal.push(ch),
        }
    }
    flush_literal(&mut literal, &mut segments);

    ParsedPattern { segments }
}

fn flush_literal(buffer: &mut String, segments: &mut Vec<PatternSegment>) {
    if buffer.is_empty() {
        return;
    }
    segments.push(PatternSegment::literal(buffer));
    buffer.clear();
}
