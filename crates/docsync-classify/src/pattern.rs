//! Wildcard path patterns.
//!
//! ```text
//! pattern  ::= segment ("." segment)*
//! segment  ::= literal | "*" | partial
//! "*"      -- consumes exactly one address segment of any value
//! partial  -- a segment containing "*" (e.g. "x-*"), matched as an
//!             anchored regex against one address segment
//! ```
//!
//! A pattern matches an address when every pattern segment consumes one
//! address segment from the left. Extra trailing address segments are
//! allowed, so a pattern naming an ancestor covers its whole subtree.
//! Patterns are compiled once; matching never backtracks across segments.

use std::fmt;

use docsync_types::PathAddress;
use regex::Regex;

use crate::error::{ClassifyError, ClassifyResult};

/// Single-segment wildcard.
pub const WILDCARD: &str = "*";

/// Pattern segment separator.
pub const SEPARATOR: char = '.';

/// One compiled pattern segment.
#[derive(Debug, Clone)]
enum PatternSegment {
    /// Must equal the address segment exactly.
    Literal(String),
    /// Any single address segment.
    Wildcard,
    /// Anchored regex built from a segment with embedded `*`.
    PartialWildcard(Regex),
}

impl PatternSegment {
    fn compile(raw: &str, pattern: &str) -> ClassifyResult<Self> {
        if raw == WILDCARD {
            return Ok(Self::Wildcard);
        }
        if !raw.contains('*') {
            return Ok(Self::Literal(raw.to_string()));
        }

        let body = raw
            .split('*')
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join(".*");
        Regex::new(&format!("^{body}$"))
            .map(Self::PartialWildcard)
            .map_err(|e| ClassifyError::pattern(pattern, e.to_string()))
    }

    #[inline]
    fn matches(&self, segment: &str) -> bool {
        match self {
            Self::Literal(expected) => expected == segment,
            Self::Wildcard => true,
            Self::PartialWildcard(re) => re.is_match(segment),
        }
    }
}

/// A compiled wildcard pattern over address segments.
#[derive(Debug, Clone)]
pub struct PathPattern {
    source: String,
    segments: Vec<PatternSegment>,
}

impl PathPattern {
    /// Compile a dot-separated pattern.
    ///
    /// # Errors
    ///
    /// Returns [`ClassifyError::InvalidPattern`] for an empty pattern, an
    /// empty segment, or a partial wildcard that does not compile.
    pub fn parse(pattern: &str) -> ClassifyResult<Self> {
        if pattern.is_empty() {
            return Err(ClassifyError::pattern(pattern, "pattern must not be empty"));
        }

        let segments = pattern
            .split(SEPARATOR)
            .enumerate()
            .map(|(idx, raw)| {
                if raw.is_empty() {
                    Err(ClassifyError::pattern(
                        pattern,
                        format!("segment {idx} is empty"),
                    ))
                } else {
                    PatternSegment::compile(raw, pattern)
                }
            })
            .collect::<ClassifyResult<Vec<_>>>()?;

        Ok(Self {
            source: pattern.to_string(),
            segments,
        })
    }

    /// Returns `true` if the pattern covers `address`.
    pub fn matches(&self, address: &PathAddress) -> bool {
        let target = address.segments();
        target.len() >= self.segments.len()
            && self
                .segments
                .iter()
                .zip(target)
                .all(|(p, s)| p.matches(&s.as_text()))
    }

    /// Number of address segments the pattern consumes.
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// The pattern as written.
    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}
