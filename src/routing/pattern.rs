//! Compiled route patterns.
//!
//! # Responsibilities
//! - Split a normalized pattern into literal and parameter segments
//! - Compare a pattern against request segments
//! - Collect parameter bindings for a successful comparison
//!
//! # Design Decisions
//! - Patterns are compiled once at registration, never per request
//! - Literal comparison is case-sensitive and byte-exact
//! - Bindings are only handed out for a full match

use std::fmt;

use crate::routing::normalize::segments;

/// Leading character that marks a parameter segment.
pub const PARAM_SIGIL: char = ':';

/// One `/`-delimited component of a pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Must equal the request segment exactly.
    Literal(String),
    /// Matches any non-empty request segment and binds it under this name.
    Param(String),
}

impl Segment {
    fn parse(raw: &str) -> Self {
        match raw.strip_prefix(PARAM_SIGIL) {
            Some(name) => Segment::Param(name.to_string()),
            None => Segment::Literal(raw.to_string()),
        }
    }
}

/// A normalized pattern split into segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    segments: Vec<Segment>,
}

impl Pattern {
    /// Compile an already normalized pattern.
    pub fn parse(normalized: &str) -> Self {
        Self {
            segments: segments(normalized).map(Segment::parse).collect(),
        }
    }

    /// Compare against request segments.
    ///
    /// Returns the `(name, value)` bindings on a full match, `None` otherwise.
    pub fn match_segments<'p, 'r>(
        &'p self,
        request: &[&'r str],
    ) -> Option<Vec<(&'p str, &'r str)>> {
        if request.len() != self.segments.len() {
            return None;
        }

        let mut bindings = Vec::new();
        for (segment, value) in self.segments.iter().zip(request) {
            match segment {
                Segment::Literal(literal) => {
                    if literal != value {
                        return None;
                    }
                }
                Segment::Param(name) => {
                    if value.is_empty() {
                        return None;
                    }
                    bindings.push((name.as_str(), *value));
                }
            }
        }
        Some(bindings)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("/")?;
        for segment in &self.segments {
            match segment {
                Segment::Literal(s) => write!(f, "{}/", s)?,
                Segment::Param(name) => write!(f, "{}{}/", PARAM_SIGIL, name)?,
            }
        }
        Ok(())
    }
}
