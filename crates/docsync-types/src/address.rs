//! Reversible string addressing of document locations.
//!
//! An address is a sequence of [`Segment`]s joined with `.`:
//!
//! ```text
//! paths./users/{id}.get.parameters.0.name
//! ```
//!
//! Documents that describe HTTP APIs use URL paths as mapping keys, so a
//! segment beginning with `/` is a *literal* segment and is emitted verbatim.
//! The decoder enters path mode on `/` and stays there until the next `.`,
//! which keeps the slashes and braces of a URL path out of the separator
//! logic.
//!
//! `decode(encode(s)) == s` holds whenever no key segment contains `.`, no
//! literal segment contains `.`, and no key segment is purely numeric (those
//! decode as [`Segment::Index`]).

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::TypeError;

/// Separator between encoded segments.
pub const SEPARATOR: char = '.';

/// First character of a literal path segment.
pub const PATH_MARKER: char = '/';

/// One step of a [`PathAddress`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Segment {
    /// A mapping key.
    Key(String),
    /// A sequence position.
    Index(usize),
    /// A mapping key that is a URL-style path, e.g. `/users/{id}`.
    Literal(String),
}

impl Segment {
    /// Segment for a mapping key as found in a document.
    ///
    /// Keys starting with `/` become [`Segment::Literal`]; everything else,
    /// including numeric-looking keys, stays a [`Segment::Key`].
    pub fn key(name: impl Into<String>) -> Self {
        let name = name.into();
        if name.starts_with(PATH_MARKER) {
            Self::Literal(name)
        } else {
            Self::Key(name)
        }
    }

    /// Segment for a decoded piece of an address string. Pieces scanned in
    /// path mode are never indices.
    fn parse(raw: &str, in_path: bool) -> Self {
        if in_path {
            return Self::key(raw);
        }
        if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(i) = raw.parse() {
                return Self::Index(i);
            }
        }
        Self::Key(raw.to_string())
    }

    /// The segment as it appears in an encoded address.
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            Self::Key(s) | Self::Literal(s) => Cow::Borrowed(s),
            Self::Index(i) => Cow::Owned(i.to_string()),
        }
    }

    /// The position this segment refers to in a sequence, if any.
    ///
    /// Numeric keys count, so addresses built from mapping keys such as
    /// `"0"` can still address sequences.
    pub fn as_index(&self) -> Option<usize> {
        match self {
            Self::Index(i) => Some(*i),
            Self::Key(s) => s.parse().ok(),
            Self::Literal(_) => None,
        }
    }

    pub fn is_index(&self) -> bool {
        matches!(self, Self::Index(_))
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_text())
    }
}

impl From<usize> for Segment {
    fn from(i: usize) -> Self {
        Self::Index(i)
    }
}

impl From<&str> for Segment {
    fn from(s: &str) -> Self {
        Self::key(s)
    }
}

// ---------------------------------------------------------------------------
// PathAddress
// ---------------------------------------------------------------------------

/// A location inside a document, from the root down.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PathAddress {
    segments: Vec<Segment>,
}

impl PathAddress {
    /// The empty address (the document root).
    pub fn root() -> Self {
        Self::default()
    }

    pub fn new(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn last(&self) -> Option<&Segment> {
        self.segments.last()
    }

    pub fn push(&mut self, segment: impl Into<Segment>) {
        self.segments.push(segment.into());
    }

    /// A new address one level below this one.
    pub fn child(&self, segment: impl Into<Segment>) -> Self {
        let mut segments = Vec::with_capacity(self.segments.len() + 1);
        segments.extend_from_slice(&self.segments);
        segments.push(segment.into());
        Self { segments }
    }

    /// The address one level up, or `None` at the root.
    pub fn parent(&self) -> Option<Self> {
        let (_, rest) = self.segments.split_last()?;
        Some(Self {
            segments: rest.to_vec(),
        })
    }

    /// Encode to the canonical string form.
    pub fn encode(&self) -> String {
        let mut out = String::new();
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                out.push(SEPARATOR);
            }
            out.push_str(&segment.as_text());
        }
        out
    }

    /// Decode the canonical string form.
    ///
    /// Never fails: empty pieces (leading, trailing, or doubled separators)
    /// are dropped. Use [`str::parse`] for strict parsing of user input.
    pub fn decode(encoded: &str) -> Self {
        let mut segments = Vec::new();
        let mut current = String::new();
        let mut in_path = false;

        for ch in encoded.chars() {
            match ch {
                SEPARATOR => {
                    if !current.is_empty() {
                        segments.push(Segment::parse(&current, in_path));
                        current.clear();
                    }
                    in_path = false;
                }
                PATH_MARKER => {
                    in_path = true;
                    current.push(ch);
                }
                _ => current.push(ch),
            }
        }
        if !current.is_empty() {
            segments.push(Segment::parse(&current, in_path));
        }

        Self { segments }
    }
}

impl fmt::Display for PathAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl FromStr for PathAddress {
    type Err = TypeError;

    /// Strict parse: rejects the empty address and empty segments.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(TypeError::EmptyAddress);
        }
        if s.starts_with(SEPARATOR) || s.ends_with(SEPARATOR) {
            return Err(TypeError::InvalidAddress {
                address: s.to_string(),
                reason: "must not start or end with '.'".into(),
            });
        }
        if s.contains("..") {
            return Err(TypeError::InvalidAddress {
                address: s.to_string(),
                reason: "must not contain empty segments".into(),
            });
        }
        Ok(Self::decode(s))
    }
}

impl FromIterator<Segment> for PathAddress {
    fn from_iter<I: IntoIterator<Item = Segment>>(iter: I) -> Self {
        Self {
            segments: iter.into_iter().collect(),
        }
    }
}

impl Serialize for PathAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.encode())
    }
}

impl<'de> Deserialize<'de> for PathAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Self::decode(&s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn addr(segments: Vec<Segment>) -> PathAddress {
        PathAddress::new(segments)
    }

    #[test]
    fn encodes_keys_and_indices() {
        let a = addr(vec![
            Segment::key("tags"),
            Segment::Index(2),
            Segment::key("name"),
        ]);
        assert_eq!(a.encode(), "tags.2.name");
    }

    #[test]
    fn literal_segment_is_emitted_verbatim() {
        let a = addr(vec![
            Segment::key("paths"),
            Segment::key("/users/{id}"),
            Segment::key("get"),
        ]);
        assert_eq!(a.encode(), "paths./users/{id}.get");
    }

    #[test]
    fn decode_recognizes_literal_paths() {
        let a = PathAddress::decode("paths./users/{id}/posts.get.summary");
        assert_eq!(
            a.segments(),
            &[
                Segment::Key("paths".into()),
                Segment::Literal("/users/{id}/posts".into()),
                Segment::Key("get".into()),
                Segment::Key("summary".into()),
            ]
        );
    }

    #[test]
    fn decode_numeric_segments_as_indices() {
        let a = PathAddress::decode("servers.0.url");
        assert_eq!(a.segments()[1], Segment::Index(0));
    }

    #[test]
    fn embedded_slash_stays_a_key() {
        let a = PathAddress::decode("content.application/json.schema");
        assert_eq!(a.segments()[1], Segment::Key("application/json".into()));
        assert_eq!(a.encode(), "content.application/json.schema");
    }

    #[test]
    fn root_literal_path() {
        let a = PathAddress::decode("/health");
        assert_eq!(a.segments(), &[Segment::Literal("/health".into())]);
    }

    #[test]
    fn decode_drops_empty_pieces() {
        assert!(PathAddress::decode("").is_empty());
        assert_eq!(PathAddress::decode(".a..b.").len(), 2);
    }

    #[test]
    fn strict_parse_rejects_malformed() {
        assert_eq!("".parse::<PathAddress>(), Err(TypeError::EmptyAddress));
        assert!(".a".parse::<PathAddress>().is_err());
        assert!("a.".parse::<PathAddress>().is_err());
        assert!("a..b".parse::<PathAddress>().is_err());
        assert!("info.description".parse::<PathAddress>().is_ok());
    }

    #[test]
    fn parent_and_child() {
        let a = PathAddress::decode("paths./a.get");
        let parent = a.parent().unwrap();
        assert_eq!(parent.encode(), "paths./a");
        assert_eq!(parent.child("get"), a);
        assert!(PathAddress::root().parent().is_none());
    }

    #[test]
    fn serializes_as_encoded_string() {
        let a = PathAddress::decode("paths./a.get");
        let json = serde_json::to_string(&a).unwrap();
        assert_eq!(json, r#""paths./a.get""#);
        let back: PathAddress = serde_json::from_str(&json).unwrap();
        assert_eq!(back, a);
    }

    fn key_strategy() -> impl Strategy<Value = Segment> {
        "[a-zA-Z_$][a-zA-Z0-9_$-]{0,8}".prop_map(Segment::Key)
    }

    fn literal_strategy() -> impl Strategy<Value = Segment> {
        proptest::collection::vec("[a-z0-9_-]{1,6}|\\{[a-z]{1,4}\\}", 1..4)
            .prop_map(|parts| Segment::Literal(format!("/{}", parts.join("/"))))
    }

    fn segment_strategy() -> impl Strategy<Value = Segment> {
        prop_oneof![
            key_strategy(),
            literal_strategy(),
            (0usize..1000).prop_map(Segment::Index),
        ]
    }

    proptest! {
        #[test]
        fn round_trip_holds_for_dot_free_segments(
            segments in proptest::collection::vec(segment_strategy(), 1..8)
        ) {
            let a = PathAddress::new(segments);
            prop_assert_eq!(PathAddress::decode(&a.encode()), a);
        }
    }
}
