use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error as ThisError;

///
/// JSON-pointer engine
///
/// RFC-6901 pointers with a bounded depth, used both for schema
/// introspection and for dialect path compilation. Pointers are stored as
/// decoded segments; the encoded rendering (`~`→`~0`, `/`→`~1`) is
/// recomputed on demand, so equality on segments is equality on the
/// normalized encoded string.
///

/// Maximum pointer depth accepted anywhere in the system.
///
/// Enforced at construction, parse, and join so that no deeper pointer can
/// exist at all.
pub const MAX_POINTER_DEPTH: usize = 5;

///
/// PointerError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum PointerError {
    #[error("pointer depth {depth} exceeds the maximum of {MAX_POINTER_DEPTH}")]
    DepthExceeded { depth: usize },

    #[error("pointer segment \"-\" is not addressable")]
    NextIndexSegment,

    #[error("pointer segment {segment:?} is a negative array index")]
    NegativeIndex { segment: String },

    #[error("pointer {text:?} must start with '/' or be empty")]
    MissingLeadingSlash { text: String },

    #[error("pointer {text:?} contains an invalid escape sequence")]
    InvalidEscape { text: String },
}

///
/// PointerInput
///
/// Accepted inputs for `JsonPointer::normalize`: an encoded pointer string
/// or an already-split segment list.
///

#[derive(Clone, Debug)]
pub enum PointerInput {
    Text(String),
    Segments(Vec<String>),
}

impl From<&str> for PointerInput {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for PointerInput {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<Vec<String>> for PointerInput {
    fn from(segments: Vec<String>) -> Self {
        Self::Segments(segments)
    }
}

impl From<&[&str]> for PointerInput {
    fn from(segments: &[&str]) -> Self {
        Self::Segments(segments.iter().map(ToString::to_string).collect())
    }
}

///
/// JsonPointer
///

#[derive(Clone, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct JsonPointer {
    segments: Vec<String>,
}

impl JsonPointer {
    /// The empty pointer, denoting the document root.
    #[must_use]
    pub const fn root() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    /// Build a pointer from decoded segments.
    pub fn from_segments<I, S>(segments: I) -> Result<Self, PointerError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        Self::validate(&segments)?;

        Ok(Self { segments })
    }

    /// Parse an encoded pointer string.
    ///
    /// The empty string is the root pointer. Non-empty pointers must start
    /// with `/`; `~0` and `~1` escapes are decoded, and any other `~` use
    /// is rejected.
    pub fn parse(text: &str) -> Result<Self, PointerError> {
        if text.is_empty() {
            return Ok(Self::root());
        }
        if !text.starts_with('/') {
            return Err(PointerError::MissingLeadingSlash {
                text: text.to_string(),
            });
        }

        let mut segments = Vec::new();
        for raw in text.split('/').skip(1) {
            segments.push(decode_segment(raw).ok_or_else(|| PointerError::InvalidEscape {
                text: text.to_string(),
            })?);
        }
        Self::validate(&segments)?;

        Ok(Self { segments })
    }

    /// Normalize user input (encoded string or segment list) into a pointer.
    pub fn normalize(input: impl Into<PointerInput>) -> Result<Self, PointerError> {
        match input.into() {
            PointerInput::Text(text) => Self::parse(&text),
            PointerInput::Segments(segments) => Self::from_segments(segments),
        }
    }

    /// Join two pointers. The root pointer is the identity on both sides.
    pub fn join(&self, relative: &Self) -> Result<Self, PointerError> {
        let mut segments = self.segments.clone();
        segments.extend(relative.segments.iter().cloned());
        Self::validate(&segments)?;

        Ok(Self { segments })
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    #[must_use]
    pub fn last_segment(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// The pointer with the last segment removed. Root for root.
    #[must_use]
    pub fn parent(&self) -> Self {
        let mut segments = self.segments.clone();
        segments.pop();
        Self { segments }
    }

    /// The normalized encoded rendering of this pointer.
    #[must_use]
    pub fn encoded(&self) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            out.push('/');
            out.push_str(&encode_segment(segment));
        }
        out
    }

    fn validate(segments: &[String]) -> Result<(), PointerError> {
        if segments.len() > MAX_POINTER_DEPTH {
            return Err(PointerError::DepthExceeded {
                depth: segments.len(),
            });
        }
        for segment in segments {
            if segment == "-" {
                return Err(PointerError::NextIndexSegment);
            }
            if is_negative_index(segment) {
                return Err(PointerError::NegativeIndex {
                    segment: segment.clone(),
                });
            }
        }

        Ok(())
    }
}

impl fmt::Display for JsonPointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.encoded())
    }
}

impl Serialize for JsonPointer {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.encoded())
    }
}

impl<'de> Deserialize<'de> for JsonPointer {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse(&text).map_err(serde::de::Error::custom)
    }
}

/// Whether a decoded segment addresses an array element.
#[must_use]
pub fn is_array_index(segment: &str) -> bool {
    !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit())
}

fn is_negative_index(segment: &str) -> bool {
    segment
        .strip_prefix('-')
        .is_some_and(|rest| !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()))
}

fn encode_segment(segment: &str) -> String {
    segment.replace('~', "~0").replace('/', "~1")
}

fn decode_segment(raw: &str) -> Option<String> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c == '~' {
            match chars.next() {
                Some('0') => out.push('~'),
                Some('1') => out.push('/'),
                _ => return None,
            }
        } else {
            out.push(c);
        }
    }

    Some(out)
}

#[cfg(test)]
mod tests {
    use super::{JsonPointer, MAX_POINTER_DEPTH, PointerError};
    use proptest::prelude::*;

    #[test]
    fn root_parses_from_empty_string() {
        let ptr = JsonPointer::parse("").unwrap();

        assert!(ptr.is_root());
        assert_eq!(ptr.encoded(), "");
    }

    #[test]
    fn root_is_join_identity() {
        let ptr = JsonPointer::parse("/a/b").unwrap();
        let root = JsonPointer::root();

        assert_eq!(root.join(&ptr).unwrap(), ptr);
        assert_eq!(ptr.join(&root).unwrap(), ptr);
    }

    #[test]
    fn escapes_decode_in_order() {
        let ptr = JsonPointer::parse("/a~1b/c~0d").unwrap();

        assert_eq!(ptr.segments(), ["a/b", "c~d"]);
        assert_eq!(ptr.encoded(), "/a~1b/c~0d");
    }

    #[test]
    fn rejects_next_index_segment() {
        assert_eq!(
            JsonPointer::parse("/items/-"),
            Err(PointerError::NextIndexSegment)
        );
    }

    #[test]
    fn rejects_negative_array_index() {
        assert!(matches!(
            JsonPointer::from_segments(["items", "-3"]),
            Err(PointerError::NegativeIndex { .. })
        ));
    }

    #[test]
    fn rejects_depth_past_the_cap() {
        let deep: Vec<String> = (0..=MAX_POINTER_DEPTH).map(|i| format!("s{i}")).collect();

        assert!(matches!(
            JsonPointer::from_segments(deep),
            Err(PointerError::DepthExceeded { .. })
        ));
    }

    #[test]
    fn rejects_missing_leading_slash() {
        assert!(matches!(
            JsonPointer::parse("a/b"),
            Err(PointerError::MissingLeadingSlash { .. })
        ));
    }

    #[test]
    fn rejects_dangling_escape() {
        assert!(matches!(
            JsonPointer::parse("/a~2b"),
            Err(PointerError::InvalidEscape { .. })
        ));
        assert!(matches!(
            JsonPointer::parse("/a~"),
            Err(PointerError::InvalidEscape { .. })
        ));
    }

    #[test]
    fn join_revalidates_depth() {
        let left = JsonPointer::from_segments(["a", "b", "c"]).unwrap();
        let right = JsonPointer::from_segments(["d", "e", "f"]).unwrap();

        assert!(matches!(
            left.join(&right),
            Err(PointerError::DepthExceeded { .. })
        ));
    }

    fn arb_segment() -> impl Strategy<Value = String> {
        // Anything but "-" and negative indices; includes the escape
        // characters so round-trips exercise encoding.
        "[a-zA-Z0-9_~/ ]{1,12}".prop_filter("reserved segment forms", |s| {
            s != "-" && !(s.starts_with('-') && s[1..].bytes().all(|b| b.is_ascii_digit()))
        })
    }

    proptest! {
        #[test]
        fn parse_inverts_build(segments in proptest::collection::vec(arb_segment(), 0..=MAX_POINTER_DEPTH)) {
            let ptr = JsonPointer::from_segments(segments.clone()).unwrap();
            let reparsed = JsonPointer::parse(&ptr.encoded()).unwrap();

            prop_assert_eq!(reparsed.segments(), segments.as_slice());
        }

        #[test]
        fn build_inverts_parse(segments in proptest::collection::vec(arb_segment(), 0..=MAX_POINTER_DEPTH)) {
            let encoded = JsonPointer::from_segments(segments).unwrap().encoded();
            let ptr = JsonPointer::parse(&encoded).unwrap();

            prop_assert_eq!(ptr.encoded(), encoded);
        }
    }
}
