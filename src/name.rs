//! Qualified names - dot-separated identifier paths
//!
//! Candidate names are relative to the scope they were collected in:
//! a nested type `Inner` of message `A` is visible as `Inner` from inside
//! `A` and as `A.Inner` from the file level.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A dot-separated identifier path, e.g. `A.Inner` or `google.protobuf.FieldOptions`.
///
/// Written references may carry one leading dot (`.foo.Bar`) to anchor the
/// name at the file level; [`QualifiedName::matches`] strips it before
/// comparing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QualifiedName {
    segments: Vec<String>,
}

impl QualifiedName {
    /// Create a single-segment name
    pub fn simple(segment: impl Into<String>) -> Self {
        Self {
            segments: vec![segment.into()],
        }
    }

    /// Create a name from path segments. Empty segment lists are invalid.
    pub fn from_segments(segments: Vec<String>) -> Result<Self> {
        if segments.is_empty() {
            return Err(Error::InvalidName("empty qualified name".to_string()));
        }
        for segment in &segments {
            validate_segment(segment)?;
        }
        Ok(Self { segments })
    }

    /// Parse a dotted name string
    pub fn parse(name: &str) -> Result<Self> {
        let segments: Vec<String> = name.split('.').map(str::to_string).collect();
        Self::from_segments(segments)
    }

    /// The path segments of this name
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// The last segment (the simple name)
    pub fn last(&self) -> &str {
        self.segments.last().map(String::as_str).unwrap_or_default()
    }

    /// This name with `segment` prepended as a new first element
    pub fn prefixed_with(&self, segment: &str) -> Self {
        let mut segments = Vec::with_capacity(self.segments.len() + 1);
        segments.push(segment.to_string());
        segments.extend(self.segments.iter().cloned());
        Self { segments }
    }

    /// This name prefixed with every segment of a dotted `prefix`
    pub fn qualified_by(&self, prefix: &str) -> Self {
        let mut segments: Vec<String> = prefix.split('.').map(str::to_string).collect();
        segments.extend(self.segments.iter().cloned());
        Self { segments }
    }

    /// Compare against a written reference, ignoring one leading dot
    pub fn matches(&self, written: &str) -> bool {
        let written = written.strip_prefix('.').unwrap_or(written);
        let mut ours = self.segments.iter();
        let mut theirs = written.split('.');
        loop {
            match (ours.next(), theirs.next()) {
                (Some(a), Some(b)) => {
                    if a != b {
                        return false;
                    }
                }
                (None, None) => return true,
                _ => return false,
            }
        }
    }
}

fn validate_segment(segment: &str) -> Result<()> {
    let mut chars = segment.chars();
    let Some(first) = chars.next() else {
        return Err(Error::InvalidName("empty name segment".to_string()));
    };
    if !(first.is_ascii_alphabetic() || first == '_') {
        return Err(Error::InvalidName(format!(
            "segment must start with a letter or underscore: {}",
            segment
        )));
    }
    if let Some(bad) = chars.find(|c| !(c.is_ascii_alphanumeric() || *c == '_')) {
        return Err(Error::InvalidName(format!(
            "invalid character '{}' in segment: {}",
            bad, segment
        )));
    }
    Ok(())
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}

impl FromStr for QualifiedName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for QualifiedName {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for QualifiedName {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        QualifiedName::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_roundtrip() {
        let name = QualifiedName::parse("google.protobuf.FieldOptions").unwrap();
        assert_eq!(name.segments().len(), 3);
        assert_eq!(name.last(), "FieldOptions");
        assert_eq!(name.to_string(), "google.protobuf.FieldOptions");

        let parsed: QualifiedName = name.to_string().parse().unwrap();
        assert_eq!(parsed, name);
    }

    #[test]
    fn test_invalid_names() {
        assert!(QualifiedName::parse("").is_err());
        assert!(QualifiedName::parse("a..b").is_err());
        assert!(QualifiedName::parse("1abc").is_err());
        assert!(QualifiedName::parse("a-b").is_err());
    }

    #[test]
    fn test_prefixing() {
        let name = QualifiedName::simple("Inner").prefixed_with("A");
        assert_eq!(name.to_string(), "A.Inner");

        let qualified = QualifiedName::simple("Person").qualified_by("foo.bar");
        assert_eq!(qualified.to_string(), "foo.bar.Person");
    }

    #[test]
    fn test_matches_ignores_leading_dot() {
        let name = QualifiedName::parse("foo.bar.Person").unwrap();
        assert!(name.matches("foo.bar.Person"));
        assert!(name.matches(".foo.bar.Person"));
        assert!(!name.matches("bar.Person"));
        assert!(!name.matches("foo.bar.Person.Name"));
    }
}
