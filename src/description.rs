//! Resolution results
//!
//! A [`Description`] pairs a qualified name with the identity of the node
//! it denotes. Candidate sets are ordered innermost-scope-first, so a
//! consumer binding a written reference takes the first matching entry and
//! gets lexical shadowing for free.

use crate::ast::NodeId;
use crate::name::QualifiedName;
use serde::{Deserialize, Serialize};

/// Which tree a resolved target lives in.
///
/// Native options point into the primary descriptor's own tree; everything
/// else points into the schema tree the reference came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    Schema,
    Descriptor,
}

/// A single resolution candidate: a name a reference may be written as,
/// plus the identity of the declaration it denotes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Description {
    pub name: QualifiedName,
    pub target: NodeId,
    pub origin: Origin,
}

impl Description {
    pub fn new(name: QualifiedName, target: NodeId, origin: Origin) -> Self {
        Self {
            name,
            target,
            origin,
        }
    }

    /// Whether a written reference (possibly with a leading dot) names this
    /// candidate
    pub fn matches(&self, written: &str) -> bool {
        self.name.matches(written)
    }
}

/// First candidate matching a written reference. Candidate sets are ordered
/// innermost-first, so the first match implements shadowing.
pub fn first_matching<'a>(descriptions: &'a [Description], written: &str) -> Option<&'a Description> {
    descriptions.iter().find(|d| d.matches(written))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(name: &str, slot: u32) -> Description {
        Description::new(
            QualifiedName::parse(name).unwrap(),
            NodeId(slot),
            Origin::Schema,
        )
    }

    #[test]
    fn test_first_match_wins() {
        let candidates = vec![sample("Inner", 3), sample("A.Inner", 3), sample("B.Inner", 7)];
        let hit = first_matching(&candidates, "Inner").unwrap();
        assert_eq!(hit.target, NodeId(3));
        assert!(first_matching(&candidates, "C.Inner").is_none());
    }

    #[test]
    fn test_serializes_with_string_name() {
        let description = sample("foo.Bar", 12);
        let json = serde_json::to_string(&description).unwrap();
        assert!(json.contains("\"foo.Bar\""));
        let back: Description = serde_json::from_str(&json).unwrap();
        assert_eq!(back, description);
    }
}
