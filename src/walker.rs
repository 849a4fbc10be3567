//! Generic scope traversal
//!
//! [`AstWalker::traverse`] scans the start node's own subtree, then each
//! enclosing container's subtree walking outward to the root - innermost
//! scope first. What counts as a candidate is delegated to a pluggable
//! [`ScopeFinder`] strategy; the walk itself carries no domain knowledge.
//!
//! The walk is cycle-safe (a revisited container ends the outward walk)
//! and tolerates dangling child ids, which parse errors during editing can
//! leave behind. No match is an empty collection, never a failure.

use crate::ast::{Ast, NodeId};
use crate::description::Description;
use crate::name::QualifiedName;
use std::collections::HashSet;

/// Acceptance strategy plugged into the walker.
///
/// `describe` inspects one visited node and appends candidate descriptions;
/// `scope` is the enclosing container currently being scanned, so names can
/// be qualified relative to it. `descends_into` bounds the scan.
pub trait ScopeFinder {
    fn describe(&self, ast: &Ast, node: NodeId, scope: NodeId, out: &mut Vec<Description>);

    fn descends_into(&self, ast: &Ast, node: NodeId) -> bool;
}

/// The tree walk shared by every finder strategy.
#[derive(Debug, Clone, Copy, Default)]
pub struct AstWalker;

impl AstWalker {
    pub fn new() -> Self {
        Self
    }

    /// Collect candidates visible from `start`, innermost scope first.
    pub fn traverse(&self, ast: &Ast, start: NodeId, finder: &dyn ScopeFinder) -> Vec<Description> {
        let mut out = Vec::new();
        let mut visited = HashSet::new();
        let mut scope = Some(start);
        while let Some(current) = scope {
            if !visited.insert(current) {
                tracing::debug!(node = %current, "container cycle, ending outward walk");
                break;
            }
            if ast.get(current).is_none() {
                tracing::debug!(node = %current, "dangling container, ending outward walk");
                break;
            }
            self.scan(ast, current, current, finder, &mut out);
            scope = ast.parent(current);
        }
        dedupe(out)
    }

    fn scan(
        &self,
        ast: &Ast,
        node: NodeId,
        scope: NodeId,
        finder: &dyn ScopeFinder,
        out: &mut Vec<Description>,
    ) {
        for child in ast.children(node) {
            if ast.get(child).is_none() {
                tracing::debug!(node = %child, "skipping dangling child link");
                continue;
            }
            finder.describe(ast, child, scope, out);
            if finder.descends_into(ast, child) {
                self.scan(ast, child, scope, finder, out);
            }
        }
    }
}

/// Qualified name of `node` relative to (and excluding) `scope`: the names
/// of the named containers between them, innermost last. `None` when the
/// node is unnamed or not inside `scope`.
pub fn relative_name(ast: &Ast, node: NodeId, scope: NodeId) -> Option<QualifiedName> {
    let mut segments = vec![ast.name_of(node)?.to_string()];
    let mut visited = HashSet::new();
    let mut current = ast.parent(node);
    while let Some(container) = current {
        if container == scope {
            segments.reverse();
            return QualifiedName::from_segments(segments).ok();
        }
        if !visited.insert(container) {
            return None;
        }
        if let Some(name) = ast.name_of(container) {
            segments.push(name.to_string());
        }
        current = ast.parent(container);
    }
    None
}

fn dedupe(descriptions: Vec<Description>) -> Vec<Description> {
    let mut seen = HashSet::new();
    descriptions
        .into_iter()
        .filter(|d| seen.insert((d.name.to_string(), d.target, d.origin)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{AstBuilder, NodeKind, TypeDecl};
    use crate::description::Origin;

    /// Toy strategy: every message is a candidate, scan descends everywhere.
    struct MessageCollector;

    impl ScopeFinder for MessageCollector {
        fn describe(&self, ast: &Ast, node: NodeId, scope: NodeId, out: &mut Vec<Description>) {
            if matches!(ast.kind(node), Some(NodeKind::Type(TypeDecl::Message(_)))) {
                if let Some(name) = relative_name(ast, node, scope) {
                    out.push(Description::new(name, node, Origin::Schema));
                }
            }
        }

        fn descends_into(&self, ast: &Ast, node: NodeId) -> bool {
            matches!(ast.kind(node), Some(NodeKind::Type(TypeDecl::Message(_))))
        }
    }

    #[test]
    fn test_innermost_scope_comes_first() {
        let mut builder = AstBuilder::new();
        let root = builder.root();
        let outer = builder.message(root, "Outer").unwrap();
        let inner = builder.message(outer, "Inner").unwrap();
        builder.message(root, "Sibling").unwrap();
        let ast = builder.build();

        let names: Vec<String> = AstWalker::new()
            .traverse(&ast, inner, &MessageCollector)
            .iter()
            .map(|d| d.name.to_string())
            .collect();
        // scanning Inner finds nothing, then Outer's subtree, then the root's
        assert_eq!(names, vec!["Inner", "Outer", "Outer.Inner", "Sibling"]);
    }

    #[test]
    fn test_traverse_from_root_scans_once() {
        let mut builder = AstBuilder::new();
        let root = builder.root();
        let a = builder.message(root, "A").unwrap();
        builder.message(a, "Inner").unwrap();
        let ast = builder.build();

        let names: Vec<String> = AstWalker::new()
            .traverse(&ast, root, &MessageCollector)
            .iter()
            .map(|d| d.name.to_string())
            .collect();
        assert_eq!(names, vec!["A", "A.Inner"]);
    }

    #[test]
    fn test_empty_result_for_dangling_start() {
        let ast = AstBuilder::new().build();
        let result = AstWalker::new().traverse(&ast, NodeId(99), &MessageCollector);
        assert!(result.is_empty());
    }

    #[test]
    fn test_relative_name() {
        let mut builder = AstBuilder::new();
        let root = builder.root();
        let a = builder.message(root, "A").unwrap();
        let inner = builder.message(a, "Inner").unwrap();
        let ast = builder.build();

        assert_eq!(relative_name(&ast, inner, a).unwrap().to_string(), "Inner");
        assert_eq!(relative_name(&ast, inner, root).unwrap().to_string(), "A.Inner");
        // not inside the requested scope
        assert!(relative_name(&ast, a, inner).is_none());
    }
}
