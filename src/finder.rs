//! Read-only structural queries over a single tree

use crate::ast::{Ast, FieldDecl, NodeId, NodeKind, TypeDecl, TypeReference};
use crate::description::first_matching;
use crate::scope::type_finder::TypeScopeFinder;
use crate::walker::AstWalker;
use std::collections::HashSet;

/// Structural navigation: root lookup, enclosing-type lookup, and the
/// declared-type lookups for properties.
///
/// The declared-type lookups resolve the property's written type name
/// against the type scope (innermost candidate first), since reference
/// nodes store no cross-links in this model.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModelFinder {
    walker: AstWalker,
}

impl ModelFinder {
    pub fn new() -> Self {
        Self {
            walker: AstWalker::new(),
        }
    }

    /// The topmost container reachable from `node`. Cycle-safe: on a
    /// malformed parent chain the last node before the repeat is returned.
    pub fn root_of(&self, ast: &Ast, node: NodeId) -> NodeId {
        let mut visited = HashSet::new();
        let mut current = node;
        while let Some(parent) = ast.parent(current) {
            if !visited.insert(current) {
                break;
            }
            current = parent;
        }
        current
    }

    /// The nearest enclosing message or enum declaration
    pub fn enclosing_type(&self, ast: &Ast, node: NodeId) -> Option<NodeId> {
        let mut visited = HashSet::new();
        let mut current = ast.parent(node);
        while let Some(container) = current {
            if !visited.insert(container) {
                return None;
            }
            if matches!(ast.kind(container), Some(NodeKind::Type(_))) {
                return Some(container);
            }
            current = ast.parent(container);
        }
        None
    }

    /// The enum declaration a property's type resolves to, `None` when the
    /// type is scalar, unresolved, or not an enum
    pub fn enum_type_of(&self, ast: &Ast, property: NodeId) -> Option<NodeId> {
        let target = self.declared_type_of(ast, property)?;
        match ast.kind(target)? {
            NodeKind::Type(TypeDecl::Enum(_)) => Some(target),
            _ => None,
        }
    }

    /// The message scope a property's type resolves to: a message
    /// declaration, or a group acting as one
    pub fn message_type_of(&self, ast: &Ast, property: NodeId) -> Option<NodeId> {
        let target = self.declared_type_of(ast, property)?;
        match ast.kind(target)? {
            NodeKind::Type(TypeDecl::Message(_)) | NodeKind::Field(FieldDecl::Group(_)) => {
                Some(target)
            }
            _ => None,
        }
    }

    fn declared_type_of(&self, ast: &Ast, property: NodeId) -> Option<NodeId> {
        let type_ref = ast.as_property(property)?.type_ref;
        let written = match ast.kind(type_ref)? {
            NodeKind::TypeReference(TypeReference::Named(t)) => t.name.as_str(),
            _ => return None,
        };
        let scope = self.walker.traverse(ast, type_ref, &TypeScopeFinder::types());
        first_matching(&scope, written).map(|d| d.target)
    }
}
