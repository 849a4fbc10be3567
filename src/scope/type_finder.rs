//! Type visibility strategy
//!
//! Visibility follows lexical nesting: a reference inside message `M` sees
//! `M`'s own nested types, `M`'s siblings, ancestors' siblings and
//! top-level types. The walker scans innermost scope first, so on a name
//! collision the nested declaration precedes the outer one.

use crate::ast::{Ast, FieldDecl, NodeId, NodeKind, TypeDecl};
use crate::description::{Description, Origin};
use crate::walker::{relative_name, ScopeFinder};

/// Accepts message and enum declarations - or messages only, for positions
/// where an enum is not syntactically valid (extend targets, rpc argument
/// and return types). Groups count as message declarations.
#[derive(Debug, Clone, Copy)]
pub struct TypeScopeFinder {
    messages_only: bool,
    origin: Origin,
}

impl TypeScopeFinder {
    /// All named types
    pub fn types() -> Self {
        Self {
            messages_only: false,
            origin: Origin::Schema,
        }
    }

    /// Message types only
    pub fn messages() -> Self {
        Self {
            messages_only: true,
            origin: Origin::Schema,
        }
    }

    /// Tag produced descriptions as coming from `origin`
    pub fn with_origin(mut self, origin: Origin) -> Self {
        self.origin = origin;
        self
    }
}

impl ScopeFinder for TypeScopeFinder {
    fn describe(&self, ast: &Ast, node: NodeId, scope: NodeId, out: &mut Vec<Description>) {
        let accepted = match ast.kind(node) {
            Some(NodeKind::Type(TypeDecl::Message(_))) => true,
            Some(NodeKind::Type(TypeDecl::Enum(_))) => !self.messages_only,
            // a group declares an implicit message type alongside its field
            Some(NodeKind::Field(FieldDecl::Group(_))) => true,
            _ => false,
        };
        if !accepted {
            return;
        }
        let Some(name) = relative_name(ast, node, scope) else {
            return;
        };
        // at the file level the type is also visible under its
        // package-qualified name
        if matches!(ast.kind(scope), Some(NodeKind::Protobuf(_))) {
            if let Some(package) = ast.package_name() {
                out.push(Description::new(name.qualified_by(package), node, self.origin));
            }
        }
        out.push(Description::new(name, node, self.origin));
    }

    fn descends_into(&self, ast: &Ast, node: NodeId) -> bool {
        matches!(
            ast.kind(node),
            Some(
                NodeKind::Type(TypeDecl::Message(_))
                    | NodeKind::Field(FieldDecl::Group(_))
                    | NodeKind::Extend(_)
            )
        )
    }
}
