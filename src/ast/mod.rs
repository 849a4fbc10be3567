//! Arena-backed AST for protobuf-style schema files
//!
//! One [`Ast`] owns every node of a file; [`NodeId`] is a copyable index
//! into it. Each node records its syntactic container, children are ordered
//! id lists inside the payloads. The arena is immutable once built - a
//! resolution call borrows `&Ast` and therefore observes one consistent
//! snapshot; an editor edit is a rebuild through [`AstBuilder`].

pub mod builder;
pub mod node;

pub use builder::{AstBuilder, FieldType};
pub use node::{
    BoolRef, CustomFieldOption, CustomOption, DefaultValueFieldOption, EnumDecl, ExtendFieldSource,
    ExtendMessage, FieldDecl, FieldOptionDecl, Group, IndexedElement, LiteralDecl, LiteralRef,
    Message, MessageFieldSource, MessageRef, Modifier, NativeFieldOption, NativeOption, Node,
    NodeKind, NumberRef, NumberValue, OptionDecl, OptionSource, Package, Property, Protobuf, Rpc,
    ScalarRef, ScalarType, Service, StringRef, TypeDecl, TypeRef, TypeReference, ValueRef,
};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a node within its [`Ast`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// The arena slot of this node
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An immutable schema tree.
#[derive(Debug, Clone)]
pub struct Ast {
    pub(crate) nodes: Vec<Node>,
}

impl Ast {
    /// The root `Protobuf` node. Always present - slot 0 is reserved for it.
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Number of nodes in the tree
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Look up a node, `None` for dangling ids
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// The payload of a node
    pub fn kind(&self, id: NodeId) -> Option<&NodeKind> {
        self.get(id).map(Node::kind)
    }

    /// The syntactic container of a node
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(Node::parent)
    }

    /// All node ids, in creation order
    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len() as u32).map(NodeId)
    }

    /// Ordered children of a node. Declaration order is preserved, so enum
    /// literals come back in the order they were declared.
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        let Some(node) = self.get(id) else {
            return Vec::new();
        };
        let mut out = Vec::new();
        match node.kind() {
            NodeKind::Protobuf(p) => out.extend(&p.elements),
            NodeKind::Package(_) => {}
            NodeKind::Type(TypeDecl::Message(m)) => out.extend(&m.elements),
            NodeKind::Type(TypeDecl::Enum(e)) => out.extend(&e.elements),
            NodeKind::Field(FieldDecl::Property(p)) => {
                out.push(p.type_ref);
                out.extend(&p.options);
            }
            NodeKind::Field(FieldDecl::Group(g)) => {
                out.extend(&g.elements);
                out.extend(&g.options);
            }
            NodeKind::Literal(l) => out.extend(&l.options),
            NodeKind::Extend(e) => {
                out.push(e.target);
                out.extend(&e.elements);
            }
            NodeKind::Service(s) => out.extend(&s.elements),
            NodeKind::Rpc(r) => {
                out.push(r.arg);
                out.push(r.ret);
                out.extend(&r.options);
            }
            NodeKind::Option(OptionDecl::Native(o)) => {
                out.push(o.source);
                out.push(o.value);
            }
            NodeKind::Option(OptionDecl::Custom(o)) => {
                out.push(o.source);
                out.extend(&o.fields);
                out.push(o.value);
            }
            NodeKind::FieldOption(FieldOptionDecl::Native(o)) => {
                out.push(o.source);
                out.push(o.value);
            }
            NodeKind::FieldOption(FieldOptionDecl::Custom(o)) => {
                out.push(o.source);
                out.extend(&o.fields);
                out.push(o.value);
            }
            NodeKind::FieldOption(FieldOptionDecl::DefaultValue(o)) => out.push(o.value),
            NodeKind::OptionSource(_)
            | NodeKind::MessageFieldSource(_)
            | NodeKind::ExtendFieldSource(_)
            | NodeKind::TypeReference(_)
            | NodeKind::MessageRef(_)
            | NodeKind::Value(_) => {}
        }
        out
    }

    /// The declared name of a node, for named declarations
    pub fn name_of(&self, id: NodeId) -> Option<&str> {
        self.kind(id).and_then(NodeKind::name)
    }

    /// The dotted package name declared at the file level, if any
    pub fn package_name(&self) -> Option<&str> {
        let root = self.get(self.root())?;
        let NodeKind::Protobuf(p) = root.kind() else {
            return None;
        };
        p.elements.iter().find_map(|id| match self.kind(*id) {
            Some(NodeKind::Package(pkg)) => Some(pkg.name.as_str()),
            _ => None,
        })
    }

    /// Uniform indexed-element view over properties, groups and literals
    pub fn indexed_element(&self, id: NodeId) -> Option<IndexedElement<'_>> {
        match self.kind(id)? {
            NodeKind::Field(FieldDecl::Property(p)) => Some(IndexedElement::Property(p)),
            NodeKind::Field(FieldDecl::Group(g)) => Some(IndexedElement::Group(g)),
            NodeKind::Literal(l) => Some(IndexedElement::Literal(l)),
            _ => None,
        }
    }

    pub fn as_message(&self, id: NodeId) -> Option<&Message> {
        match self.kind(id)? {
            NodeKind::Type(TypeDecl::Message(m)) => Some(m),
            _ => None,
        }
    }

    pub fn as_enum(&self, id: NodeId) -> Option<&EnumDecl> {
        match self.kind(id)? {
            NodeKind::Type(TypeDecl::Enum(e)) => Some(e),
            _ => None,
        }
    }

    pub fn as_property(&self, id: NodeId) -> Option<&Property> {
        match self.kind(id)? {
            NodeKind::Field(FieldDecl::Property(p)) => Some(p),
            _ => None,
        }
    }

    pub fn as_group(&self, id: NodeId) -> Option<&Group> {
        match self.kind(id)? {
            NodeKind::Field(FieldDecl::Group(g)) => Some(g),
            _ => None,
        }
    }

    pub fn as_extend(&self, id: NodeId) -> Option<&ExtendMessage> {
        match self.kind(id)? {
            NodeKind::Extend(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_children_preserve_declaration_order() {
        let mut builder = AstBuilder::new();
        let root = builder.root();
        let gender = builder.enum_type(root, "Gender").unwrap();
        builder.literal(gender, "MALE", 0).unwrap();
        builder.literal(gender, "FEMALE", 1).unwrap();
        let ast = builder.build();

        let names: Vec<&str> = ast
            .children(gender)
            .into_iter()
            .filter_map(|id| ast.name_of(id))
            .collect();
        assert_eq!(names, vec!["MALE", "FEMALE"]);
    }

    #[test]
    fn test_dangling_ids_are_tolerated() {
        let ast = AstBuilder::new().build();
        let dangling = NodeId(42);
        assert!(ast.get(dangling).is_none());
        assert!(ast.children(dangling).is_empty());
        assert!(ast.parent(dangling).is_none());
    }

    #[test]
    fn test_package_name() {
        let mut builder = AstBuilder::new();
        let root = builder.root();
        builder.package(root, "foo.bar").unwrap();
        let ast = builder.build();
        assert_eq!(ast.package_name(), Some("foo.bar"));

        let empty = AstBuilder::new().build();
        assert_eq!(empty.package_name(), None);
    }
}
