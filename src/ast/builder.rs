//! Tree construction
//!
//! [`AstBuilder`] is the API the parsing front end drives. It validates
//! parent/child compatibility before allocating - the only
//! construction-time error source - and is consumed into an immutable
//! [`Ast`]. A failed call leaves the builder unchanged.

use super::node::{
    CustomFieldOption, CustomOption, DefaultValueFieldOption, EnumDecl, ExtendFieldSource,
    ExtendMessage, FieldDecl, FieldOptionDecl, Group, LiteralDecl, Message, MessageFieldSource,
    MessageRef, Modifier, NativeFieldOption, NativeOption, Node, NodeKind, OptionDecl,
    OptionSource, Package, Property, Protobuf, Rpc, ScalarRef, ScalarType, Service, TypeDecl,
    TypeRef, TypeReference, ValueRef,
};
use super::{Ast, NodeId};
use crate::name::QualifiedName;
use crate::{Error, Result};

/// The declared type of a property being built.
#[derive(Debug, Clone, Copy)]
pub enum FieldType<'a> {
    /// A named type reference, resolved lazily against the type scope
    Named(&'a str),
    Scalar(ScalarType),
}

/// Incrementally builds an [`Ast`]. Slot 0 is the `Protobuf` root.
#[derive(Debug)]
pub struct AstBuilder {
    nodes: Vec<Node>,
}

impl AstBuilder {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                parent: None,
                kind: NodeKind::Protobuf(Protobuf {
                    elements: Vec::new(),
                }),
            }],
        }
    }

    /// The root node every top-level element attaches to
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Consume the builder into an immutable tree
    pub fn build(self) -> Ast {
        Ast { nodes: self.nodes }
    }

    /// Declare `package <name>;` at the file level
    pub fn package(&mut self, parent: NodeId, name: impl Into<String>) -> Result<NodeId> {
        let name = name.into();
        QualifiedName::parse(&name)?;
        self.check_element(parent, "package", |p| matches!(p, NodeKind::Protobuf(_)))?;
        let id = self.alloc(Some(parent), NodeKind::Package(Package { name }));
        self.push_element(parent, id);
        Ok(id)
    }

    pub fn message(&mut self, parent: NodeId, name: impl Into<String>) -> Result<NodeId> {
        self.check_element(parent, "message", accepts_type)?;
        let kind = NodeKind::Type(TypeDecl::Message(Message {
            name: name.into(),
            elements: Vec::new(),
        }));
        let id = self.alloc(Some(parent), kind);
        self.push_element(parent, id);
        Ok(id)
    }

    pub fn enum_type(&mut self, parent: NodeId, name: impl Into<String>) -> Result<NodeId> {
        self.check_element(parent, "enum", accepts_type)?;
        let kind = NodeKind::Type(TypeDecl::Enum(EnumDecl {
            name: name.into(),
            elements: Vec::new(),
        }));
        let id = self.alloc(Some(parent), kind);
        self.push_element(parent, id);
        Ok(id)
    }

    pub fn literal(&mut self, parent: NodeId, name: impl Into<String>, index: i64) -> Result<NodeId> {
        self.check_element(parent, "literal", |p| {
            matches!(p, NodeKind::Type(TypeDecl::Enum(_)))
        })?;
        let kind = NodeKind::Literal(LiteralDecl {
            name: name.into(),
            index,
            options: Vec::new(),
        });
        let id = self.alloc(Some(parent), kind);
        self.push_element(parent, id);
        Ok(id)
    }

    /// Declare a property field; its type reference node is created here
    pub fn property(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
        index: i64,
        modifier: Modifier,
        field_type: FieldType<'_>,
    ) -> Result<NodeId> {
        self.check_element(parent, "property", accepts_field)?;
        let type_ref = match field_type {
            FieldType::Named(name) => NodeKind::TypeReference(TypeReference::Named(TypeRef {
                name: name.to_string(),
            })),
            FieldType::Scalar(scalar) => {
                NodeKind::TypeReference(TypeReference::Scalar(ScalarRef { scalar }))
            }
        };
        let type_ref = self.alloc(None, type_ref);
        let kind = NodeKind::Field(FieldDecl::Property(Property {
            name: name.into(),
            index,
            modifier,
            type_ref,
            options: Vec::new(),
        }));
        let id = self.alloc(Some(parent), kind);
        self.adopt(type_ref, id);
        self.push_element(parent, id);
        Ok(id)
    }

    pub fn group(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
        index: i64,
        modifier: Modifier,
    ) -> Result<NodeId> {
        self.check_element(parent, "group", accepts_field)?;
        let kind = NodeKind::Field(FieldDecl::Group(Group {
            name: name.into(),
            index,
            modifier,
            elements: Vec::new(),
            options: Vec::new(),
        }));
        let id = self.alloc(Some(parent), kind);
        self.push_element(parent, id);
        Ok(id)
    }

    /// Open an `extend <target>` block
    pub fn extend(&mut self, parent: NodeId, target: impl Into<String>) -> Result<NodeId> {
        self.check_element(parent, "extend", accepts_type)?;
        let target = self.alloc(
            None,
            NodeKind::MessageRef(MessageRef {
                name: target.into(),
            }),
        );
        let kind = NodeKind::Extend(ExtendMessage {
            target,
            elements: Vec::new(),
        });
        let id = self.alloc(Some(parent), kind);
        self.adopt(target, id);
        self.push_element(parent, id);
        Ok(id)
    }

    pub fn service(&mut self, parent: NodeId, name: impl Into<String>) -> Result<NodeId> {
        self.check_element(parent, "service", |p| matches!(p, NodeKind::Protobuf(_)))?;
        let kind = NodeKind::Service(Service {
            name: name.into(),
            elements: Vec::new(),
        });
        let id = self.alloc(Some(parent), kind);
        self.push_element(parent, id);
        Ok(id)
    }

    pub fn rpc(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
        arg: impl Into<String>,
        ret: impl Into<String>,
    ) -> Result<NodeId> {
        self.check_element(parent, "rpc", |p| matches!(p, NodeKind::Service(_)))?;
        let arg = self.alloc(None, NodeKind::MessageRef(MessageRef { name: arg.into() }));
        let ret = self.alloc(None, NodeKind::MessageRef(MessageRef { name: ret.into() }));
        let kind = NodeKind::Rpc(Rpc {
            name: name.into(),
            arg,
            ret,
            options: Vec::new(),
        });
        let id = self.alloc(Some(parent), kind);
        self.adopt(arg, id);
        self.adopt(ret, id);
        self.push_element(parent, id);
        Ok(id)
    }

    /// `option <name> = <value>;` targeting a built-in descriptor field
    pub fn native_option(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
        value: ValueRef,
    ) -> Result<NodeId> {
        self.check_element(parent, "native option", accepts_statement_option)?;
        let (source, value) = self.option_parts(name, value);
        let kind = NodeKind::Option(OptionDecl::Native(NativeOption { source, value }));
        let id = self.alloc(Some(parent), kind);
        self.adopt(source, id);
        self.adopt(value, id);
        self.push_statement_option(parent, id);
        Ok(id)
    }

    /// `option (<name>) = <value>;` targeting an extension field
    pub fn custom_option(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
        value: ValueRef,
    ) -> Result<NodeId> {
        self.check_element(parent, "custom option", accepts_statement_option)?;
        let (source, value) = self.option_parts(name, value);
        let kind = NodeKind::Option(OptionDecl::Custom(CustomOption {
            source,
            fields: Vec::new(),
            value,
        }));
        let id = self.alloc(Some(parent), kind);
        self.adopt(source, id);
        self.adopt(value, id);
        self.push_statement_option(parent, id);
        Ok(id)
    }

    /// `[<name> = <value>]` on a field or enum literal
    pub fn native_field_option(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
        value: ValueRef,
    ) -> Result<NodeId> {
        self.check_element(parent, "native field option", accepts_field_option)?;
        let (source, value) = self.option_parts(name, value);
        let kind = NodeKind::FieldOption(FieldOptionDecl::Native(NativeFieldOption {
            source,
            value,
        }));
        let id = self.alloc(Some(parent), kind);
        self.adopt(source, id);
        self.adopt(value, id);
        self.push_field_option(parent, id);
        Ok(id)
    }

    /// `[(<name>) = <value>]` on a field or enum literal
    pub fn custom_field_option(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
        value: ValueRef,
    ) -> Result<NodeId> {
        self.check_element(parent, "custom field option", accepts_field_option)?;
        let (source, value) = self.option_parts(name, value);
        let kind = NodeKind::FieldOption(FieldOptionDecl::Custom(CustomFieldOption {
            source,
            fields: Vec::new(),
            value,
        }));
        let id = self.alloc(Some(parent), kind);
        self.adopt(source, id);
        self.adopt(value, id);
        self.push_field_option(parent, id);
        Ok(id)
    }

    /// `[default = <value>]` on a property
    pub fn default_value(&mut self, parent: NodeId, value: ValueRef) -> Result<NodeId> {
        self.check_element(parent, "default value option", |p| {
            matches!(p, NodeKind::Field(FieldDecl::Property(_)))
        })?;
        let value = self.alloc(None, NodeKind::Value(value));
        let kind =
            NodeKind::FieldOption(FieldOptionDecl::DefaultValue(DefaultValueFieldOption {
                value,
            }));
        let id = self.alloc(Some(parent), kind);
        self.adopt(value, id);
        self.push_field_option(parent, id);
        Ok(id)
    }

    /// Append a `.name` path segment to a custom option
    pub fn message_field(&mut self, option: NodeId, name: impl Into<String>) -> Result<NodeId> {
        self.check_element(option, "message field source", accepts_segment)?;
        let kind = NodeKind::MessageFieldSource(MessageFieldSource { name: name.into() });
        let id = self.alloc(Some(option), kind);
        self.push_segment(option, id);
        Ok(id)
    }

    /// Append a `.(name)` path segment to a custom option
    pub fn extend_field(&mut self, option: NodeId, name: impl Into<String>) -> Result<NodeId> {
        self.check_element(option, "extend field source", accepts_segment)?;
        let kind = NodeKind::ExtendFieldSource(ExtendFieldSource { name: name.into() });
        let id = self.alloc(Some(option), kind);
        self.push_segment(option, id);
        Ok(id)
    }

    fn option_parts(&mut self, name: impl Into<String>, value: ValueRef) -> (NodeId, NodeId) {
        let source = self.alloc(None, NodeKind::OptionSource(OptionSource { name: name.into() }));
        let value = self.alloc(None, NodeKind::Value(value));
        (source, value)
    }

    fn alloc(&mut self, parent: Option<NodeId>, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node { parent, kind });
        id
    }

    fn adopt(&mut self, child: NodeId, parent: NodeId) {
        self.nodes[child.index()].parent = Some(parent);
    }

    fn check_element(
        &self,
        parent: NodeId,
        child: &'static str,
        accepts: impl Fn(&NodeKind) -> bool,
    ) -> Result<()> {
        let Some(node) = self.nodes.get(parent.index()) else {
            return Err(Error::InvalidStructure(format!(
                "unknown parent node {} for {}",
                parent, child
            )));
        };
        if !accepts(&node.kind) {
            return Err(Error::InvalidStructure(format!(
                "cannot attach {} under {}",
                child,
                node.kind.as_str()
            )));
        }
        Ok(())
    }

    fn push_element(&mut self, parent: NodeId, child: NodeId) {
        match &mut self.nodes[parent.index()].kind {
            NodeKind::Protobuf(p) => p.elements.push(child),
            NodeKind::Type(TypeDecl::Message(m)) => m.elements.push(child),
            NodeKind::Type(TypeDecl::Enum(e)) => e.elements.push(child),
            NodeKind::Field(FieldDecl::Group(g)) => g.elements.push(child),
            NodeKind::Extend(e) => e.elements.push(child),
            NodeKind::Service(s) => s.elements.push(child),
            _ => unreachable!("check_element validated the parent"),
        }
    }

    fn push_statement_option(&mut self, parent: NodeId, child: NodeId) {
        match &mut self.nodes[parent.index()].kind {
            NodeKind::Rpc(r) => r.options.push(child),
            _ => self.push_element(parent, child),
        }
    }

    fn push_field_option(&mut self, parent: NodeId, child: NodeId) {
        match &mut self.nodes[parent.index()].kind {
            NodeKind::Field(FieldDecl::Property(p)) => p.options.push(child),
            NodeKind::Field(FieldDecl::Group(g)) => g.options.push(child),
            NodeKind::Literal(l) => l.options.push(child),
            _ => unreachable!("check_element validated the parent"),
        }
    }

    fn push_segment(&mut self, parent: NodeId, child: NodeId) {
        match &mut self.nodes[parent.index()].kind {
            NodeKind::Option(OptionDecl::Custom(o)) => o.fields.push(child),
            NodeKind::FieldOption(FieldOptionDecl::Custom(o)) => o.fields.push(child),
            _ => unreachable!("check_element validated the parent"),
        }
    }
}

fn accepts_type(parent: &NodeKind) -> bool {
    matches!(
        parent,
        NodeKind::Protobuf(_)
            | NodeKind::Type(TypeDecl::Message(_))
            | NodeKind::Field(FieldDecl::Group(_))
    )
}

fn accepts_field(parent: &NodeKind) -> bool {
    matches!(
        parent,
        NodeKind::Type(TypeDecl::Message(_))
            | NodeKind::Field(FieldDecl::Group(_))
            | NodeKind::Extend(_)
    )
}

fn accepts_statement_option(parent: &NodeKind) -> bool {
    matches!(
        parent,
        NodeKind::Protobuf(_)
            | NodeKind::Type(_)
            | NodeKind::Field(FieldDecl::Group(_))
            | NodeKind::Service(_)
            | NodeKind::Rpc(_)
    )
}

fn accepts_field_option(parent: &NodeKind) -> bool {
    matches!(
        parent,
        NodeKind::Field(_) | NodeKind::Literal(_)
    )
}

fn accepts_segment(parent: &NodeKind) -> bool {
    matches!(
        parent,
        NodeKind::Option(OptionDecl::Custom(_)) | NodeKind::FieldOption(FieldOptionDecl::Custom(_))
    )
}

impl Default for AstBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parent_links_are_set() {
        let mut builder = AstBuilder::new();
        let root = builder.root();
        let person = builder.message(root, "Person").unwrap();
        let field = builder
            .property(person, "name", 1, Modifier::Optional, FieldType::Scalar(ScalarType::String))
            .unwrap();
        let ast = builder.build();

        assert_eq!(ast.parent(person), Some(root));
        assert_eq!(ast.parent(field), Some(person));
        let type_ref = ast.as_property(field).unwrap().type_ref;
        assert_eq!(ast.parent(type_ref), Some(field));
    }

    #[test]
    fn test_rejects_invalid_attachment() {
        let mut builder = AstBuilder::new();
        let root = builder.root();
        let person = builder.message(root, "Person").unwrap();

        // literals only live inside enums
        assert!(builder.literal(person, "MALE", 0).is_err());
        // rpcs only live inside services
        assert!(builder.rpc(root, "Get", "Req", "Resp").is_err());
        // properties cannot hang off the file root
        assert!(
            builder
                .property(root, "x", 1, Modifier::Optional, FieldType::Scalar(ScalarType::Int32))
                .is_err()
        );
        // a failed call allocates nothing
        let before = builder.nodes.len();
        assert!(builder.literal(person, "MALE", 0).is_err());
        assert_eq!(builder.nodes.len(), before);
    }

    #[test]
    fn test_rejects_invalid_package_name() {
        let mut builder = AstBuilder::new();
        let root = builder.root();
        assert!(builder.package(root, "foo..bar").is_err());
        assert!(builder.package(NodeId(99), "foo").is_err());
    }

    #[test]
    fn test_custom_option_segments() {
        let mut builder = AstBuilder::new();
        let root = builder.root();
        let option = builder.custom_option(root, "my_opt", ValueRef::int(5)).unwrap();
        let seg = builder.message_field(option, "nested").unwrap();
        let ast = builder.build();

        assert_eq!(ast.parent(seg), Some(option));
        assert!(ast.children(option).contains(&seg));
    }

    #[test]
    fn test_option_attachment_rules() {
        let mut builder = AstBuilder::new();
        let root = builder.root();
        let person = builder.message(root, "Person").unwrap();
        let field = builder
            .property(person, "name", 1, Modifier::Optional, FieldType::Scalar(ScalarType::String))
            .unwrap();

        // statement options attach to containers, bracketed options to fields
        assert!(builder.native_option(root, "java_package", ValueRef::string("com.x")).is_ok());
        assert!(builder.native_field_option(field, "deprecated", ValueRef::bool(true)).is_ok());
        assert!(builder.native_field_option(root, "deprecated", ValueRef::bool(true)).is_err());
        // path segments only attach to custom options
        let native = builder.native_option(person, "deprecated", ValueRef::bool(true)).unwrap();
        assert!(builder.message_field(native, "x").is_err());
    }
}
