//! Node payload types
//!
//! Every node category with more than one shape is a closed sum type
//! (`TypeDecl`, `FieldDecl`, `OptionDecl`, `FieldOptionDecl`, `ValueRef`,
//! `TypeReference`), so dispatch sites are exhaustive matches rather than
//! runtime cast chains.
//!
//! Reference nodes (`TypeRef`, `MessageRef`, `LiteralRef`, `OptionSource`
//! and the option path segments) carry only the written name; binding is
//! computed lazily by the scope provider.

use super::NodeId;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A node in the tree: its container link plus its payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub(crate) parent: Option<NodeId>,
    pub(crate) kind: NodeKind,
}

impl Node {
    /// The syntactic container of this node, `None` for the root
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// The payload of this node
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }
}

/// Payload of a node, one variant per syntactic category.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// The file root, owning the ordered top-level elements
    Protobuf(Protobuf),
    /// A `package foo.bar;` declaration
    Package(Package),
    /// A message or enum declaration
    Type(TypeDecl),
    /// A property or group field
    Field(FieldDecl),
    /// An enum literal
    Literal(LiteralDecl),
    /// An `extend` block
    Extend(ExtendMessage),
    Service(Service),
    Rpc(Rpc),
    /// A statement-level option
    Option(OptionDecl),
    /// A bracketed option on a field or enum literal
    FieldOption(FieldOptionDecl),
    /// Reference to the option field being set
    OptionSource(OptionSource),
    /// A `.name` segment of a custom option path
    MessageFieldSource(MessageFieldSource),
    /// A `.(name)` segment of a custom option path
    ExtendFieldSource(ExtendFieldSource),
    /// The declared type of a property
    TypeReference(TypeReference),
    /// A message-only reference (extend target, rpc argument/return)
    MessageRef(MessageRef),
    /// An option value
    Value(ValueRef),
}

impl NodeKind {
    /// Short tag for logging and error messages
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Protobuf(_) => "protobuf",
            NodeKind::Package(_) => "package",
            NodeKind::Type(TypeDecl::Message(_)) => "message",
            NodeKind::Type(TypeDecl::Enum(_)) => "enum",
            NodeKind::Field(FieldDecl::Property(_)) => "property",
            NodeKind::Field(FieldDecl::Group(_)) => "group",
            NodeKind::Literal(_) => "literal",
            NodeKind::Extend(_) => "extend",
            NodeKind::Service(_) => "service",
            NodeKind::Rpc(_) => "rpc",
            NodeKind::Option(OptionDecl::Native(_)) => "native option",
            NodeKind::Option(OptionDecl::Custom(_)) => "custom option",
            NodeKind::FieldOption(FieldOptionDecl::Native(_)) => "native field option",
            NodeKind::FieldOption(FieldOptionDecl::Custom(_)) => "custom field option",
            NodeKind::FieldOption(FieldOptionDecl::DefaultValue(_)) => "default value option",
            NodeKind::OptionSource(_) => "option source",
            NodeKind::MessageFieldSource(_) => "message field source",
            NodeKind::ExtendFieldSource(_) => "extend field source",
            NodeKind::TypeReference(_) => "type reference",
            NodeKind::MessageRef(_) => "message reference",
            NodeKind::Value(_) => "value",
        }
    }

    /// The declared name, for named declarations
    pub fn name(&self) -> Option<&str> {
        match self {
            NodeKind::Package(p) => Some(&p.name),
            NodeKind::Type(TypeDecl::Message(m)) => Some(&m.name),
            NodeKind::Type(TypeDecl::Enum(e)) => Some(&e.name),
            NodeKind::Field(FieldDecl::Property(p)) => Some(&p.name),
            NodeKind::Field(FieldDecl::Group(g)) => Some(&g.name),
            NodeKind::Literal(l) => Some(&l.name),
            NodeKind::Service(s) => Some(&s.name),
            NodeKind::Rpc(r) => Some(&r.name),
            _ => None,
        }
    }

    /// The written name of a reference node, if this is one
    pub fn written_name(&self) -> Option<&str> {
        match self {
            NodeKind::OptionSource(s) => Some(&s.name),
            NodeKind::MessageFieldSource(s) => Some(&s.name),
            NodeKind::ExtendFieldSource(s) => Some(&s.name),
            NodeKind::TypeReference(TypeReference::Named(t)) => Some(&t.name),
            NodeKind::MessageRef(m) => Some(&m.name),
            NodeKind::Value(ValueRef::Literal(l)) => Some(&l.name),
            _ => None,
        }
    }

    /// Whether this node is a cross-reference the scope provider resolves
    pub fn is_reference(&self) -> bool {
        self.written_name().is_some()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Protobuf {
    pub elements: Vec<NodeId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Package {
    /// Dotted package name, e.g. `foo.bar`
    pub name: String,
}

/// A named type: message or enum.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeDecl {
    Message(Message),
    Enum(EnumDecl),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub name: String,
    /// Ordered message elements: options, fields, nested types, extend blocks
    pub elements: Vec<NodeId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumDecl {
    pub name: String,
    /// Ordered enum elements: literals and options
    pub elements: Vec<NodeId>,
}

/// A field: a plain property or a group.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldDecl {
    Property(Property),
    Group(Group),
}

impl FieldDecl {
    pub fn name(&self) -> &str {
        match self {
            FieldDecl::Property(p) => &p.name,
            FieldDecl::Group(g) => &g.name,
        }
    }

    pub fn index(&self) -> i64 {
        match self {
            FieldDecl::Property(p) => p.index,
            FieldDecl::Group(g) => g.index,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub name: String,
    /// Tag number, unique within the enclosing message
    pub index: i64,
    pub modifier: Modifier,
    /// Child `TypeReference` node
    pub type_ref: NodeId,
    pub options: Vec<NodeId>,
}

/// A group declares a field and an implicit nested message scope at once.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub name: String,
    pub index: i64,
    pub modifier: Modifier,
    pub elements: Vec<NodeId>,
    pub options: Vec<NodeId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LiteralDecl {
    pub name: String,
    pub index: i64,
    /// Bracketed field options on the literal
    pub options: Vec<NodeId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExtendMessage {
    /// Child `MessageRef` node naming the extended message
    pub target: NodeId,
    /// Extension fields (properties and groups)
    pub elements: Vec<NodeId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Service {
    pub name: String,
    /// Rpcs and options, in declaration order
    pub elements: Vec<NodeId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Rpc {
    pub name: String,
    /// Child `MessageRef` for the argument type
    pub arg: NodeId,
    /// Child `MessageRef` for the return type
    pub ret: NodeId,
    pub options: Vec<NodeId>,
}

/// A statement-level option: native (descriptor-backed) or custom
/// (extension-field-backed).
#[derive(Debug, Clone, PartialEq)]
pub enum OptionDecl {
    Native(NativeOption),
    Custom(CustomOption),
}

#[derive(Debug, Clone, PartialEq)]
pub struct NativeOption {
    /// Child `OptionSource` node
    pub source: NodeId,
    /// Child `ValueRef` node
    pub value: NodeId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CustomOption {
    pub source: NodeId,
    /// Chained path segments (`MessageFieldSource` / `ExtendFieldSource`)
    pub fields: Vec<NodeId>,
    pub value: NodeId,
}

/// A bracketed option on a field or literal.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldOptionDecl {
    Native(NativeFieldOption),
    Custom(CustomFieldOption),
    /// The synthetic `default` pseudo-option; its literal's enum type comes
    /// from the owning property's declared type, not a descriptor lookup
    DefaultValue(DefaultValueFieldOption),
}

#[derive(Debug, Clone, PartialEq)]
pub struct NativeFieldOption {
    pub source: NodeId,
    pub value: NodeId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CustomFieldOption {
    pub source: NodeId,
    pub fields: Vec<NodeId>,
    pub value: NodeId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DefaultValueFieldOption {
    pub value: NodeId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OptionSource {
    /// Written name of the option field, possibly dotted for custom options
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MessageFieldSource {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExtendFieldSource {
    pub name: String,
}

/// The declared type of a property: a named type reference or a scalar.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeReference {
    Named(TypeRef),
    Scalar(ScalarRef),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeRef {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScalarRef {
    pub scalar: ScalarType,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MessageRef {
    pub name: String,
}

/// An option or default value.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueRef {
    /// Names an enum literal; the one value variant that is a reference
    Literal(LiteralRef),
    Number(NumberRef),
    Str(StringRef),
    Bool(BoolRef),
}

impl ValueRef {
    pub fn literal(name: impl Into<String>) -> Self {
        ValueRef::Literal(LiteralRef { name: name.into() })
    }

    pub fn int(value: i64) -> Self {
        ValueRef::Number(NumberRef {
            value: NumberValue::Int(value),
        })
    }

    pub fn double(value: f64) -> Self {
        ValueRef::Number(NumberRef {
            value: NumberValue::Double(value),
        })
    }

    pub fn string(value: impl Into<String>) -> Self {
        ValueRef::Str(StringRef {
            value: value.into(),
        })
    }

    pub fn bool(value: bool) -> Self {
        ValueRef::Bool(BoolRef { value })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LiteralRef {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NumberRef {
    pub value: NumberValue,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumberValue {
    Int(i64),
    Double(f64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct StringRef {
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoolRef {
    pub value: bool,
}

/// Field label of a property or group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modifier {
    Optional,
    Required,
    Repeated,
}

impl Modifier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Modifier::Optional => "optional",
            Modifier::Required => "required",
            Modifier::Repeated => "repeated",
        }
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The proto scalar value types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalarType {
    Double,
    Float,
    Int32,
    Int64,
    Uint32,
    Uint64,
    Sint32,
    Sint64,
    Fixed32,
    Fixed64,
    Sfixed32,
    Sfixed64,
    Bool,
    String,
    Bytes,
}

impl ScalarType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScalarType::Double => "double",
            ScalarType::Float => "float",
            ScalarType::Int32 => "int32",
            ScalarType::Int64 => "int64",
            ScalarType::Uint32 => "uint32",
            ScalarType::Uint64 => "uint64",
            ScalarType::Sint32 => "sint32",
            ScalarType::Sint64 => "sint64",
            ScalarType::Fixed32 => "fixed32",
            ScalarType::Fixed64 => "fixed64",
            ScalarType::Sfixed32 => "sfixed32",
            ScalarType::Sfixed64 => "sfixed64",
            ScalarType::Bool => "bool",
            ScalarType::String => "string",
            ScalarType::Bytes => "bytes",
        }
    }

    pub fn all() -> &'static [ScalarType] {
        &[
            ScalarType::Double,
            ScalarType::Float,
            ScalarType::Int32,
            ScalarType::Int64,
            ScalarType::Uint32,
            ScalarType::Uint64,
            ScalarType::Sint32,
            ScalarType::Sint64,
            ScalarType::Fixed32,
            ScalarType::Fixed64,
            ScalarType::Sfixed32,
            ScalarType::Sfixed64,
            ScalarType::Bool,
            ScalarType::String,
            ScalarType::Bytes,
        ]
    }
}

impl FromStr for ScalarType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        ScalarType::all()
            .iter()
            .copied()
            .find(|scalar| scalar.as_str() == s)
            .ok_or_else(|| Error::InvalidName(format!("unknown scalar type: {}", s)))
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Uniform view over "a field-like thing with a position": properties,
/// groups and enum literals, from the schema tree and the descriptor alike.
#[derive(Debug, Clone, Copy)]
pub enum IndexedElement<'a> {
    Property(&'a Property),
    Group(&'a Group),
    Literal(&'a LiteralDecl),
}

impl<'a> IndexedElement<'a> {
    pub fn name(&self) -> &'a str {
        match self {
            IndexedElement::Property(p) => &p.name,
            IndexedElement::Group(g) => &g.name,
            IndexedElement::Literal(l) => &l.name,
        }
    }

    pub fn index(&self) -> i64 {
        match self {
            IndexedElement::Property(p) => p.index,
            IndexedElement::Group(g) => g.index,
            IndexedElement::Literal(l) => l.index,
        }
    }
}
