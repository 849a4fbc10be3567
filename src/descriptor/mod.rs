//! The primary descriptor - the built-in option schema
//!
//! The descriptor is itself an [`Ast`]: one synthetic tree holding the
//! built-in `*Options` messages and their enums, built once per process and
//! immutable thereafter. Descriptor lookups and schema lookups therefore
//! share one node model - a native option's target is a `Property` node
//! exactly like a schema field is.

pub mod config;

pub use config::DescriptorConfig;

use crate::ast::{
    Ast, AstBuilder, FieldDecl, FieldType, Modifier, NodeId, NodeKind, ScalarType, TypeDecl,
};
use crate::finder::ModelFinder;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// The syntactic level an option appears at, naming the built-in options
/// message holding its native fields and extended by its custom fields.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum OptionType {
    File,
    Message,
    Field,
    Enum,
    Literal,
    Service,
    Rpc,
}

impl OptionType {
    /// The built-in options message for this level
    pub fn message_name(&self) -> &'static str {
        match self {
            OptionType::File => "FileOptions",
            OptionType::Message => "MessageOptions",
            OptionType::Field => "FieldOptions",
            OptionType::Enum => "EnumOptions",
            OptionType::Literal => "EnumValueOptions",
            OptionType::Service => "ServiceOptions",
            OptionType::Rpc => "MethodOptions",
        }
    }

    pub fn all() -> &'static [OptionType] {
        &[
            OptionType::File,
            OptionType::Message,
            OptionType::Field,
            OptionType::Enum,
            OptionType::Literal,
            OptionType::Service,
            OptionType::Rpc,
        ]
    }

    /// The level of an option or field option node, from its container kind.
    /// `None` for a malformed container chain.
    pub fn of_option(ast: &Ast, option: NodeId) -> Option<OptionType> {
        let parent = ast.parent(option)?;
        match ast.kind(option)? {
            NodeKind::Option(_) => match ast.kind(parent)? {
                NodeKind::Protobuf(_) => Some(OptionType::File),
                NodeKind::Type(TypeDecl::Message(_)) | NodeKind::Field(FieldDecl::Group(_)) => {
                    Some(OptionType::Message)
                }
                NodeKind::Type(TypeDecl::Enum(_)) => Some(OptionType::Enum),
                NodeKind::Service(_) => Some(OptionType::Service),
                NodeKind::Rpc(_) => Some(OptionType::Rpc),
                _ => None,
            },
            NodeKind::FieldOption(_) => match ast.kind(parent)? {
                NodeKind::Field(_) => Some(OptionType::Field),
                NodeKind::Literal(_) => Some(OptionType::Literal),
                _ => None,
            },
            _ => None,
        }
    }

    /// Whether a written extend target names this level's options message.
    /// Accepts the bare name, the `google.protobuf.`-qualified form and one
    /// leading dot.
    pub fn matches_target(&self, written: &str) -> bool {
        let written = written.strip_prefix('.').unwrap_or(written);
        match written.strip_suffix(self.message_name()) {
            Some(prefix) => prefix.is_empty() || prefix == "google.protobuf.",
            None => false,
        }
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message_name())
    }
}

/// The fixed table of built-in options, held as a synthetic tree.
#[derive(Debug, Clone)]
pub struct ProtoDescriptor {
    ast: Ast,
    options_messages: BTreeMap<OptionType, NodeId>,
}

impl ProtoDescriptor {
    /// The built-in table alone
    pub fn new() -> Self {
        Self::with_config(&DescriptorConfig::default())
            .expect("built-in descriptor tables are well-formed")
    }

    /// The built-in table extended with configured option fields
    pub fn with_config(config: &DescriptorConfig) -> Result<Self> {
        let mut builder = AstBuilder::new();
        let root = builder.root();
        builder.package(root, "google.protobuf")?;

        let optimize_mode = builder.enum_type(root, "OptimizeMode")?;
        builder.literal(optimize_mode, "SPEED", 1)?;
        builder.literal(optimize_mode, "CODE_SIZE", 2)?;
        builder.literal(optimize_mode, "LITE_RUNTIME", 3)?;

        let ctype = builder.enum_type(root, "CType")?;
        builder.literal(ctype, "STRING", 0)?;
        builder.literal(ctype, "CORD", 1)?;
        builder.literal(ctype, "STRING_PIECE", 2)?;

        let mut options_messages = BTreeMap::new();
        for option_type in OptionType::all() {
            let message = builder.message(root, option_type.message_name())?;
            for (name, index, field_type) in builtin_fields(*option_type) {
                builder.property(message, *name, *index, Modifier::Optional, *field_type)?;
            }
            options_messages.insert(*option_type, message);
        }

        config.apply(&mut builder, &options_messages)?;

        Ok(Self {
            ast: builder.build(),
            options_messages,
        })
    }

    /// The descriptor's own tree
    pub fn ast(&self) -> &Ast {
        &self.ast
    }

    /// The options message for a level
    pub fn options_message(&self, option_type: OptionType) -> NodeId {
        self.options_messages[&option_type]
    }

    /// Property nodes of a level's options message, in declaration order
    pub fn option_properties(&self, option_type: OptionType) -> Vec<NodeId> {
        self.ast
            .children(self.options_message(option_type))
            .into_iter()
            .filter(|id| matches!(self.ast.kind(*id), Some(NodeKind::Field(_))))
            .collect()
    }

    /// Look up a built-in option field by name
    pub fn lookup_option(&self, option_type: OptionType, name: &str) -> Option<NodeId> {
        self.option_properties(option_type)
            .into_iter()
            .find(|id| self.ast.name_of(*id) == Some(name))
    }

    /// The enum type of a built-in option field, for enum-valued options
    /// like `optimize_for`
    pub fn enum_type_of(&self, property: NodeId) -> Option<NodeId> {
        ModelFinder::new().enum_type_of(&self.ast, property)
    }
}

impl Default for ProtoDescriptor {
    fn default() -> Self {
        Self::new()
    }
}

type BuiltinField = (&'static str, i64, FieldType<'static>);

/// descriptor.proto's option fields, per options message.
fn builtin_fields(option_type: OptionType) -> &'static [BuiltinField] {
    const BOOL: FieldType<'static> = FieldType::Scalar(ScalarType::Bool);
    const STRING: FieldType<'static> = FieldType::Scalar(ScalarType::String);
    match option_type {
        OptionType::File => &[
            ("java_package", 1, STRING),
            ("java_outer_classname", 8, STRING),
            ("optimize_for", 9, FieldType::Named("OptimizeMode")),
            ("java_multiple_files", 10, BOOL),
            ("go_package", 11, STRING),
            ("cc_generic_services", 16, BOOL),
            ("java_generic_services", 17, BOOL),
            ("py_generic_services", 18, BOOL),
            ("java_generate_equals_and_hash", 20, BOOL),
            ("deprecated", 23, BOOL),
        ],
        OptionType::Message => &[
            ("message_set_wire_format", 1, BOOL),
            ("no_standard_descriptor_accessor", 2, BOOL),
            ("deprecated", 3, BOOL),
        ],
        OptionType::Field => &[
            ("ctype", 1, FieldType::Named("CType")),
            ("packed", 2, BOOL),
            ("deprecated", 3, BOOL),
            ("lazy", 5, BOOL),
            ("experimental_map_key", 9, STRING),
            ("weak", 10, BOOL),
        ],
        OptionType::Enum => &[("allow_alias", 2, BOOL), ("deprecated", 3, BOOL)],
        OptionType::Literal => &[("deprecated", 1, BOOL)],
        OptionType::Service => &[("deprecated", 33, BOOL)],
        OptionType::Rpc => &[("deprecated", 33, BOOL)],
    }
}
