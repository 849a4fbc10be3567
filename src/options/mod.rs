//! Option model helpers
//!
//! Classification and source-chain access for statement options
//! ([`Options`]) and bracketed field options ([`FieldOptions`]), plus the
//! candidate enumerators in [`descriptions`].
//!
//! An option is *native* when its written source names a field of the
//! primary descriptor's options message for its level, *custom* when it
//! names an extension field declared in the tree.

pub mod descriptions;

pub use descriptions::{LiteralDescriptions, NativeOptionDescriptions};

use crate::ast::{Ast, FieldOptionDecl, NodeId, NodeKind, OptionDecl};
use crate::descriptor::{OptionType, ProtoDescriptor};

/// Helpers over statement-level option nodes.
#[derive(Debug, Clone, Copy, Default)]
pub struct Options;

impl Options {
    pub fn new() -> Self {
        Self
    }

    /// Whether `option` is native-shaped and its source names a built-in
    /// option field
    pub fn is_native(&self, ast: &Ast, descriptor: &ProtoDescriptor, option: NodeId) -> bool {
        let Some(NodeKind::Option(OptionDecl::Native(native))) = ast.kind(option) else {
            return false;
        };
        let Some(option_type) = OptionType::of_option(ast, option) else {
            return false;
        };
        match ast.kind(native.source).and_then(NodeKind::written_name) {
            Some(name) => descriptor.lookup_option(option_type, name).is_some(),
            None => false,
        }
    }

    pub fn is_custom(&self, ast: &Ast, option: NodeId) -> bool {
        matches!(ast.kind(option), Some(NodeKind::Option(OptionDecl::Custom(_))))
    }

    /// The option's `OptionSource` reference node
    pub fn source_of(&self, ast: &Ast, option: NodeId) -> Option<NodeId> {
        match ast.kind(option)? {
            NodeKind::Option(OptionDecl::Native(o)) => Some(o.source),
            NodeKind::Option(OptionDecl::Custom(o)) => Some(o.source),
            _ => None,
        }
    }

    /// The written name of the option's source
    pub fn source_name_of<'a>(&self, ast: &'a Ast, option: NodeId) -> Option<&'a str> {
        let source = self.source_of(ast, option)?;
        ast.kind(source)?.written_name()
    }

    /// The last chained path segment of a custom option, `None` when the
    /// path has no segments
    pub fn last_field_source_from(&self, ast: &Ast, option: NodeId) -> Option<NodeId> {
        match ast.kind(option)? {
            NodeKind::Option(OptionDecl::Custom(o)) => o.fields.last().copied(),
            _ => None,
        }
    }
}

/// Helpers over bracketed field-option nodes.
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldOptions;

impl FieldOptions {
    pub fn new() -> Self {
        Self
    }

    pub fn is_native(&self, ast: &Ast, descriptor: &ProtoDescriptor, option: NodeId) -> bool {
        let Some(NodeKind::FieldOption(FieldOptionDecl::Native(native))) = ast.kind(option) else {
            return false;
        };
        let Some(option_type) = OptionType::of_option(ast, option) else {
            return false;
        };
        match ast.kind(native.source).and_then(NodeKind::written_name) {
            Some(name) => descriptor.lookup_option(option_type, name).is_some(),
            None => false,
        }
    }

    pub fn is_custom(&self, ast: &Ast, option: NodeId) -> bool {
        matches!(
            ast.kind(option),
            Some(NodeKind::FieldOption(FieldOptionDecl::Custom(_)))
        )
    }

    /// Whether `option` is the synthetic `default` pseudo-option. Its
    /// literal's enum type comes from the owning property's declared type,
    /// not from a descriptor lookup.
    pub fn is_default_value_option(&self, ast: &Ast, option: NodeId) -> bool {
        matches!(
            ast.kind(option),
            Some(NodeKind::FieldOption(FieldOptionDecl::DefaultValue(_)))
        )
    }

    pub fn source_of(&self, ast: &Ast, option: NodeId) -> Option<NodeId> {
        match ast.kind(option)? {
            NodeKind::FieldOption(FieldOptionDecl::Native(o)) => Some(o.source),
            NodeKind::FieldOption(FieldOptionDecl::Custom(o)) => Some(o.source),
            _ => None,
        }
    }

    pub fn source_name_of<'a>(&self, ast: &'a Ast, option: NodeId) -> Option<&'a str> {
        let source = self.source_of(ast, option)?;
        ast.kind(source)?.written_name()
    }

    pub fn last_field_source_from(&self, ast: &Ast, option: NodeId) -> Option<NodeId> {
        match ast.kind(option)? {
            NodeKind::FieldOption(FieldOptionDecl::Custom(o)) => o.fields.last().copied(),
            _ => None,
        }
    }
}
