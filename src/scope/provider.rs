//! Scope resolution entry point
//!
//! One method per reference kind, dispatching on the reference's container
//! to the matching finder combination. Resolution is a pure function of
//! `(reference, tree)`: no match - including any malformed container chain -
//! is an empty candidate set, never a failure.

use crate::ast::{
    Ast, FieldDecl, FieldOptionDecl, NodeId, NodeKind, OptionDecl, TypeReference, ValueRef,
};
use crate::description::{Description, Origin};
use crate::descriptor::{OptionType, ProtoDescriptor};
use crate::finder::ModelFinder;
use crate::options::{FieldOptions, LiteralDescriptions, NativeOptionDescriptions, Options};
use crate::scope::custom_option_field_finder::{CustomOptionFieldScopeFinder, SegmentKind};
use crate::scope::custom_option_finder::CustomOptionScopeFinder;
use crate::scope::type_finder::TypeScopeFinder;
use crate::walker::AstWalker;
use std::fmt;

/// Resolves every cross-reference kind of the language against one tree
/// snapshot. Collaborators are owned and passed in at construction; the
/// provider keeps no per-call state, so calls are re-entrant over a shared
/// `&Ast`.
#[derive(Debug)]
pub struct ScopeProvider {
    descriptor: ProtoDescriptor,
    walker: AstWalker,
    model_finder: ModelFinder,
    options: Options,
    field_options: FieldOptions,
    native_option_descriptions: NativeOptionDescriptions,
    literal_descriptions: LiteralDescriptions,
    custom_option_field_finder: CustomOptionFieldScopeFinder,
}

impl ScopeProvider {
    pub fn new(descriptor: ProtoDescriptor) -> Self {
        Self {
            descriptor,
            walker: AstWalker::new(),
            model_finder: ModelFinder::new(),
            options: Options::new(),
            field_options: FieldOptions::new(),
            native_option_descriptions: NativeOptionDescriptions::new(),
            literal_descriptions: LiteralDescriptions::new(),
            custom_option_field_finder: CustomOptionFieldScopeFinder::new(),
        }
    }

    pub fn descriptor(&self) -> &ProtoDescriptor {
        &self.descriptor
    }

    /// Candidates for any reference node; empty for non-reference nodes
    pub fn scope_for(&self, ast: &Ast, reference: NodeId) -> Vec<Description> {
        match ast.kind(reference) {
            Some(NodeKind::TypeReference(TypeReference::Named(_))) => {
                self.type_ref_scope(ast, reference)
            }
            Some(NodeKind::MessageRef(_)) => self.message_ref_scope(ast, reference),
            Some(NodeKind::Value(ValueRef::Literal(_))) => self.literal_ref_scope(ast, reference),
            Some(NodeKind::OptionSource(_)) => self.option_source_scope(ast, reference),
            Some(NodeKind::MessageFieldSource(_)) => {
                self.message_field_source_scope(ast, reference)
            }
            Some(NodeKind::ExtendFieldSource(_)) => self.extend_field_source_scope(ast, reference),
            _ => Vec::new(),
        }
    }

    /// Types visible to a property's type reference
    pub fn type_ref_scope(&self, ast: &Ast, type_ref: NodeId) -> Vec<Description> {
        if !matches!(
            ast.kind(type_ref),
            Some(NodeKind::TypeReference(TypeReference::Named(_)))
        ) {
            return Vec::new();
        }
        match ast.parent(type_ref).and_then(|p| ast.kind(p)) {
            Some(NodeKind::Field(FieldDecl::Property(_))) => self.find_type_scope(ast, type_ref),
            _ => {
                tracing::debug!(node = %type_ref, "type reference outside a property");
                Vec::new()
            }
        }
    }

    /// Full lexical type scope walked outward from `node`
    pub fn find_type_scope(&self, ast: &Ast, node: NodeId) -> Vec<Description> {
        self.walker.traverse(ast, node, &TypeScopeFinder::types())
    }

    /// Messages visible to an extend target or rpc argument/return
    /// reference. The descriptor's option-holder messages are appended so
    /// targets like `google.protobuf.FieldOptions` bind without imports.
    pub fn message_ref_scope(&self, ast: &Ast, message_ref: NodeId) -> Vec<Description> {
        self.find_message_scope(ast, message_ref)
    }

    pub fn find_message_scope(&self, ast: &Ast, node: NodeId) -> Vec<Description> {
        let root = self.model_finder.root_of(ast, node);
        let mut out = self.walker.traverse(ast, root, &TypeScopeFinder::messages());
        let descriptor_ast = self.descriptor.ast();
        out.extend(self.walker.traverse(
            descriptor_ast,
            descriptor_ast.root(),
            &TypeScopeFinder::messages().with_origin(Origin::Descriptor),
        ));
        out
    }

    /// Literals visible to an enum-literal reference, per its container:
    /// the owning property's enum type for default values, the descriptor's
    /// enum for native options, the terminal field of the source chain for
    /// custom options, the property's own type otherwise
    pub fn literal_ref_scope(&self, ast: &Ast, literal_ref: NodeId) -> Vec<Description> {
        if !matches!(
            ast.kind(literal_ref),
            Some(NodeKind::Value(ValueRef::Literal(_)))
        ) {
            tracing::debug!(node = %literal_ref, "not a literal reference");
            return Vec::new();
        }
        let Some(container) = ast.parent(literal_ref) else {
            return Vec::new();
        };
        let Some(container_kind) = ast.kind(container) else {
            return Vec::new();
        };
        match container_kind {
            NodeKind::FieldOption(FieldOptionDecl::DefaultValue(_)) => {
                let enum_type = ast
                    .parent(container)
                    .and_then(|property| self.model_finder.enum_type_of(ast, property));
                self.literal_descriptions
                    .literals_of(ast, enum_type, Origin::Schema)
            }
            NodeKind::Option(OptionDecl::Native(_))
            | NodeKind::FieldOption(FieldOptionDecl::Native(_)) => {
                let enum_type = self.native_enum_of(ast, container);
                self.literal_descriptions
                    .literals_of(self.descriptor.ast(), enum_type, Origin::Descriptor)
            }
            NodeKind::Option(OptionDecl::Custom(_))
            | NodeKind::FieldOption(FieldOptionDecl::Custom(_)) => {
                let enum_type = self
                    .terminal_field_of_custom(ast, container)
                    .and_then(|field| self.model_finder.enum_type_of(ast, field));
                self.literal_descriptions
                    .literals_of(ast, enum_type, Origin::Schema)
            }
            NodeKind::Field(FieldDecl::Property(_)) => {
                let enum_type = self.model_finder.enum_type_of(ast, container);
                self.literal_descriptions
                    .literals_of(ast, enum_type, Origin::Schema)
            }
            _ => {
                tracing::debug!(node = %literal_ref, "no enum context for literal reference");
                Vec::new()
            }
        }
    }

    /// Option fields an `OptionSource` may name: the descriptor's property
    /// list for native options, matching extension fields for custom ones
    pub fn option_source_scope(&self, ast: &Ast, source: NodeId) -> Vec<Description> {
        if !matches!(ast.kind(source), Some(NodeKind::OptionSource(_))) {
            return Vec::new();
        }
        let Some(container) = ast.parent(source) else {
            return Vec::new();
        };
        match ast.kind(container) {
            Some(NodeKind::Option(OptionDecl::Native(_)))
            | Some(NodeKind::FieldOption(FieldOptionDecl::Native(_))) => self
                .native_option_descriptions
                .properties(ast, &self.descriptor, container),
            Some(NodeKind::Option(OptionDecl::Custom(_)))
            | Some(NodeKind::FieldOption(FieldOptionDecl::Custom(_))) => {
                self.find_custom_option_scope(ast, container)
            }
            _ => {
                tracing::debug!(node = %source, "option source outside an option");
                Vec::new()
            }
        }
    }

    /// Extension fields a custom option may target, per its syntactic level
    pub fn find_custom_option_scope(&self, ast: &Ast, option: NodeId) -> Vec<Description> {
        let Some(option_type) = OptionType::of_option(ast, option) else {
            tracing::debug!(node = %option, "no option level for container chain");
            return Vec::new();
        };
        self.walker
            .traverse(ast, option, &CustomOptionScopeFinder::new(option_type))
    }

    /// Candidates for a written `.name` path segment
    pub fn message_field_source_scope(&self, ast: &Ast, segment: NodeId) -> Vec<Description> {
        self.segment_scope(ast, segment)
    }

    /// Candidates for a written `.(name)` path segment
    pub fn extend_field_source_scope(&self, ast: &Ast, segment: NodeId) -> Vec<Description> {
        self.segment_scope(ast, segment)
    }

    /// Candidates for a `.name` segment appended after the existing path
    pub fn find_message_field_scope(&self, ast: &Ast, option: NodeId) -> Vec<Description> {
        self.custom_option_field_finder
            .find_tail_scope(ast, option, SegmentKind::MessageField)
    }

    /// Candidates for a `.(name)` segment appended after the existing path
    pub fn find_extend_field_scope(&self, ast: &Ast, option: NodeId) -> Vec<Description> {
        self.custom_option_field_finder
            .find_tail_scope(ast, option, SegmentKind::ExtendField)
    }

    /// Resolve every reference in the tree, handing each candidate set to
    /// `sink`. A failing sink is logged and does not abort the remaining
    /// traversal - one bad node must not prevent resolving the rest.
    pub fn resolve_all<E>(
        &self,
        ast: &Ast,
        mut sink: impl FnMut(NodeId, Vec<Description>) -> std::result::Result<(), E>,
    ) where
        E: fmt::Display,
    {
        for id in ast.ids() {
            let Some(kind) = ast.kind(id) else {
                continue;
            };
            if !kind.is_reference() {
                continue;
            }
            let scope = self.scope_for(ast, id);
            if let Err(error) = sink(id, scope) {
                tracing::warn!(node = %id, "resolution sink failed: {}", error);
            }
        }
    }

    fn segment_scope(&self, ast: &Ast, segment: NodeId) -> Vec<Description> {
        let Some(option) = ast.parent(segment) else {
            return Vec::new();
        };
        match ast.kind(option) {
            Some(NodeKind::Option(OptionDecl::Custom(_)))
            | Some(NodeKind::FieldOption(FieldOptionDecl::Custom(_))) => self
                .custom_option_field_finder
                .find_scope(ast, option, segment),
            _ => {
                tracing::debug!(node = %segment, "path segment outside a custom option");
                Vec::new()
            }
        }
    }

    /// Enum type of a native option's target, from the primary descriptor
    fn native_enum_of(&self, ast: &Ast, option: NodeId) -> Option<NodeId> {
        let option_type = OptionType::of_option(ast, option)?;
        let name = match ast.kind(option)? {
            NodeKind::Option(_) => self.options.source_name_of(ast, option),
            NodeKind::FieldOption(_) => self.field_options.source_name_of(ast, option),
            _ => None,
        }?;
        let property = self.descriptor.lookup_option(option_type, name)?;
        self.descriptor.enum_type_of(property)
    }

    /// The field a custom option's value is ultimately assigned to: the
    /// last path segment's target, or the extension field itself when the
    /// path has no segments
    fn terminal_field_of_custom(&self, ast: &Ast, option: NodeId) -> Option<NodeId> {
        let last = match ast.kind(option)? {
            NodeKind::Option(_) => self.options.last_field_source_from(ast, option),
            NodeKind::FieldOption(_) => self.field_options.last_field_source_from(ast, option),
            _ => None,
        };
        match last {
            Some(segment) => self
                .custom_option_field_finder
                .resolved_field_at(ast, option, segment),
            None => self
                .custom_option_field_finder
                .resolved_source_of(ast, option),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{AstBuilder, FieldType, Modifier, ScalarType};
    use crate::description::first_matching;

    fn provider() -> ScopeProvider {
        ScopeProvider::new(ProtoDescriptor::new())
    }

    fn names(descriptions: &[Description]) -> Vec<String> {
        descriptions.iter().map(|d| d.name.to_string()).collect()
    }

    /// message Person { enum Gender { MALE = 0; FEMALE = 1; }
    ///                  optional Gender gender = 1 [default = MALE]; }
    fn person_fixture() -> (Ast, NodeId, NodeId) {
        let mut builder = AstBuilder::new();
        let root = builder.root();
        let person = builder.message(root, "Person").unwrap();
        let gender = builder.enum_type(person, "Gender").unwrap();
        let male = builder.literal(gender, "MALE", 0).unwrap();
        builder.literal(gender, "FEMALE", 1).unwrap();
        let field = builder
            .property(person, "gender", 1, Modifier::Optional, FieldType::Named("Gender"))
            .unwrap();
        let default = builder.default_value(field, crate::ast::ValueRef::literal("MALE")).unwrap();
        let ast = builder.build();
        let literal_ref = ast
            .children(default)
            .into_iter()
            .next()
            .expect("default option owns its value");
        (ast, literal_ref, male)
    }

    #[test]
    fn test_default_value_literal_scope_uses_the_fields_own_type() {
        let (ast, literal_ref, male) = person_fixture();
        let scope = provider().literal_ref_scope(&ast, literal_ref);

        // exactly Gender's literals, in declaration order
        assert_eq!(names(&scope), vec!["MALE", "FEMALE"]);
        let bound = first_matching(&scope, "MALE").unwrap();
        assert_eq!(bound.target, male);
        assert_eq!(bound.origin, Origin::Schema);
    }

    #[test]
    fn test_scope_for_dispatches_on_reference_kind() {
        let (ast, literal_ref, _) = person_fixture();
        let provider = provider();
        assert_eq!(
            provider.scope_for(&ast, literal_ref),
            provider.literal_ref_scope(&ast, literal_ref)
        );
        // a declaration is not a reference
        assert!(provider.scope_for(&ast, ast.root()).is_empty());
    }

    #[test]
    fn test_default_on_non_enum_field_has_no_candidates() {
        let mut builder = AstBuilder::new();
        let root = builder.root();
        let person = builder.message(root, "Person").unwrap();
        let field = builder
            .property(person, "name", 1, Modifier::Optional, FieldType::Scalar(ScalarType::String))
            .unwrap();
        let default = builder.default_value(field, crate::ast::ValueRef::literal("MALE")).unwrap();
        let ast = builder.build();
        let literal_ref = ast.children(default)[0];

        assert!(provider().literal_ref_scope(&ast, literal_ref).is_empty());
    }

    #[test]
    fn test_nested_type_shadows_outer_scope() {
        let mut builder = AstBuilder::new();
        let root = builder.root();
        let a = builder.message(root, "A").unwrap();
        let a_inner = builder.message(a, "Inner").unwrap();
        let field = builder
            .property(a, "inner", 1, Modifier::Optional, FieldType::Named("Inner"))
            .unwrap();
        let b = builder.message(root, "B").unwrap();
        let b_inner = builder.message(b, "Inner").unwrap();
        let ast = builder.build();

        let type_ref = ast.as_property(field).unwrap().type_ref;
        let scope = provider().type_ref_scope(&ast, type_ref);

        // a reference written `Inner` inside A binds to A.Inner, not B.Inner
        let bound = first_matching(&scope, "Inner").unwrap();
        assert_eq!(bound.target, a_inner);
        // B.Inner stays reachable, but only under its qualified name
        assert_eq!(first_matching(&scope, "B.Inner").unwrap().target, b_inner);
        assert!(scope.iter().all(|d| !(d.name.to_string() == "Inner" && d.target == b_inner)));
        // unrelated siblings by their own names
        assert_eq!(first_matching(&scope, "B").unwrap().target, b);
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let mut builder = AstBuilder::new();
        let root = builder.root();
        let a = builder.message(root, "A").unwrap();
        builder.message(a, "Inner").unwrap();
        let field = builder
            .property(a, "inner", 1, Modifier::Optional, FieldType::Named("Inner"))
            .unwrap();
        let ast = builder.build();

        let provider = provider();
        let type_ref = ast.as_property(field).unwrap().type_ref;
        let first = provider.type_ref_scope(&ast, type_ref);
        let second = provider.type_ref_scope(&ast, type_ref);
        assert_eq!(first, second);
    }

    #[test]
    fn test_custom_field_option_source_resolves_to_extension_field() {
        // extend google.protobuf.FieldOptions { optional int32 my_ext = 50001; }
        // message Person { optional string name = 1 [(my_ext) = 5]; }
        let mut builder = AstBuilder::new();
        let root = builder.root();
        let extend = builder.extend(root, "google.protobuf.FieldOptions").unwrap();
        let my_ext = builder
            .property(extend, "my_ext", 50001, Modifier::Optional, FieldType::Scalar(ScalarType::Int32))
            .unwrap();
        let person = builder.message(root, "Person").unwrap();
        let field = builder
            .property(person, "name", 1, Modifier::Optional, FieldType::Scalar(ScalarType::String))
            .unwrap();
        let option = builder
            .custom_field_option(field, "my_ext", crate::ast::ValueRef::int(5))
            .unwrap();
        let ast = builder.build();

        let provider = provider();
        let source = FieldOptions::new().source_of(&ast, option).unwrap();
        let scope = provider.option_source_scope(&ast, source);
        let bound = first_matching(&scope, "my_ext").unwrap();
        assert_eq!(bound.target, my_ext);
        assert_eq!(bound.origin, Origin::Schema);
    }

    #[test]
    fn test_custom_option_candidates_follow_the_target_type() {
        // an extension of FileOptions is not a candidate for a field option,
        // and vice versa
        let mut builder = AstBuilder::new();
        let root = builder.root();
        let field_extend = builder.extend(root, "google.protobuf.FieldOptions").unwrap();
        builder
            .property(field_extend, "field_ext", 50001, Modifier::Optional, FieldType::Scalar(ScalarType::Int32))
            .unwrap();
        let file_extend = builder.extend(root, "google.protobuf.FileOptions").unwrap();
        builder
            .property(file_extend, "file_ext", 50002, Modifier::Optional, FieldType::Scalar(ScalarType::Int32))
            .unwrap();
        let person = builder.message(root, "Person").unwrap();
        let field = builder
            .property(person, "name", 1, Modifier::Optional, FieldType::Scalar(ScalarType::String))
            .unwrap();
        let field_option = builder
            .custom_field_option(field, "field_ext", crate::ast::ValueRef::int(5))
            .unwrap();
        let file_option = builder
            .custom_option(root, "file_ext", crate::ast::ValueRef::int(5))
            .unwrap();
        let ast = builder.build();

        let provider = provider();
        let field_scope =
            provider.option_source_scope(&ast, FieldOptions::new().source_of(&ast, field_option).unwrap());
        assert_eq!(names(&field_scope), vec!["field_ext"]);

        let file_scope =
            provider.option_source_scope(&ast, Options::new().source_of(&ast, file_option).unwrap());
        assert_eq!(names(&file_scope), vec!["file_ext"]);
    }

    #[test]
    fn test_native_option_source_and_literal_scopes() {
        // option optimize_for = SPEED;
        let mut builder = AstBuilder::new();
        let root = builder.root();
        let option = builder
            .native_option(root, "optimize_for", crate::ast::ValueRef::literal("SPEED"))
            .unwrap();
        let ast = builder.build();

        let provider = provider();
        let source = Options::new().source_of(&ast, option).unwrap();
        let source_scope = provider.option_source_scope(&ast, source);
        assert!(names(&source_scope).contains(&"optimize_for".to_string()));
        assert!(source_scope.iter().all(|d| d.origin == Origin::Descriptor));

        let value = match ast.kind(option).unwrap() {
            NodeKind::Option(OptionDecl::Native(o)) => o.value,
            _ => unreachable!(),
        };
        let literal_scope = provider.literal_ref_scope(&ast, value);
        assert_eq!(names(&literal_scope), vec!["SPEED", "CODE_SIZE", "LITE_RUNTIME"]);
        assert!(literal_scope.iter().all(|d| d.origin == Origin::Descriptor));
    }

    #[test]
    fn test_unknown_native_option_degrades_to_empty() {
        let mut builder = AstBuilder::new();
        let root = builder.root();
        let option = builder
            .native_option(root, "no_such_option", crate::ast::ValueRef::literal("X"))
            .unwrap();
        let ast = builder.build();

        let value = match ast.kind(option).unwrap() {
            NodeKind::Option(OptionDecl::Native(o)) => o.value,
            _ => unreachable!(),
        };
        assert!(provider().literal_ref_scope(&ast, value).is_empty());
    }

    #[test]
    fn test_custom_option_literal_follows_the_source_chain() {
        // enum Mode { FAST = 0; SLOW = 1; }
        // message Info { optional Mode mode = 1; }
        // extend google.protobuf.FileOptions { optional Info my_info = 50001; }
        // option (my_info).mode = FAST;
        let mut builder = AstBuilder::new();
        let root = builder.root();
        let mode = builder.enum_type(root, "Mode").unwrap();
        let fast = builder.literal(mode, "FAST", 0).unwrap();
        builder.literal(mode, "SLOW", 1).unwrap();
        let info = builder.message(root, "Info").unwrap();
        builder
            .property(info, "mode", 1, Modifier::Optional, FieldType::Named("Mode"))
            .unwrap();
        let extend = builder.extend(root, "google.protobuf.FileOptions").unwrap();
        builder
            .property(extend, "my_info", 50001, Modifier::Optional, FieldType::Named("Info"))
            .unwrap();
        let option = builder
            .custom_option(root, "my_info", crate::ast::ValueRef::literal("FAST"))
            .unwrap();
        builder.message_field(option, "mode").unwrap();
        let ast = builder.build();

        let value = match ast.kind(option).unwrap() {
            NodeKind::Option(OptionDecl::Custom(o)) => o.value,
            _ => unreachable!(),
        };
        let scope = provider().literal_ref_scope(&ast, value);
        assert_eq!(names(&scope), vec!["FAST", "SLOW"]);
        assert_eq!(first_matching(&scope, "FAST").unwrap().target, fast);
    }

    #[test]
    fn test_enum_typed_extension_without_path_segments() {
        // extend google.protobuf.FieldOptions { optional Mode my_mode = 50001; }
        // the literal's enum comes from the extension field itself
        let mut builder = AstBuilder::new();
        let root = builder.root();
        let mode = builder.enum_type(root, "Mode").unwrap();
        builder.literal(mode, "FAST", 0).unwrap();
        let extend = builder.extend(root, "google.protobuf.FieldOptions").unwrap();
        builder
            .property(extend, "my_mode", 50001, Modifier::Optional, FieldType::Named("Mode"))
            .unwrap();
        let person = builder.message(root, "Person").unwrap();
        let field = builder
            .property(person, "name", 1, Modifier::Optional, FieldType::Scalar(ScalarType::String))
            .unwrap();
        let option = builder
            .custom_field_option(field, "my_mode", crate::ast::ValueRef::literal("FAST"))
            .unwrap();
        let ast = builder.build();

        let value = match ast.kind(option).unwrap() {
            NodeKind::FieldOption(FieldOptionDecl::Custom(o)) => o.value,
            _ => unreachable!(),
        };
        assert_eq!(names(&provider().literal_ref_scope(&ast, value)), vec!["FAST"]);
    }

    #[test]
    fn test_message_scope_offers_descriptor_options_messages() {
        let mut builder = AstBuilder::new();
        let root = builder.root();
        let extend = builder.extend(root, "google.protobuf.FieldOptions").unwrap();
        let ast = builder.build();

        let target = ast.as_extend(extend).unwrap().target;
        let scope = provider().message_ref_scope(&ast, target);
        let bound = first_matching(&scope, "google.protobuf.FieldOptions").unwrap();
        assert_eq!(bound.origin, Origin::Descriptor);
    }

    #[test]
    fn test_rpc_references_resolve_to_messages_only() {
        let mut builder = AstBuilder::new();
        let root = builder.root();
        builder.message(root, "Request").unwrap();
        builder.enum_type(root, "Mode").unwrap();
        let service = builder.service(root, "Search").unwrap();
        let rpc = builder.rpc(service, "Run", "Request", "Request").unwrap();
        let ast = builder.build();

        let arg = match ast.kind(rpc).unwrap() {
            NodeKind::Rpc(r) => r.arg,
            _ => unreachable!(),
        };
        let scope = provider().message_ref_scope(&ast, arg);
        assert!(first_matching(&scope, "Request").is_some());
        // enums are not candidates in message-only positions
        assert!(first_matching(&scope, "Mode").is_none());
    }

    #[test]
    fn test_resolve_all_survives_a_failing_sink() {
        let (ast, _, _) = person_fixture();
        let mut visited = 0usize;
        provider().resolve_all(&ast, |_, _| {
            visited += 1;
            if visited == 1 {
                Err("sink exploded")
            } else {
                Ok(())
            }
        });

        let references = ast
            .ids()
            .filter(|id| ast.kind(*id).is_some_and(NodeKind::is_reference))
            .count();
        // the failure neither aborted the pass nor skipped later references
        assert_eq!(visited, references);
        assert!(references >= 2);
    }
}
