//! Custom option path navigation
//!
//! `option (my_opt).a.b = ...;` assigns through nested message fields: the
//! extension field `(my_opt)` must be message-typed, `a` names a field of
//! that message, `b` a field of `a`'s message, and so on. Each resolved
//! segment exposes the target type for the next one; resolution of a
//! segment only ever consumes the segments before it, so the recursion is
//! bounded by the written path length.
//!
//! `.(name)` segments select extension fields of the reached message
//! instead of its own fields.

use crate::ast::{Ast, FieldDecl, FieldOptionDecl, NodeId, NodeKind, OptionDecl};
use crate::description::{first_matching, Description, Origin};
use crate::descriptor::OptionType;
use crate::finder::ModelFinder;
use crate::name::QualifiedName;
use crate::scope::custom_option_finder::CustomOptionScopeFinder;
use crate::scope::type_finder::TypeScopeFinder;
use crate::walker::{relative_name, AstWalker};

/// Which kind of path segment candidates are being collected for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    /// `.name` - a field of the reached message
    MessageField,
    /// `.(name)` - an extension field extending the reached message
    ExtendField,
}

/// Resolves the chained field sources of a custom option.
#[derive(Debug, Clone, Copy, Default)]
pub struct CustomOptionFieldScopeFinder {
    walker: AstWalker,
    finder: ModelFinder,
}

impl CustomOptionFieldScopeFinder {
    pub fn new() -> Self {
        Self {
            walker: AstWalker::new(),
            finder: ModelFinder::new(),
        }
    }

    /// Candidates for one written segment of `option`'s path
    pub fn find_scope(&self, ast: &Ast, option: NodeId, segment: NodeId) -> Vec<Description> {
        let kind = match ast.kind(segment) {
            Some(NodeKind::MessageFieldSource(_)) => SegmentKind::MessageField,
            Some(NodeKind::ExtendFieldSource(_)) => SegmentKind::ExtendField,
            _ => {
                tracing::debug!(node = %segment, "not an option path segment");
                return Vec::new();
            }
        };
        self.scope_at(ast, option, Some(segment), kind)
    }

    /// Candidates for a segment appended after the existing path
    pub fn find_tail_scope(&self, ast: &Ast, option: NodeId, kind: SegmentKind) -> Vec<Description> {
        self.scope_at(ast, option, None, kind)
    }

    /// The extension field a custom option's source binds to
    pub fn resolved_source_of(&self, ast: &Ast, option: NodeId) -> Option<NodeId> {
        let option_type = OptionType::of_option(ast, option)?;
        let (source, _) = self.custom_parts(ast, option)?;
        let written = ast.kind(source)?.written_name()?;
        let candidates = self
            .walker
            .traverse(ast, option, &CustomOptionScopeFinder::new(option_type));
        first_matching(&candidates, written).map(|d| d.target)
    }

    /// The field a written path segment binds to
    pub fn resolved_field_at(&self, ast: &Ast, option: NodeId, segment: NodeId) -> Option<NodeId> {
        let written = ast.kind(segment)?.written_name()?;
        let candidates = self.find_scope(ast, option, segment);
        first_matching(&candidates, written).map(|d| d.target)
    }

    fn scope_at(
        &self,
        ast: &Ast,
        option: NodeId,
        upto: Option<NodeId>,
        kind: SegmentKind,
    ) -> Vec<Description> {
        let Some((_, segments)) = self.custom_parts(ast, option) else {
            tracing::debug!(node = %option, "not a custom option");
            return Vec::new();
        };
        let stop = match upto {
            Some(segment) => match segments.iter().position(|s| *s == segment) {
                Some(position) => position,
                None => return Vec::new(),
            },
            None => segments.len(),
        };

        let Some(source_field) = self.resolved_source_of(ast, option) else {
            return Vec::new();
        };
        let Some(mut current) = self.message_scope_of_field(ast, source_field) else {
            return Vec::new();
        };
        for segment in &segments[..stop] {
            let Some(field) = self.segment_target(ast, current, *segment) else {
                return Vec::new();
            };
            let Some(next) = self.message_scope_of_field(ast, field) else {
                return Vec::new();
            };
            current = next;
        }

        match kind {
            SegmentKind::MessageField => self
                .fields_of(ast, current)
                .into_iter()
                .filter_map(|field| {
                    let name = ast.name_of(field)?;
                    Some(Description::new(
                        QualifiedName::simple(name),
                        field,
                        Origin::Schema,
                    ))
                })
                .collect(),
            SegmentKind::ExtendField => self.extension_field_descriptions(ast, current),
        }
    }

    fn custom_parts<'a>(&self, ast: &'a Ast, option: NodeId) -> Option<(NodeId, &'a [NodeId])> {
        match ast.kind(option)? {
            NodeKind::Option(OptionDecl::Custom(o)) => Some((o.source, o.fields.as_slice())),
            NodeKind::FieldOption(FieldOptionDecl::Custom(o)) => {
                Some((o.source, o.fields.as_slice()))
            }
            _ => None,
        }
    }

    /// Resolve one already-written segment against the current message
    fn segment_target(&self, ast: &Ast, message: NodeId, segment: NodeId) -> Option<NodeId> {
        let written = ast.kind(segment)?.written_name()?;
        match ast.kind(segment)? {
            NodeKind::MessageFieldSource(_) => self
                .fields_of(ast, message)
                .into_iter()
                .find(|field| ast.name_of(*field) == Some(written)),
            NodeKind::ExtendFieldSource(_) => {
                let candidates = self.extension_field_descriptions(ast, message);
                first_matching(&candidates, written).map(|d| d.target)
            }
            _ => None,
        }
    }

    /// The message scope a field leads into: a property's message type, or
    /// the group itself
    fn message_scope_of_field(&self, ast: &Ast, field: NodeId) -> Option<NodeId> {
        match ast.kind(field)? {
            NodeKind::Field(FieldDecl::Property(_)) => self.finder.message_type_of(ast, field),
            NodeKind::Field(FieldDecl::Group(_)) => Some(field),
            _ => None,
        }
    }

    fn fields_of(&self, ast: &Ast, message: NodeId) -> Vec<NodeId> {
        ast.children(message)
            .into_iter()
            .filter(|id| matches!(ast.kind(*id), Some(NodeKind::Field(_))))
            .collect()
    }

    /// Every extension field extending `message`, qualified relative to the
    /// file level
    fn extension_field_descriptions(&self, ast: &Ast, message: NodeId) -> Vec<Description> {
        let root = self.finder.root_of(ast, message);
        let package = ast.package_name();
        let mut out = Vec::new();
        for id in ast.ids() {
            let Some(extend) = ast.as_extend(id) else {
                continue;
            };
            if self.resolve_message_ref(ast, extend.target) != Some(message) {
                continue;
            }
            for field in &extend.elements {
                if !matches!(ast.kind(*field), Some(NodeKind::Field(_))) {
                    continue;
                }
                let Some(name) = relative_name(ast, *field, root) else {
                    continue;
                };
                if let Some(package) = package {
                    out.push(Description::new(
                        name.qualified_by(package),
                        *field,
                        Origin::Schema,
                    ));
                }
                out.push(Description::new(name, *field, Origin::Schema));
            }
        }
        out
    }

    fn resolve_message_ref(&self, ast: &Ast, message_ref: NodeId) -> Option<NodeId> {
        let written = ast.kind(message_ref)?.written_name()?;
        let candidates = self.walker.traverse(
            ast,
            self.finder.root_of(ast, message_ref),
            &TypeScopeFinder::messages(),
        );
        first_matching(&candidates, written).map(|d| d.target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{AstBuilder, FieldType, Modifier, ScalarType, ValueRef};

    /// extend FileOptions with a message-typed option and navigate into it
    fn fixture() -> (Ast, NodeId, NodeId) {
        let mut builder = AstBuilder::new();
        let root = builder.root();
        let info = builder.message(root, "Info").unwrap();
        builder
            .property(info, "code", 1, Modifier::Optional, FieldType::Scalar(ScalarType::Int32))
            .unwrap();
        builder
            .property(info, "detail", 2, Modifier::Optional, FieldType::Named("Detail"))
            .unwrap();
        let detail = builder.message(root, "Detail").unwrap();
        builder
            .property(detail, "text", 1, Modifier::Optional, FieldType::Scalar(ScalarType::String))
            .unwrap();
        let extend = builder.extend(root, "google.protobuf.FileOptions").unwrap();
        builder
            .property(extend, "my_info", 50001, Modifier::Optional, FieldType::Named("Info"))
            .unwrap();
        let option = builder.custom_option(root, "my_info", ValueRef::int(1)).unwrap();
        let segment = builder.message_field(option, "detail").unwrap();
        let ast = builder.build();
        (ast, option, segment)
    }

    #[test]
    fn test_first_segment_sees_option_message_fields() {
        let (ast, option, segment) = fixture();
        let finder = CustomOptionFieldScopeFinder::new();

        let names: Vec<String> = finder
            .find_scope(&ast, option, segment)
            .iter()
            .map(|d| d.name.to_string())
            .collect();
        assert_eq!(names, vec!["code", "detail"]);
    }

    #[test]
    fn test_next_segment_follows_resolved_field_type() {
        let (ast, option, _) = fixture();
        let finder = CustomOptionFieldScopeFinder::new();

        // after `.detail` the reachable fields are Detail's own
        let names: Vec<String> = finder
            .find_tail_scope(&ast, option, SegmentKind::MessageField)
            .iter()
            .map(|d| d.name.to_string())
            .collect();
        assert_eq!(names, vec!["text"]);
    }

    #[test]
    fn test_scalar_source_yields_no_path_candidates() {
        let mut builder = AstBuilder::new();
        let root = builder.root();
        let extend = builder.extend(root, "FileOptions").unwrap();
        builder
            .property(extend, "plain", 50001, Modifier::Optional, FieldType::Scalar(ScalarType::Int32))
            .unwrap();
        let option = builder.custom_option(root, "plain", ValueRef::int(1)).unwrap();
        let segment = builder.message_field(option, "anything").unwrap();
        let ast = builder.build();

        let finder = CustomOptionFieldScopeFinder::new();
        assert!(finder.find_scope(&ast, option, segment).is_empty());
    }

    #[test]
    fn test_extend_segment_sees_extensions_of_reached_message() {
        let mut builder = AstBuilder::new();
        let root = builder.root();
        let info = builder.message(root, "Info").unwrap();
        builder
            .property(info, "code", 1, Modifier::Optional, FieldType::Scalar(ScalarType::Int32))
            .unwrap();
        let info_ext = builder.extend(root, "Info").unwrap();
        builder
            .property(info_ext, "extra", 100, Modifier::Optional, FieldType::Scalar(ScalarType::Bool))
            .unwrap();
        let opts_ext = builder.extend(root, "FileOptions").unwrap();
        builder
            .property(opts_ext, "my_info", 50001, Modifier::Optional, FieldType::Named("Info"))
            .unwrap();
        let option = builder.custom_option(root, "my_info", ValueRef::bool(true)).unwrap();
        let segment = builder.extend_field(option, "extra").unwrap();
        let ast = builder.build();

        let finder = CustomOptionFieldScopeFinder::new();
        let scope = finder.find_scope(&ast, option, segment);
        let names: Vec<String> = scope.iter().map(|d| d.name.to_string()).collect();
        assert_eq!(names, vec!["extra"]);
        assert_eq!(finder.resolved_field_at(&ast, option, segment), Some(scope[0].target));
    }
}
