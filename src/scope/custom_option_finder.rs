//! Custom option candidate strategy
//!
//! A custom option names an extension field of the options message for its
//! syntactic level. Candidates are therefore every field declared in an
//! `extend` block - anywhere in the tree, at any nesting depth - whose
//! written target names that options message.

use crate::ast::{Ast, FieldDecl, NodeId, NodeKind, TypeDecl};
use crate::description::{Description, Origin};
use crate::descriptor::OptionType;
use crate::walker::{relative_name, ScopeFinder};

#[derive(Debug, Clone, Copy)]
pub struct CustomOptionScopeFinder {
    option_type: OptionType,
}

impl CustomOptionScopeFinder {
    pub fn new(option_type: OptionType) -> Self {
        Self { option_type }
    }
}

impl ScopeFinder for CustomOptionScopeFinder {
    fn describe(&self, ast: &Ast, node: NodeId, scope: NodeId, out: &mut Vec<Description>) {
        if !matches!(ast.kind(node), Some(NodeKind::Field(_))) {
            return;
        }
        let Some(extend) = ast.parent(node).and_then(|p| ast.as_extend(p)) else {
            return;
        };
        let Some(NodeKind::MessageRef(target)) = ast.kind(extend.target) else {
            return;
        };
        if !self.option_type.matches_target(&target.name) {
            return;
        }
        let Some(name) = relative_name(ast, node, scope) else {
            return;
        };
        if matches!(ast.kind(scope), Some(NodeKind::Protobuf(_))) {
            if let Some(package) = ast.package_name() {
                out.push(Description::new(
                    name.qualified_by(package),
                    node,
                    Origin::Schema,
                ));
            }
        }
        out.push(Description::new(name, node, Origin::Schema));
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{AstBuilder, FieldType, Modifier, ScalarType};
    use crate::walker::AstWalker;

    #[test]
    fn test_only_matching_extensions_are_candidates() {
        let mut builder = AstBuilder::new();
        let root = builder.root();
        let field_ext = builder.extend(root, "google.protobuf.FieldOptions").unwrap();
        builder
            .property(field_ext, "my_ext", 50001, Modifier::Optional, FieldType::Scalar(ScalarType::Int32))
            .unwrap();
        let file_ext = builder.extend(root, "google.protobuf.FileOptions").unwrap();
        builder
            .property(file_ext, "file_ext", 50002, Modifier::Optional, FieldType::Scalar(ScalarType::Int32))
            .unwrap();
        let ast = builder.build();

        let names: Vec<String> = AstWalker::new()
            .traverse(&ast, root, &CustomOptionScopeFinder::new(OptionType::Field))
            .iter()
            .map(|d| d.name.to_string())
            .collect();
        assert_eq!(names, vec!["my_ext"]);
    }

    #[test]
    fn test_nested_extensions_get_qualified_names() {
        let mut builder = AstBuilder::new();
        let root = builder.root();
        builder.package(root, "pkg").unwrap();
        let holder = builder.message(root, "Holder").unwrap();
        let extend = builder.extend(holder, "FieldOptions").unwrap();
        builder
            .property(extend, "nested_ext", 50001, Modifier::Optional, FieldType::Scalar(ScalarType::Bool))
            .unwrap();
        let ast = builder.build();

        let names: Vec<String> = AstWalker::new()
            .traverse(&ast, root, &CustomOptionScopeFinder::new(OptionType::Field))
            .iter()
            .map(|d| d.name.to_string())
            .collect();
        assert!(names.contains(&"Holder.nested_ext".to_string()));
        assert!(names.contains(&"pkg.Holder.nested_ext".to_string()));
    }
}
