//! Candidate enumerators for option contexts

use crate::ast::{Ast, NodeId, NodeKind};
use crate::description::{Description, Origin};
use crate::descriptor::{OptionType, ProtoDescriptor};
use crate::name::QualifiedName;

/// Enumerates the built-in option fields available to a native option.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeOptionDescriptions;

impl NativeOptionDescriptions {
    pub fn new() -> Self {
        Self
    }

    /// The primary descriptor's option fields for the option's level, in
    /// declaration order. Empty for a malformed container chain.
    pub fn properties(
        &self,
        ast: &Ast,
        descriptor: &ProtoDescriptor,
        option: NodeId,
    ) -> Vec<Description> {
        let Some(option_type) = OptionType::of_option(ast, option) else {
            tracing::debug!(node = %option, "no option level for container chain");
            return Vec::new();
        };
        descriptor
            .option_properties(option_type)
            .into_iter()
            .filter_map(|id| {
                let name = descriptor.ast().name_of(id)?;
                Some(Description::new(
                    QualifiedName::simple(name),
                    id,
                    Origin::Descriptor,
                ))
            })
            .collect()
    }
}

/// Enumerates the literals of a resolved enum type.
#[derive(Debug, Clone, Copy, Default)]
pub struct LiteralDescriptions;

impl LiteralDescriptions {
    pub fn new() -> Self {
        Self
    }

    /// The literals declared directly inside `enum_type`, in declaration
    /// order. `None` means "no enum could be determined" and yields no
    /// candidates - an unresolved reference, not an error.
    pub fn literals_of(
        &self,
        ast: &Ast,
        enum_type: Option<NodeId>,
        origin: Origin,
    ) -> Vec<Description> {
        let Some(enum_type) = enum_type else {
            return Vec::new();
        };
        ast.children(enum_type)
            .into_iter()
            .filter(|id| matches!(ast.kind(*id), Some(NodeKind::Literal(_))))
            .filter_map(|id| {
                let name = ast.name_of(id)?;
                Some(Description::new(QualifiedName::simple(name), id, origin))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{AstBuilder, ValueRef};

    #[test]
    fn test_native_properties_for_file_level_option() {
        let mut builder = AstBuilder::new();
        let root = builder.root();
        let option = builder.native_option(root, "java_package", ValueRef::string("x")).unwrap();
        let ast = builder.build();

        let descriptor = ProtoDescriptor::new();
        let properties = NativeOptionDescriptions::new().properties(&ast, &descriptor, option);
        let names: Vec<String> = properties.iter().map(|d| d.name.to_string()).collect();
        assert!(names.contains(&"java_package".to_string()));
        assert!(names.contains(&"optimize_for".to_string()));
        assert!(!names.contains(&"packed".to_string()));
        assert!(properties.iter().all(|d| d.origin == Origin::Descriptor));
    }

    #[test]
    fn test_literals_in_declaration_order() {
        let mut builder = AstBuilder::new();
        let root = builder.root();
        let gender = builder.enum_type(root, "Gender").unwrap();
        builder.literal(gender, "MALE", 0).unwrap();
        builder.literal(gender, "FEMALE", 1).unwrap();
        builder.native_option(gender, "allow_alias", ValueRef::bool(true)).unwrap();
        let ast = builder.build();

        let literals = LiteralDescriptions::new().literals_of(&ast, Some(gender), Origin::Schema);
        let names: Vec<String> = literals.iter().map(|d| d.name.to_string()).collect();
        // options inside the enum body are not literal candidates
        assert_eq!(names, vec!["MALE", "FEMALE"]);

        assert!(LiteralDescriptions::new().literals_of(&ast, None, Origin::Schema).is_empty());
    }
}
