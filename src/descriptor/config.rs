use crate::ast::{AstBuilder, FieldType, Modifier, NodeId, ScalarType};
use crate::descriptor::OptionType;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;

/// Extra option fields merged into the primary descriptor, the stand-in for
/// the original's contributed-descriptor registrations.
///
/// ```toml
/// [[option]]
/// target = "file"
/// name = "ruby_package"
/// index = 45
/// type = "string"
///
/// [[option]]
/// target = "field"
/// name = "jstype"
/// index = 6
/// type = "enum"
/// enum_name = "JSType"
/// literals = ["JS_NORMAL", "JS_STRING", "JS_NUMBER"]
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DescriptorConfig {
    #[serde(default, rename = "option")]
    pub options: Vec<OptionConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionConfig {
    pub target: OptionType,
    pub name: String,
    pub index: i64,
    /// A scalar type name, or `enum` together with `enum_name` and `literals`
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub enum_name: Option<String>,
    #[serde(default)]
    pub literals: Vec<String>,
}

impl DescriptorConfig {
    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Append the configured fields (and their enums) to the descriptor tree
    pub(crate) fn apply(
        &self,
        builder: &mut AstBuilder,
        options_messages: &BTreeMap<OptionType, NodeId>,
    ) -> Result<()> {
        let root = builder.root();
        let mut declared_enums: BTreeMap<String, NodeId> = BTreeMap::new();
        for option in &self.options {
            let message = options_messages[&option.target];
            if option.kind == "enum" {
                let enum_name = option.enum_name.as_deref().ok_or_else(|| {
                    Error::InvalidConfig(format!(
                        "option '{}' has type \"enum\" but no enum_name",
                        option.name
                    ))
                })?;
                if option.literals.is_empty() {
                    return Err(Error::InvalidConfig(format!(
                        "enum '{}' declares no literals",
                        enum_name
                    )));
                }
                if !declared_enums.contains_key(enum_name) {
                    let id = builder.enum_type(root, enum_name)?;
                    for (index, literal) in option.literals.iter().enumerate() {
                        builder.literal(id, literal.clone(), index as i64)?;
                    }
                    declared_enums.insert(enum_name.to_string(), id);
                }
                builder.property(
                    message,
                    option.name.clone(),
                    option.index,
                    Modifier::Optional,
                    FieldType::Named(enum_name),
                )?;
                continue;
            }
            let scalar = ScalarType::from_str(&option.kind).map_err(|_| {
                Error::InvalidConfig(format!(
                    "option '{}' has unknown type '{}'",
                    option.name, option.kind
                ))
            })?;
            builder.property(
                message,
                option.name.clone(),
                option.index,
                Modifier::Optional,
                FieldType::Scalar(scalar),
            )?;
        }
        Ok(())
    }
}
