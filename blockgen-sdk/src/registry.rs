// ABOUTME: Block descriptor types and the validated, immutable template registry
// ABOUTME: Descriptors are deserialized from project config and checked before any I/O

use crate::error::CmsError;
use crate::php::sanitize_identifier;
use crate::query;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

/// ACF field types a block attribute can be edited with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Text,
    Gallery,
    Image,
    #[serde(alias = "true_false")]
    Boolean,
    #[serde(alias = "wysiwyg")]
    Richtext,
    Link,
}

impl FieldType {
    /// The type name ACF expects in `acf_add_local_field_group`.
    pub fn acf_name(self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Gallery => "gallery",
            FieldType::Image => "image",
            FieldType::Boolean => "true_false",
            FieldType::Richtext => "wysiwyg",
            FieldType::Link => "link",
        }
    }
}

/// Show an attribute's field only when another field matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TypedBuilder)]
#[builder(field_defaults(setter(into)))]
pub struct ConditionalLogic {
    pub field: String,
    pub operator: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TypedBuilder)]
pub struct AttributeSpec {
    #[serde(default)]
    #[builder(default, setter(into))]
    pub source_type: String,
    pub field_type: FieldType,
    #[builder(setter(into))]
    pub field_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(strip_option))]
    pub options: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(strip_option))]
    pub additional_parameters: Option<IndexMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(strip_option))]
    pub conditional_logic: Option<ConditionalLogic>,
}

/// A block the theme registers with ACF and queries through WPGraphQL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TypedBuilder)]
pub struct BlockDescriptor {
    #[builder(setter(into))]
    pub block_name: String,
    #[builder(setter(into))]
    pub display_name: String,
    #[serde(default)]
    #[builder(default, setter(into))]
    pub description: String,
    #[serde(default)]
    #[builder(default, setter(into))]
    pub icon: String,
    #[serde(default)]
    #[builder(default)]
    pub keywords: Vec<String>,
    #[builder(setter(into))]
    pub gql_type_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(strip_option))]
    pub attributes: Option<IndexMap<String, AttributeSpec>>,
}

impl BlockDescriptor {
    /// Name ACF registers the block under, e.g. `acf/hero`.
    pub fn registered_name(&self) -> String {
        format!(
            "{}/{}",
            crate::constants::codegen::ACF_BLOCK_NAMESPACE,
            self.block_name
        )
    }

    pub fn attribute_count(&self) -> usize {
        self.attributes.as_ref().map_or(0, IndexMap::len)
    }
}

/// Ordered, validated set of block descriptors. Immutable once built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemplateRegistry {
    blocks: Vec<BlockDescriptor>,
}

impl TemplateRegistry {
    pub fn new(blocks: Vec<BlockDescriptor>) -> Result<Self, CmsError> {
        for block in &blocks {
            validate_block_name(&block.block_name)?;
            validate_attribute_keys(block)?;
        }
        for (index, block) in blocks.iter().enumerate() {
            if blocks[..index]
                .iter()
                .any(|earlier| earlier.block_name == block.block_name)
            {
                return Err(CmsError::DuplicateBlockName(block.block_name.clone()));
            }
        }
        query::validate_blocks(&blocks)?;

        Ok(Self { blocks })
    }

    pub fn blocks(&self) -> &[BlockDescriptor] {
        &self.blocks
    }

    pub fn iter(&self) -> impl Iterator<Item = &BlockDescriptor> {
        self.blocks.iter()
    }

    pub fn get(&self, block_name: &str) -> Option<&BlockDescriptor> {
        self.blocks.iter().find(|b| b.block_name == block_name)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

// Block names become file names and ACF identifiers
fn validate_block_name(name: &str) -> Result<(), CmsError> {
    let valid = !name.is_empty()
        && !name.starts_with('-')
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_');

    if valid {
        Ok(())
    } else {
        Err(CmsError::Configuration(format!(
            "Invalid block name '{}': use lowercase letters, digits, '-' and '_'",
            name
        )))
    }
}

// Attribute keys become template variables, so two keys must not sanitize alike
fn validate_attribute_keys(block: &BlockDescriptor) -> Result<(), CmsError> {
    let Some(attributes) = &block.attributes else {
        return Ok(());
    };
    let mut seen: IndexMap<String, &str> = IndexMap::new();
    for key in attributes.keys() {
        let identifier = sanitize_identifier(key);
        if let Some(first) = seen.get(&identifier) {
            return Err(CmsError::AttributeKeyCollision {
                block: block.block_name.clone(),
                identifier,
                first: first.to_string(),
                second: key.clone(),
            });
        }
        seen.insert(identifier, key);
    }
    Ok(())
}
