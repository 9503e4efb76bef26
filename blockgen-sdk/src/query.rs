// ABOUTME: GraphQL query construction for polymorphic editor block data
// ABOUTME: Builds the per-block fragment, validates type names and renders query templates

use crate::constants::query::{BLOCKS_PLACEHOLDER, REQUIRED_UPPERCASE_LETTERS};
use crate::error::{CmsError, NamingRule};
use crate::registry::{BlockDescriptor, TemplateRegistry};
use std::collections::HashMap;

const DEFAULT_QUERY_TEMPLATE: &str = r#"query GetCMSData {
  pages {
    nodes {
      id
      title
      slug
      uri
      date
      isFrontPage
      isPostsPage
      editorBlocks(flat: true) {
        __typename
        name{{blocks}}
      }
    }
  }
}
"#;

/// Count uppercase ASCII letters, character by character.
pub fn count_uppercase_letters(input: &str) -> usize {
    input.chars().filter(|c| c.is_ascii_uppercase()).count()
}

/// Check a single GraphQL type name against the CMS naming rule.
pub fn validate_type_name(block: &BlockDescriptor) -> Result<(), CmsError> {
    let type_name = &block.gql_type_name;
    let violation = |rule| CmsError::NamingConstraintViolation {
        block: block.block_name.clone(),
        type_name: type_name.clone(),
        rule,
    };

    let found = count_uppercase_letters(type_name);
    if found != REQUIRED_UPPERCASE_LETTERS {
        return Err(violation(NamingRule::UppercaseCount { found }));
    }
    if type_name.contains('/') {
        return Err(violation(NamingRule::ContainsSlash));
    }
    Ok(())
}

/// Validate every type name and reject type names shared by two blocks.
pub fn validate_blocks(blocks: &[BlockDescriptor]) -> Result<(), CmsError> {
    let mut seen: HashMap<&str, &str> = HashMap::with_capacity(blocks.len());

    for block in blocks {
        validate_type_name(block)?;
        if let Some(first) = seen.insert(&block.gql_type_name, &block.block_name) {
            return Err(CmsError::DuplicateTypeName {
                type_name: block.gql_type_name.clone(),
                first: first.to_string(),
                second: block.block_name.clone(),
            });
        }
    }
    Ok(())
}

/// Build the polymorphic block selection for `blocks`, in input order.
///
/// Returns `Ok(None)` for an empty slice, which callers treat as "use the
/// minimal query".
pub fn build(blocks: &[BlockDescriptor]) -> Result<Option<String>, CmsError> {
    validate_blocks(blocks)?;

    if blocks.is_empty() {
        return Ok(None);
    }

    let fragment = blocks
        .iter()
        .map(|block| {
            format!(
                "\n... on {} {{\n  apiVersion\n  attributes {{\n    data\n  }}\n}}",
                block.gql_type_name
            )
        })
        .collect::<String>();

    Ok(Some(fragment))
}

/// Complete query text with a `{{blocks}}` slot for the block fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryTemplate {
    text: String,
}

impl Default for QueryTemplate {
    fn default() -> Self {
        Self {
            text: DEFAULT_QUERY_TEMPLATE.to_string(),
        }
    }
}

impl QueryTemplate {
    pub fn new(text: impl Into<String>) -> Result<Self, CmsError> {
        let text = text.into();
        if !text.contains(BLOCKS_PLACEHOLDER) {
            return Err(CmsError::Configuration(format!(
                "Query template has no {} placeholder",
                BLOCKS_PLACEHOLDER
            )));
        }
        Ok(Self { text })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Insert the fragment at every placeholder; `None` leaves them empty.
    pub fn render(&self, fragment: Option<&str>) -> String {
        self.text
            .replace(BLOCKS_PLACEHOLDER, fragment.unwrap_or_default())
    }

    /// Query requesting block data for every registered block.
    pub fn full_query(&self, registry: &TemplateRegistry) -> Result<String, CmsError> {
        let fragment = build(registry.blocks())?;
        Ok(self.render(fragment.as_deref()))
    }

    /// Query without any block-specific selections.
    pub fn degraded_query(&self) -> String {
        self.render(None)
    }
}
