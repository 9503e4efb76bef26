// ABOUTME: Typed model of the CMS response tree with a two-phase decode of block data
// ABOUTME: Editor block payloads arrive as JSON strings and are decoded per block, never fatally

use crate::error::{BlockDataDecodeWarning, FetchError};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Payload of an editor block's `attributes.data` after the second decode pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum BlockData {
    Decoded(Value),
    /// The payload was not valid JSON and is kept verbatim.
    Raw(String),
}

impl BlockData {
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            BlockData::Decoded(value) => Some(value),
            BlockData::Raw(_) => None,
        }
    }

    pub fn is_raw(&self) -> bool {
        matches!(self, BlockData::Raw(_))
    }
}

/// Editor block as the server sends it, before `attributes.data` is decoded.
///
/// WPGraphQL declares `name` and `__typename` nullable, so both fall back to empty.
#[derive(Debug, Clone, Deserialize)]
struct RawEditorBlock {
    #[serde(rename = "__typename", default)]
    typename: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(rename = "apiVersion", default)]
    api_version: Option<i64>,
    #[serde(default)]
    attributes: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EditorBlock {
    #[serde(rename = "__typename")]
    pub typename: String,
    pub name: String,
    #[serde(rename = "apiVersion", skip_serializing_if = "Option::is_none")]
    pub api_version: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<BlockData>,
}

/// A page, post or custom post type entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContentNode {
    #[serde(rename = "editorBlocks", skip_serializing_if = "Option::is_none")]
    pub editor_blocks: Option<Vec<EditorBlock>>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl ContentNode {
    pub fn blocks(&self) -> &[EditorBlock] {
        self.editor_blocks.as_deref().unwrap_or_default()
    }

    pub fn field_str(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(Value::as_str)
    }

    /// Human-readable name: slug, then id, then title, then `#<index>`.
    pub fn label(&self, index: usize) -> String {
        node_label(&self.fields, index)
    }
}

/// Content fetched in one cycle.
///
/// Top-level entries shaped `{ "nodes": [...] }` become collections, everything
/// else (settings, menus) is kept as plain JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CmsSnapshot {
    pub collections: IndexMap<String, Vec<ContentNode>>,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

impl CmsSnapshot {
    /// Decode the `data` tree of a response.
    ///
    /// Only a `data` tree that is not an object fails. Malformed editor blocks and
    /// undecodable block payloads produce warnings and leave the rest intact.
    pub fn decode(data: Value) -> Result<(Self, Vec<BlockDataDecodeWarning>), FetchError> {
        let Value::Object(entries) = data else {
            return Err(FetchError::ParseFailure(
                "expected the response data to be an object".to_string(),
            ));
        };

        let mut snapshot = CmsSnapshot::default();
        let mut warnings = Vec::new();

        for (key, value) in entries {
            if !is_collection(&value) {
                snapshot.other.insert(key, value);
                continue;
            }
            let nodes = match value {
                Value::Object(mut map) => map.remove("nodes").unwrap_or_default(),
                _ => Value::Null,
            };
            let Value::Array(nodes) = nodes else {
                continue;
            };

            let mut decoded = Vec::with_capacity(nodes.len());
            for (index, node) in nodes.into_iter().enumerate() {
                decoded.push(decode_node(&key, index, node, &mut warnings)?);
            }
            snapshot.collections.insert(key, decoded);
        }

        Ok((snapshot, warnings))
    }

    pub fn collection(&self, name: &str) -> &[ContentNode] {
        self.collections
            .get(name)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Every editor block of every node, in response order.
    pub fn blocks(&self) -> impl Iterator<Item = &EditorBlock> {
        self.collections
            .values()
            .flatten()
            .flat_map(ContentNode::blocks)
    }

    pub fn block_count(&self) -> usize {
        self.blocks().count()
    }
}

fn is_collection(value: &Value) -> bool {
    value
        .get("nodes")
        .and_then(Value::as_array)
        .is_some_and(|nodes| nodes.iter().all(Value::is_object))
}

fn node_label(fields: &Map<String, Value>, index: usize) -> String {
    ["slug", "id", "title"]
        .iter()
        .find_map(|key| fields.get(*key).and_then(Value::as_str))
        .map(str::to_string)
        .unwrap_or_else(|| format!("#{index}"))
}

fn decode_node(
    collection: &str,
    index: usize,
    node: Value,
    warnings: &mut Vec<BlockDataDecodeWarning>,
) -> Result<ContentNode, FetchError> {
    let Value::Object(mut fields) = node else {
        return Err(FetchError::ParseFailure(format!(
            "{collection}[{index}] is not an object"
        )));
    };

    let label = node_label(&fields, index);
    let mut report = |block: String, message: String| {
        let warning = BlockDataDecodeWarning {
            collection: collection.to_string(),
            node: label.clone(),
            block,
            message,
        };
        tracing::warn!("{}", warning);
        warnings.push(warning);
    };

    let editor_blocks = match fields.remove("editorBlocks") {
        None | Some(Value::Null) => None,
        Some(Value::Array(items)) => Some(
            items
                .into_iter()
                .enumerate()
                .filter_map(|(position, item)| match decode_block(item) {
                    Ok((block, None)) => Some(block),
                    Ok((block, Some(message))) => {
                        report(block.name.clone(), message);
                        Some(block)
                    }
                    Err((name, message)) => {
                        report(name.unwrap_or_else(|| format!("#{position}")), message);
                        None
                    }
                })
                .collect(),
        ),
        Some(other) => {
            report(String::new(), format!("editorBlocks is not a list: {other}"));
            None
        }
    };

    Ok(ContentNode {
        editor_blocks,
        fields,
    })
}

// Second decode pass. A block that cannot be read at all is dropped with its name, if any.
fn decode_block(item: Value) -> Result<(EditorBlock, Option<String>), (Option<String>, String)> {
    let raw = match RawEditorBlock::deserialize(&item) {
        Ok(raw) => raw,
        Err(e) => {
            let name = item.get("name").and_then(Value::as_str).map(str::to_string);
            return Err((name, format!("unusable editor block: {e}")));
        }
    };

    let (data, warning) = match raw.attributes {
        None | Some(Value::Null) => (None, None),
        Some(Value::Object(mut attributes)) => match attributes.remove("data") {
            None | Some(Value::Null) => (None, None),
            Some(Value::String(text)) => match serde_json::from_str::<Value>(&text) {
                Ok(value) => (Some(BlockData::Decoded(value)), None),
                Err(e) => (Some(BlockData::Raw(text)), Some(e.to_string())),
            },
            Some(other) => (Some(BlockData::Decoded(other)), None),
        },
        Some(other) => (None, Some(format!("attributes is not an object: {other}"))),
    };

    Ok((
        EditorBlock {
            typename: raw.typename.unwrap_or_default(),
            name: raw.name.unwrap_or_default(),
            api_version: raw.api_version,
            data,
        },
        warning,
    ))
}
