// ABOUTME: This module handles output formatting for the blockgen CLI
// ABOUTME: It provides table formatting with color support and JSON formatting for registry and sync results

use crate::constants::ui::DESCRIPTION_WIDTH;
use anyhow::Result;
use blockgen_sdk::{BlockDataDecodeWarning, CmsContext, CmsSnapshot, Resolution, TemplateRegistry};
use owo_colors::OwoColorize;
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

pub trait OutputFormat {
    fn format_blocks(&self, registry: &TemplateRegistry) -> Result<String>;
    fn format_context(&self, context: &CmsContext) -> Result<String>;
}

pub struct TableFormatter {
    use_color: bool,
}

impl TableFormatter {
    pub fn new(use_color: bool) -> Self {
        Self { use_color }
    }

    fn truncate(text: &str, max_len: usize) -> String {
        if text.chars().count() <= max_len {
            text.to_string()
        } else {
            let head: String = text.chars().take(max_len.saturating_sub(3)).collect();
            format!("{}...", head)
        }
    }

    fn format_raw_count(&self, count: usize) -> String {
        if self.use_color && count > 0 {
            count.red().to_string()
        } else {
            count.to_string()
        }
    }

    fn format_dimmed(&self, text: &str) -> String {
        if self.use_color {
            text.dimmed().to_string()
        } else {
            text.to_string()
        }
    }
}

#[derive(Tabled)]
struct BlockRow {
    #[tabled(rename = "Block")]
    block: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "GraphQL type")]
    gql_type: String,
    #[tabled(rename = "Fields")]
    fields: usize,
    #[tabled(rename = "Description")]
    description: String,
}

#[derive(Tabled)]
struct NodeRow {
    #[tabled(rename = "Collection")]
    collection: String,
    #[tabled(rename = "Node")]
    node: String,
    #[tabled(rename = "Blocks")]
    blocks: usize,
    #[tabled(rename = "Raw data")]
    raw: String,
    #[tabled(rename = "Types")]
    types: String,
}

impl OutputFormat for TableFormatter {
    fn format_blocks(&self, registry: &TemplateRegistry) -> Result<String> {
        let rows: Vec<BlockRow> = registry
            .iter()
            .map(|block| BlockRow {
                block: block.block_name.clone(),
                title: block.display_name.clone(),
                gql_type: self.format_dimmed(&block.gql_type_name),
                fields: block.attribute_count(),
                description: Self::truncate(&block.description, DESCRIPTION_WIDTH),
            })
            .collect();

        let mut table = Table::new(rows);
        table.with(Style::psql());
        Ok(table.to_string())
    }

    fn format_context(&self, context: &CmsContext) -> Result<String> {
        let rows: Vec<NodeRow> = context
            .snapshot
            .collections
            .iter()
            .flat_map(|(collection, nodes)| {
                nodes.iter().enumerate().map(move |(index, node)| {
                    let mut types: Vec<&str> = Vec::new();
                    for block in node.blocks() {
                        if !types.contains(&block.typename.as_str()) {
                            types.push(&block.typename);
                        }
                    }
                    let raw = node
                        .blocks()
                        .iter()
                        .filter(|b| b.data.as_ref().is_some_and(|d| d.is_raw()))
                        .count();
                    (
                        collection.clone(),
                        node.label(index),
                        node.blocks().len(),
                        raw,
                        types.join(", "),
                    )
                })
            })
            .map(|(collection, node, blocks, raw, types)| NodeRow {
                collection,
                node,
                blocks,
                raw: self.format_raw_count(raw),
                types: Self::truncate(&types, DESCRIPTION_WIDTH),
            })
            .collect();

        let mut table = Table::new(rows);
        table.with(Style::psql());
        Ok(table.to_string())
    }
}

pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    fn render<T: Serialize + ?Sized>(&self, value: &T) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(value)?)
        } else {
            Ok(serde_json::to_string(value)?)
        }
    }
}

#[derive(Serialize)]
struct ContextDocument<'a> {
    resolution: &'static str,
    templates_outdated: bool,
    data: &'a CmsSnapshot,
    warnings: &'a [BlockDataDecodeWarning],
}

impl OutputFormat for JsonFormatter {
    fn format_blocks(&self, registry: &TemplateRegistry) -> Result<String> {
        self.render(registry.blocks())
    }

    fn format_context(&self, context: &CmsContext) -> Result<String> {
        let resolution = match context.resolution {
            Resolution::FullQuery => "full",
            Resolution::Degraded { .. } => "degraded",
        };
        self.render(&ContextDocument {
            resolution,
            templates_outdated: context.templates_outdated(),
            data: &context.snapshot,
            warnings: &context.warnings,
        })
    }
}
