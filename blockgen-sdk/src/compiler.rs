// ABOUTME: Description compiler turning block descriptors into ACF registration code
// ABOUTME: Builds registration, field and location nodes and renders them through the PHP printer

use crate::artifacts::CodegenOptions;
use crate::constants::codegen::MESSAGE_HEADING_STYLE;
use crate::php::{self, Expr, Stmt};
use crate::registry::{AttributeSpec, BlockDescriptor};

/// Generated sources for one block. Identical input yields identical strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledBlock {
    pub block_name: String,
    pub template_file: String,
    pub registration_fragment: String,
    pub field_group_fragment: String,
}

/// `acf_register_block_type(...)` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockRegistration {
    pub name: String,
    pub title: String,
    pub description: String,
    pub render_template: String,
    pub category: String,
    pub icon: String,
    pub keywords: Vec<String>,
}

impl BlockRegistration {
    pub fn to_stmt(&self) -> Stmt {
        let translated = |text: &str| Expr::call("__", vec![Expr::str(text)]);

        Stmt::Expr(Expr::call(
            "acf_register_block_type",
            vec![Expr::assoc(vec![
                ("name", Expr::str(&self.name)),
                ("title", translated(&self.title)),
                ("description", translated(&self.description)),
                ("render_template", Expr::str(&self.render_template)),
                ("category", Expr::str(&self.category)),
                ("icon", Expr::str(&self.icon)),
                ("keywords", Expr::list(&self.keywords)),
            ])],
        ))
    }
}

/// Single-condition `conditional_logic` entry of a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldCondition {
    pub field_key: String,
    pub operator: String,
    pub value: String,
}

/// One entry of a field group's `fields` array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldNode {
    pub key: String,
    pub label: String,
    pub name: Option<String>,
    pub field_type: String,
    pub message: Option<String>,
    pub parameters: Vec<(String, String)>,
    pub condition: Option<FieldCondition>,
}

impl FieldNode {
    /// Heading shown at the top of every block's edit form.
    pub fn message(block: &BlockDescriptor) -> Self {
        Self {
            key: format!("field_{}", block.block_name),
            label: format!("block_{}", block.block_name),
            name: None,
            field_type: "message".to_string(),
            message: Some(format!(
                "<h2 style=\"{}\">{}</h2>",
                MESSAGE_HEADING_STYLE,
                php::escape_html(&block.display_name)
            )),
            parameters: Vec::new(),
            condition: None,
        }
    }

    pub fn attribute(spec: &AttributeSpec) -> Self {
        Self {
            key: format!("field_{}", spec.field_name),
            label: spec.field_name.clone(),
            name: Some(spec.field_name.clone()),
            field_type: spec.field_type.acf_name().to_string(),
            message: None,
            parameters: spec
                .additional_parameters
                .iter()
                .flatten()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
            condition: spec.conditional_logic.as_ref().map(|logic| FieldCondition {
                field_key: format!("field_{}", logic.field),
                operator: logic.operator.clone(),
                value: logic.value.clone(),
            }),
        }
    }

    pub fn to_expr(&self) -> Expr {
        let mut entries = vec![
            ("key".to_string(), Expr::str(&self.key)),
            ("label".to_string(), Expr::str(&self.label)),
        ];
        if let Some(name) = &self.name {
            entries.push(("name".to_string(), Expr::str(name)));
        }
        entries.push(("type".to_string(), Expr::str(&self.field_type)));
        if let Some(message) = &self.message {
            entries.push(("message".to_string(), Expr::str(message)));
        }
        for (key, value) in &self.parameters {
            entries.push((key.clone(), Expr::str(value)));
        }
        if let Some(condition) = &self.condition {
            let rule = Expr::assoc(vec![
                ("field", Expr::str(&condition.field_key)),
                ("operator", Expr::str(&condition.operator)),
                ("value", Expr::str(&condition.value)),
            ]);
            entries.push((
                "conditional_logic".to_string(),
                Expr::array(vec![Expr::array(vec![rule])]),
            ));
        }
        Expr::assoc(entries)
    }
}

/// Scopes a field group to a block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationRule {
    pub param: String,
    pub operator: String,
    pub value: String,
}

impl LocationRule {
    pub fn block(registered_name: String) -> Self {
        Self {
            param: "block".to_string(),
            operator: "==".to_string(),
            value: registered_name,
        }
    }

    pub fn to_expr(&self) -> Expr {
        Expr::assoc(vec![
            ("param", Expr::str(&self.param)),
            ("operator", Expr::str(&self.operator)),
            ("value", Expr::str(&self.value)),
        ])
    }
}

/// `acf_add_local_field_group(...)` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldGroup {
    pub key: String,
    pub title: String,
    pub fields: Vec<FieldNode>,
    pub location: LocationRule,
}

impl FieldGroup {
    pub fn to_stmt(&self) -> Stmt {
        Stmt::Expr(Expr::call(
            "acf_add_local_field_group",
            vec![Expr::assoc(vec![
                ("key", Expr::str(&self.key)),
                ("title", Expr::str(&self.title)),
                (
                    "fields",
                    Expr::array(self.fields.iter().map(FieldNode::to_expr).collect()),
                ),
                (
                    "location",
                    Expr::array(vec![Expr::array(vec![self.location.to_expr()])]),
                ),
            ])],
        ))
    }
}

pub fn registration_node(block: &BlockDescriptor, options: &CodegenOptions) -> BlockRegistration {
    BlockRegistration {
        name: block.block_name.clone(),
        title: block.display_name.clone(),
        description: block.description.clone(),
        render_template: options.template_path(&block.block_name),
        category: options.category.clone(),
        icon: block.icon.clone(),
        keywords: block.keywords.clone(),
    }
}

pub fn field_group_node(block: &BlockDescriptor) -> FieldGroup {
    let mut fields = vec![FieldNode::message(block)];
    fields.extend(
        block
            .attributes
            .iter()
            .flatten()
            .map(|(_, spec)| FieldNode::attribute(spec)),
    );

    FieldGroup {
        key: format!("group_{}", block.block_name),
        title: format!("block_{}", block.block_name),
        fields,
        location: LocationRule::block(block.registered_name()),
    }
}

/// Render template stub: field bindings, then a placeholder heading.
pub fn template_file(block: &BlockDescriptor, options: &CodegenOptions) -> String {
    let mut out = String::from("<?php\n");
    for (key, spec) in block.attributes.iter().flatten() {
        out.push_str(&php::render_stmt(&Stmt::Assign {
            variable: key.clone(),
            value: Expr::call("get_field", vec![Expr::str(&spec.field_name)]),
        }));
    }
    out.push_str("?>\n\n");
    out.push_str(&format!(
        "<div class=\"{} block-{}\">\n    <h1>{}</h1>\n</div>\n",
        php::escape_html(&options.wrapper_class),
        php::escape_html(&block.block_name),
        php::escape_html(&block.display_name)
    ));
    out
}

pub fn compile(block: &BlockDescriptor, options: &CodegenOptions) -> CompiledBlock {
    CompiledBlock {
        block_name: block.block_name.clone(),
        template_file: template_file(block, options),
        registration_fragment: php::render_stmt(&registration_node(block, options).to_stmt()),
        field_group_fragment: php::render_stmt(&field_group_node(block).to_stmt()),
    }
}
