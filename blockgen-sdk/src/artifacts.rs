// ABOUTME: Aggregates compiled blocks into the generated theme file set
// ABOUTME: Wraps block registrations in host boilerplate and defines the sink that persists them

use crate::compiler::{self, CompiledBlock};
use crate::constants::codegen;
use crate::error::CmsError;
use crate::php;
use crate::registry::TemplateRegistry;
use std::path::{Path, PathBuf};
use typed_builder::TypedBuilder;

/// Host-supplied PHP placed around the generated registrations, copied verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Boilerplate {
    pub prologue: String,
    pub epilogue: String,
}

impl Default for Boilerplate {
    fn default() -> Self {
        Self {
            prologue: "<?php\n\n".to_string(),
            epilogue: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, TypedBuilder)]
#[builder(field_defaults(setter(into)))]
pub struct CodegenOptions {
    #[builder(default = codegen::BLOCKS_DIRECTORY.to_string())]
    pub blocks_directory: String,
    #[builder(default = codegen::TEMPLATE_EXTENSION.to_string())]
    pub template_extension: String,
    #[builder(default = codegen::BLOCK_CATEGORY.to_string())]
    pub category: String,
    #[builder(default = codegen::WRAPPER_CLASS.to_string())]
    pub wrapper_class: String,
    #[builder(default = codegen::FUNCTIONS_FILE.to_string())]
    pub functions_file: String,
    #[builder(default)]
    pub boilerplate: Boilerplate,
}

impl Default for CodegenOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl CodegenOptions {
    /// Theme-relative path of a block's render template, as ACF expects it.
    pub fn template_path(&self, block_name: &str) -> String {
        format!(
            "{}/{}.{}",
            self.blocks_directory.trim_end_matches('/'),
            block_name,
            self.template_extension
        )
    }
}

/// One file of the generated theme, relative to the theme directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub path: PathBuf,
    pub contents: String,
}

/// Everything a regeneration writes. Files are overwritten in full.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactBundle {
    pub blocks: Vec<CompiledBlock>,
    pub files: Vec<GeneratedFile>,
}

impl ArtifactBundle {
    pub fn compile(registry: &TemplateRegistry, options: &CodegenOptions) -> Self {
        let blocks: Vec<CompiledBlock> = registry
            .iter()
            .map(|block| compiler::compile(block, options))
            .collect();

        let mut files: Vec<GeneratedFile> = blocks
            .iter()
            .map(|block| GeneratedFile {
                path: PathBuf::from(options.template_path(&block.block_name)),
                contents: block.template_file.clone(),
            })
            .collect();
        files.push(GeneratedFile {
            path: PathBuf::from(&options.functions_file),
            contents: functions_script(&blocks, &options.boilerplate),
        });

        Self { blocks, files }
    }

    pub fn file(&self, path: impl AsRef<Path>) -> Option<&GeneratedFile> {
        let path = path.as_ref();
        self.files.iter().find(|f| f.path == path)
    }
}

/// Paths a sink wrote during regeneration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegenerationReport {
    pub files: Vec<PathBuf>,
}

/// Persists a regenerated bundle.
pub trait ArtifactSink {
    fn write_artifacts(&mut self, bundle: &ArtifactBundle) -> Result<RegenerationReport, CmsError>;
}

/// Aggregated registration script: prologue, guarded registrations, init hook, epilogue.
pub fn functions_script(blocks: &[CompiledBlock], boilerplate: &Boilerplate) -> String {
    let function = codegen::REGISTRATION_FUNCTION;
    let mut out = boilerplate.prologue.clone();
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }

    out.push_str(&format!("function {function}() {{\n"));
    out.push_str(
        "    if (function_exists('acf_register_block_type') && function_exists('acf_add_local_field_group')) {\n",
    );
    for block in blocks {
        out.push('\n');
        out.push_str(&php::indent(&block.registration_fragment, 2));
        out.push_str("\n\n");
        out.push_str(&php::indent(&block.field_group_fragment, 2));
        out.push('\n');
    }
    out.push_str("    }\n}\n");
    out.push_str(&format!("add_action('acf/init', '{function}');\n"));
    out.push_str(&boilerplate.epilogue);
    out
}
