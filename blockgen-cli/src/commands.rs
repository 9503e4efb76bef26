// ABOUTME: Command implementations shared by the binary and the integration tests
// ABOUTME: Wires the project config into the SDK fetch, drift detection and code generation

use crate::config::Config;
use crate::writer::DirectorySink;
use anyhow::{Context, Result};
use blockgen_sdk::{ArtifactBundle, ArtifactSink, CmsContext, RegenerationReport};
use std::path::Path;

/// Run one fetch cycle; regenerated files land in the configured theme directory
pub async fn sync(config: &Config) -> Result<CmsContext> {
    let registry = config.registry()?;
    let template = config.query_template()?;
    let codegen = config.codegen_options()?;
    let client = config.client()?;
    let mut sink = DirectorySink::new(config.theme_dir());

    log::info!(
        "Fetching {} block types from {}",
        registry.len(),
        client.endpoint()
    );
    let context =
        blockgen_sdk::fetch_cms_data(&client, &registry, &template, &codegen, &mut sink).await?;
    Ok(context)
}

/// Compile every block and write the artifacts without contacting the CMS
pub fn generate(config: &Config) -> Result<RegenerationReport> {
    let registry = config.registry()?;
    let codegen = config.codegen_options()?;
    let bundle = ArtifactBundle::compile(&registry, &codegen);

    let mut sink = DirectorySink::new(config.theme_dir());
    let report = sink
        .write_artifacts(&bundle)
        .with_context(|| format!("Failed to write theme files to {}", sink.root().display()))?;
    Ok(report)
}

pub fn query_text(config: &Config, degraded: bool) -> Result<String> {
    let template = config.query_template()?;
    if degraded {
        return Ok(template.degraded_query());
    }
    let registry = config.registry()?;
    Ok(template.full_query(&registry)?)
}

pub fn write_output(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    std::fs::write(path, contents)
        .with_context(|| format!("Failed to write output file {}", path.display()))
}
