// ABOUTME: Blockgen SDK for fetching WordPress block content over WPGraphQL
// ABOUTME: Includes the block registry, query builder, drift detection and ACF code generation

pub mod artifacts;
pub mod builder;
pub mod client;
pub mod compiler;
pub mod constants;
pub mod drift;
pub mod error;
pub mod php;
pub mod query;
pub mod registry;
pub mod snapshot;

#[cfg(test)]
pub mod test_helpers;

pub use artifacts::{
    ArtifactBundle, ArtifactSink, Boilerplate, CodegenOptions, GeneratedFile, RegenerationReport,
};
pub use builder::CmsClientConfig;
pub use client::{CmsClient, CmsFetcher, GraphQLResponse};
pub use compiler::CompiledBlock;
pub use drift::{CmsContext, DriftDetector, DriftState, Resolution};
pub use error::{BlockDataDecodeWarning, CmsError, FetchError, NamingRule};
pub use query::QueryTemplate;
pub use registry::{AttributeSpec, BlockDescriptor, ConditionalLogic, FieldType, TemplateRegistry};
pub use snapshot::{BlockData, CmsSnapshot, ContentNode, EditorBlock};

pub type Result<T> = std::result::Result<T, CmsError>;

/// Fetch the CMS content once, regenerating block artifacts through `sink` on drift.
pub async fn fetch_cms_data<F, S>(
    fetcher: &F,
    registry: &TemplateRegistry,
    template: &QueryTemplate,
    codegen: &CodegenOptions,
    sink: &mut S,
) -> Result<CmsContext>
where
    F: CmsFetcher + ?Sized,
    S: ArtifactSink + ?Sized,
{
    DriftDetector::new(fetcher, registry, template, codegen)
        .run(sink)
        .await
}
