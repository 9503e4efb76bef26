// ABOUTME: Schema drift detection with a full query first and a degraded query as fallback
// ABOUTME: Regenerates block artifacts when the CMS only answers the query without block types

use crate::artifacts::{ArtifactBundle, ArtifactSink, CodegenOptions, RegenerationReport};
use crate::client::{CmsFetcher, GraphQLResponse};
use crate::error::{BlockDataDecodeWarning, CmsError};
use crate::query::QueryTemplate;
use crate::registry::TemplateRegistry;
use crate::snapshot::CmsSnapshot;
use serde_json::Value;

/// Where the fallback protocol currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriftState {
    Querying,
    Degraded,
    Resolved,
}

/// How the returned snapshot was obtained.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// The full query with every block type succeeded.
    FullQuery,
    /// Only the minimal query succeeded; local templates were regenerated.
    Degraded { regenerated: RegenerationReport },
}

/// Result of one fetch cycle, handed to consumers by value.
#[derive(Debug, Clone, PartialEq)]
pub struct CmsContext {
    pub snapshot: CmsSnapshot,
    pub resolution: Resolution,
    pub warnings: Vec<BlockDataDecodeWarning>,
}

impl CmsContext {
    pub fn templates_outdated(&self) -> bool {
        matches!(self.resolution, Resolution::Degraded { .. })
    }

    /// Operator instruction after a regeneration, if one happened.
    pub fn redeploy_notice(&self) -> Option<String> {
        match &self.resolution {
            Resolution::FullQuery => None,
            Resolution::Degraded { regenerated } => Some(format!(
                "Block templates were outdated and {} files were regenerated. Upload the theme to the CMS and run again to fetch block data.",
                regenerated.files.len()
            )),
        }
    }
}

/// Backend truthiness of the top-level `data` field.
pub fn has_data(data: Option<&Value>) -> bool {
    match data {
        None | Some(Value::Null) => false,
        Some(Value::Bool(flag)) => *flag,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

/// Runs the full query, falls back to the degraded query and regenerates on drift.
///
/// The remote schema does not say which block types it knows, so drift is
/// inferred: a failing full query next to a working degraded query means the
/// local block types are unknown to the CMS.
pub struct DriftDetector<'a, F: ?Sized> {
    fetcher: &'a F,
    registry: &'a TemplateRegistry,
    template: &'a QueryTemplate,
    codegen: &'a CodegenOptions,
    state: DriftState,
}

impl<'a, F: CmsFetcher + ?Sized> DriftDetector<'a, F> {
    pub fn new(
        fetcher: &'a F,
        registry: &'a TemplateRegistry,
        template: &'a QueryTemplate,
        codegen: &'a CodegenOptions,
    ) -> Self {
        Self {
            fetcher,
            registry,
            template,
            codegen,
            state: DriftState::Querying,
        }
    }

    pub fn state(&self) -> DriftState {
        self.state
    }

    pub async fn run<S: ArtifactSink + ?Sized>(
        &mut self,
        sink: &mut S,
    ) -> Result<CmsContext, CmsError> {
        self.transition(DriftState::Querying);
        let full_query = self.template.full_query(self.registry)?;

        match self.fetcher.fetch(&full_query).await {
            Ok(response) if has_data(response.data.as_ref()) => {
                let (snapshot, warnings) = decode(response)?;
                self.transition(DriftState::Resolved);
                return Ok(finish(snapshot, warnings, Resolution::FullQuery));
            }
            Ok(response) => {
                tracing::info!("Full query returned no data ({})", describe_empty(&response))
            }
            Err(e) => tracing::warn!("Full query failed: {}", e),
        }

        self.transition(DriftState::Degraded);
        let response = match self.fetcher.fetch(&self.template.degraded_query()).await {
            Ok(response) if has_data(response.data.as_ref()) => response,
            Ok(response) => {
                return Err(CmsError::CmsUnreachable {
                    cause: describe_empty(&response),
                });
            }
            Err(e) => {
                return Err(CmsError::CmsUnreachable {
                    cause: e.to_string(),
                });
            }
        };

        let (snapshot, warnings) = decode(response)?;

        tracing::warn!(
            "CMS answered the minimal query but not the block query, block templates are outdated"
        );
        let bundle = ArtifactBundle::compile(self.registry, self.codegen);
        let regenerated = sink.write_artifacts(&bundle)?;
        tracing::warn!(
            "Regenerated {} block files, re-deploy the theme to the CMS",
            regenerated.files.len()
        );

        self.transition(DriftState::Resolved);
        Ok(finish(
            snapshot,
            warnings,
            Resolution::Degraded { regenerated },
        ))
    }

    fn transition(&mut self, next: DriftState) {
        tracing::debug!(from = ?self.state, to = ?next, "Drift detector state change");
        self.state = next;
    }
}

fn decode(
    response: GraphQLResponse,
) -> Result<(CmsSnapshot, Vec<BlockDataDecodeWarning>), CmsError> {
    let data = response.data.unwrap_or_default();
    Ok(CmsSnapshot::decode(data)?)
}

fn finish(
    snapshot: CmsSnapshot,
    warnings: Vec<BlockDataDecodeWarning>,
    resolution: Resolution,
) -> CmsContext {
    tracing::info!(
        blocks = snapshot.block_count(),
        warnings = warnings.len(),
        "Fetched data from CMS"
    );
    CmsContext {
        snapshot,
        resolution,
        warnings,
    }
}

fn describe_empty(response: &GraphQLResponse) -> String {
    match response.errors.as_deref() {
        Some(errors) if !errors.is_empty() => errors
            .iter()
            .map(|e| e.message.as_str())
            .collect::<Vec<_>>()
            .join("; "),
        _ => "response contained no data".to_string(),
    }
}
