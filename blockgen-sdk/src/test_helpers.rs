// ABOUTME: Test helper utilities for block fixtures, mocked CMS responses and scripted fetchers
// ABOUTME: Provides mockito-based server helpers and in-memory fetcher and sink doubles

use crate::artifacts::{ArtifactBundle, ArtifactSink, RegenerationReport};
use crate::client::{CmsFetcher, GraphQLResponse};
use crate::error::{CmsError, FetchError};
use crate::registry::{AttributeSpec, BlockDescriptor, FieldType};
use async_trait::async_trait;
use indexmap::IndexMap;
use mockito::{Server, ServerGuard};
use serde_json::json;
use std::collections::VecDeque;
use std::sync::Mutex;

pub async fn mock_cms_server() -> ServerGuard {
    Server::new_async().await
}

pub fn hero_block() -> BlockDescriptor {
    let mut attributes = IndexMap::new();
    attributes.insert(
        "title".to_string(),
        AttributeSpec::builder()
            .source_type("string")
            .field_type(FieldType::Text)
            .field_name("hero_title")
            .build(),
    );

    BlockDescriptor::builder()
        .block_name("hero")
        .display_name("Hero")
        .description("Large banner with a title")
        .icon("cover-image")
        .keywords(vec!["hero".to_string(), "banner".to_string()])
        .gql_type_name("AcfHero")
        .attributes(attributes)
        .build()
}

pub fn text_block() -> BlockDescriptor {
    BlockDescriptor::builder()
        .block_name("text-block")
        .display_name("Text")
        .description("Plain text section")
        .icon("editor-paragraph")
        .keywords(vec!["text".to_string()])
        .gql_type_name("AcfTextblock")
        .build()
}

pub fn block_with_type(block_name: &str, gql_type_name: &str) -> BlockDescriptor {
    BlockDescriptor::builder()
        .block_name(block_name)
        .display_name(block_name)
        .gql_type_name(gql_type_name)
        .build()
}

pub fn response_from(value: serde_json::Value) -> GraphQLResponse {
    serde_json::from_value(value).expect("fixture should be a valid GraphQL response")
}

pub fn mock_pages_response() -> serde_json::Value {
    json!({
        "data": {
            "pages": {
                "nodes": [
                    {
                        "id": "cG9zdDox",
                        "title": "Home",
                        "slug": "home",
                        "uri": "/",
                        "isFrontPage": true,
                        "editorBlocks": [
                            {
                                "__typename": "AcfHero",
                                "name": "acf/hero",
                                "apiVersion": 2,
                                "attributes": {
                                    "data": "{\"hero_title\":\"Welcome\"}"
                                }
                            }
                        ]
                    },
                    {
                        "id": "cG9zdDoy",
                        "title": "About",
                        "slug": "about",
                        "uri": "/about/",
                        "isFrontPage": false,
                        "editorBlocks": [
                            {
                                "__typename": "CoreParagraph",
                                "name": "core/paragraph"
                            }
                        ]
                    }
                ]
            }
        }
    })
}

pub fn mock_error_response() -> serde_json::Value {
    json!({
        "errors": [
            {
                "message": "Unknown type \"AcfHero\".",
                "locations": [
                    {
                        "line": 14,
                        "column": 12
                    }
                ],
                "extensions": {
                    "category": "graphql"
                }
            }
        ],
        "data": null
    })
}

/// Fetcher that replays canned results and records every query it receives.
pub struct ScriptedFetcher {
    responses: Mutex<VecDeque<Result<GraphQLResponse, FetchError>>>,
    queries: Mutex<Vec<String>>,
}

impl ScriptedFetcher {
    pub fn new(responses: Vec<Result<GraphQLResponse, FetchError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl CmsFetcher for ScriptedFetcher {
    async fn fetch(&self, query: &str) -> Result<GraphQLResponse, FetchError> {
        self.queries.lock().unwrap().push(query.to_string());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(FetchError::Transport {
                    status: None,
                    message: "no scripted response left".to_string(),
                })
            })
    }
}

/// Sink that keeps the last bundle in memory.
#[derive(Default)]
pub struct RecordingSink {
    pub calls: usize,
    pub last_bundle: Option<ArtifactBundle>,
    fail_with: Option<String>,
}

impl RecordingSink {
    pub fn failing(message: &str) -> Self {
        Self {
            fail_with: Some(message.to_string()),
            ..Default::default()
        }
    }
}

impl ArtifactSink for RecordingSink {
    fn write_artifacts(&mut self, bundle: &ArtifactBundle) -> Result<RegenerationReport, CmsError> {
        self.calls += 1;
        if let Some(message) = &self.fail_with {
            return Err(CmsError::Regeneration(message.clone()));
        }
        self.last_bundle = Some(bundle.clone());
        Ok(RegenerationReport {
            files: bundle.files.iter().map(|f| f.path.clone()).collect(),
        })
    }
}
