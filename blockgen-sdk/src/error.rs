// ABOUTME: Custom error types for the blockgen SDK with operator-friendly messages
// ABOUTME: Covers naming violations, fetch failures, unreachable CMS and regeneration errors

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Which part of the GraphQL type naming rule a block broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamingRule {
    /// The name must contain exactly two uppercase ASCII letters.
    UppercaseCount { found: usize },
    /// The name must not contain a `/`.
    ContainsSlash,
}

impl fmt::Display for NamingRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NamingRule::UppercaseCount { found } => write!(
                f,
                "must have exactly 2 uppercase letters (found {})",
                found
            ),
            NamingRule::ContainsSlash => write!(f, "cannot contain a '/'"),
        }
    }
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Transport error{}: {message}", .status.map(|s| format!(" (HTTP {s})")).unwrap_or_default())]
    Transport {
        status: Option<u16>,
        message: String,
    },

    #[error("Failed to parse CMS response: {0}")]
    ParseFailure(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            FetchError::ParseFailure(err.to_string())
        } else {
            FetchError::Transport {
                status: err.status().map(|s| s.as_u16()),
                message: err.to_string(),
            }
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::ParseFailure(err.to_string())
    }
}

#[derive(Debug, Error)]
pub enum CmsError {
    #[error("gqlTypeName '{type_name}' of block '{block}' {rule}")]
    NamingConstraintViolation {
        block: String,
        type_name: String,
        rule: NamingRule,
    },

    #[error("gqlTypeName '{type_name}' is used by both '{first}' and '{second}'")]
    DuplicateTypeName {
        type_name: String,
        first: String,
        second: String,
    },

    #[error("Block name '{0}' is registered more than once")]
    DuplicateBlockName(String),

    #[error("Attributes '{first}' and '{second}' of block '{block}' both become ${identifier}")]
    AttributeKeyCollision {
        block: String,
        identifier: String,
        first: String,
        second: String,
    },

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Got no data from CMS: {cause}")]
    CmsUnreachable { cause: String },

    #[error("Failed to regenerate block files: {0}")]
    Regeneration(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl CmsError {
    pub fn help_text(&self) -> Option<&'static str> {
        match self {
            CmsError::NamingConstraintViolation { .. } => Some(
                "Block type names are prefixed by the CMS and must look like 'ACHero': exactly two uppercase letters, no '/'",
            ),
            CmsError::DuplicateTypeName { .. } => {
                Some("Every block needs its own gql_type_name")
            }
            CmsError::DuplicateBlockName(_) => {
                Some("Every block needs its own block_name, it is used as the template file name")
            }
            CmsError::AttributeKeyCollision { .. } => Some(
                "Attribute keys become PHP variables with every character other than letters and digits replaced by '_', rename one of them",
            ),
            CmsError::Fetch(_) => Some("Check the GraphQL endpoint URL and your network connection"),
            CmsError::CmsUnreachable { .. } => Some(
                "Even the minimal query failed. Check that the CMS is up and WPGraphQL is active, then reupload the theme and try again",
            ),
            CmsError::Regeneration(_) => Some("Check that the theme directory is writable"),
            CmsError::Configuration(_) => None,
        }
    }

    /// Errors raised before any network or file I/O took place.
    pub fn is_registry_error(&self) -> bool {
        matches!(
            self,
            CmsError::NamingConstraintViolation { .. }
                | CmsError::DuplicateTypeName { .. }
                | CmsError::DuplicateBlockName(_)
                | CmsError::AttributeKeyCollision { .. }
        )
    }
}

/// A single editor block that could not be fully decoded.
///
/// Recovered locally: an invalid `attributes.data` string is kept raw, an
/// unreadable block is left out of its node. The rest of the snapshot survives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockDataDecodeWarning {
    pub collection: String,
    pub node: String,
    pub block: String,
    pub message: String,
}

impl fmt::Display for BlockDataDecodeWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Error decoding block data ({} > {} > {}): {}",
            self.collection, self.node, self.block, self.message
        )
    }
}
