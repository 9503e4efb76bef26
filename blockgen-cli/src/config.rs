// ABOUTME: Project file loading, validation and environment overrides for blockgen
// ABOUTME: Turns blockgen.toml into the SDK registry, query template, codegen options and client

use crate::constants::{env, files};
use anyhow::{Context, Result, anyhow};
use blockgen_sdk::constants::timeouts::HTTP_REQUEST_TIMEOUT;
use blockgen_sdk::{
    BlockDescriptor, Boilerplate, CmsClient, CodegenOptions, QueryTemplate, TemplateRegistry,
};
use secrecy::SecretString;
use serde::{Deserialize, Deserializer};
use std::path::{Component, Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub graphql_url: Option<String>,
    #[serde(default)]
    pub theme_directory: Option<PathBuf>,
    #[serde(default)]
    pub blocks_directory: Option<String>,
    #[serde(default)]
    pub query_template: Option<PathBuf>,
    #[serde(default)]
    pub accept_invalid_certs: bool,
    #[serde(default, deserialize_with = "validate_timeout")]
    pub timeout_secs: Option<u64>,
    #[serde(default)]
    pub prologue: Option<PathBuf>,
    #[serde(default)]
    pub epilogue: Option<PathBuf>,
    #[serde(default)]
    pub blocks: Vec<BlockDescriptor>,
    /// Directory relative paths in the file are resolved against
    #[serde(skip)]
    pub base_dir: PathBuf,
}

impl Config {
    /// Load the project file given on the command line, or `blockgen.toml` in the current directory
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => std::env::current_dir()
                .context("Failed to determine current directory")?
                .join(files::CONFIG_FILE_NAME),
        };

        if !path.exists() {
            return Err(anyhow!(
                "No project file found at {}. Create {} or pass --config",
                path.display(),
                files::CONFIG_FILE_NAME
            ));
        }

        Ok(Self::load_from_file(&path)?.with_env_overrides())
    }

    /// Load configuration from a single file without applying environment overrides
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let mut config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config file: {}", path.display()))?;

        config.base_dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        config.validate()?;
        Ok(config)
    }

    /// Apply `CMS_GRAPHQL_URL` on top of the file's endpoint
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var(env::GRAPHQL_URL) {
            if !url.trim().is_empty() {
                log::debug!("Using GraphQL endpoint from {}", env::GRAPHQL_URL);
                self.graphql_url = Some(url.trim().to_string());
            }
        }
        self
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        if let Some(dir) = &self.blocks_directory {
            let path = Path::new(dir);
            if dir.trim().is_empty()
                || path.is_absolute()
                || path.components().any(|c| c == Component::ParentDir)
            {
                return Err(anyhow!(
                    "Invalid blocks_directory '{}': must be a relative path inside the theme",
                    dir
                ));
            }
        }

        Ok(())
    }

    pub fn graphql_url(&self) -> Result<&str> {
        self.graphql_url.as_deref().ok_or_else(|| {
            anyhow!(
                "No GraphQL endpoint configured. Set graphql_url in {} or {}",
                files::CONFIG_FILE_NAME,
                env::GRAPHQL_URL
            )
        })
    }

    pub fn auth_token(&self) -> Option<SecretString> {
        std::env::var(env::AUTH_TOKEN)
            .ok()
            .filter(|token| !token.trim().is_empty())
            .map(|token| SecretString::new(token.into_boxed_str()))
    }

    pub fn timeout(&self) -> Duration {
        self.timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(HTTP_REQUEST_TIMEOUT)
    }

    /// Resolve a path from the project file against its directory
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    pub fn theme_dir(&self) -> PathBuf {
        let theme = self
            .theme_directory
            .clone()
            .unwrap_or_else(|| PathBuf::from(files::DEFAULT_THEME_DIRECTORY));
        self.resolve(&theme)
    }

    pub fn registry(&self) -> Result<TemplateRegistry> {
        TemplateRegistry::new(self.blocks.clone()).context("Invalid block definitions")
    }

    pub fn query_template(&self) -> Result<QueryTemplate> {
        let Some(path) = &self.query_template else {
            return Ok(QueryTemplate::default());
        };

        let path = self.resolve(path);
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read query template: {}", path.display()))?;
        QueryTemplate::new(text)
            .with_context(|| format!("Invalid query template: {}", path.display()))
    }

    pub fn codegen_options(&self) -> Result<CodegenOptions> {
        let prologue = match &self.prologue {
            Some(path) => self.read_boilerplate(path)?,
            None => files::DEFAULT_PROLOGUE.to_string(),
        };
        let epilogue = match &self.epilogue {
            Some(path) => self.read_boilerplate(path)?,
            None => String::new(),
        };

        let mut options = CodegenOptions::builder()
            .boilerplate(Boilerplate { prologue, epilogue })
            .build();
        if let Some(dir) = &self.blocks_directory {
            options.blocks_directory = dir.clone();
        }
        Ok(options)
    }

    pub fn client(&self) -> Result<CmsClient> {
        CmsClient::builder()
            .endpoint(self.graphql_url()?)
            .auth_token(self.auth_token())
            .timeout(self.timeout())
            .accept_invalid_certs(self.accept_invalid_certs)
            .build()
            .context("Failed to create CMS client")
    }

    fn read_boilerplate(&self, path: &Path) -> Result<String> {
        let path = self.resolve(path);
        std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read boilerplate file: {}", path.display()))
    }
}

// Custom deserializer for timeout validation
fn validate_timeout<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match Option::<u64>::deserialize(deserializer)? {
        Some(0) => Err(D::Error::custom("timeout_secs must be greater than zero")),
        value => Ok(value),
    }
}
