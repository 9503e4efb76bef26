// ABOUTME: Builder pattern implementation for CmsClient configuration
// ABOUTME: Provides type-safe configuration with compile-time validation of required fields

use crate::CmsClient;
use crate::constants::timeouts;
use crate::error::CmsError;
use secrecy::SecretString;
use std::time::Duration;
use typed_builder::TypedBuilder;

#[derive(Debug, TypedBuilder)]
#[builder(build_method(into = Result<CmsClient, CmsError>))]
pub struct CmsClientConfig {
    /// GraphQL endpoint, e.g. `https://cms.example.com/graphql`
    #[builder(setter(into))]
    pub endpoint: String,

    #[builder(default = None)]
    pub auth_token: Option<SecretString>,

    #[builder(default = timeouts::HTTP_REQUEST_TIMEOUT)]
    pub timeout: Duration,

    /// Skip TLS certificate validation (self-signed staging servers)
    #[builder(default = false)]
    pub accept_invalid_certs: bool,
}

impl From<CmsClientConfig> for Result<CmsClient, CmsError> {
    fn from(config: CmsClientConfig) -> Self {
        CmsClient::from_config(config)
    }
}

impl CmsClient {
    pub fn builder() -> CmsClientConfigBuilder<((), (), (), ())> {
        CmsClientConfig::builder()
    }
}
