// ABOUTME: Centralized constants for the blockgen SDK
// ABOUTME: Contains timeouts, query placeholders and code generation defaults

/// HTTP and request timeouts
pub mod timeouts {
    use std::time::Duration;

    /// Default timeout for HTTP requests
    pub const HTTP_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
}

/// HTTP client identity
pub mod http {
    pub const USER_AGENT: &str = concat!("blockgen/", env!("CARGO_PKG_VERSION"));
}

/// GraphQL query construction
pub mod query {
    /// Placeholder in a query template that receives the block fragment
    pub const BLOCKS_PLACEHOLDER: &str = "{{blocks}}";

    /// Number of uppercase ASCII letters a block type name must contain
    pub const REQUIRED_UPPERCASE_LETTERS: usize = 2;
}

/// Defaults for generated ACF block files
pub mod codegen {
    /// Directory (relative to the theme) holding block render templates
    pub const BLOCKS_DIRECTORY: &str = "blocks";

    /// Extension of generated render templates
    pub const TEMPLATE_EXTENSION: &str = "php";

    /// Block category shown in the editor inserter
    pub const BLOCK_CATEGORY: &str = "formatting";

    /// CSS class on the wrapper element of every generated template
    pub const WRAPPER_CLASS: &str = "blockgen-block";

    /// Namespace ACF gives registered blocks
    pub const ACF_BLOCK_NAMESPACE: &str = "acf";

    /// Inline style of the heading in the synthetic message field
    pub const MESSAGE_HEADING_STYLE: &str = "font-size: 36px!important";

    /// Name of the aggregated registration script inside the theme
    pub const FUNCTIONS_FILE: &str = "functions.php";

    /// Name of the PHP function wrapping all block registrations
    pub const REGISTRATION_FUNCTION: &str = "blockgen_register_acf_block_types_and_fields";
}
