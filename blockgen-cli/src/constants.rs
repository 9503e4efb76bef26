// ABOUTME: Centralized constants for the blockgen command-line tool
// ABOUTME: Contains file names, environment variable names, timeouts and UI settings

/// Project file lookup
pub mod files {
    /// Project file searched in the current directory when `--config` is absent
    pub const CONFIG_FILE_NAME: &str = "blockgen.toml";

    /// Default theme directory, relative to the project file
    pub const DEFAULT_THEME_DIRECTORY: &str = ".";

    /// Prologue written at the top of `functions.php` unless overridden
    pub const DEFAULT_PROLOGUE: &str = include_str!("../assets/prologue.php");
}

/// Environment variables that override the project file
pub mod env {
    pub const GRAPHQL_URL: &str = "CMS_GRAPHQL_URL";
    pub const AUTH_TOKEN: &str = "CMS_AUTH_TOKEN";
}

/// Timeout configurations for various operations
pub mod timeouts {
    /// Progress spinner tick interval for smooth animation
    pub const PROGRESS_BAR_TICK_MS: u64 = 80;
}

/// UI and formatting constants
pub mod ui {
    /// Column width for descriptions in the blocks table
    pub const DESCRIPTION_WIDTH: usize = 40;
}
