// ABOUTME: Tests for project file loading, validation and environment overrides
// ABOUTME: Covers TOML parsing, relative path resolution and conversion into SDK types

use blockgen_cli::config::Config;
use blockgen_sdk::{CmsError, FieldType};
use secrecy::ExposeSecret;
use serial_test::serial;
use std::path::PathBuf;
use tempfile::TempDir;

const PROJECT: &str = r#"
graphql_url = "https://cms.example.com/graphql"
theme_directory = "theme"
blocks_directory = "acf-blocks"
accept_invalid_certs = true
timeout_secs = 5

[[blocks]]
block_name = "hero"
display_name = "Hero"
description = "Hero banner"
icon = "cover-image"
keywords = ["hero", "banner"]
gql_type_name = "AcfHero"

[blocks.attributes.title]
source_type = "string"
field_type = "text"
field_name = "hero_title"

[blocks.attributes.show_cta]
source_type = "boolean"
field_type = "true_false"
field_name = "hero_show_cta"

[blocks.attributes.cta]
source_type = "object"
field_type = "link"
field_name = "hero_cta"
conditional_logic = { field = "hero_show_cta", operator = "==", value = "1" }

[blocks.attributes.cta.additional_parameters]
return_format = "array"

[[blocks]]
block_name = "text"
display_name = "Text"
gql_type_name = "AcfText"
"#;

fn write_project(dir: &TempDir, contents: &str) -> PathBuf {
    let path = dir.path().join("blockgen.toml");
    std::fs::write(&path, contents).expect("Should write project file");
    path
}

#[test]
fn test_config_deserialize_complete() {
    let config: Config = toml::from_str(PROJECT).expect("Should parse valid TOML");

    assert_eq!(
        config.graphql_url.as_deref(),
        Some("https://cms.example.com/graphql")
    );
    assert_eq!(config.blocks_directory.as_deref(), Some("acf-blocks"));
    assert!(config.accept_invalid_certs);
    assert_eq!(config.timeout_secs, Some(5));
    assert_eq!(config.blocks.len(), 2);

    let hero = &config.blocks[0];
    assert_eq!(hero.keywords, vec!["hero", "banner"]);
    let attributes = hero.attributes.as_ref().unwrap();
    let keys: Vec<_> = attributes.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["title", "show_cta", "cta"]);
    assert_eq!(attributes["show_cta"].field_type, FieldType::Boolean);

    let cta = &attributes["cta"];
    let logic = cta.conditional_logic.as_ref().unwrap();
    assert_eq!(logic.field, "hero_show_cta");
    assert_eq!(
        cta.additional_parameters.as_ref().unwrap()["return_format"],
        "array"
    );

    let text = &config.blocks[1];
    assert!(text.attributes.is_none());
    assert!(text.description.is_empty());
}

#[test]
fn test_config_deserialize_empty() {
    let config: Config = toml::from_str("").expect("Should parse empty TOML");
    assert_eq!(config, Config::default());
}

#[test]
fn test_zero_timeout_is_rejected() {
    let result: Result<Config, _> = toml::from_str("timeout_secs = 0");
    let err = result.unwrap_err().to_string();
    assert!(err.contains("timeout_secs must be greater than zero"));
}

#[test]
fn test_unknown_field_type_is_rejected() {
    let toml_content = r#"
        [[blocks]]
        block_name = "hero"
        display_name = "Hero"
        gql_type_name = "AcfHero"

        [blocks.attributes.title]
        field_type = "select"
        field_name = "hero_title"
    "#;
    assert!(toml::from_str::<Config>(toml_content).is_err());
}

#[test]
fn test_load_from_file_resolves_paths_against_project_dir() {
    let dir = TempDir::new().unwrap();
    let path = write_project(&dir, PROJECT);

    let config = Config::load_from_file(&path).expect("Should load project file");

    assert_eq!(config.base_dir, dir.path());
    assert_eq!(config.theme_dir(), dir.path().join("theme"));
    let options = config.codegen_options().unwrap();
    assert_eq!(options.blocks_directory, "acf-blocks");
    assert_eq!(options.template_path("hero"), "acf-blocks/hero.php");
}

#[test]
fn test_missing_project_file() {
    let dir = TempDir::new().unwrap();
    let err = Config::load(Some(dir.path().join("absent.toml").as_path())).unwrap_err();
    assert!(err.to_string().contains("No project file found"));
}

#[test]
fn test_invalid_toml_reports_file() {
    let dir = TempDir::new().unwrap();
    let path = write_project(&dir, "graphql_url = [");
    let err = Config::load_from_file(&path).unwrap_err();
    assert!(format!("{:#}", err).contains("Failed to parse TOML config file"));
}

#[test]
fn test_custom_query_template_and_boilerplate() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("query.graphql"),
        "query { posts { nodes { editorBlocks { name{{blocks}} } } } }",
    )
    .unwrap();
    std::fs::write(dir.path().join("prologue.php"), "<?php\n// custom\n").unwrap();
    std::fs::write(dir.path().join("epilogue.php"), "// end\n").unwrap();
    let path = write_project(
        &dir,
        r#"
        query_template = "query.graphql"
        prologue = "prologue.php"
        epilogue = "epilogue.php"

        [[blocks]]
        block_name = "hero"
        display_name = "Hero"
        gql_type_name = "AcfHero"
        "#,
    );

    let config = Config::load_from_file(&path).unwrap();
    let template = config.query_template().unwrap();
    let query = template.full_query(&config.registry().unwrap()).unwrap();
    assert!(query.starts_with("query { posts"));
    assert!(query.contains("... on AcfHero"));

    let options = config.codegen_options().unwrap();
    assert_eq!(options.boilerplate.prologue, "<?php\n// custom\n");
    assert_eq!(options.boilerplate.epilogue, "// end\n");
}

#[test]
fn test_query_template_without_placeholder_is_rejected() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("query.graphql"), "query { pages { nodes { id } } }").unwrap();
    let path = write_project(&dir, r#"query_template = "query.graphql""#);

    let config = Config::load_from_file(&path).unwrap();
    let err = config.query_template().unwrap_err();
    assert!(err.to_string().contains("Invalid query template"));
}

#[test]
fn test_registry_errors_keep_cms_error() {
    let config: Config = toml::from_str(
        r#"
        [[blocks]]
        block_name = "hero"
        display_name = "Hero"
        gql_type_name = "ACHero"
        "#,
    )
    .unwrap();

    let err = config.registry().unwrap_err();
    let cms_error = err.downcast_ref::<CmsError>().expect("Should wrap a CmsError");
    assert!(matches!(
        cms_error,
        CmsError::NamingConstraintViolation { block, .. } if block == "hero"
    ));
}

#[test]
#[serial]
fn test_env_overrides_endpoint() {
    let dir = TempDir::new().unwrap();
    let path = write_project(&dir, PROJECT);

    std::env::set_var("CMS_GRAPHQL_URL", "https://staging.example.com/graphql");
    let config = Config::load(Some(path.as_path())).unwrap();
    std::env::remove_var("CMS_GRAPHQL_URL");

    assert_eq!(
        config.graphql_url().unwrap(),
        "https://staging.example.com/graphql"
    );
}

#[test]
#[serial]
fn test_blank_env_endpoint_is_ignored() {
    let dir = TempDir::new().unwrap();
    let path = write_project(&dir, PROJECT);

    std::env::set_var("CMS_GRAPHQL_URL", "  ");
    let config = Config::load(Some(path.as_path())).unwrap();
    std::env::remove_var("CMS_GRAPHQL_URL");

    assert_eq!(
        config.graphql_url().unwrap(),
        "https://cms.example.com/graphql"
    );
}

#[test]
#[serial]
fn test_auth_token_from_env() {
    std::env::remove_var("CMS_AUTH_TOKEN");
    assert!(Config::default().auth_token().is_none());

    std::env::set_var("CMS_AUTH_TOKEN", "app-password");
    let token = Config::default().auth_token().expect("Token should be read");
    std::env::remove_var("CMS_AUTH_TOKEN");

    assert_eq!(token.expose_secret(), "app-password");
}

#[test]
#[serial]
fn test_client_requires_endpoint() {
    std::env::remove_var("CMS_GRAPHQL_URL");
    let err = Config::default().with_env_overrides().client().unwrap_err();
    assert!(err.to_string().contains("No GraphQL endpoint configured"));
}
