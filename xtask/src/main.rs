// ABOUTME: xtask binary for build automation and schema management
// ABOUTME: Downloads the WPGraphQL introspection schema and lists the block types the CMS knows

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Build automation tasks for blockgen")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download the CMS GraphQL schema via introspection
    Schema {
        /// GraphQL endpoint (falls back to CMS_GRAPHQL_URL)
        #[arg(long)]
        url: Option<String>,

        /// Bearer token (falls back to CMS_AUTH_TOKEN)
        #[arg(long)]
        token: Option<String>,

        /// Where to write the schema
        #[arg(long, short, default_value = "schema.json")]
        output: PathBuf,

        /// Print the types implementing EditorBlock after downloading
        #[arg(long)]
        list_blocks: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Schema {
            url,
            token,
            output,
            list_blocks,
        } => {
            println!("Downloading CMS GraphQL schema...");
            let schema = download_schema(url, token, &output)?;
            if list_blocks {
                for name in editor_block_types(&schema) {
                    println!("{}", name);
                }
            }
        }
    }

    Ok(())
}

fn download_schema(
    url: Option<String>,
    token: Option<String>,
    output_path: &Path,
) -> Result<serde_json::Value> {
    let url = url
        .or_else(|| std::env::var("CMS_GRAPHQL_URL").ok())
        .context("No endpoint provided. Use --url or set CMS_GRAPHQL_URL environment variable")?;
    let token = token.or_else(|| std::env::var("CMS_AUTH_TOKEN").ok());

    let introspection_query = serde_json::json!({
        "query": r#"
            query IntrospectionQuery {
              __schema {
                queryType { name }
                mutationType { name }
                subscriptionType { name }
                types {
                  ...FullType
                }
                directives {
                  name
                  description
                  locations
                  args {
                    ...InputValue
                  }
                }
              }
            }

            fragment FullType on __Type {
              kind
              name
              description
              fields(includeDeprecated: true) {
                name
                description
                args {
                  ...InputValue
                }
                type {
                  ...TypeRef
                }
                isDeprecated
                deprecationReason
              }
              inputFields {
                ...InputValue
              }
              interfaces {
                ...TypeRef
              }
              enumValues(includeDeprecated: true) {
                name
                description
                isDeprecated
                deprecationReason
              }
              possibleTypes {
                ...TypeRef
              }
            }

            fragment InputValue on __InputValue {
              name
              description
              type { ...TypeRef }
              defaultValue
            }

            fragment TypeRef on __Type {
              kind
              name
              ofType {
                kind
                name
                ofType {
                  kind
                  name
                  ofType {
                    kind
                    name
                    ofType {
                      kind
                      name
                      ofType {
                        kind
                        name
                        ofType {
                          kind
                          name
                          ofType {
                            kind
                            name
                          }
                        }
                      }
                    }
                  }
                }
              }
            }
        "#
    });

    let client = reqwest::blocking::Client::new();
    let mut request = client.post(&url).json(&introspection_query);
    if let Some(token) = token {
        request = request.bearer_auth(token);
    }
    let response = request
        .send()
        .context("Failed to send introspection query")?;

    if !response.status().is_success() {
        anyhow::bail!("Failed to download schema: {}", response.status());
    }

    let schema_response: serde_json::Value =
        response.json().context("Failed to parse schema response")?;

    // Extract just the schema portion
    let schema = schema_response
        .get("data")
        .cloned()
        .context("No data field in response")?;

    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).context("Failed to create output directory")?;
    }
    let formatted_schema =
        serde_json::to_string_pretty(&schema).context("Failed to format schema")?;
    fs::write(output_path, formatted_schema).context("Failed to write schema file")?;

    println!("Schema downloaded successfully to {:?}", output_path);
    Ok(schema)
}

/// Names of the object types that implement the `EditorBlock` interface
fn editor_block_types(schema: &serde_json::Value) -> Vec<String> {
    let mut names: Vec<String> = schema["__schema"]["types"]
        .as_array()
        .into_iter()
        .flatten()
        .filter(|t| t["name"] == "EditorBlock")
        .flat_map(|t| t["possibleTypes"].as_array().into_iter().flatten())
        .filter_map(|t| t["name"].as_str().map(str::to_string))
        .collect();
    names.sort();
    names
}
