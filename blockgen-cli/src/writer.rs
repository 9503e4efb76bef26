// ABOUTME: Artifact sink that writes generated block files into the theme directory
// ABOUTME: Creates missing directories and overwrites existing files in full

use blockgen_sdk::{ArtifactBundle, ArtifactSink, CmsError, RegenerationReport};
use std::path::{Path, PathBuf};

pub struct DirectorySink {
    root: PathBuf,
}

impl DirectorySink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ArtifactSink for DirectorySink {
    fn write_artifacts(&mut self, bundle: &ArtifactBundle) -> Result<RegenerationReport, CmsError> {
        let mut files = Vec::with_capacity(bundle.files.len());

        for file in &bundle.files {
            let target = self.root.join(&file.path);
            if let Some(parent) = target.parent() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    CmsError::Regeneration(format!(
                        "Failed to create directory {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
            std::fs::write(&target, &file.contents).map_err(|e| {
                CmsError::Regeneration(format!("Failed to write {}: {}", target.display(), e))
            })?;
            log::debug!("Wrote {} ({} bytes)", target.display(), file.contents.len());
            files.push(target);
        }

        Ok(RegenerationReport { files })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockgen_sdk::{BlockDescriptor, CodegenOptions, TemplateRegistry};
    use tempfile::TempDir;

    fn registry() -> TemplateRegistry {
        TemplateRegistry::new(vec![
            BlockDescriptor::builder()
                .block_name("hero")
                .display_name("Hero")
                .gql_type_name("AcfHero")
                .build(),
        ])
        .unwrap()
    }

    #[test]
    fn test_writes_templates_and_functions_file() {
        let dir = TempDir::new().unwrap();
        let mut sink = DirectorySink::new(dir.path().join("theme"));
        let bundle = ArtifactBundle::compile(&registry(), &CodegenOptions::default());

        let report = sink.write_artifacts(&bundle).unwrap();

        assert_eq!(report.files.len(), 2);
        let template = std::fs::read_to_string(dir.path().join("theme/blocks/hero.php")).unwrap();
        assert!(template.contains("block-hero"));
        assert!(dir.path().join("theme/functions.php").exists());
    }

    #[test]
    fn test_overwrites_existing_files() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("blocks")).unwrap();
        std::fs::write(dir.path().join("blocks/hero.php"), "stale").unwrap();

        let mut sink = DirectorySink::new(dir.path());
        let bundle = ArtifactBundle::compile(&registry(), &CodegenOptions::default());
        sink.write_artifacts(&bundle).unwrap();

        let template = std::fs::read_to_string(dir.path().join("blocks/hero.php")).unwrap();
        assert!(!template.contains("stale"));
    }

    #[test]
    fn test_unwritable_root_is_regeneration_error() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, "not a directory").unwrap();

        let mut sink = DirectorySink::new(&blocker);
        let bundle = ArtifactBundle::compile(&registry(), &CodegenOptions::default());
        let err = sink.write_artifacts(&bundle).unwrap_err();

        assert!(matches!(err, CmsError::Regeneration(_)));
    }
}
