//! Locate the lintable files of a project and read their bytes.
//!
//! Discovery is deliberately narrow: workflows under `.github/workflows/`,
//! the dependency manifest at the project root, and known tool configs.
//! Anything else in the project is out of scope.

use std::path::Path;

use anyhow::{Context, Result, bail};
use log::debug;

use plint_core::docs::parse::{DiscoveredFile, FileFormat};

/// Tool config file names recognized at the project root, with the tool
/// each one belongs to.
const TOOL_CONFIGS: &[(&str, &str)] = &[
    ("phpstan.neon", "phpstan"),
    ("phpstan.neon.dist", "phpstan"),
];

/// Collect every lintable file under `project_dir`.
///
/// Workflows are returned in path order so repeated runs see the same
/// sequence. A missing `.github/workflows/` directory or manifest is not
/// an error, only a missing project directory is.
pub fn discover(project_dir: &Path) -> Result<Vec<DiscoveredFile>> {
    if !project_dir.is_dir() {
        bail!("project directory not found: {}", project_dir.display());
    }

    let mut files = Vec::new();

    let workflows_dir = project_dir.join(".github").join("workflows");
    if workflows_dir.is_dir() {
        let mut paths: Vec<_> = std::fs::read_dir(&workflows_dir)
            .with_context(|| format!("reading {}", workflows_dir.display()))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                matches!(
                    path.extension().and_then(|ext| ext.to_str()),
                    Some("yml") | Some("yaml")
                )
            })
            .collect();
        paths.sort();

        for path in paths {
            files.push(read_file(&path, FileFormat::Workflow)?);
        }
    }

    let manifest_path = project_dir.join("composer.json");
    if manifest_path.is_file() {
        files.push(read_file(&manifest_path, FileFormat::Manifest)?);
    }

    for (name, tool) in TOOL_CONFIGS {
        let path = project_dir.join(name);
        if path.is_file() {
            files.push(read_file(
                &path,
                FileFormat::ToolConfig {
                    tool: (*tool).to_string(),
                },
            )?);
        }
    }

    debug!("discovered {} files in {}", files.len(), project_dir.display());
    Ok(files)
}

fn read_file(path: &Path, format: FileFormat) -> Result<DiscoveredFile> {
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    Ok(DiscoveredFile {
        path: path.to_path_buf(),
        format,
        bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn project_with(files: &[(&str, &str)]) -> TempDir {
        let dir = TempDir::new().expect("create temp dir");
        for (rel, contents) in files {
            let path = dir.path().join(rel);
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).expect("create parent dirs");
            }
            std::fs::write(&path, contents).expect("write fixture");
        }
        dir
    }

    #[test]
    fn missing_directory_is_an_error() {
        let err = discover(Path::new("/nonexistent/plint-test")).unwrap_err();
        assert!(err.to_string().contains("project directory not found"));
    }

    #[test]
    fn empty_project_discovers_nothing() {
        let dir = project_with(&[]);
        let files = discover(dir.path()).expect("discover");
        assert!(files.is_empty());
    }

    #[test]
    fn workflows_are_sorted_by_path() {
        let dir = project_with(&[
            (".github/workflows/b.yml", "jobs: {}"),
            (".github/workflows/a.yaml", "jobs: {}"),
            (".github/workflows/notes.txt", "ignored"),
        ]);

        let files = discover(dir.path()).expect("discover");
        let names: Vec<_> = files
            .iter()
            .map(|f| f.path.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, vec!["a.yaml", "b.yml"]);
        assert!(files.iter().all(|f| f.format == FileFormat::Workflow));
    }

    #[test]
    fn manifest_and_tool_configs_are_picked_up() {
        let dir = project_with(&[
            ("composer.json", "{}"),
            ("phpstan.neon.dist", "parameters: {}"),
        ]);

        let files = discover(dir.path()).expect("discover");
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].format, FileFormat::Manifest);
        assert_eq!(
            files[1].format,
            FileFormat::ToolConfig {
                tool: "phpstan".to_string()
            }
        );
    }
}
