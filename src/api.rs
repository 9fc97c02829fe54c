//! Library entry points for statemap.
//!
//! The CLI commands print and return exit codes; these functions return
//! `Result`s so a host application can load workflows and drive a
//! [`Viewer`] itself.
//!
//! # Example
//!
//! ```no_run
//! use statemap::{BuildOptions, build_with, load_workflow};
//! use std::path::Path;
//!
//! let workflow = load_workflow(Path::new("workflow.json"))?;
//! let model = build_with(&workflow, &BuildOptions::default().with_current_state("OPEN"));
//! println!("{} nodes, {} warnings", model.nodes.len(), model.warnings.len());
//! # Ok::<(), statemap::StatemapError>(())
//! ```

use crate::config::{Config, ConfigError};
use crate::fs::{FileSystem, default_fs};
use crate::graph::BuildOptions;
use crate::model::WorkflowGraph;
use crate::viewer::Viewer;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while loading workflows or configuration.
#[derive(Debug, Error)]
pub enum StatemapError {
    /// The specified path could not be found.
    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    /// IO error while reading or writing a file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The workflow payload is not valid JSON for a workflow graph.
    #[error("Invalid workflow JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// Configuration file error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Parse a workflow payload.
///
/// Missing collections default to empty, so `{}` is a valid (empty)
/// workflow. Referential problems such as dangling state ids are not
/// errors here; they surface as warnings when the graph is built.
///
/// # Example
///
/// ```
/// use statemap::parse_workflow;
///
/// let workflow = parse_workflow(r#"{"states": [{"id": "A", "name": "OPEN"}]}"#)?;
/// assert_eq!(workflow.states.len(), 1);
/// # Ok::<(), statemap::StatemapError>(())
/// ```
pub fn parse_workflow(json: &str) -> Result<WorkflowGraph, StatemapError> {
    Ok(serde_json::from_str(json)?)
}

/// Read and parse a workflow JSON file.
pub fn load_workflow(path: &Path) -> Result<WorkflowGraph, StatemapError> {
    load_workflow_with_fs(path, default_fs())
}

pub fn load_workflow_with_fs(
    path: &Path,
    fs: &dyn FileSystem,
) -> Result<WorkflowGraph, StatemapError> {
    if !fs.exists(path) {
        return Err(StatemapError::PathNotFound(path.to_path_buf()));
    }
    let content = fs.read_to_string(path)?;
    parse_workflow(&content)
}

/// Resolve configuration for a workflow.
///
/// An explicit file must exist. Otherwise `.statemap.toml` is looked up in
/// `search_dir`, and defaults apply when there is none.
pub fn load_config(explicit: Option<&Path>, search_dir: &Path) -> Result<Config, StatemapError> {
    match explicit {
        Some(path) if !path.exists() => Err(StatemapError::PathNotFound(path.to_path_buf())),
        Some(path) => Ok(Config::load_file(path)?),
        None => Ok(Config::load(search_dir)?),
    }
}

/// Render a workflow to a self-contained HTML page.
///
/// # Example
///
/// ```
/// use statemap::{BuildOptions, Config, parse_workflow, render_static_html};
///
/// let workflow = parse_workflow(r#"{"states": [{"id": "A", "name": "OPEN"}]}"#)?;
/// let html = render_static_html(&workflow, BuildOptions::default(), Config::default());
/// assert!(html.contains("OPEN"));
/// # Ok::<(), statemap::StatemapError>(())
/// ```
pub fn render_static_html(
    workflow: &WorkflowGraph,
    options: BuildOptions,
    config: Config,
) -> String {
    let mut viewer = Viewer::new(config);
    viewer.render(workflow, options);
    crate::server::export_html(&viewer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::mock::MockFs;

    #[test]
    fn test_parse_empty_object() {
        let workflow = parse_workflow("{}").unwrap();
        assert!(workflow.states.is_empty());
        assert!(workflow.transitions.is_empty());
    }

    #[test]
    fn test_parse_rejects_malformed_json() {
        assert!(matches!(
            parse_workflow("{\"states\": ["),
            Err(StatemapError::Parse(_))
        ));
    }

    #[test]
    fn test_load_with_mock_fs() {
        let fs = MockFs::with_files([(
            Path::new("/flows/order.json"),
            r#"{"states": [{"id": "A", "name": "NEW", "isCurrent": true}]}"#,
        )]);
        let workflow = load_workflow_with_fs(Path::new("/flows/order.json"), &fs).unwrap();
        assert!(workflow.states[0].is_current);
    }

    #[test]
    fn test_load_missing_file() {
        let fs = MockFs::new();
        let err = load_workflow_with_fs(Path::new("/nope.json"), &fs).unwrap_err();
        assert!(matches!(err, StatemapError::PathNotFound(_)));
    }

    #[test]
    fn test_explicit_config_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("custom.toml");
        assert!(matches!(
            load_config(Some(&missing), dir.path()),
            Err(StatemapError::PathNotFound(_))
        ));
        assert_eq!(load_config(None, dir.path()).unwrap(), Config::default());
    }
}
