mod check;
mod graph;
mod init;
mod legend;

pub use check::{check_report, cmd_check};
pub use graph::cmd_graph;
pub use init::{cmd_init, cmd_init_with_fs};
pub use legend::cmd_legend;

use crate::api::{StatemapError, load_config, load_workflow_with_fs};
use crate::cli::ViewArgs;
use crate::config::Config;
use crate::fs::FileSystem;
use crate::graph::BuildOptions;
use crate::model::WorkflowGraph;
use crate::style;
use std::path::{Path, PathBuf};

/// Shared context for commands that render a workflow.
pub struct CommandContext {
    pub path: PathBuf,
    pub config: Config,
    pub workflow: WorkflowGraph,
    pub options: BuildOptions,
}

impl CommandContext {
    /// Load the workflow and its configuration.
    /// Returns Err(exit_code) if setup fails.
    pub fn new(
        args: &ViewArgs,
        config_path: Option<&Path>,
        fs: &dyn FileSystem,
    ) -> Result<Self, i32> {
        let workflow = match load_workflow_with_fs(&args.file, fs) {
            Ok(workflow) => workflow,
            Err(StatemapError::PathNotFound(p)) => {
                style::error(&format!("Workflow file not found: {}", style::path(&p)));
                return Err(1);
            }
            Err(e) => {
                style::error(&format!(
                    "Could not load {}: {}",
                    style::path(&args.file),
                    e
                ));
                return Err(1);
            }
        };

        let search_dir = args
            .file
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        let config = match load_config(config_path, search_dir) {
            Ok(config) => config,
            Err(e) if config_path.is_some() => {
                style::error(&format!("Failed to load config: {}", e));
                return Err(1);
            }
            Err(e) => {
                style::warning(&format!("Failed to load config: {}. Using defaults.", e));
                Config::default()
            }
        };

        Ok(Self {
            path: args.file.clone(),
            config,
            workflow,
            options: build_options(args),
        })
    }
}

fn build_options(args: &ViewArgs) -> BuildOptions {
    let mut options = BuildOptions::default();
    if let Some(current) = &args.current {
        options = options.with_current_state(current.as_str());
    }
    args.hide
        .iter()
        .fold(options, |options, id| options.hide_transition(id.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::mock::MockFs;

    #[test]
    fn test_context_applies_view_args() {
        let fs = MockFs::with_files([(Path::new("/flows/a.json"), r#"{"states": []}"#)]);
        let args = ViewArgs {
            file: PathBuf::from("/flows/a.json"),
            current: Some("B".to_string()),
            hide: vec!["t1".to_string()],
        };
        let ctx = CommandContext::new(&args, None, &fs).unwrap();
        assert_eq!(ctx.options.initial_current_state_id.as_deref(), Some("B"));
        assert!(ctx.options.hidden_transitions.contains("t1"));
    }

    #[test]
    fn test_context_missing_workflow() {
        let fs = MockFs::new();
        let args = ViewArgs {
            file: PathBuf::from("/flows/missing.json"),
            ..ViewArgs::default()
        };
        assert_eq!(CommandContext::new(&args, None, &fs).err(), Some(1));
    }
}
