pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod fs;
pub mod graph;
pub mod model;
pub mod server;
pub mod style;
pub mod telemetry;
pub mod viewer;

pub use api::{
    StatemapError, load_config, load_workflow, load_workflow_with_fs, parse_workflow,
    render_static_html,
};
pub use cli::Cli;
pub use commands::{cmd_check, cmd_graph, cmd_init, cmd_legend};
pub use config::Config;
pub use graph::{BuildOptions, build, build_with};
pub use model::{GraphModel, WorkflowGraph};
pub use viewer::{Viewer, ViewerEvent};
