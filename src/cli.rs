use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "statemap")]
#[command(about = "Render workflow state machines as interactive graphs")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Configuration file (defaults to .statemap.toml next to the workflow)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Validate a workflow and report the derived graph
    Check(CheckArgs),

    /// Serve or export the interactive workflow map
    Graph(GraphArgs),

    /// Print the graph legend
    Legend(LegendArgs),

    /// Generate a starter .statemap.toml configuration file
    Init(InitArgs),
}

/// Options shared by every command that builds a graph.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct ViewArgs {
    /// Workflow JSON file
    pub file: PathBuf,

    /// State to mark as current, overriding the isCurrent flags
    #[arg(long)]
    pub current: Option<String>,

    /// Transitions to collapse (comma-separated ids)
    #[arg(long, value_delimiter = ',')]
    pub hide: Vec<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct CheckArgs {
    #[command(flatten)]
    pub view: ViewArgs,

    /// Output format
    #[arg(short, long, default_value = "markdown")]
    pub format: OutputFormat,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Exit with an error when the workflow produced warnings
    #[arg(long)]
    pub strict: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct GraphArgs {
    #[command(flatten)]
    pub view: ViewArgs,

    /// Start HTTP server for interactive visualization
    #[arg(long)]
    pub serve: bool,

    /// Port for HTTP server (defaults to the configured port)
    #[arg(long)]
    pub port: Option<u16>,

    /// Open browser automatically
    #[arg(long)]
    pub open: bool,

    /// Export graph as static HTML file instead of serving
    #[arg(long)]
    pub export: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
pub struct LegendArgs {
    /// Output format
    #[arg(short, long, default_value = "markdown")]
    pub format: OutputFormat,
}

#[derive(Parser, Debug, Clone)]
pub struct InitArgs {
    /// Directory where to create .statemap.toml (defaults to current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Markdown,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_check_with_globals() {
        let cli = Cli::parse_from([
            "statemap", "check", "flow.json", "--hide", "t1,t2", "--strict", "--config", "c.toml",
        ]);
        assert_eq!(cli.config, Some(PathBuf::from("c.toml")));
        let Command::Check(args) = cli.command else {
            panic!("expected check");
        };
        assert_eq!(args.view.hide, vec!["t1", "t2"]);
        assert!(args.strict);
        assert_eq!(args.format, OutputFormat::Markdown);
    }

    #[test]
    fn test_parse_graph_export() {
        let cli = Cli::parse_from([
            "statemap", "graph", "flow.json", "--export", "out.html", "--current", "A",
        ]);
        let Command::Graph(args) = cli.command else {
            panic!("expected graph");
        };
        assert_eq!(args.export, Some(PathBuf::from("out.html")));
        assert_eq!(args.view.current.as_deref(), Some("A"));
        assert_eq!(args.port, None);
    }
}
