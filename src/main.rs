use clap::Parser;
use statemap::cli::{Cli, Command};
use statemap::telemetry::init_tracing;
use statemap::{cmd_check, cmd_graph, cmd_init, cmd_legend};

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = cli.config.as_deref();
    let exit_code = match cli.command {
        Command::Check(args) => cmd_check(args, config),
        Command::Graph(args) => cmd_graph(args, config),
        Command::Legend(args) => cmd_legend(args),
        Command::Init(args) => cmd_init(args),
    };

    std::process::exit(exit_code);
}
