use crate::cli::{LegendArgs, OutputFormat};
use crate::graph::{legend_json, legend_markdown};
use crate::style;
use std::io;

pub fn cmd_legend(args: LegendArgs) -> i32 {
    let result = match args.format {
        OutputFormat::Markdown => style::render_markdown(&legend_markdown(), &mut io::stdout()),
        OutputFormat::Json => serde_json::to_string_pretty(&legend_json())
            .map(|json| println!("{}", json))
            .map_err(io::Error::from),
    };
    if let Err(e) = result {
        style::error(&format!("Failed to print legend: {}", e));
        return 1;
    }
    0
}
