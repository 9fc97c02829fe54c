use crate::cli::GraphArgs;
use crate::fs::{FileSystem, default_fs};
use crate::style;
use crate::viewer::Viewer;
use std::path::Path;

use super::CommandContext;

pub fn cmd_graph(args: GraphArgs, config: Option<&Path>) -> i32 {
    let fs = default_fs();
    let ctx = match CommandContext::new(&args.view, config, fs) {
        Ok(ctx) => ctx,
        Err(code) => return code,
    };

    let port = args.port.unwrap_or(ctx.config.server.port);
    let mut viewer = Viewer::new(ctx.config);
    let model = viewer.render(&ctx.workflow, ctx.options);
    for warning in &model.warnings {
        style::warning(&format!("{} {}", style::warning_tag(warning), warning));
    }

    if args.serve {
        let rt = match tokio::runtime::Runtime::new() {
            Ok(rt) => rt,
            Err(e) => {
                style::error(&format!("Failed to start async runtime: {}", e));
                return 1;
            }
        };
        if let Err(e) = rt.block_on(crate::server::serve(viewer, port, args.open)) {
            style::error(&format!("Server failed: {}", e));
            return 1;
        }
    } else if let Some(export_path) = args.export {
        let html = crate::server::export_html(&viewer);
        if let Err(e) = fs.write(&export_path, &html) {
            style::error(&format!("Failed to write export file: {}", e));
            return 1;
        }
        style::success(&format!("Graph exported to: {}", style::path(&export_path)));
    } else {
        style::error(
            "Use --serve to start the visualization server, or --export to save static HTML",
        );
        return 1;
    }

    0
}
