use crate::cli::{CheckArgs, OutputFormat};
use crate::fs::{FileSystem, default_fs};
use crate::graph::build_with;
use crate::model::{GraphModel, NodeKind, class};
use crate::style;
use serde_json::json;
use std::collections::BTreeSet;
use std::io;
use std::path::Path;

use super::CommandContext;

pub fn cmd_check(args: CheckArgs, config: Option<&Path>) -> i32 {
    let fs = default_fs();
    let ctx = match CommandContext::new(&args.view, config, fs) {
        Ok(ctx) => ctx,
        Err(code) => return code,
    };

    let model = build_with(&ctx.workflow, &ctx.options);
    let report = check_report(&ctx.path, &model, args.format);

    let written = match &args.output {
        Some(output) => fs.write(output, &report),
        None if args.format == OutputFormat::Markdown => {
            style::render_markdown(&report, &mut io::stdout())
        }
        None => {
            println!("{}", report);
            Ok(())
        }
    };
    if let Err(e) = written {
        style::error(&format!("Failed to write report: {}", e));
        return 1;
    }
    if let Some(output) = &args.output {
        style::success(&format!("Report written to: {}", style::path(output)));
    }

    if args.strict && !model.warnings.is_empty() {
        for warning in &model.warnings {
            style::warning(&format!("{} {}", style::warning_tag(warning), warning));
        }
        style::error(&format!("{} warning(s) in strict mode", model.warnings.len()));
        return 1;
    }
    0
}

fn transition_count(model: &GraphModel) -> usize {
    model
        .edges
        .iter()
        .filter(|e| e.has_class(class::EDGE_TRANSITION))
        .filter_map(|e| e.transition_id.as_deref())
        .collect::<BTreeSet<_>>()
        .len()
}

/// Summary of a built workflow graph in markdown or JSON.
pub fn check_report(path: &Path, model: &GraphModel, format: OutputFormat) -> String {
    let current = model.current_state();
    match format {
        OutputFormat::Json => {
            let report = json!({
                "file": path.display().to_string(),
                "counts": {
                    "states": model.count(NodeKind::State),
                    "transitions": transition_count(model),
                    "criteria": model.count(NodeKind::Criteria),
                    "processes": model.count(NodeKind::Process),
                    "nodes": model.nodes.len(),
                    "edges": model.edges.len(),
                },
                "currentState": current.map(|n| n.id.as_str()),
                "warnings": model.warnings,
            });
            serde_json::to_string_pretty(&report).unwrap_or_default()
        }
        OutputFormat::Markdown => {
            let mut out = format!("# Workflow: {}\n\n", path.display());
            out.push_str("| Element | Count |\n|---|---|\n");
            let rows = [
                ("States", model.count(NodeKind::State)),
                ("Transitions", transition_count(model)),
                ("Criteria", model.count(NodeKind::Criteria)),
                ("Processes", model.count(NodeKind::Process)),
                ("Edges", model.edges.len()),
            ];
            for (label, count) in rows {
                out.push_str(&format!("| {} | {} |\n", label, count));
            }

            match current {
                Some(node) => out.push_str(&format!(
                    "\nCurrent state: **{}** (`{}`)\n",
                    node.label, node.id
                )),
                None => out.push_str("\nCurrent state: *none*\n"),
            }

            out.push_str(&format!("\n## Warnings ({})\n\n", model.warnings.len()));
            if model.warnings.is_empty() {
                out.push_str("No warnings.\n");
            }
            for warning in &model.warnings {
                out.push_str(&format!("- `{}` {}\n", warning.kind.as_str(), warning.message));
            }
            out
        }
    }
}
