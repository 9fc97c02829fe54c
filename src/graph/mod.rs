mod builder;
mod layout;
mod legend;
mod style;

pub use builder::{BuildOptions, build, build_with, criteria_node_id, group_id, process_node_id};
pub use layout::{Bounds, Layout, NodeBox, Point, layout};
pub use legend::{LegendElement, LegendEntry, legend, legend_json, legend_markdown};
pub use style::{
    ArrowShape, LineStyle, NodeShape, StyleRule, VisualStyle, resolve_edge_style,
    resolve_node_style, stylesheet,
};
