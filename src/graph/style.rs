//! Static mapping from semantic classes to visual attributes.
//!
//! Resolution starts from the kind's base style and applies every recognised
//! class on top in a fixed precedence order, so the result does not depend on
//! the order classes appear in. A class list with nothing recognised resolves
//! to [`VisualStyle::fallback`].

use crate::model::class;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeShape {
    Ellipse,
    Rectangle,
    RoundRectangle,
    Diamond,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LineStyle {
    Solid,
    Dashed,
    Dotted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ArrowShape {
    None,
    Triangle,
    Vee,
}

/// Plain record of rendering attributes, shared by nodes and edges.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualStyle {
    pub fill_color: &'static str,
    pub border_color: &'static str,
    pub border_width: f64,
    pub shape: NodeShape,
    pub line_color: &'static str,
    pub line_style: LineStyle,
    pub line_width: f64,
    pub target_arrow: ArrowShape,
    pub opacity: f64,
}

impl VisualStyle {
    /// Gray fill, solid line, no arrow.
    pub const fn fallback() -> Self {
        Self {
            fill_color: "#9e9e9e",
            border_color: "#757575",
            border_width: 1.0,
            shape: NodeShape::Ellipse,
            line_color: "#9e9e9e",
            line_style: LineStyle::Solid,
            line_width: 1.0,
            target_arrow: ArrowShape::None,
            opacity: 1.0,
        }
    }
}

impl Default for VisualStyle {
    fn default() -> Self {
        Self::fallback()
    }
}

// Node classes in precedence order: later entries override earlier ones.
const NODE_RULES: &[(&str, fn(&mut VisualStyle))] = &[
    (class::NODE_STATE, |s| {
        s.fill_color = "#4a90d9";
        s.border_color = "#2c5d8f";
        s.shape = NodeShape::RoundRectangle;
    }),
    (class::NODE_PROCESS, |s| {
        s.fill_color = "#f5a623";
        s.border_color = "#b87a10";
        s.shape = NodeShape::Rectangle;
    }),
    (class::NODE_CRITERIA, |s| {
        s.fill_color = "#f8e71c";
        s.border_color = "#b8ab0e";
        s.shape = NodeShape::Diamond;
    }),
    (class::NODE_GROUP, |s| {
        s.fill_color = "#f4f6f8";
        s.border_color = "#c0c6cc";
        s.shape = NodeShape::RoundRectangle;
        s.line_style = LineStyle::Dashed;
        s.opacity = 0.6;
    }),
    (class::CURRENT_STATE, |s| {
        s.fill_color = "#7ed321";
        s.border_color = "#417505";
        s.border_width = 3.0;
    }),
    (class::SELECTED_START, |s| {
        s.border_color = "#d0021b";
        s.border_width = 4.0;
    }),
];

const EDGE_RULES: &[(&str, fn(&mut VisualStyle))] = &[
    (class::EDGE_TRANSITION, |s| {
        s.line_color = "#4a4a4a";
        s.line_width = 2.0;
        s.target_arrow = ArrowShape::Triangle;
    }),
    (class::EDGE_PROCESS, |s| {
        s.line_color = "#f5a623";
        s.line_style = LineStyle::Dotted;
        s.line_width = 1.5;
        s.target_arrow = ArrowShape::None;
    }),
    (class::EDGE_CRITERIA, |s| {
        s.line_color = "#b8ab0e";
    }),
    (class::EDGE_MANUAL, |s| {
        s.line_style = LineStyle::Dashed;
        s.target_arrow = ArrowShape::Vee;
    }),
    (class::HIDDEN_DETAIL, |s| {
        s.line_width = 3.0;
    }),
];

pub fn resolve_node_style<S: AsRef<str>>(classes: &[S]) -> VisualStyle {
    resolve(NODE_RULES, classes)
}

pub fn resolve_edge_style<S: AsRef<str>>(classes: &[S]) -> VisualStyle {
    resolve(EDGE_RULES, classes)
}

fn resolve<S: AsRef<str>>(rules: &[(&str, fn(&mut VisualStyle))], classes: &[S]) -> VisualStyle {
    let mut style = VisualStyle::fallback();
    for (name, apply) in rules {
        if classes.iter().any(|c| c.as_ref() == *name) {
            apply(&mut style);
        }
    }
    style
}

/// One stylesheet entry for renderers that match on class selectors.
#[derive(Debug, Clone, Serialize)]
pub struct StyleRule {
    pub selector: String,
    pub style: VisualStyle,
}

/// Per-class rules in precedence order, for renderers that cascade styles
/// themselves rather than resolving per element.
pub fn stylesheet() -> Vec<StyleRule> {
    let mut rules = vec![
        StyleRule {
            selector: "node".to_string(),
            style: VisualStyle::fallback(),
        },
        StyleRule {
            selector: "edge".to_string(),
            style: VisualStyle::fallback(),
        },
    ];
    for (name, _) in NODE_RULES {
        rules.push(StyleRule {
            selector: format!("node.{}", name),
            style: resolve_node_style(&[*name]),
        });
    }
    for (name, _) in EDGE_RULES {
        rules.push(StyleRule {
            selector: format!("edge.{}", name),
            style: resolve_edge_style(&[*name]),
        });
    }
    rules
}
