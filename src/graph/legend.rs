use super::style::{VisualStyle, resolve_edge_style, resolve_node_style};
use crate::model::class;
use serde::Serialize;
use serde_json::{Value, json};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LegendElement {
    Node,
    Edge,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct LegendEntry {
    pub element: LegendElement,
    pub classes: &'static [&'static str],
    pub caption: &'static str,
}

const ENTRIES: &[LegendEntry] = &[
    LegendEntry {
        element: LegendElement::Node,
        classes: &[class::NODE_STATE],
        caption: "State",
    },
    LegendEntry {
        element: LegendElement::Edge,
        classes: &[class::EDGE_TRANSITION],
        caption: "Automated Transition",
    },
    LegendEntry {
        element: LegendElement::Edge,
        classes: &[class::EDGE_TRANSITION, class::EDGE_MANUAL],
        caption: "Manual Transition",
    },
    LegendEntry {
        element: LegendElement::Edge,
        classes: &[class::EDGE_TRANSITION, class::EDGE_CRITERIA],
        caption: "Transition with Criteria",
    },
    LegendEntry {
        element: LegendElement::Node,
        classes: &[class::NODE_PROCESS],
        caption: "Process",
    },
];

pub fn legend() -> &'static [LegendEntry] {
    ENTRIES
}

impl LegendEntry {
    pub fn style(&self) -> VisualStyle {
        match self.element {
            LegendElement::Node => resolve_node_style(self.classes),
            LegendElement::Edge => resolve_edge_style(self.classes),
        }
    }
}

/// Legend entries with their resolved styles, as served to the host page.
pub fn legend_json() -> Value {
    legend()
        .iter()
        .map(|entry| {
            json!({
                "element": entry.element,
                "classes": entry.classes,
                "caption": entry.caption,
                "style": entry.style(),
            })
        })
        .collect()
}

pub fn legend_markdown() -> String {
    let mut out = String::from("## Legend\n\n| Symbol | Meaning |\n|---|---|\n");
    for entry in legend() {
        let style = entry.style();
        let symbol = match entry.element {
            LegendElement::Node => format!("{:?} `{}`", style.shape, style.fill_color),
            LegendElement::Edge => format!("{:?} line `{}`", style.line_style, style.line_color),
        };
        out.push_str(&format!("| {} | {} |\n", symbol, entry.caption));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legend_captions() {
        let captions: Vec<_> = legend().iter().map(|e| e.caption).collect();
        assert_eq!(
            captions,
            vec![
                "State",
                "Automated Transition",
                "Manual Transition",
                "Transition with Criteria",
                "Process"
            ]
        );
    }

    #[test]
    fn test_legend_uses_resolver_vocabulary() {
        for entry in legend() {
            assert_ne!(entry.style(), VisualStyle::fallback(), "{}", entry.caption);
        }
    }

    #[test]
    fn test_legend_json_carries_styles() {
        let json = legend_json();
        assert_eq!(json[2]["caption"], "Manual Transition");
        assert_eq!(json[2]["element"], "edge");
        assert_eq!(json[2]["style"]["lineStyle"], "dashed");
    }

    #[test]
    fn test_legend_markdown_lists_entries() {
        let md = legend_markdown();
        assert!(md.contains("| Manual Transition |"));
        let rows = md
            .lines()
            .filter(|l| l.starts_with("| ") && !l.starts_with("| Symbol"))
            .count();
        assert_eq!(rows, 5);
    }
}
