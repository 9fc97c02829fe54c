//! Rendering adapter seam.
//!
//! The viewer hands a fully resolved [`Scene`] to a [`GraphRenderer`];
//! nothing upstream knows which drawing engine is on the other side.

use super::selection::SelectionPhase;
use super::viewport::ViewportState;
use crate::graph::{Point, VisualStyle, stylesheet};
use crate::model::{GraphEdge, GraphNode, Warning};
use serde::Serialize;
use serde_json::{Map, Value, json};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneNode {
    #[serde(flatten)]
    pub node: GraphNode,
    pub position: Option<Point>,
    pub width: f64,
    pub height: f64,
    pub style: VisualStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneEdge {
    #[serde(flatten)]
    pub edge: GraphEdge,
    pub style: VisualStyle,
}

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    pub nodes: Vec<SceneNode>,
    pub edges: Vec<SceneEdge>,
    pub viewport: ViewportState,
    pub viewport_size: (f64, f64),
    pub selection: SelectionPhase,
    pub highlighted: Option<String>,
    pub warnings: Vec<Warning>,
}

pub trait GraphRenderer {
    type Output;

    fn render_graph(&mut self, scene: &Scene) -> Self::Output;
}

/// Produces the JSON document the Cytoscape host page consumes.
#[derive(Debug, Clone, Copy, Default)]
pub struct CytoscapeRenderer;

impl GraphRenderer for CytoscapeRenderer {
    type Output = Value;

    fn render_graph(&mut self, scene: &Scene) -> Value {
        let nodes: Vec<Value> = scene
            .nodes
            .iter()
            .map(|n| {
                let mut data = Map::new();
                data.insert("id".into(), json!(n.node.id));
                data.insert("label".into(), json!(n.node.label));
                data.insert("kind".into(), json!(n.node.kind));
                data.insert("width".into(), json!(n.width));
                data.insert("height".into(), json!(n.height));
                if let Some(parent) = &n.node.parent {
                    data.insert("parent".into(), json!(parent));
                }
                let mut element = json!({
                    "group": "nodes",
                    "data": data,
                    "classes": n.node.classes.join(" "),
                });
                if let Some(position) = n.position {
                    element["position"] = json!({ "x": position.x, "y": position.y });
                }
                element
            })
            .collect();

        let edges: Vec<Value> = scene
            .edges
            .iter()
            .map(|e| {
                json!({
                    "group": "edges",
                    "data": {
                        "id": e.edge.id,
                        "source": e.edge.source,
                        "target": e.edge.target,
                        "label": e.edge.label.clone().unwrap_or_default(),
                    },
                    "classes": e.edge.classes.join(" "),
                })
            })
            .collect();

        let mut style = vec![
            json!({
                "selector": "node",
                "style": {
                    "label": "data(label)",
                    "width": "data(width)",
                    "height": "data(height)",
                    "text-valign": "center",
                    "font-size": 11,
                }
            }),
            json!({
                "selector": "edge",
                "style": {
                    "label": "data(label)",
                    "curve-style": "bezier",
                    "font-size": 10,
                }
            }),
        ];
        for rule in stylesheet() {
            let is_edge = rule.selector.starts_with("edge");
            style.push(json!({
                "selector": rule.selector,
                "style": cytoscape_style(&rule.style, is_edge),
            }));
        }

        // Cytoscape pans by a rendered offset of the model origin.
        let (width, height) = scene.viewport_size;
        let zoom = scene.viewport.zoom;
        let pan = Point::new(
            width / 2.0 - scene.viewport.pan.x * zoom,
            height / 2.0 - scene.viewport.pan.y * zoom,
        );

        json!({
            "elements": { "nodes": nodes, "edges": edges },
            "style": style,
            "zoom": zoom,
            "pan": pan,
            "selection": scene.selection,
            "highlighted": scene.highlighted,
            "warnings": scene.warnings,
        })
    }
}

fn cytoscape_style(style: &VisualStyle, is_edge: bool) -> Value {
    if is_edge {
        json!({
            "line-color": style.line_color,
            "line-style": style.line_style,
            "width": style.line_width,
            "target-arrow-shape": style.target_arrow,
            "target-arrow-color": style.line_color,
            "opacity": style.opacity,
        })
    } else {
        json!({
            "background-color": style.fill_color,
            "border-color": style.border_color,
            "border-width": style.border_width,
            "border-style": style.line_style,
            "shape": style.shape,
            "opacity": style.opacity,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{NodeKind, class};

    fn scene() -> Scene {
        Scene {
            nodes: vec![SceneNode {
                node: GraphNode {
                    id: "a".to_string(),
                    kind: NodeKind::State,
                    label: "A".to_string(),
                    classes: vec![class::NODE_STATE.to_string(), class::CURRENT_STATE.to_string()],
                    parent: None,
                    transition_id: None,
                },
                position: Some(Point::new(10.0, 20.0)),
                width: 100.0,
                height: 40.0,
                style: VisualStyle::fallback(),
            }],
            edges: Vec::new(),
            viewport: ViewportState {
                zoom: 2.0,
                pan: Point::new(10.0, 20.0),
            },
            viewport_size: (800.0, 600.0),
            selection: SelectionPhase::Disarmed,
            highlighted: None,
            warnings: Vec::new(),
        }
    }

    #[test]
    fn test_cytoscape_elements() {
        let doc = CytoscapeRenderer.render_graph(&scene());
        let node = &doc["elements"]["nodes"][0];
        assert_eq!(node["data"]["id"], "a");
        assert_eq!(node["classes"], "node-state current-state");
        assert_eq!(node["position"]["x"], 10.0);
        assert!(node["data"].get("parent").is_none());
    }

    #[test]
    fn test_cytoscape_pan_centres_viewport_point() {
        let doc = CytoscapeRenderer.render_graph(&scene());
        // Model point (10, 20) must land in the middle of the 800x600 view.
        assert_eq!(doc["pan"]["x"], 380.0);
        assert_eq!(doc["pan"]["y"], 260.0);
        assert_eq!(doc["zoom"], 2.0);
    }

    #[test]
    fn test_cytoscape_stylesheet_uses_kebab_values() {
        let doc = CytoscapeRenderer.render_graph(&scene());
        let rules = doc["style"].as_array().unwrap();
        let manual = rules
            .iter()
            .find(|r| r["selector"] == "edge.edge-manual")
            .unwrap();
        assert_eq!(manual["style"]["line-style"], "dashed");
        let state = rules
            .iter()
            .find(|r| r["selector"] == "node.node-state")
            .unwrap();
        assert_eq!(state["style"]["shape"], "round-rectangle");
    }
}
