//! The viewer as seen by its host.
//!
//! A [`Viewer`] owns the derived model, the viewport and the transition
//! draft for one graph view. Data comes in through [`Viewer::render`];
//! everything the host may care about goes out as [`ViewerEvent`]s to the
//! registered listeners. The viewer never talks to the backend itself.

use super::render::{GraphRenderer, Scene, SceneEdge, SceneNode};
use super::selection::{SelectionController, SelectionOutcome, SelectionPhase, TransitionDraft};
use super::viewport::{PanDirection, Viewport, ViewportPhase, ViewportState};
use crate::config::Config;
use crate::graph::{
    BuildOptions, Layout, build_with, layout, resolve_edge_style, resolve_node_style,
};
use crate::model::{GraphModel, NodeKind, WorkflowGraph, class};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ViewerEvent {
    NodeClicked {
        node_id: String,
        kind: NodeKind,
    },
    TransitionCreateRequested {
        start_node_id: String,
        end_node_id: String,
    },
    ViewportChanged(ViewportState),
}

pub type Listener = Box<dyn FnMut(&ViewerEvent) + Send>;

pub struct Viewer {
    config: Config,
    graph: Option<WorkflowGraph>,
    options: BuildOptions,
    model: GraphModel,
    layout: Layout,
    viewport: Viewport,
    selection: SelectionController,
    listeners: Vec<Listener>,
}

impl Viewer {
    pub fn new(config: Config) -> Self {
        Self {
            viewport: Viewport::new(config.viewport),
            config,
            graph: None,
            options: BuildOptions::default(),
            model: GraphModel::default(),
            layout: Layout::default(),
            selection: SelectionController::new(),
            listeners: Vec::new(),
        }
    }

    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: FnMut(&ViewerEvent) + Send + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    /// Load a graph, replacing whatever was shown before.
    ///
    /// Any armed draft is dropped without an event, and the viewport is
    /// reset and fitted to the new graph.
    pub fn render(&mut self, graph: &WorkflowGraph, options: BuildOptions) -> &GraphModel {
        self.graph = Some(graph.clone());
        self.options = options;
        self.selection.cancel();
        self.rebuild();
        self.viewport.load(self.layout.bounds());
        tracing::info!(
            nodes = self.model.nodes.len(),
            edges = self.model.edges.len(),
            warnings = self.model.warnings.len(),
            "workflow graph loaded"
        );
        self.emit_viewport();
        &self.model
    }

    /// Collapse or expand the criteria and processes of one transition.
    ///
    /// Zoom and pan stay where they are; the next `fit` uses the new shape.
    pub fn toggle_detail(&mut self, transition_id: &str) -> bool {
        if self.graph.is_none() {
            return false;
        }
        if !self.options.hidden_transitions.remove(transition_id) {
            self.options
                .hidden_transitions
                .insert(transition_id.to_string());
        }
        self.rebuild();
        self.viewport.set_bounds(self.layout.bounds());
        true
    }

    fn rebuild(&mut self) {
        let Some(graph) = &self.graph else {
            return;
        };
        self.model = build_with(graph, &self.options);
        self.layout = layout(&self.model, &self.config.layout);
    }

    pub fn model(&self) -> &GraphModel {
        &self.model
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn viewport(&self) -> ViewportState {
        self.viewport.state()
    }

    pub fn viewport_phase(&self) -> ViewportPhase {
        self.viewport.phase()
    }

    pub fn selection_phase(&self) -> SelectionPhase {
        self.selection.phase()
    }

    pub fn draft(&self) -> Option<&TransitionDraft> {
        self.selection.draft()
    }

    pub fn hidden_transitions(&self) -> impl Iterator<Item = &str> {
        self.options.hidden_transitions.iter().map(String::as_str)
    }

    pub fn zoom_in(&mut self) -> bool {
        let changed = self.viewport.zoom_in();
        self.viewport_update(changed)
    }

    pub fn zoom_out(&mut self) -> bool {
        let changed = self.viewport.zoom_out();
        self.viewport_update(changed)
    }

    pub fn pan(&mut self, direction: PanDirection) -> bool {
        let changed = self.viewport.pan(direction);
        self.viewport_update(changed)
    }

    pub fn fit(&mut self) -> bool {
        let changed = self.viewport.fit();
        self.viewport_update(changed)
    }

    pub fn arm(&mut self) {
        self.selection.arm();
    }

    pub fn cancel(&mut self) -> bool {
        self.selection.cancel()
    }

    /// Handle a click on a node. Unknown ids are ignored and return `None`.
    pub fn click_node(&mut self, node_id: &str) -> Option<SelectionOutcome> {
        let kind = self.model.node(node_id)?.kind;
        self.emit(ViewerEvent::NodeClicked {
            node_id: node_id.to_string(),
            kind,
        });

        let outcome = self.selection.click(node_id, kind);
        if let SelectionOutcome::Completed(request) = &outcome {
            self.emit(ViewerEvent::TransitionCreateRequested {
                start_node_id: request.start_node_id.clone(),
                end_node_id: request.end_node_id.clone(),
            });
        }
        Some(outcome)
    }

    /// Resolve styles and positions for the current frame.
    pub fn scene(&self) -> Scene {
        let highlighted = self.selection.highlighted();
        let nodes = self
            .model
            .nodes
            .iter()
            .map(|node| {
                let mut node = node.clone();
                if highlighted == Some(node.id.as_str()) {
                    node.classes.push(class::SELECTED_START.to_string());
                }
                let placed = self.layout.get(&node.id);
                SceneNode {
                    style: resolve_node_style(&node.classes),
                    position: placed.map(|b| b.center),
                    width: placed.map_or(0.0, |b| b.width),
                    height: placed.map_or(0.0, |b| b.height),
                    node,
                }
            })
            .collect();
        let edges = self
            .model
            .edges
            .iter()
            .map(|edge| SceneEdge {
                style: resolve_edge_style(&edge.classes),
                edge: edge.clone(),
            })
            .collect();

        Scene {
            nodes,
            edges,
            viewport: self.viewport.state(),
            viewport_size: self.viewport.size(),
            selection: self.selection.phase(),
            highlighted: highlighted.map(str::to_string),
            warnings: self.model.warnings.clone(),
        }
    }

    pub fn render_with<R: GraphRenderer>(&self, renderer: &mut R) -> R::Output {
        renderer.render_graph(&self.scene())
    }

    fn viewport_update(&mut self, changed: bool) -> bool {
        if changed {
            self.emit_viewport();
        }
        changed
    }

    fn emit_viewport(&mut self) {
        self.emit(ViewerEvent::ViewportChanged(self.viewport.state()));
    }

    fn emit(&mut self, event: ViewerEvent) {
        for listener in &mut self.listeners {
            listener(&event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Criterion, Process, State, Transition};
    use crate::viewer::SelectionPhase;
    use std::sync::{Arc, Mutex};

    fn workflow() -> WorkflowGraph {
        WorkflowGraph {
            states: vec![
                State::new("A", "OPEN").current(),
                State::new("B", "REVIEW"),
                State::new("C", "CLOSED"),
            ],
            transitions: vec![
                Transition::new("t1", "submit", "A", "B"),
                Transition::new("t2", "close", "B", "C").with_criteria(["c1"]),
            ],
            processes: vec![Process::new("p1", "archive", "t2")],
            criteria: vec![Criterion::new("c1", "approved")],
        }
    }

    fn recording_viewer() -> (Viewer, Arc<Mutex<Vec<ViewerEvent>>>) {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        let mut viewer = Viewer::new(Config::default());
        viewer.subscribe(move |e| sink.lock().unwrap().push(e.clone()));
        (viewer, events)
    }

    fn transition_requests(events: &Mutex<Vec<ViewerEvent>>) -> Vec<ViewerEvent> {
        events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| matches!(e, ViewerEvent::TransitionCreateRequested { .. }))
            .cloned()
            .collect()
    }

    #[test]
    fn test_render_fits_and_reports_viewport() {
        let (mut viewer, events) = recording_viewer();
        assert_eq!(viewer.viewport_phase(), ViewportPhase::Idle);

        viewer.render(&workflow(), BuildOptions::default());
        assert_eq!(viewer.viewport_phase(), ViewportPhase::Ready);
        assert_eq!(
            events.lock().unwrap().as_slice(),
            &[ViewerEvent::ViewportChanged(viewer.viewport())]
        );
    }

    #[test]
    fn test_viewport_ops_before_load_emit_nothing() {
        let (mut viewer, events) = recording_viewer();
        assert!(!viewer.zoom_in());
        assert!(!viewer.pan(PanDirection::Left));
        assert!(!viewer.fit());
        assert!(events.lock().unwrap().is_empty());
    }

    #[test]
    fn test_transition_request_flow() {
        let (mut viewer, events) = recording_viewer();
        viewer.render(&workflow(), BuildOptions::default());
        events.lock().unwrap().clear();

        viewer.arm();
        viewer.click_node("A");
        assert!(transition_requests(&events).is_empty());
        assert_eq!(viewer.draft().and_then(|d| d.start_node_id.as_deref()), Some("A"));

        viewer.click_node("C");
        assert_eq!(
            transition_requests(&events),
            vec![ViewerEvent::TransitionCreateRequested {
                start_node_id: "A".to_string(),
                end_node_id: "C".to_string(),
            }]
        );
        assert_eq!(viewer.selection_phase(), SelectionPhase::Disarmed);
        assert!(viewer.draft().is_none());

        let clicks = events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| matches!(e, ViewerEvent::NodeClicked { .. }))
            .count();
        assert_eq!(clicks, 2);
    }

    #[test]
    fn test_process_click_while_armed_is_ignored() {
        let (mut viewer, events) = recording_viewer();
        viewer.render(&workflow(), BuildOptions::default());
        viewer.arm();

        let outcome = viewer.click_node("t2::process::p1");
        assert_eq!(outcome, Some(SelectionOutcome::Ignored));
        assert_eq!(viewer.selection_phase(), SelectionPhase::ArmedWaitingStart);
        assert!(transition_requests(&events).is_empty());
    }

    #[test]
    fn test_unknown_node_click_is_ignored() {
        let (mut viewer, events) = recording_viewer();
        viewer.render(&workflow(), BuildOptions::default());
        events.lock().unwrap().clear();
        assert_eq!(viewer.click_node("nope"), None);
        assert!(events.lock().unwrap().is_empty());
    }

    #[test]
    fn test_highlight_start_node_in_scene() {
        let (mut viewer, _) = recording_viewer();
        viewer.render(&workflow(), BuildOptions::default());
        viewer.arm();
        viewer.click_node("B");

        let scene = viewer.scene();
        let b = scene.nodes.iter().find(|n| n.node.id == "B").unwrap();
        assert!(b.node.has_class(class::SELECTED_START));
        assert_eq!(scene.highlighted.as_deref(), Some("B"));

        viewer.cancel();
        let scene = viewer.scene();
        assert!(scene.nodes.iter().all(|n| !n.node.has_class(class::SELECTED_START)));
    }

    #[test]
    fn test_reload_clears_draft_and_resets_viewport() {
        let (mut viewer, _) = recording_viewer();
        viewer.render(&workflow(), BuildOptions::default());
        let fitted = viewer.viewport();
        viewer.zoom_in();
        viewer.arm();
        viewer.click_node("A");

        viewer.render(&workflow(), BuildOptions::default());
        assert_eq!(viewer.selection_phase(), SelectionPhase::Disarmed);
        assert_eq!(viewer.viewport(), fitted);
    }

    #[test]
    fn test_viewport_changed_only_when_state_moves() {
        let (mut viewer, events) = recording_viewer();
        viewer.render(&workflow(), BuildOptions::default());
        events.lock().unwrap().clear();

        assert!(viewer.zoom_in());
        assert!(viewer.fit());
        let before = events.lock().unwrap().len();
        assert!(!viewer.fit());
        assert_eq!(events.lock().unwrap().len(), before);
    }

    #[test]
    fn test_toggle_detail_collapses_transition() {
        let (mut viewer, _) = recording_viewer();
        viewer.render(&workflow(), BuildOptions::default());
        let zoom = viewer.viewport().zoom;
        assert!(viewer.model().node("t2::criteria::c1").is_some());

        assert!(viewer.toggle_detail("t2"));
        assert!(viewer.model().node("t2::criteria::c1").is_none());
        assert!(viewer.model().edge("t2").is_some());
        assert_eq!(viewer.hidden_transitions().collect::<Vec<_>>(), vec!["t2"]);
        assert_eq!(viewer.viewport().zoom, zoom);

        assert!(viewer.toggle_detail("t2"));
        assert!(viewer.model().node("t2::criteria::c1").is_some());
    }

    #[test]
    fn test_event_json_shape() {
        let event = ViewerEvent::TransitionCreateRequested {
            start_node_id: "A".to_string(),
            end_node_id: "B".to_string(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "transitionCreateRequested");
        assert_eq!(json["startNodeId"], "A");
        assert_eq!(json["endNodeId"], "B");

        let json = serde_json::to_value(ViewerEvent::ViewportChanged(ViewportState::default()))
            .unwrap();
        assert_eq!(json["type"], "viewportChanged");
        assert_eq!(json["zoom"], 1.0);
    }

    #[test]
    fn test_viewport_event_reads_back_from_json() {
        let mut viewer = Viewer::new(Config::default());
        viewer.render(&workflow(), BuildOptions::default());
        viewer.pan(PanDirection::Down);
        let event = ViewerEvent::ViewportChanged(viewer.viewport());

        let json = serde_json::to_string(&event).unwrap();
        let parsed: ViewerEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, event);
    }
}
