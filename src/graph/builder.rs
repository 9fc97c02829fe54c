//! Converts a workflow payload into the node/edge view model.
//!
//! The builder is pure: the same [`WorkflowGraph`] and [`BuildOptions`]
//! always produce the same [`GraphModel`], with nodes and edges in source
//! array order (states, then per-transition detail, then processes).
//! Malformed elements are excluded and reported as [`Warning`]s.

use crate::model::{
    Criterion, GraphEdge, GraphModel, GraphNode, NodeKind, Process, Transition, Warning,
    WorkflowGraph, class,
};
use std::collections::{BTreeSet, HashMap, HashSet};

#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Overrides the `isCurrent` flags when it names a known state.
    pub initial_current_state_id: Option<String>,
    /// Transitions whose criteria and processes are collapsed into one edge.
    pub hidden_transitions: BTreeSet<String>,
}

impl BuildOptions {
    pub fn with_current_state(mut self, id: impl Into<String>) -> Self {
        self.initial_current_state_id = Some(id.into());
        self
    }

    pub fn hide_transition(mut self, id: impl Into<String>) -> Self {
        self.hidden_transitions.insert(id.into());
        self
    }
}

pub fn group_id(transition_id: &str) -> String {
    format!("{}::group", transition_id)
}

pub fn criteria_node_id(transition_id: &str, criterion_id: &str) -> String {
    format!("{}::criteria::{}", transition_id, criterion_id)
}

pub fn process_node_id(transition_id: &str, process_id: &str) -> String {
    format!("{}::process::{}", transition_id, process_id)
}

pub fn build(graph: &WorkflowGraph) -> GraphModel {
    build_with(graph, &BuildOptions::default())
}

pub fn build_with(graph: &WorkflowGraph, options: &BuildOptions) -> GraphModel {
    let mut builder = ModelBuilder::default();

    let state_ids = builder.add_states(graph, options);
    let criteria = builder.index_criteria(&graph.criteria);
    let transitions = builder.validate_transitions(&graph.transitions, &state_ids);
    let processes = builder.validate_processes(&graph.processes, &transitions, options);

    let with_processes: HashSet<&str> = processes
        .iter()
        .filter_map(|p| p.transition_id.as_deref())
        .collect();

    let mut anchors: HashMap<&str, String> = HashMap::new();
    for transition in &transitions {
        if options.hidden_transitions.contains(&transition.id) {
            builder.add_collapsed_transition(transition);
            continue;
        }
        let has_processes = with_processes.contains(transition.id.as_str());
        let anchor = builder.add_transition(transition, &criteria, has_processes);
        anchors.insert(transition.id.as_str(), anchor);
    }

    for process in processes {
        let Some(transition_id) = process.transition_id.as_deref() else {
            continue;
        };
        if let Some(anchor) = anchors.get(transition_id) {
            builder.add_process(process, transition_id, anchor);
        }
    }

    builder.finish()
}

#[derive(Default)]
struct ModelBuilder {
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
    warnings: Vec<Warning>,
}

impl ModelBuilder {
    fn warn(&mut self, warning: Warning) {
        tracing::warn!(kind = ?warning.kind, element = %warning.element_id, "{}", warning.message);
        self.warnings.push(warning);
    }

    fn add_states<'a>(
        &mut self,
        graph: &'a WorkflowGraph,
        options: &BuildOptions,
    ) -> HashSet<&'a str> {
        let mut ids: HashSet<&str> = HashSet::new();
        let mut unique = Vec::with_capacity(graph.states.len());
        for state in &graph.states {
            if ids.insert(state.id.as_str()) {
                unique.push(state);
            } else {
                self.warn(Warning::duplicate_id("state", &state.id));
            }
        }

        let requested = match options.initial_current_state_id.as_deref() {
            Some(id) if ids.contains(id) => Some(id),
            Some(id) => {
                self.warn(Warning::unknown_current_state(id));
                None
            }
            None => None,
        };

        // First flagged state wins; the rest are reported.
        let current = match requested {
            Some(id) => Some(id),
            None => {
                let mut flagged = unique.iter().filter(|s| s.is_current);
                let first = flagged.next().map(|s| s.id.as_str());
                if let Some(kept) = first {
                    let ignored: Vec<String> = flagged.map(|s| s.id.clone()).collect();
                    for id in ignored {
                        self.warn(Warning::conflicting_current_state(kept, &id));
                    }
                }
                first
            }
        };

        for state in unique {
            let mut classes = vec![class::NODE_STATE.to_string()];
            if current == Some(state.id.as_str()) {
                classes.push(class::CURRENT_STATE.to_string());
            }
            self.nodes.push(GraphNode {
                id: state.id.clone(),
                kind: NodeKind::State,
                label: state.name.clone(),
                classes,
                parent: None,
                transition_id: None,
            });
        }

        ids
    }

    fn index_criteria<'a>(&mut self, criteria: &'a [Criterion]) -> HashMap<&'a str, &'a Criterion> {
        let mut index = HashMap::new();
        for criterion in criteria {
            if index.contains_key(criterion.id.as_str()) {
                self.warn(Warning::duplicate_id("criterion", &criterion.id));
            } else {
                index.insert(criterion.id.as_str(), criterion);
            }
        }
        index
    }

    fn validate_transitions<'a>(
        &mut self,
        transitions: &'a [Transition],
        state_ids: &HashSet<&str>,
    ) -> Vec<&'a Transition> {
        let mut seen = HashSet::new();
        let mut kept = Vec::with_capacity(transitions.len());
        for transition in transitions {
            // Nodes and edges share one id space in the rendered document.
            if !seen.insert(transition.id.as_str()) || state_ids.contains(transition.id.as_str()) {
                self.warn(Warning::duplicate_id("transition", &transition.id));
                continue;
            }
            let mut dangling = false;
            for endpoint in [&transition.start_state_id, &transition.end_state_id] {
                if !state_ids.contains(endpoint.as_str()) {
                    self.warn(Warning::dangling_state(&transition.id, endpoint));
                    dangling = true;
                }
            }
            if !dangling {
                kept.push(transition);
            }
        }
        kept
    }

    fn validate_processes<'a>(
        &mut self,
        processes: &'a [Process],
        transitions: &[&Transition],
        options: &BuildOptions,
    ) -> Vec<&'a Process> {
        let known: HashSet<&str> = transitions.iter().map(|t| t.id.as_str()).collect();
        let mut seen = HashSet::new();
        let mut kept = Vec::new();
        for process in processes {
            if !seen.insert(process.id.as_str()) {
                self.warn(Warning::duplicate_id("process", &process.id));
                continue;
            }
            match process.transition_id.as_deref() {
                None => {
                    tracing::debug!(process = %process.id, "process not attached to a transition");
                }
                Some(id) if !known.contains(id) => {
                    self.warn(Warning::dangling_transition(&process.id, id));
                }
                Some(id) if options.hidden_transitions.contains(id) => {}
                Some(_) => kept.push(process),
            }
        }
        kept
    }

    fn add_collapsed_transition(&mut self, transition: &Transition) {
        let mut classes = transition_classes(transition);
        if !transition.criteria_ids.is_empty() {
            classes.push(class::EDGE_CRITERIA.to_string());
        }
        classes.push(class::HIDDEN_DETAIL.to_string());
        self.edges.push(GraphEdge {
            id: transition.id.clone(),
            source: transition.start_state_id.clone(),
            target: transition.end_state_id.clone(),
            classes,
            label: Some(transition.name.clone()),
            transition_id: Some(transition.id.clone()),
        });
    }

    /// Emits the transition and returns the node id processes hang off.
    fn add_transition(
        &mut self,
        transition: &Transition,
        criteria: &HashMap<&str, &Criterion>,
        has_processes: bool,
    ) -> String {
        let mut resolved: Vec<&Criterion> = Vec::new();
        for id in &transition.criteria_ids {
            match criteria.get(id.as_str()) {
                Some(c) if resolved.iter().any(|r| r.id == c.id) => {
                    self.warn(Warning::duplicate_id("criterion", id));
                }
                Some(c) => resolved.push(c),
                None => self.warn(Warning::unknown_criterion(&transition.id, id)),
            }
        }

        let group = (!resolved.is_empty() || has_processes).then(|| group_id(&transition.id));
        if let Some(group) = &group {
            self.nodes.push(GraphNode {
                id: group.clone(),
                kind: NodeKind::Group,
                label: transition.name.clone(),
                classes: vec![class::NODE_GROUP.to_string()],
                parent: None,
                transition_id: Some(transition.id.clone()),
            });
        }

        if resolved.is_empty() {
            self.edges.push(GraphEdge {
                id: transition.id.clone(),
                source: transition.start_state_id.clone(),
                target: transition.end_state_id.clone(),
                classes: transition_classes(transition),
                label: Some(transition.name.clone()),
                transition_id: Some(transition.id.clone()),
            });
            return transition.start_state_id.clone();
        }

        let mut path = vec![transition.start_state_id.clone()];
        for criterion in &resolved {
            let id = criteria_node_id(&transition.id, &criterion.id);
            self.nodes.push(GraphNode {
                id: id.clone(),
                kind: NodeKind::Criteria,
                label: criterion.name.clone(),
                classes: vec![class::NODE_CRITERIA.to_string()],
                parent: group.clone(),
                transition_id: Some(transition.id.clone()),
            });
            path.push(id);
        }
        path.push(transition.end_state_id.clone());

        let mut classes = transition_classes(transition);
        classes.push(class::EDGE_CRITERIA.to_string());
        for (i, pair) in path.windows(2).enumerate() {
            self.edges.push(GraphEdge {
                id: format!("{}::{}", transition.id, i),
                source: pair[0].clone(),
                target: pair[1].clone(),
                classes: classes.clone(),
                label: (i == 0).then(|| transition.name.clone()),
                transition_id: Some(transition.id.clone()),
            });
        }

        // The last criterion sits closest to the transition midpoint.
        path[path.len() - 2].clone()
    }

    fn add_process(&mut self, process: &Process, transition_id: &str, anchor: &str) {
        let id = process_node_id(transition_id, &process.id);
        self.nodes.push(GraphNode {
            id: id.clone(),
            kind: NodeKind::Process,
            label: process.name.clone(),
            classes: vec![class::NODE_PROCESS.to_string()],
            parent: Some(group_id(transition_id)),
            transition_id: Some(transition_id.to_string()),
        });
        self.edges.push(GraphEdge {
            id: format!("{}::edge", id),
            source: anchor.to_string(),
            target: id,
            classes: vec![class::EDGE_PROCESS.to_string()],
            label: None,
            transition_id: Some(transition_id.to_string()),
        });
    }

    fn finish(self) -> GraphModel {
        GraphModel {
            nodes: self.nodes,
            edges: self.edges,
            warnings: self.warnings,
        }
    }
}

fn transition_classes(transition: &Transition) -> Vec<String> {
    let mut classes = vec![class::EDGE_TRANSITION.to_string()];
    if !transition.automated {
        classes.push(class::EDGE_MANUAL.to_string());
    }
    classes
}
