use serde::{Deserialize, Serialize};
use std::fmt;

/// Class names shared by the builder, the style resolver and the legend.
pub mod class {
    pub const NODE_STATE: &str = "node-state";
    pub const CURRENT_STATE: &str = "current-state";
    pub const NODE_PROCESS: &str = "node-process";
    pub const NODE_CRITERIA: &str = "node-criteria";
    pub const NODE_GROUP: &str = "node-group";
    pub const SELECTED_START: &str = "selected-start";

    pub const EDGE_TRANSITION: &str = "edge-transition";
    pub const EDGE_MANUAL: &str = "edge-manual";
    pub const EDGE_CRITERIA: &str = "edge-criteria";
    pub const EDGE_PROCESS: &str = "edge-process";
    pub const HIDDEN_DETAIL: &str = "hidden-detail";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    State,
    Process,
    Criteria,
    /// Compound parent grouping the criteria and processes of one transition.
    Group,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::State => "state",
            NodeKind::Process => "process",
            NodeKind::Criteria => "criteria",
            NodeKind::Group => "group",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
    pub id: String,
    pub kind: NodeKind,
    pub label: String,
    pub classes: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transition_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub classes: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transition_id: Option<String>,
}

impl GraphNode {
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

impl GraphEdge {
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

/// Output of the graph model builder.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphModel {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
    pub warnings: Vec<Warning>,
}

impl GraphModel {
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn edge(&self, id: &str) -> Option<&GraphEdge> {
        self.edges.iter().find(|e| e.id == id)
    }

    /// The state node carrying the `current-state` class, if any.
    pub fn current_state(&self) -> Option<&GraphNode> {
        self.nodes
            .iter()
            .find(|n| n.kind == NodeKind::State && n.has_class(class::CURRENT_STATE))
    }

    pub fn count(&self, kind: NodeKind) -> usize {
        self.nodes.iter().filter(|n| n.kind == kind).count()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// A non-fatal data quality problem found while building the graph model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Warning {
    pub kind: WarningKind,
    pub element_id: String,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WarningKind {
    DanglingState,
    DanglingTransition,
    UnknownCriterion,
    DuplicateId,
    ConflictingCurrentState,
    UnknownCurrentState,
}

impl WarningKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            WarningKind::DanglingState => "dangling-state",
            WarningKind::DanglingTransition => "dangling-transition",
            WarningKind::UnknownCriterion => "unknown-criterion",
            WarningKind::DuplicateId => "duplicate-id",
            WarningKind::ConflictingCurrentState => "conflicting-current-state",
            WarningKind::UnknownCurrentState => "unknown-current-state",
        }
    }
}

impl Warning {
    pub fn dangling_state(transition_id: &str, state_id: &str) -> Self {
        Self {
            kind: WarningKind::DanglingState,
            element_id: transition_id.to_string(),
            message: format!(
                "Transition '{}' references unknown state '{}'; edge dropped",
                transition_id, state_id
            ),
        }
    }

    pub fn dangling_transition(process_id: &str, transition_id: &str) -> Self {
        Self {
            kind: WarningKind::DanglingTransition,
            element_id: process_id.to_string(),
            message: format!(
                "Process '{}' is attached to unknown transition '{}'; node dropped",
                process_id, transition_id
            ),
        }
    }

    pub fn unknown_criterion(transition_id: &str, criterion_id: &str) -> Self {
        Self {
            kind: WarningKind::UnknownCriterion,
            element_id: transition_id.to_string(),
            message: format!(
                "Transition '{}' references unknown criterion '{}'; criterion skipped",
                transition_id, criterion_id
            ),
        }
    }

    pub fn duplicate_id(element: &str, id: &str) -> Self {
        Self {
            kind: WarningKind::DuplicateId,
            element_id: id.to_string(),
            message: format!("Duplicate {} id '{}'; later occurrence ignored", element, id),
        }
    }

    pub fn conflicting_current_state(kept: &str, ignored: &str) -> Self {
        Self {
            kind: WarningKind::ConflictingCurrentState,
            element_id: ignored.to_string(),
            message: format!(
                "State '{}' is also flagged current; keeping first flagged state '{}'",
                ignored, kept
            ),
        }
    }

    pub fn unknown_current_state(state_id: &str) -> Self {
        Self {
            kind: WarningKind::UnknownCurrentState,
            element_id: state_id.to_string(),
            message: format!(
                "Requested current state '{}' does not exist; using payload flags",
                state_id
            ),
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warning_kind_names_match_serde() {
        for kind in [
            WarningKind::DanglingState,
            WarningKind::DanglingTransition,
            WarningKind::UnknownCriterion,
            WarningKind::DuplicateId,
            WarningKind::ConflictingCurrentState,
            WarningKind::UnknownCurrentState,
        ] {
            assert_eq!(serde_json::to_value(kind).unwrap(), kind.as_str());
        }
    }

    #[test]
    fn test_node_serializes_camel_case() {
        let node = GraphNode {
            id: "t1::group".to_string(),
            kind: NodeKind::Group,
            label: "submit".to_string(),
            classes: vec![class::NODE_GROUP.to_string()],
            parent: None,
            transition_id: Some("t1".to_string()),
        };
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["kind"], "group");
        assert_eq!(json["transitionId"], "t1");
    }
}
