use serde::{Deserialize, Serialize};

/// Workflow payload as handed over by the host page.
///
/// The viewer never mutates this; everything it draws is derived into a
/// [`GraphModel`](super::GraphModel).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowGraph {
    #[serde(default)]
    pub states: Vec<State>,
    #[serde(default)]
    pub transitions: Vec<Transition>,
    #[serde(default)]
    pub processes: Vec<Process>,
    #[serde(default)]
    pub criteria: Vec<Criterion>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct State {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub is_current: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transition {
    pub id: String,
    pub name: String,
    pub start_state_id: String,
    pub end_state_id: String,
    #[serde(default = "default_automated")]
    pub automated: bool,
    #[serde(default)]
    pub criteria_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Process {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub transition_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Criterion {
    pub id: String,
    pub name: String,
}

fn default_automated() -> bool {
    true
}

impl State {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            is_current: false,
        }
    }

    pub fn current(mut self) -> Self {
        self.is_current = true;
        self
    }
}

impl Transition {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        start_state_id: impl Into<String>,
        end_state_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            start_state_id: start_state_id.into(),
            end_state_id: end_state_id.into(),
            automated: true,
            criteria_ids: Vec::new(),
        }
    }

    pub fn manual(mut self) -> Self {
        self.automated = false;
        self
    }

    pub fn with_criteria<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.criteria_ids = ids.into_iter().map(Into::into).collect();
        self
    }
}

impl Process {
    pub fn new(id: impl Into<String>, name: impl Into<String>, transition_id: &str) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            transition_id: Some(transition_id.to_string()),
        }
    }
}

impl Criterion {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_camel_case_payload() {
        let json = r#"{
            "states": [
                {"id": "s1", "name": "NEW", "isCurrent": true},
                {"id": "s2", "name": "DONE"}
            ],
            "transitions": [{
                "id": "t1", "name": "finish",
                "startStateId": "s1", "endStateId": "s2",
                "automated": false, "criteriaIds": ["c1"]
            }],
            "processes": [{"id": "p1", "name": "notify", "transitionId": "t1"}],
            "criteria": [{"id": "c1", "name": "is valid"}]
        }"#;

        let graph: WorkflowGraph = serde_json::from_str(json).unwrap();
        assert_eq!(graph.states.len(), 2);
        assert!(graph.states[0].is_current);
        assert!(!graph.states[1].is_current);
        assert!(!graph.transitions[0].automated);
        assert_eq!(graph.transitions[0].criteria_ids, vec!["c1"]);
        assert_eq!(graph.processes[0].transition_id.as_deref(), Some("t1"));
    }

    #[test]
    fn test_missing_sections_default_to_empty() {
        let graph: WorkflowGraph =
            serde_json::from_str(r#"{"states": [{"id": "a", "name": "A"}]}"#).unwrap();
        assert_eq!(graph.states.len(), 1);
        assert!(graph.transitions.is_empty());
        assert!(graph.processes.is_empty());
        assert!(graph.criteria.is_empty());
    }

    #[test]
    fn test_transition_defaults_to_automated() {
        let t: Transition = serde_json::from_str(
            r#"{"id": "t", "name": "go", "startStateId": "a", "endStateId": "b"}"#,
        )
        .unwrap();
        assert!(t.automated);
        assert!(t.criteria_ids.is_empty());
    }
}
