//! Two-click "create transition" interaction.
//!
//! `Disarmed -> ArmedWaitingStart -> ArmedWaitingEnd -> Disarmed`. Only
//! state nodes can be picked; anything else is ignored while armed.
//! Picking the start node again cancels, since self-loops are not drafted
//! here.

use crate::model::NodeKind;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SelectionPhase {
    Disarmed,
    ArmedWaitingStart,
    ArmedWaitingEnd,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionDraft {
    pub start_node_id: Option<String>,
    pub end_node_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionRequest {
    pub start_node_id: String,
    pub end_node_id: String,
}

/// What a node click did to the draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionOutcome {
    NotArmed,
    Ignored,
    StartSelected(String),
    Cancelled,
    Completed(TransitionRequest),
}

#[derive(Debug, Clone, Default)]
pub struct SelectionController {
    draft: Option<TransitionDraft>,
}

impl SelectionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> SelectionPhase {
        match &self.draft {
            None => SelectionPhase::Disarmed,
            Some(TransitionDraft {
                start_node_id: None,
                ..
            }) => SelectionPhase::ArmedWaitingStart,
            Some(_) => SelectionPhase::ArmedWaitingEnd,
        }
    }

    pub fn draft(&self) -> Option<&TransitionDraft> {
        self.draft.as_ref()
    }

    pub fn is_armed(&self) -> bool {
        self.draft.is_some()
    }

    /// Node to highlight while the user picks an end node.
    pub fn highlighted(&self) -> Option<&str> {
        self.draft.as_ref()?.start_node_id.as_deref()
    }

    /// Start a fresh draft, discarding any half-finished one.
    pub fn arm(&mut self) {
        tracing::debug!("transition draft armed");
        self.draft = Some(TransitionDraft::default());
    }

    /// Returns whether there was a draft to drop.
    pub fn cancel(&mut self) -> bool {
        let was_armed = self.draft.take().is_some();
        if was_armed {
            tracing::debug!("transition draft cancelled");
        }
        was_armed
    }

    pub fn click(&mut self, node_id: &str, kind: NodeKind) -> SelectionOutcome {
        let Some(draft) = self.draft.as_mut() else {
            return SelectionOutcome::NotArmed;
        };
        if kind != NodeKind::State {
            return SelectionOutcome::Ignored;
        }

        match draft.start_node_id.as_deref() {
            None => {
                draft.start_node_id = Some(node_id.to_string());
                tracing::debug!(start = node_id, "transition draft start selected");
                SelectionOutcome::StartSelected(node_id.to_string())
            }
            Some(start) if start == node_id => {
                self.draft = None;
                tracing::debug!(node = node_id, "start node clicked again, draft cancelled");
                SelectionOutcome::Cancelled
            }
            Some(start) => {
                let request = TransitionRequest {
                    start_node_id: start.to_string(),
                    end_node_id: node_id.to_string(),
                };
                self.draft = None;
                tracing::debug!(
                    start = %request.start_node_id,
                    end = %request.end_node_id,
                    "transition draft completed"
                );
                SelectionOutcome::Completed(request)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_step_protocol() {
        let mut selection = SelectionController::new();
        selection.arm();
        assert_eq!(selection.phase(), SelectionPhase::ArmedWaitingStart);

        let outcome = selection.click("A", NodeKind::State);
        assert_eq!(outcome, SelectionOutcome::StartSelected("A".to_string()));
        assert_eq!(selection.phase(), SelectionPhase::ArmedWaitingEnd);
        assert_eq!(
            selection.draft().and_then(|d| d.start_node_id.as_deref()),
            Some("A")
        );
        assert_eq!(selection.highlighted(), Some("A"));

        let outcome = selection.click("B", NodeKind::State);
        assert_eq!(
            outcome,
            SelectionOutcome::Completed(TransitionRequest {
                start_node_id: "A".to_string(),
                end_node_id: "B".to_string(),
            })
        );
        assert_eq!(selection.phase(), SelectionPhase::Disarmed);
        assert!(selection.draft().is_none());
        assert_eq!(selection.highlighted(), None);
    }

    #[test]
    fn test_self_click_cancels() {
        let mut selection = SelectionController::new();
        selection.arm();
        selection.click("A", NodeKind::State);
        assert_eq!(selection.click("A", NodeKind::State), SelectionOutcome::Cancelled);
        assert_eq!(selection.phase(), SelectionPhase::Disarmed);
        assert!(selection.draft().is_none());
    }

    #[test]
    fn test_non_state_nodes_ignored() {
        let mut selection = SelectionController::new();
        selection.arm();
        assert_eq!(selection.click("X", NodeKind::Process), SelectionOutcome::Ignored);
        assert_eq!(selection.click("Y", NodeKind::Criteria), SelectionOutcome::Ignored);
        assert_eq!(selection.phase(), SelectionPhase::ArmedWaitingStart);
        assert_eq!(selection.draft(), Some(&TransitionDraft::default()));

        selection.click("A", NodeKind::State);
        assert_eq!(selection.click("G", NodeKind::Group), SelectionOutcome::Ignored);
        assert_eq!(selection.phase(), SelectionPhase::ArmedWaitingEnd);
    }

    #[test]
    fn test_clicks_while_disarmed() {
        let mut selection = SelectionController::new();
        assert_eq!(selection.click("A", NodeKind::State), SelectionOutcome::NotArmed);
        assert_eq!(selection.phase(), SelectionPhase::Disarmed);
    }

    #[test]
    fn test_cancel_and_rearm_clear_draft() {
        let mut selection = SelectionController::new();
        assert!(!selection.cancel());

        selection.arm();
        selection.click("A", NodeKind::State);
        assert!(selection.cancel());
        assert_eq!(selection.phase(), SelectionPhase::Disarmed);

        selection.arm();
        selection.click("A", NodeKind::State);
        selection.arm();
        assert_eq!(selection.phase(), SelectionPhase::ArmedWaitingStart);
        assert_eq!(selection.highlighted(), None);
    }
}
