mod view;
mod workflow;

pub use view::{GraphEdge, GraphModel, GraphNode, NodeKind, Warning, WarningKind, class};
pub use workflow::{Criterion, Process, State, Transition, WorkflowGraph};
