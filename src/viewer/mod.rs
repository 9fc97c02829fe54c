mod render;
mod selection;
mod session;
mod viewport;

pub use render::{CytoscapeRenderer, GraphRenderer, Scene, SceneEdge, SceneNode};
pub use selection::{
    SelectionController, SelectionOutcome, SelectionPhase, TransitionDraft, TransitionRequest,
};
pub use session::{Listener, Viewer, ViewerEvent};
pub use viewport::{PanDirection, Viewport, ViewportPhase, ViewportState};
