use super::assets::{INDEX_HTML, static_html};
use crate::graph::legend_json;
use crate::viewer::{CytoscapeRenderer, PanDirection, SelectionOutcome, Viewer, ViewerEvent};
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{
        Html, IntoResponse,
        sse::{Event, KeepAlive, Sse},
    },
    routing::{get, post},
};
use serde_json::{Value, json};
use std::convert::Infallible;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::broadcast;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::BroadcastStream;
use tower_http::cors::{Any, CorsLayer};

const EVENT_BUFFER: usize = 64;

/// Application state shared across handlers
pub struct AppState {
    viewer: Mutex<Viewer>,
    events: broadcast::Sender<ViewerEvent>,
}

impl AppState {
    /// Wrap a viewer and relay its events to every SSE subscriber.
    pub fn new(mut viewer: Viewer) -> Arc<Self> {
        let (events, _) = broadcast::channel(EVENT_BUFFER);
        let relay = events.clone();
        viewer.subscribe(move |event| {
            // No open page is not an error.
            let _ = relay.send(event.clone());
        });
        Arc::new(Self {
            viewer: Mutex::new(viewer),
            events,
        })
    }

    fn viewer(&self) -> Result<MutexGuard<'_, Viewer>, StatusCode> {
        self.viewer
            .lock()
            .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any);

    Router::new()
        .route("/", get(index_handler))
        .route("/api/scene", get(scene_handler))
        .route("/api/legend", get(legend_handler))
        .route("/api/events", get(events_handler))
        .route("/api/viewport/{action}", post(viewport_handler))
        .route("/api/nodes/{id}/click", post(click_handler))
        .route("/api/transitions/{id}/toggle", post(toggle_handler))
        .route("/api/draft/arm", post(arm_handler))
        .route("/api/draft/cancel", post(cancel_handler))
        .layer(cors)
        .with_state(state)
}

/// Start the HTTP server hosting the workflow map
pub async fn serve(viewer: Viewer, port: u16, open_browser: bool) -> std::io::Result<()> {
    let app = router(AppState::new(viewer));

    let addr = format!("127.0.0.1:{}", port);
    let url = format!("http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "workflow map server listening");
    crate::style::header("Starting statemap server...");
    crate::style::status(&format!("Open in browser: {}", crate::style::url(&url)));
    crate::style::hint("Press Ctrl+C to stop");

    if open_browser {
        if let Err(e) = open::that(&url) {
            crate::style::warning(&format!("Could not open browser: {}", e));
        }
    }

    axum::serve(listener, app).await
}

/// Self-contained HTML page for the viewer's current scene.
pub fn export_html(viewer: &Viewer) -> String {
    let mut document = viewer.render_with(&mut CytoscapeRenderer);
    document["legend"] = legend_json();
    static_html(&document)
}

async fn index_handler() -> impl IntoResponse {
    Html(INDEX_HTML)
}

async fn scene_handler(State(state): State<Arc<AppState>>) -> Result<Json<Value>, StatusCode> {
    let viewer = state.viewer()?;
    Ok(Json(viewer.render_with(&mut CytoscapeRenderer)))
}

async fn legend_handler() -> impl IntoResponse {
    Json(legend_json())
}

async fn viewport_handler(
    State(state): State<Arc<AppState>>,
    Path(action): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    let mut viewer = state.viewer()?;
    let changed = match action.as_str() {
        "zoom-in" => viewer.zoom_in(),
        "zoom-out" => viewer.zoom_out(),
        "pan-left" => viewer.pan(PanDirection::Left),
        "pan-right" => viewer.pan(PanDirection::Right),
        "pan-up" => viewer.pan(PanDirection::Up),
        "pan-down" => viewer.pan(PanDirection::Down),
        "fit" => viewer.fit(),
        _ => return Err(StatusCode::NOT_FOUND),
    };
    Ok(Json(json!({
        "changed": changed,
        "viewport": viewer.viewport(),
    })))
}

async fn click_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    let mut viewer = state.viewer()?;
    let outcome = viewer.click_node(&id).ok_or(StatusCode::NOT_FOUND)?;
    let outcome = match outcome {
        SelectionOutcome::NotArmed => json!({ "outcome": "notArmed" }),
        SelectionOutcome::Ignored => json!({ "outcome": "ignored" }),
        SelectionOutcome::StartSelected(start) => {
            json!({ "outcome": "startSelected", "startNodeId": start })
        }
        SelectionOutcome::Cancelled => json!({ "outcome": "cancelled" }),
        SelectionOutcome::Completed(request) => {
            json!({ "outcome": "completed", "request": request })
        }
    };
    Ok(Json(json!({
        "result": outcome,
        "selection": viewer.selection_phase(),
    })))
}

async fn toggle_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    let mut viewer = state.viewer()?;
    let known = viewer
        .model()
        .edges
        .iter()
        .any(|e| e.transition_id.as_deref() == Some(id.as_str()));
    if !known {
        return Err(StatusCode::NOT_FOUND);
    }
    viewer.toggle_detail(&id);
    let hidden = viewer.hidden_transitions().any(|t| t == id);
    Ok(Json(json!({ "transitionId": id, "hidden": hidden })))
}

async fn arm_handler(State(state): State<Arc<AppState>>) -> Result<Json<Value>, StatusCode> {
    let mut viewer = state.viewer()?;
    viewer.arm();
    Ok(Json(json!({ "selection": viewer.selection_phase() })))
}

async fn cancel_handler(State(state): State<Arc<AppState>>) -> Result<Json<Value>, StatusCode> {
    let mut viewer = state.viewer()?;
    let cancelled = viewer.cancel();
    Ok(Json(json!({
        "cancelled": cancelled,
        "selection": viewer.selection_phase(),
    })))
}

async fn events_handler(
    State(state): State<Arc<AppState>>,
) -> Sse<impl tokio_stream::Stream<Item = Result<Event, Infallible>>> {
    let stream = BroadcastStream::new(state.events.subscribe()).filter_map(|event| {
        // Lagged receivers just skip what they missed.
        let event = event.ok()?;
        Event::default().event("viewer").json_data(event).ok().map(Ok)
    });
    Sse::new(stream).keep_alive(KeepAlive::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::graph::BuildOptions;
    use crate::model::{State as WorkflowState, Transition, WorkflowGraph};
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use tower::ServiceExt;

    fn app() -> (Router, Arc<AppState>) {
        let mut viewer = Viewer::new(Config::default());
        viewer.render(
            &WorkflowGraph {
                states: vec![
                    WorkflowState::new("A", "OPEN").current(),
                    WorkflowState::new("B", "DONE"),
                ],
                transitions: vec![Transition::new("t1", "finish", "A", "B")],
                ..WorkflowGraph::default()
            },
            BuildOptions::default(),
        );
        let state = AppState::new(viewer);
        (router(Arc::clone(&state)), state)
    }

    async fn call(app: &Router, method: &str, uri: &str) -> (StatusCode, Value) {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn test_scene_endpoint() {
        let (app, _) = app();
        let (status, body) = call(&app, "GET", "/api/scene").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["elements"]["nodes"].as_array().unwrap().len(), 2);
        assert_eq!(body["elements"]["edges"][0]["data"]["id"], "t1");
    }

    #[tokio::test]
    async fn test_viewport_actions() {
        let (app, _) = app();
        let (_, before) = call(&app, "GET", "/api/scene").await;

        let (status, body) = call(&app, "POST", "/api/viewport/zoom-out").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["changed"], true);
        assert!(body["viewport"]["zoom"].as_f64().unwrap() < before["zoom"].as_f64().unwrap());

        let (status, _) = call(&app, "POST", "/api/viewport/spin").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_draft_over_http_broadcasts_request() {
        let (app, state) = app();
        let mut events = state.events.subscribe();

        call(&app, "POST", "/api/draft/arm").await;
        let (_, first) = call(&app, "POST", "/api/nodes/A/click").await;
        assert_eq!(first["result"]["outcome"], "startSelected");
        let (_, second) = call(&app, "POST", "/api/nodes/B/click").await;
        assert_eq!(second["result"]["outcome"], "completed");
        assert_eq!(second["selection"], "disarmed");

        let mut requests = Vec::new();
        while let Ok(event) = events.try_recv() {
            if let ViewerEvent::TransitionCreateRequested { .. } = event {
                requests.push(event);
            }
        }
        assert_eq!(
            requests,
            vec![ViewerEvent::TransitionCreateRequested {
                start_node_id: "A".to_string(),
                end_node_id: "B".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn test_unknown_node_and_transition() {
        let (app, _) = app();
        let (status, _) = call(&app, "POST", "/api/nodes/missing/click").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = call(&app, "POST", "/api/transitions/missing/toggle").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_legend_endpoint() {
        let (app, _) = app();
        let (status, body) = call(&app, "GET", "/api/legend").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 5);
        assert_eq!(body[0]["caption"], "State");
        assert!(body[0]["style"]["fillColor"].is_string());
    }

    #[test]
    fn test_export_embeds_scene_and_legend() {
        let (_, state) = app();
        let html = export_html(&state.viewer().unwrap());
        assert!(html.contains(r#""caption":"Manual Transition""#));
        assert!(html.contains(r#""id":"t1""#));
    }
}
