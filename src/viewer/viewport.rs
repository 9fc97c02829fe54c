//! Zoom and pan state for the graph view.
//!
//! `pan` is the model-space point shown at the centre of the viewport, so a
//! zoom step leaves it untouched and zooming stays anchored at the centre.
//! Rendered coordinates follow `(model - pan) * zoom + size / 2`.

use crate::config::ViewportSettings;
use crate::graph::{Bounds, Point};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportState {
    pub zoom: f64,
    pub pan: Point,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pan: Point::ORIGIN,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewportPhase {
    /// No graph loaded; every operation is a no-op.
    Idle,
    Ready,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanDirection {
    Left,
    Right,
    Up,
    Down,
}

#[derive(Debug, Clone)]
pub struct Viewport {
    settings: ViewportSettings,
    width: f64,
    height: f64,
    phase: ViewportPhase,
    state: ViewportState,
    bounds: Option<Bounds>,
}

impl Viewport {
    pub fn new(settings: ViewportSettings) -> Self {
        Self {
            width: settings.width,
            height: settings.height,
            settings,
            phase: ViewportPhase::Idle,
            state: ViewportState::default(),
            bounds: None,
        }
    }

    pub fn state(&self) -> ViewportState {
        self.state
    }

    pub fn phase(&self) -> ViewportPhase {
        self.phase
    }

    pub fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    /// Enter `Ready` for a freshly loaded graph and fit it.
    ///
    /// `bounds` is `None` for an empty graph, which fits to zoom 1 at the
    /// origin.
    pub fn load(&mut self, bounds: Option<Bounds>) {
        self.phase = ViewportPhase::Ready;
        self.state = ViewportState::default();
        self.bounds = bounds;
        self.apply_fit();
    }

    /// Replace the bounds used by the next fit without moving the view.
    pub fn set_bounds(&mut self, bounds: Option<Bounds>) {
        self.bounds = bounds;
    }

    pub fn fit(&mut self) -> bool {
        if self.phase == ViewportPhase::Idle {
            return false;
        }
        let before = self.state;
        self.apply_fit();
        self.state != before
    }

    pub fn zoom_in(&mut self) -> bool {
        let zoom = self.state.zoom * self.settings.zoom_step;
        self.set_zoom(zoom)
    }

    pub fn zoom_out(&mut self) -> bool {
        let zoom = self.state.zoom / self.settings.zoom_step;
        self.set_zoom(zoom)
    }

    /// Set an absolute zoom level; out-of-range values are clamped.
    pub fn set_zoom(&mut self, zoom: f64) -> bool {
        if self.phase == ViewportPhase::Idle || !zoom.is_finite() {
            return false;
        }
        let zoom = self.clamp_zoom(zoom);
        if zoom == self.state.zoom {
            return false;
        }
        tracing::debug!(from = self.state.zoom, to = zoom, "zoom");
        self.state.zoom = zoom;
        true
    }

    /// Shift the view by one step; the on-screen distance is the same at
    /// every zoom level.
    pub fn pan(&mut self, direction: PanDirection) -> bool {
        if self.phase == ViewportPhase::Idle {
            return false;
        }
        let dx = self.width * self.settings.pan_step / self.state.zoom;
        let dy = self.height * self.settings.pan_step / self.state.zoom;
        let pan = &mut self.state.pan;
        match direction {
            PanDirection::Left => pan.x -= dx,
            PanDirection::Right => pan.x += dx,
            PanDirection::Up => pan.y -= dy,
            PanDirection::Down => pan.y += dy,
        }
        tracing::debug!(?direction, x = pan.x, y = pan.y, "pan");
        true
    }

    pub fn to_rendered(&self, model: Point) -> Point {
        Point::new(
            (model.x - self.state.pan.x) * self.state.zoom + self.width / 2.0,
            (model.y - self.state.pan.y) * self.state.zoom + self.height / 2.0,
        )
    }

    pub fn to_model(&self, rendered: Point) -> Point {
        Point::new(
            (rendered.x - self.width / 2.0) / self.state.zoom + self.state.pan.x,
            (rendered.y - self.height / 2.0) / self.state.zoom + self.state.pan.y,
        )
    }

    fn clamp_zoom(&self, zoom: f64) -> f64 {
        zoom.clamp(self.settings.zoom_min, self.settings.zoom_max)
    }

    fn apply_fit(&mut self) {
        let Some(bounds) = self.bounds else {
            self.state = ViewportState::default();
            return;
        };
        let available_w = (self.width - 2.0 * self.settings.padding).max(1.0);
        let available_h = (self.height - 2.0 * self.settings.padding).max(1.0);

        let scale_w = (bounds.width() > 0.0).then(|| available_w / bounds.width());
        let scale_h = (bounds.height() > 0.0).then(|| available_h / bounds.height());
        let scale = match (scale_w, scale_h) {
            (Some(w), Some(h)) => w.min(h),
            (Some(s), None) | (None, Some(s)) => s,
            (None, None) => 1.0,
        };

        self.state = ViewportState {
            zoom: self.clamp_zoom(scale),
            pan: bounds.center(),
        };
        tracing::debug!(zoom = self.state.zoom, "fit to bounds");
    }
}
