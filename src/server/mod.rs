//! HTTP host for the interactive workflow map.

mod assets;
mod routes;

pub use assets::static_html;
pub use routes::{AppState, export_html, router, serve};
