use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

pub const CONFIG_FILE: &str = ".statemap.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid config value: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub viewport: ViewportSettings,
    pub layout: LayoutSettings,
    pub server: ServerSettings,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportSettings {
    pub width: f64,
    pub height: f64,
    pub zoom_min: f64,
    pub zoom_max: f64,
    pub zoom_step: f64,
    /// Fraction of the viewport size moved by one pan step.
    pub pan_step: f64,
    /// Margin kept around the graph on fit, in rendered pixels.
    pub padding: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutSettings {
    pub node_width: f64,
    pub node_height: f64,
    pub criteria_size: f64,
    pub process_width: f64,
    pub process_height: f64,
    pub rank_gap: f64,
    pub row_gap: f64,
    pub process_offset: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ServerSettings {
    pub port: u16,
}

impl Default for ViewportSettings {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
            zoom_min: 0.1,
            zoom_max: 3.0,
            zoom_step: 1.1,
            pan_step: 0.1,
            padding: 30.0,
        }
    }
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            node_width: 140.0,
            node_height: 48.0,
            criteria_size: 36.0,
            process_width: 120.0,
            process_height: 32.0,
            rank_gap: 120.0,
            row_gap: 60.0,
            process_offset: 70.0,
        }
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self { port: 3000 }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    viewport: Option<RawViewport>,
    layout: Option<RawLayout>,
    server: Option<RawServer>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawViewport {
    width: Option<f64>,
    height: Option<f64>,
    zoom_min: Option<f64>,
    zoom_max: Option<f64>,
    zoom_step: Option<f64>,
    pan_step: Option<f64>,
    padding: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawLayout {
    node_width: Option<f64>,
    node_height: Option<f64>,
    criteria_size: Option<f64>,
    process_width: Option<f64>,
    process_height: Option<f64>,
    rank_gap: Option<f64>,
    row_gap: Option<f64>,
    process_offset: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawServer {
    port: Option<u16>,
}

impl Config {
    /// Load `.statemap.toml` from `dir`, falling back to defaults when absent.
    pub fn load(dir: &Path) -> Result<Self, ConfigError> {
        let config_path = dir.join(CONFIG_FILE);
        if !config_path.exists() {
            return Ok(Self::default());
        }
        Self::load_file(&config_path)
    }

    pub fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = toml::from_str(content)?;

        let v = ViewportSettings::default();
        let viewport = match raw.viewport {
            Some(r) => ViewportSettings {
                width: r.width.unwrap_or(v.width),
                height: r.height.unwrap_or(v.height),
                zoom_min: r.zoom_min.unwrap_or(v.zoom_min),
                zoom_max: r.zoom_max.unwrap_or(v.zoom_max),
                zoom_step: r.zoom_step.unwrap_or(v.zoom_step),
                pan_step: r.pan_step.unwrap_or(v.pan_step),
                padding: r.padding.unwrap_or(v.padding),
            },
            None => v,
        };

        let l = LayoutSettings::default();
        let layout = match raw.layout {
            Some(r) => LayoutSettings {
                node_width: r.node_width.unwrap_or(l.node_width),
                node_height: r.node_height.unwrap_or(l.node_height),
                criteria_size: r.criteria_size.unwrap_or(l.criteria_size),
                process_width: r.process_width.unwrap_or(l.process_width),
                process_height: r.process_height.unwrap_or(l.process_height),
                rank_gap: r.rank_gap.unwrap_or(l.rank_gap),
                row_gap: r.row_gap.unwrap_or(l.row_gap),
                process_offset: r.process_offset.unwrap_or(l.process_offset),
            },
            None => l,
        };

        let server = ServerSettings {
            port: raw
                .server
                .and_then(|s| s.port)
                .unwrap_or(ServerSettings::default().port),
        };

        let config = Self {
            viewport,
            layout,
            server,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        // Comparisons are written so that NaN fails them.
        let v = &self.viewport;
        if !(positive(v.width) && positive(v.height)) {
            return Err(ConfigError::Invalid(
                "viewport width and height must be positive".to_string(),
            ));
        }
        if !(positive(v.zoom_min) && v.zoom_max.is_finite() && v.zoom_min <= v.zoom_max) {
            return Err(ConfigError::Invalid(format!(
                "zoom range [{}, {}] is empty or not positive",
                v.zoom_min, v.zoom_max
            )));
        }
        if !(v.zoom_step.is_finite() && v.zoom_step > 1.0) {
            return Err(ConfigError::Invalid(format!(
                "zoom_step must be greater than 1, got {}",
                v.zoom_step
            )));
        }
        if !(positive(v.pan_step) && v.pan_step <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "pan_step must be in (0, 1], got {}",
                v.pan_step
            )));
        }
        if !non_negative(v.padding) {
            return Err(ConfigError::Invalid("padding must not be negative".to_string()));
        }

        let l = &self.layout;
        let sizes = [
            ("node_width", l.node_width),
            ("node_height", l.node_height),
            ("criteria_size", l.criteria_size),
            ("process_width", l.process_width),
            ("process_height", l.process_height),
        ];
        if let Some((key, value)) = sizes.iter().find(|(_, value)| !positive(*value)) {
            return Err(ConfigError::Invalid(format!(
                "layout.{} must be positive, got {}",
                key, value
            )));
        }
        let gaps = [
            ("rank_gap", l.rank_gap),
            ("row_gap", l.row_gap),
            ("process_offset", l.process_offset),
        ];
        if let Some((key, value)) = gaps.iter().find(|(_, value)| !non_negative(*value)) {
            return Err(ConfigError::Invalid(format!(
                "layout.{} must not be negative, got {}",
                key, value
            )));
        }
        Ok(())
    }
}

fn positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

fn non_negative(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

/// Commented starter configuration written by `statemap init`.
pub fn generate_config_template() -> String {
    let v = ViewportSettings::default();
    let l = LayoutSettings::default();
    format!(
        r#"# statemap configuration
# All keys are optional; the values below are the defaults.

[viewport]
# Logical viewport size used for fit-to-bounds and pan steps
width = {width:.1}
height = {height:.1}
# Zoom is always clamped to [zoom_min, zoom_max]
zoom_min = {zoom_min}
zoom_max = {zoom_max:.1}
# Multiplier applied by one zoom-in step
zoom_step = {zoom_step}
# Fraction of the viewport moved by one pan step
pan_step = {pan_step}
# Margin around the graph after fit, in pixels
padding = {padding:.1}

[layout]
node_width = {node_width:.1}
node_height = {node_height:.1}
criteria_size = {criteria_size:.1}
process_width = {process_width:.1}
process_height = {process_height:.1}
rank_gap = {rank_gap:.1}
row_gap = {row_gap:.1}
process_offset = {process_offset:.1}

[server]
port = {port}
"#,
        width = v.width,
        height = v.height,
        zoom_min = v.zoom_min,
        zoom_max = v.zoom_max,
        zoom_step = v.zoom_step,
        pan_step = v.pan_step,
        padding = v.padding,
        node_width = l.node_width,
        node_height = l.node_height,
        criteria_size = l.criteria_size,
        process_width = l.process_width,
        process_height = l.process_height,
        rank_gap = l.rank_gap,
        row_gap = l.row_gap,
        process_offset = l.process_offset,
        port = ServerSettings::default().port,
    )
}
