use crate::contour::ContourModel;
use crate::error::TrackingError;
use crate::estimator::LineFitParams;
use crate::tracker::TrackingParams;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration of the `track_sequence` tool.
#[derive(Debug, Deserialize)]
pub struct TrackSequenceConfig {
    /// Frames in playback order; the first one initializes tracking.
    pub frames: Vec<PathBuf>,
    pub contour: ContourSpec,
    #[serde(default)]
    pub params: TrackingParams,
    /// When set, a robust line fit re-weights the sites after every frame.
    #[serde(default)]
    pub line_fit: Option<LineFitParams>,
    pub output: OutputConfig,
}

/// Initial geometry sampled into sites.
#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContourSpec {
    Line {
        p0: [f32; 2],
        p1: [f32; 2],
        spacing: f32,
    },
    Circle {
        center: [f32; 2],
        radius: f32,
        spacing: f32,
    },
    Polyline {
        points: Vec<[f32; 2]>,
        spacing: f32,
    },
}

impl ContourSpec {
    pub fn build(&self) -> Result<ContourModel, TrackingError> {
        match self {
            ContourSpec::Line { p0, p1, spacing } => ContourModel::from_line(*p0, *p1, *spacing),
            ContourSpec::Circle {
                center,
                radius,
                spacing,
            } => ContourModel::from_circle(*center, *radius, *spacing),
            ContourSpec::Polyline { points, spacing } => {
                ContourModel::from_polyline(points, *spacing)
            }
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    pub report_json: PathBuf,
    /// Directory for per-frame overlays; skipped when absent.
    #[serde(default)]
    pub overlay_dir: Option<PathBuf>,
}

pub fn load_config(path: &Path) -> Result<TrackSequenceConfig, String> {
    let data = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    serde_json::from_str(&data)
        .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_line_config() {
        let json = r#"{
            "frames": ["a.png", "b.png"],
            "contour": { "kind": "line", "p0": [10, 10], "p1": [10, 50], "spacing": 5 },
            "params": { "search_half_range": 3 },
            "output": { "report_json": "out/report.json" }
        }"#;
        let cfg: TrackSequenceConfig = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.frames.len(), 2);
        assert_eq!(cfg.params.search_half_range, 3);
        assert_eq!(cfg.params.profile_width, 7);
        assert!(cfg.line_fit.is_none());
        assert!(cfg.output.overlay_dir.is_none());
        assert_eq!(cfg.contour.build().unwrap().len(), 9);
    }

    #[test]
    fn parses_circle_with_line_fit_defaults() {
        let json = r#"{
            "frames": [],
            "contour": { "kind": "circle", "center": [64, 64], "radius": 20, "spacing": 4 },
            "line_fit": {},
            "output": { "report_json": "r.json", "overlay_dir": "overlays" }
        }"#;
        let cfg: TrackSequenceConfig = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.line_fit, Some(LineFitParams::default()));
        assert!(matches!(cfg.contour, ContourSpec::Circle { .. }));
    }
}
