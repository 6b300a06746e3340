use moving_edges::config::load_config;
use moving_edges::display::render_overlay;
use moving_edges::estimator::fit_line_irls;
use moving_edges::image::io::{load_grayscale_image, save_rgb, write_json_file};
use moving_edges::{PassReport, Site, Tracker};
use serde::Serialize;
use std::env;
use std::path::Path;

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    let config = load_config(Path::new(&config_path))?;
    if config.frames.is_empty() {
        return Err("Config lists no frames".to_string());
    }

    let model = config.contour.build().map_err(|e| e.to_string())?;
    let mut tracker = Tracker::new(config.params.clone(), model).map_err(|e| e.to_string())?;
    let mut frames = Vec::with_capacity(config.frames.len());

    for (index, path) in config.frames.iter().enumerate() {
        let gray = load_grayscale_image(path)?;
        let view = gray.as_view();
        let report = if index == 0 {
            tracker.initialize_tracking(&view)
        } else {
            tracker.track(&view)
        }
        .map_err(|e| format!("Frame {} ({}): {e}", index, path.display()))?;

        let mut robust_rejected = 0;
        let mut line_rms = None;
        if let Some(fit_params) = &config.line_fit {
            let snapshot = tracker.valid_snapshot();
            if let Some(fit) = fit_line_irls(&snapshot, fit_params) {
                tracker
                    .apply_site_weights(&fit.weights)
                    .map_err(|e| e.to_string())?;
                robust_rejected = tracker.reject_low_weights();
                line_rms = Some(fit.rms);
            }
        }

        if let Some(dir) = &config.output.overlay_dir {
            let overlay = render_overlay(&view, tracker.model()).map_err(|e| e.to_string())?;
            save_rgb(&overlay, &dir.join(format!("frame_{index:04}.png")))?;
        }

        println!(
            "frame {index}: good={} total={} robust_rejected={robust_rejected} ({:.3} ms)",
            tracker.good_site_count(),
            tracker.total_site_count(),
            report.elapsed_ms
        );
        frames.push(FrameSummary {
            frame: path.display().to_string(),
            report,
            robust_rejected,
            line_rms,
            good_after_fit: tracker.good_site_count(),
            sites: tracker.model().sites().to_vec(),
        });
    }

    write_json_file(&config.output.report_json, &SequenceSummary { frames })?;
    println!("Saved report to {}", config.output.report_json.display());
    Ok(())
}

fn usage() -> String {
    "Usage: track_sequence <config.json>".to_string()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FrameSummary {
    frame: String,
    report: PassReport,
    robust_rejected: usize,
    line_rms: Option<f32>,
    good_after_fit: usize,
    sites: Vec<Site>,
}

#[derive(Debug, Serialize)]
struct SequenceSummary {
    frames: Vec<FrameSummary>,
}
