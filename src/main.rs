use moving_edges::image::ImageU8;
use moving_edges::{ContourModel, Tracker, TrackingParams};

fn main() {
    env_logger::init();
    // A synthetic vertical edge drifting right by one pixel per frame.
    let w = 320usize;
    let h = 240usize;
    let frames: Vec<Vec<u8>> = (0..5).map(|k| vertical_edge(w, h, 150 + k)).collect();

    let model = match ContourModel::from_line([150.0, 30.0], [150.0, 210.0], 6.0) {
        Ok(model) => model,
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(1);
        }
    };
    let mut tracker = match Tracker::new(TrackingParams::default(), model) {
        Ok(tracker) => tracker,
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(1);
        }
    };

    for (k, frame) in frames.iter().enumerate() {
        let img = ImageU8::packed(w, h, frame);
        let res = if k == 0 {
            tracker.initialize_tracking(&img)
        } else {
            tracker.track(&img)
        };
        match res {
            Ok(report) => println!(
                "frame={k} good={} total={} mean_disp={:.2} latency_ms={:.3}",
                report.good, report.total, report.mean_displacement, report.elapsed_ms
            ),
            Err(err) => {
                eprintln!("Error: {err}");
                std::process::exit(1);
            }
        }
    }
}

fn vertical_edge(w: usize, h: usize, edge_x: usize) -> Vec<u8> {
    let mut data = vec![30u8; w * h];
    for row in data.chunks_exact_mut(w) {
        row[edge_x] = 115;
        for px in &mut row[edge_x + 1..] {
            *px = 200;
        }
    }
    data
}
