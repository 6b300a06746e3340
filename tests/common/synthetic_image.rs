/// Grey levels of the synthetic edge: dark side, edge column, bright side.
pub const DARK: u8 = 20;
pub const EDGE: u8 = 120;
pub const BRIGHT: u8 = 220;

/// Vertical step edge with a single mid-grey column at `edge_x`, so the
/// strongest oriented response is unique.
pub fn vertical_ramp_edge(width: usize, height: usize, edge_x: usize) -> Vec<u8> {
    vertical_ramp_edge_rows(width, height, edge_x, 0..height)
}

/// Same as [`vertical_ramp_edge`] but only on `rows`; every other row is
/// uniformly dark.
pub fn vertical_ramp_edge_rows(
    width: usize,
    height: usize,
    edge_x: usize,
    rows: std::ops::Range<usize>,
) -> Vec<u8> {
    assert!(width > 0 && height > 0, "image dimensions must be positive");
    assert!(edge_x < width, "edge column must lie inside the image");

    let mut img = vec![DARK; width * height];
    for (y, row) in img.chunks_exact_mut(width).enumerate() {
        if !rows.contains(&y) {
            continue;
        }
        row[edge_x] = EDGE;
        for px in &mut row[edge_x + 1..] {
            *px = BRIGHT;
        }
    }
    img
}

/// Constant image.
pub fn uniform(width: usize, height: usize, value: u8) -> Vec<u8> {
    vec![value; width * height]
}
