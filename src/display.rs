//! Colour-coded site markers drawn over a frame.
//!
//! Read-only consumer of the contour model: one colour per suppression state,
//! crosses centred on the rounded site positions.

use crate::contour::ContourModel;
use crate::error::SampleError;
use crate::image::{ImageU8, ImageView};
use crate::site::SuppressionState;
use image::{Rgb, RgbImage};

/// How a site in a given state is drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MarkerStyle {
    pub color: [u8; 3],
    /// Arm length of the cross in pixels.
    pub half_size: u32,
}

pub fn marker_style(state: SuppressionState) -> MarkerStyle {
    match state {
        SuppressionState::Valid => MarkerStyle {
            color: [255, 0, 0],
            half_size: 2,
        },
        SuppressionState::ContrastRejected => MarkerStyle {
            color: [255, 255, 255],
            half_size: 2,
        },
        SuppressionState::ThresholdRejected => MarkerStyle {
            color: [0, 0, 255],
            half_size: 2,
        },
        SuppressionState::RobustRejected => MarkerStyle {
            color: [0, 255, 0],
            half_size: 3,
        },
    }
}

/// Grayscale-to-RGB copy of `image` with one cross per site.
///
/// Fails on a view whose buffer is shorter than its declared geometry.
pub fn render_overlay(
    image: &ImageU8<'_>,
    model: &ContourModel,
) -> Result<RgbImage, SampleError> {
    if !image.is_consistent() {
        return Err(SampleError::EmptyImage);
    }
    let (w, h) = (image.width() as u32, image.height() as u32);
    let mut out = RgbImage::new(w, h);
    for (y, row) in image.rows().enumerate() {
        for (x, &v) in row.iter().enumerate() {
            out.put_pixel(x as u32, y as u32, Rgb([v, v, v]));
        }
    }
    for site in model {
        let (x, y) = site.pixel();
        draw_cross(&mut out, x, y, marker_style(site.state));
    }
    Ok(out)
}

fn draw_cross(out: &mut RgbImage, x: isize, y: isize, style: MarkerStyle) {
    let (w, h) = (out.width() as isize, out.height() as isize);
    let s = style.half_size as isize;
    for d in -s..=s {
        for (px, py) in [(x + d, y), (x, y + d)] {
            if px >= 0 && py >= 0 && px < w && py < h {
                out.put_pixel(px as u32, py as u32, Rgb(style.color));
            }
        }
    }
}
