//! Point-wise Sobel gradient on an 8-bit frame.

use crate::image::ImageU8;

type Kernel3 = [[f32; 3]; 3];

const SOBEL_KERNEL_X: Kernel3 = [[-1.0, 0.0, 1.0], [-2.0, 0.0, 2.0], [-1.0, 0.0, 1.0]];
const SOBEL_KERNEL_Y: Kernel3 = [[-1.0, -2.0, -1.0], [0.0, 0.0, 0.0], [1.0, 2.0, 1.0]];

/// Sobel `[gx, gy]` at pixel `(x, y)`; `None` unless the 3×3 window fits.
pub fn sobel_at(image: &ImageU8<'_>, x: isize, y: isize) -> Option<[f32; 2]> {
    let mut gx = 0.0f32;
    let mut gy = 0.0f32;
    for ky in 0..3 {
        for kx in 0..3 {
            let px = image.get_checked(x + kx as isize - 1, y + ky as isize - 1)? as f32;
            gx += SOBEL_KERNEL_X[ky][kx] * px;
            gy += SOBEL_KERNEL_Y[ky][kx] * px;
        }
    }
    Some([gx, gy])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn horizontal_ramp_has_positive_gx() {
        let w = 8;
        let data: Vec<u8> = (0..w * w).map(|i| ((i % w) * 10) as u8).collect();
        let img = ImageU8::packed(w, w, &data);
        let g = sobel_at(&img, 4, 4).unwrap();
        assert!((g[0] - 80.0).abs() < 1e-4, "gx={}", g[0]);
        assert!(g[1].abs() < 1e-4);
    }

    #[test]
    fn border_pixels_have_no_gradient() {
        let data = vec![0u8; 16];
        let img = ImageU8::packed(4, 4, &data);
        assert!(sobel_at(&img, 0, 2).is_none());
        assert!(sobel_at(&img, 2, 3).is_none());
        assert!(sobel_at(&img, 1, 1).is_some());
    }
}
