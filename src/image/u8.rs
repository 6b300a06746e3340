/// Borrowed 8-bit grayscale frame.
///
/// `w`/`h` are columns/rows; `stride` is the number of bytes between rows.
#[derive(Clone, Debug)]
pub struct ImageU8<'a> {
    pub w: usize,
    pub h: usize,
    pub stride: usize,
    pub data: &'a [u8],
}

impl<'a> ImageU8<'a> {
    /// Tightly packed view over `data` (`stride == w`).
    pub fn packed(w: usize, h: usize, data: &'a [u8]) -> Self {
        Self {
            w,
            h,
            stride: w,
            data,
        }
    }

    /// Pixel lookup with signed coordinates; `None` outside the frame.
    #[inline]
    pub fn get_checked(&self, x: isize, y: isize) -> Option<u8> {
        if x < 0 || y < 0 || x as usize >= self.w || y as usize >= self.h {
            return None;
        }
        self.data.get(y as usize * self.stride + x as usize).copied()
    }

    /// True when the buffer is large enough for the declared geometry.
    pub fn is_consistent(&self) -> bool {
        self.stride >= self.w
            && (self.h == 0 || self.data.len() >= (self.h - 1) * self.stride + self.w)
    }
}

impl<'a> crate::image::traits::ImageView for ImageU8<'a> {
    type Pixel = u8;

    #[inline]
    fn width(&self) -> usize {
        self.w
    }
    #[inline]
    fn height(&self) -> usize {
        self.h
    }
    #[inline]
    fn row(&self, y: usize) -> &[u8] {
        let start = y * self.stride;
        &self.data[start..start + self.w]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::ImageView;

    #[test]
    fn checked_access_respects_bounds() {
        let data = [1u8, 2, 3, 4, 5, 6];
        let img = ImageU8::packed(3, 2, &data);
        assert_eq!(img.get_checked(2, 1), Some(6));
        assert_eq!(img.get_checked(3, 0), None);
        assert_eq!(img.get_checked(-1, 0), None);
        assert!(img.is_consistent());
        assert_eq!(img.rows().count(), 2);
    }

    #[test]
    fn short_buffer_is_inconsistent() {
        let data = [0u8; 5];
        let img = ImageU8::packed(3, 2, &data);
        assert!(!img.is_consistent());
    }
}
