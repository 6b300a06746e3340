//! Grayscale image views consumed by the tracker, plus file I/O helpers.

pub mod io;
pub mod traits;
pub mod u8;

pub use self::traits::{ImageView, Rows};
pub use self::u8::ImageU8;
