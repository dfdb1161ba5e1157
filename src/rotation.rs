//! Coordinate rotation utilities
//!
//! This module maps logical pixel coordinates to their location in the packed
//! 2-bit framebuffer when the display is rotated.
//!
//! The framebuffer is raster ordered in native panel orientation: sources run
//! along x, gates along y, four pixels per byte with the first pixel in the
//! two most significant bits.
//!
//! ## Rotation Modes
//!
//! - **Rotate0**: Native orientation
//! - **Rotate90**: 90° clockwise, width and height swapped
//! - **Rotate180**: 180° rotation, origin at bottom-right
//! - **Rotate270**: 270° clockwise (or 90° counter-clockwise)
//!
//! ## Example
//!
//! ```
//! use uc8156::{rotation::apply_rotation, Rotation};
//!
//! // On a 72x148 panel, pixel (0,0) is the top bits of byte 0
//! let (idx, shift) = apply_rotation(0, 0, 72, 148, Rotation::Rotate0);
//! assert_eq!((idx, shift), (0, 6));
//!
//! // Pixel (3,0) is the low bits of the same byte
//! let (idx, shift) = apply_rotation(3, 0, 72, 148, Rotation::Rotate0);
//! assert_eq!((idx, shift), (0, 0));
//! ```

use crate::config::Rotation;

/// Apply rotation transformation to get buffer index and bit shift
///
/// Converts logical (x, y) coordinates to physical buffer location
/// (byte_index, shift) based on the specified rotation.
///
/// # Arguments
///
/// * `x` - X coordinate in the rotated frame
/// * `y` - Y coordinate in the rotated frame
/// * `width` - Native width in pixels (source count)
/// * `height` - Native height in pixels (gate count)
/// * `rotation` - Rotation mode
///
/// # Returns
///
/// Returns a tuple of (byte_index, shift):
/// - `byte_index`: Index into the buffer array
/// - `shift`: Left shift of the pixel's 2-bit code within the byte (6, 4, 2 or 0)
pub fn apply_rotation(x: u32, y: u32, width: u32, height: u32, rotation: Rotation) -> (usize, u8) {
    let (column, row) = match rotation {
        Rotation::Rotate0 => (x, y),
        Rotation::Rotate90 => (width - 1 - y, x),
        Rotation::Rotate180 => (width - 1 - x, height - 1 - y),
        Rotation::Rotate270 => (y, height - 1 - x),
    };
    let index = row as usize * width as usize + column as usize;
    (index / 4, ((3 - index % 4) * 2) as u8)
}
