//! Grayscale colors for 2-bit e-paper displays
//!
//! This module defines the [`Color`] enum for the four gray levels supported
//! by Plastic Logic panels driven by the UC8156 controller.
//!
//! ## Color Representation
//!
//! Each pixel is a 2-bit code, packed four pixels per byte with the first
//! pixel in the most significant bit pair:
//!
//! | Color      | Code | Fill byte |
//! |------------|------|-----------|
//! | Black      | 0b00 | 0x00      |
//! | Dark gray  | 0b01 | 0x55      |
//! | Light gray | 0b10 | 0xAA      |
//! | White      | 0b11 | 0xFF      |
//!
//! ## Example
//!
//! ```
//! use uc8156::Color;
//!
//! assert_eq!(Color::DarkGray.code(), 0b01);
//! assert_eq!(Color::LightGray.fill_byte(), 0xAA);
//! assert_eq!(Color::from_code(0b11), Color::White);
//! ```

/// Gray levels supported by the UC8156
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Color {
    /// Black pixels
    Black,
    /// Dark gray pixels
    DarkGray,
    /// Light gray pixels
    LightGray,
    /// White pixels
    White,
}

#[cfg(feature = "graphics")]
impl embedded_graphics_core::prelude::PixelColor for Color {
    type Raw = embedded_graphics_core::pixelcolor::raw::RawU2;
}

#[cfg(feature = "graphics")]
impl From<embedded_graphics_core::pixelcolor::Gray2> for Color {
    fn from(color: embedded_graphics_core::pixelcolor::Gray2) -> Self {
        use embedded_graphics_core::pixelcolor::GrayColor;
        Self::from_code(color.luma())
    }
}

#[cfg(feature = "graphics")]
impl From<embedded_graphics_core::pixelcolor::BinaryColor> for Color {
    fn from(color: embedded_graphics_core::pixelcolor::BinaryColor) -> Self {
        match color {
            embedded_graphics_core::pixelcolor::BinaryColor::On => Self::Black,
            embedded_graphics_core::pixelcolor::BinaryColor::Off => Self::White,
        }
    }
}

impl Color {
    /// Get the 2-bit pixel code
    pub fn code(self) -> u8 {
        match self {
            Self::Black => 0b00,
            Self::DarkGray => 0b01,
            Self::LightGray => 0b10,
            Self::White => 0b11,
        }
    }

    /// Build a color from a 2-bit code
    ///
    /// Only the two low bits are used.
    pub fn from_code(code: u8) -> Self {
        match code & 0b11 {
            0b00 => Self::Black,
            0b01 => Self::DarkGray,
            0b10 => Self::LightGray,
            _ => Self::White,
        }
    }

    /// Quantize an 8-bit gray level to the nearest of the four panel levels
    ///
    /// ```
    /// use uc8156::Color;
    ///
    /// assert_eq!(Color::from_gray_level(0x10), Color::Black);
    /// assert_eq!(Color::from_gray_level(0x60), Color::DarkGray);
    /// assert_eq!(Color::from_gray_level(0xA0), Color::LightGray);
    /// assert_eq!(Color::from_gray_level(0xF0), Color::White);
    /// ```
    pub fn from_gray_level(level: u8) -> Self {
        Self::from_code(level >> 6)
    }

    /// Get a byte with all four pixels set to this color
    pub fn fill_byte(self) -> u8 {
        self.code() * 0x55
    }
}
