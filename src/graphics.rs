//! Graphics support via embedded-graphics
//!
//! This module provides the [`GraphicDisplay`] struct which wraps [`Display`]
//! and implements the [`DrawTarget`](embedded_graphics_core::draw_target::DrawTarget) trait from
//! the embedded-graphics ecosystem.
//!
//! ## Features
//!
//! - 2D graphics primitives (lines, rectangles, circles, text, etc.)
//! - Four gray levels through [`Color`], or `Gray2`/`BinaryColor` via `From`
//! - Rotation support
//! - Framebuffer and scrambling buffer owned together
//!
//! ## Example
//!
//! ```rust,no_run
//! use embedded_graphics::{
//!     mono_font::{ascii::FONT_6X10, MonoTextStyle},
//!     prelude::*,
//!     primitives::{Circle, Rectangle, PrimitiveStyle},
//!     text::Text,
//! };
//! use uc8156::{Color, GraphicDisplay, UpdateMode};
//! # use core::convert::Infallible;
//! # use embedded_hal::delay::DelayNs;
//! # use embedded_hal::digital::OutputPin;
//! # use embedded_hal::spi::{Operation, SpiDevice};
//! # use uc8156::{Builder, Display, Interface};
//! # use uc8156::panel::PanelVariant;
//! # struct MockSpi;
//! # impl embedded_hal::spi::ErrorType for MockSpi { type Error = Infallible; }
//! # impl SpiDevice for MockSpi {
//! #     fn transaction(
//! #         &mut self,
//! #         _operations: &mut [Operation<'_, u8>],
//! #     ) -> Result<(), Self::Error> {
//! #         Ok(())
//! #     }
//! # }
//! # struct MockPin;
//! # impl embedded_hal::digital::ErrorType for MockPin { type Error = Infallible; }
//! # impl OutputPin for MockPin {
//! #     fn set_low(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! #     fn set_high(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! # struct MockDelay;
//! # impl DelayNs for MockDelay { fn delay_ns(&mut self, _ns: u32) {} }
//! # let interface = Interface::without_busy(MockSpi, MockPin);
//! # let mut delay = MockDelay;
//! # let mut display_driver = Display::new(interface, Builder::new().build());
//! display_driver.bind_panel(PanelVariant::Epd1in1);
//! let buffer_size = match display_driver.geometry() {
//!     Some(geometry) => geometry.buffer_size(),
//!     None => return,
//! };
//!
//! // Create graphic display with framebuffer and scrambling buffer
//! let mut display = GraphicDisplay::new(
//!     display_driver,
//!     vec![0u8; buffer_size],
//!     vec![0u8; buffer_size],
//! );
//!
//! // Clear to white
//! display.clear(Color::White);
//!
//! // Draw shapes
//! let _ = Rectangle::new(Point::new(4, 4), Size::new(30, 20))
//!     .into_styled(PrimitiveStyle::with_fill(Color::DarkGray))
//!     .draw(&mut display);
//!
//! let _ = Circle::new(Point::new(20, 40), 30)
//!     .into_styled(PrimitiveStyle::with_stroke(Color::Black, 2))
//!     .draw(&mut display);
//!
//! // Draw text
//! let _ = Text::new(
//!     "Hello!",
//!     Point::new(4, 90),
//!     MonoTextStyle::new(&FONT_6X10, Color::Black),
//! )
//! .draw(&mut display);
//!
//! // Update physical display
//! let _ = display.update(UpdateMode::Full, &mut delay);
//! ```

use core::convert::Infallible;
use embedded_graphics_core::{
    draw_target::DrawTarget,
    geometry::{OriginDimensions, Point, Size},
    prelude::Pixel,
};
use embedded_hal::delay::DelayNs;

use crate::color::Color;
use crate::display::{Display, UpdateMode};
use crate::error::Error;
use crate::interface::DisplayInterface;
use crate::rotation::apply_rotation;

/// Display with graphics buffers
///
/// This wrapper around [`Display`] provides embedded-graphics support
/// and owns the raster framebuffer plus the buffer pixel data is scrambled
/// into before it is sent to the controller.
///
/// ## Type Parameters
///
/// * `I` - Interface type implementing [`DisplayInterface`]
/// * `B1` - Buffer type implementing `AsMut<[u8]>` for the framebuffer
/// * `B2` - Buffer type implementing `AsMut<[u8]>` for the scrambling buffer
///
/// The scrambling buffer may be empty for panels without scrambling (1.1" and 1.4").
pub struct GraphicDisplay<I, B1, B2>
where
    I: DisplayInterface,
    B1: AsMut<[u8]>,
    B2: AsMut<[u8]>,
{
    /// The underlying display driver
    display: Display<I>,
    /// Raster ordered framebuffer
    buffer: B1,
    /// Scrambling target
    scratch: B2,
}

type GraphicsResult<I> = core::result::Result<(), Error<I>>;
type GraphicsNewResult<I, T> = core::result::Result<T, Error<I>>;

impl<I, B1, B2> GraphicDisplay<I, B1, B2>
where
    I: DisplayInterface,
    B1: AsMut<[u8]>,
    B2: AsMut<[u8]>,
{
    /// Create a new GraphicDisplay
    ///
    /// # Arguments
    ///
    /// * `display` - The [`Display`] driver instance, with a panel bound
    /// * `buffer` - Framebuffer (must be at least `geometry.buffer_size()` bytes)
    /// * `scratch` - Scrambling buffer (same size, unless the panel needs no scrambling)
    ///
    /// # Panics
    ///
    /// Panics if no panel is bound or a buffer is smaller than required. The
    /// buffer size is always calculated from the native geometry regardless
    /// of rotation setting.
    pub fn new(display: Display<I>, mut buffer: B1, mut scratch: B2) -> Self {
        assert!(display.panel().is_some(), "no panel bound to display");
        let required = display.geometry().map_or(0, |g| g.buffer_size());
        assert!(
            buffer.as_mut().len() >= required,
            "buffer too small: required {} bytes, got {}",
            required,
            buffer.as_mut().len()
        );
        let scrambled = display.scramble_config().is_some_and(|c| !c.is_identity());
        assert!(
            !scrambled || scratch.as_mut().len() >= required,
            "scratch too small: required {} bytes, got {}",
            required,
            scratch.as_mut().len()
        );
        Self {
            display,
            buffer,
            scratch,
        }
    }

    /// Try to create a new GraphicDisplay, returning an error if buffers are too small
    ///
    /// This is the fallible version of [`new`](Self::new).
    ///
    /// # Errors
    ///
    /// Returns `Error::PanelNotBound` if no panel is bound, or
    /// `Error::BufferTooSmall` if a buffer is smaller than required.
    pub fn try_new(
        display: Display<I>,
        mut buffer: B1,
        mut scratch: B2,
    ) -> GraphicsNewResult<I, Self> {
        let (Some(geometry), Some(scramble)) = (display.geometry(), display.scramble_config())
        else {
            return Err(Error::PanelNotBound);
        };
        let required = geometry.buffer_size();
        if buffer.as_mut().len() < required {
            return Err(Error::BufferTooSmall {
                required,
                provided: buffer.as_mut().len(),
            });
        }
        if !scramble.is_identity() && scratch.as_mut().len() < required {
            return Err(Error::BufferTooSmall {
                required,
                provided: scratch.as_mut().len(),
            });
        }
        Ok(Self {
            display,
            buffer,
            scratch,
        })
    }

    /// Fill the framebuffer with a color
    pub fn clear(&mut self, color: Color) {
        self.buffer.as_mut().fill(color.fill_byte());
    }

    /// Update the display from the framebuffer
    ///
    /// # Errors
    ///
    /// Returns [`Error::Interface`] if there's a communication error.
    pub fn update<D: DelayNs>(&mut self, mode: UpdateMode, delay: &mut D) -> GraphicsResult<I> {
        self.display
            .update(self.buffer.as_mut(), self.scratch.as_mut(), mode, delay)
    }

    /// Run the ghosting removal cycles
    ///
    /// Leaves the framebuffer all white.
    pub fn white_erase<D: DelayNs>(&mut self, delay: &mut D) -> GraphicsResult<I> {
        self.display.white_erase(self.buffer.as_mut(), delay)
    }

    /// Drive the border black or white, pushing the framebuffer with a Partial update
    pub fn set_border_color<D: DelayNs>(&mut self, color: Color, delay: &mut D) -> GraphicsResult<I> {
        self.display
            .set_border_color(color, self.buffer.as_mut(), self.scratch.as_mut(), delay)
    }

    /// Raw framebuffer contents
    pub fn buffer(&mut self) -> &[u8] {
        self.buffer.as_mut()
    }

    /// Access the underlying Display
    pub fn display(&self) -> &Display<I> {
        &self.display
    }

    /// Access the underlying Display mutably
    ///
    /// This can be used to access low-level operations directly.
    pub fn display_mut(&mut self) -> &mut Display<I> {
        &mut self.display
    }

    /// Set a single pixel to a color
    ///
    /// Internal method used by the [`DrawTarget`] implementation.
    fn set_pixel(&mut self, x: u32, y: u32, color: Color) {
        let Some(geometry) = self.display.geometry() else {
            return;
        };
        let width = geometry.width() as u32;
        let height = geometry.height() as u32;

        let rotation = self.display.config().rotation;
        let (index, shift) = apply_rotation(x, y, width, height, rotation);

        let buffer = self.buffer.as_mut();
        if index >= buffer.len() {
            return;
        }
        buffer[index] = (buffer[index] & !(0b11 << shift)) | (color.code() << shift);
    }
}

impl<I, B1, B2> DrawTarget for GraphicDisplay<I, B1, B2>
where
    I: DisplayInterface,
    B1: AsMut<[u8]>,
    B2: AsMut<[u8]>,
{
    type Color = Color;
    type Error = Infallible;

    fn draw_iter<Iter>(&mut self, pixels: Iter) -> Result<(), Self::Error>
    where
        Iter: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let sz = self.size();

        for Pixel(Point { x, y }, color) in pixels {
            if x < 0 || y < 0 {
                continue;
            }

            let x = x as u32;
            let y = y as u32;

            if x >= sz.width || y >= sz.height {
                continue;
            }

            self.set_pixel(x, y, color);
        }

        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        GraphicDisplay::clear(self, color);
        Ok(())
    }
}

impl<I, B1, B2> OriginDimensions for GraphicDisplay<I, B1, B2>
where
    I: DisplayInterface,
    B1: AsMut<[u8]>,
    B2: AsMut<[u8]>,
{
    fn size(&self) -> Size {
        match self.display.geometry() {
            Some(geometry) => {
                let (width, height) = self.display.config().rotated_size(geometry);
                Size::new(width as u32, height as u32)
            }
            None => Size::zero(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::WRITE_RAM;
    use crate::config::{Builder, Rotation};
    use crate::panel::PanelVariant;
    use alloc::vec;
    use alloc::vec::Vec;
    use embedded_graphics::{
        prelude::*,
        primitives::{PrimitiveStyle, Rectangle},
    };

    #[derive(Debug, Default)]
    struct MockInterface {
        ram: Vec<Vec<u8>>,
    }

    impl DisplayInterface for MockInterface {
        type Error = Infallible;

        fn write_register(&mut self, register: u8, data: &[u8]) -> Result<(), Self::Error> {
            if register == WRITE_RAM {
                self.ram.push(data.to_vec());
            }
            Ok(())
        }

        fn read_register(&mut self, _register: u8, buffer: &mut [u8]) -> Result<(), Self::Error> {
            buffer.fill(0x01);
            Ok(())
        }

        fn reset<D: DelayNs>(&mut self, _delay: &mut D) {}

        fn busy_wait<D: DelayNs>(&mut self, _delay: &mut D) -> Result<(), Self::Error> {
            Ok(())
        }
    }

    struct MockDelay;
    impl DelayNs for MockDelay {
        fn delay_ns(&mut self, _ns: u32) {}
    }

    fn test_display(variant: PanelVariant, rotation: Rotation) -> Display<MockInterface> {
        let config = Builder::new().rotation(rotation).build();
        let mut display = Display::new(MockInterface::default(), config);
        display.bind_panel(variant);
        display
    }

    fn graphic(
        variant: PanelVariant,
        rotation: Rotation,
    ) -> GraphicDisplay<MockInterface, Vec<u8>, Vec<u8>> {
        let size = variant.geometry().buffer_size();
        GraphicDisplay::new(
            test_display(variant, rotation),
            vec![0xFFu8; size],
            vec![0u8; size],
        )
    }

    #[test]
    fn test_size_honors_rotation() {
        let gd = graphic(PanelVariant::Epd3in1, Rotation::Rotate0);
        assert_eq!(gd.size(), Size::new(74, 312));
        let gd = graphic(PanelVariant::Epd3in1, Rotation::Rotate90);
        assert_eq!(gd.size(), Size::new(312, 74));
    }

    #[test]
    fn test_draw_pixel_sets_two_bits() {
        let mut gd = graphic(PanelVariant::Epd1in1, Rotation::Rotate0);
        Pixel(Point::new(1, 0), Color::Black).draw(&mut gd).unwrap();
        Pixel(Point::new(2, 0), Color::DarkGray).draw(&mut gd).unwrap();
        assert_eq!(gd.buffer()[0], 0b11_00_01_11);
        assert!(gd.buffer()[1..].iter().all(|&b| b == 0xFF));
    }

    #[test]
    fn test_draw_out_of_bounds_is_ignored() {
        let mut gd = graphic(PanelVariant::Epd1in1, Rotation::Rotate0);
        Pixel(Point::new(-1, 0), Color::Black).draw(&mut gd).unwrap();
        Pixel(Point::new(72, 0), Color::Black).draw(&mut gd).unwrap();
        Pixel(Point::new(0, 148), Color::Black).draw(&mut gd).unwrap();
        assert!(gd.buffer().iter().all(|&b| b == 0xFF));
    }

    #[test]
    fn test_rotate180_draws_last_pixel() {
        let mut gd = graphic(PanelVariant::Epd1in1, Rotation::Rotate180);
        Pixel(Point::new(0, 0), Color::Black).draw(&mut gd).unwrap();
        let last = gd.buffer().len() - 1;
        assert_eq!(gd.buffer()[last], 0b11_11_11_00);
    }

    #[test]
    fn test_rectangle_fill_row() {
        let mut gd = graphic(PanelVariant::Epd1in1, Rotation::Rotate0);
        Rectangle::new(Point::new(0, 0), Size::new(8, 1))
            .into_styled(PrimitiveStyle::with_fill(Color::LightGray))
            .draw(&mut gd)
            .unwrap();
        assert_eq!(&gd.buffer()[..3], &[0xAA, 0xAA, 0xFF]);
    }

    #[test]
    fn test_clear_fills_buffer() {
        let mut gd = graphic(PanelVariant::Epd1in4, Rotation::Rotate0);
        gd.clear(Color::DarkGray);
        assert!(gd.buffer().iter().all(|&b| b == 0x55));
    }

    #[test]
    fn test_update_sends_framebuffer() {
        let mut gd = graphic(PanelVariant::Epd1in1, Rotation::Rotate0);
        gd.clear(Color::LightGray);
        gd.update(UpdateMode::Full, &mut MockDelay).unwrap();
        let ram = &gd.display_mut().interface().ram;
        assert_eq!(ram.len(), 1);
        assert!(ram[0].iter().all(|&b| b == 0xAA));
    }

    #[test]
    fn test_white_erase_leaves_white_buffer() {
        let mut gd = graphic(PanelVariant::Epd2in1, Rotation::Rotate0);
        gd.clear(Color::Black);
        gd.white_erase(&mut MockDelay).unwrap();
        assert!(gd.buffer().iter().all(|&b| b == 0xFF));
        assert_eq!(gd.display_mut().interface().ram.len(), 3);
    }

    #[test]
    fn test_identity_panel_accepts_empty_scratch() {
        let display = test_display(PanelVariant::Epd1in1, Rotation::Rotate0);
        let size = PanelVariant::Epd1in1.geometry().buffer_size();
        let result = GraphicDisplay::try_new(display, vec![0u8; size], Vec::new());
        assert!(result.is_ok());
    }

    #[test]
    fn test_try_new_small_scratch_returns_error() {
        let display = test_display(PanelVariant::Epd3in1, Rotation::Rotate0);
        let size = PanelVariant::Epd3in1.geometry().buffer_size();
        let result = GraphicDisplay::try_new(display, vec![0u8; size], vec![0u8; size - 1]);
        assert!(matches!(result, Err(Error::BufferTooSmall { .. })));
    }

    #[test]
    fn test_try_new_without_panel_returns_error() {
        let display = Display::new(MockInterface::default(), Builder::new().build());
        let result = GraphicDisplay::try_new(display, vec![0u8; 16], vec![0u8; 16]);
        assert!(matches!(result, Err(Error::PanelNotBound)));
    }

    #[test]
    #[should_panic(expected = "buffer too small")]
    fn test_new_panics_on_small_buffer() {
        let display = test_display(PanelVariant::Epd1in1, Rotation::Rotate0);
        let _ = GraphicDisplay::new(display, vec![0u8; 10], vec![0u8; 10]);
    }
}
