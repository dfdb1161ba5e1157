//! UC8156 E-Paper Display Driver
//!
//! A driver for Plastic Logic e-paper panels on the UltraChip UC8156
//! controller, with four gray levels per pixel.
//!
//! ## Features
//!
//! - `no_std` compatible
//! - `embedded-hal` v1.0 support
//! - `embedded-graphics` integration (with `graphics` feature)
//! - Panel identification from controller MTP memory
//! - Pixel scrambling for panels whose electrodes are not wired in raster order
//! - Full, partial and mono updates
//! - Rotation support
//!
//! ## Supported Panels
//!
//! | Panel | Gates | Sources | Scrambling |
//! |-------|-------|---------|------------|
//! | 1.1"  | 148   | 72      | none       |
//! | 1.4"  | 100   | 180     | none       |
//! | 2.1"  | 146   | 240     | mirror lower half |
//! | 3.1"  | 312   | 74      | source fold, odd line first |
//!
//! ## Usage
//!
//! ```rust,no_run
//! use core::convert::Infallible;
//! use embedded_hal::delay::DelayNs;
//! use embedded_hal::digital::{InputPin, OutputPin};
//! use embedded_hal::spi::{Operation, SpiDevice};
//! use uc8156::{Builder, Display, Interface, Rotation, UpdateMode};
//!
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
//! # impl InputPin for MockPin {
//! #     fn is_high(&mut self) -> Result<bool, Self::Error> { Ok(true) }
//! #     fn is_low(&mut self) -> Result<bool, Self::Error> { Ok(false) }
//! # }
//! # struct MockDelay;
//! # impl DelayNs for MockDelay { fn delay_ns(&mut self, _ns: u32) {} }
//! # let spi = MockSpi;
//! # let rst = MockPin;
//! # let busy = MockPin;
//! # let mut delay = MockDelay;
//! let interface = Interface::new(spi, rst, busy);
//! let config = Builder::new().rotation(Rotation::Rotate0).build();
//!
//! let mut display = Display::new(interface, config);
//! let panel = match display.reset(&mut delay) {
//!     Ok(panel) => panel,
//!     Err(_) => return,
//! };
//! if display.init(&mut delay).is_err() {
//!     return;
//! }
//!
//! let size = panel.geometry().buffer_size();
//! let frame = vec![0xFFu8; size];
//! let mut scratch = vec![0u8; size];
//! let _ = display.update(&frame, &mut scratch, UpdateMode::Full, &mut delay);
//! ```

#![no_std]

#[cfg(any(test, feature = "alloc"))]
extern crate alloc;

/// Four-level grayscale color type
pub mod color;
/// UC8156 register definitions
pub mod command;
/// Display configuration types and builder
pub mod config;
/// Core display operations
pub mod display;
/// Error types for the driver
pub mod error;
/// Hardware interface abstraction
pub mod interface;
/// Panel variants and identification
pub mod panel;
/// Coordinate rotation utilities
pub mod rotation;
/// Pixel scrambling from raster order to panel wiring order
pub mod scrambler;

/// Graphics support via embedded-graphics (requires `graphics` feature)
#[cfg(feature = "graphics")]
pub mod graphics;

pub use color::Color;
pub use config::{Builder, Config, Geometry, Rotation, UnknownPanelPolicy};
pub use display::{Display, UpdateMode, UpdatePhase};
pub use error::{BuilderError, Error, InvalidUpdateMode, ScrambleError};
pub use interface::InterfaceError;
pub use interface::{DEFAULT_BUSY_TIMEOUT_MS, DisplayInterface, Interface, NoBusyPin};
pub use panel::PanelVariant;
pub use scrambler::ScrambleConfig;

#[cfg(feature = "graphics")]
pub use graphics::GraphicDisplay;
