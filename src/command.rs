//! UC8156 register definitions
//!
//! This module defines the register addresses of the UC8156 e-paper display
//! controller, along with the fixed data values the update protocol writes.
//!
//! ## Register Access
//!
//! The UC8156 has no Data/Command pin. Every access is a single chip-select
//! frame:
//! 1. Assert CS
//! 2. Send the register address (with [`READ_FLAG`] set for reads)
//! 3. Send or receive the data bytes
//! 4. Deassert CS
//!
//! ## Example
//!
//! ```rust,no_run
//! use uc8156::{command, DisplayInterface, Interface};
//! # use core::convert::Infallible;
//! # use embedded_hal::digital::{InputPin, OutputPin};
//! # use embedded_hal::spi::{Operation, SpiDevice};
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
//! # let mut interface = Interface::without_busy(MockSpi, MockPin);
//! // Read the silicon revision
//! let mut revision = [0u8; 1];
//! let _ = interface.read_register(command::REVISION, &mut revision);
//!
//! // Lock the border electrode
//! let _ = interface.write_register(command::BORDER_SETTING, &[command::BORDER_LOCKED]);
//! ```

/// Bit OR-ed into the register address to request a read
pub const READ_FLAG: u8 = 0x80;

// Identification and status

/// Revision register (0x00, read only)
///
/// Reads zero when no controller is answering on the bus.
pub const REVISION: u8 = 0x00;

/// Status register (0x15, read only)
///
/// Reads non-zero once the internal charge pump is ready after power-up.
pub const STATUS: u8 = 0x15;

// Panel configuration

/// Panel setting register (0x01)
///
/// Requires 1 byte (panel specific).
pub const PANEL_SETTING: u8 = 0x01;

/// Driver voltage setting register (0x02)
///
/// Requires 2 bytes.
pub const DRIVER_VOLTAGE: u8 = 0x02;

/// Power control register (0x03)
///
/// Requires 1 byte, see [`POWER_ON`], [`POWER_OFF`] and [`POWER_STANDBY`].
pub const POWER_CONTROL: u8 = 0x03;

/// Boost setting register (0x04)
///
/// Requires 2 bytes.
pub const BOOST_SETTING: u8 = 0x04;

/// TCOM timing register (0x06)
///
/// Requires 2 bytes.
pub const TCOM_TIMING: u8 = 0x06;

/// Initial temperature register (0x07)
///
/// Requires 1 byte.
pub const INIT_TEMPERATURE: u8 = 0x07;

/// Resolution setting register (0x0C)
///
/// Requires 4 bytes: [source start, source end, gate start, gate end]
pub const SET_RESOLUTION: u8 = 0x0C;

/// Write pixel rectangle register (0x0D)
///
/// Defines the RAM window written by [`WRITE_RAM`].
/// Requires 4 bytes: [source start, source end, gate start, gate end]
pub const WRITE_PIXEL_RECT: u8 = 0x0D;

/// Pixel access position register (0x0E)
///
/// Sets the RAM address counter. Requires 2 bytes: [source, gate]
pub const PIXEL_ACCESS_POS: u8 = 0x0E;

/// Data entry mode register (0x0F)
///
/// Controls the RAM address counter direction. Requires 1 byte.
pub const DATA_ENTRY_MODE: u8 = 0x0F;

/// Write RAM register (0x10)
///
/// Followed by the packed 2-bit pixel data.
pub const WRITE_RAM: u8 = 0x10;

/// Display engine control register (0x14)
///
/// Writing a trigger value starts the display update.
pub const DISPLAY_ENGINE: u8 = 0x14;

/// VCOM configuration register (0x18)
///
/// Requires 4 bytes (panel specific).
pub const VCOM_CONFIG: u8 = 0x18;

/// Border setting register (0x1D)
///
/// Requires 1 byte, see [`BORDER_BLACK`], [`BORDER_WHITE`] and [`BORDER_LOCKED`].
pub const BORDER_SETTING: u8 = 0x1D;

/// Power sequence register (0x1F)
///
/// Requires 3 bytes.
pub const POWER_SEQUENCE: u8 = 0x1F;

/// Software reset register (0x20, write only)
pub const SOFTWARE_RESET: u8 = 0x20;

/// Sleep mode register (0x21)
///
/// Writing [`SLEEP_MODE_ENTER`] enters deep sleep. Only a hardware reset wakes the chip.
pub const SLEEP_MODE: u8 = 0x21;

// MTP access

/// Program MTP register (0x40)
///
/// Also selects the waveform and MTP read-out mode, see [`MTP_NORMAL`] and [`MTP_MONO`].
pub const PROGRAM_MTP: u8 = 0x40;

/// MTP address setting register (0x41)
///
/// Requires 2 bytes: the MTP address to read from.
pub const MTP_ADDRESS: u8 = 0x41;

/// MTP read register (0x43)
///
/// Each read returns the next byte of MTP; the first read after setting the
/// address is a dummy byte.
pub const MTP_READ: u8 = 0x43;

/// Load mono waveform register (0x44)
///
/// Requires 1 byte.
pub const LOAD_MONO_WAVEFORM: u8 = 0x44;

// Data values

/// MTP address of the panel identification bytes
pub const MTP_ID_ADDRESS: [u8; 2] = [0xF2, 0x04];

/// PROGRAM_MTP value selecting the greyscale waveform
pub const MTP_NORMAL: u8 = 0x00;

/// PROGRAM_MTP value selecting the mono waveform (also used for MTP read-out)
pub const MTP_MONO: u8 = 0x02;

/// DISPLAY_ENGINE trigger for a full update
pub const ENGINE_FULL_UPDATE: u8 = 0x03;

/// DISPLAY_ENGINE trigger for a partial (changed pixels only) update
pub const ENGINE_PARTIAL_UPDATE: u8 = 0x07;

/// POWER_CONTROL value enabling the charge pump
pub const POWER_ON: u8 = 0xD1;

/// POWER_CONTROL value disabling the charge pump
pub const POWER_OFF: u8 = 0xD0;

/// POWER_CONTROL value for the final low-power state
pub const POWER_STANDBY: u8 = 0xC0;

/// BORDER_SETTING value driving the border electrode black
pub const BORDER_BLACK: u8 = 0x07;

/// BORDER_SETTING value driving the border electrode white
pub const BORDER_WHITE: u8 = 0xF7;

/// BORDER_SETTING value keeping the border unchanged across updates
pub const BORDER_LOCKED: u8 = 0x04;

/// SLEEP_MODE payload entering deep sleep
pub const SLEEP_MODE_ENTER: [u8; 4] = [0xFF, 0xFF, 0xFF, 0xFF];

/// DRIVER_VOLTAGE payload written at init
pub const DRIVER_VOLTAGE_DEFAULT: [u8; 2] = [0x25, 0xFF];

/// LOAD_MONO_WAVEFORM payload written at init
pub const MONO_WAVEFORM_DEFAULT: u8 = 0x60;

/// INIT_TEMPERATURE payload written at init
pub const INIT_TEMPERATURE_DEFAULT: u8 = 0x0A;

/// BOOST_SETTING payload written at init
pub const BOOST_SETTING_DEFAULT: [u8; 2] = [0x22, 0x17];

/// TCOM_TIMING payload written at power-up
pub const TCOM_TIMING_DEFAULT: [u8; 2] = [0x67, 0x55];

/// POWER_SEQUENCE payload written at power-up
pub const POWER_SEQUENCE_DEFAULT: [u8; 3] = [0x00, 0x00, 0x00];
