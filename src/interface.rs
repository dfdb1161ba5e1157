//! Hardware interface abstraction
//!
//! This module provides the [`DisplayInterface`] trait and the [`Interface`] struct
//! for communicating with the UC8156 controller over SPI.
//!
//! ## Hardware Requirements
//!
//! The UC8156 requires:
//! - SPI bus (MOSI + MISO + SCK), with CS handled by the [`SpiDevice`]
//! - 1 or 2 GPIO pins:
//!   - **RST**: Reset (output, active low)
//!   - **BUSY**: Busy status (input, active low, optional)
//!
//! Without a BUSY line the interface waits a fixed delay wherever the chip
//! would signal ready.
//!
//! ## Example
//!
//! ```rust,no_run
//! use embedded_hal::delay::DelayNs;
//! use embedded_hal::digital::{InputPin, OutputPin};
//! use embedded_hal::spi::{Operation, SpiDevice};
//! use uc8156::{command, DisplayInterface, Interface};
//! # use core::convert::Infallible;
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
//! # let mut delay = MockDelay;
//! // Create interface with SPI, reset and busy pins
//! let mut interface = Interface::new(MockSpi, MockPin, MockPin);
//!
//! // Write a register
//! let _ = interface.write_register(command::BORDER_SETTING, &[command::BORDER_LOCKED]);
//!
//! // Read a register
//! let mut status = [0u8; 1];
//! let _ = interface.read_register(command::STATUS, &mut status);
//!
//! // Wait for display ready
//! let _ = interface.busy_wait(&mut delay);
//! ```

use core::convert::Infallible;
use core::fmt::Debug;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::spi::{Operation, SpiDevice};

use crate::command::READ_FLAG;

type InterfaceResult<T, E> = core::result::Result<T, E>;

/// Trait for hardware interface to UC8156 controller
///
/// This trait abstracts over different hardware implementations,
/// allowing the [`Display`](crate::display::Display) to work with any
/// SPI + GPIO implementation that satisfies embedded-hal traits.
///
/// ## Implementing
///
/// For most cases, use the provided [`Interface`] struct. If you need
/// custom behavior (e.g., a bit-banged bus, manual CS control),
/// implement this trait on your own type.
pub trait DisplayInterface {
    /// Error type for interface operations
    ///
    /// Must implement [`Debug`] for error reporting.
    type Error: Debug;

    /// Write a register
    ///
    /// The implementation must send the register address followed by `data`
    /// within one chip-select frame.
    ///
    /// # Errors
    ///
    /// Returns an error if SPI communication fails.
    #[allow(clippy::type_complexity)]
    fn write_register(&mut self, register: u8, data: &[u8]) -> InterfaceResult<(), Self::Error>;

    /// Read a register
    ///
    /// The implementation must send `register | READ_FLAG` and then clock in
    /// `buffer.len()` bytes within one chip-select frame.
    ///
    /// # Errors
    ///
    /// Returns an error if SPI communication fails.
    #[allow(clippy::type_complexity)]
    fn read_register(&mut self, register: u8, buffer: &mut [u8])
    -> InterfaceResult<(), Self::Error>;

    /// Perform hardware reset
    ///
    /// The implementation must drive RST high for 5ms, low for 5ms, high
    /// again, then wait 35ms for the chip's internal power-up.
    ///
    /// # Arguments
    ///
    /// * `delay` - Delay implementation for timing
    fn reset<D: DelayNs>(&mut self, delay: &mut D);

    /// Wait until the controller is ready
    ///
    /// Polls the BUSY line if one is wired, otherwise waits a fixed delay.
    ///
    /// # Arguments
    ///
    /// * `delay` - Delay implementation for polling interval
    ///
    /// # Errors
    ///
    /// Returns [`InterfaceError::Timeout`] if BUSY doesn't release within
    /// the implementation-specific timeout period.
    #[allow(clippy::type_complexity)]
    fn busy_wait<D: DelayNs>(&mut self, delay: &mut D) -> InterfaceResult<(), Self::Error>;
}

/// Errors that can occur at the interface level
///
/// Generic over SPI and GPIO error types.
#[derive(Debug)]
pub enum InterfaceError<SpiErr, PinErr> {
    /// SPI communication error
    Spi(SpiErr),
    /// GPIO pin error
    Pin(PinErr),
    /// Timeout waiting for busy pin
    Timeout,
}

impl<SpiErr: Debug, PinErr: Debug> core::fmt::Display for InterfaceError<SpiErr, PinErr> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Spi(e) => write!(f, "SPI error: {e:?}"),
            Self::Pin(e) => write!(f, "Pin error: {e:?}"),
            Self::Timeout => write!(f, "Timeout waiting for display"),
        }
    }
}

impl<SpiErr: Debug, PinErr: Debug> core::error::Error for InterfaceError<SpiErr, PinErr> {}

/// Default timeout for busy-wait in milliseconds
pub const DEFAULT_BUSY_TIMEOUT_MS: u32 = 30_000;

/// Default wait in milliseconds used in place of BUSY when no line is wired
pub const DEFAULT_BUSY_FALLBACK_MS: u32 = 5;

/// Placeholder for a BUSY line that is not connected
///
/// Used by [`Interface::without_busy`]. It is never read.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoBusyPin;

impl embedded_hal::digital::ErrorType for NoBusyPin {
    type Error = Infallible;
}

impl InputPin for NoBusyPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(true)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(false)
    }
}

/// Hardware interface implementation for UC8156
///
/// Implements [`DisplayInterface`] for embedded-hal v1.0 SPI and GPIO traits.
/// Each register access is one [`SpiDevice::transaction`], so the bus stays
/// locked and CS asserted for the whole command.
///
/// ## Type Parameters
///
/// * `SPI` - SPI device implementing [`SpiDevice`]
/// * `RST` - Reset pin implementing [`OutputPin`]
/// * `BUSY` - Busy pin implementing [`InputPin`] ([`NoBusyPin`] if not wired)
///
/// ## Example
///
/// ```rust,no_run
/// use uc8156::{Builder, Display, Interface};
/// # use core::convert::Infallible;
/// # use embedded_hal::digital::OutputPin;
/// # use embedded_hal::spi::{Operation, SpiDevice};
/// # struct MockSpi;
/// # impl embedded_hal::spi::ErrorType for MockSpi { type Error = Infallible; }
/// # impl SpiDevice for MockSpi {
/// #     fn transaction(
/// #         &mut self,
/// #         _operations: &mut [Operation<'_, u8>],
/// #     ) -> Result<(), Self::Error> {
/// #         Ok(())
/// #     }
/// # }
/// # struct MockPin;
/// # impl embedded_hal::digital::ErrorType for MockPin { type Error = Infallible; }
/// # impl OutputPin for MockPin {
/// #     fn set_low(&mut self) -> Result<(), Self::Error> { Ok(()) }
/// #     fn set_high(&mut self) -> Result<(), Self::Error> { Ok(()) }
/// # }
/// // Board without a BUSY connection
/// let interface = Interface::without_busy(
///     MockSpi,  // SpiDevice
///     MockPin,  // OutputPin
/// );
///
/// // Use with Display
/// let _display = Display::new(interface, Builder::new().build());
/// ```
pub struct Interface<SPI, RST, BUSY> {
    /// SPI device for communication
    spi: SPI,
    /// Reset pin (active low)
    rst: RST,
    /// Busy pin (active low), if wired
    busy: Option<BUSY>,
    /// Timeout for busy-wait in milliseconds
    busy_timeout_ms: u32,
    /// Busy pin polarity (true = active high, false = active low)
    busy_active_high: bool,
    /// Fixed wait used when no busy pin is wired
    busy_fallback_ms: u32,
}

impl<SPI, RST, BUSY> Interface<SPI, RST, BUSY>
where
    SPI: SpiDevice,
    RST: OutputPin,
    BUSY: InputPin,
{
    /// Create a new Interface with a BUSY line
    ///
    /// # Arguments
    ///
    /// * `spi` - SPI device (must implement [`SpiDevice`])
    /// * `rst` - Reset pin (output, active low)
    /// * `busy` - Busy pin (input, active low)
    pub fn new(spi: SPI, rst: RST, busy: BUSY) -> Self {
        Self {
            spi,
            rst,
            busy: Some(busy),
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
            busy_active_high: false,
            busy_fallback_ms: DEFAULT_BUSY_FALLBACK_MS,
        }
    }

    /// Set the busy-wait timeout in milliseconds
    ///
    /// Default is 30,000ms (30 seconds). Set to 0 to disable timeout.
    pub fn set_busy_timeout(&mut self, timeout_ms: u32) -> &mut Self {
        self.busy_timeout_ms = timeout_ms;
        self
    }

    /// Get the current busy-wait timeout in milliseconds
    pub fn busy_timeout(&self) -> u32 {
        self.busy_timeout_ms
    }

    /// Set busy pin polarity
    ///
    /// Default is active-low, as on the UC8156.
    pub fn set_busy_active_high(&mut self, active_high: bool) -> &mut Self {
        self.busy_active_high = active_high;
        self
    }

    /// Get busy pin polarity (true = active high)
    pub fn busy_active_high(&self) -> bool {
        self.busy_active_high
    }

    /// Set the fixed wait used when no busy pin is wired
    pub fn set_busy_fallback(&mut self, ms: u32) -> &mut Self {
        self.busy_fallback_ms = ms;
        self
    }

    /// Get the fixed wait used when no busy pin is wired
    pub fn busy_fallback(&self) -> u32 {
        self.busy_fallback_ms
    }

    /// Whether a BUSY line is wired
    pub fn has_busy_pin(&self) -> bool {
        self.busy.is_some()
    }

    /// Consume the interface and return the SPI device and pins
    pub fn release(self) -> (SPI, RST, Option<BUSY>) {
        (self.spi, self.rst, self.busy)
    }
}

impl<SPI, RST> Interface<SPI, RST, NoBusyPin>
where
    SPI: SpiDevice,
    RST: OutputPin,
{
    /// Create a new Interface for a board without a BUSY line
    ///
    /// Every busy-wait becomes a fixed delay (see [`Self::set_busy_fallback`]).
    pub fn without_busy(spi: SPI, rst: RST) -> Self {
        Self {
            spi,
            rst,
            busy: None,
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
            busy_active_high: false,
            busy_fallback_ms: DEFAULT_BUSY_FALLBACK_MS,
        }
    }
}

impl<SPI, RST, BUSY> DisplayInterface for Interface<SPI, RST, BUSY>
where
    SPI: SpiDevice,
    SPI::Error: Debug,
    RST: OutputPin,
    BUSY: InputPin,
    BUSY::Error: Debug,
{
    type Error = InterfaceError<SPI::Error, BUSY::Error>;

    fn write_register(&mut self, register: u8, data: &[u8]) -> InterfaceResult<(), Self::Error> {
        self.spi
            .transaction(&mut [Operation::Write(&[register]), Operation::Write(data)])
            .map_err(InterfaceError::Spi)
    }

    fn read_register(
        &mut self,
        register: u8,
        buffer: &mut [u8],
    ) -> InterfaceResult<(), Self::Error> {
        self.spi
            .transaction(&mut [
                Operation::Write(&[register | READ_FLAG]),
                Operation::Read(buffer),
            ])
            .map_err(InterfaceError::Spi)
    }

    fn reset<D: DelayNs>(&mut self, delay: &mut D) {
        // Reset sequence: HIGH -> 5ms -> LOW -> 5ms -> HIGH -> 35ms
        let _ = self.rst.set_high();
        delay.delay_ms(5);
        let _ = self.rst.set_low();
        delay.delay_ms(5);
        let _ = self.rst.set_high();
        delay.delay_ms(35);
    }

    fn busy_wait<D: DelayNs>(&mut self, delay: &mut D) -> InterfaceResult<(), Self::Error> {
        let Some(busy) = self.busy.as_mut() else {
            delay.delay_ms(self.busy_fallback_ms);
            return Ok(());
        };

        let mut iterations = 0u32;
        let timeout_ms = self.busy_timeout_ms;

        loop {
            let is_busy = if self.busy_active_high {
                busy.is_high()
            } else {
                busy.is_low()
            };

            let is_busy = match is_busy {
                Ok(value) => value,
                Err(e) => return Err(InterfaceError::Pin(e)),
            };

            if !is_busy {
                return Ok(());
            }

            delay.delay_ms(1);
            iterations += 1;
            if timeout_ms > 0 && iterations >= timeout_ms {
                return Err(InterfaceError::Timeout);
            }
        }
    }
}
