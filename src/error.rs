//! Error types for the driver
//!
//! This module defines error types for configuration building ([`BuilderError`]),
//! pixel scrambling ([`ScrambleError`]) and display operations ([`Error`]).
//!
//! ## Error Types
//!
//! - [`BuilderError`] - Invalid geometry during configuration
//! - [`ScrambleError`] - Buffers or geometry the scrambler cannot permute
//! - [`InvalidUpdateMode`] - Numeric update mode outside 0..=2
//! - [`Error`] - Runtime errors during display operations
//! - [`InterfaceError`](crate::interface::InterfaceError) - Low-level hardware communication errors
//!
//! ## Example
//!
//! ```
//! use uc8156::{BuilderError, Geometry, UpdateMode};
//!
//! // 3x3 pixels do not fill whole bytes
//! let result = Geometry::new(3, 3);
//! assert!(matches!(result, Err(BuilderError::InvalidGeometry { .. })));
//!
//! // Only modes 0 (full), 1 (partial) and 2 (mono) exist
//! assert!(UpdateMode::try_from(3).is_err());
//! ```

use crate::color::Color;
use crate::interface::DisplayInterface;
use crate::panel::PanelVariant;

/// Errors that can occur when interacting with the display
///
/// Generic over the interface type to preserve the specific error type.
/// This allows error handling code to match on the underlying hardware error.
#[derive(Debug)]
pub enum Error<I: DisplayInterface> {
    /// Interface error (SPI/GPIO)
    ///
    /// Wraps the underlying hardware error from the [`DisplayInterface`] implementation.
    Interface(I::Error),
    /// The controller did not answer
    ///
    /// The revision register read back as zero, which means no chip is
    /// responding. Check wiring and power supply.
    NotResponding,
    /// The panel identification byte is not known
    ///
    /// Only returned under [`UnknownPanelPolicy::Reject`](crate::UnknownPanelPolicy::Reject).
    UnknownPanel {
        /// Identification byte read from MTP
        id: u8,
    },
    /// No panel has been detected or bound yet
    PanelNotBound,
    /// The bound panel has no register table
    UnsupportedPanel(PanelVariant),
    /// Border color other than black or white
    InvalidBorderColor(Color),
    /// Buffer is too small for the panel
    ///
    /// The provided buffer must be at least `geometry.buffer_size()` bytes.
    BufferTooSmall {
        /// Required buffer size in bytes
        required: usize,
        /// Provided buffer size in bytes
        provided: usize,
    },
    /// The scrambler rejected the buffer or geometry
    Scramble(ScrambleError),
    /// The STATUS register never reported the charge pump ready
    StatusTimeout,
}

impl<I: DisplayInterface> core::fmt::Display for Error<I> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Interface(_) => write!(f, "Interface error"),
            Self::NotResponding => write!(f, "Display not responding"),
            Self::UnknownPanel { id } => write!(f, "Unknown panel identification 0x{id:02X}"),
            Self::PanelNotBound => write!(f, "No panel detected"),
            Self::UnsupportedPanel(variant) => {
                write!(f, "Unsupported panel: {}", variant.name())
            }
            Self::InvalidBorderColor(_) => write!(f, "Border color can only be black or white"),
            Self::BufferTooSmall { required, provided } => {
                write!(
                    f,
                    "Buffer too small: required {required} bytes, provided {provided}"
                )
            }
            Self::Scramble(e) => write!(f, "Scramble error: {e}"),
            Self::StatusTimeout => write!(f, "Timeout waiting for charge pump"),
        }
    }
}

impl<I: DisplayInterface + core::fmt::Debug> core::error::Error for Error<I> {}

impl<I: DisplayInterface> From<ScrambleError> for Error<I> {
    fn from(e: ScrambleError) -> Self {
        Self::Scramble(e)
    }
}

/// Errors that can occur when building configuration
#[derive(Debug)]
pub enum BuilderError {
    /// Invalid geometry provided
    ///
    /// See [`Geometry::new()`](crate::config::Geometry::new) for constraints.
    InvalidGeometry {
        /// Number of gate lines requested
        gate_count: u16,
        /// Number of source lines requested
        source_count: u16,
    },
}

impl core::fmt::Display for BuilderError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InvalidGeometry {
                gate_count,
                source_count,
            } => write!(
                f,
                "Invalid geometry {gate_count}x{source_count} (counts must be non-zero, pixel count a multiple of 4)"
            ),
        }
    }
}

impl core::error::Error for BuilderError {}

/// Errors from the pixel scrambler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrambleError {
    /// Source buffer length does not match the geometry
    SourceLength {
        /// Expected length in bytes
        expected: usize,
        /// Provided length in bytes
        provided: usize,
    },
    /// Target buffer length does not match the geometry
    TargetLength {
        /// Expected length in bytes
        expected: usize,
        /// Provided length in bytes
        provided: usize,
    },
    /// A fold or interlace stage needs an even line count the geometry lacks
    UnevenGeometry {
        /// Number of gate lines
        gate_count: u16,
        /// Number of source lines
        source_count: u16,
    },
}

impl core::fmt::Display for ScrambleError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::SourceLength { expected, provided } => {
                write!(f, "Source buffer is {provided} bytes, expected {expected}")
            }
            Self::TargetLength { expected, provided } => {
                write!(f, "Target buffer is {provided} bytes, expected {expected}")
            }
            Self::UnevenGeometry {
                gate_count,
                source_count,
            } => write!(
                f,
                "Geometry {gate_count}x{source_count} cannot be split in halves for this configuration"
            ),
        }
    }
}

impl core::error::Error for ScrambleError {}

/// Numeric update mode outside 0 (full), 1 (partial) and 2 (mono)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidUpdateMode(pub u8);

impl core::fmt::Display for InvalidUpdateMode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Invalid update mode {}", self.0)
    }
}

impl core::error::Error for InvalidUpdateMode {}
