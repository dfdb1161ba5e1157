//! Display configuration types and builder

pub use crate::error::BuilderError;

/// Default upper bound on STATUS register polls after power-up (1 ms apart)
pub const DEFAULT_STATUS_POLL_LIMIT: u32 = 1_000;

/// Default settle time after a Full or Partial update trigger
pub const DEFAULT_FULL_SETTLE_MS: u32 = 880;

/// Default settle time after a Mono update trigger
pub const DEFAULT_MONO_SETTLE_MS: u32 = 340;

/// Default settle time between the two power-down writes
pub const DEFAULT_POWER_DOWN_SETTLE_MS: u32 = 70;

/// Panel geometry in electrode lines
///
/// Source lines run along the width, gate lines along the height. Pixel data
/// is a flat 2-bit-per-pixel buffer indexed `gate * source_count + source`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Geometry {
    /// Number of gate lines (height in pixels)
    pub gate_count: u16,
    /// Number of source lines (width in pixels)
    pub source_count: u16,
}

impl Geometry {
    /// Create a new geometry with validation
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::InvalidGeometry` if either count is zero or the
    /// pixel count is not a multiple of 4 (the buffer packs 4 pixels per byte).
    pub fn new(gate_count: u16, source_count: u16) -> Result<Self, BuilderError> {
        let geometry = Self {
            gate_count,
            source_count,
        };
        if gate_count == 0 || source_count == 0 || geometry.pixel_count() % 4 != 0 {
            return Err(BuilderError::InvalidGeometry {
                gate_count,
                source_count,
            });
        }
        Ok(geometry)
    }

    /// Width in pixels
    pub fn width(&self) -> u16 {
        self.source_count
    }

    /// Height in pixels
    pub fn height(&self) -> u16 {
        self.gate_count
    }

    /// Number of pixels
    pub fn pixel_count(&self) -> usize {
        self.gate_count as usize * self.source_count as usize
    }

    /// Calculate required buffer size in bytes
    pub fn buffer_size(&self) -> usize {
        self.pixel_count() / 4
    }
}

/// Display rotation relative to native orientation
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Rotation {
    /// No rotation
    #[default]
    Rotate0,
    /// Rotate 90 degrees clockwise
    Rotate90,
    /// Rotate 180 degrees
    Rotate180,
    /// Rotate 270 degrees clockwise
    Rotate270,
}

/// What detection does with an identification byte it does not know
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum UnknownPanelPolicy {
    /// Bind [`PanelVariant::Unknown`](crate::PanelVariant::Unknown)
    /// (72x148, no scrambling) and log a warning
    #[default]
    Fallback,
    /// Fail detection with [`Error::UnknownPanel`](crate::Error::UnknownPanel)
    Reject,
}

/// Display configuration
///
/// Panel geometry and register tables come from detection; this struct
/// holds the host-side timing and policy knobs. Use `Builder` to create a Config.
#[derive(Clone, Debug)]
pub struct Config {
    /// Display rotation
    pub rotation: Rotation,
    /// Policy for unrecognized panel identification bytes
    pub unknown_panel: UnknownPanelPolicy,
    /// Maximum STATUS polls after power-up, 1 ms apart (0 = wait forever)
    pub status_poll_limit: u32,
    /// Settle time after a Full or Partial trigger in milliseconds
    pub full_settle_ms: u32,
    /// Settle time after a Mono trigger in milliseconds
    pub mono_settle_ms: u32,
    /// Settle time between POWER_OFF and POWER_STANDBY in milliseconds
    pub power_down_settle_ms: u32,
}

impl Default for Config {
    fn default() -> Self {
        Builder::new().build()
    }
}

/// Builder for constructing display configuration
///
/// # Example
///
/// ```rust
/// use uc8156::{Builder, Rotation, UnknownPanelPolicy};
///
/// let config = Builder::new()
///     .rotation(Rotation::Rotate90)
///     .unknown_panel(UnknownPanelPolicy::Reject)
///     .build();
/// assert_eq!(config.rotation, Rotation::Rotate90);
/// ```
#[must_use]
pub struct Builder {
    /// Display rotation
    rotation: Rotation,
    /// Policy for unrecognized panel identification bytes
    unknown_panel: UnknownPanelPolicy,
    /// Maximum STATUS polls after power-up
    status_poll_limit: u32,
    /// Settle time after a Full or Partial trigger
    full_settle_ms: u32,
    /// Settle time after a Mono trigger
    mono_settle_ms: u32,
    /// Settle time between the power-down writes
    power_down_settle_ms: u32,
}

impl Default for Builder {
    fn default() -> Self {
        Self {
            rotation: Rotation::Rotate0,
            unknown_panel: UnknownPanelPolicy::Fallback,
            status_poll_limit: DEFAULT_STATUS_POLL_LIMIT,
            // Controller timings for the Plastic Logic waveforms
            full_settle_ms: DEFAULT_FULL_SETTLE_MS,
            mono_settle_ms: DEFAULT_MONO_SETTLE_MS,
            power_down_settle_ms: DEFAULT_POWER_DOWN_SETTLE_MS,
        }
    }
}

impl Builder {
    /// Create a new Builder with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set display rotation
    pub fn rotation(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self
    }

    /// Set the policy for unrecognized panels
    pub fn unknown_panel(mut self, policy: UnknownPanelPolicy) -> Self {
        self.unknown_panel = policy;
        self
    }

    /// Set the STATUS poll limit (0 disables the limit)
    pub fn status_poll_limit(mut self, polls: u32) -> Self {
        self.status_poll_limit = polls;
        self
    }

    /// Set the settle time after Full and Partial triggers
    pub fn full_settle_ms(mut self, ms: u32) -> Self {
        self.full_settle_ms = ms;
        self
    }

    /// Set the settle time after Mono triggers
    pub fn mono_settle_ms(mut self, ms: u32) -> Self {
        self.mono_settle_ms = ms;
        self
    }

    /// Set the settle time between the power-down writes
    pub fn power_down_settle_ms(mut self, ms: u32) -> Self {
        self.power_down_settle_ms = ms;
        self
    }

    /// Build the configuration
    pub fn build(self) -> Config {
        Config {
            rotation: self.rotation,
            unknown_panel: self.unknown_panel,
            status_poll_limit: self.status_poll_limit,
            full_settle_ms: self.full_settle_ms,
            mono_settle_ms: self.mono_settle_ms,
            power_down_settle_ms: self.power_down_settle_ms,
        }
    }
}

impl Config {
    /// Get the logical drawing size for a panel geometry, honoring rotation
    ///
    /// Returns `(width, height)` in pixels.
    pub fn rotated_size(&self, geometry: Geometry) -> (u16, u16) {
        match self.rotation {
            Rotation::Rotate0 | Rotation::Rotate180 => (geometry.width(), geometry.height()),
            Rotation::Rotate90 | Rotation::Rotate270 => (geometry.height(), geometry.width()),
        }
    }
}
