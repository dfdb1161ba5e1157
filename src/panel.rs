//! Panel variants and identification
//!
//! Plastic Logic panels store an identification byte in the controller's MTP
//! memory. [`identify`] classifies that byte sequence and [`PanelVariant`]
//! carries everything the driver needs for the detected panel: geometry,
//! scrambling and the register values written at init, power-up and
//! write-RAM time.
//!
//! ## Supported Panels
//!
//! | Variant | Size | Sources x Gates | Scramble |
//! |---------|------|-----------------|----------|
//! | [`PanelVariant::Epd1in1`] | 1.1" | 72 x 148 | identity |
//! | [`PanelVariant::Epd1in4`] | 1.4" | 180 x 100 | identity |
//! | [`PanelVariant::Epd2in1`] | 2.1" | 240 x 146 | mirror lower half |
//! | [`PanelVariant::Epd3in1`] | 3.1" | 74 x 312 | source scramble, odd first |
//!
//! ## Example
//!
//! ```
//! use uc8156::panel::{identify, Identification, PanelVariant};
//!
//! // Dummy byte, then the identification byte
//! let mut bytes = [0x00u8, 0x33].into_iter();
//! let id = identify(|| Ok::<u8, ()>(bytes.next().unwrap_or(0)));
//! assert_eq!(id, Ok(Identification::Known(PanelVariant::Epd3in1)));
//! assert_eq!(PanelVariant::Epd3in1.width(), 74);
//! ```

use crate::config::Geometry;
use crate::scrambler::ScrambleConfig;

/// Register values specific to one panel variant
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PanelRegisters {
    /// PANEL_SETTING (0x01) value
    pub panel_setting: u8,
    /// WRITE_PIXEL_RECT (0x0D) window
    pub write_pixel_rect: [u8; 4],
    /// VCOM_CONFIG (0x18) value
    pub vcom_config: [u8; 4],
    /// DATA_ENTRY_MODE (0x0F) value
    pub data_entry_mode: u8,
    /// SET_RESOLUTION (0x0C) window written at power-up
    pub resolution: [u8; 4],
    /// PIXEL_ACCESS_POS (0x0E) origin written before RAM data
    pub write_origin: [u8; 2],
}

const EPD_1IN1: PanelRegisters = PanelRegisters {
    panel_setting: 0x12,
    write_pixel_rect: [0x00, 0x47, 0x00, 0x93],
    vcom_config: [0x00, 0x00, 0x24, 0x07],
    data_entry_mode: 0x02,
    resolution: [0x00, 0xEF, 0x00, 0x93],
    write_origin: [0x00, 0x93],
};

const EPD_1IN4: PanelRegisters = PanelRegisters {
    panel_setting: 0x12,
    write_pixel_rect: [0x00, 0xB3, 0x3C, 0x9F],
    vcom_config: [0x00, 0x00, 0x24, 0x07],
    data_entry_mode: 0x02,
    resolution: [0x00, 0xEF, 0x00, 0x9F],
    write_origin: [0x00, 0x9F],
};

const EPD_2IN1: PanelRegisters = PanelRegisters {
    panel_setting: 0x11,
    write_pixel_rect: [0x00, 0xEF, 0x00, 0x91],
    vcom_config: [0x00, 0x00, 0x24, 0x07],
    data_entry_mode: 0x00,
    resolution: [0x00, 0xEF, 0x00, 0x9F],
    write_origin: [0x00, 0x00],
};

const EPD_3IN1: PanelRegisters = PanelRegisters {
    panel_setting: 0x12,
    write_pixel_rect: [0x00, 0x93, 0x00, 0x9B],
    vcom_config: [0x50, 0x01, 0x24, 0x07],
    data_entry_mode: 0x02,
    resolution: [0x00, 0xEF, 0x00, 0x9F],
    write_origin: [0x00, 0x9B],
};

/// Supported Plastic Logic panels
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PanelVariant {
    /// 1.1" panel, 72 x 148
    Epd1in1,
    /// 1.4" panel, 180 x 100
    Epd1in4,
    /// 2.1" panel, 240 x 146
    Epd2in1,
    /// 3.1" panel, 74 x 312
    Epd3in1,
    /// Unrecognized panel
    ///
    /// Uses the 1.1" geometry with identity scrambling but has no register
    /// table, so init and update are refused.
    Unknown,
}

impl PanelVariant {
    /// Human readable name
    pub fn name(self) -> &'static str {
        match self {
            Self::Epd1in1 => "1.1\" 72x148",
            Self::Epd1in4 => "1.4\" 180x100",
            Self::Epd2in1 => "2.1\" 240x146",
            Self::Epd3in1 => "3.1\" 74x312",
            Self::Unknown => "unknown",
        }
    }

    /// Panel geometry in electrode lines
    pub fn geometry(self) -> Geometry {
        let (gate_count, source_count) = match self {
            Self::Epd1in1 | Self::Unknown => (148, 72),
            Self::Epd1in4 => (100, 180),
            Self::Epd2in1 => (146, 240),
            Self::Epd3in1 => (312, 74),
        };
        Geometry {
            gate_count,
            source_count,
        }
    }

    /// Width in pixels
    pub fn width(self) -> u16 {
        self.geometry().width()
    }

    /// Height in pixels
    pub fn height(self) -> u16 {
        self.geometry().height()
    }

    /// Scrambling the panel wiring needs
    pub fn scramble_config(self) -> ScrambleConfig {
        match self {
            Self::Epd1in1 | Self::Epd1in4 | Self::Unknown => ScrambleConfig::IDENTITY,
            Self::Epd2in1 => ScrambleConfig::MIRROR_LOWER,
            Self::Epd3in1 => ScrambleConfig::SOURCE_SCRAMBLE | ScrambleConfig::SCRAMBLE_FIRST_ODD_LINE,
        }
    }

    /// Register table, `None` for [`PanelVariant::Unknown`]
    pub fn registers(self) -> Option<&'static PanelRegisters> {
        match self {
            Self::Epd1in1 => Some(&EPD_1IN1),
            Self::Epd1in4 => Some(&EPD_1IN4),
            Self::Epd2in1 => Some(&EPD_2IN1),
            Self::Epd3in1 => Some(&EPD_3IN1),
            Self::Unknown => None,
        }
    }
}

/// Outcome of reading the MTP identification bytes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Identification {
    /// A supported panel
    Known(PanelVariant),
    /// Identification byte with no known panel
    Unrecognized(u8),
}

/// Classify the MTP identification bytes
///
/// `read_next` must return successive MTP_READ bytes after the MTP address has
/// been set. The first byte is a dummy and is discarded.
///
/// | First byte | Second byte | Panel |
/// |------------|-------------|-------|
/// | 0x31 | 0x31 | 1.1" |
/// | 0x31 | other | 1.4" |
/// | 0x30 | | 1.4" (early production) |
/// | 0x32 | | 2.1" |
/// | 0x33 | | 3.1" |
pub fn identify<E>(mut read_next: impl FnMut() -> Result<u8, E>) -> Result<Identification, E> {
    let _dummy = read_next()?;
    let id = read_next()?;
    let variant = match id {
        0x31 => {
            if read_next()? == 0x31 {
                PanelVariant::Epd1in1
            } else {
                PanelVariant::Epd1in4
            }
        }
        0x30 => PanelVariant::Epd1in4,
        0x32 => PanelVariant::Epd2in1,
        0x33 => PanelVariant::Epd3in1,
        other => return Ok(Identification::Unrecognized(other)),
    };
    Ok(Identification::Known(variant))
}

/// A panel bound to a display
///
/// Holds the active scrambling for the panel. Only the owning
/// [`Display`](crate::display::Display) can change it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PanelBinding {
    variant: PanelVariant,
    scramble: ScrambleConfig,
}

impl PanelBinding {
    /// Bind a variant with its default scrambling
    pub fn new(variant: PanelVariant) -> Self {
        Self {
            variant,
            scramble: variant.scramble_config(),
        }
    }

    /// Bound variant
    pub fn variant(&self) -> PanelVariant {
        self.variant
    }

    /// Geometry of the bound variant
    pub fn geometry(&self) -> Geometry {
        self.variant.geometry()
    }

    /// Active scrambling
    pub fn scramble_config(&self) -> ScrambleConfig {
        self.scramble
    }

    pub(crate) fn set_scramble_config(&mut self, config: ScrambleConfig) {
        self.scramble = config;
    }
}
