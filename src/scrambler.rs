//! Pixel address scrambling
//!
//! Plastic Logic panels do not wire their source and gate electrodes in raster
//! order. Before a framebuffer is written to controller RAM, every pixel is
//! moved to the address the panel wiring expects. The permutation is described
//! by a [`ScrambleConfig`] flag word, each bit enabling one correction stage.
//!
//! ## Stage Order
//!
//! Stages are always applied in this order:
//!
//! 1. Resolution fold ([`Fold`]), at most one of source-scramble or gate-scramble
//! 2. Source interlace
//! 3. Mirror lower half of the source range
//! 4. Mirror upper half of the source range
//! 5. Source direction
//! 6. Source start offset
//! 7. Gate direction
//!
//! ## Example
//!
//! ```
//! use uc8156::scrambler::{scramble, ScrambleConfig};
//! use uc8156::Geometry;
//!
//! let geometry = Geometry::new(4, 4).unwrap();
//! let source = [0x1B, 0xE4, 0x00, 0xFF];
//! let mut target = [0u8; 4];
//!
//! // Identity returns the source slice untouched
//! let out = scramble(&source, &mut target, ScrambleConfig::IDENTITY, geometry).unwrap();
//! assert_eq!(out, &source);
//!
//! // Reversing the gate direction swaps whole lines
//! let out = scramble(&source, &mut target, ScrambleConfig::GATE_DIRECTION, geometry).unwrap();
//! assert_eq!(out, &[0xFF, 0x00, 0xE4, 0x1B]);
//! ```

use crate::config::Geometry;
use crate::error::ScrambleError;

/// Scrambling configuration word
///
/// A 10-bit flag set. Bits above bit 9 are discarded on construction.
///
/// | Bit | Stage |
/// |-----|-------|
/// | 0 | source start offset |
/// | 1 | source interlace |
/// | 2 | source direction |
/// | 3 | gate direction |
/// | 4 | source-scramble fold |
/// | 5 | gate-scramble fold |
/// | 6 | fold takes odd lines first |
/// | 7 | mirror upper half |
/// | 8 | interlace takes odd lines first |
/// | 9 | mirror lower half |
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ScrambleConfig(u16);

impl ScrambleConfig {
    const MASK: u16 = 0x03FF;

    /// No stage enabled
    pub const IDENTITY: Self = Self(0);
    /// Rotate source lines by half the source range
    pub const SOURCE_START: Self = Self(1 << 0);
    /// Split odd and even source lines into the two halves
    pub const SOURCE_INTERLACED: Self = Self(1 << 1);
    /// Reverse the source range
    pub const SOURCE_DIRECTION: Self = Self(1 << 2);
    /// Reverse the gate range
    pub const GATE_DIRECTION: Self = Self(1 << 3);
    /// Half the gate lines, double the source lines
    pub const SOURCE_SCRAMBLE: Self = Self(1 << 4);
    /// Double the gate lines, half the source lines
    pub const GATE_SCRAMBLE: Self = Self(1 << 5);
    /// Fold odd lines first
    pub const SCRAMBLE_FIRST_ODD_LINE: Self = Self(1 << 6);
    /// Reflect the upper half of the source range
    pub const MIRROR_UPPER: Self = Self(1 << 7);
    /// Interlace odd lines first
    pub const INTERLACED_FIRST_ODD_LINE: Self = Self(1 << 8);
    /// Reflect the lower half of the source range
    pub const MIRROR_LOWER: Self = Self(1 << 9);

    /// Build a config from a raw flag word
    pub const fn from_bits(bits: u16) -> Self {
        Self(bits & Self::MASK)
    }

    /// Raw flag word
    pub const fn bits(self) -> u16 {
        self.0
    }

    /// Whether every flag of `other` is set
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Combine two configs
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Whether no stage is enabled
    pub const fn is_identity(self) -> bool {
        self.0 == 0
    }

    /// Decode the flag word into its stages
    pub fn stages(self) -> Stages {
        let fold_order = LineOrder::from_flag(self.contains(Self::SCRAMBLE_FIRST_ODD_LINE));
        let fold = if self.contains(Self::SOURCE_SCRAMBLE) {
            Fold::SourceScramble(fold_order)
        } else if self.contains(Self::GATE_SCRAMBLE) {
            Fold::GateScramble(fold_order)
        } else {
            Fold::None
        };

        let interlace = self
            .contains(Self::SOURCE_INTERLACED)
            .then(|| LineOrder::from_flag(self.contains(Self::INTERLACED_FIRST_ODD_LINE)));

        Stages {
            fold,
            interlace,
            mirror_lower: self.contains(Self::MIRROR_LOWER),
            mirror_upper: self.contains(Self::MIRROR_UPPER),
            source_direction: self.contains(Self::SOURCE_DIRECTION),
            source_start: self.contains(Self::SOURCE_START),
            gate_direction: self.contains(Self::GATE_DIRECTION),
        }
    }
}

impl core::ops::BitOr for ScrambleConfig {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl From<u16> for ScrambleConfig {
    fn from(bits: u16) -> Self {
        Self::from_bits(bits)
    }
}

/// Which line parity a fold or interlace stage takes first
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LineOrder {
    /// Even lines keep their slot, odd lines move
    #[default]
    EvenFirst,
    /// Odd lines keep their slot, even lines move
    OddFirst,
}

impl LineOrder {
    fn from_flag(odd_first: bool) -> Self {
        if odd_first {
            Self::OddFirst
        } else {
            Self::EvenFirst
        }
    }

    fn bit(self) -> usize {
        match self {
            Self::EvenFirst => 0,
            Self::OddFirst => 1,
        }
    }
}

/// Resolution fold stage
///
/// Source-scramble takes precedence when both fold bits are set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Fold {
    /// No fold
    #[default]
    None,
    /// Half the gate count, double the source count
    SourceScramble(LineOrder),
    /// Double the gate count, half the source count
    GateScramble(LineOrder),
}

/// Decoded scrambling stages
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Stages {
    /// Resolution fold
    pub fold: Fold,
    /// Source interlace, if enabled
    pub interlace: Option<LineOrder>,
    /// Reflect the lower half of the source range
    pub mirror_lower: bool,
    /// Reflect the upper half of the source range
    pub mirror_upper: bool,
    /// Reverse the source range
    pub source_direction: bool,
    /// Rotate the source range by half
    pub source_start: bool,
    /// Reverse the gate range
    pub gate_direction: bool,
}

impl Stages {
    /// Gate and source counts after the fold stage
    pub fn effective_lines(&self, geometry: Geometry) -> (usize, usize) {
        let gates = geometry.gate_count as usize;
        let sources = geometry.source_count as usize;
        match self.fold {
            Fold::None => (gates, sources),
            Fold::SourceScramble(_) => (gates / 2, sources * 2),
            Fold::GateScramble(_) => (gates * 2, sources / 2),
        }
    }

    /// Reject geometries a fold or interlace cannot split evenly
    pub fn check(&self, geometry: Geometry) -> Result<(), ScrambleError> {
        let uneven = ScrambleError::UnevenGeometry {
            gate_count: geometry.gate_count,
            source_count: geometry.source_count,
        };
        match self.fold {
            Fold::SourceScramble(_) if geometry.gate_count % 2 != 0 => return Err(uneven),
            Fold::GateScramble(_) if geometry.source_count % 2 != 0 => return Err(uneven),
            _ => {}
        }
        let (_, sources) = self.effective_lines(geometry);
        if self.interlace.is_some() && sources % 2 != 0 {
            return Err(uneven);
        }
        Ok(())
    }

    /// Target pixel index of the raster pixel at (`gate`, `source`)
    pub fn index(&self, gate: usize, source: usize, geometry: Geometry) -> usize {
        let (gates, sources) = self.effective_lines(geometry);
        let half = sources / 2;
        let mut g = gate;
        let mut s = source;

        match self.fold {
            Fold::None => {}
            Fold::SourceScramble(order) => {
                s = 2 * s + ((g & 1) ^ order.bit());
                g /= 2;
            }
            Fold::GateScramble(order) => {
                g = 2 * g + ((s & 1) ^ order.bit());
                s /= 2;
            }
        }

        if let Some(order) = self.interlace {
            let upper = (s & 1) ^ order.bit() == 1;
            s = s / 2 + if upper { half } else { 0 };
        }

        if self.mirror_lower && s < half {
            s = half - 1 - s;
        }
        if self.mirror_upper && s >= half {
            s = sources - 1 - (s - half);
        }
        if self.source_direction {
            s = sources - 1 - s;
        }
        if self.source_start {
            s = (s + half) % sources;
        }
        if self.gate_direction {
            g = gates - 1 - g;
        }

        g * sources + s
    }
}

/// Bit shift of a pixel within its byte (first pixel in the high bits)
#[inline]
pub(crate) fn pixel_shift(index: usize) -> u32 {
    ((3 - index % 4) * 2) as u32
}

/// Target pixel index of the raster pixel at (`gate`, `source`)
///
/// The result is only meaningful for geometries accepted by [`scramble`].
pub fn scrambled_index(gate: u16, source: u16, config: ScrambleConfig, geometry: Geometry) -> usize {
    config
        .stages()
        .index(gate as usize, source as usize, geometry)
}

/// Permute a raster-ordered packed buffer into panel address order
///
/// With [`ScrambleConfig::IDENTITY`] this returns `source` itself and leaves
/// `target` untouched. Otherwise `target` is overwritten and returned.
///
/// # Errors
///
/// * [`ScrambleError::SourceLength`] if `source` is not `geometry.buffer_size()` bytes
/// * [`ScrambleError::TargetLength`] if `target` is not `geometry.buffer_size()` bytes
/// * [`ScrambleError::UnevenGeometry`] if a fold or interlace needs an even line count
pub fn scramble<'a>(
    source: &'a [u8],
    target: &'a mut [u8],
    config: ScrambleConfig,
    geometry: Geometry,
) -> Result<&'a [u8], ScrambleError> {
    let expected = geometry.buffer_size();
    if source.len() != expected {
        return Err(ScrambleError::SourceLength {
            expected,
            provided: source.len(),
        });
    }
    if config.is_identity() {
        return Ok(source);
    }
    if target.len() != expected {
        return Err(ScrambleError::TargetLength {
            expected,
            provided: target.len(),
        });
    }

    let stages = config.stages();
    stages.check(geometry)?;

    target.fill(0);
    let sources = geometry.source_count as usize;
    for gate in 0..geometry.gate_count as usize {
        for src in 0..sources {
            let from = gate * sources + src;
            let to = stages.index(gate, src, geometry);
            let pixel = (source[from / 4] >> pixel_shift(from)) & 0b11;
            target[to / 4] |= pixel << pixel_shift(to);
        }
    }

    Ok(target)
}

/// Permute into a newly allocated buffer
///
/// Borrows `source` on the identity path.
#[cfg(feature = "alloc")]
pub fn scramble_to_vec(
    source: &[u8],
    config: ScrambleConfig,
    geometry: Geometry,
) -> Result<alloc::borrow::Cow<'_, [u8]>, ScrambleError> {
    use alloc::borrow::Cow;

    if config.is_identity() {
        let expected = geometry.buffer_size();
        if source.len() != expected {
            return Err(ScrambleError::SourceLength {
                expected,
                provided: source.len(),
            });
        }
        return Ok(Cow::Borrowed(source));
    }

    let mut target = alloc::vec![0u8; geometry.buffer_size()];
    scramble(source, &mut target, config, geometry)?;
    Ok(Cow::Owned(target))
}
