//! Core display operations

use embedded_hal::delay::DelayNs;

use crate::color::Color;
use crate::command::{
    BOOST_SETTING, BOOST_SETTING_DEFAULT, BORDER_BLACK, BORDER_LOCKED, BORDER_SETTING, BORDER_WHITE,
    DATA_ENTRY_MODE, DISPLAY_ENGINE, DRIVER_VOLTAGE, DRIVER_VOLTAGE_DEFAULT, ENGINE_FULL_UPDATE,
    ENGINE_PARTIAL_UPDATE, INIT_TEMPERATURE, INIT_TEMPERATURE_DEFAULT, LOAD_MONO_WAVEFORM,
    MONO_WAVEFORM_DEFAULT, MTP_ADDRESS, MTP_ID_ADDRESS, MTP_MONO, MTP_NORMAL, MTP_READ,
    PANEL_SETTING, PIXEL_ACCESS_POS, POWER_CONTROL, POWER_OFF, POWER_ON, POWER_SEQUENCE,
    POWER_SEQUENCE_DEFAULT, POWER_STANDBY, PROGRAM_MTP, REVISION, SET_RESOLUTION, SLEEP_MODE,
    SLEEP_MODE_ENTER, STATUS, TCOM_TIMING, TCOM_TIMING_DEFAULT, VCOM_CONFIG, WRITE_PIXEL_RECT,
    WRITE_RAM,
};
use crate::config::{Config, Geometry, UnknownPanelPolicy};
use crate::error::{Error, InvalidUpdateMode};
use crate::interface::DisplayInterface;
use crate::panel::{Identification, PanelBinding, PanelRegisters, PanelVariant, identify};
use crate::scrambler::{self, ScrambleConfig};

type DisplayResult<I> = core::result::Result<(), Error<I>>;

/// Number of Mono cycles issued by [`Display::white_erase`]
pub const WHITE_ERASE_CYCLES: usize = 3;

/// Update mode for display refreshes
///
/// Different update modes trade off speed vs quality.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UpdateMode {
    /// Full update, four gray levels, all pixels refreshed
    ///
    /// Best image quality.
    #[default]
    Full,
    /// Partial update, only changed pixels are refreshed
    ///
    /// Less flicker for slightly more pixel crosstalk. Host-side timing is
    /// the same as [`UpdateMode::Full`].
    Partial,
    /// Monochrome update, black and white only
    ///
    /// Shorter settle time. Insert a full update after a few mono updates
    /// to restore image quality.
    Mono,
}

impl TryFrom<u8> for UpdateMode {
    type Error = InvalidUpdateMode;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Full),
            1 => Ok(Self::Partial),
            2 => Ok(Self::Mono),
            other => Err(InvalidUpdateMode(other)),
        }
    }
}

/// Phase of the update state machine
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UpdatePhase {
    /// No update in progress
    #[default]
    Idle,
    /// Writing pixel data to controller RAM
    WriteRam,
    /// Charge pump starting
    PowerUp,
    /// Display engine running
    Triggering,
    /// Charge pump shutting down
    PowerDown,
}

/// Core display driver for UC8156
///
/// This struct provides low-level operations for the UC8156 controller.
/// For graphics support, use `GraphicDisplay` (requires `graphics` feature).
pub struct Display<I>
where
    I: DisplayInterface,
{
    /// Hardware interface
    interface: I,
    /// Display configuration
    config: Config,
    /// Detected or explicitly bound panel
    panel: Option<PanelBinding>,
    /// Current update phase
    phase: UpdatePhase,
}

impl<I> Display<I>
where
    I: DisplayInterface,
{
    /// Create a new Display instance
    ///
    /// No panel is bound until [`Self::reset`], [`Self::detect`] or
    /// [`Self::bind_panel`] is called.
    pub fn new(interface: I, config: Config) -> Self {
        Self {
            interface,
            config,
            panel: None,
            phase: UpdatePhase::Idle,
        }
    }

    /// Perform hardware reset, check communication and detect the panel
    ///
    /// Returns the detected panel variant. Call [`Self::init`] afterwards.
    pub fn reset<D: DelayNs>(&mut self, delay: &mut D) -> Result<PanelVariant, Error<I>> {
        self.interface.reset(delay);
        self.interface.busy_wait(delay).map_err(Error::Interface)?;
        self.verify_communication()?;
        self.detect(delay)
    }

    /// Check that a controller answers on the bus
    ///
    /// # Errors
    ///
    /// Returns `Error::NotResponding` if the revision register reads zero.
    pub fn verify_communication(&mut self) -> DisplayResult<I> {
        let mut revision = [0u8; 1];
        self.interface
            .read_register(REVISION, &mut revision)
            .map_err(Error::Interface)?;
        if revision[0] == 0 {
            return Err(Error::NotResponding);
        }
        Ok(())
    }

    /// Read the panel identification from MTP and bind the matching variant
    ///
    /// Leaves PROGRAM_MTP in read-out mode. Every update rewrites it.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownPanel` for an unrecognized identification byte
    /// when the config uses [`UnknownPanelPolicy::Reject`], and drops any
    /// earlier binding. Under the default
    /// [`UnknownPanelPolicy::Fallback`] the [`PanelVariant::Unknown`]
    /// variant is bound instead.
    pub fn detect<D: DelayNs>(&mut self, delay: &mut D) -> Result<PanelVariant, Error<I>> {
        self.write_register(PROGRAM_MTP, &[MTP_MONO], delay)?;
        self.write_register(MTP_ADDRESS, &MTP_ID_ADDRESS, delay)?;

        let interface = &mut self.interface;
        let identification = identify(|| {
            let mut byte = [0u8; 1];
            interface
                .read_register(MTP_READ, &mut byte)
                .map(|()| byte[0])
        })
        .map_err(Error::Interface)?;

        let variant = match identification {
            Identification::Known(variant) => {
                log::info!("Detected {} panel", variant.name());
                variant
            }
            Identification::Unrecognized(id) => match self.config.unknown_panel {
                UnknownPanelPolicy::Fallback => {
                    log::warn!(
                        "Unknown panel identification 0x{:02X}, using 72x148 without scrambling",
                        id
                    );
                    PanelVariant::Unknown
                }
                UnknownPanelPolicy::Reject => {
                    self.panel = None;
                    return Err(Error::UnknownPanel { id });
                }
            },
        };

        self.bind_panel(variant);
        Ok(variant)
    }

    /// Bind a panel variant without reading MTP
    ///
    /// Resets the active scrambling to the variant's default.
    pub fn bind_panel(&mut self, variant: PanelVariant) {
        self.panel = Some(PanelBinding::new(variant));
    }

    /// Initialize the controller for the bound panel
    pub fn init<D: DelayNs>(&mut self, delay: &mut D) -> DisplayResult<I> {
        let (variant, registers) = self.panel_registers()?;

        // Panel specific
        self.write_register(PANEL_SETTING, &[registers.panel_setting], delay)?;
        self.write_register(WRITE_PIXEL_RECT, &registers.write_pixel_rect, delay)?;
        self.write_register(VCOM_CONFIG, &registers.vcom_config, delay)?;
        self.write_register(DATA_ENTRY_MODE, &[registers.data_entry_mode], delay)?;

        self.write_register(DRIVER_VOLTAGE, &DRIVER_VOLTAGE_DEFAULT, delay)?;
        self.write_register(BORDER_SETTING, &[BORDER_LOCKED], delay)?;
        self.write_register(LOAD_MONO_WAVEFORM, &[MONO_WAVEFORM_DEFAULT], delay)?;
        self.write_register(INIT_TEMPERATURE, &[INIT_TEMPERATURE_DEFAULT], delay)?;
        self.write_register(BOOST_SETTING, &BOOST_SETTING_DEFAULT, delay)?;

        log::info!("Initialized {} panel", variant.name());
        Ok(())
    }

    /// Update display from a raster-ordered buffer
    ///
    /// # Arguments
    ///
    /// * `buffer` - Packed 2-bit pixel data, `geometry().buffer_size()` bytes
    /// * `scratch` - Scrambling target, same size. Unused (may be empty) when
    ///   the active scrambling is the identity
    /// * `mode` - Update mode (Full, Partial, or Mono)
    /// * `delay` - Delay implementation
    ///
    /// Power-down is attempted even if power-up or the trigger fails; the
    /// earlier error is returned.
    pub fn update<D: DelayNs>(
        &mut self,
        buffer: &[u8],
        scratch: &mut [u8],
        mode: UpdateMode,
        delay: &mut D,
    ) -> DisplayResult<I> {
        let scramble = self.binding()?.scramble_config();
        self.update_with_scramble(buffer, scratch, mode, scramble, delay)
    }

    /// Run three Mono cycles (white, inverted, white) to remove ghosting
    ///
    /// Bypasses scrambling and leaves the bound scrambling untouched.
    /// `buffer` is overwritten and ends all white. All three cycles are
    /// issued even if one fails; the first error is returned.
    pub fn white_erase<D: DelayNs>(&mut self, buffer: &mut [u8], delay: &mut D) -> DisplayResult<I> {
        let geometry = self.check_buffers(buffer.len(), 0, ScrambleConfig::IDENTITY)?;
        let buffer = &mut buffer[..geometry.buffer_size()];

        buffer.fill(Color::White.fill_byte());
        let mut first_error = None;
        for cycle in 0..WHITE_ERASE_CYCLES {
            if cycle > 0 {
                buffer.iter_mut().for_each(|byte| *byte = !*byte);
            }
            let result = self.update_with_scramble(
                buffer,
                &mut [],
                UpdateMode::Mono,
                ScrambleConfig::IDENTITY,
                delay,
            );
            if let Err(e) = result {
                log::warn!("White erase cycle {} failed", cycle + 1);
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Drive the border electrode black or white
    ///
    /// Issues a Partial update with `buffer` to push the border change, then
    /// locks the border again so later updates leave it alone. The lock is
    /// restored even if the update fails.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidBorderColor` for gray colors, before any
    /// register traffic.
    pub fn set_border_color<D: DelayNs>(
        &mut self,
        color: Color,
        buffer: &[u8],
        scratch: &mut [u8],
        delay: &mut D,
    ) -> DisplayResult<I> {
        let value = match color {
            Color::Black => BORDER_BLACK,
            Color::White => BORDER_WHITE,
            other => return Err(Error::InvalidBorderColor(other)),
        };
        let scramble = self.binding()?.scramble_config();
        self.check_buffers(buffer.len(), scratch.len(), scramble)?;

        self.write_register(BORDER_SETTING, &[value], delay)?;
        let result = self.update_with_scramble(buffer, scratch, UpdateMode::Partial, scramble, delay);
        let restore = self.write_register(BORDER_SETTING, &[BORDER_LOCKED], delay);
        result.and(restore)
    }

    /// Start the charge pump
    ///
    /// Polls STATUS every millisecond until it reads non-zero, up to
    /// `Config::status_poll_limit` polls.
    ///
    /// # Errors
    ///
    /// Returns `Error::StatusTimeout` if the charge pump never reports ready.
    pub fn power_up<D: DelayNs>(&mut self, delay: &mut D) -> DisplayResult<I> {
        let (_, registers) = self.panel_registers()?;
        self.phase = UpdatePhase::PowerUp;
        log::debug!("Powering up");

        self.interface.busy_wait(delay).map_err(Error::Interface)?;
        self.write_register(SET_RESOLUTION, &registers.resolution, delay)?;
        self.write_register(TCOM_TIMING, &TCOM_TIMING_DEFAULT, delay)?;
        self.write_register(POWER_SEQUENCE, &POWER_SEQUENCE_DEFAULT, delay)?;
        self.write_register(POWER_CONTROL, &[POWER_ON], delay)?;
        self.wait_for_charge_pump(delay)?;
        self.interface.busy_wait(delay).map_err(Error::Interface)
    }

    /// Shut the charge pump down
    ///
    /// Required whenever the display is not actively updating.
    pub fn power_down<D: DelayNs>(&mut self, delay: &mut D) -> DisplayResult<I> {
        self.phase = UpdatePhase::PowerDown;
        log::debug!("Powering down");

        let result = self.power_down_sequence(delay);
        self.phase = UpdatePhase::Idle;
        result
    }

    /// Enter deep sleep mode
    ///
    /// Only a hardware reset (see [`Self::reset`]) wakes the controller.
    pub fn deep_sleep<D: DelayNs>(&mut self, delay: &mut D) -> DisplayResult<I> {
        self.write_register(SLEEP_MODE, &SLEEP_MODE_ENTER, delay)?;
        log::info!("Entered deep sleep, reset required before the next update");
        Ok(())
    }

    /// Set the RAM address counter
    pub fn set_ram_address<D: DelayNs>(&mut self, x: u8, y: u8, delay: &mut D) -> DisplayResult<I> {
        self.write_register(PIXEL_ACCESS_POS, &[x, y], delay)
    }

    /// Get the bound panel variant
    pub fn panel(&self) -> Option<PanelVariant> {
        self.panel.map(|binding| binding.variant())
    }

    /// Get the bound panel geometry
    pub fn geometry(&self) -> Option<Geometry> {
        self.panel.map(|binding| binding.geometry())
    }

    /// Get the current update phase
    pub fn phase(&self) -> UpdatePhase {
        self.phase
    }

    /// Get the active scrambling
    pub fn scramble_config(&self) -> Option<ScrambleConfig> {
        self.panel.map(|binding| binding.scramble_config())
    }

    /// Override the active scrambling for the bound panel
    ///
    /// # Errors
    ///
    /// Returns `Error::PanelNotBound` if no panel is bound.
    pub fn set_scramble_config(&mut self, config: ScrambleConfig) -> DisplayResult<I> {
        match self.panel.as_mut() {
            Some(binding) => {
                binding.set_scramble_config(config);
                Ok(())
            }
            None => Err(Error::PanelNotBound),
        }
    }

    /// Access the underlying configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Access the underlying interface
    pub fn interface(&mut self) -> &mut I {
        &mut self.interface
    }

    /// Write a register and wait for the controller
    fn write_register<D: DelayNs>(
        &mut self,
        register: u8,
        data: &[u8],
        delay: &mut D,
    ) -> DisplayResult<I> {
        self.interface
            .write_register(register, data)
            .map_err(Error::Interface)?;
        self.interface.busy_wait(delay).map_err(Error::Interface)
    }

    fn binding(&self) -> Result<PanelBinding, Error<I>> {
        self.panel.ok_or(Error::PanelNotBound)
    }

    fn panel_registers(&self) -> Result<(PanelVariant, &'static PanelRegisters), Error<I>> {
        let variant = self.binding()?.variant();
        match variant.registers() {
            Some(registers) => Ok((variant, registers)),
            None => Err(Error::UnsupportedPanel(variant)),
        }
    }

    /// Validate buffers and scrambling before any register traffic
    fn check_buffers(
        &self,
        buffer_len: usize,
        scratch_len: usize,
        scramble: ScrambleConfig,
    ) -> Result<Geometry, Error<I>> {
        let (variant, _) = self.panel_registers()?;
        let geometry = variant.geometry();
        let required = geometry.buffer_size();

        if buffer_len < required {
            return Err(Error::BufferTooSmall {
                required,
                provided: buffer_len,
            });
        }
        if !scramble.is_identity() {
            if scratch_len < required {
                return Err(Error::BufferTooSmall {
                    required,
                    provided: scratch_len,
                });
            }
            scramble.stages().check(geometry)?;
        }
        Ok(geometry)
    }

    fn update_with_scramble<D: DelayNs>(
        &mut self,
        buffer: &[u8],
        scratch: &mut [u8],
        mode: UpdateMode,
        scramble: ScrambleConfig,
        delay: &mut D,
    ) -> DisplayResult<I> {
        let geometry = self.check_buffers(buffer.len(), scratch.len(), scramble)?;
        log::debug!("{:?} update, scramble {:#05x}", mode, scramble.bits());

        if let Err(e) = self.write_ram(buffer, scratch, scramble, geometry, delay) {
            self.phase = UpdatePhase::Idle;
            return Err(e);
        }

        let result = self
            .power_up(delay)
            .and_then(|()| self.trigger(mode, delay));
        let down = self.power_down(delay);
        result.and(down)
    }

    fn write_ram<D: DelayNs>(
        &mut self,
        buffer: &[u8],
        scratch: &mut [u8],
        scramble: ScrambleConfig,
        geometry: Geometry,
        delay: &mut D,
    ) -> DisplayResult<I> {
        let (_, registers) = self.panel_registers()?;
        self.phase = UpdatePhase::WriteRam;

        let size = geometry.buffer_size();
        let target_len = if scramble.is_identity() { 0 } else { size };
        let data = scrambler::scramble(
            &buffer[..size],
            &mut scratch[..target_len],
            scramble,
            geometry,
        )?;

        self.write_register(PIXEL_ACCESS_POS, &registers.write_origin, delay)?;
        self.write_register(WRITE_RAM, data, delay)
    }

    fn trigger<D: DelayNs>(&mut self, mode: UpdateMode, delay: &mut D) -> DisplayResult<I> {
        let (mtp, engine, settle_ms) = match mode {
            UpdateMode::Full => (MTP_NORMAL, ENGINE_FULL_UPDATE, self.config.full_settle_ms),
            UpdateMode::Partial => (MTP_NORMAL, ENGINE_PARTIAL_UPDATE, self.config.full_settle_ms),
            UpdateMode::Mono => (MTP_MONO, ENGINE_PARTIAL_UPDATE, self.config.mono_settle_ms),
        };
        self.phase = UpdatePhase::Triggering;

        self.write_register(PROGRAM_MTP, &[mtp], delay)?;
        self.write_register(DISPLAY_ENGINE, &[engine], delay)?;
        delay.delay_ms(settle_ms);
        self.interface.busy_wait(delay).map_err(Error::Interface)
    }

    fn power_down_sequence<D: DelayNs>(&mut self, delay: &mut D) -> DisplayResult<I> {
        self.interface
            .write_register(POWER_CONTROL, &[POWER_OFF])
            .map_err(Error::Interface)?;
        delay.delay_ms(self.config.power_down_settle_ms);
        self.interface.busy_wait(delay).map_err(Error::Interface)?;

        self.interface
            .write_register(POWER_CONTROL, &[POWER_STANDBY])
            .map_err(Error::Interface)?;
        delay.delay_ms(1);
        self.interface.busy_wait(delay).map_err(Error::Interface)
    }

    fn wait_for_charge_pump<D: DelayNs>(&mut self, delay: &mut D) -> DisplayResult<I> {
        let limit = self.config.status_poll_limit;
        let mut polls = 0u32;

        loop {
            let mut status = [0u8; 1];
            self.interface
                .read_register(STATUS, &mut status)
                .map_err(Error::Interface)?;
            if status[0] != 0 {
                return Ok(());
            }

            polls += 1;
            if limit > 0 && polls >= limit {
                return Err(Error::StatusTimeout);
            }
            delay.delay_ms(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Builder;
    use alloc::collections::VecDeque;
    use alloc::vec;
    use alloc::vec::Vec;

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct MockError;

    #[derive(Debug)]
    struct MockInterface {
        writes: Vec<(u8, Vec<u8>)>,
        reads: Vec<u8>,
        mtp: VecDeque<u8>,
        revision: u8,
        status: u8,
        fail_on: Option<(u8, u8)>,
        failed: bool,
    }

    impl MockInterface {
        fn new() -> Self {
            Self {
                writes: Vec::new(),
                reads: Vec::new(),
                mtp: VecDeque::new(),
                revision: 0x01,
                status: 0x01,
                fail_on: None,
                failed: false,
            }
        }

        fn with_mtp(bytes: &[u8]) -> Self {
            let mut interface = Self::new();
            interface.mtp = bytes.iter().copied().collect();
            interface
        }

        fn data_for(&self, register: u8) -> Vec<Vec<u8>> {
            self.writes
                .iter()
                .filter(|(reg, _)| *reg == register)
                .map(|(_, data)| data.clone())
                .collect()
        }

        fn registers(&self) -> Vec<u8> {
            self.writes.iter().map(|(reg, _)| *reg).collect()
        }
    }

    impl DisplayInterface for MockInterface {
        type Error = MockError;

        fn write_register(&mut self, register: u8, data: &[u8]) -> Result<(), Self::Error> {
            self.writes.push((register, data.to_vec()));
            if !self.failed && self.fail_on == Some((register, data[0])) {
                self.failed = true;
                return Err(MockError);
            }
            Ok(())
        }

        fn read_register(&mut self, register: u8, buffer: &mut [u8]) -> Result<(), Self::Error> {
            self.reads.push(register);
            let value = match register {
                REVISION => self.revision,
                STATUS => self.status,
                MTP_READ => self.mtp.pop_front().unwrap_or(0),
                _ => 0,
            };
            buffer.fill(value);
            Ok(())
        }

        fn reset<D: DelayNs>(&mut self, _delay: &mut D) {}

        fn busy_wait<D: DelayNs>(&mut self, _delay: &mut D) -> Result<(), Self::Error> {
            Ok(())
        }
    }

    #[derive(Default)]
    struct MockDelay {
        total_ns: u64,
    }

    impl DelayNs for MockDelay {
        fn delay_ns(&mut self, ns: u32) {
            self.total_ns += u64::from(ns);
        }
    }

    fn bound_display(variant: PanelVariant) -> Display<MockInterface> {
        let mut display = Display::new(MockInterface::new(), Builder::new().build());
        display.bind_panel(variant);
        display
    }

    fn set_pixel(buffer: &mut [u8], index: usize, color: Color) {
        let shift = scrambler::pixel_shift(index);
        buffer[index / 4] = (buffer[index / 4] & !(0b11 << shift)) | (color.code() << shift);
    }

    fn buffers(display: &Display<MockInterface>) -> (Vec<u8>, Vec<u8>) {
        let size = display.geometry().unwrap().buffer_size();
        (vec![0u8; size], vec![0u8; size])
    }

    #[test]
    fn test_update_mode_from_u8() {
        assert_eq!(UpdateMode::try_from(0), Ok(UpdateMode::Full));
        assert_eq!(UpdateMode::try_from(1), Ok(UpdateMode::Partial));
        assert_eq!(UpdateMode::try_from(2), Ok(UpdateMode::Mono));
        assert_eq!(UpdateMode::try_from(3), Err(InvalidUpdateMode(3)));
        assert_eq!(UpdateMode::default(), UpdateMode::Full);
    }

    #[test]
    fn test_detect_each_panel() {
        let cases: [(&[u8], PanelVariant); 5] = [
            (&[0x00, 0x31, 0x31], PanelVariant::Epd1in1),
            (&[0x00, 0x31, 0x00], PanelVariant::Epd1in4),
            (&[0x00, 0x30], PanelVariant::Epd1in4),
            (&[0x00, 0x32], PanelVariant::Epd2in1),
            (&[0x00, 0x33], PanelVariant::Epd3in1),
        ];
        for (bytes, expected) in cases {
            let mut display = Display::new(MockInterface::with_mtp(bytes), Builder::new().build());
            let mut delay = MockDelay::default();
            assert_eq!(display.detect(&mut delay).ok(), Some(expected));
            assert_eq!(display.panel(), Some(expected));
            assert_eq!(display.scramble_config(), Some(expected.scramble_config()));
            assert_eq!(display.interface.data_for(PROGRAM_MTP), [vec![MTP_MONO]]);
            assert_eq!(display.interface.data_for(MTP_ADDRESS), [MTP_ID_ADDRESS.to_vec()]);
        }
    }

    #[test]
    fn test_detect_unknown_falls_back() {
        let mut display = Display::new(MockInterface::with_mtp(&[0x00, 0x7F]), Builder::new().build());
        let mut delay = MockDelay::default();
        assert_eq!(display.detect(&mut delay).ok(), Some(PanelVariant::Unknown));
        assert_eq!(display.geometry(), Some(PanelVariant::Epd1in1.geometry()));
        assert_eq!(display.scramble_config(), Some(ScrambleConfig::IDENTITY));
    }

    #[test]
    fn test_detect_unknown_rejected() {
        let config = Builder::new()
            .unknown_panel(UnknownPanelPolicy::Reject)
            .build();
        let mut display = Display::new(MockInterface::with_mtp(&[0x00, 0x7F]), config);
        display.bind_panel(PanelVariant::Epd2in1);
        let mut delay = MockDelay::default();
        assert!(matches!(
            display.detect(&mut delay),
            Err(Error::UnknownPanel { id: 0x7F })
        ));
        assert_eq!(display.panel(), None);
    }

    #[test]
    fn test_reset_detects_panel() {
        let mut display = Display::new(MockInterface::with_mtp(&[0x00, 0x33]), Builder::new().build());
        let mut delay = MockDelay::default();
        assert_eq!(display.reset(&mut delay).ok(), Some(PanelVariant::Epd3in1));
        assert_eq!(display.interface.reads[0], REVISION);
    }

    #[test]
    fn test_reset_not_responding() {
        let mut interface = MockInterface::with_mtp(&[0x00, 0x33]);
        interface.revision = 0;
        let mut display = Display::new(interface, Builder::new().build());
        let mut delay = MockDelay::default();
        assert!(matches!(display.reset(&mut delay), Err(Error::NotResponding)));
        assert!(display.interface.writes.is_empty());
    }

    #[test]
    fn test_init_writes_panel_table() {
        let mut display = bound_display(PanelVariant::Epd2in1);
        let mut delay = MockDelay::default();
        display.init(&mut delay).unwrap();
        assert_eq!(
            display.interface.registers(),
            [
                PANEL_SETTING,
                WRITE_PIXEL_RECT,
                VCOM_CONFIG,
                DATA_ENTRY_MODE,
                DRIVER_VOLTAGE,
                BORDER_SETTING,
                LOAD_MONO_WAVEFORM,
                INIT_TEMPERATURE,
                BOOST_SETTING,
            ]
        );
        assert_eq!(display.interface.writes[0].1, [0x11]);
        assert_eq!(display.interface.writes[1].1, [0x00, 0xEF, 0x00, 0x91]);
    }

    #[test]
    fn test_unknown_panel_unsupported() {
        let mut display = bound_display(PanelVariant::Unknown);
        let mut delay = MockDelay::default();
        let (buffer, mut scratch) = buffers(&display);
        assert!(matches!(
            display.init(&mut delay),
            Err(Error::UnsupportedPanel(PanelVariant::Unknown))
        ));
        assert!(matches!(
            display.update(&buffer, &mut scratch, UpdateMode::Full, &mut delay),
            Err(Error::UnsupportedPanel(_))
        ));
        assert!(display.interface.writes.is_empty());
    }

    #[test]
    fn test_update_without_panel() {
        let mut display = Display::new(MockInterface::new(), Builder::new().build());
        let mut delay = MockDelay::default();
        let result = display.update(&[0u8; 16], &mut [], UpdateMode::Full, &mut delay);
        assert!(matches!(result, Err(Error::PanelNotBound)));
    }

    #[test]
    fn test_update_buffer_too_small() {
        let mut display = bound_display(PanelVariant::Epd1in1);
        let mut delay = MockDelay::default();
        let result = display.update(&[0u8; 10], &mut [], UpdateMode::Full, &mut delay);
        assert!(matches!(
            result,
            Err(Error::BufferTooSmall {
                required: 2664,
                provided: 10
            })
        ));
        assert!(display.interface.writes.is_empty());
    }

    #[test]
    fn test_update_scratch_too_small_when_scrambling() {
        let mut display = bound_display(PanelVariant::Epd3in1);
        let mut delay = MockDelay::default();
        let (buffer, _) = buffers(&display);
        let result = display.update(&buffer, &mut [0u8; 4], UpdateMode::Full, &mut delay);
        assert!(matches!(result, Err(Error::BufferTooSmall { provided: 4, .. })));
        assert!(display.interface.writes.is_empty());
    }

    #[test]
    fn test_full_update_sequence_identity_panel() {
        let mut display = bound_display(PanelVariant::Epd1in1);
        let mut delay = MockDelay::default();
        let (buffer, mut scratch) = buffers(&display);

        display
            .update(&buffer, &mut scratch, UpdateMode::Full, &mut delay)
            .unwrap();

        assert_eq!(
            display.interface.registers(),
            [
                PIXEL_ACCESS_POS,
                WRITE_RAM,
                SET_RESOLUTION,
                TCOM_TIMING,
                POWER_SEQUENCE,
                POWER_CONTROL,
                PROGRAM_MTP,
                DISPLAY_ENGINE,
                POWER_CONTROL,
                POWER_CONTROL,
            ]
        );
        assert_eq!(display.interface.data_for(PIXEL_ACCESS_POS), [vec![0x00, 0x93]]);
        assert_eq!(display.interface.data_for(WRITE_RAM), [buffer.clone()]);
        assert_eq!(
            display.interface.data_for(POWER_CONTROL),
            [vec![POWER_ON], vec![POWER_OFF], vec![POWER_STANDBY]]
        );
        assert_eq!(display.interface.data_for(PROGRAM_MTP), [vec![MTP_NORMAL]]);
        assert_eq!(display.interface.data_for(DISPLAY_ENGINE), [vec![ENGINE_FULL_UPDATE]]);
        assert!(scratch.iter().all(|&b| b == 0));
        assert_eq!(display.phase(), UpdatePhase::Idle);
    }

    #[test]
    fn test_update_3in1_writes_scrambled_ram() {
        let mut display = bound_display(PanelVariant::Epd3in1);
        let mut delay = MockDelay::default();
        let (mut buffer, mut scratch) = buffers(&display);
        buffer.fill(Color::White.fill_byte());
        // 74 sources per gate line
        set_pixel(&mut buffer, 0, Color::Black);
        set_pixel(&mut buffer, 74, Color::DarkGray);
        set_pixel(&mut buffer, 2 * 74 + 5, Color::LightGray);

        display
            .update(&buffer, &mut scratch, UpdateMode::Full, &mut delay)
            .unwrap();

        // Folded to 156 gate lines of 148 sources, gate 0 in the odd slot.
        // (gate 0, source 0) -> pixel 1, (gate 1, source 0) -> pixel 0,
        // (gate 2, source 5) -> pixel 148 + 11
        let mut expected = vec![0xFFu8; buffer.len()];
        expected[0] = 0b01_00_11_11;
        expected[39] = 0b11_11_11_10;

        let ram = display.interface.data_for(WRITE_RAM);
        assert_eq!(ram, [expected]);
        assert_ne!(ram[0], buffer);
        assert_eq!(display.interface.data_for(PIXEL_ACCESS_POS), [vec![0x00, 0x9B]]);
    }

    #[test]
    fn test_update_modes_trigger_values() {
        for (mode, mtp, engine) in [
            (UpdateMode::Full, MTP_NORMAL, ENGINE_FULL_UPDATE),
            (UpdateMode::Partial, MTP_NORMAL, ENGINE_PARTIAL_UPDATE),
            (UpdateMode::Mono, MTP_MONO, ENGINE_PARTIAL_UPDATE),
        ] {
            let mut display = bound_display(PanelVariant::Epd1in4);
            let mut delay = MockDelay::default();
            let (buffer, mut scratch) = buffers(&display);
            display.update(&buffer, &mut scratch, mode, &mut delay).unwrap();
            assert_eq!(display.interface.data_for(PROGRAM_MTP), [vec![mtp]]);
            assert_eq!(display.interface.data_for(DISPLAY_ENGINE), [vec![engine]]);
        }
    }

    #[test]
    fn test_mono_settles_faster_than_full() {
        let mut totals = [0u64; 2];
        for (slot, mode) in [UpdateMode::Full, UpdateMode::Mono].into_iter().enumerate() {
            let mut display = bound_display(PanelVariant::Epd1in1);
            let mut delay = MockDelay::default();
            let (buffer, mut scratch) = buffers(&display);
            display.update(&buffer, &mut scratch, mode, &mut delay).unwrap();
            totals[slot] = delay.total_ns;
        }
        // Trigger settle plus 70 ms + 1 ms power-down
        assert_eq!(totals[0], (880 + 70 + 1) * 1_000_000);
        assert_eq!(totals[1], (340 + 70 + 1) * 1_000_000);
    }

    #[test]
    fn test_status_poll_timeout_still_powers_down() {
        let mut interface = MockInterface::new();
        interface.status = 0;
        let config = Builder::new().status_poll_limit(5).build();
        let mut display = Display::new(interface, config);
        display.bind_panel(PanelVariant::Epd1in1);
        let mut delay = MockDelay::default();
        let (buffer, mut scratch) = buffers(&display);

        let result = display.update(&buffer, &mut scratch, UpdateMode::Full, &mut delay);
        assert!(matches!(result, Err(Error::StatusTimeout)));
        let status_reads = display.interface.reads.iter().filter(|&&r| r == STATUS).count();
        assert_eq!(status_reads, 5);
        assert!(display.interface.data_for(DISPLAY_ENGINE).is_empty());
        assert_eq!(
            display.interface.data_for(POWER_CONTROL),
            [vec![POWER_ON], vec![POWER_OFF], vec![POWER_STANDBY]]
        );
        assert_eq!(display.phase(), UpdatePhase::Idle);
    }

    #[test]
    fn test_white_erase_three_mono_cycles() {
        let mut display = bound_display(PanelVariant::Epd3in1);
        let mut delay = MockDelay::default();
        let (mut buffer, _) = buffers(&display);
        buffer.fill(0x1B);

        display.white_erase(&mut buffer, &mut delay).unwrap();

        assert_eq!(display.interface.data_for(DISPLAY_ENGINE).len(), WHITE_ERASE_CYCLES);
        assert_eq!(
            display.interface.data_for(PROGRAM_MTP),
            [vec![MTP_MONO], vec![MTP_MONO], vec![MTP_MONO]]
        );
        let ram = display.interface.data_for(WRITE_RAM);
        assert_eq!(ram.len(), 3);
        assert!(ram[0].iter().all(|&b| b == 0xFF));
        assert!(ram[1].iter().all(|&b| b == 0x00));
        assert!(ram[2].iter().all(|&b| b == 0xFF));
        assert!(buffer.iter().all(|&b| b == 0xFF));
        assert_eq!(display.scramble_config(), Some(ScrambleConfig::from_bits(0x50)));
    }

    #[test]
    fn test_white_erase_continues_after_failed_cycle() {
        let mut display = bound_display(PanelVariant::Epd2in1);
        display.interface.fail_on = Some((DISPLAY_ENGINE, ENGINE_PARTIAL_UPDATE));
        let mut delay = MockDelay::default();
        let (mut buffer, _) = buffers(&display);

        let result = display.white_erase(&mut buffer, &mut delay);

        assert!(matches!(result, Err(Error::Interface(MockError))));
        assert_eq!(display.interface.data_for(DISPLAY_ENGINE).len(), 3);
        assert_eq!(display.interface.data_for(WRITE_RAM).len(), 3);
        assert_eq!(display.scramble_config(), Some(ScrambleConfig::MIRROR_LOWER));
        assert!(buffer.iter().all(|&b| b == 0xFF));
    }

    #[test]
    fn test_border_color_rejects_gray() {
        let mut display = bound_display(PanelVariant::Epd1in1);
        let mut delay = MockDelay::default();
        let (buffer, mut scratch) = buffers(&display);
        for color in [Color::DarkGray, Color::LightGray] {
            let result = display.set_border_color(color, &buffer, &mut scratch, &mut delay);
            assert!(matches!(result, Err(Error::InvalidBorderColor(c)) if c == color));
        }
        assert!(display.interface.writes.is_empty());
        assert!(display.interface.reads.is_empty());
    }

    #[test]
    fn test_border_color_partial_update_then_lock() {
        let mut display = bound_display(PanelVariant::Epd1in1);
        let mut delay = MockDelay::default();
        let (buffer, mut scratch) = buffers(&display);

        display
            .set_border_color(Color::White, &buffer, &mut scratch, &mut delay)
            .unwrap();

        assert_eq!(
            display.interface.data_for(BORDER_SETTING),
            [vec![BORDER_WHITE], vec![BORDER_LOCKED]]
        );
        assert_eq!(display.interface.data_for(DISPLAY_ENGINE), [vec![ENGINE_PARTIAL_UPDATE]]);
        assert_eq!(display.interface.registers().last(), Some(&BORDER_SETTING));
    }

    #[test]
    fn test_border_lock_restored_after_failed_update() {
        let mut display = bound_display(PanelVariant::Epd1in1);
        display.interface.fail_on = Some((DISPLAY_ENGINE, ENGINE_PARTIAL_UPDATE));
        let mut delay = MockDelay::default();
        let (buffer, mut scratch) = buffers(&display);

        let result = display.set_border_color(Color::Black, &buffer, &mut scratch, &mut delay);

        assert!(result.is_err());
        assert_eq!(
            display.interface.data_for(BORDER_SETTING),
            [vec![BORDER_BLACK], vec![BORDER_LOCKED]]
        );
    }

    #[test]
    fn test_set_scramble_config_requires_panel() {
        let mut display = Display::new(MockInterface::new(), Builder::new().build());
        assert!(matches!(
            display.set_scramble_config(ScrambleConfig::GATE_DIRECTION),
            Err(Error::PanelNotBound)
        ));
        display.bind_panel(PanelVariant::Epd1in1);
        display
            .set_scramble_config(ScrambleConfig::GATE_DIRECTION)
            .unwrap();
        assert_eq!(display.scramble_config(), Some(ScrambleConfig::GATE_DIRECTION));
    }

    #[test]
    fn test_deep_sleep() {
        let mut display = Display::new(MockInterface::new(), Builder::new().build());
        let mut delay = MockDelay::default();
        display.deep_sleep(&mut delay).unwrap();
        assert_eq!(display.interface.writes, [(SLEEP_MODE, SLEEP_MODE_ENTER.to_vec())]);
    }
}
