//! Precomputed XY heart waveform and its output channels.
//!
//! [`WaveformGenerator`] samples the closed heart curve
//!
//! ```text
//! x(t) = 16 sin³ t
//! y(t) = 13 cos t - 5 cos 2t - 2 cos 3t - cos 4t
//! ```
//!
//! at `N` equally spaced values of `t` over one period, scales both axes by the
//! same factor into the 12-bit DAC range and keeps the result for the lifetime
//! of the device. While active, each [`update`](WaveformGenerator::update)
//! writes one X/Y pair and advances a cursor modulo `N`. An oscilloscope in XY
//! mode redraws the heart from the regularity of those writes, so the caller
//! drains the generator in tight bursts (see [`burst`](WaveformGenerator::burst)).

use core::f32::consts::PI;

use embedded_hal::delay::DelayNs;
use embedded_hal::spi::SpiDevice;

/// Highest 12-bit DAC code.
pub const DAC_MAX: u16 = 4095;

/// Mid-scale DAC code, the resting position of the beam.
pub const DAC_CENTER: u16 = 2048;

// x spans [-16, 16], y spans about [-17, 12]
const CURVE_SPAN: f32 = 34.0;
const CURVE_Y_MID: f32 = -2.5;

/// Output channel of the two-channel DAC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DacChannel {
    /// Horizontal deflection.
    X,
    /// Vertical deflection.
    Y,
}

/// Trait for abstracting the two-channel DAC.
///
/// Values are 12-bit codes (0-4095). Handle bus errors internally - this
/// method cannot fail.
pub trait DacOutput {
    fn write(&mut self, channel: DacChannel, value: u16);
}

/// Heart curve table and streaming cursor.
///
/// Before [`precompute`](Self::precompute) has run, `start` and `update` are
/// no-ops.
pub struct WaveformGenerator<const N: usize> {
    x: [u16; N],
    y: [u16; N],
    cursor: usize,
    active: bool,
    initialized: bool,
}

impl<const N: usize> WaveformGenerator<N> {
    /// Creates an empty, inactive generator.
    pub const fn new() -> Self {
        Self {
            x: [DAC_CENTER; N],
            y: [DAC_CENTER; N],
            cursor: 0,
            active: false,
            initialized: false,
        }
    }

    /// Fills the X/Y tables from the heart curve.
    pub fn precompute(&mut self) {
        if N == 0 {
            return;
        }
        let scale = DAC_MAX as f32 / CURVE_SPAN;
        let mid = DAC_MAX as f32 / 2.0;
        let step = 2.0 * PI / N as f32;

        for i in 0..N {
            let t = i as f32 * step;
            let sin_t = libm::sinf(t);
            let x = 16.0 * sin_t * sin_t * sin_t;
            let y = 13.0 * libm::cosf(t)
                - 5.0 * libm::cosf(2.0 * t)
                - 2.0 * libm::cosf(3.0 * t)
                - libm::cosf(4.0 * t);

            self.x[i] = quantize(mid + x * scale);
            self.y[i] = quantize(mid + (y - CURVE_Y_MID) * scale);
        }

        self.cursor = 0;
        self.initialized = true;
        debug!("waveform: {} points precomputed", N);
    }

    /// Starts streaming from the first point.
    pub fn start(&mut self) {
        if !self.initialized {
            return;
        }
        self.active = true;
        self.cursor = 0;
        info!("waveform: output started");
    }

    /// Stops streaming and parks both channels at [`DAC_CENTER`].
    pub fn stop<D: DacOutput + ?Sized>(&mut self, dac: &mut D) {
        self.active = false;
        dac.write(DacChannel::X, DAC_CENTER);
        dac.write(DacChannel::Y, DAC_CENTER);
        info!("waveform: output stopped");
    }

    /// Writes the current point and advances the cursor.
    ///
    /// Returns false without writing when inactive or not yet precomputed.
    pub fn update<D: DacOutput + ?Sized>(&mut self, dac: &mut D) -> bool {
        if !self.initialized || !self.active {
            return false;
        }
        dac.write(DacChannel::X, self.x[self.cursor]);
        dac.write(DacChannel::Y, self.y[self.cursor]);
        self.cursor = (self.cursor + 1) % N;
        true
    }

    /// Writes up to `count` points, pausing `sample_delay_us` after each one.
    ///
    /// Returns the number of points written.
    pub fn burst<O: DacOutput + DelayNs + ?Sized>(
        &mut self,
        out: &mut O,
        count: u32,
        sample_delay_us: u32,
    ) -> u32 {
        let mut written = 0;
        for _ in 0..count {
            if !self.update(out) {
                break;
            }
            out.delay_us(sample_delay_us);
            written += 1;
        }
        written
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Index of the next point to be written.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Sample pair at `index`, if in range.
    pub fn point(&self, index: usize) -> Option<(u16, u16)> {
        Some((*self.x.get(index)?, *self.y.get(index)?))
    }

    pub fn x_samples(&self) -> &[u16; N] {
        &self.x
    }

    pub fn y_samples(&self) -> &[u16; N] {
        &self.y
    }
}

impl<const N: usize> Default for WaveformGenerator<N> {
    fn default() -> Self {
        Self::new()
    }
}

fn quantize(value: f32) -> u16 {
    libm::roundf(value.clamp(0.0, DAC_MAX as f32)) as u16
}

/// MCP4922 dual 12-bit DAC on an SPI bus.
///
/// Channel A carries X and channel B carries Y, both at 1x gain. The X
/// reference input is buffered; Y runs unbuffered.
pub struct Mcp4922<SPI: SpiDevice> {
    spi: SPI,
}

impl<SPI: SpiDevice> Mcp4922<SPI> {
    const CHANNEL_B: u16 = 1 << 15;
    const BUFFERED: u16 = 1 << 14;
    const GAIN_1X: u16 = 1 << 13;
    const ACTIVE: u16 = 1 << 12;

    pub fn new(spi: SPI) -> Self {
        Self { spi }
    }

    /// 16-bit command word for one channel write.
    pub fn command(channel: DacChannel, value: u16) -> u16 {
        let select = match channel {
            DacChannel::X => Self::BUFFERED,
            DacChannel::Y => Self::CHANNEL_B,
        };
        select | Self::GAIN_1X | Self::ACTIVE | (value & DAC_MAX)
    }

    pub fn release(self) -> SPI {
        self.spi
    }
}

impl<SPI: SpiDevice> DacOutput for Mcp4922<SPI> {
    fn write(&mut self, channel: DacChannel, value: u16) {
        let word = Self::command(channel, value).to_be_bytes();
        if self.spi.write(&word).is_err() {
            warn!("mcp4922: spi write failed on {}", channel);
        }
    }
}
