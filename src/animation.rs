//! Per-tick LED animation engine.
//!
//! Provides [`AnimationEngine`], which owns the heart pixel buffer and advances
//! the active [`Effect`] at a fixed cadence, and the [`LedStrip`] trait through
//! which the buffer reaches the physical strip.

use crate::colors::{BLACK, Pixel, dim};
use crate::config::CoreConfig;
use crate::effect::{Effect, EffectFrame, Lcg};
use crate::time::{TimeInstant, is_due};
use crate::topology::HeartTopology;

/// Trait for abstracting the addressable LED strip.
///
/// Implement this for your strip driver (WS2812 over PIO, SPI, RMT, ...).
/// Handle transfer errors internally - this method cannot fail.
pub trait LedStrip {
    /// Writes a full frame, first pixel first.
    fn write(&mut self, pixels: &[Pixel]);
}

/// Drives the heart LEDs through the selected effect.
///
/// The animation step is a free-running counter: it advances once per tick
/// whatever the effect, wraps at `u32::MAX`, and restarts at zero whenever a
/// different effect is selected. Switching effect never clears the buffer; the
/// first tick of the new effect sets up its own starting frame.
///
/// # Type Parameters
/// * `I` - Time instant type
/// * `N` - Number of LEDs in the ring
pub struct AnimationEngine<I: TimeInstant, const N: usize> {
    pixels: [Pixel; N],
    heat: [u8; N],
    effect: Effect,
    step: u32,
    last_tick: Option<I>,
    interval_ms: u64,
    brightness: u8,
    rng: Lcg,
    topology: HeartTopology<N>,
}

impl<I: TimeInstant, const N: usize> AnimationEngine<I, N> {
    /// Creates an engine showing [`Effect::Off`] on a black buffer.
    pub fn new(interval_ms: u64, brightness: u8, seed: u32) -> Self {
        Self {
            pixels: [BLACK; N],
            heat: [0; N],
            effect: Effect::Off,
            step: 0,
            last_tick: None,
            interval_ms,
            brightness,
            rng: Lcg::new(seed),
            topology: HeartTopology::new(),
        }
    }

    /// Creates an engine using cadence, brightness and seed from `config`.
    pub fn from_config(config: &CoreConfig) -> Self {
        Self::new(
            config.animation_interval_ms,
            config.brightness,
            config.rng_seed,
        )
    }

    /// Replaces the heart wiring map.
    pub fn with_topology(mut self, topology: HeartTopology<N>) -> Self {
        self.topology = topology;
        self
    }

    /// Selects the active effect. Selecting a different effect restarts the
    /// step counter; the buffer is left as it is.
    pub fn set_effect(&mut self, effect: Effect) {
        if effect != self.effect {
            debug!("animation: effect {} -> {}", self.effect, effect);
            self.effect = effect;
            self.step = 0;
        }
    }

    /// Advances `effect` by one frame if the tick interval has elapsed.
    ///
    /// Returns true when a new frame was rendered into the buffer.
    pub fn tick(&mut self, now: I, effect: Effect) -> bool {
        self.set_effect(effect);

        if !is_due(self.last_tick, now, self.interval_ms) {
            return false;
        }
        self.last_tick = Some(now);

        let mut frame = EffectFrame {
            pixels: &mut self.pixels,
            heat: &mut self.heat,
            step: self.step,
            rng: &mut self.rng,
            topology: &self.topology,
        };
        self.effect.advance(&mut frame);
        self.step = self.step.wrapping_add(1);
        true
    }

    /// Sends the buffer to `strip` with brightness applied.
    pub fn flush<S: LedStrip + ?Sized>(&self, strip: &mut S) {
        let mut out = [BLACK; N];
        for (dst, src) in out.iter_mut().zip(self.pixels.iter()) {
            *dst = dim(*src, self.brightness);
        }
        strip.write(&out);
    }

    /// Unscaled pixel buffer.
    pub fn pixels(&self) -> &[Pixel; N] {
        &self.pixels
    }

    pub fn effect(&self) -> Effect {
        self.effect
    }

    /// Current animation step.
    pub fn step(&self) -> u32 {
        self.step
    }

    pub fn brightness(&self) -> u8 {
        self.brightness
    }

    pub fn set_brightness(&mut self, brightness: u8) {
        self.brightness = brightness;
    }

    pub fn topology(&self) -> &HeartTopology<N> {
        &self.topology
    }
}
