//! LED effect catalogue.
//!
//! Each [`Effect`] turns `(step, LED position, previous frame)` into a new frame
//! through [`Effect::advance`]. Stateless effects overwrite every pixel; the
//! trailing and sparkling ones fade the previous frame in place, so the buffer
//! is never cleared unless the effect itself starts from black.
//!
//! Heartbeat, chase and rose bloom address LEDs only through the
//! [`HeartTopology`] map.

use core::f32::consts::PI;

use crate::colors::{BLACK, BLUE, GREEN, Pixel, RED, channel, hsv, lerp, map_range, scale};
use crate::topology::HeartTopology;

/// Pink hue used by most of the romantic effects.
const PINK_HUE: f32 = 330.0;

/// Everything an effect may read or write during one tick.
pub struct EffectFrame<'a, const N: usize> {
    /// Pixel buffer, holding the previous frame on entry.
    pub pixels: &'a mut [Pixel; N],
    /// Per-LED heat used by the fire simulation.
    pub heat: &'a mut [u8; N],
    /// Ticks since the effect became active.
    pub step: u32,
    pub rng: &'a mut Lcg,
    pub topology: &'a HeartTopology<N>,
}

/// Selectable LED effects, in menu order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Effect {
    #[default]
    Off,
    SolidRed,
    SolidGreen,
    SolidBlue,
    Rainbow,
    Breathing,
    Sparkle,
    Fire,
    Heartbeat,
    SoftPinkFade,
    LoveWave,
    PinkStars,
    RomanticChase,
    RoseBloom,
    Candlelight,
    SunsetFade,
    LovePulse,
    SoftRainbow,
    PinkComet,
    Valentine,
    DreamyFade,
}

impl Effect {
    /// All effects in selector order.
    pub const ALL: [Effect; 21] = [
        Effect::Off,
        Effect::SolidRed,
        Effect::SolidGreen,
        Effect::SolidBlue,
        Effect::Rainbow,
        Effect::Breathing,
        Effect::Sparkle,
        Effect::Fire,
        Effect::Heartbeat,
        Effect::SoftPinkFade,
        Effect::LoveWave,
        Effect::PinkStars,
        Effect::RomanticChase,
        Effect::RoseBloom,
        Effect::Candlelight,
        Effect::SunsetFade,
        Effect::LovePulse,
        Effect::SoftRainbow,
        Effect::PinkComet,
        Effect::Valentine,
        Effect::DreamyFade,
    ];

    pub const COUNT: usize = Self::ALL.len();

    /// Looks up an effect by selector index; out-of-range selectors give `Off`.
    pub fn from_index(index: usize) -> Self {
        Self::ALL.get(index).copied().unwrap_or(Effect::Off)
    }

    /// Selector index of this effect.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            Effect::Off => "Off",
            Effect::SolidRed => "Red",
            Effect::SolidGreen => "Green",
            Effect::SolidBlue => "Blue",
            Effect::Rainbow => "Rainbow",
            Effect::Breathing => "Breathing",
            Effect::Sparkle => "Sparkle",
            Effect::Fire => "Fire",
            Effect::Heartbeat => "Heartbeat",
            Effect::SoftPinkFade => "Pink Fade",
            Effect::LoveWave => "Love Wave",
            Effect::PinkStars => "Pink Stars",
            Effect::RomanticChase => "Chase",
            Effect::RoseBloom => "Rose Bloom",
            Effect::Candlelight => "Candlelight",
            Effect::SunsetFade => "Sunset",
            Effect::LovePulse => "Love Pulse",
            Effect::SoftRainbow => "Soft Rainbow",
            Effect::PinkComet => "Pink Comet",
            Effect::Valentine => "Valentine",
            Effect::DreamyFade => "Dreamy",
        }
    }

    /// True for effects that address LEDs through the heart topology.
    pub fn uses_topology(self) -> bool {
        matches!(
            self,
            Effect::Heartbeat | Effect::RomanticChase | Effect::RoseBloom
        )
    }

    /// Renders one tick of this effect into `frame`.
    pub fn advance<const N: usize>(self, frame: &mut EffectFrame<'_, N>) {
        match self {
            Effect::Off => frame.pixels.fill(BLACK),
            Effect::SolidRed => frame.pixels.fill(RED),
            Effect::SolidGreen => frame.pixels.fill(GREEN),
            Effect::SolidBlue => frame.pixels.fill(BLUE),
            Effect::Rainbow => hue_sweep(frame, 255),
            Effect::SoftRainbow => hue_sweep(frame, 150),
            Effect::Breathing => breathing(frame),
            Effect::Sparkle => sparkle(frame),
            Effect::Fire => fire(frame),
            Effect::Heartbeat => heartbeat(frame),
            Effect::SoftPinkFade => soft_pink_fade(frame),
            Effect::LoveWave => love_wave(frame),
            Effect::PinkStars => pink_stars(frame),
            Effect::RomanticChase => romantic_chase(frame),
            Effect::RoseBloom => rose_bloom(frame),
            Effect::Candlelight => candlelight(frame),
            Effect::SunsetFade => sunset_fade(frame),
            Effect::LovePulse => love_pulse(frame),
            Effect::PinkComet => pink_comet(frame),
            Effect::Valentine => valentine(frame),
            Effect::DreamyFade => dreamy_fade(frame),
        }
    }
}

/// Linear congruential generator for sparkles and flicker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lcg {
    state: u32,
}

impl Lcg {
    pub const fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
        self.state
    }

    /// Uniform-ish value in `0..bound`; zero when `bound` is zero.
    pub fn below(&mut self, bound: u32) -> u32 {
        if bound == 0 {
            return 0;
        }
        // low bits of an LCG have short periods
        (self.next_u32() >> 16) % bound
    }

    /// Value in `low..high`; `low` when the range is empty.
    pub fn range(&mut self, low: u32, high: u32) -> u32 {
        low + self.below(high.saturating_sub(low))
    }
}

fn fade_all<const N: usize>(pixels: &mut [Pixel; N], factor: f32) {
    for pixel in pixels.iter_mut() {
        *pixel = scale(*pixel, factor);
    }
}

fn hue_sweep<const N: usize>(frame: &mut EffectFrame<'_, N>, saturation: u8) {
    let step = frame.step as u64;
    for (i, pixel) in frame.pixels.iter_mut().enumerate() {
        let hue = (step * 2 + (i * 360 / N) as u64) % 360;
        *pixel = hsv(hue as f32, saturation, 255);
    }
}

fn breathing<const N: usize>(frame: &mut EffectFrame<'_, N>) {
    // exp(sin) swings between 1/e and e
    let wave = libm::expf(libm::sinf(frame.step as f32 / 25.0 * PI));
    let value = channel((wave - 0.367_879_44) * 108.0);
    frame.pixels.fill(hsv(240.0, 255, value));
}

fn sparkle<const N: usize>(frame: &mut EffectFrame<'_, N>) {
    fade_all(frame.pixels, 0.9);
    if frame.rng.below(100) < 20 {
        let pos = frame.rng.below(N as u32) as usize;
        let hue = frame.rng.below(360) as f32;
        if let Some(pixel) = frame.pixels.get_mut(pos) {
            *pixel = hsv(hue, 200, 255);
        }
    }
}

fn fire<const N: usize>(frame: &mut EffectFrame<'_, N>) {
    let cooling = (55 * 10 / N.max(1)) as u32 + 2;
    for cell in frame.heat.iter_mut() {
        *cell = cell.saturating_sub(frame.rng.below(cooling) as u8);
    }

    // heat rises toward higher indices
    for k in (2..N).rev() {
        let rising = frame.heat[k - 1] as u16 + 2 * frame.heat[k - 2] as u16;
        frame.heat[k] = (rising / 3) as u8;
    }

    if N > 0 && frame.rng.below(100) < 60 {
        let y = frame.rng.below(N.min(7) as u32) as usize;
        let spark = frame.rng.range(160, 255) as u8;
        frame.heat[y] = frame.heat[y].saturating_add(spark);
    }

    for (pixel, heat) in frame.pixels.iter_mut().zip(frame.heat.iter()) {
        let hue = map_range(*heat as i32, 0, 255, 0, 60);
        *pixel = hsv(hue as f32, 255, *heat);
    }
}

fn heartbeat<const N: usize>(frame: &mut EffectFrame<'_, N>) {
    let cycle = frame.step % 120;
    let base = match cycle {
        0..15 => libm::sinf(cycle as f32 * (PI / 15.0)) * 255.0,
        30..45 => libm::sinf((cycle - 30) as f32 * (PI / 15.0)) * 255.0,
        _ => 0.0,
    };
    let base = channel(base) as i32;

    frame.pixels.fill(BLACK);
    let max = frame.topology.max_distance();
    for distance in 0..=max {
        let value = map_range(distance as i32, 0, max as i32, base, base / 3);
        let color = hsv(0.0, 200, value.clamp(0, 255) as u8);
        frame.topology.paint(frame.pixels, distance, color);
    }
}

fn soft_pink_fade<const N: usize>(frame: &mut EffectFrame<'_, N>) {
    let phase = frame.step as f32 / 80.0;
    let value = channel((libm::sinf(phase) + 1.0) * 127.5);
    frame.pixels.fill(hsv(PINK_HUE, 180, value));
}

fn love_wave<const N: usize>(frame: &mut EffectFrame<'_, N>) {
    let step = frame.step;
    for (i, pixel) in frame.pixels.iter_mut().enumerate() {
        let sweep = ((step as u64 * 2 + (i * 360 / N) as u64) % 360) as i32;
        let hue = if sweep < 180 {
            map_range(sweep, 0, 179, 0, 30)
        } else {
            map_range(sweep, 180, 359, 330, 360)
        };
        let wave = libm::sinf(step as f32 / 10.0 + i as f32 / 5.0);
        *pixel = hsv(hue as f32, 200, channel(150.0 + wave * 50.0));
    }
}

fn pink_stars<const N: usize>(frame: &mut EffectFrame<'_, N>) {
    fade_all(frame.pixels, 0.95);
    if frame.rng.below(100) < 50 {
        let pos = frame.rng.below(N as u32) as usize;
        let hue = if frame.rng.below(2) == 1 {
            frame.rng.range(0, 10)
        } else {
            frame.rng.range(330, 350)
        };
        let value = frame.rng.range(180, 255) as u8;
        if let Some(pixel) = frame.pixels.get_mut(pos) {
            *pixel = hsv(hue as f32, 200, value);
        }
    }
}

fn romantic_chase<const N: usize>(frame: &mut EffectFrame<'_, N>) {
    fade_all(frame.pixels, 0.85);
    let span = frame.topology.max_distance() as u32 + 1;
    let distance = (frame.step / 3) % span;
    frame
        .topology
        .paint(frame.pixels, distance as usize, hsv(PINK_HUE, 200, 255));
}

fn rose_bloom<const N: usize>(frame: &mut EffectFrame<'_, N>) {
    frame.pixels.fill(BLACK);
    let span = frame.topology.max_distance() as u32 + 2;
    let reach = ((frame.step / 6) % span) as i32;
    let last = reach.min(frame.topology.max_distance() as i32);
    for distance in 0..=last {
        let value = map_range(distance, 0, reach, 255, 80);
        let color = hsv(PINK_HUE, 200, value.clamp(0, 255) as u8);
        frame.topology.paint(frame.pixels, distance as usize, color);
    }
}

fn candlelight<const N: usize>(frame: &mut EffectFrame<'_, N>) {
    for pixel in frame.pixels.iter_mut() {
        let flicker = frame.rng.range(200, 255) as u8;
        *pixel = hsv(30.0, 200, flicker);
    }
}

fn sunset_fade<const N: usize>(frame: &mut EffectFrame<'_, N>) {
    let hue = map_range((frame.step % 200) as i32, 0, 199, 10, 330);
    frame.pixels.fill(hsv(hue as f32, 200, 200));
}

fn love_pulse<const N: usize>(frame: &mut EffectFrame<'_, N>) {
    let cycle = frame.step % 100;
    let value = channel(libm::sinf(cycle as f32 * (PI / 50.0)) * 255.0);
    let hue = if (frame.step / 100) % 2 == 1 { 0.0 } else { PINK_HUE };
    frame.pixels.fill(hsv(hue, 200, value));
}

fn pink_comet<const N: usize>(frame: &mut EffectFrame<'_, N>) {
    fade_all(frame.pixels, 0.8);
    if N == 0 {
        return;
    }
    let pos = (frame.step / 2) as usize % N;
    frame.pixels[pos] = hsv(PINK_HUE, 200, 255);
}

fn valentine<const N: usize>(frame: &mut EffectFrame<'_, N>) {
    let shift = (frame.step / 20) as usize;
    for (i, pixel) in frame.pixels.iter_mut().enumerate() {
        let hue = if (i + shift) % 2 == 0 { 0.0 } else { PINK_HUE };
        *pixel = hsv(hue, 200, 200);
    }
}

fn dreamy_fade<const N: usize>(frame: &mut EffectFrame<'_, N>) {
    // red, orange, pink, magenta, blue, purple
    const HUES: [f32; 6] = [0.0, 30.0, 330.0, 300.0, 240.0, 270.0];

    let index = (frame.step / 100) as usize % HUES.len();
    let next = (index + 1) % HUES.len();
    let blend = (frame.step % 100) as f32 / 100.0;

    let from = hsv(HUES[index], 180, 200);
    let to = hsv(HUES[next], 180, 200);
    frame.pixels.fill(lerp(from, to, blend));
}
