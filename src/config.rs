//! Timing and threshold parameters.
//!
//! All tunables of the core live in [`CoreConfig`]. The defaults are the values
//! of the reference device; boards override individual fields with the
//! `with_*` builders and the coordinator validates the result once at startup.

use crate::status_led::{MorseBeacon, MorseError};

/// Number of LEDs in the reference heart ring.
pub const HEART_LED_COUNT: usize = 21;

/// Number of precomputed points in the reference oscilloscope waveform.
pub const WAVEFORM_POINTS: usize = 4000;

/// Default status LED morse message.
pub const DEFAULT_MORSE_MESSAGE: &str = "I LOVE YOU";

/// Runtime configuration of the coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CoreConfig {
    /// Minimum time between two registered press starts.
    pub debounce_ms: u64,
    /// Hold time after which a press becomes a long press.
    pub long_press_ms: u64,
    /// How long the splash screen is shown after boot.
    pub splash_ms: u64,
    /// How long the propose message stays up before returning to the menu.
    pub propose_display_ms: u64,
    /// Half period of the flashing heart hint.
    pub heart_flash_interval_ms: u64,
    /// Minimum time between two animation ticks (~60 Hz).
    pub animation_interval_ms: u64,
    /// Pause at the end of each normal-speed loop iteration.
    pub main_loop_delay_ms: u32,
    /// Waveform samples written per burst while the oscilloscope is active.
    pub burst_size: u32,
    /// Pause between two waveform samples.
    pub sample_delay_us: u32,
    /// How often input and state are serviced between bursts.
    pub service_interval_ms: u64,
    /// How often the battery is sampled.
    pub battery_sample_ms: u64,
    /// LED strip brightness applied when flushing.
    pub brightness: u8,
    /// Seed of the effect random generator.
    pub rng_seed: u32,
    /// Message blinked by the status LED while the proposal is shown.
    pub morse_message: &'static str,
}

impl CoreConfig {
    /// Reference device configuration.
    pub const fn new() -> Self {
        Self {
            debounce_ms: 50,
            long_press_ms: 500,
            splash_ms: 2000,
            propose_display_ms: 10_000,
            heart_flash_interval_ms: 500,
            animation_interval_ms: 16,
            main_loop_delay_ms: 10,
            burst_size: 100,
            sample_delay_us: 20,
            service_interval_ms: 50,
            battery_sample_ms: 1000,
            brightness: 128,
            rng_seed: 0x9e37_79b9,
            morse_message: DEFAULT_MORSE_MESSAGE,
        }
    }

    pub const fn with_debounce_ms(mut self, ms: u64) -> Self {
        self.debounce_ms = ms;
        self
    }

    pub const fn with_long_press_ms(mut self, ms: u64) -> Self {
        self.long_press_ms = ms;
        self
    }

    pub const fn with_splash_ms(mut self, ms: u64) -> Self {
        self.splash_ms = ms;
        self
    }

    pub const fn with_propose_display_ms(mut self, ms: u64) -> Self {
        self.propose_display_ms = ms;
        self
    }

    pub const fn with_heart_flash_interval_ms(mut self, ms: u64) -> Self {
        self.heart_flash_interval_ms = ms;
        self
    }

    pub const fn with_animation_interval_ms(mut self, ms: u64) -> Self {
        self.animation_interval_ms = ms;
        self
    }

    pub const fn with_main_loop_delay_ms(mut self, ms: u32) -> Self {
        self.main_loop_delay_ms = ms;
        self
    }

    pub const fn with_burst(mut self, burst_size: u32, sample_delay_us: u32) -> Self {
        self.burst_size = burst_size;
        self.sample_delay_us = sample_delay_us;
        self
    }

    pub const fn with_service_interval_ms(mut self, ms: u64) -> Self {
        self.service_interval_ms = ms;
        self
    }

    pub const fn with_battery_sample_ms(mut self, ms: u64) -> Self {
        self.battery_sample_ms = ms;
        self
    }

    pub const fn with_brightness(mut self, brightness: u8) -> Self {
        self.brightness = brightness;
        self
    }

    pub const fn with_rng_seed(mut self, seed: u32) -> Self {
        self.rng_seed = seed;
        self
    }

    pub const fn with_morse_message(mut self, message: &'static str) -> Self {
        self.morse_message = message;
        self
    }

    /// Checks the parameters that the loop divides by or compares against
    /// each other.
    ///
    /// # Errors
    /// * `ZeroHeartFlashInterval` - the heart flash period would be zero
    /// * `ZeroBurstSize` - the oscilloscope burst would never write a sample
    /// * `LongPressWithinDebounce` - every registered press would already be long
    /// * `MorseMessage` - the status LED message cannot be encoded
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validated_beacon().map(|_| ())
    }

    /// Runs [`validate`](Self::validate) and hands back the encoded status
    /// LED message, so callers that need the beacon encode it only once.
    ///
    /// # Errors
    /// Same as [`validate`](Self::validate).
    pub fn validated_beacon(&self) -> Result<MorseBeacon, ConfigError> {
        if self.heart_flash_interval_ms == 0 {
            return Err(ConfigError::ZeroHeartFlashInterval);
        }
        if self.burst_size == 0 {
            return Err(ConfigError::ZeroBurstSize);
        }
        if self.long_press_ms <= self.debounce_ms {
            return Err(ConfigError::LongPressWithinDebounce {
                long_press_ms: self.long_press_ms,
                debounce_ms: self.debounce_ms,
            });
        }
        MorseBeacon::new(self.morse_message).map_err(ConfigError::MorseMessage)
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Configuration validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// `heart_flash_interval_ms` is zero.
    ZeroHeartFlashInterval,

    /// `burst_size` is zero.
    ZeroBurstSize,

    /// `long_press_ms` does not exceed `debounce_ms`.
    LongPressWithinDebounce { long_press_ms: u64, debounce_ms: u64 },

    /// `morse_message` is empty, too long or has unsupported characters.
    MorseMessage(MorseError),
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConfigError::ZeroHeartFlashInterval => {
                write!(f, "heart flash interval must be non-zero")
            }
            ConfigError::ZeroBurstSize => {
                write!(f, "waveform burst size must be non-zero")
            }
            ConfigError::LongPressWithinDebounce {
                long_press_ms,
                debounce_ms,
            } => {
                write!(
                    f,
                    "long press threshold ({} ms) must exceed the debounce window ({} ms)",
                    long_press_ms, debounce_ms
                )
            }
            ConfigError::MorseMessage(e) => write!(f, "invalid morse message: {}", e),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}
