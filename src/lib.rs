#![cfg_attr(not(feature = "std"), no_std)]
#![doc = include_str!("../README.md")]

//! # Core Concepts
//!
//! - **`ButtonDetector`**: Turns raw pin samples into short/long press events
//! - **`StateMachine`**: Menu and mode transitions driven by button events and two timeouts
//! - **`CoreAction`**: Side effect a transition asks the coordinator to apply
//! - **`AnimationEngine`**: Advances the selected `Effect` over the heart pixel buffer
//! - **`HeartTopology`**: Maps distance-from-top to LED indices for the heart-shaped effects
//! - **`WaveformGenerator`**: Precomputed XY heart curve streamed to a two-channel DAC
//! - **`StatusLed`**: Battery gauge, charging pulse and morse patterns on the status LED
//! - **`Coordinator`**: Owns everything and runs the two-speed main loop
//! - **`TimeSource`**: Trait to implement for your timing system
//!
//! Pixels are `Srgb<u8>`. Brightness is applied when the buffer is flushed to the
//! strip, so effects always work at full scale.

#[macro_use]
mod fmt;

// Re-export Srgb from palette for user convenience
pub use palette::Srgb;

pub mod action;
pub mod animation;
pub mod battery;
pub mod button;
pub mod colors;
pub mod config;
pub mod coordinator;
pub mod effect;
pub mod state;
pub mod status_led;
pub mod time;
pub mod topology;
pub mod waveform;

pub use action::CoreAction;
pub use animation::{AnimationEngine, LedStrip};
pub use battery::{BatteryReading, BatterySource};
pub use button::{ButtonDetector, ButtonEvent, ButtonInput, ButtonState, PinButton, PressedTo};
pub use colors::Pixel;
pub use config::{ConfigError, CoreConfig, DEFAULT_MORSE_MESSAGE, HEART_LED_COUNT, WAVEFORM_POINTS};
pub use coordinator::{
    Board, Coordinator, HeartCoordinator, HeartWaveform, LoopMode, Renderer, ScreenView,
};
pub use effect::Effect;
pub use state::{AppState, MenuItem, StateMachine};
pub use status_led::{MorseBeacon, MorseError, RgbLed, StatusLed, StatusPattern};
pub use time::{Millis, MillisDuration, TimeDuration, TimeInstant, TimeSource};
pub use topology::HeartTopology;
pub use waveform::{DAC_CENTER, DAC_MAX, DacChannel, DacOutput, Mcp4922, WaveformGenerator};
