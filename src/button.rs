//! Debounced short/long press detection.
//!
//! [`ButtonDetector::poll`] is called once per loop iteration with the raw pin
//! level and the current instant. It returns at most one [`ButtonEvent`].
//!
//! - A rising edge registers a press start only if at least the debounce window
//!   has passed since the previous registered press start. The window is
//!   measured from press start, not from release, so two real presses closer
//!   together than the window merge into one.
//! - While held past the long-press threshold, every poll reports
//!   [`ButtonEvent::LongPressActive`] (a level, not an edge).
//! - Release reports [`ButtonEvent::LongPressRelease`] if the threshold was
//!   reached during this press, [`ButtonEvent::ShortPress`] otherwise.

use crate::config::CoreConfig;
use crate::time::TimeInstant;
use embedded_hal::digital::InputPin;

/// Result of one button poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonEvent {
    /// Nothing to report.
    #[default]
    None,
    /// Released before the long-press threshold.
    ShortPress,
    /// Still held past the long-press threshold.
    LongPressActive,
    /// Released after the long-press threshold was reached.
    LongPressRelease,
}

/// Press tracking owned by the detector.
///
/// `long_press_triggered` is only ever true while `pressed` is true.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonState<I> {
    pub pressed: bool,
    pub press_start: Option<I>,
    pub long_press_triggered: bool,
}

/// Converts raw pin levels into debounced press events.
#[derive(Debug, Clone)]
pub struct ButtonDetector<I: TimeInstant> {
    state: ButtonState<I>,
    debounce_ms: u64,
    long_press_ms: u64,
}

impl<I: TimeInstant> ButtonDetector<I> {
    /// Creates a released detector with the given thresholds.
    pub fn new(debounce_ms: u64, long_press_ms: u64) -> Self {
        Self {
            state: ButtonState {
                pressed: false,
                press_start: None,
                long_press_triggered: false,
            },
            debounce_ms,
            long_press_ms,
        }
    }

    /// Creates a detector using the thresholds from `config`.
    pub fn from_config(config: &CoreConfig) -> Self {
        Self::new(config.debounce_ms, config.long_press_ms)
    }

    /// Feeds one raw sample and returns the resulting event.
    pub fn poll(&mut self, raw_pressed: bool, now: I) -> ButtonEvent {
        let mut event = ButtonEvent::None;

        if raw_pressed && !self.state.pressed {
            let settled = match self.state.press_start {
                None => true,
                Some(start) => now.millis_since(start) >= self.debounce_ms,
            };
            if settled {
                self.state.pressed = true;
                self.state.press_start = Some(now);
                self.state.long_press_triggered = false;
            }
        }

        if raw_pressed && self.state.pressed {
            if let Some(start) = self.state.press_start {
                if now.millis_since(start) >= self.long_press_ms {
                    self.state.long_press_triggered = true;
                    event = ButtonEvent::LongPressActive;
                }
            }
        }

        if !raw_pressed && self.state.pressed {
            self.state.pressed = false;
            event = if self.state.long_press_triggered {
                ButtonEvent::LongPressRelease
            } else {
                ButtonEvent::ShortPress
            };
            self.state.long_press_triggered = false;
        }

        event
    }

    /// Returns the current press tracking state.
    pub fn state(&self) -> &ButtonState<I> {
        &self.state
    }

    /// Returns true while a registered press is held.
    pub fn is_pressed(&self) -> bool {
        self.state.pressed
    }
}

/// Raw button level source.
pub trait ButtonInput {
    /// Returns true while the button is physically pressed.
    fn is_pressed(&mut self) -> bool;
}

/// Electrical level that means "pressed".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PressedTo {
    /// Button pulls the pin to ground (pull-up input, reads low when pressed).
    Ground,
    /// Button pulls the pin to supply (pull-down input, reads high when pressed).
    Voltage,
}

/// [`ButtonInput`] over an `embedded-hal` input pin.
///
/// A failed pin read counts as "not pressed".
pub struct PinButton<P: InputPin> {
    pin: P,
    pressed_to: PressedTo,
}

impl<P: InputPin> PinButton<P> {
    pub fn new(pin: P, pressed_to: PressedTo) -> Self {
        Self { pin, pressed_to }
    }

    /// Releases the wrapped pin.
    pub fn into_inner(self) -> P {
        self.pin
    }
}

impl<P: InputPin> ButtonInput for PinButton<P> {
    fn is_pressed(&mut self) -> bool {
        let level = match self.pressed_to {
            PressedTo::Ground => self.pin.is_low(),
            PressedTo::Voltage => self.pin.is_high(),
        };
        level.unwrap_or(false)
    }
}
