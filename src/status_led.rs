//! Built-in status LED patterns.
//!
//! The single RGB LED next to the MCU shows the battery gauge, a charging pulse,
//! a gentle love pulse or a repeating morse message. [`StatusLed`] keeps its own
//! cadence and only touches the LED when a pattern step is due.

use heapless::Vec;

use crate::colors::{BLACK, PINK, Pixel, battery_color, scale};
use crate::time::{TimeInstant, is_due};

/// Trait for abstracting the single status RGB LED.
///
/// Handle any hardware errors internally - this method cannot fail.
pub trait RgbLed {
    fn set_color(&mut self, color: Pixel);
}

const CHARGING_INTERVAL_MS: u64 = 50;
const LOVE_INTERVAL_MS: u64 = 80;

pub const DOT_MS: u32 = 80;
pub const DASH_MS: u32 = 240;
pub const SYMBOL_GAP_MS: u32 = 80;
pub const LETTER_GAP_MS: u32 = 240;
pub const WORD_GAP_MS: u32 = 560;

/// Maximum on/off elements in a morse schedule.
pub const MORSE_CAPACITY: usize = 192;

/// What the status LED is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StatusPattern {
    Off,
    /// Solid gauge color for the given percentage.
    Battery(u8),
    /// Gauge color pulsing between 30% and 100%.
    Charging(u8),
    LovePulse,
    Morse,
}

/// Morse schedule errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MorseError {
    /// Character with no morse code.
    UnsupportedCharacter(char),

    /// Message does not fit in [`MORSE_CAPACITY`] elements.
    CapacityExceeded,

    /// Message contains no encodable characters.
    EmptyMessage,
}

impl core::fmt::Display for MorseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            MorseError::UnsupportedCharacter(c) => {
                write!(f, "character {:?} has no morse code", c)
            }
            MorseError::CapacityExceeded => write!(f, "morse message too long"),
            MorseError::EmptyMessage => write!(f, "morse message is empty"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for MorseError {}

/// One stretch of the morse schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MorseElement {
    pub on: bool,
    pub duration_ms: u32,
}

fn morse_code(c: char) -> Option<&'static str> {
    let code = match c.to_ascii_uppercase() {
        'A' => ".-",
        'B' => "-...",
        'C' => "-.-.",
        'D' => "-..",
        'E' => ".",
        'F' => "..-.",
        'G' => "--.",
        'H' => "....",
        'I' => "..",
        'J' => ".---",
        'K' => "-.-",
        'L' => ".-..",
        'M' => "--",
        'N' => "-.",
        'O' => "---",
        'P' => ".--.",
        'Q' => "--.-",
        'R' => ".-.",
        'S' => "...",
        'T' => "-",
        'U' => "..-",
        'V' => "...-",
        'W' => ".--",
        'X' => "-..-",
        'Y' => "-.--",
        'Z' => "--..",
        '0' => "-----",
        '1' => ".----",
        '2' => "..---",
        '3' => "...--",
        '4' => "....-",
        '5' => ".....",
        '6' => "-....",
        '7' => "--...",
        '8' => "---..",
        '9' => "----.",
        _ => return None,
    };
    Some(code)
}

/// A message encoded as a looping on/off schedule.
#[derive(Debug, Clone)]
pub struct MorseBeacon {
    schedule: Vec<MorseElement, MORSE_CAPACITY>,
}

impl MorseBeacon {
    /// Encodes `message`. Words are separated by whitespace; the schedule ends
    /// with a word gap so the message repeats cleanly.
    ///
    /// # Errors
    /// * `UnsupportedCharacter` - a non-alphanumeric, non-space character
    /// * `CapacityExceeded` - the schedule would exceed [`MORSE_CAPACITY`]
    /// * `EmptyMessage` - nothing to send
    pub fn new(message: &str) -> Result<Self, MorseError> {
        let mut schedule: Vec<MorseElement, MORSE_CAPACITY> = Vec::new();

        for word in message.split_whitespace() {
            for letter in word.chars() {
                let code = morse_code(letter).ok_or(MorseError::UnsupportedCharacter(letter))?;
                for symbol in code.chars() {
                    let on_ms = if symbol == '.' { DOT_MS } else { DASH_MS };
                    push(&mut schedule, true, on_ms)?;
                    push(&mut schedule, false, SYMBOL_GAP_MS)?;
                }
                stretch_gap(&mut schedule, LETTER_GAP_MS);
            }
            stretch_gap(&mut schedule, WORD_GAP_MS);
        }

        if schedule.is_empty() {
            return Err(MorseError::EmptyMessage);
        }
        Ok(Self { schedule })
    }

    /// The encoded schedule.
    pub fn schedule(&self) -> &[MorseElement] {
        &self.schedule
    }

    /// Length of one full repetition.
    pub fn period_ms(&self) -> u64 {
        self.schedule.iter().map(|e| e.duration_ms as u64).sum()
    }

    /// Whether the LED is lit `elapsed_ms` after the message started.
    pub fn is_on_at(&self, elapsed_ms: u64) -> bool {
        let period = self.period_ms();
        if period == 0 {
            return false;
        }
        let mut remaining = elapsed_ms % period;
        for element in self.schedule.iter() {
            let duration = element.duration_ms as u64;
            if remaining < duration {
                return element.on;
            }
            remaining -= duration;
        }
        false
    }
}

fn push(
    schedule: &mut Vec<MorseElement, MORSE_CAPACITY>,
    on: bool,
    duration_ms: u32,
) -> Result<(), MorseError> {
    schedule
        .push(MorseElement { on, duration_ms })
        .map_err(|_| MorseError::CapacityExceeded)
}

// widens the trailing gap instead of adding a new element
fn stretch_gap(schedule: &mut Vec<MorseElement, MORSE_CAPACITY>, gap_ms: u32) {
    if let Some(last) = schedule.last_mut() {
        if !last.on && last.duration_ms < gap_ms {
            last.duration_ms = gap_ms;
        }
    }
}

/// Drives the status LED through the selected pattern.
pub struct StatusLed<I: TimeInstant> {
    pattern: StatusPattern,
    started_at: Option<I>,
    last_update: Option<I>,
    step: u8,
    beacon: MorseBeacon,
    shown: Option<Pixel>,
}

impl<I: TimeInstant> StatusLed<I> {
    pub fn new(beacon: MorseBeacon) -> Self {
        Self {
            pattern: StatusPattern::Off,
            started_at: None,
            last_update: None,
            step: 0,
            beacon,
            shown: None,
        }
    }

    /// Selects a pattern. Changing to a different kind of pattern restarts its
    /// animation; a new battery percentage only changes the color.
    pub fn set_pattern(&mut self, pattern: StatusPattern) {
        if core::mem::discriminant(&pattern) != core::mem::discriminant(&self.pattern) {
            self.started_at = None;
            self.last_update = None;
            self.step = 0;
        }
        self.pattern = pattern;
    }

    pub fn pattern(&self) -> StatusPattern {
        self.pattern
    }

    /// Updates the LED if the pattern has a step due at `now`.
    pub fn service<L: RgbLed + ?Sized>(&mut self, now: I, led: &mut L) {
        let started = *self.started_at.get_or_insert(now);

        let color = match self.pattern {
            StatusPattern::Off => BLACK,
            StatusPattern::Battery(percentage) => battery_color(percentage),
            StatusPattern::Charging(percentage) => {
                if !is_due(self.last_update, now, CHARGING_INTERVAL_MS) {
                    return;
                }
                self.last_update = Some(now);
                let pulse = (libm::sinf(self.step as f32 * 0.15) + 1.0) / 2.0;
                self.step = self.step.wrapping_add(1);
                scale(battery_color(percentage), 0.3 + pulse * 0.7)
            }
            StatusPattern::LovePulse => {
                if !is_due(self.last_update, now, LOVE_INTERVAL_MS) {
                    return;
                }
                self.last_update = Some(now);
                let pulse = (libm::sinf(self.step as f32 * 0.12) + 1.0) / 2.0;
                self.step = self.step.wrapping_add(1);
                let level = pulse * 200.0 + 55.0;
                Pixel::new(level as u8, (level / 4.0) as u8, (level / 2.0) as u8)
            }
            StatusPattern::Morse => {
                if self.beacon.is_on_at(now.millis_since(started)) {
                    PINK
                } else {
                    BLACK
                }
            }
        };

        if self.shown != Some(color) {
            led.set_color(color);
            self.shown = Some(color);
        }
    }

    /// Last color written to the LED.
    pub fn shown(&self) -> Option<Pixel> {
        self.shown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_letter_schedule() {
        let beacon = MorseBeacon::new("A").unwrap();
        assert_eq!(
            beacon.schedule(),
            &[
                MorseElement { on: true, duration_ms: DOT_MS },
                MorseElement { on: false, duration_ms: SYMBOL_GAP_MS },
                MorseElement { on: true, duration_ms: DASH_MS },
                MorseElement { on: false, duration_ms: WORD_GAP_MS },
            ]
        );
    }

    #[test]
    fn letters_are_separated_by_letter_gap() {
        let beacon = MorseBeacon::new("EE").unwrap();
        assert_eq!(beacon.schedule()[1].duration_ms, LETTER_GAP_MS);
        assert_eq!(beacon.schedule()[3].duration_ms, WORD_GAP_MS);
    }

    #[test]
    fn rejects_punctuation() {
        assert_eq!(
            MorseBeacon::new("HI!").unwrap_err(),
            MorseError::UnsupportedCharacter('!')
        );
    }

    #[test]
    fn rejects_blank_message() {
        assert_eq!(MorseBeacon::new("   ").unwrap_err(), MorseError::EmptyMessage);
    }

    #[test]
    fn rejects_oversized_message() {
        // '0' is five dashes: ten elements per letter
        let long = "0000000000000000000000000";
        assert_eq!(MorseBeacon::new(long).unwrap_err(), MorseError::CapacityExceeded);
    }
}
