//! Battery readings handed in by the board's sampler.

/// One battery measurement.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BatteryReading {
    /// Pack voltage after the divider correction.
    pub voltage: f32,
    /// State of charge, 0-100.
    pub percentage: u8,
    /// Averaged raw ADC code.
    pub raw_adc: u16,
    /// Charger reports an active charge cycle.
    pub charging: bool,
}

impl BatteryReading {
    /// Builds a reading, clamping `percentage` to 100.
    pub fn new(voltage: f32, percentage: u8, raw_adc: u16, charging: bool) -> Self {
        Self {
            voltage,
            percentage: percentage.min(100),
            raw_adc,
            charging,
        }
    }
}

/// Trait for abstracting the battery sampler (ADC plus charger status pin).
pub trait BatterySource {
    fn read_battery(&mut self) -> BatteryReading;
}
