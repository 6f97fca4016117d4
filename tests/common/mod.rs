//! Shared test infrastructure for heart-core integration tests

#![allow(dead_code)] // Items used across multiple test files; Rust analyzes per-file

use core::cell::Cell;

use embedded_hal::delay::DelayNs;
use heart_core::{
    BatteryReading, BatterySource, ButtonInput, DacChannel, DacOutput, LedStrip, Pixel, RgbLed,
    Renderer, ScreenView, TimeDuration, TimeInstant, TimeSource,
};

// ============================================================================
// Mock Time Types
// ============================================================================

/// Mock duration type for testing (wraps microseconds)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TestDuration(pub u64);

impl TimeDuration for TestDuration {
    fn as_millis(&self) -> u64 {
        self.0 / 1000
    }
}

/// Mock instant type for testing (microseconds since boot)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TestInstant(pub u64);

impl TimeInstant for TestInstant {
    type Duration = TestDuration;

    fn duration_since(&self, earlier: Self) -> Self::Duration {
        TestDuration(self.0 - earlier.0)
    }
}

/// Instant `millis` milliseconds after boot
pub fn ms(millis: u64) -> TestInstant {
    TestInstant(millis * 1000)
}

// ============================================================================
// Mock Time Source
// ============================================================================

/// Mock time source with controllable time advancement
pub struct MockTimeSource {
    current_time: Cell<TestInstant>,
}

impl MockTimeSource {
    pub fn new() -> Self {
        Self {
            current_time: Cell::new(TestInstant(0)),
        }
    }

    pub fn advance_us(&self, micros: u64) {
        let current = self.current_time.get();
        self.current_time.set(TestInstant(current.0 + micros));
    }

    pub fn advance_ms(&self, millis: u64) {
        self.advance_us(millis * 1000);
    }

    pub fn set_time(&self, time: TestInstant) {
        self.current_time.set(time);
    }

    pub fn now_ms(&self) -> u64 {
        self.current_time.get().0 / 1000
    }
}

impl TimeSource<TestInstant> for MockTimeSource {
    fn now(&self) -> TestInstant {
        self.current_time.get()
    }
}

// ============================================================================
// Mock Board
// ============================================================================

pub const DAC_LOG_CAPACITY: usize = 4096;

/// Mock board that records everything the coordinator writes.
///
/// Delays advance the shared clock, so a coordinator driven by this board
/// sees time pass exactly as its own pauses dictate.
pub struct MockBoard<'a> {
    clock: &'a MockTimeSource,
    pub pressed: bool,
    pub battery_reading: BatteryReading,
    pub battery_reads: u32,
    pub dac_writes: heapless::Vec<(DacChannel, u16), DAC_LOG_CAPACITY>,
    pub dac_write_count: u32,
    pub last_x: Option<u16>,
    pub last_y: Option<u16>,
    pub frames: u32,
    pub last_frame: heapless::Vec<Pixel, 64>,
    pub status_colors: heapless::Vec<Pixel, 256>,
    pub renders: u32,
    pub last_view: Option<ScreenView>,
}

impl<'a> MockBoard<'a> {
    pub fn new(clock: &'a MockTimeSource) -> Self {
        Self {
            clock,
            pressed: false,
            battery_reading: BatteryReading::new(3.9, 75, 2400, false),
            battery_reads: 0,
            dac_writes: heapless::Vec::new(),
            dac_write_count: 0,
            last_x: None,
            last_y: None,
            frames: 0,
            last_frame: heapless::Vec::new(),
            status_colors: heapless::Vec::new(),
            renders: 0,
            last_view: None,
        }
    }

    pub fn clear_dac_log(&mut self) {
        self.dac_writes.clear();
    }
}

impl ButtonInput for MockBoard<'_> {
    fn is_pressed(&mut self) -> bool {
        self.pressed
    }
}

impl LedStrip for MockBoard<'_> {
    fn write(&mut self, pixels: &[Pixel]) {
        self.frames += 1;
        self.last_frame.clear();
        let _ = self.last_frame.extend_from_slice(pixels);
    }
}

impl RgbLed for MockBoard<'_> {
    fn set_color(&mut self, color: Pixel) {
        let _ = self.status_colors.push(color);
    }
}

impl DacOutput for MockBoard<'_> {
    fn write(&mut self, channel: DacChannel, value: u16) {
        self.dac_write_count += 1;
        match channel {
            DacChannel::X => self.last_x = Some(value),
            DacChannel::Y => self.last_y = Some(value),
        }
        let _ = self.dac_writes.push((channel, value));
    }
}

impl DelayNs for MockBoard<'_> {
    fn delay_ns(&mut self, ns: u32) {
        self.clock.advance_us(ns.div_ceil(1000) as u64);
    }
}

impl BatterySource for MockBoard<'_> {
    fn read_battery(&mut self) -> BatteryReading {
        self.battery_reads += 1;
        self.battery_reading
    }
}

impl Renderer for MockBoard<'_> {
    fn render(&mut self, view: &ScreenView) {
        self.renders += 1;
        self.last_view = Some(*view);
    }
}

// ============================================================================
// Mock DAC
// ============================================================================

/// Standalone DAC recording the last value per channel
pub struct MockDac {
    pub x: Option<u16>,
    pub y: Option<u16>,
    pub writes: u32,
}

impl MockDac {
    pub fn new() -> Self {
        Self {
            x: None,
            y: None,
            writes: 0,
        }
    }
}

impl DacOutput for MockDac {
    fn write(&mut self, channel: DacChannel, value: u16) {
        self.writes += 1;
        match channel {
            DacChannel::X => self.x = Some(value),
            DacChannel::Y => self.y = Some(value),
        }
    }
}

impl DelayNs for MockDac {
    fn delay_ns(&mut self, _ns: u32) {}
}

// ============================================================================
// Mock LED Strip
// ============================================================================

/// Strip keeping only the last frame
pub struct MockStrip {
    pub frame: heapless::Vec<Pixel, 64>,
    pub writes: u32,
}

impl MockStrip {
    pub fn new() -> Self {
        Self {
            frame: heapless::Vec::new(),
            writes: 0,
        }
    }
}

impl LedStrip for MockStrip {
    fn write(&mut self, pixels: &[Pixel]) {
        self.writes += 1;
        self.frame.clear();
        let _ = self.frame.extend_from_slice(pixels);
    }
}

// ============================================================================
// Mock Status LED
// ============================================================================

/// Mock LED that records all color changes for testing
pub struct MockLed {
    current_color: Option<Pixel>,
    color_history: heapless::Vec<Pixel, 64>,
}

impl MockLed {
    pub fn new() -> Self {
        Self {
            current_color: None,
            color_history: heapless::Vec::new(),
        }
    }

    pub fn get_last_color(&self) -> Option<Pixel> {
        self.current_color
    }

    pub fn color_history(&self) -> &[Pixel] {
        &self.color_history
    }
}

impl RgbLed for MockLed {
    fn set_color(&mut self, color: Pixel) {
        self.current_color = Some(color);
        let _ = self.color_history.push(color);
    }
}
