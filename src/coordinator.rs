//! Cooperative main loop.
//!
//! [`Coordinator`] owns one of each component plus the board and runs them
//! under a two-speed policy:
//!
//! - **Normal**: every subsystem is serviced once, then the loop sleeps for
//!   `main_loop_delay_ms`.
//! - **Burst**: while the waveform is streaming, each iteration writes
//!   `burst_size` samples spaced by `sample_delay_us`, and input, state,
//!   animation and screen are only serviced every `service_interval_ms`.
//!
//! State transitions report their side effects as [`CoreAction`]s and the
//! coordinator applies them, so no component touches another directly.
//!
//! The waveform table is the one component borrowed rather than owned: at
//! 4000 points it is too large to move around on a task stack, so the caller
//! places it, typically in a `static`.

use embedded_hal::delay::DelayNs;

use crate::action::CoreAction;
use crate::animation::{AnimationEngine, LedStrip};
use crate::battery::{BatteryReading, BatterySource};
use crate::button::{ButtonDetector, ButtonInput};
use crate::config::{ConfigError, CoreConfig, HEART_LED_COUNT, WAVEFORM_POINTS};
use crate::effect::Effect;
use crate::state::{AppState, MenuItem, StateMachine};
use crate::status_led::{RgbLed, StatusLed, StatusPattern};
use crate::time::{TimeInstant, TimeSource, is_due};
use crate::waveform::{DacOutput, WaveformGenerator};

/// Everything the renderer needs to draw one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenView {
    pub state: AppState,
    pub menu_item: MenuItem,
    pub menu_selection: usize,
    pub animation_selection: usize,
    /// Display name of the selected animation.
    pub effect_name: &'static str,
    /// Long press held: draw inverted.
    pub invert: bool,
    /// Heart flash "on" phase.
    pub show_heart: bool,
    pub battery: Option<BatteryReading>,
}

/// Trait for abstracting the display.
///
/// Draw the whole screen from `view`. Handle bus errors internally - this
/// method cannot fail.
pub trait Renderer {
    fn render(&mut self, view: &ScreenView);
}

/// All board peripherals the coordinator drives.
///
/// Implemented automatically for any type providing every peripheral trait.
pub trait Board:
    ButtonInput + LedStrip + RgbLed + DacOutput + DelayNs + BatterySource + Renderer
{
}

impl<B> Board for B where
    B: ButtonInput + LedStrip + RgbLed + DacOutput + DelayNs + BatterySource + Renderer
{
}

/// Which policy the last [`Coordinator::step`] ran under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LoopMode {
    Normal,
    Burst,
}

/// Coordinator for the reference heart board.
pub type HeartCoordinator<'t, I, T, B> =
    Coordinator<'t, I, T, B, HEART_LED_COUNT, WAVEFORM_POINTS>;

/// Waveform table sized for [`HeartCoordinator`].
pub type HeartWaveform = WaveformGenerator<WAVEFORM_POINTS>;

/// Owns the components and runs the main loop.
///
/// # Type Parameters
/// * `I` - Time instant type
/// * `T` - Time source
/// * `B` - Board peripherals
/// * `LEDS` - Number of LEDs in the heart ring
/// * `SAMPLES` - Number of waveform points
pub struct Coordinator<'t, I, T, B, const LEDS: usize, const SAMPLES: usize>
where
    I: TimeInstant,
    T: TimeSource<I>,
    B: Board,
{
    board: B,
    time_source: &'t T,
    config: CoreConfig,
    button: ButtonDetector<I>,
    state: StateMachine<I>,
    animation: AnimationEngine<I, LEDS>,
    waveform: &'t mut WaveformGenerator<SAMPLES>,
    status: StatusLed<I>,
    battery: Option<BatteryReading>,
    last_battery_sample: Option<I>,
    last_service: Option<I>,
}

impl<'t, I, T, B, const LEDS: usize, const SAMPLES: usize> Coordinator<'t, I, T, B, LEDS, SAMPLES>
where
    I: TimeInstant,
    T: TimeSource<I>,
    B: Board,
{
    /// Validates `config`, precomputes `waveform` in place and parks the DAC.
    ///
    /// # Errors
    /// Any [`ConfigError`] reported by [`CoreConfig::validate`].
    pub fn new(
        board: B,
        time_source: &'t T,
        waveform: &'t mut WaveformGenerator<SAMPLES>,
        config: CoreConfig,
    ) -> Result<Self, ConfigError> {
        let beacon = config.validated_beacon()?;

        let now = time_source.now();
        waveform.precompute();

        let mut coordinator = Self {
            board,
            time_source,
            config,
            button: ButtonDetector::from_config(&config),
            state: StateMachine::new(now, &config),
            animation: AnimationEngine::from_config(&config),
            waveform,
            status: StatusLed::new(beacon),
            battery: None,
            last_battery_sample: None,
            last_service: None,
        };
        coordinator.waveform.stop(&mut coordinator.board);
        info!("coordinator: ready, {} leds, {} waveform points", LEDS, SAMPLES);
        Ok(coordinator)
    }

    /// Runs one loop iteration and reports the policy it used.
    pub fn step(&mut self) -> LoopMode {
        if self.waveform.is_active() {
            self.waveform.burst(
                &mut self.board,
                self.config.burst_size,
                self.config.sample_delay_us,
            );
            let now = self.time_source.now();
            if is_due(self.last_service, now, self.config.service_interval_ms) {
                self.service(now);
            }
            LoopMode::Burst
        } else {
            let now = self.time_source.now();
            self.service(now);
            self.board.delay_ms(self.config.main_loop_delay_ms);
            LoopMode::Normal
        }
    }

    /// Runs the loop forever.
    pub fn run(&mut self) -> ! {
        loop {
            self.step();
        }
    }

    /// Services input, state, battery, animation, status LED and screen once.
    pub fn service(&mut self, now: I) {
        self.last_service = Some(now);

        // the splash ignores the button
        if self.state.state() != AppState::Splash {
            let raw = self.board.is_pressed();
            let event = self.button.poll(raw, now);
            if let Some(action) = self.state.handle_event(event, now) {
                self.apply(action);
            }
        }
        self.state.update(now);

        if is_due(self.last_battery_sample, now, self.config.battery_sample_ms) {
            self.battery = Some(self.board.read_battery());
            self.last_battery_sample = Some(now);
        }

        let effect = self.animation.effect();
        if self.animation.tick(now, effect) {
            self.animation.flush(&mut self.board);
        }

        self.status.set_pattern(self.status_pattern());
        self.status.service(now, &mut self.board);

        let view = self.screen_view(now);
        self.board.render(&view);
    }

    /// Applies a state transition side effect.
    pub fn apply(&mut self, action: CoreAction) {
        trace!("coordinator: apply {}", action);
        match action {
            CoreAction::StartWaveform => self.waveform.start(),
            CoreAction::StopWaveform => self.waveform.stop(&mut self.board),
            CoreAction::SetEffect(effect) => self.animation.set_effect(effect),
        }
    }

    fn status_pattern(&self) -> StatusPattern {
        match (self.state.state(), self.battery) {
            (AppState::Battery, Some(reading)) if reading.charging => {
                StatusPattern::Charging(reading.percentage)
            }
            (AppState::Battery, Some(reading)) => StatusPattern::Battery(reading.percentage),
            (AppState::ProposeWaiting, _) => StatusPattern::LovePulse,
            (AppState::ProposeDisplaying, _) => StatusPattern::Morse,
            _ => StatusPattern::Off,
        }
    }

    /// Snapshot of what the screen should show at `now`.
    pub fn screen_view(&self, now: I) -> ScreenView {
        ScreenView {
            state: self.state.state(),
            menu_item: self.state.selected_menu_item(),
            menu_selection: self.state.menu_selection(),
            animation_selection: self.state.animation_selection(),
            effect_name: self.state.selected_effect().name(),
            invert: self.state.invert_display(),
            show_heart: self.state.show_heart(now),
            battery: self.battery,
        }
    }

    /// Effect currently driving the LEDs.
    pub fn active_effect(&self) -> Effect {
        self.animation.effect()
    }

    pub fn board(&self) -> &B {
        &self.board
    }

    pub fn board_mut(&mut self) -> &mut B {
        &mut self.board
    }

    pub fn config(&self) -> &CoreConfig {
        &self.config
    }

    pub fn state_machine(&self) -> &StateMachine<I> {
        &self.state
    }

    pub fn animation(&self) -> &AnimationEngine<I, LEDS> {
        &self.animation
    }

    pub fn waveform(&self) -> &WaveformGenerator<SAMPLES> {
        &*self.waveform
    }

    pub fn status_led(&self) -> &StatusLed<I> {
        &self.status
    }

    /// Latest battery reading, if one has been taken.
    pub fn battery(&self) -> Option<BatteryReading> {
        self.battery
    }

    /// Releases the board. The waveform table stays with its owner.
    pub fn into_board(self) -> B {
        self.board
    }
}
