//! Application state machine.
//!
//! Provides [`StateMachine`], which owns the current [`AppState`], the menu and
//! animation selections and the display hints. It consumes one
//! [`ButtonEvent`] per loop iteration plus the clock for the two automatic
//! timeouts, and reports cross-component side effects as [`CoreAction`]s.
//!
//! | From              | Trigger          | To                | Action              |
//! |-------------------|------------------|-------------------|---------------------|
//! | Splash            | splash timeout   | Menu              |                     |
//! | Menu              | ShortPress       | Menu              | next menu item      |
//! | Menu              | LongPressRelease | selected item     | start waveform / set effect |
//! | ProposeWaiting    | ShortPress       | ProposeDisplaying |                     |
//! | ProposeDisplaying | display timeout  | Menu              |                     |
//! | Oscilloscope      | ShortPress       | Menu              | stop waveform       |
//! | OtaUpdate         | ShortPress       | Menu              |                     |
//! | Animations        | ShortPress       | Animations        | next effect         |
//! | Animations        | LongPressRelease | Menu              | effect off          |
//! | Battery           | ShortPress       | Menu              |                     |

use crate::action::CoreAction;
use crate::button::ButtonEvent;
use crate::config::CoreConfig;
use crate::effect::Effect;
use crate::time::TimeInstant;

/// Top-level screen / mode of the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AppState {
    Splash,
    Menu,
    ProposeWaiting,
    ProposeDisplaying,
    Oscilloscope,
    OtaUpdate,
    Animations,
    Battery,
}

/// Entries of the main menu, in cycling order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MenuItem {
    Propose,
    Oscilloscope,
    OtaUpdate,
    Animations,
    Battery,
}

impl MenuItem {
    pub const ALL: [MenuItem; 5] = [
        MenuItem::Propose,
        MenuItem::Oscilloscope,
        MenuItem::OtaUpdate,
        MenuItem::Animations,
        MenuItem::Battery,
    ];

    pub const COUNT: usize = Self::ALL.len();

    /// Menu item at `index`, wrapping past the end.
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % Self::COUNT]
    }

    pub fn label(self) -> &'static str {
        match self {
            MenuItem::Propose => "Propose",
            MenuItem::Oscilloscope => "Oscilloscope",
            MenuItem::OtaUpdate => "OTA Update",
            MenuItem::Animations => "Animations",
            MenuItem::Battery => "Battery",
        }
    }

    /// State entered when this item is chosen.
    pub fn target(self) -> AppState {
        match self {
            MenuItem::Propose => AppState::ProposeWaiting,
            MenuItem::Oscilloscope => AppState::Oscilloscope,
            MenuItem::OtaUpdate => AppState::OtaUpdate,
            MenuItem::Animations => AppState::Animations,
            MenuItem::Battery => AppState::Battery,
        }
    }
}

/// Owns the application mode and everything the renderer reads from it.
pub struct StateMachine<I: TimeInstant> {
    state: AppState,
    entered_at: I,
    menu_selection: usize,
    animation_selection: usize,
    invert_display: bool,
    splash_ms: u64,
    propose_display_ms: u64,
    heart_flash_interval_ms: u64,
}

impl<I: TimeInstant> StateMachine<I> {
    /// Starts in [`AppState::Splash`] at `now`.
    pub fn new(now: I, config: &CoreConfig) -> Self {
        Self {
            state: AppState::Splash,
            entered_at: now,
            menu_selection: 0,
            animation_selection: 0,
            invert_display: false,
            splash_ms: config.splash_ms,
            propose_display_ms: config.propose_display_ms,
            heart_flash_interval_ms: config.heart_flash_interval_ms.max(1),
        }
    }

    /// Applies the automatic timeouts. Returns true if the state changed.
    pub fn update(&mut self, now: I) -> bool {
        let elapsed = now.millis_since(self.entered_at);
        match self.state {
            AppState::Splash if elapsed >= self.splash_ms => {
                self.transition_to(AppState::Menu, now);
                true
            }
            AppState::ProposeDisplaying if elapsed >= self.propose_display_ms => {
                self.transition_to(AppState::Menu, now);
                true
            }
            _ => false,
        }
    }

    /// Feeds one button event, returning the side effect to apply, if any.
    pub fn handle_event(&mut self, event: ButtonEvent, now: I) -> Option<CoreAction> {
        match event {
            ButtonEvent::None => {
                self.invert_display = false;
                None
            }
            ButtonEvent::LongPressActive => {
                self.invert_display = true;
                None
            }
            ButtonEvent::ShortPress => self.on_short_press(now),
            ButtonEvent::LongPressRelease => self.on_long_press_release(now),
        }
    }

    fn on_short_press(&mut self, now: I) -> Option<CoreAction> {
        match self.state {
            AppState::Menu => {
                self.menu_selection = (self.menu_selection + 1) % MenuItem::COUNT;
                None
            }
            AppState::ProposeWaiting => {
                self.transition_to(AppState::ProposeDisplaying, now);
                None
            }
            AppState::Oscilloscope => {
                self.transition_to(AppState::Menu, now);
                Some(CoreAction::StopWaveform)
            }
            AppState::OtaUpdate | AppState::Battery => {
                self.transition_to(AppState::Menu, now);
                None
            }
            AppState::Animations => {
                self.animation_selection = (self.animation_selection + 1) % Effect::COUNT;
                Some(CoreAction::SetEffect(self.selected_effect()))
            }
            AppState::Splash | AppState::ProposeDisplaying => None,
        }
    }

    fn on_long_press_release(&mut self, now: I) -> Option<CoreAction> {
        match self.state {
            AppState::Menu => {
                let target = self.selected_menu_item().target();
                self.transition_to(target, now);
                match target {
                    AppState::Oscilloscope => Some(CoreAction::StartWaveform),
                    AppState::Animations => Some(CoreAction::SetEffect(self.selected_effect())),
                    _ => None,
                }
            }
            AppState::Animations => {
                self.transition_to(AppState::Menu, now);
                Some(CoreAction::SetEffect(Effect::Off))
            }
            _ => None,
        }
    }

    fn transition_to(&mut self, state: AppState, now: I) {
        info!("state: {} -> {}", self.state, state);
        self.state = state;
        self.entered_at = now;
        self.invert_display = false;
    }

    pub fn state(&self) -> AppState {
        self.state
    }

    /// Instant the current state was entered.
    pub fn entered_at(&self) -> I {
        self.entered_at
    }

    pub fn menu_selection(&self) -> usize {
        self.menu_selection
    }

    pub fn selected_menu_item(&self) -> MenuItem {
        MenuItem::from_index(self.menu_selection)
    }

    pub fn animation_selection(&self) -> usize {
        self.animation_selection
    }

    pub fn selected_effect(&self) -> Effect {
        Effect::from_index(self.animation_selection)
    }

    /// True while a long press is being held.
    pub fn invert_display(&self) -> bool {
        self.invert_display
    }

    /// True during the "on" half of the heart flash in `ProposeDisplaying`.
    pub fn show_heart(&self, now: I) -> bool {
        if self.state != AppState::ProposeDisplaying {
            return false;
        }
        let interval = self.heart_flash_interval_ms;
        now.millis_since(self.entered_at) % interval.saturating_mul(2) < interval
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::Millis;

    fn in_menu() -> StateMachine<Millis> {
        let mut machine = StateMachine::new(Millis(0), &CoreConfig::default());
        assert!(machine.update(Millis(2000)));
        machine
    }

    #[test]
    fn splash_waits_for_timeout() {
        let mut machine = StateMachine::new(Millis(0), &CoreConfig::default());
        assert!(!machine.update(Millis(1999)));
        assert_eq!(machine.state(), AppState::Splash);
        assert!(machine.update(Millis(2000)));
        assert_eq!(machine.state(), AppState::Menu);
    }

    #[test]
    fn ota_exits_on_short_press() {
        let mut machine = in_menu();
        machine.handle_event(ButtonEvent::ShortPress, Millis(2100));
        machine.handle_event(ButtonEvent::ShortPress, Millis(2200));
        assert_eq!(machine.selected_menu_item(), MenuItem::OtaUpdate);

        machine.handle_event(ButtonEvent::LongPressRelease, Millis(3000));
        assert_eq!(machine.state(), AppState::OtaUpdate);
        assert_eq!(machine.handle_event(ButtonEvent::ShortPress, Millis(3100)), None);
        assert_eq!(machine.state(), AppState::Menu);
    }

    #[test]
    fn transition_clears_invert_hint() {
        let mut machine = in_menu();
        machine.handle_event(ButtonEvent::LongPressActive, Millis(2600));
        assert!(machine.invert_display());
        machine.handle_event(ButtonEvent::LongPressRelease, Millis(2700));
        assert!(!machine.invert_display());
        assert_eq!(machine.entered_at(), Millis(2700));
    }

    #[test]
    fn heart_flashes_only_while_displaying() {
        let mut machine = in_menu();
        assert!(!machine.show_heart(Millis(2000)));

        machine.handle_event(ButtonEvent::LongPressRelease, Millis(3000));
        machine.handle_event(ButtonEvent::ShortPress, Millis(4000));
        assert!(machine.show_heart(Millis(4000)));
        assert!(machine.show_heart(Millis(4499)));
        assert!(!machine.show_heart(Millis(4500)));
        assert!(machine.show_heart(Millis(5000)));
    }

    #[test]
    fn huge_flash_interval_stays_on() {
        let config = CoreConfig::new().with_heart_flash_interval_ms(u64::MAX / 2 + 1);
        assert_eq!(config.validate(), Ok(()));
        let mut machine = StateMachine::new(Millis(0), &config);
        machine.update(Millis(2000));

        machine.handle_event(ButtonEvent::LongPressRelease, Millis(3000));
        machine.handle_event(ButtonEvent::ShortPress, Millis(4000));
        assert_eq!(machine.state(), AppState::ProposeDisplaying);
        assert!(machine.show_heart(Millis(4001)));
        assert!(machine.show_heart(Millis(u32::MAX)));
    }
}
