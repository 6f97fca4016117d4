//! Cross-component side effects of state transitions.

use crate::effect::Effect;

/// A side effect the state machine asks the coordinator to apply.
///
/// The state machine never touches the waveform generator or the animation
/// engine itself. Each transition that needs one of them returns an action,
/// which keeps every piece of mutable state with a single owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CoreAction {
    /// Begin streaming the oscilloscope waveform.
    StartWaveform,
    /// Stop streaming and park the beam at center.
    StopWaveform,
    /// Switch the LED animation.
    SetEffect(Effect),
}
