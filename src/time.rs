//! Injected monotonic clock.
//!
//! Components never read a global timer. Every operation that depends on time
//! takes an instant obtained from a [`TimeSource`], so tests can drive the core
//! with a synthetic clock.

/// Source of monotonic instants.
pub trait TimeSource<I: TimeInstant> {
    /// Returns the current instant.
    fn now(&self) -> I;
}

/// A span of time with millisecond resolution.
pub trait TimeDuration: Copy + PartialEq {
    /// Converts duration to milliseconds.
    fn as_millis(&self) -> u64;
}

/// A point on the monotonic clock.
pub trait TimeInstant: Copy {
    /// Duration type for this instant.
    type Duration: TimeDuration;

    /// Calculates duration since an earlier instant.
    fn duration_since(&self, earlier: Self) -> Self::Duration;

    /// Milliseconds elapsed since `earlier`.
    #[inline]
    fn millis_since(&self, earlier: Self) -> u64 {
        self.duration_since(earlier).as_millis()
    }
}

/// Returns true when `interval_ms` has passed since `last`, or when there is no
/// previous instant yet.
#[inline]
pub fn is_due<I: TimeInstant>(last: Option<I>, now: I, interval_ms: u64) -> bool {
    match last {
        None => true,
        Some(last) => now.millis_since(last) >= interval_ms,
    }
}

/// Millisecond duration used with [`Millis`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MillisDuration(pub u64);

impl TimeDuration for MillisDuration {
    fn as_millis(&self) -> u64 {
        self.0
    }
}

/// Wrapping 32-bit millisecond counter value, as kept by a SysTick handler.
///
/// Differences are computed with wrapping arithmetic, so intervals shorter than
/// ~49.7 days stay correct across the counter rollover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Millis(pub u32);

impl TimeInstant for Millis {
    type Duration = MillisDuration;

    fn duration_since(&self, earlier: Self) -> Self::Duration {
        MillisDuration(self.0.wrapping_sub(earlier.0) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn millis_difference_survives_rollover() {
        let before = Millis(u32::MAX - 9);
        let after = Millis(20);
        assert_eq!(after.millis_since(before), 30);
    }

    #[test]
    fn is_due_without_previous_instant() {
        assert!(is_due::<Millis>(None, Millis(0), 1000));
    }

    #[test]
    fn is_due_respects_interval() {
        assert!(!is_due(Some(Millis(100)), Millis(115), 16));
        assert!(is_due(Some(Millis(100)), Millis(116), 16));
    }

    #[test]
    fn millis_duration_reports_whole_span() {
        let span = Millis(1_000).duration_since(Millis(250));
        assert_eq!(span, MillisDuration(750));
        assert_eq!(span.as_millis(), 750);
    }
}
