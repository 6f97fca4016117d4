//! Heart-shaped LED ring addressing.
//!
//! The LEDs form a closed ring. Walking the ring from the top-center point, the
//! two halves of the heart mirror each other: logical position `d` on the left
//! pairs with logical position `N - 1 - d` on the right, and both sit `d` steps
//! from the top. With 21 LEDs, LEDs 0 and 20 are the top pair and LED 10 is the
//! single tip at the bottom (distance 10).
//!
//! Topology-aware effects address LEDs only through this map, so a different
//! LED count or wiring start point only changes the map.

use crate::colors::Pixel;

/// Constant map between physical LED indices and distance from the top.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeartTopology<const N: usize> {
    top: usize,
}

impl<const N: usize> HeartTopology<N> {
    /// Ring wired so that physical LED 0 is the first LED of the top pair.
    pub const fn new() -> Self {
        Self { top: 0 }
    }

    /// Ring wired so that the top pair starts at physical LED `top`.
    pub const fn with_top(top: usize) -> Self {
        Self {
            top: if N == 0 { 0 } else { top % N },
        }
    }

    /// Number of LEDs in the ring.
    pub const fn len(&self) -> usize {
        N
    }

    pub const fn is_empty(&self) -> bool {
        N == 0
    }

    /// Largest distance from the top, reached at the bottom tip.
    pub const fn max_distance(&self) -> usize {
        N.saturating_sub(1) / 2
    }

    /// Distance of a physical LED from the top of the heart.
    ///
    /// Indices past the end wrap around the ring.
    pub const fn distance_from_top(&self, index: usize) -> usize {
        if N == 0 {
            return 0;
        }
        let logical = (index % N + N - self.top) % N;
        let mirrored = N - 1 - logical;
        if logical < mirrored { logical } else { mirrored }
    }

    /// Physical left and right LEDs at `distance` from the top.
    ///
    /// Distances past the bottom are clamped to the bottom tip. On an odd ring
    /// the tip is a single LED and both halves of the pair are equal.
    pub const fn symmetric_pair(&self, distance: usize) -> (usize, usize) {
        if N == 0 {
            return (0, 0);
        }
        let max = self.max_distance();
        let distance = if distance > max { max } else { distance };
        (self.physical(distance), self.physical(N - 1 - distance))
    }

    /// Writes `color` to both LEDs at `distance` from the top.
    pub fn paint(&self, pixels: &mut [Pixel; N], distance: usize, color: Pixel) {
        if N == 0 || distance > self.max_distance() {
            return;
        }
        let (left, right) = self.symmetric_pair(distance);
        pixels[left] = color;
        pixels[right] = color;
    }

    /// Paints every distance from the top down to `max_distance` inclusive.
    pub fn fill_from_top(&self, pixels: &mut [Pixel; N], max_distance: usize, color: Pixel) {
        let last = max_distance.min(self.max_distance());
        for distance in 0..=last {
            self.paint(pixels, distance, color);
        }
    }

    const fn physical(&self, logical: usize) -> usize {
        (logical + self.top) % N
    }
}

impl<const N: usize> Default for HeartTopology<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors::{BLACK, RED};

    const HEART: HeartTopology<21> = HeartTopology::new();

    #[test]
    fn reference_ring_distances() {
        assert_eq!(HEART.distance_from_top(0), 0);
        assert_eq!(HEART.distance_from_top(20), 0);
        assert_eq!(HEART.distance_from_top(10), 10);
        assert_eq!(HEART.distance_from_top(3), 3);
        assert_eq!(HEART.distance_from_top(17), 3);
        assert_eq!(HEART.max_distance(), 10);
    }

    #[test]
    fn pairs_are_symmetric() {
        for distance in 0..=HEART.max_distance() {
            let (left, right) = HEART.symmetric_pair(distance);
            assert_eq!(HEART.distance_from_top(left), distance);
            assert_eq!(HEART.distance_from_top(right), distance);
        }
        assert_eq!(HEART.symmetric_pair(10), (10, 10));
        assert_eq!(HEART.symmetric_pair(99), (10, 10));
    }

    #[test]
    fn rotated_wiring_keeps_symmetry() {
        let heart = HeartTopology::<21>::with_top(5);
        assert_eq!(heart.symmetric_pair(0), (5, 4));
        assert_eq!(heart.distance_from_top(5), 0);
        assert_eq!(heart.distance_from_top(4), 0);
        assert_eq!(heart.distance_from_top(15), 10);
    }

    #[test]
    fn even_ring_has_two_bottom_leds() {
        let heart = HeartTopology::<20>::new();
        assert_eq!(heart.max_distance(), 9);
        assert_eq!(heart.symmetric_pair(9), (9, 10));
    }

    #[test]
    fn fill_from_top_stops_at_distance() {
        let mut pixels = [BLACK; 21];
        HEART.fill_from_top(&mut pixels, 1, RED);
        let lit: usize = pixels.iter().filter(|p| **p == RED).count();
        assert_eq!(lit, 4);
        assert_eq!(pixels[1], RED);
        assert_eq!(pixels[19], RED);
        assert_eq!(pixels[2], BLACK);
    }
}
