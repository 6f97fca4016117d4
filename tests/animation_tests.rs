//! Integration tests for AnimationEngine, effects and the heart topology

mod common;
use common::*;

use heart_core::colors::{BLACK, GREEN, RED, YELLOW, battery_color};
use heart_core::{AnimationEngine, Effect, HeartTopology, Srgb};

type Engine = AnimationEngine<TestInstant, 21>;

/// Runs `effect` for `ticks` frames, one tick interval apart.
fn run(engine: &mut Engine, effect: Effect, ticks: u64) {
    for i in 0..ticks {
        assert!(engine.tick(ms(i * 16), effect));
    }
}

fn assert_mirrored(engine: &Engine, topology: &HeartTopology<21>) {
    for distance in 0..=topology.max_distance() {
        let (left, right) = topology.symmetric_pair(distance);
        assert_eq!(
            engine.pixels()[left],
            engine.pixels()[right],
            "distance {}",
            distance
        );
    }
}

#[test]
fn topology_effects_mirror_on_any_wiring() {
    for top in [0, 5, 13] {
        let topology = HeartTopology::<21>::with_top(top);
        for effect in Effect::ALL.into_iter().filter(|e| e.uses_topology()) {
            let mut engine = Engine::new(16, 255, 7).with_topology(topology);
            for i in 0..90 {
                engine.tick(ms(i * 16), effect);
                assert_mirrored(&engine, &topology);
            }
        }
    }
}

#[test]
fn heartbeat_is_brightest_at_top() {
    let topology = HeartTopology::<21>::with_top(4);
    let mut engine = Engine::new(16, 255, 1).with_topology(topology);
    // peak of the first beat
    run(&mut engine, Effect::Heartbeat, 8);

    let (top, _) = topology.symmetric_pair(0);
    let (tip, _) = topology.symmetric_pair(topology.max_distance());
    assert!(engine.pixels()[top].red > engine.pixels()[tip].red);
    assert!(engine.pixels()[tip].red > 0);
}

#[test]
fn rotating_the_map_rotates_the_frame() {
    let mut straight = Engine::new(16, 255, 1);
    let mut rotated = Engine::new(16, 255, 1).with_topology(HeartTopology::with_top(3));
    run(&mut straight, Effect::RoseBloom, 40);
    run(&mut rotated, Effect::RoseBloom, 40);

    for i in 0..21 {
        assert_eq!(straight.pixels()[i], rotated.pixels()[(i + 3) % 21]);
    }
}

#[test]
fn off_clears_previous_frame() {
    let mut engine = Engine::new(16, 255, 1);
    engine.tick(ms(0), Effect::SolidGreen);
    assert!(engine.pixels().iter().all(|p| *p == GREEN));

    engine.tick(ms(16), Effect::Off);
    assert!(engine.pixels().iter().all(|p| *p == BLACK));
}

#[test]
fn trailing_effects_fade_instead_of_clearing() {
    let mut engine = Engine::new(16, 255, 1);
    engine.tick(ms(0), Effect::SolidRed);

    // BEHAVIOR: the comet fades the previous frame, it does not start black
    engine.tick(ms(16), Effect::PinkComet);
    let untouched = engine.pixels()[10];
    assert!(untouched.red > 0 && untouched.red < 255);
    assert_eq!(engine.step(), 1);
}

#[test]
fn flush_applies_brightness_without_touching_buffer() {
    let mut engine = Engine::new(16, 128, 1);
    let mut strip = MockStrip::new();
    engine.tick(ms(0), Effect::SolidRed);
    engine.flush(&mut strip);

    assert_eq!(strip.writes, 1);
    assert_eq!(strip.frame.len(), 21);
    assert!(strip.frame.iter().all(|p| *p == Srgb::new(128, 0, 0)));
    assert!(engine.pixels().iter().all(|p| *p == RED));

    engine.set_brightness(0);
    engine.flush(&mut strip);
    assert!(strip.frame.iter().all(|p| *p == BLACK));
}

#[test]
fn random_effects_repeat_for_same_seed() {
    for effect in [Effect::Sparkle, Effect::Fire, Effect::PinkStars, Effect::Candlelight] {
        let mut a = Engine::new(16, 255, 42);
        let mut b = Engine::new(16, 255, 42);
        run(&mut a, effect, 50);
        run(&mut b, effect, 50);
        assert_eq!(a.pixels(), b.pixels(), "{}", effect.name());
    }
}

#[test]
fn every_effect_has_distinct_name_and_index() {
    for (i, effect) in Effect::ALL.iter().enumerate() {
        assert_eq!(effect.index(), i);
        assert_eq!(Effect::from_index(i), *effect);
        for other in Effect::ALL.iter().skip(i + 1) {
            assert_ne!(effect.name(), other.name());
        }
    }
    assert_eq!(Effect::from_index(Effect::COUNT), Effect::Off);
    assert_eq!(Effect::from_index(usize::MAX), Effect::Off);
}

#[test]
fn battery_color_endpoints() {
    assert_eq!(battery_color(0), RED);
    assert_eq!(battery_color(50), YELLOW);
    assert_eq!(battery_color(100), GREEN);
    assert_eq!(battery_color(200), GREEN);
}

#[test]
fn battery_color_is_monotonic_per_half() {
    for p in 0..50u8 {
        let (a, b) = (battery_color(p), battery_color(p + 1));
        assert_eq!(a.red, 255);
        assert!(b.green >= a.green, "{}%", p);
        assert_eq!(a.blue, 0);
    }
    for p in 50..100u8 {
        let (a, b) = (battery_color(p), battery_color(p + 1));
        assert!(b.red <= a.red, "{}%", p);
        assert_eq!(a.green, 255);
        assert_eq!(a.blue, 0);
    }
}
