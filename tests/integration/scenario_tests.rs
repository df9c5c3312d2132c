//! End-to-end timing scenarios on the fake clock.
//!
//! Reference build unless stated otherwise: 2 ms tick, 730 µs sample
//! period, 3 consecutive samples, 50 ms debounce, 30 ms active time.

use paddleshift::app::events::ShifterEvent;
use paddleshift::app::ports::Signal;
use paddleshift::config::{ConversionTrigger, PaddleLockout, ShifterConfig};
use paddleshift::shared::SharedState;

use crate::mock_hw::{DOWN_LEVEL, HORN_LEVEL, IDLE_LEVEL, UP_LEVEL};
use crate::rig::Rig;

fn fast_boot() -> ShifterConfig {
    ShifterConfig {
        startup_time_ms: 10,
        ..ShifterConfig::default()
    }
}

fn assert_active_window(start: u64, end: u64) {
    let width = end - start;
    assert!(
        (30_000..=32_000).contains(&width),
        "pulse width {} us outside the 30 ms active window",
        width
    );
}

// ── Shift pulses ──────────────────────────────────────────────

#[test]
fn up_press_gives_one_timed_pulse() {
    let shared = SharedState::new();
    let mut rig = Rig::booted(&shared, &fast_boot());
    rig.run_ms(5);

    rig.set_level(UP_LEVEL);
    rig.run_ms(40);
    rig.set_level(IDLE_LEVEL);
    rig.run_ms(40);

    let pulses = rig.out.pulses(Signal::ShiftUp);
    assert_eq!(pulses.len(), 1);
    assert_active_window(pulses[0].0, pulses[0].1);
    assert_eq!(rig.out.rising_edges(Signal::ShiftDown), 0);
}

#[test]
fn pulse_is_never_short_whatever_the_tick_phase() {
    // Step the press across one whole tick period in 10 us increments.
    for offset_us in (0..2_000).step_by(10) {
        let shared = SharedState::new();
        let mut rig = Rig::booted(&shared, &fast_boot());
        rig.run_us(offset_us);

        rig.set_level(UP_LEVEL);
        rig.run_samples(3);
        rig.set_level(IDLE_LEVEL);
        rig.run_ms(40);

        let pulses = rig.out.pulses(Signal::ShiftUp);
        assert_eq!(pulses.len(), 1, "offset {} us", offset_us);
        let (start, end) = pulses[0];
        assert!(
            end - start >= 30_000,
            "offset {} us: pulse only {} us",
            offset_us,
            end - start
        );
    }
}

#[test]
fn held_paddle_repeats_once_per_debounce_window() {
    let shared = SharedState::new();
    let mut rig = Rig::booted(&shared, &fast_boot());

    rig.set_level(UP_LEVEL);
    rig.run_ms(100);
    rig.set_level(IDLE_LEVEL);
    rig.run_ms(40);

    let pulses = rig.out.pulses(Signal::ShiftUp);
    assert_eq!(pulses.len(), 2, "pulses: {:?}", pulses);
    let gap = pulses[1].0 - pulses[0].0;
    assert!((50_000..=56_000).contains(&gap), "repeat after {} us", gap);
    for (start, end) in pulses {
        assert_active_window(start, end);
    }
}

#[test]
fn down_press_drives_only_shift_down() {
    let shared = SharedState::new();
    let mut rig = Rig::booted(&shared, &fast_boot());

    rig.set_level(DOWN_LEVEL);
    rig.run_samples(3);
    rig.set_level(IDLE_LEVEL);
    rig.run_ms(40);

    assert_eq!(rig.out.pulses(Signal::ShiftDown).len(), 1);
    assert_eq!(rig.out.rising_edges(Signal::ShiftUp), 0);
    assert!(!rig.out.is_on(Signal::Horn));
}

#[test]
fn two_samples_are_not_enough() {
    let shared = SharedState::new();
    let mut rig = Rig::booted(&shared, &fast_boot());

    rig.set_level(UP_LEVEL);
    rig.run_samples(2);
    rig.set_level(IDLE_LEVEL);
    rig.run_ms(60);

    assert_eq!(rig.out.rising_edges(Signal::ShiftUp), 0);
}

#[test]
fn interleaved_classes_never_accumulate() {
    let shared = SharedState::new();
    let mut rig = Rig::booted(&shared, &fast_boot());

    for level in [UP_LEVEL, UP_LEVEL, DOWN_LEVEL, UP_LEVEL, UP_LEVEL, HORN_LEVEL, UP_LEVEL] {
        rig.set_level(level);
        rig.run_samples(1);
    }
    rig.set_level(IDLE_LEVEL);
    rig.run_ms(40);

    assert_eq!(rig.out.rising_edges(Signal::ShiftUp), 0);
    assert_eq!(rig.out.rising_edges(Signal::ShiftDown), 0);
    assert_eq!(rig.out.rising_edges(Signal::Horn), 0);
}

#[test]
fn idle_does_not_cut_a_running_pulse() {
    let shared = SharedState::new();
    let mut rig = Rig::booted(&shared, &fast_boot());

    rig.set_level(UP_LEVEL);
    rig.run_samples(3);
    rig.set_level(IDLE_LEVEL);
    rig.run_ms(5);
    assert!(rig.out.is_on(Signal::ShiftUp), "pulse must survive Idle samples");

    rig.run_ms(35);
    let pulses = rig.out.pulses(Signal::ShiftUp);
    assert_eq!(pulses.len(), 1);
    assert_active_window(pulses[0].0, pulses[0].1);
}

// ── Paddle lockout modes ──────────────────────────────────────

#[test]
fn shared_lockout_holds_off_the_opposite_paddle() {
    let shared = SharedState::new();
    let mut rig = Rig::booted(&shared, &fast_boot());

    rig.set_level(UP_LEVEL);
    rig.run_samples(3);
    rig.set_level(DOWN_LEVEL);
    rig.run_ms(40);
    assert_eq!(rig.out.rising_edges(Signal::ShiftDown), 0);

    rig.run_ms(20);
    assert_eq!(rig.out.rising_edges(Signal::ShiftDown), 1);
}

#[test]
fn per_channel_lockout_lets_the_opposite_paddle_through() {
    let shared = SharedState::new();
    let config = ShifterConfig {
        paddle_lockout: PaddleLockout::PerChannel,
        ..fast_boot()
    };
    let mut rig = Rig::booted(&shared, &config);

    rig.set_level(UP_LEVEL);
    rig.run_samples(3);
    rig.set_level(DOWN_LEVEL);
    rig.run_ms(5);

    assert!(rig.out.is_on(Signal::ShiftUp));
    assert!(rig.out.is_on(Signal::ShiftDown));
    // Mirror favours the up paddle when both are high.
    assert!(rig.out.is_on(Signal::DebugA));
    assert!(!rig.out.is_on(Signal::DebugB));
}

// ── Horn ──────────────────────────────────────────────────────

#[test]
fn horn_follows_press_and_release() {
    let shared = SharedState::new();
    let mut rig = Rig::booted(&shared, &fast_boot());

    rig.set_level(HORN_LEVEL);
    rig.run_samples(2);
    assert!(!shared.outputs.horn_active());

    rig.run_samples(1);
    rig.run_us(1_000);
    assert!(rig.out.is_on(Signal::Horn));

    // Held well past the horn lockout: stays on without chatter.
    rig.run_ms(200);
    assert!(rig.out.is_on(Signal::Horn));
    assert_eq!(rig.out.rising_edges(Signal::Horn), 1);

    rig.set_level(IDLE_LEVEL);
    rig.run_samples(1);
    rig.run_us(1_000);
    assert!(!rig.out.is_on(Signal::Horn));
}

#[test]
fn debug_leds_mirror_horn_on_both() {
    let shared = SharedState::new();
    let mut rig = Rig::booted(&shared, &fast_boot());

    rig.set_level(HORN_LEVEL);
    rig.run_ms(10);
    assert!(rig.out.is_on(Signal::DebugA));
    assert!(rig.out.is_on(Signal::DebugB));

    rig.set_level(IDLE_LEVEL);
    rig.run_ms(5);
    assert!(!rig.out.is_on(Signal::DebugA));
    assert!(!rig.out.is_on(Signal::DebugB));
}

#[test]
fn debug_indicator_can_be_disabled() {
    let shared = SharedState::new();
    let config = ShifterConfig {
        debug_indicator: false,
        ..fast_boot()
    };
    let mut rig = Rig::booted(&shared, &config);

    rig.set_level(HORN_LEVEL);
    rig.run_ms(10);
    assert!(rig.out.is_on(Signal::Horn));
    assert_eq!(rig.out.level(Signal::DebugA), None);
}

// ── Start-up ──────────────────────────────────────────────────

#[test]
fn nothing_is_accepted_during_warm_up() {
    let shared = SharedState::new();
    let mut rig = Rig::new(&shared, &ShifterConfig::default());
    rig.start_sampling();
    rig.set_level(UP_LEVEL);

    rig.run_ms(2_990);
    assert!(!shared.startup.is_open());
    assert_eq!(rig.out.rising_edges(Signal::ShiftUp), 0);

    rig.wait_startup();
    assert_eq!(rig.now_us, 3_000_000);
    rig.run_ms(5);
    assert_eq!(rig.out.rising_edges(Signal::ShiftUp), 1);
}

#[test]
fn startup_hands_horn_wire_over_from_bypass() {
    let shared = SharedState::new();
    let config = ShifterConfig {
        bypass_relay: true,
        ..fast_boot()
    };
    let mut rig = Rig::new(&shared, &config);
    assert_eq!(rig.out.level(Signal::BypassRelay), Some(true));
    assert_eq!(rig.out.level(Signal::Horn), Some(false));

    rig.wait_startup();
    assert_eq!(rig.out.level(Signal::BypassRelay), Some(false));
    assert_eq!(
        rig.sink.count(|e| *e == ShifterEvent::StartupComplete),
        1
    );
}

// ── Conversion pacing ─────────────────────────────────────────

#[test]
fn self_rearming_adc_paces_itself() {
    let shared = SharedState::new();
    let config = ShifterConfig {
        conversion_trigger: ConversionTrigger::SelfRearming,
        ..fast_boot()
    };
    let mut rig = Rig::booted(&shared, &config);
    let starts = rig.adc.starts;

    rig.set_level(UP_LEVEL);
    rig.run_samples(3);
    rig.set_level(IDLE_LEVEL);
    rig.run_ms(40);

    assert_eq!(rig.out.pulses(Signal::ShiftUp).len(), 1);
    assert!(rig.adc.starts > starts + 3);
}

#[test]
fn repeated_observations_speed_up_acceptance() {
    let shared = SharedState::new();
    let config = ShifterConfig {
        observations_per_sample: 3,
        ..fast_boot()
    };
    let mut rig = Rig::booted(&shared, &config);

    rig.set_level(UP_LEVEL);
    rig.run_samples(1);
    rig.run_us(1_000);
    assert!(rig.out.is_on(Signal::ShiftUp));
}
