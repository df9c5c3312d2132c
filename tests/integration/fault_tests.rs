//! Fault path: overrun and out-of-range bursts latch a fault, arm the
//! watchdog and stop all further classification.

use paddleshift::app::events::ShifterEvent;
use paddleshift::app::ports::Signal;
use paddleshift::config::ShifterConfig;
use paddleshift::error::HardwareFault;
use paddleshift::shared::SharedState;

use crate::mock_hw::{HORN_LEVEL, IDLE_LEVEL, UP_LEVEL};
use crate::rig::Rig;

fn fast_boot() -> ShifterConfig {
    ShifterConfig {
        startup_time_ms: 10,
        ..ShifterConfig::default()
    }
}

#[test]
fn overrun_latches_fault_and_starts_watchdog() {
    let shared = SharedState::new();
    let mut rig = Rig::booted(&shared, &fast_boot());

    rig.adc.reported_override = Some(33);
    rig.run_ms(2);

    assert_eq!(rig.fault, Some(HardwareFault::SampleOverrun));
    assert_eq!(shared.fault(), Some(HardwareFault::SampleOverrun));
    assert_eq!(rig.reset.armed_ms, Some(100));
    assert!(rig.reset.started);
}

#[test]
fn nothing_is_classified_after_a_fault() {
    let shared = SharedState::new();
    let mut rig = Rig::booted(&shared, &fast_boot());

    rig.adc.reported_override = Some(64);
    rig.run_ms(2);
    let reads = rig.adc.reads;
    let processed = rig.processed;

    rig.adc.reported_override = None;
    rig.set_level(UP_LEVEL);
    rig.run_ms(100);

    assert_eq!(rig.adc.reads, reads, "ADC must not be read once faulted");
    assert_eq!(rig.processed, processed);
    assert_eq!(rig.out.rising_edges(Signal::ShiftUp), 0);
}

#[test]
fn out_of_range_average_is_a_fault() {
    let shared = SharedState::new();
    let mut rig = Rig::booted(&shared, &fast_boot());

    rig.set_level(0x1000);
    rig.run_ms(2);

    assert_eq!(rig.fault, Some(HardwareFault::ValueOutOfRange));
    assert!(rig.reset.started);
}

#[test]
fn full_scale_reading_is_not_a_fault() {
    let shared = SharedState::new();
    let mut rig = Rig::booted(&shared, &fast_boot());

    rig.set_level(0x0FFF);
    rig.run_ms(20);

    assert_eq!(rig.fault, None);
    assert!(!rig.reset.started);
}

#[test]
fn fault_forces_outputs_safe_once() {
    let shared = SharedState::new();
    let config = ShifterConfig {
        bypass_relay: true,
        ..fast_boot()
    };
    let mut rig = Rig::booted(&shared, &config);

    rig.set_level(HORN_LEVEL);
    rig.run_ms(10);
    assert!(rig.out.is_on(Signal::Horn));
    assert_eq!(rig.out.level(Signal::BypassRelay), Some(false));

    rig.adc.reported_override = Some(40);
    rig.run_ms(50);

    assert!(!rig.out.is_on(Signal::Horn));
    assert!(!rig.out.is_on(Signal::DebugA));
    assert_eq!(rig.out.level(Signal::BypassRelay), Some(true));
    assert_eq!(
        rig.sink
            .count(|e| *e == ShifterEvent::FaultLatched(HardwareFault::SampleOverrun)),
        1
    );
}

#[test]
fn empty_burst_is_skipped_not_faulted() {
    let shared = SharedState::new();
    let mut rig = Rig::booted(&shared, &fast_boot());

    rig.adc.burst_len = 0;
    rig.run_ms(20);
    assert_eq!(rig.fault, None);
    assert_eq!(rig.processed, 0);

    rig.adc.burst_len = 32;
    rig.set_level(UP_LEVEL);
    rig.run_samples(3);
    rig.set_level(IDLE_LEVEL);
    rig.run_ms(40);
    assert_eq!(rig.out.pulses(Signal::ShiftUp).len(), 1);
}
