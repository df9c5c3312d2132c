//! Fuzz target: `SampleHandler::on_conversion_complete`
//!
//! Drives arbitrary bursts (any length, any reported count, any codes)
//! interleaved with timebase ticks through the sampling handler, and
//! asserts that it never panics, that a latched fault is sticky, and that
//! every accepted shift starts its hold window.
//!
//! cargo fuzz run fuzz_sample_stream

#![no_main]

use libfuzzer_sys::fuzz_target;
use paddleshift::app::ports::AdcSource;
use paddleshift::app::service::SampleHandler;
use paddleshift::config::ShifterConfig;
use paddleshift::debounce::lockout_owner;
use paddleshift::shared::SharedState;
use paddleshift::timebase::Timebase;

/// Replays one burst decoded from the fuzz input.
struct ReplayAdc<'a> {
    codes: &'a [u8],
    reported: usize,
}

impl AdcSource for ReplayAdc<'_> {
    fn start_conversion(&mut self) {}

    fn reset_buffer(&mut self) {}

    fn read_samples(&mut self, buf: &mut [u16]) -> usize {
        for (slot, pair) in buf.iter_mut().zip(self.codes.chunks_exact(2)) {
            *slot = u16::from_le_bytes([pair[0], pair[1]]);
        }
        self.reported
    }
}

fuzz_target!(|data: &[u8]| {
    let shared = SharedState::new();
    let config = ShifterConfig {
        startup_time_ms: 0,
        ..ShifterConfig::default()
    };
    let mut timebase = Timebase::new(&shared, &config);
    let mut handler = SampleHandler::new(&shared, &config);
    timebase.on_tick();

    // Record layout: [ticks, reported, codes_len, codes...]
    let mut rest = data;
    while let [ticks, reported, len, tail @ ..] = rest {
        let len = (usize::from(*len) * 2).min(tail.len());
        let (codes, next) = tail.split_at(len);
        rest = next;

        for _ in 0..(*ticks % 8) {
            timebase.on_tick();
        }

        let faulted_before = shared.fault();
        let mut adc = ReplayAdc {
            codes,
            reported: usize::from(*reported % 40),
        };
        let result = handler.on_conversion_complete(&mut adc);

        if let Some(fault) = faulted_before {
            assert_eq!(result, Err(fault), "latched fault must be sticky");
        }
        if let Err(fault) = result {
            assert_eq!(shared.fault(), Some(faulted_before.unwrap_or(fault)));
        }

        if let Ok(Some(outcome)) = result {
            let channel = outcome.class.channel();
            if let Some(command) = outcome.command {
                if let Some(hold) = channel.and_then(|ch| shared.hold(ch)) {
                    assert!(hold.is_set(), "{:?} accepted without a hold window", command);
                }
                if let Some(ch) = channel {
                    let owner = lockout_owner(ch, config.paddle_lockout);
                    assert!(shared.lockout(owner).is_set(), "{:?} accepted without lockout", command);
                }
            }
        }
    }
});
