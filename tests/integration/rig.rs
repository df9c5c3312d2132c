//! Fake-clock harness.
//!
//! Wires the three execution contexts the way `main()` does on hardware
//! (tick timer → `Timebase`, sample timer → `ConversionPacer` +
//! `SampleHandler`, main loop → `OutputService`) and advances a virtual
//! clock in 10 µs steps.

use paddleshift::app::service::{OutputService, SampleHandler};
use paddleshift::config::ShifterConfig;
use paddleshift::error::HardwareFault;
use paddleshift::shared::SharedState;
use paddleshift::timebase::{ConversionPacer, Timebase};

use crate::mock_hw::{MockAdc, MockReset, RecordingOutputs, RecordingSink};

const STEP_US: u64 = 10;
const POLL_US: u64 = 1_000;

pub struct Rig<'a> {
    pub shared: &'a SharedState,
    pub now_us: u64,
    pub adc: MockAdc,
    pub out: RecordingOutputs,
    pub sink: RecordingSink,
    pub reset: MockReset,
    pub fault: Option<HardwareFault>,
    /// Bursts that went through classification.
    pub processed: u32,
    timebase: Timebase<'a>,
    pacer: ConversionPacer<'a>,
    handler: SampleHandler<'a>,
    service: OutputService<'a>,
    tick_us: u64,
    sample_us: u64,
    sampling: bool,
}

#[allow(dead_code)]
impl<'a> Rig<'a> {
    /// Outputs in power-on state, clock at zero, sampler not started.
    pub fn new(shared: &'a SharedState, config: &ShifterConfig) -> Self {
        config.validate().expect("test config must validate");
        let mut rig = Self {
            shared,
            now_us: 0,
            adc: MockAdc::new(config.adc_buffer_capacity),
            out: RecordingOutputs::default(),
            sink: RecordingSink::default(),
            reset: MockReset::default(),
            fault: None,
            processed: 0,
            timebase: Timebase::new(shared, config),
            pacer: ConversionPacer::new(shared, config),
            handler: SampleHandler::new(shared, config),
            service: OutputService::new(shared, config),
            tick_us: u64::from(config.tick_period_ms) * 1_000,
            sample_us: u64::from(config.sample_period_us),
            sampling: false,
        };
        rig.service.power_on(&mut rig.out, &mut rig.sink);
        rig
    }

    /// The normal start-up order: warm-up, outputs handed over, sampler on.
    pub fn booted(shared: &'a SharedState, config: &ShifterConfig) -> Self {
        let mut rig = Self::new(shared, config);
        rig.wait_startup();
        rig.start_sampling();
        rig
    }

    pub fn wait_startup(&mut self) {
        while !self.shared.startup.is_open() {
            self.step();
        }
        self.out.now_us = self.now_us;
        self.service.start(&mut self.out, &mut self.sink);
    }

    pub fn start_sampling(&mut self) {
        self.pacer.prime(&mut self.adc);
        self.sampling = true;
    }

    pub fn set_level(&mut self, level: u16) {
        self.adc.level = level;
    }

    pub fn run_ms(&mut self, ms: u64) {
        self.run_us(ms * 1_000);
    }

    pub fn run_us(&mut self, us: u64) {
        let end = self.now_us + us;
        while self.now_us < end {
            self.step();
        }
    }

    /// Run until `n` more bursts have been classified.
    pub fn run_samples(&mut self, n: u32) {
        let target = self.processed + n;
        while self.processed < target {
            self.step();
        }
    }

    fn step(&mut self) {
        self.now_us += STEP_US;
        if self.now_us % self.tick_us == 0 {
            self.timebase.on_tick();
        }
        if self.sampling && self.now_us % self.sample_us == 0 {
            self.on_sample_timer();
        }
        if self.now_us % POLL_US == 0 {
            self.out.now_us = self.now_us;
            self.service.poll(&mut self.out, &mut self.sink);
        }
    }

    fn on_sample_timer(&mut self) {
        self.pacer.on_sample_timer(&mut self.adc);
        if !self.adc.take_ready() {
            return;
        }
        match self.handler.on_conversion_complete(&mut self.adc) {
            Ok(Some(_)) => self.processed += 1,
            Ok(None) => {}
            Err(fault) => {
                if self.fault.is_none() {
                    self.handler.monitor().begin_shutdown(fault, &mut self.reset);
                }
                self.fault = Some(fault);
            }
        }
    }
}
