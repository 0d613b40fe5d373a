//! Shared test infrastructure for tannenbaum integration tests

#![allow(dead_code)] // Items used across multiple test files; Rust analyzes per-file

use tannenbaum::layout::MAX_CHANNELS;
use tannenbaum::{
    DeviceConfig, Pad, Pin, PwmChannel, PwmOutputs, Tannenbaum, TemplateMap, TimeDuration, TimeInstant,
    TimeSource, ToneOutput, TouchSensor,
};

// ============================================================================
// Mock Time Types
// ============================================================================

/// Mock duration type for testing (wraps milliseconds)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TestDuration(pub u64);

impl TimeDuration for TestDuration {
    const ZERO: Self = TestDuration(0);

    fn as_millis(&self) -> u64 {
        self.0
    }

    fn from_millis(millis: u64) -> Self {
        TestDuration(millis)
    }

    fn saturating_sub(self, other: Self) -> Self {
        TestDuration(self.0.saturating_sub(other.0))
    }
}

/// Mock instant type for testing
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TestInstant(pub u64);

impl TimeInstant for TestInstant {
    type Duration = TestDuration;

    fn duration_since(&self, earlier: Self) -> Self::Duration {
        TestDuration(self.0 - earlier.0)
    }
}

// ============================================================================
// Mock Time Source
// ============================================================================

/// Mock time source with controllable time advancement
pub struct MockTimeSource {
    current_time: core::cell::Cell<TestInstant>,
}

impl MockTimeSource {
    pub fn new() -> Self {
        Self {
            current_time: core::cell::Cell::new(TestInstant(0)),
        }
    }

    /// Advance time by the given number of milliseconds
    pub fn advance(&self, millis: u64) {
        let current = self.current_time.get();
        self.current_time.set(TestInstant(current.0 + millis));
    }

    pub fn set_time(&self, time: TestInstant) {
        self.current_time.set(time);
    }
}

impl TimeSource<TestInstant> for MockTimeSource {
    fn now(&self) -> TestInstant {
        self.current_time.get()
    }
}

// ============================================================================
// Mock PWM
// ============================================================================

/// Highest GPIO number the mock tracks routing for
const PIN_SLOTS: usize = 40;

/// Mock PWM peripheral that records configuration, routing and duty writes
pub struct MockPwm {
    configured: [Option<(u32, u8)>; MAX_CHANNELS],
    routing: [Option<PwmChannel>; PIN_SLOTS],
    duty: [Option<u16>; MAX_CHANNELS],
    writes: usize,
    detaches: usize,
}

impl MockPwm {
    pub fn new() -> Self {
        Self {
            configured: [None; MAX_CHANNELS],
            routing: [None; PIN_SLOTS],
            duty: [None; MAX_CHANNELS],
            writes: 0,
            detaches: 0,
        }
    }

    /// Frequency and resolution a channel was configured with
    pub fn configuration(&self, channel: PwmChannel) -> Option<(u32, u8)> {
        self.configured[usize::from(channel)]
    }

    /// Channel a pin is currently routed to
    pub fn routing(&self, pin: Pin) -> Option<PwmChannel> {
        self.routing[usize::from(pin.0)]
    }

    /// Last duty written to a channel
    pub fn duty(&self, channel: PwmChannel) -> Option<u16> {
        self.duty[usize::from(channel)]
    }

    /// Duty visible on a pin through its current routing
    pub fn pin_duty(&self, pin: Pin) -> Option<u16> {
        self.routing(pin).and_then(|channel| self.duty(channel))
    }

    pub fn write_count(&self) -> usize {
        self.writes
    }

    pub fn detach_count(&self) -> usize {
        self.detaches
    }
}

impl PwmOutputs for MockPwm {
    fn configure_channel(&mut self, channel: PwmChannel, frequency_hz: u32, resolution_bits: u8) {
        self.configured[usize::from(channel)] = Some((frequency_hz, resolution_bits));
    }

    fn attach(&mut self, pin: Pin, channel: PwmChannel) {
        self.routing[usize::from(pin.0)] = Some(channel);
    }

    fn detach(&mut self, pin: Pin) {
        self.routing[usize::from(pin.0)] = None;
        self.detaches += 1;
    }

    fn write_duty(&mut self, channel: PwmChannel, duty: u16) {
        self.duty[usize::from(channel)] = Some(duty);
        self.writes += 1;
    }
}

// ============================================================================
// Mock Buzzer
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuzzerEvent {
    Start(u32),
    Stop,
}

/// Mock buzzer that records every tone change
pub struct MockBuzzer {
    sounding: Option<u32>,
    events: heapless::Vec<BuzzerEvent, 128>,
}

impl MockBuzzer {
    pub fn new() -> Self {
        Self {
            sounding: None,
            events: heapless::Vec::new(),
        }
    }

    /// Frequency currently sounding
    pub fn sounding(&self) -> Option<u32> {
        self.sounding
    }

    pub fn events(&self) -> &[BuzzerEvent] {
        &self.events
    }

    /// Frequencies started, in order
    pub fn started(&self) -> heapless::Vec<u32, 128> {
        self.events
            .iter()
            .filter_map(|event| match event {
                BuzzerEvent::Start(hz) => Some(*hz),
                BuzzerEvent::Stop => None,
            })
            .collect()
    }
}

impl ToneOutput for MockBuzzer {
    fn start_tone(&mut self, frequency_hz: u32) {
        self.sounding = Some(frequency_hz);
        let _ = self.events.push(BuzzerEvent::Start(frequency_hz));
    }

    fn stop_tone(&mut self) {
        self.sounding = None;
        let _ = self.events.push(BuzzerEvent::Stop);
    }
}

// ============================================================================
// Scripted Touch Sensor
// ============================================================================

/// Touch sensor returning whatever reading the test sets per pad
pub struct ScriptedTouchSensor {
    readings: [u16; 10],
}

impl ScriptedTouchSensor {
    /// All pads untouched at `baseline`
    pub fn new(baseline: u16) -> Self {
        Self {
            readings: [baseline; 10],
        }
    }

    pub fn set(&mut self, pad: Pad, reading: u16) {
        self.readings[usize::from(pad.0)] = reading;
    }
}

impl TouchSensor for ScriptedTouchSensor {
    fn read_filtered(&mut self, pad: Pad) -> u16 {
        self.readings[usize::from(pad.0)]
    }
}

// ============================================================================
// Test Helper Functions
// ============================================================================

pub type TestTree = Tannenbaum<MockPwm, MockBuzzer, TemplateMap<4>>;

/// A tree with every mock in its initial state
pub fn tree(config: DeviceConfig) -> TestTree {
    Tannenbaum::new(MockPwm::new(), MockBuzzer::new(), TemplateMap::new(), config)
}
