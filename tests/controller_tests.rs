//! Integration tests for Controller

mod common;
use common::*;

use tannenbaum::controller::{LEFT_BUTTON, MIDDLE_BUTTON, RIGHT_BUTTON};
use tannenbaum::template::{BTN_ON, ON_OFF_BTN_STATE};
use tannenbaum::melody::notation::*;
use tannenbaum::{
    Controller, DeviceConfig, Interval, Melody, NoteLength, OperatingMode, Pitch, PlayerState,
    RouterError, TemplateMap, TouchConfig,
};

type TestController<'t> =
    Controller<'t, TestInstant, MockTimeSource, MockPwm, MockBuzzer, TemplateMap<4>, ScriptedTouchSensor>;

const BASELINE: u16 = 1000;
const TOUCHED: u16 = 500;

fn controller(clock: &MockTimeSource) -> TestController<'_> {
    controller_with(clock, DeviceConfig::DEFAULT)
}

fn controller_with(clock: &MockTimeSource, config: DeviceConfig) -> TestController<'_> {
    Controller::new(tree(config), ScriptedTouchSensor::new(BASELINE), clock).unwrap()
}

/// Advances the clock in `step` ms increments, servicing after each one.
fn run(controller: &mut TestController<'_>, clock: &MockTimeSource, millis: u64, step: u64) {
    let mut elapsed = 0;
    while elapsed < millis {
        clock.advance(step);
        controller.service();
        elapsed += step;
    }
}

#[test]
fn service_reports_the_nearest_deadline() {
    let clock = MockTimeSource::new();
    let mut controller = controller(&clock);

    assert_eq!(controller.service(), TestDuration(100));

    clock.advance(100);
    assert_eq!(controller.service(), TestDuration(28));

    clock.advance(28);
    assert_eq!(controller.service(), TestDuration(72));
}

#[test]
fn pattern_ticks_once_per_interval() {
    let clock = MockTimeSource::new();
    let mut controller = controller(&clock);

    clock.advance(99);
    controller.service();
    assert_eq!(controller.device().lights().phase().shift, -1);

    clock.advance(1);
    controller.service();
    assert_eq!(controller.device().lights().phase().shift, 0);

    run(&mut controller, &clock, 300, 10);
    assert_eq!(controller.device().lights().phase().shift, 3);
}

#[test]
fn speed_command_restarts_the_pattern_timer() {
    let clock = MockTimeSource::new();
    let mut controller = controller(&clock);

    clock.advance(30);
    controller.handle_command("plus", "").unwrap();

    clock.advance(49);
    controller.service();
    assert_eq!(controller.device().lights().phase().shift, -1);

    clock.advance(1);
    controller.service();
    assert_eq!(controller.device().lights().phase().shift, 0);
}

#[test]
fn unknown_command_is_reported() {
    let clock = MockTimeSource::new();
    let mut controller = controller(&clock);
    assert_eq!(
        controller.handle_command("sparkle", ""),
        Err(RouterError::UnknownCommand)
    );
    assert_eq!(controller.device().lights().mode(), OperatingMode::Larson);
}

#[test]
fn request_plays_a_tune_at_the_melody_tempo() {
    let clock = MockTimeSource::new();
    let mut controller = controller(&clock);

    clock.advance(50);
    let skipped = controller.handle_request([("play", "1"), ("glitter", "")]);
    assert_eq!(skipped, 1);
    assert_eq!(controller.device().player().state(), PlayerState::Playing);

    clock.advance(127);
    controller.service();
    assert_eq!(controller.device().player().buzzer().sounding(), None);

    clock.advance(1);
    controller.service();
    assert_eq!(controller.device().player().buzzer().sounding(), Some(329));
}

#[test]
fn touch_is_ignored_until_calibrated() {
    let clock = MockTimeSource::new();
    let mut controller = controller(&clock);
    controller.sensor_mut().set(MIDDLE_BUTTON.1, TOUCHED);

    run(&mut controller, &clock, 900, 100);
    assert!(!controller.is_calibrated());
    assert!(!controller.device().lights().is_all_on());
}

#[test]
fn calibration_derives_thresholds_from_the_baseline() {
    let clock = MockTimeSource::new();
    let mut controller = controller(&clock);

    run(&mut controller, &clock, 1000, 100);
    assert!(controller.is_calibrated());
    for (id, _) in [LEFT_BUTTON, MIDDLE_BUTTON, RIGHT_BUTTON] {
        assert_eq!(controller.button_threshold(id), Some(940));
    }
}

#[test]
fn held_touch_repeats_its_action() {
    let clock = MockTimeSource::new();
    let mut controller = controller(&clock);
    run(&mut controller, &clock, 1000, 100);

    controller.sensor_mut().set(MIDDLE_BUTTON.1, TOUCHED);
    clock.advance(100);
    controller.service();
    assert!(controller.device().lights().is_all_on());
    assert_eq!(
        controller.device().templates().get(ON_OFF_BTN_STATE),
        Some(BTN_ON)
    );

    clock.advance(100);
    controller.service();
    assert!(!controller.device().lights().is_all_on());

    controller.sensor_mut().set(MIDDLE_BUTTON.1, BASELINE);
    run(&mut controller, &clock, 300, 100);
    assert!(!controller.device().lights().is_all_on());
}

#[test]
fn left_button_cycles_modes() {
    let clock = MockTimeSource::new();
    let mut controller = controller(&clock);
    run(&mut controller, &clock, 1000, 100);

    controller.sensor_mut().set(LEFT_BUTTON.1, TOUCHED);
    clock.advance(100);
    controller.service();
    assert_eq!(controller.device().lights().mode(), OperatingMode::SpinRight);
}

#[test]
fn right_button_plays_the_first_tune() {
    let clock = MockTimeSource::new();
    let mut controller = controller(&clock);
    run(&mut controller, &clock, 1000, 100);

    controller.sensor_mut().set(RIGHT_BUTTON.1, TOUCHED);
    clock.advance(100);
    controller.service();
    assert_eq!(controller.device().player().state(), PlayerState::Playing);
}

#[test]
fn touch_settings_come_from_the_device_config() {
    let config = DeviceConfig {
        touch: TouchConfig {
            settle_time: Interval::from_millis(200),
            threshold_percent: 50,
            ..TouchConfig::DEFAULT
        },
        ..DeviceConfig::DEFAULT
    };
    let clock = MockTimeSource::new();
    let mut controller = controller_with(&clock, config);

    run(&mut controller, &clock, 100, 100);
    assert!(!controller.is_calibrated());

    run(&mut controller, &clock, 100, 100);
    assert!(controller.is_calibrated());
    assert_eq!(controller.button_threshold(MIDDLE_BUTTON.0), Some(500));
}

#[test]
fn melody_tempo_override_drives_the_melody_timer() {
    let clock = MockTimeSource::new();
    let mut controller = controller(&clock);
    // Park the pattern timer far away so the melody deadline is the nearest.
    for _ in 0..6 {
        controller.handle_command("minus", "").unwrap();
    }

    controller.play(
        Melody::from_tokens(&[C, D, E]).unwrap(),
        Some(Interval::from_millis(64)),
    );
    assert_eq!(controller.service(), TestDuration(64));

    clock.advance(63);
    controller.service();
    assert_eq!(controller.device().player().buzzer().sounding(), None);

    clock.advance(1);
    assert_eq!(controller.service(), TestDuration(64));
    assert_eq!(controller.device().player().buzzer().sounding(), Some(261));

    clock.advance(64);
    controller.service();
    assert_eq!(controller.device().player().buzzer().sounding(), Some(293));

    clock.advance(64);
    controller.service();
    assert_eq!(controller.device().player().buzzer().sounding(), Some(329));

    // The melody ends and the timer falls back to the base tempo.
    clock.advance(64);
    assert_eq!(controller.service(), TestDuration(128));
    assert_eq!(controller.device().player().state(), PlayerState::Idle);
    assert_eq!(controller.device().player().effective_tempo(), Interval::from_millis(128));
}

#[test]
fn play_note_and_stop_reach_the_player() {
    let clock = MockTimeSource::new();
    let mut controller = controller(&clock);

    controller.play_note(Pitch::A, NoteLength::Whole, 4);
    clock.advance(128);
    controller.service();
    assert_eq!(controller.device().player().buzzer().sounding(), Some(440));

    controller.stop();
    assert_eq!(controller.device().player().state(), PlayerState::Idle);
    assert_eq!(controller.device().player().buzzer().sounding(), None);
}
