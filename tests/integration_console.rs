//! Scripted operator sessions driven through the console front end.

mod common;

use std::io::Cursor;

use microgrid_sim::console::{Console, ConsoleError};
use microgrid_sim::registry::{FlatStrategy, Registry, Role, Weekday};
use microgrid_sim::sim::day::DaySimulator;

fn console(script: &str) -> Console<Cursor<Vec<u8>>, Vec<u8>> {
    Console::new(Cursor::new(script.as_bytes().to_vec()), Vec::new(), 3)
}

#[test]
fn scripted_session_from_prompts_to_summary() {
    // day, prosumer count, consumer count, one allocation in hour 0,
    // then EOF closes every remaining hour
    let script = "sunday\n1\n1\n1 1 1.0\ndone\n";
    let mut console = console(script);

    let day = console.prompt_day().expect("valid day");
    assert_eq!(day, Weekday::Sunday);
    let prosumers = console.prompt_count(Role::Prosumer).expect("valid count");
    let consumers = console.prompt_count(Role::Consumer).expect("valid count");

    let mut strategy = FlatStrategy::new(2.0, 1.5, 1.0);
    let registry = Registry::create(day.name(), prosumers, consumers, &mut strategy)
        .expect("validated inputs");
    let mut simulator = DaySimulator::new(registry);
    let summary = console.drive(&mut simulator).expect("scripted day runs");

    assert!(summary.is_full_day());
    assert!((summary.total_delivered_kwh - 1.0).abs() < 1e-5);
    // 2.0 kWh generated per hour, 1.0 delivered once
    assert!((summary.total_wasted_kwh - (48.0 - 1.0)).abs() < 1e-3);
    assert!((summary.total_unmet_kwh - (36.0 - 1.0)).abs() < 1e-3);
}

#[test]
fn invalid_day_inputs_reprompt_then_fail() {
    let mut console = console("Funday\nnope\nstill wrong\n");
    let err = console.prompt_day().expect_err("attempts exhausted");
    assert!(matches!(
        err,
        ConsoleError::AttemptsExhausted { attempts: 3 }
    ));
}

#[test]
fn rejected_allocation_then_corrected_retry() {
    let mut simulator = DaySimulator::new(common::registry_1x1_hour0(10.0, 6.0));
    // over-allocate, fix it, close; later hours close on EOF
    let mut console = console("1 1 7.5\n1 1 6\ndone\n");
    let summary = console.drive(&mut simulator).expect("scripted day runs");
    assert!((summary.total_delivered_kwh - 6.0).abs() < 1e-5);
    assert!((summary.total_wasted_kwh - 4.0).abs() < 1e-5);
    assert_eq!(summary.total_unmet_kwh, 0.0);
}

#[test]
fn done_with_no_allocations_wastes_everything() {
    let mut simulator = DaySimulator::new(common::registry_1x1_hour0(10.0, 6.0));
    let mut console = console("done\n");
    let summary = console.drive(&mut simulator).expect("scripted day runs");
    assert_eq!(summary.total_delivered_kwh, 0.0);
    assert!((summary.total_wasted_kwh - 10.0).abs() < 1e-5);
    assert!((summary.total_unmet_kwh - 6.0).abs() < 1e-5);
}

#[test]
fn unknown_participant_is_reported_and_recoverable() {
    let mut simulator = DaySimulator::new(common::registry_1x1_hour0(10.0, 6.0));
    let mut console = console("2 1 3\n1 1 3\ndone\n");
    let summary = console.drive(&mut simulator).expect("scripted day runs");
    assert!((summary.total_delivered_kwh - 3.0).abs() < 1e-5);
}

#[test]
fn drive_refuses_a_second_day() {
    let mut simulator = DaySimulator::new(common::empty_registry());
    let mut console = console("");
    console.drive(&mut simulator).expect("first day runs");
    let err = console.drive(&mut simulator).expect_err("second day fails");
    assert!(matches!(err, ConsoleError::Simulation(_)));
}
