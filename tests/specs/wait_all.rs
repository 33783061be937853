// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! WaitForInstancesSignal specs

use crate::prelude::*;

const BUILD_AND_TEST: &str = r#"{
  "WaitForInstancesSignal": [
    {"Name": "builder", "Interval": "10s",
     "SerialOutput": {"Port": 1, "SuccessMatch": "DONE", "FailureMatch": ["ERROR", "FATAL"]}},
    {"Name": "tester", "Interval": "10s", "Stopped": true}
  ]
}"#;

#[tokio::test(start_paused = true)]
async fn completes_when_every_instance_signals() {
    let world = World::new(&["builder", "tester"]);
    world.serial("builder", &["boot\n", "progress 50%\n", "DONE\n"]);
    world.compute.push_stopped("tester", Ok(false));
    world.compute.push_stopped("tester", Ok(true));
    let start = Instant::now();

    world.run_json("wait-build", BUILD_AND_TEST).await.unwrap();

    assert_eq!(start.elapsed(), Duration::from_secs(30));
    assert!(world.log.contains("Instance \"builder\": SuccessMatch found \"DONE\""));
    assert!(world.log.contains("Instance \"tester\" stopped."));
    assert_eq!(world.registry.users("builder"), vec!["wait-build"]);
}

#[tokio::test(start_paused = true)]
async fn failure_pattern_fails_the_step() {
    let world = World::new(&["builder", "tester"]);
    world.serial("builder", &["boot\n", "FATAL: out of disk\n"]);

    let err = world.run_json("wait-build", BUILD_AND_TEST).await.unwrap_err();

    assert_eq!(
        err,
        WaitError::SignalFailure {
            instance: "builder".to_string(),
            message: "FailureMatch found: \"FATAL: out of disk\"".to_string(),
        }
    );
}

#[tokio::test(start_paused = true)]
async fn api_outage_fails_after_error_budget() {
    let world = World::new(&["builder", "tester"]);
    for _ in 0..4 {
        world.compute.push_serial_error("builder", ComputeError::Api("503".to_string()));
    }
    let start = Instant::now();

    let err = world.run_json("wait-build", BUILD_AND_TEST).await.unwrap_err();

    assert_eq!(err.instance(), Some("builder"));
    assert!(matches!(err, WaitError::Api { .. }));
    assert_eq!(start.elapsed(), Duration::from_secs(40));
}

#[tokio::test(start_paused = true)]
async fn serial_errors_while_stopping_are_ignored() {
    let world = World::new(&["builder"]);
    world.compute.set_status("builder", InstanceStatus::Stopping);
    for _ in 0..8 {
        world.compute.push_serial_error("builder", ComputeError::Api("gone".to_string()));
    }
    world.compute.push_stopped("builder", Ok(false));
    world.compute.push_stopped("builder", Ok(false));
    world.compute.push_stopped("builder", Ok(true));

    world
        .run_json(
            "wait",
            r#"{"WaitForInstancesSignal": [
                {"Name": "builder", "Interval": "1s", "Stopped": true,
                 "SerialOutput": {"Port": 1, "SuccessMatch": "DONE"}}]}"#,
        )
        .await
        .unwrap();

    assert!(world.log.contains("Instance \"builder\" stopped."));
}

#[tokio::test(start_paused = true)]
async fn undeclared_instance_fails_validation() {
    let world = World::new(&["builder"]);

    let err = world.run_json("wait-build", BUILD_AND_TEST).await.unwrap_err();

    assert!(matches!(&err, WaitError::Config(m) if m.contains("tester")), "{:?}", err);
    assert!(world.compute.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn guest_attribute_value_is_checked() {
    let world = World::new(&["builder"]);
    world
        .compute
        .push_guest_attribute("builder", Err(ComputeError::NotFound("daisy/DaisyResult".into())));
    world.compute.push_guest_attribute("builder", Ok("FAIL".to_string()));

    let err = world
        .run_json(
            "wait",
            r#"{"WaitForInstancesSignal": [
                {"Name": "builder", "GuestAttribute": {"SuccessValue": "PASS"}}]}"#,
        )
        .await
        .unwrap_err();

    assert_eq!(
        err,
        WaitError::SignalFailure {
            instance: "builder".to_string(),
            message: "bad guest attribute value found: \"FAIL\"".to_string(),
        }
    );
}
