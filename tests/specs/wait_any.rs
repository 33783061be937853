// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! WaitForAnyInstancesSignal specs

use crate::prelude::*;

const EITHER_BUILDER: &str = r#"{
  "WaitForAnyInstancesSignal": [
    {"Name": "b1", "SerialOutput": {"Port": 1, "SuccessMatch": "DONE", "FailureMatch": "ERROR"}},
    {"Name": "b2", "SerialOutput": {"Port": 1, "SuccessMatch": "DONE", "FailureMatch": "ERROR"}}
  ]
}"#;

#[tokio::test(start_paused = true)]
async fn first_success_completes_the_step() {
    let world = World::new(&["b1", "b2"]);
    world.serial("b1", &["a\n", "b\n", "DONE\n"]);
    world.serial("b2", &["DONE\n"]);
    let start = Instant::now();

    world.run_json("wait-any", EITHER_BUILDER).await.unwrap();

    assert_eq!(start.elapsed(), Duration::from_secs(10));
    assert!(world.log.contains("Instance \"b2\": SuccessMatch found \"DONE\""));
    assert!(!world.log.contains("Instance \"b1\": SuccessMatch"));
}

#[tokio::test(start_paused = true)]
async fn declaration_order_does_not_decide() {
    let world = World::new(&["b1", "b2"]);
    world.serial("b1", &["DONE\n"]);
    world.serial("b2", &["a\n", "b\n", "DONE\n"]);
    let start = Instant::now();

    world.run_json("wait-any", EITHER_BUILDER).await.unwrap();

    assert_eq!(start.elapsed(), Duration::from_secs(10));
}

#[tokio::test(start_paused = true)]
async fn early_failure_still_fails_the_step() {
    let world = World::new(&["b1", "b2"]);
    world.serial("b1", &["ERROR: compiler crashed\n"]);
    world.serial("b2", &["a\n", "DONE\n"]);

    let err = world.run_json("wait-any", EITHER_BUILDER).await.unwrap_err();

    assert_eq!(err.instance(), Some("b1"));
}

#[tokio::test(start_paused = true)]
async fn losers_stop_polling() {
    let world = World::new(&["b1", "b2"]);
    world.serial("b2", &["DONE\n"]);

    world.run_json("wait-any", EITHER_BUILDER).await.unwrap();
    let b1_calls = world.compute.calls_for("b1").len();
    tokio::time::sleep(Duration::from_secs(120)).await;

    assert_eq!(world.compute.calls_for("b1").len(), b1_calls);
}

#[tokio::test(start_paused = true)]
async fn stopped_instance_satisfies_wait_any() {
    let world = World::new(&["b1", "b2"]);
    world.compute.push_stopped("b2", Ok(true));

    world
        .run_json(
            "wait-any",
            r#"{"WaitForAnyInstancesSignal": [
                {"Name": "b1", "SerialOutput": {"Port": 1, "SuccessMatch": "DONE"}},
                {"Name": "b2", "Stopped": true}]}"#,
        )
        .await
        .unwrap();
}
