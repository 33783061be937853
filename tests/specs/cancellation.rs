// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workflow cancellation while waiting

use crate::prelude::*;

const SLOW: &str = r#"{
  "WaitForInstancesSignal": [
    {"Name": "i1", "Interval": "10s", "Stopped": true,
     "SerialOutput": {"Port": 1, "SuccessMatch": "DONE"}, "GuestAttribute": {}},
    {"Name": "i2", "Interval": "10s", "Stopped": true}
  ]
}"#;

#[tokio::test(start_paused = true)]
async fn cancelling_mid_wait_abandons_without_error() {
    let world = World::new(&["i1", "i2"]);
    let cancel = world.cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(45)).await;
        cancel.cancel();
    });
    let start = Instant::now();

    world.run_json("wait", SLOW).await.unwrap();

    assert_eq!(start.elapsed(), Duration::from_secs(45));
    let calls = world.compute.calls().len();
    tokio::time::sleep(Duration::from_secs(300)).await;
    assert_eq!(world.compute.calls().len(), calls, "pollers kept running after cancellation");
}

#[tokio::test(start_paused = true)]
async fn cancelled_workflow_never_polls() {
    let world = World::new(&["i1", "i2"]);
    world.cancel.cancel();

    world.run_json("wait", SLOW).await.unwrap();

    assert!(world.compute.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn cancelling_a_nested_workflow_cancels_its_waits() {
    let world = World::new(&["i1", "i2"]);
    let nested = world.ctx("root").child_workflow("sub.wait");
    let cancel = world.cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(15)).await;
        cancel.cancel();
    });

    world.run_step(&nested, SLOW).await.unwrap();

    assert!(nested.cancel_token().is_cancelled());
}
