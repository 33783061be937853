// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Step documents in each supported syntax

use crate::prelude::*;

async fn run_doc(world: &World, content: &str, format: Format) -> Result<(), WaitError> {
    let def = parse_step_with_format(content, format)?;
    let step = WaitStep::populate(&def)?;
    step.validate(&world.registry, "wait")?;
    step.run(&world.ctx("wait"), &world.registry).await
}

#[tokio::test(start_paused = true)]
async fn toml_wait_any() {
    let world = World::new(&["i1", "i2"]);
    world.serial("i2", &["ok\n"]);

    let toml = r#"
[[WaitForAnyInstancesSignal]]
Name = "i1"
Stopped = true

[[WaitForAnyInstancesSignal]]
Name = "i2"
Interval = "2s"

[WaitForAnyInstancesSignal.SerialOutput]
Port = 1
SuccessMatch = "ok"
"#;
    let start = Instant::now();

    run_doc(&world, toml, Format::Toml).await.unwrap();

    assert_eq!(start.elapsed(), Duration::from_secs(2));
}

#[tokio::test(start_paused = true)]
async fn hcl_wait_all() {
    let world = World::new(&["i1"]);
    world.compute.push_guest_attribute("i1", Ok("done".to_string()));

    let hcl = r#"
WaitForInstancesSignal {
  Name = "i1"
  Interval = "1s"
  GuestAttribute {
    KeyName = "Result"
  }
}
"#;
    let start = Instant::now();

    run_doc(&world, hcl, Format::Hcl).await.unwrap();

    // guest attribute polling never goes below six seconds
    assert_eq!(start.elapsed(), Duration::from_secs(6));
    assert!(world.log.contains("found key \"daisy/Result\""));
}

#[tokio::test(start_paused = true)]
async fn camel_case_keys_are_accepted() {
    let world = World::new(&["i1"]);
    world.serial("i1", &["all good\n"]);

    world
        .run_json(
            "wait",
            r#"{"WaitForInstancesSignal": [
                {"name": "i1", "interval": "3s",
                 "serialOutput": {"port": 1, "successMatch": "good"}}]}"#,
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn invalid_definitions_fail_before_polling() {
    let world = World::new(&["i1"]);
    let cases = [
        (r#"{"WaitForInstancesSignal": [{"Name": "i1"}]}"#, "nothing to wait for"),
        (
            r#"{"WaitForInstancesSignal": [{"Name": "i1", "Interval": "0s", "Stopped": true}]}"#,
            "no interval given",
        ),
        (
            r#"{"WaitForInstancesSignal": [{"Name": "i1", "SerialOutput": {"SuccessMatch": "x"}}]}"#,
            "no Port given",
        ),
        (
            r#"{"WaitForInstancesSignal": [{"Name": "i1", "SerialOutput": {"Port": 1}}]}"#,
            "no SuccessMatch or FailureMatch given",
        ),
        (
            r#"{"WaitForInstancesSignal": [{"Name": "i1", "Interval": "soon", "Stopped": true}]}"#,
            "failed to parse duration",
        ),
        (r#"{"WaitForInstancesSignal": []}"#, "no instances to wait for"),
    ];

    for (doc, expected) in cases {
        let err = world.run_json("wait", doc).await.unwrap_err();
        assert!(
            matches!(&err, WaitError::Config(m) if m.contains(expected)),
            "{} -> {:?}",
            doc,
            err
        );
    }
    assert!(world.compute.calls().is_empty());
}
