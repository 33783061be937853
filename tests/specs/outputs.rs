// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Serial output values published to the root workflow

use crate::prelude::*;

const WITH_STATUS: &str = r#"{
  "WaitForInstancesSignal": [
    {"Name": "builder", "Interval": "5s",
     "SerialOutput": {"Port": 1, "SuccessMatch": "BuildSuccess", "StatusMatch": "BuildStatus"}}
  ]
}"#;

#[tokio::test(start_paused = true)]
async fn status_lines_publish_values() {
    let world = World::new(&["builder"]);
    world.serial(
        "builder",
        &[
            "BuildStatus: <serial-output key:'image' value:'img-1'>\n",
            "BuildStatus: <serial-output key:'checksum' value:'abc'>\nBuildSta",
            "tus: <serial-output key:'image' value:'img-2'>\nBuildSuccess\n",
        ],
    );

    world.run_json("wait", WITH_STATUS).await.unwrap();

    similar_asserts::assert_eq!(
        world.outputs.snapshot(),
        vec![
            ("image".to_string(), "img-2".to_string()),
            ("checksum".to_string(), "abc".to_string()),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn nested_workflow_writes_reach_root_store() {
    let world = World::new(&["builder"]);
    world.serial("builder", &["BuildStatus <serial-output key:'disk' value:'d-9'>\nBuildSuccess\n"]);
    let root = world.ctx("root");
    let nested = root.child_workflow("sub").child_workflow("sub.wait");

    world.run_step(&nested, WITH_STATUS).await.unwrap();

    assert!(nested.outputs().shares_with(&world.outputs));
    assert_eq!(world.outputs.get("disk").as_deref(), Some("d-9"));
    assert!(world.log.lines().iter().all(|l| l.step == "sub.wait"));
}

#[tokio::test(start_paused = true)]
async fn lines_outside_status_match_are_not_extracted() {
    let world = World::new(&["builder"]);
    world.serial("builder", &["noise <serial-output key:'k' value:'v'>\nBuildSuccess\n"]);

    world.run_json("wait", WITH_STATUS).await.unwrap();

    assert!(world.outputs.is_empty());
}
