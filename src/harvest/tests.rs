// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::collections::HashMap;

use tempfile::TempDir;

use super::*;
use crate::{
    store::{CaptureDir, MemoryStore},
    tool::ShellConfigTool,
};

/// A configuration tool that prints canned output, and remembers which modes
/// it was asked about.
#[derive(Default)]
struct FakeTool {
    outputs: HashMap<String, ToolOutput>,
    calls: Vec<String>,
}

impl FakeTool {
    fn with(mut self, si_mode: &str, num_lines: usize, status: Option<i32>) -> Self {
        let lines = (0..num_lines)
            .map(|i| format!("  param{i} = {si_mode}\n").into_bytes())
            .collect();
        self.outputs
            .insert(si_mode.to_string(), ToolOutput { lines, status });
        self
    }
}

impl ConfigTool for FakeTool {
    fn run(&mut self, si_mode: &str) -> std::io::Result<ToolOutput> {
        self.calls.push(si_mode.to_string());
        self.outputs.get(si_mode).cloned().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::NotFound, "no such tool")
        })
    }

    fn describe(&self, si_mode: &str) -> String {
        format!("fake {si_mode}")
    }
}

fn modes(v: &[&str]) -> Vec<SiMode> {
    v.iter().map(|&m| SiMode::new(m)).collect()
}

#[test]
fn tool_sees_evenified_modes_and_store_sees_originals() {
    let mut tool = FakeTool::default().with("TE_00A4", 12, Some(0));
    let mut store = MemoryStore::new();
    let report = harvest(modes(&["TE_00A5"]), &mut tool, &mut store, false).unwrap();

    assert_eq!(tool.calls, vec!["TE_00A4"]);
    assert_eq!(
        report.outcomes,
        vec![(
            SiMode::new("TE_00A5"),
            HarvestOutcome::Captured { num_lines: 12 }
        )]
    );
    let (success, lines) = store.get(&SiMode::new("TE_00A5")).unwrap();
    assert!(success);
    assert_eq!(lines.len(), 12);
    assert!(store.get(&SiMode::new("TE_00A4")).is_none());
}

#[test]
fn failures_are_stored_and_do_not_stop_the_harvest() {
    let mut tool = FakeTool::default()
        // Bad status, plenty of lines.
        .with("CC_0002", 20, Some(1))
        // Good status, too few lines.
        .with("CC_0004", 9, Some(0))
        // Killed.
        .with("CC_0006", 3, None)
        // Just enough lines.
        .with("CC_0008", 10, Some(0));
    // "CC_000A" isn't known to the fake tool, so it can't be run at all.
    let mut store = MemoryStore::new();
    let report = harvest(
        modes(&["CC_0008", "CC_0002", "CC_0004", "CC_0006", "CC_000A"]),
        &mut tool,
        &mut store,
        false,
    )
    .unwrap();

    assert_eq!(
        report.outcomes,
        vec![
            (
                SiMode::new("CC_0002"),
                HarvestOutcome::Failed {
                    status: Some(1),
                    num_lines: 20
                }
            ),
            (
                SiMode::new("CC_0004"),
                HarvestOutcome::Failed {
                    status: Some(0),
                    num_lines: 9
                }
            ),
            (
                SiMode::new("CC_0006"),
                HarvestOutcome::Failed {
                    status: None,
                    num_lines: 3
                }
            ),
            (
                SiMode::new("CC_0008"),
                HarvestOutcome::Captured { num_lines: 10 }
            ),
            (
                SiMode::new("CC_000A"),
                HarvestOutcome::Failed {
                    status: None,
                    num_lines: 0
                }
            ),
        ]
    );
    assert_eq!(report.num_failed(), 4);
    assert_eq!(report.num_captured(), 1);
    assert_eq!(
        report.failed_modes().cloned().collect::<Vec<_>>(),
        modes(&["CC_0002", "CC_0004", "CC_0006", "CC_000A"])
    );

    // Partial output of failures is kept.
    let (success, lines) = store.get(&SiMode::new("CC_0002")).unwrap();
    assert!(!success);
    assert_eq!(lines.len(), 20);
}

#[test]
fn harvesting_twice_is_idempotent() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let mut store = CaptureDir::new(tmp_dir.path());
    let mut tool = FakeTool::default()
        .with("TE_00A4", 15, Some(0))
        .with("CC_003E", 2, Some(0));
    let all = modes(&["TE_00A5", "CC_003E"]);

    let first = harvest(all.clone(), &mut tool, &mut store, false).unwrap();
    assert_eq!(first.num_captured(), 1);
    assert_eq!(first.num_failed(), 1);
    assert!(tmp_dir.path().join("TE_00A5").exists());
    assert!(tmp_dir.path().join("FAIL_CC_003E").exists());
    let before: Vec<_> = ["TE_00A5", "FAIL_CC_003E"]
        .iter()
        .map(|f| std::fs::read_to_string(tmp_dir.path().join(f)).unwrap())
        .collect();

    tool.calls.clear();
    let second = harvest(all, &mut tool, &mut store, false).unwrap();
    assert!(tool.calls.is_empty());
    assert_eq!(
        second.outcomes,
        vec![
            (
                SiMode::new("CC_003E"),
                HarvestOutcome::Skipped(CaptureState::Failure)
            ),
            (
                SiMode::new("TE_00A5"),
                HarvestOutcome::Skipped(CaptureState::Success)
            ),
        ]
    );
    assert_eq!(std::fs::read_dir(tmp_dir.path()).unwrap().count(), 2);
    let after: Vec<_> = ["TE_00A5", "FAIL_CC_003E"]
        .iter()
        .map(|f| std::fs::read_to_string(tmp_dir.path().join(f)).unwrap())
        .collect();
    assert_eq!(before, after);
}

#[test]
fn dry_run_does_nothing() {
    let mut tool = FakeTool::default().with("TE_00A4", 15, Some(0));
    let mut store = MemoryStore::new();
    let report = harvest(
        modes(&["TE_00A5", "TE_00A5"]),
        &mut tool,
        &mut store,
        true,
    )
    .unwrap();
    assert!(tool.calls.is_empty());
    assert!(store.is_empty());
    assert_eq!(report.num_pending(), 1);
    assert_eq!(
        report.outcomes[0].1,
        HarvestOutcome::Pending {
            command: "fake TE_00A4".to_string()
        }
    );
}

#[test]
fn broken_store_is_fatal() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let mut store = CaptureDir::new(tmp_dir.path().join("missing"));
    let mut tool = FakeTool::default().with("TE_00A4", 15, Some(0));
    let result = harvest(modes(&["TE_00A4"]), &mut tool, &mut store, false);
    assert!(matches!(result, Err(HarvestError::Store(_))));
}

#[test]
fn shell_output_is_stored_byte_for_byte() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let mut store = CaptureDir::new(tmp_dir.path());
    let mut tool = ShellConfigTool::new("printf '  fepCcdSelect = \\377\\n'; echo {si_mode}");
    let report = harvest(modes(&["CC_003F"]), &mut tool, &mut store, false).unwrap();
    assert_eq!(report.num_failed(), 1);

    let contents = std::fs::read(tmp_dir.path().join("FAIL_CC_003F")).unwrap();
    assert_eq!(contents, b"  fepCcdSelect = \xff\nCC_003E\n");
}
