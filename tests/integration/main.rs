// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Integration tests.
//!
//! Some help for laying out these tests was taken from:
//! https://matklad.github.io/2021/02/27/delete-cargo-integration-tests.html

mod harvest;
mod rates;

use std::path::Path;
use std::process::Output;
use std::str::from_utf8;

use assert_cmd::{output::OutputError, Command};
use tempfile::TempDir;

fn si_modes() -> Command {
    Command::cargo_bin("si-modes").unwrap()
}

fn get_cmd_output(result: Result<Output, OutputError>) -> (String, String) {
    let output = match result {
        Ok(o) => o,
        Err(o) => o.as_output().unwrap().clone(),
    };
    (
        from_utf8(&output.stdout).unwrap().to_string(),
        from_utf8(&output.stderr).unwrap().to_string(),
    )
}

/// Write a capture like the SACGS tools would produce.
fn write_te_capture<P: AsRef<Path>>(dir: P, si_mode: &str, fep_ccd_select: &str, prim_exp: i64) {
    let text = format!(
        "\
Parameter block: timedExposure
  parameterBlockId = 0x00a4
  fepCcdSelect = {fep_ccd_select}
  primaryExposure = {prim_exp}
  secondaryExposure = 0
  subarrayStartRow = 0
  subarrayRowCount = 1023
  dutyCycle = 0
  onChip2x2Summing = 0
  ignoreBadPixelMap = 0
"
    );
    std::fs::write(dir.as_ref().join(si_mode), text).unwrap();
}

fn write_cc_capture<P: AsRef<Path>>(dir: P, si_mode: &str, fep_ccd_select: &str) {
    let text = format!(
        "\
Parameter block: continuousClocking
  parameterBlockId = 0x003e
  fepCcdSelect = {fep_ccd_select}
  onChip2x2Summing = 0
  ignoreBadPixelMap = 0
"
    );
    std::fs::write(dir.as_ref().join(si_mode), text).unwrap();
}

#[test]
fn help_lists_subcommands() {
    let cmd = si_modes().arg("--help").ok();
    assert!(cmd.is_ok());
    let (stdout, _) = get_cmd_output(cmd);
    assert!(stdout.contains("harvest"));
    assert!(stdout.contains("rates"));
}

#[test]
fn unknown_arguments_fail() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let cmd = si_modes()
        .current_dir(tmp_dir.path())
        .args(["rates", "--no-such-flag"])
        .ok();
    assert!(cmd.is_err());
}
