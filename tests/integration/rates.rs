// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Integration tests for the rates table.

use crate::*;

#[test]
fn rates_with_defaults() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let si_mode_dir = tmp_dir.path().join("si_modes");
    std::fs::create_dir(&si_mode_dir).unwrap();
    write_te_capture(&si_mode_dir, "TE_00A4", "1 10 10 1", 33000);
    write_cc_capture(&si_mode_dir, "CC_003E", "1 1 1 1");
    std::fs::write(si_mode_dir.join("FAIL_TE_00B2"), "nope\n").unwrap();

    // Run with zero arguments in the directory holding "si_modes".
    let cmd = si_modes().current_dir(tmp_dir.path()).arg("rates").ok();
    assert!(cmd.is_ok(), "{:?}", get_cmd_output(cmd));

    let table = std::fs::read_to_string(tmp_dir.path().join("si_mode_rates.dat")).unwrap();
    assert_eq!(
        table,
        "TE_00A4    2 33000     0  1023      1      1\n\
         CC_003E    4 -99     0  1023   2807    351\n"
    );
}

#[test]
fn missing_parameter_fails_the_run() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    write_te_capture(tmp_dir.path(), "TE_00A4", "1 10 10 1", 33000);
    std::fs::write(tmp_dir.path().join("TE_00B2"), "  fepCcdSelect = 1 10\n").unwrap();
    let output = tmp_dir.path().join("out.dat");

    let cmd = si_modes()
        .args([
            "rates",
            "--si-mode-dir",
            &tmp_dir.path().display().to_string(),
            "-o",
            &output.display().to_string(),
        ])
        .ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(
        stderr.contains("SI mode TE_00B2: primaryExposure not found"),
        "{stderr}"
    );
    // The good row before the bad capture is kept.
    let table = std::fs::read_to_string(&output).unwrap();
    assert_eq!(table, "TE_00A4    2 33000     0  1023      1      1\n");

    let cmd = si_modes()
        .args([
            "rates",
            "--si-mode-dir",
            &tmp_dir.path().display().to_string(),
            "-o",
            &output.display().to_string(),
            "--skip-bad",
        ])
        .ok();
    assert!(cmd.is_ok(), "{:?}", get_cmd_output(cmd));
    let table = std::fs::read_to_string(&output).unwrap();
    assert_eq!(table, "TE_00A4    2 33000     0  1023      1      1\n");
}

#[test]
fn rates_dry_run_writes_nothing() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    write_cc_capture(tmp_dir.path(), "CC_003E", "1 1 1 1");
    let output = tmp_dir.path().join("out.dat");

    let cmd = si_modes()
        .args([
            "rates",
            "--si-mode-dir",
            &tmp_dir.path().display().to_string(),
            "-o",
            &output.display().to_string(),
            "--dry-run",
        ])
        .ok();
    assert!(cmd.is_ok(), "{:?}", get_cmd_output(cmd));
    assert!(!output.exists());
}
