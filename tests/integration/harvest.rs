// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Integration tests for harvesting SI-mode configurations.

use crate::*;

/// Print twelve lines of configuration for any mode, except "CC_0040", for
/// which the tool fails.
const FAKE_TOOL: &str = r#"test {si_mode} = CC_0040 && { echo partial; exit 2; }; printf '  fepCcdSelect = 1 1 1 1\n  primaryExposure = 33000\n  subarrayStartRow = 0\n  subarrayRowCount = 1023\n'; printf 'line\n%.0s' 1 2 3 4 5 6 7 8"#;

#[test]
fn harvest_then_rates() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let states = tmp_dir.path().join("cmd_states.dat");
    std::fs::write(
        &states,
        "datestart              datestop               si_mode\n\
         2000:001:00:00:00.000  2000:001:12:00:00.000  TE_00A5\n\
         2000:001:12:00:00.000  2000:002:00:00:00.000  CC_0041\n\
         2000:002:00:00:00.000  2000:003:00:00:00.000  CC_003E\n",
    )
    .unwrap();

    let harvest = || {
        si_modes()
            .current_dir(tmp_dir.path())
            .args(["harvest", "--states", "cmd_states.dat", "--tool-command", FAKE_TOOL])
            .ok()
    };

    let cmd = harvest();
    assert!(cmd.is_ok(), "{:?}", get_cmd_output(cmd));
    let (stdout, _) = get_cmd_output(cmd);
    assert!(stdout.contains("Processing TE_00A5 TE_00A4"), "{stdout}");
    assert!(stdout.contains("Processing CC_0041 CC_0040"), "{stdout}");

    let si_mode_dir = tmp_dir.path().join("si_modes");
    assert!(si_mode_dir.join("TE_00A5").exists());
    assert!(si_mode_dir.join("CC_003E").exists());
    // CC_0041 is evenified to CC_0040, which the tool fails on.
    assert_eq!(
        std::fs::read_to_string(si_mode_dir.join("FAIL_CC_0041")).unwrap(),
        "partial\n"
    );

    // Harvesting again skips everything.
    let cmd = harvest();
    assert!(cmd.is_ok(), "{:?}", get_cmd_output(cmd));
    let (stdout, _) = get_cmd_output(cmd);
    assert!(stdout.contains("Skipping CC_0041"), "{stdout}");
    assert!(!stdout.contains("Processing"), "{stdout}");
    assert_eq!(std::fs::read_dir(&si_mode_dir).unwrap().count(), 3);

    let cmd = si_modes().current_dir(tmp_dir.path()).arg("rates").ok();
    assert!(cmd.is_ok(), "{:?}", get_cmd_output(cmd));
    let table = std::fs::read_to_string(tmp_dir.path().join("si_mode_rates.dat")).unwrap();
    assert_eq!(
        table,
        "TE_00A5    4 33000     0  1023      2      1\n\
         CC_003E    4 -99     0  1023   2807    351\n"
    );
}

#[test]
fn harvest_with_zero_arguments() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let cmd = si_modes()
        .current_dir(tmp_dir.path())
        .arg("harvest")
        .ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.contains("cmd_states.dat"), "{stderr}");

    std::fs::write(
        tmp_dir.path().join("cmd_states.dat"),
        "datestart              si_mode\n\
         2000:001:00:00:00.000  TE_00A5\n",
    )
    .unwrap();
    let cmd = si_modes()
        .current_dir(tmp_dir.path())
        .arg("harvest")
        .ok();
    assert!(cmd.is_ok(), "{:?}", get_cmd_output(cmd));
    let (stdout, _) = get_cmd_output(cmd);
    assert!(stdout.contains("Processing TE_00A5 TE_00A4"), "{stdout}");
    // Whether or not the SACGS tools are installed, the mode gets exactly one
    // capture.
    let captures: Vec<_> = std::fs::read_dir(tmp_dir.path().join("si_modes"))
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    assert!(
        captures == ["TE_00A5"] || captures == ["FAIL_TE_00A5"],
        "{captures:?}"
    );
}

#[test]
fn harvest_dry_run() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let cmd = si_modes()
        .current_dir(tmp_dir.path())
        .args(["harvest", "--si-modes", "TE_00A5", "--dry-run"])
        .ok();
    assert!(cmd.is_ok(), "{:?}", get_cmd_output(cmd));
    let (stdout, _) = get_cmd_output(cmd);
    assert!(stdout.contains("/data/acis/sacgs/bin/ratcfg"), "{stdout}");
    assert!(stdout.contains(" TE_00A4 "), "{stdout}");
    assert!(!tmp_dir.path().join("si_modes").exists());
}

#[test]
fn save_toml_reproduces_the_run() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let cmd = si_modes()
        .current_dir(tmp_dir.path())
        .args([
            "harvest",
            "--si-modes",
            "TE_00A5",
            "--tool-command",
            FAKE_TOOL,
            "--save-toml",
            "harvest.toml",
            "--dry-run",
        ])
        .ok();
    assert!(cmd.is_ok(), "{:?}", get_cmd_output(cmd));

    let cmd = si_modes()
        .current_dir(tmp_dir.path())
        .args(["harvest", "harvest.toml"])
        .ok();
    assert!(cmd.is_ok(), "{:?}", get_cmd_output(cmd));
    assert!(tmp_dir.path().join("si_modes").join("TE_00A5").exists());
}
