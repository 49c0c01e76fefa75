// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Useful constants.

The transfer-rate values here come from the ACIS instrument team's guidance
on continuous-clocking and alternating-exposure modes. All rates are per
second.
 */

/// The number of primary-exposure ticks in one second.
pub const TICKS_PER_SEC: f64 = 10.0;

/// The number of parallel transfers needed to shift a frame into the framestore,
/// in addition to the subarray rows that are read out.
pub const FRAME_TRANSFER_ROWS: i64 = 1026;

/// The number of rows read out in a full frame (continuous clocking always
/// reads a full frame).
pub const FULL_FRAME_ROW_COUNT: i64 = 1023;

/// The parallel-transfer rate of a single CCD in continuous-clocking mode.
pub const CC_PAR_XFERS_PER_SEC_PER_CCD: f64 = 701.75;

/// The serial clock period in continuous-clocking mode [seconds]. This does
/// not depend on the number of CCDs.
pub const CC_SERIAL_CLOCK_PERIOD: f64 = 0.00285;

/// Continuous-clocking modes have no discrete primary exposure; this is
/// reported in its place.
pub const CC_PRIMARY_EXPOSURE_SENTINEL: i64 = -99;

/// The token in `fepCcdSelect` that denotes an unused FEP.
pub const FEP_CCD_UNSELECTED: &str = "10";

/// Captures with fewer output lines than this are considered failed.
pub const MIN_CAPTURE_LINES: usize = 10;

/// The prefix of a capture file holding the output of a failed tool run.
pub const FAIL_PREFIX: &str = "FAIL_";

/// The default directory of SI-mode captures.
pub const DEFAULT_SI_MODE_DIR: &str = "si_modes";

/// The default output file of the rate calculator.
pub const DEFAULT_RATES_FILE: &str = "si_mode_rates.dat";

/// The commanded-states table read when no SI modes are given.
pub const DEFAULT_STATES_FILE: &str = "cmd_states.dat";

/// The default start of the commanded-states history to consider.
pub const DEFAULT_STATES_EPOCH: &str = "2000:001";

/// The default command used to generate an SI-mode configuration. The text
/// `{si_mode}` is replaced by the (evenified) SI mode.
pub const DEFAULT_TOOL_COMMAND: &str = "/data/acis/sacgs/bin/ratcfg \
     -d /data/acis/cmdgen/sacgs/current.dat \
     -c /data/acis/sacgs/odb/current.cfg {si_mode} \
     | /data/acis/cmdgen/sacgs/bin/lcmd -r -v";

/// The placeholder in a tool command template that is replaced by the SI mode.
pub const TOOL_COMMAND_PLACEHOLDER: &str = "{si_mode}";
