// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Harvest SI-mode configurations.
//!
//! For every SI mode without a capture, the configuration tool is run on the
//! evenified mode, and its output is stored under the original mode. A run of
//! the tool fails if its exit status is non-zero or it produced too few lines;
//! the output of a failed run is still stored (as a failed capture), and
//! harvesting carries on with the next mode. Modes that already have a
//! capture, successful or not, are skipped, so harvesting can be re-run when
//! new SI modes appear.

#[cfg(test)]
mod tests;

use log::{debug, error, info, warn};
use thiserror::Error;

use crate::{
    constants::MIN_CAPTURE_LINES,
    store::{CaptureState, CaptureStore, CaptureStoreError},
    tool::{ConfigTool, ToolOutput},
    SiMode,
};

/// What happened to a single SI mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HarvestOutcome {
    /// The mode already had a capture.
    Skipped(CaptureState),

    /// The tool ran successfully and its output was stored.
    Captured { num_lines: usize },

    /// The tool failed (or couldn't be run); whatever it printed was stored as
    /// a failed capture.
    Failed {
        status: Option<i32>,
        num_lines: usize,
    },

    /// Dry run only; this is the command that would have been run.
    Pending { command: String },
}

/// The outcomes of a harvest, in the order the modes were processed.
#[derive(Debug, Clone, Default)]
pub struct HarvestReport {
    pub outcomes: Vec<(SiMode, HarvestOutcome)>,
}

impl HarvestReport {
    pub fn num_skipped(&self) -> usize {
        self.count(|o| matches!(o, HarvestOutcome::Skipped(_)))
    }

    pub fn num_captured(&self) -> usize {
        self.count(|o| matches!(o, HarvestOutcome::Captured { .. }))
    }

    pub fn num_failed(&self) -> usize {
        self.count(|o| matches!(o, HarvestOutcome::Failed { .. }))
    }

    pub fn num_pending(&self) -> usize {
        self.count(|o| matches!(o, HarvestOutcome::Pending { .. }))
    }

    fn count<F: Fn(&HarvestOutcome) -> bool>(&self, f: F) -> usize {
        self.outcomes.iter().filter(|(_, o)| f(o)).count()
    }

    /// The modes whose tool run failed during this harvest.
    pub fn failed_modes(&self) -> impl Iterator<Item = &SiMode> {
        self.outcomes
            .iter()
            .filter(|(_, o)| matches!(o, HarvestOutcome::Failed { .. }))
            .map(|(m, _)| m)
    }
}

/// Is this tool output good enough to be a successful capture?
pub fn is_good_capture(output: &ToolOutput) -> bool {
    output.success() && output.lines.len() >= MIN_CAPTURE_LINES
}

/// Harvest the configurations of `modes`. Modes are processed in sorted
/// order, and duplicates are only processed once.
///
/// If `dry_run` is true, nothing is run or written; modes that would be
/// processed are reported as [`HarvestOutcome::Pending`].
pub fn harvest<I, T, S>(
    modes: I,
    tool: &mut T,
    store: &mut S,
    dry_run: bool,
) -> Result<HarvestReport, HarvestError>
where
    I: IntoIterator<Item = SiMode>,
    T: ConfigTool + ?Sized,
    S: CaptureStore + ?Sized,
{
    let mut modes: Vec<SiMode> = modes.into_iter().collect();
    modes.sort_unstable();
    modes.dedup();

    let mut report = HarvestReport::default();
    for mode in modes {
        let outcome = harvest_one(&mode, tool, store, dry_run)?;
        report.outcomes.push((mode, outcome));
    }
    Ok(report)
}

fn harvest_one<T, S>(
    mode: &SiMode,
    tool: &mut T,
    store: &mut S,
    dry_run: bool,
) -> Result<HarvestOutcome, HarvestError>
where
    T: ConfigTool + ?Sized,
    S: CaptureStore + ?Sized,
{
    let state = store.state(mode)?;
    if state != CaptureState::Absent {
        info!("Skipping {mode}");
        return Ok(HarvestOutcome::Skipped(state));
    }

    let evenified = mode.evenified();
    info!("Processing {mode} {evenified}");
    if dry_run {
        let command = tool.describe(&evenified);
        debug!("Would run: {command}");
        return Ok(HarvestOutcome::Pending { command });
    }

    let output = match tool.run(&evenified) {
        Ok(o) => o,
        Err(e) => {
            error!("Couldn't run the configuration tool for {mode}: {e}");
            ToolOutput {
                lines: vec![],
                status: None,
            }
        }
    };
    let num_lines = output.lines.len();
    let good = is_good_capture(&output);
    if !good {
        match output.status {
            Some(s) => warn!("Some problem status={s} ({num_lines} lines of output)"),
            None => warn!("Some problem status=<killed> ({num_lines} lines of output)"),
        }
    }
    store.write(mode, good, &output.lines)?;

    Ok(if good {
        HarvestOutcome::Captured { num_lines }
    } else {
        HarvestOutcome::Failed {
            status: output.status,
            num_lines,
        }
    })
}

#[derive(Error, Debug)]
pub enum HarvestError {
    #[error(transparent)]
    Store(#[from] CaptureStoreError),
}
