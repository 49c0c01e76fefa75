// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Harvest the configurations of SI modes with the configuration tool, storing
//! each as a file named after the SI mode. This can be re-run when new SI modes
//! are added; modes that already have a capture are skipped.

use std::{collections::BTreeSet, path::PathBuf};

use clap::Parser;
use log::{debug, info, trace};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::common::{display_warnings, Summary, Warn, ARG_FILE_HELP};
use crate::{
    constants::{
        DEFAULT_SI_MODE_DIR, DEFAULT_STATES_EPOCH, DEFAULT_STATES_FILE, DEFAULT_TOOL_COMMAND,
    },
    harvest::{harvest, HarvestOutcome},
    states::{ModeList, StateSource, StateSourceError, StateTable},
    store::CaptureDir,
    tool::ShellConfigTool,
    SiMode, SiModesError,
};

lazy_static::lazy_static! {
    static ref SI_MODE_DIR_HELP: String =
        format!("The directory of SI-mode captures. It is created if it doesn't exist. Default: {DEFAULT_SI_MODE_DIR}");

    static ref STATES_HELP: String =
        format!("A commanded-states table. Every distinct SI mode in it is harvested. Default: {DEFAULT_STATES_FILE}, unless --si-modes is given");

    static ref EPOCH_HELP: String =
        format!("Only SI modes in commanded states starting at or after this date are harvested. Default: {DEFAULT_STATES_EPOCH}");

    static ref TOOL_COMMAND_HELP: String =
        format!("The shell command that prints the configuration of an SI mode. \"{{si_mode}}\" is replaced by the SI mode (evenified). Default: {DEFAULT_TOOL_COMMAND}");
}

#[derive(Parser, Debug, Clone, Default, Serialize, Deserialize)]
pub(super) struct HarvestArgs {
    #[clap(name = "ARGUMENTS_FILE", help = ARG_FILE_HELP.as_str(), parse(from_os_str))]
    #[serde(skip)]
    pub(super) args_file: Option<PathBuf>,

    #[clap(long, parse(from_os_str), help = STATES_HELP.as_str(), help_heading = "SI MODES")]
    pub(super) states: Option<PathBuf>,

    #[clap(long, help = EPOCH_HELP.as_str(), help_heading = "SI MODES")]
    pub(super) epoch: Option<String>,

    /// SI modes to harvest, in addition to any from the commanded-states
    /// table.
    #[clap(long, multiple_values(true), help_heading = "SI MODES")]
    pub(super) si_modes: Option<Vec<String>>,

    #[clap(long, parse(from_os_str), help = SI_MODE_DIR_HELP.as_str(), help_heading = "OUTPUT FILES")]
    pub(super) si_mode_dir: Option<PathBuf>,

    #[clap(long, help = TOOL_COMMAND_HELP.as_str())]
    pub(super) tool_command: Option<String>,
}

/// Parameters of a harvest, after consolidating the arguments.
#[derive(Debug)]
pub(super) struct HarvestParams {
    pub(super) si_modes: BTreeSet<SiMode>,
    pub(super) si_mode_dir: PathBuf,
    pub(super) tool_command: String,
}

impl HarvestArgs {
    /// Both command-line and file arguments overlap in terms of what is
    /// available; this function consolidates everything that was specified into
    /// a single struct. Where applicable, it will prefer CLI parameters over
    /// those in the file.
    pub(super) fn merge(self) -> Result<HarvestArgs, SiModesError> {
        debug!("Merging command-line arguments with the argument file");

        let cli_args = self;

        if let Some(arg_file) = cli_args.args_file {
            // Read in the file arguments. Ensure all of the file args are
            // accounted for by pattern matching.
            let HarvestArgs {
                args_file: _,
                states,
                epoch,
                si_modes,
                si_mode_dir,
                tool_command,
            } = unpack_arg_file!(arg_file);

            Ok(HarvestArgs {
                args_file: None,
                states: cli_args.states.or(states),
                epoch: cli_args.epoch.or(epoch),
                si_modes: cli_args.si_modes.or(si_modes),
                si_mode_dir: cli_args.si_mode_dir.or(si_mode_dir),
                tool_command: cli_args.tool_command.or(tool_command),
            })
        } else {
            Ok(cli_args)
        }
    }

    pub(super) fn parse(self) -> Result<HarvestParams, HarvestArgsError> {
        trace!("{:#?}", self);

        let HarvestArgs {
            args_file: _,
            states,
            epoch,
            si_modes,
            si_mode_dir,
            tool_command,
        } = self;

        let si_modes = si_modes.filter(|v| !v.is_empty());
        let states = match (states, &si_modes) {
            (Some(s), _) => Some(s),
            (None, None) => Some(PathBuf::from(DEFAULT_STATES_FILE)),
            (None, Some(_)) => None,
        };

        let epoch = epoch.unwrap_or_else(|| DEFAULT_STATES_EPOCH.to_string());
        let mut all_si_modes = BTreeSet::new();
        let mut printer = Summary::info("Harvesting SI modes");
        if let Some(states) = states {
            let from_states = StateTable::new(&states).si_modes(&epoch)?;
            printer.push_block(vec![
                format!("Commanded states: {}", states.display()).into(),
                format!("{} SI modes since {epoch}", from_states.len()).into(),
            ]);
            all_si_modes.extend(from_states);
        }
        if let Some(si_modes) = si_modes {
            let listed = ModeList(si_modes.into_iter().map(SiMode::from).collect());
            let listed = listed.si_modes(&epoch)?;
            printer.push_line(format!("{} SI modes listed", listed.len()));
            all_si_modes.extend(listed);
        }

        let si_mode_dir = si_mode_dir.unwrap_or_else(|| PathBuf::from(DEFAULT_SI_MODE_DIR));
        let tool_command = tool_command.unwrap_or_else(|| DEFAULT_TOOL_COMMAND.to_string());
        printer.push_block(vec![
            format!("Captures: {}", si_mode_dir.display()).into(),
            format!("Tool: {tool_command}").into(),
        ]);
        printer.display();

        Ok(HarvestParams {
            si_modes: all_si_modes,
            si_mode_dir,
            tool_command,
        })
    }

    pub(super) fn run(self, dry_run: bool) -> Result<(), SiModesError> {
        debug!("Converting arguments into parameters");
        let params = self.parse()?;

        if !dry_run && !params.si_mode_dir.exists() {
            debug!("Creating {}", params.si_mode_dir.display());
            std::fs::create_dir_all(&params.si_mode_dir).map_err(|err| {
                HarvestArgsError::CreateDir {
                    path: params.si_mode_dir.clone(),
                    err,
                }
            })?;
        }

        let mut tool = ShellConfigTool::new(params.tool_command);
        let mut store = CaptureDir::new(&params.si_mode_dir);
        let report = harvest(params.si_modes, &mut tool, &mut store, dry_run)?;

        for (mode, outcome) in &report.outcomes {
            match outcome {
                HarvestOutcome::Failed {
                    status: Some(status),
                    num_lines,
                } => format!("{mode}: status={status}, {num_lines} lines of output").warn(),
                HarvestOutcome::Failed {
                    status: None,
                    num_lines,
                } => format!("{mode}: no exit status, {num_lines} lines of output").warn(),
                HarvestOutcome::Pending { command } => info!("Would run: {command}"),
                HarvestOutcome::Skipped(_) | HarvestOutcome::Captured { .. } => (),
            }
        }
        display_warnings();

        if dry_run {
            info!(
                "Dry run -- {} SI modes would be harvested, {} skipped",
                report.num_pending(),
                report.num_skipped()
            );
        } else {
            info!(
                "{} SI modes captured, {} failed, {} skipped",
                report.num_captured(),
                report.num_failed(),
                report.num_skipped()
            );
        }
        Ok(())
    }
}

#[derive(Error, Debug)]
pub(super) enum HarvestArgsError {
    #[error(transparent)]
    States(#[from] StateSourceError),

    #[error("Couldn't create the SI-mode directory {}: {err}", path.display())]
    CreateDir { path: PathBuf, err: std::io::Error },
}
