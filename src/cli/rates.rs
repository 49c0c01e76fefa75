// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Calculate the rate of parallel and serial transfers for all harvested SI
//! modes, and write them to a fixed-width table.

use std::{borrow::Cow, path::PathBuf};

use clap::Parser;
use log::{debug, info, trace};
use serde::{Deserialize, Serialize};

use super::common::{display_warnings, Summary, Warn, ARG_FILE_HELP};
use crate::{
    constants::{DEFAULT_RATES_FILE, DEFAULT_SI_MODE_DIR},
    rates::{calculate_rates, capture_files, BadCapturePolicy},
    SiModesError,
};

lazy_static::lazy_static! {
    static ref SI_MODE_DIR_HELP: String =
        format!("The directory of SI-mode captures. Default: {DEFAULT_SI_MODE_DIR}");

    static ref OUTPUT_HELP: String =
        format!("The file to write the rates table to. It is overwritten. Default: {DEFAULT_RATES_FILE}");
}

#[derive(Parser, Debug, Clone, Default, Serialize, Deserialize)]
pub(super) struct RatesArgs {
    #[clap(name = "ARGUMENTS_FILE", help = ARG_FILE_HELP.as_str(), parse(from_os_str))]
    #[serde(skip)]
    pub(super) args_file: Option<PathBuf>,

    #[clap(long, parse(from_os_str), help = SI_MODE_DIR_HELP.as_str())]
    pub(super) si_mode_dir: Option<PathBuf>,

    #[clap(short, long, parse(from_os_str), help = OUTPUT_HELP.as_str(), help_heading = "OUTPUT FILES")]
    pub(super) output: Option<PathBuf>,

    /// Leave captures that are missing parameters out of the table, rather
    /// than stopping at the first one.
    #[clap(long)]
    #[serde(default)]
    pub(super) skip_bad: bool,
}

impl RatesArgs {
    /// Consolidate the command-line arguments with those in the argument file
    /// (if any), preferring the command-line arguments.
    pub(super) fn merge(self) -> Result<RatesArgs, SiModesError> {
        debug!("Merging command-line arguments with the argument file");

        let cli_args = self;

        if let Some(arg_file) = cli_args.args_file {
            let RatesArgs {
                args_file: _,
                si_mode_dir,
                output,
                skip_bad,
            } = unpack_arg_file!(arg_file);

            Ok(RatesArgs {
                args_file: None,
                si_mode_dir: cli_args.si_mode_dir.or(si_mode_dir),
                output: cli_args.output.or(output),
                skip_bad: cli_args.skip_bad || skip_bad,
            })
        } else {
            Ok(cli_args)
        }
    }

    pub(super) fn run(self, dry_run: bool) -> Result<(), SiModesError> {
        trace!("{:#?}", self);

        let RatesArgs {
            args_file: _,
            si_mode_dir,
            output,
            skip_bad,
        } = self;
        let si_mode_dir = si_mode_dir.unwrap_or_else(|| PathBuf::from(DEFAULT_SI_MODE_DIR));
        let output = output.unwrap_or_else(|| PathBuf::from(DEFAULT_RATES_FILE));
        let policy = if skip_bad {
            BadCapturePolicy::Skip
        } else {
            BadCapturePolicy::Abort
        };

        let mut printer = Summary::info("Calculating SI-mode transfer rates");
        printer.push_line(format!("Captures: {}", si_mode_dir.display()));
        printer.push_line(format!("Output: {}", output.display()));
        if skip_bad {
            printer.push_line("Bad captures are skipped");
        }
        printer.display();

        if dry_run {
            let files = capture_files(&si_mode_dir)?;
            for f in &files {
                debug!("Would read {}", f.display());
            }
            info!("Dry run -- {} captures would be tabulated", files.len());
            return Ok(());
        }

        let summary = calculate_rates(&si_mode_dir, &output, policy)?;
        if !summary.skipped.is_empty() {
            let mut block: Vec<Cow<'static, str>> = vec![format!(
                "{} captures were left out of the table:",
                summary.skipped.len()
            )
            .into()];
            block.extend(
                summary
                    .skipped
                    .iter()
                    .map(|(path, e)| Cow::from(format!("  {}: {e}", path.display()))),
            );
            block.warn();
        }
        display_warnings();
        Ok(())
    }
}
