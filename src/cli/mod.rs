// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The `si-modes` command line: global options, the `harvest` and `rates`
//! subcommands, and logging.
//!
//! Every subcommand argument is optional (booleans default to false) so that
//! the same struct can be read from an arguments file.

#[macro_use]
mod common;
mod error;
mod harvest;
mod rates;

pub use error::SiModesError;

use std::{
    borrow::Cow,
    path::{Path, PathBuf},
};

use clap::{Args, Parser, Subcommand};
use log::{debug, info, LevelFilter};

use common::Summary;

// Add build-time information from the "built" crate.
include!(concat!(env!("OUT_DIR"), "/built.rs"));

#[derive(Debug, Parser)]
#[clap(
    version,
    about = "Harvest ACIS SI-mode configurations and tabulate their CCD transfer rates"
)]
#[clap(disable_help_subcommand = true)]
#[clap(infer_subcommands = true)]
#[clap(propagate_version = true)]
#[clap(infer_long_args = true)]
pub struct SiModes {
    #[clap(flatten)]
    global_opts: GlobalArgs,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Debug, Args)]
struct GlobalArgs {
    /// The verbosity of the program. Increase by specifying multiple times
    /// (e.g. -vv). The default is to print only high-level information.
    #[clap(short, long, parse(from_occurrences))]
    #[clap(global = true)]
    verbosity: u8,

    /// Only verify that arguments were correctly ingested and print out what
    /// would be done.
    #[clap(long)]
    #[clap(global = true)]
    dry_run: bool,

    /// Save the input arguments into a new TOML file that can be used to
    /// reproduce this run.
    #[clap(long)]
    #[clap(global = true)]
    save_toml: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
#[clap(arg_required_else_help = true)]
enum Command {
    #[clap(about = r#"Run the configuration tool for every SI mode without a capture, and store its output.
Failed runs are stored as "FAIL_<SI mode>"."#)]
    Harvest(harvest::HarvestArgs),

    #[clap(about = "Calculate the parallel and serial transfer rates of every captured SI mode.")]
    Rates(rates::RatesArgs),
}

impl SiModes {
    pub fn run(self) -> Result<(), SiModesError> {
        let GlobalArgs {
            verbosity,
            dry_run,
            save_toml,
        } = self.global_opts;
        setup_logging(verbosity)?;

        let sub_command = match &self.command {
            Command::Harvest(_) => "harvest",
            Command::Rates(_) => "rates",
        };
        display_build_info(sub_command);

        match self.command {
            Command::Harvest(args) => {
                let args = args.merge()?;
                write_toml(save_toml.as_deref(), &args)?;
                args.run(dry_run)?;
            }
            Command::Rates(args) => {
                let args = args.merge()?;
                write_toml(save_toml.as_deref(), &args)?;
                args.run(dry_run)?;
            }
        }

        info!("si-modes {sub_command} complete.");
        Ok(())
    }
}

/// Write merged arguments to `path` (if given), so the run can be repeated by
/// passing the file as the arguments file.
fn write_toml<T: serde::Serialize>(path: Option<&Path>, args: &T) -> Result<(), SiModesError> {
    if let Some(path) = path {
        debug!("Saving arguments to {}", path.display());
        std::fs::write(path, toml::to_string(args)?)?;
    }
    Ok(())
}

fn level_filter(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Log to stdout. `RUST_LOG` is read first, but the verbosity sets the
/// overall level. From -vvv, messages carry their source location.
fn setup_logging(verbosity: u8) -> Result<(), log::SetLoggerError> {
    let mut builder = env_logger::Builder::from_default_env();
    builder
        .target(env_logger::Target::Stdout)
        .format_target(false)
        .filter_level(level_filter(verbosity));
    if verbosity >= 3 {
        builder.format(|buf, record| {
            use std::io::Write;

            writeln!(
                buf,
                "[{} {} {}:{}] {}",
                buf.timestamp(),
                record.level(),
                record.target(),
                record.line().unwrap_or(0),
                record.args()
            )
        });
    }
    builder.try_init()
}

/// Log the version of this executable and how it was compiled.
fn display_build_info(sub_command: &str) {
    let mut summary = Summary::info(format!(
        "si-modes {sub_command} {}",
        env!("CARGO_PKG_VERSION")
    ));
    let commit = match (GIT_COMMIT_HASH_SHORT, GIT_DIRTY) {
        (Some(hash), Some(true)) => format!("git commit {hash} (dirty)"),
        (Some(hash), _) => format!("git commit {hash}"),
        (None, _) => "no git info".to_string(),
    };
    let mut block: Vec<Cow<'static, str>> = vec![commit.into()];
    if let Some(head) = GIT_HEAD_REF {
        block.push(format!("head ref {head}").into());
    }
    summary.push_block(block);
    summary.push_line(format!("built {BUILT_TIME_UTC} with {RUSTC_VERSION}"));
    summary.display();
}
