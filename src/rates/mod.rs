// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Calculate the rate of parallel and serial transfers for all captured SI
//! modes.
//!
//! For a timed-exposure mode, every exposure moves the frame into the
//! framestore (1026 rows, plus the subarray start and row count), and every
//! subarray row is serially clocked out, once per CCD:
//!
//! ```text
//! par_xfers_per_sec = (1026 + start_row + row_count) / exposure_sec * n_ccd
//! ser_xfers_per_sec = row_count / exposure_sec * n_ccd
//! ```
//!
//! Continuous-clocking modes have no exposure; each CCD clocks 701.75 rows
//! per second, and the serial clock runs with a period of 2.85 ms regardless
//! of how many CCDs are in use.

mod params;

pub use params::{count_ccds, get_param, SiModeParams};

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use log::{debug, info, warn};
use thiserror::Error;

use crate::{
    constants::*,
    io::{get_all_matches_in_dir, GlobError},
    SiMode, SiModeFamily,
};

/// The transfer rates of a single SI mode. This is a row of the rates table.
#[derive(Debug, Clone, PartialEq)]
pub struct RateRecord {
    pub si_mode: SiMode,
    pub n_ccd: u32,
    /// [ticks]. Continuous-clocking modes report -99.
    pub primary_exposure: i64,
    pub start_row: i64,
    pub row_count: i64,
    pub par_xfers_per_sec: f64,
    pub ser_xfers_per_sec: f64,
}

impl RateRecord {
    pub fn new(si_mode: SiMode, params: &SiModeParams) -> RateRecord {
        let n_ccd = params.num_ccds();
        match *params {
            SiModeParams::TimedExposure {
                primary_exposure,
                subarray_start_row,
                subarray_row_count,
                ..
            } => {
                let prim_exp_sec = primary_exposure as f64 / TICKS_PER_SEC;
                let par_xfers = FRAME_TRANSFER_ROWS + subarray_start_row + subarray_row_count;
                RateRecord {
                    si_mode,
                    n_ccd,
                    primary_exposure,
                    start_row: subarray_start_row,
                    row_count: subarray_row_count,
                    par_xfers_per_sec: par_xfers as f64 / prim_exp_sec * n_ccd as f64,
                    ser_xfers_per_sec: subarray_row_count as f64 / prim_exp_sec * n_ccd as f64,
                }
            }

            SiModeParams::ContinuousClocking { .. } => RateRecord {
                si_mode,
                n_ccd,
                primary_exposure: CC_PRIMARY_EXPOSURE_SENTINEL,
                start_row: 0,
                row_count: FULL_FRAME_ROW_COUNT,
                par_xfers_per_sec: CC_PAR_XFERS_PER_SEC_PER_CCD * n_ccd as f64,
                ser_xfers_per_sec: 1.0 / CC_SERIAL_CLOCK_PERIOD,
            },
        }
    }

    /// Read the parameters of `si_mode` from its captured text and work out
    /// the rates.
    pub fn from_capture(si_mode: SiMode, text: &str) -> Result<RateRecord, RatesError> {
        let params =
            SiModeParams::parse(si_mode.family(), text).map_err(|e| e.for_mode(&si_mode))?;
        Ok(RateRecord::new(si_mode, &params))
    }

    /// Read a capture file. The SI mode is the file name.
    pub fn from_file(path: &Path) -> Result<RateRecord, RatesError> {
        let si_mode = path
            .file_name()
            .and_then(|f| f.to_str())
            .map(SiMode::new)
            .ok_or_else(|| RatesError::BadFilename(path.to_path_buf()))?;
        let text = std::fs::read_to_string(path).map_err(|err| RatesError::Read {
            path: path.to_path_buf(),
            err,
        })?;
        RateRecord::from_capture(si_mode, &text)
    }

    /// The fixed-width row of the rates table, including the newline.
    pub fn to_row(&self) -> String {
        format!(
            "{:<9} {:>2} {:>3} {:>5} {:>5} {:>6.0} {:>6.0}\n",
            self.si_mode.as_str(),
            self.n_ccd,
            self.primary_exposure,
            self.start_row,
            self.row_count,
            self.par_xfers_per_sec,
            self.ser_xfers_per_sec
        )
    }
}

/// What to do when a capture can't be turned into a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BadCapturePolicy {
    /// Stop, returning the error. Rows already written are kept.
    #[default]
    Abort,

    /// Log the problem, leave the row out and carry on.
    Skip,
}

/// The result of [`write_rates`].
#[derive(Debug, Default)]
pub struct RatesSummary {
    pub num_rows: usize,
    /// Captures that were left out (only with [`BadCapturePolicy::Skip`]).
    pub skipped: Vec<(PathBuf, RatesError)>,
}

/// Get the capture files in `dir` in table order: all timed-exposure captures
/// followed by all continuous-clocking captures. Failed captures are not
/// included.
pub fn capture_files(dir: &Path) -> Result<Vec<PathBuf>, RatesError> {
    let mut files = get_all_matches_in_dir(dir, &SiModeFamily::TimedExposure.capture_glob())?;
    files.extend(get_all_matches_in_dir(
        dir,
        &SiModeFamily::ContinuousClocking.capture_glob(),
    )?);
    Ok(files)
}

/// Write a row to `out` for every capture in `capture_files`, in order.
pub fn write_rates<W: Write>(
    capture_files: &[PathBuf],
    out: &mut W,
    policy: BadCapturePolicy,
) -> Result<RatesSummary, RatesError> {
    let mut summary = RatesSummary::default();
    for file in capture_files {
        debug!("Reading {}", file.display());
        match RateRecord::from_file(file) {
            Ok(record) => {
                out.write_all(record.to_row().as_bytes())?;
                summary.num_rows += 1;
            }
            Err(e) => match policy {
                BadCapturePolicy::Abort => {
                    out.flush()?;
                    return Err(e);
                }
                BadCapturePolicy::Skip => {
                    warn!("Skipping {}: {e}", file.display());
                    summary.skipped.push((file.clone(), e));
                }
            },
        }
    }
    out.flush()?;
    Ok(summary)
}

/// Calculate the transfer rates of all captures in `si_mode_dir`, and write
/// them to `outfile`. `outfile` is overwritten.
pub fn calculate_rates(
    si_mode_dir: &Path,
    outfile: &Path,
    policy: BadCapturePolicy,
) -> Result<RatesSummary, RatesError> {
    let files = capture_files(si_mode_dir)?;
    debug!(
        "Found {} SI-mode captures in {}",
        files.len(),
        si_mode_dir.display()
    );
    let f = File::create(outfile).map_err(|err| RatesError::Write {
        path: outfile.to_path_buf(),
        err,
    })?;
    let mut out = BufWriter::new(f);
    let summary = write_rates(&files, &mut out, policy)?;
    info!(
        "Wrote {} SI-mode rates to {}",
        summary.num_rows,
        outfile.display()
    );
    Ok(summary)
}

#[derive(Error, Debug)]
pub enum RatesError {
    #[error("{name} not found")]
    ParamNotFound { name: String },

    #[error("{name} is not an integer: '{value}'")]
    BadInteger { name: String, value: String },

    #[error("primaryExposure is zero; transfer rates can't be calculated")]
    ZeroExposure,

    #[error("SI mode {mode}: {err}")]
    InMode {
        mode: SiMode,
        err: Box<RatesError>,
    },

    #[error("Capture file name isn't a valid SI mode: {}", .0.display())]
    BadFilename(PathBuf),

    #[error("Couldn't read capture {}: {err}", path.display())]
    Read { path: PathBuf, err: std::io::Error },

    #[error("Couldn't create {}: {err}", path.display())]
    Write { path: PathBuf, err: std::io::Error },

    #[error(transparent)]
    Glob(#[from] GlobError),

    #[error(transparent)]
    Regex(#[from] regex::Error),

    #[error(transparent)]
    IO(#[from] std::io::Error),
}

impl RatesError {
    fn for_mode(self, mode: &SiMode) -> RatesError {
        RatesError::InMode {
            mode: mode.clone(),
            err: Box::new(self),
        }
    }
}
