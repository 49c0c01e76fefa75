// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Sources of SI modes.
//!
//! The harvester only needs the set of distinct SI modes that have been
//! commanded since some epoch. These normally come from a commanded-states
//! table, e.g.
//!
//! ```text
//! datestart              datestop               si_mode  pitch
//! 2000:001:00:00:00.000  2000:001:12:00:00.000  TE_00A4  90.0
//! 2000:001:12:00:00.000  2000:002:00:00:00.000  CC_003E  110.0
//! ```
//!
//! Columns may be separated by whitespace or '|' (RDB-ish dumps). Lines
//! starting with '#' are ignored, as is an RDB column-type line (e.g. "S S S
//! N").


use std::{
    collections::BTreeSet,
    fs::File,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
};

use log::{debug, trace};
use thiserror::Error;

use crate::SiMode;

/// Something that can supply the distinct SI modes commanded since an epoch.
pub trait StateSource {
    /// Get the distinct SI modes commanded at or after `epoch`. `epoch` is a
    /// Chandra date string, e.g. "2000:001" or "2012:237:12:00:00.000".
    fn si_modes(&self, epoch: &str) -> Result<BTreeSet<SiMode>, StateSourceError>;
}

/// A fixed list of SI modes. The epoch is ignored.
#[derive(Debug, Clone, Default)]
pub struct ModeList(pub Vec<SiMode>);

impl StateSource for ModeList {
    fn si_modes(&self, _epoch: &str) -> Result<BTreeSet<SiMode>, StateSourceError> {
        Ok(self.0.iter().cloned().collect())
    }
}

/// A commanded-states table on disk.
#[derive(Debug, Clone)]
pub struct StateTable {
    path: PathBuf,
}

impl StateTable {
    pub fn new<P: AsRef<Path>>(path: P) -> StateTable {
        StateTable {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl StateSource for StateTable {
    fn si_modes(&self, epoch: &str) -> Result<BTreeSet<SiMode>, StateSourceError> {
        debug!("Reading commanded states from {}", self.path.display());
        let f = File::open(&self.path).map_err(|e| StateSourceError::Open {
            path: self.path.clone(),
            err: e,
        })?;
        parse_state_table(BufReader::new(f), epoch)
    }
}

fn split_columns(line: &str) -> Vec<&str> {
    line.split(|c: char| c == '|' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Parse a commanded-states table, returning the distinct SI modes of states
/// that start at or after `epoch`.
///
/// Chandra dates ("YYYY:DOY:hh:mm:ss.sss") are zero padded, so comparing them
/// as strings is the same as comparing them as times. A truncated epoch (e.g.
/// "2000:001") sorts before every time within that day.
pub(crate) fn parse_state_table<R: BufRead>(
    reader: R,
    epoch: &str,
) -> Result<BTreeSet<SiMode>, StateSourceError> {
    let mut lines = reader
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l))
        .filter(|(_, l)| match l {
            Ok(l) => !l.trim().is_empty() && !l.trim_start().starts_with('#'),
            Err(_) => true,
        });

    let header = match lines.next() {
        Some((_, l)) => l?,
        None => return Err(StateSourceError::Empty),
    };
    let columns = split_columns(&header);
    let find = |name: &'static str| {
        columns
            .iter()
            .position(|c| *c == name)
            .ok_or(StateSourceError::MissingColumn { name })
    };
    let i_datestart = find("datestart")?;
    let i_si_mode = find("si_mode")?;
    let num_columns = columns.len();
    trace!("State table columns: {columns:?}");

    let mut si_modes = BTreeSet::new();
    let mut first_row = true;
    for (line_num, line) in lines {
        let line = line?;
        let row = split_columns(&line);
        // RDB files follow the header with a line of column types.
        if first_row && row.len() == num_columns && row.iter().all(|t| is_rdb_type(t)) {
            first_row = false;
            continue;
        }
        first_row = false;

        if row.len() != num_columns {
            return Err(StateSourceError::BadRow {
                line_num,
                expected: num_columns,
                got: row.len(),
            });
        }
        if row[i_datestart] < epoch {
            continue;
        }
        si_modes.insert(SiMode::new(row[i_si_mode]));
    }

    debug!("Found {} distinct SI modes since {epoch}", si_modes.len());
    Ok(si_modes)
}

// RDB column definitions are a number (width) followed by S (string), N
// (numeric) or M (month); the width is optional.
fn is_rdb_type(token: &str) -> bool {
    let kind = token.trim_start_matches(|c: char| c.is_ascii_digit());
    matches!(kind, "S" | "N" | "M")
}

#[derive(Error, Debug)]
pub enum StateSourceError {
    #[error("Couldn't open commanded-states table {}: {err}", path.display())]
    Open { path: PathBuf, err: std::io::Error },

    #[error("The commanded-states table is empty")]
    Empty,

    #[error("The commanded-states table has no '{name}' column")]
    MissingColumn { name: &'static str },

    #[error("Line {line_num} of the commanded-states table has {got} columns; expected {expected}")]
    BadRow {
        line_num: usize,
        expected: usize,
        got: usize,
    },

    #[error(transparent)]
    IO(#[from] std::io::Error),
}
