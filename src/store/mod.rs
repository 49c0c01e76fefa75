// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Storage of captured configuration-tool output, keyed by SI mode.
//!
//! Every SI mode is in one of three states: nothing has been captured, a
//! successful capture exists, or a failed capture exists. Captures are
//! write-once; there is no way to overwrite or remove one.


use std::{
    collections::HashMap,
    fs::OpenOptions,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use log::trace;
use thiserror::Error;

use crate::SiMode;

/// The state of an SI mode in a [`CaptureStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureState {
    Absent,
    Success,
    Failure,
}

/// A write-once store of captures.
pub trait CaptureStore {
    fn state(&self, mode: &SiMode) -> Result<CaptureState, CaptureStoreError>;

    /// Store `lines` for `mode`. `success` determines whether this is a
    /// successful or failed capture. Existing captures are never replaced;
    /// attempting to do so is an error.
    fn write(
        &mut self,
        mode: &SiMode,
        success: bool,
        lines: &[Vec<u8>],
    ) -> Result<(), CaptureStoreError>;
}

/// Captures as files in a directory. A successful capture of "TE_00A4" is
/// stored as "<dir>/TE_00A4", and a failed one as "<dir>/FAIL_TE_00A4".
#[derive(Debug, Clone)]
pub struct CaptureDir {
    dir: PathBuf,
}

impl CaptureDir {
    pub fn new<P: AsRef<Path>>(dir: P) -> CaptureDir {
        CaptureDir {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self, mode: &SiMode, success: bool) -> PathBuf {
        self.dir.join(mode.capture_name(success))
    }
}

impl CaptureStore for CaptureDir {
    fn state(&self, mode: &SiMode) -> Result<CaptureState, CaptureStoreError> {
        if self.path(mode, true).exists() {
            Ok(CaptureState::Success)
        } else if self.path(mode, false).exists() {
            Ok(CaptureState::Failure)
        } else {
            Ok(CaptureState::Absent)
        }
    }

    fn write(
        &mut self,
        mode: &SiMode,
        success: bool,
        lines: &[Vec<u8>],
    ) -> Result<(), CaptureStoreError> {
        let path = self.path(mode, success);
        trace!("Writing {} lines to {}", lines.len(), path.display());
        let f = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|err| match err.kind() {
                std::io::ErrorKind::AlreadyExists => CaptureStoreError::AlreadyCaptured {
                    mode: mode.clone(),
                },
                _ => CaptureStoreError::Write {
                    path: path.clone(),
                    err,
                },
            })?;
        let mut f = BufWriter::new(f);
        for line in lines {
            f.write_all(line)
                .map_err(|err| CaptureStoreError::Write {
                    path: path.clone(),
                    err,
                })?;
        }
        f.flush().map_err(|err| CaptureStoreError::Write { path, err })?;
        Ok(())
    }
}

/// Captures held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    captures: HashMap<SiMode, (bool, Vec<Vec<u8>>)>,
}

impl MemoryStore {
    pub fn new() -> MemoryStore {
        MemoryStore::default()
    }

    /// Get the captured lines of `mode`, along with whether the capture was
    /// successful.
    pub fn get(&self, mode: &SiMode) -> Option<(bool, &[Vec<u8>])> {
        self.captures
            .get(mode)
            .map(|(success, lines)| (*success, lines.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.captures.is_empty()
    }
}

impl CaptureStore for MemoryStore {
    fn state(&self, mode: &SiMode) -> Result<CaptureState, CaptureStoreError> {
        Ok(match self.captures.get(mode) {
            None => CaptureState::Absent,
            Some((true, _)) => CaptureState::Success,
            Some((false, _)) => CaptureState::Failure,
        })
    }

    fn write(
        &mut self,
        mode: &SiMode,
        success: bool,
        lines: &[Vec<u8>],
    ) -> Result<(), CaptureStoreError> {
        if self.captures.contains_key(mode) {
            return Err(CaptureStoreError::AlreadyCaptured { mode: mode.clone() });
        }
        self.captures
            .insert(mode.clone(), (success, lines.to_vec()));
        Ok(())
    }
}

#[derive(Error, Debug)]
pub enum CaptureStoreError {
    #[error("SI mode {mode} has already been captured")]
    AlreadyCaptured { mode: SiMode },

    #[error("Couldn't write capture {}: {err}", path.display())]
    Write { path: PathBuf, err: std::io::Error },
}
