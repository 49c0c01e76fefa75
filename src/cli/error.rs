// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Error type for all si-modes-related errors. This should be the *only* error
//! enum that is publicly visible from the command line.

use thiserror::Error;

use super::harvest::HarvestArgsError;
use crate::{
    harvest::HarvestError,
    rates::RatesError,
    states::StateSourceError,
    store::CaptureStoreError,
};

/// The *only* publicly visible error from the `si-modes` binary.
#[derive(Error, Debug)]
pub enum SiModesError {
    /// An error related to harvesting SI-mode configurations.
    #[error("{0}\n\nCaptures live in the SI-mode directory (--si-mode-dir); failed captures are prefixed with \"FAIL_\"")]
    Harvest(String),

    /// An error related to getting the SI modes to harvest.
    #[error("{0}\n\nSI modes are read from a commanded-states table (--states) and/or listed with --si-modes")]
    States(String),

    /// An error related to capture files.
    #[error("{0}\n\nCaptures live in the SI-mode directory (--si-mode-dir); failed captures are prefixed with \"FAIL_\"")]
    Capture(String),

    /// An error related to calculating transfer rates.
    #[error("{0}\n\nUse --skip-bad to leave bad captures out of the table")]
    Rates(String),

    /// An error related to argument files.
    #[error("{0}")]
    ArgFile(String),

    /// A generic error that can't be clarified further, e.g. IO errors.
    #[error("{0}")]
    Generic(String),
}

// When changing the error propagation below, ensure `Self::from(e)` uses the
// correct `e`!

impl From<HarvestArgsError> for SiModesError {
    fn from(e: HarvestArgsError) -> Self {
        let s = e.to_string();
        match e {
            HarvestArgsError::States(e) => Self::from(e),
            HarvestArgsError::CreateDir { .. } => Self::Capture(s),
        }
    }
}

impl From<HarvestError> for SiModesError {
    fn from(e: HarvestError) -> Self {
        Self::Harvest(e.to_string())
    }
}

impl From<CaptureStoreError> for SiModesError {
    fn from(e: CaptureStoreError) -> Self {
        Self::Capture(e.to_string())
    }
}

impl From<StateSourceError> for SiModesError {
    fn from(e: StateSourceError) -> Self {
        Self::States(e.to_string())
    }
}

impl From<RatesError> for SiModesError {
    fn from(e: RatesError) -> Self {
        let s = e.to_string();
        match e {
            RatesError::ParamNotFound { .. }
            | RatesError::BadInteger { .. }
            | RatesError::ZeroExposure
            | RatesError::InMode { .. }
            | RatesError::BadFilename(_)
            | RatesError::Read { .. } => Self::Rates(s),
            RatesError::Write { .. }
            | RatesError::Glob(_)
            | RatesError::Regex(_)
            | RatesError::IO(_) => Self::Generic(s),
        }
    }
}

impl From<std::io::Error> for SiModesError {
    fn from(e: std::io::Error) -> Self {
        Self::Generic(e.to_string())
    }
}

impl From<log::SetLoggerError> for SiModesError {
    fn from(e: log::SetLoggerError) -> Self {
        Self::Generic(format!("Failed to initialise logging: {e}"))
    }
}

impl From<toml::ser::Error> for SiModesError {
    fn from(e: toml::ser::Error) -> Self {
        Self::ArgFile(format!("Couldn't serialise arguments to toml: {e}"))
    }
}
