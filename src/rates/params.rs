// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Parameters of an SI mode, as read from a capture.
//!
//! Captures are the text output of the configuration tool. Only lines like
//!
//! ```text
//!   fepCcdSelect = 10 1 10 1
//! ```
//!
//! are of interest; everything else is ignored.

use std::borrow::Cow;

use regex::{Regex, RegexBuilder};

use super::RatesError;
use crate::{constants::FEP_CCD_UNSELECTED, SiModeFamily};

const FEP_CCD_SELECT: &str = "fepCcdSelect";
const PRIMARY_EXPOSURE: &str = "primaryExposure";
const SUBARRAY_START_ROW: &str = "subarrayStartRow";
const SUBARRAY_ROW_COUNT: &str = "subarrayRowCount";

lazy_static::lazy_static! {
    static ref KNOWN_PARAMS: [(&'static str, Regex); 4] = [
        FEP_CCD_SELECT,
        PRIMARY_EXPOSURE,
        SUBARRAY_START_ROW,
        SUBARRAY_ROW_COUNT,
    ]
    .map(|name| (name, param_regex(name).unwrap()));
}

/// Find the parameter `name` in `text`, which should be the entire output of
/// the configuration tool. The value is everything after the '=' on the first
/// matching line, with surrounding whitespace removed.
pub fn get_param(text: &str, name: &str) -> Result<String, RatesError> {
    let regex = match KNOWN_PARAMS.iter().find(|(n, _)| *n == name) {
        Some((_, r)) => Cow::Borrowed(r),
        None => Cow::Owned(param_regex(name)?),
    };
    regex
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .ok_or_else(|| RatesError::ParamNotFound {
            name: name.to_string(),
        })
}

fn param_regex(name: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(&format!(
        r"^[ \t]*{}[ \t]*=[ \t]*(.+)$",
        regex::escape(name)
    ))
    .multi_line(true)
    .build()
}

fn get_int_param(text: &str, name: &str) -> Result<i64, RatesError> {
    let value = get_param(text, name)?;
    value
        .parse()
        .map_err(|_| RatesError::BadInteger {
            name: name.to_string(),
            value,
        })
}

/// The number of CCDs selected by an `fepCcdSelect` value. Each FEP selects
/// one CCD, unless it's "10" (unused); the same CCD may be selected more than
/// once.
pub fn count_ccds(fep_ccd_select: &str) -> u32 {
    fep_ccd_select
        .split_whitespace()
        .filter(|&t| t != FEP_CCD_UNSELECTED)
        .count() as u32
}

/// The parameters needed to work out the transfer rates of an SI mode. All
/// fields are required.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SiModeParams {
    TimedExposure {
        fep_ccd_select: String,
        /// [ticks]
        primary_exposure: i64,
        subarray_start_row: i64,
        subarray_row_count: i64,
    },

    ContinuousClocking { fep_ccd_select: String },
}

impl SiModeParams {
    /// Read the parameters of an SI mode of `family` from captured text. A
    /// missing parameter is an error, as is a timed exposure of zero ticks.
    pub fn parse(family: SiModeFamily, text: &str) -> Result<SiModeParams, RatesError> {
        let fep_ccd_select = get_param(text, FEP_CCD_SELECT)?;
        Ok(match family {
            SiModeFamily::TimedExposure => {
                let primary_exposure = get_int_param(text, PRIMARY_EXPOSURE)?;
                if primary_exposure == 0 {
                    return Err(RatesError::ZeroExposure);
                }
                SiModeParams::TimedExposure {
                    fep_ccd_select,
                    primary_exposure,
                    subarray_start_row: get_int_param(text, SUBARRAY_START_ROW)?,
                    subarray_row_count: get_int_param(text, SUBARRAY_ROW_COUNT)?,
                }
            }
            SiModeFamily::ContinuousClocking => {
                SiModeParams::ContinuousClocking { fep_ccd_select }
            }
        })
    }

    pub fn fep_ccd_select(&self) -> &str {
        match self {
            SiModeParams::TimedExposure { fep_ccd_select, .. }
            | SiModeParams::ContinuousClocking { fep_ccd_select } => fep_ccd_select,
        }
    }

    pub fn num_ccds(&self) -> u32 {
        count_ccds(self.fep_ccd_select())
    }
}
