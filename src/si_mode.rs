// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! SI-mode identifiers.
//!
//! An SI mode (e.g. "TE_00A4" or "CC_003E") names a configuration of ACIS
//! readout behaviour. The prefix gives the mode family; timed-exposure modes
//! start with "TE" and everything else is treated as continuous clocking.

use serde::{Deserialize, Serialize};
use strum_macros::Display;

use crate::constants::FAIL_PREFIX;

/// An SI-mode identifier. This is used unmodified as the key of a capture;
/// see [`evenify`] for the form given to the configuration tool.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SiMode(String);

impl SiMode {
    pub fn new<S: Into<String>>(s: S) -> SiMode {
        SiMode(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn family(&self) -> SiModeFamily {
        SiModeFamily::from_mode(&self.0)
    }

    /// The name given to the configuration tool.
    pub fn evenified(&self) -> String {
        evenify(&self.0)
    }

    /// The name of a capture for this mode, depending on whether the capture
    /// succeeded.
    pub fn capture_name(&self, success: bool) -> String {
        if success {
            self.0.clone()
        } else {
            format!("{FAIL_PREFIX}{}", self.0)
        }
    }
}

impl std::fmt::Display for SiMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SiMode {
    fn from(s: &str) -> Self {
        SiMode::new(s)
    }
}

impl From<String> for SiMode {
    fn from(s: String) -> Self {
        SiMode(s)
    }
}

impl AsRef<str> for SiMode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// The family of an SI mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum SiModeFamily {
    /// Timed exposure. Frames are exposed for a fixed number of ticks and then
    /// transferred.
    #[strum(serialize = "TE")]
    TimedExposure,

    /// Continuous clocking. Rows are clocked out continuously; there is no
    /// discrete exposure.
    #[strum(serialize = "CC")]
    ContinuousClocking,
}

impl SiModeFamily {
    /// Only modes starting with "TE" are timed exposures; anything else is
    /// treated as continuous clocking.
    pub fn from_mode(mode: &str) -> SiModeFamily {
        if mode.starts_with("TE") {
            SiModeFamily::TimedExposure
        } else {
            SiModeFamily::ContinuousClocking
        }
    }

    /// The glob (relative to a capture directory) matching captures of this
    /// family.
    pub fn capture_glob(self) -> String {
        format!("{self}_*")
    }
}

/// Make `si_mode` end in an even hex digit. Odd digits ("13579BDF") are
/// replaced by the digit one lower; any other last character (including
/// lowercase hex) is left alone.
///
/// # Examples
///
/// ```
/// # use si_modes::evenify;
/// assert_eq!(evenify("TE_00A5"), "TE_00A4");
/// assert_eq!(evenify("CC_003F"), "CC_003E");
/// assert_eq!(evenify("CC_003E"), "CC_003E");
/// ```
pub fn evenify(si_mode: &str) -> String {
    let mut chars = si_mode.chars();
    let last = match chars.next_back() {
        Some(c) => c,
        None => return String::new(),
    };
    let even = match last {
        '1' => '0',
        '3' => '2',
        '5' => '4',
        '7' => '6',
        '9' => '8',
        'B' => 'A',
        'D' => 'C',
        'F' => 'E',
        c => c,
    };
    let mut out = String::with_capacity(si_mode.len());
    out.push_str(chars.as_str());
    out.push(even);
    out
}
