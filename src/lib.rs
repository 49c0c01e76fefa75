// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Harvest instrument SI-mode configurations from an external configuration
//! tool, and tabulate the parallel and serial CCD transfer rates implied by
//! each mode.
//!
//! The two halves of this crate only communicate through the filesystem: the
//! harvester writes one capture file per SI mode, and the rate calculator
//! reads all of the capture files back and writes one fixed-width row per
//! mode.

pub mod cli;
pub mod constants;
pub mod harvest;
mod io;
pub mod rates;
pub mod si_mode;
pub mod states;
pub mod store;
pub mod tool;

// Re-exports.
pub use cli::{SiModes, SiModesError};
pub use si_mode::{evenify, SiMode, SiModeFamily};
