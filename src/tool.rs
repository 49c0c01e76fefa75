// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The external configuration tool.
//!
//! Given an (evenified) SI mode, the tool prints the SI-mode configuration as
//! lines of "name = value" text. The harvester doesn't care what the tool is,
//! only that it produces lines and an exit status.

use std::process::Command;

use log::trace;

use crate::constants::{DEFAULT_TOOL_COMMAND, TOOL_COMMAND_PLACEHOLDER};

/// The result of running the configuration tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    /// Each line of standard output as raw bytes, with its line ending.
    pub lines: Vec<Vec<u8>>,

    /// The exit code. This is `None` if the tool was killed by a signal.
    pub status: Option<i32>,
}

impl ToolOutput {
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }
}

/// Something that can generate the configuration of an SI mode.
pub trait ConfigTool {
    /// Run the tool for the (already evenified) `si_mode`.
    fn run(&mut self, si_mode: &str) -> std::io::Result<ToolOutput>;

    /// A human-readable description of what would be run for `si_mode`.
    fn describe(&self, si_mode: &str) -> String;
}

/// Run a command template through `sh -c`. Every occurrence of "{si_mode}" in
/// the template is replaced with the SI mode.
#[derive(Debug, Clone)]
pub struct ShellConfigTool {
    template: String,
}

impl ShellConfigTool {
    pub fn new<S: Into<String>>(template: S) -> ShellConfigTool {
        ShellConfigTool {
            template: template.into(),
        }
    }

    pub fn command(&self, si_mode: &str) -> String {
        self.template.replace(TOOL_COMMAND_PLACEHOLDER, si_mode)
    }
}

impl Default for ShellConfigTool {
    fn default() -> Self {
        ShellConfigTool::new(DEFAULT_TOOL_COMMAND)
    }
}

impl ConfigTool for ShellConfigTool {
    fn run(&mut self, si_mode: &str) -> std::io::Result<ToolOutput> {
        let cmd = self.command(si_mode);
        trace!("Running: {cmd}");
        // stderr is inherited so that tool diagnostics reach the terminal.
        let output = Command::new("sh")
            .arg("-c")
            .arg(&cmd)
            .stderr(std::process::Stdio::inherit())
            .output()?;
        Ok(ToolOutput {
            lines: output
                .stdout
                .split_inclusive(|&b| b == b'\n')
                .map(|l| l.to_vec())
                .collect(),
            status: output.status.code(),
        })
    }

    fn describe(&self, si_mode: &str) -> String {
        self.command(si_mode)
    }
}
