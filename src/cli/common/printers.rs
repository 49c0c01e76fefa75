// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Tree-style summaries, printed through the logger.
//!
//! ```text
//! Harvesting SI modes
//! ├ Commanded states: cmd_states.dat
//! │ 112 SI modes since 2000:001
//! ├ Captures: si_modes
//! │ Tool: ratcfg {si_mode} | lcmd -r -v
//! ```

use std::{borrow::Cow, sync::Mutex};

use log::Level;

lazy_static::lazy_static! {
    static ref WARNINGS: Mutex<Summary> = Mutex::new(Summary::new(Level::Warn, "Warnings"));
}

/// A titled list of blocks of lines. The first line of each block is a
/// branch of the tree.
pub(crate) struct Summary {
    level: Level,
    title: Cow<'static, str>,
    blocks: Vec<Vec<Cow<'static, str>>>,
}

impl Summary {
    fn new<T: Into<Cow<'static, str>>>(level: Level, title: T) -> Summary {
        Summary {
            level,
            title: title.into(),
            blocks: vec![],
        }
    }

    /// A summary of the parameters of a run.
    pub(crate) fn info<T: Into<Cow<'static, str>>>(title: T) -> Summary {
        Summary::new(Level::Info, title)
    }

    pub(crate) fn push_line<L: Into<Cow<'static, str>>>(&mut self, line: L) {
        self.blocks.push(vec![line.into()]);
    }

    pub(crate) fn push_block(&mut self, block: Vec<Cow<'static, str>>) {
        if !block.is_empty() {
            self.blocks.push(block);
        }
    }

    /// Log everything collected so far, then forget it. Nothing is logged if
    /// nothing was collected.
    pub(crate) fn display(&mut self) {
        if self.blocks.is_empty() {
            return;
        }

        log::log!(self.level, "{}", console::style(&self.title).bold());
        let last_block = self.blocks.len() - 1;
        for (i_block, block) in self.blocks.drain(..).enumerate() {
            let closes_tree = i_block == last_block && block.len() == 1;
            for (i_line, line) in block.into_iter().enumerate() {
                let symbol = match (i_line, closes_tree) {
                    (0, true) => '└',
                    (0, false) => '├',
                    _ => '│',
                };
                log::log!(self.level, "{symbol} {line}");
            }
        }
        log::log!(self.level, "");
    }
}

fn warnings() -> std::sync::MutexGuard<'static, Summary> {
    // The lines of a poisoned summary are still fine to print.
    WARNINGS
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Collect a warning, to be printed later by [`display_warnings`].
pub(crate) trait Warn {
    fn warn(self);
}

impl Warn for String {
    fn warn(self) {
        warnings().push_line(self);
    }
}

impl Warn for Vec<Cow<'static, str>> {
    fn warn(self) {
        warnings().push_block(self);
    }
}

/// Print out any warnings that have been collected while running a
/// subcommand.
pub(crate) fn display_warnings() {
    log::debug!("Displaying warnings");
    warnings().display();
}
