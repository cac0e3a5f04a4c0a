// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Command-line client for `CalDAV`/`CardDAV` servers.

mod arg;
mod cli;
mod cmd_collection;
mod cmd_discover;
mod cmd_object;
mod cmd_show;
mod cmd_sync;
mod config;
mod format;
mod table;

pub use crate::cli::{Cli, Commands, run};
pub use crate::config::{Config, parse_config};
