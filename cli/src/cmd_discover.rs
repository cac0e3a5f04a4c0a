// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::error::Error;

use clap::{ArgMatches, Command};
use colored::Colorize;
use davsync_dav::{DavClient, Discovery};

#[derive(Debug, Clone, Copy)]
pub struct CmdDiscover;

impl CmdDiscover {
    pub const NAME: &str = "discover";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .about("Show the server capabilities and the calendar and address book homes")
    }

    pub fn from(_matches: &ArgMatches) -> Self {
        Self
    }

    pub async fn run(self, client: &DavClient) -> Result<(), Box<dyn Error>> {
        tracing::debug!("discovering server...");
        let discovery = client.discover().await?;
        print!("{}", DiscoveryView(&discovery));
        Ok(())
    }
}

struct DiscoveryView<'a>(&'a Discovery);

impl std::fmt::Display for DiscoveryView<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let d = self.0;
        let yes_no = |v: bool| if v { "yes".green() } else { "no".red() };
        let or_unknown = |v: Option<&str>| v.unwrap_or("unknown").to_string();

        writeln!(f, "{}: {}", "Principal".cyan(), or_unknown(d.principal.as_deref()))?;
        writeln!(f, "{}: {}", "CalDAV".cyan(), yes_no(d.supports_calendars()))?;
        writeln!(f, "{}: {}", "CardDAV".cyan(), yes_no(d.supports_contacts()))?;
        writeln!(
            f,
            "{}: {}",
            "Calendar home".cyan(),
            or_unknown(d.calendar_home.as_deref())
        )?;
        writeln!(
            f,
            "{}: {}",
            "Address book home".cyan(),
            or_unknown(d.addressbook_home.as_deref())
        )?;
        if !d.capabilities.is_empty() {
            writeln!(f, "{}: {}", "DAV".cyan(), d.capabilities.join(", "))?;
        }
        Ok(())
    }
}
