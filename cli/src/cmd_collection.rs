// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::error::Error;

use clap::{Arg, ArgMatches, Command, ValueHint, arg};
use davsync_dav::{DavClient, Href};

use crate::format::{AddressBookColumn, CalendarColumn};
use crate::table::Table;

fn arg_home() -> Arg {
    arg!(home: [HOME] "Href of the home collection, discovered when omitted")
        .value_hint(ValueHint::Url)
}

fn get_home(matches: &ArgMatches) -> Option<Href> {
    matches
        .get_one::<String>("home")
        .map(|a| Href::from(a.as_str()))
}

/// The configured calendar home, else the one the server reports.
pub async fn calendar_home(client: &DavClient) -> Result<Href, Box<dyn Error>> {
    if let Some(home) = &client.config().calendar_home {
        return Ok(Href::from(home.as_str()));
    }
    client.discover().await?.calendar_home.ok_or_else(|| {
        "Server did not report a calendar home, set `server.calendar_home` in the config".into()
    })
}

/// The configured address book home, else the one the server reports.
pub async fn addressbook_home(client: &DavClient) -> Result<Href, Box<dyn Error>> {
    if let Some(home) = &client.config().addressbook_home {
        return Ok(Href::from(home.as_str()));
    }
    client.discover().await?.addressbook_home.ok_or_else(|| {
        "Server did not report an address book home, set `server.addressbook_home` in the config"
            .into()
    })
}

#[derive(Debug, Clone)]
pub struct CmdCalendars {
    pub home: Option<Href>,
}

impl CmdCalendars {
    pub const NAME: &str = "calendars";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .alias("cal")
            .about("List the calendars of the user")
            .arg(arg_home())
    }

    pub fn from(matches: &ArgMatches) -> Self {
        Self {
            home: get_home(matches),
        }
    }

    pub async fn run(self, client: &DavClient) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "listing calendars...");
        let home = match self.home {
            Some(home) => home,
            None => calendar_home(client).await?,
        };

        let mut list = client.list_calendars(&home).await?;
        list.collections.sort_by_key(|c| c.order.unwrap_or(i32::MAX));
        print!("{}", Table::new(&CalendarColumn::ALL, &list.collections));
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct CmdAddressBooks {
    pub home: Option<Href>,
}

impl CmdAddressBooks {
    pub const NAME: &str = "addressbooks";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .alias("books")
            .about("List the address books of the user")
            .arg(arg_home())
    }

    pub fn from(matches: &ArgMatches) -> Self {
        Self {
            home: get_home(matches),
        }
    }

    pub async fn run(self, client: &DavClient) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "listing address books...");
        let home = match self.home {
            Some(home) => home,
            None => addressbook_home(client).await?,
        };

        let list = client.list_address_books(&home).await?;
        print!("{}", Table::new(&AddressBookColumn::ALL, &list.collections));
        Ok(())
    }
}
