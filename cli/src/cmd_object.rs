// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::error::Error;

use clap::{ArgMatches, Command};
use colored::Colorize;
use davsync_dav::{DavClient, Href, ItemList, Resource, TimeRange};

use crate::arg::{
    arg_collection, arg_end, arg_limit, arg_start, arg_verbose, get_collection, get_limit,
    get_time_range, get_verbose,
};
use crate::cmd_collection::addressbook_home;
use crate::format::{ContactColumn, EventColumn, GroupColumn, ReminderColumn};
use crate::table::{Column, Table};

#[derive(Debug, Clone)]
pub struct CmdEvents {
    pub calendar: Href,
    pub range: Option<TimeRange>,
    pub limit: Option<usize>,
    pub verbose: bool,
}

impl CmdEvents {
    pub const NAME: &str = "events";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .alias("e")
            .about("List the events of a calendar")
            .arg(arg_collection(true))
            .arg(arg_start())
            .arg(arg_end())
            .arg(arg_limit())
            .arg(arg_verbose())
    }

    pub fn from(matches: &ArgMatches) -> Self {
        Self {
            calendar: get_collection(matches).unwrap_or_else(|| unreachable!()),
            range: get_time_range(matches),
            limit: get_limit(matches),
            verbose: get_verbose(matches),
        }
    }

    pub async fn run(self, client: &DavClient) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "listing events...");
        let mut list = client.list_events(&self.calendar, self.range).await?;
        list.items
            .sort_by_cached_key(|r| r.value.start.as_ref().map(ToString::to_string));

        let columns: &[EventColumn] = match self.verbose {
            true => &EventColumn::ALL,
            false => &EventColumn::BRIEF,
        };
        print_list(&list, columns, self.limit, self.verbose);
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct CmdReminders {
    pub calendar: Href,
    pub range: Option<TimeRange>,
    pub limit: Option<usize>,
    pub verbose: bool,
}

impl CmdReminders {
    pub const NAME: &str = "reminders";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .alias("todos")
            .about("List the reminders of a calendar")
            .arg(arg_collection(true))
            .arg(arg_start())
            .arg(arg_end())
            .arg(arg_limit())
            .arg(arg_verbose())
    }

    pub fn from(matches: &ArgMatches) -> Self {
        Self {
            calendar: get_collection(matches).unwrap_or_else(|| unreachable!()),
            range: get_time_range(matches),
            limit: get_limit(matches),
            verbose: get_verbose(matches),
        }
    }

    pub async fn run(self, client: &DavClient) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "listing reminders...");
        let mut list = client.list_reminders(&self.calendar, self.range).await?;
        list.items.sort_by_cached_key(|r| {
            let priority = match r.value.priority {
                Some(p) if p > 0 => p,
                _ => u8::MAX, // undefined sorts last
            };
            (priority, r.value.due.as_ref().map(ToString::to_string))
        });

        let columns: &[ReminderColumn] = match self.verbose {
            true => &ReminderColumn::ALL,
            false => &ReminderColumn::BRIEF,
        };
        print_list(&list, columns, self.limit, self.verbose);
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct CmdContacts {
    pub book: Option<Href>,
    pub limit: Option<usize>,
    pub verbose: bool,
}

impl CmdContacts {
    pub const NAME: &str = "contacts";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .alias("c")
            .about("List the contacts of an address book")
            .arg(arg_collection(false))
            .arg(arg_limit())
            .arg(arg_verbose())
    }

    pub fn from(matches: &ArgMatches) -> Self {
        Self {
            book: get_collection(matches),
            limit: get_limit(matches),
            verbose: get_verbose(matches),
        }
    }

    pub async fn run(self, client: &DavClient) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "listing contacts...");
        let columns: &[ContactColumn] = match self.verbose {
            true => &ContactColumn::ALL,
            false => &ContactColumn::BRIEF,
        };

        let books = address_books(client, self.book).await?;
        for (title, book) in books {
            let mut list = client.list_contacts(&book).await?;
            list.items
                .sort_by_cached_key(|r| r.value.display_name().to_lowercase());
            print_title(title.as_deref());
            print_list(&list, columns, self.limit, self.verbose);
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct CmdGroups {
    pub book: Option<Href>,
    pub verbose: bool,
}

impl CmdGroups {
    pub const NAME: &str = "groups";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .alias("g")
            .about("List the contact groups of an address book")
            .arg(arg_collection(false))
            .arg(arg_verbose())
    }

    pub fn from(matches: &ArgMatches) -> Self {
        Self {
            book: get_collection(matches),
            verbose: get_verbose(matches),
        }
    }

    pub async fn run(self, client: &DavClient) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "listing contact groups...");
        let columns: &[GroupColumn] = match self.verbose {
            true => &GroupColumn::ALL,
            false => &GroupColumn::BRIEF,
        };

        let books = address_books(client, self.book).await?;
        for (title, book) in books {
            let mut list = client.list_contact_groups(&book).await?;
            list.items.sort_by(|a, b| a.value.name.cmp(&b.value.name));
            print_title(title.as_deref());
            print_list(&list, columns, None, self.verbose);
        }
        Ok(())
    }
}

/// The requested address book, or every book under the home with its title.
async fn address_books(
    client: &DavClient,
    book: Option<Href>,
) -> Result<Vec<(Option<String>, Href)>, Box<dyn Error>> {
    if let Some(book) = book {
        return Ok(vec![(None, book)]);
    }

    let home = addressbook_home(client).await?;
    let list = client.list_address_books(&home).await?;
    Ok(list
        .collections
        .into_iter()
        .map(|b| {
            let title = b.display_name.unwrap_or_else(|| b.href.to_string());
            (Some(title), b.href)
        })
        .collect())
}

fn print_title(title: Option<&str>) {
    if let Some(title) = title {
        println!("{}", title.bold().underline());
    }
}

fn print_list<T, C: Column<Resource<T>>>(
    list: &ItemList<T>,
    columns: &[C],
    limit: Option<usize>,
    verbose: bool,
) {
    let shown = match limit {
        Some(limit) if limit < list.items.len() => {
            println!("Displaying the {limit}/{} items", list.items.len());
            list.items.get(..limit).unwrap_or(&list.items)
        }
        _ => &list.items,
    };
    print!("{}", Table::new(columns, shown));

    for failure in &list.failures {
        println!(
            "{} {}: {}",
            "Skipped:".yellow(),
            failure.href,
            failure.error
        );
    }
    if verbose {
        for (href, warning) in &list.warnings {
            println!("{} {}: {}", "Warning:".yellow(), href, warning);
        }
    }
}
