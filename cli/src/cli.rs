// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::{error::Error, ffi::OsString, path::PathBuf};

use clap::{ArgMatches, Command, ValueHint, arg, builder::styling, crate_version, value_parser};
use colored::Colorize;
use davsync_dav::DavClient;
use futures::{FutureExt, future::BoxFuture};
use tracing_subscriber::EnvFilter;

use crate::cmd_collection::{CmdAddressBooks, CmdCalendars};
use crate::cmd_discover::CmdDiscover;
use crate::cmd_object::{CmdContacts, CmdEvents, CmdGroups, CmdReminders};
use crate::cmd_show::CmdShow;
use crate::cmd_sync::CmdSync;
use crate::config::{APP_NAME, parse_config};

/// Run the davsync command-line interface.
pub async fn run() -> Result<(), Box<dyn Error>> {
    init_tracing();
    if let Err(e) = dotenvy::dotenv()
        && !e.not_found()
    {
        println!("{} {}", "Warning:".yellow(), e);
    }

    match Cli::parse() {
        Ok(cli) => {
            if let Err(e) = cli.run().await {
                println!("{} {}", "Error:".red(), e);
            }
        }
        Err(e) => println!("{} {}", "Error:".red(), e),
    }
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Command-line interface
#[derive(Debug)]
pub struct Cli {
    /// Path to the configuration file
    pub config: Option<PathBuf>,

    /// Server URL overriding the configuration
    pub url: Option<String>,

    /// The command to execute
    pub command: Commands,
}

impl Cli {
    /// Create the command-line interface
    pub fn command() -> Command {
        const STYLES: styling::Styles = styling::Styles::styled()
            .header(styling::AnsiColor::Green.on_default().bold())
            .usage(styling::AnsiColor::Green.on_default().bold())
            .literal(styling::AnsiColor::Blue.on_default().bold())
            .placeholder(styling::AnsiColor::Cyan.on_default());

        Command::new(APP_NAME)
            .about("Browse and synchronize CalDAV calendars and CardDAV address books.")
            .author("Zexin Yuan <aim@yzx9.xyz>")
            .version(crate_version!())
            .styles(STYLES)
            .subcommand_required(true)
            .arg_required_else_help(true)
            .arg(
                arg!(-c --config [CONFIG] "Path to the configuration file")
                    .long_help(
                        "\
Path to the configuration file. Defaults to $DAVSYNC_CONFIG, then \
$XDG_CONFIG_HOME/davsync/config.toml on Linux and MacOS, %APPDATA%/davsync/config.toml \
on Windows.",
                    )
                    .value_parser(value_parser!(PathBuf))
                    .value_hint(ValueHint::FilePath)
                    .global(true),
            )
            .arg(
                arg!(--url <URL> "Server URL, overrides the configuration")
                    .value_hint(ValueHint::Url)
                    .global(true),
            )
            .subcommand(CmdDiscover::command())
            .subcommand(CmdCalendars::command())
            .subcommand(CmdAddressBooks::command())
            .subcommand(CmdEvents::command())
            .subcommand(CmdReminders::command())
            .subcommand(CmdContacts::command())
            .subcommand(CmdGroups::command())
            .subcommand(CmdSync::command())
            .subcommand(CmdShow::command())
    }

    /// Parse the command-line arguments
    pub fn parse() -> Result<Self, Box<dyn Error>> {
        let commands = Self::command();
        let matches = commands.get_matches();
        Self::from(&matches)
    }

    /// Parse the specified arguments
    pub fn try_parse_from<I, T>(args: I) -> Result<Self, Box<dyn Error>>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let commands = Self::command();
        let matches = commands.try_get_matches_from(args)?;
        Self::from(&matches)
    }

    /// Create a CLI instance from the `ArgMatches`
    pub fn from(matches: &ArgMatches) -> Result<Self, Box<dyn Error>> {
        use Commands::*;
        let command = match matches.subcommand() {
            Some((CmdDiscover::NAME, matches)) => Discover(CmdDiscover::from(matches)),
            Some((CmdCalendars::NAME, matches)) => Calendars(CmdCalendars::from(matches)),
            Some((CmdAddressBooks::NAME, matches)) => {
                AddressBooks(CmdAddressBooks::from(matches))
            }
            Some((CmdEvents::NAME, matches)) => Events(CmdEvents::from(matches)),
            Some((CmdReminders::NAME, matches)) => Reminders(CmdReminders::from(matches)),
            Some((CmdContacts::NAME, matches)) => Contacts(CmdContacts::from(matches)),
            Some((CmdGroups::NAME, matches)) => Groups(CmdGroups::from(matches)),
            Some((CmdSync::NAME, matches)) => Sync(CmdSync::from(matches)),
            Some((CmdShow::NAME, matches)) => Show(CmdShow::from(matches)),
            _ => return Err("No command given".into()),
        };

        Ok(Cli {
            config: matches.get_one("config").cloned(),
            url: matches.get_one("url").cloned(),
            command,
        })
    }

    /// Run the command
    pub async fn run(self) -> Result<(), Box<dyn Error>> {
        self.command.run(self.config, self.url).await
    }
}

/// The commands available in the CLI
#[derive(Debug, Clone)]
pub enum Commands {
    /// Show server capabilities and homes
    Discover(CmdDiscover),

    /// List calendars
    Calendars(CmdCalendars),

    /// List address books
    AddressBooks(CmdAddressBooks),

    /// List events of a calendar
    Events(CmdEvents),

    /// List reminders of a calendar
    Reminders(CmdReminders),

    /// List contacts
    Contacts(CmdContacts),

    /// List contact groups
    Groups(CmdGroups),

    /// Incremental changes of a collection
    Sync(CmdSync),

    /// Print a local vCard or iCalendar file
    Show(CmdShow),
}

impl Commands {
    /// Run the command with the given configuration
    #[rustfmt::skip]
    pub async fn run(self, config: Option<PathBuf>, url: Option<String>) -> Result<(), Box<dyn Error>> {
        use Commands::*;
        match self {
            Discover(a)     => Self::run_with(config, url, |x| a.run(x).boxed()).await,
            Calendars(a)    => Self::run_with(config, url, |x| a.run(x).boxed()).await,
            AddressBooks(a) => Self::run_with(config, url, |x| a.run(x).boxed()).await,
            Events(a)       => Self::run_with(config, url, |x| a.run(x).boxed()).await,
            Reminders(a)    => Self::run_with(config, url, |x| a.run(x).boxed()).await,
            Contacts(a)     => Self::run_with(config, url, |x| a.run(x).boxed()).await,
            Groups(a)       => Self::run_with(config, url, |x| a.run(x).boxed()).await,
            Sync(a)         => Self::run_with(config, url, |x| a.run(x).boxed()).await,
            Show(a)         => a.run().await,
        }
    }

    async fn run_with<F>(
        config: Option<PathBuf>,
        url: Option<String>,
        f: F,
    ) -> Result<(), Box<dyn Error>>
    where
        F: for<'a> FnOnce(&'a DavClient) -> BoxFuture<'a, Result<(), Box<dyn Error>>>,
    {
        tracing::debug!("parsing configuration...");
        let mut config = parse_config(config).await?;
        if let Some(url) = url {
            config.server.base_url = url;
        }

        let client = DavClient::new(config.server)?;
        f(&client).await
    }
}
