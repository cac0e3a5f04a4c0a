// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::{error::Error, fmt::Write, path::PathBuf};

use clap::{ArgMatches, Command, ValueHint, arg, value_parser};
use colored::Colorize;
use davsync_codec::{Calendar, CalendarComponent, Card, CodecContext, ParseWarning};
use tokio::fs;

use crate::format::{ContactView, EventView, GroupView, ReminderView};

#[derive(Debug, Clone)]
pub struct CmdShow {
    pub path: PathBuf,
    pub reformat: bool,
}

impl CmdShow {
    pub const NAME: &str = "show";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .about("Parse a local .vcf or .ics file and print what it holds")
            .arg(
                arg!(path: <FILE> "The vCard or iCalendar file")
                    .value_parser(value_parser!(PathBuf))
                    .value_hint(ValueHint::FilePath),
            )
            .arg(arg!(--reformat "Print the objects re-encoded instead of the summary view"))
    }

    pub fn from(matches: &ArgMatches) -> Self {
        Self {
            path: matches
                .get_one::<PathBuf>("path")
                .cloned()
                .unwrap_or_else(|| unreachable!()),
            reformat: matches.get_flag("reformat"),
        }
    }

    pub async fn run(self) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "showing file...");
        let text = fs::read_to_string(&self.path)
            .await
            .map_err(|e| format!("Failed to read {}: {}", self.path.display(), e))?;

        let ctx = CodecContext::new();
        let output = render(&text, &ctx, self.reformat)?;
        print!("{output}");
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileKind {
    Card,
    Calendar,
}

fn sniff(text: &str) -> Option<FileKind> {
    let first = text
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())?
        .to_ascii_uppercase();
    match first.as_str() {
        "BEGIN:VCARD" => Some(FileKind::Card),
        "BEGIN:VCALENDAR" => Some(FileKind::Calendar),
        _ => None,
    }
}

fn render(text: &str, ctx: &CodecContext, reformat: bool) -> Result<String, Box<dyn Error>> {
    let mut out = String::new();
    match sniff(text) {
        Some(FileKind::Card) => {
            let parsed = Card::parse_all(text, ctx);
            for card in parsed.value {
                match card {
                    Ok(card) if reformat => out.push_str(&card.format(ctx)?),
                    Ok(Card::Contact(contact)) => writeln!(out, "{}", ContactView(&contact))?,
                    Ok(Card::Group(group)) => writeln!(out, "{}", GroupView(&group))?,
                    Err(e) => writeln!(out, "{} {}", "Skipped:".yellow(), e)?,
                }
            }
            write_warnings(&mut out, &parsed.warnings)?;
        }
        Some(FileKind::Calendar) => {
            let parsed = Calendar::parse(text)?;
            if reformat {
                out.push_str(&parsed.value.format(ctx)?);
            } else {
                for component in &parsed.value.components {
                    match component {
                        CalendarComponent::Event(event) => {
                            writeln!(out, "{}", EventView(event))?;
                        }
                        CalendarComponent::Reminder(reminder) => {
                            writeln!(out, "{}", ReminderView(reminder))?;
                        }
                    }
                }
            }
            write_warnings(&mut out, &parsed.warnings)?;
        }
        None => return Err("Not a vCard or iCalendar file".into()),
    }
    Ok(out)
}

fn write_warnings(out: &mut String, warnings: &[ParseWarning]) -> std::fmt::Result {
    for warning in warnings {
        writeln!(out, "{} {}", "Warning:".yellow(), warning)?;
    }
    Ok(())
}
