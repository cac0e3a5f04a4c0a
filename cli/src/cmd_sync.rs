// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::{error::Error, path::Path, path::PathBuf};

use clap::{ArgMatches, Command, ValueHint, arg, value_parser};
use colored::Colorize;
use davsync_dav::{DavClient, DavError, Href, SyncDiff, SyncState, SyncToken};
use tokio::fs;

use crate::arg::{arg_collection, get_collection};
use crate::format::SyncColumn;
use crate::table::Table;

#[derive(Debug, Clone)]
pub struct CmdSync {
    pub collection: Href,
    pub token: Option<SyncToken>,
    pub state: Option<PathBuf>,
    pub compare: bool,
}

impl CmdSync {
    pub const NAME: &str = "sync";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .about("Show what changed in a collection since a sync token")
            .arg(arg_collection(true))
            .arg(arg!(--token <TOKEN> "Sync token of the previous sync, full listing when omitted"))
            .arg(
                arg!(--state <FILE> "JSON file keeping the token and ETags between runs")
                    .value_parser(value_parser!(PathBuf))
                    .value_hint(ValueHint::FilePath),
            )
            .arg(
                arg!(--compare "Compare ETags with a full listing instead of a sync report")
                    .requires("state"),
            )
    }

    pub fn from(matches: &ArgMatches) -> Self {
        Self {
            collection: get_collection(matches).unwrap_or_else(|| unreachable!()),
            token: matches
                .get_one::<String>("token")
                .map(|a| SyncToken::from(a.as_str())),
            state: matches.get_one("state").cloned(),
            compare: matches.get_flag("compare"),
        }
    }

    pub async fn run(self, client: &DavClient) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "syncing collection...");
        let mut state = match &self.state {
            Some(path) => load_state(path).await?,
            None => SyncState::new(),
        };

        if self.compare {
            compare(client, &self.collection, &mut state).await?;
        } else {
            let token = self.token.clone().or_else(|| state.token.clone());
            let diff = match client.sync_collection(&self.collection, token.as_ref()).await {
                Ok(diff) => diff,
                Err(DavError::InvalidSyncToken(_)) if token.is_some() => {
                    println!("{} sync token expired, listing everything", "Warning:".yellow());
                    state = SyncState::new();
                    client.sync_collection(&self.collection, None).await?
                }
                Err(e) => return Err(e.into()),
            };
            state.apply(&diff);
            print_diff(&diff);
        }

        if let Some(path) = &self.state {
            save_state(path, &state).await?;
        }
        Ok(())
    }
}

async fn compare(
    client: &DavClient,
    collection: &Href,
    state: &mut SyncState,
) -> Result<(), Box<dyn Error>> {
    let listing = client.list_etags(collection).await?;
    let changes = state.changes(listing.iter().map(|(href, etag)| (href, etag)));
    if changes.is_empty() {
        println!("{}", "Up to date".green());
        return Ok(());
    }

    for href in &changes.added {
        println!("{} {href}", "added".green());
    }
    for href in &changes.modified {
        println!("{} {href}", "modified".blue());
    }
    for href in &changes.deleted {
        println!("{} {href}", "deleted".red());
        state.forget(href);
    }
    for (href, etag) in listing {
        state.record(href, etag);
    }
    Ok(())
}

fn print_diff(diff: &SyncDiff) {
    if diff.items.is_empty() {
        println!("{}", "Up to date".green());
    } else {
        print!("{}", Table::new(&SyncColumn::ALL, &diff.items).without_header());
    }
    for failure in &diff.failures {
        println!("{} {}: {}", "Skipped:".yellow(), failure.href, failure.error);
    }
    if let Some(token) = &diff.token {
        println!("{}: {}", "Token".cyan(), token);
    }
}

/// Read the saved state; a missing file is an empty state.
pub async fn load_state(path: &Path) -> Result<SyncState, Box<dyn Error>> {
    match fs::read_to_string(path).await {
        Ok(text) => serde_json::from_str(&text)
            .map_err(|e| format!("Invalid sync state at {}: {}", path.display(), e).into()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no sync state yet");
            Ok(SyncState::new())
        }
        Err(e) => Err(format!("Failed to read sync state at {}: {}", path.display(), e).into()),
    }
}

pub async fn save_state(path: &Path, state: &SyncState) -> Result<(), Box<dyn Error>> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).await?;
    }
    let json = serde_json::to_string_pretty(state)?;
    fs::write(path, json).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use davsync_dav::ETag;
    use tempfile::TempDir;

    #[tokio::test]
    async fn missing_state_file_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let state = load_state(&temp_dir.path().join("state.json")).await.unwrap();
        assert!(state.is_empty());
        assert_eq!(state.token, None);
    }

    #[tokio::test]
    async fn state_survives_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested/state.json");

        let mut state = SyncState::new();
        state.token = Some(SyncToken::from("http://example.com/sync/3"));
        state.record(Href::from("/cal/a.ics"), ETag::from("\"1\""));
        save_state(&path, &state).await.unwrap();

        let loaded = load_state(&path).await.unwrap();
        assert_eq!(loaded, state);
    }

    #[tokio::test]
    async fn corrupt_state_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("state.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = load_state(&path).await.unwrap_err();
        assert!(err.to_string().contains("Invalid sync state"));
    }
}
