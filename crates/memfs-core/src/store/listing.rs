//! Listing snapshot and its `ls` / `ls -l` rendering.

use chrono::{DateTime, Local, Utc};
use serde::Serialize;

const SIZE_WIDTH: usize = 10;
const TIME_WIDTH: usize = 30;
const NAME_WIDTH: usize = 20;

/// Metadata shown by the long listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryDetail {
    pub size: usize,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListEntry {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<EntryDetail>,
}

/// Point-in-time snapshot of the store, sorted by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Listing {
    pub long_format: bool,
    pub entries: Vec<ListEntry>,
}

impl Listing {
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render as output lines: one name per line, or the long table
    /// (size, created, last modified, filename) under a dashed rule.
    pub fn render(&self) -> Vec<String> {
        if !self.long_format {
            return self.entries.iter().map(|e| e.name.clone()).collect();
        }

        let mut lines = Vec::with_capacity(self.entries.len() + 2);
        lines.push(
            format!(
                "{:<SIZE_WIDTH$}{:<TIME_WIDTH$}{:<TIME_WIDTH$}{:<NAME_WIDTH$}",
                "size", "created", "last modified", "filename"
            )
            .trim_end()
            .to_string(),
        );
        lines.push("-".repeat(SIZE_WIDTH + TIME_WIDTH * 2 + NAME_WIDTH));

        for entry in &self.entries {
            let Some(detail) = &entry.detail else {
                lines.push(entry.name.clone());
                continue;
            };
            lines.push(
                format!(
                    "{:<SIZE_WIDTH$}{:<TIME_WIDTH$}{:<TIME_WIDTH$}{:<NAME_WIDTH$}",
                    detail.size,
                    format_timestamp(detail.created_at),
                    format_timestamp(detail.updated_at),
                    entry.name
                )
                .trim_end()
                .to_string(),
            );
        }
        lines
    }
}

/// ctime-style local time, e.g. `Mon Jan  1 12:00:00 2024`.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local)
        .format("%a %b %e %H:%M:%S %Y")
        .to_string()
}
