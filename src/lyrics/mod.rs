//! Lyrics provider client
//!
//! This module provides:
//! - Genius client performing search -> song lookup -> page scrape
//! - HTML extraction and markup normalization for lyrics pages
//! - Typed errors tagged with the stage that produced them

pub mod genius;
pub mod scrape;

use std::fmt;
use thiserror::Error;

pub use genius::GeniusClient;

/// Remote lookup stage, attached to every provider error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Search,
    SongLookup,
    PageScrape,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Search => "search genius api",
            Stage::SongLookup => "get song from genius api",
            Stage::PageScrape => "scrape lyrics from genius webpage",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorKind {
    #[error("no results")]
    NoResults,
    #[error("song lookup failed: {0}")]
    SongLookupFailed(String),
    #[error("no lyrics found on page")]
    NoLyricsFound,
    #[error("remote unavailable: {0}")]
    RemoteUnavailable(String),
    #[error("cancelled")]
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{stage}: {kind}")]
pub struct LyricsError {
    pub stage: Stage,
    pub kind: ErrorKind,
}

impl LyricsError {
    pub fn new(stage: Stage, kind: ErrorKind) -> Self {
        Self { stage, kind }
    }

    pub fn is_cancelled(&self) -> bool {
        self.kind == ErrorKind::Cancelled
    }
}
