//! Track poller backed by an external player query process (cmus-remote by default)

use crate::config::PlayerConfig;
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;

const ARTIST_PREFIX: &str = "tag artist ";
const ALBUM_PREFIX: &str = "tag album ";
const TITLE_PREFIX: &str = "tag title ";
const STATUS_PREFIX: &str = "status ";

/// Snapshot of what the player reports as current.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackDescriptor {
    pub artist: String,
    pub album: Option<String>,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PollError {
    #[error("player not running or not available: {0}")]
    PlayerUnavailable(String),
    #[error("No song playing")]
    NoTrackPlaying,
    #[error("Unknown song (missing artist or title information)")]
    IncompleteMetadata,
}

impl PollError {
    /// Expected states that are shown as information rather than failures.
    pub fn is_informational(&self) -> bool {
        matches!(self, PollError::NoTrackPlaying | PollError::IncompleteMetadata)
    }
}

/// Parse the line-oriented `cmus-remote -Q` output.
pub fn parse_status(output: &str) -> Result<TrackDescriptor, PollError> {
    let mut active = false;
    let mut artist: Option<&str> = None;
    let mut album: Option<&str> = None;
    let mut title: Option<&str> = None;

    for line in output.lines() {
        if let Some(rest) = line.strip_prefix(ARTIST_PREFIX) {
            artist.get_or_insert(rest);
        } else if let Some(rest) = line.strip_prefix(ALBUM_PREFIX) {
            album.get_or_insert(rest);
        } else if let Some(rest) = line.strip_prefix(TITLE_PREFIX) {
            title.get_or_insert(rest);
        } else if let Some(rest) = line.strip_prefix(STATUS_PREFIX) {
            let word = rest.split_whitespace().next().unwrap_or("");
            if word == "playing" || word == "paused" {
                active = true;
            }
        }
    }

    if !active {
        return Err(PollError::NoTrackPlaying);
    }

    let artist = artist.unwrap_or_default();
    let title = title.unwrap_or_default();
    if artist.is_empty() || title.is_empty() {
        return Err(PollError::IncompleteMetadata);
    }

    Ok(TrackDescriptor {
        artist: artist.to_string(),
        album: album.filter(|a| !a.is_empty()).map(str::to_string),
        title: title.to_string(),
    })
}

/// Runs the configured player query command. Holds no state between polls.
#[derive(Debug, Clone)]
pub struct PlayerQuery {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl PlayerQuery {
    pub fn new(cfg: &PlayerConfig) -> Self {
        Self {
            program: cfg.command.clone(),
            args: cfg.args.clone(),
            timeout: Duration::from_secs(cfg.timeout_secs.max(1)),
        }
    }

    pub async fn poll(&self) -> Result<TrackDescriptor, PollError> {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .stdin(std::process::Stdio::null())
            .kill_on_drop(true);

        let out = match tokio::time::timeout(self.timeout, cmd.output()).await {
            Ok(Ok(out)) => out,
            Ok(Err(e)) => {
                return Err(PollError::PlayerUnavailable(format!(
                    "run {}: {e}",
                    self.program
                )));
            }
            Err(_) => {
                return Err(PollError::PlayerUnavailable(format!(
                    "{} timed out after {}s",
                    self.program,
                    self.timeout.as_secs()
                )));
            }
        };

        if !out.status.success() {
            let stderr = String::from_utf8_lossy(&out.stderr);
            let detail = match stderr.trim() {
                "" => format!("{} exited with {}", self.program, out.status),
                msg => msg.to_string(),
            };
            return Err(PollError::PlayerUnavailable(detail));
        }

        parse_status(&String::from_utf8_lossy(&out.stdout))
    }
}
