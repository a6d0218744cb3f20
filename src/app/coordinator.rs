//! Fetch coordinator: decides when lyrics are fetched and which results are shown
//!
//! Single owner of "current track" and "fetch in flight". Reacts to poll results,
//! manual refreshes and provider results; everything it wants done comes back
//! as a [`Reaction`] for the event loop to carry out.

use crate::lyrics::LyricsError;
use crate::player::{PollError, TrackDescriptor};
use tracing::debug;

/// Case-folded (artist, title) identity used for change detection and staleness.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TrackKey(String);

impl TrackKey {
    pub fn new(artist: &str, title: &str) -> Self {
        Self(format!("{}\u{1f}{}", artist.to_lowercase(), title.to_lowercase()))
    }
}

impl From<&TrackDescriptor> for TrackKey {
    fn from(track: &TrackDescriptor) -> Self {
        Self::new(&track.artist, &track.title)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub key: TrackKey,
    /// Issue number; a refresh re-issues the same key under a new one.
    pub seq: u64,
    pub artist: String,
    pub title: String,
}

impl FetchRequest {
    fn for_track(track: &TrackDescriptor) -> Self {
        Self {
            key: TrackKey::from(track),
            seq: 0,
            artist: track.artist.clone(),
            title: track.title.clone(),
        }
    }

    pub fn result(&self, outcome: Result<String, LyricsError>) -> FetchResult {
        FetchResult {
            key: self.key.clone(),
            seq: self.seq,
            outcome,
        }
    }

    /// Free-text search string handed to the provider.
    pub fn query(&self) -> String {
        format!("{} {}", self.artist, self.title).trim().to_string()
    }
}

/// Outcome of one fetch, tagged with the key and issue it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResult {
    pub key: TrackKey,
    pub seq: u64,
    pub outcome: Result<String, LyricsError>,
}

/// What the viewport should show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Display {
    /// No current track; carries the reason.
    Idle(String),
    Loading,
    Lyrics(String),
    Error(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Fetching,
    Displaying,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reaction {
    pub request: Option<FetchRequest>,
    pub display: Option<Display>,
}

impl Reaction {
    fn none() -> Self {
        Self::default()
    }
}

#[derive(Debug, Default)]
pub struct FetchCoordinator {
    /// Request template for the current track; `None` when idle.
    current: Option<FetchRequest>,
    in_flight: Option<FetchRequest>,
    next_seq: u64,
}

impl FetchCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        match (&self.current, &self.in_flight) {
            (None, _) => Phase::Idle,
            (Some(cur), Some(req)) if cur.key == req.key => Phase::Fetching,
            (Some(_), _) => Phase::Displaying,
        }
    }

    pub fn current_key(&self) -> Option<&TrackKey> {
        self.current.as_ref().map(|r| &r.key)
    }

    pub fn in_flight_key(&self) -> Option<&TrackKey> {
        self.in_flight.as_ref().map(|r| &r.key)
    }

    pub fn in_flight(&self) -> Option<&FetchRequest> {
        self.in_flight.as_ref()
    }

    pub fn on_poll(&mut self, polled: Result<TrackDescriptor, PollError>) -> Reaction {
        match polled {
            Ok(track) => self.on_track(&track),
            Err(err) => self.on_poll_error(&err),
        }
    }

    /// A new (artist, title) always preempts whatever is in flight; the same
    /// one is ignored no matter how often it is polled.
    fn on_track(&mut self, track: &TrackDescriptor) -> Reaction {
        let key = TrackKey::from(track);
        if self.current_key() == Some(&key) {
            return Reaction::none();
        }

        debug!(artist = %track.artist, title = %track.title, "track changed");
        self.issue(FetchRequest::for_track(track))
    }

    fn on_poll_error(&mut self, err: &PollError) -> Reaction {
        // Whatever is still in flight will come back stale and be dropped.
        self.current = None;
        self.in_flight = None;

        let display = if err.is_informational() {
            Display::Idle(err.to_string())
        } else {
            Display::Error(format!("Error: {err}"))
        };
        Reaction {
            request: None,
            display: Some(display),
        }
    }

    /// Re-issue the fetch for the current track even though it has not changed.
    pub fn on_refresh(&mut self) -> Reaction {
        match self.current.clone() {
            Some(request) => {
                debug!("manual refresh");
                self.issue(request)
            }
            None => Reaction::none(),
        }
    }

    /// Results for anything but the current track are stale. For the current
    /// track only the latest issue counts: an earlier one was superseded by a
    /// refresh, and one no longer in flight was already applied.
    pub fn on_result(&mut self, result: FetchResult) -> Option<Display> {
        if self.current_key() != Some(&result.key) {
            debug!("discarding stale lyrics result");
            return None;
        }
        match &self.in_flight {
            Some(req) if req.key == result.key && req.seq == result.seq => {}
            _ => {
                debug!(seq = result.seq, "discarding superseded lyrics result");
                return None;
            }
        }

        self.in_flight = None;
        Some(match result.outcome {
            Ok(lyrics) => Display::Lyrics(lyrics),
            Err(e) => Display::Error(format!("Error fetching lyrics: {e}")),
        })
    }

    fn issue(&mut self, mut request: FetchRequest) -> Reaction {
        self.next_seq += 1;
        request.seq = self.next_seq;
        self.in_flight = Some(request.clone());
        self.current = Some(request.clone());
        Reaction {
            request: Some(request),
            display: Some(Display::Loading),
        }
    }
}
