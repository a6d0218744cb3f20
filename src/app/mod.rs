pub mod actions;
pub mod coordinator;
pub mod events;
pub mod state;

use crate::config::Config;
use crate::input;
use crate::lyrics::GeniusClient;
use crate::player::{PlayerQuery, PollError, TrackDescriptor};
use crate::tui::{self, TuiTerminal};
use actions::Action;
use coordinator::{FetchCoordinator, FetchRequest, FetchResult, Reaction};
use events::Event;
use state::AppState;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

pub struct App {
    cfg: Config,
    state: AppState,
    coordinator: FetchCoordinator,
    genius: GeniusClient,
    player: PlayerQuery,
    /// Token of the fetch currently in flight, if any.
    fetch_cancel: Option<CancellationToken>,
    polls_issued: u64,
    /// Newest poll applied; older ones arriving late are dropped.
    polls_applied: u64,
}

impl App {
    pub fn new(cfg: Config) -> anyhow::Result<Self> {
        let genius = GeniusClient::new(&cfg.genius)?;
        let player = PlayerQuery::new(&cfg.player);
        let state = AppState::new(cfg.ui.show_help_footer);

        Ok(Self {
            cfg,
            state,
            coordinator: FetchCoordinator::new(),
            genius,
            player,
            fetch_cancel: None,
            polls_issued: 0,
            polls_applied: 0,
        })
    }

    pub async fn run(&mut self, terminal: &mut TuiTerminal) -> anyhow::Result<()> {
        let (tx, mut rx) = mpsc::channel::<Event>(64);

        input::spawn_input_task(tx.clone());
        spawn_poll_timer(tx.clone(), self.cfg.player.poll_interval());

        tui::draw(terminal, &mut self.state)?;

        while let Some(ev) = rx.recv().await {
            match ev {
                Event::Input(input_ev) => {
                    if let Some(action) = input::map_input_to_action(input_ev) {
                        self.handle_action(action, &tx);
                    }
                }
                Event::Tick => self.spawn_poll(&tx),
                Event::Poll(seq, polled) => self.handle_poll(seq, polled, &tx),
                Event::Lyrics(result) => self.handle_lyrics(result),
            }

            if self.state.should_quit {
                break;
            }

            tui::draw(terminal, &mut self.state)?;
        }

        if let Some(token) = self.fetch_cancel.take() {
            token.cancel();
        }
        Ok(())
    }

    fn handle_action(&mut self, action: Action, tx: &mpsc::Sender<Event>) {
        match action {
            Action::Refresh => {
                let reaction = self.coordinator.on_refresh();
                self.apply(reaction, tx);
                self.spawn_poll(tx);
            }
            _ => self.reduce(action),
        }
    }

    fn reduce(&mut self, action: Action) {
        match action {
            Action::Quit => self.state.should_quit = true,
            Action::LineDown => self.state.scroll_down(1),
            Action::LineUp => self.state.scroll_up(1),
            Action::GoTop => self.state.go_top(),
            Action::GoBottom => self.state.go_bottom(),
            Action::HalfPageDown => {
                let n = self.state.half_page();
                self.state.scroll_down(n);
            }
            Action::HalfPageUp => {
                let n = self.state.half_page();
                self.state.scroll_up(n);
            }
            Action::ToggleHelp => self.state.show_help_footer = !self.state.show_help_footer,
            // Redraw picks up the new geometry.
            Action::Resize | Action::Refresh => {}
        }
    }

    fn spawn_poll(&mut self, tx: &mpsc::Sender<Event>) {
        self.polls_issued += 1;
        let seq = self.polls_issued;
        let player = self.player.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            let polled = player.poll().await;
            let _ = tx.send(Event::Poll(seq, polled)).await;
        });
    }

    fn handle_poll(
        &mut self,
        seq: u64,
        polled: Result<TrackDescriptor, PollError>,
        tx: &mpsc::Sender<Event>,
    ) {
        // A refresh poll can overlap a timer poll; only the newest one counts.
        if seq <= self.polls_applied {
            debug!(seq, applied = self.polls_applied, "discarding out-of-order poll");
            return;
        }
        self.polls_applied = seq;

        match &polled {
            Err(e) if e.is_informational() => debug!("poll: {e}"),
            Err(e) => warn!("poll failed: {e}"),
            Ok(_) => {}
        }

        let track = polled.as_ref().ok().cloned();
        let reaction = self.coordinator.on_poll(polled);
        match track {
            Some(track) if reaction.request.is_some() => {
                info!(artist = %track.artist, title = %track.title, "now playing");
                self.state.track = Some(track);
            }
            Some(_) => {}
            None => self.state.track = None,
        }
        self.apply(reaction, tx);
    }

    fn handle_lyrics(&mut self, result: FetchResult) {
        if let Err(e) = &result.outcome {
            warn!("lyrics fetch failed: {e}");
        }
        if let Some(display) = self.coordinator.on_result(result) {
            if let Some(token) = self.fetch_cancel.take() {
                token.cancel();
            }
            self.state.show(display);
        }
    }

    fn apply(&mut self, reaction: Reaction, tx: &mpsc::Sender<Event>) {
        debug!(
            phase = ?self.coordinator.phase(),
            in_flight = ?self.coordinator.in_flight_key(),
            "coordinator updated"
        );
        if let Some(display) = reaction.display {
            self.state.show(display);
        }
        if let Some(request) = reaction.request {
            self.spawn_fetch(request, tx.clone());
        }
    }

    /// The superseded fetch is cancelled; a cancelled fetch reports nothing.
    fn spawn_fetch(&mut self, request: FetchRequest, tx: mpsc::Sender<Event>) {
        if let Some(previous) = self.fetch_cancel.take() {
            previous.cancel();
        }
        let cancel = CancellationToken::new();
        self.fetch_cancel = Some(cancel.clone());

        let genius = self.genius.clone();
        info!(query = %request.query(), "fetching lyrics");
        tokio::spawn(async move {
            let outcome = genius.fetch_lyrics(&request.query(), &cancel).await;
            if let Err(e) = &outcome
                && e.is_cancelled()
            {
                debug!("superseded fetch cancelled: {e}");
                return;
            }
            let _ = tx.send(Event::Lyrics(request.result(outcome))).await;
        });
    }
}

fn spawn_poll_timer(tx: mpsc::Sender<Event>, period: std::time::Duration) {
    tokio::spawn(async move {
        // First tick fires immediately.
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            if tx.send(Event::Tick).await.is_err() {
                break;
            }
        }
    });
}
