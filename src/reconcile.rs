//! Reconciliation loop.
//!
//! Replays the stored resume state into the player once, then polls the player forever:
//! every tick it appends the rest of the playing item's folder, applies the skip offsets and
//! persists the observed item and position when they change.

use std::thread;
use std::time::Duration;

use log::{debug, error, info, warn};

use crate::config::ResumeState;
use crate::enrichment::{enrich, EnrichmentMemo, EnrichmentOutcome};
use crate::errors::ControlError;
use crate::player::PlayerControl;
use crate::player_state::read_currently_playing;
use crate::retry::{retry_within, RetryPolicy};
use crate::skip_policy::{self, SkipAction};
use crate::state_store::ResumeStateStore;

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(4);
const RESUME_RETRY_INTERVAL: Duration = Duration::from_millis(500);
const RESUME_RETRY_BUDGET: Duration = Duration::from_secs(3);
const RESUME_MAX_ATTEMPTS: u32 = 10;
const FULLSCREEN_SETTLE_DELAY: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopPhase {
    Starting,
    ResumingPlayback,
    Polling,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopTimings {
    pub poll_interval: Duration,
    pub resume_retry: RetryPolicy,
    pub fullscreen_settle: Duration,
}

impl Default for LoopTimings {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            resume_retry: RetryPolicy::new(RESUME_RETRY_INTERVAL, RESUME_RETRY_BUDGET)
                .with_max_attempts(RESUME_MAX_ATTEMPTS),
            fullscreen_settle: FULLSCREEN_SETTLE_DELAY,
        }
    }
}

/// What a single poll tick observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    PlayerUnavailable,
    Unchanged,
    StateChanged,
}

fn log_best_effort(operation: &str, target: &str, result: Result<(), ControlError>) {
    if let Err(err) = result {
        warn!("{} failed. target={} error={}", operation, target, err);
    }
}

/// Owns the resume state and the enrichment memo; nothing else mutates them.
pub struct ReconcileLoop<P, S> {
    player: P,
    store: S,
    state: ResumeState,
    memo: EnrichmentMemo,
    phase: LoopPhase,
    timings: LoopTimings,
}

impl<P: PlayerControl, S: ResumeStateStore> ReconcileLoop<P, S> {
    pub fn new(player: P, store: S, state: ResumeState, timings: LoopTimings) -> Self {
        Self {
            player,
            store,
            state,
            memo: EnrichmentMemo::default(),
            phase: LoopPhase::Starting,
            timings,
        }
    }

    /// Runs until the process is terminated.
    pub fn run(mut self) -> ! {
        loop {
            self.advance();
        }
    }

    /// Performs one state-machine transition. In `Polling` this is one full tick,
    /// including the wait that precedes it.
    pub fn advance(&mut self) {
        match self.phase {
            LoopPhase::Starting => {
                self.phase = if self.state.has_resume_item() {
                    LoopPhase::ResumingPlayback
                } else {
                    info!("Nothing to resume. Polling player.");
                    LoopPhase::Polling
                };
            }
            LoopPhase::ResumingPlayback => {
                self.resume_playback();
                self.phase = LoopPhase::Polling;
            }
            LoopPhase::Polling => {
                thread::sleep(self.timings.poll_interval);
                self.poll_once();
            }
        }
    }

    /// Replays the stored item and position into the player. Every step is best-effort.
    pub fn resume_playback(&mut self) {
        let item = self.state.playing.clone();
        let position = self.state.position;
        info!("Resuming playback. item={} position={}s", item, position);

        let player = &self.player;
        match retry_within(&self.timings.resume_retry, "start and play", || {
            player.start_and_play(&item)
        }) {
            Ok(()) => info!("Player accepted resume item. item={}", item),
            Err(exhausted) => warn!(
                "Giving up on starting {} after {} attempts: {}",
                item, exhausted.attempts, exhausted.last_error
            ),
        }

        log_best_effort("Seek", &item, self.player.seek(position));

        thread::sleep(self.timings.fullscreen_settle);
        log_best_effort("Toggle fullscreen", &item, self.player.toggle_fullscreen());

        self.enrich_and_skip(&item, position);
    }

    /// Reads the player once, converges the playlist and persists changes.
    pub fn poll_once(&mut self) -> PollOutcome {
        let now = match read_currently_playing(&self.player) {
            Ok(now) => now,
            Err(err) if err.is_transient() => {
                warn!("Reading player state failed, retrying next tick: {}", err);
                return PollOutcome::PlayerUnavailable;
            }
            Err(err) => {
                error!("Reading player state failed: {}", err);
                return PollOutcome::PlayerUnavailable;
            }
        };
        debug!(
            "Player state. location={} position={}s duration={}s",
            now.location, now.position_seconds, now.duration_seconds
        );

        self.enrich_and_skip(&now.location, now.position_seconds);

        if !self.state.differs_from(&now.location, now.position_seconds) {
            return PollOutcome::Unchanged;
        }
        self.state.playing = now.location;
        self.state.position = now.position_seconds;
        if let Err(err) = self.store.save(&self.state) {
            warn!("{}", err);
        }
        PollOutcome::StateChanged
    }

    fn enrich_and_skip(&mut self, location: &str, position: u32) {
        match enrich(&self.player, location, &mut self.memo) {
            Ok(EnrichmentOutcome::Appended(count)) if count > 0 => {
                info!("Queued {} sibling item(s) after {}", count, location);
            }
            Ok(_) => {}
            Err(err) => warn!("Enrichment failed. current={} error={}", location, err),
        }

        let action = skip_policy::decide(position, self.state.begin_skip, self.state.end_skip);
        if action != SkipAction::None {
            info!(
                "Applying skip. item={} position={}s action={:?}",
                location, position, action
            );
            log_best_effort("Skip", location, skip_policy::apply(&self.player, action));
        }
    }
}

#[cfg(test)]
impl<P: PlayerControl, S: ResumeStateStore> ReconcileLoop<P, S> {
    pub fn phase(&self) -> LoopPhase {
        self.phase
    }

    pub fn state(&self) -> &ResumeState {
        &self.state
    }

    pub fn memo(&self) -> &EnrichmentMemo {
        &self.memo
    }

    pub fn player(&self) -> &P {
        &self.player
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
