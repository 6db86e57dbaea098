//! Fixed-step drivers for the decay and resolution cadences.
//!
//! Each due tick is run at its own scheduled instant, in time order, with
//! decay ahead of resolution when both fall on the same instant.
use crate::pet::{PetKind, PetState};
use crate::resolver::Resolution;
use crate::session::Session;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tick {
    Decay,
    Resolve,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Scheduler {
    next_decay_at: DateTime<Utc>,
    next_resolve_at: DateTime<Utc>,
}

impl Scheduler {
    pub fn start(session: &Session, now: DateTime<Utc>) -> Self {
        let rules = session.rules();
        Self {
            next_decay_at: now + rules.decay_step(),
            next_resolve_at: now + rules.resolve_step(),
        }
    }

    pub fn next_due(&self) -> DateTime<Utc> {
        self.next_decay_at.min(self.next_resolve_at)
    }

    /// Runs every tick due at or before `now`. Returns the number run.
    pub fn advance(&mut self, session: &mut Session, now: DateTime<Utc>) -> u64 {
        self.advance_with(session, now, |_, _, _| true)
    }

    /// Like [`Scheduler::advance`], calling `on_tick` after each tick; the
    /// callback returns `false` to stop early.
    pub fn advance_with<F>(&mut self, session: &mut Session, now: DateTime<Utc>, mut on_tick: F) -> u64
    where
        F: FnMut(&Session, Tick, Resolution) -> bool,
    {
        let decay_step = session.rules().decay_step();
        let resolve_step = session.rules().resolve_step();
        let mut ran = 0;

        loop {
            let (tick, at) = if self.next_decay_at <= self.next_resolve_at {
                (Tick::Decay, self.next_decay_at)
            } else {
                (Tick::Resolve, self.next_resolve_at)
            };
            if at > now {
                break;
            }

            let r = match tick {
                Tick::Decay => {
                    self.next_decay_at = at + decay_step;
                    session.tick_decay(at)
                }
                Tick::Resolve => {
                    self.next_resolve_at = at + resolve_step;
                    session.tick_resolve(at)
                }
            };
            ran += 1;
            if !on_tick(session, tick, r) {
                break;
            }
        }
        ran
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CatchupSummary {
    pub ticks_simulated: u64,
    pub decay_ticks: u64,
    pub exhausted: u32,
    pub died: bool,
    pub evolved_to: Option<PetKind>,
    pub happiness_min: i32,
    pub health_min: i32,
    pub fullness_min: i32,
    pub sleep_min: i32,
}

impl CatchupSummary {
    pub fn new() -> Self {
        Self {
            ticks_simulated: 0,
            decay_ticks: 0,
            exhausted: 0,
            died: false,
            evolved_to: None,
            happiness_min: 100,
            health_min: 100,
            fullness_min: 100,
            sleep_min: 100,
        }
    }

    pub fn has_anything(&self) -> bool {
        self.decay_ticks > 0
            && (self.exhausted > 0
                || self.died
                || self.evolved_to.is_some()
                || self.happiness_min < 40
                || self.fullness_min < 40
                || self.health_min < 60)
    }

    fn record(&mut self, session: &Session, tick: Tick, r: Resolution, kind_before: PetKind) {
        let v = session.pet().vitals();
        self.ticks_simulated += 1;
        if tick == Tick::Decay {
            self.decay_ticks += 1;
        }
        self.happiness_min = self.happiness_min.min(v.happiness());
        self.health_min = self.health_min.min(v.health());
        self.fullness_min = self.fullness_min.min(v.fullness());
        self.sleep_min = self.sleep_min.min(v.sleep());
        if r.exhausted {
            self.exhausted += 1;
        }
        if r.state == PetState::Dead {
            self.died = true;
        }
        if session.pet().kind() != kind_before {
            self.evolved_to = Some(session.pet().kind());
        }
    }
}

impl Default for CatchupSummary {
    fn default() -> Self {
        Self::new()
    }
}

/// Replays the time a pet spent unattended, capped at `catchup_max_secs`.
pub fn catch_up(session: &mut Session, last_seen: DateTime<Utc>, now: DateTime<Utc>) -> CatchupSummary {
    let max_elapsed = session.rules().catchup_max();
    let elapsed = (now - last_seen).clamp(ChronoDuration::zero(), max_elapsed);
    let start = now - elapsed;

    let mut summary = CatchupSummary::new();
    let kind_before = session.pet().kind();
    let mut scheduler = Scheduler::start(session, start);
    scheduler.advance_with(session, now, |s, tick, r| {
        summary.record(s, tick, r, kind_before);
        r.state != PetState::Dead
    });

    tracing::info!(
        ticks = summary.ticks_simulated,
        died = summary.died,
        "caught up {}s of absence",
        elapsed.num_seconds()
    );
    summary
}
