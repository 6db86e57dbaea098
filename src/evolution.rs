//! Alignment-driven evolution as an explicit phase machine.
//!
//! A sequence is started by an edge crossing of the alignment threshold and
//! then advanced by deadline checks on the resolution tick:
//! `Transforming` (state EVOLVING) until the type swap, then `Reacting`
//! (HAPPY or ANGRY) until the pet settles back into a vitals-driven state.
use crate::pet::{Pet, PetKind, PetState};
use crate::rules::Rules;
use chrono::{DateTime, Utc};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Transforming {
        target: PetKind,
        ready_at: DateTime<Utc>,
    },
    Reacting {
        reaction: PetState,
        settle_at: DateTime<Utc>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EvolutionEvent {
    Transformed(PetKind),
    Settled,
}

/// Evolved form reached when alignment leaves the band `(-threshold, threshold)`.
pub fn crossing(before: i32, after: i32, threshold: i32) -> Option<PetKind> {
    if before.abs() >= threshold {
        return None;
    }
    if after >= threshold {
        Some(PetKind::Hero)
    } else if after <= -threshold {
        Some(PetKind::Dark)
    } else {
        None
    }
}

fn reaction_for(kind: PetKind) -> PetState {
    match kind {
        PetKind::Dark => PetState::Angry,
        _ => PetState::Happy,
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Evolution {
    phase: Option<Phase>,
}

impl Evolution {
    pub fn phase(&self) -> Option<Phase> {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.phase.is_some()
    }

    /// State the pet must show while the sequence runs.
    pub fn pinned_state(&self) -> Option<PetState> {
        match self.phase? {
            Phase::Transforming { .. } => Some(PetState::Evolving),
            Phase::Reacting { reaction, .. } => Some(reaction),
        }
    }

    /// Starts a sequence if the alignment change crossed the threshold.
    /// Returns the target form when one was started.
    pub fn try_begin(
        &mut self,
        kind: PetKind,
        before: i32,
        after: i32,
        now: DateTime<Utc>,
        rules: &Rules,
    ) -> Option<PetKind> {
        if self.is_active() || !kind.is_basic() {
            return None;
        }
        let target = crossing(before, after, rules.evolution_threshold)?;
        if target == kind {
            return None;
        }
        self.phase = Some(Phase::Transforming {
            target,
            ready_at: now + rules.evolution_delay(),
        });
        Some(target)
    }

    /// Moves the sequence forward by every deadline that has passed.
    pub fn advance(&mut self, pet: &mut Pet, now: DateTime<Utc>, rules: &Rules) -> Vec<EvolutionEvent> {
        let mut events = Vec::new();
        while let Some(phase) = self.phase {
            match phase {
                Phase::Transforming { target, ready_at } if now >= ready_at => {
                    pet.kind = target;
                    self.phase = Some(Phase::Reacting {
                        reaction: reaction_for(target),
                        settle_at: ready_at + rules.settle_delay(),
                    });
                    events.push(EvolutionEvent::Transformed(target));
                }
                Phase::Reacting { settle_at, .. } if now >= settle_at => {
                    self.phase = None;
                    events.push(EvolutionEvent::Settled);
                }
                _ => break,
            }
        }
        events
    }

    pub fn cancel(&mut self) -> bool {
        self.phase.take().is_some()
    }
}
