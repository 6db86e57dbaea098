//! Priority-ordered state resolution.
//!
//! Highest first: death, an in-flight evolution, sleep, a live transient
//! reaction (unless anger preempts it), anger with hysteresis, hunger, normal.
use crate::pet::PetState;
use crate::vitals::{Vitals, MAX, MIN};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResolveInput {
    pub vitals: Vitals,
    pub current: PetState,
    /// An anger episode is open, so the exit threshold applies instead of
    /// the entry one. Held by the caller across sleep and evolution.
    pub angry: bool,
    /// Reaction still inside its display window.
    pub transient: Option<PetState>,
    /// State pinned by an evolution sequence.
    pub evolution: Option<PetState>,
    pub anger_exit: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Resolution {
    pub state: PetState,
    /// Sleep just bottomed out and forced the pet under.
    pub exhausted: bool,
    /// Sleep refilled and the pet woke this pass.
    pub woke: bool,
    /// Anger episode carried into the next pass.
    pub angry: bool,
}

fn is_angry(vitals: &Vitals, latched: bool, anger_exit: i32) -> bool {
    if latched {
        vitals.happiness() < anger_exit
    } else {
        vitals.happiness() <= MIN
    }
}

pub fn next_state(input: &ResolveInput) -> Resolution {
    let v = &input.vitals;
    let mut out = Resolution {
        state: PetState::Normal,
        exhausted: false,
        woke: false,
        angry: input.angry,
    };

    if v.is_dead() {
        out.state = PetState::Dead;
        out.angry = false;
        return out;
    }

    if let Some(pinned) = input.evolution {
        out.state = pinned;
        return out;
    }

    if input.current == PetState::Sleeping {
        if v.sleep() < MAX {
            out.state = PetState::Sleeping;
            return out;
        }
        out.woke = true;
    } else if v.sleep() <= MIN {
        out.state = PetState::Sleeping;
        out.exhausted = true;
        return out;
    }

    let angry = is_angry(v, input.angry, input.anger_exit);
    out.angry = angry;

    if let Some(t) = input.transient {
        out.state = if angry { PetState::Angry } else { t };
        return out;
    }

    out.state = if angry {
        PetState::Angry
    } else if v.fullness() <= MIN {
        PetState::Hungry
    } else {
        PetState::Normal
    };
    out
}
