use crate::vitals::Vitals;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum PetKind {
    Red,
    Blue,
    Green,
    Hero,
    Dark,
}

/// Multipliers and additive terms applied on top of the baseline decay.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DecayProfile {
    pub happiness_scale: f32,
    pub fullness_scale: f32,
    pub sleep_scale: f32,
    pub health_extra: i32,
    pub starving_health_extra: i32,
}

impl Default for DecayProfile {
    fn default() -> Self {
        Self {
            happiness_scale: 1.0,
            fullness_scale: 1.0,
            sleep_scale: 1.0,
            health_extra: 0,
            starving_health_extra: 0,
        }
    }
}

impl PetKind {
    pub const BASIC: [PetKind; 3] = [PetKind::Red, PetKind::Blue, PetKind::Green];

    pub fn is_basic(self) -> bool {
        matches!(self, PetKind::Red | PetKind::Blue | PetKind::Green)
    }

    pub fn is_evolved(self) -> bool {
        !self.is_basic()
    }

    pub fn decay_profile(self) -> DecayProfile {
        let base = DecayProfile::default();
        match self {
            PetKind::Dark => DecayProfile {
                happiness_scale: 1.5,
                ..base
            },
            PetKind::Blue => DecayProfile {
                sleep_scale: 1.5,
                ..base
            },
            PetKind::Red => DecayProfile {
                fullness_scale: 1.5,
                ..base
            },
            PetKind::Hero => DecayProfile {
                happiness_scale: 0.5,
                ..base
            },
            PetKind::Green => DecayProfile {
                health_extra: 1,
                starving_health_extra: 2,
                ..base
            },
        }
    }
}

impl fmt::Display for PetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PetKind::Red => "red",
            PetKind::Blue => "blue",
            PetKind::Green => "green",
            PetKind::Hero => "hero",
            PetKind::Dark => "dark",
        };
        write!(f, "{}", label)
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum PetState {
    Normal,
    Sit,
    Sleeping,
    Happy,
    Angry,
    Hungry,
    Dead,
    Evolving,
}

impl PetState {
    /// Neither asleep nor dead.
    pub fn is_conscious(self) -> bool {
        !matches!(self, PetState::Sleeping | PetState::Dead)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Pet {
    pub(crate) name: String,
    pub(crate) kind: PetKind,
    pub(crate) alignment: i32,
    pub(crate) state: PetState,
    pub(crate) vitals: Vitals,
}

impl Pet {
    pub fn new(name: impl Into<String>, kind: PetKind) -> Self {
        Self {
            name: name.into(),
            kind,
            alignment: 0,
            state: PetState::Normal,
            vitals: Vitals::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> PetKind {
        self.kind
    }

    pub fn alignment(&self) -> i32 {
        self.alignment
    }

    pub fn state(&self) -> PetState {
        self.state
    }

    pub fn vitals(&self) -> &Vitals {
        &self.vitals
    }

    pub fn snapshot(&self) -> PetSnapshot {
        PetSnapshot {
            name: self.name.clone(),
            kind: self.kind,
            alignment: self.alignment,
            state: self.state,
            vitals: self.vitals,
        }
    }
}

/// Read-only copy handed to renderers and persistence.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PetSnapshot {
    pub name: String,
    pub kind: PetKind,
    pub alignment: i32,
    pub state: PetState,
    pub vitals: Vitals,
}

impl From<PetSnapshot> for Pet {
    fn from(s: PetSnapshot) -> Self {
        Self {
            name: s.name,
            kind: s.kind,
            alignment: s.alignment,
            state: s.state,
            vitals: s.vitals,
        }
    }
}
