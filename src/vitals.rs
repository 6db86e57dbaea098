//! The four bounded vital statistics.
//!
//! Every write path clamps to `[MIN, MAX]`; out-of-range input is never an
//! error, it is silently pulled back into range.
use serde::{Deserialize, Serialize};

pub const MIN: i32 = 0;
pub const MAX: i32 = 100;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Vital {
    Happiness,
    Health,
    Fullness,
    Sleep,
}

/// One delta per vital, applied together by [`Vitals::update_all`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VitalDeltas {
    pub happiness: i32,
    pub health: i32,
    pub fullness: i32,
    pub sleep: i32,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(from = "RawVitals")]
pub struct Vitals {
    happiness: i32,
    health: i32,
    fullness: i32,
    sleep: i32,
}

#[derive(Deserialize)]
struct RawVitals {
    happiness: i32,
    health: i32,
    fullness: i32,
    sleep: i32,
}

impl From<RawVitals> for Vitals {
    fn from(raw: RawVitals) -> Self {
        Self::new(raw.happiness, raw.health, raw.fullness, raw.sleep)
    }
}

impl Default for Vitals {
    fn default() -> Self {
        Self {
            happiness: MAX,
            health: MAX,
            fullness: MAX,
            sleep: MAX,
        }
    }
}

fn clamp(v: i32) -> i32 {
    v.clamp(MIN, MAX)
}

impl Vitals {
    pub fn new(happiness: i32, health: i32, fullness: i32, sleep: i32) -> Self {
        let mut v = Self::default();
        v.set_all(happiness, health, fullness, sleep);
        v
    }

    pub fn happiness(&self) -> i32 {
        self.happiness
    }

    pub fn health(&self) -> i32 {
        self.health
    }

    pub fn fullness(&self) -> i32 {
        self.fullness
    }

    pub fn sleep(&self) -> i32 {
        self.sleep
    }

    pub fn get(&self, field: Vital) -> i32 {
        match field {
            Vital::Happiness => self.happiness,
            Vital::Health => self.health,
            Vital::Fullness => self.fullness,
            Vital::Sleep => self.sleep,
        }
    }

    fn slot(&mut self, field: Vital) -> &mut i32 {
        match field {
            Vital::Happiness => &mut self.happiness,
            Vital::Health => &mut self.health,
            Vital::Fullness => &mut self.fullness,
            Vital::Sleep => &mut self.sleep,
        }
    }

    pub fn adjust(&mut self, field: Vital, delta: i32) {
        let slot = self.slot(field);
        *slot = clamp(slot.saturating_add(delta));
    }

    pub fn set_all(&mut self, happiness: i32, health: i32, fullness: i32, sleep: i32) {
        self.happiness = clamp(happiness);
        self.health = clamp(health);
        self.fullness = clamp(fullness);
        self.sleep = clamp(sleep);
    }

    pub fn update_all(&mut self, d: VitalDeltas) {
        self.set_all(
            self.happiness.saturating_add(d.happiness),
            self.health.saturating_add(d.health),
            self.fullness.saturating_add(d.fullness),
            self.sleep.saturating_add(d.sleep),
        );
    }

    pub fn is_dead(&self) -> bool {
        self.health <= MIN
    }
}
