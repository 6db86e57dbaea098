//! One pet and everything that is exclusively its own: cooldowns, the
//! evolution sequence, the transient reaction window and the sleep-recovery
//! timer. Every mutation goes through `&mut self`, so a session is the unit
//! of single-writer ownership.
use crate::command::{self, Command, Cooldowns, Denial, Outcome};
use crate::error::RulesError;
use crate::decay::natural_decay;
use crate::evolution::{Evolution, EvolutionEvent};
use crate::pet::{Pet, PetKind, PetSnapshot, PetState};
use crate::resolver::{next_state, ResolveInput, Resolution};
use crate::rules::Rules;
use crate::vitals::{Vital, VitalDeltas, MAX};
use chrono::{DateTime, Utc};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transient {
    pub state: PetState,
    pub until: DateTime<Utc>,
}

#[derive(Clone, Debug)]
pub struct Session {
    pet: Pet,
    rules: Rules,
    cooldowns: Cooldowns,
    evolution: Evolution,
    transient: Option<Transient>,
    next_recovery_at: Option<DateTime<Utc>>,
    /// Anger episode still open; survives sleep and evolution.
    angry: bool,
}

impl Session {
    /// Rejects rules that would stall the scheduler or overflow a deadline.
    pub fn new(pet: Pet, rules: Rules) -> Result<Self, RulesError> {
        rules.validate()?;
        Ok(Self {
            angry: pet.state == PetState::Angry,
            pet,
            rules,
            cooldowns: Cooldowns::default(),
            evolution: Evolution::default(),
            transient: None,
            next_recovery_at: None,
        })
    }

    /// Adopts a pet handed over by persistence as-is; the next resolution
    /// pass corrects anything inconsistent.
    pub fn restore(snapshot: PetSnapshot, rules: Rules) -> Result<Self, RulesError> {
        Self::new(snapshot.into(), rules)
    }

    pub fn pet(&self) -> &Pet {
        &self.pet
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn cooldowns(&self) -> &Cooldowns {
        &self.cooldowns
    }

    pub fn evolution(&self) -> &Evolution {
        &self.evolution
    }

    pub fn transient(&self) -> Option<Transient> {
        self.transient
    }

    pub fn snapshot(&self) -> PetSnapshot {
        self.pet.snapshot()
    }

    pub fn apply(&mut self, cmd: Command, now: DateTime<Utc>) -> Outcome {
        if let Err(denial) = self.admit(&cmd, now) {
            tracing::debug!(command = cmd.name(), %denial, "command denied");
            if matches!(denial, Denial::TooSoon { .. } | Denial::NotSleepy) {
                self.transient = Some(Transient {
                    state: PetState::Sit,
                    until: now + self.rules.denial_window(),
                });
            }
            return Outcome::Denied(denial);
        }

        let before = self.pet.alignment;
        let rules = &self.rules;
        let vitals = &mut self.pet.vitals;
        match cmd {
            Command::Sleep => {
                self.pet.state = PetState::Sleeping;
                self.next_recovery_at = Some(now + rules.sleep_recovery_step());
            }
            // The command decides the stat; a descriptor only carries amounts.
            Command::Feed(item) => vitals.adjust(Vital::Fullness, item.value()),
            Command::FeedSpecial(item) => {
                vitals.adjust(Vital::Fullness, item.value());
                self.pet.alignment = before.saturating_add(item.alignment_delta());
            }
            Command::Give(item) => vitals.adjust(Vital::Happiness, item.value()),
            Command::Vet => vitals.adjust(Vital::Health, rules.vet_heal),
            Command::Play => vitals.adjust(Vital::Happiness, rules.play_joy),
            Command::Exercise => vitals.update_all(VitalDeltas {
                happiness: 0,
                health: rules.exercise_heal,
                fullness: -rules.exercise_cost,
                sleep: -rules.exercise_cost,
            }),
            Command::Pet => {
                vitals.adjust(Vital::Happiness, rules.affection_joy);
                self.pet.alignment = before.saturating_add(1);
            }
            Command::Bonk => {
                vitals.adjust(Vital::Happiness, -rules.bonk_hurt);
                self.pet.alignment = before.saturating_sub(1);
            }
        }

        if let Some(gated) = cmd.gate().cooldown {
            self.cooldowns.stamp(gated, now);
        }

        self.transient = cmd.cheers().then(|| Transient {
            state: PetState::Happy,
            until: now + self.rules.happy_window(),
        });

        let after = self.pet.alignment;
        if let Some(target) = self
            .evolution
            .try_begin(self.pet.kind, before, after, now, &self.rules)
        {
            tracing::info!(name = %self.pet.name, from = %self.pet.kind, to = %target, "evolution started");
            self.transient = None;
        }

        self.resolve(now);
        Outcome::Applied
    }

    fn admit(&self, cmd: &Command, now: DateTime<Utc>) -> Result<(), Denial> {
        if self.evolution.is_active() {
            return Err(Denial::Evolving);
        }
        command::check(
            cmd,
            self.pet.state,
            self.pet.vitals.sleep(),
            &self.cooldowns,
            now,
            self.rules.cooldown(),
        )
    }

    /// Slow cadence: one natural-decay step, then resolution.
    pub fn tick_decay(&mut self, now: DateTime<Utc>) -> Resolution {
        if let Some(deltas) = natural_decay(&self.pet, &self.rules) {
            self.pet.vitals.update_all(deltas);
        }
        self.resolve(now)
    }

    /// Fast cadence: due sleep-recovery steps, due evolution phases, then
    /// resolution.
    pub fn tick_resolve(&mut self, now: DateTime<Utc>) -> Resolution {
        self.recover_sleep(now);

        for event in self.evolution.advance(&mut self.pet, now, &self.rules) {
            match event {
                EvolutionEvent::Transformed(kind) => {
                    tracing::info!(name = %self.pet.name, %kind, "evolved");
                }
                EvolutionEvent::Settled => {
                    tracing::debug!(name = %self.pet.name, "evolution settled");
                }
            }
        }

        self.resolve(now)
    }

    fn recover_sleep(&mut self, now: DateTime<Utc>) {
        if self.pet.state != PetState::Sleeping {
            self.next_recovery_at = None;
            return;
        }
        let step = self.rules.sleep_recovery_step();
        while let Some(at) = self.next_recovery_at {
            if now < at || self.pet.vitals.sleep() >= MAX {
                break;
            }
            self.pet
                .vitals
                .adjust(Vital::Sleep, self.rules.sleep_recovery_amount);
            self.next_recovery_at = Some(at + step);
        }
    }

    /// Aborts an in-flight evolution and any reaction window, then settles
    /// the pet into whatever its vitals justify.
    pub fn cancel_pending(&mut self, now: DateTime<Utc>) -> Resolution {
        if self.evolution.cancel() {
            tracing::info!(name = %self.pet.name, "evolution cancelled");
            if self.pet.state != PetState::Dead {
                self.pet.state = PetState::Normal;
            }
        }
        self.transient = None;
        self.resolve(now)
    }

    /// New game: a fresh pet with no timers or cooldowns carried over.
    pub fn reset(&mut self, name: impl Into<String>, kind: PetKind) {
        self.pet = Pet::new(name, kind);
        self.cooldowns.clear();
        self.evolution = Evolution::default();
        self.transient = None;
        self.next_recovery_at = None;
        self.angry = false;
    }

    fn resolve(&mut self, now: DateTime<Utc>) -> Resolution {
        if matches!(self.transient, Some(t) if now >= t.until) {
            self.transient = None;
        }

        let mut r = next_state(&ResolveInput {
            vitals: self.pet.vitals,
            current: self.pet.state,
            angry: self.angry,
            transient: self.transient.map(|t| t.state),
            evolution: self.evolution.pinned_state(),
            anger_exit: self.rules.anger_exit_happiness,
        });

        if r.exhausted {
            self.pet
                .vitals
                .adjust(Vital::Health, -self.rules.exhaustion_penalty);
            tracing::info!(name = %self.pet.name, health = self.pet.vitals.health(), "collapsed from exhaustion");
            if self.pet.vitals.is_dead() {
                r.state = PetState::Dead;
                r.angry = false;
            }
        }

        match r.state {
            PetState::Dead => {
                if self.pet.state != PetState::Dead {
                    tracing::info!(name = %self.pet.name, "pet died");
                }
                self.evolution.cancel();
                self.transient = None;
                self.next_recovery_at = None;
            }
            PetState::Sleeping => {
                if self.next_recovery_at.is_none() {
                    self.next_recovery_at = Some(now + self.rules.sleep_recovery_step());
                }
            }
            _ => self.next_recovery_at = None,
        }

        if r.state != self.pet.state {
            tracing::debug!(from = ?self.pet.state, to = ?r.state, "state changed");
        }
        self.angry = r.angry;
        self.pet.state = r.state;
        r
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::ItemCatalog;
    use crate::vitals::Vitals;
    use chrono::{Duration as ChronoDuration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
    }

    fn ms(n: i64) -> ChronoDuration {
        ChronoDuration::milliseconds(n)
    }

    fn session_with(vitals: Vitals, state: PetState) -> Session {
        let mut pet = Pet::new("Mochi", PetKind::Red);
        pet.vitals = vitals;
        pet.state = state;
        Session::new(pet, Rules::default()).unwrap()
    }

    #[test]
    fn denied_command_leaves_vitals_and_alignment() {
        let mut s = session_with(Vitals::new(0, 60, 60, 60), PetState::Angry);
        let before = (*s.pet().vitals(), s.pet().alignment());
        for cmd in [Command::Sleep, Command::Vet, Command::Exercise, Command::Pet] {
            let out = s.apply(cmd, t0());
            assert_eq!(out, Outcome::Denied(Denial::Uncooperative));
            assert_eq!((*s.pet().vitals(), s.pet().alignment()), before);
        }
        assert_eq!(s.pet().state(), PetState::Angry);
    }

    #[test]
    fn angry_pet_accepts_play_gift_and_bonk() {
        let mut s = session_with(Vitals::new(0, 60, 60, 60), PetState::Angry);
        let ball = ItemCatalog::default().gift("ball").unwrap();
        assert!(s.apply(Command::Play, t0()).is_applied());
        assert!(s.apply(Command::Give(ball), t0()).is_applied());
        assert!(s.apply(Command::Bonk, t0()).is_applied());
        assert_eq!(s.pet().vitals().happiness(), 25 + 10 - 3);
        assert_eq!(s.pet().alignment(), -1);
        assert_eq!(s.pet().state(), PetState::Angry);
    }

    #[test]
    fn item_stat_follows_the_command() {
        let cat = ItemCatalog::default();
        let cake = cat.food("cake").unwrap();
        let crown = cat.gift("crown").unwrap();

        let mut s = session_with(Vitals::new(0, 50, 10, 50), PetState::Angry);
        assert!(s.apply(Command::Give(cake), t0()).is_applied());
        assert_eq!(s.pet().vitals().fullness(), 10);
        assert_eq!(s.pet().vitals().happiness(), 40);

        let mut s = session_with(Vitals::new(20, 50, 10, 50), PetState::Normal);
        assert!(s.apply(Command::Feed(crown), t0()).is_applied());
        assert_eq!(s.pet().vitals().fullness(), 45);
        assert_eq!(s.pet().vitals().happiness(), 20);
    }

    #[test]
    fn denial_does_not_resolve() {
        let mut s = session_with(Vitals::new(60, 60, 60, 0), PetState::Normal);
        assert!(s.apply(Command::Play, t0()).is_applied());
        assert_eq!(s.pet().state(), PetState::Sleeping);
        let health = s.pet().vitals().health();

        // Put the pet back on its feet without resolving, then get refused.
        s.pet.state = PetState::Normal;
        let out = s.apply(Command::Play, t0() + ms(1000));
        assert!(matches!(out, Outcome::Denied(Denial::TooSoon { .. })));
        assert_eq!(s.pet().state(), PetState::Normal);
        assert_eq!(s.pet().vitals().health(), health);
    }

    #[test]
    fn anger_survives_evolution() {
        let mut s = session_with(Vitals::new(10, 80, 80, 80), PetState::Angry);
        s.pet.alignment = -6;
        assert!(s.apply(Command::Bonk, t0()).is_applied());
        assert_eq!(s.pet().state(), PetState::Evolving);
        s.tick_resolve(t0() + ms(4000));
        s.tick_resolve(t0() + ms(6000));
        assert_eq!(s.pet().kind(), PetKind::Dark);
        assert_eq!(s.pet().vitals().happiness(), 7);
        assert_eq!(s.pet().state(), PetState::Angry);
    }

    #[test]
    fn anger_survives_sleep() {
        let mut s = session_with(Vitals::new(30, 80, 80, 0), PetState::Angry);
        s.tick_resolve(t0());
        assert_eq!(s.pet().state(), PetState::Sleeping);
        for step in 1..=100 {
            s.tick_resolve(t0() + ms(500 * step));
        }
        assert_eq!(s.pet().vitals().sleep(), 100);
        assert_eq!(s.pet().state(), PetState::Angry);
    }

    #[test]
    fn unusable_rules_are_rejected() {
        let rules = Rules {
            resolve_step_ms: 0,
            ..Rules::default()
        };
        assert!(Session::new(Pet::new("Mochi", PetKind::Red), rules).is_err());

        let rules = Rules {
            command_cooldown_secs: i64::MAX / 10,
            ..Rules::default()
        };
        assert!(matches!(
            Session::new(Pet::new("Mochi", PetKind::Red), rules),
            Err(RulesError::OutOfRange { name: "command_cooldown_secs", .. })
        ));
    }

    #[test]
    fn vet_cooldown_is_not_consumed_by_denial() {
        let mut s = session_with(Vitals::new(60, 20, 60, 60), PetState::Normal);
        assert!(s.apply(Command::Vet, t0()).is_applied());
        assert_eq!(s.pet().vitals().health(), 70);

        let out = s.apply(Command::Vet, t0() + ChronoDuration::seconds(30));
        assert!(matches!(out, Outcome::Denied(Denial::TooSoon { .. })));
        assert_eq!(s.pet().vitals().health(), 70);

        assert!(s.apply(Command::Vet, t0() + ChronoDuration::seconds(60)).is_applied());
        assert_eq!(s.pet().vitals().health(), 100);
    }

    #[test]
    fn too_soon_shows_sit_briefly() {
        let mut s = session_with(Vitals::new(60, 60, 60, 60), PetState::Normal);
        let _ = s.apply(Command::Play, t0());
        let _ = s.apply(Command::Play, t0() + ms(2000));
        assert_eq!(s.transient().map(|t| t.state), Some(PetState::Sit));
        s.tick_resolve(t0() + ms(2250));
        assert_eq!(s.pet().state(), PetState::Sit);
        s.tick_resolve(t0() + ms(3000));
        assert_eq!(s.pet().state(), PetState::Normal);
    }

    #[test]
    fn feed_raises_fullness_and_shows_happy() {
        let mut s = session_with(Vitals::new(60, 60, 0, 60), PetState::Hungry);
        let kibble = ItemCatalog::default().food("kibble").unwrap();
        assert!(s.apply(Command::Feed(kibble), t0()).is_applied());
        assert_eq!(s.pet().vitals().fullness(), 10);
        assert_eq!(s.pet().state(), PetState::Happy);
        s.tick_resolve(t0() + ms(1500));
        assert_eq!(s.pet().state(), PetState::Normal);
    }

    #[test]
    fn fruit_moves_alignment() {
        let mut s = session_with(Vitals::default(), PetState::Normal);
        let cat = ItemCatalog::default();
        let _ = s.apply(Command::FeedSpecial(cat.fruit("shadow plum").unwrap()), t0());
        assert_eq!(s.pet().alignment(), -1);
        let _ = s.apply(Command::FeedSpecial(cat.fruit("golden apple").unwrap()), t0());
        assert_eq!(s.pet().alignment(), 0);
    }

    #[test]
    fn exercise_applies_all_three_deltas() {
        let mut s = session_with(Vitals::new(50, 50, 50, 50), PetState::Normal);
        assert!(s.apply(Command::Exercise, t0()).is_applied());
        assert_eq!(*s.pet().vitals(), Vitals::new(50, 75, 35, 35));
    }

    #[test]
    fn sleep_command_recovers_and_wakes() {
        let mut s = session_with(Vitals::new(60, 60, 60, 96), PetState::Normal);
        assert!(s.apply(Command::Sleep, t0()).is_applied());
        assert_eq!(s.pet().state(), PetState::Sleeping);
        assert_eq!(s.apply(Command::Bonk, t0()), Outcome::Denied(Denial::Unresponsive));

        s.tick_resolve(t0() + ms(500));
        assert_eq!(s.pet().vitals().sleep(), 98);
        assert_eq!(s.pet().state(), PetState::Sleeping);
        s.tick_resolve(t0() + ms(1000));
        assert_eq!(s.pet().vitals().sleep(), 100);
        assert_eq!(s.pet().state(), PetState::Normal);
        assert_eq!(s.pet().vitals().health(), 60);
    }

    #[test]
    fn rested_pet_is_not_sleepy() {
        let mut s = session_with(Vitals::default(), PetState::Normal);
        assert_eq!(s.apply(Command::Sleep, t0()), Outcome::Denied(Denial::NotSleepy));
    }

    #[test]
    fn exhaustion_penalty_charged_once() {
        let mut s = session_with(Vitals::new(80, 80, 80, 10), PetState::Normal);
        let _ = s.apply(Command::Exercise, t0());
        assert_eq!(s.pet().state(), PetState::Sleeping);
        assert_eq!(s.pet().vitals().health(), 100 - 10);

        s.tick_decay(t0() + ms(100));
        s.tick_resolve(t0() + ms(250));
        assert_eq!(s.pet().vitals().health(), 90);
    }

    #[test]
    fn exhaustion_can_kill() {
        let mut s = session_with(Vitals::new(80, 5, 80, 1), PetState::Normal);
        s.tick_decay(t0());
        assert_eq!(s.pet().vitals().sleep(), 0);
        assert!(s.pet().vitals().is_dead());
        assert_eq!(s.pet().state(), PetState::Dead);
    }

    #[test]
    fn evolution_blocks_every_command_until_settled() {
        let mut s = session_with(Vitals::default(), PetState::Normal);
        s.pet.alignment = 6;
        let _ = s.apply(Command::Pet, t0());
        assert_eq!(s.pet().state(), PetState::Evolving);
        assert_eq!(s.apply(Command::Bonk, t0()), Outcome::Denied(Denial::Evolving));
        assert_eq!(s.pet().alignment(), 7);

        s.tick_resolve(t0() + ms(4000));
        assert_eq!(s.pet().kind(), PetKind::Hero);
        assert_eq!(s.pet().state(), PetState::Happy);
        assert_eq!(s.apply(Command::Play, t0() + ms(4500)), Outcome::Denied(Denial::Evolving));

        s.tick_resolve(t0() + ms(6000));
        assert_eq!(s.pet().state(), PetState::Normal);
        assert!(s.apply(Command::Play, t0() + ms(6250)).is_applied());
    }

    #[test]
    fn dark_reaction_does_not_linger_as_anger() {
        let mut s = session_with(Vitals::new(30, 80, 80, 80), PetState::Normal);
        s.pet.alignment = -6;
        let _ = s.apply(Command::Bonk, t0());
        s.tick_resolve(t0() + ms(4000));
        assert_eq!(s.pet().state(), PetState::Angry);
        s.tick_resolve(t0() + ms(6000));
        assert_eq!(s.pet().kind(), PetKind::Dark);
        assert_eq!(s.pet().state(), PetState::Normal);
    }

    #[test]
    fn cancel_before_swap_leaves_type_and_clears_evolving() {
        let mut s = session_with(Vitals::default(), PetState::Normal);
        s.pet.alignment = 6;
        let _ = s.apply(Command::Pet, t0());
        s.cancel_pending(t0() + ms(1000));
        assert_eq!(s.pet().kind(), PetKind::Red);
        assert_eq!(s.pet().state(), PetState::Normal);
        s.tick_resolve(t0() + ms(10_000));
        assert_eq!(s.pet().kind(), PetKind::Red);
    }

    #[test]
    fn death_cancels_pending_evolution() {
        let mut s = session_with(Vitals::new(80, 1, 0, 80), PetState::Normal);
        s.pet.alignment = 6;
        let _ = s.apply(Command::Pet, t0());
        assert_eq!(s.pet().state(), PetState::Evolving);
        s.tick_decay(t0() + ms(1000));
        assert_eq!(s.pet().state(), PetState::Dead);
        assert!(!s.evolution().is_active());
        s.tick_resolve(t0() + ms(10_000));
        assert_eq!(s.pet().kind(), PetKind::Red);
    }

    #[test]
    fn restore_corrects_inconsistent_state() {
        let snap = PetSnapshot {
            name: "Ghost".into(),
            kind: PetKind::Blue,
            alignment: 3,
            state: PetState::Dead,
            vitals: Vitals::default(),
        };
        let mut s = Session::restore(snap, Rules::default()).unwrap();
        assert_eq!(s.pet().state(), PetState::Dead);
        s.tick_resolve(t0());
        assert_eq!(s.pet().state(), PetState::Normal);
    }

    #[test]
    fn reset_starts_over() {
        let mut s = session_with(Vitals::new(10, 10, 10, 10), PetState::Angry);
        let _ = s.apply(Command::Play, t0());
        s.reset("Pip", PetKind::Green);
        assert_eq!(s.pet().name(), "Pip");
        assert_eq!(*s.pet().vitals(), Vitals::default());
        assert!(s.apply(Command::Play, t0()).is_applied());
    }
}
