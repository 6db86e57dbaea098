//! Player commands, their gating table, and the per-pet cooldown store.
use crate::item::ItemEffect;
use crate::pet::PetState;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Sleep,
    Feed(ItemEffect),
    FeedSpecial(ItemEffect),
    Give(ItemEffect),
    Vet,
    Play,
    Exercise,
    Pet,
    Bonk,
}

/// Commands that share the one-minute cooldown.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Gated {
    Vet,
    Play,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Gate {
    pub requires_calm: bool,
    pub cooldown: Option<Gated>,
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Sleep => "sleep",
            Command::Feed(_) => "feed",
            Command::FeedSpecial(_) => "feed-special",
            Command::Give(_) => "give",
            Command::Vet => "vet",
            Command::Play => "play",
            Command::Exercise => "exercise",
            Command::Pet => "pet",
            Command::Bonk => "bonk",
        }
    }

    pub fn gate(&self) -> Gate {
        let (requires_calm, cooldown) = match self {
            Command::Sleep => (true, None),
            Command::Feed(_) => (true, None),
            Command::FeedSpecial(_) => (true, None),
            Command::Give(_) => (false, None),
            Command::Vet => (true, Some(Gated::Vet)),
            Command::Play => (false, Some(Gated::Play)),
            Command::Exercise => (true, None),
            Command::Pet => (true, None),
            Command::Bonk => (false, None),
        };
        Gate {
            requires_calm,
            cooldown,
        }
    }

    /// Successful commands that put the pet in a brief good mood.
    pub fn cheers(&self) -> bool {
        matches!(
            self,
            Command::Feed(_) | Command::FeedSpecial(_) | Command::Give(_) | Command::Play | Command::Pet
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Denial {
    Unresponsive,
    Uncooperative,
    TooSoon { remaining: ChronoDuration },
    NotSleepy,
    Evolving,
}

impl Denial {
    pub fn reason(&self) -> &'static str {
        match self {
            Denial::Unresponsive => "is unresponsive",
            Denial::Uncooperative => "is being uncooperative",
            Denial::TooSoon { .. } => "too soon",
            Denial::NotSleepy => "is not sleepy",
            Denial::Evolving => "is evolving",
        }
    }
}

impl fmt::Display for Denial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Denial::TooSoon { remaining } => {
                write!(f, "too soon ({}s left)", remaining.num_seconds().max(1))
            }
            other => write!(f, "{}", other.reason()),
        }
    }
}

#[must_use]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    Denied(Denial),
}

impl Outcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied)
    }

    pub fn denial(&self) -> Option<Denial> {
        match self {
            Outcome::Applied => None,
            Outcome::Denied(d) => Some(*d),
        }
    }
}

/// Last successful use of each gated command, owned by one pet.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Cooldowns {
    last: BTreeMap<Gated, DateTime<Utc>>,
}

impl Cooldowns {
    pub fn remaining(&self, cmd: Gated, now: DateTime<Utc>, cooldown: ChronoDuration) -> Option<ChronoDuration> {
        let last = self.last.get(&cmd)?;
        let ready_at = *last + cooldown;
        (now < ready_at).then(|| ready_at - now)
    }

    pub fn stamp(&mut self, cmd: Gated, now: DateTime<Utc>) {
        self.last.insert(cmd, now);
    }

    pub fn clear(&mut self) {
        self.last.clear();
    }
}

/// Runs the gating chain in order: consciousness, calm, cooldown, then any
/// command-specific precondition.
pub(crate) fn check(
    cmd: &Command,
    state: PetState,
    sleep: i32,
    cooldowns: &Cooldowns,
    now: DateTime<Utc>,
    cooldown: ChronoDuration,
) -> Result<(), Denial> {
    if state == PetState::Evolving {
        return Err(Denial::Evolving);
    }
    if !state.is_conscious() {
        return Err(Denial::Unresponsive);
    }
    let gate = cmd.gate();
    if gate.requires_calm && state == PetState::Angry {
        return Err(Denial::Uncooperative);
    }
    if let Some(g) = gate.cooldown {
        if let Some(remaining) = cooldowns.remaining(g, now, cooldown) {
            return Err(Denial::TooSoon { remaining });
        }
    }
    if matches!(cmd, Command::Sleep) && sleep >= crate::vitals::MAX {
        return Err(Denial::NotSleepy);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn anger_blocks_only_calm_commands() {
        let cd = Cooldowns::default();
        let minute = ChronoDuration::seconds(60);
        let blocked = [Command::Sleep, Command::Vet, Command::Exercise, Command::Pet];
        for cmd in blocked {
            assert_eq!(
                check(&cmd, PetState::Angry, 50, &cd, t0(), minute),
                Err(Denial::Uncooperative),
                "{}",
                cmd.name()
            );
        }
        for cmd in [Command::Play, Command::Bonk] {
            assert!(check(&cmd, PetState::Angry, 50, &cd, t0(), minute).is_ok());
        }
    }

    #[test]
    fn unconscious_beats_anger_and_cooldown() {
        let mut cd = Cooldowns::default();
        cd.stamp(Gated::Vet, t0());
        let minute = ChronoDuration::seconds(60);
        assert_eq!(
            check(&Command::Vet, PetState::Sleeping, 50, &cd, t0(), minute),
            Err(Denial::Unresponsive)
        );
        assert_eq!(
            check(&Command::Bonk, PetState::Dead, 50, &cd, t0(), minute),
            Err(Denial::Unresponsive)
        );
    }

    #[test]
    fn evolving_blocks_everything() {
        let cd = Cooldowns::default();
        let minute = ChronoDuration::seconds(60);
        for cmd in [Command::Bonk, Command::Play, Command::Sleep] {
            assert_eq!(
                check(&cmd, PetState::Evolving, 50, &cd, t0(), minute),
                Err(Denial::Evolving)
            );
        }
    }

    #[test]
    fn cooldown_window() {
        let mut cd = Cooldowns::default();
        let minute = ChronoDuration::seconds(60);
        cd.stamp(Gated::Play, t0());
        let later = t0() + ChronoDuration::seconds(59);
        assert!(cd.remaining(Gated::Play, later, minute).is_some());
        assert!(cd.remaining(Gated::Vet, later, minute).is_none());
        assert!(cd.remaining(Gated::Play, t0() + minute, minute).is_none());
    }

    #[test]
    fn full_pet_is_not_sleepy() {
        let cd = Cooldowns::default();
        let minute = ChronoDuration::seconds(60);
        assert_eq!(
            check(&Command::Sleep, PetState::Normal, 100, &cd, t0(), minute),
            Err(Denial::NotSleepy)
        );
    }

    #[test]
    fn denial_display() {
        let d = Denial::TooSoon {
            remaining: ChronoDuration::seconds(42),
        };
        assert_eq!(d.to_string(), "too soon (42s left)");
        assert_eq!(d.reason(), "too soon");
        assert_eq!(Denial::Uncooperative.to_string(), "is being uncooperative");
    }
}
