use crate::error::RulesError;
use chrono::Duration as ChronoDuration;
use serde::{Deserialize, Serialize};

/// Longest span any single rule may describe; keeps every deadline well
/// inside the range of `DateTime<Utc>`.
pub const MAX_SPAN_SECS: i64 = 366 * 24 * 3600;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Rules {
    pub decay_step_ms: u64,          // 5000ms typical
    pub resolve_step_ms: u64,        // 250ms typical
    pub sleep_recovery_step_ms: u64, // 500ms typical
    pub sleep_recovery_amount: i32,
    pub sleep_regen_on_decay: i32,
    pub command_cooldown_secs: i64,
    pub evolution_delay_ms: u64,
    pub settle_delay_ms: u64,
    pub happy_window_ms: u64,
    pub denial_window_ms: u64,
    pub catchup_max_secs: i64, // 7 days typical

    pub vet_heal: i32,
    pub play_joy: i32,
    pub exercise_heal: i32,
    pub exercise_cost: i32,
    pub affection_joy: i32,
    pub bonk_hurt: i32,

    pub base_decay: i32,
    pub starving_health_loss: i32,
    pub exhaustion_penalty: i32,
    pub anger_exit_happiness: i32,
    pub evolution_threshold: i32,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            decay_step_ms: 5000,
            resolve_step_ms: 250,
            sleep_recovery_step_ms: 500,
            sleep_recovery_amount: 2,
            sleep_regen_on_decay: 10,
            command_cooldown_secs: 60,
            evolution_delay_ms: 4000,
            settle_delay_ms: 2000,
            happy_window_ms: 1500,
            denial_window_ms: 1000,
            catchup_max_secs: 7 * 24 * 3600,

            vet_heal: 50,
            play_joy: 25,
            exercise_heal: 25,
            exercise_cost: 15,
            affection_joy: 3,
            bonk_hurt: 3,

            base_decay: 2,
            starving_health_loss: 5,
            exhaustion_penalty: 10,
            anger_exit_happiness: 50,
            evolution_threshold: 7,
        }
    }
}

impl Rules {
    pub fn validate(&self) -> Result<(), RulesError> {
        for (name, ms) in [
            ("decay_step_ms", self.decay_step_ms),
            ("resolve_step_ms", self.resolve_step_ms),
            ("sleep_recovery_step_ms", self.sleep_recovery_step_ms),
        ] {
            if ms == 0 {
                return Err(RulesError::ZeroInterval(name));
            }
        }
        for (name, ms) in [
            ("decay_step_ms", self.decay_step_ms),
            ("resolve_step_ms", self.resolve_step_ms),
            ("sleep_recovery_step_ms", self.sleep_recovery_step_ms),
            ("evolution_delay_ms", self.evolution_delay_ms),
            ("settle_delay_ms", self.settle_delay_ms),
            ("happy_window_ms", self.happy_window_ms),
            ("denial_window_ms", self.denial_window_ms),
        ] {
            let limit = MAX_SPAN_SECS * 1000;
            if ms > limit as u64 {
                return Err(RulesError::OutOfRange {
                    name,
                    value: i64::try_from(ms).unwrap_or(i64::MAX),
                    limit,
                });
            }
        }
        for (name, secs) in [
            ("command_cooldown_secs", self.command_cooldown_secs),
            ("catchup_max_secs", self.catchup_max_secs),
        ] {
            if !(0..=MAX_SPAN_SECS).contains(&secs) {
                return Err(RulesError::OutOfRange {
                    name,
                    value: secs,
                    limit: MAX_SPAN_SECS,
                });
            }
        }
        if self.resolve_step_ms >= self.decay_step_ms {
            return Err(RulesError::CadenceOrder {
                resolve_ms: self.resolve_step_ms,
                decay_ms: self.decay_step_ms,
            });
        }
        if self.evolution_threshold <= 0 {
            return Err(RulesError::Threshold(self.evolution_threshold));
        }
        Ok(())
    }

    pub fn decay_step(&self) -> ChronoDuration {
        millis(self.decay_step_ms)
    }

    pub fn resolve_step(&self) -> ChronoDuration {
        millis(self.resolve_step_ms)
    }

    pub fn sleep_recovery_step(&self) -> ChronoDuration {
        millis(self.sleep_recovery_step_ms)
    }

    pub fn cooldown(&self) -> ChronoDuration {
        secs(self.command_cooldown_secs)
    }

    pub fn catchup_max(&self) -> ChronoDuration {
        secs(self.catchup_max_secs)
    }

    pub fn evolution_delay(&self) -> ChronoDuration {
        millis(self.evolution_delay_ms)
    }

    pub fn settle_delay(&self) -> ChronoDuration {
        millis(self.settle_delay_ms)
    }

    pub fn happy_window(&self) -> ChronoDuration {
        millis(self.happy_window_ms)
    }

    pub fn denial_window(&self) -> ChronoDuration {
        millis(self.denial_window_ms)
    }
}

fn millis(ms: u64) -> ChronoDuration {
    let ms = i64::try_from(ms).unwrap_or(i64::MAX).min(MAX_SPAN_SECS * 1000);
    ChronoDuration::milliseconds(ms)
}

fn secs(secs: i64) -> ChronoDuration {
    ChronoDuration::seconds(secs.clamp(0, MAX_SPAN_SECS))
}
