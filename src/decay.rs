//! Natural decay applied on the slow cadence.
use crate::pet::{Pet, PetState};
use crate::rules::Rules;
use crate::vitals::{VitalDeltas, MIN};

/// Deltas for one decay step, or `None` once the pet is dead.
pub fn natural_decay(pet: &Pet, rules: &Rules) -> Option<VitalDeltas> {
    if pet.vitals.is_dead() {
        return None;
    }

    let profile = pet.kind.decay_profile();
    let base = rules.base_decay as f32;

    let mut happiness_loss = base * profile.happiness_scale;
    let fullness_loss = base * profile.fullness_scale;
    let sleep_loss = base * profile.sleep_scale;
    let mut health_loss = profile.health_extra;

    if pet.vitals.fullness() <= MIN {
        happiness_loss *= 2.0;
        health_loss += rules.starving_health_loss + profile.starving_health_extra;
    }

    let sleep = if pet.state == PetState::Sleeping {
        rules.sleep_regen_on_decay
    } else {
        -(sleep_loss.round() as i32)
    };

    Some(VitalDeltas {
        happiness: -(happiness_loss.round() as i32),
        health: -health_loss,
        fullness: -(fullness_loss.round() as i32),
        sleep,
    })
}
