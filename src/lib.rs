//! Simulation engine for a virtual pet.
//!
//! A [`Session`] owns one pet: its four clamped vitals, its type and
//! alignment, its behavioral state, and the per-pet bookkeeping (cooldowns,
//! reaction windows, sleep recovery, evolution). Hosts feed it player
//! [`Command`]s and drive the two cadences through a [`Scheduler`]; every
//! call takes the current time explicitly so the engine can run on
//! simulated clocks.
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`vitals`] | Happiness, health, fullness, sleep, clamped to 0..=100 |
//! | [`pet`] | Pet type, behavioral state, snapshots |
//! | [`item`] | Item effect descriptors and the item catalog |
//! | [`command`] | Player commands, gating, denials, cooldowns |
//! | [`decay`] | Natural decay with per-type modifiers |
//! | [`resolver`] | Priority-ordered state resolution |
//! | [`evolution`] | Alignment-driven evolution phases |
//! | [`session`] | The per-pet aggregate tying the above together |
//! | [`scheduler`] | Decay/resolution cadences and offline catch-up |
//! | [`rules`] | Tunable constants |

pub mod command;
pub mod decay;
pub mod error;
pub mod evolution;
pub mod item;
pub mod pet;
pub mod resolver;
pub mod rules;
pub mod scheduler;
pub mod session;
pub mod vitals;

pub use command::{Command, Denial, Outcome};
pub use error::{CatalogError, RulesError};
pub use item::{ItemCatalog, ItemEffect, ItemKind};
pub use pet::{Pet, PetKind, PetSnapshot, PetState};
pub use rules::Rules;
pub use scheduler::{catch_up, CatchupSummary, Scheduler};
pub use session::Session;
pub use vitals::{Vital, Vitals};
