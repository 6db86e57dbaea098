//! Item effect descriptors and the catalog that hands them out.
//!
//! The engine only ever sees an [`ItemEffect`]; names are resolved here, and
//! an unknown or mismatched name is a configuration error rather than a
//! gameplay denial.
use crate::error::CatalogError;
use crate::vitals::Vital;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Food,
    Fruit,
    Gift,
}

impl ItemKind {
    pub fn target(self) -> Vital {
        match self {
            ItemKind::Food | ItemKind::Fruit => Vital::Fullness,
            ItemKind::Gift => Vital::Happiness,
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ItemKind::Food => "food",
            ItemKind::Fruit => "fruit",
            ItemKind::Gift => "gift",
        };
        write!(f, "{}", label)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ItemEffect {
    target: Vital,
    value: i32,
    alignment_delta: i32,
}

impl ItemEffect {
    pub fn new(target: Vital, value: i32, alignment_delta: i32) -> Result<Self, CatalogError> {
        if value < 0 || !(-1..=1).contains(&alignment_delta) {
            return Err(CatalogError::InvalidEffect {
                value,
                alignment_delta,
            });
        }
        Ok(Self {
            target,
            value,
            alignment_delta,
        })
    }

    pub fn target(&self) -> Vital {
        self.target
    }

    pub fn value(&self) -> i32 {
        self.value
    }

    pub fn alignment_delta(&self) -> i32 {
        self.alignment_delta
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CatalogEntry {
    pub kind: ItemKind,
    pub value: i32,
    #[serde(default)]
    pub alignment_delta: i32,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct ItemCatalog {
    entries: BTreeMap<String, CatalogEntry>,
}

impl Default for ItemCatalog {
    fn default() -> Self {
        let mut entries = BTreeMap::new();
        let mut add = |name: &str, kind, value, alignment_delta| {
            entries.insert(
                name.to_string(),
                CatalogEntry {
                    kind,
                    value,
                    alignment_delta,
                },
            );
        };
        add("kibble", ItemKind::Food, 10, 0);
        add("burger", ItemKind::Food, 25, 0);
        add("cake", ItemKind::Food, 40, 0);
        add("golden apple", ItemKind::Fruit, 15, 1);
        add("shadow plum", ItemKind::Fruit, 15, -1);
        add("ball", ItemKind::Gift, 10, 0);
        add("plushie", ItemKind::Gift, 20, 0);
        add("crown", ItemKind::Gift, 35, 0);
        Self { entries }
    }
}

impl ItemCatalog {
    pub fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let catalog: Self = serde_json::from_str(json)?;
        for entry in catalog.entries.values() {
            ItemEffect::new(entry.kind.target(), entry.value, entry.alignment_delta)?;
        }
        Ok(catalog)
    }

    pub fn insert(&mut self, name: impl Into<String>, entry: CatalogEntry) -> Result<(), CatalogError> {
        ItemEffect::new(entry.kind.target(), entry.value, entry.alignment_delta)?;
        self.entries.insert(name.into(), entry);
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Result<(ItemKind, ItemEffect), CatalogError> {
        let entry = self
            .entries
            .get(name)
            .ok_or_else(|| CatalogError::UnknownItem(name.to_string()))?;
        let effect = ItemEffect::new(entry.kind.target(), entry.value, entry.alignment_delta)?;
        Ok((entry.kind, effect))
    }

    fn lookup_kind(&self, name: &str, expected: ItemKind) -> Result<ItemEffect, CatalogError> {
        let (actual, effect) = self.lookup(name)?;
        if actual != expected {
            return Err(CatalogError::WrongKind {
                name: name.to_string(),
                expected,
                actual,
            });
        }
        Ok(effect)
    }

    pub fn food(&self, name: &str) -> Result<ItemEffect, CatalogError> {
        self.lookup_kind(name, ItemKind::Food)
    }

    pub fn fruit(&self, name: &str) -> Result<ItemEffect, CatalogError> {
        self.lookup_kind(name, ItemKind::Fruit)
    }

    pub fn gift(&self, name: &str) -> Result<ItemEffect, CatalogError> {
        self.lookup_kind(name, ItemKind::Gift)
    }
}
