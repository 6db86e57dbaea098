use crate::config::atomic_rename;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use pocketpet::PetSnapshot;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

pub(crate) const SAVE_VERSION: u32 = 1;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub(crate) struct SaveFile {
    pub(crate) version: u32,
    pub(crate) last_seen_utc: DateTime<Utc>,
    pub(crate) pet: PetSnapshot,
}

pub(crate) fn load_save(path: &Path) -> Result<Option<SaveFile>> {
    if !path.exists() {
        return Ok(None);
    }
    let s = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    match serde_json::from_str::<SaveFile>(&s) {
        Ok(save) if save.version == SAVE_VERSION => Ok(Some(save)),
        Ok(save) => {
            tracing::warn!(version = save.version, "unsupported save version, starting fresh");
            Ok(None)
        }
        Err(err) => {
            tracing::warn!(%err, "corrupt save file, starting fresh");
            Ok(None)
        }
    }
}

pub(crate) fn save_atomic(path: &Path, save: &SaveFile) -> Result<()> {
    let tmp = path.with_extension("json.tmp");
    let data = serde_json::to_vec_pretty(save)?;
    fs::write(&tmp, data)?;
    atomic_rename(&tmp, path)?;
    Ok(())
}
