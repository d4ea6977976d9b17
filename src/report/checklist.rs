//! Persistent record of which gaps have already been handled.
//!
//! The HTML report keeps its own copy of this in the browser's localStorage;
//! this store is the scraper-side equivalent so repeated runs can say how
//! much of the current report is already dealt with. Entries are keyed by
//! [`Gap::identity`] and are never pruned, so a gap that disappears from one
//! run and comes back in the next keeps its mark.

use anyhow::{Context, Result};
use std::{collections::BTreeMap, fs, path::PathBuf, sync::RwLock};

use crate::models::gap::Gap;

pub struct ChecklistStore {
    path: PathBuf,
    data: RwLock<BTreeMap<String, bool>>,
}

impl ChecklistStore {
    /// Open the checklist at `path`, starting empty if the file is missing
    /// or unreadable.
    pub fn open(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read checklist from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_default()
        } else {
            BTreeMap::new()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn is_handled(&self, id: &str) -> bool {
        self.data.read().unwrap().get(id).copied().unwrap_or(false)
    }

    pub fn set_handled(&self, id: &str, handled: bool) -> Result<()> {
        let mut guard = self.data.write().unwrap();
        guard.insert(id.to_string(), handled);
        self.persist(&guard)
    }

    /// Flip one entry, treating a missing entry as unhandled. Returns the
    /// new state.
    pub fn toggle(&self, id: &str) -> Result<bool> {
        let mut guard = self.data.write().unwrap();
        let next = !guard.get(id).copied().unwrap_or(false);
        guard.insert(id.to_string(), next);
        self.persist(&guard)?;
        Ok(next)
    }

    /// How many of the given gaps are marked handled.
    pub fn handled_count(&self, gaps: &[Gap]) -> usize {
        let guard = self.data.read().unwrap();
        gaps.iter()
            .filter(|gap| guard.get(&gap.identity()).copied().unwrap_or(false))
            .count()
    }

    pub fn all(&self) -> BTreeMap<String, bool> {
        self.data.read().unwrap().clone()
    }

    fn persist(&self, data: &BTreeMap<String, bool>) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write checklist to {}", self.path.display()))
    }
}
