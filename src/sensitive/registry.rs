//! Registry of sensitive-detector associations keyed by system name.
//!
//! An entry is created when a system is constructed (stage `Unset`, no
//! behavior object). The geometry-construction phase attaches the behavior
//! object later; until then stage changes are only recorded.

use crate::error::{Result, SystemError};
use crate::sensitive::{ArfStage, StageTarget};
use std::collections::BTreeMap;

struct RegistryEntry {
    target: Option<Box<dyn StageTarget>>,
    stage: ArfStage,
}

/// System name → (behavior object, current stage).
#[derive(Default)]
pub struct SensitiveDetectorRegistry {
    entries: BTreeMap<String, RegistryEntry>,
}

impl std::fmt::Debug for SensitiveDetectorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut map = f.debug_map();
        for (name, entry) in &self.entries {
            map.entry(name, &(entry.stage, entry.target.is_some()));
        }
        map.finish()
    }
}

impl SensitiveDetectorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Registered system names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Create the entry for `name` with no behavior object yet.
    pub fn register_pending(&mut self, name: &str, initial: ArfStage) -> Result<()> {
        if self.entries.contains_key(name) {
            return Err(SystemError::DuplicateSystem(name.to_string()));
        }
        self.entries.insert(
            name.to_string(),
            RegistryEntry {
                target: None,
                stage: initial,
            },
        );
        tracing::debug!("Registered pending sensitive detector for '{}'", name);
        Ok(())
    }

    /// Attach the behavior object for `name`, replacing any previous one.
    ///
    /// The new object is immediately put in the recorded stage unless that
    /// stage is still `Unset`.
    pub fn attach(&mut self, name: &str, mut target: Box<dyn StageTarget>) -> Result<()> {
        let entry = self
            .entries
            .get_mut(name)
            .ok_or_else(|| SystemError::UnknownSystem(name.to_string()))?;

        if entry.stage != ArfStage::Unset {
            target.set_stage(entry.stage);
        }
        if entry.target.replace(target).is_some() {
            tracing::warn!("Replaced sensitive detector attached to '{}'", name);
        } else {
            tracing::debug!("Attached sensitive detector to '{}'", name);
        }
        Ok(())
    }

    /// Remove and return the behavior object for `name`.
    pub fn detach(&mut self, name: &str) -> Option<Box<dyn StageTarget>> {
        self.entries.get_mut(name).and_then(|e| e.target.take())
    }

    pub fn lookup(&self, name: &str) -> Option<&dyn StageTarget> {
        self.entries.get(name).and_then(|e| e.target.as_deref())
    }

    pub fn lookup_mut(&mut self, name: &str) -> Option<&mut (dyn StageTarget + 'static)> {
        self.entries.get_mut(name).and_then(|e| e.target.as_deref_mut())
    }

    pub fn current_stage(&self, name: &str) -> Option<ArfStage> {
        self.entries.get(name).map(|e| e.stage)
    }

    /// Record `stage` for `name` and forward it to the behavior object.
    ///
    /// Returns whether a behavior object received the stage. Invalid stages
    /// are forwarded too.
    pub fn record_stage(&mut self, name: &str, stage: ArfStage) -> Result<bool> {
        let entry = self
            .entries
            .get_mut(name)
            .ok_or_else(|| SystemError::UnknownSystem(name.to_string()))?;

        entry.stage = stage;
        match entry.target.as_deref_mut() {
            Some(target) => {
                target.set_stage(stage);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
