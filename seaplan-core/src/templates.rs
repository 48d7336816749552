//! Saved voyage templates.
//!
//! Templates are whole [`VoyageSnapshot`]s kept in one ordered list. Names do
//! not have to be unique, so entries are addressed by their 1-based position.
use serde_json::Value;

use crate::constants::DEFAULT_TEMPLATE_NAME;
use crate::summary::VoyageSnapshot;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TemplateLibrary {
    entries: Vec<VoyageSnapshot>,
}

impl TemplateLibrary {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Read a stored list. Anything that is not a JSON array reads as empty and
    /// entries that no longer parse as snapshots are skipped.
    #[must_use]
    pub fn from_json(raw: &str) -> Self {
        let Ok(Value::Array(items)) = serde_json::from_str::<Value>(raw) else {
            if !raw.trim().is_empty() {
                log::warn!("saved templates are not a JSON list; starting empty");
            }
            return Self::new();
        };
        let entries = items
            .into_iter()
            .enumerate()
            .filter_map(|(idx, item)| match serde_json::from_value(item) {
                Ok(snapshot) => Some(snapshot),
                Err(err) => {
                    log::warn!("skipping saved template #{}: {err}", idx + 1);
                    None
                }
            })
            .collect();
        Self { entries }
    }

    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.entries)
    }

    /// Append a template and return its position. A blank name becomes the default.
    pub fn save(&mut self, mut snapshot: VoyageSnapshot) -> usize {
        let name = snapshot.name.trim();
        snapshot.name = if name.is_empty() {
            DEFAULT_TEMPLATE_NAME.to_string()
        } else {
            name.to_string()
        };
        log::debug!("saving voyage template {:?}", snapshot.name);
        self.entries.push(snapshot);
        self.entries.len()
    }

    #[must_use]
    pub fn get(&self, position: usize) -> Option<&VoyageSnapshot> {
        position
            .checked_sub(1)
            .and_then(|idx| self.entries.get(idx))
    }

    pub fn remove(&mut self, position: usize) -> Option<VoyageSnapshot> {
        let idx = position.checked_sub(1).filter(|idx| *idx < self.entries.len())?;
        Some(self.entries.remove(idx))
    }

    pub fn iter(&self) -> impl Iterator<Item = &VoyageSnapshot> {
        self.entries.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
