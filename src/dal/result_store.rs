use std::collections::HashMap;
use std::fs;
use std::path::Path;

use chrono::Utc;
use serde::Deserialize;

use crate::domain::{ClassificationResult, StoreDocument};

/// The store accepts the wrapped `{ metadata, results }` document or a bare
/// result array written by older runs.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredShape {
    Wrapped(StoreDocument),
    Bare(Vec<ClassificationResult>),
}

/// Loads the persisted store. A missing or corrupt file means "no prior
/// data", never a fatal error.
pub fn load_document(path: &Path) -> StoreDocument {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) => {
            log::info!("No existing store at {} ({}), starting fresh", path.display(), e);
            return StoreDocument::default();
        }
    };

    match serde_json::from_str::<StoredShape>(&raw) {
        Ok(StoredShape::Wrapped(document)) => document,
        Ok(StoredShape::Bare(results)) => StoreDocument::new(results),
        Err(e) => {
            log::warn!(
                "Store at {} is not readable ({}), starting fresh",
                path.display(),
                e
            );
            StoreDocument::default()
        }
    }
}

pub fn save_document(path: &Path, document: &StoreDocument) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(document)?;
    fs::write(path, json)?;
    Ok(())
}

/// Copies the raw store file aside before a destructive pass.
pub fn backup_document(path: &Path, backup_path: &Path) -> anyhow::Result<()> {
    fs::copy(path, backup_path)?;
    Ok(())
}

/// Merges a freshly classified entry over the previously stored one for the
/// same company. The change flag is sticky: a detected change sets it, an
/// unchanged run carries an existing flag forward, and only the explicit
/// clear pass removes it.
pub fn merge_entry(
    old: Option<&ClassificationResult>,
    mut new: ClassificationResult,
) -> ClassificationResult {
    let Some(old) = old else {
        return new;
    };

    if old.main_platform != new.main_platform {
        log::warn!(
            "{}: platform changed {} -> {}",
            new.company,
            old.main_platform,
            new.main_platform
        );
        new.platform_changed = Some(true);
        new.previous_platform = Some(old.main_platform);
        new.changed_at = Some(Utc::now());
    } else if old.platform_changed.unwrap_or(false) {
        new.platform_changed = old.platform_changed;
        new.previous_platform = old.previous_platform;
        new.changed_at = old.changed_at;
    }

    new
}

/// Strips the sticky change flag from every entry. Idempotent; returns how
/// many entries were cleared.
pub fn clear_change_flags(document: &mut StoreDocument) -> usize {
    let mut cleared = 0;

    for result in &mut document.results {
        if result.platform_changed.unwrap_or(false) {
            cleared += 1;
        }
        result.platform_changed = None;
        result.previous_platform = None;
        result.changed_at = None;
    }

    cleared
}

/// In-memory company-keyed accumulator for a crawl or reanalysis pass.
/// Last write per company wins, insertion order of first appearance is kept
/// so the flushed document stays diffable between runs.
pub struct ResultSet {
    entries: Vec<ClassificationResult>,
    index: HashMap<String, usize>,
}

impl ResultSet {
    pub fn from_document(document: StoreDocument) -> Self {
        let mut set = ResultSet {
            entries: Vec::new(),
            index: HashMap::new(),
        };
        for entry in document.results {
            set.insert(entry);
        }
        set
    }

    pub fn get(&self, company: &str) -> Option<&ClassificationResult> {
        self.index.get(company).map(|&i| &self.entries[i])
    }

    pub fn contains(&self, company: &str) -> bool {
        self.index.contains_key(company)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Runs the sticky-flag merge against any stored entry, then upserts.
    pub fn merge(&mut self, new: ClassificationResult) -> ClassificationResult {
        let merged = merge_entry(self.get(&new.company), new);
        self.insert(merged.clone());
        merged
    }

    fn insert(&mut self, entry: ClassificationResult) {
        match self.index.get(&entry.company) {
            Some(&i) => self.entries[i] = entry,
            None => {
                self.index.insert(entry.company.clone(), self.entries.len());
                self.entries.push(entry);
            }
        }
    }

    pub fn into_document(self) -> StoreDocument {
        StoreDocument::new(self.entries)
    }

    pub fn to_document(&self) -> StoreDocument {
        StoreDocument::new(self.entries.clone())
    }
}
