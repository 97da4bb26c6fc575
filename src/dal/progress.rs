use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Checkpoint written alongside the store so an interrupted crawl can resume
/// past the companies it already finished.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlProgress {
    pub last_index: usize,
    pub last_company: String,
    pub timestamp: DateTime<Utc>,
}

impl CrawlProgress {
    pub fn at(last_index: usize, last_company: &str) -> Self {
        CrawlProgress {
            last_index,
            last_company: last_company.to_string(),
            timestamp: Utc::now(),
        }
    }
}

pub fn load_progress(path: &Path) -> Option<CrawlProgress> {
    let raw = fs::read_to_string(path).ok()?;
    match serde_json::from_str(&raw) {
        Ok(progress) => Some(progress),
        Err(e) => {
            log::warn!("Progress file {} unreadable: {}", path.display(), e);
            None
        }
    }
}

pub fn save_progress(path: &Path, progress: &CrawlProgress) -> anyhow::Result<()> {
    fs::write(path, serde_json::to_string_pretty(progress)?)?;
    Ok(())
}

/// Removes the checkpoint after a clean run. Missing file is fine.
pub fn clear_progress(path: &Path) {
    if let Err(e) = fs::remove_file(path) {
        if e.kind() != std::io::ErrorKind::NotFound {
            log::warn!("Could not remove progress file {}: {}", path.display(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{clear_progress, load_progress, save_progress, CrawlProgress};

    #[test]
    fn progress_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("progress.json");
        let progress = CrawlProgress::at(41, "토스");

        save_progress(&path, &progress).unwrap();
        assert_eq!(load_progress(&path), Some(progress));

        clear_progress(&path);
        assert_eq!(load_progress(&path), None);
        // Clearing twice is harmless.
        clear_progress(&path);
    }
}
