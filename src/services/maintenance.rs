use crate::configuration::Settings;
use crate::dal::{clear_change_flags, load_document, save_document};
use crate::domain::StoreDocument;

/// `clear-changes` subcommand: strip the sticky change flags after a human
/// has reviewed them. Safe to run on a store with nothing flagged.
pub fn run_clear_changes(settings: &Settings) -> anyhow::Result<()> {
    let store_path = settings.storage.store_path();
    let mut document = load_document(&store_path);

    let cleared = clear_change_flags(&mut document);

    let output = StoreDocument::new(document.results);
    save_document(&store_path, &output)?;

    log::info!(
        "Cleared change flags on {} of {} companies",
        cleared,
        output.results.len()
    );
    Ok(())
}
