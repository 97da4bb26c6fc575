use crate::configuration::Settings;
use crate::dal::{backup_document, load_document, merge_entry, save_document};
use crate::domain::{ClassificationResult, CompanyIdentity, StoreDocument};
use crate::services::export::timestamp_slug;
use crate::services::resolver::determine_main_platform;

/// Reclassifies one stored record from its raw search results. A record with
/// no stored results is passed through untouched.
pub fn reanalyze_record(old: &ClassificationResult) -> ClassificationResult {
    if old.results.is_empty() {
        return old.clone();
    }

    // Some early company lists glued extra columns onto the name with tabs.
    let name = old
        .company
        .split('\t')
        .next()
        .unwrap_or(&old.company)
        .to_string();
    let company = CompanyIdentity { name, domain: None };

    let decision = determine_main_platform(&old.results, &company);

    let mut updated = old.clone();
    updated.main_platform = decision.platform;
    updated.platform_score = decision.score;
    updated.platform_details = decision.all_platforms;
    updated
}

/// Offline pass: rebuild every stored classification with the current
/// ruleset, with the same change detection a live crawl applies.
pub fn run_reanalysis(settings: &Settings) -> anyhow::Result<()> {
    let store_path = settings.storage.store_path();
    let document = load_document(&store_path);
    if document.results.is_empty() {
        log::warn!("Store is empty, nothing to reanalyze");
        return Ok(());
    }
    log::info!("Reanalyzing {} companies", document.results.len());

    let backup_path = settings
        .storage
        .results_dir
        .join(format!("results_temp_backup_{}.json", timestamp_slug()));
    backup_document(&store_path, &backup_path)?;
    log::info!("Backed up store to {}", backup_path.display());

    let mut changed = 0usize;
    let reanalyzed: Vec<ClassificationResult> = document
        .results
        .iter()
        .map(|old| {
            let updated = reanalyze_record(old);
            if updated.main_platform != old.main_platform {
                changed += 1;
                log::info!(
                    "{}: {} -> {}",
                    old.company,
                    old.main_platform,
                    updated.main_platform
                );
            }
            merge_entry(Some(old), updated)
        })
        .collect();

    let mut output = StoreDocument::new(reanalyzed);
    output.metadata.reanalyzed = Some(true);
    save_document(&store_path, &output)?;

    log::info!(
        "Reanalysis done: {} companies, {} platform changes",
        output.results.len(),
        changed
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::reanalyze_record;
    use crate::dal::merge_entry;
    use crate::domain::{ClassificationResult, PlatformTag, SearchResult};

    fn stored(company: &str, platform: PlatformTag, urls: &[&str]) -> ClassificationResult {
        ClassificationResult {
            company: company.to_string(),
            search_query: format!("{company} 채용"),
            timestamp: Utc::now(),
            result_count: urls.len(),
            main_platform: platform,
            platform_score: 0.0,
            platform_details: vec![],
            results: urls
                .iter()
                .map(|url| SearchResult {
                    url: url.to_string(),
                    domain: String::new(),
                    title: String::new(),
                })
                .collect(),
            error: None,
            platform_changed: None,
            previous_platform: None,
            changed_at: None,
        }
    }

    #[test]
    fn record_without_results_passes_through() {
        let old = stored("네이버", PlatformTag::SearchError, &[]);

        assert_eq!(reanalyze_record(&old), old);
    }

    #[test]
    fn reclassifies_from_stored_results() {
        let old = stored(
            "에이크미",
            PlatformTag::NoPostings,
            &["https://www.wanted.co.kr/company/1"],
        );

        let updated = reanalyze_record(&old);

        assert_eq!(updated.main_platform, PlatformTag::Wanted);
        assert_eq!(updated.platform_score, 50.0);
        assert_eq!(updated.platform_details.len(), 1);
        // Raw results and query are untouched.
        assert_eq!(updated.results, old.results);
        assert_eq!(updated.search_query, old.search_query);
    }

    #[test]
    fn reanalysis_is_idempotent() {
        let old = stored(
            "에이크미",
            PlatformTag::Wanted,
            &["https://www.wanted.co.kr/company/1"],
        );

        let first = merge_entry(Some(&old), reanalyze_record(&old));
        let second = merge_entry(Some(&first), reanalyze_record(&first));

        assert_eq!(first.main_platform, second.main_platform);
        assert!(second.platform_changed.is_none());
        assert_eq!(first.main_platform, PlatformTag::Wanted);
    }

    #[test]
    fn ruleset_change_is_flagged_once_then_sticks() {
        let old = stored(
            "에이크미",
            PlatformTag::NoPostings,
            &["https://www.wanted.co.kr/company/1"],
        );

        let first = merge_entry(Some(&old), reanalyze_record(&old));
        assert_eq!(first.platform_changed, Some(true));
        assert_eq!(first.previous_platform, Some(PlatformTag::NoPostings));

        let second = merge_entry(Some(&first), reanalyze_record(&first));
        assert_eq!(second.platform_changed, Some(true));
        assert_eq!(second.previous_platform, Some(PlatformTag::NoPostings));
        assert_eq!(second.changed_at, first.changed_at);
    }
}
