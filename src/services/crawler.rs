use std::path::Path;
use std::time::{Duration, Instant};

use chrono::Utc;
use rand::Rng;

use crate::configuration::Settings;
use crate::dal::{
    clear_progress, load_document, load_progress, save_document, save_progress, CrawlProgress,
    ResultSet,
};
use crate::domain::{
    read_companies_file, ClassificationResult, CompanyIdentity, PlatformTag, SearchResult,
    StoreDocument,
};
use crate::services::droid::Droid;
use crate::services::export::{log_distribution, timestamp_slug, write_exports};
use crate::services::google_search::GoogleSearcher;
use crate::services::resolver::determine_main_platform;

#[derive(Debug, Clone, Copy)]
pub struct CrawlRange {
    pub start: usize,
    pub count: Option<usize>,
}

/// Builds the persisted record for one company from its ranked results.
pub fn classify_company(
    company: &CompanyIdentity,
    search_query: String,
    results: Vec<SearchResult>,
) -> ClassificationResult {
    let decision = determine_main_platform(&results, company);

    ClassificationResult {
        company: company.name.clone(),
        search_query,
        timestamp: Utc::now(),
        result_count: results.len(),
        main_platform: decision.platform,
        platform_score: decision.score,
        platform_details: decision.all_platforms,
        results,
        error: None,
        platform_changed: None,
        previous_platform: None,
        changed_at: None,
    }
}

/// A failed search still produces a record so the batch can move on.
fn error_record(
    company: &CompanyIdentity,
    search_query: String,
    message: String,
) -> ClassificationResult {
    ClassificationResult {
        company: company.name.clone(),
        search_query,
        timestamp: Utc::now(),
        result_count: 0,
        main_platform: PlatformTag::SearchError,
        platform_score: 0.0,
        platform_details: vec![],
        results: vec![],
        error: Some(message),
        platform_changed: None,
        previous_platform: None,
        changed_at: None,
    }
}

pub async fn run_crawl(
    settings: &Settings,
    companies_file: &Path,
    range: CrawlRange,
) -> anyhow::Result<()> {
    let started = Instant::now();

    let all_companies = read_companies_file(companies_file)?;
    log::info!(
        "Loaded {} companies from {}",
        all_companies.len(),
        companies_file.display()
    );

    let companies: Vec<CompanyIdentity> = match range.count {
        Some(count) => all_companies
            .into_iter()
            .skip(range.start)
            .take(count)
            .collect(),
        None => all_companies.into_iter().skip(range.start).collect(),
    };
    if companies.is_empty() {
        log::error!("No companies to crawl in the selected range");
        return Ok(());
    }
    log::info!("This run: {} companies", companies.len());

    let store_path = settings.storage.store_path();
    let mut accumulated = ResultSet::from_document(load_document(&store_path));
    if !accumulated.is_empty() {
        log::info!("Resuming over {} stored companies", accumulated.len());
    }

    let progress_path = settings.storage.progress_path();
    let last_done = load_progress(&progress_path).map(|progress| {
        log::info!(
            "Found checkpoint: {} companies done, resuming after \"{}\"",
            progress.last_index + 1,
            progress.last_company
        );
        progress.last_index
    });

    let droid = Droid::new(&settings.crawler.webdriver_url).await?;
    let searcher = GoogleSearcher::new(droid, settings.crawler.clone());
    searcher.captcha_warmup().await?;

    let mut run_results: Vec<ClassificationResult> = Vec::new();
    let outcome = crawl_companies(
        settings,
        &searcher,
        &companies,
        last_done,
        &mut accumulated,
        &mut run_results,
    )
    .await;

    if let Err(e) = outcome {
        // Never lose partial work: flush what this run collected to a
        // separate error output before bailing.
        log::error!("Crawl aborted: {:#}", e);
        let error_path = settings.storage.error_path();
        save_document(&error_path, &StoreDocument::new(run_results))?;
        log::error!("Partial results flushed to {}", error_path.display());
        let _ = searcher.quit().await;
        return Err(e);
    }

    save_document(&store_path, &accumulated.to_document())?;

    let slug = timestamp_slug();
    let mut backup = StoreDocument::new(run_results.clone());
    let duration = started.elapsed();
    backup.metadata.duration_ms = Some(duration.as_millis() as u64);
    backup.metadata.duration_seconds = Some(duration.as_secs());
    if !run_results.is_empty() {
        backup.metadata.average_seconds_per_company =
            Some((duration.as_secs_f64() / run_results.len() as f64 * 100.0).round() / 100.0);
    }
    save_document(
        &settings.storage.results_dir.join(format!("results_{slug}.json")),
        &backup,
    )?;

    let merged = accumulated.to_document();
    write_exports(
        &settings.storage.results_dir,
        &slug,
        &run_results,
        &merged.results,
    )?;
    log_distribution(&merged.results);

    clear_progress(&progress_path);

    log::info!(
        "Crawl finished: {} companies this run, {} accumulated, {}m {}s elapsed",
        run_results.len(),
        merged.results.len(),
        duration.as_secs() / 60,
        duration.as_secs() % 60
    );

    searcher.quit().await?;
    Ok(())
}

async fn crawl_companies(
    settings: &Settings,
    searcher: &GoogleSearcher,
    companies: &[CompanyIdentity],
    last_done: Option<usize>,
    accumulated: &mut ResultSet,
    run_results: &mut Vec<ClassificationResult>,
) -> anyhow::Result<()> {
    let store_path = settings.storage.store_path();
    let progress_path = settings.storage.progress_path();
    let interval = settings.crawler.checkpoint_interval.max(1);

    for (i, company) in companies.iter().enumerate() {
        if matches!(last_done, Some(done) if i <= done) {
            log::info!(
                "[{}/{}] Skipping {} (already done)",
                i + 1,
                companies.len(),
                company.name
            );
            continue;
        }

        log::info!("[{}/{}] {}", i + 1, companies.len(), company.name);

        let query = searcher.query_for(company);
        let record = match searcher.search(company).await {
            Ok(results) => {
                let record = classify_company(company, query, results);
                log::info!(
                    "{}: {} urls, main platform {}",
                    company.name,
                    record.result_count,
                    record.main_platform
                );
                record
            }
            Err(e) => {
                log::error!("{}: search failed: {:#}", company.name, e);
                error_record(company, query, format!("{e:#}"))
            }
        };

        let merged = accumulated.merge(record);
        run_results.push(merged);

        if (i + 1) % interval == 0 {
            save_document(&store_path, &accumulated.to_document())?;
            save_progress(&progress_path, &CrawlProgress::at(i, &company.name))?;
            log::info!(
                "Checkpoint saved ({} accumulated, {}/{} this run)",
                accumulated.len(),
                i + 1,
                companies.len()
            );
        }

        if i + 1 < companies.len() {
            let delay = rand::thread_rng()
                .gen_range(settings.crawler.min_delay_ms..=settings.crawler.max_delay_ms);
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{classify_company, error_record};
    use crate::domain::{CompanyIdentity, PlatformTag, SearchResult};

    #[test]
    fn classification_record_carries_the_breakdown() {
        let company = CompanyIdentity::named("에이크미");
        let results = vec![SearchResult {
            url: "https://www.wanted.co.kr/company/1".to_string(),
            domain: "www.wanted.co.kr".to_string(),
            title: "에이크미 채용".to_string(),
        }];

        let record = classify_company(&company, "에이크미 채용".to_string(), results);

        assert_eq!(record.company, "에이크미");
        assert_eq!(record.result_count, 1);
        assert_eq!(record.main_platform, PlatformTag::Wanted);
        assert_eq!(record.platform_score, 50.0);
        assert_eq!(record.platform_details.len(), 1);
        assert!(record.platform_changed.is_none());
    }

    #[test]
    fn failed_search_becomes_error_sentinel() {
        let company = CompanyIdentity::named("에이크미");

        let record = error_record(&company, "에이크미 채용".to_string(), "timeout".to_string());

        assert_eq!(record.main_platform, PlatformTag::SearchError);
        assert_eq!(record.platform_score, 0.0);
        assert!(record.results.is_empty());
        assert_eq!(record.error.as_deref(), Some("timeout"));
    }
}
