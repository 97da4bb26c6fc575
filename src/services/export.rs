use std::fs;
use std::path::Path;

use chrono::Utc;

use crate::configuration::Settings;
use crate::dal::load_document;
use crate::domain::ClassificationResult;

/// Filesystem-safe timestamp used in backup and export file names.
pub fn timestamp_slug() -> String {
    Utc::now().format("%Y-%m-%dT%H-%M-%S").to_string()
}

fn csv_cell(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

fn csv_line(cells: &[String]) -> String {
    cells
        .iter()
        .map(|cell| csv_cell(cell))
        .collect::<Vec<_>>()
        .join(",")
}

/// Flat CSV: one row per search result, a fallback row for companies with no
/// results (carrying the error message when there is one).
pub fn results_csv(results: &[ClassificationResult]) -> String {
    let mut lines = vec![csv_line(&[
        "회사명".to_string(),
        "메인 채용 플랫폼".to_string(),
        "플랫폼 점수".to_string(),
        "검색어".to_string(),
        "URL".to_string(),
        "도메인".to_string(),
        "타이틀".to_string(),
        "타임스탬프".to_string(),
    ])];

    for result in results {
        if result.results.is_empty() {
            lines.push(csv_line(&[
                result.company.clone(),
                result.main_platform.to_string(),
                result.platform_score.to_string(),
                result.search_query.clone(),
                result
                    .error
                    .clone()
                    .unwrap_or_else(|| "No results".to_string()),
                String::new(),
                String::new(),
                result.timestamp.to_rfc3339(),
            ]));
            continue;
        }

        for hit in &result.results {
            lines.push(csv_line(&[
                result.company.clone(),
                result.main_platform.to_string(),
                result.platform_score.to_string(),
                result.search_query.clone(),
                hit.url.clone(),
                hit.domain.clone(),
                hit.title.clone(),
                result.timestamp.to_rfc3339(),
            ]));
        }
    }

    lines.join("\n")
}

/// Per-company summary with the full "플랫폼(건수)" breakdown string.
pub fn summary_csv(results: &[ClassificationResult]) -> String {
    let mut lines = vec![csv_line(&[
        "회사명".to_string(),
        "메인 채용 플랫폼".to_string(),
        "플랫폼 점수".to_string(),
        "검색 결과 수".to_string(),
        "전체 플랫폼 리스트".to_string(),
    ])];

    for result in results {
        let breakdown = result
            .platform_details
            .iter()
            .map(|stat| format!("{}({})", stat.name, stat.count))
            .collect::<Vec<_>>()
            .join(", ");

        lines.push(csv_line(&[
            result.company.clone(),
            result.main_platform.to_string(),
            result.platform_score.to_string(),
            result.result_count.to_string(),
            breakdown,
        ]));
    }

    lines.join("\n")
}

/// Company counts per main platform, most common first.
pub fn platform_counts(results: &[ClassificationResult]) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();

    for result in results {
        let label = result.main_platform.to_string();
        match counts.iter_mut().find(|(name, _)| *name == label) {
            Some((_, count)) => *count += 1,
            None => counts.push((label, 1)),
        }
    }

    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

pub fn platform_counts_json(results: &[ClassificationResult]) -> serde_json::Value {
    let mut map = serde_json::Map::new();
    for (name, count) in platform_counts(results) {
        map.insert(name, serde_json::Value::from(count));
    }
    serde_json::Value::Object(map)
}

/// Logs the distribution the way the end-of-run summary shows it.
pub fn log_distribution(results: &[ClassificationResult]) {
    let total = results.len().max(1);
    log::info!("Main platform distribution ({} companies):", results.len());
    for (rank, (name, count)) in platform_counts(results).iter().enumerate() {
        log::info!(
            "{}. {}: {} ({:.1}%)",
            rank + 1,
            name,
            count,
            *count as f64 / total as f64 * 100.0
        );
    }
}

/// Writes the timestamped CSV and stats files for one batch of results.
pub fn write_exports(
    dir: &Path,
    slug: &str,
    run_results: &[ClassificationResult],
    all_results: &[ClassificationResult],
) -> anyhow::Result<()> {
    fs::create_dir_all(dir)?;

    let csv_path = dir.join(format!("results_{slug}.csv"));
    fs::write(&csv_path, results_csv(run_results))?;
    log::info!("Wrote {}", csv_path.display());

    let summary_path = dir.join(format!("company_platform_summary_{slug}.csv"));
    fs::write(&summary_path, summary_csv(run_results))?;
    log::info!("Wrote {}", summary_path.display());

    let stats_path = dir.join(format!("platform_stats_{slug}.json"));
    fs::write(
        &stats_path,
        serde_json::to_string_pretty(&platform_counts_json(all_results))?,
    )?;
    log::info!("Wrote {}", stats_path.display());

    Ok(())
}

/// `export` subcommand: regenerate every export from the current store.
pub fn run_export(settings: &Settings) -> anyhow::Result<()> {
    let document = load_document(&settings.storage.store_path());
    if document.results.is_empty() {
        log::warn!("Store is empty, nothing to export");
        return Ok(());
    }

    write_exports(
        &settings.storage.results_dir,
        &timestamp_slug(),
        &document.results,
        &document.results,
    )?;
    log_distribution(&document.results);
    Ok(())
}
