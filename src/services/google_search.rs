use std::collections::HashSet;
use std::time::Duration;

use thirtyfour::By;
use url::Url;

use crate::configuration::CrawlerSettings;
use crate::domain::{CompanyIdentity, SearchResult};
use crate::services::droid::Droid;

const GOOGLE_SEARCH_URL: &str = "https://www.google.com/search";
const WARMUP_QUERY: &str = "테스트 검색";

pub struct GoogleSearcher {
    droid: Droid,
    settings: CrawlerSettings,
}

impl GoogleSearcher {
    pub fn new(droid: Droid, settings: CrawlerSettings) -> Self {
        GoogleSearcher { droid, settings }
    }

    pub fn query_for(&self, company: &CompanyIdentity) -> String {
        format!("{} {}", company.name, self.settings.search_keyword)
    }

    /// Fires a throwaway search so Google shows its CAPTCHA up front, then
    /// waits for the operator to solve it in the browser window and confirm
    /// with Enter.
    pub async fn captcha_warmup(&self) -> anyhow::Result<()> {
        log::info!("CAPTCHA warm-up: running a dummy search");
        self.goto_search(WARMUP_QUERY).await?;

        log::warn!("Solve the CAPTCHA in the browser window if one appeared");
        let mut remaining = self.settings.warmup_wait_secs;
        while remaining > 0 {
            if remaining % 10 == 0 || remaining <= 5 {
                log::info!("{}s left before confirmation prompt", remaining);
            }
            tokio::time::sleep(Duration::from_secs(1)).await;
            remaining -= 1;
        }

        log::warn!("Press Enter once the CAPTCHA is solved");
        tokio::task::spawn_blocking(|| {
            let mut line = String::new();
            std::io::stdin().read_line(&mut line)
        })
        .await??;

        log::info!("Warm-up confirmed, starting the crawl");
        Ok(())
    }

    /// Runs one search and returns the ranked, deduplicated result list,
    /// capped at `max_results`.
    pub async fn search(&self, company: &CompanyIdentity) -> anyhow::Result<Vec<SearchResult>> {
        let query = self.query_for(company);
        log::info!("Searching: \"{}\"", query);

        self.goto_search(&query).await?;

        let driver = &self.droid.driver;
        if driver.find(By::Css("#search")).await.is_err() {
            anyhow::bail!("no search results container for \"{}\" (CAPTCHA?)", query);
        }

        let mut raw: Vec<SearchResult> = Vec::new();
        for a_tag in driver.find_all(By::Css("#search a")).await? {
            let Some(href) = a_tag.attr("href").await? else {
                continue;
            };
            if !keep_result_url(&href) {
                continue;
            }

            // Result titles live in an h3 inside the anchor; plain links fall
            // back to the anchor text.
            let title = match a_tag.find(By::Tag("h3")).await {
                Ok(h3) => h3.text().await.unwrap_or_default(),
                Err(_) => a_tag.text().await.unwrap_or_default(),
            };

            raw.push(SearchResult {
                domain: host_of(&href),
                url: href,
                title: title.trim().to_string(),
            });
        }

        let results = dedupe_and_cap(raw, self.settings.max_results);
        log::info!("\"{}\": kept {} urls", query, results.len());
        Ok(results)
    }

    async fn goto_search(&self, query: &str) -> anyhow::Result<()> {
        let url = Url::parse_with_params(GOOGLE_SEARCH_URL, [("q", query)])?;
        self.droid.driver.goto(url.as_str()).await?;
        Ok(())
    }

    pub async fn quit(self) -> anyhow::Result<()> {
        self.droid.quit().await
    }
}

/// Drops navigation links, Google's own properties and youtube noise.
fn keep_result_url(href: &str) -> bool {
    href.starts_with("http") && !href.contains("google.com") && !href.contains("youtube.com")
}

fn host_of(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.to_string()))
        .unwrap_or_else(|| "unknown".to_string())
}

/// Keeps the first occurrence of each url, preserving search-rank order.
fn dedupe_and_cap(results: Vec<SearchResult>, cap: usize) -> Vec<SearchResult> {
    let mut seen: HashSet<String> = HashSet::new();
    results
        .into_iter()
        .filter(|result| seen.insert(result.url.clone()))
        .take(cap)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{dedupe_and_cap, host_of, keep_result_url};
    use crate::domain::SearchResult;

    #[test]
    fn filters_google_and_youtube_links() {
        assert!(keep_result_url("https://www.wanted.co.kr/company/1"));
        assert!(!keep_result_url("https://www.google.com/search?q=다음"));
        assert!(!keep_result_url("https://accounts.google.com/ServiceLogin"));
        assert!(!keep_result_url("https://www.youtube.com/watch?v=abc"));
        assert!(!keep_result_url("/search?q=다음페이지"));
        assert!(!keep_result_url("#"));
    }

    #[test]
    fn host_falls_back_to_unknown() {
        assert_eq!(host_of("https://toss.im/career"), "toss.im");
        assert_eq!(host_of("not a url"), "unknown");
    }

    #[test]
    fn dedupes_by_url_and_caps_in_rank_order() {
        let hit = |url: &str| SearchResult {
            url: url.to_string(),
            domain: String::new(),
            title: String::new(),
        };
        let results = vec![
            hit("https://a.example.com/"),
            hit("https://b.example.com/"),
            hit("https://a.example.com/"),
            hit("https://c.example.com/"),
        ];

        let kept = dedupe_and_cap(results, 2);

        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].url, "https://a.example.com/");
        assert_eq!(kept[1].url, "https://b.example.com/");
    }
}
