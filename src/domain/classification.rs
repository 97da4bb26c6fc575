use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::platform::PlatformTag;

/// One ranked search hit. `domain` is the parsed host, `"unknown"` when the
/// url does not parse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub url: String,
    #[serde(default)]
    pub domain: String,
    #[serde(default)]
    pub title: String,
}

/// Rule-matcher output for a single search hit. Derived, never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct PlatformCandidate {
    pub tag: PlatformTag,
    pub weight: u32,
    pub dedicated: bool,
    pub domain: String,
    /// 1-based search rank.
    pub rank: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedPlatformStat {
    pub name: PlatformTag,
    pub weight: u32,
    pub best_rank: usize,
    pub count: usize,
    pub score: f64,
    pub domains: Vec<String>,
}

/// Resolver decision for one company.
#[derive(Debug, Clone, PartialEq)]
pub struct PlatformDecision {
    pub platform: PlatformTag,
    pub weight: u32,
    pub count: usize,
    pub score: f64,
    pub best_rank: Option<usize>,
    /// Full sorted breakdown, kept for the store and the dashboard.
    pub all_platforms: Vec<AggregatedPlatformStat>,
}

impl PlatformDecision {
    pub fn empty() -> Self {
        PlatformDecision {
            platform: PlatformTag::NoResults,
            weight: 0,
            count: 0,
            score: 0.0,
            best_rank: None,
            all_platforms: Vec::new(),
        }
    }
}

/// Persisted record for one company, one per crawl or reanalysis pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationResult {
    pub company: String,
    pub search_query: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub result_count: usize,
    pub main_platform: PlatformTag,
    #[serde(default)]
    pub platform_score: f64,
    #[serde(default)]
    pub platform_details: Vec<AggregatedPlatformStat>,
    #[serde(default)]
    pub results: Vec<SearchResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform_changed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_platform: Option<PlatformTag>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreMetadata {
    pub total_companies: usize,
    pub crawled_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_seconds_per_company: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reanalyzed: Option<bool>,
}

/// The single JSON document the whole system shares with the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreDocument {
    #[serde(default)]
    pub metadata: StoreMetadata,
    pub results: Vec<ClassificationResult>,
}

impl StoreDocument {
    pub fn new(results: Vec<ClassificationResult>) -> Self {
        StoreDocument {
            metadata: StoreMetadata {
                total_companies: results.len(),
                crawled_at: Some(Utc::now()),
                ..StoreMetadata::default()
            },
            results,
        }
    }
}
