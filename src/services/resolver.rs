use std::cmp::Ordering;

use crate::domain::{
    AggregatedPlatformStat, CompanyIdentity, PlatformCandidate, PlatformDecision, PlatformTag,
    SearchResult,
};
use crate::services::rules::identify_platform;

/// Search-rank decay: rank 1 → 1.0, rank 2 → 0.9, rank 10 and beyond → 0.1.
fn rank_multiplier(best_rank: usize) -> f64 {
    (1.1 - best_rank as f64 * 0.1).max(0.1)
}

/// Reduces the ranked result list to one main-platform decision.
///
/// A dedicated candidate short-circuits the scoring: one confirmed
/// company-owned or HR-platform hit is unambiguous and must not be out-voted
/// by generic job-board links that happened to rank higher.
pub fn determine_main_platform(
    results: &[SearchResult],
    company: &CompanyIdentity,
) -> PlatformDecision {
    if results.is_empty() {
        return PlatformDecision::empty();
    }

    let candidates: Vec<PlatformCandidate> = results
        .iter()
        .enumerate()
        .map(|(index, result)| identify_platform(&result.url, company, &result.title, index + 1))
        .collect();

    if let Some(dedicated) = candidates.iter().find(|candidate| candidate.dedicated) {
        let stat = aggregate_single(&candidates, dedicated);
        return PlatformDecision {
            platform: stat.name,
            weight: stat.weight,
            count: stat.count,
            score: stat.score,
            best_rank: Some(stat.best_rank),
            all_platforms: vec![stat],
        };
    }

    let ranked = rank_aggregates(&candidates);
    // ranked is non-empty here: candidates is non-empty.
    let top = &ranked[0];

    if top.name == PlatformTag::Other {
        // All we saw was noise. A 사람인 link somewhere in the noise still
        // hints at a board page, so flag it as a suspicion instead of
        // declaring no postings at all.
        if let Some(saramin) = ranked.iter().find(|stat| stat.name == PlatformTag::Saramin) {
            return PlatformDecision {
                platform: PlatformTag::SuspectedSaramin,
                weight: saramin.weight,
                count: saramin.count,
                score: saramin.weight as f64,
                best_rank: Some(saramin.best_rank),
                all_platforms: ranked,
            };
        }

        return PlatformDecision {
            platform: PlatformTag::NoPostings,
            weight: 0,
            count: 0,
            score: 0.0,
            best_rank: None,
            all_platforms: ranked,
        };
    }

    PlatformDecision {
        platform: top.name,
        weight: top.weight,
        count: top.count,
        score: top.score,
        best_rank: Some(top.best_rank),
        all_platforms: ranked,
    }
}

/// Aggregates only the candidates sharing the dedicated hit's tag. Dedicated
/// matches are never down-weighted by rank, so score is the plain weight.
fn aggregate_single(
    candidates: &[PlatformCandidate],
    dedicated: &PlatformCandidate,
) -> AggregatedPlatformStat {
    let same_tag: Vec<&PlatformCandidate> = candidates
        .iter()
        .filter(|candidate| candidate.tag == dedicated.tag)
        .collect();

    let mut domains: Vec<String> = Vec::new();
    for candidate in &same_tag {
        if !domains.contains(&candidate.domain) {
            domains.push(candidate.domain.clone());
        }
    }

    AggregatedPlatformStat {
        name: dedicated.tag,
        weight: dedicated.weight,
        best_rank: same_tag.iter().map(|c| c.rank).min().unwrap_or(dedicated.rank),
        count: same_tag.len(),
        score: dedicated.weight as f64,
        domains,
    }
}

/// Groups non-dedicated candidates by tag, scores each group by its best rank
/// and sorts the result: score descending, earlier best rank breaking ties.
fn rank_aggregates(candidates: &[PlatformCandidate]) -> Vec<AggregatedPlatformStat> {
    let mut stats: Vec<AggregatedPlatformStat> = Vec::new();

    for candidate in candidates {
        match stats.iter_mut().find(|stat| stat.name == candidate.tag) {
            Some(stat) => {
                // Weight stays as first seen; only the best rank improves.
                if candidate.rank < stat.best_rank {
                    stat.best_rank = candidate.rank;
                }
                stat.count += 1;
                if !stat.domains.contains(&candidate.domain) {
                    stat.domains.push(candidate.domain.clone());
                }
            }
            None => stats.push(AggregatedPlatformStat {
                name: candidate.tag,
                weight: candidate.weight,
                best_rank: candidate.rank,
                count: 1,
                score: 0.0,
                domains: vec![candidate.domain.clone()],
            }),
        }
    }

    for stat in &mut stats {
        stat.score = stat.weight as f64 * rank_multiplier(stat.best_rank);
    }

    stats.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then(a.best_rank.cmp(&b.best_rank))
    });

    stats
}
