use std::fmt;

use serde::{Deserialize, Serialize};

/// Known recruiting channels plus the sentinel outcomes the resolver can
/// produce. Serialized names match the labels the dashboard and the persisted
/// store use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlatformTag {
    #[serde(rename = "특수목적회사")]
    ShellCompany,
    #[serde(rename = "그룹채용")]
    GroupPortal,
    #[serde(rename = "자체")]
    SelfHosted,
    #[serde(rename = "그리팅")]
    Greeting,
    #[serde(rename = "마이다스인")]
    MidasIn,
    #[serde(rename = "잡다")]
    Jobda,
    #[serde(rename = "나인하이어")]
    NineHire,
    #[serde(rename = "원티드")]
    Wanted,
    #[serde(rename = "로켓펀치")]
    RocketPunch,
    #[serde(rename = "프로그래머스")]
    Programmers,
    #[serde(rename = "링크드인")]
    LinkedIn,
    #[serde(rename = "점핏")]
    Jumpit,
    #[serde(rename = "잡코리아")]
    JobKorea,
    #[serde(rename = "사람인")]
    Saramin,
    Other,
    #[serde(rename = "사람인 의심")]
    SuspectedSaramin,
    #[serde(rename = "공고없음")]
    NoPostings,
    #[serde(rename = "None")]
    NoResults,
    #[serde(rename = "error")]
    SearchError,
    Unknown,
}

impl PlatformTag {
    pub fn label(&self) -> &'static str {
        match self {
            PlatformTag::ShellCompany => "특수목적회사",
            PlatformTag::GroupPortal => "그룹채용",
            PlatformTag::SelfHosted => "자체",
            PlatformTag::Greeting => "그리팅",
            PlatformTag::MidasIn => "마이다스인",
            PlatformTag::Jobda => "잡다",
            PlatformTag::NineHire => "나인하이어",
            PlatformTag::Wanted => "원티드",
            PlatformTag::RocketPunch => "로켓펀치",
            PlatformTag::Programmers => "프로그래머스",
            PlatformTag::LinkedIn => "링크드인",
            PlatformTag::Jumpit => "점핏",
            PlatformTag::JobKorea => "잡코리아",
            PlatformTag::Saramin => "사람인",
            PlatformTag::Other => "Other",
            PlatformTag::SuspectedSaramin => "사람인 의심",
            PlatformTag::NoPostings => "공고없음",
            PlatformTag::NoResults => "None",
            PlatformTag::SearchError => "error",
            PlatformTag::Unknown => "Unknown",
        }
    }

    /// Entries the dashboard leaves out of the distribution: failed searches
    /// and the low-confidence 사람인 guess.
    pub fn hidden_from_stats(&self) -> bool {
        matches!(self, PlatformTag::SearchError | PlatformTag::SuspectedSaramin)
    }
}

impl fmt::Display for PlatformTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::PlatformTag;

    #[test]
    fn serializes_with_store_labels() {
        let json = serde_json::to_string(&PlatformTag::Saramin).unwrap();
        assert_eq!(json, "\"사람인\"");

        let json = serde_json::to_string(&PlatformTag::NoResults).unwrap();
        assert_eq!(json, "\"None\"");

        let tag: PlatformTag = serde_json::from_str("\"사람인 의심\"").unwrap();
        assert_eq!(tag, PlatformTag::SuspectedSaramin);
    }
}
