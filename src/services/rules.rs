use std::sync::OnceLock;

use regex::Regex;
use url::Url;

use crate::domain::{CompanyIdentity, PlatformCandidate, PlatformTag};

/// Normalized inputs a rule can look at for one search hit.
pub struct MatchContext<'a> {
    pub url_lower: String,
    /// Raw title, needed for the posting-count pattern.
    pub title: &'a str,
    pub title_lower: String,
    /// Lower-cased host of the url, empty when the url does not parse.
    pub host: String,
    pub company_name_lower: String,
    pub registered_domain: Option<String>,
}

impl<'a> MatchContext<'a> {
    pub fn build(url: &str, company: &CompanyIdentity, title: &'a str) -> Self {
        let host = Url::parse(url)
            .ok()
            .and_then(|u| u.host_str().map(|h| h.to_lowercase()))
            .unwrap_or_default();

        MatchContext {
            url_lower: url.to_lowercase(),
            title,
            title_lower: title.to_lowercase(),
            host,
            company_name_lower: company.name.to_lowercase(),
            registered_domain: company.domain.as_ref().map(|d| d.to_lowercase()),
        }
    }
}

/// One entry of the ordered ruleset. Evaluation order encodes priority, so a
/// rule wins by position, not by weight. Weight is a function of the context
/// even for the constant rules, which keeps the two title-dependent job-board
/// rules on the same interface.
pub struct PlatformRule {
    pub tag: PlatformTag,
    pub dedicated: bool,
    matches: fn(&MatchContext) -> bool,
    weight: fn(&MatchContext) -> u32,
}

impl PlatformRule {
    pub fn matches(&self, ctx: &MatchContext) -> bool {
        (self.matches)(ctx)
    }

    pub fn weight(&self, ctx: &MatchContext) -> u32 {
        (self.weight)(ctx)
    }
}

/// 인수목적 쉘 회사 판별 키워드.
const SHELL_COMPANY_KEYWORDS: &[&str] = &["스팩", "spac", "호스팩", "기업인수목적"];

/// 주요 그룹 통합 채용 도메인.
const GROUP_RECRUIT_DOMAINS: &[&str] = &[
    // 삼성그룹
    "samsungcareers.com",
    "samsung.com/sec/about-us/careers",
    "samsung-dsrecruit.com",
    "samsung-dxrecruit.com",
    // LG그룹
    "careers.lg.com",
    // SK그룹
    "skcareers.com",
    // 카카오그룹
    "careers.kakao.com",
    // 현대차그룹
    "talent.hyundai.com",
    "careers.hyundaigroup.com",
    "hyundai.co.kr/recruit",
    "hyundai-autoever.com",
    // HD현대
    "recruit.hd.com",
    // 한화그룹
    "hanwhain.com",
    // 롯데그룹
    "recruit.lotte.co.kr",
    // CJ그룹
    "cj.net/career",
    "cjcareers.com",
    // 포스코그룹
    "recruit.posco.com",
    "poscorecruit.careerlink.kr",
    "poscorecruit.com",
    "gorecruit.posco.co.kr",
    // GS그룹
    "gs.co.kr/recruit",
    "gscareers.com",
    // 두산그룹
    "career.doosan.com",
    // KT그룹
    "recruit.kt.com",
    // LS그룹
    "lsholdings.com/ko/careers",
    "lsholdings.careerlink.kr",
    // 효성그룹
    "hyosung.recruiter.co.kr",
    // 한진그룹
    "hanjinkal.co.kr/kr/communityid/75",
    // 코오롱그룹
    "dream.kolon.com",
    "recruit.kolonfnc.com",
    // 금호그룹
    "recruit.kkpc.com",
    "kkpc-recruit",
    // NH농협그룹
    "with.nonghyup.com",
    "nhreits.com",
    "nhbank.com",
    // 미래에셋그룹
    "career.miraeasset.com",
    // KB금융그룹
    "careers.kbfg.com",
    "jobs.kbstar.com",
    // 신한금융그룹
    "shinhan.recruiter.co.kr",
    "recruit.shinhansec.com",
    "recruit.shinhaninvest.com",
    // 하나금융그룹
    "hanafn.com",
    "hanati.recruiter.co.kr",
    "hanabank.recruiter.co.kr",
    // 우리금융그룹
    "woorifg.com",
    "wooribank.careerlink.kr",
    // 신세계그룹
    "job.shinsegae.com",
    // BGF리테일
    "bgf.recruiter.co.kr",
    // DL그룹
    "dlenc.recruiter.co.kr",
    "daelim.co.kr",
    // OCI그룹
    "oci.career.greetinghr.com",
];

const GROUP_TITLE_KEYWORDS: &[&str] = &[
    "그룹 채용",
    "그룹채용",
    "그룹 인재",
    "그룹인재",
    "통합 채용",
    "통합채용",
    "채용사이트",
    "채용 사이트",
    "group career",
    "group recruit",
    "group hiring",
    "계열사 채용",
    "계열사채용",
];

const RECRUIT_TITLE_KEYWORDS: &[&str] = &[
    "채용공고",
    "채용 공고",
    "채용중",
    "모집중",
    "모집 중",
    "job opening",
    "job posting",
    "careers",
    "join us",
    "we are hiring",
    "now hiring",
];

/// Suffixes stripped from a host before fuzzy-matching it against the
/// company name.
const TLD_SUFFIXES: &[&str] = &[".co.kr", ".com", ".net", ".org", ".ai", ".io"];

/// "진행 중인 공고 총 N건" — a live posting count in a job-board title. A bare
/// "진행 중인 공고 확인하기" link carries no count and often means the board
/// page is empty.
fn posting_count_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"진행\s*중인\s*공고\s*총?\s*\d+건").unwrap())
}

fn has_posting_count(title: &str) -> bool {
    posting_count_pattern().is_match(title)
}

/// 회사 도메인 매칭: 등록 도메인이 있으면 그대로, 없으면 TLD를 뗀 호스트와
/// 공백을 뺀 회사명을 양방향 포함 비교.
fn is_company_domain(ctx: &MatchContext) -> bool {
    if ctx.host.is_empty() {
        return false;
    }

    if let Some(registered) = &ctx.registered_domain {
        if ctx.host.contains(registered.as_str()) {
            return true;
        }
    }

    let clean_host = TLD_SUFFIXES
        .iter()
        .find_map(|suffix| ctx.host.strip_suffix(*suffix))
        .unwrap_or(ctx.host.as_str());
    let company_keyword: String = ctx
        .company_name_lower
        .split_whitespace()
        .collect();

    if company_keyword.is_empty() {
        return false;
    }

    clean_host.contains(&company_keyword) || company_keyword.contains(clean_host)
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}

fn ruleset() -> &'static [PlatformRule] {
    static RULES: OnceLock<Vec<PlatformRule>> = OnceLock::new();
    RULES.get_or_init(build_ruleset)
}

fn build_ruleset() -> Vec<PlatformRule> {
    vec![
        // 최우선: 특수목적회사. 채용 채널 분석 대상이 아니므로 어떤 규칙보다
        // 먼저 걸러낸다.
        PlatformRule {
            tag: PlatformTag::ShellCompany,
            dedicated: false,
            matches: |ctx| contains_any(&ctx.company_name_lower, SHELL_COMPANY_KEYWORDS),
            weight: |_| 150,
        },
        // 1순위: 그룹 통합 채용 사이트.
        PlatformRule {
            tag: PlatformTag::GroupPortal,
            dedicated: true,
            matches: |ctx| {
                contains_any(&ctx.host, GROUP_RECRUIT_DOMAINS)
                    || contains_any(&ctx.title_lower, GROUP_TITLE_KEYWORDS)
            },
            weight: |_| 95,
        },
        // 2순위: 자체 채용 사이트. 회사 도메인이면서 타이틀에 채용 키워드가
        // 있어야 한다.
        PlatformRule {
            tag: PlatformTag::SelfHosted,
            dedicated: true,
            matches: |ctx| {
                is_company_domain(ctx) && contains_any(&ctx.title_lower, RECRUIT_TITLE_KEYWORDS)
            },
            weight: |_| 90,
        },
        // 전용 HR 플랫폼: 하나라도 보이면 확정.
        PlatformRule {
            tag: PlatformTag::Greeting,
            dedicated: true,
            matches: |ctx| ctx.url_lower.contains("greetinghr"),
            weight: |_| 80,
        },
        PlatformRule {
            tag: PlatformTag::MidasIn,
            dedicated: true,
            matches: |ctx| ctx.host.contains("recruiter.co.kr"),
            weight: |_| 80,
        },
        PlatformRule {
            tag: PlatformTag::Jobda,
            dedicated: true,
            matches: |ctx| ctx.host.contains("recruiter.im"),
            weight: |_| 80,
        },
        PlatformRule {
            tag: PlatformTag::NineHire,
            dedicated: true,
            matches: |ctx| ctx.host.contains("ninehire.site"),
            weight: |_| 80,
        },
        // 3순위: 주요 채용 플랫폼.
        PlatformRule {
            tag: PlatformTag::Wanted,
            dedicated: false,
            matches: |ctx| ctx.host.contains("wanted.co.kr"),
            weight: |_| 50,
        },
        PlatformRule {
            tag: PlatformTag::RocketPunch,
            dedicated: false,
            matches: |ctx| ctx.host.contains("rocketpunch.com"),
            weight: |_| 50,
        },
        PlatformRule {
            tag: PlatformTag::Programmers,
            dedicated: false,
            matches: |ctx| ctx.host.contains("programmers.co.kr"),
            weight: |_| 50,
        },
        PlatformRule {
            tag: PlatformTag::LinkedIn,
            dedicated: false,
            matches: |ctx| ctx.host.contains("linkedin.com"),
            weight: |_| 50,
        },
        PlatformRule {
            tag: PlatformTag::Jumpit,
            dedicated: false,
            matches: |ctx| ctx.host.contains("jumpit.co.kr"),
            weight: |_| 50,
        },
        // 4순위: 잡코리아. 공고 건수가 타이틀에 보이면 가중치 상승.
        PlatformRule {
            tag: PlatformTag::JobKorea,
            dedicated: false,
            matches: |ctx| ctx.host.contains("jobkorea.co.kr"),
            weight: |ctx| if has_posting_count(ctx.title) { 60 } else { 40 },
        },
        // 5순위: 사람인. 같은 공고 건수 패턴을 본다.
        PlatformRule {
            tag: PlatformTag::Saramin,
            dedicated: false,
            matches: |ctx| ctx.host.contains("saramin.co.kr"),
            weight: |ctx| if has_posting_count(ctx.title) { 60 } else { 35 },
        },
        // 기타: 항상 매치, 공고없음 판별용.
        PlatformRule {
            tag: PlatformTag::Other,
            dedicated: false,
            matches: |_| true,
            weight: |_| 10,
        },
    ]
}

/// Classifies one search hit. First matching rule wins; the catch-all rule at
/// the end keeps this total.
pub fn identify_platform(
    url: &str,
    company: &CompanyIdentity,
    title: &str,
    rank: usize,
) -> PlatformCandidate {
    let ctx = MatchContext::build(url, company, title);

    for rule in ruleset() {
        if rule.matches(&ctx) {
            return PlatformCandidate {
                tag: rule.tag,
                weight: rule.weight(&ctx),
                dedicated: rule.dedicated,
                domain: ctx.host,
                rank,
            };
        }
    }

    PlatformCandidate {
        tag: PlatformTag::Unknown,
        weight: 0,
        dedicated: false,
        domain: ctx.host,
        rank,
    }
}

#[cfg(test)]
mod tests {
    use super::identify_platform;
    use crate::domain::{CompanyIdentity, PlatformTag};

    fn company(name: &str) -> CompanyIdentity {
        CompanyIdentity::named(name)
    }

    #[test]
    fn every_input_gets_a_candidate() {
        let candidate = identify_platform("not a url at all", &company("네이버"), "", 1);

        assert_eq!(candidate.tag, PlatformTag::Other);
        assert_eq!(candidate.weight, 10);
        assert_eq!(candidate.domain, "");
    }

    #[test]
    fn shell_company_outranks_everything() {
        let candidate = identify_platform(
            "https://careers.kakao.com/jobs",
            &company("하나금융25호스팩"),
            "그룹 채용",
            1,
        );

        assert_eq!(candidate.tag, PlatformTag::ShellCompany);
        assert_eq!(candidate.weight, 150);
        assert!(!candidate.dedicated);
    }

    #[test]
    fn group_portal_beats_named_job_board() {
        // Matches both the group-portal title rule and the 링크드인 host rule;
        // position in the ruleset decides, not weight.
        let candidate = identify_platform(
            "https://www.linkedin.com/company/lg",
            &company("LG전자"),
            "LG그룹 채용 공식 사이트",
            1,
        );

        assert_eq!(candidate.tag, PlatformTag::GroupPortal);
        assert_eq!(candidate.weight, 95);
        assert!(candidate.dedicated);
    }

    #[test]
    fn group_portal_matches_by_domain() {
        let candidate =
            identify_platform("https://careers.kakao.com/jobs", &company("카카오페이"), "", 3);

        assert_eq!(candidate.tag, PlatformTag::GroupPortal);
    }

    #[test]
    fn self_hosted_needs_domain_and_title_keyword() {
        // Domain matches but no hiring keyword in the title.
        let candidate = identify_platform(
            "https://toss.im/about",
            &CompanyIdentity {
                name: "토스".to_string(),
                domain: Some("toss.im".to_string()),
            },
            "토스 소개",
            1,
        );
        assert_eq!(candidate.tag, PlatformTag::Other);

        // Both stages pass.
        let candidate = identify_platform(
            "https://toss.im/career",
            &CompanyIdentity {
                name: "토스".to_string(),
                domain: Some("toss.im".to_string()),
            },
            "토스 채용공고",
            1,
        );
        assert_eq!(candidate.tag, PlatformTag::SelfHosted);
        assert_eq!(candidate.weight, 90);
        assert!(candidate.dedicated);
    }

    #[test]
    fn self_hosted_infers_domain_from_latin_name() {
        let candidate = identify_platform(
            "https://curiosis.co.kr/recruit",
            &company("Curiosis"),
            "Careers at Curiosis",
            2,
        );

        assert_eq!(candidate.tag, PlatformTag::SelfHosted);
    }

    #[test]
    fn hr_platform_hosts_are_dedicated() {
        let cases = [
            ("https://acme.career.greetinghr.com/", PlatformTag::Greeting),
            ("https://acme.recruiter.co.kr/appsite", PlatformTag::MidasIn),
            ("https://acme.recruiter.im/", PlatformTag::Jobda),
            ("https://acme.ninehire.site/", PlatformTag::NineHire),
        ];

        for (url, expected) in cases {
            let candidate = identify_platform(url, &company("에이크미"), "", 1);
            assert_eq!(candidate.tag, expected, "url: {url}");
            assert_eq!(candidate.weight, 80);
            assert!(candidate.dedicated);
        }
    }

    #[test]
    fn job_board_weight_rises_with_posting_count() {
        let with_count = identify_platform(
            "https://www.jobkorea.co.kr/company/123",
            &company("에이크미"),
            "에이크미 - 진행 중인 공고 총 5건",
            1,
        );
        assert_eq!(with_count.tag, PlatformTag::JobKorea);
        assert_eq!(with_count.weight, 60);

        let without_count = identify_platform(
            "https://www.jobkorea.co.kr/company/123",
            &company("에이크미"),
            "에이크미 - 진행 중인 공고 확인하기",
            1,
        );
        assert_eq!(without_count.weight, 40);
    }

    #[test]
    fn saramin_weight_rises_with_posting_count() {
        let with_count = identify_platform(
            "https://www.saramin.co.kr/company/123",
            &company("에이크미"),
            "진행 중인 공고 총 12건",
            1,
        );
        assert_eq!(with_count.tag, PlatformTag::Saramin);
        assert_eq!(with_count.weight, 60);

        let without_count = identify_platform(
            "https://www.saramin.co.kr/company/123",
            &company("에이크미"),
            "진행 중인 공고 확인하기",
            1,
        );
        assert_eq!(without_count.weight, 35);
    }

    #[test]
    fn posting_count_allows_flexible_spacing() {
        let candidate = identify_platform(
            "https://www.saramin.co.kr/company/123",
            &company("에이크미"),
            "진행중인 공고 7건",
            1,
        );

        assert_eq!(candidate.weight, 60);
    }
}
