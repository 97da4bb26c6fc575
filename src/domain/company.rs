use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyIdentity {
    pub name: String,
    pub domain: Option<String>,
}

impl CompanyIdentity {
    pub fn named(name: &str) -> Self {
        CompanyIdentity {
            name: name.to_string(),
            domain: None,
        }
    }
}

/// Reads the company list file. One company per line, either `회사명` or
/// `회사명|domain.tld`. Blank lines and `#` comments are skipped, leading
/// `-`/`*` list markers are stripped.
pub fn read_companies_file(path: &Path) -> anyhow::Result<Vec<CompanyIdentity>> {
    let content = fs::read_to_string(path)?;
    Ok(parse_company_lines(&content))
}

fn parse_company_lines(content: &str) -> Vec<CompanyIdentity> {
    content
        .lines()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| {
            line.trim_start_matches(['-', '*'])
                .trim_start()
        })
        .filter(|line| !line.is_empty())
        .map(|line| match line.split_once('|') {
            Some((name, domain)) => CompanyIdentity {
                name: name.trim().to_string(),
                domain: Some(domain.trim().to_string()),
            },
            None => CompanyIdentity {
                name: line.to_string(),
                domain: None,
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::parse_company_lines;

    #[test]
    fn parses_names_and_domains() {
        let content = "\
# 크롤링 대상
네이버

- 카카오
* 큐리오시스|curiosis.co.kr
토스 | toss.im
";
        let companies = parse_company_lines(content);

        assert_eq!(companies.len(), 4);
        assert_eq!(companies[0].name, "네이버");
        assert_eq!(companies[0].domain, None);
        assert_eq!(companies[1].name, "카카오");
        assert_eq!(companies[2].name, "큐리오시스");
        assert_eq!(companies[2].domain.as_deref(), Some("curiosis.co.kr"));
        assert_eq!(companies[3].name, "토스");
        assert_eq!(companies[3].domain.as_deref(), Some("toss.im"));
    }

    #[test]
    fn skips_blank_and_comment_lines() {
        let companies = parse_company_lines("\n\n# only comments\n   \n");
        assert!(companies.is_empty());
    }
}
