use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "recruitmap", about = "채용 플랫폼 분포 크롤러 및 대시보드")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Crawl search results for each company and classify its platform
    Crawl {
        /// Company list file (회사명 or 회사명|domain.tld per line)
        #[arg(default_value = "companies.md")]
        companies_file: PathBuf,

        /// Zero-based index to start from
        #[arg(long, default_value_t = 0)]
        start: usize,

        /// Number of companies to process (whole list when omitted)
        #[arg(long)]
        count: Option<usize>,
    },
    /// Reclassify the persisted results with the current ruleset, no scraping
    Reanalyze,
    /// Strip the sticky platform-change flags from every stored entry
    ClearChanges,
    /// Rewrite the CSV and platform-stats exports from the current store
    Export,
    /// Serve the dashboard over HTTP
    Serve,
}
