use std::net::TcpListener;

use clap::Parser;
use env_logger::Env;
use recruitmap::{
    cli::{Cli, Command},
    configuration::get_configuration,
    services::{run_clear_changes, run_crawl, run_export, run_reanalysis, CrawlRange},
    startup::run,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let configuration = get_configuration().expect("Failed to read configuration.");

    match cli.command {
        Command::Crawl {
            companies_file,
            start,
            count,
        } => {
            run_crawl(&configuration, &companies_file, CrawlRange { start, count }).await?;
        }
        Command::Reanalyze => run_reanalysis(&configuration)?,
        Command::ClearChanges => run_clear_changes(&configuration)?,
        Command::Export => run_export(&configuration)?,
        Command::Serve => {
            let address = format!(
                "{}:{}",
                configuration.application.host, configuration.application.port
            );
            log::info!("Dashboard listening on http://{}", address);
            let listener = TcpListener::bind(address)?;
            run(listener, configuration)?.await?;
        }
    }

    Ok(())
}
