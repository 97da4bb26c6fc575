use std::path::PathBuf;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub crawler: CrawlerSettings,
    pub storage: StorageSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApplicationSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerSettings {
    pub webdriver_url: String,
    /// Appended to the company name to build the search query.
    pub search_keyword: String,
    /// Ranked results kept per query.
    pub max_results: usize,
    /// Pacing delay range between companies, milliseconds.
    pub min_delay_ms: u64,
    pub max_delay_ms: u64,
    /// Store + progress flush cadence, in companies.
    pub checkpoint_interval: usize,
    /// Countdown before the operator confirms the CAPTCHA warm-up.
    pub warmup_wait_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    pub results_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            application: ApplicationSettings::default(),
            crawler: CrawlerSettings::default(),
            storage: StorageSettings::default(),
        }
    }
}

impl Default for ApplicationSettings {
    fn default() -> Self {
        ApplicationSettings {
            host: "127.0.0.1".to_string(),
            port: 8000,
        }
    }
}

impl Default for CrawlerSettings {
    fn default() -> Self {
        CrawlerSettings {
            webdriver_url: "http://localhost:9515".to_string(),
            search_keyword: "채용".to_string(),
            max_results: 10,
            min_delay_ms: 3000,
            max_delay_ms: 8000,
            checkpoint_interval: 10,
            warmup_wait_secs: 60,
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        StorageSettings {
            results_dir: PathBuf::from("results"),
        }
    }
}

impl StorageSettings {
    /// The live document the dashboard reads and every pass merges into.
    pub fn store_path(&self) -> PathBuf {
        self.results_dir.join("results_temp.json")
    }

    pub fn progress_path(&self) -> PathBuf {
        self.results_dir.join("progress.json")
    }

    /// Where an aborted crawl flushes whatever it accumulated.
    pub fn error_path(&self) -> PathBuf {
        self.results_dir.join("results_error.json")
    }
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("configuration").required(false))
        .add_source(
            config::Environment::with_prefix("RECRUITMAP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<Settings>()
}

#[cfg(test)]
mod tests {
    use super::Settings;

    #[test]
    fn defaults_cover_every_field() {
        let settings = Settings::default();

        assert_eq!(settings.crawler.max_results, 10);
        assert_eq!(settings.crawler.checkpoint_interval, 10);
        assert!(settings.crawler.min_delay_ms <= settings.crawler.max_delay_ms);
        assert!(settings
            .storage
            .store_path()
            .ends_with("results_temp.json"));
    }
}
