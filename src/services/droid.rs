use thirtyfour::{DesiredCapabilities, WebDriver};

/// Thin wrapper over the WebDriver session the crawl runs in. A visible
/// browser window is assumed so the operator can solve the CAPTCHA during
/// warm-up.
pub struct Droid {
    pub driver: WebDriver,
}

impl Droid {
    pub async fn new(webdriver_url: &str) -> anyhow::Result<Self> {
        let caps = DesiredCapabilities::chrome();

        let driver = WebDriver::new(webdriver_url, caps).await?;
        driver.maximize_window().await?;

        Ok(Droid { driver })
    }

    pub async fn quit(self) -> anyhow::Result<()> {
        self.driver.quit().await?;
        Ok(())
    }
}
