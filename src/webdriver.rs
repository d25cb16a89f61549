use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use thirtyfour::prelude::*;
use tracing::{debug, info, warn};

use crate::config::PageConfig;
use crate::page::{PageElement, PageSource};

/// Dashboard page driven through a WebDriver session (chromedriver by default).
pub struct WebDriverPage {
    driver: WebDriver,
    config: PageConfig,
}

impl WebDriverPage {
    /// Open a browser session. Failure here is a startup fault.
    pub async fn open(config: &PageConfig) -> Result<Self> {
        let driver = new_session(config).await?;
        Ok(Self {
            driver,
            config: config.clone(),
        })
    }

    /// Replace the session with a fresh one, closing the old one best-effort.
    pub async fn reconnect(&mut self) -> Result<()> {
        let fresh = new_session(&self.config).await?;
        let stale = std::mem::replace(&mut self.driver, fresh);
        if let Err(e) = stale.quit().await {
            debug!("Closing stale WebDriver session failed: {e}");
        }
        info!("WebDriver session re-opened");
        Ok(())
    }

    pub async fn close(self) {
        if let Err(e) = self.driver.quit().await {
            warn!("Failed to close WebDriver session: {e}");
        }
    }
}

async fn new_session(config: &PageConfig) -> Result<WebDriver> {
    let mut caps = DesiredCapabilities::chrome();
    if config.headless {
        caps.set_headless()?;
    }
    let driver = WebDriver::new(config.webdriver_url.as_str(), caps)
        .await
        .with_context(|| format!("cannot open WebDriver session at {}", config.webdriver_url))?;
    driver
        .set_page_load_timeout(Duration::from_secs(config.load_timeout_secs))
        .await?;
    Ok(driver)
}

#[async_trait]
impl PageSource for WebDriverPage {
    async fn load(&mut self) -> Result<()> {
        self.driver
            .goto(self.config.url.as_str())
            .await
            .with_context(|| format!("failed to load {}", self.config.url))?;
        tokio::time::sleep(Duration::from_millis(self.config.settle_ms)).await;
        Ok(())
    }

    async fn query_all(&self, selector: &str) -> Result<Vec<Box<dyn PageElement>>> {
        let found = self.driver.find_all(By::Css(selector)).await?;
        Ok(wrap(found))
    }
}

struct WebDriverElement(WebElement);

fn wrap(elements: Vec<WebElement>) -> Vec<Box<dyn PageElement>> {
    elements
        .into_iter()
        .map(|e| Box::new(WebDriverElement(e)) as Box<dyn PageElement>)
        .collect()
}

#[async_trait]
impl PageElement for WebDriverElement {
    /// The DOM `innerText` property; tooltip bodies are hidden until hover, so
    /// WebDriver's rendered-text endpoint would return them empty.
    async fn inner_text(&self) -> Result<String> {
        match self.0.prop("innerText").await? {
            Some(text) => Ok(text),
            None => Ok(self.0.text().await?),
        }
    }

    async fn attribute(&self, name: &str) -> Result<Option<String>> {
        Ok(self.0.attr(name).await?)
    }

    async fn query_all(&self, selector: &str) -> Result<Vec<Box<dyn PageElement>>> {
        let found = self.0.find_all(By::Css(selector)).await?;
        Ok(wrap(found))
    }
}
