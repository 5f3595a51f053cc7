use std::path::PathBuf;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::page::PrintToPdfParams;
use chromiumoxide::{Element, Page};
use futures::StreamExt;
use press_logging::{press_debug, press_warn};
use tokio::task::JoinHandle;

use crate::driver::{DriverError, PageDriver, PageSession};

#[derive(Debug, Clone)]
pub struct BrowserSettings {
    pub navigation_timeout: Duration,
    /// Delay between element-lookup attempts during bounded waits.
    pub element_poll_interval: Duration,
    pub window_size: (u32, u32),
    /// Explicit Chrome/Chromium binary; when unset, `$CHROME_BIN` and a few
    /// well-known install paths are probed before chromiumoxide's own lookup.
    pub chrome_binary: Option<PathBuf>,
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            navigation_timeout: Duration::from_secs(30),
            element_poll_interval: Duration::from_millis(250),
            window_size: (1920, 1080),
            chrome_binary: None,
        }
    }
}

/// Headless-Chromium page automation over the Chrome DevTools Protocol.
///
/// Each [`PageDriver::open`] call launches a dedicated browser process; the
/// session owns it exclusively and tears it down on close, so no page state
/// leaks between jobs.
#[derive(Debug, Clone, Default)]
pub struct ChromiumPageDriver {
    settings: BrowserSettings,
}

impl ChromiumPageDriver {
    pub fn new(settings: BrowserSettings) -> Self {
        Self { settings }
    }

    fn find_chrome_binary(&self) -> Option<PathBuf> {
        if let Some(path) = &self.settings.chrome_binary {
            return Some(path.clone());
        }
        if let Ok(raw) = std::env::var("CHROME_BIN") {
            let path = PathBuf::from(&raw);
            if path.exists() {
                return Some(path);
            }
        }
        const CANDIDATES: &[&str] = &[
            "/usr/bin/google-chrome-stable",
            "/usr/bin/google-chrome",
            "/usr/bin/chromium",
            "/usr/bin/chromium-browser",
        ];
        CANDIDATES.iter().map(PathBuf::from).find(|p| p.exists())
    }
}

#[async_trait]
impl PageDriver for ChromiumPageDriver {
    async fn open(&self) -> Result<Box<dyn PageSession>, DriverError> {
        let (width, height) = self.settings.window_size;
        let mut builder = BrowserConfig::builder().no_sandbox();
        if let Some(bin) = self.find_chrome_binary() {
            builder = builder.chrome_executable(bin);
        }
        let config = builder
            .arg("--headless=new")
            .arg("--disable-gpu")
            .arg(format!("--window-size={width},{height}"))
            .arg("--disable-extensions")
            .arg("--disable-dev-shm-usage")
            .build()
            .map_err(DriverError::Backend)?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|err| DriverError::Backend(format!("failed to launch browser: {err}")))?;

        // The CDP handler must be polled continuously for the connection to work.
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    press_warn!("Browser CDP handler error: {event:?}");
                    break;
                }
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|err| DriverError::Backend(format!("failed to open page: {err}")))?;

        Ok(Box::new(ChromiumPageSession {
            browser,
            page,
            handler_task,
            settings: self.settings.clone(),
        }))
    }
}

struct ChromiumPageSession {
    browser: Browser,
    page: Page,
    handler_task: JoinHandle<()>,
    settings: BrowserSettings,
}

impl ChromiumPageSession {
    async fn find_labeled(&self, label: &str, timeout: Duration) -> Result<Element, DriverError> {
        let xpath = labeled_control_xpath(label);
        let deadline = Instant::now() + timeout;
        loop {
            if let Ok(element) = self.page.find_xpath(xpath.as_str()).await {
                return Ok(element);
            }
            if Instant::now() >= deadline {
                return Err(DriverError::ElementTimeout {
                    label: label.to_string(),
                    timeout,
                });
            }
            tokio::time::sleep(self.settings.element_poll_interval).await;
        }
    }
}

#[async_trait]
impl PageSession for ChromiumPageSession {
    async fn navigate(&self, url: &str) -> Result<(), DriverError> {
        let navigation = async {
            self.page
                .goto(url)
                .await
                .map_err(|err| DriverError::Navigation(err.to_string()))?;
            self.page
                .wait_for_navigation()
                .await
                .map_err(|err| DriverError::Navigation(err.to_string()))?;
            Ok(())
        };
        match tokio::time::timeout(self.settings.navigation_timeout, navigation).await {
            Ok(result) => result,
            Err(_) => Err(DriverError::Navigation(format!(
                "no page load within {:?}",
                self.settings.navigation_timeout
            ))),
        }
    }

    async fn wait_visible(&self, label: &str, timeout: Duration) -> Result<(), DriverError> {
        self.find_labeled(label, timeout).await.map(|_| ())
    }

    async fn click_labeled(&self, label: &str, timeout: Duration) -> Result<(), DriverError> {
        let element = self.find_labeled(label, timeout).await?;
        element
            .click()
            .await
            .map_err(|err| DriverError::Backend(format!("click on {label:?} failed: {err}")))?;
        Ok(())
    }

    async fn title(&self) -> Result<String, DriverError> {
        self.page
            .get_title()
            .await
            .map(|title| title.unwrap_or_default())
            .map_err(|err| DriverError::Backend(format!("failed to read title: {err}")))
    }

    async fn pdf_bytes(&self) -> Result<Vec<u8>, DriverError> {
        self.page
            .pdf(print_params())
            .await
            .map_err(|err| DriverError::Backend(format!("pdf render failed: {err}")))
    }

    async fn trigger_print(&self) -> Result<(), DriverError> {
        self.page
            .evaluate("window.print();")
            .await
            .map_err(|err| DriverError::Backend(format!("print trigger failed: {err}")))?;
        Ok(())
    }

    async fn close(self: Box<Self>) {
        let ChromiumPageSession {
            mut browser,
            page,
            handler_task,
            settings: _,
        } = *self;
        if let Err(err) = page.close().await {
            press_debug!("page close failed: {err}");
        }
        if let Err(err) = browser.close().await {
            press_debug!("browser close failed: {err}");
        }
        let _ = browser.wait().await;
        handler_task.abort();
    }
}

/// Print options the exported pages are tuned for: portrait, no browser
/// header/footer, background graphics on, CSS page size honored.
fn print_params() -> PrintToPdfParams {
    let mut params = PrintToPdfParams::default();
    params.landscape = Some(false);
    params.display_header_footer = Some(false);
    params.print_background = Some(true);
    params.prefer_css_page_size = Some(true);
    params
}

/// The language selectors render as buttons whose visible text carries the
/// label, either directly or inside a span.
fn labeled_control_xpath(label: &str) -> String {
    format!("//button[.//span[contains(text(), '{label}')]] | //button[contains(text(), '{label}')]")
}
