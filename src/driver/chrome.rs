//! chromiumoxide implementation of the driver traits
//!
//! Thin adapters from `Browser`/`Page`/`Element` to the capability boundary.
//! All CDP failures surface as `anyhow` errors with context; URL reads fall
//! back to `about:blank` for clear diagnostics instead of failing.

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chromiumoxide::browser::Browser;
use chromiumoxide::element::Element;
use chromiumoxide::page::Page;
use tracing::trace;

use super::{Driver, ElementHandle, Tab};

/// `Driver` over a shared chromiumoxide browser handle
pub struct ChromeDriver {
    browser: Arc<Browser>,
}

impl ChromeDriver {
    #[must_use]
    pub fn new(browser: Arc<Browser>) -> Self {
        Self { browser }
    }
}

#[async_trait]
impl Driver for ChromeDriver {
    async fn open_tab(&self) -> Result<Arc<dyn Tab>> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .context("Failed to open new tab")?;
        Ok(Arc::new(ChromeTab { page }))
    }

    async fn tab_count(&self) -> Result<usize> {
        let pages = self
            .browser
            .pages()
            .await
            .context("Failed to list open tabs")?;
        Ok(pages.len())
    }
}

/// `Tab` over one chromiumoxide page target
pub struct ChromeTab {
    page: Page,
}

impl ChromeTab {
    #[must_use]
    pub fn new(page: Page) -> Self {
        Self { page }
    }
}

#[async_trait]
impl Tab for ChromeTab {
    async fn goto(&self, url: &str) -> Result<()> {
        self.page
            .goto(url)
            .await
            .with_context(|| format!("Navigation to {url} failed"))?;
        Ok(())
    }

    async fn current_url(&self) -> String {
        match self.page.url().await {
            Ok(Some(url)) => url,
            Ok(None) => {
                trace!("page URL is None (page not yet navigated)");
                "about:blank".to_string()
            }
            Err(e) => {
                trace!("failed to get page URL: {e}");
                "about:blank".to_string()
            }
        }
    }

    async fn find_all(&self, selector: &str) -> Result<Vec<Box<dyn ElementHandle>>> {
        let elements = self
            .page
            .find_elements(selector)
            .await
            .with_context(|| format!("Element lookup '{selector}' failed"))?;
        Ok(elements
            .into_iter()
            .map(|inner| Box::new(ChromeElement { inner }) as Box<dyn ElementHandle>)
            .collect())
    }

    async fn activate(&self) -> Result<()> {
        self.page
            .bring_to_front()
            .await
            .context("Failed to bring tab to front")?;
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        // Page::close consumes; Page is a cheap Arc-backed clone
        self.page.clone().close().await.context("Failed to close tab")?;
        Ok(())
    }
}

struct ChromeElement {
    inner: Element,
}

#[async_trait]
impl ElementHandle for ChromeElement {
    async fn attribute(&self, name: &str) -> Result<Option<String>> {
        self.inner
            .attribute(name)
            .await
            .with_context(|| format!("Failed to read attribute '{name}'"))
    }

    async fn click(&self) -> Result<()> {
        self.inner.click().await.context("Click failed")?;
        Ok(())
    }
}
