//! Scripted in-memory driver for exercising the tab lifecycle and download
//! dispatch state machine without a real browser.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use pagefetch::driver::{Driver, ElementHandle, Tab};
use pagefetch::tabs::TabManager;
use pagefetch::utils::constants::DRIVE_DOWNLOAD_SELECTOR;

/// Mutable world the scripted driver plays back
#[derive(Default)]
pub struct ScriptedState {
    /// Number of currently open tabs, home included
    pub tabs_open: usize,
    /// Name of the tab currently in the foreground
    pub active: String,
    /// goto target -> URL the navigation actually lands on
    pub redirects: HashMap<String, String>,
    /// landed URL -> anchor hrefs present on that page
    pub anchors: HashMap<String, Vec<String>>,
    /// landed URLs where the Drive download control is present
    pub control_urls: Vec<String>,
    /// landed URLs whose body never appears
    pub pages_without_body: Vec<String>,
    /// goto targets that fail outright
    pub failing_navigations: Vec<String>,
    /// Every goto target, in order, across all tabs
    pub navigations: Vec<String>,
    /// Landed URLs whose download control was clicked, in order
    pub clicks: Vec<String>,
    next_tab_id: usize,
}

pub struct ScriptedDriver {
    state: Arc<Mutex<ScriptedState>>,
}

pub struct ScriptedTab {
    name: String,
    state: Arc<Mutex<ScriptedState>>,
    current: Mutex<String>,
}

struct ScriptedElement {
    href: Option<String>,
    click_url: Option<String>,
    state: Arc<Mutex<ScriptedState>>,
}

/// Build a tab manager over a scripted driver, with the home tab already
/// open and active.
pub fn scripted_manager(mut state: ScriptedState) -> (TabManager, Arc<Mutex<ScriptedState>>) {
    state.tabs_open = 1;
    state.active = "home".to_string();
    let state = Arc::new(Mutex::new(state));

    let driver = Arc::new(ScriptedDriver {
        state: Arc::clone(&state),
    });
    let home = Arc::new(ScriptedTab {
        name: "home".to_string(),
        state: Arc::clone(&state),
        current: Mutex::new("about:blank".to_string()),
    });

    (TabManager::new(driver, home), state)
}

#[async_trait]
impl Driver for ScriptedDriver {
    async fn open_tab(&self) -> Result<Arc<dyn Tab>> {
        let mut state = self.state.lock().unwrap();
        state.tabs_open += 1;
        state.next_tab_id += 1;
        let name = format!("work-{}", state.next_tab_id);
        Ok(Arc::new(ScriptedTab {
            name,
            state: Arc::clone(&self.state),
            current: Mutex::new("about:blank".to_string()),
        }))
    }

    async fn tab_count(&self) -> Result<usize> {
        Ok(self.state.lock().unwrap().tabs_open)
    }
}

#[async_trait]
impl Tab for ScriptedTab {
    async fn goto(&self, url: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if state.failing_navigations.iter().any(|u| u == url) {
            return Err(anyhow!("navigation to {url} refused"));
        }
        state.navigations.push(url.to_string());
        let landed = state
            .redirects
            .get(url)
            .cloned()
            .unwrap_or_else(|| url.to_string());
        *self.current.lock().unwrap() = landed;
        Ok(())
    }

    async fn current_url(&self) -> String {
        self.current.lock().unwrap().clone()
    }

    async fn find_all(&self, selector: &str) -> Result<Vec<Box<dyn ElementHandle>>> {
        let current = self.current.lock().unwrap().clone();
        let state = self.state.lock().unwrap();

        let elements: Vec<Box<dyn ElementHandle>> = match selector {
            "body" => {
                if state.pages_without_body.iter().any(|u| u == &current) {
                    Vec::new()
                } else {
                    vec![Box::new(ScriptedElement {
                        href: None,
                        click_url: None,
                        state: Arc::clone(&self.state),
                    })]
                }
            }
            "a" => state
                .anchors
                .get(&current)
                .map(|hrefs| {
                    hrefs
                        .iter()
                        .map(|href| {
                            Box::new(ScriptedElement {
                                href: Some(href.clone()),
                                click_url: None,
                                state: Arc::clone(&self.state),
                            }) as Box<dyn ElementHandle>
                        })
                        .collect()
                })
                .unwrap_or_default(),
            DRIVE_DOWNLOAD_SELECTOR => {
                if state.control_urls.iter().any(|u| u == &current) {
                    vec![Box::new(ScriptedElement {
                        href: None,
                        click_url: Some(current.clone()),
                        state: Arc::clone(&self.state),
                    })]
                } else {
                    Vec::new()
                }
            }
            _ => Vec::new(),
        };
        Ok(elements)
    }

    async fn activate(&self) -> Result<()> {
        self.state.lock().unwrap().active = self.name.clone();
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if state.tabs_open == 0 {
            return Err(anyhow!("no tab left to close"));
        }
        state.tabs_open -= 1;
        Ok(())
    }
}

#[async_trait]
impl ElementHandle for ScriptedElement {
    async fn attribute(&self, name: &str) -> Result<Option<String>> {
        if name == "href" {
            Ok(self.href.clone())
        } else {
            Ok(None)
        }
    }

    async fn click(&self) -> Result<()> {
        match &self.click_url {
            Some(url) => {
                self.state.lock().unwrap().clicks.push(url.clone());
                Ok(())
            }
            None => Err(anyhow!("element is not clickable")),
        }
    }
}
