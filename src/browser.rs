use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use reqwest::Proxy;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, error, info};

use crate::api::{self, ApiError, HttpMealApi, MealApi};
use crate::model::Selection;
use crate::page::{ClickTarget, Notice, Page};

pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.15; rv:95.0) Gecko/20100101 Firefox/95.0";

#[derive(Clone, Debug)]
pub struct Options {
    pub api_base: String,
    /// Zero disables the request timeout.
    pub timeout_seconds: u64,
    pub proxy: Option<String>,
    pub user_agent: String,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            api_base: api::DEFAULT_API_BASE.to_string(),
            timeout_seconds: 10,
            proxy: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("invalid user agent: {value}")]
    InvalidUserAgent { value: String },

    #[error("failed to build HTTP client: {source}")]
    HttpClientBuild {
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to setup proxy: {proxy}: {source}")]
    ProxySetup {
        proxy: String,
        #[source]
        source: reqwest::Error,
    },

    #[error(transparent)]
    Api(#[from] ApiError),
}

pub fn build_client(options: &Options) -> Result<reqwest::Client, BrowserError> {
    let mut headers = reqwest::header::HeaderMap::new();
    let user_agent = reqwest::header::HeaderValue::from_str(&options.user_agent).map_err(|_| {
        BrowserError::InvalidUserAgent {
            value: options.user_agent.clone(),
        }
    })?;
    headers.insert(reqwest::header::USER_AGENT, user_agent);

    let mut builder = reqwest::Client::builder().default_headers(headers);
    if options.timeout_seconds > 0 {
        builder = builder.timeout(Duration::from_secs(options.timeout_seconds));
    }
    if let Some(proxy) = options.proxy.as_deref().filter(|p| !p.trim().is_empty()) {
        let proxy_cfg = Proxy::all(proxy).map_err(|source| BrowserError::ProxySetup {
            proxy: proxy.to_string(),
            source,
        })?;
        builder = builder.proxy(proxy_cfg);
    }
    builder
        .build()
        .map_err(|source| BrowserError::HttpClientBuild { source })
}

/// Monotonic token issued per load; only the holder of the latest token may
/// write its result to the page.
#[derive(Clone, Debug, Default)]
pub struct RequestSequence(Arc<AtomicU64>);

impl RequestSequence {
    pub fn issue(&self) -> u64 {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn is_current(&self, token: u64) -> bool {
        self.0.load(Ordering::SeqCst) == token
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Cards or a recipe were rendered.
    Rendered,
    /// The request succeeded but had nothing to show.
    Empty,
    Failed,
    /// A newer load was issued before this one settled; nothing was written.
    Stale,
}

/// Owns the page and dispatches user events to the recipe service.
///
/// Clones share the same page and sequence counters, so a clone can be moved
/// into a spawned task while the original keeps handling input.
#[derive(Clone)]
pub struct RecipeBrowser {
    api: Arc<dyn MealApi>,
    page: Arc<Mutex<Page>>,
    selection_seq: RequestSequence,
    detail_seq: RequestSequence,
    spinner: ProgressBar,
}

impl RecipeBrowser {
    pub fn new(options: &Options) -> Result<Self, BrowserError> {
        let client = build_client(options)?;
        let api = HttpMealApi::new(client, &options.api_base)?;
        Ok(Self::with_api(Arc::new(api)))
    }

    pub fn with_api(api: Arc<dyn MealApi>) -> Self {
        Self {
            api,
            page: Arc::new(Mutex::new(Page::new())),
            selection_seq: RequestSequence::default(),
            detail_seq: RequestSequence::default(),
            spinner: ProgressBar::hidden(),
        }
    }

    /// Uses `pb` as the visible loading indicator.
    pub fn with_spinner(mut self, pb: ProgressBar) -> Self {
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.blue} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        self.spinner = pb;
        self
    }

    pub async fn snapshot(&self) -> Page {
        self.page.lock().await.clone()
    }

    fn show_loading(&self, msg: &str) {
        self.spinner.set_message(msg.to_string());
        self.spinner.enable_steady_tick(Duration::from_millis(120));
    }

    fn hide_loading(&self) {
        self.spinner.disable_steady_tick();
        self.spinner.finish_and_clear();
        self.spinner.reset();
    }

    pub async fn load_areas(&self) -> LoadOutcome {
        match self.api.list_areas().await {
            Ok(areas) => {
                info!(count = areas.len(), "loaded cuisines");
                self.page.lock().await.set_areas(&areas);
                LoadOutcome::Rendered
            }
            Err(e) => {
                error!(error = %e, "error loading areas");
                self.page.lock().await.set_areas(&[]);
                LoadOutcome::Failed
            }
        }
    }

    pub async fn on_selection_change(&self, value: &str) -> LoadOutcome {
        self.page.lock().await.selected = value.trim().to_string();
        match Selection::parse(value) {
            Selection::Random => self.get_random_meal().await,
            Selection::Cuisine(area) => self.load_recipes_by_area(&area).await,
            Selection::Empty => {
                let mut page = self.page.lock().await;
                // retire whatever is still in flight so it cannot repaint the grid
                self.selection_seq.issue();
                page.show_welcome();
                self.hide_loading();
                LoadOutcome::Empty
            }
        }
    }

    async fn begin_selection_load(&self, msg: &str) -> u64 {
        let mut page = self.page.lock().await;
        let token = self.selection_seq.issue();
        page.begin_load();
        self.show_loading(msg);
        token
    }

    pub async fn load_recipes_by_area(&self, area: &str) -> LoadOutcome {
        let token = self.begin_selection_load("loading recipes").await;
        let result = self.api.filter_by_area(area).await;

        let mut page = self.page.lock().await;
        if !self.selection_seq.is_current(token) {
            debug!(area, token, "discarding stale recipe list");
            return LoadOutcome::Stale;
        }
        page.finish_load();
        self.hide_loading();
        match result {
            Ok(recipes) if recipes.is_empty() => {
                page.show_cards(recipes);
                LoadOutcome::Empty
            }
            Ok(recipes) => {
                info!(area, count = recipes.len(), "loaded recipes");
                page.show_cards(recipes);
                LoadOutcome::Rendered
            }
            Err(e) => {
                error!(error = %e, area, "error loading recipes");
                page.show_notice(Notice::RecipesFailed);
                LoadOutcome::Failed
            }
        }
    }

    pub async fn get_random_meal(&self) -> LoadOutcome {
        let token = self.begin_selection_load("fetching a random meal").await;
        let result = match self.api.random().await {
            Ok(Some(detail)) => Ok(detail),
            Ok(None) => Err(ApiError::MissingMeals {
                endpoint: "random.php".to_string(),
            }),
            Err(e) => Err(e),
        };

        let mut page = self.page.lock().await;
        if !self.selection_seq.is_current(token) {
            debug!(token, "discarding stale random meal");
            return LoadOutcome::Stale;
        }
        page.finish_load();
        self.hide_loading();
        match result {
            Ok(detail) => {
                info!(id = %detail.id, name = %detail.name, "showing random meal");
                page.open_modal(detail);
                LoadOutcome::Rendered
            }
            Err(e) => {
                error!(error = %e, "error fetching random meal");
                page.show_notice(Notice::RandomFailed);
                LoadOutcome::Failed
            }
        }
    }

    pub async fn show_recipe_detail(&self, id: &str) -> LoadOutcome {
        let token = self.detail_seq.issue();
        let result = match self.api.lookup(id).await {
            Ok(Some(detail)) => Ok(detail),
            Ok(None) => Err(ApiError::MissingMeals {
                endpoint: format!("lookup.php?i={id}"),
            }),
            Err(e) => Err(e),
        };

        let mut page = self.page.lock().await;
        if !self.detail_seq.is_current(token) {
            debug!(id, token, "discarding stale recipe detail");
            return LoadOutcome::Stale;
        }
        match result {
            Ok(detail) => {
                page.open_modal(detail);
                LoadOutcome::Rendered
            }
            Err(e) => {
                error!(error = %e, id, "error loading recipe detail");
                page.show_notice(Notice::DetailFailed);
                LoadOutcome::Failed
            }
        }
    }

    /// Opens the card at `index` in the grid, `None` if there is no such card.
    pub async fn open_card(&self, index: usize) -> Option<LoadOutcome> {
        let id = {
            let page = self.page.lock().await;
            page.card(index)?.id.clone()
        };
        Some(self.show_recipe_detail(&id).await)
    }

    pub async fn close_modal(&self) -> bool {
        self.page.lock().await.close_modal()
    }

    pub async fn click_modal(&self, target: ClickTarget) -> bool {
        self.page.lock().await.click_modal(target)
    }

    pub async fn key_down(&self, key: &str) -> bool {
        self.page.lock().await.key_down(key)
    }
}
