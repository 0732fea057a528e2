use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::api::{ApiError, MealApi};
use crate::browser::{LoadOutcome, RecipeBrowser};
use crate::model::{Cuisine, Ingredient, RecipeDetail, RecipeSummary};
use crate::page::{ClickTarget, Modal, Notice};

// holds filter requests for `area` until `release` is notified
struct Gate {
    area: String,
    started: Arc<Notify>,
    release: Arc<Notify>,
}

#[derive(Default)]
struct FakeApi {
    areas: Option<Vec<&'static str>>,
    recipes: HashMap<String, Vec<RecipeSummary>>,
    details: HashMap<String, RecipeDetail>,
    random: Option<RecipeDetail>,
    random_fails: bool,
    gate: Option<Gate>,
    calls: Mutex<Vec<String>>,
}

fn server_error(endpoint: &str) -> ApiError {
    ApiError::Status {
        endpoint: endpoint.to_string(),
        status: 500,
    }
}

impl FakeApi {
    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl MealApi for FakeApi {
    async fn list_areas(&self) -> Result<Vec<Cuisine>, ApiError> {
        self.record("list".to_string());
        match &self.areas {
            Some(areas) => Ok(areas.iter().map(|a| Cuisine::new(*a)).collect()),
            None => Err(server_error("list.php")),
        }
    }

    async fn filter_by_area(&self, area: &str) -> Result<Vec<RecipeSummary>, ApiError> {
        self.record(format!("filter:{area}"));
        if let Some(gate) = self.gate.as_ref().filter(|g| g.area == area) {
            gate.started.notify_one();
            gate.release.notified().await;
        }
        match self.recipes.get(area) {
            Some(list) => Ok(list.clone()),
            None if area == "Broken" => Err(server_error("filter.php")),
            None => Ok(Vec::new()),
        }
    }

    async fn lookup(&self, id: &str) -> Result<Option<RecipeDetail>, ApiError> {
        self.record(format!("lookup:{id}"));
        if id == "broken" {
            return Err(server_error("lookup.php"));
        }
        Ok(self.details.get(id).cloned())
    }

    async fn random(&self) -> Result<Option<RecipeDetail>, ApiError> {
        self.record("random".to_string());
        if self.random_fails {
            return Err(server_error("random.php"));
        }
        Ok(self.random.clone())
    }
}

fn summary(id: &str, name: &str) -> RecipeSummary {
    RecipeSummary {
        id: id.to_string(),
        name: name.to_string(),
        thumbnail: format!("https://img.example/{id}.jpg"),
    }
}

fn detail(id: &str, name: &str) -> RecipeDetail {
    RecipeDetail {
        id: id.to_string(),
        name: name.to_string(),
        category: "Pasta".to_string(),
        area: "Italian".to_string(),
        ingredients: vec![Ingredient {
            name: "Salt".to_string(),
            measure: "2 tsp".to_string(),
        }],
        instructions: "Boil water.".to_string(),
        ..RecipeDetail::default()
    }
}

fn italian_api() -> FakeApi {
    let mut api = FakeApi {
        areas: Some(vec!["American", "British", "Italian"]),
        random: Some(detail("900", "Mystery Pie")),
        ..FakeApi::default()
    };
    api.recipes.insert(
        "Italian".to_string(),
        vec![
            summary("52771", "Spicy Arrabiata Penne"),
            summary("52987", "Lasagne"),
            summary("53064", "Fettuccine Alfredo"),
        ],
    );
    api.details
        .insert("52987".to_string(), detail("52987", "Lasagne"));
    api
}

fn browser_for(api: FakeApi) -> (RecipeBrowser, Arc<FakeApi>) {
    let api = Arc::new(api);
    (RecipeBrowser::with_api(api.clone()), api)
}

#[tokio::test]
async fn areas_follow_random_option_in_response_order() {
    let (browser, _) = browser_for(italian_api());
    assert_eq!(browser.load_areas().await, LoadOutcome::Rendered);
    let page = browser.snapshot().await;
    let values: Vec<&str> = page.area_options.iter().map(|o| o.value.as_str()).collect();
    assert_eq!(values, vec!["random", "American", "British", "Italian"]);
    assert_eq!(page.area_options[0].label, "Random Cuisine");
}

#[tokio::test]
async fn areas_failure_leaves_only_random_option() {
    let (browser, _) = browser_for(FakeApi::default());
    assert_eq!(browser.load_areas().await, LoadOutcome::Failed);
    let page = browser.snapshot().await;
    assert_eq!(page.area_options.len(), 1);
    assert_eq!(page.area_options[0].value, "random");
}

#[tokio::test]
async fn cuisine_renders_one_card_per_recipe() {
    let (browser, api) = browser_for(italian_api());
    assert_eq!(
        browser.on_selection_change("Italian").await,
        LoadOutcome::Rendered
    );
    let page = browser.snapshot().await;
    assert_eq!(page.selected, "Italian");
    assert!(!page.loading);
    assert_eq!(page.notice, None);
    let ids: Vec<&str> = page.cards.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["52771", "52987", "53064"]);

    assert_eq!(browser.open_card(1).await, Some(LoadOutcome::Rendered));
    assert_eq!(api.calls().last().map(String::as_str), Some("lookup:52987"));
    let page = browser.snapshot().await;
    assert_eq!(page.modal.recipe().map(|d| d.id.as_str()), Some("52987"));
    assert!(page.scroll_locked);
}

#[tokio::test]
async fn open_card_out_of_range_does_nothing() {
    let (browser, api) = browser_for(italian_api());
    browser.on_selection_change("Italian").await;
    assert_eq!(browser.open_card(3).await, None);
    assert!(!api.calls().iter().any(|c| c.starts_with("lookup")));
}

#[tokio::test]
async fn cuisine_without_recipes_shows_empty_state() {
    let (browser, _) = browser_for(italian_api());
    browser.on_selection_change("Italian").await;
    assert_eq!(
        browser.on_selection_change("Atlantis").await,
        LoadOutcome::Empty
    );
    let page = browser.snapshot().await;
    assert!(page.cards.is_empty());
    assert_eq!(page.notice, Some(Notice::NoRecipes));
    assert!(!page.loading);
}

#[tokio::test]
async fn cuisine_failure_shows_error_notice() {
    let (browser, _) = browser_for(italian_api());
    assert_eq!(
        browser.on_selection_change("Broken").await,
        LoadOutcome::Failed
    );
    let page = browser.snapshot().await;
    assert!(page.cards.is_empty());
    assert_eq!(page.notice, Some(Notice::RecipesFailed));
    assert!(!page.loading);
}

#[tokio::test]
async fn random_sentinel_never_filters_and_cuisine_never_randomizes() {
    let (browser, api) = browser_for(italian_api());
    browser.on_selection_change("random").await;
    assert_eq!(api.calls(), vec!["random".to_string()]);

    browser.on_selection_change("Italian").await;
    let calls = api.calls();
    assert_eq!(calls.iter().filter(|c| *c == "random").count(), 1);
    assert_eq!(calls.last().map(String::as_str), Some("filter:Italian"));
}

#[tokio::test]
async fn random_meal_opens_modal() {
    let (browser, _) = browser_for(italian_api());
    browser.on_selection_change("Italian").await;
    assert_eq!(
        browser.on_selection_change("random").await,
        LoadOutcome::Rendered
    );
    let page = browser.snapshot().await;
    assert!(page.cards.is_empty());
    assert!(!page.loading);
    assert_eq!(
        page.modal.recipe().map(|d| d.name.as_str()),
        Some("Mystery Pie")
    );
    assert!(page.scroll_locked);
}

#[tokio::test]
async fn random_without_meal_is_an_error() {
    let (browser, _) = browser_for(FakeApi::default());
    assert_eq!(browser.get_random_meal().await, LoadOutcome::Failed);
    let page = browser.snapshot().await;
    assert_eq!(page.modal, Modal::Closed);
    assert_eq!(page.notice, Some(Notice::RandomFailed));
    assert!(!page.loading);
    assert!(!page.scroll_locked);
}

#[tokio::test]
async fn random_transport_failure_shows_notice() {
    let (browser, _) = browser_for(FakeApi {
        random_fails: true,
        ..italian_api()
    });
    assert_eq!(browser.get_random_meal().await, LoadOutcome::Failed);
    assert_eq!(
        browser.snapshot().await.notice,
        Some(Notice::RandomFailed)
    );
}

#[tokio::test]
async fn detail_failure_keeps_modal_closed() {
    let (browser, _) = browser_for(italian_api());
    assert_eq!(
        browser.show_recipe_detail("broken").await,
        LoadOutcome::Failed
    );
    assert_eq!(
        browser.show_recipe_detail("does-not-exist").await,
        LoadOutcome::Failed
    );
    let page = browser.snapshot().await;
    assert_eq!(page.modal, Modal::Closed);
    assert!(!page.scroll_locked);
    assert_eq!(page.notice, Some(Notice::DetailFailed));
}

#[tokio::test]
async fn empty_selection_clears_grid_and_welcomes() {
    let (browser, _) = browser_for(italian_api());
    browser.on_selection_change("Italian").await;
    assert_eq!(browser.on_selection_change("").await, LoadOutcome::Empty);
    let page = browser.snapshot().await;
    assert!(page.cards.is_empty());
    assert_eq!(page.notice, Some(Notice::Welcome));
    assert_eq!(page.selected, "");
}

#[tokio::test]
async fn modal_closes_on_backdrop_or_escape_only_once() {
    let (browser, _) = browser_for(italian_api());
    browser.show_recipe_detail("52987").await;
    assert!(!browser.click_modal(ClickTarget::Content).await);
    assert!(browser.snapshot().await.scroll_locked);
    assert!(browser.click_modal(ClickTarget::Backdrop).await);
    assert!(!browser.snapshot().await.scroll_locked);

    browser.show_recipe_detail("52987").await;
    assert!(browser.key_down("Escape").await);
    assert!(!browser.key_down("Escape").await);
    assert!(!browser.close_modal().await);
    let page = browser.snapshot().await;
    assert_eq!(page.modal, Modal::Closed);
    assert!(!page.scroll_locked);
}

#[tokio::test]
async fn stale_list_response_is_discarded() {
    let started = Arc::new(Notify::new());
    let release = Arc::new(Notify::new());
    let mut api = italian_api();
    api.recipes
        .insert("British".to_string(), vec![summary("1", "Bakewell Tart")]);
    api.gate = Some(Gate {
        area: "British".to_string(),
        started: started.clone(),
        release: release.clone(),
    });
    let (browser, _) = browser_for(api);

    let slow = {
        let b = browser.clone();
        tokio::spawn(async move { b.on_selection_change("British").await })
    };
    started.notified().await;

    assert_eq!(
        browser.on_selection_change("Italian").await,
        LoadOutcome::Rendered
    );
    release.notify_one();
    assert_eq!(slow.await.unwrap(), LoadOutcome::Stale);

    let page = browser.snapshot().await;
    assert_eq!(page.cards.len(), 3);
    assert!(page.cards.iter().all(|c| c.id != "1"));
    assert!(!page.loading);
}

#[tokio::test]
async fn welcome_retires_in_flight_list() {
    let started = Arc::new(Notify::new());
    let release = Arc::new(Notify::new());
    let mut api = italian_api();
    api.gate = Some(Gate {
        area: "Italian".to_string(),
        started: started.clone(),
        release: release.clone(),
    });
    let (browser, _) = browser_for(api);

    let slow = {
        let b = browser.clone();
        tokio::spawn(async move { b.on_selection_change("Italian").await })
    };
    started.notified().await;
    assert!(browser.snapshot().await.loading);

    browser.on_selection_change("").await;
    release.notify_one();
    assert_eq!(slow.await.unwrap(), LoadOutcome::Stale);

    let page = browser.snapshot().await;
    assert!(page.cards.is_empty());
    assert!(!page.loading);
    assert_eq!(page.notice, Some(Notice::Welcome));
}
