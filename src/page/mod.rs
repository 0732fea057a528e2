use serde::Serialize;

use crate::model::{Cuisine, RecipeDetail, RecipeSummary, RANDOM_LABEL, RANDOM_SENTINEL};

pub const CARD_PROMPT: &str = "Click to view recipe";

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AreaOption {
    pub value: String,
    pub label: String,
}

impl AreaOption {
    fn random() -> Self {
        Self {
            value: RANDOM_SENTINEL.to_string(),
            label: RANDOM_LABEL.to_string(),
        }
    }
}

// the empty-state panel
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Notice {
    Welcome,
    NoRecipes,
    RecipesFailed,
    RandomFailed,
    DetailFailed,
}

impl Notice {
    pub fn title(&self) -> &'static str {
        match self {
            Notice::Welcome => "Welcome!",
            Notice::NoRecipes => "No recipes found",
            Notice::RecipesFailed => "Error loading recipes",
            Notice::RandomFailed => "Error fetching random meal",
            Notice::DetailFailed => "Error loading recipe",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Notice::Welcome => "Select a cuisine from the dropdown above to browse recipes",
            Notice::NoRecipes => "Try selecting a different cuisine",
            Notice::RecipesFailed | Notice::RandomFailed | Notice::DetailFailed => {
                "Please try again later"
            }
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "recipe", rename_all = "snake_case")]
pub enum Modal {
    #[default]
    Closed,
    Open(Box<RecipeDetail>),
}

impl Modal {
    pub fn is_open(&self) -> bool {
        matches!(self, Modal::Open(_))
    }

    pub fn recipe(&self) -> Option<&RecipeDetail> {
        match self {
            Modal::Open(detail) => Some(detail),
            Modal::Closed => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClickTarget {
    /// The dimmed area around the modal content.
    Backdrop,
    Content,
}

/// Everything a front end needs to draw the browser.
///
/// Loads replace whole sections (options, cards, notice, modal) rather than
/// patching them, so a snapshot is always internally consistent.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Page {
    pub area_options: Vec<AreaOption>,
    pub selected: String,
    pub cards: Vec<RecipeSummary>,
    pub loading: bool,
    pub notice: Option<Notice>,
    pub modal: Modal,
    pub scroll_locked: bool,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            area_options: vec![AreaOption::random()],
            selected: String::new(),
            cards: Vec::new(),
            loading: false,
            notice: Some(Notice::Welcome),
            modal: Modal::Closed,
            scroll_locked: false,
        }
    }
}

impl Page {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the options with the random entry followed by `areas` in order.
    pub fn set_areas(&mut self, areas: &[Cuisine]) {
        self.area_options = std::iter::once(AreaOption::random())
            .chain(areas.iter().map(|a| AreaOption {
                value: a.name.clone(),
                label: a.name.clone(),
            }))
            .collect();
    }

    pub fn begin_load(&mut self) {
        self.loading = true;
        self.notice = None;
        self.cards.clear();
    }

    pub fn finish_load(&mut self) {
        self.loading = false;
    }

    pub fn show_cards(&mut self, recipes: Vec<RecipeSummary>) {
        if recipes.is_empty() {
            self.cards.clear();
            self.notice = Some(Notice::NoRecipes);
        } else {
            self.cards = recipes;
            self.notice = None;
        }
    }

    pub fn show_notice(&mut self, notice: Notice) {
        self.notice = Some(notice);
    }

    pub fn show_welcome(&mut self) {
        self.cards.clear();
        self.loading = false;
        self.notice = Some(Notice::Welcome);
    }

    pub fn card(&self, index: usize) -> Option<&RecipeSummary> {
        self.cards.get(index)
    }

    pub fn open_modal(&mut self, detail: RecipeDetail) {
        self.modal = Modal::Open(Box::new(detail));
        self.scroll_locked = true;
    }

    /// Returns false when the modal was already closed.
    pub fn close_modal(&mut self) -> bool {
        if !self.modal.is_open() {
            return false;
        }
        self.modal = Modal::Closed;
        self.scroll_locked = false;
        true
    }

    pub fn click_modal(&mut self, target: ClickTarget) -> bool {
        match target {
            ClickTarget::Backdrop => self.close_modal(),
            ClickTarget::Content => false,
        }
    }

    pub fn key_down(&mut self, key: &str) -> bool {
        if key == "Escape" {
            self.close_modal()
        } else {
            false
        }
    }
}
