use serde::Serialize;

/// Number of `strIngredientN` / `strMeasureN` slot pairs carried by a meal record.
pub const INGREDIENT_SLOTS: usize = 20;

/// Selection value that asks for a random recipe instead of a cuisine filter.
pub const RANDOM_SENTINEL: &str = "random";

pub const RANDOM_LABEL: &str = "Random Cuisine";

const YOUTUBE_EMBED_BASE: &str = "https://www.youtube.com/embed/";

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Cuisine {
    pub name: String,
}

impl Cuisine {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RecipeSummary {
    pub id: String,
    pub name: String,
    pub thumbnail: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Ingredient {
    pub name: String,
    pub measure: String,
}

impl Ingredient {
    pub fn label(&self) -> String {
        format!("{} {}", self.measure, self.name)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RecipeDetail {
    pub id: String,
    pub name: String,
    pub thumbnail: String,
    pub category: String,
    pub area: String,
    pub tags: Option<String>,
    pub ingredients: Vec<Ingredient>,
    pub instructions: String,
    pub video: Option<String>,
}

impl RecipeDetail {
    pub fn video_id(&self) -> Option<&str> {
        self.video.as_deref().and_then(extract_video_id)
    }

    pub fn video_embed_url(&self) -> Option<String> {
        self.video_id()
            .map(|id| format!("{YOUTUBE_EMBED_BASE}{id}"))
    }
}

/// Builds the ingredient list from numbered slots, 1 through [`INGREDIENT_SLOTS`].
///
/// A slot is kept only when both its ingredient and its measure are non-empty
/// once surrounding whitespace is removed.
pub fn collect_ingredients<'a, F>(mut slot: F) -> Vec<Ingredient>
where
    F: FnMut(usize) -> (Option<&'a str>, Option<&'a str>),
{
    let mut out = Vec::new();
    for i in 1..=INGREDIENT_SLOTS {
        let (name, measure) = slot(i);
        let name = name.map(str::trim).unwrap_or_default();
        let measure = measure.map(str::trim).unwrap_or_default();
        if name.is_empty() || measure.is_empty() {
            continue;
        }
        out.push(Ingredient {
            name: name.to_string(),
            measure: measure.to_string(),
        });
    }
    out
}

/// Returns the segment following the first `v=` in a video reference.
pub fn extract_video_id(reference: &str) -> Option<&str> {
    reference
        .split("v=")
        .nth(1)
        .map(str::trim)
        .filter(|id| !id.is_empty())
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Selection {
    Random,
    Cuisine(String),
    Empty,
}

impl Selection {
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value == RANDOM_SENTINEL {
            Self::Random
        } else if value.is_empty() {
            Self::Empty
        } else {
            Self::Cuisine(value.to_string())
        }
    }
}
