use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;

use crate::model::{self, Cuisine, RecipeDetail, RecipeSummary};

// every endpoint answers with `{ "meals": [...] }` or `{ "meals": null }`
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub meals: Option<Vec<T>>,
}

#[derive(Debug, Deserialize)]
pub struct AreaRecord {
    #[serde(rename = "strArea")]
    pub area: String,
}

impl From<AreaRecord> for Cuisine {
    fn from(r: AreaRecord) -> Self {
        Cuisine::new(r.area)
    }
}

#[derive(Debug, Deserialize)]
pub struct SummaryRecord {
    #[serde(rename = "idMeal")]
    pub id: String,
    #[serde(rename = "strMeal")]
    pub name: String,
    #[serde(rename = "strMealThumb", default)]
    pub thumbnail: Option<String>,
}

impl From<SummaryRecord> for RecipeSummary {
    fn from(r: SummaryRecord) -> Self {
        RecipeSummary {
            id: r.id,
            name: r.name,
            thumbnail: r.thumbnail.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct MealRecord {
    #[serde(rename = "idMeal")]
    pub id: String,
    #[serde(rename = "strMeal")]
    pub name: String,
    #[serde(rename = "strMealThumb", default)]
    pub thumbnail: Option<String>,
    #[serde(rename = "strCategory", default)]
    pub category: Option<String>,
    #[serde(rename = "strArea", default)]
    pub area: Option<String>,
    #[serde(rename = "strTags", default)]
    pub tags: Option<String>,
    #[serde(rename = "strInstructions", default)]
    pub instructions: Option<String>,
    #[serde(rename = "strYoutube", default)]
    pub youtube: Option<String>,
    // strIngredientN / strMeasureN and whatever else the API adds
    #[serde(flatten)]
    pub slots: HashMap<String, Value>,
}

impl MealRecord {
    fn slot(&self, prefix: &str, i: usize) -> Option<&str> {
        self.slots
            .get(&format!("{prefix}{i}"))
            .and_then(Value::as_str)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl From<MealRecord> for RecipeDetail {
    fn from(r: MealRecord) -> Self {
        let ingredients =
            model::collect_ingredients(|i| (r.slot("strIngredient", i), r.slot("strMeasure", i)));
        RecipeDetail {
            ingredients,
            id: r.id,
            name: r.name,
            thumbnail: r.thumbnail.unwrap_or_default(),
            category: r.category.unwrap_or_default(),
            area: r.area.unwrap_or_default(),
            tags: non_blank(r.tags),
            instructions: r.instructions.unwrap_or_default(),
            video: non_blank(r.youtube),
        }
    }
}
