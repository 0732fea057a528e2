pub mod wire;

use async_trait::async_trait;
use reqwest::Url;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use crate::model::{Cuisine, RecipeDetail, RecipeSummary};
use wire::{AreaRecord, Envelope, MealRecord, SummaryRecord};

pub const DEFAULT_API_BASE: &str = "https://www.themealdb.com/api/json/v1/1";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid API base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{endpoint} returned HTTP {status}")]
    Status { endpoint: String, status: u16 },

    #[error("malformed payload from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{endpoint} returned no meals")]
    MissingMeals { endpoint: String },
}

/// The four read-only endpoints of the recipe service.
#[async_trait]
pub trait MealApi: Send + Sync {
    async fn list_areas(&self) -> Result<Vec<Cuisine>, ApiError>;

    /// An unknown or empty cuisine yields an empty list rather than an error.
    async fn filter_by_area(&self, area: &str) -> Result<Vec<RecipeSummary>, ApiError>;

    async fn lookup(&self, id: &str) -> Result<Option<RecipeDetail>, ApiError>;

    async fn random(&self) -> Result<Option<RecipeDetail>, ApiError>;
}

#[derive(Clone, Debug)]
pub struct HttpMealApi {
    client: reqwest::Client,
    base: Url,
}

// Url::join drops the last path segment unless the base ends with '/'
pub fn normalize_api_base(raw: &str) -> Result<Url, ApiError> {
    let mut base = raw.trim().to_string();
    if !base.ends_with('/') {
        base.push('/');
    }
    Url::parse(&base).map_err(|e| ApiError::InvalidBaseUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })
}

impl HttpMealApi {
    pub fn new(client: reqwest::Client, base: &str) -> Result<Self, ApiError> {
        Ok(Self {
            client,
            base: normalize_api_base(base)?,
        })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<Option<Vec<T>>, ApiError> {
        let mut url = self.base.join(path).map_err(|e| ApiError::InvalidBaseUrl {
            url: self.base.to_string(),
            reason: e.to_string(),
        })?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query.iter());
        }
        let endpoint = url.to_string();
        debug!(%endpoint, "GET");

        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                endpoint: endpoint.clone(),
                source,
            })?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                endpoint,
                status: status.as_u16(),
            });
        }
        let body = resp.text().await.map_err(|source| ApiError::Transport {
            endpoint: endpoint.clone(),
            source,
        })?;
        let envelope: Envelope<T> =
            serde_json::from_str(&body).map_err(|source| ApiError::Decode { endpoint, source })?;
        Ok(envelope.meals)
    }

    async fn first_meal(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<Option<RecipeDetail>, ApiError> {
        let meals = self.fetch::<MealRecord>(path, query).await?;
        Ok(meals
            .and_then(|m| m.into_iter().next())
            .map(RecipeDetail::from))
    }
}

#[async_trait]
impl MealApi for HttpMealApi {
    async fn list_areas(&self) -> Result<Vec<Cuisine>, ApiError> {
        match self.fetch::<AreaRecord>("list.php", &[("a", "list")]).await? {
            Some(areas) => Ok(areas.into_iter().map(Cuisine::from).collect()),
            None => Err(ApiError::MissingMeals {
                endpoint: "list.php".to_string(),
            }),
        }
    }

    async fn filter_by_area(&self, area: &str) -> Result<Vec<RecipeSummary>, ApiError> {
        let meals = self
            .fetch::<SummaryRecord>("filter.php", &[("a", area)])
            .await?;
        Ok(meals
            .unwrap_or_default()
            .into_iter()
            .map(RecipeSummary::from)
            .collect())
    }

    async fn lookup(&self, id: &str) -> Result<Option<RecipeDetail>, ApiError> {
        self.first_meal("lookup.php", &[("i", id)]).await
    }

    async fn random(&self) -> Result<Option<RecipeDetail>, ApiError> {
        self.first_meal("random.php", &[]).await
    }
}
