use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Method;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::discovery::{FilterSelection, PageRequest, RecipeQueryService};
use crate::http::ApiClient;
use crate::model::{FilterCategory, RecipeDetail, RecipeSummary};
use crate::ClientError;

#[derive(Debug, Deserialize)]
struct ListingResponse {
    #[serde(default)]
    recipes: Vec<RecipeSummary>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<RecipeSummary>,
}

#[derive(Debug, Deserialize)]
struct SimilarResponse {
    #[serde(default)]
    similar_recipes: Vec<RecipeSummary>,
}

#[derive(Debug, Deserialize)]
struct IngredientsResponse {
    #[serde(default)]
    ingredients: Vec<String>,
}

/// HTTP client for the recipe endpoints
#[derive(Debug, Clone)]
pub struct RecipeClient {
    api: ApiClient,
}

impl RecipeClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// `GET /recipes/{identifier}`
    pub async fn recipe(&self, identifier: &str) -> Result<RecipeDetail, ClientError> {
        if identifier.trim().is_empty() {
            return Err(ClientError::ValidationError(
                "Recipe identifier cannot be empty".to_string(),
            ));
        }
        let url = self.api.endpoint(&["recipes", identifier])?;
        self.api.send_json(self.api.request(Method::GET, url)).await
    }

    /// Recipes the API considers similar to the named one
    pub async fn similar_recipes(&self, name: &str) -> Result<Vec<RecipeSummary>, ClientError> {
        let url = self.api.endpoint(&["recipes", "similar-recipes"])?;
        let request = self.api.request(Method::GET, url).query(&[("name", name)]);
        let response: SimilarResponse = self.api.send_json(request).await?;
        Ok(response.similar_recipes)
    }

    /// Every ingredient name known to the API, for suggestions
    pub async fn ingredients(&self) -> Result<Vec<String>, ClientError> {
        let url = self.api.endpoint(&["recipes", "ingredients"])?;
        let response: IngredientsResponse =
            self.api.send_json(self.api.request(Method::GET, url)).await?;
        Ok(response.ingredients)
    }

    /// Recipes using the given ingredients, one page at a time
    pub async fn search_by_ingredients(
        &self,
        ingredients: &[String],
        page: PageRequest,
    ) -> Result<Vec<RecipeSummary>, ClientError> {
        let url = self.api.endpoint(&["recipes", "search-by-ingredients"])?;
        let request = self
            .api
            .request(Method::POST, url)
            .query(&page_params(page))
            .json(&json!({ "ingredients": ingredients }));
        let response: ListingResponse = self.api.send_json(request).await?;
        Ok(response.recipes)
    }
}

fn page_params(page: PageRequest) -> [(&'static str, String); 2] {
    [
        ("limit", page.limit.to_string()),
        ("page", page.page.to_string()),
    ]
}

/// Pull the option list out of either `[...]` or `{ "cuisines": [...] }`
fn option_list(body: Value) -> Result<Vec<String>, ClientError> {
    let list = match body {
        Value::Array(items) => items,
        Value::Object(fields) => fields
            .into_iter()
            .find_map(|(_, value)| match value {
                Value::Array(items) => Some(items),
                _ => None,
            })
            .ok_or_else(|| ClientError::MalformedResponse("No option list in response".to_string()))?,
        other => {
            return Err(ClientError::MalformedResponse(format!(
                "Expected option list, got {}",
                other
            )))
        }
    };

    Ok(list
        .into_iter()
        .filter_map(|item| match item {
            Value::String(s) if !s.trim().is_empty() => Some(s),
            Value::String(_) => None,
            other => {
                warn!("Skipping non-string filter option {}", other);
                None
            }
        })
        .collect())
}

#[async_trait]
impl RecipeQueryService for RecipeClient {
    async fn list_recipes(
        &self,
        filters: &FilterSelection,
        page: PageRequest,
    ) -> Result<Vec<RecipeSummary>, ClientError> {
        let url = self.api.endpoint(&["recipes"])?;
        let request = self
            .api
            .request(Method::GET, url)
            .query(&page_params(page))
            .query(&filters.query_pairs());
        let response: ListingResponse = self.api.send_json(request).await?;
        debug!("Listing returned {} recipes", response.recipes.len());
        Ok(response.recipes)
    }

    async fn search_recipes(
        &self,
        query: &str,
        filters: &FilterSelection,
        page: PageRequest,
    ) -> Result<Vec<RecipeSummary>, ClientError> {
        let url = self.api.endpoint(&["recipes", "search"])?;
        let request = self
            .api
            .request(Method::GET, url)
            .query(&[("query", query)])
            .query(&page_params(page))
            .query(&filters.query_pairs());
        let response: SearchResponse = self.api.send_json(request).await?;
        debug!("Search returned {} recipes", response.results.len());
        Ok(response.results)
    }

    async fn filter_options(&self, category: FilterCategory) -> Result<Vec<String>, ClientError> {
        let url = self.api.endpoint(&["filter-options", category.as_str()])?;
        let body: Value = self.api.send_json(self.api.request(Method::GET, url)).await?;
        option_list(body)
    }
}
