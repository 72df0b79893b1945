pub mod auth;
pub mod builder;
pub mod config;
pub mod discovery;
pub mod error;
pub mod http;
pub mod ingredients;
pub mod model;
pub mod recipes;
pub mod session;
pub mod upload;

use std::sync::Arc;

// Re-export commonly used types
pub use auth::{AuthClient, OAuthMessage, PasswordReset, Registration};
pub use builder::{FindMyRecipe, FindMyRecipeBuilder};
pub use config::ClientConfig;
pub use discovery::{
    DiscoverySettings, DiscoverySnapshot, DiscoveryView, FilterSelection, PageRequest,
    RecipeQueryService,
};
pub use error::ClientError;
pub use ingredients::IngredientSearch;
pub use model::{FilterCategory, NewRecipe, ProfileUpdate, RecipeDetail, RecipeSummary, UserProfile};
pub use recipes::RecipeClient;
pub use session::Session;

use crate::http::ApiClient;

fn recipe_client(base_url: &str) -> Result<RecipeClient, ClientError> {
    let config = ClientConfig {
        base_url: base_url.to_string(),
        ..ClientConfig::load()?
    };
    Ok(RecipeClient::new(ApiClient::from_config(
        &config,
        Session::new(),
    )?))
}

/// Fetch the first page of recipes matching `query` and `filters`.
///
/// An empty query lists recipes instead of searching.
pub async fn find_recipes(
    base_url: &str,
    query: &str,
    filters: &FilterSelection,
) -> Result<Vec<RecipeSummary>, ClientError> {
    let client = recipe_client(base_url)?;
    let page = PageRequest::first(discovery::DEFAULT_PAGE_SIZE);
    if query.trim().is_empty() {
        client.list_recipes(filters, page).await
    } else {
        client.search_recipes(query.trim(), filters, page).await
    }
}

/// Fetch a single recipe by id or name
pub async fn fetch_recipe(base_url: &str, identifier: &str) -> Result<RecipeDetail, ClientError> {
    recipe_client(base_url)?.recipe(identifier).await
}

/// Build a discovery view on top of an HTTP recipe client
pub fn discovery_view(
    client: RecipeClient,
    settings: DiscoverySettings,
) -> DiscoveryView {
    DiscoveryView::new(Arc::new(client), settings)
}
