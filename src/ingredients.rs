use log::{debug, warn};

use crate::discovery::{PageCursor, PageRequest, FETCH_FAILED_MESSAGE};
use crate::model::RecipeSummary;
use crate::recipes::RecipeClient;

const MAX_SUGGESTIONS: usize = 5;

/// Find recipes by the ingredients on hand.
///
/// Unlike the discovery view this is a plain `&mut self` state holder: the
/// search is only sent on explicit request, so there is nothing to debounce.
#[derive(Debug)]
pub struct IngredientSearch {
    client: RecipeClient,
    page_size: u32,
    known: Vec<String>,
    chosen: Vec<String>,
    recipes: Vec<RecipeSummary>,
    cursor: PageCursor,
    error: Option<&'static str>,
}

impl IngredientSearch {
    pub fn new(client: RecipeClient, page_size: u32) -> Self {
        Self {
            client,
            page_size,
            known: Vec::new(),
            chosen: Vec::new(),
            recipes: Vec::new(),
            cursor: PageCursor::default(),
            error: None,
        }
    }

    /// Fetch the ingredient names used for suggestions
    pub async fn load_suggestions(&mut self) {
        match self.client.ingredients().await {
            Ok(known) => self.known = known,
            Err(e) => warn!("Failed to fetch ingredient suggestions: {}", e),
        }
    }

    /// Up to five known ingredients containing `input`, minus those already chosen
    pub fn suggest(&self, input: &str) -> Vec<&str> {
        let needle = input.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        self.known
            .iter()
            .filter(|name| name.to_lowercase().contains(&needle))
            .filter(|name| !self.chosen.contains(*name))
            .take(MAX_SUGGESTIONS)
            .map(String::as_str)
            .collect()
    }

    pub fn add(&mut self, ingredient: impl Into<String>) {
        let ingredient = ingredient.into().trim().to_string();
        if !ingredient.is_empty() && !self.chosen.contains(&ingredient) {
            self.chosen.push(ingredient);
        }
    }

    pub fn remove(&mut self, ingredient: &str) {
        self.chosen.retain(|i| i != ingredient);
    }

    pub fn chosen(&self) -> &[String] {
        &self.chosen
    }

    pub fn recipes(&self) -> &[RecipeSummary] {
        &self.recipes
    }

    pub fn cursor(&self) -> PageCursor {
        self.cursor
    }

    pub fn error(&self) -> Option<&'static str> {
        self.error
    }

    /// Start over at page 1. Does nothing while no ingredient is chosen.
    pub async fn search(&mut self) {
        if self.chosen.is_empty() {
            debug!("Ingredient search skipped: nothing chosen");
            return;
        }
        self.recipes.clear();
        self.cursor = PageCursor::default();
        self.fetch(PageRequest::first(self.page_size)).await;
    }

    /// Append the next page; returns whether a request was sent
    pub async fn load_more(&mut self) -> bool {
        if !self.cursor.more_available || self.chosen.is_empty() {
            return false;
        }
        self.fetch(self.cursor.next_request(self.page_size)).await;
        true
    }

    /// Accumulated results whose name contains `text`, ignoring case
    pub fn filter_results(&self, text: &str) -> Vec<&RecipeSummary> {
        let needle = text.trim().to_lowercase();
        self.recipes
            .iter()
            .filter(|recipe| recipe.name.to_lowercase().contains(&needle))
            .collect()
    }

    async fn fetch(&mut self, page: PageRequest) {
        match self.client.search_by_ingredients(&self.chosen, page).await {
            Ok(found) => {
                self.cursor = PageCursor::after(page, found.len());
                self.recipes.extend(found);
                self.error = None;
            }
            Err(e) => {
                warn!("Ingredient search failed: {}", e);
                self.error = Some(FETCH_FAILED_MESSAGE);
            }
        }
    }
}
