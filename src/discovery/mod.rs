mod debounce;
mod filters;
mod pagination;
mod view;

pub use debounce::Debouncer;
pub use filters::{FilterOptions, FilterSelection};
pub use pagination::{PageCursor, PageRequest, DEFAULT_PAGE_SIZE};
pub use view::{DiscoverySettings, DiscoverySnapshot, DiscoveryView};

use async_trait::async_trait;

use crate::model::{FilterCategory, RecipeSummary};
use crate::ClientError;

/// Shown when a fetch fails, whatever the cause
pub const FETCH_FAILED_MESSAGE: &str = "Could not load recipes. Please try again.";

/// Shown when a fetch succeeds with nothing to list
pub const NO_RESULTS_MESSAGE: &str = "No recipes found.";

/// Backend queried by the discovery view
#[async_trait]
pub trait RecipeQueryService: Send + Sync {
    /// Paginated listing constrained only by filters
    async fn list_recipes(
        &self,
        filters: &FilterSelection,
        page: PageRequest,
    ) -> Result<Vec<RecipeSummary>, ClientError>;

    /// Paginated free-text search, still constrained by filters
    async fn search_recipes(
        &self,
        query: &str,
        filters: &FilterSelection,
        page: PageRequest,
    ) -> Result<Vec<RecipeSummary>, ClientError>;

    /// Valid options for one filter category
    async fn filter_options(&self, category: FilterCategory) -> Result<Vec<String>, ClientError>;
}
