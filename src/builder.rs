use std::time::Duration;

use crate::config::ClientConfig;
use crate::discovery::{DiscoverySettings, DiscoveryView, FilterSelection};
use crate::http::ApiClient;
use crate::{AuthClient, ClientError, IngredientSearch, RecipeClient, Session};

/// Builder for a configured FindMyRecipe client
///
/// Anything not set explicitly falls back to `findmyrecipe.toml` and
/// `FINDMYRECIPE__*` environment variables, then to built-in defaults.
#[derive(Debug, Default)]
pub struct FindMyRecipeBuilder {
    config: Option<ClientConfig>,
    base_url: Option<String>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
    token: Option<String>,
    page_size: Option<u32>,
    debounce: Option<Duration>,
}

impl FindMyRecipeBuilder {
    /// Use this configuration instead of loading one
    ///
    /// # Example
    /// ```
    /// use findmyrecipe::{ClientConfig, FindMyRecipe};
    ///
    /// let builder = FindMyRecipe::builder().config(ClientConfig::default());
    /// ```
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the API root, e.g. `http://localhost:5000`
    ///
    /// # Example
    /// ```
    /// use findmyrecipe::FindMyRecipe;
    ///
    /// let builder = FindMyRecipe::builder().base_url("http://localhost:5000");
    /// ```
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set a timeout for HTTP requests
    ///
    /// The exact duration is used for requests. `config().timeout` reports it
    /// in whole seconds, rounded up.
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Start already signed in with this token
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Number of recipes requested per page
    pub fn page_size(mut self, size: u32) -> Self {
        self.page_size = Some(size);
        self
    }

    /// Quiet period before a typed query is sent
    pub fn debounce(mut self, delay: Duration) -> Self {
        self.debounce = Some(delay);
        self
    }

    /// Resolve the configuration and create the clients
    ///
    /// # Errors
    /// Returns `ClientError` if:
    /// - The config file or environment cannot be parsed
    /// - The base URL is invalid
    /// - The page size is zero
    ///
    /// # Example
    /// ```
    /// # use findmyrecipe::FindMyRecipe;
    /// # fn main() -> Result<(), findmyrecipe::ClientError> {
    /// let app = FindMyRecipe::builder()
    ///     .base_url("http://localhost:5000")
    ///     .build()?;
    /// assert!(!app.session().is_signed_in());
    /// # Ok(())
    /// # }
    /// ```
    pub fn build(self) -> Result<FindMyRecipe, ClientError> {
        let mut config = match self.config {
            Some(config) => config,
            None => ClientConfig::load()?,
        };

        if let Some(base_url) = self.base_url {
            config.base_url = base_url;
        }
        let timeout = match self.timeout {
            Some(timeout) => {
                config.timeout = timeout.as_secs() + u64::from(timeout.subsec_nanos() > 0);
                timeout
            }
            None => config.timeout_duration(),
        };
        if let Some(user_agent) = self.user_agent {
            config.user_agent = user_agent;
        }
        if let Some(token) = self.token {
            config.token = Some(token);
        }
        if let Some(page_size) = self.page_size {
            config.page_size = page_size;
        }
        if let Some(debounce) = self.debounce {
            config.debounce_ms = debounce.as_millis() as u64;
        }

        if config.page_size == 0 {
            return Err(ClientError::BuilderError(
                "Page size must be at least 1".to_string(),
            ));
        }

        let session = match config.token.as_deref().filter(|t| !t.is_empty()) {
            Some(token) => Session::with_token(token),
            None => Session::new(),
        };
        let api = ApiClient::new(&config.base_url, Some(timeout), &config.user_agent, session)?;

        Ok(FindMyRecipe {
            config,
            timeout,
            api,
        })
    }
}

/// Entry point bundling the clients that share one session
#[derive(Debug, Clone)]
pub struct FindMyRecipe {
    config: ClientConfig,
    timeout: Duration,
    api: ApiClient,
}

impl FindMyRecipe {
    /// Creates a new builder
    ///
    /// # Example
    /// ```
    /// use findmyrecipe::FindMyRecipe;
    ///
    /// let builder = FindMyRecipe::builder();
    /// ```
    pub fn builder() -> FindMyRecipeBuilder {
        FindMyRecipeBuilder::default()
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn session(&self) -> &Session {
        self.api.session()
    }

    /// Request timeout the clients were built with
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn recipes(&self) -> RecipeClient {
        RecipeClient::new(self.api.clone())
    }

    pub fn auth(&self) -> AuthClient {
        AuthClient::new(self.api.clone())
    }

    /// A fresh discovery view; call `mount` on it to load options and the first page
    pub fn discovery(&self) -> DiscoveryView {
        crate::discovery_view(self.recipes(), DiscoverySettings::from(&self.config))
    }

    /// A discovery view that starts with the given filters selected
    pub fn discovery_with_filters(&self, filters: FilterSelection) -> DiscoveryView {
        self.discovery().with_filters(filters)
    }

    pub fn ingredient_search(&self) -> IngredientSearch {
        IngredientSearch::new(self.recipes(), self.config.page_size)
    }
}
