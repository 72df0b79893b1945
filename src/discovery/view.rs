use log::{debug, info, warn};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use super::{
    Debouncer, FilterOptions, FilterSelection, PageCursor, PageRequest, RecipeQueryService,
    DEFAULT_PAGE_SIZE, FETCH_FAILED_MESSAGE, NO_RESULTS_MESSAGE,
};
use crate::config::ClientConfig;
use crate::model::{FilterCategory, RecipeSummary};
use crate::ClientError;

/// Tunables of a discovery session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiscoverySettings {
    pub page_size: u32,
    /// Quiescence delay before a typed query is sent
    pub debounce: Duration,
}

impl Default for DiscoverySettings {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            debounce: Duration::from_millis(400),
        }
    }
}

impl From<&ClientConfig> for DiscoverySettings {
    fn from(config: &ClientConfig) -> Self {
        Self {
            page_size: config.page_size,
            debounce: config.debounce_delay(),
        }
    }
}

/// Everything a front end needs to render the discovery screen
#[derive(Debug, Clone, PartialEq)]
pub struct DiscoverySnapshot {
    pub query: String,
    pub filters: FilterSelection,
    pub options: FilterOptions,
    pub recipes: Vec<RecipeSummary>,
    pub cursor: PageCursor,
    pub fetching: bool,
    pub error: Option<&'static str>,
}

impl DiscoverySnapshot {
    pub fn show_load_more(&self) -> bool {
        !self.fetching && self.cursor.more_available
    }

    /// Message to show in place of (or above) the result list
    pub fn notice(&self) -> Option<&'static str> {
        if self.fetching {
            None
        } else if self.error.is_some() {
            self.error
        } else if self.recipes.is_empty() {
            Some(NO_RESULTS_MESSAGE)
        } else {
            None
        }
    }
}

#[derive(Debug, Default)]
struct DiscoveryState {
    query: String,
    filters: FilterSelection,
    options: FilterOptions,
    recipes: Vec<RecipeSummary>,
    cursor: PageCursor,
    /// Bumped by every reset trigger; a response tagged with an older value is stale
    sequence: u64,
    in_flight: usize,
    error: Option<&'static str>,
}

impl DiscoveryState {
    fn active_query(&self) -> Option<String> {
        let query = self.query.trim();
        (!query.is_empty()).then(|| query.to_string())
    }

    fn begin(&mut self, page: PageRequest) -> Fetch {
        self.in_flight += 1;
        Fetch {
            query: self.active_query(),
            filters: self.filters.clone(),
            page,
            sequence: self.sequence,
        }
    }
}

/// Parameters of one request, frozen when it was issued
struct Fetch {
    query: Option<String>,
    filters: FilterSelection,
    page: PageRequest,
    sequence: u64,
}

/// Keeps `in_flight` honest even if a fetch future is dropped mid-await
struct InFlight<'a> {
    state: &'a Mutex<DiscoveryState>,
    finished: bool,
}

impl<'a> InFlight<'a> {
    fn new(state: &'a Mutex<DiscoveryState>) -> Self {
        Self {
            state,
            finished: false,
        }
    }

    fn finish(mut self, state: &mut DiscoveryState) {
        state.in_flight = state.in_flight.saturating_sub(1);
        self.finished = true;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.finished {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            state.in_flight = state.in_flight.saturating_sub(1);
        }
    }
}

struct Shared {
    service: Arc<dyn RecipeQueryService>,
    settings: DiscoverySettings,
    state: Mutex<DiscoveryState>,
    debouncer: Debouncer,
}

/// Search, filter and "load more" controller for the recipe list.
///
/// Cloning yields another handle to the same session. Every operation that
/// changes the query or the filters restarts pagination at page 1; responses
/// belonging to a superseded (query, filters) combination are dropped when
/// they arrive.
#[derive(Clone)]
pub struct DiscoveryView {
    shared: Arc<Shared>,
}

impl DiscoveryView {
    pub fn new(service: Arc<dyn RecipeQueryService>, settings: DiscoverySettings) -> Self {
        Self {
            shared: Arc::new(Shared {
                service,
                settings,
                state: Mutex::new(DiscoveryState::default()),
                debouncer: Debouncer::new(settings.debounce),
            }),
        }
    }

    /// Start with filters already selected, e.g. restored from a shared link
    pub fn with_filters(self, filters: FilterSelection) -> Self {
        self.state().filters = filters;
        self
    }

    pub fn settings(&self) -> DiscoverySettings {
        self.shared.settings
    }

    pub fn snapshot(&self) -> DiscoverySnapshot {
        let state = self.state();
        DiscoverySnapshot {
            query: state.query.clone(),
            filters: state.filters.clone(),
            options: state.options.clone(),
            recipes: state.recipes.clone(),
            cursor: state.cursor,
            fetching: state.in_flight > 0,
            error: state.error,
        }
    }

    /// Load every category's options, then the first page.
    ///
    /// A category whose options fail to load is left empty.
    pub async fn mount(&self) {
        let service = &self.shared.service;
        let (cuisine, course, diet) = tokio::join!(
            service.filter_options(FilterCategory::Cuisine),
            service.filter_options(FilterCategory::Course),
            service.filter_options(FilterCategory::Diet),
        );

        {
            let mut state = self.state();
            for (category, result) in [
                (FilterCategory::Cuisine, cuisine),
                (FilterCategory::Course, course),
                (FilterCategory::Diet, diet),
            ] {
                match result {
                    Ok(options) => state.options.set(category, options),
                    Err(e) => warn!("Failed loading {} options: {}", category, e),
                }
            }
        }

        self.refresh(false).await;
    }

    /// Record an edit of the search box.
    ///
    /// The search runs once the debounce delay passes without another edit.
    pub fn set_query(&self, text: impl Into<String>) {
        let text = text.into();
        {
            let mut state = self.state();
            if state.query == text {
                return;
            }
            state.query = text;
        }

        let view = self.clone();
        self.shared.debouncer.schedule(async move {
            view.refresh(false).await;
        });
    }

    /// Search for the current query right away, skipping the debounce
    pub async fn submit_query(&self) {
        self.shared.debouncer.cancel();
        self.refresh(false).await;
    }

    pub async fn toggle_filter(&self, category: FilterCategory, option: impl Into<String>) {
        let option = option.into();
        let selected = self.state().filters.toggle(category, option.as_str());
        debug!(
            "{} {}={}",
            if selected { "Selected" } else { "Deselected" },
            category,
            option
        );
        self.shared.debouncer.cancel();
        self.refresh(true).await;
    }

    pub async fn clear_filter(&self, category: FilterCategory) {
        self.state().filters.clear(category);
        self.shared.debouncer.cancel();
        self.refresh(true).await;
    }

    /// Fetch the next page and append it.
    ///
    /// Returns `false` without touching anything when no more pages are
    /// expected or another fetch is still outstanding. The endpoint is chosen
    /// from the query text as it is now, which may differ from the query that
    /// produced the earlier pages.
    pub async fn load_more(&self) -> bool {
        let fetch = {
            let mut state = self.state();
            if !state.cursor.more_available {
                debug!("Load more ignored: no more pages");
                return false;
            }
            if state.in_flight > 0 {
                debug!("Load more ignored: fetch already in progress");
                return false;
            }
            let page = state.cursor.next_request(self.shared.settings.page_size);
            state.begin(page)
        };
        let in_flight = InFlight::new(&self.shared.state);

        let result = self.run(&fetch).await;

        let mut state = self.state();
        in_flight.finish(&mut state);
        if fetch.sequence != state.sequence {
            debug!("Discarding page {} from a superseded search", fetch.page.page);
            return true;
        }
        apply(&mut state, &fetch, result, true);
        true
    }

    /// Reset fetch: page 1 of the current combination.
    ///
    /// With `invalidate` the visible list is cleared before the request goes out.
    async fn refresh(&self, invalidate: bool) {
        let fetch = {
            let mut state = self.state();
            state.sequence += 1;
            if invalidate {
                state.recipes.clear();
                state.cursor = PageCursor::default();
            }
            state.begin(PageRequest::first(self.shared.settings.page_size))
        };
        let in_flight = InFlight::new(&self.shared.state);

        let result = self.run(&fetch).await;

        let mut state = self.state();
        in_flight.finish(&mut state);
        if fetch.sequence != state.sequence {
            debug!(
                "Discarding stale results (sequence {} superseded by {})",
                fetch.sequence, state.sequence
            );
            return;
        }
        apply(&mut state, &fetch, result, false);
    }

    async fn run(&self, fetch: &Fetch) -> Result<Vec<RecipeSummary>, ClientError> {
        let service = &self.shared.service;
        match &fetch.query {
            Some(query) => {
                info!("Searching \"{}\" (page {})", query, fetch.page.page);
                service
                    .search_recipes(query, &fetch.filters, fetch.page)
                    .await
            }
            None => {
                info!("Listing recipes (page {})", fetch.page.page);
                service.list_recipes(&fetch.filters, fetch.page).await
            }
        }
    }

    fn state(&self) -> MutexGuard<'_, DiscoveryState> {
        self.shared
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

fn apply(
    state: &mut DiscoveryState,
    fetch: &Fetch,
    result: Result<Vec<RecipeSummary>, ClientError>,
    append: bool,
) {
    match result {
        Ok(page) => {
            debug!("Received {} recipes", page.len());
            state.cursor = PageCursor::after(fetch.page, page.len());
            if append {
                state.recipes.extend(page);
            } else {
                state.recipes = page;
            }
            state.error = None;
        }
        Err(e) => {
            warn!("Recipe fetch failed: {}", e);
            state.error = Some(FETCH_FAILED_MESSAGE);
            // The kept list belongs to the previous combination; no page of
            // the new one may be appended to it.
            if !append {
                state.cursor = PageCursor::default();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use tokio::time::sleep;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        List {
            filters: Vec<(String, String)>,
            page: u32,
        },
        Search {
            query: String,
            filters: Vec<(String, String)>,
            page: u32,
        },
    }

    impl Call {
        fn page(&self) -> u32 {
            match self {
                Call::List { page, .. } | Call::Search { page, .. } => *page,
            }
        }

        fn filters(&self) -> &[(String, String)] {
            match self {
                Call::List { filters, .. } | Call::Search { filters, .. } => filters,
            }
        }

        fn tag(&self) -> String {
            let filters: Vec<String> = self
                .filters()
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect();
            match self {
                Call::List { page, .. } => format!("list:{}:p{}", filters.join("&"), page),
                Call::Search { query, page, .. } => {
                    format!("search:{}:{}:p{}", query, filters.join("&"), page)
                }
            }
        }
    }

    struct Reply {
        delay: Duration,
        count: Option<usize>,
    }

    impl Reply {
        fn page(count: usize) -> Self {
            Self {
                delay: Duration::ZERO,
                count: Some(count),
            }
        }

        fn fail() -> Self {
            Self {
                delay: Duration::ZERO,
                count: None,
            }
        }

        fn after(mut self, millis: u64) -> Self {
            self.delay = Duration::from_millis(millis);
            self
        }
    }

    type Responder = Box<dyn Fn(&Call) -> Reply + Send + Sync>;

    struct FakeService {
        calls: Mutex<Vec<Call>>,
        respond: Responder,
    }

    impl FakeService {
        fn new(respond: impl Fn(&Call) -> Reply + Send + Sync + 'static) -> Arc<Self> {
            Arc::new(Self {
                calls: Mutex::new(Vec::new()),
                respond: Box::new(respond),
            })
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        async fn answer(&self, call: Call) -> Result<Vec<RecipeSummary>, ClientError> {
            let reply = (self.respond)(&call);
            self.calls.lock().unwrap().push(call.clone());
            sleep(reply.delay).await;
            match reply.count {
                Some(count) => Ok((0..count)
                    .map(|i| RecipeSummary {
                        name: format!("{}#{}", call.tag(), i),
                        ..Default::default()
                    })
                    .collect()),
                None => Err(ClientError::StatusError {
                    status: 500,
                    body: "boom".to_string(),
                }),
            }
        }
    }

    fn owned_pairs(filters: &FilterSelection) -> Vec<(String, String)> {
        filters
            .query_pairs()
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[async_trait]
    impl RecipeQueryService for FakeService {
        async fn list_recipes(
            &self,
            filters: &FilterSelection,
            page: PageRequest,
        ) -> Result<Vec<RecipeSummary>, ClientError> {
            self.answer(Call::List {
                filters: owned_pairs(filters),
                page: page.page,
            })
            .await
        }

        async fn search_recipes(
            &self,
            query: &str,
            filters: &FilterSelection,
            page: PageRequest,
        ) -> Result<Vec<RecipeSummary>, ClientError> {
            self.answer(Call::Search {
                query: query.to_string(),
                filters: owned_pairs(filters),
                page: page.page,
            })
            .await
        }

        async fn filter_options(
            &self,
            category: FilterCategory,
        ) -> Result<Vec<String>, ClientError> {
            match category {
                FilterCategory::Cuisine => Ok(vec!["Indian".to_string(), "Italian".to_string()]),
                FilterCategory::Course => Ok(vec!["Main Course".to_string()]),
                FilterCategory::Diet => Err(ClientError::MalformedResponse("no options".to_string())),
            }
        }
    }

    fn view(service: Arc<FakeService>) -> DiscoveryView {
        DiscoveryView::new(service, DiscoverySettings::default())
    }

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[tokio::test]
    async fn test_mount_loads_options_and_first_page() {
        let service = FakeService::new(|_| Reply::page(20));
        let view = view(service.clone());

        view.mount().await;

        let snapshot = view.snapshot();
        assert_eq!(snapshot.options.get(FilterCategory::Cuisine).len(), 2);
        assert_eq!(snapshot.options.get(FilterCategory::Course), ["Main Course"]);
        assert!(snapshot.options.get(FilterCategory::Diet).is_empty());
        assert_eq!(snapshot.recipes.len(), 20);
        assert!(snapshot.cursor.more_available);
        assert!(snapshot.show_load_more());
        assert_eq!(snapshot.notice(), None);
        assert_eq!(
            service.calls(),
            vec![Call::List {
                filters: vec![],
                page: 1
            }]
        );
    }

    #[tokio::test]
    async fn test_short_first_page_hides_load_more() {
        let service = FakeService::new(|_| Reply::page(13));
        let view = view(service.clone());
        view.mount().await;

        let before = view.snapshot();
        assert!(!before.cursor.more_available);
        assert!(!before.show_load_more());

        assert!(!view.load_more().await);
        assert_eq!(view.snapshot(), before);
        assert_eq!(service.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_result_shows_no_results_notice() {
        let service = FakeService::new(|_| Reply::page(0));
        let view = view(service);
        view.mount().await;

        assert_eq!(view.snapshot().notice(), Some(NO_RESULTS_MESSAGE));
    }

    #[tokio::test]
    async fn test_load_more_appends_next_page() {
        let service = FakeService::new(|call| match call.page() {
            1 | 2 => Reply::page(20),
            _ => Reply::page(7),
        });
        let view = view(service.clone());
        view.mount().await;

        assert!(view.load_more().await);
        let snapshot = view.snapshot();
        assert_eq!(snapshot.recipes.len(), 40);
        assert_eq!(snapshot.cursor.next_page, 3);
        assert!(snapshot.recipes[20].name.starts_with("list::p2"));

        assert!(view.load_more().await);
        let snapshot = view.snapshot();
        assert_eq!(snapshot.recipes.len(), 47);
        assert!(!snapshot.cursor.more_available);
        assert!(!view.load_more().await);
        assert_eq!(service.calls().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_typing_within_debounce_window_fetches_once() {
        let service = FakeService::new(|_| Reply::page(3));
        let view = view(service.clone());

        for text in ["pan", "pane", "paneer"] {
            view.set_query(text);
            sleep(Duration::from_millis(100)).await;
        }
        assert!(service.calls().is_empty());

        sleep(Duration::from_secs(1)).await;
        assert_eq!(
            service.calls(),
            vec![Call::Search {
                query: "paneer".to_string(),
                filters: vec![],
                page: 1
            }]
        );
        assert_eq!(view.snapshot().recipes.len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_clearing_query_switches_to_listing() {
        let service = FakeService::new(|_| Reply::page(5));
        let view = view(service.clone());

        view.set_query("  dal ");
        sleep(Duration::from_secs(1)).await;
        view.set_query("   ");
        sleep(Duration::from_secs(1)).await;

        let calls = service.calls();
        assert_eq!(calls.len(), 2);
        assert!(matches!(&calls[0], Call::Search { query, .. } if query == "dal"));
        assert!(matches!(&calls[1], Call::List { page: 1, .. }));
    }

    #[tokio::test]
    async fn test_submit_query_skips_debounce() {
        let service = FakeService::new(|_| Reply::page(2));
        let view = view(service.clone());

        view.set_query("biryani");
        view.submit_query().await;

        assert_eq!(
            service.calls(),
            vec![Call::Search {
                query: "biryani".to_string(),
                filters: vec![],
                page: 1
            }]
        );
        assert_eq!(view.snapshot().recipes.len(), 2);
    }

    #[tokio::test]
    async fn test_filters_and_across_categories_or_within() {
        let service = FakeService::new(|_| Reply::page(4));
        let view = view(service.clone());

        view.toggle_filter(FilterCategory::Cuisine, "Indian").await;
        view.toggle_filter(FilterCategory::Diet, "Vegetarian").await;
        view.toggle_filter(FilterCategory::Cuisine, "Italian").await;

        let calls = service.calls();
        assert_eq!(calls[0].filters(), pairs(&[("cuisine", "Indian")]));
        assert_eq!(
            calls[1].filters(),
            pairs(&[("cuisine", "Indian"), ("diet", "Vegetarian")])
        );
        assert_eq!(
            calls[2].filters(),
            pairs(&[
                ("cuisine", "Indian"),
                ("cuisine", "Italian"),
                ("diet", "Vegetarian")
            ])
        );
        assert!(calls.iter().all(|call| call.page() == 1));
    }

    #[tokio::test]
    async fn test_toggle_twice_restores_constraints() {
        let service = FakeService::new(|_| Reply::page(4));
        let view = view(service.clone()).with_filters(FilterSelection::from_pairs(vec![(
            "course", "Dessert",
        )]));
        view.mount().await;
        let original = view.snapshot().filters;

        view.toggle_filter(FilterCategory::Diet, "Vegan").await;
        view.toggle_filter(FilterCategory::Diet, "Vegan").await;

        assert_eq!(view.snapshot().filters, original);
        let calls = service.calls();
        assert_eq!(calls.first(), calls.last());
        assert_eq!(calls[0].filters(), pairs(&[("course", "Dessert")]));
    }

    #[tokio::test]
    async fn test_search_keeps_filters_as_constraints() {
        let service = FakeService::new(|_| Reply::page(1));
        let view = view(service.clone());

        view.toggle_filter(FilterCategory::Diet, "Vegetarian").await;
        view.set_query("paneer");
        view.submit_query().await;

        assert_eq!(
            service.calls().last(),
            Some(&Call::Search {
                query: "paneer".to_string(),
                filters: pairs(&[("diet", "Vegetarian")]),
                page: 1
            })
        );
    }

    #[tokio::test]
    async fn test_clear_filter_refetches_without_category() {
        let service = FakeService::new(|_| Reply::page(1));
        let view = view(service.clone());

        view.toggle_filter(FilterCategory::Cuisine, "Indian").await;
        view.toggle_filter(FilterCategory::Course, "Snack").await;
        view.clear_filter(FilterCategory::Cuisine).await;

        let calls = service.calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[2].filters(), pairs(&[("course", "Snack")]));
    }

    #[tokio::test(start_paused = true)]
    async fn test_toggle_invalidates_results_immediately() {
        let service = FakeService::new(|call| {
            if call.filters().is_empty() {
                Reply::page(20)
            } else {
                Reply::page(3).after(200)
            }
        });
        let view = view(service.clone());
        view.mount().await;
        assert_eq!(view.snapshot().recipes.len(), 20);

        let observed = async {
            sleep(Duration::from_millis(10)).await;
            view.snapshot()
        };
        let (_, during) = tokio::join!(view.toggle_filter(FilterCategory::Diet, "Vegan"), observed);

        assert!(during.fetching);
        assert!(during.recipes.is_empty());
        assert!(!during.show_load_more());
        assert_eq!(during.notice(), None);
        assert_eq!(view.snapshot().recipes.len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_earlier_reset_does_not_overwrite_newer() {
        let service = FakeService::new(|call| {
            if call.filters().len() == 1 {
                Reply::page(20).after(300)
            } else {
                Reply::page(2).after(50)
            }
        });
        let view = view(service.clone());

        let later = async {
            sleep(Duration::from_millis(10)).await;
            view.toggle_filter(FilterCategory::Diet, "Vegan").await;
        };
        tokio::join!(view.toggle_filter(FilterCategory::Cuisine, "Indian"), later);

        let snapshot = view.snapshot();
        assert_eq!(snapshot.recipes.len(), 2);
        assert!(snapshot.recipes[0]
            .name
            .starts_with("list:cuisine=Indian&diet=Vegan:p1"));
        assert!(!snapshot.cursor.more_available);
        assert!(!snapshot.fetching);
    }

    #[tokio::test(start_paused = true)]
    async fn test_filter_change_discards_outstanding_load_more() {
        let service = FakeService::new(|call| match (call.filters().is_empty(), call.page()) {
            (true, 1) => Reply::page(20),
            (true, _) => Reply::page(20).after(300),
            (false, _) => Reply::page(5).after(50),
        });
        let view = view(service.clone());
        view.mount().await;

        let change = async {
            sleep(Duration::from_millis(10)).await;
            view.toggle_filter(FilterCategory::Cuisine, "Indian").await;
        };
        let (issued, _) = tokio::join!(view.load_more(), change);
        assert!(issued);

        let snapshot = view.snapshot();
        assert_eq!(snapshot.recipes.len(), 5);
        assert!(snapshot
            .recipes
            .iter()
            .all(|r| r.name.starts_with("list:cuisine=Indian:p1")));
        assert_eq!(snapshot.cursor.next_page, 2);
        assert!(!snapshot.fetching);
    }

    #[tokio::test(start_paused = true)]
    async fn test_load_more_suppressed_while_fetching() {
        let service = FakeService::new(|call| match call {
            Call::List { .. } => Reply::page(20),
            Call::Search { .. } => Reply::page(20).after(200),
        });
        let view = view(service.clone());
        view.mount().await;

        let search = async {
            view.set_query("korma");
            view.submit_query().await;
        };
        let attempt = async {
            sleep(Duration::from_millis(10)).await;
            let snapshot = view.snapshot();
            assert!(snapshot.fetching);
            assert!(snapshot.cursor.more_available);
            view.load_more().await
        };
        let (_, issued) = tokio::join!(search, attempt);

        assert!(!issued);
        assert_eq!(service.calls().len(), 2);
        assert!(view.snapshot().show_load_more());
    }

    #[tokio::test]
    async fn test_failure_keeps_previous_results() {
        let service = FakeService::new(|call| match call {
            Call::List { .. } => Reply::page(20),
            Call::Search { .. } => Reply::fail(),
        });
        let view = view(service.clone());
        view.mount().await;

        view.set_query("quinoa");
        view.submit_query().await;

        let snapshot = view.snapshot();
        assert_eq!(snapshot.recipes.len(), 20);
        assert_eq!(snapshot.error, Some(FETCH_FAILED_MESSAGE));
        assert_eq!(snapshot.notice(), Some(FETCH_FAILED_MESSAGE));

        view.set_query("");
        view.submit_query().await;
        assert_eq!(view.snapshot().error, None);
    }

    #[tokio::test]
    async fn test_failed_reset_stops_pagination() {
        let service = FakeService::new(|call| match call {
            Call::List { .. } => Reply::page(20),
            Call::Search { page: 1, .. } => Reply::fail(),
            Call::Search { .. } => Reply::page(20),
        });
        let view = view(service.clone());
        view.mount().await;
        assert!(view.snapshot().show_load_more());

        view.set_query("quinoa");
        view.submit_query().await;

        let snapshot = view.snapshot();
        assert_eq!(snapshot.recipes.len(), 20);
        assert!(!snapshot.cursor.more_available);
        assert!(!snapshot.show_load_more());

        let before = service.calls().len();
        assert!(!view.load_more().await);
        assert_eq!(service.calls().len(), before);
        assert_eq!(view.snapshot().recipes.len(), 20);
    }

    #[tokio::test]
    async fn test_failed_load_more_can_be_retried() {
        let failed_once = Arc::new(Mutex::new(false));
        let flag = failed_once.clone();
        let service = FakeService::new(move |call| {
            let mut failed = flag.lock().unwrap();
            if call.page() == 2 && !*failed {
                *failed = true;
                Reply::fail()
            } else {
                Reply::page(20)
            }
        });
        let view = view(service.clone());
        view.mount().await;

        assert!(view.load_more().await);
        let snapshot = view.snapshot();
        assert_eq!(snapshot.error, Some(FETCH_FAILED_MESSAGE));
        assert!(snapshot.show_load_more());

        assert!(view.load_more().await);
        assert_eq!(view.snapshot().recipes.len(), 40);
        assert_eq!(view.snapshot().error, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_load_more_uses_query_at_call_time() {
        let service = FakeService::new(|_| Reply::page(20));
        let view = view(service.clone());
        view.mount().await;

        // Debounce still pending: the next page already goes to the search endpoint
        view.set_query("dal");
        assert!(view.load_more().await);

        assert_eq!(
            service.calls().last(),
            Some(&Call::Search {
                query: "dal".to_string(),
                filters: vec![],
                page: 2
            })
        );
    }
}
