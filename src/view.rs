use crate::client::CatalogClient;
use crate::error::{CatalogError, UserMessage};
use crate::model::{Category, FilterUpdate, Product, SearchFilters};
use crate::paginate::{self, PageInfo};

#[derive(Debug, Clone, PartialEq)]
pub enum ViewState {
    Loading,
    Ready,
    Error(String),
}

/// Identifies one issued search. Only the most recently issued ticket may
/// update the product list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchTicket(u64);

/// Application state for one viewing session: what was fetched, what the
/// user asked for and what is currently shown.
pub struct ViewController {
    client: CatalogClient,
    page_size: usize,
    state: ViewState,
    products: Vec<Product>,
    categories: Vec<Category>,
    search_term: String,
    filters: SearchFilters,
    current_page: usize,
    selected: Option<Product>,
    latest_search: u64,
}

impl ViewController {
    pub fn new(client: CatalogClient, page_size: usize) -> Self {
        Self {
            client,
            page_size,
            state: ViewState::Loading,
            products: Vec::new(),
            categories: Vec::new(),
            search_term: String::new(),
            filters: SearchFilters::default(),
            current_page: 1,
            selected: None,
            latest_search: 0,
        }
    }

    pub async fn mount(&mut self) {
        self.state = ViewState::Loading;
        match self.client.fetch_initial().await {
            Ok((products, categories)) => {
                self.products = products;
                self.categories = categories;
                self.current_page = 1;
                self.state = ViewState::Ready;
            }
            Err(e) => self.fail(UserMessage::InitialLoad, &e),
        }
    }

    pub async fn set_search_term(&mut self, term: &str) {
        self.search_term = term.to_string();
        self.refresh().await;
    }

    pub async fn update_filters(&mut self, update: FilterUpdate) {
        self.filters.apply(update);
        self.refresh().await;
    }

    pub async fn reset_filters(&mut self) {
        self.filters = SearchFilters::default();
        self.refresh().await;
    }

    /// Re-run the search for the current term and filters.
    pub async fn refresh(&mut self) {
        let ticket = self.begin_search();
        let result = self.client.search(&self.search_term, &self.filters).await;
        self.complete_search(ticket, result);
    }

    pub fn begin_search(&mut self) -> SearchTicket {
        self.latest_search += 1;
        self.state = ViewState::Loading;
        SearchTicket(self.latest_search)
    }

    /// Apply a search result. Returns `false` when a newer search has been
    /// issued since `ticket`, in which case the result is dropped.
    pub fn complete_search(
        &mut self,
        ticket: SearchTicket,
        result: Result<Vec<Product>, CatalogError>,
    ) -> bool {
        if ticket.0 != self.latest_search {
            tracing::warn!(
                "Discarding stale search response #{} (latest #{})",
                ticket.0,
                self.latest_search
            );
            return false;
        }

        match result {
            Ok(products) => {
                tracing::info!("Search returned {} products", products.len());
                self.products = products;
                self.current_page = 1;
                self.state = ViewState::Ready;
            }
            Err(e) => self.fail(UserMessage::Search, &e),
        }
        true
    }

    /// Fetch the full record for `id` and show it.
    pub async fn select(&mut self, id: u64) {
        self.selected = None;
        match self.client.get_product(id).await {
            Ok(product) => {
                if self.state == ViewState::Error(UserMessage::Detail.to_string()) {
                    self.state = ViewState::Ready;
                }
                self.selected = Some(product);
            }
            Err(e) => self.fail(UserMessage::Detail, &e),
        }
    }

    pub fn close_detail(&mut self) {
        self.selected = None;
    }

    pub fn go_to_page(&mut self, page: usize) {
        self.current_page = page;
    }

    pub fn next_page(&mut self) {
        if self.page_info().has_next() {
            self.current_page += 1;
        }
    }

    pub fn prev_page(&mut self) {
        if self.current_page > 1 {
            self.current_page -= 1;
        }
    }

    pub fn current_items(&self) -> &[Product] {
        paginate::paginate(&self.products, self.current_page, self.page_size)
    }

    pub fn page_info(&self) -> PageInfo {
        PageInfo::new(self.current_page, self.page_size, self.products.len())
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn selected(&self) -> Option<&Product> {
        self.selected.as_ref()
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn filters(&self) -> &SearchFilters {
        &self.filters
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    fn fail(&mut self, message: UserMessage, cause: &CatalogError) {
        tracing::error!("{}: {}", message, cause);
        self.state = ViewState::Error(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::tests::{catalog_json, raw_json, test_config};
    use httpmock::prelude::*;
    use serde_json::json;

    async fn mounted(server: &MockServer) -> ViewController {
        server.mock(|when, then| {
            when.method(GET).path("/products");
            then.status(200).json_body(catalog_json());
        });
        server.mock(|when, then| {
            when.method(GET).path("/products/categories");
            then.status(200)
                .json_body(json!(["electronics", "men's clothing"]));
        });
        let client = CatalogClient::new(&test_config(&server.base_url())).unwrap();
        let mut view = ViewController::new(client, 8);
        view.mount().await;
        view
    }

    fn many_products(n: u64) -> serde_json::Value {
        let items: Vec<_> = (1..=n)
            .map(|id| raw_json(id, &format!("Item {}", id), 10.0 + id as f64, "electronics"))
            .collect();
        json!(items)
    }

    #[tokio::test]
    async fn mount_loads_products_and_categories() {
        let server = MockServer::start_async().await;
        let view = mounted(&server).await;

        assert_eq!(view.state(), &ViewState::Ready);
        assert_eq!(view.products().len(), 5);
        assert_eq!(view.categories().len(), 2);
        assert_eq!(view.current_page(), 1);
        assert!(view.selected().is_none());
    }

    #[tokio::test]
    async fn mount_failure_shows_initial_load_message() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/products");
            then.status(503);
        });
        server.mock(|when, then| {
            when.method(GET).path("/products/categories");
            then.status(200).json_body(json!(["electronics"]));
        });

        let client = CatalogClient::new(&test_config(&server.base_url())).unwrap();
        let mut view = ViewController::new(client, 8);
        view.mount().await;

        assert_eq!(
            view.state(),
            &ViewState::Error("An error occurred while fetching initial data.".to_string())
        );
        assert!(view.products().is_empty());
    }

    #[tokio::test]
    async fn search_and_filter_changes_reset_page() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/products");
            then.status(200).json_body(many_products(20));
        });
        server.mock(|when, then| {
            when.method(GET).path("/products/categories");
            then.status(200).json_body(json!(["electronics"]));
        });

        let client = CatalogClient::new(&test_config(&server.base_url())).unwrap();
        let mut view = ViewController::new(client, 8);
        view.mount().await;

        view.go_to_page(3);
        assert_eq!(view.current_items().len(), 4);

        view.set_search_term("item").await;
        assert_eq!(view.current_page(), 1);
        assert_eq!(view.current_items().len(), 8);

        view.go_to_page(2);
        view.update_filters(FilterUpdate {
            max_price: Some(15.0),
            ..FilterUpdate::default()
        })
        .await;
        assert_eq!(view.current_page(), 1);
        let ids: Vec<u64> = view.current_items().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);

        view.reset_filters().await;
        assert_eq!(view.products().len(), 20);
        assert_eq!(view.state(), &ViewState::Ready);
    }

    #[tokio::test]
    async fn page_beyond_end_is_empty() {
        let server = MockServer::start_async().await;
        let mut view = mounted(&server).await;

        view.go_to_page(2);
        assert!(view.current_items().is_empty());
        assert!(view.page_info().is_empty());

        view.go_to_page(1);
        view.next_page();
        assert_eq!(view.current_page(), 1);
        view.prev_page();
        assert_eq!(view.current_page(), 1);
    }

    #[tokio::test]
    async fn search_failure_then_recovery() {
        let server = MockServer::start_async().await;
        let mut view = mounted(&server).await;

        // Point the controller at a server that only fails
        let failing = MockServer::start_async().await;
        failing.mock(|when, then| {
            when.method(GET).path("/products");
            then.status(500);
        });
        view.client = CatalogClient::new(&test_config(&failing.base_url())).unwrap();

        view.set_search_term("shirt").await;
        assert_eq!(
            view.state(),
            &ViewState::Error("An error occurred while searching for products.".to_string())
        );

        view.client = CatalogClient::new(&test_config(&server.base_url())).unwrap();
        view.set_search_term("shirt").await;
        assert_eq!(view.state(), &ViewState::Ready);
        assert_eq!(view.products().len(), 3);
    }

    #[tokio::test]
    async fn selecting_fetches_detail() {
        let server = MockServer::start_async().await;
        let mut view = mounted(&server).await;
        let detail = server.mock(|when, then| {
            when.method(GET).path("/products/3");
            then.status(200)
                .json_body(raw_json(3, "Casual Shirt", 15.99, "men's clothing"));
        });

        view.select(3).await;
        detail.assert();
        assert_eq!(view.selected().map(|p| p.id), Some(3));
        assert_eq!(view.state(), &ViewState::Ready);

        view.close_detail();
        assert!(view.selected().is_none());
    }

    #[tokio::test]
    async fn detail_failure_clears_selection() {
        let server = MockServer::start_async().await;
        let mut view = mounted(&server).await;
        server.mock(|when, then| {
            when.method(GET).path("/products/1");
            then.status(200)
                .json_body(raw_json(1, "Slim Fit Shirt", 22.3, "men's clothing"));
        });
        let detail = server.mock(|when, then| {
            when.method(GET).path("/products/3");
            then.status(500);
        });

        view.select(1).await;
        assert!(view.selected().is_some());

        view.select(3).await;
        detail.assert();
        assert!(view.selected().is_none());
        assert_eq!(
            view.state(),
            &ViewState::Error("An error occurred while fetching product details.".to_string())
        );
    }

    #[tokio::test]
    async fn successful_select_clears_earlier_detail_error() {
        let server = MockServer::start_async().await;
        let mut view = mounted(&server).await;
        server.mock(|when, then| {
            when.method(GET).path("/products/3");
            then.status(500);
        });
        server.mock(|when, then| {
            when.method(GET).path("/products/1");
            then.status(200)
                .json_body(raw_json(1, "Slim Fit Shirt", 22.3, "men's clothing"));
        });

        view.select(3).await;
        assert!(matches!(view.state(), ViewState::Error(_)));

        view.select(1).await;
        assert_eq!(view.selected().map(|p| p.id), Some(1));
        assert_eq!(view.state(), &ViewState::Ready);
    }

    #[tokio::test]
    async fn search_error_survives_detail_fetch() {
        let server = MockServer::start_async().await;
        let mut view = mounted(&server).await;
        server.mock(|when, then| {
            when.method(GET).path("/products/1");
            then.status(200)
                .json_body(raw_json(1, "Slim Fit Shirt", 22.3, "men's clothing"));
        });

        let ticket = view.begin_search();
        view.complete_search(ticket, Err(CatalogError::Command("down".to_string())));
        view.select(1).await;

        assert_eq!(
            view.state(),
            &ViewState::Error("An error occurred while searching for products.".to_string())
        );
    }

    #[tokio::test]
    async fn search_term_is_kept_as_typed() {
        let server = MockServer::start_async().await;
        let mut view = mounted(&server).await;

        view.set_search_term(" shirt").await;
        assert_eq!(view.search_term(), " shirt");
        assert_eq!(view.products().len(), 3);

        view.set_search_term("shirt ").await;
        assert!(view.products().is_empty());
    }

    #[tokio::test]
    async fn stale_search_results_are_discarded() {
        let server = MockServer::start_async().await;
        let mut view = mounted(&server).await;
        let before = view.products().to_vec();

        let stale = view.begin_search();
        let latest = view.begin_search();
        assert_ne!(stale, latest);
        assert_eq!(view.state(), &ViewState::Loading);

        assert!(!view.complete_search(stale, Ok(Vec::new())));
        assert_eq!(view.products(), before.as_slice());

        let newest = vec![before[1].clone()];
        assert!(view.complete_search(latest, Ok(newest)));
        assert_eq!(view.products().len(), 1);
        assert_eq!(view.state(), &ViewState::Ready);

        // A late failure for an old ticket does not flip the view into Error
        assert!(!view.complete_search(stale, Err(CatalogError::Command("late".to_string()))));
        assert_eq!(view.state(), &ViewState::Ready);
    }
}
