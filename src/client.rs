use crate::config::AppConfig;
use crate::enhance::Enhancer;
use crate::error::CatalogError;
use crate::filter;
use crate::model::{Category, Product, RawProduct, SearchFilters};
use serde::de::DeserializeOwned;
use url::Url;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Read-only client for the remote catalog service.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: reqwest::Client,
    base_url: Url,
    enhancer: Enhancer,
}

impl CatalogClient {
    pub fn new(config: &AppConfig) -> Result<Self, CatalogError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            enhancer: Enhancer::new(config.enhance),
        })
    }

    pub async fn list_products(&self) -> Result<Vec<Product>, CatalogError> {
        let raws: Vec<RawProduct> = self.get_json(&["products"]).await?;
        tracing::info!("Fetched {} products", raws.len());
        Ok(self.enhancer.enhance_all(raws))
    }

    pub async fn get_product(&self, id: u64) -> Result<Product, CatalogError> {
        let raw: RawProduct = self.get_json(&["products", &id.to_string()]).await?;
        Ok(self.enhancer.enhance(raw))
    }

    pub async fn list_categories(&self) -> Result<Vec<Category>, CatalogError> {
        let names: Vec<String> = self.get_json(&["products", "categories"]).await?;
        tracing::info!("Fetched {} categories", names.len());
        Ok(Category::from_names(names))
    }

    pub async fn list_products_by_category(
        &self,
        name: &str,
    ) -> Result<Vec<Product>, CatalogError> {
        let raws: Vec<RawProduct> = self.get_json(&["products", "category", name]).await?;
        tracing::info!("Fetched {} products in category '{}'", raws.len(), name);
        Ok(self.enhancer.enhance_all(raws))
    }

    /// Client-side search: fetches the full product list on every call and
    /// filters it in-process.
    pub async fn search(
        &self,
        term: &str,
        filters: &SearchFilters,
    ) -> Result<Vec<Product>, CatalogError> {
        let products = self.list_products().await?;
        let total = products.len();
        let matched = filter::filter_products(products, term, filters);
        tracing::debug!("Search '{}' matched {}/{} products", term, matched.len(), total);
        Ok(matched)
    }

    /// Products and categories fetched concurrently; fails if either fails.
    pub async fn fetch_initial(&self) -> Result<(Vec<Product>, Vec<Category>), CatalogError> {
        futures::try_join!(self.list_products(), self.list_categories())
    }

    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, CatalogError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| CatalogError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, CatalogError> {
        let url = self.endpoint(segments)?;
        tracing::debug!("GET {}", url);

        let response = self.http.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status {
                url: url.to_string(),
                status,
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|source| CatalogError::Decode {
            url: url.to_string(),
            source,
        })
    }
}
