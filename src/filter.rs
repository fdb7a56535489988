use crate::model::{Product, SearchFilters};

/// Conjunctive predicate over term and facet filters.
///
/// The term matches title or description, case-insensitively; an empty term
/// matches everything. Empty string facets impose no constraint. Category and
/// brand compare exactly, color and size test membership in the product's tags.
pub fn matches(product: &Product, term: &str, filters: &SearchFilters) -> bool {
    matches_term(product, &term.to_lowercase())
        && product.price >= filters.min_price
        && product.price <= filters.max_price
        && (filters.category.is_empty() || product.category == filters.category)
        && (filters.brand.is_empty() || product.brand == filters.brand)
        && (filters.color.is_empty() || product.colors.contains(&filters.color))
        && (filters.size.is_empty() || product.sizes.contains(&filters.size))
}

fn matches_term(product: &Product, lowered_term: &str) -> bool {
    lowered_term.is_empty()
        || product.title.to_lowercase().contains(lowered_term)
        || product.description.to_lowercase().contains(lowered_term)
}

/// Order-preserving filter.
pub fn filter_products(products: Vec<Product>, term: &str, filters: &SearchFilters) -> Vec<Product> {
    products
        .into_iter()
        .filter(|product| matches(product, term, filters))
        .collect()
}
