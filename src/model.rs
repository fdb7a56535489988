use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub rate: f64,
    pub count: u32,
}

/// A product record as served by the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawProduct {
    pub id: u64,
    pub title: String,
    pub price: f64,
    pub description: String,
    pub category: String,
    pub image: String,
    pub rating: Rating,
}

/// A catalog product plus the attributes synthesized on fetch
/// (brand, stock and tag sets).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: u64,
    pub title: String,
    pub price: f64,
    pub description: String,
    pub category: String,
    pub image: String,
    pub rating: Rating,
    pub brand: String,
    pub stock: u32,
    pub features: Vec<String>,
    pub colors: Vec<String>,
    pub sizes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: usize,
    pub name: String,
}

impl Category {
    /// Ids are positional (1-based) and only meaningful within one fetch.
    pub fn from_names(names: Vec<String>) -> Vec<Category> {
        names
            .into_iter()
            .enumerate()
            .map(|(index, name)| Category { id: index + 1, name })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchFilters {
    pub min_price: f64,
    pub max_price: f64,
    pub category: String,
    pub brand: String,
    pub color: String,
    pub size: String,
}

impl Default for SearchFilters {
    fn default() -> Self {
        Self {
            min_price: 0.0,
            max_price: 1000.0,
            category: String::new(),
            brand: String::new(),
            color: String::new(),
            size: String::new(),
        }
    }
}

impl SearchFilters {
    /// Merge a partial update; fields the update leaves as `None` are kept.
    pub fn apply(&mut self, update: FilterUpdate) {
        if let Some(min) = update.min_price {
            self.min_price = min;
        }
        if let Some(max) = update.max_price {
            self.max_price = max;
        }
        if let Some(category) = update.category {
            self.category = category;
        }
        if let Some(brand) = update.brand {
            self.brand = brand;
        }
        if let Some(color) = update.color {
            self.color = color;
        }
        if let Some(size) = update.size {
            self.size = size;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterUpdate {
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub color: Option<String>,
    pub size: Option<String>,
}

impl FilterUpdate {
    pub fn is_empty(&self) -> bool {
        *self == FilterUpdate::default()
    }
}
