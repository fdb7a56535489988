use crate::error::CatalogError;
use crate::model::{Product, RawProduct};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use sha2::{Digest, Sha256};
use std::str::FromStr;

pub const BRANDS: &[&str] = &["Nike", "Adidas", "Puma", "Reebok", "Under Armour", "New Balance"];

pub const FEATURES: &[&str] = &[
    "Water-resistant",
    "Breathable",
    "Lightweight",
    "Durable",
    "Quick-drying",
    "UV protection",
    "Moisture-wicking",
    "Odor-resistant",
    "Stretchy",
    "Eco-friendly",
];

pub const COLORS: &[&str] = &["Red", "Blue", "Green", "Black", "White", "Yellow", "Purple", "Orange"];

pub const SIZES: &[&str] = &["XS", "S", "M", "L", "XL", "XXL"];

const FEATURE_COUNT: usize = 3;
const COLOR_COUNT: usize = 3;
const SIZE_COUNT: usize = 4;
const MAX_STOCK: u32 = 100;

/// How synthesized attributes are generated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum EnhanceMode {
    /// Fresh values on every fetch.
    #[default]
    Random,
    /// Values derived from the product id, identical across fetches.
    Stable,
}

impl FromStr for EnhanceMode {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "random" => Ok(EnhanceMode::Random),
            "stable" => Ok(EnhanceMode::Stable),
            other => Err(CatalogError::Config(format!(
                "Unknown enhance mode '{}'. Use 'random' or 'stable'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Enhancer {
    mode: EnhanceMode,
}

impl Enhancer {
    pub fn new(mode: EnhanceMode) -> Self {
        Self { mode }
    }

    pub fn enhance(&self, raw: RawProduct) -> Product {
        match self.mode {
            EnhanceMode::Random => enhance_with(raw, &mut rand::thread_rng()),
            EnhanceMode::Stable => {
                let mut rng = seeded_rng(raw.id);
                enhance_with(raw, &mut rng)
            }
        }
    }

    pub fn enhance_all(&self, raws: Vec<RawProduct>) -> Vec<Product> {
        raws.into_iter().map(|raw| self.enhance(raw)).collect()
    }
}

pub fn enhance_with<R: Rng + ?Sized>(raw: RawProduct, rng: &mut R) -> Product {
    let brand = BRANDS.choose(rng).copied().unwrap_or_default().to_string();
    let stock = rng.gen_range(0..MAX_STOCK);
    let features = sample(FEATURES, FEATURE_COUNT, rng);
    let colors = sample(COLORS, COLOR_COUNT, rng);
    let sizes = sample(SIZES, SIZE_COUNT, rng);

    Product {
        id: raw.id,
        title: raw.title,
        price: raw.price,
        description: raw.description,
        category: raw.category,
        image: raw.image,
        rating: raw.rating,
        brand,
        stock,
        features,
        colors,
        sizes,
    }
}

/// Distinct, uniformly chosen tags (partial Fisher–Yates).
fn sample<R: Rng + ?Sized>(vocabulary: &[&str], amount: usize, rng: &mut R) -> Vec<String> {
    vocabulary
        .choose_multiple(rng, amount)
        .map(|tag| tag.to_string())
        .collect()
}

fn seeded_rng(id: u64) -> StdRng {
    let digest = Sha256::digest(id.to_le_bytes());
    let mut seed = [0u8; 32];
    seed.copy_from_slice(&digest);
    StdRng::from_seed(seed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Rating;
    use std::collections::HashSet;

    fn raw(id: u64) -> RawProduct {
        RawProduct {
            id,
            title: format!("Product {}", id),
            price: 10.0,
            description: "desc".to_string(),
            category: "electronics".to_string(),
            image: String::new(),
            rating: Rating { rate: 4.0, count: 10 },
        }
    }

    fn assert_tags(tags: &[String], vocabulary: &[&str], expected: usize) {
        assert_eq!(tags.len(), expected);
        for tag in tags {
            assert!(vocabulary.contains(&tag.as_str()), "unexpected tag {}", tag);
        }
        let distinct: HashSet<_> = tags.iter().collect();
        assert_eq!(distinct.len(), expected);
    }

    #[test]
    fn synthesized_fields_come_from_vocabularies() {
        let enhancer = Enhancer::new(EnhanceMode::Random);
        for id in 0..200 {
            let product = enhancer.enhance(raw(id));
            assert!(BRANDS.contains(&product.brand.as_str()));
            assert!(product.stock < 100);
            assert_tags(&product.features, FEATURES, 3);
            assert_tags(&product.colors, COLORS, 3);
            assert_tags(&product.sizes, SIZES, 4);
        }
    }

    #[test]
    fn upstream_fields_are_preserved() {
        let product = Enhancer::new(EnhanceMode::Random).enhance(raw(7));
        assert_eq!(product.id, 7);
        assert_eq!(product.title, "Product 7");
        assert_eq!(product.price, 10.0);
        assert_eq!(product.rating, Rating { rate: 4.0, count: 10 });
    }

    #[test]
    fn stable_mode_is_repeatable_per_id() {
        let enhancer = Enhancer::new(EnhanceMode::Stable);
        for id in 1..=20 {
            assert_eq!(enhancer.enhance(raw(id)), enhancer.enhance(raw(id)));
        }
    }

    #[test]
    fn stable_mode_varies_between_ids() {
        let enhancer = Enhancer::new(EnhanceMode::Stable);
        let distinct: HashSet<_> = (1..=20)
            .map(|id| {
                let p = enhancer.enhance(raw(id));
                (p.brand, p.stock, p.features, p.colors, p.sizes)
            })
            .collect();
        assert!(distinct.len() > 1);
    }

    #[test]
    fn parses_mode_names() {
        assert_eq!("Stable".parse::<EnhanceMode>().unwrap(), EnhanceMode::Stable);
        assert_eq!(" random ".parse::<EnhanceMode>().unwrap(), EnhanceMode::Random);
        assert!("sorted".parse::<EnhanceMode>().is_err());
    }
}
