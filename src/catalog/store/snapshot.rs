use std::cmp::Reverse;
use std::time::SystemTime;

use hashbrown::{HashMap, HashSet};

use crate::catalog::product::Product;

/// Defines the type for the version of a snapshot. Every successful replace installs a snapshot with the next version.
pub type SnapshotVersion = u64;

/// Snapshot is the complete, immutable set of products held by the [`crate::catalog::store::Store`] at a given moment.
/// Products keep the order in which they were installed. All the queries are pure projections over the snapshot.
pub struct Snapshot {
    version: SnapshotVersion,
    products: Vec<Product>,
    position_by_id: HashMap<String, usize>,
}

impl Snapshot {
    pub(crate) fn empty() -> Self {
        Snapshot {
            version: 0,
            products: Vec::new(),
            position_by_id: HashMap::new(),
        }
    }

    /// Creates a snapshot from `records`. If an id occurs more than once, its last occurrence wins,
    /// at the position of that last occurrence.
    pub(crate) fn new(version: SnapshotVersion, records: Vec<Product>) -> Self {
        let mut last_position: HashMap<String, usize> = HashMap::with_capacity(records.len());
        for (position, product) in records.iter().enumerate() {
            last_position.insert(product.id().to_string(), position);
        }

        let products = records
            .into_iter()
            .enumerate()
            .filter(|(position, product)| last_position.get(product.id()) == Some(position))
            .map(|(_, product)| product)
            .collect::<Vec<_>>();

        let position_by_id = products
            .iter()
            .enumerate()
            .map(|(position, product)| (product.id().to_string(), position))
            .collect::<HashMap<_, _>>();

        Snapshot {
            version,
            products,
            position_by_id,
        }
    }

    pub fn version(&self) -> SnapshotVersion { self.version }

    pub fn len(&self) -> usize { self.products.len() }

    pub fn is_empty(&self) -> bool { self.products.is_empty() }

    pub fn all(&self) -> Vec<Product> {
        self.products.clone()
    }

    pub fn by_id(&self, id: &str) -> Option<&Product> {
        self.position_by_id.get(id).map(|position| &self.products[*position])
    }

    pub fn by_category(&self, category: &str) -> Vec<Product> {
        self.filter(|product| product.category() == category)
    }

    pub fn by_brand(&self, brand: &str) -> Vec<Product> {
        self.filter(|product| product.brand() == brand)
    }

    /// Returns the products priced within `min_price..=max_price`.
    pub fn by_price_range(&self, min_price: f64, max_price: f64) -> Vec<Product> {
        self.filter(|product| product.price() >= min_price && product.price() <= max_price)
    }

    pub fn by_minimum_rating(&self, minimum_rating: f32) -> Vec<Product> {
        self.filter(|product| product.rating() >= minimum_rating)
    }

    /// Case-insensitive substring match over name or description. An empty query matches every product.
    pub fn search(&self, query: &str) -> Vec<Product> {
        let query = query.to_lowercase();
        self.filter(|product| product.matches_text(&query))
    }

    /// Distinct categories, in the order of their first occurrence.
    pub fn categories(&self) -> Vec<String> {
        Self::distinct(self.products.iter().map(|product| product.category()))
    }

    /// Distinct brands, in the order of their first occurrence.
    pub fn brands(&self) -> Vec<String> {
        Self::distinct(self.products.iter().map(|product| product.brand()))
    }

    pub fn discounted(&self) -> Vec<Product> {
        self.filter(|product| product.is_discounted())
    }

    /// Returns the products created at or after `cutoff`, newest first.
    pub fn created_after(&self, cutoff: SystemTime) -> Vec<Product> {
        let mut products = self.filter(|product| product.created_at() >= cutoff);
        products.sort_by_key(|product| Reverse(product.created_at()));
        products
    }

    /// Returns at most `limit` products of `category`, excluding the product identified by `exclude_id`.
    pub fn related(&self, category: &str, exclude_id: &str, limit: usize) -> Vec<Product> {
        self.products
            .iter()
            .filter(|product| product.category() == category && product.id() != exclude_id)
            .take(limit)
            .cloned()
            .collect()
    }

    pub fn filtered(&self, category: &str, min_price: f64, max_price: f64) -> Vec<Product> {
        self.filter(|product| {
            product.category() == category && product.price() >= min_price && product.price() <= max_price
        })
    }

    pub fn count_in_category(&self, category: &str) -> usize {
        self.products.iter().filter(|product| product.category() == category).count()
    }

    /// Returns the (minimum, maximum) price, or None for an empty snapshot.
    pub fn price_bounds(&self) -> Option<(f64, f64)> {
        self.products.iter().map(|product| product.price()).fold(None, |bounds, price| match bounds {
            None => Some((price, price)),
            Some((min, max)) => Some((min.min(price), max.max(price))),
        })
    }

    fn filter<P>(&self, predicate: P) -> Vec<Product> where P: Fn(&Product) -> bool {
        self.products.iter().filter(|product| predicate(*product)).cloned().collect()
    }

    fn distinct<'a>(values: impl Iterator<Item=&'a str>) -> Vec<String> {
        let mut seen = HashSet::new();
        values.filter(|value| seen.insert(*value)).map(|value| value.to_string()).collect()
    }
}
