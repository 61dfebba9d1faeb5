use std::fmt::{Display, Formatter};
use std::time::SystemTime;

pub const MIN_RATING: f32 = 0.0;
pub const MAX_RATING: f32 = 5.0;

/// Product is an immutable catalog record, identified by its `id`.
/// The cache never changes a product in place, the whole set of products is replaced on every refresh.
#[derive(Clone, Debug, PartialEq)]
pub struct Product {
    id: String,
    name: String,
    description: String,
    category: String,
    brand: String,
    price: f64,
    discounted_price: Option<f64>,
    rating: f32,
    created_at: SystemTime,
}

/// Reason why a product can not be installed in the [`crate::catalog::store::Store`].
#[derive(Clone, Debug, PartialEq)]
pub enum InvalidProduct {
    EmptyId,
    NegativePrice(f64),
    NegativeDiscountedPrice(f64),
    RatingOutOfRange(f32),
}

impl Display for InvalidProduct {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            InvalidProduct::EmptyId =>
                write!(formatter, "id must not be empty"),
            InvalidProduct::NegativePrice(price) =>
                write!(formatter, "price must be a non-negative number, found {}", price),
            InvalidProduct::NegativeDiscountedPrice(price) =>
                write!(formatter, "discounted price must be a non-negative number, found {}", price),
            InvalidProduct::RatingOutOfRange(rating) =>
                write!(formatter, "rating must be within {}..={}, found {}", MIN_RATING, MAX_RATING, rating),
        }
    }
}

impl Product {
    pub fn id(&self) -> &str { &self.id }

    pub fn name(&self) -> &str { &self.name }

    pub fn description(&self) -> &str { &self.description }

    pub fn category(&self) -> &str { &self.category }

    pub fn brand(&self) -> &str { &self.brand }

    pub fn price(&self) -> f64 { self.price }

    pub fn discounted_price(&self) -> Option<f64> { self.discounted_price }

    pub fn rating(&self) -> f32 { self.rating }

    pub fn created_at(&self) -> SystemTime { self.created_at }

    /// A product is discounted only if it carries a discounted price that is strictly less than its price.
    pub fn is_discounted(&self) -> bool {
        matches!(self.discounted_price, Some(discounted_price) if discounted_price < self.price)
    }

    pub(crate) fn matches_text(&self, lowercase_query: &str) -> bool {
        self.name.to_lowercase().contains(lowercase_query) ||
            self.description.to_lowercase().contains(lowercase_query)
    }

    pub(crate) fn validate(&self) -> Result<(), InvalidProduct> {
        if self.id.is_empty() {
            return Err(InvalidProduct::EmptyId);
        }
        if !(self.price >= 0.0) || !self.price.is_finite() {
            return Err(InvalidProduct::NegativePrice(self.price));
        }
        if let Some(discounted_price) = self.discounted_price {
            if !(discounted_price >= 0.0) || !discounted_price.is_finite() {
                return Err(InvalidProduct::NegativeDiscountedPrice(discounted_price));
            }
        }
        if !(MIN_RATING..=MAX_RATING).contains(&self.rating) {
            return Err(InvalidProduct::RatingOutOfRange(self.rating));
        }
        Ok(())
    }
}

pub struct ProductBuilder {
    product: Product,
}

impl ProductBuilder {
    pub fn new(id: &str) -> Self {
        ProductBuilder {
            product: Product {
                id: id.to_string(),
                name: String::new(),
                description: String::new(),
                category: String::new(),
                brand: String::new(),
                price: 0.0,
                discounted_price: None,
                rating: MIN_RATING,
                created_at: SystemTime::UNIX_EPOCH,
            }
        }
    }

    pub fn name(mut self, name: &str) -> ProductBuilder {
        self.product.name = name.to_string();
        self
    }

    pub fn description(mut self, description: &str) -> ProductBuilder {
        self.product.description = description.to_string();
        self
    }

    pub fn category(mut self, category: &str) -> ProductBuilder {
        self.product.category = category.to_string();
        self
    }

    pub fn brand(mut self, brand: &str) -> ProductBuilder {
        self.product.brand = brand.to_string();
        self
    }

    pub fn price(mut self, price: f64) -> ProductBuilder {
        self.product.price = price;
        self
    }

    pub fn discounted_price(mut self, discounted_price: f64) -> ProductBuilder {
        self.product.discounted_price = Some(discounted_price);
        self
    }

    pub fn rating(mut self, rating: f32) -> ProductBuilder {
        self.product.rating = rating;
        self
    }

    pub fn created_at(mut self, created_at: SystemTime) -> ProductBuilder {
        self.product.created_at = created_at;
        self
    }

    pub fn build(self) -> Product {
        self.product
    }
}
