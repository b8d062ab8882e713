//! Client-side product search.
//!
//! Filtering always runs over the product list already fetched from the
//! Product Service. A term that reads as a number selects by identifier and
//! never falls back to name matching; any other term is a case-insensitive
//! substring match on the product name. Brand and category narrow the result
//! further and the relative order of the input list is preserved.

use crate::domain::lookup::{BrandId, CategoryId};
use crate::domain::product::Product;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterQuery {
    pub term: String,
    pub brand_id: Option<BrandId>,
    pub category_id: Option<CategoryId>,
}

impl FilterQuery {
    pub fn new(term: impl Into<String>) -> Self {
        Self { term: term.into(), ..Self::default() }
    }

    pub fn with_brand(mut self, brand_id: Option<BrandId>) -> Self {
        self.brand_id = brand_id;
        self
    }

    pub fn with_category(mut self, category_id: Option<CategoryId>) -> Self {
        self.category_id = category_id;
        self
    }

    pub fn term_kind(&self) -> SearchTerm {
        classify_term(&self.term)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum SearchTerm {
    /// Empty or whitespace-only.
    Any,
    Identifier(f64),
    /// Lower-cased needle.
    Name(String),
}

impl SearchTerm {
    fn matches(&self, product: &Product) -> bool {
        match self {
            Self::Any => true,
            Self::Identifier(value) => product.id.0 as f64 == *value,
            Self::Name(needle) => product.name.to_lowercase().contains(needle.as_str()),
        }
    }
}

pub fn classify_term(term: &str) -> SearchTerm {
    let trimmed = term.trim();
    if trimmed.is_empty() {
        return SearchTerm::Any;
    }

    match parse_radix(trimmed).or_else(|| trimmed.parse::<f64>().ok()) {
        Some(value) if value.is_finite() => SearchTerm::Identifier(value),
        _ => SearchTerm::Name(term.to_lowercase()),
    }
}

/// Unsigned `0x`, `0o` and `0b` literals, as typed into a browser search box.
fn parse_radix(term: &str) -> Option<f64> {
    let prefix = term.get(..2)?.to_ascii_lowercase();
    let radix = match prefix.as_str() {
        "0x" => 16,
        "0o" => 8,
        "0b" => 2,
        _ => return None,
    };
    let digits = &term[2..];
    if digits.is_empty() || !digits.chars().all(|digit| digit.is_digit(radix)) {
        return None;
    }
    u128::from_str_radix(digits, radix).ok().map(|value| value as f64)
}

pub fn filter_products(full: &[Product], query: &FilterQuery) -> Vec<Product> {
    let term = query.term_kind();

    full.iter()
        .filter(|product| term.matches(product))
        .filter(|product| query.brand_id.map_or(true, |brand| product.brand_id == Some(brand)))
        .filter(|product| {
            query.category_id.map_or(true, |category| product.category_id == Some(category))
        })
        .cloned()
        .collect()
}
