use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::image::Image;
use super::lookup::{Brand, BrandId, Category, CategoryId};
use super::wire::{null_as_default, unloaded_as_none, zero_id_as_none};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub u64);

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A catalog product as returned by the product listing, with its brand,
/// category and images embedded.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "ID")]
    pub id: ProductId,
    #[serde(rename = "ProductName", default)]
    pub name: String,
    #[serde(rename = "Description", default)]
    pub description: String,
    #[serde(rename = "PricePerPiece", with = "rust_decimal::serde::float", default)]
    pub unit_price: Decimal,
    #[serde(rename = "Stock", default)]
    pub stock: u32,
    #[serde(rename = "BrandID", default, deserialize_with = "zero_id_as_none")]
    pub brand_id: Option<BrandId>,
    #[serde(
        rename = "Brand",
        default,
        deserialize_with = "unloaded_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub brand: Option<Brand>,
    #[serde(rename = "CategoryID", default, deserialize_with = "zero_id_as_none")]
    pub category_id: Option<CategoryId>,
    #[serde(
        rename = "Category",
        default,
        deserialize_with = "unloaded_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub category: Option<Category>,
    #[serde(rename = "Images", default, deserialize_with = "null_as_default")]
    pub images: Vec<Image>,
    #[serde(rename = "CreatedAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "UpdatedAt", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Product {
    pub fn from_draft(id: ProductId, draft: &ProductDraft) -> Self {
        Self {
            id,
            name: draft.name.clone(),
            description: draft.description.clone(),
            unit_price: draft.unit_price,
            stock: draft.stock,
            brand_id: Some(draft.brand_id),
            brand: None,
            category_id: Some(draft.category_id),
            category: None,
            images: Vec::new(),
            created_at: None,
            updated_at: None,
        }
    }

    pub fn primary_image(&self) -> Option<&Image> {
        self.images.first()
    }

    pub fn brand_name(&self) -> Option<&str> {
        self.brand.as_ref().map(|brand| brand.name.as_str())
    }

    pub fn category_name(&self) -> Option<&str> {
        self.category.as_ref().map(|category| category.name.as_str())
    }
}

/// Request body for creating or replacing a product.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProductDraft {
    #[serde(rename = "ProductName")]
    pub name: String,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "PricePerPiece", with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
    #[serde(rename = "Stock")]
    pub stock: u32,
    #[serde(rename = "BrandID")]
    pub brand_id: BrandId,
    #[serde(rename = "CategoryID")]
    pub category_id: CategoryId,
}
