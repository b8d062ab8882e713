use std::fmt;

use serde::{Deserialize, Serialize};

use super::wire::Loaded;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BrandId(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(pub u64);

impl From<u64> for BrandId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<u64> for CategoryId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for BrandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Brand {
    #[serde(rename = "ID")]
    pub id: BrandId,
    #[serde(rename = "BrandName", default)]
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    #[serde(rename = "ID")]
    pub id: CategoryId,
    #[serde(rename = "CategoryName", default)]
    pub name: String,
}

impl Loaded for Brand {
    fn is_loaded(&self) -> bool {
        self.id.0 != 0
    }
}

impl Loaded for Category {
    fn is_loaded(&self) -> bool {
        self.id.0 != 0
    }
}

/// Resolves a selector value to a brand: either its numeric id or its name
/// (case-insensitive).
pub fn resolve_brand<'a>(brands: &'a [Brand], selector: &str) -> Option<&'a Brand> {
    let selector = selector.trim();
    if let Ok(id) = selector.parse::<u64>() {
        return brands.iter().find(|brand| brand.id.0 == id);
    }
    brands.iter().find(|brand| brand.name.eq_ignore_ascii_case(selector))
}

pub fn resolve_category<'a>(categories: &'a [Category], selector: &str) -> Option<&'a Category> {
    let selector = selector.trim();
    if let Ok(id) = selector.parse::<u64>() {
        return categories.iter().find(|category| category.id.0 == id);
    }
    categories.iter().find(|category| category.name.eq_ignore_ascii_case(selector))
}
